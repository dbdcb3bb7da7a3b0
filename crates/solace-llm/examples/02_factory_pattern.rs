use anyhow::Result;
use solace_llm::{ChatRequest, ClientFactory, Message, ProviderConfig};

#[tokio::main]
async fn main() -> Result<()> {
    // In a real application, this comes from the config file
    let provider_type = std::env::var("LLM_PROVIDER").unwrap_or_else(|_| "gemini".to_string());

    println!("Selected provider: {}", provider_type);

    let (config, model) = match provider_type.as_str() {
        "openai" => {
            let api_key = std::env::var("OPENAI_API_KEY")?;
            (ProviderConfig::openai(api_key), "gpt-4o-mini".to_string())
        }
        _ => {
            let api_key = std::env::var("GEMINI_API_KEY")?;
            (ProviderConfig::gemini(api_key), "gemini-1.5-flash".to_string())
        }
    };

    let client = ClientFactory::create_client(config)?;

    let request = ChatRequest::new(model, vec![Message::human("Give me one grounding exercise.")]);
    let response = client.chat(request).await?;
    println!("[{}] {}", client.provider_name(), response.content.unwrap_or_default());

    Ok(())
}
