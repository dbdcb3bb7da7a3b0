use anyhow::Result;
use solace_llm::{ChatClient, ChatRequest, GeminiClient, Message};

#[tokio::main]
async fn main() -> Result<()> {
    let api_key = std::env::var("GEMINI_API_KEY")?;
    let client = GeminiClient::new(api_key)?;

    let request = ChatRequest::new(
        "gemini-1.5-flash",
        vec![
            Message::system("You are a calm, supportive wellness companion."),
            Message::human("I had a stressful day at work."),
        ],
    );

    let response = client.chat(request).await?;

    println!("Response: {}", response.content.unwrap_or_default());

    if let Some(usage) = response.usage {
        println!("Tokens used: {}", usage.total_tokens);
    }

    Ok(())
}
