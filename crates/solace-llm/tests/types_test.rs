use solace_llm::{Content, Message};

#[test]
fn test_content_from_str_and_string() {
    let a: Content = "Test".into();
    let b: Content = String::from("Test").into();
    assert_eq!(a, b);
    assert_eq!(a.as_str(), "Test");
    assert_eq!(a.to_string(), "Test");
}

#[test]
fn test_content_blank() {
    assert!(Content::text("  \n").is_blank());
    assert!(!Content::text(" hi ").is_blank());
}

#[test]
fn test_message_roles() {
    assert_eq!(Message::system("You are kind").role(), "system");
    assert_eq!(Message::human("Hello").role(), "user");
    assert_eq!(Message::ai("Hi there!").role(), "assistant");
    assert!(Message::system("x").is_system());
    assert!(!Message::human("x").is_system());
}

#[test]
fn test_message_serialization_human() {
    let json = serde_json::to_value(Message::human("Hello")).unwrap();
    assert_eq!(json, serde_json::json!({"role": "user", "content": "Hello"}));
}

#[test]
fn test_message_deserialization() {
    let json = r#"{"role":"assistant","content":"Test"}"#;
    let msg: Message = serde_json::from_str(json).unwrap();
    assert_eq!(msg, Message::ai("Test"));
    assert_eq!(msg.text(), "Test");
}
