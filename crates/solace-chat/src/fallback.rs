use solace_types::Sentiment;

/// Sent instead of a generated reply when a message shows critical crisis language
pub const CRISIS_REPLY: &str = "I'm really sorry you're feeling this way, and I'm glad you told me. \
Your safety matters most right now. Please reach out to someone who can help immediately.";

const POSITIVE_REPLIES: &[&str] = &[
    "I'm glad to hear that! What do you think helped things go well?",
    "That sounds really good. It's worth taking a moment to enjoy it.",
];

const NEUTRAL_REPLIES: &[&str] = &[
    "Thanks for sharing that with me. Tell me a bit more about what's on your mind?",
    "I'm listening. How has the rest of your day been?",
];

const NEGATIVE_REPLIES: &[&str] = &[
    "I'm sorry you're going through this. It's okay to feel the way you do, and I'm here to listen.",
    "That sounds really hard. Would it help to talk through what's weighing on you most?",
    "Thank you for trusting me with this. Taking a slow, deep breath can help a little while we talk.",
];

/// Canned reply used when the provider is unavailable.
///
/// `seed` picks among the replies for the sentiment so consecutive
/// fallbacks in a session do not repeat verbatim.
pub fn fallback_reply(sentiment: Sentiment, seed: usize) -> &'static str {
    let replies = match sentiment {
        Sentiment::Positive => POSITIVE_REPLIES,
        Sentiment::Neutral => NEUTRAL_REPLIES,
        Sentiment::Negative => NEGATIVE_REPLIES,
    };
    replies[seed % replies.len()]
}

/// Fixed reply for critical crisis messages
pub fn crisis_reply(resources: &str) -> String {
    with_resources(CRISIS_REPLY, resources)
}

/// Append help resources to a reply
pub fn with_resources(reply: &str, resources: &str) -> String {
    format!("{}\n\n{}", reply.trim_end(), resources)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_by_sentiment() {
        assert!(NEGATIVE_REPLIES.contains(&fallback_reply(Sentiment::Negative, 0)));
        assert!(POSITIVE_REPLIES.contains(&fallback_reply(Sentiment::Positive, 7)));
        assert!(NEUTRAL_REPLIES.contains(&fallback_reply(Sentiment::Neutral, 3)));
    }

    #[test]
    fn test_fallback_rotates() {
        assert_ne!(
            fallback_reply(Sentiment::Negative, 0),
            fallback_reply(Sentiment::Negative, 1)
        );
    }

    #[test]
    fn test_crisis_reply_includes_resources() {
        let reply = crisis_reply("Call 988.");
        assert!(reply.starts_with(CRISIS_REPLY));
        assert!(reply.ends_with("\n\nCall 988."));
    }
}
