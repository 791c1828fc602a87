use crate::MessageId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Answer `prompt` grounded in `urls`; `message_id` is the transcript
    /// placeholder the response must resolve.
    Generate {
        message_id: MessageId,
        prompt: String,
        urls: Vec<String>,
    },
    /// Derive suggested questions from `urls`. Tagged with the group so a
    /// stale arrival after a group switch can be recognized.
    FetchSuggestions {
        group_id: String,
        urls: Vec<String>,
    },
}
