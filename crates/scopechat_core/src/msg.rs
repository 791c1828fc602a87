use thiserror::Error;

use crate::{MessageId, UrlCitation};

/// Resolved payload of a generate call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReply {
    pub text: String,
    pub citations: Vec<UrlCitation>,
}

/// Why a generation or suggestion call failed, in user-presentable form.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FailureReason {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("quota exhausted: {0}")]
    Quota(String),
    #[error("request failed: {0}")]
    Transport(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User picked a different knowledge-base group.
    GroupSelected { group_id: String },
    /// User asked to add a URL to the active group.
    AddUrlRequested { url: String },
    /// User asked to remove a URL from the active group.
    RemoveUrlRequested { url: String },
    /// User submitted a free-text query.
    QuerySubmitted { text: String },
    /// User activated one of the suggested questions.
    SuggestionChosen { text: String },
    /// The generate call for the placeholder with this id finished.
    GenerationArrived {
        message_id: MessageId,
        result: Result<GenerationReply, FailureReason>,
    },
    /// The suggestion fetch issued for the given group finished.
    SuggestionsArrived {
        group_id: String,
        result: Result<String, FailureReason>,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
