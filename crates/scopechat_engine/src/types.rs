use thiserror::Error;

/// Correlates a generation request with the transcript placeholder it resolves.
pub type RequestId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStatus {
    Success,
    Error,
    Unknown,
}

/// Per-URL retrieval report attached to a generation response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCitation {
    pub retrieved_url: String,
    pub status: RetrievalStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationOutcome {
    pub text: String,
    pub citations: Vec<UrlCitation>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ClientError {
    #[error("authentication failed: {0}")]
    Auth(String),
    #[error("quota exhausted: {0}")]
    Quota(String),
    #[error("transport error: {0}")]
    Transport(String),
}

/// Completion notification delivered over the handle's event channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClientEvent {
    GenerationCompleted {
        request_id: RequestId,
        result: Result<GenerationOutcome, ClientError>,
    },
    SuggestionsCompleted {
        group_id: String,
        result: Result<String, ClientError>,
    },
}
