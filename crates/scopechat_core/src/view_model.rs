use crate::{MessageId, Sender, UrlCitation, UrlRejection};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub active_group_id: String,
    pub groups: Vec<GroupView>,
    pub transcript: Vec<MessageView>,
    pub suggestions: Vec<String>,
    pub is_sending: bool,
    pub is_fetching_suggestions: bool,
    pub last_url_rejection: Option<UrlRejection>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupView {
    pub id: String,
    pub name: String,
    pub urls: Vec<String>,
    pub at_capacity: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageView {
    pub id: MessageId,
    pub sender: Sender,
    pub text: String,
    pub timestamp_ms: u64,
    pub is_loading: bool,
    pub citations: Vec<UrlCitation>,
}
