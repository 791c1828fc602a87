use std::fmt;

use crate::view_model::{AppViewModel, GroupView, MessageView};

pub type MessageId = u64;

/// Maximum number of URLs a single group may hold.
pub const DEFAULT_MAX_URLS_PER_GROUP: usize = 20;
/// Maximum number of suggested questions kept from a suggestion payload.
pub const MAX_SUGGESTIONS: usize = 4;

/// Transient text shown in the model placeholder while a request is in flight.
pub const THINKING_INDICATOR: &str = "Thinking…";
/// Fallback text when the model resolves with an empty body.
pub const EMPTY_REPLY_NOTICE: &str = "The model returned an empty response.";
/// Informational entry shown instead of suggestions when a group has no URLs.
pub const NO_SOURCES_HINT: &str =
    "Add reference URLs to this group to get suggested questions.";
/// Transcript notice appended when a query is submitted without a credential.
pub const CREDENTIAL_MISSING_NOTICE: &str =
    "No API key is configured, so the query was not sent.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Sender {
    User,
    Model,
    System,
}

/// Per-URL retrieval outcome reported by the generation backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RetrievalStatus {
    Success,
    Error,
    Unknown,
}

/// Citation metadata attached verbatim to a resolved model message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlCitation {
    pub retrieved_url: String,
    pub status: RetrievalStatus,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub id: MessageId,
    pub text: String,
    pub sender: Sender,
    pub timestamp_ms: u64,
    pub is_loading: bool,
    pub url_context: Vec<UrlCitation>,
}

/// Startup definition of one knowledge-base group.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GroupSeed {
    pub id: String,
    pub name: String,
    pub urls: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub groups: Vec<GroupSeed>,
    pub credential_configured: bool,
    pub max_urls_per_group: usize,
}

impl SessionConfig {
    pub fn new(groups: Vec<GroupSeed>, credential_configured: bool) -> Self {
        Self {
            groups,
            credential_configured,
            max_urls_per_group: DEFAULT_MAX_URLS_PER_GROUP,
        }
    }
}

/// A named, ordered collection of reference URLs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlGroup {
    id: String,
    name: String,
    urls: Vec<String>,
}

impl UrlGroup {
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn urls(&self) -> &[String] {
        &self.urls
    }
}

/// Why an add-URL request was turned down.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    Empty,
    Malformed,
    Duplicate,
    AtCapacity,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::Empty => write!(f, "URL is empty"),
            RejectReason::Malformed => write!(f, "not a valid http(s) URL"),
            RejectReason::Duplicate => write!(f, "URL is already in this group"),
            RejectReason::AtCapacity => write!(f, "group is full"),
        }
    }
}

/// Inline validation outcome, surfaced next to the URL input rather than in
/// the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UrlRejection {
    pub url: String,
    pub reason: RejectReason,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppState {
    credential_configured: bool,
    max_urls_per_group: usize,
    groups: Vec<UrlGroup>,
    active_group_id: String,
    transcript: Vec<ChatMessage>,
    suggestions: Vec<String>,
    is_sending: bool,
    is_fetching_suggestions: bool,
    last_url_rejection: Option<UrlRejection>,
    next_message_id: MessageId,
    dirty: bool,
}

impl AppState {
    pub fn new(config: SessionConfig) -> Self {
        let groups: Vec<UrlGroup> = config
            .groups
            .into_iter()
            .map(|seed| UrlGroup {
                id: seed.id,
                name: seed.name,
                urls: dedupe_preserving_order(seed.urls),
            })
            .collect();
        let active_group_id = groups.first().map(|g| g.id.clone()).unwrap_or_default();

        Self {
            credential_configured: config.credential_configured,
            max_urls_per_group: config.max_urls_per_group,
            groups,
            active_group_id,
            transcript: Vec::new(),
            suggestions: Vec::new(),
            is_sending: false,
            is_fetching_suggestions: false,
            last_url_rejection: None,
            next_message_id: 1,
            dirty: false,
        }
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            active_group_id: self.active_group_id.clone(),
            groups: self
                .groups
                .iter()
                .map(|g| GroupView {
                    id: g.id.clone(),
                    name: g.name.clone(),
                    urls: g.urls.clone(),
                    at_capacity: g.urls.len() >= self.max_urls_per_group,
                })
                .collect(),
            transcript: self
                .transcript
                .iter()
                .map(|m| MessageView {
                    id: m.id,
                    sender: m.sender,
                    text: m.text.clone(),
                    timestamp_ms: m.timestamp_ms,
                    is_loading: m.is_loading,
                    citations: m.url_context.clone(),
                })
                .collect(),
            suggestions: self.suggestions.clone(),
            is_sending: self.is_sending,
            is_fetching_suggestions: self.is_fetching_suggestions,
            last_url_rejection: self.last_url_rejection.clone(),
            dirty: self.dirty,
        }
    }

    /// Returns whether a render is due and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn credential_configured(&self) -> bool {
        self.credential_configured
    }

    pub(crate) fn group(&self, id: &str) -> Option<&UrlGroup> {
        self.groups.iter().find(|g| g.id == id)
    }

    pub(crate) fn is_active_group(&self, id: &str) -> bool {
        self.active_group_id == id
    }

    pub(crate) fn active_group(&self) -> Option<&UrlGroup> {
        self.groups.iter().find(|g| g.id == self.active_group_id)
    }

    pub(crate) fn active_group_id(&self) -> String {
        self.active_group_id.clone()
    }

    pub(crate) fn active_group_name(&self) -> String {
        self.active_group()
            .map(|g| g.name.clone())
            .unwrap_or_default()
    }

    pub(crate) fn active_urls(&self) -> Vec<String> {
        self.active_group()
            .map(|g| g.urls.clone())
            .unwrap_or_default()
    }

    pub(crate) fn select_group(&mut self, id: &str) {
        self.active_group_id = id.to_string();
        self.last_url_rejection = None;
        self.dirty = true;
    }

    pub(crate) fn reset_transcript(&mut self, welcome_text: String, now_ms: u64) {
        self.transcript.clear();
        self.push_message(Sender::System, welcome_text, now_ms);
    }

    pub(crate) fn push_message(
        &mut self,
        sender: Sender,
        text: String,
        now_ms: u64,
    ) -> MessageId {
        let id = self.next_message_id;
        self.next_message_id += 1;
        self.transcript.push(ChatMessage {
            id,
            text,
            sender,
            timestamp_ms: now_ms,
            is_loading: false,
            url_context: Vec::new(),
        });
        self.dirty = true;
        id
    }

    pub(crate) fn push_placeholder(&mut self, now_ms: u64) -> MessageId {
        let id = self.push_message(Sender::Model, THINKING_INDICATOR.to_string(), now_ms);
        if let Some(message) = self.transcript.last_mut() {
            message.is_loading = true;
        }
        id
    }

    pub(crate) fn message_mut(&mut self, id: MessageId) -> Option<&mut ChatMessage> {
        self.transcript.iter_mut().find(|m| m.id == id)
    }

    pub(crate) fn request_in_flight(&self) -> bool {
        self.is_sending || self.is_fetching_suggestions
    }

    pub(crate) fn set_sending(&mut self, value: bool) {
        self.is_sending = value;
        self.dirty = true;
    }

    pub(crate) fn set_fetching_suggestions(&mut self, value: bool) {
        self.is_fetching_suggestions = value;
        self.dirty = true;
    }

    pub(crate) fn set_suggestions(&mut self, suggestions: Vec<String>) {
        self.suggestions = suggestions;
        self.dirty = true;
    }

    /// Adds a URL to the active group, recording the rejection reason inline
    /// when validation fails. Never touches the transcript.
    pub(crate) fn add_url(&mut self, raw: &str) {
        let url = raw.trim().to_string();
        let max = self.max_urls_per_group;
        let Self {
            groups,
            active_group_id,
            ..
        } = self;
        let Some(group) = groups.iter_mut().find(|g| g.id == *active_group_id) else {
            return;
        };

        let reason = if url.is_empty() {
            Some(RejectReason::Empty)
        } else if !is_valid_reference_url(&url) {
            Some(RejectReason::Malformed)
        } else if group.urls.iter().any(|existing| *existing == url) {
            Some(RejectReason::Duplicate)
        } else if group.urls.len() >= max {
            Some(RejectReason::AtCapacity)
        } else {
            group.urls.push(url.clone());
            None
        };

        self.last_url_rejection = reason.map(|reason| UrlRejection { url, reason });
        self.dirty = true;
    }

    /// Removes exactly one matching URL from the active group; order of the
    /// remaining entries is preserved. No-op when the URL is absent.
    pub(crate) fn remove_url(&mut self, raw: &str) {
        let url = raw.trim();
        let Self {
            groups,
            active_group_id,
            ..
        } = self;
        let Some(group) = groups.iter_mut().find(|g| g.id == *active_group_id) else {
            return;
        };
        if let Some(idx) = group.urls.iter().position(|existing| existing == url) {
            group.urls.remove(idx);
            self.dirty = true;
        }
    }
}

/// Accepts only absolute http(s) URLs with an authority.
fn is_valid_reference_url(raw: &str) -> bool {
    match url::Url::parse(raw) {
        Ok(parsed) => matches!(parsed.scheme(), "http" | "https") && parsed.has_host(),
        Err(_) => false,
    }
}

fn dedupe_preserving_order(urls: Vec<String>) -> Vec<String> {
    let mut result: Vec<String> = Vec::with_capacity(urls.len());
    for url in urls {
        if !result.contains(&url) {
            result.push(url);
        }
    }
    result
}
