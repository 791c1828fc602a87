//! Scopechat core: pure conversation state machine and view-model helpers.
mod effect;
mod msg;
mod state;
mod suggestions;
mod update;
mod view_model;

pub use effect::Effect;
pub use msg::{FailureReason, GenerationReply, Msg};
pub use state::{
    AppState, ChatMessage, GroupSeed, MessageId, RejectReason, RetrievalStatus, Sender,
    SessionConfig, UrlCitation, UrlRejection, CREDENTIAL_MISSING_NOTICE,
    DEFAULT_MAX_URLS_PER_GROUP, EMPTY_REPLY_NOTICE, MAX_SUGGESTIONS, NO_SOURCES_HINT,
    THINKING_INDICATOR,
};
pub use suggestions::{parse_suggestions, strip_code_fence, SuggestionParseError};
pub use update::update;
pub use view_model::{AppViewModel, GroupView, MessageView};
