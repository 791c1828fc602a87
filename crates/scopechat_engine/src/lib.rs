//! Scopechat engine: generation client, rendering, and effect execution.
mod client;
mod engine;
mod persist;
mod render;
mod types;

pub use client::{
    ClientSettings, GeminiClient, GenerationClient, DEFAULT_BASE_URL, DEFAULT_MODEL,
};
pub use engine::ClientHandle;
pub use persist::{PersistError, TranscriptWriter};
pub use render::{escape_html, MarkdownHtmlRenderer, Renderer};
pub use types::{
    ClientError, ClientEvent, GenerationOutcome, RequestId, RetrievalStatus, UrlCitation,
};
