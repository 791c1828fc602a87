use std::time::Duration;

use chat_logging::{chat_debug, chat_warn};
use serde::{Deserialize, Serialize};

use crate::{ClientError, GenerationOutcome, RetrievalStatus, UrlCitation};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

const SUGGESTION_INSTRUCTION: &str = "Based on the content of the sources below, propose 4 short \
questions a reader might ask about them. Respond with only a JSON object of the form \
{\"suggestions\": [\"question\", ...]} and nothing else.";

#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub base_url: String,
    pub model: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(120),
        }
    }
}

/// Boundary to the hosted generation backend.
#[async_trait::async_trait]
pub trait GenerationClient: Send + Sync {
    /// Answers `prompt`, grounding the response in `urls`.
    async fn generate(
        &self,
        prompt: &str,
        urls: &[String],
    ) -> Result<GenerationOutcome, ClientError>;

    /// Returns raw model text expected to carry a JSON `suggestions` payload.
    async fn suggest(&self, urls: &[String]) -> Result<String, ClientError>;
}

/// Client for the Gemini `generateContent` REST endpoint with the
/// `url_context` retrieval tool enabled.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: reqwest::Client,
    settings: ClientSettings,
    api_key: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, settings: ClientSettings) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ClientError::Transport(err.to_string()))?;
        Ok(Self {
            client,
            settings,
            api_key: api_key.into(),
        })
    }

    // The key travels as a query parameter; never log the full endpoint.
    fn endpoint(&self) -> String {
        format!(
            "{}/{}:generateContent?key={}",
            self.settings.base_url.trim_end_matches('/'),
            self.settings.model,
            self.api_key
        )
    }

    async fn call(&self, prompt: String) -> Result<GenerateContentResponse, ClientError> {
        let body = GenerateContentRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![Part { text: prompt }],
            }],
            tools: vec![Tool {
                url_context: UrlContextTool {},
            }],
        };

        chat_debug!("Dispatching request to model {}", self.settings.model);
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if !status.is_success() {
            let body_text = response.text().await.unwrap_or_default();
            let err = map_http_error(status, &body_text);
            chat_warn!("Backend returned {}: {}", status, err);
            return Err(err);
        }

        response
            .json::<GenerateContentResponse>()
            .await
            .map_err(|err| ClientError::Transport(format!("malformed response body: {err}")))
    }
}

#[async_trait::async_trait]
impl GenerationClient for GeminiClient {
    async fn generate(
        &self,
        prompt: &str,
        urls: &[String],
    ) -> Result<GenerationOutcome, ClientError> {
        let response = self.call(grounded_prompt(prompt, urls)).await?;
        let Some(candidate) = first_candidate(response) else {
            return Ok(GenerationOutcome {
                text: String::new(),
                citations: Vec::new(),
            });
        };

        let citations = candidate
            .url_context_metadata
            .map(|metadata| {
                metadata
                    .url_metadata
                    .into_iter()
                    .map(|entry| UrlCitation {
                        retrieved_url: entry.retrieved_url.unwrap_or_default(),
                        status: map_retrieval_status(entry.url_retrieval_status.as_deref()),
                    })
                    .collect()
            })
            .unwrap_or_default();

        Ok(GenerationOutcome {
            text: candidate_text(candidate.content),
            citations,
        })
    }

    async fn suggest(&self, urls: &[String]) -> Result<String, ClientError> {
        let response = self.call(grounded_prompt(SUGGESTION_INSTRUCTION, urls)).await?;
        Ok(first_candidate(response)
            .map(|candidate| candidate_text(candidate.content))
            .unwrap_or_default())
    }
}

/// Appends the URL list as inline text context; the `url_context` tool also
/// receives them through the prompt body.
fn grounded_prompt(prompt: &str, urls: &[String]) -> String {
    if urls.is_empty() {
        return prompt.to_string();
    }
    let mut grounded = String::from(prompt);
    grounded.push_str("\n\nUse these sources as context:\n");
    for url in urls {
        grounded.push_str("- ");
        grounded.push_str(url);
        grounded.push('\n');
    }
    grounded
}

fn first_candidate(response: GenerateContentResponse) -> Option<Candidate> {
    response.candidates.unwrap_or_default().into_iter().next()
}

fn candidate_text(content: Option<CandidateContent>) -> String {
    content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

fn map_retrieval_status(status: Option<&str>) -> RetrievalStatus {
    match status {
        Some("URL_RETRIEVAL_STATUS_SUCCESS") => RetrievalStatus::Success,
        Some("URL_RETRIEVAL_STATUS_ERROR") => RetrievalStatus::Error,
        _ => RetrievalStatus::Unknown,
    }
}

fn map_transport_error(err: reqwest::Error) -> ClientError {
    if err.is_timeout() {
        return ClientError::Transport(format!("request timed out: {err}"));
    }
    ClientError::Transport(err.to_string())
}

fn map_http_error(status: reqwest::StatusCode, body: &str) -> ClientError {
    let detail = error_message(body).unwrap_or_else(|| status.to_string());
    match status.as_u16() {
        401 | 403 => ClientError::Auth(detail),
        429 => ClientError::Quota(detail),
        _ => ClientError::Transport(detail),
    }
}

/// Pulls `error.message` out of a backend error body when present.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    value
        .get("error")?
        .get("message")?
        .as_str()
        .map(ToOwned::to_owned)
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<Content<'a>>,
    tools: Vec<Tool>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    role: &'a str,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct Part {
    text: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    url_context: UrlContextTool,
}

#[derive(Debug, Serialize)]
struct UrlContextTool {}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
    #[serde(default, alias = "urlContextMetadata")]
    url_context_metadata: Option<UrlContextMetadata>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct UrlContextMetadata {
    #[serde(default, alias = "urlMetadata")]
    url_metadata: Vec<UrlMetadataEntry>,
}

#[derive(Debug, Deserialize)]
struct UrlMetadataEntry {
    #[serde(alias = "retrievedUrl")]
    retrieved_url: Option<String>,
    #[serde(default, alias = "urlRetrievalStatus")]
    url_retrieval_status: Option<String>,
}
