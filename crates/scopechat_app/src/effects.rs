use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use chat_logging::{chat_info, chat_warn};
use scopechat_core::{Effect, FailureReason, GenerationReply, Msg, RetrievalStatus, UrlCitation};
use scopechat_engine::{ClientEvent, ClientHandle, GenerationClient};

/// Executes core effects against the generation client and feeds completions
/// back into the update loop as messages.
pub struct EffectRunner {
    handle: ClientHandle,
}

impl EffectRunner {
    pub fn new(client: Arc<dyn GenerationClient>, msg_tx: mpsc::Sender<Msg>) -> Self {
        let handle = ClientHandle::new(client);
        let runner = Self { handle };
        runner.spawn_event_loop(msg_tx);
        runner
    }

    pub fn enqueue(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Generate {
                    message_id,
                    prompt,
                    urls,
                } => {
                    chat_info!(
                        "Generate message_id={} prompt_len={} urls={}",
                        message_id,
                        prompt.len(),
                        urls.len()
                    );
                    self.handle.generate(message_id, prompt, urls);
                }
                Effect::FetchSuggestions { group_id, urls } => {
                    chat_info!("FetchSuggestions group={} urls={}", group_id, urls.len());
                    self.handle.suggest(group_id, urls);
                }
            }
        }
    }

    fn spawn_event_loop(&self, msg_tx: mpsc::Sender<Msg>) {
        let handle = self.handle.clone();
        thread::spawn(move || loop {
            if let Some(event) = handle.try_recv() {
                let msg = match event {
                    ClientEvent::GenerationCompleted { request_id, result } => {
                        if let Err(err) = &result {
                            chat_warn!("Generation {} failed: {}", request_id, err);
                        }
                        Msg::GenerationArrived {
                            message_id: request_id,
                            result: result.map(map_outcome).map_err(map_failure),
                        }
                    }
                    ClientEvent::SuggestionsCompleted { group_id, result } => {
                        if let Err(err) = &result {
                            chat_warn!("Suggestion fetch for {} failed: {}", group_id, err);
                        }
                        Msg::SuggestionsArrived {
                            group_id,
                            result: result.map_err(map_failure),
                        }
                    }
                };
                if msg_tx.send(msg).is_err() {
                    break;
                }
            } else {
                thread::sleep(Duration::from_millis(20));
            }
        });
    }
}

fn map_outcome(outcome: scopechat_engine::GenerationOutcome) -> GenerationReply {
    GenerationReply {
        text: outcome.text,
        citations: outcome.citations.into_iter().map(map_citation).collect(),
    }
}

fn map_citation(citation: scopechat_engine::UrlCitation) -> UrlCitation {
    UrlCitation {
        retrieved_url: citation.retrieved_url,
        status: match citation.status {
            scopechat_engine::RetrievalStatus::Success => RetrievalStatus::Success,
            scopechat_engine::RetrievalStatus::Error => RetrievalStatus::Error,
            scopechat_engine::RetrievalStatus::Unknown => RetrievalStatus::Unknown,
        },
    }
}

fn map_failure(err: scopechat_engine::ClientError) -> FailureReason {
    match err {
        scopechat_engine::ClientError::Auth(detail) => FailureReason::Auth(detail),
        scopechat_engine::ClientError::Quota(detail) => FailureReason::Quota(detail),
        scopechat_engine::ClientError::Transport(detail) => FailureReason::Transport(detail),
    }
}
