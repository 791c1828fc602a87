use std::sync::{mpsc, Arc, Mutex};
use std::thread;

use chat_logging::chat_error;

use crate::client::GenerationClient;
use crate::{ClientEvent, RequestId};

enum ClientCommand {
    Generate {
        request_id: RequestId,
        prompt: String,
        urls: Vec<String>,
    },
    Suggest {
        group_id: String,
        urls: Vec<String>,
    },
}

/// Runs generation requests on a dedicated thread with its own tokio runtime
/// and reports completions over an mpsc channel.
#[derive(Clone)]
pub struct ClientHandle {
    cmd_tx: mpsc::Sender<ClientCommand>,
    event_rx: Arc<Mutex<mpsc::Receiver<ClientEvent>>>,
}

impl ClientHandle {
    pub fn new(client: Arc<dyn GenerationClient>) -> Self {
        let (cmd_tx, cmd_rx) = mpsc::channel::<ClientCommand>();
        let (event_tx, event_rx) = mpsc::channel();

        thread::spawn(move || {
            let runtime = match tokio::runtime::Runtime::new() {
                Ok(runtime) => runtime,
                Err(err) => {
                    chat_error!("Failed to start client runtime: {}", err);
                    return;
                }
            };
            while let Ok(command) = cmd_rx.recv() {
                let client = client.clone();
                let event_tx = event_tx.clone();
                runtime.spawn(async move {
                    let event = run_command(client.as_ref(), command).await;
                    let _ = event_tx.send(event);
                });
            }
        });

        Self {
            cmd_tx,
            event_rx: Arc::new(Mutex::new(event_rx)),
        }
    }

    pub fn generate(&self, request_id: RequestId, prompt: impl Into<String>, urls: Vec<String>) {
        let _ = self.cmd_tx.send(ClientCommand::Generate {
            request_id,
            prompt: prompt.into(),
            urls,
        });
    }

    pub fn suggest(&self, group_id: impl Into<String>, urls: Vec<String>) {
        let _ = self.cmd_tx.send(ClientCommand::Suggest {
            group_id: group_id.into(),
            urls,
        });
    }

    pub fn try_recv(&self) -> Option<ClientEvent> {
        self.event_rx.lock().ok()?.try_recv().ok()
    }
}

async fn run_command(client: &dyn GenerationClient, command: ClientCommand) -> ClientEvent {
    match command {
        ClientCommand::Generate {
            request_id,
            prompt,
            urls,
        } => ClientEvent::GenerationCompleted {
            request_id,
            result: client.generate(&prompt, &urls).await,
        },
        ClientCommand::Suggest { group_id, urls } => ClientEvent::SuggestionsCompleted {
            group_id,
            result: client.suggest(&urls).await,
        },
    }
}
