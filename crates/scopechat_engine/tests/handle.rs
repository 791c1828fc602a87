use std::sync::Arc;
use std::time::{Duration, Instant};

use scopechat_engine::{
    ClientError, ClientEvent, ClientHandle, GenerationClient, GenerationOutcome,
};

struct FakeClient;

#[async_trait::async_trait]
impl GenerationClient for FakeClient {
    async fn generate(
        &self,
        prompt: &str,
        urls: &[String],
    ) -> Result<GenerationOutcome, ClientError> {
        if prompt == "fail" {
            return Err(ClientError::Quota("limit reached".to_string()));
        }
        Ok(GenerationOutcome {
            text: format!("echo: {prompt} ({} sources)", urls.len()),
            citations: Vec::new(),
        })
    }

    async fn suggest(&self, _urls: &[String]) -> Result<String, ClientError> {
        Ok(r#"{"suggestions": ["one"]}"#.to_string())
    }
}

fn wait_for_event(handle: &ClientHandle) -> ClientEvent {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Some(event) = handle.try_recv() {
            return event;
        }
        assert!(Instant::now() < deadline, "no event within deadline");
        std::thread::sleep(Duration::from_millis(10));
    }
}

#[test]
fn generate_completion_carries_the_request_id() {
    let handle = ClientHandle::new(Arc::new(FakeClient));
    handle.generate(7, "hello", vec!["https://a.example.com".to_string()]);

    let event = wait_for_event(&handle);
    assert_eq!(
        event,
        ClientEvent::GenerationCompleted {
            request_id: 7,
            result: Ok(GenerationOutcome {
                text: "echo: hello (1 sources)".to_string(),
                citations: Vec::new(),
            }),
        }
    );
}

#[test]
fn failures_are_reported_as_events_not_panics() {
    let handle = ClientHandle::new(Arc::new(FakeClient));
    handle.generate(1, "fail", Vec::new());

    match wait_for_event(&handle) {
        ClientEvent::GenerationCompleted { request_id, result } => {
            assert_eq!(request_id, 1);
            assert_eq!(result, Err(ClientError::Quota("limit reached".to_string())));
        }
        other => panic!("unexpected event: {other:?}"),
    }
}

#[test]
fn suggest_completion_carries_the_group_id() {
    let handle = ClientHandle::new(Arc::new(FakeClient));
    handle.suggest("docs", Vec::new());

    let event = wait_for_event(&handle);
    assert_eq!(
        event,
        ClientEvent::SuggestionsCompleted {
            group_id: "docs".to_string(),
            result: Ok(r#"{"suggestions": ["one"]}"#.to_string()),
        }
    );
}

#[test]
fn try_recv_is_empty_before_any_request() {
    let handle = ClientHandle::new(Arc::new(FakeClient));
    assert!(handle.try_recv().is_none());
}
