use std::sync::Once;

use scopechat_core::{
    update, AppState, Effect, FailureReason, GroupSeed, Msg, Sender, SessionConfig,
    NO_SOURCES_HINT,
};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(chat_logging::initialize_for_tests);
}

/// State with the docs suggestion fetch in flight.
fn fetching_state() -> AppState {
    let groups = vec![
        GroupSeed {
            id: "docs".to_string(),
            name: "Docs".to_string(),
            urls: vec!["https://docs.example.com/guide".to_string()],
        },
        GroupSeed {
            id: "news".to_string(),
            name: "News".to_string(),
            urls: Vec::new(),
        },
    ];
    let (state, effects) = update(
        AppState::new(SessionConfig::new(groups, true)),
        Msg::GroupSelected {
            group_id: "docs".to_string(),
        },
        0,
    );
    assert!(matches!(effects[..], [Effect::FetchSuggestions { .. }]));
    state
}

fn arrive(state: AppState, group_id: &str, result: Result<&str, FailureReason>) -> AppState {
    let (state, effects) = update(
        state,
        Msg::SuggestionsArrived {
            group_id: group_id.to_string(),
            result: result.map(ToOwned::to_owned),
        },
        1,
    );
    assert!(effects.is_empty());
    state
}

#[test]
fn fenced_payload_is_unwrapped_and_truncated_to_four() {
    init_logging();
    let payload = "```json\n{\"suggestions\":[\"a\",\"b\",\"c\",\"d\",\"e\"]}\n```";
    let state = arrive(fetching_state(), "docs", Ok(payload));
    let view = state.view();

    assert_eq!(view.suggestions, vec!["a", "b", "c", "d"]);
    assert!(!view.is_fetching_suggestions);
    assert_eq!(view.transcript.len(), 1);
}

#[test]
fn non_string_entries_are_dropped() {
    init_logging();
    let payload = r#"{"suggestions":["a", 1, true, "b", null]}"#;
    let state = arrive(fetching_state(), "docs", Ok(payload));

    assert_eq!(state.view().suggestions, vec!["a", "b"]);
}

#[test]
fn non_json_payload_appends_one_diagnostic() {
    init_logging();
    let state = arrive(fetching_state(), "docs", Ok("not json"));
    let view = state.view();

    assert!(view.suggestions.is_empty());
    assert_eq!(view.transcript.len(), 2);
    assert_eq!(view.transcript[1].sender, Sender::System);
    assert!(!view.is_fetching_suggestions);
}

#[test]
fn wrong_shape_payloads_degrade_gracefully() {
    init_logging();
    for payload in [r#"{"questions":["a"]}"#, r#"{"suggestions":"a"}"#] {
        let state = arrive(fetching_state(), "docs", Ok(payload));
        let view = state.view();

        assert!(view.suggestions.is_empty());
        assert_eq!(view.transcript.len(), 2);
        assert_eq!(view.transcript[1].sender, Sender::System);
    }
}

#[test]
fn transport_failure_appends_one_diagnostic() {
    init_logging();
    let state = arrive(
        fetching_state(),
        "docs",
        Err(FailureReason::Transport("connection reset".to_string())),
    );
    let view = state.view();

    assert!(view.suggestions.is_empty());
    assert_eq!(view.transcript.len(), 2);
    assert!(view.transcript[1].text.contains("connection reset"));
    assert!(!view.is_fetching_suggestions);
}

#[test]
fn stale_arrival_for_previous_group_is_discarded() {
    init_logging();
    let state = fetching_state();
    // Switch away while the docs fetch is still in flight.
    let (mut state, _) = update(
        state,
        Msg::GroupSelected {
            group_id: "news".to_string(),
        },
        1,
    );
    assert!(state.consume_dirty());

    let state = arrive(state, "docs", Ok(r#"{"suggestions":["stale"]}"#));
    let mut state = state;
    let view = state.view();

    assert_eq!(view.suggestions, vec![NO_SOURCES_HINT.to_string()]);
    assert_eq!(view.transcript.len(), 1);
    assert!(!state.consume_dirty());
}
