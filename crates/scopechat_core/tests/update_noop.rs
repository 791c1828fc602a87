use scopechat_core::{update, AppState, Msg, SessionConfig};

#[test]
fn update_is_noop() {
    let state = AppState::new(SessionConfig::new(Vec::new(), true));
    let (next, effects) = update(state.clone(), Msg::NoOp, 0);

    assert_eq!(state, next);
    assert!(effects.is_empty());
}
