use crate::suggestions::parse_suggestions;
use crate::{
    AppState, Effect, Msg, Sender, CREDENTIAL_MISSING_NOTICE, EMPTY_REPLY_NOTICE, NO_SOURCES_HINT,
};

/// Pure update function: applies a message to state and returns any effects.
///
/// `now_ms` stamps every transcript entry created by this call; tests pass a
/// fixed value, the app passes wall-clock time.
pub fn update(mut state: AppState, msg: Msg, now_ms: u64) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::GroupSelected { group_id } => {
            if state.group(&group_id).is_none() {
                return (state, Vec::new());
            }
            state.select_group(&group_id);
            let welcome = welcome_text(state.credential_configured(), &state.active_group_name());
            state.reset_transcript(welcome, now_ms);
            refresh_suggestions(&mut state)
        }
        Msg::AddUrlRequested { url } => {
            state.add_url(&url);
            Vec::new()
        }
        Msg::RemoveUrlRequested { url } => {
            state.remove_url(&url);
            Vec::new()
        }
        // A chosen suggestion is sent exactly like a typed query.
        Msg::QuerySubmitted { text } | Msg::SuggestionChosen { text } => {
            send_query(&mut state, &text, now_ms)
        }
        Msg::GenerationArrived { message_id, result } => {
            state.set_sending(false);
            if let Some(message) = state.message_mut(message_id) {
                message.is_loading = false;
                match result {
                    Ok(reply) => {
                        message.text = if reply.text.trim().is_empty() {
                            EMPTY_REPLY_NOTICE.to_string()
                        } else {
                            reply.text
                        };
                        message.url_context = reply.citations;
                    }
                    Err(reason) => {
                        message.sender = Sender::System;
                        message.text = format!("Something went wrong: {reason}");
                    }
                }
            }
            Vec::new()
        }
        Msg::SuggestionsArrived { group_id, result } => {
            if !state.is_active_group(&group_id) {
                // Stale arrival from before a group switch; drop it so it
                // cannot overwrite the newer group's suggestions.
                return (state, Vec::new());
            }
            state.set_fetching_suggestions(false);
            match result {
                Ok(raw) => match parse_suggestions(&raw) {
                    Ok(suggestions) => state.set_suggestions(suggestions),
                    Err(err) => {
                        state.set_suggestions(Vec::new());
                        state.push_message(
                            Sender::System,
                            format!("Could not read suggested questions: {err}"),
                            now_ms,
                        );
                    }
                },
                Err(reason) => {
                    state.set_suggestions(Vec::new());
                    state.push_message(
                        Sender::System,
                        format!("Could not fetch suggested questions: {reason}"),
                        now_ms,
                    );
                }
            }
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn send_query(state: &mut AppState, text: &str, now_ms: u64) -> Vec<Effect> {
    let query = text.trim();
    if query.is_empty() || state.request_in_flight() {
        return Vec::new();
    }
    if !state.credential_configured() {
        state.push_message(Sender::System, CREDENTIAL_MISSING_NOTICE.to_string(), now_ms);
        return Vec::new();
    }

    state.set_sending(true);
    state.set_suggestions(Vec::new());
    state.push_message(Sender::User, query.to_string(), now_ms);
    let message_id = state.push_placeholder(now_ms);
    vec![Effect::Generate {
        message_id,
        prompt: query.to_string(),
        urls: state.active_urls(),
    }]
}

fn refresh_suggestions(state: &mut AppState) -> Vec<Effect> {
    let urls = state.active_urls();
    if urls.is_empty() {
        state.set_suggestions(vec![NO_SOURCES_HINT.to_string()]);
        state.set_fetching_suggestions(false);
        return Vec::new();
    }
    if !state.credential_configured() {
        state.set_suggestions(Vec::new());
        state.set_fetching_suggestions(false);
        return Vec::new();
    }

    state.set_suggestions(Vec::new());
    state.set_fetching_suggestions(true);
    vec![Effect::FetchSuggestions {
        group_id: state.active_group_id(),
        urls,
    }]
}

fn welcome_text(credential_configured: bool, group_name: &str) -> String {
    if credential_configured {
        format!("Now chatting with \u{201c}{group_name}\u{201d}. Ask anything about its sources.")
    } else {
        format!(
            "No API key is configured. Queries against \u{201c}{group_name}\u{201d} cannot be sent \
             until one is provided."
        )
    }
}
