//! Terminal front end: reads commands from stdin, drives the pure update
//! loop, and mirrors the transcript into an HTML page for the browser.

mod config;
mod effects;
mod logging;
mod repl;
mod view;

use std::io::BufRead;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use chat_logging::{chat_error, chat_info};
use chrono::Utc;
use scopechat_core::{
    update, AppState, AppViewModel, Msg, Sender, SessionConfig, NO_SOURCES_HINT,
};
use scopechat_engine::{
    ClientSettings, GeminiClient, GenerationClient, MarkdownHtmlRenderer, TranscriptWriter,
};

use effects::EffectRunner;
use logging::LogDestination;
use repl::Command;

fn main() -> anyhow::Result<()> {
    logging::initialize(LogDestination::File);

    let config = config::load();
    chat_info!(
        "Starting with model={} groups={} credential={}",
        config.model,
        config.groups.len(),
        config.api_key.is_some()
    );

    let (msg_tx, msg_rx) = mpsc::channel::<Msg>();
    let runner = match &config.api_key {
        Some(key) => {
            let settings = ClientSettings {
                model: config.model.clone(),
                ..ClientSettings::default()
            };
            let client: Arc<dyn GenerationClient> = Arc::new(
                GeminiClient::new(key.clone(), settings).context("building generation client")?,
            );
            Some(EffectRunner::new(client, msg_tx.clone()))
        }
        None => {
            eprintln!("GEMINI_API_KEY is not set; queries will be refused.");
            None
        }
    };

    let writer = TranscriptWriter::new(config.output_dir.clone(), "transcript.html");
    let renderer = MarkdownHtmlRenderer;
    let mut state = AppState::new(SessionConfig::new(
        config.groups.clone(),
        config.api_key.is_some(),
    ));

    println!("{}", repl::HELP_TEXT);
    println!("Transcript page: {}", writer.path().display());

    // Activate the first group so the session opens with a welcome message
    // and a suggestion fetch.
    if let Some(first) = state.view().groups.first().map(|group| group.id.clone()) {
        state = dispatch(state, Msg::GroupSelected { group_id: first }, &runner);
    }

    let line_rx = spawn_stdin_reader();
    let mut previous = AppViewModel::default();

    loop {
        while let Ok(msg) = msg_rx.try_recv() {
            state = dispatch(state, msg, &runner);
        }

        if state.consume_dirty() {
            let current = state.view();
            print_update(&previous, &current);
            let page = view::render_page(&current, &renderer);
            if let Err(err) = writer.write(&page) {
                chat_error!("Failed to write transcript page: {}", err);
            }
            previous = current;
        }

        let line = match line_rx.recv_timeout(Duration::from_millis(50)) {
            Ok(line) => line,
            Err(mpsc::RecvTimeoutError::Timeout) => continue,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        };

        match repl::parse_line(&line) {
            Command::Quit => break,
            Command::Help => println!("{}", repl::HELP_TEXT),
            Command::Empty => {}
            Command::ListGroups => {
                let current = state.view();
                for group in &current.groups {
                    let marker = if group.id == current.active_group_id {
                        "*"
                    } else {
                        " "
                    };
                    println!("{marker} {} ({}, {} urls)", group.id, group.name, group.urls.len());
                }
            }
            Command::ListUrls => {
                let current = state.view();
                match current
                    .groups
                    .iter()
                    .find(|group| group.id == current.active_group_id)
                {
                    Some(group) if !group.urls.is_empty() => {
                        for url in &group.urls {
                            println!("  {url}");
                        }
                    }
                    _ => println!("  (no reference URLs)"),
                }
            }
            Command::SelectGroup(group_id) => {
                if state.view().groups.iter().all(|group| group.id != group_id) {
                    println!("No such group: {group_id}");
                    continue;
                }
                state = dispatch(state, Msg::GroupSelected { group_id }, &runner);
            }
            Command::AddUrl(url) => {
                state = dispatch(state, Msg::AddUrlRequested { url }, &runner);
            }
            Command::RemoveUrl(url) => {
                state = dispatch(state, Msg::RemoveUrlRequested { url }, &runner);
            }
            Command::Suggest(n) => {
                let current = state.view();
                match current.suggestions.get(n - 1) {
                    Some(text) if text != NO_SOURCES_HINT => {
                        let text = text.clone();
                        state = dispatch(state, Msg::SuggestionChosen { text }, &runner);
                    }
                    _ => println!("No suggestion number {n}"),
                }
            }
            Command::Query(text) => {
                state = dispatch(state, Msg::QuerySubmitted { text }, &runner);
            }
        }
    }

    chat_info!("Session ended");
    Ok(())
}

fn dispatch(state: AppState, msg: Msg, runner: &Option<EffectRunner>) -> AppState {
    let (next, effects) = update(state, msg, now_ms());
    if let Some(runner) = runner {
        runner.enqueue(effects);
    }
    next
}

fn now_ms() -> u64 {
    Utc::now().timestamp_millis().max(0) as u64
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::spawn(move || {
        let stdin = std::io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            if line_tx.send(line).is_err() {
                break;
            }
        }
    });
    line_rx
}

/// Prints what changed since the last render: new or resolved transcript
/// entries, a fresh suggestion list, and any URL rejection.
fn print_update(previous: &AppViewModel, current: &AppViewModel) {
    for (idx, message) in current.transcript.iter().enumerate() {
        let unchanged = previous
            .transcript
            .get(idx)
            .is_some_and(|old| old.id == message.id && old.text == message.text && old.is_loading == message.is_loading);
        if unchanged {
            continue;
        }
        let label = match message.sender {
            Sender::User => "you",
            Sender::Model => "model",
            Sender::System => "system",
        };
        if message.is_loading {
            println!("[{label}] …");
        } else {
            println!("[{label}] {}", message.text);
        }
        for citation in &message.citations {
            println!("         source: {}", citation.retrieved_url);
        }
    }

    if current.suggestions != previous.suggestions && !current.suggestions.is_empty() {
        println!("Suggested questions:");
        for (idx, suggestion) in current.suggestions.iter().enumerate() {
            println!("  {}. {suggestion}", idx + 1);
        }
    }

    if current.last_url_rejection != previous.last_url_rejection {
        if let Some(rejection) = &current.last_url_rejection {
            println!("Rejected \u{201c}{}\u{201d}: {}", rejection.url, rejection.reason);
        }
    }
}
