// SPDX-FileCopyrightText: 2026 Fixdesk Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `fixdesk chat` and `fixdesk open` command implementation.
//!
//! Launches an interactive REPL over one conversation. Plain lines are sent
//! as messages; slash commands change the log's resolved flag. Output is
//! driven by the orchestrator's event stream so the terminal shows exactly
//! what the timeline holds.

use colored::Colorize;
use fixdesk_config::FixdeskConfig;
use fixdesk_conversation::timeline::{LOADING_TEXT, TimelineItem};
use fixdesk_conversation::{
    ConversationEvent, ConversationOrchestrator, ConversationServices, ReconcileOutcome,
    SendOutcome, open_for_log,
};
use fixdesk_core::FixdeskError;
use fixdesk_core::types::{ConversationId, LogId, Message, Role};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;

use crate::commands::build_services;

/// A line typed at the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Input<'a> {
    Quit,
    Resolve,
    Reopen,
    History,
    Refresh,
    Help,
    Unknown(&'a str),
    Message(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    match line {
        "/quit" | "/exit" => Input::Quit,
        "/resolve" => Input::Resolve,
        "/reopen" => Input::Reopen,
        "/history" => Input::History,
        "/refresh" => Input::Refresh,
        "/help" => Input::Help,
        other if other.starts_with('/') => Input::Unknown(other),
        other => Input::Message(other),
    }
}

/// Runs the REPL on an existing conversation.
pub async fn run_chat(
    config: &FixdeskConfig,
    conversation_id: ConversationId,
) -> Result<(), FixdeskError> {
    let services = build_services(config)?;
    chat(services, conversation_id).await
}

/// Finds or creates the conversation for a log, then runs the REPL on it.
pub async fn run_open(config: &FixdeskConfig, log_id: LogId) -> Result<(), FixdeskError> {
    let services = build_services(config)?;
    let started = open_for_log(&services, log_id).await?;
    let verb = if started.created { "created" } else { "found" };
    println!(
        "{}",
        format!("{verb} conversation {} for log {log_id}", started.conversation_id).dimmed()
    );
    chat(services, started.conversation_id).await
}

async fn chat(
    services: ConversationServices,
    conversation_id: ConversationId,
) -> Result<(), FixdeskError> {
    let orchestrator = ConversationOrchestrator::open(services.clone(), conversation_id).await?;
    let mut events = orchestrator.subscribe();

    let mut rl = DefaultEditor::new()
        .map_err(|e| FixdeskError::Internal(format!("failed to initialize readline: {e}")))?;

    let state = orchestrator.snapshot().await;
    println!("{}", "fixdesk shell".bold().green());
    println!(
        "conversation {} / log {} ({})",
        conversation_id,
        state.log.log_id,
        resolved_label(state.resolved)
    );
    println!("{}", state.log.content.dimmed());
    print_history(&state.timeline.view());
    println!(
        "Type {} to exit, {} for commands.\n",
        "/quit".yellow(),
        "/help".yellow()
    );

    let prompt = format!("{}> ", "fixdesk".green());
    loop {
        match rl.readline(&prompt) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                let _ = rl.add_history_entry(&line);

                let result = match parse_input(trimmed) {
                    Input::Quit => break,
                    Input::Help => {
                        print_help();
                        Ok(None)
                    }
                    Input::History => {
                        print_history(&orchestrator.snapshot().await.timeline.view());
                        Ok(None)
                    }
                    Input::Unknown(cmd) => {
                        eprintln!("{}: unknown command {cmd}", "error".red());
                        Ok(None)
                    }
                    Input::Refresh => match orchestrator.reload().await {
                        Ok(_) => {
                            drain_events(&mut events);
                            print_history(&orchestrator.snapshot().await.timeline.view());
                            Ok(None)
                        }
                        Err(e) => Err(e),
                    },
                    Input::Resolve => orchestrator.toggle_resolved(true).await.map(|_| None),
                    Input::Reopen => orchestrator.toggle_resolved(false).await.map(|_| None),
                    Input::Message(text) => orchestrator.send_message(text).await.map(Some),
                };

                drain_events(&mut events);
                match result {
                    Ok(Some(outcome)) => report_outcome(&outcome),
                    Ok(None) => {}
                    Err(e) => eprintln!("{}", describe_error(&e)),
                }
            }
            Err(ReadlineError::Interrupted) => {
                // Ctrl+C
                break;
            }
            Err(ReadlineError::Eof) => {
                // Ctrl+D
                break;
            }
            Err(e) => {
                eprintln!("{}: {e}", "error".red());
                break;
            }
        }
    }

    services.sync.flush().await;
    println!("{}", "goodbye".dimmed());
    Ok(())
}

fn drain_events(events: &mut broadcast::Receiver<ConversationEvent>) {
    loop {
        match events.try_recv() {
            Ok(event) => {
                if let Some(line) = render_event(&event) {
                    println!("{line}");
                }
            }
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
}

/// Turns an orchestrator event into a terminal line.
///
/// The user's own messages are not echoed since the prompt already shows them.
fn render_event(event: &ConversationEvent) -> Option<String> {
    match event {
        ConversationEvent::MessageAppended(message) if message.role == Role::User => None,
        ConversationEvent::MessageAppended(message) => Some(format_message(message)),
        ConversationEvent::MessagesRolledBack(ids) => Some(format!(
            "{}: {} message(s) were not saved",
            "warning".yellow(),
            ids.len()
        )),
        ConversationEvent::TimelineReplaced(messages) => {
            Some(format!("reloaded {} message(s)", messages.len()).dimmed().to_string())
        }
        ConversationEvent::Loading(true) => Some(LOADING_TEXT.dimmed().to_string()),
        ConversationEvent::Loading(false) => None,
        ConversationEvent::ResolvedChanged(resolved) => {
            Some(format!("log is now {}", resolved_label(*resolved)))
        }
        ConversationEvent::ResolutionChanged(state) => {
            Some(format!("[{state}]").dimmed().to_string())
        }
    }
}

fn format_message(message: &Message) -> String {
    let label = format!("{}:", message.role);
    let label = match message.role {
        Role::Assistant => label.cyan().bold(),
        Role::User => label.bold(),
    };
    format!("{label} {}", message.content)
}

fn report_outcome(outcome: &SendOutcome) {
    if let SendOutcome::SolutionCaptured { outcome, .. } = outcome {
        let line = match outcome {
            ReconcileOutcome::Created(id) => format!("knowledge entry {id} created"),
            ReconcileOutcome::Updated(id) => format!("knowledge entry {id} updated"),
        };
        println!("{}", line.dimmed());
    }
}

/// Error line for a failed action. Service failures are never retried
/// automatically.
fn describe_error(error: &FixdeskError) -> String {
    if error.is_transient() {
        format!("{}: {error} (service unavailable, try again)", "error".red())
    } else {
        format!("{}: {error}", "error".red())
    }
}

fn resolved_label(resolved: bool) -> colored::ColoredString {
    if resolved {
        "resolved".green()
    } else {
        "open".yellow()
    }
}

fn print_history(items: &[TimelineItem<'_>]) {
    for item in items {
        match item {
            TimelineItem::Message(message) => println!("{}", format_message(message)),
            TimelineItem::Loading => println!("{}", LOADING_TEXT.dimmed()),
        }
    }
}

fn print_help() {
    println!("  /resolve   mark the log resolved and record the working solution");
    println!("  /reopen    mark the log unresolved");
    println!("  /history   print the conversation so far");
    println!("  /refresh   reload the conversation from the backend");
    println!("  /quit      leave the shell");
}
