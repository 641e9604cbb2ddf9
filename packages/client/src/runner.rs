//! Interactive CLI loop.
//!
//! Reads commands with rustyline on a blocking thread and prints session
//! events as they arrive.

use rustyline::{DefaultEditor, error::ReadlineError};
use tokio::sync::mpsc;

use crate::{
    error::ClientError,
    formatter::EventFormatter,
    identity::Profile,
    session::{ClientSession, GroupPreferences, MAX_RECONNECT_ATTEMPTS, SessionEvent, SessionStatus},
    ui::redisplay_prompt,
};

const PROMPT: &str = "huddle> ";

const USAGE: &str = "\
Commands:
  create <ageMin> <ageMax> <distance> <groupSize> <chatTime>   request a group
  cancel [requestId]                                          cancel a request
  status                                                      show session status
  help                                                        show this help
  quit                                                        disconnect and exit
";

/// A parsed line of user input
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Create(GroupPreferences),
    Cancel(Option<String>),
    Status,
    Help,
    Quit,
}

/// Parse one line of user input
pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Err("empty command".to_string());
    };
    let args: Vec<&str> = words.collect();

    match (name, args.as_slice()) {
        ("create", [age_min, age_max, distance, group_size, chat_time]) => {
            let number = |label: &str, value: &str| {
                value
                    .parse::<u32>()
                    .map_err(|_| format!("{} must be a non-negative integer: '{}'", label, value))
            };
            Ok(Command::Create(GroupPreferences {
                age_min: number("ageMin", *age_min)?,
                age_max: number("ageMax", *age_max)?,
                distance: number("distance", *distance)?,
                group_size: number("groupSize", *group_size)?,
                chat_time: number("chatTime", *chat_time)?,
            }))
        }
        ("create", _) => Err(
            "usage: create <ageMin> <ageMax> <distance> <groupSize> <chatTime>".to_string(),
        ),
        ("cancel", []) => Ok(Command::Cancel(None)),
        ("cancel", [request_id]) => Ok(Command::Cancel(Some(request_id.to_string()))),
        ("status", []) => Ok(Command::Status),
        ("help", []) => Ok(Command::Help),
        ("quit" | "exit", []) => Ok(Command::Quit),
        _ => Err(format!("unknown command: '{}'", line.trim())),
    }
}

/// Run the interactive client until the user quits or reconnection gives up
pub async fn run_client(url: String, profile: Profile) -> Result<(), ClientError> {
    tracing::info!(
        "Connecting to {} as {} ({})",
        url,
        profile.display_name(),
        profile.client_id()
    );

    let (session, mut events, _task) = ClientSession::spawn(url);
    session.connect(profile)?;
    println!("\nType 'help' for commands. Press Ctrl+C to exit.\n");

    // Spawn a blocking thread for rustyline (synchronous readline)
    let (input_tx, mut input_rx) = mpsc::unbounded_channel::<String>();
    std::thread::spawn(move || {
        let mut editor = match DefaultEditor::new() {
            Ok(editor) => editor,
            Err(e) => {
                tracing::error!("Failed to initialize readline: {}", e);
                return;
            }
        };

        loop {
            match editor.readline(PROMPT) {
                Ok(line) => {
                    let line = line.trim();
                    if line.is_empty() {
                        continue;
                    }
                    editor.add_history_entry(line).ok();
                    if input_tx.send(line.to_string()).is_err() {
                        break;
                    }
                }
                Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
                Err(err) => {
                    tracing::error!("Readline error: {}", err);
                    break;
                }
            }
        }
    });

    let mut pending_request: Option<String> = None;

    loop {
        tokio::select! {
            event = events.recv() => {
                let Some(event) = event else {
                    return Err(ClientError::SessionClosed);
                };
                print!("{}", EventFormatter::format_event(&event, EventFormatter::now()));
                redisplay_prompt(PROMPT);

                match event {
                    SessionEvent::GroupCreated { request_id, .. } => pending_request = Some(request_id),
                    SessionEvent::GroupCancelled { request_id } => {
                        if pending_request.as_deref() == Some(request_id.as_str()) {
                            pending_request = None;
                        }
                    }
                    SessionEvent::GroupFormed { .. } => pending_request = None,
                    SessionEvent::StatusChanged(SessionStatus::Disconnected) => {
                        tracing::error!(
                            "Failed to reconnect after {} attempts. Exiting.",
                            MAX_RECONNECT_ATTEMPTS
                        );
                        return Err(ClientError::ConnectionLost(MAX_RECONNECT_ATTEMPTS));
                    }
                    _ => {}
                }
            }
            line = input_rx.recv() => {
                let Some(line) = line else {
                    // Ctrl+C / Ctrl+D
                    session.disconnect()?;
                    break;
                };
                match parse_command(&line) {
                    Ok(Command::Create(preferences)) => {
                        warn_if_not_connected(session.status());
                        session.create_group(preferences)?;
                    }
                    Ok(Command::Cancel(request_id)) => {
                        warn_if_not_connected(session.status());
                        session.cancel_group(request_id)?;
                    }
                    Ok(Command::Status) => print!(
                        "{}",
                        EventFormatter::format_status_report(session.status(), pending_request.as_deref())
                    ),
                    Ok(Command::Help) => print!("{}", USAGE),
                    Ok(Command::Quit) => {
                        session.disconnect()?;
                        break;
                    }
                    Err(message) => println!("{}", message),
                }
            }
        }
    }

    session.wait_for_status(SessionStatus::Disconnected).await?;
    tracing::info!("Session ended");
    Ok(())
}

fn warn_if_not_connected(status: SessionStatus) {
    if status != SessionStatus::Connected {
        println!("(not connected, the command will be dropped)");
    }
}
