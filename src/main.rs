use std::io::{self, BufRead, Write};
use std::sync::Arc;

use chat_provider::CredentialSource;
use chat_store::{state_root, FileStore, StoreError, ThemePreference, KEY_API_KEY, KEY_THEME};

use study_buddy::commands::{parse_slash_command, SlashCommand};
use study_buddy::modes::StudyMode;
use study_buddy::providers;
use study_buddy::request::ReplayPolicy;
use study_buddy::session::{ChatSession, RestoreOutcome, SessionError};

fn main() -> io::Result<()> {
    let cwd = std::env::current_dir()?;
    let store = FileStore::open(state_root(&cwd)).map_err(io::Error::other)?;

    let credential = credential_source(&store).map_err(io::Error::other)?;
    let provider = providers::provider_from_env(&credential).map_err(io::Error::other)?;
    let profile = provider.profile();

    let (session, outcome) = ChatSession::open(
        provider,
        store.clone(),
        StudyMode::General,
        ReplayPolicy::FullHistory,
    )
    .map_err(io::Error::other)?;
    let session = Arc::new(session);

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    println!(
        "study_buddy ({}: {})",
        profile.provider_id, profile.model_id
    );
    match outcome {
        RestoreOutcome::Restored(turns) => {
            println!("Restored {turns} turns from the previous session.");
        }
        RestoreOutcome::Empty | RestoreOutcome::RecoveredFromCorrupt => {
            // The greeting is UI-only; it is never part of the transcript.
            println!("Hello! I'm your study buddy. Ask me anything, or /help for commands.");
        }
    }

    let stdin = io::stdin();
    loop {
        print!("you> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let line = line.trim();

        if let Some(command) = parse_slash_command(line) {
            match command {
                SlashCommand::Help => print_help(),
                SlashCommand::Mode(key) if key.is_empty() => {
                    println!("Current mode: {}", session.mode().key());
                }
                SlashCommand::Mode(key) => {
                    let mode = StudyMode::from_key(&key);
                    session.set_mode(mode);
                    println!("Mode set to {}.", mode.key());
                }
                SlashCommand::Theme(value) => match ThemePreference::parse(&value) {
                    Some(theme) => match store.set(KEY_THEME, theme.as_str()) {
                        Ok(()) => println!("Theme preference saved: {}.", theme.as_str()),
                        Err(error) => eprintln!("Failed to save theme: {error}"),
                    },
                    None => println!("Unknown theme '{value}'. Use light or dark."),
                },
                SlashCommand::Clear => match session.clear() {
                    Ok(()) => println!("Conversation cleared."),
                    Err(error) => eprintln!("Failed to clear: {error}"),
                },
                SlashCommand::Quit => break,
                SlashCommand::Unknown(command) => {
                    println!("Unknown command '{command}'. Try /help.");
                }
            }
            continue;
        }

        // Transient pending line; the reply or error line that follows
        // stands in for it.
        println!("assistant is thinking...");
        match runtime.block_on(session.submit(line)) {
            Ok(reply) => println!("assistant> {reply}"),
            Err(SessionError::Completion(error)) => {
                println!("assistant> {}", error.user_facing_message());
            }
            // Empty input records no turn and needs no reply line.
            Err(SessionError::EmptyInput) => {}
            Err(SessionError::TurnInFlight) | Err(SessionError::TurnDiscarded) => {}
            Err(error) => eprintln!("error: {error}"),
        }
    }

    Ok(())
}

/// Client-supplied mode when a key was saved locally; otherwise the
/// deployment's environment variable. Never both.
fn credential_source(store: &FileStore) -> Result<CredentialSource, StoreError> {
    Ok(match store.get(KEY_API_KEY)? {
        Some(secret) => CredentialSource::ClientSupplied(secret),
        None => CredentialSource::ServerConfigured {
            env_var: providers::API_KEY_ENV_VAR.to_string(),
        },
    })
}

fn print_help() {
    println!("Commands:");
    println!("  /mode [general|math|physics|history|code]  switch study subject");
    println!("  /theme [light|dark]                        save theme preference");
    println!("  /clear                                     forget the conversation");
    println!("  /quit                                      exit");
}
