//! `cargasegura console`: interactive load REPL.
//!
//! Each line is one command against the load session. After every
//! command the totals and the current advice are printed; the advisor
//! keeps working in the background between commands.

use std::sync::Arc;
use std::time::Duration;

use cs_domain::config::Config;

use crate::bootstrap::{self, StorageMode};
use crate::cli::commands::{is_confirmation, parse_command, ConsoleCommand, HELP};
use crate::cli::render::{render_advice, render_totals, render_types};
use crate::state::AppState;

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Public entry point
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

pub async fn console(config: Arc<Config>, mode: StorageMode) -> anyhow::Result<()> {
    let mut state = bootstrap::build_app_state(config, mode).await?;

    let history_path = dirs::home_dir()
        .unwrap_or_default()
        .join(".cargasegura")
        .join("console_history.txt");
    if let Some(parent) = history_path.parent() {
        std::fs::create_dir_all(parent).ok();
    }
    let mut rl = rustyline::DefaultEditor::new()?;
    let _ = rl.load_history(&history_path);

    println!("CargaSegura load console  |  Type help for commands, Ctrl+D to exit");
    println!("{}", render_totals(&state.session.snapshot()));
    println!();

    loop {
        match rl.readline("load> ") {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }
                rl.add_history_entry(trimmed).ok();

                let command = match parse_command(trimmed) {
                    Ok(command) => command,
                    Err(e) => {
                        eprintln!("\x1B[31m{e}\x1B[0m");
                        continue;
                    }
                };
                if command == ConsoleCommand::Exit {
                    break;
                }
                if command == ConsoleCommand::Reset {
                    confirm_and_reset(&mut state, &mut rl);
                } else {
                    execute(&mut state, command).await;
                }
            }
            Err(rustyline::error::ReadlineError::Interrupted) => {
                eprintln!("(Use Ctrl+D or exit to quit)");
                continue;
            }
            Err(rustyline::error::ReadlineError::Eof) => break,
            Err(e) => {
                eprintln!("\x1B[31mreadline error: {e}\x1B[0m");
                break;
            }
        }
    }

    rl.save_history(&history_path).ok();
    state.shutdown().await;
    Ok(())
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
// Command execution
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

/// Run one non-interactive command and print its outcome.
pub async fn execute(state: &mut AppState, command: ConsoleCommand) {
    match command {
        ConsoleCommand::List => {
            println!("{}", render_types(&state.session.snapshot()));
            return;
        }
        ConsoleCommand::Set { id, quantity } => {
            if !state.session.state().catalog().contains(&id) {
                eprintln!("unknown container type: {id}  (see list)");
                return;
            }
            state.session.set_quantity(&id, quantity);
        }
        ConsoleCommand::Add { name, weight } => match state.session.add_custom_type(&name, weight) {
            Ok(added) => println!("Added {} ({} kg) as {}", added.name, added.weight, added.id),
            Err(e) => {
                eprintln!("\x1B[31m{e}\x1B[0m");
                return;
            }
        },
        ConsoleCommand::Delete { id } => match state.session.delete_type(&id) {
            Some(removed) => println!("Deleted {}", removed.name),
            None => {
                eprintln!("no custom container type with id {id}");
                return;
            }
        },
        ConsoleCommand::Capacity { value } => {
            state.session.set_capacity(value);
        }
        ConsoleCommand::Advice => {
            let wait = advice_wait(&state.config);
            match tokio::time::timeout(wait, state.advisor.settled()).await {
                Ok(view) => println!("{}", render_advice(&view)),
                Err(_) => println!("{}", render_advice(&state.advisor.view())),
            }
            return;
        }
        ConsoleCommand::Help => {
            println!("{HELP}");
            return;
        }
        ConsoleCommand::Status | ConsoleCommand::Reset | ConsoleCommand::Exit => {}
    }
    print_status(state);
}

/// Two-phase reset: nothing is cleared unless the user answers yes.
fn confirm_and_reset(state: &mut AppState, rl: &mut rustyline::DefaultEditor) {
    let request = state.session.request_reset();
    if request.pending_entries() == 0 {
        state.session.cancel_reset(request);
        println!("Nothing to reset.");
        return;
    }

    let answer = rl
        .readline("Clear all quantities? Capacity and custom types are kept. [y/N] ")
        .unwrap_or_default();
    if is_confirmation(&answer) {
        match state.session.confirm_reset(request) {
            Some(cleared) => println!("Cleared {cleared} entries."),
            None => println!("The load changed meanwhile; nothing was cleared."),
        }
    } else {
        state.session.cancel_reset(request);
        println!("Reset cancelled.");
    }
    print_status(state);
}

fn print_status(state: &AppState) {
    println!("{}", render_totals(&state.session.snapshot()));
    println!("{}", render_advice(&state.advisor.view()));
}

/// Longest a user waits on `advice`: one debounce window plus one oracle call.
fn advice_wait(config: &Config) -> Duration {
    let timeout = if config.advisor.timeout_ms > 0 {
        config.advisor.timeout_ms
    } else {
        60_000
    };
    Duration::from_millis(
        config
            .advisor
            .debounce_ms
            .saturating_add(timeout)
            .saturating_add(500),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::AdvisorPhase;

    fn config() -> Arc<Config> {
        let mut config = Config::default();
        config.advisor.enabled = false;
        config.advisor.debounce_ms = 100;
        Arc::new(config)
    }

    #[tokio::test(start_paused = true)]
    async fn commands_drive_the_session() {
        let mut state = bootstrap::build_app_state(config(), StorageMode::Ephemeral)
            .await
            .unwrap();

        execute(&mut state, parse_command("set box-1 10").unwrap()).await;
        execute(&mut state, parse_command("add 12.5 Tools").unwrap()).await;
        execute(&mut state, parse_command("capacity 500").unwrap()).await;
        let snap = state.session.snapshot();
        assert_eq!(snap.total_weight, 150.0);
        assert_eq!(snap.capacity, 500);
        assert_eq!(snap.types.len(), 4);

        let tools = snap.types[3].id.clone();
        execute(&mut state, ConsoleCommand::Set { id: tools.clone(), quantity: 2 }).await;
        assert_eq!(state.session.snapshot().total_weight, 175.0);

        execute(&mut state, ConsoleCommand::Delete { id: tools }).await;
        assert_eq!(state.session.snapshot().total_weight, 150.0);
        state.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn set_on_unknown_id_changes_nothing() {
        let mut state = bootstrap::build_app_state(config(), StorageMode::Ephemeral)
            .await
            .unwrap();
        let before = state.session.snapshot();
        execute(&mut state, parse_command("set box-9 4").unwrap()).await;
        assert_eq!(state.session.snapshot(), before);
        state.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn advice_command_waits_for_local_judgment() {
        let mut state = bootstrap::build_app_state(config(), StorageMode::Ephemeral)
            .await
            .unwrap();
        execute(&mut state, parse_command("set box-1 10").unwrap()).await;
        execute(&mut state, ConsoleCommand::Advice).await;

        let view = state.advisor.view();
        assert_eq!(view.phase, AdvisorPhase::Failed);
        assert_eq!(
            view.advice.unwrap().status,
            cs_domain::AdvisoryStatus::Safe
        );
        state.shutdown().await;
    }

    #[test]
    fn advice_wait_covers_debounce_and_timeout() {
        let config = Config::default();
        assert_eq!(advice_wait(&config), Duration::from_millis(1_500 + 20_000 + 500));
    }

    #[test]
    fn advice_wait_saturates_on_huge_settings() {
        let mut config = Config::default();
        config.advisor.debounce_ms = u64::MAX;
        config.advisor.timeout_ms = u64::MAX;
        assert_eq!(advice_wait(&config), Duration::from_millis(u64::MAX));
    }
}
