//! Session runners for the two interaction modes.
//!
//! Direct mode executes exactly one pass and the session ends regardless of
//! outcome; conversational mode loops turns until the caller's exit signal,
//! checked only at turn boundaries. Replies go to stdout; logs go to stderr
//! via tracing.

use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tracing::debug;

use crate::domain::chart::ChartRequest;
use crate::domain::compose;
use crate::domain::orchestrator::{Orchestrator, Terminal, TurnInput};
use crate::domain::session::{InteractionMode, SessionState};

/// Commands that end a conversational session.
const EXIT_COMMANDS: [&str; 2] = ["exit", "quit"];

/// Process exit code for a terminal state.
///
/// Success, rejection and preference writes exit 0; ambiguity-as-error and
/// extraction/render failures exit non-zero.
pub fn exit_code(terminal: &Terminal) -> i32 {
    match terminal {
        Terminal::Rendered { .. }
        | Terminal::Rejected
        | Terminal::PreferenceSaved
        | Terminal::Clarification { .. } => 0,
        Terminal::Failed(_) => 1,
    }
}

/// Run one direct-mode turn and return the process exit code.
pub async fn run_direct(
    orchestrator: &Orchestrator,
    prompt: String,
    overrides: ChartRequest,
) -> i32 {
    let session = SessionState::new(InteractionMode::Direct);
    let input = TurnInput::text(prompt).with_overrides(overrides);

    let outcome = orchestrator.run_turn(&session, input).await;

    match &outcome.terminal {
        Terminal::Failed(_) => eprintln!("{}", outcome.reply),
        _ => println!("{}", outcome.reply),
    }

    exit_code(&outcome.terminal)
}

/// Run the conversational REPL on stdin until the exit signal.
pub async fn run_conversational(orchestrator: &Orchestrator) -> i32 {
    let stdin = BufReader::new(tokio::io::stdin());
    run_conversational_on(orchestrator, stdin).await
}

/// REPL loop over any line source; split out so tests can drive it.
pub async fn run_conversational_on<R>(orchestrator: &Orchestrator, reader: R) -> i32
where
    R: AsyncBufRead + Unpin,
{
    println!("{}", compose::welcome());

    let mut session = SessionState::new(InteractionMode::Conversational);
    let mut lines = reader.lines();

    loop {
        // Cancellation is only checked here, never mid-turn.
        let line = match lines.next_line().await {
            Ok(Some(line)) => line,
            Ok(None) | Err(_) => {
                println!("{}", compose::goodbye(session.language));
                break;
            }
        };

        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if EXIT_COMMANDS.contains(&input.to_lowercase().as_str()) {
            println!("{}", compose::goodbye(session.language));
            break;
        }

        let outcome = orchestrator
            .run_turn(&session, TurnInput::text(input))
            .await;
        session = outcome.session;
        debug!(terminal = ?outcome.terminal, "turn completed");

        println!("{}\n", outcome.reply);
    }

    0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::classifier::MockIntentClassifier;
    use crate::adapters::extraction::{CsvDataExtractor, InlineDataExtractor};
    use crate::adapters::preferences::InMemoryPreferenceStore;
    use crate::adapters::render::MockChartRenderer;
    use crate::domain::errors::TurnError;
    use crate::domain::session::MissingParam;
    use std::path::PathBuf;
    use std::sync::Arc;

    fn orchestrator() -> Orchestrator {
        Orchestrator::new(
            Arc::new(MockIntentClassifier::new()),
            Arc::new(InlineDataExtractor::new()),
            Arc::new(CsvDataExtractor::new()),
            Arc::new(InMemoryPreferenceStore::new()),
            Arc::new(MockChartRenderer::new()),
        )
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code(&Terminal::Rendered {
                path: PathBuf::from("/out/chart.png")
            }),
            0
        );
        assert_eq!(exit_code(&Terminal::Rejected), 0);
        assert_eq!(exit_code(&Terminal::PreferenceSaved), 0);
        assert_eq!(
            exit_code(&Terminal::Failed(TurnError::AmbiguousParameters {
                missing: vec![MissingParam::Type]
            })),
            1
        );
    }

    #[tokio::test]
    async fn test_repl_exits_on_exit_command() {
        let orchestrator = orchestrator();
        let input: &[u8] = b"exit\n";

        let code = run_conversational_on(&orchestrator, BufReader::new(input)).await;

        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_repl_exits_on_eof() {
        let orchestrator = orchestrator();
        let input: &[u8] = b"";

        let code = run_conversational_on(&orchestrator, BufReader::new(input)).await;

        assert_eq!(code, 0);
    }

    #[tokio::test]
    async fn test_repl_skips_blank_lines_and_processes_turns() {
        // The mock classifier has no queued response, so the data turn falls
        // back to the heuristic and suspends on the missing style.
        let orchestrator = orchestrator();
        let input: &[u8] = b"\n   \nA=10, B=20\nquit\n";

        let code = run_conversational_on(&orchestrator, BufReader::new(input)).await;

        assert_eq!(code, 0);
    }
}
