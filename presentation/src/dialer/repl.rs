//! REPL (Read-Eval-Print Loop) that drives one USSD dialer

use crate::ConsoleFormatter;
use crate::TurnSpinner;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::{DefaultEditor, Result as RlResult};
use tracing::debug;
use ussd_application::{
    DialAction, DialTurnUseCase, NoTurnProgress, TurnOutcome, TurnProgressNotifier, UssdTransport,
};
use ussd_domain::SessionPhase;

/// What a line typed at the prompt asks for
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplInput {
    Empty,
    Quit,
    Help,
    History,
    Cancel,
    UnknownCommand(String),
    /// Dial a service code (idle prompt)
    Dial(String),
    /// Reply to the current menu
    Reply(String),
    /// Dismiss the final message of an ended dialogue
    Acknowledge,
}

impl ReplInput {
    /// Interpret `line` for a session in `phase`
    pub fn parse(line: &str, phase: SessionPhase) -> Self {
        let line = line.trim();
        if line.starts_with('/') {
            return match line {
                "/quit" | "/exit" | "/q" => ReplInput::Quit,
                "/help" | "/h" | "/?" => ReplInput::Help,
                "/history" => ReplInput::History,
                "/cancel" | "/c" => ReplInput::Cancel,
                other => ReplInput::UnknownCommand(other.to_string()),
            };
        }

        match phase {
            SessionPhase::Terminal => ReplInput::Acknowledge,
            _ if line.is_empty() => ReplInput::Empty,
            SessionPhase::Idle => ReplInput::Dial(line.to_string()),
            SessionPhase::AwaitingInput | SessionPhase::Loading => {
                ReplInput::Reply(line.to_string())
            }
        }
    }
}

/// Interactive dialer bound to one endpoint
pub struct DialerRepl<T: UssdTransport + 'static> {
    dialer: DialTurnUseCase<T>,
    service_code: Option<String>,
    show_progress: bool,
}

impl<T: UssdTransport + 'static> DialerRepl<T> {
    pub fn new(dialer: DialTurnUseCase<T>) -> Self {
        Self {
            dialer,
            service_code: None,
            show_progress: true,
        }
    }

    /// Dial this code as soon as the REPL starts
    pub fn with_service_code(mut self, code: Option<String>) -> Self {
        self.service_code = code;
        self
    }

    /// Set whether to show the spinner and banner
    pub fn with_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Run the interactive REPL
    pub async fn run(&self) -> RlResult<()> {
        let mut rl = DefaultEditor::new()?;

        let history_path = dirs::data_dir().map(|p| p.join("ussd-sim").join("history.txt"));
        if let Some(ref path) = history_path {
            if let Some(parent) = path.parent() {
                let _ = std::fs::create_dir_all(parent);
            }
            let _ = rl.load_history(path);
        }

        self.print_welcome();

        if let Some(code) = &self.service_code {
            self.run_turn(DialAction::Start {
                service_code: code.clone(),
            })
            .await;
        }

        loop {
            let phase = self.dialer.phase();
            let readline = rl.readline(Self::prompt(phase));

            match readline {
                Ok(line) => match ReplInput::parse(&line, phase) {
                    ReplInput::Empty => continue,
                    ReplInput::Quit => {
                        self.dialer.cancel();
                        println!("Bye!");
                        break;
                    }
                    ReplInput::Help => Self::print_help(),
                    ReplInput::History => {
                        println!("{}", ConsoleFormatter::history(&self.dialer.snapshot()));
                    }
                    ReplInput::Cancel => self.cancel(),
                    ReplInput::UnknownCommand(cmd) => {
                        println!("Unknown command: {}", cmd);
                        println!("Type /help for available commands");
                    }
                    ReplInput::Acknowledge => {
                        if let Err(e) = self.dialer.acknowledge() {
                            eprintln!("Error: {}", e);
                        }
                    }
                    ReplInput::Dial(code) => {
                        let _ = rl.add_history_entry(code.as_str());
                        self.run_turn(DialAction::Start { service_code: code }).await;
                    }
                    ReplInput::Reply(input) => {
                        let _ = rl.add_history_entry(input.as_str());
                        self.run_turn(DialAction::Send { input }).await;
                    }
                },
                Err(ReadlineError::Interrupted) => {
                    if self.dialer.phase().is_active() {
                        self.cancel();
                    } else {
                        println!("^C");
                    }
                }
                Err(ReadlineError::Eof) => {
                    self.dialer.cancel();
                    println!("Bye!");
                    break;
                }
                Err(err) => {
                    eprintln!("Error: {:?}", err);
                    break;
                }
            }
        }

        if let Some(ref path) = history_path {
            let _ = rl.save_history(path);
        }

        Ok(())
    }

    /// Run one turn, cancelling the session if Ctrl-C arrives first
    async fn run_turn(&self, action: DialAction) {
        let spinner = TurnSpinner::new();
        let progress: &dyn TurnProgressNotifier = if self.show_progress {
            &spinner
        } else {
            &NoTurnProgress
        };

        let turn = self.dialer.execute_with_progress(action, progress);
        tokio::pin!(turn);
        let result = tokio::select! {
            result = &mut turn => result,
            _ = tokio::signal::ctrl_c() => {
                debug!("Ctrl-C while a turn was in flight");
                self.cancel();
                turn.await
            }
        };

        match result {
            Ok(TurnOutcome::Continued { message }) => {
                println!("{}", ConsoleFormatter::message_box(&message, false));
            }
            Ok(TurnOutcome::Ended { message }) => {
                println!("{}", ConsoleFormatter::message_box(&message, true));
                println!("{}", "Press Enter to dismiss.".dimmed());
            }
            Ok(TurnOutcome::Failed { error }) => {
                println!("{}", ConsoleFormatter::turn_error(&error));
            }
            Ok(TurnOutcome::Discarded) => {}
            Err(e) => eprintln!("{} {}", "Error:".red().bold(), e),
        }
    }

    fn cancel(&self) {
        match self.dialer.cancel() {
            Some(session_id) => println!("{} {}", "Session cancelled:".yellow(), session_id),
            None => println!("No active session"),
        }
    }

    fn prompt(phase: SessionPhase) -> &'static str {
        match phase {
            SessionPhase::Idle => "dial> ",
            SessionPhase::Terminal => "ok> ",
            SessionPhase::AwaitingInput | SessionPhase::Loading => "reply> ",
        }
    }

    fn print_welcome(&self) {
        if !self.show_progress {
            return;
        }
        println!();
        println!("╭─────────────────────────────────────────────╮");
        println!("│            ussd-sim - Dialer Mode           │");
        println!("╰─────────────────────────────────────────────╯");
        println!();
        println!("{}", ConsoleFormatter::dial_header(self.dialer.endpoint()));
        println!();
        println!("Enter a service code such as *123# to dial.");
        println!("Type /help for commands.");
        println!();
    }

    fn print_help() {
        println!();
        println!("Commands:");
        println!("  /help, /h, /?    - Show this help");
        println!("  /history         - Show the inputs sent in this session");
        println!("  /cancel, /c      - Hang up the current session (or press Ctrl-C)");
        println!("  /quit, /exit, /q - Exit the dialer");
        println!();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_commands_parse_in_any_phase() {
        for phase in [
            SessionPhase::Idle,
            SessionPhase::AwaitingInput,
            SessionPhase::Terminal,
        ] {
            assert_eq!(ReplInput::parse("/quit", phase), ReplInput::Quit);
            assert_eq!(ReplInput::parse(" /cancel ", phase), ReplInput::Cancel);
            assert_eq!(ReplInput::parse("/history", phase), ReplInput::History);
            assert_eq!(
                ReplInput::parse("/dance", phase),
                ReplInput::UnknownCommand("/dance".to_string())
            );
        }
    }

    #[test]
    fn test_idle_line_dials() {
        assert_eq!(
            ReplInput::parse("*123#", SessionPhase::Idle),
            ReplInput::Dial("*123#".to_string())
        );
        assert_eq!(ReplInput::parse("   ", SessionPhase::Idle), ReplInput::Empty);
    }

    #[test]
    fn test_awaiting_line_replies_and_empty_is_not_sent() {
        assert_eq!(
            ReplInput::parse(" 2 ", SessionPhase::AwaitingInput),
            ReplInput::Reply("2".to_string())
        );
        assert_eq!(
            ReplInput::parse("", SessionPhase::AwaitingInput),
            ReplInput::Empty
        );
    }

    #[test]
    fn test_terminal_line_acknowledges() {
        assert_eq!(ReplInput::parse("", SessionPhase::Terminal), ReplInput::Acknowledge);
        assert_eq!(ReplInput::parse("ok", SessionPhase::Terminal), ReplInput::Acknowledge);
    }
}
