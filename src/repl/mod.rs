//! REPL (Read-Eval-Print Loop) for Etude
//!
//! Input lines are read on their own thread so the loop can react to notes
//! played on the keyboard while the prompt is waiting.

use crate::audio::{HintPlayer, MidiInputHandle};
use crate::commands::{CommandContext, CommandResult, create_registry};
use crate::session::{SessionCommand, SessionEvent, SessionHandle};
use crate::settings::Settings;
use anyhow::Result;
use colored::*;
use crossbeam_channel::{Receiver, Sender, unbounded};
use etude_core::ExerciseConfig;
use etude_core::types::midi_name;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::thread;
use tracing::{debug, warn};

/// Types of events the REPL loop handles
enum ReplEvent {
    Input(Result<String, ReadlineError>),
}

/// Interactive practice REPL
pub struct Repl {
    editor: Option<DefaultEditor>,
    ctx: CommandContext,
    tx_input: Sender<ReplEvent>,
    rx_input: Receiver<ReplEvent>,
}

impl Repl {
    pub fn new() -> Result<Self> {
        let editor = DefaultEditor::new()?;
        let mut settings = Settings::load();

        let session = match SessionHandle::spawn(
            settings.exercise.clone(),
            settings.auto_key_progression,
        ) {
            Ok(session) => session,
            Err(e) => {
                warn!(error = %e, "Saved exercise does not build, using defaults");
                settings.exercise = ExerciseConfig::default();
                SessionHandle::spawn(settings.exercise.clone(), settings.auto_key_progression)?
            }
        };

        let midi = match MidiInputHandle::new(session.sender()) {
            Ok(handle) => Some(handle),
            Err(e) => {
                warn!(error = %e, "MIDI input unavailable");
                None
            }
        };

        let hints = match HintPlayer::new() {
            Ok(player) => Some(player),
            Err(e) => {
                debug!(error = %e, "No audio output, hints will be shown as text");
                None
            }
        };

        let mut ctx = CommandContext::new(session, settings);
        ctx.midi = midi;
        ctx.hints = hints;

        let (tx_input, rx_input) = unbounded();
        Ok(Repl {
            editor: Some(editor),
            ctx,
            tx_input,
            rx_input,
        })
    }

    /// Reconnect to the port saved last time, if it is still around
    fn reconnect_saved_port(&mut self) {
        let (Some(handle), Some(port)) = (&self.ctx.midi, self.ctx.settings.midi_port.clone())
        else {
            return;
        };
        match handle.connect(&port) {
            Ok(name) => println!("🎹 Listening on {}", name.green()),
            Err(e) => {
                warn!(port = %port, error = %e, "Saved MIDI port not available");
                println!(
                    "{}",
                    format!("MIDI port '{}' not found. Use 'midi devices'", port).yellow()
                );
            }
        }
    }

    fn handle_session_event(&mut self, event: SessionEvent) {
        if let SessionEvent::KeyAdvanced { key, .. } = &event {
            self.ctx.settings.exercise.key = *key;
        }
        println!("{}", describe(&event));

        if matches!(event, SessionEvent::KeyAdvanced { .. }) {
            if let Err(e) = self.ctx.session.send(SessionCommand::Start) {
                println!("{} {}", "Error:".bright_red().bold(), e.to_string().red());
            }
        }
    }

    /// Start the REPL loop
    pub fn run(&mut self) -> Result<()> {
        println!(
            "{} {}",
            "🎹".bright_yellow(),
            "Etude Piano Practice".bright_cyan().bold()
        );
        println!("Now practising: {}", self.ctx.settings.exercise.to_string().green());
        println!(
            "Type '{}' to begin, '{}' for commands, '{}' or {} to exit.\n",
            "start".bright_green(),
            "help".bright_green(),
            "quit".bright_red(),
            "Ctrl+C".bright_red()
        );
        self.reconnect_saved_port();

        let Some(mut editor) = self.editor.take() else {
            anyhow::bail!("REPL is already running");
        };
        let tx_input = self.tx_input.clone();

        thread::spawn(move || loop {
            let prompt = format!("{} ", "etude>".bright_magenta().bold());
            let readline = editor.readline(&prompt);

            match readline {
                Ok(line) => {
                    let line = line.trim().to_string();
                    if !line.is_empty() {
                        let _ = editor.add_history_entry(&line);
                    }
                    if tx_input.send(ReplEvent::Input(Ok(line))).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx_input.send(ReplEvent::Input(Err(err)));
                    break;
                }
            }
        });

        let registry = create_registry();
        let session_events = self.ctx.session.events().clone();

        loop {
            crossbeam_channel::select! {
                recv(self.rx_input) -> msg => match msg {
                    Ok(ReplEvent::Input(Ok(line))) => {
                        if line.is_empty() {
                            continue;
                        }
                        match registry.execute(&line, &mut self.ctx) {
                            CommandResult::Success => {}
                            CommandResult::Message(msg) => println!("{}", msg),
                            CommandResult::Exit => {
                                println!("{} 🎹", "Goodbye!".bright_cyan());
                                break;
                            }
                            CommandResult::Error(e) => {
                                println!("{} {}", "Error:".bright_red().bold(), e.red());
                            }
                            CommandResult::NotACommand => println!(
                                "{} Unknown command '{}'. Type '{}' for a list",
                                "Error:".bright_red().bold(),
                                line,
                                "help".bright_green()
                            ),
                        }
                    }
                    Ok(ReplEvent::Input(Err(ReadlineError::Interrupted | ReadlineError::Eof))) => {
                        println!("{} 🎹", "Goodbye!".bright_cyan());
                        break;
                    }
                    Ok(ReplEvent::Input(Err(err))) => {
                        println!(
                            "{} {}",
                            "Error reading input:".bright_red().bold(),
                            err.to_string().red()
                        );
                        break;
                    }
                    Err(_) => break,
                },

                recv(session_events) -> msg => match msg {
                    Ok(event) => self.handle_session_event(event),
                    Err(_) => break,
                }
            }
        }

        Ok(())
    }
}

/// Convenience function to start the REPL
pub fn start() -> Result<()> {
    let mut repl = Repl::new()?;
    repl.run()
}

/// Render a session event for the terminal
fn describe(event: &SessionEvent) -> String {
    match event {
        SessionEvent::Started { step, total } => {
            format!("{} Step 1/{}: {}", "▶".bright_green(), total, step)
        }
        SessionEvent::NothingToPractise { title } => {
            format!("{}: nothing to practise", title).yellow().to_string()
        }
        SessionEvent::Matched { note, remaining } => format!(
            "  {} {} ({} to go)",
            "✓".green(),
            midi_name(*note),
            remaining
        )
        .dimmed()
        .to_string(),
        SessionEvent::WrongNote { note, expected } => {
            let expected: Vec<String> = expected.iter().map(|&n| midi_name(n)).collect();
            format!(
                "  {} {}, expected {}",
                "✗".bright_red(),
                midi_name(*note).red(),
                expected.join(" ").cyan()
            )
        }
        SessionEvent::StepAdvanced { index, total, step } => {
            format!("{} Step {}/{}: {}", "▶".bright_green(), index + 1, total, step)
        }
        SessionEvent::Completed(completion) => format!(
            "🎉 {} complete ({} steps)",
            completion.title.bright_green().bold(),
            completion.steps
        ),
        SessionEvent::KeyAdvanced { key, title } => {
            format!("🔄 On to {}: {}", key.to_string().bold(), title)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use etude_core::tracker::Completion;
    use etude_core::Key;

    fn plain(event: &SessionEvent) -> String {
        colored::control::set_override(false);
        describe(event)
    }

    #[test]
    fn test_describe_wrong_note() {
        let text = plain(&SessionEvent::WrongNote {
            note: 61,
            expected: vec![60, 64, 67],
        });
        assert!(text.contains("C#4"));
        assert!(text.contains("C4 E4 G4"));
    }

    #[test]
    fn test_describe_completion_and_key_change() {
        let completed = plain(&SessionEvent::Completed(Completion {
            key: Key::C,
            title: "C Major scale".to_string(),
            steps: 15,
            next_key: Some(Key::G),
        }));
        assert!(completed.contains("C Major scale complete (15 steps)"));

        let advanced = plain(&SessionEvent::KeyAdvanced {
            key: Key::G,
            title: "G Major scale".to_string(),
        });
        assert!(advanced.contains("On to G: G Major scale"));
    }

    #[test]
    fn test_describe_matched_counts_down() {
        let text = plain(&SessionEvent::Matched {
            note: 64,
            remaining: 1,
        });
        assert!(text.contains("E4 (1 to go)"));
    }
}
