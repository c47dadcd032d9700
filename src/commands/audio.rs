//! Audio hint command

use crate::audio::DEFAULT_HINT;
use crate::commands::{CommandContext, CommandResult};
use colored::*;
use etude_core::types::midi_name;
use std::time::Duration;

/// Handle `hint [ms|stop]`: sound the notes of the current step
pub fn cmd_hint(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args == "stop" {
        return match &ctx.hints {
            Some(player) => match player.stop() {
                Ok(()) => CommandResult::Success,
                Err(e) => CommandResult::Error(e.to_string()),
            },
            None => CommandResult::Success,
        };
    }

    let duration = if args.is_empty() {
        DEFAULT_HINT
    } else {
        match args.parse::<u64>() {
            Ok(ms) if (50..=5000).contains(&ms) => Duration::from_millis(ms),
            _ => {
                return CommandResult::Error(
                    "Hint length must be 50-5000 milliseconds".to_string(),
                )
            }
        }
    };

    let notes = match ctx.session.snapshot() {
        Ok(snapshot) => snapshot.highlighted,
        Err(e) => return CommandResult::Error(e.to_string()),
    };
    if notes.is_empty() {
        return CommandResult::Error("Nothing to hint. Use 'start' first".to_string());
    }

    let names: Vec<String> = notes.iter().map(|&n| midi_name(n)).collect();
    let Some(player) = &ctx.hints else {
        // No audio device, show the notes instead
        return CommandResult::Message(format!("💡 {}", names.join(" ").cyan()));
    };

    match player.play(&notes, duration) {
        Ok(()) => CommandResult::Message(format!("🔊 {}", names.join(" ").cyan())),
        Err(e) => CommandResult::Error(format!("Failed to play hint: {}", e)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::{SessionCommand, SessionHandle};
    use crate::settings::Settings;

    fn context() -> CommandContext {
        let settings = Settings::default();
        let session = SessionHandle::spawn(settings.exercise.clone(), false).unwrap();
        CommandContext::new(session, settings)
    }

    #[test]
    fn test_hint_needs_an_active_exercise() {
        let mut ctx = context();
        assert!(matches!(cmd_hint("", &mut ctx), CommandResult::Error(_)));
    }

    #[test]
    fn test_hint_without_audio_names_the_notes() {
        let mut ctx = context();
        ctx.session.send(SessionCommand::Start).unwrap();
        match cmd_hint("", &mut ctx) {
            CommandResult::Message(m) => assert!(m.contains("C4")),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_hint_length_is_checked() {
        let mut ctx = context();
        assert!(matches!(cmd_hint("10", &mut ctx), CommandResult::Error(_)));
        assert!(matches!(cmd_hint("abc", &mut ctx), CommandResult::Error(_)));
    }
}
