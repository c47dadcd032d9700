//! MIDI REPL commands

use crate::audio::MidiInputHandle;
use crate::commands::{CommandContext, CommandResult};
use colored::*;

const NOT_INITIALIZED: &str = "MIDI input not initialized";

/// Handle `midi devices` command - list available MIDI input ports
pub fn cmd_midi_devices(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    match MidiInputHandle::list_ports() {
        Ok(ports) if ports.is_empty() => CommandResult::Message(
            "No MIDI input ports found. Make sure a keyboard is plugged in."
                .yellow()
                .to_string(),
        ),
        Ok(ports) => {
            let mut output = format!("{}\n", "🎹 Available MIDI Input Ports:".bold());
            for (i, port) in ports.iter().enumerate() {
                output.push_str(&format!("  {}. {}\n", i + 1, port.cyan()));
            }
            output.push_str(&format!(
                "\n{} {}",
                "Use".dimmed(),
                "midi connect <port name>".green()
            ));
            CommandResult::Message(output)
        }
        Err(e) => CommandResult::Error(format!("Failed to list MIDI ports: {}", e)),
    }
}

/// Handle `midi connect <port>` command. The port is remembered in the
/// settings for the next start.
pub fn cmd_midi_connect(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error(
            "Usage: midi connect <port name>\nUse 'midi devices' to see available ports"
                .to_string(),
        );
    }

    match &ctx.midi {
        Some(handle) => match handle.connect(args) {
            Ok(port) => {
                let message = format!("🎹 Connected to MIDI port: {}", port.green());
                ctx.settings.midi_port = Some(port);
                CommandResult::Message(message)
            }
            Err(e) => CommandResult::Error(format!("Failed to connect to '{}': {}", args, e)),
        },
        None => CommandResult::Error(NOT_INITIALIZED.to_string()),
    }
}

/// Handle `midi disconnect` command
pub fn cmd_midi_disconnect(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match &ctx.midi {
        Some(handle) => match handle.disconnect() {
            Ok(()) => {
                ctx.settings.midi_port = None;
                CommandResult::Message("🎹 Disconnected from MIDI".to_string())
            }
            Err(e) => CommandResult::Error(format!("Failed to disconnect: {}", e)),
        },
        None => CommandResult::Error(NOT_INITIALIZED.to_string()),
    }
}

/// Handle `midi status` command
pub fn cmd_midi_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match &ctx.midi {
        Some(handle) => match handle.connected_port() {
            Some(port) => CommandResult::Message(format!("🎹 Listening on {}", port.green())),
            None => CommandResult::Message(
                format!(
                    "🎹 Not connected. Use {} or practise with {}",
                    "midi connect <port>".green(),
                    "play <notes>".green()
                )
            ),
        },
        None => CommandResult::Error(NOT_INITIALIZED.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::SessionHandle;
    use crate::settings::Settings;

    fn context() -> CommandContext {
        let settings = Settings::default();
        let session = SessionHandle::spawn(settings.exercise.clone(), false).unwrap();
        CommandContext::new(session, settings)
    }

    #[test]
    fn test_commands_without_midi_handle() {
        let mut ctx = context();
        assert!(matches!(
            cmd_midi_connect("", &mut ctx),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            cmd_midi_connect("Piano", &mut ctx),
            CommandResult::Error(_)
        ));
        assert!(matches!(
            cmd_midi_status("", &mut ctx),
            CommandResult::Error(_)
        ));
        assert_eq!(ctx.settings.midi_port, None);
    }
}
