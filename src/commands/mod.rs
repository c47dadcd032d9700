//! Command registry for REPL commands
//!
//! Each command is a prefix plus a plain function handler. The longest
//! matching prefix wins, so `next key` and `next` can coexist.

pub mod audio;
pub mod general;
pub mod midi;
pub mod practice;

use crate::audio::{HintPlayer, MidiInputHandle};
use crate::session::SessionHandle;
use crate::settings::Settings;
use etude_core::ExerciseConfig;

/// Result of executing a command
#[derive(Debug)]
pub enum CommandResult {
    /// Command executed successfully, continue REPL
    Success,
    /// Command executed, show this message
    Message(String),
    /// Exit the REPL
    Exit,
    /// No registered command matches the input
    NotACommand,
    /// Error occurred
    Error(String),
}

/// Context passed to command handlers
pub struct CommandContext {
    pub session: SessionHandle,
    pub settings: Settings,
    pub midi: Option<MidiInputHandle>,
    pub hints: Option<HintPlayer>,
}

impl CommandContext {
    pub fn new(session: SessionHandle, settings: Settings) -> Self {
        Self {
            session,
            settings,
            midi: None,
            hints: None,
        }
    }

    /// Push a new configuration to the session. The stored settings only
    /// change when the exercise builds.
    pub fn apply(&mut self, config: ExerciseConfig) -> anyhow::Result<String> {
        let title = self.session.configure(config.clone())?;
        self.settings.exercise = config;
        Ok(title)
    }
}

/// A command handler function
pub type CommandHandler = fn(&str, &mut CommandContext) -> CommandResult;

/// Registry of available commands
pub struct CommandRegistry {
    /// Sorted by prefix length descending for longest-match-first lookup
    commands: Vec<(String, CommandHandler)>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self {
            commands: Vec::new(),
        }
    }

    pub fn register(&mut self, prefix: &str, handler: CommandHandler) {
        self.commands.push((prefix.to_string(), handler));
        self.commands.sort_by(|a, b| b.0.len().cmp(&a.0.len()));
    }

    /// Execute a command, returning NotACommand if no match found
    pub fn execute(&self, input: &str, ctx: &mut CommandContext) -> CommandResult {
        for (prefix, handler) in &self.commands {
            if input == prefix || input.starts_with(&format!("{} ", prefix)) {
                let args = input[prefix.len()..].trim();
                return handler(args, ctx);
            }
        }
        CommandResult::NotACommand
    }

    /// Get all registered command prefixes
    pub fn list_commands(&self) -> Vec<&str> {
        self.commands.iter().map(|(p, _)| p.as_str()).collect()
    }
}

impl Default for CommandRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Create a fully populated command registry with all built-in commands
pub fn create_registry() -> CommandRegistry {
    let mut registry = CommandRegistry::new();

    // Exercise configuration
    registry.register("key", practice::cmd_key);
    registry.register("next key", practice::cmd_next_key);
    registry.register("prev key", practice::cmd_prev_key);
    registry.register("mode", practice::cmd_mode);
    registry.register("hands", practice::cmd_hands);
    registry.register("octave", practice::cmd_octave);
    registry.register("auto", practice::cmd_auto);

    // Practising
    registry.register("start", practice::cmd_start);
    registry.register("reset", practice::cmd_reset);
    registry.register("status", practice::cmd_status);
    registry.register("steps", practice::cmd_steps);
    registry.register("play", practice::cmd_play);
    registry.register("progressions", practice::cmd_progressions);
    registry.register("circle", practice::cmd_circle);

    // MIDI input
    registry.register("midi devices", midi::cmd_midi_devices);
    registry.register("midi connect", midi::cmd_midi_connect);
    registry.register("midi disconnect", midi::cmd_midi_disconnect);
    registry.register("midi status", midi::cmd_midi_status);

    // Audio hints
    registry.register("hint", audio::cmd_hint);

    // General commands
    registry.register("settings save", general::cmd_settings_save);
    registry.register("settings", general::cmd_settings);
    registry.register("help", general::cmd_help);
    registry.register("quit", general::cmd_quit);
    registry.register("exit", general::cmd_quit);

    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> CommandContext {
        let settings = Settings::default();
        let session = SessionHandle::spawn(settings.exercise.clone(), false).unwrap();
        CommandContext::new(session, settings)
    }

    fn echo(args: &str, _ctx: &mut CommandContext) -> CommandResult {
        CommandResult::Message(args.to_string())
    }

    fn echo_key(args: &str, _ctx: &mut CommandContext) -> CommandResult {
        CommandResult::Message(format!("key:{}", args))
    }

    #[test]
    fn test_longest_prefix_wins() {
        let mut registry = CommandRegistry::new();
        registry.register("next", echo);
        registry.register("next key", echo_key);
        let mut ctx = context();

        match registry.execute("next key", &mut ctx) {
            CommandResult::Message(m) => assert_eq!(m, "key:"),
            other => panic!("unexpected {:?}", other),
        }
        match registry.execute("next thing", &mut ctx) {
            CommandResult::Message(m) => assert_eq!(m, "thing"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_prefix_must_end_at_word_boundary() {
        let mut registry = CommandRegistry::new();
        registry.register("key", echo);
        let mut ctx = context();

        assert!(matches!(
            registry.execute("keyboard", &mut ctx),
            CommandResult::NotACommand
        ));
        match registry.execute("key   F#", &mut ctx) {
            CommandResult::Message(m) => assert_eq!(m, "F#"),
            other => panic!("unexpected {:?}", other),
        }
    }

    #[test]
    fn test_builtin_registry() {
        let registry = create_registry();
        let commands = registry.list_commands();
        for expected in ["key", "mode", "start", "midi connect", "hint", "quit"] {
            assert!(commands.contains(&expected), "missing {}", expected);
        }

        let mut ctx = context();
        assert!(matches!(
            registry.execute("quit", &mut ctx),
            CommandResult::Exit
        ));
        assert!(matches!(
            registry.execute("transpose up", &mut ctx),
            CommandResult::NotACommand
        ));
    }

    #[test]
    fn test_apply_keeps_settings_on_error() {
        let mut ctx = context();
        let bad = ExerciseConfig::default()
            .with_hands(etude_core::HandSelection::Both)
            .with_start_octave(0);

        assert!(ctx.apply(bad).is_err());
        assert_eq!(ctx.settings.exercise, ExerciseConfig::default());
    }
}
