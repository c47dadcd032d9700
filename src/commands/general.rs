//! General REPL commands (help, quit, settings)

use crate::commands::{CommandContext, CommandResult};
use colored::*;

/// Handle `help` command
pub fn cmd_help(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    print_help();
    CommandResult::Success
}

/// Handle `quit` or `exit` command
pub fn cmd_quit(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    CommandResult::Exit
}

/// Handle `settings`, showing what would be saved
pub fn cmd_settings(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let settings = &ctx.settings;
    let mut output = format!("{}\n", "⚙ Settings".bold());
    output.push_str(&format!("  Exercise: {}\n", settings.exercise));
    output.push_str(&format!(
        "  Auto key progression: {}\n",
        if settings.auto_key_progression {
            "on"
        } else {
            "off"
        }
    ));
    output.push_str(&format!(
        "  MIDI port: {}\n",
        settings.midi_port.as_deref().unwrap_or("none")
    ));
    output.push_str(&format!(
        "  File: {}",
        crate::settings::Settings::path().display().to_string().dimmed()
    ));
    CommandResult::Message(output)
}

/// Handle `settings save`
pub fn cmd_settings_save(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.settings.save() {
        Ok(path) => CommandResult::Message(
            format!("💾 Settings saved to {}", path.display())
                .green()
                .to_string(),
        ),
        Err(e) => CommandResult::Error(format!("{:#}", e)),
    }
}

/// Print help information
fn print_help() {
    println!("{}", "🎹 Etude Help".bold());
    println!("{}", "=============".bold());
    println!();
    println!("{}", "Exercise:".green());
    println!("  {}        - Set the key (C, F#, Bb...)", "key <name>".cyan());
    println!(
        "  {}  - Move round the circle of fifths",
        "next key / prev key".cyan()
    );
    println!("  {}  - Scale run up and down", "mode scale [type]".cyan());
    println!(
        "  {}  - Diatonic triads, or sevenths with 7",
        "mode chords [scale] [7]".cyan()
    );
    println!(
        "  {}  - One chord type in all keys",
        "mode type <chord> [inv]".cyan()
    );
    println!(
        "  {}  - Arpeggio over one or two octaves",
        "mode arp [type] [1|2]".cyan()
    );
    println!("  {}    - Chord progression", "mode prog <name>".cyan());
    println!("  {} - Which hands play", "hands <left|right|both>".cyan());
    println!("  {}        - Right hand octave", "octave <n>".cyan());
    println!(
        "  {}     - Next key after each completed exercise",
        "auto <on|off>".cyan()
    );
    println!();
    println!("{}", "Practice:".green());
    println!("  {}             - Begin the exercise", "start".cyan());
    println!("  {}             - Back to the first step", "reset".cyan());
    println!("  {}            - Current step and settings", "status".cyan());
    println!("  {}             - List every step", "steps".cyan());
    println!(
        "  {}  - Play notes without a keyboard",
        "play <notes>".cyan()
    );
    println!("  {}    - Sound the current step", "hint [ms|stop]".cyan());
    println!(
        "  {}      - Available progressions",
        "progressions".cyan()
    );
    println!("  {}            - Keys in circle order", "circle".cyan());
    println!();
    println!("{}", "MIDI Commands:".green());
    println!("  {}       - List MIDI input ports", "midi devices".cyan());
    println!("  {} - Connect to MIDI port", "midi connect <port>".cyan());
    println!("  {}    - Disconnect MIDI", "midi disconnect".cyan());
    println!("  {}        - Show connection", "midi status".cyan());
    println!();
    println!("{}", "General:".green());
    println!("  {}          - Show settings", "settings".cyan());
    println!("  {}     - Save settings", "settings save".cyan());
    println!("  {}              - Show this help", "help".cyan());
    println!("  {}              - Exit", "quit".cyan());
}
