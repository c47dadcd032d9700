//! Exercise configuration and practice commands

use crate::commands::{CommandContext, CommandResult};
use crate::session::SessionCommand;
use colored::*;
use etude_core::types::{
    midi_name, parse_midi_note, PracticeExercise, StepLabel, StepType, VoiceLeading,
};
use etude_core::{
    ArpeggioOctaves, ArpeggioType, ChordProgression, ChordType, CircleOfFifths, ExerciseConfig,
    HandSelection, Key, PracticeMode, ScaleType, TrackerState,
};

fn reconfigure(ctx: &mut CommandContext, config: ExerciseConfig) -> CommandResult {
    match ctx.apply(config) {
        Ok(title) => CommandResult::Message(format!("📋 {}", title.green())),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

fn current(ctx: &CommandContext) -> ExerciseConfig {
    ctx.settings.exercise.clone()
}

/// Handle `key [name]`
pub fn cmd_key(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Current key: {}", ctx.settings.exercise.key));
    }
    match args.parse::<Key>() {
        Ok(key) => {
            let config = current(ctx).with_key(key);
            reconfigure(ctx, config)
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `next key`, one step clockwise round the circle of fifths
pub fn cmd_next_key(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let config = current(ctx);
    let key = CircleOfFifths::next(config.key);
    reconfigure(ctx, config.with_key(key))
}

/// Handle `prev key`
pub fn cmd_prev_key(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let config = current(ctx);
    let key = CircleOfFifths::previous(config.key);
    reconfigure(ctx, config.with_key(key))
}

const MODE_USAGE: &str = "Usage: mode scale [type]
       mode chords [scale] [7]
       mode type <chord> [inv]
       mode arp [type] [1|2]
       mode prog <name>";

/// Parse the arguments of `mode`
pub fn parse_mode(args: &str) -> anyhow::Result<PracticeMode> {
    let mut words = args.split_whitespace();
    let Some(kind) = words.next() else {
        anyhow::bail!("{}", MODE_USAGE);
    };
    let rest: Vec<&str> = words.collect();

    let mode = match kind.to_lowercase().as_str() {
        "scale" => PracticeMode::Scale {
            scale: parse_or(rest.first(), ScaleType::Major)?,
        },
        "chords" => {
            let sevenths = rest
                .iter()
                .any(|w| matches!(*w, "7" | "7th" | "7ths" | "sevenths"));
            let scale = rest
                .iter()
                .find(|w| !matches!(**w, "7" | "7th" | "7ths" | "sevenths"));
            PracticeMode::ChordsByKey {
                scale: parse_or(scale, ScaleType::Major)?,
                sevenths,
            }
        }
        "type" => {
            let chord = rest
                .first()
                .ok_or_else(|| anyhow::anyhow!("Which chord type? e.g. mode type dom7"))?
                .parse::<ChordType>()?;
            let inversions = rest[1..]
                .iter()
                .any(|w| matches!(*w, "inv" | "inversions"));
            PracticeMode::ChordsByType { chord, inversions }
        }
        "arp" | "arpeggio" => PracticeMode::Arpeggio {
            arpeggio: parse_or(rest.first(), ArpeggioType::Major)?,
            octaves: parse_or(rest.get(1), ArpeggioOctaves::One)?,
        },
        "prog" | "progression" => {
            if rest.is_empty() {
                anyhow::bail!("Which progression? Use 'progressions' to list them");
            }
            PracticeMode::Progression {
                name: rest.join(" "),
            }
        }
        other => anyhow::bail!("Unknown mode '{}'\n{}", other, MODE_USAGE),
    };
    Ok(mode)
}

fn parse_or<T>(word: Option<&&str>, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr<Err = anyhow::Error>,
{
    match word {
        Some(word) => word.parse(),
        None => Ok(default),
    }
}

/// Handle `mode ...`
pub fn cmd_mode(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Current mode: {}\n{}",
            ctx.settings.exercise.mode,
            MODE_USAGE.dimmed()
        ));
    }

    let mode = match parse_mode(args) {
        Ok(mode) => mode,
        Err(e) => return CommandResult::Error(e.to_string()),
    };

    if let PracticeMode::Progression { name } = &mode {
        if ChordProgression::find(name).is_none() {
            let config = current(ctx).with_mode(mode.clone());
            if let Err(e) = ctx.apply(config) {
                return CommandResult::Error(e.to_string());
            }
            return CommandResult::Message(
                format!(
                    "Unknown progression '{}', nothing to practise. Use 'progressions' to list them",
                    name
                )
                .yellow()
                .to_string(),
            );
        }
    }

    let config = current(ctx).with_mode(mode);
    reconfigure(ctx, config)
}

/// Handle `hands <left|right|both>`
pub fn cmd_hands(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!("Playing with: {}", ctx.settings.exercise.hands));
    }
    match args.parse::<HandSelection>() {
        Ok(hands) => {
            let config = current(ctx).with_hands(hands);
            reconfigure(ctx, config)
        }
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `octave <n>`
pub fn cmd_octave(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Message(format!(
            "Start octave: {}",
            ctx.settings.exercise.start_octave
        ));
    }
    match args.parse::<i8>() {
        Ok(octave) => {
            let config = current(ctx).with_start_octave(octave);
            reconfigure(ctx, config)
        }
        Err(_) => CommandResult::Error(format!("Invalid octave '{}'", args)),
    }
}

/// Handle `auto [on|off]`
pub fn cmd_auto(args: &str, ctx: &mut CommandContext) -> CommandResult {
    let enabled = match args.to_lowercase().as_str() {
        "" => {
            let state = if ctx.settings.auto_key_progression {
                "on"
            } else {
                "off"
            };
            return CommandResult::Message(format!("Auto key progression is {}", state));
        }
        "on" | "true" | "yes" => true,
        "off" | "false" | "no" => false,
        _ => return CommandResult::Error("Usage: auto <on|off>".to_string()),
    };

    if let Err(e) = ctx
        .session
        .send(SessionCommand::SetAutoKeyProgression(enabled))
    {
        return CommandResult::Error(e.to_string());
    }
    ctx.settings.auto_key_progression = enabled;

    let message = if enabled {
        "🔄 Moving round the circle of fifths after each exercise"
    } else {
        "Staying in the current key"
    };
    CommandResult::Message(message.green().to_string())
}

/// Handle `start`
pub fn cmd_start(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.session.snapshot() {
        Ok(snapshot) if snapshot.state == TrackerState::Active => {
            return CommandResult::Message(
                "Already practising. Use 'reset' to start over".yellow().to_string(),
            );
        }
        Ok(_) => {}
        Err(e) => return CommandResult::Error(e.to_string()),
    }
    match ctx.session.send(SessionCommand::Start) {
        Ok(()) => CommandResult::Success,
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `reset`
pub fn cmd_reset(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.session.send(SessionCommand::Reset) {
        Ok(()) => CommandResult::Message("⏹ Back to the first step".to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `status`
pub fn cmd_status(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let snapshot = match ctx.session.snapshot() {
        Ok(snapshot) => snapshot,
        Err(e) => return CommandResult::Error(e.to_string()),
    };

    let mut output = format!("{}\n", snapshot.exercise.title().bold());
    output.push_str(&format!("  {}  {}\n", "Config:".dimmed(), snapshot.config));
    output.push_str(&format!("  {}   {}\n", "State:".dimmed(), snapshot.state));
    if snapshot.state == TrackerState::Active {
        output.push_str(&format!(
            "  {}    {}/{}\n",
            "Step:".dimmed(),
            snapshot.step_index + 1,
            snapshot.exercise.len()
        ));
        let names: Vec<String> = snapshot.highlighted.iter().map(|&n| midi_name(n)).collect();
        output.push_str(&format!(
            "  {}    {}\n",
            "Play:".dimmed(),
            names.join(" ").cyan()
        ));
        for (label, text) in harmony_notes(&snapshot.exercise, snapshot.step_index) {
            output.push_str(&format!("  {} {}\n", format!("{:<8}", label).dimmed(), text));
        }
    }
    output.push_str(&format!(
        "  {}    {}",
        "Auto:".dimmed(),
        if snapshot.auto_key_progression {
            "on"
        } else {
            "off"
        }
    ));
    if let Some(port) = ctx.midi.as_ref().and_then(|m| m.connected_port()) {
        output.push_str(&format!("\n  {}    {}", "MIDI:".dimmed(), port.green()));
    }
    CommandResult::Message(output)
}

/// Harmonic function of the chord at `index` and how its voices move into
/// the next chord
fn harmony_notes(exercise: &PracticeExercise, index: usize) -> Vec<(&'static str, String)> {
    let steps = exercise.steps();
    let mut notes = Vec::new();
    let Some(current) = steps.get(index) else {
        return notes;
    };

    if let StepLabel::Chord {
        numeral: Some(numeral),
        ..
    } = current.label()
    {
        notes.push(("Function:", numeral.function_description().to_string()));
    }

    if let Some(next) = steps.get(index + 1) {
        if current.kind() == StepType::Simultaneous && next.kind() == StepType::Simultaneous {
            let leading = VoiceLeading::analyze(current.notes(), next.notes());
            let leaps = match leading.leap_count() {
                0 => String::new(),
                1 => ", 1 leap".to_string(),
                n => format!(", {} leaps", n),
            };
            notes.push(("Next:", format!("{}{}", leading, leaps)));
        }
    }
    notes
}

/// Handle `steps`, listing the whole exercise
pub fn cmd_steps(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    match ctx.session.snapshot() {
        Ok(snapshot) if snapshot.exercise.is_empty() => CommandResult::Message(
            format!("{}: nothing to practise", snapshot.exercise.title())
                .yellow()
                .to_string(),
        ),
        Ok(snapshot) => CommandResult::Message(snapshot.exercise.to_string()),
        Err(e) => CommandResult::Error(e.to_string()),
    }
}

/// Handle `play <note> [note...]`: press and release notes without a
/// keyboard, e.g. `play C4 E4 G4` or `play 60`
pub fn cmd_play(args: &str, ctx: &mut CommandContext) -> CommandResult {
    if args.is_empty() {
        return CommandResult::Error("Usage: play <note> [note...]  e.g. play C4 E4 G4".to_string());
    }

    let mut notes = Vec::new();
    for word in args.split_whitespace() {
        match parse_midi_note(word) {
            Ok(note) => notes.push(note),
            Err(e) => return CommandResult::Error(e.to_string()),
        }
    }

    let commands = notes
        .iter()
        .map(|&n| SessionCommand::NoteOn(n))
        .chain(notes.iter().map(|&n| SessionCommand::NoteOff(n)));
    for command in commands {
        if let Err(e) = ctx.session.send(command) {
            return CommandResult::Error(e.to_string());
        }
    }
    CommandResult::Success
}

/// Handle `progressions`
pub fn cmd_progressions(_args: &str, _ctx: &mut CommandContext) -> CommandResult {
    let mut output = format!("{}\n", "🎼 Progressions:".bold());
    for progression in ChordProgression::all() {
        output.push_str(&format!(
            "  {:<14} {:<28} {}\n",
            progression.name.cyan(),
            progression.numerals().join(" "),
            progression.description.dimmed()
        ));
    }
    output.push_str(&format!(
        "\n{} {}",
        "Use".dimmed(),
        "mode prog <name>".green()
    ));
    CommandResult::Message(output)
}

/// Handle `circle`, showing the keys in order from the current one
pub fn cmd_circle(_args: &str, ctx: &mut CommandContext) -> CommandResult {
    let key = ctx.settings.exercise.key;
    let keys: Vec<String> = CircleOfFifths::starting_at(key)
        .map(|k| {
            if k == key {
                k.to_string().bold().green().to_string()
            } else {
                k.to_string()
            }
        })
        .collect();
    CommandResult::Message(format!("⭕ {}", keys.join(" → ")))
}
