#[cfg(test)]
mod tests {
    use etude_core::types::scale_intervals;
    use etude_core::{
        build_exercise, ChordInversion, ChordType, CircleOfFifths, ExerciseConfig, HandSelection,
        Key, NoteOutcome, PracticeMode, ProgressionTracker, ScaleType, StepType, TrackerState,
    };
    use std::collections::HashSet;

    /// Play every step of the current exercise, releasing each chord after it sounds
    fn play_through(tracker: &mut ProgressionTracker) -> NoteOutcome {
        let steps: Vec<Vec<u8>> = tracker.exercise().note_lists();
        let mut last = NoteOutcome::Ignored;
        for notes in steps {
            for &note in &notes {
                last = tracker.on_note_on(note);
            }
            for &note in &notes {
                tracker.on_note_off(note);
            }
        }
        last
    }

    #[test]
    fn test_c_major_scale_worked_example() {
        let exercise = build_exercise(&ExerciseConfig::default()).unwrap();
        let notes: Vec<u8> = exercise.note_lists().into_iter().flatten().collect();
        assert_eq!(
            notes,
            vec![60, 62, 64, 65, 67, 69, 71, 72, 71, 69, 67, 65, 64, 62, 60]
        );
    }

    #[test]
    fn test_both_hands_scale_parity() {
        for scale in ScaleType::ALL {
            let mode = PracticeMode::Scale { scale };
            let right = build_exercise(&ExerciseConfig::default().with_mode(mode.clone())).unwrap();
            let both = build_exercise(
                &ExerciseConfig::default()
                    .with_mode(mode)
                    .with_hands(HandSelection::Both),
            )
            .unwrap();

            assert_eq!(both.len(), right.len());
            for (pair, single) in both.steps().iter().zip(right.steps()) {
                assert_eq!(pair.kind(), StepType::Paired);
                let r = single.notes()[0];
                assert_eq!(pair.notes(), &[r - 12, r]);
            }
        }
    }

    #[test]
    fn test_scale_tables() {
        for scale in ScaleType::ALL {
            let intervals = scale_intervals(scale);
            assert_eq!(intervals[0], 0);
            assert!(intervals.windows(2).all(|w| w[0] < w[1]));
            assert!(intervals.iter().all(|&i| i < 12));
        }
    }

    #[test]
    fn test_every_inversion_ascends() {
        for chord in ChordType::ALL {
            for inversion in ChordInversion::ALL {
                let intervals = etude_core::types::chord_intervals(chord, inversion);
                assert_eq!(intervals.len(), chord.len());
                assert!(
                    intervals.windows(2).all(|w| w[0] < w[1]),
                    "{:?} {:?} gave {:?}",
                    chord,
                    inversion,
                    intervals
                );
            }
        }
    }

    #[test]
    fn test_one_five_worked_example() {
        let config = ExerciseConfig::default().with_mode(PracticeMode::Progression {
            name: "I–V".to_string(),
        });
        let exercise = build_exercise(&config).unwrap();
        assert_eq!(exercise.note_lists(), vec![vec![60, 64, 67], vec![67, 71, 74]]);
    }

    #[test]
    fn test_unknown_progression_has_no_steps() {
        let config = ExerciseConfig::default().with_mode(PracticeMode::Progression {
            name: "I–IX".to_string(),
        });
        let exercise = build_exercise(&config).unwrap();
        assert_eq!(exercise.len(), 0);
    }

    #[test]
    fn test_circle_of_fifths_group() {
        let expected = [
            Key::G,
            Key::D,
            Key::A,
            Key::E,
            Key::B,
            Key::FSharp,
            Key::CSharp,
            Key::GSharp,
            Key::DSharp,
            Key::ASharp,
            Key::F,
            Key::C,
        ];

        let mut key = Key::C;
        let mut visited = HashSet::new();
        for want in expected {
            key = CircleOfFifths::next(key);
            assert_eq!(key, want);
            visited.insert(key);
        }
        assert_eq!(key, Key::C);
        assert_eq!(visited.len(), 12);

        for key in Key::ALL {
            assert_eq!(CircleOfFifths::next(CircleOfFifths::previous(key)), key);
            assert_eq!(CircleOfFifths::previous(CircleOfFifths::next(key)), key);
        }
    }

    #[test]
    fn test_auto_progression_through_three_keys() {
        let mut tracker = ProgressionTracker::new(ExerciseConfig::default()).unwrap();
        tracker.set_auto_key_progression(true);

        for want in [Key::G, Key::D, Key::A] {
            assert!(tracker.start().is_some());
            match play_through(&mut tracker) {
                NoteOutcome::ExerciseComplete(completion) => {
                    assert_eq!(completion.next_key, Some(want));
                }
                other => panic!("unexpected outcome {:?}", other),
            }
            assert_eq!(tracker.config().key, want);
            assert_eq!(tracker.state(), TrackerState::Idle);
        }
    }

    #[test]
    fn test_arpeggio_root_follows_key() {
        let config = ExerciseConfig::default().with_mode(PracticeMode::Arpeggio {
            arpeggio: etude_core::ArpeggioType::Major,
            octaves: etude_core::ArpeggioOctaves::One,
        });
        let mut tracker = ProgressionTracker::new(config).unwrap();
        tracker.set_auto_key_progression(true);
        tracker.start();
        play_through(&mut tracker);

        assert_eq!(tracker.config().key, Key::G);
        assert_eq!(tracker.exercise().steps()[0].notes(), &[67]);
    }

    #[test]
    fn test_highlighted_notes_follow_the_step() {
        let config = ExerciseConfig::default().with_mode(PracticeMode::ChordsByKey {
            scale: ScaleType::Major,
            sevenths: false,
        });
        let mut tracker = ProgressionTracker::new(config).unwrap();
        assert!(tracker.highlighted_notes().is_empty());

        tracker.start();
        assert_eq!(tracker.highlighted_notes(), &[60, 64, 67]);
        for note in [60, 64, 67] {
            tracker.on_note_on(note);
        }
        assert_eq!(tracker.highlighted_notes(), &[62, 65, 69]);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_config_and_exercise_survive_json() {
        let config = ExerciseConfig::default()
            .with_key(Key::D)
            .with_hands(HandSelection::Both)
            .with_mode(PracticeMode::Progression {
                name: "ii-V-I".to_string(),
            });

        let json = serde_json::to_string(&config).unwrap();
        assert!(json.contains("\"mode\":\"progression\""));
        let restored: ExerciseConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);

        let exercise = build_exercise(&config).unwrap();
        let json = serde_json::to_string(&exercise).unwrap();
        let restored: etude_core::PracticeExercise = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, exercise);
        assert_eq!(restored.note_lists(), exercise.note_lists());
    }
}
