//! The bundled demo plugin, driven through the engine.

use miles_foundation::Flags;
use miles_runtime::MatchingCore;
use miles_runtime::Registry;
use miles_runtime::demo::{self, DemoState};

fn core() -> MatchingCore<DemoState> {
    let mut registry = Registry::new();
    demo::register(&mut registry).unwrap();
    registry.build().unwrap()
}

/// Runs each line and returns everything the commands printed.
fn session(core: &MatchingCore<DemoState>, state: &mut DemoState, lines: &[&str]) -> Vec<String> {
    for line in lines {
        core.recognize_and_execute(line, None, state, &Flags::new())
            .unwrap();
    }
    state.drain()
}

// =============================================================================
// Sessions
// =============================================================================

#[test]
fn mixed_session() {
    let core = core();
    let mut state = DemoState::default();
    let output = session(
        &core,
        &mut state,
        &[
            "greet hello Grace",
            "count to 7",
            "count down by 2",
            "calendar move to june",
            "count up",
            "greet hi",
        ],
    );
    assert_eq!(output, vec!["Hey Grace!", "7", "5", "Moved to june", "6", "Hi!"]);
    assert_eq!(state.count, 6);
    assert_eq!(state.month.as_deref(), Some("june"));
    assert!(state.output.is_empty());
}

#[test]
fn failed_lines_leave_state_alone() {
    let core = core();
    let mut state = DemoState::default();
    session(&core, &mut state, &["count up by 4"]);

    for text in ["count sideways", "count up by", "greet hello", "calendar move to dec"] {
        assert!(
            core.recognize_and_execute(text, None, &mut state, &Flags::new())
                .is_err(),
            "{text} should fail"
        );
    }
    assert_eq!(state.count, 4);
    assert_eq!(state.month, None);
    assert!(state.drain().is_empty());
}

#[test]
fn incomplete_lines_run_out_of_input() {
    let core = core();
    for text in ["count up by", "greet hello"] {
        let err = core.recognize(text, None, &Flags::new()).unwrap_err();
        assert!(err.as_recognizer().is_some_and(|r| r.is_end_of_input()), "{text}");
    }
}

// =============================================================================
// Calendar
// =============================================================================

#[test]
fn misspelled_january_is_still_new_year() {
    let core = core();
    let mut state = DemoState::default();
    let output = session(&core, &mut state, &["calendar move to janaury"]);
    assert_eq!(output, vec!["Happy new year!"]);
    assert_eq!(state.month.as_deref(), Some("january"));
}

#[test]
fn typos_cost_certainty() {
    let core = core();
    let flags = Flags::new();
    let exact = core.recognize("calendar move to august", None, &flags).unwrap();
    let sloppy = core.recognize("calendar mvoe to agusut", None, &flags).unwrap();
    assert_eq!(exact.command_name(), "month");
    assert_eq!(sloppy.command_name(), "month");
    assert!((exact.certainty() - 100.0).abs() < 1e-9);
    assert!(sloppy.certainty() < 50.0);
    assert!(sloppy.certainty() > 0.0);
}

// =============================================================================
// Vocabulary
// =============================================================================

#[test]
fn vocabulary_lists_prefixes_and_words() {
    let core = core();
    assert_eq!(
        core.vocabulary(),
        vec![
            "by", "calendar", "count", "down", "greet", "hello", "hi", "january", "move", "reset",
            "to", "up",
        ]
    );
}
