//! Namespace selection, error positions and executor dispatch.

use std::fmt;
use std::thread;

use miles_foundation::{ErrorKind, Flags};
use miles_recognizer::{AnyWordAnalyzer, CommandStructure, ExtendedGrammar, NumberAnalyzer};
use miles_runtime::{BoxError, CommandExecutor, MatchingCore, Registry};

type Log = Vec<String>;

fn record(command: &CommandStructure, log: &mut Log) -> Result<(), BoxError> {
    log.push(format!("{}:{}", command.namespace().identifier, command.command_name()));
    Ok(())
}

/// Three namespaces: `letters` (prefix "n s p"), `music` ("play") and
/// `games` ("start game").
fn engine() -> MatchingCore<Log> {
    let mut registry = Registry::new();
    {
        let mut plugin = registry.create_plugin("test").unwrap();
        plugin
            .add_namespace("letters", "n s p")
            .unwrap()
            .add_command("abcde", "A B C D E", record)
            .unwrap();

        let mut music = plugin.add_namespace("music", "play").unwrap();
        music.add_matching("song", AnyWordAnalyzer);
        music.add_command("song", "SONG song", record).unwrap();
        music.add_command("all", "EVERYTHING", record).unwrap();

        let mut games = plugin.add_namespace("games", "start game").unwrap();
        games.add_matching("level", NumberAnalyzer);
        games.add_command("level", "AT LEVEL level", record).unwrap();
    }
    registry.build().unwrap()
}

// =============================================================================
// Namespace Selection
// =============================================================================

#[test]
fn prefix_selects_the_namespace() {
    let core = engine();
    let mut log = Log::new();
    for text in ["play song yesterday", "start game at level 3", "n s p a b c d e"] {
        core.recognize_and_execute(text, None, &mut log, &Flags::new())
            .unwrap();
    }
    assert_eq!(log, vec!["music:song", "games:level", "letters:abcde"]);
}

#[test]
fn structure_records_the_prefix() {
    let core = engine();
    let s = core
        .recognize("start game at level 12", None, &Flags::new())
        .unwrap();
    assert_eq!(s.namespace().tokens, vec!["start", "game"]);
    assert_eq!(s.start(), 2);
    assert_eq!(s.end(), 5);
    let level = s.find_matching("level")[0].result().and_then(|v| v.as_int());
    assert_eq!(level, Some(12));
}

#[test]
fn explicit_namespace_reads_from_the_first_token() {
    let core = engine();
    let s = core
        .recognize("a b c d e", Some("letters"), &Flags::new())
        .unwrap();
    assert_eq!(s.command_name(), "abcde");
    assert_eq!(s.start(), 0);
    assert!(s.namespace().tokens.is_empty());

    let err = core
        .recognize("n s p a b c d e", Some("letters"), &Flags::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to recognize command! Error at position 1: n"
    );
}

// =============================================================================
// Error Positions
// =============================================================================

#[test]
fn namespace_errors_cite_the_prefix_word() {
    let core = engine();
    let err = core
        .recognize("n s a b c d e", None, &Flags::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to recognize namespace! Error at position 3: a"
    );
    assert!(err.context.is_none());
}

#[test]
fn command_errors_count_the_prefix() {
    let core = engine();
    let err = core
        .recognize("n s p a b c Y e", None, &Flags::new())
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to recognize command! Error at position 7: Y"
    );
    assert_eq!(err.context.unwrap().namespace.as_deref(), Some("letters"));

    let err = core.recognize("n s p a b c", None, &Flags::new()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to recognize command! Unexpected end of input."
    );
    assert!(err.as_recognizer().is_some_and(|r| r.is_end_of_input()));
}

#[test]
fn unknown_namespace_is_reported() {
    let core = engine();
    let err = core
        .recognize("song x", Some("radio"), &Flags::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownNamespace(ref n) if n == "radio"));
}

// =============================================================================
// Executors
// =============================================================================

#[derive(Debug)]
struct Overdrawn {
    balance: i64,
    requested: i64,
}

impl fmt::Display for Overdrawn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cannot withdraw {} from {}", self.requested, self.balance)
    }
}

impl std::error::Error for Overdrawn {}

fn bank() -> MatchingCore<i64> {
    let mut registry = Registry::new();
    {
        let mut plugin = registry.create_plugin("bank").unwrap();
        let mut ns = plugin.add_namespace("bank", "bank").unwrap();
        ns.add_matching("amount", NumberAnalyzer);
        ns.add_command("deposit", "DEPOSIT amount", |c: &CommandStructure, balance: &mut i64| -> Result<(), Overdrawn> {
            *balance += amount(c);
            Ok(())
        })
        .unwrap();
        ns.add_command("withdraw", "WITHDRAW amount", |c: &CommandStructure, balance: &mut i64| -> Result<(), Overdrawn> {
            let requested = amount(c);
            if requested > *balance {
                return Err(Overdrawn {
                    balance: *balance,
                    requested,
                });
            }
            *balance -= requested;
            Ok(())
        })
        .unwrap();
    }
    registry.build().unwrap()
}

fn amount(command: &CommandStructure) -> i64 {
    command.find_matching("amount")[0]
        .result()
        .and_then(|v| v.as_int())
        .unwrap()
}

#[test]
fn executor_errors_reach_the_caller() {
    let core = bank();
    let mut balance = 0;
    core.recognize_and_execute("bank deposit 30", None, &mut balance, &Flags::new())
        .unwrap();
    core.recognize_and_execute("bank withdraw 10", None, &mut balance, &Flags::new())
        .unwrap();
    assert_eq!(balance, 20);

    let err = core
        .recognize_and_execute("bank withdraw 25", None, &mut balance, &Flags::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::Executor(_)));
    assert_eq!(err.to_string(), "cannot withdraw 25 from 20");
    let overdrawn = err
        .executor_source()
        .and_then(|e| e.downcast_ref::<Overdrawn>())
        .unwrap();
    assert_eq!(overdrawn.balance, 20);
    assert_eq!(overdrawn.requested, 25);
    assert_eq!(balance, 20);
}

#[test]
fn recognized_structures_can_run_again() {
    let core = bank();
    let mut balance = 0;
    let deposit = core.recognize("bank deposit 5", None, &Flags::new()).unwrap();
    for _ in 0..3 {
        core.execute(&deposit, &mut balance).unwrap();
    }
    assert_eq!(balance, 15);
}

/// An executor with its own state, implementing the trait directly.
struct Tagged {
    tag: &'static str,
}

impl CommandExecutor<Log> for Tagged {
    fn execute(&self, command: &CommandStructure, log: &mut Log) -> Result<(), BoxError> {
        let source = command.flags().get_text("source").unwrap_or("unknown");
        log.push(format!("{} {} from {source}", self.tag, command.command_name()));
        Ok(())
    }
}

#[test]
fn executors_can_be_structs() {
    let mut registry = Registry::new();
    {
        let mut plugin = registry.create_plugin("p").unwrap();
        let mut ns = plugin.add_namespace("n", "n").unwrap();
        ns.add_command("ping", "PING", Tagged { tag: "[net]" }).unwrap();
    }
    let core = registry.build().unwrap();
    let mut log = Log::new();
    let flags = Flags::new().with("source", "test");
    core.recognize_and_execute("n ping", None, &mut log, &flags).unwrap();
    core.recognize_and_execute("n ping", None, &mut log, &Flags::new())
        .unwrap();
    assert_eq!(log, vec!["[net] ping from test", "[net] ping from unknown"]);
}

// =============================================================================
// Extended Grammars and Sharing
// =============================================================================

#[test]
fn extended_grammars_use_namespace_analyzers() {
    let core = engine();
    let medley = ExtendedGrammar::new("medley")
        .command("pair", "song AND song")
        .unwrap();
    let found = core
        .recognize_extended(&medley, "yesterday and help and more", "music", &Flags::new())
        .unwrap();
    assert_eq!(found.len(), 1);
    assert_eq!(found[0].command_name(), "pair");
    assert_eq!(found[0].end(), 3);
    assert_eq!(found[0].namespace().identifier, "medley");

    let err = core
        .recognize_extended(&medley, "yesterday", "radio", &Flags::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownNamespace(_)));
}

#[test]
fn extended_grammar_errors_name_the_namespace() {
    let core = engine();
    let duet = ExtendedGrammar::new("duet")
        .command("duet", "song WITH singer")
        .unwrap();
    let err = core
        .recognize_extended(&duet, "yesterday with paul", "music", &Flags::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::UnknownMatching(ref n) if n == "singer"));
    let context = err.context.unwrap();
    assert_eq!(context.plugin.as_deref(), Some("test"));
    assert_eq!(context.namespace.as_deref(), Some("music"));
}

#[test]
fn one_core_serves_many_threads() {
    let core = engine();
    let texts = [
        "play song yesterday",
        "start game at level 3",
        "n s p a b c d e",
        "play everything",
    ];
    let names: Vec<String> = thread::scope(|scope| {
        let handles: Vec<_> = texts
            .iter()
            .map(|text| {
                let core = &core;
                scope.spawn(move || {
                    core.recognize(text, None, &Flags::new())
                        .unwrap()
                        .command_name()
                        .to_string()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });
    assert_eq!(names, vec!["song", "level", "abcde", "all"]);
}

#[test]
fn vocabulary_spans_every_namespace() {
    let core = engine();
    assert_eq!(
        core.vocabulary(),
        vec![
            "a", "at", "b", "c", "d", "e", "everything", "game", "level", "n", "p", "play",
            "s", "song", "start",
        ]
    );
}
