//! Registration across plugins and namespaces.

use miles_foundation::{ErrorKind, Flags};
use miles_matcher::PriorityStrategy;
use miles_recognizer::{AnyWordAnalyzer, CommandStructure, RecognizerConfig};
use miles_runtime::{BoxError, NamespaceConfig, Registry, RegistryConfig};

fn noop(_: &CommandStructure, _: &mut ()) -> Result<(), BoxError> {
    Ok(())
}

// =============================================================================
// Configuration
// =============================================================================

#[test]
fn config_seeds_every_namespace() {
    let config = RegistryConfig::new()
        .with_namespace(
            NamespaceConfig::new()
                .with_strategy(PriorityStrategy::FindMax)
                .with_default_priority(7),
        )
        .with_recognizer(RecognizerConfig::new().with_random_seed(42));
    let mut registry: Registry<()> = Registry::with_config(config);
    {
        let mut plugin = registry.create_plugin("p").unwrap();
        let mut a = plugin.add_namespace("a", "a").unwrap();
        a.add_command("x", "X", noop).unwrap();
        let mut b = plugin.add_namespace("b", "b").unwrap();
        b.add_command("x", "X", noop).unwrap();
        b.set_priority_strategy(PriorityStrategy::First);
    }
    let core = registry.build().unwrap();

    let a = core.environment("a").unwrap();
    assert_eq!(a.priorities().strategy(), PriorityStrategy::FindMax);
    assert_eq!(a.priorities().default_priority(), 7);
    assert_eq!(a.config().random_seed, 42);

    let b = core.environment("b").unwrap();
    assert_eq!(b.priorities().strategy(), PriorityStrategy::First);
    assert_eq!(b.priorities().default_priority(), 7);
    assert!(core.environment("c").is_none());
}

#[test]
fn certainty_threshold_rejects_weak_matches() {
    let strict = RegistryConfig::new()
        .with_recognizer(RecognizerConfig::new().with_certainty_threshold(60.0));
    let mut registry: Registry<()> = Registry::with_config(strict);
    {
        let mut plugin = registry.create_plugin("p").unwrap();
        let mut ns = plugin.add_namespace("travel", "travel").unwrap();
        ns.set_word_analyzer_factory(miles_recognizer::TypoWordFactory);
        ns.add_command("go", "MOVE FORWARD", noop).unwrap();
    }
    let core = registry.build().unwrap();
    let flags = Flags::new();

    assert!(core.recognize("travel move forwrad", None, &flags).is_ok());
    let err = core.recognize("travel mvoe forward", None, &flags).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Unable to recognize command! Error at position 2: mvoe"
    );
}

// =============================================================================
// Plugins
// =============================================================================

#[test]
fn plugins_can_be_reopened() {
    let mut registry: Registry<()> = Registry::new();
    {
        let mut music = registry.create_plugin("music").unwrap();
        music.add_namespace("player", "play").unwrap();
    }
    {
        let mut games = registry.create_plugin("games").unwrap();
        let mut chess = games.add_namespace("chess", "chess").unwrap();
        chess.add_command("resign", "RESIGN", noop).unwrap();
    }
    {
        let mut music = registry.plugin("music").unwrap();
        let mut radio = music.add_namespace("radio", "radio").unwrap();
        radio.add_grammar("tune", "TUNE").unwrap();
        assert!(music.namespace("chess").is_none());
        music
            .namespace("player")
            .unwrap()
            .add_command("stop", "STOP", noop)
            .unwrap();
    }
    assert_eq!(registry.plugins(), ["music", "games"]);
    assert_eq!(registry.namespaces(), vec!["player", "chess", "radio"]);

    let core = registry.build().unwrap();
    core.recognize_and_execute("play stop", None, &mut (), &Flags::new())
        .unwrap();

    let err = core
        .recognize_and_execute("radio tune", None, &mut (), &Flags::new())
        .unwrap_err();
    assert!(matches!(err.kind, ErrorKind::MissingExecutor(ref c) if c == "tune"));
    let context = err.context.unwrap();
    assert_eq!(context.plugin.as_deref(), Some("music"));
    assert_eq!(context.namespace.as_deref(), Some("radio"));
}

#[test]
fn namespaces_are_global_across_plugins() {
    let mut registry: Registry<()> = Registry::new();
    registry
        .create_plugin("music")
        .unwrap()
        .add_namespace("player", "play")
        .unwrap();

    let mut games = registry.create_plugin("games").unwrap();
    let err = games.add_namespace("chess", "play chess").err().unwrap();
    assert!(matches!(
        err.kind,
        ErrorKind::PrefixConflict { ref existing, ref requested }
            if existing == "play" && requested == "play chess"
    ));

    let err = games.add_namespace("player", "games").err().unwrap();
    assert!(matches!(err.kind, ErrorKind::DuplicateNamespace(ref n) if n == "player"));
    assert_eq!(err.context.unwrap().plugin.as_deref(), Some("games"));
}

#[test]
fn prefixes_ignore_case() {
    let mut registry: Registry<()> = Registry::new();
    {
        let mut plugin = registry.create_plugin("p").unwrap();
        let mut ns = plugin.add_namespace("shout", "LOUD Noise").unwrap();
        assert_eq!(ns.prefix(), ["loud", "noise"]);
        ns.add_command("bang", "BANG", noop).unwrap();
    }
    let core = registry.build().unwrap();

    let listed: Vec<(&str, &[String])> = core.namespaces().collect();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].0, "shout");
    assert_eq!(listed[0].1, ["loud", "noise"]);

    let s = core.recognize("LOUD noise Bang", None, &Flags::new()).unwrap();
    assert_eq!(s.namespace().tokens, vec!["LOUD", "noise"]);
    assert_eq!(s.start(), 2);
}

// =============================================================================
// Build Errors
// =============================================================================

#[test]
fn one_unbound_placeholder_fails_the_build() {
    let mut registry: Registry<()> = Registry::new();
    {
        let mut plugin = registry.create_plugin("p").unwrap();
        let mut good = plugin.add_namespace("good", "good").unwrap();
        good.add_matching("thing", AnyWordAnalyzer);
        good.add_command("take", "TAKE thing", noop).unwrap();
        let mut bad = plugin.add_namespace("bad", "bad").unwrap();
        bad.add_command("give", "GIVE thing TO whom", noop).unwrap();
    }
    let err = registry.build().err().unwrap();
    assert!(matches!(err.kind, ErrorKind::UnknownMatching(ref n) if n == "thing"));
    let context = err.context.unwrap();
    assert_eq!(context.namespace.as_deref(), Some("bad"));
    assert_eq!(context.command.as_deref(), Some("give"));
}

#[test]
fn rejected_grammar_leaves_the_namespace_usable() {
    let mut registry: Registry<()> = Registry::new();
    {
        let mut plugin = registry.create_plugin("p").unwrap();
        let mut ns = plugin.add_namespace("n", "n").unwrap();
        let err = ns.add_command("broken", "GO (NORTH, SOUTH", noop).err().unwrap();
        assert!(err.as_grammar_syntax().is_some());
        ns.add_command("broken", "GO (NORTH, SOUTH)", noop).unwrap();
    }
    let core = registry.build().unwrap();
    let s = core.recognize("n go south", None, &Flags::new()).unwrap();
    assert_eq!(s.command_name(), "broken");
}
