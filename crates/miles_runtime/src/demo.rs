//! A small built-in plugin for the `miles` binary.
//!
//! ```text
//! greet hi                       greet hello Ada
//! count up { by number }         count down { by number }
//! count reset                    count to number
//! calendar move to month         calendar move to january
//! ```
//!
//! The calendar namespace tolerates typos in both its words and its month
//! names.

use miles_foundation::Result;
use miles_matcher::{KeywordListRule, WordLengthRule};
use miles_recognizer::{
    AnyWordAnalyzer, CommandStructure, FnAnalyzer, MatchContext, NumberAnalyzer, TypoWordFactory,
    best_match,
};

use crate::executor::BoxError;
use crate::registry::Registry;

/// Month names, lowercase.
pub const MONTHS: [&str; 12] = [
    "january",
    "february",
    "march",
    "april",
    "may",
    "june",
    "july",
    "august",
    "september",
    "october",
    "november",
    "december",
];

/// State the demo commands act on.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DemoState {
    /// The counter.
    pub count: i64,
    /// The selected month.
    pub month: Option<String>,
    /// Lines the commands produced since the last drain.
    pub output: Vec<String>,
}

impl DemoState {
    /// Takes the produced lines.
    pub fn drain(&mut self) -> Vec<String> {
        std::mem::take(&mut self.output)
    }
}

type Executed = std::result::Result<(), BoxError>;

fn step(command: &CommandStructure) -> i64 {
    command
        .find_matching("number")
        .first()
        .and_then(|n| n.result())
        .and_then(miles_foundation::Value::as_int)
        .unwrap_or(1)
}

/// Matches a month name, tolerating typos. The result is the month.
fn month_analyzer() -> FnAnalyzer<impl Fn(&mut MatchContext<'_>) + Send + Sync> {
    FnAnalyzer::new(|ctx: &mut MatchContext<'_>| {
        let Some(token) = ctx.current() else {
            ctx.fail();
            return;
        };
        match best_match(&token.to_lowercase(), MONTHS) {
            Some((month, certainty)) => {
                ctx.consume_with_certainty(1, certainty);
                ctx.set_result(month);
            }
            None => ctx.fail(),
        }
    })
}

/// Registers the demo plugin.
///
/// # Errors
/// Returns a registration error if the demo grammars are rejected.
pub fn register(registry: &mut Registry<DemoState>) -> Result<()> {
    let mut plugin = registry.create_plugin("demo")?;

    {
        let mut greet = plugin.add_namespace("greet", "greet")?;
        greet.add_matching("name", AnyWordAnalyzer);
        greet.add_command("hi", "HI", |_: &CommandStructure, state: &mut DemoState| -> Executed {
            state.output.push("Hi!".into());
            Ok(())
        })?;
        greet.add_command(
            "hello",
            "(HI, HELLO) name",
            |command: &CommandStructure, state: &mut DemoState| -> Executed {
                let name = command.find_matching("name").first().map(|n| n.text()).unwrap_or_default();
                state.output.push(format!("Hey {name}!"));
                Ok(())
            },
        )?;
    }

    {
        let mut count = plugin.add_namespace("count", "count")?;
        count.add_matching("number", NumberAnalyzer);
        count.add_command("up", "UP { BY number }", |c: &CommandStructure, s: &mut DemoState| -> Executed {
            s.count += step(c);
            s.output.push(s.count.to_string());
            Ok(())
        })?;
        count.add_command("down", "DOWN { BY number }", |c: &CommandStructure, s: &mut DemoState| -> Executed {
            s.count -= step(c);
            s.output.push(s.count.to_string());
            Ok(())
        })?;
        count.add_command("to", "TO number", |c: &CommandStructure, s: &mut DemoState| -> Executed {
            s.count = step(c);
            s.output.push(s.count.to_string());
            Ok(())
        })?;
        count.add_command("reset", "RESET", |_: &CommandStructure, s: &mut DemoState| -> Executed {
            s.count = 0;
            s.output.push("0".into());
            Ok(())
        })?;
    }

    {
        let mut calendar = plugin.add_namespace("calendar", "calendar")?;
        calendar
            .add_matching("month", month_analyzer())
            .set_word_analyzer_factory(TypoWordFactory)
            .add_dynamic_priority_rule(WordLengthRule::default())
            .add_dynamic_priority_rule(KeywordListRule::new("month", MONTHS, 40));
        calendar.add_command("new_year", "MOVE TO JANUARY", |_: &CommandStructure, s: &mut DemoState| -> Executed {
            s.month = Some("january".into());
            s.output.push("Happy new year!".into());
            Ok(())
        })?;
        calendar.add_command("month", "MOVE TO month", |c: &CommandStructure, s: &mut DemoState| -> Executed {
            let month = c
                .find_matching("month")
                .first()
                .and_then(|m| m.result())
                .and_then(|v| v.as_text().map(str::to_string));
            s.output.push(format!("Moved to {}", month.as_deref().unwrap_or("?")));
            s.month = month;
            Ok(())
        })?;
    }

    Ok(())
}
