//! Interactive command loop.

use std::io::{self, Write};
use std::path::Path;

use miles_foundation::{Error, ErrorKind, Flags, Result};
use miles_recognizer::CommandStructure;

use crate::core::MatchingCore;
use crate::editor::{LineEditor, ReadResult, RustylineEditor};

/// What one line of input did.
#[derive(Debug)]
pub enum Outcome {
    /// A command was recognized and executed.
    Executed(CommandStructure),
    /// A REPL command printed something.
    Message(String),
    /// Nothing to do.
    Empty,
    /// The user asked to leave.
    Quit,
}

type Reporter<C> = Box<dyn FnMut(&mut C)>;

/// Reads lines, recognizes them and runs the matching executors.
pub struct Repl<C, E: LineEditor = RustylineEditor> {
    editor: E,
    core: MatchingCore<C>,
    context: C,
    flags: Flags,
    namespace: Option<String>,
    reporter: Option<Reporter<C>>,
    show_banner: bool,
    prompt: String,
}

impl<C> Repl<C, RustylineEditor> {
    /// Creates a REPL on the terminal.
    ///
    /// # Errors
    ///
    /// Returns an error if the editor fails to initialize.
    pub fn new(core: MatchingCore<C>, context: C) -> Result<Self> {
        let editor = RustylineEditor::new()?;
        Ok(Self::with_editor(editor, core, context))
    }
}

impl<C, E: LineEditor> Repl<C, E> {
    /// Creates a REPL with the given editor.
    pub fn with_editor(mut editor: E, core: MatchingCore<C>, context: C) -> Self {
        editor.set_vocabulary(core.vocabulary());
        Self {
            editor,
            core,
            context,
            flags: Flags::new().with("source", "text"),
            namespace: None,
            reporter: None,
            show_banner: true,
            prompt: "miles> ".to_string(),
        }
    }

    /// Disables the welcome banner.
    #[must_use]
    pub fn without_banner(mut self) -> Self {
        self.show_banner = false;
        self
    }

    /// Sets the prompt.
    #[must_use]
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Recognizes every line in one namespace instead of by prefix.
    #[must_use]
    pub fn with_namespace(mut self, namespace: impl Into<String>) -> Self {
        self.namespace = Some(namespace.into());
        self
    }

    /// Calls `reporter` with the context after every executed command.
    #[must_use]
    pub fn with_reporter(mut self, reporter: impl FnMut(&mut C) + 'static) -> Self {
        self.reporter = Some(Box::new(reporter));
        self
    }

    /// The executor context.
    #[must_use]
    pub fn context(&self) -> &C {
        &self.context
    }

    /// The engine.
    #[must_use]
    pub fn core(&self) -> &MatchingCore<C> {
        &self.core
    }

    /// Runs until end of input or `:quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal fails.
    pub fn run(&mut self) -> Result<()> {
        if self.show_banner {
            self.print_banner();
        }
        loop {
            let line = match self.editor.read_line(&self.prompt)? {
                ReadResult::Line(line) => line,
                ReadResult::Interrupted => continue,
                ReadResult::Eof => break,
            };
            if !line.trim().is_empty() {
                self.editor.add_history(&line);
            }
            match self.eval(&line) {
                Ok(Outcome::Executed(structure)) => {
                    println!("\x1b[1m{structure}\x1b[0m");
                    self.report();
                }
                Ok(Outcome::Message(message)) => println!("{message}"),
                Ok(Outcome::Empty) => {}
                Ok(Outcome::Quit) => break,
                Err(e) => print_error(&e),
            }
        }
        println!("\nGoodbye!");
        Ok(())
    }

    /// Handles one line.
    ///
    /// # Errors
    ///
    /// Returns recognition and executor errors.
    pub fn eval(&mut self, line: &str) -> Result<Outcome> {
        let line = line.trim();
        match line {
            "" => Ok(Outcome::Empty),
            ":quit" | ":q" => Ok(Outcome::Quit),
            ":help" => Ok(Outcome::Message(HELP.to_string())),
            ":namespaces" => {
                let listing: Vec<String> = self
                    .core
                    .namespaces()
                    .map(|(id, prefix)| format!("{id}: {}", prefix.join(" ")))
                    .collect();
                Ok(Outcome::Message(listing.join("\n")))
            }
            text => {
                let structure = self.core.recognize_and_execute(
                    text,
                    self.namespace.as_deref(),
                    &mut self.context,
                    &self.flags,
                )?;
                Ok(Outcome::Executed(structure))
            }
        }
    }

    /// Evaluates every line of a script. Blank lines and lines starting
    /// with `#` are skipped. Stops at the first failing line or `:quit`.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, or the first line's
    /// error, prefixed with its line number.
    pub fn eval_file(&mut self, path: &Path) -> Result<()> {
        let script = std::fs::read_to_string(path)
            .map_err(|e| Error::new(ErrorKind::Internal(format!("{}: {e}", path.display()))))?;
        self.eval_script(&script)
    }

    /// Evaluates a script held in memory. See [`Repl::eval_file`].
    ///
    /// # Errors
    ///
    /// Returns the first failing line's error.
    pub fn eval_script(&mut self, script: &str) -> Result<()> {
        for (number, line) in script.lines().enumerate() {
            if line.trim_start().starts_with('#') {
                continue;
            }
            match self.eval(line) {
                Ok(Outcome::Executed(_)) => self.report(),
                Ok(Outcome::Message(message)) => println!("{message}"),
                Ok(Outcome::Empty) => {}
                Ok(Outcome::Quit) => break,
                Err(e) => {
                    return Err(Error::new(ErrorKind::Internal(format!("line {}: {e}", number + 1))));
                }
            }
        }
        Ok(())
    }

    fn report(&mut self) {
        if let Some(reporter) = self.reporter.as_mut() {
            reporter(&mut self.context);
        }
    }

    #[allow(clippy::unused_self)]
    fn print_banner(&self) {
        println!("\x1b[1;36mmiles\x1b[0m v{}", env!("CARGO_PKG_VERSION"));
        println!("Type a command, :help for help, :quit to exit.\n");
        let _ = io::stdout().flush();
    }
}

fn print_error(error: &Error) {
    eprintln!("\x1b[31m{error}\x1b[0m");
}

const HELP: &str = ":namespaces  list namespaces and their prefixes
:help        show this help
:quit        exit";
