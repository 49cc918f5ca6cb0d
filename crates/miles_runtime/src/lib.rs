//! Plugins, dispatch and the REPL for Miles.
//!
//! This crate provides:
//! - [`Registry`] - plugin, namespace and command registration
//! - [`MatchingCore`] - the compiled engine: namespace selection, command
//!   recognition and executor dispatch
//! - [`Repl`] - interactive loop over a [`LineEditor`]
//! - [`demo`] - the plugin the `miles` binary ships with

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

pub mod config;
pub mod core;
pub mod demo;
pub mod editor;
pub mod executor;
pub mod registry;
pub mod repl;

pub use config::{NamespaceConfig, RegistryConfig};
pub use core::MatchingCore;
pub use editor::{LineEditor, ReadResult, RustylineEditor};
pub use executor::{BoxError, CommandExecutor};
pub use registry::{NamespaceBuilder, PluginBuilder, Registry};
pub use repl::{Outcome, Repl};
