//! Integration tests for Layer 4: Runtime
//!
//! Tests for registration, namespace dispatch, executors, the demo plugin
//! and the REPL.

mod demo;
mod dispatch;
mod registration;
