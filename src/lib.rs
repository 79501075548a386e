//! Acceptance-test harness for the ernest orchestrator.
//!
//! `ernest-harness` drives the orchestrator from the outside, the way an
//! operator would. It runs the external `ernest-cli` binary, watches the
//! message bus for the resource events the orchestrator publishes in
//! response, and asserts on both.
//!
//! A scenario typically subscribes to the subjects it expects, invokes the
//! CLI with a freshly rendered definition file, waits for each message with
//! a timeout, decodes the payload into a typed event and compares literal
//! field values.
//!
//! # Modules
//!
//! - [`bus`]: Subscriptions, waits and control-plane requests over NATS or an
//!   in-process broker
//! - [`config`]: Configuration system with layered precedence (CLI > env > file > defaults)
//! - [`error`]: Semantic error types for the harness
//! - [`events`]: Event payloads published by the orchestrator
//! - [`fixtures`]: Unique service names and definition files
//! - [`invoker`]: Running the external CLI and capturing its output
//! - [`output`]: Assertions over captured CLI output
//! - [`steps`]: Human-readable scenario steps and per-scenario state

pub mod bus;
pub mod config;
pub mod error;
pub mod events;
pub mod fixtures;
pub mod invoker;
pub mod output;
pub mod steps;
