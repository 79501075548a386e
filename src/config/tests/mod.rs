//! Unit tests for harness configuration types.
//!
//! - [`helpers`] - Shared fixtures and helper functions
//! - [`types_tests`] - Basic type, serialisation and validation tests
//! - [`layer_precedence_tests`] - `MergeComposer` layer precedence tests

mod helpers;
