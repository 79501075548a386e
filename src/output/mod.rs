//! Assertions over captured CLI output.
//!
//! Output is split on `\n` only, so a trailing newline produces a final empty
//! line. Expected-line checks are sparse: an empty expectation matches any
//! line, and actual lines beyond the expected list are ignored.

use std::collections::BTreeMap;

use crate::error::StepError;

/// Split `output` into lines on `\n`.
#[must_use]
pub fn split_lines(output: &str) -> Vec<&str> {
    output.split('\n').collect()
}

/// Compare `actual` lines against sparse `expected` lines.
///
/// `None` and empty expectations are wildcards. A non-empty expectation past
/// the end of `actual` fails.
#[must_use]
pub fn check_output(actual: &[&str], expected: &[Option<&str>]) -> bool {
    first_mismatch(actual, expected).is_none()
}

fn first_mismatch(actual: &[&str], expected: &[Option<&str>]) -> Option<usize> {
    expected
        .iter()
        .enumerate()
        .filter_map(|(index, line)| line.filter(|text| !text.is_empty()).map(|text| (index, text)))
        .find(|(index, text)| actual.get(*index).is_none_or(|line| line != text))
        .map(|(index, _)| index)
}

/// Sparse expected output built line by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExpectedLines {
    lines: BTreeMap<usize, String>,
}

impl ExpectedLines {
    /// An expectation that matches any output.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Require line `index` to equal `text` exactly.
    #[must_use]
    pub fn line(mut self, index: usize, text: impl Into<String>) -> Self {
        self.lines.insert(index, text.into());
        self
    }

    /// Index of the first expected line that does not match `actual`.
    #[must_use]
    pub fn first_mismatch(&self, actual: &[&str]) -> Option<usize> {
        self.lines
            .iter()
            .filter(|(_, text)| !text.is_empty())
            .find(|(index, text)| actual.get(**index).is_none_or(|line| line != text))
            .map(|(index, _)| *index)
    }

    /// Whether `actual` satisfies every pinned line.
    #[must_use]
    pub fn matches(&self, actual: &[&str]) -> bool {
        self.first_mismatch(actual).is_none()
    }

    fn pinned(&self, index: usize) -> &str {
        self.lines.get(&index).map_or("", String::as_str)
    }
}

/// Whether sparse expected-line checks are enforced.
///
/// Enforcement is off unless strict output checking is configured, so the
/// same scenarios run against CLI builds whose wording has drifted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputPolicy {
    /// Enforce expected-line checks.
    pub strict: bool,
}

impl OutputPolicy {
    /// Verify `output` against `expected` when the policy is strict.
    ///
    /// # Errors
    ///
    /// Returns `StepError::AssertionFailed` naming the first mismatched line.
    pub fn verify(self, output: &str, expected: &ExpectedLines) -> Result<(), StepError> {
        if !self.strict {
            return Ok(());
        }
        let actual = split_lines(output);
        match expected.first_mismatch(&actual) {
            None => Ok(()),
            Some(index) => Err(StepError::AssertionFailed {
                message: format!(
                    "line {index} is {:?}, expected {:?}",
                    actual.get(index).copied().unwrap_or_default(),
                    expected.pinned(index)
                ),
            }),
        }
    }
}

/// Require `output` to contain `needle`.
///
/// # Errors
///
/// Returns `StepError::AssertionFailed` quoting the output.
pub fn contains(output: &str, needle: &str) -> Result<(), StepError> {
    if output.contains(needle) {
        Ok(())
    } else {
        Err(StepError::AssertionFailed {
            message: format!("output should contain {needle:?} but was:\n{output}"),
        })
    }
}

/// Require `output` not to contain `needle`.
///
/// # Errors
///
/// Returns `StepError::AssertionFailed` quoting the output.
pub fn not_contains(output: &str, needle: &str) -> Result<(), StepError> {
    if output.contains(needle) {
        Err(StepError::AssertionFailed {
            message: format!("output should not contain {needle:?} but was:\n{output}"),
        })
    } else {
        Ok(())
    }
}

/// Require `output` to equal `expected` exactly, trailing newline included.
///
/// # Errors
///
/// Returns `StepError::AssertionFailed` quoting both texts.
pub fn equals(output: &str, expected: &str) -> Result<(), StepError> {
    if output == expected {
        Ok(())
    } else {
        Err(StepError::AssertionFailed {
            message: format!("output should be {expected:?} but was {output:?}"),
        })
    }
}

/// Require `output` to end with `suffix`.
///
/// # Errors
///
/// Returns `StepError::AssertionFailed` quoting the output.
pub fn ends_with(output: &str, suffix: &str) -> Result<(), StepError> {
    if output.ends_with(suffix) {
        Ok(())
    } else {
        Err(StepError::AssertionFailed {
            message: format!("output should end with {suffix:?} but was {output:?}"),
        })
    }
}

/// Require every table row mentioning `item` to show it in `group`.
///
/// A row belongs to the group when it contains `| <group>`. At least one
/// row must mention `item`.
///
/// # Errors
///
/// Returns `StepError::AssertionFailed` for a missing item or the first row
/// assigned to another group.
pub fn table_row(output: &str, item: &str, group: &str) -> Result<(), StepError> {
    let column = format!("| {group}");
    let mut rows = split_lines(output)
        .into_iter()
        .filter(|line| line.contains(item))
        .peekable();

    if rows.peek().is_none() {
        return Err(StepError::AssertionFailed {
            message: format!("no table row mentions {item:?}:\n{output}"),
        });
    }

    match rows.find(|row| !row.contains(&column)) {
        Some(row) => Err(StepError::AssertionFailed {
            message: format!("{item:?} does not seem to belong to group {group:?}:\n{row}"),
        }),
        None => Ok(()),
    }
}

/// Require zero-based line `number` of `output` to contain `needle`.
///
/// # Errors
///
/// Returns `StepError::AssertionFailed` when the output is too short or the
/// line lacks `needle`.
pub fn line_contains(output: &str, number: usize, needle: &str) -> Result<(), StepError> {
    let lines = split_lines(output);
    match lines.get(number) {
        None => Err(StepError::AssertionFailed {
            message: format!("output has only {} lines:\n{output}", lines.len()),
        }),
        Some(line) if line.contains(needle) => Ok(()),
        Some(_) => Err(StepError::AssertionFailed {
            message: format!("line {number} should contain {needle:?}:\n{output}"),
        }),
    }
}
