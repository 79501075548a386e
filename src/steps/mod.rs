//! Human-readable scenario steps.
//!
//! Steps are matched against an explicit table of templates. Each `{}` in a
//! template captures at least one character; captures other than the last
//! end at the first occurrence of the following literal text. Leading
//! Gherkin keywords (`Given`, `When`, `Then`, `And`, `But`) are ignored.

mod context;
mod script;

pub use context::ScenarioContext;
pub use script::{ScriptLine, parse_script, read_script};

use crate::error::StepError;

/// A parsed scenario step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Point the CLI at an ernest instance. A configured target wins.
    Target(String),
    /// Log in with a user name and password.
    Login {
        /// User name.
        user: String,
        /// Password.
        password: String,
    },
    /// Run the CLI with whitespace-separated arguments.
    Run(String),
    /// The last output contains the text.
    OutputContains(String),
    /// The last output does not contain the text.
    OutputNotContains(String),
    /// End the CLI session.
    Logout,
    /// Run the CLI with the text as a single argument.
    EnterText(String),
    /// Delete a group through the control plane.
    GroupAbsent(String),
    /// Delete a user through the control plane.
    UserAbsent(String),
    /// Delete a datacenter through the control plane.
    DatacenterAbsent(String),
    /// Delete a service through the control plane.
    ServiceAbsent(String),
    /// Recreate a group through the control plane.
    GroupExists(String),
    /// Recreate a user through the control plane.
    UserExists(String),
    /// Recreate a datacenter through the control plane.
    DatacenterExists(String),
    /// Rows of the users table naming the user show the group.
    UserInGroup {
        /// User name.
        user: String,
        /// Group name.
        group: String,
    },
    /// Rows of the datacenters table naming the datacenter show the group.
    DatacenterInGroup {
        /// Datacenter name.
        datacenter: String,
        /// Group name.
        group: String,
    },
    /// Zero-based line `number` of the last output contains the text.
    LineContains {
        /// Line index.
        number: usize,
        /// Expected text.
        needle: String,
    },
}

#[derive(Debug, Clone, Copy)]
enum StepKind {
    Target,
    Login,
    Run,
    OutputContains,
    OutputNotContains,
    Logout,
    EnterText,
    GroupAbsent,
    UserAbsent,
    DatacenterAbsent,
    ServiceAbsent,
    GroupExists,
    UserExists,
    DatacenterExists,
    UserInGroup,
    DatacenterInGroup,
    LineContains,
}

const STEP_TABLE: &[(&str, StepKind)] = &[
    (r#"I setup ernest with target "{}""#, StepKind::Target),
    (r#"I'm logged in as "{}" / "{}""#, StepKind::Login),
    (r#"I run ernest with "{}""#, StepKind::Run),
    (r#"The output should contain "{}""#, StepKind::OutputContains),
    (r#"The output should not contain "{}""#, StepKind::OutputNotContains),
    ("I logout", StepKind::Logout),
    (r#"I enter text "{}""#, StepKind::EnterText),
    (r#"the group "{}" does not exist"#, StepKind::GroupAbsent),
    (r#"the user "{}" does not exist"#, StepKind::UserAbsent),
    (r#"the datacenter "{}" does not exist"#, StepKind::DatacenterAbsent),
    (r#"the service "{}" does not exist"#, StepKind::ServiceAbsent),
    (r#"the group "{}" exists"#, StepKind::GroupExists),
    (r#"the user "{}" exists"#, StepKind::UserExists),
    (r#"the datacenter "{}" exists"#, StepKind::DatacenterExists),
    (
        r#"The output users table should contain "{}" assigned to "{}" group"#,
        StepKind::UserInGroup,
    ),
    (
        r#"The output datacenters table should contain "{}" assigned to "{}" group"#,
        StepKind::DatacenterInGroup,
    ),
    (
        r#"The output line number "{}" should contain "{}""#,
        StepKind::LineContains,
    ),
];

const KEYWORDS: [&str; 6] = ["Given ", "When ", "Then ", "And ", "But ", "* "];

/// The step templates, in matching order.
pub fn templates() -> impl Iterator<Item = &'static str> {
    STEP_TABLE.iter().map(|(template, _)| *template)
}

/// Remove surrounding whitespace and one leading Gherkin keyword.
#[must_use]
pub fn strip_keyword(text: &str) -> &str {
    let trimmed = text.trim();
    KEYWORDS
        .iter()
        .find_map(|keyword| trimmed.strip_prefix(keyword))
        .map_or(trimmed, str::trim_start)
}

/// Match `text` against `template`, returning the captures.
fn match_template(template: &str, text: &str) -> Option<Vec<String>> {
    let mut literals = template.split("{}");
    let first = literals.next()?;
    let mut rest = text.strip_prefix(first)?;
    let remaining: Vec<&str> = literals.collect();
    let Some((last, middle)) = remaining.split_last() else {
        return rest.is_empty().then(Vec::new);
    };

    let mut captures = Vec::with_capacity(remaining.len());
    for literal in middle {
        let (capture, after) = split_non_empty(rest, literal)?;
        captures.push(String::from(capture));
        rest = after;
    }

    let capture = rest.strip_suffix(last)?;
    if capture.is_empty() {
        return None;
    }
    captures.push(String::from(capture));
    Some(captures)
}

/// Split at the first occurrence of `literal` that leaves a non-empty head.
fn split_non_empty<'a>(text: &'a str, literal: &str) -> Option<(&'a str, &'a str)> {
    let start = text.char_indices().nth(1).map(|(index, _)| index)?;
    let tail = text.get(start..)?;
    let offset = tail.find(literal)?;
    let head = text.get(..start + offset)?;
    let after = tail.get(offset + literal.len()..)?;
    Some((head, after))
}

impl Step {
    /// Parse a step from its human-readable text.
    ///
    /// # Errors
    ///
    /// Returns `StepError::UnknownStep` when no template matches, or
    /// `StepError::InvalidArgument` when a line number is not numeric.
    pub fn parse(text: &str) -> Result<Self, StepError> {
        let body = strip_keyword(text);
        STEP_TABLE
            .iter()
            .find_map(|(template, kind)| {
                match_template(template, body).map(|captures| (*kind, captures))
            })
            .ok_or_else(|| StepError::UnknownStep {
                text: String::from(body),
            })
            .and_then(|(kind, captures)| build(kind, body, captures))
    }
}

fn build(kind: StepKind, text: &str, captures: Vec<String>) -> Result<Step, StepError> {
    let mut values = captures.into_iter();
    let mut next = || values.next().unwrap_or_default();

    let step = match kind {
        StepKind::Target => Step::Target(next()),
        StepKind::Login => Step::Login {
            user: next(),
            password: next(),
        },
        StepKind::Run => Step::Run(next()),
        StepKind::OutputContains => Step::OutputContains(next()),
        StepKind::OutputNotContains => Step::OutputNotContains(next()),
        StepKind::Logout => Step::Logout,
        StepKind::EnterText => Step::EnterText(next()),
        StepKind::GroupAbsent => Step::GroupAbsent(next()),
        StepKind::UserAbsent => Step::UserAbsent(next()),
        StepKind::DatacenterAbsent => Step::DatacenterAbsent(next()),
        StepKind::ServiceAbsent => Step::ServiceAbsent(next()),
        StepKind::GroupExists => Step::GroupExists(next()),
        StepKind::UserExists => Step::UserExists(next()),
        StepKind::DatacenterExists => Step::DatacenterExists(next()),
        StepKind::UserInGroup => Step::UserInGroup {
            user: next(),
            group: next(),
        },
        StepKind::DatacenterInGroup => Step::DatacenterInGroup {
            datacenter: next(),
            group: next(),
        },
        StepKind::LineContains => {
            let raw = next();
            let number = raw.parse().map_err(|_| StepError::InvalidArgument {
                text: String::from(text),
                value: raw.clone(),
                reason: String::from("line number must be a non-negative integer"),
            })?;
            Step::LineContains {
                number,
                needle: next(),
            }
        }
    };
    Ok(step)
}
