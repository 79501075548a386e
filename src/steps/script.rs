//! Plain-text step scripts.
//!
//! A script holds one step per line. Blank lines, `#` comments, `@` tag
//! lines, `|` table rows and Gherkin section headers (`Feature:`,
//! `Background:`, `Scenario:`, `Examples:`) are skipped.

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;

use crate::error::{FilesystemError, HarnessError};

const HEADERS: [&str; 5] = [
    "Feature:",
    "Background:",
    "Scenario:",
    "Scenario Outline:",
    "Examples:",
];

/// Leading characters of comment, tag and table-row lines.
const SKIPPED_PREFIXES: [char; 3] = ['#', '@', '|'];

/// One executable line of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// One-based line number in the script.
    pub number: usize,
    /// Step text, trimmed.
    pub text: String,
}

/// Extract the executable lines of `script`.
#[must_use]
pub fn parse_script(script: &str) -> Vec<ScriptLine> {
    script
        .lines()
        .enumerate()
        .filter_map(|(index, raw)| {
            let text = raw.trim();
            let skipped = text.is_empty()
                || text.starts_with(SKIPPED_PREFIXES)
                || HEADERS.iter().any(|header| text.starts_with(header));
            (!skipped).then(|| ScriptLine {
                number: index + 1,
                text: String::from(text),
            })
        })
        .collect()
}

/// Read a script file.
///
/// # Errors
///
/// Returns `FilesystemError` when the file cannot be read.
pub fn read_script(path: &Utf8Path) -> Result<String, HarnessError> {
    let parent = path
        .parent()
        .filter(|dir| !dir.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let file_name = path.file_name().ok_or_else(|| FilesystemError::NotFound {
        path: path.as_std_path().to_path_buf(),
    })?;

    Dir::open_ambient_dir(parent, ambient_authority())
        .and_then(|dir| dir.read_to_string(file_name))
        .map_err(|error| FilesystemError::from_io(path.as_std_path(), &error).into())
}
