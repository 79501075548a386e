//! Scenario fixtures: unique service names and definition files.
//!
//! Definition templates live under `<base_dir>/<provider>/`. Resolving a
//! template rewrites its top-level `name:` key to a fresh service name and
//! writes the result to the output directory, so repeated runs never collide
//! on the orchestrator.

use std::fmt;

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::ambient_authority;
use cap_std::fs_utf8::Dir;
use rand::Rng;
use tracing::debug;

use crate::config::DefinitionsConfig;
use crate::error::{FilesystemError, FixtureError, HarnessError};

/// Exclusive upper bound of the random service-name suffix.
pub const SERVICE_SUFFIX_BOUND: u32 = 9_999_999;

/// A per-run unique service name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ServiceName(String);

impl ServiceName {
    /// `prefix` followed by a random number below [`SERVICE_SUFFIX_BOUND`].
    #[must_use]
    pub fn generate(prefix: &str) -> Self {
        let suffix = rand::thread_rng().gen_range(0..SERVICE_SUFFIX_BOUND);
        Self::with_suffix(prefix, suffix)
    }

    /// `prefix` followed by `suffix`.
    #[must_use]
    pub fn with_suffix(prefix: &str, suffix: u32) -> Self {
        Self(format!("{prefix}{suffix}"))
    }

    /// The name as text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ServiceName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Cloud provider a definition targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// vCloud with vShield Edge routers.
    Vcloud,
    /// Amazon Web Services.
    Aws,
}

impl Provider {
    /// Template directory name under the definitions base directory.
    #[must_use]
    pub const fn dir_name(self) -> &'static str {
        match self {
            Self::Vcloud => "vcloud",
            Self::Aws => "aws",
        }
    }
}

/// Rewrite the top-level `name:` key of a definition to `service`.
///
/// Indented `name:` keys belong to nested resources and are left alone.
/// Returns `None` when no top-level key exists.
#[must_use]
pub fn render_definition(template: &str, service: &ServiceName) -> Option<String> {
    let mut replaced = false;
    let rendered: Vec<String> = template
        .split('\n')
        .map(|line| {
            if !replaced && line.starts_with("name:") {
                replaced = true;
                format!("name: {service}")
            } else {
                String::from(line)
            }
        })
        .collect();

    replaced.then(|| rendered.join("\n"))
}

/// Locates definition templates and writes rendered copies.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefinitionLibrary {
    base_dir: Utf8PathBuf,
    output_dir: Utf8PathBuf,
}

impl DefinitionLibrary {
    /// Create a library reading from `base_dir` and writing to `output_dir`.
    #[must_use]
    pub fn new(base_dir: impl Into<Utf8PathBuf>, output_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            output_dir: output_dir.into(),
        }
    }

    /// Create a library from `[definitions]` configuration.
    ///
    /// Without a configured output directory, rendered files go to
    /// `ernest-harness` under the system temporary directory.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError::IoError` when the temporary directory path
    /// is not valid UTF-8.
    pub fn from_config(config: &DefinitionsConfig) -> Result<Self, HarnessError> {
        let output_dir = match &config.output_dir {
            Some(dir) => dir.clone(),
            None => default_output_dir()?,
        };
        Ok(Self::new(config.base_dir.clone(), output_dir))
    }

    /// Directory holding the provider template directories.
    #[must_use]
    pub fn base_dir(&self) -> &Utf8Path {
        &self.base_dir
    }

    /// Directory rendered definitions are written to.
    #[must_use]
    pub fn output_dir(&self) -> &Utf8Path {
        &self.output_dir
    }

    /// Render `template` for `service` and return the rendered file's path.
    ///
    /// # Errors
    ///
    /// Returns `FilesystemError` when the template cannot be read or the
    /// rendered file cannot be written, and
    /// `FixtureError::MissingServiceName` when the template has no top-level
    /// `name:` key.
    pub fn resolve(
        &self,
        provider: Provider,
        template: &str,
        service: &ServiceName,
    ) -> Result<Utf8PathBuf, HarnessError> {
        let provider_dir = self.base_dir.join(provider.dir_name());
        let template_path = provider_dir.join(template);

        let source = Dir::open_ambient_dir(&provider_dir, ambient_authority())
            .and_then(|dir| dir.read_to_string(template))
            .map_err(|error| FilesystemError::from_io(template_path.as_std_path(), &error))?;

        let rendered = render_definition(&source, service).ok_or_else(|| {
            FixtureError::MissingServiceName {
                path: template_path.clone().into_std_path_buf(),
            }
        })?;

        let file_name = format!("{service}-{template}");
        let output_path = self.output_dir.join(&file_name);
        Dir::create_ambient_dir_all(&self.output_dir, ambient_authority())
            .and_then(|()| Dir::open_ambient_dir(&self.output_dir, ambient_authority()))
            .and_then(|dir| dir.write(&file_name, rendered))
            .map_err(|error| FilesystemError::from_io(output_path.as_std_path(), &error))?;

        debug!(template = %template_path, output = %output_path, "rendered definition");
        Ok(output_path)
    }
}

fn default_output_dir() -> Result<Utf8PathBuf, HarnessError> {
    let temp = std::env::temp_dir().join("ernest-harness");
    Utf8PathBuf::from_path_buf(temp).map_err(|path| {
        FilesystemError::IoError {
            message: String::from("temporary directory path is not valid UTF-8"),
            path,
        }
        .into()
    })
}
