//! Where `bto run` gets its history from.

use std::path::PathBuf;
use std::{fmt, fs, io};

use bto_core::Scenario;
use bto_parser::{parse_operations, parse_scenarios, ParseError};
use bto_testgen::generator::History;
use derive_more::From;

use crate::{catalog, RunArgs};

#[derive(Debug, From)]
pub enum SourceError {
    #[from]
    Parse(ParseError),
    Read { path: PathBuf, source: io::Error },
    Json { path: PathBuf, source: serde_json::Error },
    UnknownScenario { key: String },
    EmptyCatalog { path: PathBuf },
    MissingSource,
}

impl fmt::Display for SourceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Parse(err) => write!(f, "{err}"),
            Self::Read { path, source } => write!(f, "failed to read {}: {source}", path.display()),
            Self::Json { path, source } => {
                write!(f, "failed to parse {}: {source}", path.display())
            }
            Self::UnknownScenario { key } => write!(f, "unknown scenario `{key}`"),
            Self::EmptyCatalog { path } => write!(f, "{} defines no scenarios", path.display()),
            Self::MissingSource => {
                f.write_str("one of --scenario, --file, --ops or --history is required")
            }
        }
    }
}

impl std::error::Error for SourceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Parse(err) => Some(err),
            Self::Read { source, .. } => Some(source),
            Self::Json { source, .. } => Some(source),
            _ => None,
        }
    }
}

/// Resolve the history selected by `args`.
///
/// # Errors
///
/// Returns a [`SourceError`] if the selected history cannot be read, parsed
/// or found.
pub fn resolve(args: &RunArgs) -> Result<Scenario, SourceError> {
    if let Some(key) = &args.scenario {
        let scenarios = catalog::builtin()?;
        return catalog::find(&scenarios, key)
            .cloned()
            .ok_or_else(|| SourceError::UnknownScenario { key: key.clone() });
    }
    if let Some(path) = &args.file {
        let text = read(path)?;
        return select(parse_scenarios(&text)?, path, args.name.as_deref());
    }
    if let Some(path) = &args.history {
        let text = read(path)?;
        let history: History =
            serde_json::from_str(&text).map_err(|source| SourceError::Json {
                path: path.clone(),
                source,
            })?;
        return Ok(from_generated(&history));
    }
    if let Some(text) = &args.ops {
        return Ok(Scenario::new("custom", parse_operations(text)?).with_title("Custom history"));
    }
    Err(SourceError::MissingSource)
}

fn read(path: &std::path::Path) -> Result<String, SourceError> {
    fs::read_to_string(path).map_err(|source| SourceError::Read {
        path: path.to_path_buf(),
        source,
    })
}

/// A history written by `bto generate`, keyed by its id.
#[must_use]
pub fn from_generated(history: &History) -> Scenario {
    let params = history.get_params();
    Scenario::new(format!("generated-{}", history.get_id()), history.get_data().clone()).with_title(
        format!(
            "Generated history {} ({} transactions, {} items)",
            params.id, params.n_transaction, params.n_item
        ),
    )
}

fn select(
    scenarios: Vec<Scenario>,
    path: &std::path::Path,
    name: Option<&str>,
) -> Result<Scenario, SourceError> {
    match name {
        Some(key) => scenarios
            .into_iter()
            .find(|scenario| scenario.key == key)
            .ok_or_else(|| SourceError::UnknownScenario {
                key: key.to_string(),
            }),
        None => scenarios
            .into_iter()
            .next()
            .ok_or_else(|| SourceError::EmptyCatalog {
                path: path.to_path_buf(),
            }),
    }
}
