use std::fmt;
use std::io;
use std::path::PathBuf;

/// Errors raised while building a sweep configuration
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The parameter and constant mappings do not share the same key set
    MismatchedKeys {
        /// Parameters with no template constant
        missing_constants: Vec<String>,
        /// Constants bound to a parameter that does not exist
        unknown_parameters: Vec<String>,
    },
    /// A parameter is bound to an empty constant name
    EmptyConstantName(String),
    /// A parameter name is declared twice
    DuplicateParameter(String),
    /// A constant name cannot be turned into a declaration pattern
    InvalidConstant { name: String, reason: String },
    /// Two assignments render to the same file name
    FileNameCollision {
        file: String,
        first: usize,
        second: usize,
    },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::MismatchedKeys {
                missing_constants,
                unknown_parameters,
            } => {
                write!(f, "parameter and constant maps differ")?;
                if !missing_constants.is_empty() {
                    write!(f, "; no constant for: {}", missing_constants.join(", "))?;
                }
                if !unknown_parameters.is_empty() {
                    write!(
                        f,
                        "; constants for unknown parameters: {}",
                        unknown_parameters.join(", ")
                    )?;
                }
                Ok(())
            }
            ConfigError::EmptyConstantName(name) => {
                write!(f, "parameter {name:?} is bound to an empty constant name")
            }
            ConfigError::DuplicateParameter(name) => {
                write!(f, "parameter {name:?} is declared more than once")
            }
            ConfigError::InvalidConstant { name, reason } => {
                write!(f, "invalid constant name {name:?}: {reason}")
            }
            ConfigError::FileNameCollision {
                file,
                first,
                second,
            } => write!(
                f,
                "assignments {first} and {second} would both be written to {file:?}"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors from launching or waiting on the external tool
#[derive(Debug)]
pub enum ExecError {
    /// The tool could not be started at all
    Launch { program: String, source: io::Error },
    /// Waiting on or killing the child failed
    Wait(io::Error),
}

impl fmt::Display for ExecError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecError::Launch { program, source } => {
                write!(f, "failed to launch `{program}`: {source}")
            }
            ExecError::Wait(e) => write!(f, "failed while waiting on tool process: {e}"),
        }
    }
}

impl std::error::Error for ExecError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExecError::Launch { source, .. } => Some(source),
            ExecError::Wait(e) => Some(e),
        }
    }
}

/// Error types for artifact storage operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    Io(String),
    Parse(String),
    Serialize(String),
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StoreError::Io(msg) => write!(f, "IO error: {msg}"),
            StoreError::Parse(msg) => write!(f, "Parse error: {msg}"),
            StoreError::Serialize(msg) => write!(f, "Serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StoreError {}

/// Errors that end a sweep.
///
/// Per-run outcomes (tool errors, malformed output, runs without assertions)
/// are not errors at this level; see [`crate::collect::RunOutcome`].
#[derive(Debug)]
pub enum SweepError {
    Config(ConfigError),
    /// Resume index outside `[0, total)`
    InvalidStartIndex { start: i64, total: usize },
    /// Template file missing or unreadable
    MissingTemplate { path: PathBuf, reason: String },
    /// Constants absent from the template while strict placeholders are on
    MissingPlaceholder { constants: Vec<String> },
    Exec(ExecError),
    /// Writing a rendered configuration failed
    Io { path: PathBuf, source: io::Error },
    Store(StoreError),
    /// Sweep interrupted while at the given index
    Cancelled { index: usize },
}

impl fmt::Display for SweepError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SweepError::Config(e) => write!(f, "configuration error: {e}"),
            SweepError::InvalidStartIndex { start, total } => write!(
                f,
                "start index {start} is out of range (total combinations: {total})"
            ),
            SweepError::MissingTemplate { path, reason } => {
                write!(f, "template file '{}' not found: {reason}", path.display())
            }
            SweepError::MissingPlaceholder { constants } => write!(
                f,
                "template does not declare constant(s): {}",
                constants.join(", ")
            ),
            SweepError::Exec(e) => write!(f, "{e}"),
            SweepError::Io { path, source } => {
                write!(f, "failed to write {}: {source}", path.display())
            }
            SweepError::Store(e) => write!(f, "{e}"),
            SweepError::Cancelled { index } => write!(f, "sweep cancelled at index {index}"),
        }
    }
}

impl std::error::Error for SweepError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepError::Config(e) => Some(e),
            SweepError::Exec(e) => Some(e),
            SweepError::Io { source, .. } => Some(source),
            SweepError::Store(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SweepError {
    fn from(err: ConfigError) -> Self {
        SweepError::Config(err)
    }
}

impl From<ExecError> for SweepError {
    fn from(err: ExecError) -> Self {
        SweepError::Exec(err)
    }
}

impl From<StoreError> for SweepError {
    fn from(err: StoreError) -> Self {
        SweepError::Store(err)
    }
}
