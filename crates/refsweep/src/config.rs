//! YAML sweep configuration file
//!
//! ```yaml
//! tool: refines
//! tool_args: ["--format=json"]
//! template: phil.csp
//! parameters:
//!   phil: [2, 3, 4]
//! constants:
//!   phil: PHILOSOPHERS
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use refsweep_core::config::DEFAULT_PREFIX;
use refsweep_core::error::ConfigError;
use refsweep_core::exec::{DEFAULT_TOOL, DEFAULT_TOOL_ARGS, ToolCommand};
use refsweep_core::{ParameterSpec, ParameterValue, SweepConfig};
use serde::Deserialize;

/// Configuration file looked up when `--config` is not given
pub const DEFAULT_CONFIG_FILE: &str = "sweep.yaml";

/// Error types for loading a sweep file
#[derive(Debug)]
pub enum SweepFileError {
    Io(String),
    Parse(String),
    Invalid(ConfigError),
}

impl std::fmt::Display for SweepFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SweepFileError::Io(msg) => write!(f, "IO error: {}", msg),
            SweepFileError::Parse(msg) => write!(f, "Parse error: {}", msg),
            SweepFileError::Invalid(e) => write!(f, "Invalid sweep configuration: {}", e),
        }
    }
}

impl std::error::Error for SweepFileError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SweepFileError::Invalid(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SweepFileError {
    fn from(e: ConfigError) -> Self {
        SweepFileError::Invalid(e)
    }
}

fn default_tool() -> String {
    DEFAULT_TOOL.to_string()
}

fn default_tool_args() -> Vec<String> {
    DEFAULT_TOOL_ARGS.iter().map(|s| s.to_string()).collect()
}

fn default_prefix() -> String {
    DEFAULT_PREFIX.to_string()
}

/// On-disk form of a sweep definition
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepFile {
    #[serde(default = "default_tool")]
    pub tool: String,
    #[serde(default = "default_tool_args")]
    pub tool_args: Vec<String>,
    /// Template path, relative to the working directory unless absolute
    pub template: PathBuf,
    #[serde(default = "default_prefix")]
    pub prefix: String,
    #[serde(default)]
    pub strict_placeholders: bool,
    /// Parameter name to the values it takes, in sweep order
    pub parameters: IndexMap<String, Vec<ParameterValue>>,
    /// Parameter name to the template constant it drives
    #[serde(default)]
    pub constants: IndexMap<String, String>,
}

impl SweepFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, SweepFileError> {
        serde_saphyr::from_str(yaml).map_err(|e| SweepFileError::Parse(e.to_string()))
    }

    pub fn load(path: &Path) -> Result<Self, SweepFileError> {
        let content = fs::read_to_string(path)
            .map_err(|e| SweepFileError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_yaml(&content)
    }

    /// Validate the parameter tables and resolve paths against `work_dir`
    pub fn into_sweep_config(self, work_dir: &Path) -> Result<SweepConfig, SweepFileError> {
        let spec = ParameterSpec::from_maps(self.parameters, self.constants)?;
        let template = if self.template.is_absolute() {
            self.template
        } else {
            work_dir.join(self.template)
        };

        Ok(SweepConfig::new(spec, template)
            .with_tool(ToolCommand::new(self.tool, self.tool_args))
            .with_work_dir(work_dir)
            .with_prefix(self.prefix)
            .strict(self.strict_placeholders))
    }
}

/// Load `config` (or `sweep.yaml`) from `work_dir` and build the sweep config
pub fn load_sweep_config(
    work_dir: &Path,
    config: Option<&Path>,
) -> Result<SweepConfig, SweepFileError> {
    let path = match config {
        Some(p) if p.is_absolute() => p.to_path_buf(),
        Some(p) => work_dir.join(p),
        None => work_dir.join(DEFAULT_CONFIG_FILE),
    };
    SweepFile::load(&path)?.into_sweep_config(work_dir)
}
