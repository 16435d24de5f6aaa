use std::path::PathBuf;

use crate::exec::ToolCommand;

use super::ParameterSpec;

/// Default prefix for rendered configurations and their artifacts
pub const DEFAULT_PREFIX: &str = "run_";

/// Extension used for rendered files when the template has none
pub const DEFAULT_EXTENSION: &str = "csp";

/// Everything the sweep controller needs to run a sweep
#[derive(Debug, Clone)]
pub struct SweepConfig {
    /// Parameters to sweep
    pub spec: ParameterSpec,
    /// Template the configurations are rendered from
    pub template: PathBuf,
    /// External verification tool
    pub tool: ToolCommand,
    /// Directory receiving rendered files and artifacts
    pub work_dir: PathBuf,
    /// File name prefix shared by rendered files and artifacts
    pub prefix: String,
    /// Abort before any work when a constant is missing from the template
    pub strict_placeholders: bool,
}

impl SweepConfig {
    /// Config with default tool, prefix and working directory
    pub fn new(spec: ParameterSpec, template: impl Into<PathBuf>) -> Self {
        Self {
            spec,
            template: template.into(),
            tool: ToolCommand::default(),
            work_dir: PathBuf::from("."),
            prefix: DEFAULT_PREFIX.to_string(),
            strict_placeholders: false,
        }
    }

    #[must_use]
    pub fn with_tool(mut self, tool: ToolCommand) -> Self {
        self.tool = tool;
        self
    }

    #[must_use]
    pub fn with_work_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.work_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict_placeholders = strict;
        self
    }

    /// Extension for rendered files, taken from the template
    #[must_use]
    pub fn rendered_extension(&self) -> &str {
        self.template
            .extension()
            .and_then(|e| e.to_str())
            .filter(|e| !e.is_empty())
            .unwrap_or(DEFAULT_EXTENSION)
    }

    /// Path of the rendered file for a given file stem
    #[must_use]
    pub fn rendered_path(&self, stem: &str) -> PathBuf {
        self.work_dir
            .join(format!("{stem}.{}", self.rendered_extension()))
    }
}
