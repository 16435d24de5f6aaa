use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::model::ParameterValue;

/// A swept parameter: its permissible values and the template constant it drives
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SweepParameter {
    /// Parameter name, used in artifacts and file names
    pub name: String,
    /// Name of the constant declared in the template
    pub constant: String,
    /// Values to sweep, in order
    pub values: Vec<ParameterValue>,
}

impl SweepParameter {
    pub fn new(
        name: impl Into<String>,
        constant: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<ParameterValue>>,
    ) -> Self {
        Self {
            name: name.into(),
            constant: constant.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }
}

/// Ordered set of swept parameters.
///
/// Declaration order matters: it fixes the enumeration order of the
/// parameter space and the order of values in every assignment.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct ParameterSpec {
    parameters: Vec<SweepParameter>,
}

impl ParameterSpec {
    /// Build a spec from already-paired parameters
    pub fn new(parameters: Vec<SweepParameter>) -> Result<Self, ConfigError> {
        for (i, p) in parameters.iter().enumerate() {
            if p.constant.trim().is_empty() {
                return Err(ConfigError::EmptyConstantName(p.name.clone()));
            }
            if parameters[..i].iter().any(|q| q.name == p.name) {
                return Err(ConfigError::DuplicateParameter(p.name.clone()));
            }
        }
        Ok(Self { parameters })
    }

    /// Build a spec from a `name -> values` map and a `name -> constant` map.
    ///
    /// Both maps must have identical key sets. Order follows `values`.
    pub fn from_maps(
        values: IndexMap<String, Vec<ParameterValue>>,
        mut constants: IndexMap<String, String>,
    ) -> Result<Self, ConfigError> {
        let missing_constants: Vec<String> = values
            .keys()
            .filter(|k| !constants.contains_key(*k))
            .cloned()
            .collect();
        let unknown_parameters: Vec<String> = constants
            .keys()
            .filter(|k| !values.contains_key(*k))
            .cloned()
            .collect();
        if !missing_constants.is_empty() || !unknown_parameters.is_empty() {
            return Err(ConfigError::MismatchedKeys {
                missing_constants,
                unknown_parameters,
            });
        }

        let parameters = values
            .into_iter()
            .map(|(name, values)| {
                let constant = constants.shift_remove(&name).unwrap_or_default();
                SweepParameter {
                    name,
                    constant,
                    values,
                }
            })
            .collect();
        Self::new(parameters)
    }

    /// Start a fluent spec definition
    #[must_use]
    pub fn builder() -> ParameterSpecBuilder {
        ParameterSpecBuilder::default()
    }

    #[must_use]
    pub fn parameters(&self) -> &[SweepParameter] {
        &self.parameters
    }

    /// Number of values for each parameter, in declaration order
    #[must_use]
    pub fn grid_shape(&self) -> Vec<usize> {
        self.parameters.iter().map(|p| p.values.len()).collect()
    }

    /// Total number of assignments in the Cartesian product
    #[must_use]
    pub fn total_points(&self) -> usize {
        self.parameters.iter().map(|p| p.values.len()).product()
    }
}

/// Fluent builder for [`ParameterSpec`]
#[derive(Debug, Default)]
pub struct ParameterSpecBuilder {
    parameters: Vec<SweepParameter>,
}

impl ParameterSpecBuilder {
    /// Add a parameter driving `constant` over `values`
    #[must_use]
    pub fn parameter(
        mut self,
        name: impl Into<String>,
        constant: impl Into<String>,
        values: impl IntoIterator<Item = impl Into<ParameterValue>>,
    ) -> Self {
        self.parameters
            .push(SweepParameter::new(name, constant, values));
        self
    }

    pub fn build(self) -> Result<ParameterSpec, ConfigError> {
        ParameterSpec::new(self.parameters)
    }
}
