//! Placeholder substitution for configuration templates.
//!
//! A template is opaque text containing `NAME = VALUE` declarations. Rendering
//! rewrites only the `VALUE` token of each swept constant and leaves every
//! other byte alone.

use std::fs;
use std::path::Path;

use regex::{Captures, Regex};

use crate::config::ParameterSpec;
use crate::error::{ConfigError, SweepError};
use crate::model::ParameterAssignment;

/// Template text loaded from disk
#[derive(Debug, Clone)]
pub struct Template {
    text: String,
}

impl Template {
    /// Read a template file.
    ///
    /// A missing or unreadable file is reported as
    /// [`SweepError::MissingTemplate`].
    pub fn load(path: &Path) -> Result<Self, SweepError> {
        let text = fs::read_to_string(path).map_err(|e| SweepError::MissingTemplate {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;
        Ok(Self { text })
    }

    #[must_use]
    pub fn text(&self) -> &str {
        &self.text
    }
}

#[derive(Debug, Clone)]
struct Rule {
    parameter: String,
    constant: String,
    pattern: Regex,
}

/// Substitutes assignment values into template declarations.
///
/// One pattern is compiled per constant when the renderer is built and
/// reused for every assignment of the sweep.
#[derive(Debug, Clone)]
pub struct TemplateRenderer {
    rules: Vec<Rule>,
}

impl TemplateRenderer {
    pub fn new(spec: &ParameterSpec) -> Result<Self, ConfigError> {
        let rules = spec
            .parameters()
            .iter()
            .map(|p| {
                let source = format!(r"\b({}\s*=\s*)[0-9A-Za-z._]+", regex::escape(&p.constant));
                let pattern = Regex::new(&source).map_err(|e| ConfigError::InvalidConstant {
                    name: p.constant.clone(),
                    reason: e.to_string(),
                })?;
                Ok(Rule {
                    parameter: p.name.clone(),
                    constant: p.constant.clone(),
                    pattern,
                })
            })
            .collect::<Result<Vec<_>, ConfigError>>()?;
        Ok(Self { rules })
    }

    /// Render `template` for one assignment.
    ///
    /// Parameters are applied in assignment order, each on the output of the
    /// previous one. Every declaration of a constant is rewritten; a constant
    /// that never appears leaves the text unchanged.
    #[must_use]
    pub fn render(&self, template: &str, assignment: &ParameterAssignment) -> String {
        let mut text = template.to_string();
        for (name, value) in assignment.iter() {
            let Some(rule) = self.rules.iter().find(|r| r.parameter == name) else {
                continue;
            };
            let value = value.to_string();
            text = rule
                .pattern
                .replace_all(&text, |caps: &Captures| format!("{}{}", &caps[1], value))
                .into_owned();
        }
        text
    }

    /// Constants with no declaration in `template`, in declaration order
    #[must_use]
    pub fn missing_constants(&self, template: &str) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| !r.pattern.is_match(template))
            .map(|r| r.constant.clone())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ParameterValue;

    fn renderer(pairs: &[(&str, &str)]) -> TemplateRenderer {
        let mut builder = ParameterSpec::builder();
        for (name, constant) in pairs {
            builder = builder.parameter(*name, *constant, [0_i64]);
        }
        TemplateRenderer::new(&builder.build().unwrap()).unwrap()
    }

    fn assign(pairs: &[(&str, ParameterValue)]) -> ParameterAssignment {
        pairs.iter().cloned().collect()
    }

    #[test]
    fn test_rewrites_only_the_value_token() {
        let r = renderer(&[("phil", "PHILOSOPHERS")]);
        let template = "-- model\nPHILOSOPHERS  =   5 -- count\nassert P [T= Q\n";
        let out = r.render(template, &assign(&[("phil", ParameterValue::Int(12))]));
        assert_eq!(out, "-- model\nPHILOSOPHERS  =   12 -- count\nassert P [T= Q\n");
    }

    #[test]
    fn test_whole_word_and_every_occurrence() {
        let r = renderer(&[("n", "N")]);
        let template = "N = 1\nMAXN = 9\nN=old.value_2\nif N == 1 then";
        let out = r.render(template, &assign(&[("n", ParameterValue::Int(4))]));
        assert_eq!(out, "N = 4\nMAXN = 9\nN=4\nif N == 1 then");
    }

    #[test]
    fn test_sequential_substitution() {
        let r = renderer(&[("a", "A"), ("b", "B")]);
        let template = "A = 1\nB = 2\n";
        let out = r.render(
            template,
            &assign(&[
                ("a", ParameterValue::from("x")),
                ("b", ParameterValue::Float(2.5)),
            ]),
        );
        assert_eq!(out, "A = x\nB = 2.5\n");
    }

    #[test]
    fn test_missing_constant_leaves_text_unchanged() {
        let r = renderer(&[("n", "N"), ("k", "K")]);
        let template = "N = 1\n";
        assert_eq!(r.missing_constants(template), vec!["K".to_string()]);

        let out = r.render(
            template,
            &assign(&[("n", ParameterValue::Int(2)), ("k", ParameterValue::Int(3))]),
        );
        assert_eq!(out, "N = 2\n");
    }

    #[test]
    fn test_rendering_is_repeatable() {
        let r = renderer(&[("n", "N")]);
        let a = assign(&[("n", ParameterValue::Int(7))]);
        let template = "N = 1\n";
        assert_eq!(r.render(template, &a), r.render(template, &a));
    }

    #[test]
    fn test_values_with_replacement_syntax_are_literal() {
        let r = renderer(&[("n", "N")]);
        let out = r.render("N = 1", &assign(&[("n", ParameterValue::from("$1x"))]));
        assert_eq!(out, "N = $1x");
    }
}
