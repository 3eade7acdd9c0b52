//! Named numeric parameters, either fixed numbers or formulas over other
//! parameters.

use evalexpr::{build_operator_tree, ContextWithMutableVariables, HashMapContext, Value};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Result of evaluating a parameter
pub type ParameterResult = Result<f64, ParameterError>;

/// Errors raised while evaluating parameters
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParameterError {
    #[error("Parameter '{0}' not found")]
    NotFound(String),
    #[error("Parse error: {0}")]
    ParseError(String),
    #[error("Evaluation error: {0}")]
    EvaluationError(String),
    #[error("Circular dependency: {}", .0.join(" -> "))]
    CircularDependency(Vec<String>),
    #[error("Invalid type: {0}")]
    InvalidType(String),
}

/// Value of a parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ParameterValue {
    Number { value: f64 },
    Formula { expression: String },
}

/// A single named parameter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parameter {
    pub value: ParameterValue,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Parameter {
    pub fn number(value: f64) -> Self {
        Self {
            value: ParameterValue::Number { value },
            unit: None,
            description: None,
        }
    }

    pub fn formula(expression: impl Into<String>) -> Self {
        Self {
            value: ParameterValue::Formula {
                expression: expression.into(),
            },
            unit: None,
            description: None,
        }
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Table of parameters keyed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterTable {
    parameters: BTreeMap<String, Parameter>,
}

impl ParameterTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, name: impl Into<String>, parameter: Parameter) {
        self.parameters.insert(name.into(), parameter);
    }

    /// Set a numeric value, keeping unit and description of an existing entry.
    pub fn set_number(&mut self, name: &str, value: f64) {
        self.set_value(name, ParameterValue::Number { value });
    }

    /// Set a formula, keeping unit and description of an existing entry.
    pub fn set_formula(&mut self, name: &str, expression: impl Into<String>) {
        self.set_value(
            name,
            ParameterValue::Formula {
                expression: expression.into(),
            },
        );
    }

    fn set_value(&mut self, name: &str, value: ParameterValue) {
        match self.parameters.get_mut(name) {
            Some(existing) => existing.value = value,
            None => {
                self.parameters.insert(
                    name.to_string(),
                    Parameter {
                        value,
                        unit: None,
                        description: None,
                    },
                );
            }
        }
    }

    /// Override entries with the ones from `overrides`.
    pub fn merge(&mut self, overrides: &ParameterTable) {
        for (name, parameter) in &overrides.parameters {
            tracing::debug!("parameter override: {} = {:?}", name, parameter.value);
            self.set_value(name, parameter.value.clone());
            if let Some(existing) = self.parameters.get_mut(name) {
                if parameter.unit.is_some() {
                    existing.unit = parameter.unit.clone();
                }
                if parameter.description.is_some() {
                    existing.description = parameter.description.clone();
                }
            }
        }
    }

    pub fn get(&self, name: &str) -> Option<&Parameter> {
        self.parameters.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.parameters.contains_key(name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.parameters.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.parameters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parameters.is_empty()
    }

    /// Evaluate a parameter, resolving formula dependencies recursively.
    pub fn evaluate(&self, name: &str) -> ParameterResult {
        let mut visited = HashSet::new();
        let mut path = Vec::new();
        self.evaluate_internal(name, &mut visited, &mut path)
    }

    fn evaluate_internal(
        &self,
        name: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> ParameterResult {
        if visited.contains(name) {
            path.push(name.to_string());
            return Err(ParameterError::CircularDependency(path.clone()));
        }

        let parameter = self
            .parameters
            .get(name)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))?;

        visited.insert(name.to_string());
        path.push(name.to_string());

        let result = match &parameter.value {
            ParameterValue::Number { value } => Ok(*value),
            ParameterValue::Formula { expression } => {
                self.evaluate_formula(expression, visited, path)
            }
        };

        visited.remove(name);
        path.pop();

        result
    }

    fn evaluate_formula(
        &self,
        expression: &str,
        visited: &mut HashSet<String>,
        path: &mut Vec<String>,
    ) -> ParameterResult {
        let tree =
            build_operator_tree(expression).map_err(|e| ParameterError::ParseError(e.to_string()))?;

        let mut context = HashMapContext::new();

        // Math constants first so a parameter with the same name wins
        context
            .set_value("PI".to_string(), Value::Float(std::f64::consts::PI))
            .ok();
        context
            .set_value("E".to_string(), Value::Float(std::f64::consts::E))
            .ok();

        let identifiers: BTreeSet<String> = tree
            .iter_variable_identifiers()
            .map(str::to_string)
            .collect();

        for dep_name in identifiers {
            if !self.parameters.contains_key(&dep_name) && (dep_name == "PI" || dep_name == "E") {
                continue;
            }
            let dep_value = self.evaluate_internal(&dep_name, visited, path)?;
            context
                .set_value(dep_name, Value::Float(dep_value))
                .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;
        }

        let value = tree
            .eval_with_context(&context)
            .map_err(|e| ParameterError::EvaluationError(e.to_string()))?;

        match value {
            Value::Float(f) => Ok(f),
            Value::Int(i) => Ok(i as f64),
            _ => Err(ParameterError::InvalidType(format!(
                "Expected number, got {:?}",
                value
            ))),
        }
    }

    /// Evaluate every parameter in the table
    pub fn evaluate_all(&self) -> BTreeMap<String, ParameterResult> {
        self.parameters
            .keys()
            .map(|name| (name.clone(), self.evaluate(name)))
            .collect()
    }

    /// Names of the parameters a formula refers to.
    pub fn dependencies(&self, name: &str) -> Result<BTreeSet<String>, ParameterError> {
        let parameter = self
            .parameters
            .get(name)
            .ok_or_else(|| ParameterError::NotFound(name.to_string()))?;

        match &parameter.value {
            ParameterValue::Number { .. } => Ok(BTreeSet::new()),
            ParameterValue::Formula { expression } => {
                let tree = build_operator_tree(expression)
                    .map_err(|e| ParameterError::ParseError(e.to_string()))?;
                Ok(tree
                    .iter_variable_identifiers()
                    .filter(|id| self.parameters.contains_key(*id))
                    .map(str::to_string)
                    .collect())
            }
        }
    }

    pub fn has_circular_dependencies(&self) -> bool {
        self.parameters.keys().any(|name| {
            matches!(
                self.evaluate(name),
                Err(ParameterError::CircularDependency(_))
            )
        })
    }
}
