use indexmap::IndexMap;
use std::collections::HashSet;

use super::kinds::TypedValue;
use super::schema::{ParameterSchema, ParameterSpec};
use crate::error::ValidationError;

/// Marker introducing a parameter name on the command line.
pub const FLAG_PREFIX: &str = "--";

/// A value that passed its type check, along with the text it came from.
#[derive(Debug, Clone, PartialEq)]
pub struct AcceptedValue {
    pub raw: String,
    pub typed: TypedValue,
}

/// Parameters accepted by a schema, in the order they were validated.
#[derive(Debug, Clone, Default)]
pub struct ValidatedRequest {
    values: IndexMap<&'static str, AcceptedValue>,
}

impl ValidatedRequest {
    pub fn get(&self, name: &str) -> Option<&AcceptedValue> {
        self.values.get(name)
    }

    pub fn raw(&self, name: &str) -> Option<&str> {
        self.get(name).map(|value| value.raw.as_str())
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &AcceptedValue)> {
        self.values.iter().map(|(name, value)| (*name, value))
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Turns protocol-specific raw input into a [`ValidatedRequest`].
#[derive(Debug, Clone, Copy)]
pub struct RequestParser {
    schema: &'static ParameterSchema,
}

impl RequestParser {
    pub fn new(schema: &'static ParameterSchema) -> Self {
        Self { schema }
    }

    /// Parse `--Name value` pairs (the tokens following the workspace).
    ///
    /// Shape problems and duplicates are detected over the whole argument
    /// list before any value is type-checked. Names outside the schema are
    /// skipped.
    pub fn parse_flags(&self, tokens: &[String]) -> Result<ValidatedRequest, ValidationError> {
        let mut matched: Vec<(&'static ParameterSpec, &str)> = Vec::new();
        let mut seen = HashSet::new();
        let mut iter = tokens.iter();

        while let Some(token) = iter.next() {
            let name = token
                .strip_prefix(FLAG_PREFIX)
                .ok_or_else(|| ValidationError::PositionalArgument(token.clone()))?;

            let value = iter
                .next()
                .ok_or_else(|| ValidationError::MissingValue(name.to_string()))?;

            let Some(spec) = self.schema.spec(name) else {
                tracing::debug!("Ignoring unknown parameter {}", name);
                continue;
            };

            if !seen.insert(spec.name) {
                return Err(ValidationError::DuplicateParameter(spec.name.to_string()));
            }

            matched.push((spec, value.as_str()));
        }

        let mut values = IndexMap::new();
        for (spec, raw) in matched {
            values.insert(spec.name, accept(spec, raw)?);
        }

        self.ensure_complete(&values)?;

        Ok(ValidatedRequest { values })
    }

    /// Parse a name to value mapping such as a query string or a JSON
    /// properties object. Every missing name is reported at once.
    pub fn parse_mapping(
        &self,
        entries: &IndexMap<String, String>,
    ) -> Result<ValidatedRequest, ValidationError> {
        let missing: Vec<String> = self
            .schema
            .required_names()
            .into_iter()
            .filter(|name| !entries.contains_key(*name))
            .map(str::to_string)
            .collect();

        if !missing.is_empty() {
            return Err(ValidationError::MissingParameters(missing));
        }

        let mut values = IndexMap::new();
        for spec in self.schema.specs() {
            if let Some(raw) = entries.get(spec.name) {
                values.insert(spec.name, accept(spec, raw)?);
            }
        }

        Ok(ValidatedRequest { values })
    }

    fn ensure_complete(
        &self,
        values: &IndexMap<&'static str, AcceptedValue>,
    ) -> Result<(), ValidationError> {
        let missing: Vec<String> = self
            .schema
            .required_names()
            .into_iter()
            .filter(|name| !values.contains_key(name))
            .map(str::to_string)
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(ValidationError::MissingParameters(missing))
        }
    }
}

fn accept(spec: &ParameterSpec, raw: &str) -> Result<AcceptedValue, ValidationError> {
    let typed = spec
        .kind
        .parse(raw)
        .ok_or_else(|| ValidationError::InvalidValue {
            name: spec.name.to_string(),
            message: spec.kind.failure_message(spec.name, raw),
        })?;

    Ok(AcceptedValue {
        raw: raw.to_string(),
        typed,
    })
}
