//! Input shape derivation
//!
//! Turns a field's [`FilterCapability`] and base type into the argument shape
//! callers must supply. Derivation runs once per filterable field when the
//! schema registry is built; request handling only reads the result.

use serde::Serialize;

use super::capability::{ComparisonMode, FilterCapability};
use crate::domain::schema::BaseType;
use crate::utils::string::to_pascal_case;

/// Plain value annotation (optionally a list, optionally optional)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ValueType {
    pub base_type: BaseType,
    pub list: bool,
    pub optional: bool,
}

/// One sub-field of a comparison branch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ComparisonField {
    pub mode: ComparisonMode,
    pub base_type: BaseType,
}

/// Synthesized comparison-branch type
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonInputType {
    pub name: String,
    pub fields: Vec<ComparisonField>,
}

impl ComparisonInputType {
    pub fn field(&self, mode: ComparisonMode) -> Option<&ComparisonField> {
        self.fields.iter().find(|f| f.mode == mode)
    }
}

/// Externally visible shape of one filter argument
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum InputShape {
    /// Bare value (`equals` semantics)
    Simple(ValueType),
    /// Two-branch input: `{ equals?, comparison? }`
    Comparison {
        name: String,
        equals: ValueType,
        comparison: ComparisonInputType,
        optional: bool,
    },
}

impl InputShape {
    pub fn is_optional(&self) -> bool {
        match self {
            Self::Simple(value) => value.optional,
            Self::Comparison { optional, .. } => *optional,
        }
    }

    pub fn base_type(&self) -> BaseType {
        match self {
            Self::Simple(value) => value.base_type,
            Self::Comparison { equals, .. } => equals.base_type,
        }
    }

    /// Synthesized type names this shape introduces
    pub fn type_names(&self) -> Vec<&str> {
        match self {
            Self::Simple(_) => Vec::new(),
            Self::Comparison {
                name, comparison, ..
            } => vec![name.as_str(), comparison.name.as_str()],
        }
    }
}

/// Name of the synthesized comparison-branch type for `(operation, field)`
pub fn comparison_type_name(operation: &str, field: &str) -> String {
    format!(
        "{}{}ComparisonInput",
        to_pascal_case(operation),
        to_pascal_case(field)
    )
}

/// Name of the synthesized top-level filter type for `(operation, field)`
pub fn filter_type_name(operation: &str, field: &str) -> String {
    format!(
        "{}{}FilterInput",
        to_pascal_case(operation),
        to_pascal_case(field)
    )
}

/// Derive the accepted input shape for one filterable field.
///
/// 1. Start from the base type.
/// 2. `list` wraps it as a sequence.
/// 3. A non-required field is optional.
/// 4. Any comparison mode yields a two-branch input whose `equals` branch
///    carries the annotation from 1-3 and whose `comparison` branch holds one
///    unwrapped sub-field per enabled mode.
pub fn derive_input_shape(
    operation: &str,
    field: &str,
    base_type: BaseType,
    capability: &FilterCapability,
) -> InputShape {
    let annotation = ValueType {
        base_type,
        list: capability.is_list(),
        optional: !capability.is_required(),
    };

    if !capability.needs_comparison_input() {
        return InputShape::Simple(annotation);
    }

    let comparison = ComparisonInputType {
        name: comparison_type_name(operation, field),
        fields: capability
            .comparison_modes()
            .map(|mode| ComparisonField { mode, base_type })
            .collect(),
    };

    InputShape::Comparison {
        name: filter_type_name(operation, field),
        equals: annotation,
        comparison,
        optional: !capability.is_required(),
    }
}
