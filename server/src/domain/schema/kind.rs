//! Record-kind declarations
//!
//! A record kind is one table plus an ordered list of field declarations.
//! Fields carrying a [`FilterCapability`] become filter arguments of the
//! kind's list operation; all other fields are returned but never filterable.

use std::collections::HashSet;
use std::fmt;

use serde::Serialize;

use super::error::SchemaError;
use crate::domain::filter::FilterCapability;

/// Underlying value type of a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BaseType {
    Int,
    Float,
    Text,
    Bool,
    /// Calendar date, stored as `YYYY-MM-DD` text
    Date,
}

impl BaseType {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Text => "text",
            Self::Bool => "bool",
            Self::Date => "date",
        }
    }
}

impl fmt::Display for BaseType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One declared field of a record kind
#[derive(Debug, Clone, PartialEq)]
pub struct FieldDecl {
    pub name: String,
    pub base_type: BaseType,
    pub nullable: bool,
    pub primary_key: bool,
    pub filter: Option<FilterCapability>,
}

impl FieldDecl {
    pub fn new(name: impl Into<String>, base_type: BaseType) -> Self {
        Self {
            name: name.into(),
            base_type,
            nullable: false,
            primary_key: false,
            filter: None,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn filterable(mut self, capability: FilterCapability) -> Self {
        self.filter = Some(capability);
        self
    }
}

/// A fully validated record kind
#[derive(Debug, Clone)]
pub struct RecordKind {
    name: String,
    table: String,
    list_operation: String,
    get_operation: String,
    fields: Vec<FieldDecl>,
    primary_key: usize,
}

impl RecordKind {
    pub fn builder(name: impl Into<String>, table: impl Into<String>) -> RecordKindBuilder {
        RecordKindBuilder::new(name, table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    pub fn list_operation(&self) -> &str {
        &self.list_operation
    }

    pub fn get_operation(&self) -> &str {
        &self.get_operation
    }

    pub fn fields(&self) -> &[FieldDecl] {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldDecl> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn primary_key(&self) -> &FieldDecl {
        &self.fields[self.primary_key]
    }

    /// Filterable fields with their capability, in declaration order
    pub fn filterable(&self) -> impl Iterator<Item = (&FieldDecl, &FilterCapability)> {
        self.fields
            .iter()
            .filter_map(|f| f.filter.as_ref().map(|cap| (f, cap)))
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.name.as_str()).collect()
    }
}

/// Declarative builder for [`RecordKind`]
///
/// Validation is deferred to [`RecordKindBuilder::build`] so every problem in
/// a declaration surfaces at startup rather than at request time.
#[derive(Debug)]
pub struct RecordKindBuilder {
    name: String,
    table: String,
    list_operation: Option<String>,
    get_operation: Option<String>,
    fields: Vec<FieldDecl>,
    attached: Vec<(String, FilterCapability)>,
}

impl RecordKindBuilder {
    fn new(name: impl Into<String>, table: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            table: table.into(),
            list_operation: None,
            get_operation: None,
            fields: Vec::new(),
            attached: Vec::new(),
        }
    }

    /// Name of the "list with filters" operation (e.g. `people`)
    pub fn list_operation(mut self, name: impl Into<String>) -> Self {
        self.list_operation = Some(name.into());
        self
    }

    /// Name of the "get by identifier" operation (e.g. `person`)
    pub fn get_operation(mut self, name: impl Into<String>) -> Self {
        self.get_operation = Some(name.into());
        self
    }

    pub fn field(mut self, field: FieldDecl) -> Self {
        self.fields.push(field);
        self
    }

    /// Attach filter metadata to a field by name.
    ///
    /// The field must be declared by the time `build` runs.
    pub fn filter_on(mut self, field: impl Into<String>, capability: FilterCapability) -> Self {
        self.attached.push((field.into(), capability));
        self
    }

    pub fn build(self) -> Result<RecordKind, SchemaError> {
        let Self {
            name,
            table,
            list_operation,
            get_operation,
            mut fields,
            attached,
        } = self;

        validate_identifier(&name)?;
        validate_identifier(&table)?;

        let list_operation = list_operation.unwrap_or_else(|| format!("list_{}", name));
        let get_operation = get_operation.unwrap_or_else(|| format!("get_{}", name));
        validate_identifier(&list_operation)?;
        validate_identifier(&get_operation)?;
        if list_operation == get_operation {
            return Err(SchemaError::DuplicateOperation(list_operation));
        }

        let mut seen = HashSet::new();
        for field in &fields {
            validate_identifier(&field.name)?;
            if !seen.insert(field.name.as_str()) {
                return Err(SchemaError::DuplicateField {
                    kind: name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        for (field_name, capability) in attached {
            let field = fields
                .iter_mut()
                .find(|f| f.name == field_name)
                .ok_or_else(|| SchemaError::UnknownField {
                    kind: name.clone(),
                    field: field_name.clone(),
                })?;
            field.filter = Some(capability);
        }

        let mut keys = fields
            .iter()
            .enumerate()
            .filter(|(_, f)| f.primary_key)
            .map(|(i, _)| i);
        let primary_key = match (keys.next(), keys.next()) {
            (Some(idx), None) => idx,
            (None, _) => return Err(SchemaError::MissingPrimaryKey(name)),
            (Some(_), Some(_)) => return Err(SchemaError::MultiplePrimaryKeys(name)),
        };

        tracing::trace!(
            kind = %name,
            fields = fields.len(),
            filterable = fields.iter().filter(|f| f.filter.is_some()).count(),
            "Record kind declared"
        );

        Ok(RecordKind {
            name,
            table,
            list_operation,
            get_operation,
            fields,
            primary_key,
        })
    }
}

/// Names end up in SQL text and synthesized type names, so keep them to
/// lowercase snake_case identifiers.
fn validate_identifier(name: &str) -> Result<(), SchemaError> {
    let mut chars = name.chars();
    let valid = matches!(chars.next(), Some(c) if c.is_ascii_lowercase() || c == '_')
        && chars.all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '_');
    if valid {
        Ok(())
    } else {
        Err(SchemaError::InvalidIdentifier(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn widget() -> RecordKindBuilder {
        RecordKind::builder("widget", "widgets")
            .list_operation("widgets")
            .get_operation("widget")
            .field(FieldDecl::new("id", BaseType::Int).primary_key())
            .field(FieldDecl::new("label", BaseType::Text))
    }

    #[test]
    fn test_build_minimal_kind() {
        let kind = widget().build().unwrap();
        assert_eq!(kind.name(), "widget");
        assert_eq!(kind.table(), "widgets");
        assert_eq!(kind.primary_key().name, "id");
        assert_eq!(kind.column_names(), vec!["id", "label"]);
        assert_eq!(kind.filterable().count(), 0);
    }

    #[test]
    fn test_default_operation_names() {
        let kind = RecordKind::builder("widget", "widgets")
            .field(FieldDecl::new("id", BaseType::Int).primary_key())
            .build()
            .unwrap();
        assert_eq!(kind.list_operation(), "list_widget");
        assert_eq!(kind.get_operation(), "get_widget");
    }

    #[test]
    fn test_filter_on_attaches_capability() {
        let kind = widget()
            .filter_on("label", FilterCapability::new().with_like())
            .build()
            .unwrap();
        let filterable: Vec<_> = kind.filterable().map(|(f, _)| f.name.as_str()).collect();
        assert_eq!(filterable, vec!["label"]);
    }

    #[test]
    fn test_filter_on_unknown_field_fails_closed() {
        let err = widget()
            .filter_on("colour", FilterCapability::new())
            .build()
            .unwrap_err();
        assert!(matches!(
            err,
            SchemaError::UnknownField { ref kind, ref field } if kind == "widget" && field == "colour"
        ));
    }

    #[test]
    fn test_filterable_keeps_declaration_order() {
        let kind = RecordKind::builder("widget", "widgets")
            .field(FieldDecl::new("id", BaseType::Int).primary_key())
            .field(FieldDecl::new("b", BaseType::Int).filterable(FilterCapability::new()))
            .field(FieldDecl::new("a", BaseType::Int).filterable(FilterCapability::new()))
            .build()
            .unwrap();
        let names: Vec<_> = kind.filterable().map(|(f, _)| f.name.as_str()).collect();
        assert_eq!(names, vec!["b", "a"]);
    }

    #[test]
    fn test_missing_primary_key() {
        let err = RecordKind::builder("widget", "widgets")
            .field(FieldDecl::new("label", BaseType::Text))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MissingPrimaryKey(_)));
    }

    #[test]
    fn test_multiple_primary_keys() {
        let err = widget()
            .field(FieldDecl::new("other_id", BaseType::Int).primary_key())
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::MultiplePrimaryKeys(_)));
    }

    #[test]
    fn test_duplicate_field() {
        let err = widget()
            .field(FieldDecl::new("label", BaseType::Text))
            .build()
            .unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateField { .. }));
    }

    #[test]
    fn test_invalid_identifiers_rejected() {
        for bad in ["", "Label", "label;drop", "1abc", "a-b"] {
            let err = widget()
                .field(FieldDecl::new(bad, BaseType::Text))
                .build()
                .unwrap_err();
            assert!(
                matches!(err, SchemaError::InvalidIdentifier(_)),
                "{bad:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_same_list_and_get_operation_rejected() {
        let err = widget().get_operation("widgets").build().unwrap_err();
        assert!(matches!(err, SchemaError::DuplicateOperation(_)));
    }
}
