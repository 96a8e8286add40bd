//! Built-in record kinds

use super::filter::FilterCapability;
use super::schema::{BaseType, FieldDecl, RecordKind, SchemaError, SchemaRegistry};

/// `person` records, listed through `people` and fetched through `person`
pub fn person() -> Result<RecordKind, SchemaError> {
    RecordKind::builder("person", "person")
        .list_operation("people")
        .get_operation("person")
        .field(
            FieldDecl::new("id", BaseType::Int)
                .primary_key()
                .filterable(FilterCapability::new().with_list()),
        )
        .field(
            FieldDecl::new("name", BaseType::Text)
                .nullable()
                .filterable(FilterCapability::new().with_like()),
        )
        .field(FieldDecl::new("email_address", BaseType::Text))
        .field(
            FieldDecl::new("age", BaseType::Int)
                .nullable()
                .filterable(FilterCapability::new().with_range()),
        )
        .field(
            FieldDecl::new("created_at", BaseType::Date)
                .nullable()
                .filterable(FilterCapability::new()),
        )
        .build()
}

/// Registry holding every built-in record kind
pub fn default_registry() -> Result<SchemaRegistry, SchemaError> {
    let mut registry = SchemaRegistry::new();
    registry.register(person()?)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::filter::{ComparisonMode, InputShape};

    #[test]
    fn test_person_declaration() {
        let kind = person().unwrap();
        assert_eq!(kind.primary_key().name, "id");
        assert!(kind.field("email_address").unwrap().filter.is_none());
        assert!(!kind.field("email_address").unwrap().nullable);
        assert!(kind.field("name").unwrap().nullable);
    }

    #[test]
    fn test_default_registry_shapes() {
        let registry = default_registry().unwrap();
        let op = registry.resolve_list("people").unwrap();
        let shapes: Vec<_> = op
            .signature
            .parameters
            .iter()
            .map(|p| matches!(p.shape, InputShape::Comparison { .. }))
            .collect();
        // `name` takes `like`, `age` takes range bounds
        assert_eq!(shapes, vec![false, true, true, false]);
        assert!(registry.resolve_get("person").is_some());
    }

    #[test]
    fn test_age_accepts_range_bounds() {
        let registry = default_registry().unwrap();
        let op = registry.resolve_list("people").unwrap();
        let age = &op.signature.parameters[2];
        assert_eq!(age.name, "age");
        let InputShape::Comparison { comparison, .. } = &age.shape else {
            panic!("age should derive a comparison input");
        };
        let modes: Vec<_> = comparison.fields.iter().map(|f| f.mode).collect();
        assert_eq!(
            modes,
            vec![
                ComparisonMode::Lt,
                ComparisonMode::Gt,
                ComparisonMode::Lte,
                ComparisonMode::Gte
            ]
        );
        assert_eq!(comparison.name, "PeopleAgeComparisonInput");
    }
}
