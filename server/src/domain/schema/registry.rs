//! Schema registry
//!
//! Owns every registered [`RecordKind`] and the operation signatures derived
//! from them. Built once at startup and shared read-only across requests.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use serde::Serialize;

use super::error::SchemaError;
use super::kind::{BaseType, RecordKind};
use crate::domain::filter::{FilterCapability, InputShape, derive_input_shape};

/// Operation flavour
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    /// Filtered list of records
    List,
    /// Single record by primary key
    Get,
}

/// One named argument of an operation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Parameter {
    pub name: String,
    pub shape: InputShape,
}

/// Externally visible signature of one operation
#[derive(Debug, Clone, Serialize)]
pub struct OperationSignature {
    pub name: String,
    pub kind: OperationKind,
    pub record_kind: String,
    pub parameters: Vec<Parameter>,
}

impl OperationSignature {
    pub fn list(kind: &RecordKind) -> Self {
        let operation = kind.list_operation();
        let parameters = kind
            .filterable()
            .map(|(field, capability)| Parameter {
                name: field.name.clone(),
                shape: derive_input_shape(operation, &field.name, field.base_type, capability),
            })
            .collect();

        Self {
            name: operation.to_string(),
            kind: OperationKind::List,
            record_kind: kind.name().to_string(),
            parameters,
        }
    }

    pub fn get(kind: &RecordKind) -> Self {
        let operation = kind.get_operation();
        let pk = kind.primary_key();
        // identifier lookup is always direct, required equality
        let capability = FilterCapability::new().with_required();
        Self {
            name: operation.to_string(),
            kind: OperationKind::Get,
            record_kind: kind.name().to_string(),
            parameters: vec![Parameter {
                name: pk.name.clone(),
                shape: derive_input_shape(operation, &pk.name, pk.base_type, &capability),
            }],
        }
    }
}

/// A registered operation bound to its record kind
#[derive(Debug, Clone)]
pub struct RegisteredOperation {
    pub kind: Arc<RecordKind>,
    pub signature: OperationSignature,
}

/// Field entry of the introspection document
#[derive(Debug, Serialize)]
pub struct FieldDescription<'a> {
    pub name: &'a str,
    #[serde(rename = "type")]
    pub base_type: BaseType,
    pub nullable: bool,
    pub primary_key: bool,
    pub filterable: bool,
}

/// Record-kind entry of the introspection document
#[derive(Debug, Serialize)]
pub struct KindDescription<'a> {
    pub name: &'a str,
    pub list_operation: &'a str,
    pub get_operation: &'a str,
    pub fields: Vec<FieldDescription<'a>>,
}

/// Introspection document served by the schema endpoint
#[derive(Debug, Serialize)]
pub struct SchemaDescription<'a> {
    pub kinds: Vec<KindDescription<'a>>,
    pub operations: Vec<&'a OperationSignature>,
}

/// Registry of record kinds and their operations
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    kinds: Vec<Arc<RecordKind>>,
    operations: Vec<RegisteredOperation>,
    index: HashMap<String, usize>,
    type_names: HashSet<String>,
}

impl SchemaRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a record kind and derive its operation signatures.
    ///
    /// Input shapes are derived here, once; nothing downstream re-derives them.
    pub fn register(&mut self, kind: RecordKind) -> Result<(), SchemaError> {
        if self.kinds.iter().any(|k| k.name() == kind.name()) {
            return Err(SchemaError::DuplicateKind(kind.name().to_string()));
        }
        for operation in [kind.list_operation(), kind.get_operation()] {
            if self.index.contains_key(operation) {
                return Err(SchemaError::DuplicateOperation(operation.to_string()));
            }
        }

        let list = OperationSignature::list(&kind);
        let get = OperationSignature::get(&kind);

        // Distinct (operation, field) pairs can still PascalCase to the same name
        let mut fresh = HashSet::new();
        for name in [&list, &get]
            .into_iter()
            .flat_map(|sig| sig.parameters.iter())
            .flat_map(|param| param.shape.type_names())
        {
            if self.type_names.contains(name) || !fresh.insert(name.to_string()) {
                return Err(SchemaError::DuplicateTypeName(name.to_string()));
            }
        }
        self.type_names.extend(fresh);

        let kind = Arc::new(kind);

        tracing::debug!(
            kind = %kind.name(),
            list = %list.name,
            get = %get.name,
            parameters = list.parameters.len(),
            "Registered record kind"
        );

        for signature in [list, get] {
            self.index
                .insert(signature.name.clone(), self.operations.len());
            self.operations.push(RegisteredOperation {
                kind: Arc::clone(&kind),
                signature,
            });
        }
        self.kinds.push(kind);
        Ok(())
    }

    pub fn kinds(&self) -> &[Arc<RecordKind>] {
        &self.kinds
    }

    pub fn kind(&self, name: &str) -> Option<&Arc<RecordKind>> {
        self.kinds.iter().find(|k| k.name() == name)
    }

    pub fn operation(&self, name: &str) -> Option<&RegisteredOperation> {
        self.index.get(name).map(|&i| &self.operations[i])
    }

    /// Look up a list operation by name
    pub fn resolve_list(&self, name: &str) -> Option<&RegisteredOperation> {
        self.operation(name)
            .filter(|op| op.signature.kind == OperationKind::List)
    }

    /// Look up a get-by-identifier operation by name
    pub fn resolve_get(&self, name: &str) -> Option<&RegisteredOperation> {
        self.operation(name)
            .filter(|op| op.signature.kind == OperationKind::Get)
    }

    pub fn operations(&self) -> impl Iterator<Item = &RegisteredOperation> {
        self.operations.iter()
    }

    pub fn describe(&self) -> SchemaDescription<'_> {
        let kinds = self
            .kinds
            .iter()
            .map(|kind| KindDescription {
                name: kind.name(),
                list_operation: kind.list_operation(),
                get_operation: kind.get_operation(),
                fields: kind
                    .fields()
                    .iter()
                    .map(|f| FieldDescription {
                        name: &f.name,
                        base_type: f.base_type,
                        nullable: f.nullable,
                        primary_key: f.primary_key,
                        filterable: f.filter.is_some(),
                    })
                    .collect(),
            })
            .collect();

        SchemaDescription {
            kinds,
            operations: self.operations.iter().map(|op| &op.signature).collect(),
        }
    }
}
