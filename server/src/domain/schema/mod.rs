//! Record-kind declarations and the schema registry

mod error;
mod kind;
mod registry;

pub use error::SchemaError;
pub use kind::{BaseType, FieldDecl, RecordKind, RecordKindBuilder};
pub use registry::{
    FieldDescription, KindDescription, OperationKind, OperationSignature, Parameter,
    RegisteredOperation, SchemaDescription, SchemaRegistry,
};
