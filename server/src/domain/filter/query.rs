//! Executable select statements over one record kind

use super::compiler::{CompiledPredicate, Condition, SqlParams};
use super::value::FilterValue;
use crate::domain::schema::RecordKind;

/// `SELECT <columns> FROM <table> [WHERE ...] [LIMIT n]`
#[derive(Debug, Clone)]
pub struct SelectQuery<'a> {
    kind: &'a RecordKind,
    predicate: CompiledPredicate,
    limit: Option<u32>,
}

impl<'a> SelectQuery<'a> {
    /// Base "all records of kind" query narrowed by a compiled predicate
    pub fn list(kind: &'a RecordKind, predicate: CompiledPredicate) -> Self {
        Self {
            kind,
            predicate,
            limit: None,
        }
    }

    /// Single-row lookup by primary key
    pub fn by_id(kind: &'a RecordKind, id: FilterValue) -> Self {
        let condition = Condition::Eq {
            column: kind.primary_key().name.clone(),
            value: id,
        };
        Self {
            kind,
            predicate: CompiledPredicate::new(vec![condition]),
            limit: Some(1),
        }
    }

    pub fn kind(&self) -> &RecordKind {
        self.kind
    }

    pub fn predicate(&self) -> &CompiledPredicate {
        &self.predicate
    }

    /// Render SQL text and its positional parameters
    pub fn to_sql(&self) -> (String, SqlParams) {
        let mut params = SqlParams::default();
        let mut sql = format!(
            "SELECT {} FROM {}",
            self.kind.column_names().join(", "),
            self.kind.table()
        );

        if let Some(clause) = self.predicate.to_sql(&mut params) {
            sql.push_str(" WHERE ");
            sql.push_str(&clause);
        }
        if let Some(limit) = self.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }

        (sql, params)
    }
}
