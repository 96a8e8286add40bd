//! Row to outward record mapping

use serde_json::{Map, Value};
use sqlx::Row;
use sqlx::sqlite::SqliteRow;

use super::error::DataError;
use crate::domain::schema::{BaseType, FieldDecl, RecordKind};

/// Maps one fetched row into the record representation returned to clients.
///
/// Called once per row after the fetch has completed.
pub trait RecordSerializer: Send + Sync {
    fn serialize(&self, kind: &RecordKind, row: &SqliteRow) -> Result<Value, DataError>;
}

/// Serializes records as JSON objects keyed by field name in declaration order.
///
/// The primary key is rendered as an opaque string identifier. Dates are
/// passed through in their stored `YYYY-MM-DD` form.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonRecordSerializer;

impl RecordSerializer for JsonRecordSerializer {
    fn serialize(&self, kind: &RecordKind, row: &SqliteRow) -> Result<Value, DataError> {
        let mut record = Map::with_capacity(kind.fields().len());
        for field in kind.fields() {
            let value = read_field(row, field).map_err(|e| DataError::Serialize {
                kind: kind.name().to_string(),
                field: field.name.clone(),
                error: e.to_string(),
            })?;
            let value = if field.primary_key {
                primary_key_value(value)
            } else {
                value
            };
            record.insert(field.name.clone(), value);
        }
        Ok(Value::Object(record))
    }
}

fn read_field(row: &SqliteRow, field: &FieldDecl) -> Result<Value, sqlx::Error> {
    let name = field.name.as_str();
    let value = match field.base_type {
        BaseType::Int => row.try_get::<Option<i64>, _>(name)?.map(Value::from),
        BaseType::Float => row.try_get::<Option<f64>, _>(name)?.map(Value::from),
        BaseType::Text | BaseType::Date => row.try_get::<Option<String>, _>(name)?.map(Value::from),
        BaseType::Bool => row.try_get::<Option<bool>, _>(name)?.map(Value::from),
    };
    Ok(value.unwrap_or(Value::Null))
}

fn primary_key_value(value: Value) -> Value {
    match value {
        Value::Null | Value::String(_) => value,
        other => Value::String(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::sqlite::SqliteService;
    use crate::domain::models::person;

    #[tokio::test]
    async fn test_serialize_person_row() {
        let service = SqliteService::in_memory().await.unwrap();
        sqlx::query(
            "INSERT INTO person (id, name, email_address, age, created_at) VALUES (7, 'Ada', 'ada@example.com', NULL, '2024-03-01')",
        )
        .execute(service.pool())
        .await
        .unwrap();

        let row = sqlx::query("SELECT id, name, email_address, age, created_at FROM person")
            .fetch_one(service.pool())
            .await
            .unwrap();
        let kind = person().unwrap();
        let record = JsonRecordSerializer.serialize(&kind, &row).unwrap();

        assert_eq!(
            record,
            serde_json::json!({
                "id": "7",
                "name": "Ada",
                "email_address": "ada@example.com",
                "age": null,
                "created_at": "2024-03-01"
            })
        );
        let keys: Vec<&String> = record.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["id", "name", "email_address", "age", "created_at"]);
    }

    #[tokio::test]
    async fn test_missing_column_is_serialize_error() {
        let service = SqliteService::in_memory().await.unwrap();
        let row = sqlx::query("SELECT 1 AS id")
            .fetch_one(service.pool())
            .await
            .unwrap();
        let kind = person().unwrap();

        let err = JsonRecordSerializer.serialize(&kind, &row).unwrap_err();
        assert!(matches!(err, DataError::Serialize { ref field, .. } if field == "name"));
    }
}
