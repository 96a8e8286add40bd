//! Data storage layer
//!
//! - `sqlite` - Embedded record store, migrations and fetches
//! - `serialize` - Row to outward record mapping
//! - `error` - Unified error type for fetch failures
//!
//! [`RecordStore`] ties them together: it runs a compiled query on a
//! connection scoped to one call and maps every row into a record.

pub mod error;
pub mod serialize;
pub mod sqlite;

pub use error::DataError;
pub use serialize::{JsonRecordSerializer, RecordSerializer};
pub use sqlite::SqliteService;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::domain::filter::{CompiledPredicate, FilterValue, SelectQuery};
use crate::domain::schema::RecordKind;

/// Executes list and get-by-id fetches for any registered record kind
pub struct RecordStore {
    sqlite: Arc<SqliteService>,
    serializer: Arc<dyn RecordSerializer>,
    query_timeout: Duration,
    debug: bool,
}

impl RecordStore {
    pub fn new(sqlite: Arc<SqliteService>, query_timeout: Duration) -> Self {
        Self {
            sqlite,
            serializer: Arc::new(JsonRecordSerializer),
            query_timeout,
            debug: false,
        }
    }

    /// Replace the row serializer
    pub fn with_serializer(mut self, serializer: Arc<dyn RecordSerializer>) -> Self {
        self.serializer = serializer;
        self
    }

    /// Log every compiled query at info level
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    pub fn sqlite(&self) -> &Arc<SqliteService> {
        &self.sqlite
    }

    /// Fetch every record of `kind` matching `predicate`
    pub async fn list(
        &self,
        kind: &RecordKind,
        predicate: CompiledPredicate,
    ) -> Result<Vec<Value>, DataError> {
        let query = SelectQuery::list(kind, predicate);
        self.log_query(&query);

        let rows = self
            .bounded(async {
                let mut conn = self.sqlite.acquire().await?;
                sqlite::repositories::fetch_all(&mut conn, &query).await
            })
            .await?;

        rows.iter()
            .map(|row| self.serializer.serialize(kind, row))
            .collect()
    }

    /// Fetch one record by primary key. A missing record is `Ok(None)`.
    pub async fn get(&self, kind: &RecordKind, id: FilterValue) -> Result<Option<Value>, DataError> {
        let query = SelectQuery::by_id(kind, id);
        self.log_query(&query);

        let row = self
            .bounded(async {
                let mut conn = self.sqlite.acquire().await?;
                sqlite::repositories::fetch_optional(&mut conn, &query).await
            })
            .await?;

        row.map(|row| self.serializer.serialize(kind, &row))
            .transpose()
    }

    /// Round-trip a trivial statement on a pooled connection
    pub async fn ping(&self) -> Result<(), DataError> {
        self.bounded(async {
            let mut conn = self.sqlite.acquire().await?;
            sqlx::query("SELECT 1").execute(&mut *conn).await?;
            Ok::<_, sqlite::SqliteError>(())
        })
        .await
    }

    /// Apply the query timeout to connection acquire plus execution.
    ///
    /// On timeout the inner future is dropped, which releases its connection.
    async fn bounded<T, F>(&self, fetch: F) -> Result<T, DataError>
    where
        F: Future<Output = Result<T, sqlite::SqliteError>>,
    {
        match tokio::time::timeout(self.query_timeout, fetch).await {
            Ok(result) => result.map_err(DataError::from),
            Err(_) => {
                tracing::warn!(
                    timeout_secs = self.query_timeout.as_secs(),
                    "Record fetch timed out"
                );
                Err(DataError::timeout(self.query_timeout.as_secs()))
            }
        }
    }

    fn log_query(&self, query: &SelectQuery<'_>) {
        if self.debug {
            let (sql, params) = query.to_sql();
            tracing::info!(
                kind = %query.kind().name(),
                %sql,
                params = ?params.values,
                "Compiled query"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::json;

    use crate::domain::filter::{ListArguments, SuppliedFilterValue, compile, parse_arguments};
    use crate::domain::models::person;
    use crate::domain::schema::OperationSignature;

    async fn seeded_store() -> RecordStore {
        let service = SqliteService::in_memory().await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        sqlite::seed::seed_people(service.pool(), day).await.unwrap();
        RecordStore::new(Arc::new(service), Duration::from_secs(5))
    }

    async fn list_ids(store: &RecordStore, args: serde_json::Value) -> Vec<String> {
        let kind = person().unwrap();
        let signature = OperationSignature::list(&kind);
        let args = parse_arguments(&args, &signature.parameters).unwrap();
        let records = store.list(&kind, compile(&kind, &args)).await.unwrap();
        let mut ids: Vec<String> = records
            .iter()
            .map(|r| r["id"].as_str().unwrap().to_string())
            .collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_age_gte_filter() {
        let store = seeded_store().await;
        let ids = list_ids(&store, json!({"age": {"comparison": {"gte": 15}}})).await;
        assert_eq!(ids, ["2", "3"]);
    }

    #[tokio::test]
    async fn test_age_range_filter() {
        let store = seeded_store().await;
        let ids = list_ids(&store, json!({"age": {"comparison": {"gt": 10, "lt": 30}}})).await;
        assert_eq!(ids, ["2"]);

        let ids = list_ids(&store, json!({"age": {"equals": 30, "comparison": {"lt": 15}}})).await;
        assert_eq!(ids, ["3"]);
    }

    #[tokio::test]
    async fn test_name_like_filter() {
        let store = seeded_store().await;
        let ids = list_ids(&store, json!({"name": {"comparison": {"like": "erson 2"}}})).await;
        assert_eq!(ids, ["2"]);
    }

    #[tokio::test]
    async fn test_like_is_case_insensitive() {
        let store = seeded_store().await;
        let ids = list_ids(&store, json!({"name": {"comparison": {"like": "PERSON 3"}}})).await;
        assert_eq!(ids, ["3"]);
    }

    #[tokio::test]
    async fn test_id_list_filter() {
        let store = seeded_store().await;
        let ids = list_ids(&store, json!({"id": [1, 3]})).await;
        assert_eq!(ids, ["1", "3"]);
    }

    #[tokio::test]
    async fn test_equals_beats_comparison() {
        let store = seeded_store().await;
        let ids = list_ids(
            &store,
            json!({"name": {"equals": "Person 1", "comparison": {"like": "Person 2"}}}),
        )
        .await;
        assert_eq!(ids, ["1"]);
    }

    #[tokio::test]
    async fn test_multi_field_conjunction_is_intersection() {
        let store = seeded_store().await;
        let by_id = list_ids(&store, json!({"id": [1, 2]})).await;
        let by_name = list_ids(&store, json!({"name": {"comparison": {"like": "2"}}})).await;
        let both = list_ids(
            &store,
            json!({"id": [1, 2], "name": {"comparison": {"like": "2"}}}),
        )
        .await;

        let intersection: Vec<String> = by_id.into_iter().filter(|id| by_name.contains(id)).collect();
        assert_eq!(both, intersection);
        assert_eq!(both, ["2"]);
    }

    #[tokio::test]
    async fn test_empty_comparison_matches_all() {
        let store = seeded_store().await;
        let ids = list_ids(&store, json!({"name": {}})).await;
        assert_eq!(ids, ["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_get_by_id() {
        let store = seeded_store().await;
        let kind = person().unwrap();

        let record = store.get(&kind, FilterValue::Int(2)).await.unwrap().unwrap();
        assert_eq!(record["id"], "2");
        assert_eq!(record["name"], "Person 2");
        assert_eq!(record["email_address"], "person-2@example.com");
        assert_eq!(record["age"], 20);
        assert_eq!(record["created_at"], "2024-03-01");

        let missing = store.get(&kind, FilterValue::Int(99)).await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_connection_released_after_each_fetch() {
        // Single-connection pool: repeated fetches only work if each releases
        let store = seeded_store().await.with_debug(true);
        let kind = person().unwrap();
        for _ in 0..5 {
            let records = store
                .list(&kind, compile(&kind, &ListArguments::new()))
                .await
                .unwrap();
            assert_eq!(records.len(), 3);
        }
    }

    #[tokio::test]
    async fn test_timeout_when_pool_is_held() {
        let service = SqliteService::in_memory().await.unwrap();
        let store = RecordStore::new(Arc::new(service), Duration::from_millis(50));
        let kind = person().unwrap();

        let _held = store.sqlite().acquire().await.unwrap();
        let args = ListArguments::new().with("age", SuppliedFilterValue::Absent);
        let err = store.list(&kind, compile(&kind, &args)).await.unwrap_err();
        assert!(matches!(err, DataError::Timeout { .. }));
        assert!(err.is_transient());
    }

    #[tokio::test]
    async fn test_store_failure_is_propagated() {
        let service = SqliteService::in_memory().await.unwrap();
        sqlx::query("DROP TABLE person")
            .execute(service.pool())
            .await
            .unwrap();
        let store = RecordStore::new(Arc::new(service), Duration::from_secs(5));
        let kind = person().unwrap();

        let err = store
            .list(&kind, compile(&kind, &ListArguments::new()))
            .await
            .unwrap_err();
        assert!(matches!(err, DataError::Sqlite(_)));

        // Connection went back to the pool despite the failure
        assert!(store.sqlite().acquire().await.is_ok());
    }

    #[tokio::test]
    async fn test_ping() {
        let store = seeded_store().await;
        store.ping().await.unwrap();

        store.sqlite().close().await;
        assert!(matches!(store.ping().await, Err(DataError::Sqlite(_))));
    }
}
