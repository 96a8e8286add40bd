//! Record fetches over compiled select queries
//!
//! Every function runs on a connection the caller acquired, so the caller
//! controls how long it is held.

use sqlx::query::Query;
use sqlx::sqlite::{Sqlite, SqliteArguments, SqliteConnection, SqliteRow};

use crate::data::sqlite::SqliteError;
use crate::domain::filter::{DATE_FORMAT, FilterValue, SelectQuery, SqlParams};

/// Run a query and collect every matching row (store-determined order)
pub async fn fetch_all(
    conn: &mut SqliteConnection,
    query: &SelectQuery<'_>,
) -> Result<Vec<SqliteRow>, SqliteError> {
    let (sql, params) = query.to_sql();
    tracing::debug!(
        kind = %query.kind().name(),
        %sql,
        params = params.len(),
        "Fetching records"
    );

    let rows = bind_params(sqlx::query(&sql), &params)
        .fetch_all(&mut *conn)
        .await?;

    tracing::trace!(rows = rows.len(), "Fetched records");
    Ok(rows)
}

/// Run a query expected to match at most one row
pub async fn fetch_optional(
    conn: &mut SqliteConnection,
    query: &SelectQuery<'_>,
) -> Result<Option<SqliteRow>, SqliteError> {
    let (sql, params) = query.to_sql();
    tracing::debug!(
        kind = %query.kind().name(),
        %sql,
        params = params.len(),
        "Fetching record"
    );

    let row = bind_params(sqlx::query(&sql), &params)
        .fetch_optional(&mut *conn)
        .await?;
    Ok(row)
}

fn bind_params<'q>(
    mut query: Query<'q, Sqlite, SqliteArguments<'q>>,
    params: &SqlParams,
) -> Query<'q, Sqlite, SqliteArguments<'q>> {
    for value in &params.values {
        query = match value {
            FilterValue::Int(v) => query.bind(*v),
            FilterValue::Float(v) => query.bind(*v),
            FilterValue::Text(v) => query.bind(v.clone()),
            FilterValue::Bool(v) => query.bind(*v),
            FilterValue::Date(v) => query.bind(v.format(DATE_FORMAT).to_string()),
        };
    }
    query
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use sqlx::Row;

    use crate::data::sqlite::SqliteService;
    use crate::data::sqlite::seed::seed_people;
    use crate::domain::filter::{
        ComparisonBounds, ComparisonMode, ListArguments, SuppliedFilterValue, compile,
    };
    use crate::domain::models::person;

    async fn seeded() -> SqliteService {
        let service = SqliteService::in_memory().await.unwrap();
        let day = NaiveDate::from_ymd_opt(2024, 3, 1).unwrap();
        seed_people(service.pool(), day).await.unwrap();
        service
    }

    fn ids(rows: &[SqliteRow]) -> Vec<i64> {
        let mut ids: Vec<i64> = rows.iter().map(|r| r.get("id")).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn test_fetch_all_unfiltered() {
        let service = seeded().await;
        let kind = person().unwrap();
        let mut conn = service.acquire().await.unwrap();

        let query = SelectQuery::list(&kind, compile(&kind, &ListArguments::new()));
        let rows = fetch_all(&mut conn, &query).await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2, 3]);
    }

    #[tokio::test]
    async fn test_fetch_all_binds_each_value_type() {
        let service = seeded().await;
        let kind = person().unwrap();
        let mut conn = service.acquire().await.unwrap();

        let mut bounds = ComparisonBounds::default();
        bounds.set(ComparisonMode::Like, FilterValue::Text("PERSON".into()));
        let args = ListArguments::new()
            .with(
                "id",
                SuppliedFilterValue::ListOf(vec![FilterValue::Int(1), FilterValue::Int(2)]),
            )
            .with(
                "name",
                SuppliedFilterValue::Comparison {
                    equals: None,
                    bounds: Some(bounds),
                },
            )
            .with(
                "created_at",
                SuppliedFilterValue::Scalar(FilterValue::Date(
                    NaiveDate::from_ymd_opt(2024, 3, 1).unwrap(),
                )),
            );

        let query = SelectQuery::list(&kind, compile(&kind, &args));
        let rows = fetch_all(&mut conn, &query).await.unwrap();
        assert_eq!(ids(&rows), vec![1, 2]);
    }

    #[tokio::test]
    async fn test_fetch_optional_missing_row() {
        let service = seeded().await;
        let kind = person().unwrap();
        let mut conn = service.acquire().await.unwrap();

        let found = fetch_optional(&mut conn, &SelectQuery::by_id(&kind, FilterValue::Int(2)))
            .await
            .unwrap();
        assert_eq!(found.map(|r| r.get::<String, _>("name")), Some("Person 2".into()));

        let missing = fetch_optional(&mut conn, &SelectQuery::by_id(&kind, FilterValue::Int(99)))
            .await
            .unwrap();
        assert!(missing.is_none());
    }
}
