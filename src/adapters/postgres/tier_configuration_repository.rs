//! PostgreSQL implementation of the tier configuration ports.
//!
//! Levels and payments are stored as JSONB. The unique constraint
//! `tier_configurations_key` backs the `(region, classification, is_paying)`
//! invariant, and paying rows are created in the same transaction as their
//! indigent sibling.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{DomainError, ErrorCode, TierConfigurationId, Timestamp};
use crate::domain::membership::{AreaClassification, LevelsSpec, TierConfiguration, TierKey};
use crate::ports::{CreateOutcome, TierConfigurationReader, TierConfigurationRepository};

const UNIQUE_KEY_CONSTRAINT: &str = "tier_configurations_key";

/// PostgreSQL implementation of the tier configuration ports.
pub struct PostgresTierConfigurationRepository {
    pool: PgPool,
}

impl PostgresTierConfigurationRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// Database row representation of a tier configuration.
#[derive(Debug, sqlx::FromRow)]
struct TierConfigurationRow {
    id: Uuid,
    region: String,
    classification: String,
    levels: serde_json::Value,
    payments: serde_json::Value,
    is_paying: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<TierConfigurationRow> for TierConfiguration {
    type Error = DomainError;

    fn try_from(row: TierConfigurationRow) -> Result<Self, Self::Error> {
        let classification = parse_classification(&row.classification)?;
        let levels: LevelsSpec = serde_json::from_value(row.levels).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid levels value: {}", e))
        })?;
        let payments: Vec<f64> = serde_json::from_value(row.payments).map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Invalid payments value: {}", e))
        })?;

        Ok(TierConfiguration {
            id: TierConfigurationId::from_uuid(row.id),
            region: row.region,
            classification,
            levels,
            payments,
            is_paying: row.is_paying,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn parse_classification(s: &str) -> Result<AreaClassification, DomainError> {
    s.parse().map_err(|_| {
        DomainError::new(
            ErrorCode::DatabaseError,
            format!("Invalid classification value: {}", s),
        )
    })
}

fn levels_to_json(levels: &LevelsSpec) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(levels).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to encode levels: {}", e))
    })
}

fn payments_to_json(payments: &[f64]) -> Result<serde_json::Value, DomainError> {
    serde_json::to_value(payments).map_err(|e| {
        DomainError::new(ErrorCode::InternalError, format!("Failed to encode payments: {}", e))
    })
}

/// Maps an insert failure, turning unique-key violations into conflicts.
fn map_insert_error(e: sqlx::Error, key: &TierKey) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.constraint() == Some(UNIQUE_KEY_CONSTRAINT) {
            return DomainError::new(
                ErrorCode::TierConfigurationExists,
                format!("Tier configuration already exists: {}", key),
            );
        }
    }
    DomainError::new(
        ErrorCode::DatabaseError,
        format!("Failed to insert tier configuration: {}", e),
    )
}

const INSERT_SQL: &str = r#"
    INSERT INTO tier_configurations (
        id, region, classification, levels, payments, is_paying, created_at, updated_at
    ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
"#;

/// Insert that keeps an already existing indigent row as is.
fn sibling_insert_sql() -> String {
    format!(
        "{} ON CONFLICT ON CONSTRAINT {} DO NOTHING",
        INSERT_SQL.trim_end(),
        UNIQUE_KEY_CONSTRAINT
    )
}

const SELECT_COLUMNS: &str =
    "id, region, classification, levels, payments, is_paying, created_at, updated_at";

impl PostgresTierConfigurationRepository {
    async fn fetch_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError> {
        let row: Option<TierConfigurationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tier_configurations \
             WHERE region = $1 AND classification = $2 AND is_paying = $3",
            SELECT_COLUMNS
        ))
        .bind(&key.region)
        .bind(key.classification.as_str())
        .bind(key.is_paying)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to find tier configuration: {}", e),
            )
        })?;

        row.map(TierConfiguration::try_from).transpose()
    }
}

#[async_trait]
impl TierConfigurationRepository for PostgresTierConfigurationRepository {
    async fn find_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError> {
        self.fetch_by_key(key).await
    }

    async fn create(&self, config: &TierConfiguration) -> Result<(), DomainError> {
        sqlx::query(INSERT_SQL)
            .bind(config.id.as_uuid())
            .bind(&config.region)
            .bind(config.classification.as_str())
            .bind(levels_to_json(&config.levels)?)
            .bind(payments_to_json(&config.payments)?)
            .bind(config.is_paying)
            .bind(config.created_at.as_datetime())
            .bind(config.updated_at.as_datetime())
            .execute(&self.pool)
            .await
            .map_err(|e| map_insert_error(e, &config.key()))?;

        Ok(())
    }

    async fn create_with_indigent_sibling(
        &self,
        paying: &TierConfiguration,
        sibling: &TierConfiguration,
    ) -> Result<CreateOutcome, DomainError> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to begin transaction: {}", e))
        })?;

        sqlx::query(INSERT_SQL)
            .bind(paying.id.as_uuid())
            .bind(&paying.region)
            .bind(paying.classification.as_str())
            .bind(levels_to_json(&paying.levels)?)
            .bind(payments_to_json(&paying.payments)?)
            .bind(paying.is_paying)
            .bind(paying.created_at.as_datetime())
            .bind(paying.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &paying.key()))?;

        let sibling_sql = sibling_insert_sql();
        let sibling_result = sqlx::query(&sibling_sql)
            .bind(sibling.id.as_uuid())
            .bind(&sibling.region)
            .bind(sibling.classification.as_str())
            .bind(levels_to_json(&sibling.levels)?)
            .bind(payments_to_json(&sibling.payments)?)
            .bind(sibling.is_paying)
            .bind(sibling.created_at.as_datetime())
            .bind(sibling.updated_at.as_datetime())
            .execute(&mut *tx)
            .await
            .map_err(|e| map_insert_error(e, &sibling.key()))?;

        tx.commit().await.map_err(|e| {
            DomainError::new(ErrorCode::DatabaseError, format!("Failed to commit transaction: {}", e))
        })?;

        Ok(CreateOutcome {
            indigent_sibling_created: sibling_result.rows_affected() == 1,
        })
    }

    async fn update(&self, config: &TierConfiguration) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE tier_configurations SET
                levels = $2,
                payments = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(config.id.as_uuid())
        .bind(levels_to_json(&config.levels)?)
        .bind(payments_to_json(&config.payments)?)
        .bind(config.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to update tier configuration: {}", e),
            )
        })?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::NotFound,
                format!("Tier configuration not found: {}", config.id),
            ));
        }

        Ok(())
    }
}

#[async_trait]
impl TierConfigurationReader for PostgresTierConfigurationRepository {
    async fn find_by_key(&self, key: &TierKey) -> Result<Option<TierConfiguration>, DomainError> {
        self.fetch_by_key(key).await
    }

    async fn list_by_region(&self, region: &str) -> Result<Vec<TierConfiguration>, DomainError> {
        let rows: Vec<TierConfigurationRow> = sqlx::query_as(&format!(
            "SELECT {} FROM tier_configurations \
             WHERE region = $1 \
             ORDER BY classification ASC, is_paying DESC",
            SELECT_COLUMNS
        ))
        .bind(region.trim())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            DomainError::new(
                ErrorCode::DatabaseError,
                format!("Failed to list tier configurations: {}", e),
            )
        })?;

        rows.into_iter().map(TierConfiguration::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn row(classification: &str, levels: serde_json::Value, payments: serde_json::Value) -> TierConfigurationRow {
        let now = Utc::now();
        TierConfigurationRow {
            id: Uuid::new_v4(),
            region: "Gondar".to_string(),
            classification: classification.to_string(),
            levels,
            payments,
            is_paying: true,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn parse_classification_works_for_all_values() {
        for classification in AreaClassification::ALL {
            assert_eq!(parse_classification(classification.as_str()).unwrap(), classification);
        }
    }

    #[test]
    fn parse_classification_rejects_invalid_values() {
        let err = parse_classification("Suburban").unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn levels_are_stored_as_bare_integer_or_object() {
        assert_eq!(levels_to_json(&LevelsSpec::Flat(3)).unwrap(), json!(3));
        assert_eq!(
            levels_to_json(&LevelsSpec::Split { urban: 2, rural: 3 }).unwrap(),
            json!({"urban": 2, "rural": 3})
        );
    }

    #[test]
    fn payments_are_stored_as_number_array() {
        assert_eq!(payments_to_json(&[50.0, 75.5]).unwrap(), json!([50.0, 75.5]));
    }

    #[test]
    fn row_converts_to_mixed_configuration() {
        let config = TierConfiguration::try_from(row(
            "Mixed",
            json!({"urban": 2, "rural": 3}),
            json!([50, 100, 30, 60, 90]),
        ))
        .unwrap();

        assert_eq!(config.classification, AreaClassification::Mixed);
        assert_eq!(config.levels, LevelsSpec::Split { urban: 2, rural: 3 });
        assert_eq!(config.payments, vec![50.0, 100.0, 30.0, 60.0, 90.0]);
        assert_eq!(config.resolve_level(3).map(|r| r.amount), Some(30.0));
    }

    #[test]
    fn row_with_malformed_payments_is_a_database_error() {
        let err = TierConfiguration::try_from(row("Rural", json!(1), json!({"amount": 5})))
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn sibling_insert_ignores_existing_indigent_row() {
        let sql = sibling_insert_sql();
        assert!(sql.contains("INSERT INTO tier_configurations"));
        assert!(sql.ends_with("ON CONFLICT ON CONSTRAINT tier_configurations_key DO NOTHING"));
    }
}
