use super::{BillingStore, ClonePlan, SqlParam, Statement};
use crate::error::Result;
use async_trait::async_trait;
use sqlx::mysql::MySqlPool;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct MySqlBillingStore {
    pool: MySqlPool,
}

impl MySqlBillingStore {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        let pool = MySqlPool::connect(database_url).await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

#[async_trait]
impl BillingStore for MySqlBillingStore {
    async fn execute_clone(&self, plan: &ClonePlan) -> Result<Option<i64>> {
        let mut tx = self.pool.begin().await?;

        let inserted = sqlx::query(&plan.insert_record)
            .bind(plan.source_id)
            .execute(&mut *tx)
            .await?;
        if inserted.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(None);
        }
        let new_id = inserted.last_insert_id() as i64;

        if let Some(reset) = &plan.reset_created_at {
            sqlx::query(reset).bind(new_id).execute(&mut *tx).await?;
        }

        if let Some(breakdown) = &plan.breakdown {
            let rows: Vec<i64> = sqlx::query_scalar(&breakdown.select_ids)
                .bind(plan.source_id)
                .fetch_all(&mut *tx)
                .await?;
            debug!("Cloning {} breakdown row(s) of {}", rows.len(), plan.source_id);

            for row_id in rows {
                let copy = sqlx::query(&breakdown.insert_row)
                    .bind(row_id)
                    .execute(&mut *tx)
                    .await?;
                sqlx::query(&breakdown.repoint_row)
                    .bind(new_id)
                    .bind(copy.last_insert_id() as i64)
                    .execute(&mut *tx)
                    .await?;
            }
        }

        tx.commit().await?;
        Ok(Some(new_id))
    }

    async fn execute(&self, statement: &Statement) -> Result<u64> {
        let mut query = sqlx::query(&statement.sql);
        for param in &statement.params {
            query = match param {
                SqlParam::Int(value) => query.bind(*value),
                SqlParam::Text(value) => query.bind(value.clone()),
            };
        }
        let result = query.execute(&self.pool).await?;
        Ok(result.rows_affected())
    }
}
