use std::str::FromStr;

use anyhow::{Context, anyhow};
use sqlx::SqlitePool;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};

use crate::domain::device::models::device::{Device, DeviceKey, DeviceStatus, StoreError};
use crate::domain::device::ports::DeviceRepository;
use crate::outbound::record::DeviceRecord;

#[derive(Debug, Clone)]
pub struct Sqlite {
    pool: SqlitePool,
}

impl Sqlite {
    pub async fn new(path: &str, max_connections: u32) -> Result<Sqlite, anyhow::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(
                SqliteConnectOptions::from_str(path)
                    .with_context(|| format!("invalid database path {}", path))?
                    .create_if_missing(true),
            )
            .await
            .with_context(|| format!("failed to open database at {}", path))?;

        sqlx::migrate!("./migrations")
            .run(&pool)
            .await
            .context("failed to run database migrations")?;

        Ok(Sqlite { pool })
    }
}

impl DeviceRepository for Sqlite {
    async fn fetch_device(&self, key: &DeviceKey) -> Result<Option<Device>, StoreError> {
        let record = sqlx::query_as::<_, DeviceRecord>(
            "SELECT id, city_id, name, description, status, city_status
             FROM devices WHERE id = $1 AND city_id = $2",
        )
        .bind(key.device_id().to_string())
        .bind(key.city_id().to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| anyhow!(e).context(format!("failed to fetch device {}", key)))?;

        record.map(DeviceRecord::into_device).transpose()
    }

    async fn update_device_status(
        &self,
        key: &DeviceKey,
        status: DeviceStatus,
    ) -> Result<(), StoreError> {
        let result = sqlx::query("UPDATE devices SET status = $1 WHERE id = $2 AND city_id = $3")
            .bind(status.to_string())
            .bind(key.device_id().to_string())
            .bind(key.city_id().to_string())
            .execute(&self.pool)
            .await
            .map_err(|e| anyhow!(e).context(format!("failed to update device {}", key)))?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict { key: key.clone() });
        }

        Ok(())
    }
}
