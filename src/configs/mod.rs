use std::time::Duration;

use sqlx::{PgPool, postgres::PgPoolOptions};

use crate::{ENV, api::error};

async fn try_connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(ENV.db_max_connections)
        .min_connections(1)
        .acquire_slow_threshold(Duration::from_secs(3))
        .connect(database_url)
        .await?;

    sqlx::query("SELECT 1").execute(&pool).await?;
    Ok(pool)
}

/// Dials the store, waiting between attempts while it comes up.
pub async fn connect_database() -> Result<PgPool, error::SystemError> {
    let attempts = ENV.db_connect_attempts;
    let delay = Duration::from_secs(ENV.db_connect_retry_secs);

    let mut attempt = 1;
    loop {
        match try_connect(&ENV.database_url).await {
            Ok(pool) => {
                log::info!("Connected to database after {} attempt(s)", attempt);
                return Ok(pool);
            }
            Err(err) if attempt < attempts => {
                log::warn!("Waiting for database to be ready ({}/{}): {}", attempt, attempts, err);
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            Err(err) => return Err(err.into()),
        }
    }
}
