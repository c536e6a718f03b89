//! PostgreSQL round-trip check backing the detailed health report.

use async_trait::async_trait;
use diesel::sql_query;
use diesel_async::RunQueryDsl;

use crate::domain::ports::{ConnectivityCheck, ConnectivityCheckError};

use super::diesel_basic_error_mapping::{map_basic_diesel_error, map_basic_pool_error};
use super::pool::DbPool;

/// Runs `SELECT 1` on a pooled connection.
#[derive(Clone)]
pub struct DieselConnectivityCheck {
    pool: DbPool,
}

impl DieselConnectivityCheck {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ConnectivityCheck for DieselConnectivityCheck {
    async fn check(&self) -> Result<(), ConnectivityCheckError> {
        let mut conn = self
            .pool
            .get()
            .await
            .map_err(|err| map_basic_pool_error(err, ConnectivityCheckError::unavailable))?;

        sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|err| {
                map_basic_diesel_error(
                    err,
                    ConnectivityCheckError::unavailable,
                    ConnectivityCheckError::unavailable,
                )
            })
    }
}
