use sqlx::{ConnectOptions, PgConnection};
use tracing::info;

use crate::config::DatabaseConfig;

/// Opens a fresh, unpooled PostgreSQL connection with TLS required.
///
/// Dropping the returned connection releases it; callers close it explicitly
/// on the success path.
pub async fn open_connection(config: &DatabaseConfig) -> Result<PgConnection, sqlx::Error> {
    info!(
        "Connecting to PostgreSQL at {}:{} as {}",
        config.host, config.port, config.user
    );

    config.connect_options().connect().await
}
