pub mod blog;
pub mod user;

use std::time::Duration;

use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, Schema};
use tokio::time::sleep;

use crate::error::Result;

const CONNECT_ATTEMPTS: u32 = 10;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(3);

/// Connects to the database, retrying while it comes up.
pub async fn connect(database_url: &str) -> Result<DatabaseConnection> {
    let mut options = ConnectOptions::new(database_url.to_owned());
    // A pooled in-memory SQLite hands every pool connection its own
    // database; pin such pools to a single connection.
    if database_url.contains(":memory:") {
        options.max_connections(1).min_connections(1);
    }

    let mut attempt = 1;
    loop {
        match Database::connect(options.clone()).await {
            Ok(conn) => return Ok(conn),
            Err(err) if attempt < CONNECT_ATTEMPTS => {
                log::warn!("database connect attempt {attempt}/{CONNECT_ATTEMPTS} failed: {err}");
                attempt += 1;
                sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(err) => return Err(err.into()),
        }
    }
}

/// Creates the tables for all entities if they do not exist yet.
pub async fn init_schema(db: &DatabaseConnection) -> Result<()> {
    let builder = db.get_database_backend();
    let schema = Schema::new(builder);

    let mut users = schema.create_table_from_entity(user::Entity);
    users.if_not_exists();
    db.execute(builder.build(&users)).await?;

    let mut blogs = schema.create_table_from_entity(blog::Entity);
    blogs.if_not_exists();
    db.execute(builder.build(&blogs)).await?;

    Ok(())
}
