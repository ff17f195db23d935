use mongodb::{Client, Database};

use crate::errors::{AppError, Result};

pub async fn get_db_client(database_url: &str, db_name: &str) -> Result<Database> {
    let client = Client::with_uri_str(database_url)
        .await
        .map_err(|e| AppError::persistence(format!("Failed to connect to MongoDB: {}", e)))?;

    let db = client.database(db_name);

    // Listing collections forces a round trip so a bad URL fails at startup.
    match db.list_collection_names().await {
        Ok(collections) => {
            tracing::info!("✅ Connected to database: {}", db_name);
            tracing::debug!("📂 Collections found: {:?}", collections);

            if !collections.iter().any(|name| name == "users") {
                tracing::warn!("⚠️ 'users' collection not found; it will be created on first insert");
            }
        }
        Err(e) => {
            tracing::error!("❌ Database '{}' may not exist or is inaccessible: {}", db_name, e);
            return Err(e.into());
        }
    }

    Ok(db)
}
