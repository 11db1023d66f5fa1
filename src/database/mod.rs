pub mod repository;
pub mod surveys;
pub mod users;

#[cfg(test)]
pub mod memory;

pub use repository::*;
pub use surveys::MongoSurveyRepository;
pub use users::MongoUserRepository;

use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::{Client, Collection, Database};
use std::time::Duration;

pub const USERS: &str = "users";
pub const SURVEYS: &str = "surveys";

#[derive(Clone)]
pub struct MongoDB {
    client: Client,
    db: Database,
}

impl MongoDB {
    pub async fn new(uri: &str, db_name: &str) -> Result<Self, mongodb::error::Error> {
        let mut client_options = mongodb::options::ClientOptions::parse(uri).await?;

        client_options.max_pool_size = Some(20);
        client_options.min_pool_size = Some(2);
        client_options.max_idle_time = Some(Duration::from_secs(300));

        client_options.connect_timeout = Some(Duration::from_secs(5));
        client_options.server_selection_timeout = Some(Duration::from_secs(5));

        let client = Client::with_options(client_options)?;
        let db = client.database(db_name);

        // Test connection
        db.list_collection_names().await?;

        let mongodb = Self { client, db };
        mongodb.ensure_indexes().await?;

        Ok(mongodb)
    }

    /// Unique indexes backing the email and one-survey-per-user invariants.
    async fn ensure_indexes(&self) -> Result<(), mongodb::error::Error> {
        use mongodb::bson::Document;
        use mongodb::options::IndexOptions;
        use mongodb::IndexModel;

        log::info!("🔧 Creating database indexes...");

        let unique = || IndexOptions::builder().unique(true).build();

        let users = self.collection::<Document>(USERS);
        let email_index = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(unique())
            .build();
        users.create_index(email_index).await?;
        log::info!("   ✅ Index ready: users(email) unique");

        let surveys = self.collection::<Document>(SURVEYS);
        let owner_index = IndexModel::builder()
            .keys(doc! { "user": 1 })
            .options(unique())
            .build();
        surveys.create_index(owner_index).await?;
        log::info!("   ✅ Index ready: surveys(user) unique");

        Ok(())
    }

    pub fn collection<T: Send + Sync>(&self, name: &str) -> Collection<T> {
        self.db.collection(name)
    }

    /// Closes pooled connections. Call once the HTTP server has stopped.
    pub async fn shutdown(self) {
        self.client.shutdown().await;
    }
}

#[async_trait]
impl StoreHealth for MongoDB {
    async fn ping(&self) -> Result<(), crate::utils::AppError> {
        self.db.run_command(doc! { "ping": 1 }).await?;
        Ok(())
    }
}

/// Database name from the path segment of a connection string, if any.
pub fn database_name_from_uri(uri: &str) -> Option<String> {
    let rest = uri.split_once("://").map(|(_, rest)| rest)?;
    let (_, path) = rest.split_once('/')?;
    let name = path.split('?').next().unwrap_or_default();
    if name.is_empty() {
        None
    } else {
        Some(name.to_string())
    }
}
