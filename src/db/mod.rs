use mongodb::{
    bson::doc,
    error::{ErrorKind, WriteFailure},
    options::{ClientOptions, ServerApi, ServerApiVersion},
    Client, Collection,
};
use std::time::Duration;

use crate::{config::Config, errors::AppResult};

const DUPLICATE_KEY_CODE: i32 = 11000;
const MAX_POOL_SIZE: u32 = 10;
const MIN_POOL_SIZE: u32 = 2;
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
const SERVER_SELECTION_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Clone)]
pub struct Database {
    client: Client,
    db_name: String,
}

impl Database {
    pub async fn connect(config: &Config) -> AppResult<Self> {
        let mut client_options = ClientOptions::parse(&config.mongo_conn_string).await?;

        apply_pool_options(&mut client_options);
        log::info!(
            "MongoDB pool for '{}': {}-{} connections, connect timeout {:?}",
            config.mongo_db_name,
            MIN_POOL_SIZE,
            MAX_POOL_SIZE,
            CONNECT_TIMEOUT
        );

        let client = Client::with_options(client_options)?;

        client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;

        log::info!("Connected to MongoDB database '{}'", config.mongo_db_name);

        Ok(Self {
            client,
            db_name: config.mongo_db_name.clone(),
        })
    }

    pub fn get_collection<T>(&self, collection_name: &str) -> Collection<T>
    where
        T: Send + Sync,
    {
        self.client
            .database(&self.db_name)
            .collection(collection_name)
    }

    pub async fn health_check(&self) -> AppResult<()> {
        self.client
            .database("admin")
            .run_command(doc! { "ping": 1 })
            .await?;
        Ok(())
    }
}

/// Stable API v1 and a bounded pool.
fn apply_pool_options(options: &mut ClientOptions) {
    options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
    options.max_pool_size = Some(MAX_POOL_SIZE);
    options.min_pool_size = Some(MIN_POOL_SIZE);
    options.connect_timeout = Some(CONNECT_TIMEOUT);
    options.server_selection_timeout = Some(SERVER_SELECTION_TIMEOUT);
}

/// True when a write was rejected by a unique index.
pub fn is_duplicate_key(err: &mongodb::error::Error) -> bool {
    match err.kind.as_ref() {
        ErrorKind::Write(WriteFailure::WriteError(write_error)) => {
            write_error.code == DUPLICATE_KEY_CODE
        }
        _ => false,
    }
}
