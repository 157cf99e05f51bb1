//! MongoDB adapter for the document repository port.
//!
//! One [`mongodb::Client`] is shared by every request; the driver pools
//! connections internally.

mod convert;
mod repository;

use mongodb::bson::doc;
use mongodb::options::ClientOptions;
use mongodb::{Client, Database};
use regex::Regex;
use tracing::info;

pub use repository::MongoDocumentRepository;

const APP_NAME: &str = "petmatch-backend";
const URI_PATTERN: &str = r"^mongodb(\+srv)?://([^/\s]+)(/.*)?$";

/// Errors raised while connecting to MongoDB.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MongoStoreError {
    /// The connection string is malformed.
    #[error("invalid MongoDB URI: {message}")]
    InvalidUri {
        /// Why the URI was rejected.
        message: String,
    },
    /// The server could not be reached or refused the handshake.
    #[error("failed to connect to MongoDB: {message}")]
    Connect {
        /// Driver error text.
        message: String,
    },
}

/// Connected database handle.
#[derive(Clone, Debug)]
pub struct MongoStore {
    database: Database,
}

impl MongoStore {
    /// Validate `uri`, connect and ping `database`.
    ///
    /// # Errors
    /// [`MongoStoreError::InvalidUri`] for malformed URIs and
    /// [`MongoStoreError::Connect`] when the server cannot be reached.
    pub async fn connect(uri: &str, database: &str) -> Result<Self, MongoStoreError> {
        validate_mongo_uri(uri)?;

        let mut options = ClientOptions::parse(uri)
            .await
            .map_err(|err| MongoStoreError::InvalidUri {
                message: err.to_string(),
            })?;
        options.app_name = Some(APP_NAME.to_owned());

        let client = Client::with_options(options).map_err(connect_error)?;
        let database = client.database(database);
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(connect_error)?;

        info!(database = database.name(), "connected to MongoDB");
        Ok(Self { database })
    }

    /// Database handle.
    pub fn database(&self) -> &Database {
        &self.database
    }

    /// Repository adapter over this database.
    pub fn repository(&self) -> MongoDocumentRepository {
        MongoDocumentRepository::new(self.database.clone())
    }
}

fn connect_error(err: mongodb::error::Error) -> MongoStoreError {
    MongoStoreError::Connect {
        message: err.to_string(),
    }
}

/// Reject URIs that are not `mongodb://` or `mongodb+srv://` with a host.
fn validate_mongo_uri(uri: &str) -> Result<(), MongoStoreError> {
    let invalid = |message: &str| MongoStoreError::InvalidUri {
        message: message.to_owned(),
    };

    let trimmed = uri.trim();
    if trimmed.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if uri.contains(char::is_whitespace) {
        return Err(invalid("must not contain whitespace"));
    }
    if !trimmed.starts_with("mongodb://") && !trimmed.starts_with("mongodb+srv://") {
        return Err(invalid("must start with 'mongodb://' or 'mongodb+srv://'"));
    }

    let pattern = Regex::new(URI_PATTERN).map_err(|err| MongoStoreError::InvalidUri {
        message: err.to_string(),
    })?;
    if !pattern.is_match(trimmed) {
        return Err(invalid(
            "expected mongodb://host[:port][/database] or mongodb+srv://host[/database]",
        ));
    }
    Ok(())
}
