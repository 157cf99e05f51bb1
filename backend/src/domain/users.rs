//! User directory: registration, role lookup and promotion.

use std::sync::Arc;

use serde_json::Value;

use super::document::string_field;
use super::ports::{DocumentRepository, InsertOutcome, UpdateOutcome};
use super::{Collection, Document, DocumentId, Email, Error, ID_FIELD, RecordService};

/// Role assigned to every self-registered user.
pub const DEFAULT_ROLE: &str = "user";
/// Role granting access to every record.
pub const ADMIN_ROLE: &str = "admin";

const EMAIL_FIELD: &str = "email";
const ROLE_FIELD: &str = "role";

/// Operations over the `users` collection.
#[derive(Clone)]
pub struct UserService {
    records: RecordService,
}

impl UserService {
    /// Build the directory over `repository`.
    pub fn new(repository: Arc<dyn DocumentRepository>) -> Self {
        Self {
            records: RecordService::new(repository, Collection::Users),
        }
    }

    /// Plain record access for listing, lookup and deletion.
    pub fn records(&self) -> &RecordService {
        &self.records
    }

    /// Register a user.
    ///
    /// The email must be valid and unused; the role is always
    /// [`DEFAULT_ROLE`] regardless of the payload.
    ///
    /// # Errors
    /// `invalid_request` for a missing or malformed email, `conflict` when a
    /// user with the same email exists.
    pub async fn register(&self, mut document: Document) -> Result<InsertOutcome, Error> {
        let raw = string_field(&document, EMAIL_FIELD)
            .ok_or_else(|| Error::invalid_request("email is required"))?;
        let email = Email::new(raw).map_err(|err| Error::invalid_request(err.to_string()))?;

        if self.find_by_email(&email).await?.is_some() {
            return Err(Error::conflict("user already exists"));
        }

        document.insert(EMAIL_FIELD.to_owned(), Value::String(email.into()));
        document.insert(ROLE_FIELD.to_owned(), Value::from(DEFAULT_ROLE));
        self.records.create(document).await
    }

    /// User document registered under `email`.
    pub async fn find_by_email(&self, email: &Email) -> Result<Option<Document>, Error> {
        self.records.find_by(EMAIL_FIELD, email.as_str()).await
    }

    /// Whether `email` belongs to an admin.
    ///
    /// Unknown users are not admins.
    pub async fn is_admin(&self, email: &Email) -> Result<bool, Error> {
        Ok(self
            .find_by_email(email)
            .await?
            .as_ref()
            .is_some_and(has_admin_role))
    }

    /// Reject `email` when a user other than `id` already holds it.
    ///
    /// # Errors
    /// `conflict` when the address belongs to another user.
    pub async fn ensure_email_free(&self, email: &Email, id: &DocumentId) -> Result<(), Error> {
        let holder = self.find_by_email(email).await?;
        match holder.as_ref().and_then(|doc| string_field(doc, ID_FIELD)) {
            Some(holder_id) if holder_id != id.as_str() => {
                Err(Error::conflict("user already exists"))
            }
            _ => Ok(()),
        }
    }

    /// Grant the admin role to the identified user.
    pub async fn promote(&self, id: &DocumentId) -> Result<UpdateOutcome, Error> {
        let mut changes = Document::new();
        changes.insert(ROLE_FIELD.to_owned(), Value::from(ADMIN_ROLE));
        self.records.update_existing(id, changes).await
    }
}

/// Whether a user document carries the admin role.
pub fn has_admin_role(document: &Document) -> bool {
    string_field(document, ROLE_FIELD) == Some(ADMIN_ROLE)
}
