//! Authorization by identity equality.
//!
//! Most routes authorise by comparing the emails a request names with the
//! session identity. Admins (users stored with `role == "admin"`) bypass
//! those comparisons.

use serde_json::Value;
use tracing::warn;

use super::document::string_field;
use super::{Document, Email, Error, UserService};

const OWNER_FIELD: &str = "email";

/// Checks a session identity against the records and emails a request names.
#[derive(Clone)]
pub struct AccessPolicy {
    users: UserService,
}

impl AccessPolicy {
    /// Build a policy that resolves roles through `users`.
    pub fn new(users: UserService) -> Self {
        Self { users }
    }

    /// Whether the identity is an admin.
    pub async fn is_admin(&self, identity: &Email) -> Result<bool, Error> {
        self.users.is_admin(identity).await
    }

    /// Require the admin role.
    pub async fn require_admin(&self, identity: &Email) -> Result<(), Error> {
        if self.is_admin(identity).await? {
            Ok(())
        } else {
            warn!(identity = %identity, "admin access denied");
            Err(Error::forbidden("admin access required"))
        }
    }

    /// Require every named email to be the identity, unless admin.
    pub async fn ensure_named(&self, identity: &Email, named: &[&str]) -> Result<(), Error> {
        if named.iter().all(|email| identity.matches(email)) {
            return Ok(());
        }
        if self.is_admin(identity).await? {
            return Ok(());
        }
        warn!(identity = %identity, "identity does not match requested email");
        Err(Error::forbidden("forbidden access"))
    }

    /// Authorise a listing over a session-scoped collection.
    ///
    /// Non-admins must name themselves; an unfiltered listing is admin-only.
    pub async fn ensure_scoped_listing(
        &self,
        identity: &Email,
        named: &[&str],
    ) -> Result<(), Error> {
        if named.is_empty() {
            return self.require_admin(identity).await;
        }
        self.ensure_named(identity, named).await
    }

    /// Require the identity to own `record`, unless admin.
    ///
    /// Absent records pass so upserts can create them. An existing record
    /// without a string owner is admin-only.
    pub async fn ensure_owner(
        &self,
        identity: &Email,
        record: Option<&Document>,
    ) -> Result<(), Error> {
        let Some(record) = record else {
            return Ok(());
        };
        match string_field(record, OWNER_FIELD) {
            Some(owner) => self.ensure_named(identity, &[owner]).await,
            None => self.require_admin(identity).await,
        }
    }

    /// Vet the owner named by update `changes`.
    ///
    /// An `email` in the changes must be a string naming the identity, unless
    /// admin; updates without one leave ownership untouched.
    pub async fn ensure_owner_change(
        &self,
        identity: &Email,
        changes: &Document,
    ) -> Result<(), Error> {
        match changes.get(OWNER_FIELD) {
            None => Ok(()),
            Some(Value::String(owner)) => self.ensure_named(identity, &[owner.as_str()]).await,
            Some(_) => Err(Error::invalid_request("email must be a string")),
        }
    }

    /// Prepare a creation body: a named owner must be the identity (unless
    /// admin), a missing owner is filled in with the identity.
    pub async fn claim(&self, identity: &Email, mut document: Document) -> Result<Document, Error> {
        match document.get(OWNER_FIELD) {
            Some(Value::String(owner)) => {
                let owner = owner.clone();
                self.ensure_named(identity, &[owner.as_str()]).await?;
            }
            Some(_) => return Err(Error::invalid_request("email must be a string")),
            None => {
                document.insert(
                    OWNER_FIELD.to_owned(),
                    Value::String(identity.as_str().to_owned()),
                );
            }
        }
        Ok(document)
    }
}
