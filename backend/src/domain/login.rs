//! Login backed by the user directory.

use async_trait::async_trait;
use tracing::{info, warn};

use super::ports::LoginService;
use super::{Email, Error, LoginCredentials, UserService};

/// Accepts any email registered in the `users` collection.
#[derive(Clone)]
pub struct DirectoryLoginService {
    users: UserService,
}

impl DirectoryLoginService {
    /// Authenticate against `users`.
    pub fn new(users: UserService) -> Self {
        Self { users }
    }
}

#[async_trait]
impl LoginService for DirectoryLoginService {
    async fn authenticate(&self, credentials: &LoginCredentials) -> Result<Email, Error> {
        let email = credentials.email();
        if self.users.find_by_email(email).await?.is_some() {
            info!(identity = %email, "user logged in");
            Ok(email.clone())
        } else {
            warn!(identity = %email, "login for unknown user");
            Err(Error::unauthorized("unknown user"))
        }
    }
}
