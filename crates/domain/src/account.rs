//! Registration, login and test logins.

use auth::{JwtService, hash_password, verify_password};
use common::{Role, User, UserId};
use store::Store;
use store::store::constraints;

use crate::DomainError;

/// Service for user accounts and token issuance.
pub struct AccountService<S: Store> {
    store: S,
    jwt: JwtService,
}

impl<S: Store> AccountService<S> {
    pub fn new(store: S, jwt: JwtService) -> Self {
        Self { store, jwt }
    }

    /// Creates an account with a hashed password.
    #[tracing::instrument(skip(self, password))]
    pub async fn register(
        &self,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User, DomainError> {
        if email.trim().is_empty() || password.is_empty() {
            return Err(DomainError::InvalidCredentialsInput);
        }
        let role: Role = role.parse().map_err(|_| DomainError::InvalidRole)?;

        let user = User {
            id: UserId::generate(),
            email: email.to_string(),
            password_hash: hash_password(password)?,
            role,
        };
        self.store.create_user(&user).await.map_err(|e| {
            if e.is_conflict_on(constraints::USER_EMAIL) {
                DomainError::EmailAlreadyRegistered
            } else {
                e.into()
            }
        })?;
        Ok(user)
    }

    /// Checks the password and issues a token for the account's id and role.
    #[tracing::instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &str) -> Result<String, DomainError> {
        let user = self
            .store
            .find_user_by_email(email)
            .await?
            .ok_or(DomainError::UserNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(DomainError::WrongPassword);
        }
        Ok(self.jwt.issue(user.id.as_str(), user.role)?)
    }

    /// Issues a token for `role` without an account. The subject is `dummy_<role>`.
    #[tracing::instrument(skip(self))]
    pub fn dummy_login(&self, role: &str) -> Result<String, DomainError> {
        let role: Role = role.parse().map_err(|_| DomainError::InvalidRole)?;
        Ok(self.jwt.issue(&format!("dummy_{role}"), role)?)
    }
}
