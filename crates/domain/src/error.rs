//! Domain error types.

use auth::AuthError;
use store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("only moderators can do that")]
    NoModeratorRights,

    #[error("only employees can do that")]
    NoEmployeeRights,

    #[error("invalid city")]
    InvalidCity,

    #[error("invalid product type")]
    InvalidProductType,

    #[error("pvz not found")]
    PvzNotFound,

    #[error("pvz already exists")]
    PvzAlreadyExists,

    #[error("there is already an open reception")]
    OpenReceptionAlreadyExists,

    /// The last reception is closed, or the pickup point never had one.
    #[error("no open reception to close")]
    NoOpenReceptionToClose,

    #[error("no open reception to add product")]
    NoOpenReceptionToAddTo,

    #[error("no open reception to delete product")]
    NoOpenReceptionToDeleteFrom,

    #[error("no products to delete")]
    NoProductsToDelete,

    #[error("invalid role")]
    InvalidRole,

    #[error("user not found")]
    UserNotFound,

    #[error("wrong username or password")]
    WrongPassword,

    #[error("email already registered")]
    EmailAlreadyRegistered,

    #[error("email and password are required")]
    InvalidCredentialsInput,

    /// Token signing or password hashing failed.
    #[error(transparent)]
    Credentials(#[from] AuthError),

    /// The store rejected or failed the call. Passed through untouched.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Coarse classification of a [`DomainError`], used by transports to pick
/// a status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// The caller's role does not allow the action.
    Forbidden,
    InvalidCity,
    NotFound,
    /// The reception is not in the status the action requires.
    InvalidState,
    /// Nothing to operate on.
    EmptyResult,
    InvalidInput,
    Unauthorized,
    StoreFailure,
    Internal,
}

impl DomainError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            DomainError::NoModeratorRights | DomainError::NoEmployeeRights => ErrorKind::Forbidden,
            DomainError::InvalidCity => ErrorKind::InvalidCity,
            DomainError::PvzNotFound | DomainError::UserNotFound => ErrorKind::NotFound,
            DomainError::OpenReceptionAlreadyExists
            | DomainError::NoOpenReceptionToClose
            | DomainError::NoOpenReceptionToAddTo
            | DomainError::NoOpenReceptionToDeleteFrom => ErrorKind::InvalidState,
            DomainError::NoProductsToDelete => ErrorKind::EmptyResult,
            DomainError::InvalidProductType
            | DomainError::PvzAlreadyExists
            | DomainError::InvalidRole
            | DomainError::EmailAlreadyRegistered
            | DomainError::InvalidCredentialsInput => ErrorKind::InvalidInput,
            DomainError::WrongPassword => ErrorKind::Unauthorized,
            DomainError::Credentials(_) => ErrorKind::Internal,
            DomainError::Store(_) => ErrorKind::StoreFailure,
        }
    }
}
