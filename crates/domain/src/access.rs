//! Role gates applied before any store access.

use common::Role;

use crate::DomainError;

/// Fails with [`DomainError::NoEmployeeRights`] unless the caller is an employee.
pub fn require_employee(role: Role) -> Result<(), DomainError> {
    match role {
        Role::Employee => Ok(()),
        Role::Moderator => Err(DomainError::NoEmployeeRights),
    }
}

/// Fails with [`DomainError::NoModeratorRights`] unless the caller is a moderator.
pub fn require_moderator(role: Role) -> Result<(), DomainError> {
    match role {
        Role::Moderator => Ok(()),
        Role::Employee => Err(DomainError::NoModeratorRights),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gates() {
        assert!(require_employee(Role::Employee).is_ok());
        assert!(matches!(
            require_employee(Role::Moderator),
            Err(DomainError::NoEmployeeRights)
        ));
        assert!(require_moderator(Role::Moderator).is_ok());
        assert!(matches!(
            require_moderator(Role::Employee),
            Err(DomainError::NoModeratorRights)
        ));
    }
}
