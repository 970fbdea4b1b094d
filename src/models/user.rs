//! User account model

use serde::{Deserialize, Serialize};

/// A user account as returned by the server.
///
/// Depending on the deployment's auth strategy the identity field on the
/// wire is either `email` (OTP login) or `name` (direct name login); both
/// are carried as optional and `identity()` picks whichever is present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub enabled: bool,
    pub is_admin: bool,
}

impl User {
    /// Display identity: email, then name, then the raw id.
    pub fn identity(&self) -> &str {
        self.email
            .as_deref()
            .or(self.name.as_deref())
            .unwrap_or(&self.user_id)
    }

    /// Role string for the session banner.
    pub fn role(&self) -> &'static str {
        if self.is_admin {
            "admin"
        } else {
            "user"
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(email: Option<&str>, name: Option<&str>, is_admin: bool) -> User {
        User {
            user_id: "u1".into(),
            email: email.map(String::from),
            name: name.map(String::from),
            enabled: true,
            is_admin,
        }
    }

    #[test]
    fn test_identity_prefers_email_then_name_then_id() {
        assert_eq!(
            user(Some("a@x"), Some("Ana"), false).identity(),
            "a@x"
        );
        assert_eq!(user(None, Some("Ana"), false).identity(), "Ana");
        assert_eq!(user(None, None, false).identity(), "u1");
    }

    #[test]
    fn test_role_string() {
        assert_eq!(user(None, None, false).role(), "user");
        assert_eq!(user(None, None, true).role(), "admin");
    }
}
