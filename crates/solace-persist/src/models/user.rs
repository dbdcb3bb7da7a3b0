use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Database-agnostic user model
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    /// Always stored trimmed and lowercased
    pub email: String,
    pub password_hash: String,
    pub password_salt: String,
    pub age: u32,
    pub terms_accepted: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    pub fn new(
        email: &str,
        password_hash: impl Into<String>,
        password_salt: impl Into<String>,
        age: u32,
        terms_accepted: bool,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: super::new_id(),
            email: Self::normalize_email(email),
            password_hash: password_hash.into(),
            password_salt: password_salt.into(),
            age,
            terms_accepted,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn normalize_email(email: &str) -> String {
        email.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_is_normalized() {
        let user = User::new("  Jane.Doe@Example.COM ", "hash", "salt", 30, true);
        assert_eq!(user.email, "jane.doe@example.com");
        assert_eq!(user.created_at, user.updated_at);
        assert!(!user.id.is_empty());
    }
}
