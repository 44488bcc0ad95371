//! Default administrator configuration loaded from environment variables.
//!
//! On startup the server makes sure one administrator account exists so the
//! back office can be logged into on a fresh database. The credentials come from
//! `ADMIN_USERNAME`, `ADMIN_PASSWORD` and `ADMIN_NAME` in the `.env` file and
//! fall back to `admin` / `1234` / `관리자`.

/// Credentials of the account seeded on startup
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DefaultAdmin {
    /// Login name; also the name of the account that can never be deleted
    pub username: String,
    /// Plaintext password
    pub password: String,
    /// Display name
    pub name: String,
}

/// Username of the built-in administrator that cannot be deleted.
pub const DEFAULT_ADMIN_USERNAME: &str = "admin";

/// Reads the default administrator credentials from the environment.
#[must_use]
pub fn get_default_admin() -> DefaultAdmin {
    DefaultAdmin {
        username: std::env::var("ADMIN_USERNAME")
            .unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string()),
        password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "1234".to_string()),
        name: std::env::var("ADMIN_NAME").unwrap_or_else(|_| "관리자".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_admin_has_credentials() {
        // Values depend on the environment, so only check that nothing is blank
        let admin = get_default_admin();
        assert!(!admin.username.is_empty());
        assert!(!admin.password.is_empty());
        assert!(!admin.name.is_empty());
    }
}
