pub mod extractors;
pub mod gateway;
pub mod middleware;
pub mod password;
pub mod token;

use chrono::Duration;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::models::UserProfile;

pub use extractors::CurrentUser;
pub use gateway::AuthGateway;
pub use middleware::AuthMiddleware;
pub use password::PasswordHasher;
pub use token::{Claims, TokenService};

/// Represents the JSON payload for `POST /auth/signup`.
#[derive(Debug, Deserialize, Validate)]
pub struct SignupRequest {
    /// Desired username. Any non-empty text up to 255 characters.
    #[validate(length(min = 1, max = 255))]
    pub username: String,
    /// Plaintext password; hashed before it is stored.
    #[validate(length(min = 1, max = 72))]
    pub password: String,
    #[validate(length(max = 200))]
    pub full_name: Option<String>,
    #[validate(email)]
    pub email: Option<String>,
    #[validate(length(max = 500))]
    pub avatar: Option<String>,
    #[validate(length(max = 2000))]
    pub bio: Option<String>,
}

/// Form payload for `POST /auth/login` (OAuth2 password flow field names).
#[derive(Debug, Deserialize)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

/// Token returned by login, and embedded in the signup response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
    /// Seconds until the token expires.
    pub expires_in: i64,
}

impl TokenResponse {
    pub fn bearer(access_token: String, ttl: Duration) -> Self {
        Self {
            access_token,
            token_type: "bearer".to_string(),
            expires_in: ttl.num_seconds(),
        }
    }
}

/// Response body of a successful signup.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SignupResponse {
    #[serde(flatten)]
    pub token: TokenResponse,
    pub user: UserProfile,
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    fn signup(username: &str, password: &str, email: Option<&str>) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            full_name: None,
            email: email.map(String::from),
            avatar: None,
            bio: None,
        }
    }

    #[test]
    fn test_signup_request_validation() {
        assert!(signup("alice", "pw1", None).validate().is_ok());
        assert!(signup("test_user-1.2", "pw1", Some("a@example.com"))
            .validate()
            .is_ok());
        for username in ["alice@example.com", "Alice Smith", "josé", "a,b"] {
            assert!(signup(username, "pw1", None).validate().is_ok(), "{}", username);
        }

        assert!(signup("", "pw1", None).validate().is_err());
        assert!(signup(&"a".repeat(256), "pw1", None).validate().is_err());
        assert!(signup("alice", "", None).validate().is_err());
        assert!(signup("alice", "pw1", Some("not-an-email")).validate().is_err());
    }

    #[test]
    fn test_signup_response_shape() {
        let response = SignupResponse {
            token: TokenResponse::bearer("abc".to_string(), Duration::minutes(30)),
            user: UserProfile {
                username: "alice".to_string(),
                full_name: None,
                email: None,
                avatar: None,
                bio: None,
            },
        };

        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["access_token"], "abc");
        assert_eq!(json["token_type"], "bearer");
        assert_eq!(json["expires_in"], 1800);
        assert_eq!(json["user"]["username"], "alice");
    }
}
