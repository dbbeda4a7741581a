use crate::auth::{
    CurrentUser, PasswordHasher, SignupRequest, SignupResponse, TokenResponse, TokenService,
};
use crate::db::UserStore;
use crate::error::AppError;
use crate::models::{NewUser, User, UserProfile};
use validator::Validate;

/// Signup, login and bearer-token resolution.
#[derive(Debug, Clone)]
pub struct AuthGateway {
    users: UserStore,
    hasher: PasswordHasher,
    tokens: TokenService,
    // Verified against when the username is unknown, so both login failures cost a bcrypt check.
    dummy_digest: Option<String>,
}

impl AuthGateway {
    pub fn new(users: UserStore, hasher: PasswordHasher, tokens: TokenService) -> Self {
        let dummy_digest = match hasher.hash("unknown-user-placeholder") {
            Ok(digest) => Some(digest),
            Err(e) => {
                log::warn!("no placeholder digest for unknown-user logins: {}", e);
                None
            }
        };

        Self {
            users,
            hasher,
            tokens,
            dummy_digest,
        }
    }

    /// Creates an account and returns a token for it.
    ///
    /// Fails with `Conflict` if the username is taken, including when a concurrent
    /// signup wins the race to the unique index.
    pub async fn signup(&self, request: SignupRequest) -> Result<SignupResponse, AppError> {
        request.validate()?;

        if self.users.exists(&request.username).await? {
            return Err(username_taken());
        }

        let user = self.create_account(request).await?;
        log::info!("user {} signed up", user.username);
        let token = self.issue(&user.username)?;

        Ok(SignupResponse {
            token,
            user: user.into(),
        })
    }

    async fn create_account(&self, request: SignupRequest) -> Result<User, AppError> {
        let hasher = self.hasher;
        let password = request.password;
        let password_hash = blocking(move || hasher.hash(&password)).await?;

        self.users
            .insert(NewUser {
                username: request.username,
                password_hash,
                full_name: request.full_name,
                email: request.email,
                avatar: request.avatar,
                bio: request.bio,
            })
            .await
            .map_err(|e| match e {
                AppError::Conflict(_) => username_taken(),
                other => other,
            })
    }

    /// Exchanges credentials for a token.
    ///
    /// An unknown username and a wrong password both yield `InvalidCredentials`.
    pub async fn login(&self, username: &str, password: &str) -> Result<TokenResponse, AppError> {
        let user = match self.users.find_by_username(username).await? {
            Some(user) => user,
            None => {
                if let Some(digest) = self.dummy_digest.clone() {
                    let hasher = self.hasher;
                    let password = password.to_string();
                    let _ = blocking(move || hasher.verify(&password, &digest)).await;
                }
                log::debug!("login rejected: unknown user");
                return Err(AppError::InvalidCredentials);
            }
        };

        let hasher = self.hasher;
        let password = password.to_string();
        let digest = user.password.clone();
        let matches = blocking(move || hasher.verify(&password, &digest)).await?;
        if !matches {
            log::debug!("login rejected for {}: wrong password", user.username);
            return Err(AppError::InvalidCredentials);
        }

        self.issue(&user.username)
    }

    /// Resolves a bearer token to the identity it was issued for.
    ///
    /// The subject is trusted as-is; the user table is not consulted.
    pub fn resolve_current_user(&self, token: &str) -> Result<CurrentUser, AppError> {
        self.tokens.verify(token).map(CurrentUser)
    }

    /// Profile of an authenticated user. A subject without a user row is `Unauthorized`.
    pub async fn profile(&self, user: &CurrentUser) -> Result<UserProfile, AppError> {
        self.users
            .find_by_username(user.username())
            .await?
            .map(UserProfile::from)
            .ok_or_else(|| AppError::Unauthorized("User no longer exists".into()))
    }

    fn issue(&self, username: &str) -> Result<TokenResponse, AppError> {
        let token = self.tokens.issue(username)?;
        Ok(TokenResponse::bearer(token, self.tokens.ttl()))
    }
}

fn username_taken() -> AppError {
    AppError::Conflict("Username already exists".into())
}

// bcrypt runs on the blocking pool.
async fn blocking<T, F>(f: F) -> Result<T, AppError>
where
    F: FnOnce() -> Result<T, AppError> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| AppError::InternalServerError(format!("password task failed: {}", e)))?
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::memory_db;
    use chrono::Duration;

    async fn gateway() -> AuthGateway {
        AuthGateway::new(
            UserStore::new(memory_db().await),
            PasswordHasher::new(4),
            TokenService::new("gateway-test-secret", Duration::minutes(30)),
        )
    }

    fn signup(username: &str, password: &str) -> SignupRequest {
        SignupRequest {
            username: username.to_string(),
            password: password.to_string(),
            full_name: Some("Test User".to_string()),
            email: None,
            avatar: None,
            bio: None,
        }
    }

    #[actix_rt::test]
    async fn test_signup_then_login() {
        let auth = gateway().await;

        let created = auth.signup(signup("alice", "pw1")).await.unwrap();
        assert_eq!(created.token.token_type, "bearer");
        assert_eq!(created.token.expires_in, 30 * 60);
        assert_eq!(created.user.username, "alice");
        assert_eq!(created.user.full_name.as_deref(), Some("Test User"));
        assert_eq!(
            auth.resolve_current_user(&created.token.access_token)
                .unwrap()
                .username(),
            "alice"
        );

        let login = auth.login("alice", "pw1").await.unwrap();
        assert_eq!(
            auth.resolve_current_user(&login.access_token).unwrap(),
            CurrentUser("alice".to_string())
        );
    }

    #[actix_rt::test]
    async fn test_password_is_stored_hashed() {
        let auth = gateway().await;
        auth.signup(signup("alice", "pw1")).await.unwrap();

        let stored = auth.users.find_by_username("alice").await.unwrap().unwrap();
        assert_ne!(stored.password, "pw1");
        assert!(stored.password.starts_with("$2"));
    }

    #[actix_rt::test]
    async fn test_duplicate_signup_is_conflict() {
        let auth = gateway().await;
        auth.signup(signup("alice", "pw1")).await.unwrap();

        match auth.signup(signup("alice", "other")).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Username already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_signup_losing_insert_race_is_conflict() {
        let auth = gateway().await;
        // Another signup takes the name after the existence check has passed.
        auth.users
            .insert(NewUser {
                username: "alice".to_string(),
                password_hash: "$2b$04$someone-else".to_string(),
                full_name: None,
                email: None,
                avatar: None,
                bio: None,
            })
            .await
            .unwrap();

        match auth.create_account(signup("alice", "pw1")).await {
            Err(AppError::Conflict(msg)) => assert_eq!(msg, "Username already exists"),
            other => panic!("expected conflict, got {:?}", other),
        }
    }

    #[actix_rt::test]
    async fn test_unknown_user_login_checks_a_placeholder_digest() {
        let auth = gateway().await;
        let digest = auth.dummy_digest.clone().unwrap();
        assert!(digest.starts_with("$2"));
        assert!(!auth.hasher.verify("pw1", &digest).unwrap());

        assert!(matches!(
            auth.login("nobody", "unknown-user-placeholder").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[actix_rt::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = gateway().await;
        auth.signup(signup("alice", "pw1")).await.unwrap();

        assert!(matches!(
            auth.login("alice", "wrong").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("nobody", "pw1").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[actix_rt::test]
    async fn test_profile_requires_existing_user() {
        let auth = gateway().await;
        auth.signup(signup("alice", "pw1")).await.unwrap();

        let profile = auth.profile(&CurrentUser("alice".into())).await.unwrap();
        assert_eq!(profile.username, "alice");

        assert!(matches!(
            auth.profile(&CurrentUser("ghost".into())).await,
            Err(AppError::Unauthorized(_))
        ));
    }

    #[actix_rt::test]
    async fn test_invalid_signup_is_rejected_before_storage() {
        let auth = gateway().await;
        assert!(matches!(
            auth.signup(signup("bad name", "pw1")).await,
            Err(AppError::ValidationError(_))
        ));
        assert!(!auth.users.exists("bad name").await.unwrap());
    }
}
