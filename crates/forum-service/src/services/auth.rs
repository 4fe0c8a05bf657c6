//! Authentication service
//!
//! Handles registration, credential checks, login, and logout. Sessions
//! themselves are owned by [`SessionManager`].

use forum_common::auth::{validate_password_strength, PasswordService};
use forum_common::AppError;
use forum_core::entities::{normalize_email, NewUser};
use forum_core::value_objects::ActorId;
use tracing::{info, instrument, warn};
use validator::Validate;

use crate::dto::{AuthResponse, LoginRequest, RegisterRequest, UserResponse};

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};
use super::session::SessionManager;

/// Authentication service
pub struct AuthService<'a> {
    ctx: &'a ServiceContext,
    passwords: PasswordService,
}

impl<'a> AuthService<'a> {
    /// Create a new AuthService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self {
            ctx,
            passwords: PasswordService::new(),
        }
    }

    /// Register a new user
    #[instrument(skip(self, request), fields(username = %request.username))]
    pub async fn register(&self, request: RegisterRequest) -> ServiceResult<UserResponse> {
        request.validate()?;
        validate_password_strength(&request.password)?;

        let password_hash = self.passwords.hash(&request.password)?;
        let user = self
            .ctx
            .user_repo()
            .create(&NewUser::new(request.username, &request.email, password_hash))
            .await?;

        info!(user_id = %user.id, "User registered");
        Ok(UserResponse::from(user))
    }

    /// Check credentials. Unknown email and wrong password are indistinguishable.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, email: &str, password: &str) -> ServiceResult<ActorId> {
        let credentials = self
            .ctx
            .user_repo()
            .find_credentials_by_email(&normalize_email(email))
            .await?;
        let Some(credentials) = credentials else {
            warn!("Login failed: unknown email");
            return Err(AppError::InvalidCredentials.into());
        };

        self.passwords
            .verify_or_error(password, &credentials.password_hash)
            .inspect_err(|_| {
                warn!(user_id = %credentials.actor_id, "Login failed: wrong password");
            })?;

        Ok(credentials.actor_id)
    }

    /// Authenticate, then issue a session
    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> ServiceResult<AuthResponse> {
        request.validate()?;
        let actor_id = self.authenticate(&request.email, &request.password).await?;
        let user = self.current_user(actor_id).await?;

        let session = SessionManager::new(self.ctx).issue(actor_id).await?;
        let expires_in = self.ctx.session_ttl().num_seconds();

        info!(user_id = %actor_id, "User logged in");
        Ok(AuthResponse::new(session.token, session.expires_at, expires_in, user))
    }

    /// Revoke the caller's session, if any
    #[instrument(skip_all)]
    pub async fn logout(&self, token: Option<&str>) -> ServiceResult<()> {
        if let Some(token) = token {
            SessionManager::new(self.ctx).revoke(token).await?;
        }
        Ok(())
    }

    /// Profile of an authenticated actor
    #[instrument(skip(self))]
    pub async fn current_user(&self, actor_id: ActorId) -> ServiceResult<UserResponse> {
        self.ctx
            .user_repo()
            .find_by_id(actor_id)
            .await?
            .map(UserResponse::from)
            .ok_or_else(|| ServiceError::not_found("User", actor_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::access::{AccessGuard, Identity};
    use crate::services::test_support::harness;
    use forum_core::DomainError;

    fn register_request(username: &str, email: &str) -> RegisterRequest {
        RegisterRequest {
            username: username.to_string(),
            email: email.to_string(),
            password: "hunter2hunter2".to_string(),
        }
    }

    fn login_request(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[tokio::test]
    async fn test_register_and_login() {
        let h = harness();
        let auth = AuthService::new(&h.ctx);

        let user = auth
            .register(register_request("alice", "Alice@Example.com"))
            .await
            .unwrap();
        assert_eq!(user.email, "alice@example.com");

        let response = auth
            .login(login_request("alice@example.com", "hunter2hunter2"))
            .await
            .unwrap();
        assert_eq!(response.user.id, user.id);
        assert_eq!(response.expires_in, 3600);

        let identity = AccessGuard::new(&h.ctx)
            .authorize(Some(&response.token))
            .await
            .unwrap();
        assert_eq!(identity, Identity::Authenticated(user.id));
    }

    #[tokio::test]
    async fn test_bad_credentials_are_indistinguishable() {
        let h = harness();
        let auth = AuthService::new(&h.ctx);
        auth.register(register_request("bob", "bob@example.com"))
            .await
            .unwrap();

        let wrong_password = auth
            .login(login_request("bob@example.com", "not-the-password"))
            .await
            .unwrap_err();
        let unknown_email = auth
            .login(login_request("nobody@example.com", "hunter2hunter2"))
            .await
            .unwrap_err();

        assert_eq!(wrong_password.status_code(), 401);
        assert_eq!(wrong_password.error_code(), unknown_email.error_code());
        assert_eq!(wrong_password.to_string(), unknown_email.to_string());
    }

    #[tokio::test]
    async fn test_duplicate_registration() {
        let h = harness();
        let auth = AuthService::new(&h.ctx);
        auth.register(register_request("carol", "carol@example.com"))
            .await
            .unwrap();

        let err = auth
            .register(register_request("carol2", "carol@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::EmailAlreadyExists)));

        let err = auth
            .register(register_request("carol", "carol2@example.com"))
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Domain(DomainError::UsernameAlreadyExists)));
    }

    #[tokio::test]
    async fn test_register_rejects_invalid_input() {
        let h = harness();
        let err = AuthService::new(&h.ctx)
            .register(RegisterRequest {
                password: "short".to_string(),
                ..register_request("dave", "dave@example.com")
            })
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_second_login_logs_out_first_device() {
        let h = harness();
        let auth = AuthService::new(&h.ctx);
        auth.register(register_request("erin", "erin@example.com"))
            .await
            .unwrap();

        let first = auth
            .login(login_request("erin@example.com", "hunter2hunter2"))
            .await
            .unwrap();
        let second = auth
            .login(login_request("erin@example.com", "hunter2hunter2"))
            .await
            .unwrap();

        let guard = AccessGuard::new(&h.ctx);
        assert_eq!(guard.authorize(Some(&first.token)).await.unwrap(), Identity::Anonymous);
        assert!(guard.authorize(Some(&second.token)).await.unwrap().is_authenticated());
    }

    #[tokio::test]
    async fn test_logout_is_idempotent() {
        let h = harness();
        let auth = AuthService::new(&h.ctx);
        auth.register(register_request("frank", "frank@example.com"))
            .await
            .unwrap();
        let login = auth
            .login(login_request("frank@example.com", "hunter2hunter2"))
            .await
            .unwrap();

        auth.logout(Some(&login.token)).await.unwrap();
        auth.logout(Some(&login.token)).await.unwrap();
        auth.logout(None).await.unwrap();

        let identity = AccessGuard::new(&h.ctx)
            .authorize(Some(&login.token))
            .await
            .unwrap();
        assert_eq!(identity, Identity::Anonymous);
    }

    #[tokio::test]
    async fn test_login_lifetime_is_full_window_on_system_clock() {
        let ctx = ServiceContext::builder()
            .memory(std::sync::Arc::new(forum_db::MemoryStore::new()))
            .build()
            .unwrap();
        let auth = AuthService::new(&ctx);
        auth.register(register_request("grace", "grace@example.com"))
            .await
            .unwrap();

        for _ in 0..5 {
            let login = auth
                .login(login_request("grace@example.com", "hunter2hunter2"))
                .await
                .unwrap();
            assert_eq!(login.expires_in, 3600);
        }
    }
}
