//! Authentication service
//!
//! Salted SHA-256 password digests and HS256 bearer tokens. Token expiry is
//! checked against the injected clock rather than the system time.

use chrono::Duration;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use rand::RngCore;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::instrument;

use crate::database::{AcademicRepository, DatabaseManager};
use crate::error::{AppError, AppResult};
use crate::logging::log_authentication_event;
use crate::models::{PublicUser, Role, User};
use crate::services::time_provider::TimeProvider;

pub const INVALID_CREDENTIALS: &str = "Invalid email or password";
pub const SESSION_EXPIRED: &str = "Session expired, please log in again";
pub const INVALID_TOKEN: &str = "Invalid token";

/// Hash a password with the given salt
pub fn hash_password(password: &str, salt: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(salt.as_bytes());
    hex::encode(hasher.finalize())
}

/// Random 16-byte salt, hex encoded
pub fn generate_salt() -> String {
    let mut bytes = [0u8; 16];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// A token that cannot be signed is a server fault, not a client one
fn signing_failure(err: jsonwebtoken::errors::Error) -> AppError {
    AppError::internal_error(&format!("Failed to sign token: {}", err))
}

pub fn verify_password(password: &str, salt: &str, expected_hash: &str) -> bool {
    hash_password(password, salt) == expected_hash
}

/// JWT claims
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID)
    pub sub: String,
    pub role: Role,
    pub iat: i64,
    pub exp: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: PublicUser,
}

/// Fields of an account to be created
#[derive(Debug, Clone)]
pub struct NewAccount {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    pub photo_url: String,
}

pub struct AuthService {
    db: DatabaseManager,
    clock: Arc<dyn TimeProvider>,
    secret: String,
    expiry_hours: i64,
}

impl AuthService {
    pub fn new(
        db: DatabaseManager,
        clock: Arc<dyn TimeProvider>,
        secret: impl Into<String>,
        expiry_hours: i64,
    ) -> Self {
        Self {
            db,
            clock,
            secret: secret.into(),
            expiry_hours,
        }
    }

    /// Create an account with a freshly salted password
    pub async fn create_account(&self, account: NewAccount) -> AppResult<User> {
        User::validate_new(&account.name, &account.email, &account.password)?;

        let salt = generate_salt();
        let user = User {
            id: uuid::Uuid::new_v4().to_string(),
            name: account.name.trim().to_string(),
            email: User::normalize_email(&account.email),
            password_hash: hash_password(&account.password, &salt),
            salt,
            photo_url: account.photo_url,
            role: account.role,
            created_at: self.clock.now_utc(),
        };

        self.db.insert_user(&user).await.map_err(|e| match e {
            AppError::Conflict(_) => AppError::conflict("Email is already registered"),
            other => other,
        })?;

        Ok(user)
    }

    pub fn issue_token(&self, user: &User) -> AppResult<String> {
        let now = self.clock.now_utc();
        let claims = Claims {
            sub: user.id.clone(),
            role: user.role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.expiry_hours)).timestamp(),
        };

        let token = encode(
            &Header::new(Algorithm::HS256),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(signing_failure)?;
        Ok(token)
    }

    pub fn validate_token(&self, token: &str) -> AppResult<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;

        let claims = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )
        .map_err(|e| {
            tracing::debug!(error = %e, "Token rejected");
            AppError::authentication_failed(INVALID_TOKEN)
        })?
        .claims;

        if claims.exp <= self.clock.now_utc().timestamp() {
            return Err(AppError::authentication_failed(SESSION_EXPIRED));
        }
        Ok(claims)
    }

    /// Resolve a bearer token into the account it was issued for
    pub async fn authenticate(&self, token: &str) -> AppResult<User> {
        let claims = self.validate_token(token)?;
        self.db
            .find_user(&claims.sub)
            .await?
            .ok_or_else(|| AppError::authentication_failed("User no longer exists"))
    }

    #[instrument(skip(self, request))]
    pub async fn login(&self, request: LoginRequest) -> AppResult<LoginResponse> {
        let (Some(email), Some(password)) = (request.email, request.password) else {
            return Err(AppError::validation_error("Email and password are required"));
        };
        if email.trim().is_empty() || password.is_empty() {
            return Err(AppError::validation_error("Email and password are required"));
        }

        let Some(user) = self.db.find_user_by_email(&email).await? else {
            log_authentication_event("login", Some(&email), false);
            return Err(AppError::authentication_failed(INVALID_CREDENTIALS));
        };

        if !verify_password(&password, &user.salt, &user.password_hash) {
            log_authentication_event("login", Some(&user.email), false);
            return Err(AppError::authentication_failed(INVALID_CREDENTIALS));
        }

        let token = self.issue_token(&user)?;
        log_authentication_event("login", Some(&user.email), true);

        Ok(LoginResponse {
            token,
            user: PublicUser::from(&user),
        })
    }
}

/// Check that the user holds one of the allowed roles
pub fn require_role(user: &User, allowed: &[Role]) -> AppResult<()> {
    if allowed.contains(&user.role) {
        return Ok(());
    }
    let names = allowed
        .iter()
        .map(|role| role.to_string())
        .collect::<Vec<_>>()
        .join(" or ");
    Err(AppError::Forbidden(format!("Access denied: requires role {}", names)))
}
