//! Librarian authentication service

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use chrono::Utc;
use validator::Validate;

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::librarian::{Librarian, LibrarianClaims, RegisterLibrarian},
    repository::Repository,
};

const BAD_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    repository: Repository,
    config: AuthConfig,
}

impl AuthService {
    pub fn new(repository: Repository, config: AuthConfig) -> Self {
        Self { repository, config }
    }

    /// Create a librarian account and sign them in
    pub async fn register(&self, request: RegisterLibrarian) -> AppResult<(String, Librarian)> {
        request.validate()?;

        if self.repository.librarians.get_by_email(&request.email).await?.is_some() {
            return Err(AppError::DuplicateEmail(request.email));
        }

        let password_hash = hash_password(&request.password)?;
        let librarian = self
            .repository
            .librarians
            .create(&request.name, &request.email, &password_hash)
            .await?;

        tracing::info!(librarian_id = librarian.id, "Librarian registered");
        let token = self.issue_token(&librarian)?;
        Ok((token, librarian))
    }

    /// Check credentials and return a fresh token
    pub async fn login(&self, email: &str, password: &str) -> AppResult<String> {
        // Same message for unknown email and wrong password
        let librarian = self
            .repository
            .librarians
            .get_by_email(email)
            .await?
            .ok_or_else(|| AppError::Authentication(BAD_CREDENTIALS.to_string()))?;

        if !verify_password(&librarian.password, password)? {
            tracing::warn!(librarian_id = librarian.id, "Login rejected: wrong password");
            return Err(AppError::Authentication(BAD_CREDENTIALS.to_string()));
        }

        self.issue_token(&librarian)
    }

    /// Get librarian by ID
    pub async fn get_librarian(&self, id: i32) -> AppResult<Librarian> {
        self.repository.librarians.get_by_id(id).await
    }

    /// Sign a token for the librarian
    pub fn issue_token(&self, librarian: &Librarian) -> AppResult<String> {
        let now = Utc::now().timestamp();
        let claims = LibrarianClaims {
            sub: librarian.email.clone(),
            librarian_id: librarian.id,
            exp: now + self.config.token_lifetime_minutes * 60,
            iat: now,
        };

        claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Failed to create token: {}", e)))
    }

    /// Decode and check a bearer token. Does not touch the database.
    pub fn verify_token(&self, token: &str) -> AppResult<LibrarianClaims> {
        LibrarianClaims::from_token(token, &self.config.jwt_secret)
            .map_err(|_| AppError::Authentication("Invalid or expired token".to_string()))
    }
}

/// Hash a password using Argon2
pub fn hash_password(password: &str) -> AppResult<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))?;
    Ok(hash.to_string())
}

/// Check a password against a stored Argon2 hash
pub fn verify_password(hash: &str, password: &str) -> AppResult<bool> {
    let parsed_hash =
        PasswordHash::new(hash).map_err(|_| AppError::Internal("Invalid password hash".to_string()))?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
