//! JWT authentication module.
//!
//! Every `/bus/*` handler takes a [`CompanyScope`], which is only produced
//! from a valid bearer token. The company id in the token scopes every
//! query the handler makes.

use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::ApiError;
use crate::AppState;

/// Who the token was issued to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Vendor,
    Admin,
    Customer,
}

impl Role {
    /// Roles allowed to use the vendor dashboard endpoints.
    pub fn can_manage_company(&self) -> bool {
        matches!(self, Role::Vendor | Role::Admin)
    }
}

/// JWT claims structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user id)
    pub sub: String,

    /// Company (vendor) the user acts for
    pub company_id: String,

    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration (Unix timestamp)
    pub exp: i64,
}

/// JWT token manager.
#[derive(Clone)]
pub struct JwtManager {
    encoding: EncodingKey,
    decoding: DecodingKey,
    lifetime_secs: i64,
}

impl JwtManager {
    pub fn new(secret: &str, lifetime_secs: i64) -> Self {
        JwtManager {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            lifetime_secs,
        }
    }

    /// Signs a token for `user_id` acting for `company_id`.
    pub fn issue(&self, user_id: &str, company_id: &str, role: Role) -> Result<String, ApiError> {
        let now = Utc::now();
        let exp = now + Duration::seconds(self.lifetime_secs);

        let claims = Claims {
            sub: user_id.to_string(),
            company_id: company_id.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        encode(&Header::default(), &claims, &self.encoding).map_err(|e| {
            tracing::error!(error = %e, "Failed to sign token");
            ApiError::Internal
        })
    }

    /// Validates signature and expiry and returns the claims.
    pub fn verify(&self, token: &str) -> Result<Claims, ApiError> {
        decode::<Claims>(token, &self.decoding, &Validation::default())
            .map(|data| data.claims)
            .map_err(|e| {
                debug!(error = %e, "Rejected bearer token");
                ApiError::Unauthorized
            })
    }
}

/// Extract bearer token from authorization header.
pub fn extract_bearer_token(auth_header: &str) -> Option<&str> {
    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|token| !token.is_empty())
}

// =============================================================================
// Company Scope Extractor
// =============================================================================

/// The authenticated caller and the company every query is scoped to.
#[derive(Debug, Clone)]
pub struct CompanyScope {
    pub user_id: String,
    pub company_id: String,
    pub role: Role,
}

impl FromRequestParts<AppState> for CompanyScope {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(extract_bearer_token)
            .ok_or(ApiError::Unauthorized)?;

        let claims = state.jwt.verify(token)?;

        if claims.company_id.trim().is_empty() {
            return Err(ApiError::Unauthorized);
        }
        if !claims.role.can_manage_company() {
            return Err(ApiError::Forbidden);
        }

        Ok(CompanyScope {
            user_id: claims.sub,
            company_id: claims.company_id,
            role: claims.role,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_jwt_roundtrip() {
        let manager = JwtManager::new("test-secret", 3600);

        let token = manager.issue("user-1", "company-1", Role::Vendor).unwrap();
        let claims = manager.verify(&token).unwrap();

        assert_eq!(claims.sub, "user-1");
        assert_eq!(claims.company_id, "company-1");
        assert_eq!(claims.role, Role::Vendor);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = JwtManager::new("secret-a", 3600)
            .issue("user-1", "company-1", Role::Admin)
            .unwrap();

        let result = JwtManager::new("secret-b", 3600).verify(&token);
        assert!(matches!(result, Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_expired_token_rejected() {
        // Past the default 60s leeway
        let manager = JwtManager::new("test-secret", -3600);
        let token = manager.issue("user-1", "company-1", Role::Vendor).unwrap();
        assert!(matches!(manager.verify(&token), Err(ApiError::Unauthorized)));
    }

    #[test]
    fn test_extract_bearer_token() {
        assert_eq!(extract_bearer_token("Bearer abc.def"), Some("abc.def"));
        assert_eq!(extract_bearer_token("Basic abc"), None);
        assert_eq!(extract_bearer_token("Bearer "), None);
    }

    #[test]
    fn test_only_vendors_and_admins_manage_companies() {
        assert!(Role::Vendor.can_manage_company());
        assert!(Role::Admin.can_manage_company());
        assert!(!Role::Customer.can_manage_company());
    }
}
