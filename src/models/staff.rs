//! Staff profiles and session claims

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::error::AppError;

use super::enums::Role;

/// A staff member from the injected credential table
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct StaffProfile {
    pub id: String,
    pub name: String,
    pub role: Role,
}

/// JWT claims for authenticated staff
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffClaims {
    pub sub: String,
    pub name: String,
    pub role: Role,
    pub exp: i64,
    pub iat: i64,
}

impl StaffClaims {
    /// Create a new JWT token
    pub fn create_token(&self, secret: &str) -> Result<String, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{encode, EncodingKey, Header};
        encode(
            &Header::default(),
            self,
            &EncodingKey::from_secret(secret.as_bytes()),
        )
    }

    /// Parse JWT token
    pub fn from_token(token: &str, secret: &str) -> Result<Self, jsonwebtoken::errors::Error> {
        use jsonwebtoken::{decode, DecodingKey, Validation};
        let token_data = decode::<Self>(
            token,
            &DecodingKey::from_secret(secret.as_bytes()),
            &Validation::default(),
        )?;
        Ok(token_data.claims)
    }

    /// Gate verification: any staff role may verify or reject arrivals
    pub fn require_staff(&self) -> Result<(), AppError> {
        Ok(())
    }

    /// Dock calls and visit close-out need an operations role
    pub fn require_operations(&self) -> Result<(), AppError> {
        if self.role.is_operations() {
            Ok(())
        } else {
            Err(AppError::Authorization(
                "Operations role required".to_string(),
            ))
        }
    }
}
