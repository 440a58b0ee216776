//! Staff authentication against the configured credential table

use std::str::FromStr;

use chrono::{Duration, Utc};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
    models::{
        enums::Role,
        staff::{StaffClaims, StaffProfile},
    },
};

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Exchange a staff id and PIN for a signed token and profile
    pub fn login(&self, id: &str, pin: &str) -> AppResult<(String, StaffProfile)> {
        let id = id.trim().to_uppercase();
        let credential = self
            .config
            .staff
            .iter()
            .find(|c| c.id.eq_ignore_ascii_case(&id))
            .ok_or_else(|| AppError::Authentication("Invalid credentials".to_string()))?;

        if credential.pin != pin {
            tracing::warn!(staff_id = %id, "Login attempt with wrong PIN");
            return Err(AppError::Authentication("Invalid credentials".to_string()));
        }

        let role = Role::from_str(&credential.role)
            .map_err(|_| AppError::Internal(format!("Misconfigured role for staff {}", id)))?;

        let now = Utc::now();
        let claims = StaffClaims {
            sub: credential.id.clone(),
            name: credential.name.clone(),
            role,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
        };
        let token = claims
            .create_token(&self.config.jwt_secret)
            .map_err(|e| AppError::Internal(format!("Token creation failed: {}", e)))?;

        tracing::info!(staff_id = %credential.id, role = ?role, "Staff logged in");
        Ok((
            token,
            StaffProfile {
                id: credential.id.clone(),
                name: credential.name.clone(),
                role,
            },
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::StaffCredential;

    fn test_config() -> AuthConfig {
        AuthConfig {
            jwt_secret: "test-secret".to_string(),
            jwt_expiration_hours: 12,
            staff: vec![
                StaffCredential {
                    id: "SEC01".to_string(),
                    name: "Gate Security".to_string(),
                    role: "SECURITY".to_string(),
                    pin: "1234".to_string(),
                },
                StaffCredential {
                    id: "ADM01".to_string(),
                    name: "Ops Admin".to_string(),
                    role: "ADMIN".to_string(),
                    pin: "5678".to_string(),
                },
            ],
        }
    }

    #[test]
    fn test_login_success_round_trips_token() {
        let service = AuthService::new(test_config());
        let (token, profile) = service.login("sec01", "1234").unwrap();
        assert_eq!(profile.id, "SEC01");
        assert_eq!(profile.role, Role::Security);

        let claims = StaffClaims::from_token(&token, "test-secret").unwrap();
        assert_eq!(claims.sub, "SEC01");
        assert_eq!(claims.role, Role::Security);
    }

    #[test]
    fn test_login_wrong_pin() {
        let service = AuthService::new(test_config());
        let err = service.login("SEC01", "0000").unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }

    #[test]
    fn test_login_unknown_id() {
        let service = AuthService::new(test_config());
        let err = service.login("NOBODY", "1234").unwrap_err();
        assert!(matches!(err, AppError::Authentication(_)));
    }
}
