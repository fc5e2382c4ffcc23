use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::application::access::Actor;
use crate::application::error::{ServiceError, ServiceResult};
use crate::domain::users::user::UserRole;

pub const ROLE_USER: &str = "user";
pub const ROLE_ADMIN: &str = "admin";

#[derive(Debug, Serialize, Deserialize)]
pub struct AccessClaims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}

/// Claims of the short-lived tokens carrying registration / reset state.
#[derive(Debug, Serialize, Deserialize)]
pub struct FlowClaims {
    pub sub: String,
    pub purpose: String,
    pub exp: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowPurpose {
    Register,
    PasswordReset,
}

impl FlowPurpose {
    pub fn as_str(&self) -> &'static str {
        match self {
            FlowPurpose::Register => "register",
            FlowPurpose::PasswordReset => "reset",
        }
    }
}

/// HS256 signer for access and flow tokens.
#[derive(Clone)]
pub struct TokenIssuer {
    secret: String,
    access_ttl_secs: i64,
    flow_ttl_secs: i64,
}

impl TokenIssuer {
    pub fn new(secret: impl Into<String>, access_ttl_secs: i64, flow_ttl_secs: i64) -> Self {
        Self {
            secret: secret.into(),
            access_ttl_secs,
            flow_ttl_secs,
        }
    }

    pub fn access_ttl_secs(&self) -> i64 {
        self.access_ttl_secs
    }

    fn exp_in(secs: i64) -> usize {
        (chrono::Utc::now().timestamp() + secs) as usize
    }

    fn encode<T: Serialize>(&self, claims: &T) -> anyhow::Result<String> {
        let token = jsonwebtoken::encode(
            &Header::default(),
            claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )?;
        Ok(token)
    }

    fn decode<T: for<'de> Deserialize<'de>>(&self, token: &str) -> Option<T> {
        jsonwebtoken::decode::<T>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        )
        .ok()
        .map(|data| data.claims)
    }

    pub fn issue_access(&self, subject: Uuid, role: &str) -> anyhow::Result<String> {
        self.encode(&AccessClaims {
            sub: subject.to_string(),
            role: role.to_string(),
            exp: Self::exp_in(self.access_ttl_secs),
        })
    }

    pub fn resolve_actor(&self, token: &str) -> Option<Actor> {
        let claims: AccessClaims = self.decode(token.trim())?;
        let id = Uuid::parse_str(&claims.sub).ok()?;
        if claims.role == ROLE_ADMIN {
            return Some(Actor::Admin(id));
        }
        // Account roles (`user`, `consultant`) all act as users.
        claims.role.parse::<UserRole>().ok().map(|_| Actor::User(id))
    }

    pub fn issue_flow(&self, email: &str, purpose: FlowPurpose) -> anyhow::Result<String> {
        self.encode(&FlowClaims {
            sub: email.to_string(),
            purpose: purpose.as_str().to_string(),
            exp: Self::exp_in(self.flow_ttl_secs),
        })
    }

    /// Returns the email bound to a flow token of the given purpose.
    pub fn verify_flow(&self, token: &str, purpose: FlowPurpose) -> ServiceResult<String> {
        let claims: FlowClaims = self
            .decode(token.trim())
            .ok_or(ServiceError::Unauthorized)?;
        if claims.purpose != purpose.as_str() {
            return Err(ServiceError::Unauthorized);
        }
        Ok(claims.sub)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new("unit-test-secret", 3600, 1800)
    }

    #[test]
    fn access_tokens_resolve_to_actors() {
        let t = issuer();
        let id = Uuid::new_v4();
        let user = t.issue_access(id, ROLE_USER).unwrap();
        let admin = t.issue_access(id, ROLE_ADMIN).unwrap();
        assert_eq!(t.resolve_actor(&user), Some(Actor::User(id)));
        assert_eq!(t.resolve_actor(&admin), Some(Actor::Admin(id)));
        assert_eq!(t.resolve_actor("garbage"), None);
    }

    #[test]
    fn consultant_tokens_act_as_users() {
        let t = issuer();
        let id = Uuid::new_v4();
        let consultant = t.issue_access(id, UserRole::Consultant.as_str()).unwrap();
        assert_eq!(t.resolve_actor(&consultant), Some(Actor::User(id)));
        let unknown = t.issue_access(id, "superuser").unwrap();
        assert_eq!(t.resolve_actor(&unknown), None);
    }

    #[test]
    fn tokens_from_another_secret_are_rejected() {
        let other = TokenIssuer::new("different", 3600, 1800);
        let token = other.issue_access(Uuid::new_v4(), ROLE_USER).unwrap();
        assert_eq!(issuer().resolve_actor(&token), None);
    }

    #[test]
    fn expired_tokens_are_rejected() {
        // Beyond the default 60s leeway.
        let t = TokenIssuer::new("unit-test-secret", -3600, -3600);
        let token = t.issue_access(Uuid::new_v4(), ROLE_USER).unwrap();
        assert_eq!(t.resolve_actor(&token), None);
    }

    #[test]
    fn flow_tokens_are_purpose_bound() {
        let t = issuer();
        let token = t.issue_flow("a@b.co", FlowPurpose::Register).unwrap();
        assert_eq!(t.verify_flow(&token, FlowPurpose::Register).unwrap(), "a@b.co");
        assert!(matches!(
            t.verify_flow(&token, FlowPurpose::PasswordReset),
            Err(ServiceError::Unauthorized)
        ));
        // flow tokens are not access tokens
        assert_eq!(t.resolve_actor(&token), None);
    }
}
