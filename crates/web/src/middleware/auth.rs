use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::WebError;

/// Verified identity of the caller, inserted into request extensions by
/// [`require_auth`].
#[derive(Debug, Clone, Copy)]
pub struct AuthedUser {
    pub user_id: Uuid,
}

/// Decoding half of the identity provider's HS256 signing key.
#[derive(Clone)]
pub struct JwtKeys {
    decoding: DecodingKey,
    validation: Validation,
}

impl JwtKeys {
    pub fn new(secret: &str) -> Self {
        Self {
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::new(Algorithm::HS256),
        }
    }

    /// Validate a bearer token and extract the user id from its subject.
    pub fn verify(&self, token: &str) -> Result<AuthedUser, WebError> {
        let data = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|_| WebError::Unauthorized)?;
        let user_id = Uuid::parse_str(&data.claims.sub).map_err(|_| WebError::Unauthorized)?;
        Ok(AuthedUser { user_id })
    }
}

#[derive(Debug, Deserialize)]
struct Claims {
    sub: String,
    #[allow(dead_code)]
    exp: usize,
}

/// Bearer-token middleware for mutating routes. Tokens come from the
/// identity provider; only the user id is trusted from the token, anything
/// tier- or billing-related is read from the profile row instead.
pub async fn require_auth(
    State(keys): State<JwtKeys>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = bearer_token(&req).ok_or(WebError::Unauthorized)?;
    let user = keys.verify(token)?;

    req.extensions_mut().insert(user);
    Ok(next.run(req).await)
}

fn bearer_token(req: &Request) -> Option<&str> {
    req.headers()
        .get(header::AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{EncodingKey, Header, encode};
    use serde::Serialize;

    #[derive(Serialize)]
    struct TestClaims {
        sub: String,
        exp: usize,
    }

    fn token(secret: &str, sub: &str) -> String {
        encode(
            &Header::default(),
            &TestClaims {
                sub: sub.to_string(),
                exp: 4_102_444_800, // far future
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .expect("encodes")
    }

    #[test]
    fn test_verify_round_trip() {
        let keys = JwtKeys::new("test-secret");
        let user_id = Uuid::new_v4();
        let user = keys.verify(&token("test-secret", &user_id.to_string())).expect("verifies");
        assert_eq!(user.user_id, user_id);
    }

    #[test]
    fn test_verify_rejects_wrong_secret() {
        let keys = JwtKeys::new("test-secret");
        let user_id = Uuid::new_v4();
        assert!(keys.verify(&token("other-secret", &user_id.to_string())).is_err());
    }

    #[test]
    fn test_verify_rejects_non_uuid_subject() {
        let keys = JwtKeys::new("test-secret");
        assert!(keys.verify(&token("test-secret", "not-a-uuid")).is_err());
    }
}
