use std::sync::Arc;

use axum::{
    async_trait,
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts},
    middleware::Next,
    response::{IntoResponse, Response},
};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde::{Deserialize, Serialize};

use crate::error::Error;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Identity of the caller; owner of every job they create.
    pub sub: String,
    pub exp: usize,
}

/// Verifies HS256 bearer tokens issued by the identity provider.
#[derive(Clone)]
pub struct BearerAuth {
    key: Arc<DecodingKey>,
}

impl BearerAuth {
    pub fn new(secret: &str) -> Self {
        Self {
            key: Arc::new(DecodingKey::from_secret(secret.as_bytes())),
        }
    }

    pub fn verify(&self, token: &str) -> Result<Claims, Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        let data = decode::<Claims>(token, &self.key, &validation)
            .map_err(|_| Error::Unauthorized("invalid_token".into()))?;
        if data.claims.sub.trim().is_empty() {
            return Err(Error::Unauthorized("missing_subject".into()));
        }
        Ok(data.claims)
    }
}

pub async fn require_bearer_auth(
    State(auth): State<BearerAuth>,
    mut req: Request,
    next: Next,
) -> Response {
    let Some(auth_header) = req.headers().get(AUTHORIZATION) else {
        return Error::Unauthorized("missing_authorization".into()).into_response();
    };
    let Ok(auth_str) = auth_header.to_str() else {
        return Error::Unauthorized("bad_authorization".into()).into_response();
    };
    let Some(token) = auth_str.strip_prefix("Bearer ") else {
        return Error::Unauthorized("unsupported_scheme".into()).into_response();
    };

    match auth.verify(token) {
        Ok(claims) => {
            req.extensions_mut().insert(claims);
            next.run(req).await
        }
        Err(err) => {
            tracing::debug!(error = %err, "rejected bearer token");
            err.into_response()
        }
    }
}

/// Authenticated caller, resolved from the claims the auth middleware stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallerId(pub String);

impl CallerId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for CallerId
where
    S: Send + Sync,
{
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Claims>()
            .map(|claims| CallerId(claims.sub.clone()))
            .ok_or_else(|| Error::Unauthorized("missing_authorization".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonwebtoken::{encode, EncodingKey, Header};

    fn token(secret: &str, sub: &str, exp: usize) -> String {
        encode(
            &Header::default(),
            &Claims {
                sub: sub.into(),
                exp,
            },
            &EncodingKey::from_secret(secret.as_bytes()),
        )
        .unwrap()
    }

    fn in_an_hour() -> usize {
        (chrono::Utc::now().timestamp() + 3600) as usize
    }

    #[test]
    fn accepts_token_signed_with_same_secret() {
        let auth = BearerAuth::new("secret");
        let claims = auth.verify(&token("secret", "user_1", in_an_hour())).unwrap();
        assert_eq!(claims.sub, "user_1");
    }

    #[test]
    fn rejects_foreign_and_expired_tokens() {
        let auth = BearerAuth::new("secret");
        assert!(auth.verify(&token("other", "user_1", in_an_hour())).is_err());
        assert!(auth.verify(&token("secret", "user_1", 1)).is_err());
    }

    #[test]
    fn rejects_blank_subject() {
        let auth = BearerAuth::new("secret");
        let err = auth.verify(&token("secret", " ", in_an_hour())).unwrap_err();
        assert_eq!(err.redirect_to(), Some("/"));
    }
}
