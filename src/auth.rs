use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
    RequestPartsExt,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// How long an issued access token stays valid.
const TOKEN_LIFETIME_HOURS: i64 = 24;

#[derive(Clone)]
pub struct Keys {
    pub encoding: EncodingKey,
    pub decoding: DecodingKey,
}

impl Keys {
    pub fn from_secret(secret: &[u8]) -> Self {
        Self {
            encoding: EncodingKey::from_secret(secret),
            decoding: DecodingKey::from_secret(secret),
        }
    }
}

/// The contents of an access token.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Id of the user the token was issued to.
    pub sub: Uuid,
    /// Expiry time of the token.
    pub exp: usize,
    /// Time the token was issued.
    pub iat: usize,
}

pub fn encode_token(user_id: Uuid, encoding_key: &EncodingKey) -> Result<String, ApiError> {
    let now = Utc::now();
    let claims = Claims {
        sub: user_id,
        exp: (now + Duration::hours(TOKEN_LIFETIME_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    encode(&Header::default(), &claims, encoding_key).map_err(|_| ApiError::TokenCreation)
}

pub fn decode_token(token: &str, decoding_key: &DecodingKey) -> Result<Claims, ApiError> {
    decode::<Claims>(token, decoding_key, &Validation::default())
        .map(|data| data.claims)
        .map_err(|_| ApiError::Unauthorized("Invalid or expired token.".to_string()))
}

/// The authenticated caller, resolved once per request.
///
/// Resolution decodes the bearer token and then confirms the user row still
/// exists, so a deleted account is turned away even while its token is
/// technically valid. Every query downstream scopes on this id.
pub struct AuthUser {
    pub id: Uuid,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) = parts
            .extract::<TypedHeader<Authorization<Bearer>>>()
            .await
            .map_err(|_| ApiError::Unauthorized("Missing bearer token.".to_string()))?;

        let state = AppState::from_ref(state);

        let claims = decode_token(bearer.token(), &state.keys.decoding)?;

        let user_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(claims.sub)
                .fetch_one(&state.db)
                .await?;

        if !user_exists {
            return Err(ApiError::Unauthorized("User not found.".to_string()));
        }

        Ok(AuthUser { id: claims.sub })
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;

    use super::*;

    fn test_keys() -> Keys {
        Keys::from_secret(b"foobar")
    }

    #[test]
    fn token_round_trip_gives_back_the_user_id() {
        let keys = test_keys();
        let user_id = Uuid::new_v4();

        let token = encode_token(user_id, &keys.encoding).unwrap();
        let claims = decode_token(&token, &keys.decoding).unwrap();

        assert_eq!(claims.sub, user_id);
        assert!(claims.iat < claims.exp);
    }

    #[test]
    fn decode_rejects_token_signed_with_other_secret() {
        let token = encode_token(Uuid::new_v4(), &test_keys().encoding).unwrap();

        let other_keys = Keys::from_secret(b"not-the-same-secret");
        assert!(decode_token(&token, &other_keys.decoding).is_err());
    }

    #[test]
    fn decode_rejects_garbage() {
        assert!(decode_token("definitely.not.a.jwt", &test_keys().decoding).is_err());
    }

    #[test]
    fn decode_rejects_expired_token() {
        let keys = test_keys();
        let now = Utc::now();
        let claims = Claims {
            sub: Uuid::new_v4(),
            // Far enough in the past to clear the default validation leeway.
            exp: (now - Duration::hours(2)).timestamp() as usize,
            iat: (now - Duration::hours(3)).timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &keys.encoding).unwrap();

        assert!(decode_token(&token, &keys.decoding).is_err());
    }
}
