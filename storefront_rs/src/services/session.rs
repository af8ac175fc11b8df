use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jsonwebtoken::{decode, DecodingKey, Validation};
use log::{debug, error, warn};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OpError, Result};
use crate::models::{Role, Session, SessionUser};
use crate::utils::{api_url, default_client};

/// Cookies that may carry the session token.
pub const SESSION_COOKIE_NAMES: [&'static str; 2] =
    ["next-auth.session-token", "__Secure-next-auth.session-token"];

/// Resolves the session of the current request from its cookie header.
#[async_trait]
pub trait SessionResolver: Send + Sync {
    async fn resolve(&self, cookie: &str) -> Result<Option<Session>>;
}

/// Asks the auth endpoint of the storefront for the session.
#[derive(Clone)]
pub struct ApiSessionResolver {
    addr: String,
}

impl ApiSessionResolver {
    pub const SESSION_URL: &'static str = "/api/auth/session";

    pub fn new(addr: &str) -> Self {
        Self {
            addr: addr.to_string(),
        }
    }

    fn client(cookie: &str) -> Result<Client> {
        Ok(default_client(cookie).build()?)
    }
}

#[async_trait]
impl SessionResolver for ApiSessionResolver {
    async fn resolve(&self, cookie: &str) -> Result<Option<Session>> {
        let url = api_url(self.addr.as_str(), Self::SESSION_URL);
        let resp = Self::client(cookie)?.get(url.as_str()).send().await?;
        if !resp.status().is_success() {
            error!("session:{}, {}", url, resp.status().as_str());
            return Err(OpError::LoadSession.into());
        }
        let v: Value = resp.json().await?;
        // 未登录时返回的是 {}
        if v.get("user").is_none() {
            debug!("no session for this request");
            return Ok(None);
        }
        Ok(Some(serde_json::from_value(v)?))
    }
}

/// Claims of an HS256 session token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub picture: Option<String>,
    pub role: Role,
    pub exp: usize,
}

impl SessionClaims {
    fn into_session(self) -> Option<Session> {
        let expires = Utc.timestamp_opt(self.exp as i64, 0).single()?;
        Some(Session {
            user: SessionUser {
                id: self.sub,
                name: self.name,
                email: self.email,
                image: self.picture,
                role: self.role,
            },
            expires,
        })
    }
}

/// Verifies the session token locally with the shared secret.
#[derive(Clone)]
pub struct JwtSessionResolver {
    secret: String,
}

impl JwtSessionResolver {
    pub fn new(secret: &str) -> Self {
        Self {
            secret: secret.to_string(),
        }
    }

    /// Picks the session token out of a `Cookie` header; a bare value is
    /// taken as the token itself.
    pub fn session_token(cookie: &str) -> Option<&str> {
        let cookie = cookie.trim();
        if cookie.is_empty() {
            return None;
        }
        if !cookie.contains('=') {
            return Some(cookie);
        }
        cookie
            .split(';')
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(name, _)| SESSION_COOKIE_NAMES.iter().any(|n| n == name))
            .map(|(_, value)| value)
    }

    pub fn decode_session(&self, token: &str) -> Option<Session> {
        match decode::<SessionClaims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &Validation::default(),
        ) {
            Ok(data) => data.claims.into_session(),
            Err(e) => {
                warn!("decode session token error: {:?}", e);
                None
            }
        }
    }
}

#[async_trait]
impl SessionResolver for JwtSessionResolver {
    async fn resolve(&self, cookie: &str) -> Result<Option<Session>> {
        Ok(Self::session_token(cookie).and_then(|token| self.decode_session(token)))
    }
}
