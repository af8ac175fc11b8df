use async_trait::async_trait;
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde_json::json;

use storefront_rs::error::{OpError, Result};
use storefront_rs::models::{Role, Session, SessionStatus, SessionUser};
use storefront_rs::services::{JwtSessionResolver, SessionClaims, SessionResolver};
use storefront_rs::ui::{Providers, RootLayout, Slot, METADATA};

const SECRET: &str = "test-secret";

fn claims(role: Role, exp: i64) -> SessionClaims {
    SessionClaims {
        sub: "u42".to_string(),
        name: Some("Ivan".to_string()),
        email: Some("ivan@example.com".to_string()),
        picture: None,
        role,
        exp: exp as usize,
    }
}

fn token<T: serde::Serialize>(claims: &T) -> String {
    encode(
        &Header::default(),
        claims,
        &EncodingKey::from_secret(SECRET.as_bytes()),
    )
    .unwrap()
}

fn in_a_day() -> i64 {
    (Utc::now() + Duration::days(1)).timestamp()
}

#[test]
fn test_session_token_from_cookie_header() {
    assert_eq!(JwtSessionResolver::session_token(""), None);
    assert_eq!(JwtSessionResolver::session_token("abc.def.ghi"), Some("abc.def.ghi"));
    assert_eq!(
        JwtSessionResolver::session_token("theme=dark; next-auth.session-token=abc.def; lang=ru"),
        Some("abc.def")
    );
    assert_eq!(
        JwtSessionResolver::session_token("__Secure-next-auth.session-token=x.y.z"),
        Some("x.y.z")
    );
    assert_eq!(JwtSessionResolver::session_token("theme=dark; lang=ru"), None);
}

#[tokio::test]
async fn test_valid_token_resolves_session() {
    let resolver = JwtSessionResolver::new(SECRET);
    let cookie = format!("next-auth.session-token={}", token(&claims(Role::Seller, in_a_day())));

    let session = resolver.resolve(cookie.as_str()).await.unwrap().expect("session");

    assert_eq!(session.user.id, "u42");
    assert_eq!(session.user.email.as_deref(), Some("ivan@example.com"));
    assert_eq!(session.role(), Role::Seller);
    assert!(!session.is_admin());
    assert!(!session.is_expired());
}

#[tokio::test]
async fn test_bad_tokens_resolve_to_none() {
    let resolver = JwtSessionResolver::new(SECRET);

    let expired = token(&claims(Role::Admin, (Utc::now() - Duration::days(1)).timestamp()));
    assert_eq!(resolver.resolve(expired.as_str()).await.unwrap(), None);

    let other_secret = JwtSessionResolver::new("another-secret");
    let valid = token(&claims(Role::Admin, in_a_day()));
    assert_eq!(other_secret.resolve(valid.as_str()).await.unwrap(), None);

    assert_eq!(resolver.resolve("not-a-token").await.unwrap(), None);
}

#[tokio::test]
async fn test_token_without_role_is_rejected() {
    let resolver = JwtSessionResolver::new(SECRET);
    let no_role = token(&json!({ "sub": "u1", "exp": in_a_day() }));

    assert_eq!(resolver.resolve(no_role.as_str()).await.unwrap(), None);
}

#[test]
fn test_session_json() {
    let session: Session = serde_json::from_value(json!({
        "user": { "id": "u1", "name": "Olga", "role": "ADMIN" },
        "expires": "2030-01-01T00:00:00.000Z"
    }))
    .unwrap();
    assert!(session.is_admin());
    assert_eq!(session.user.email, None);

    let missing_role = serde_json::from_value::<Session>(json!({
        "user": { "id": "u1" },
        "expires": "2030-01-01T00:00:00.000Z"
    }));
    assert!(missing_role.is_err());
}

struct StaticResolver(Option<Session>);

#[async_trait]
impl SessionResolver for StaticResolver {
    async fn resolve(&self, _cookie: &str) -> Result<Option<Session>> {
        Ok(self.0.clone())
    }
}

struct FailingResolver;

#[async_trait]
impl SessionResolver for FailingResolver {
    async fn resolve(&self, _cookie: &str) -> Result<Option<Session>> {
        Err(OpError::LoadSession.into())
    }
}

fn admin_session() -> Session {
    Session {
        user: SessionUser {
            id: "a1".to_string(),
            name: None,
            email: None,
            image: None,
            role: Role::Admin,
        },
        expires: Utc::now() + Duration::hours(1),
    }
}

#[tokio::test]
async fn test_layout_seeds_providers() {
    let layout = RootLayout::bootstrap(&StaticResolver(Some(admin_session())), "", "page").await;

    assert_eq!(layout.metadata, METADATA);
    assert_eq!(layout.metadata.lang, "ru");
    assert_eq!(layout.children, "page");
    assert_eq!(layout.providers.session().map(|s| s.role()), Some(Role::Admin));
    assert!(matches!(layout.session_status(), SessionStatus::Authenticated(_)));
    assert_eq!(
        RootLayout::<&str>::SLOTS,
        [Slot::Navbar, Slot::Main, Slot::Footer]
    );
}

#[tokio::test]
async fn test_layout_without_session() {
    let layout = RootLayout::bootstrap(&StaticResolver(None), "", ()).await;
    assert_eq!(layout.session_status(), SessionStatus::Unauthenticated);

    let dyn_resolver: Box<dyn SessionResolver> = Box::new(FailingResolver);
    let layout = RootLayout::bootstrap(dyn_resolver.as_ref(), "cookie", ()).await;
    assert_eq!(layout.providers, Providers::new(None));
    assert_eq!(layout.session_status(), SessionStatus::Unauthenticated);
}
