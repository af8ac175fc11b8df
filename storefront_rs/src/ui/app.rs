use log::{debug, error};

use crate::models::{Session, SessionStatus};
use crate::services::SessionResolver;

/// Document metadata of every storefront page.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metadata {
    pub title: &'static str,
    pub description: &'static str,
    pub lang: &'static str,
}

pub const METADATA: Metadata = Metadata {
    title: "Clothing store",
    description: "The best clothing store with delivery all over Russia",
    lang: "ru",
};

/// Client-side context seeded with the session the server resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct Providers {
    session: Option<Session>,
}

impl Providers {
    pub fn new(session: Option<Session>) -> Self {
        Self { session }
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn session_status(&self) -> SessionStatus {
        self.session.clone().into()
    }
}

/// Fixed chrome around the page content, in render order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    Navbar,
    Main,
    Footer,
}

pub struct RootLayout<P> {
    pub metadata: Metadata,
    pub providers: Providers,
    pub children: P,
}

impl<P> RootLayout<P> {
    pub const SLOTS: [Slot; 3] = [Slot::Navbar, Slot::Main, Slot::Footer];

    /// Resolves the session once for this request and hands it to the
    /// providers wrapping `children`. A resolver failure renders the page
    /// signed out.
    pub async fn bootstrap<R>(resolver: &R, cookie: &str, children: P) -> Self
    where
        R: SessionResolver + ?Sized,
    {
        let session = match resolver.resolve(cookie).await {
            Ok(session) => session,
            Err(e) => {
                error!("resolve session error: {}", e);
                None
            }
        };
        debug!("layout session present: {}", session.is_some());
        Self {
            metadata: METADATA,
            providers: Providers::new(session),
            children,
        }
    }

    pub fn session_status(&self) -> SessionStatus {
        self.providers.session_status()
    }
}
