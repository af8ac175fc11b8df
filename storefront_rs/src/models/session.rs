use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::Role;

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SessionUser {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub image: Option<String>,
    // 必填, 没有角色的 session 直接解析失败
    pub role: Role,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Session {
    pub user: SessionUser,
    pub expires: DateTime<Utc>,
}

impl Session {
    pub fn role(&self) -> Role {
        self.user.role
    }

    pub fn is_admin(&self) -> bool {
        self.user.role.is_admin()
    }

    pub fn is_expired(&self) -> bool {
        self.expires <= Utc::now()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum SessionStatus {
    Loading,
    Authenticated(Session),
    Unauthenticated,
}

impl SessionStatus {
    pub fn session(&self) -> Option<&Session> {
        match self {
            SessionStatus::Authenticated(session) => Some(session),
            _ => None,
        }
    }
}

impl From<Option<Session>> for SessionStatus {
    fn from(session: Option<Session>) -> Self {
        match session {
            Some(session) => SessionStatus::Authenticated(session),
            None => SessionStatus::Unauthenticated,
        }
    }
}
