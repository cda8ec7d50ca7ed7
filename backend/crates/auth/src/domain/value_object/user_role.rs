use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
#[repr(i16)]
pub enum UserRole {
    #[default]
    User = 0,
    Guide = 1,
    LeadGuide = 2,
    Admin = 3,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Role is either: admin, lead-guide, guide, user")]
pub struct UnknownRole;

impl UserRole {
    pub const ALL: [UserRole; 4] = [
        UserRole::User,
        UserRole::Guide,
        UserRole::LeadGuide,
        UserRole::Admin,
    ];

    #[inline]
    pub const fn id(&self) -> i16 {
        *self as i16
    }

    #[inline]
    pub const fn code(&self) -> &'static str {
        use UserRole::*;
        match self {
            User => "user",
            Guide => "guide",
            LeadGuide => "lead-guide",
            Admin => "admin",
        }
    }

    #[inline]
    pub fn from_id(id: i16) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.id() == id)
    }

    #[inline]
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|role| role.code() == code)
    }
}

impl FromStr for UserRole {
    type Err = UnknownRole;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_code(s.trim()).ok_or(UnknownRole)
    }
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
