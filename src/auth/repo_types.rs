use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::store::{Collection, Record};

/// Subscription tier.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Plan {
    #[default]
    Free,
    Plus,
    Pro,
}

impl Plan {
    pub fn as_str(self) -> &'static str {
        match self {
            Plan::Free => "free",
            Plan::Plus => "plus",
            Plan::Pro => "pro",
        }
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, PartialEq, Eq)]
pub struct UnknownPlan;

impl FromStr for Plan {
    type Err = UnknownPlan;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "free" => Ok(Plan::Free),
            "plus" => Ok(Plan::Plus),
            "pro" => Ok(Plan::Pro),
            _ => Err(UnknownPlan),
        }
    }
}

/// User record in the `user` collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub email: String,         // unique
    pub username: String,      // defaults to the email's local part
    pub password_hash: String, // hex SHA-256, never returned to clients
    #[serde(default)]
    pub plan: Plan,
}

impl Record for User {
    const COLLECTION: Collection = Collection::User;
}
