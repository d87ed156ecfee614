use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::value_object::InvalidChoice;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Coach,
    Agent,
    /// Assigned to accounts created through a social provider
    #[default]
    FootballPlayer,
}

impl Role {
    pub const ALL: [Role; 4] = [Role::Admin, Role::Coach, Role::Agent, Role::FootballPlayer];

    #[inline]
    pub const fn code(&self) -> &'static str {
        use Role::*;
        match self {
            Admin => "admin",
            Coach => "coach",
            Agent => "agent",
            FootballPlayer => "football_player",
        }
    }

    #[inline]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }

    pub fn from_code(code: &str) -> Result<Self, InvalidChoice> {
        Self::ALL
            .into_iter()
            .find(|role| role.code() == code)
            .ok_or_else(|| InvalidChoice(code.to_string()))
    }
}

impl FromStr for Role {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Role::from_code(s)
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
