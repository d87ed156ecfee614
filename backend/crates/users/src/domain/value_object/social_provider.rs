use serde::Serialize;
use std::fmt;
use std::str::FromStr;

use crate::domain::value_object::InvalidChoice;

/// OAuth2 providers whose access tokens can be exchanged for an account
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SocialProvider {
    Google,
    Facebook,
}

impl SocialProvider {
    #[inline]
    pub const fn code(&self) -> &'static str {
        match self {
            SocialProvider::Google => "google",
            SocialProvider::Facebook => "facebook",
        }
    }
}

impl FromStr for SocialProvider {
    type Err = InvalidChoice;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "google" => Ok(SocialProvider::Google),
            "facebook" => Ok(SocialProvider::Facebook),
            other => Err(InvalidChoice(other.to_string())),
        }
    }
}

impl fmt::Display for SocialProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}
