//! OAuth2 Provider Userinfo Client
//!
//! Google takes the access token as a bearer header, Facebook as a query
//! parameter. Both calls carry explicit connect and total timeouts.

use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;

use crate::domain::identity::{ProfileFetcher, SocialProfile};
use crate::domain::value_object::social_provider::SocialProvider;
use crate::error::{UsersError, UsersResult};

pub const GOOGLE_USERINFO_URL: &str = "https://www.googleapis.com/oauth2/v3/userinfo";
pub const FACEBOOK_ME_URL: &str = "https://graph.facebook.com/me";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);
const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

/// Userinfo endpoint per provider
#[derive(Debug, Clone)]
pub struct ProviderEndpoints {
    pub google_userinfo: String,
    pub facebook_me: String,
}

impl Default for ProviderEndpoints {
    fn default() -> Self {
        Self {
            google_userinfo: GOOGLE_USERINFO_URL.to_string(),
            facebook_me: FACEBOOK_ME_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HttpProfileFetcher {
    client: Client,
    endpoints: ProviderEndpoints,
}

impl HttpProfileFetcher {
    pub fn new() -> UsersResult<Self> {
        Self::with_endpoints(ProviderEndpoints::default())
    }

    pub fn with_endpoints(endpoints: ProviderEndpoints) -> UsersResult<Self> {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()
            .map_err(|e| UsersError::Internal(format!("HTTP client setup failed: {}", e)))?;

        Ok(Self { client, endpoints })
    }
}

impl ProfileFetcher for HttpProfileFetcher {
    async fn fetch_profile(
        &self,
        provider: SocialProvider,
        access_token: &str,
    ) -> UsersResult<SocialProfile> {
        let request = match provider {
            SocialProvider::Google => self
                .client
                .get(&self.endpoints.google_userinfo)
                .bearer_auth(access_token),
            SocialProvider::Facebook => self.client.get(&self.endpoints.facebook_me).query(&[
                ("fields", "id,name,email"),
                ("access_token", access_token),
            ]),
        };

        let response = request
            .send()
            .await
            .map_err(|e| UsersError::social(format!("{} request failed: {}", provider, e)))?;

        if response.status() != StatusCode::OK {
            return Err(UsersError::social(format!(
                "{} returned status: {}",
                provider,
                response.status()
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| UsersError::social(format!("{} body unreadable: {}", provider, e)))?;

        parse_profile(provider, &body)
    }
}

/// Read the required `email` from a userinfo JSON object
pub fn parse_profile(provider: SocialProvider, body: &str) -> UsersResult<SocialProfile> {
    let payload: Value = serde_json::from_str(body)
        .map_err(|e| UsersError::social(format!("{} payload is not JSON: {}", provider, e)))?;

    let email = payload
        .get("email")
        .and_then(Value::as_str)
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| UsersError::social(format!("{} payload has no email", provider)))?;

    Ok(SocialProfile {
        email: email.to_string(),
    })
}
