//! Social identity lookup
//!
//! Resolves an OAuth2 access token to the profile the provider holds for
//! it. The HTTP implementation lives in `infra::oauth`.

use crate::domain::value_object::social_provider::SocialProvider;
use crate::error::UsersResult;

/// Profile fields read from a provider's userinfo response
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SocialProfile {
    /// As reported by the provider, not yet normalized
    pub email: String,
}

#[trait_variant::make(ProfileFetcher: Send)]
pub trait LocalProfileFetcher {
    /// Any failure is reported as `UsersError::SocialAuthFailed`
    async fn fetch_profile(
        &self,
        provider: SocialProvider,
        access_token: &str,
    ) -> UsersResult<SocialProfile>;
}
