//! Google OIDC provider.

use aaasj_core::auth::{generate_state, AuthError, OidcClaims, OidcProviderClient, Result};
use async_trait::async_trait;
use openidconnect::{
    core::{CoreAuthenticationFlow, CoreClient, CoreProviderMetadata},
    reqwest, AuthorizationCode, ClientId, ClientSecret, CsrfToken, EndpointMaybeSet, EndpointSet,
    IssuerUrl, Nonce, OAuth2TokenResponse, PkceCodeVerifier, RedirectUrl, Scope, TokenResponse,
};
use url::Url;

use crate::config::ProviderConfig;

const GOOGLE_ISSUER: &str = "https://accounts.google.com";

/// Scopes requested on top of `openid`: profile data for the session, and
/// read access to Photos and Drive for the album tools.
const SCOPES: &[&str] = &[
    "email",
    "profile",
    "https://www.googleapis.com/auth/photoslibrary.readonly",
    "https://www.googleapis.com/auth/drive.readonly",
];

/// `CoreClient` as returned by `from_provider_metadata`: the auth URL is
/// always discovered, token and userinfo URLs may be.
type ConfiguredCoreClient = CoreClient<
    EndpointSet,
    openidconnect::EndpointNotSet,
    openidconnect::EndpointNotSet,
    openidconnect::EndpointNotSet,
    EndpointMaybeSet,
    EndpointMaybeSet,
>;

/// Google OIDC provider restricted to one Workspace domain.
pub struct GoogleProvider {
    client: ConfiguredCoreClient,
    http_client: reqwest::Client,
    hosted_domain: String,
}

impl GoogleProvider {
    /// Create a new Google provider by discovering the OIDC metadata.
    ///
    /// # Errors
    ///
    /// Returns an error if discovery fails or the redirect URI is invalid.
    pub async fn new(config: &ProviderConfig, hosted_domain: &str) -> Result<Self> {
        let issuer_url = IssuerUrl::new(GOOGLE_ISSUER.to_string())
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        // Token endpoints must not be followed through redirects.
        let http_client = reqwest::ClientBuilder::new()
            .redirect(reqwest::redirect::Policy::none())
            .build()
            .map_err(|e| AuthError::Provider(format!("Failed to build HTTP client: {e}")))?;

        let provider_metadata = CoreProviderMetadata::discover_async(issuer_url, &http_client)
            .await
            .map_err(|e| AuthError::Provider(e.to_string()))?;

        let client = CoreClient::from_provider_metadata(
            provider_metadata,
            ClientId::new(config.client_id.clone()),
            config.client_secret.clone().map(ClientSecret::new),
        )
        .set_redirect_uri(
            RedirectUrl::new(config.redirect_uri.to_string())
                .map_err(|e| AuthError::Provider(e.to_string()))?,
        );

        tracing::info!(hosted_domain, "Google OIDC provider discovered");

        Ok(Self {
            client,
            http_client,
            hosted_domain: hosted_domain.to_string(),
        })
    }
}

#[async_trait]
impl OidcProviderClient for GoogleProvider {
    async fn authorization_url(&self, state: &str, pkce_challenge: &str) -> Result<Url> {
        let state_owned = state.to_string();

        let mut request = self.client.authorize_url(
            CoreAuthenticationFlow::AuthorizationCode,
            move || CsrfToken::new(state_owned),
            || Nonce::new(generate_state()),
        );
        for scope in SCOPES {
            request = request.add_scope(Scope::new(scope.to_string()));
        }

        // The PKCE challenge is computed by the caller, which keeps the verifier.
        let (auth_url, _csrf_token, _nonce) = request
            .add_extra_param("code_challenge", pkce_challenge.to_string())
            .add_extra_param("code_challenge_method", "S256")
            .add_extra_param("hd", self.hosted_domain.clone())
            .url();

        Ok(auth_url)
    }

    async fn exchange_code(&self, code: &str, pkce_verifier: &str) -> Result<OidcClaims> {
        let token_response = self
            .client
            .exchange_code(AuthorizationCode::new(code.to_string()))
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?
            .set_pkce_verifier(PkceCodeVerifier::new(pkce_verifier.to_string()))
            .request_async(&self.http_client)
            .await
            .map_err(|e| AuthError::CodeExchange(e.to_string()))?;

        let id_token = token_response
            .id_token()
            .ok_or_else(|| AuthError::InvalidToken("No ID token in response".to_string()))?;

        let claims = id_token
            .claims(&self.client.id_token_verifier(), |_: Option<&Nonce>| Ok(()))
            .map_err(|e| AuthError::InvalidToken(e.to_string()))?;

        Ok(OidcClaims {
            subject: claims.subject().to_string(),
            email: claims.email().map(|e| e.to_string()),
            name: claims
                .name()
                .and_then(|n| n.get(None))
                .map(|n| n.to_string()),
            access_token: Some(token_response.access_token().secret().clone()),
        })
    }
}
