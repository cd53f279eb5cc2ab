use std::fmt;

use url::Url;

use crate::error::{ApiError, Result};

/// Path prefix of the registry's v2 REST API.
const API_PREFIX: &str = "api/v2.0/";

/// Basic-auth credentials for the registry.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Request-scoped target and identity, built once by the caller and handed to
/// every operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestContext {
    api_base: Url,
    credentials: Option<Credentials>,
}

impl RequestContext {
    /// Build a context for `server` (e.g. `https://harbor.example.com`).
    pub fn new(server: &str, credentials: Option<Credentials>) -> Result<Self> {
        let server = server.trim();
        let mut base = Url::parse(server).map_err(|source| ApiError::InvalidBaseUrl {
            url: server.to_string(),
            source,
        })?;
        if base.cannot_be_a_base() {
            return Err(ApiError::UnsupportedBaseUrl(server.to_string()));
        }
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        let api_base = base.join(API_PREFIX).map_err(|source| ApiError::InvalidPath {
            base: base.to_string(),
            path: API_PREFIX.to_string(),
            source,
        })?;
        Ok(Self {
            api_base,
            credentials,
        })
    }

    pub fn api_base(&self) -> &Url {
        &self.api_base
    }

    pub fn credentials(&self) -> Option<&Credentials> {
        self.credentials.as_ref()
    }

    /// Resolve an API-relative path such as `system/gc/schedule`.
    pub fn endpoint(&self, path: &str) -> Result<Url> {
        let trimmed_path = path.trim_start_matches('/');
        self.api_base
            .join(trimmed_path)
            .map_err(|source| ApiError::InvalidPath {
                base: self.api_base.to_string(),
                path: trimmed_path.to_string(),
                source,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_api_prefix_to_bare_host() {
        let ctx = RequestContext::new("https://harbor.example.com", None).unwrap();
        assert_eq!(ctx.api_base().as_str(), "https://harbor.example.com/api/v2.0/");
    }

    #[test]
    fn keeps_existing_path_segments() {
        let ctx = RequestContext::new("http://localhost:8080/registry", None).unwrap();
        assert_eq!(
            ctx.endpoint("/system/gc/schedule").unwrap().as_str(),
            "http://localhost:8080/registry/api/v2.0/system/gc/schedule"
        );
    }

    #[test]
    fn rejects_malformed_server() {
        assert!(matches!(
            RequestContext::new("not a url", None),
            Err(ApiError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            RequestContext::new("mailto:admin@example.com", None),
            Err(ApiError::UnsupportedBaseUrl(_))
        ));
    }

    #[test]
    fn debug_hides_password() {
        let ctx = RequestContext::new(
            "https://harbor.example.com",
            Some(Credentials::new("admin", "Harbor12345")),
        )
        .unwrap();
        let rendered = format!("{ctx:?}");
        assert!(rendered.contains("admin"));
        assert!(!rendered.contains("Harbor12345"));
    }
}
