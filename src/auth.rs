use crate::error::{LarkError, LarkResult};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};

/// Authentication trait for the Lark open platform
///
/// Implementations only decorate headers. Tokens are issued and refreshed
/// outside this crate.
#[async_trait::async_trait]
pub trait Authentication: Send + Sync {
    /// Apply authentication to the request headers
    async fn apply_auth(&self, headers: &mut HeaderMap) -> LarkResult<()>;
}

fn bearer(token: &str) -> LarkResult<HeaderValue> {
    format!("Bearer {}", token)
        .parse()
        .map_err(|e| LarkError::auth_error(format!("Invalid auth header: {}", e)))
}

/// Tenant access token (`t-...`), acting as the app itself
#[derive(Debug, Clone)]
pub struct TenantTokenAuth {
    token: String,
}

impl TenantTokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl Authentication for TenantTokenAuth {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> LarkResult<()> {
        headers.insert(AUTHORIZATION, bearer(&self.token)?);
        Ok(())
    }
}

/// User access token (`u-...`), acting on behalf of a signed-in user
#[derive(Debug, Clone)]
pub struct UserTokenAuth {
    token: String,
}

impl UserTokenAuth {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
        }
    }
}

#[async_trait::async_trait]
impl Authentication for UserTokenAuth {
    async fn apply_auth(&self, headers: &mut HeaderMap) -> LarkResult<()> {
        headers.insert(AUTHORIZATION, bearer(&self.token)?);
        Ok(())
    }
}

/// No authentication
#[derive(Debug, Clone)]
pub struct NoAuth;

#[async_trait::async_trait]
impl Authentication for NoAuth {
    async fn apply_auth(&self, _headers: &mut HeaderMap) -> LarkResult<()> {
        Ok(())
    }
}
