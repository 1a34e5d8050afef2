//! Principal resolution and the write guard for the gallery API.
//!
//! Reads are public. Any other method needs a resolved [`Principal`],
//! otherwise the request is refused with `403 Forbidden`.

use axum::{
    extract::{Request, State},
    http::{HeaderMap, Method},
    middleware::Next,
    response::Response,
};
use axum_extra::headers::{authorization::Bearer, Authorization, HeaderMapExt};
use gallery_common::Error;

use super::error::AppError;
use super::AppContext;
use crate::config::AuthConfig;

/// The identity a request acts as.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Principal {
    pub name: String,
}

impl Principal {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    /// Used for every caller when authentication is disabled.
    pub fn anonymous() -> Self {
        Self::new("anonymous")
    }
}

/// Maps request headers to a principal. Hosts embedding the router can
/// supply their own (session cookies, upstream identity headers, ...).
pub trait PrincipalResolver: Send + Sync {
    fn resolve(&self, headers: &HeaderMap) -> Option<Principal>;
}

/// Accepts `Authorization: Bearer <key>` against a configured API key.
#[derive(Debug, Clone, Default)]
pub struct ApiKeyResolver {
    enabled: bool,
    api_key: Option<String>,
}

impl ApiKeyResolver {
    pub fn new(enabled: bool, api_key: Option<String>) -> Self {
        Self {
            enabled,
            api_key: api_key.filter(|k| !k.is_empty()),
        }
    }

    pub fn from_config(config: &AuthConfig) -> Self {
        Self::new(config.enabled, config.api_key.clone())
    }
}

impl PrincipalResolver for ApiKeyResolver {
    fn resolve(&self, headers: &HeaderMap) -> Option<Principal> {
        if !self.enabled {
            return Some(Principal::anonymous());
        }

        let expected = self.api_key.as_deref()?;
        let bearer = headers.typed_get::<Authorization<Bearer>>()?;
        (bearer.token() == expected).then(|| Principal::new("api-key"))
    }
}

fn is_read(method: &Method) -> bool {
    matches!(*method, Method::GET | Method::HEAD | Method::OPTIONS)
}

/// Resolve the caller, attach the principal as a request extension, and
/// refuse writes from anonymous callers.
pub async fn principal_middleware(
    State(ctx): State<AppContext>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    match ctx.resolver.resolve(request.headers()) {
        Some(principal) => {
            request.extensions_mut().insert(principal);
        }
        None if !is_read(request.method()) => {
            tracing::warn!(
                method = %request.method(),
                path = %request.uri().path(),
                "Refusing write without a principal"
            );
            return Err(Error::Forbidden("authentication required for writes".into()).into());
        }
        None => {}
    }

    Ok(next.run(request).await)
}
