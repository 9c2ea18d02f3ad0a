//! Password gate for the admin API.
//!
//! Compares in constant time. The gate only protects the admin surface; it
//! is not a security boundary for the published site.

use axum::{
    extract::Request,
    http::header,
    middleware::Next,
    response::{IntoResponse, Response},
};
use subtle::ConstantTimeEq;

use crate::errors::AppError;

/// Header carrying the admin password.
pub const ADMIN_PASSWORD_HEADER: &str = "x-admin-password";

/// Admin auth layer. With no password configured every request passes.
pub async fn admin_auth_layer(expected: Option<String>, request: Request, next: Next) -> Response {
    let Some(expected) = expected else {
        return next.run(request).await;
    };

    let provided = request
        .headers()
        .get(ADMIN_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .or_else(|| {
            request
                .headers()
                .get(header::AUTHORIZATION)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.strip_prefix("Bearer "))
        })
        .map(|s| s.to_string());

    match provided {
        Some(password) if constant_time_compare(&password, &expected) => next.run(request).await,
        Some(_) => {
            tracing::warn!("Rejected admin request with wrong password");
            AppError::Unauthorized("Incorrect password".to_string()).into_response()
        }
        None => AppError::Unauthorized("Admin password required".to_string()).into_response(),
    }
}

fn constant_time_compare(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compare_equal() {
        assert!(constant_time_compare("open-sesame", "open-sesame"));
    }

    #[test]
    fn test_compare_not_equal() {
        assert!(!constant_time_compare("open-sesame", "open-sesamE"));
        assert!(!constant_time_compare("short", "much-longer-password"));
    }

    #[test]
    fn test_compare_empty() {
        assert!(constant_time_compare("", ""));
        assert!(!constant_time_compare("", "not-empty"));
    }
}
