//! Axum integration for settings forms.
//!
//! Lets a handler receive the submitted plugin settings straight from the
//! request's query string.
//!
//! # Example
//!
//! ```rust,ignore
//! use axum::{Router, routing::get, Json};
//! use nodered_display::{parse_divisions, Division, Settings};
//!
//! async fn preview_layout(settings: Settings) -> Json<Vec<Division>> {
//!     Json(parse_divisions(&settings))
//! }
//!
//! let app = Router::new()
//!     .route("/layout", get(preview_layout));
//! ```

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::Settings;

/// Extract settings from the request query string.
///
/// Array-suffixed keys (`division_0_type[]`) accumulate into lists, as with
/// [`Settings::from_form`]. A request without a query string yields empty
/// settings; extraction never rejects.
impl<S> FromRequestParts<S> for Settings
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let settings = parts
            .uri
            .query()
            .map(Settings::from_form)
            .unwrap_or_default();

        tracing::debug!("Extracted {} settings from query string", settings.len());
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    #[tokio::test]
    async fn test_settings_extractor() {
        let request = Request::builder()
            .uri("/layout?pageTitle=Kitchen&division_0_type%5B%5D=title&division_0_type%5B%5D=dataoutput")
            .body(())
            .unwrap();

        let (mut parts, _body) = request.into_parts();
        let settings = Settings::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert_eq!(settings.get_str("pageTitle"), Some("Kitchen"));
        assert_eq!(settings.get("division_0_type[]").unwrap().values().len(), 2);
    }

    #[tokio::test]
    async fn test_settings_extractor_no_query() {
        let request = Request::builder().uri("/layout").body(()).unwrap();

        let (mut parts, _body) = request.into_parts();
        let settings = Settings::from_request_parts(&mut parts, &())
            .await
            .unwrap();

        assert!(settings.is_empty());
    }
}
