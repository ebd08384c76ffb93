//! The application's endpoint URIs.

/// The root route which redirects to the dashboard.
pub const ROOT: &str = "/";
/// The sales analytics dashboard page.
pub const DASHBOARD_VIEW: &str = "/dashboard";
/// The dashboard content partial fetched by the filter bar.
pub const DASHBOARD_CONTENT: &str = "/dashboard/content";

// These tests are here so that we know when we call `Uri::from_shared` it will not panic.
#[cfg(test)]
mod endpoints_tests {
    use axum::http::Uri;

    use crate::endpoints;

    fn assert_endpoint_is_valid_uri(uri: &str) {
        assert!(uri.parse::<Uri>().is_ok());
    }

    #[test]
    fn endpoints_are_valid_uris() {
        assert_endpoint_is_valid_uri(endpoints::ROOT);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_VIEW);
        assert_endpoint_is_valid_uri(endpoints::DASHBOARD_CONTENT);
    }
}
