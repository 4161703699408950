//! URL utilities for consistent URL handling
//!
//! Normalizes server base URLs so the multi-chat endpoint path can be
//! appended without producing double slashes.

/// Normalize a base URL by removing trailing slashes.
///
/// # Examples
///
/// ```
/// use multichat::utils::url::normalize_base_url;
///
/// assert_eq!(normalize_base_url("https://chat.example.com/"), "https://chat.example.com");
/// assert_eq!(normalize_base_url("https://chat.example.com///"), "https://chat.example.com");
/// ```
pub fn normalize_base_url(base_url: &str) -> String {
    base_url.trim_end_matches('/').to_string()
}

/// Join a server base URL and an endpoint path with exactly one slash.
///
/// # Examples
///
/// ```
/// use multichat::utils::url::construct_api_url;
///
/// assert_eq!(
///     construct_api_url("https://chat.example.com/", "/api/multi-chat"),
///     "https://chat.example.com/api/multi-chat"
/// );
/// ```
pub fn construct_api_url(base_url: &str, endpoint: &str) -> String {
    let normalized_base = normalize_base_url(base_url);
    let endpoint = endpoint.trim_start_matches('/');
    format!("{}/{}", normalized_base, endpoint)
}
