use std::time::Duration;

pub fn is_http_url(value: &str) -> bool {
    let lower = value.trim().to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Extracts the numeric `id` parameter from a page query string such as
/// `?id=3` or `roll.html?id=3&ref=x`. Missing or non-numeric ids yield
/// `None`, which the detail page treats as "not found".
pub fn parse_id_param(location: &str) -> Option<u64> {
    let base = reqwest::Url::parse("http://localhost/").ok()?;
    let url = base.join(location.trim()).ok()?;
    let raw = url
        .query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())?;
    raw.trim().parse::<u64>().ok()
}

pub fn parse_timeout_seconds(value: usize) -> Result<Option<Duration>, String> {
    if value == 0 {
        return Err("timeout must be a positive number of seconds".to_string());
    }
    Ok(Some(Duration::from_secs(value as u64)))
}

/// Lowercased, trimmed search keyword.
pub fn normalize_query(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn escape_html(value: &str) -> String {
    value
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

pub fn escape_attr(value: &str) -> String {
    escape_html(value)
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}
