//! ISO 3166-1 alpha-2 country code to display name annotation.

/// Look up the display name for a two-letter country code.
///
/// `"TW"` is a deliberate business override: it always maps to `"Taiwan"`
/// regardless of what the general registry would return. Unknown or empty
/// codes yield `None` rather than an error; absence is valid and simply
/// propagates.
pub fn country_name(code: &str) -> Option<String> {
    if code == "TW" {
        return Some("Taiwan".to_string());
    }
    rust_iso3166::from_alpha2(code).map(|c| c.name.to_string())
}

/// Convenience for optional codes: `None` stays `None`.
pub fn annotate(code: Option<&str>) -> Option<String> {
    code.and_then(country_name)
}
