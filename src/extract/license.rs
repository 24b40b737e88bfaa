pub const UNKNOWN_LICENSE: &str = "unknown";

const LICENSE_KEY: &str = "licenses";

/// Value of the first `licenses:<value>` tag, or `"unknown"`.
///
/// Tags without a colon are skipped. For `licenses:a:b` the value is `a`.
pub fn resolve_license(tags: &[String]) -> String {
    tags.iter()
        .filter_map(|tag| {
            let mut parts = tag.split(':');
            let key = parts.next()?;
            let value = parts.next()?;
            (key == LICENSE_KEY).then_some(value)
        })
        .next()
        .unwrap_or(UNKNOWN_LICENSE)
        .to_string()
}
