use super::headers::Headers;

const HTTPS_PORTS: [&str; 2] = ["443", "8443"];

/// Turn a path-only url into an absolute one using the `Host` header.
///
/// The request's own headers win over the configured defaults. Anything that
/// is not a `/`-prefixed path is returned untouched.
pub(crate) fn resolve_url(url: &str, headers: &Headers, defaults: &Headers) -> String {
    let host = headers.get("host").or_else(|| defaults.get("host"));
    match host {
        Some(host) if url.starts_with('/') => {
            let port = host.split(':').nth(1);
            let scheme = if port.is_some_and(|p| HTTPS_PORTS.contains(&p)) {
                "https"
            } else {
                "http"
            };
            format!("{scheme}://{host}{url}")
        }
        _ => url.to_owned(),
    }
}
