//! URL repair for user input and resolution of page-relative links.

use url::Url;

/// Turn a user-supplied string into a scheme-qualified URL.
///
/// Purely syntactic: surrounding whitespace is trimmed and `https://` is
/// prepended when no `http://` or `https://` prefix is present. Reachability
/// and validity are left to the fetcher.
pub fn normalize_input_url(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.starts_with("http://") || trimmed.starts_with("https://") {
        trimmed.to_string()
    } else {
        format!("https://{trimmed}")
    }
}

/// Resolve a possibly relative reference against the page URL.
///
/// Returns `None` for empty references and anything that cannot be resolved,
/// so one bad attribute never aborts the surrounding extraction.
pub fn resolve_url(base: &Url, reference: &str) -> Option<String> {
    let reference = reference.trim();
    if reference.is_empty() {
        return None;
    }
    base.join(reference).ok().map(String::from)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prepends_https_when_scheme_missing() {
        assert_eq!(normalize_input_url("a.com"), "https://a.com");
        assert_eq!(normalize_input_url("  shop.test/path "), "https://shop.test/path");
    }

    #[test]
    fn absolute_urls_are_unchanged() {
        assert_eq!(normalize_input_url("https://a.com"), "https://a.com");
        assert_eq!(normalize_input_url("http://a.com/x?y=1"), "http://a.com/x?y=1");
        let once = normalize_input_url("a.com");
        assert_eq!(normalize_input_url(&once), once);
    }

    #[test]
    fn empty_input_still_gets_a_scheme() {
        assert_eq!(normalize_input_url(""), "https://");
        assert_eq!(normalize_input_url("   "), "https://");
    }

    #[test]
    fn other_schemes_are_treated_as_hosts() {
        assert_eq!(normalize_input_url("ftp://a.com"), "https://ftp://a.com");
    }

    #[test]
    fn resolves_root_relative_against_page() {
        let base = Url::parse("https://a.com/shop").unwrap();
        assert_eq!(
            resolve_url(&base, "/img/x.jpg").as_deref(),
            Some("https://a.com/img/x.jpg")
        );
        assert_eq!(
            resolve_url(&base, "widget").as_deref(),
            Some("https://a.com/widget")
        );
        assert_eq!(
            resolve_url(&base, "//cdn.a.com/y.png").as_deref(),
            Some("https://cdn.a.com/y.png")
        );
    }

    #[test]
    fn absolute_references_win() {
        let base = Url::parse("https://a.com/shop/").unwrap();
        assert_eq!(
            resolve_url(&base, "https://b.com/p").as_deref(),
            Some("https://b.com/p")
        );
    }

    #[test]
    fn unresolvable_references_are_absent() {
        let base = Url::parse("https://a.com/").unwrap();
        assert_eq!(resolve_url(&base, ""), None);
        assert_eq!(resolve_url(&base, "   "), None);
        assert_eq!(resolve_url(&base, "http://[::1"), None);
    }
}
