//! Contact details and social profile links.
//!
//! Seen-sets live only for one call, so concurrent scrapes never share state.

use indexmap::IndexSet;
use scraper::{Html, Node};
use url::Url;

use crate::patterns;
use crate::record::{Contacts, SocialLink};

/// Emails and phone numbers from mailto links and visible body text.
///
/// Returns `None` when nothing was found, so callers can tell "no contacts"
/// apart from an empty list.
pub fn extract_contacts(document: &Html) -> Option<Contacts> {
    let mut emails = IndexSet::new();
    let mut phones = IndexSet::new();

    for anchor in document.select(&patterns::MAILTO) {
        if let Some(email) = anchor.value().attr("href").and_then(mailto_address) {
            emails.insert(email);
        }
    }

    for text in visible_text_nodes(document) {
        for found in patterns::EMAIL.find_iter(text) {
            emails.insert(found.as_str().to_lowercase());
        }
        for found in patterns::PHONE.find_iter(text) {
            phones.insert(normalize_phone(found.as_str()));
        }
    }

    let contacts = Contacts {
        emails: emails.into_iter().collect(),
        phones: phones.into_iter().collect(),
    };
    (!contacts.is_empty()).then_some(contacts)
}

/// Address part of a `mailto:` href, lower-cased, without query parameters.
fn mailto_address(href: &str) -> Option<String> {
    let prefix = href.get(..7)?;
    if !prefix.eq_ignore_ascii_case("mailto:") {
        return None;
    }
    let address = href[7..].split('?').next().unwrap_or_default().trim();
    (!address.is_empty()).then(|| address.to_lowercase())
}

/// Strip `.`, `-`, parentheses and whitespace from a matched number.
pub fn normalize_phone(raw: &str) -> String {
    patterns::PHONE_PUNCTUATION.replace_all(raw, "").into_owned()
}

/// Text nodes under `body` that are not inside `script` or `style`.
fn visible_text_nodes(document: &Html) -> impl Iterator<Item = &str> {
    document
        .select(&patterns::BODY)
        .flat_map(|body| body.descendants())
        .filter(|node| {
            !node
                .parent()
                .and_then(|parent| parent.value().as_element())
                .is_some_and(|el| matches!(el.name(), "script" | "style"))
        })
        .filter_map(|node| match node.value() {
            Node::Text(text) => Some(&**text),
            _ => None,
        })
}

/// One link per social platform, first occurrence wins.
pub fn extract_social_links(document: &Html) -> Option<Vec<SocialLink>> {
    let mut seen = IndexSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&patterns::LINK_WITH_HREF) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let Some((platform, url)) = social_platform(href) else {
            continue;
        };
        if seen.insert(platform.clone()) {
            links.push(SocialLink { platform, url });
        }
    }

    (!links.is_empty()).then_some(links)
}

/// Platform display name and normalized URL for an absolute social href.
pub fn social_platform(href: &str) -> Option<(String, String)> {
    let url = Url::parse(href.trim()).ok()?;
    if !matches!(url.scheme(), "http" | "https") {
        return None;
    }
    let host = url.host_str()?;
    let host = host.strip_prefix("www.").unwrap_or(host);

    let domain = patterns::SOCIAL_DOMAINS
        .iter()
        .find(|domain| host == **domain || host.ends_with(&format!(".{domain}")))?;
    Some((platform_name(domain), url.to_string()))
}

/// `linkedin.com` -> `Linkedin`
fn platform_name(domain: &str) -> String {
    let label = domain.split('.').next().unwrap_or(domain);
    let mut chars = label.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
