use std::collections::HashSet;
use std::sync::OnceLock;

use scraper::{Html, Selector};
use url::Url;

const DEFAULT_MAX_LINKS: usize = 5_000;

/// Turns a page's raw anchor targets into candidate product urls.
#[derive(Debug, Clone)]
pub struct LinkDiscoverer {
    max_links: usize,
}

impl LinkDiscoverer {
    pub fn new() -> Self {
        Self::with_max_links(DEFAULT_MAX_LINKS)
    }

    pub fn with_max_links(max_links: usize) -> Self {
        Self { max_links }
    }

    /// `href` of every anchor, in document order. Anchors without one yield `None`.
    pub fn anchor_targets(document: &Html) -> Vec<Option<String>> {
        document
            .select(anchor_selector())
            .map(|anchor| anchor.value().attr("href").map(str::to_string))
            .collect()
    }

    /// Candidate urls for a fetched page.
    pub fn discover_in(&self, document: &Html, base: &Url) -> Vec<Url> {
        let targets = Self::anchor_targets(document);
        self.discover(targets.iter().map(Option::as_deref), base)
    }

    /// Drop empty targets, dedupe keeping the first occurrence, keep only
    /// absolute http(s) targets, then resolve each against `base`.
    pub fn discover<'a, I>(&self, raw: I, base: &Url) -> Vec<Url>
    where
        I: IntoIterator<Item = Option<&'a str>>,
    {
        let mut seen_raw = HashSet::new();
        let mut seen_resolved = HashSet::new();
        let mut links = Vec::new();

        for target in raw.into_iter().flatten() {
            if links.len() >= self.max_links {
                break;
            }
            let target = target.trim();
            if target.is_empty() || !seen_raw.insert(target) {
                continue;
            }
            if !is_absolute_http(target) {
                continue;
            }
            let Ok(resolved) = base.join(target) else {
                continue;
            };
            if !seen_resolved.insert(resolved.as_str().to_string()) {
                continue;
            }
            links.push(resolved);
        }
        links
    }
}

impl Default for LinkDiscoverer {
    fn default() -> Self {
        Self::new()
    }
}

fn is_absolute_http(target: &str) -> bool {
    let lower = target.to_ascii_lowercase();
    ["http://", "https://"]
        .iter()
        .any(|scheme| lower.starts_with(scheme) && lower.len() > scheme.len())
}

fn anchor_selector() -> &'static Selector {
    static SELECTOR: OnceLock<Selector> = OnceLock::new();
    SELECTOR.get_or_init(|| Selector::parse("a").expect("static selector"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scheme_check_is_case_insensitive() {
        assert!(is_absolute_http("HTTPS://shop.example.com"));
        assert!(!is_absolute_http("https://"));
        assert!(!is_absolute_http("//shop.example.com/x"));
        assert!(!is_absolute_http("mailto:a@b.c"));
    }
}
