//! Open policy for miscellaneous web hits.
//!
//! Links on trusted hosts (code hosting, microblogging) skip the detail
//! modal and go straight to the browser. Everything else shows its
//! structured detail when it has any, falls back to the browser when it only
//! has a link, and does nothing otherwise.

use std::collections::BTreeSet;

use url::Url;

use crate::model::{OtherDetail, OtherResultItem};

/// Suffixes trusted when no configuration says otherwise.
pub const DEFAULT_TRUSTED_DOMAINS: &[&str] = &[
    "github.com",
    "gitlab.com",
    "bitbucket.org",
    "twitter.com",
    "x.com",
];

/// Allow-list of domain suffixes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrustedDomains {
    suffixes: BTreeSet<String>,
}

impl Default for TrustedDomains {
    fn default() -> Self {
        DEFAULT_TRUSTED_DOMAINS.iter().copied().collect()
    }
}

impl<S: AsRef<str>> FromIterator<S> for TrustedDomains {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let mut domains = Self::empty();
        for suffix in iter {
            domains.allow_suffix(suffix.as_ref());
        }
        domains
    }
}

impl TrustedDomains {
    pub fn empty() -> Self {
        Self {
            suffixes: BTreeSet::new(),
        }
    }

    pub fn allow_suffix(&mut self, suffix: &str) {
        let suffix = suffix.trim().trim_start_matches('.').to_ascii_lowercase();
        if !suffix.is_empty() {
            self.suffixes.insert(suffix);
        }
    }

    pub fn suffixes(&self) -> impl Iterator<Item = &str> {
        self.suffixes.iter().map(String::as_str)
    }

    /// Whether the link's host equals a suffix or is a subdomain of one.
    pub fn is_trusted(&self, link: &str) -> bool {
        let Some(host) = host_of(link) else {
            return false;
        };
        self.suffixes
            .iter()
            .any(|suffix| host == *suffix || host.ends_with(&format!(".{suffix}")))
    }
}

fn host_of(link: &str) -> Option<String> {
    let link = link.trim();
    Url::parse(link)
        .or_else(|_| Url::parse(&format!("https://{link}")))
        .ok()
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
}

/// What activating a miscellaneous hit does.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OpenDecision {
    /// Open the link in the browser.
    Navigate(String),
    /// Show the detail modal.
    ShowDetail(OtherDetail),
    /// Nothing to open.
    Ignore,
}

/// Decide how an item opens. The trusted-domain bypass wins over detail
/// content.
pub fn decide_open(item: &OtherResultItem, trusted: &TrustedDomains) -> OpenDecision {
    let link = item.actionable_link();
    if let Some(link) = link.filter(|link| trusted.is_trusted(link)) {
        return OpenDecision::Navigate(link.to_string());
    }
    let detail = item.detail();
    if !detail.is_empty() {
        return OpenDecision::ShowDetail(detail);
    }
    match link {
        Some(link) => OpenDecision::Navigate(link.to_string()),
        None => OpenDecision::Ignore,
    }
}
