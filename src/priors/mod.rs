//! Source-level bias priors.
//!
//! An AllSides-style ratings table, loaded once from CSV at startup and
//! read-only afterwards. Header names are matched flexibly so exported
//! tables from different tools load without editing.

mod error;


pub use error::PriorsError;

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// Pre-existing bias rating for an outlet, independent of any per-article
/// prediction.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourcePrior {
    pub source: String,
    pub domain: String,
    pub rating: String,
    pub origin: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

const NAME_KEYS: &[&str] = &[
    "source",
    "outlet",
    "name",
    "publication",
    "organization",
    "site_name",
    "brand",
    "source_name",
];
const DOMAIN_KEYS: &[&str] = &["domain", "site", "website", "host", "url", "homepage"];
const RATING_KEYS: &[&str] = &["rating", "bias", "allsides_rating", "allsides_bias", "allsides"];
const NOTES_KEYS: &[&str] = &["notes", "summary", "desc", "description", "about"];
const LINK_KEYS: &[&str] = &[
    "link",
    "source_url",
    "allsides_url",
    "ref",
    "reference",
    "page",
    "page_url",
];

/// Minimal domain -> outlet-name fallback for common outlets whose table
/// rows are keyed by name only.
const DOMAIN_TO_NAME: &[(&str, &str)] = &[
    ("cnn.com", "CNN"),
    ("foxnews.com", "Fox News"),
    ("apnews.com", "Associated Press"),
    ("associatedpress.com", "Associated Press"),
    ("nytimes.com", "New York Times"),
    ("wsj.com", "Wall Street Journal"),
];

const ORIGIN: &str = "AllSides";

/// Lookup table of source priors, keyed by normalized domain and name.
#[derive(Debug, Default)]
pub struct SourcePriors {
    by_domain: HashMap<String, SourcePrior>,
    by_name: HashMap<String, SourcePrior>,
}

impl SourcePriors {
    /// An empty table; every lookup misses.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads the CSV table. A missing file yields an empty table; malformed
    /// rows are skipped with a warning.
    pub fn load(path: &Path) -> Result<Self, PriorsError> {
        if !path.exists() {
            info!(path = %path.display(), "no priors table found, source priors disabled");
            return Ok(Self::default());
        }

        let mut reader = csv::Reader::from_path(path)?;
        let headers = reader.headers()?.clone();
        let mut table = Self::default();
        let mut rows = 0usize;

        for record in reader.records() {
            let record = match record {
                Ok(record) => record,
                Err(e) => {
                    warn!(error = %e, "skipping malformed priors row");
                    continue;
                }
            };

            let name = first_field(&headers, &record, NAME_KEYS).unwrap_or_default();
            let domain = first_field(&headers, &record, DOMAIN_KEYS).unwrap_or_default();
            let rating = first_field(&headers, &record, RATING_KEYS).unwrap_or_default();

            let name_key = norm_name(&name);
            let domain_key = norm_domain(&domain);
            if name_key.is_empty() && domain_key.is_empty() && rating.is_empty() {
                continue;
            }

            let prior = SourcePrior {
                source: if name.is_empty() {
                    domain_key.clone()
                } else {
                    name.clone()
                },
                domain: domain_key.clone(),
                rating,
                origin: ORIGIN.to_string(),
                notes: first_field(&headers, &record, NOTES_KEYS),
                url: first_field(&headers, &record, LINK_KEYS),
            };

            if !domain_key.is_empty() {
                table.by_domain.insert(domain_key, prior.clone());
            }
            if !name_key.is_empty() {
                table.by_name.insert(name_key, prior);
            }
            rows += 1;
        }

        info!(path = %path.display(), rows, "loaded source priors");
        Ok(table)
    }

    /// Looks up a prior by domain, mapped outlet name, then outlet name.
    pub fn lookup(&self, source_or_domain: &str) -> Option<SourcePrior> {
        let domain = norm_domain(source_or_domain);
        if !domain.is_empty() {
            if let Some(prior) = self.by_domain.get(&domain) {
                return Some(prior.clone());
            }
            if let Some((_, name)) = DOMAIN_TO_NAME.iter().find(|(d, _)| *d == domain)
                && let Some(prior) = self.by_name.get(&norm_name(name))
            {
                let mut prior = prior.clone();
                if prior.domain.is_empty() {
                    prior.domain = domain;
                }
                return Some(prior);
            }
        }

        self.by_name.get(&norm_name(source_or_domain)).cloned()
    }

    pub fn len(&self) -> usize {
        self.by_domain.len().max(self.by_name.len())
    }

    pub fn is_empty(&self) -> bool {
        self.by_domain.is_empty() && self.by_name.is_empty()
    }
}

/// First non-empty value among `keys`, matched case-insensitively against
/// the header row.
fn first_field(
    headers: &csv::StringRecord,
    record: &csv::StringRecord,
    keys: &[&str],
) -> Option<String> {
    for key in keys {
        if let Some(idx) = headers
            .iter()
            .position(|h| h.trim().eq_ignore_ascii_case(key))
            && let Some(value) = record.get(idx)
        {
            let value = value.trim();
            if !value.is_empty() {
                return Some(value.to_string());
            }
        }
    }
    None
}

/// Lowercases and strips scheme, `www.` and any path.
fn norm_domain(raw: &str) -> String {
    let mut s = raw.trim().to_lowercase();
    for prefix in ["https://", "http://"] {
        if let Some(rest) = s.strip_prefix(prefix) {
            s = rest.to_string();
            break;
        }
    }
    if let Some(rest) = s.strip_prefix("www.") {
        s = rest.to_string();
    }
    s.split('/').next().unwrap_or("").to_string()
}

fn norm_name(raw: &str) -> String {
    raw.trim().to_lowercase()
}
