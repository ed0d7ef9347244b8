//! Crawler IP range sources and their response shapes.
//!
//! Every provider publishes its ranges in one of a handful of formats. Each
//! source declares which [`ResponseShape`] it uses and [`decode`] turns the
//! response body into raw IP specifications. Normalization happens later in
//! the aggregator, so decoders only extract strings.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;
use tracing::{debug, warn};

use crate::error::{GoodBotsError, Result};

/// Format of a provider's published range list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseShape {
    /// One CIDR or address per line, `#` comments allowed
    PlainText,
    /// `{"prefixes": [{"ipv4Prefix": ...}]}` or a bare array of such objects
    PrefixObjects,
    /// `[{"address": ...}]`, IPv4 entries only
    AddressObjects,
    /// `["1.2.3.0/24", ...]` or `{"prefixes": ["1.2.3.0/24", ...]}`
    CidrList,
    /// JSON list when the body looks like JSON, plain text otherwise
    TextOrJson,
    /// Free-form document; CIDR blocks are scraped out of it
    StaticDocument,
}

/// One published endpoint for one bot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceConfig {
    pub provider: String,
    pub bot: String,
    pub url: String,
    pub shape: ResponseShape,
}

impl SourceConfig {
    pub fn new(provider: &str, bot: &str, url: &str, shape: ResponseShape) -> Self {
        Self {
            provider: provider.to_string(),
            bot: bot.to_string(),
            url: url.to_string(),
            shape,
        }
    }

    /// Group name used in logs and output comments, e.g. `Google - Googlebot`.
    pub fn display_name(&self) -> String {
        format!("{} - {}", self.provider, self.bot)
    }
}

/// Known crawler endpoints, in output order.
pub fn default_sources() -> Vec<SourceConfig> {
    use ResponseShape::*;

    vec![
        SourceConfig::new(
            "Google",
            "Googlebot",
            "https://developers.google.com/static/search/apis/ipranges/googlebot.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "Google",
            "Special Crawlers",
            "https://developers.google.com/static/search/apis/ipranges/special-crawlers.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "Google",
            "User-triggered Fetchers",
            "https://developers.google.com/static/search/apis/ipranges/user-triggered-fetchers.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "Bing",
            "Bingbot",
            "https://www.bing.com/toolbox/bingbot.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "OpenAI",
            "GPTBot",
            "https://openai.com/gptbot.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "OpenAI",
            "ChatGPT User",
            "https://openai.com/chatgpt-user.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "OpenAI",
            "SearchBot",
            "https://openai.com/searchbot.json",
            PrefixObjects,
        ),
        SourceConfig::new(
            "Apple",
            "Applebot",
            "https://search.developer.apple.com/applebot.json",
            PlainText,
        ),
        SourceConfig::new(
            "Perplexity",
            "PerplexityBot",
            "https://www.perplexity.com/perplexitybot.json",
            CidrList,
        ),
        SourceConfig::new(
            "Perplexity",
            "User",
            "https://www.perplexity.com/perplexity-user.json",
            CidrList,
        ),
        SourceConfig::new(
            "Naver",
            "Naverbot",
            "https://searchadvisor.naver.com/naverbot_ips.json",
            TextOrJson,
        ),
        SourceConfig::new(
            "Mistral",
            "User IPs",
            "https://mistral.ai/mistralai-user-ips.json",
            CidrList,
        ),
        SourceConfig::new(
            "DuckDuckGo",
            "DuckDuckBot",
            "https://duckduckgo.com/duckduckbot.json",
            AddressObjects,
        ),
        SourceConfig::new(
            "DuckDuckGo",
            "DuckAssistBot",
            "https://duckduckgo.com/duckassistbot.json",
            AddressObjects,
        ),
        SourceConfig::new(
            "Common Crawl",
            "CCBot",
            "https://index.commoncrawl.org/ccbot.json",
            StaticDocument,
        ),
    ]
}

/// Decode a response body into raw IP specifications.
///
/// IPv6 entries are dropped here since the output only carries IPv4 ranges.
pub fn decode(shape: ResponseShape, body: &str) -> Result<Vec<String>> {
    let specs = match shape {
        ResponseShape::PlainText => decode_plain_text(body),
        ResponseShape::PrefixObjects => decode_prefix_objects(body)?,
        ResponseShape::AddressObjects => decode_address_objects(body)?,
        ResponseShape::CidrList => decode_cidr_list(body)?,
        ResponseShape::TextOrJson => decode_text_or_json(body)?,
        ResponseShape::StaticDocument => decode_static_document(body)?,
    };

    let total = specs.len();
    let ipv4: Vec<String> = specs.into_iter().filter(|s| !is_ipv6(s)).collect();
    if ipv4.len() < total {
        debug!("Skipped {} IPv6 entries", total - ipv4.len());
    }

    Ok(ipv4)
}

fn is_ipv6(spec: &str) -> bool {
    spec.contains(':')
}

fn decode_plain_text(body: &str) -> Vec<String> {
    body.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrefixDocument {
    Bare(Vec<PrefixEntry>),
    Wrapped { prefixes: Vec<PrefixEntry> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PrefixEntry {
    Flat(String),
    Object {
        #[serde(rename = "ipv4Prefix")]
        ipv4_prefix: Option<String>,
        #[serde(rename = "ipv6Prefix")]
        ipv6_prefix: Option<String>,
    },
    Other(serde_json::Value),
}

fn decode_prefix_objects(body: &str) -> Result<Vec<String>> {
    let document: PrefixDocument = serde_json::from_str(body)
        .map_err(|e| GoodBotsError::Schema(format!("expected prefix list: {}", e)))?;

    let entries = match document {
        PrefixDocument::Bare(entries) => entries,
        PrefixDocument::Wrapped { prefixes } => prefixes,
    };

    let mut specs = Vec::with_capacity(entries.len());
    for entry in entries {
        match entry {
            PrefixEntry::Flat(cidr) => specs.push(cidr),
            PrefixEntry::Object {
                ipv4_prefix: Some(cidr),
                ..
            } => specs.push(cidr),
            PrefixEntry::Object {
                ipv4_prefix: None,
                ipv6_prefix: Some(_),
            } => {}
            PrefixEntry::Object { .. } => warn!("Prefix entry without ipv4Prefix field"),
            PrefixEntry::Other(value) => warn!("Invalid prefix entry in response: {}", value),
        }
    }

    Ok(specs)
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddressDocument {
    Bare(Vec<AddressEntry>),
    Wrapped { addresses: Vec<AddressEntry> },
}

#[derive(Deserialize)]
#[serde(untagged)]
enum AddressEntry {
    Flat(String),
    Object { address: String },
    Other(serde_json::Value),
}

fn decode_address_objects(body: &str) -> Result<Vec<String>> {
    let document: AddressDocument = serde_json::from_str(body)
        .map_err(|e| GoodBotsError::Schema(format!("expected address list: {}", e)))?;

    let entries = match document {
        AddressDocument::Bare(entries) => entries,
        AddressDocument::Wrapped { addresses } => addresses,
    };

    Ok(entries
        .into_iter()
        .filter_map(|entry| match entry {
            AddressEntry::Flat(address) | AddressEntry::Object { address } => Some(address),
            AddressEntry::Other(value) => {
                warn!("Invalid address entry in response: {}", value);
                None
            }
        })
        .collect())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum CidrDocument {
    Bare(Vec<String>),
    Wrapped { prefixes: Vec<String> },
}

fn decode_cidr_list(body: &str) -> Result<Vec<String>> {
    let document: CidrDocument = serde_json::from_str(body)
        .map_err(|e| GoodBotsError::Schema(format!("expected CIDR list: {}", e)))?;

    Ok(match document {
        CidrDocument::Bare(cidrs) => cidrs,
        CidrDocument::Wrapped { prefixes } => prefixes,
    })
}

fn decode_text_or_json(body: &str) -> Result<Vec<String>> {
    let trimmed = body.trim_start();
    if !(trimmed.starts_with('[') || trimmed.starts_with('{')) {
        return Ok(decode_plain_text(body));
    }

    decode_cidr_list(body).or_else(|_| decode_prefix_objects(body))
}

static CIDR_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:\d{1,3}\.){3}\d{1,3}/\d{1,2}\b").expect("CIDR token pattern is valid")
});

fn decode_static_document(body: &str) -> Result<Vec<String>> {
    let specs: Vec<String> = CIDR_TOKEN
        .find_iter(body)
        .map(|m| m.as_str().to_string())
        .collect();

    if specs.is_empty() {
        return Err(GoodBotsError::Schema(
            "no CIDR blocks found in document".to_string(),
        ));
    }

    Ok(specs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sources_order() {
        let providers: Vec<String> = default_sources().into_iter().map(|s| s.provider).collect();
        let mut seen: Vec<&str> = Vec::new();
        for p in &providers {
            if seen.last() != Some(&p.as_str()) {
                seen.push(p.as_str());
            }
        }
        assert_eq!(
            seen,
            vec![
                "Google",
                "Bing",
                "OpenAI",
                "Apple",
                "Perplexity",
                "Naver",
                "Mistral",
                "DuckDuckGo",
                "Common Crawl"
            ]
        );
    }

    #[test]
    fn test_default_sources_use_https() {
        assert!(default_sources().iter().all(|s| s.url.starts_with("https://")));
    }

    #[test]
    fn test_display_name() {
        let source = SourceConfig::new("Bing", "Bingbot", "https://x", ResponseShape::PrefixObjects);
        assert_eq!(source.display_name(), "Bing - Bingbot");
    }

    #[test]
    fn test_shape_serde_names() {
        let yaml = serde_yaml::to_string(&ResponseShape::PrefixObjects).unwrap();
        assert_eq!(yaml.trim(), "prefix_objects");
        let shape: ResponseShape = serde_yaml::from_str("static_document").unwrap();
        assert_eq!(shape, ResponseShape::StaticDocument);
    }

    #[test]
    fn test_decode_plain_text() {
        let body = "# Applebot\n17.58.98.0/24\n\n  17.58.99.0/24  \n";
        let specs = decode(ResponseShape::PlainText, body).unwrap();
        assert_eq!(specs, vec!["17.58.98.0/24", "17.58.99.0/24"]);
    }

    #[test]
    fn test_decode_prefix_objects_google() {
        let body = r#"{
            "creationTime": "2024-01-01T00:00:00",
            "prefixes": [
                {"ipv6Prefix": "2001:4860:4801:10::/64"},
                {"ipv4Prefix": "66.249.64.0/27"},
                {"ipv4Prefix": "66.249.64.32/27"}
            ]
        }"#;
        let specs = decode(ResponseShape::PrefixObjects, body).unwrap();
        assert_eq!(specs, vec!["66.249.64.0/27", "66.249.64.32/27"]);
    }

    #[test]
    fn test_decode_prefix_objects_skips_bad_entries() {
        let body = r#"{"prefixes": [
            {"ipv4Prefix": "192.0.2.0/24"},
            {"invalid": "not_an_ip"},
            42
        ]}"#;
        let specs = decode(ResponseShape::PrefixObjects, body).unwrap();
        assert_eq!(specs, vec!["192.0.2.0/24"]);
    }

    #[test]
    fn test_decode_prefix_objects_flat_list() {
        let body = r#"["20.171.206.0/24", {"ipv4Prefix": "52.230.152.0/24"}]"#;
        let specs = decode(ResponseShape::PrefixObjects, body).unwrap();
        assert_eq!(specs, vec!["20.171.206.0/24", "52.230.152.0/24"]);
    }

    #[test]
    fn test_decode_prefix_objects_wrong_shape() {
        let err = decode(ResponseShape::PrefixObjects, r#"{"data": []}"#).unwrap_err();
        assert!(matches!(err, GoodBotsError::Schema(_)));

        let err = decode(ResponseShape::PrefixObjects, "<html>oops</html>").unwrap_err();
        assert!(matches!(err, GoodBotsError::Schema(_)));
    }

    #[test]
    fn test_decode_address_objects_filters_ipv6() {
        let body = r#"[
            {"address": "20.191.45.212"},
            {"address": "2a01:4f8::1"},
            {"address": "40.88.21.235"}
        ]"#;
        let specs = decode(ResponseShape::AddressObjects, body).unwrap();
        assert_eq!(specs, vec!["20.191.45.212", "40.88.21.235"]);
    }

    #[test]
    fn test_decode_address_objects_wrapped() {
        let body = r#"{"addresses": [{"address": "20.191.45.212"}]}"#;
        let specs = decode(ResponseShape::AddressObjects, body).unwrap();
        assert_eq!(specs, vec!["20.191.45.212"]);
    }

    #[test]
    fn test_decode_cidr_list() {
        let body = r#"["107.20.236.150/32", "3.224.62.45/32"]"#;
        let specs = decode(ResponseShape::CidrList, body).unwrap();
        assert_eq!(specs, vec!["107.20.236.150/32", "3.224.62.45/32"]);

        let body = r#"{"prefixes": ["107.20.236.150/32"]}"#;
        assert_eq!(decode(ResponseShape::CidrList, body).unwrap().len(), 1);
    }

    #[test]
    fn test_decode_cidr_list_wrong_shape() {
        let err = decode(ResponseShape::CidrList, r#"[{"ipv4Prefix": "1.2.3.0/24"}]"#).unwrap_err();
        assert!(matches!(err, GoodBotsError::Schema(_)));
    }

    #[test]
    fn test_decode_text_or_json() {
        let text = "125.209.208.0/20\n211.249.40.0/23\n";
        assert_eq!(decode(ResponseShape::TextOrJson, text).unwrap().len(), 2);

        let json = r#"["125.209.208.0/20"]"#;
        assert_eq!(
            decode(ResponseShape::TextOrJson, json).unwrap(),
            vec!["125.209.208.0/20"]
        );

        let objects = r#"{"prefixes": [{"ipv4Prefix": "125.209.208.0/20"}]}"#;
        assert_eq!(
            decode(ResponseShape::TextOrJson, objects).unwrap(),
            vec!["125.209.208.0/20"]
        );

        assert!(decode(ResponseShape::TextOrJson, r#"{"nope": 1}"#).is_err());
    }

    #[test]
    fn test_decode_static_document() {
        let body = r#"<p>CCBot crawls from 18.97.9.168/29 and 18.97.14.80/29.</p>
            <p>Version 1.2.3.4 is not a range.</p>"#;
        let specs = decode(ResponseShape::StaticDocument, body).unwrap();
        assert_eq!(specs, vec!["18.97.9.168/29", "18.97.14.80/29"]);
    }

    #[test]
    fn test_decode_static_document_empty() {
        let err = decode(ResponseShape::StaticDocument, "nothing here").unwrap_err();
        assert!(matches!(err, GoodBotsError::Schema(_)));
    }
}
