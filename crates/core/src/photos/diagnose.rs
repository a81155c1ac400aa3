use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::scrape::SIZED_URLS;

/// Number of sample URLs reported per pattern.
const SAMPLE_LIMIT: usize = 10;

static BARE_CDN_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"https://lh3\.googleusercontent\.com/[a-zA-Z0-9_-]+").expect("valid pattern")
});

static ATTRIBUTE_URLS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r#"data-src="(https://lh3\.googleusercontent\.com/[^"]+)""#,
        r#"src="(https://lh3\.googleusercontent\.com/[^"]+)""#,
        r#"background-image:\s*url\(['"]?(https://lh3\.googleusercontent\.com/[^'"]+)['"]?\)"#,
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("valid pattern"))
    .collect()
});

static SCRIPT_WITH_PHOTOS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?s)<script[^>]*>.*?\{.*?"photos".*?\}.*?</script>"#).expect("valid pattern")
});

/// Match statistics for one URL pattern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PatternMatches {
    pub pattern: String,
    pub matches: usize,
    pub urls: Vec<String>,
}

impl PatternMatches {
    fn collect<I>(pattern: &str, found: I) -> Self
    where
        I: IntoIterator<Item = String>,
    {
        let found: Vec<String> = found.into_iter().collect();
        Self {
            pattern: pattern.to_string(),
            matches: found.len(),
            urls: found.into_iter().take(SAMPLE_LIMIT).collect(),
        }
    }
}

/// What an album page looks like to the extraction heuristics.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDiagnostics {
    pub html_length: usize,
    pub patterns: Vec<PatternMatches>,
    pub json_matches: usize,
    pub all_google_urls: usize,
}

/// CDN URLs whose id is not directly followed by a query or a size suffix.
///
/// When the id is followed by `?` or `=` the match gives up its last
/// character, mirroring a backtracking negative lookahead.
fn unsized_urls(html: &str) -> Vec<String> {
    BARE_CDN_URL
        .find_iter(html)
        .filter_map(|m| {
            let followed_by_suffix = html[m.end()..].starts_with(['?', '=']);
            if !followed_by_suffix {
                return Some(m.as_str().to_string());
            }
            let shortened = &m.as_str()[..m.as_str().len() - 1];
            shortened
                .ends_with(|c: char| c.is_ascii_alphanumeric() || c == '_' || c == '-')
                .then(|| shortened.to_string())
        })
        .collect()
}

/// Runs every URL pattern the scraper knows about against a page.
pub fn diagnose_page(html: &str) -> PageDiagnostics {
    let mut patterns: Vec<PatternMatches> = SIZED_URLS
        .iter()
        .map(|re| {
            PatternMatches::collect(
                re.as_str(),
                re.find_iter(html).map(|m| m.as_str().to_string()),
            )
        })
        .collect();

    patterns.push(PatternMatches::collect(
        r"https://lh3\.googleusercontent\.com/[a-zA-Z0-9_-]+(?!\?|=)",
        unsized_urls(html),
    ));

    patterns.extend(ATTRIBUTE_URLS.iter().map(|re| {
        PatternMatches::collect(
            re.as_str(),
            re.captures_iter(html).map(|cap| cap[0].to_string()),
        )
    }));

    PageDiagnostics {
        html_length: html.len(),
        patterns,
        json_matches: SCRIPT_WITH_PHOTOS.find_iter(html).count(),
        all_google_urls: BARE_CDN_URL.find_iter(html).count(),
    }
}
