use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use serde_json::{Map, Value};

use crate::albums::{Photo, DEFAULT_PHOTO_HEIGHT, DEFAULT_PHOTO_WIDTH};

/// Prefix of every Google Photos CDN image URL.
pub const CDN_PREFIX: &str = "https://lh3.googleusercontent.com/";

/// Size suffixes appended to a base URL.
pub const THUMBNAIL_SIZE: &str = "=w300-h300-c";
pub const VIEWER_SIZE: &str = "=w1200-h800-c";

/// The sized-URL pass only runs while fewer photos than this were found.
pub const SIZED_URL_PASS_LIMIT: usize = 100;

/// Profile pictures of album contributors use this size.
const AVATAR_MARKER: &str = "=s32-p-no";

/// Candidate `{` positions tried per embedded JSON key occurrence.
const MAX_JSON_CANDIDATES: usize = 32;

static IMG_SRC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<img[^>]*?src=["'](https://lh3\.googleusercontent\.com/[^"']+)["'][^>]*>"#)
        .expect("img pattern is valid")
});

static SCRIPT_BLOCK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?is)<script[^>]*>(.*?)</script>").expect("script pattern is valid")
});

pub(super) static SIZED_URLS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"https://lh3\.googleusercontent\.com/(?:pw/)?[a-zA-Z0-9_-]+=w\d+-h\d+-c",
        r"https://lh3\.googleusercontent\.com/(?:pw/)?[a-zA-Z0-9_-]+=w\d+-h\d+-no",
        r"https://lh3\.googleusercontent\.com/(?:pw/)?[a-zA-Z0-9_-]+=s\d+-p-no",
        r"https://lh3\.googleusercontent\.com/(?:pw/)?[a-zA-Z0-9_-]+=s\d+-no",
    ]
    .into_iter()
    .map(|p| Regex::new(p).expect("sized url pattern is valid"))
    .collect()
});

/// Result of scraping one album page.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapeReport {
    /// Unique photos in discovery order.
    pub photos: Vec<Photo>,
    /// Album size announced by the page, if any. Albums load lazily, so this
    /// is often larger than `photos.len()`.
    pub reported_total: Option<u64>,
    /// Photos contributed by `<img>` tags.
    pub from_img_tags: usize,
    /// Photos contributed by embedded script JSON.
    pub from_script_json: usize,
    /// Photos contributed by sized URLs anywhere in the page.
    pub from_sized_urls: usize,
}

impl ScrapeReport {
    /// Whether the page announced more photos than were extracted.
    pub fn is_partial(&self) -> bool {
        self.reported_total
            .is_some_and(|total| (self.photos.len() as u64) < total)
    }
}

/// Strips the size suffix, query and fragment from a CDN URL.
///
/// Returns `None` for anything that is not a CDN URL with a path.
pub fn canonical_base_url(url: &str) -> Option<String> {
    let path = url.strip_prefix(CDN_PREFIX)?;
    let path = path.split(['?', '#']).next().unwrap_or_default();

    let (dir, last) = match path.rfind('/') {
        Some(idx) => path.split_at(idx + 1),
        None => ("", path),
    };
    let last = last.split('=').next().unwrap_or_default();
    if last.is_empty() {
        return None;
    }

    Some(format!("{CDN_PREFIX}{dir}{last}"))
}

/// Accumulates unique photos keyed by canonical base URL.
struct PhotoCollector<'a> {
    album_id: &'a str,
    stamp: i64,
    seen: HashSet<String>,
    photos: Vec<Photo>,
}

impl<'a> PhotoCollector<'a> {
    fn new(album_id: &'a str, stamp: i64) -> Self {
        Self {
            album_id,
            stamp,
            seen: HashSet::new(),
            photos: Vec::new(),
        }
    }

    fn len(&self) -> usize {
        self.photos.len()
    }

    /// Adds the photo behind `url` unless it is an avatar or already known.
    fn push(&mut self, url: &str, width: Option<u32>, height: Option<u32>) -> bool {
        if url.contains(AVATAR_MARKER) {
            return false;
        }
        let Some(base) = canonical_base_url(url) else {
            return false;
        };
        if !self.seen.insert(base.clone()) {
            return false;
        }

        self.photos.push(Photo {
            id: format!("photo_{}_{}", self.stamp, self.photos.len()),
            title: None,
            description: None,
            url: format!("{base}{VIEWER_SIZE}"),
            thumbnail_url: Some(format!("{base}{THUMBNAIL_SIZE}")),
            width: Some(width.unwrap_or(DEFAULT_PHOTO_WIDTH)),
            height: Some(height.unwrap_or(DEFAULT_PHOTO_HEIGHT)),
            album_id: self.album_id.to_string(),
        });
        true
    }
}

pub(super) fn script_bodies(html: &str) -> Vec<&str> {
    SCRIPT_BLOCK
        .captures_iter(html)
        .filter_map(|cap| cap.get(1).map(|m| m.as_str()))
        .collect()
}

/// Finds JSON objects inside a script body that have `key` at top level.
///
/// For every occurrence of `"key"` the nearest preceding `{` positions are
/// tried in turn until one parses as an object holding the key.
pub(super) fn embedded_objects(script: &str, key: &str) -> Vec<Map<String, Value>> {
    let needle = format!("\"{key}\"");
    let mut found = Vec::new();
    let mut consumed_until = 0;

    for (key_pos, _) in script.match_indices(&needle) {
        if key_pos < consumed_until {
            continue;
        }

        let candidates = script[..key_pos]
            .rmatch_indices('{')
            .take(MAX_JSON_CANDIDATES);
        for (start, _) in candidates {
            if start < consumed_until {
                break;
            }
            let mut stream =
                serde_json::Deserializer::from_str(&script[start..]).into_iter::<Value>();
            if let Some(Ok(Value::Object(map))) = stream.next() {
                if map.contains_key(key) {
                    consumed_until = start + stream.byte_offset();
                    found.push(map);
                    break;
                }
            }
        }
    }

    found
}

fn as_count(value: Option<&Value>) -> Option<u64> {
    match value? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
    .filter(|n| *n > 0)
}

fn as_dimension(value: Option<&Value>) -> Option<u32> {
    as_count(value).and_then(|n| u32::try_from(n).ok())
}

/// Total announced by a `"photos"` object, from album metadata or pagination.
fn announced_total(object: &Map<String, Value>) -> Option<u64> {
    let pagination = as_count(object.get("pagination").and_then(|p| p.get("totalItems")));
    let album = as_count(object.get("album").and_then(|a| a.get("mediaItemsCount")));
    pagination.or(album)
}

/// Extracts photos from a shared album page.
///
/// Passes, in order:
/// 1. `<img>` tags pointing at `/pw/` CDN URLs;
/// 2. JSON objects with a `"photos"` array embedded in `<script>` blocks,
///    which may also announce the album size;
/// 3. script JSON carrying `"mediaItemsCount"`, when no size is known yet;
/// 4. sized CDN URLs anywhere in the page, while fewer than
///    [`SIZED_URL_PASS_LIMIT`] photos were found.
///
/// The sweep in pass 4 is not gated on a known total: it runs when the page
/// announces no size at all, and stops only once the announced size is
/// reached. The `mediaItemsCount` lookup runs before the sweep, so a count
/// found there can already satisfy the page and skip it.
///
/// Avatars are skipped and photos are deduplicated across passes by their
/// canonical base URL. Photo IDs are `photo_<stamp>_<index>`.
pub fn extract_photos(html: &str, album_id: &str, stamp: i64) -> ScrapeReport {
    let mut collector = PhotoCollector::new(album_id, stamp);

    for cap in IMG_SRC.captures_iter(html) {
        let url = &cap[1];
        if !url.contains("/pw/") {
            tracing::trace!(url, "Skipping img without photo id");
            continue;
        }
        collector.push(url, None, None);
    }
    let from_img_tags = collector.len();

    let scripts = script_bodies(html);
    let mut reported_total = None;

    for object in scripts.iter().flat_map(|s| embedded_objects(s, "photos")) {
        if let Some(total) = announced_total(&object) {
            reported_total = Some(total);
        }
        let Some(Value::Array(entries)) = object.get("photos") else {
            continue;
        };
        for entry in entries {
            let Some(url) = entry.get("url").and_then(Value::as_str) else {
                continue;
            };
            if url.starts_with(CDN_PREFIX) {
                collector.push(
                    url,
                    as_dimension(entry.get("width")),
                    as_dimension(entry.get("height")),
                );
            }
        }
    }
    let from_script_json = collector.len() - from_img_tags;

    if reported_total.is_none() {
        reported_total = scripts
            .iter()
            .flat_map(|s| embedded_objects(s, "mediaItemsCount"))
            .filter_map(|object| as_count(object.get("mediaItemsCount")))
            .last();
    }

    let wants_more = collector.len() < SIZED_URL_PASS_LIMIT
        && reported_total.is_none_or(|total| (collector.len() as u64) < total);
    if wants_more {
        for pattern in SIZED_URLS.iter() {
            for found in pattern.find_iter(html) {
                collector.push(found.as_str(), None, None);
            }
        }
    }
    let from_sized_urls = collector.len() - from_img_tags - from_script_json;

    ScrapeReport {
        photos: collector.photos,
        reported_total,
        from_img_tags,
        from_script_json,
        from_sized_urls,
    }
}
