use std::collections::HashMap;

use serde_json::Value;

/// Merges owned and shared Photos Library albums by ID (a shared entry
/// replaces an owned one with the same ID) and sorts them by title.
///
/// Albums are passed through as raw JSON; entries without an `id` are
/// dropped.
pub fn merge_library_albums(owned: Vec<Value>, shared: Vec<Value>) -> Vec<Value> {
    let mut by_id: HashMap<String, Value> = HashMap::new();

    for album in owned.into_iter().chain(shared) {
        if let Some(id) = album.get("id").and_then(Value::as_str) {
            by_id.insert(id.to_string(), album);
        }
    }

    let title = |album: &Value| {
        album
            .get("title")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_lowercase()
    };

    let mut albums: Vec<Value> = by_id.into_values().collect();
    albums.sort_by_cached_key(title);
    albums
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn shared_albums_replace_owned_ones_with_same_id() {
        let owned = vec![
            json!({"id": "a", "title": "Festival", "origin": "owned"}),
            json!({"id": "b", "title": "board meeting"}),
        ];
        let shared = vec![
            json!({"id": "a", "title": "Festival", "origin": "shared"}),
            json!({"id": "c", "title": "Award Dinner"}),
        ];

        let merged = merge_library_albums(owned, shared);

        let titles: Vec<&str> = merged.iter().map(|a| a["title"].as_str().unwrap()).collect();
        assert_eq!(titles, vec!["Award Dinner", "board meeting", "Festival"]);
        assert_eq!(merged[2]["origin"], "shared");
    }

    #[test]
    fn albums_without_id_are_dropped_and_missing_titles_sort_first() {
        let merged = merge_library_albums(
            vec![json!({"title": "No id"}), json!({"id": "x"})],
            vec![json!({"id": "y", "title": "Gala"})],
        );

        assert_eq!(merged.len(), 2);
        assert_eq!(merged[0]["id"], "x");
    }
}
