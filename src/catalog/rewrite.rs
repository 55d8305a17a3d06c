//! Image link rewriting.
//!
//! # Responsibilities
//! - Point every upstream image URL at the local image proxy
//! - Recover the anime id from upstream URL paths ("…/anime/<id>/…")
//! - Preserve every other field of the upstream payload untouched

use serde_json::Value;
use url::Url;

/// Local proxy URL for a title's cover image.
pub fn image_proxy_url(base: &str, id: &str) -> String {
    format!("{}/api/image/{}.jpg", base, id)
}

/// Pull the id out of an upstream image URL: the segment following
/// `anime` in the path. Returns `None` when the URL does not parse or
/// carries no such segment.
pub fn extract_anime_id(url: &str) -> Option<String> {
    let parsed = Url::parse(url).ok()?;
    let mut segments = parsed.path_segments()?;
    while let Some(segment) = segments.next() {
        if segment == "anime" {
            return segments
                .next()
                .filter(|s| !s.is_empty())
                .map(str::to_string);
        }
    }
    None
}

/// Rewrite a search payload: each array entry gets its `image` replaced
/// with the proxied URL for its own id. Non-array payloads become an
/// empty result list.
pub fn rewrite_search_results(base: &str, data: Value) -> Value {
    let Value::Array(items) = data else {
        return Value::Array(Vec::new());
    };

    Value::Array(
        items
            .into_iter()
            .map(|mut item| {
                if let Value::Object(ref mut entry) = item {
                    if let Some(id) = entry.get("id").and_then(id_string) {
                        entry.insert(
                            "image".to_string(),
                            Value::String(image_proxy_url(base, &id)),
                        );
                    }
                }
                item
            })
            .collect(),
    )
}

/// Rewrite an info record in place: `tag`, `cover`, `background`, and
/// every `other[].image` are remapped through the image proxy. Ids are
/// extracted from the upstream URL where possible, falling back to the
/// record's own id.
pub fn rewrite_info(base: &str, info: &mut Value) {
    let Some(record) = info.as_object_mut() else {
        return;
    };
    let record_id = record.get("id").and_then(id_string).unwrap_or_default();

    for field in ["tag", "cover", "background"] {
        let Some(url) = record.get(field).and_then(Value::as_str) else {
            continue;
        };
        if url.is_empty() {
            continue;
        }
        let id = extract_anime_id(url).unwrap_or_else(|| record_id.clone());
        record.insert(field.to_string(), Value::String(image_proxy_url(base, &id)));
    }

    if let Some(Value::Array(others)) = record.get_mut("other") {
        for other in others.iter_mut() {
            let Some(entry) = other.as_object_mut() else {
                continue;
            };
            let fallback = entry
                .get("id")
                .and_then(id_string)
                .unwrap_or_else(|| record_id.clone());
            let id = entry
                .get("image")
                .and_then(Value::as_str)
                .and_then(extract_anime_id)
                .unwrap_or(fallback);
            entry.insert("image".to_string(), Value::String(image_proxy_url(base, &id)));
        }
    }
}

/// Ids arrive as strings or numbers depending on the endpoint.
fn id_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const BASE: &str = "http://localhost:3002";

    #[test]
    fn extracts_id_from_upstream_path() {
        assert_eq!(
            extract_anime_id("https://app.example.net/api/anime/11649/image.jpg"),
            Some("11649".to_string())
        );
        assert_eq!(extract_anime_id("https://app.example.net/static/logo.png"), None);
        assert_eq!(extract_anime_id("not a url"), None);
    }

    #[test]
    fn search_entries_get_proxied_images_and_keep_other_fields() {
        let data = json!([
            {"id": "42", "name": "Example", "image": "https://cdn/x.jpg", "year": 2020},
            {"id": 7, "name": "Numeric"}
        ]);

        let out = rewrite_search_results(BASE, data);
        assert_eq!(
            out[0]["image"],
            json!("http://localhost:3002/api/image/42.jpg")
        );
        assert_eq!(out[0]["year"], json!(2020));
        assert_eq!(out[1]["image"], json!("http://localhost:3002/api/image/7.jpg"));
    }

    #[test]
    fn non_array_search_payload_becomes_empty_list() {
        assert_eq!(
            rewrite_search_results(BASE, json!({"error": "nope"})),
            json!([])
        );
    }

    #[test]
    fn info_images_are_remapped_with_path_extraction() {
        let mut info = json!({
            "id": "42",
            "name": "Example",
            "cover": "https://app.example.net/api/anime/99/image.jpg",
            "tag": "https://app.example.net/broken path",
            "other": [
                {"id": "50", "image": "https://app.example.net/api/anime/51/image.jpg"},
                {"id": "60"}
            ]
        });

        rewrite_info(BASE, &mut info);

        // id recovered from the URL path
        assert_eq!(info["cover"], json!("http://localhost:3002/api/image/99.jpg"));
        // URL without an anime segment falls back to the record id
        assert_eq!(info["tag"], json!("http://localhost:3002/api/image/42.jpg"));
        assert_eq!(
            info["other"][0]["image"],
            json!("http://localhost:3002/api/image/51.jpg")
        );
        // missing image falls back to the entry id
        assert_eq!(
            info["other"][1]["image"],
            json!("http://localhost:3002/api/image/60.jpg")
        );
        // absent background stays absent
        assert!(info.get("background").is_none());
    }
}
