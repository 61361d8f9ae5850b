// src/services/decoration.rs
// Per-platform provider fields. A disabled platform contributes no keys at all;
// the provider treats "absent" differently from "present but false".
use serde_json::{Map, Value, json};

use crate::{
    config::DecorationConfig,
    models::notification::{Platform, Platforms},
};

pub fn web_fields(data: &Map<String, Value>, style: &DecorationConfig) -> Map<String, Value> {
    let url = data
        .get("url")
        .and_then(Value::as_str)
        .unwrap_or(style.site_url.as_str());

    let mut fields = Map::new();
    fields.insert("chrome_web_icon".into(), json!(style.web_icon));
    fields.insert("chrome_web_badge".into(), json!(style.web_badge));
    fields.insert("web_url".into(), json!(url));
    fields
}

pub fn android_fields(style: &DecorationConfig) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("android_accent_color".into(), json!(style.android_accent_color));
    fields.insert("android_led_color".into(), json!(style.android_led_color));
    fields.insert("android_visibility".into(), json!(style.android_visibility));
    fields.insert("android_group".into(), json!(style.android_group));
    fields.insert(
        "android_group_message".into(),
        json!({ "en": style.android_group_message }),
    );
    fields.insert("large_icon".into(), json!(style.android_large_icon));
    fields.insert("small_icon".into(), json!(style.android_small_icon));
    fields.insert("android_channel_id".into(), json!(style.android_channel_id));
    fields
}

pub fn ios_fields(data: &Map<String, Value>, style: &DecorationConfig) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("ios_badgeType".into(), json!(style.ios_badge_type));
    fields.insert("ios_badgeCount".into(), json!(style.ios_badge_count));
    fields.insert("ios_sound".into(), json!(style.ios_sound));
    if let Some(image) = data.get("image").and_then(Value::as_str) {
        fields.insert("ios_attachments".into(), json!({ "id1": image }));
    }
    fields
}

/// Fields sent regardless of platform selection.
pub fn global_fields(priority: u8) -> Map<String, Value> {
    let mut fields = Map::new();
    fields.insert("priority".into(), json!(priority));
    fields.insert("content_available".into(), json!(true));
    fields.insert("mutable_content".into(), json!(true));
    fields
}

/// Everything to merge into a payload for the given platform set and priority.
pub fn decorate(
    platforms: &Platforms,
    data: &Map<String, Value>,
    style: &DecorationConfig,
    priority: u8,
) -> Map<String, Value> {
    let mut fields = global_fields(priority);
    if platforms.contains(Platform::Web) {
        fields.extend(web_fields(data, style));
    }
    if platforms.contains(Platform::Android) {
        fields.extend(android_fields(style));
    }
    if platforms.contains(Platform::Ios) {
        fields.extend(ios_fields(data, style));
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    fn keys_with_prefix<'a>(fields: &'a Map<String, Value>, prefix: &str) -> Vec<&'a String> {
        fields.keys().filter(|k| k.starts_with(prefix)).collect()
    }

    #[test]
    fn test_all_platforms() {
        let fields = decorate(&Platforms::all(), &Map::new(), &DecorationConfig::default(), 5);
        assert!(fields.contains_key("chrome_web_icon"));
        assert!(fields.contains_key("android_channel_id"));
        assert!(fields.contains_key("small_icon"));
        assert!(fields.contains_key("ios_sound"));
        assert_eq!(fields["priority"], json!(5));
    }

    #[test]
    fn test_disabled_platforms_are_absent() {
        let platforms = Platforms::only(Platform::Web);
        let fields = decorate(&platforms, &Map::new(), &DecorationConfig::default(), 10);

        assert!(keys_with_prefix(&fields, "ios_").is_empty());
        assert!(keys_with_prefix(&fields, "android_").is_empty());
        assert!(!fields.contains_key("large_icon"));
        assert!(!fields.contains_key("small_icon"));
        assert!(!fields.contains_key("isAndroid"));
        assert!(!fields.contains_key("isIos"));
        assert!(fields.contains_key("web_url"));
    }

    #[test]
    fn test_no_platforms_leaves_globals() {
        let fields = decorate(&Platforms::none(), &Map::new(), &DecorationConfig::default(), 10);
        let mut keys: Vec<_> = fields.keys().cloned().collect();
        keys.sort();
        assert_eq!(keys, vec!["content_available", "mutable_content", "priority"]);
        assert_eq!(fields["content_available"], json!(true));
        assert_eq!(fields["mutable_content"], json!(true));
    }

    #[test]
    fn test_web_url_uses_data_url_or_site() {
        let style = DecorationConfig::default();
        let fields = web_fields(&Map::new(), &style);
        assert_eq!(fields["web_url"], json!(style.site_url));

        let mut data = Map::new();
        data.insert("url".into(), json!("https://sparrow.app/rides/42"));
        let fields = web_fields(&data, &style);
        assert_eq!(fields["web_url"], json!("https://sparrow.app/rides/42"));
    }

    #[test]
    fn test_ios_attachment_only_with_image() {
        let style = DecorationConfig::default();
        assert!(!ios_fields(&Map::new(), &style).contains_key("ios_attachments"));

        let mut data = Map::new();
        data.insert("image".into(), json!("https://cdn.sparrow.app/promo.png"));
        let fields = ios_fields(&data, &style);
        assert_eq!(fields["ios_attachments"], json!({"id1": "https://cdn.sparrow.app/promo.png"}));
    }
}
