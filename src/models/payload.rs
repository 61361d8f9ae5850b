// src/models/payload.rs
use serde::Serialize;
use serde_json::{Map, Value, json};

/// Response body returned by the provider, relayed verbatim.
pub type ProviderAcknowledgement = Value;

/// Who a payload is addressed to. Exactly one form per payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Targeting {
    Segments(Vec<String>),
    Recipients(Vec<String>),
}

impl Targeting {
    pub const SEGMENT_FIELD: &'static str = "included_segments";
    pub const RECIPIENT_FIELD: &'static str = "include_player_ids";

    /// Individual deliveries are transactional and jump ahead of broadcasts.
    pub fn priority(&self) -> u8 {
        match self {
            Targeting::Segments(_) => 5,
            Targeting::Recipients(_) => 10,
        }
    }

    pub fn field_name(&self) -> &'static str {
        match self {
            Targeting::Segments(_) => Self::SEGMENT_FIELD,
            Targeting::Recipients(_) => Self::RECIPIENT_FIELD,
        }
    }

    fn values(&self) -> &[String] {
        match self {
            Targeting::Segments(v) | Targeting::Recipients(v) => v,
        }
    }
}

/// Flat JSON body sent to the provider's notification-creation endpoint.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ProviderPayload {
    fields: Map<String, Value>,
}

impl ProviderPayload {
    pub fn new(title: &str, body: &str, targeting: &Targeting, data: &Map<String, Value>) -> Self {
        let mut fields = Map::new();
        fields.insert("headings".to_string(), json!({ "en": title }));
        fields.insert("contents".to_string(), json!({ "en": body }));
        fields.insert(targeting.field_name().to_string(), json!(targeting.values()));
        fields.insert("data".to_string(), Value::Object(data.clone()));
        Self { fields }
    }

    /// Merge decoration fields. Targeting and content keys are never overwritten.
    pub fn merge(&mut self, extra: Map<String, Value>) {
        for (key, value) in extra {
            if Self::is_reserved(&key) {
                continue;
            }
            self.fields.insert(key, value);
        }
    }

    fn is_reserved(key: &str) -> bool {
        matches!(
            key,
            "headings" | "contents" | "data" | "app_id" | Targeting::SEGMENT_FIELD | Targeting::RECIPIENT_FIELD
        )
    }

    /// Stamp the provider application id; done by the gateway at submission.
    pub fn set_app_id(&mut self, app_id: &str) {
        self.fields.insert("app_id".to_string(), json!(app_id));
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.fields.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn targeting(&self) -> Option<Targeting> {
        let strings = |v: &Value| {
            v.as_array().map(|items| {
                items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect::<Vec<_>>()
            })
        };

        match (self.get(Targeting::SEGMENT_FIELD), self.get(Targeting::RECIPIENT_FIELD)) {
            (Some(segments), None) => strings(segments).map(Targeting::Segments),
            (None, Some(ids)) => strings(ids).map(Targeting::Recipients),
            _ => None,
        }
    }

    pub fn as_json(&self) -> Value {
        Value::Object(self.fields.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_payload_shape() {
        let targeting = Targeting::Segments(vec!["All".into()]);
        let payload = ProviderPayload::new("T", "M", &targeting, &Map::new());

        assert_eq!(payload.get("headings"), Some(&json!({"en": "T"})));
        assert_eq!(payload.get("contents"), Some(&json!({"en": "M"})));
        assert_eq!(payload.get("included_segments"), Some(&json!(["All"])));
        assert!(!payload.contains_key("include_player_ids"));
        assert_eq!(payload.targeting(), Some(targeting));
    }

    #[test]
    fn test_merge_cannot_override_targeting() {
        let targeting = Targeting::Recipients(vec!["p1".into()]);
        let mut payload = ProviderPayload::new("T", "M", &targeting, &Map::new());

        let mut extra = Map::new();
        extra.insert("included_segments".into(), json!(["All"]));
        extra.insert("priority".into(), json!(10));
        payload.merge(extra);

        assert!(!payload.contains_key("included_segments"));
        assert_eq!(payload.get("priority"), Some(&json!(10)));
        assert_eq!(payload.targeting(), Some(targeting));
    }

    #[test]
    fn test_priorities() {
        assert!(Targeting::Recipients(vec![]).priority() > Targeting::Segments(vec![]).priority());
    }
}
