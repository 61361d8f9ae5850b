// src/models/notification.rs
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::{SparrowError, SparrowResult, ValidationError};

/// Arbitrary key/value data handed through to the client application.
pub type PayloadData = Map<String, Value>;

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Web,
    Android,
    Ios,
}

/// Enabled delivery channels. All three unless the caller narrows it.
#[derive(Debug, Serialize, Clone, Copy, PartialEq, Eq)]
pub struct Platforms {
    pub web: bool,
    pub android: bool,
    pub ios: bool,
}

impl Default for Platforms {
    fn default() -> Self {
        Self::all()
    }
}

impl Platforms {
    pub fn all() -> Self {
        Self { web: true, android: true, ios: true }
    }

    pub fn none() -> Self {
        Self { web: false, android: false, ios: false }
    }

    pub fn only(platform: Platform) -> Self {
        Self::none().with(platform)
    }

    pub fn with(mut self, platform: Platform) -> Self {
        match platform {
            Platform::Web => self.web = true,
            Platform::Android => self.android = true,
            Platform::Ios => self.ios = true,
        }
        self
    }

    pub fn contains(&self, platform: Platform) -> bool {
        match platform {
            Platform::Web => self.web,
            Platform::Android => self.android,
            Platform::Ios => self.ios,
        }
    }

    pub fn is_empty(&self) -> bool {
        !(self.web || self.android || self.ios)
    }
}

/// Wire form of the platform set: `["web", "ios"]` or `{"android": false}`.
///
/// In the object form a missing key means the platform stays enabled.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum PlatformSelection {
    List(Vec<Platform>),
    Flags {
        web: Option<bool>,
        android: Option<bool>,
        ios: Option<bool>,
    },
}

impl From<PlatformSelection> for Platforms {
    fn from(selection: PlatformSelection) -> Self {
        match selection {
            PlatformSelection::List(list) => list.into_iter().fold(Platforms::none(), Platforms::with),
            PlatformSelection::Flags { web, android, ios } => Platforms {
                web: web.unwrap_or(true),
                android: android.unwrap_or(true),
                ios: ios.unwrap_or(true),
            },
        }
    }
}

impl<'de> Deserialize<'de> for Platforms {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        PlatformSelection::deserialize(deserializer).map(Platforms::from)
    }
}

/// One recipient id or many; callers may send either.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RecipientIds {
    One(String),
    Many(Vec<String>),
}

impl RecipientIds {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            RecipientIds::One(id) => vec![id],
            RecipientIds::Many(ids) => ids,
        }
    }
}

impl From<String> for RecipientIds {
    fn from(id: String) -> Self {
        RecipientIds::One(id)
    }
}

impl From<&str> for RecipientIds {
    fn from(id: &str) -> Self {
        RecipientIds::One(id.to_string())
    }
}

impl From<Vec<String>> for RecipientIds {
    fn from(ids: Vec<String>) -> Self {
        RecipientIds::Many(ids)
    }
}

impl From<&[&str]> for RecipientIds {
    fn from(ids: &[&str]) -> Self {
        RecipientIds::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// A single notification to relay, already parsed from the caller's request.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NotificationRequest {
    pub title: String,
    pub body: String,
    pub audience: Option<String>,
    /// `Some` whenever the caller supplied ids, even an empty list.
    pub recipient_ids: Option<Vec<String>>,
    pub platforms: Platforms,
    pub payload_data: PayloadData,
}

impl NotificationRequest {
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: body.into(),
            ..Default::default()
        }
    }

    pub fn with_audience(mut self, audience: impl Into<String>) -> Self {
        self.audience = Some(audience.into());
        self
    }

    pub fn with_recipients(mut self, ids: impl Into<RecipientIds>) -> Self {
        self.recipient_ids = Some(ids.into().into_vec());
        self
    }

    pub fn with_platforms(mut self, platforms: Platforms) -> Self {
        self.platforms = platforms;
        self
    }

    pub fn with_data(mut self, data: PayloadData) -> Self {
        self.payload_data = data;
        self
    }

    pub fn with_data_entry(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.payload_data.insert(key.to_string(), value.into());
        self
    }

    /// Title and body must carry text.
    pub fn validate(&self) -> SparrowResult<()> {
        let mut errors = Vec::new();
        if self.title.trim().is_empty() {
            errors.push(ValidationError {
                field: "title".to_string(),
                message: "title is required".to_string(),
            });
        }
        if self.body.trim().is_empty() {
            errors.push(ValidationError {
                field: "message".to_string(),
                message: "message is required".to_string(),
            });
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(SparrowError::ValidationFailed(errors))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_platforms_default_to_all() {
        let platforms = Platforms::default();
        assert!(platforms.web && platforms.android && platforms.ios);
        assert!(!platforms.is_empty());
    }

    #[test]
    fn test_platforms_from_list() {
        let platforms: Platforms = serde_json::from_value(json!(["web", "ios"])).unwrap();
        assert_eq!(platforms, Platforms { web: true, android: false, ios: true });

        let platforms: Platforms = serde_json::from_value(json!([])).unwrap();
        assert!(platforms.is_empty());
    }

    #[test]
    fn test_platforms_from_flags() {
        let platforms: Platforms = serde_json::from_value(json!({"android": false})).unwrap();
        assert_eq!(platforms, Platforms { web: true, android: false, ios: true });
    }

    #[test]
    fn test_unknown_platform_is_rejected() {
        let result: Result<Platforms, _> = serde_json::from_value(json!(["windows"]));
        assert!(result.is_err());
    }

    #[test]
    fn test_recipient_ids_accept_scalar_or_list() {
        let one: RecipientIds = serde_json::from_value(json!("p1")).unwrap();
        assert_eq!(one.into_vec(), vec!["p1".to_string()]);

        let many: RecipientIds = serde_json::from_value(json!(["p1", "p2"])).unwrap();
        assert_eq!(many.into_vec(), vec!["p1".to_string(), "p2".to_string()]);
    }

    #[test]
    fn test_validate_reports_every_missing_field() {
        let request = NotificationRequest::new(" ", "");
        match request.validate() {
            Err(SparrowError::ValidationFailed(errors)) => {
                let fields: Vec<_> = errors.iter().map(|e| e.field.as_str()).collect();
                assert_eq!(fields, vec!["title", "message"]);
            }
            other => panic!("Expected ValidationFailed, got {:?}", other),
        }

        assert!(NotificationRequest::new("T", "M").validate().is_ok());
    }
}
