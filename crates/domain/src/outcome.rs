//! Reward/feedback envelope returned alongside a new task.

use serde::{Deserialize, Serialize};

/// Tone of the feedback shown to the player.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Sentiment {
    Positive,
    #[default]
    Neutral,
    Negative,
}

/// An object the player has acquired.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryItem {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl InventoryItem {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            image_url: None,
            description: None,
        }
    }
}

/// Produced by the backend when the previous answer changed game state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outcome {
    #[serde(default)]
    pub sentiment: Sentiment,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub subtitle: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<InventoryItem>,
}

impl Outcome {
    pub fn new(sentiment: Sentiment, title: impl Into<String>, subtitle: impl Into<String>) -> Self {
        Self {
            sentiment,
            title: title.into(),
            subtitle: subtitle.into(),
            items: Vec::new(),
        }
    }

    pub fn with_item(mut self, item: InventoryItem) -> Self {
        self.items.push(item);
        self
    }

    /// Rewarded items must be shown before the granted task is dispatched.
    pub fn requires_ack(&self) -> bool {
        !self.items.is_empty()
    }

    /// Blank title and subtitle with no items is "no visible reward".
    pub fn is_visible(&self) -> bool {
        !self.title.trim().is_empty() || !self.subtitle.trim().is_empty() || self.requires_ack()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_requires_ack_only_with_items() {
        let plain = Outcome::new(Sentiment::Positive, "Well done", "");
        assert!(!plain.requires_ack());
        assert!(plain.is_visible());

        let rewarded = plain.with_item(InventoryItem::named("Key"));
        assert!(rewarded.requires_ack());
    }

    #[test]
    fn test_blank_outcome_is_not_visible() {
        let blank = Outcome::new(Sentiment::Neutral, "  ", "");
        assert!(!blank.is_visible());
        assert!(!blank.requires_ack());
    }

    #[test]
    fn test_deserialize_with_missing_optional_fields() {
        let json = r#"{"sentiment":"Negative","title":"Oops"}"#;
        let outcome: Outcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.sentiment, Sentiment::Negative);
        assert_eq!(outcome.subtitle, "");
        assert!(outcome.items.is_empty());
    }

    #[test]
    fn test_deserialize_items() {
        let json = r#"{"sentiment":"Positive","title":"Found","subtitle":"A key","items":[{"name":"Key","image_url":"key.png"}]}"#;
        let outcome: Outcome = serde_json::from_str(json).unwrap();
        assert_eq!(outcome.items.len(), 1);
        assert_eq!(outcome.items[0].name, "Key");
        assert_eq!(outcome.items[0].image_url.as_deref(), Some("key.png"));
    }
}
