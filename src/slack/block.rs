use std::collections::HashMap;

use serde_json::{json, Value};

pub const MUSIC_PROMPT: &str = include_str!("../blocks/music.block.json");

/// A Block Kit document built from a JSON template with `{{key}}` holes.
#[derive(Debug, Clone, Default)]
pub struct SlackBlock {
    pub data: String,
}

impl SlackBlock {
    pub fn new(template: &str) -> Self {
        Self {
            data: template.to_string(),
        }
    }

    /// Substitutes each `{{key}}` with its value verbatim. Values land in the
    /// JSON text as-is, so string values must already be JSON-safe.
    pub fn fill(&mut self, args: HashMap<&str, String>) -> &mut Self {
        args.iter().for_each(|arg| {
            let key = format!("{{{{{}}}}}", arg.0);

            self.data = self.data.replace(&key, arg.1);
        });

        self
    }

    /// Parses the filled template and returns its `blocks` array.
    pub fn blocks(&self) -> Result<Vec<Value>, serde_json::Error> {
        let mut data: Value = serde_json::from_str(&self.data)?;
        let blocks = data.get_mut("blocks").map(Value::take).unwrap_or_default();
        serde_json::from_value(blocks)
    }
}

/// A single `mrkdwn` section block.
pub fn section(text: &str) -> Value {
    json!({
        "type": "section",
        "text": { "type": "mrkdwn", "text": text }
    })
}

/// A static-select option showing `icon` with `value` as its description.
pub fn option(value: &str, icon: &str) -> Value {
    json!({
        "text": { "type": "plain_text", "text": icon, "emoji": true },
        "value": value,
        "description": { "type": "plain_text", "text": value }
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_should_fill_music_prompt() {
        let mut template = HashMap::new();
        template.insert("block_id", "select-version".to_string());
        template.insert(
            "options",
            Value::Array(vec![option("rock", ":headphones:")]).to_string(),
        );

        let mut block = SlackBlock::new(MUSIC_PROMPT);
        let blocks = block.fill(template).blocks().unwrap();

        assert_eq!(blocks.len(), 2);
        assert_eq!(blocks[0]["type"], "section");
        assert_eq!(blocks[1]["block_id"], "select-version");
        assert_eq!(blocks[1]["elements"][0]["type"], "static_select");
        assert_eq!(blocks[1]["elements"][0]["options"][0]["value"], "rock");
    }

    #[test]
    fn test_should_fail_on_unfilled_template() {
        assert!(SlackBlock::new(MUSIC_PROMPT).blocks().is_err());
    }

    #[test]
    fn test_should_build_mrkdwn_section() {
        let block = section("*hi*");
        assert_eq!(block["text"]["type"], "mrkdwn");
        assert_eq!(block["text"]["text"], "*hi*");
    }
}
