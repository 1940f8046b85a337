//! Outbound request bodies as the CLI receives them: either a bare message
//! array or an object carrying the array under `messages`.

use crate::conversation::Conversation;
use crate::error::{GuardError, Result};
use serde_json::{Map, Value};

const MESSAGES_KEY: &str = "messages";

#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Bare(Conversation),
    /// Every field other than `messages` is carried through untouched.
    Envelope {
        conversation: Conversation,
        rest: Map<String, Value>,
    },
}

impl Payload {
    pub fn parse(input: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(input)?;
        Self::from_value(value)
    }

    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Array(_) => Ok(Payload::Bare(serde_json::from_value(value)?)),
            Value::Object(mut rest) => match rest.remove(MESSAGES_KEY) {
                Some(messages @ Value::Array(_)) => Ok(Payload::Envelope {
                    conversation: serde_json::from_value(messages)?,
                    rest,
                }),
                Some(_) => Err(GuardError::InvalidPayload(
                    "`messages` must be an array".to_string(),
                )),
                None => Err(GuardError::InvalidPayload(
                    "object payload has no `messages` field".to_string(),
                )),
            },
            _ => Err(GuardError::InvalidPayload(
                "expected a message array or an object with `messages`".to_string(),
            )),
        }
    }

    pub fn conversation(&self) -> &Conversation {
        match self {
            Payload::Bare(c) | Payload::Envelope { conversation: c, .. } => c,
        }
    }

    pub fn conversation_mut(&mut self) -> &mut Conversation {
        match self {
            Payload::Bare(c) | Payload::Envelope { conversation: c, .. } => c,
        }
    }

    pub fn to_value(&self) -> Result<Value> {
        match self {
            Payload::Bare(c) => Ok(serde_json::to_value(c)?),
            Payload::Envelope { conversation, rest } => {
                let mut obj = rest.clone();
                obj.insert(MESSAGES_KEY.to_string(), serde_json::to_value(conversation)?);
                Ok(Value::Object(obj))
            }
        }
    }

    pub fn to_json(&self, pretty: bool) -> Result<String> {
        let value = self.to_value()?;
        let out = if pretty {
            serde_json::to_string_pretty(&value)?
        } else {
            serde_json::to_string(&value)?
        };
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::enforce::enforce;
    use serde_json::json;

    #[test]
    fn parses_bare_array() {
        let p = Payload::parse(r#"[{"role": "user", "parts": []}]"#).unwrap();
        assert!(matches!(p, Payload::Bare(_)));
        assert_eq!(p.conversation().len(), 1);
    }

    #[test]
    fn envelope_keeps_other_fields() {
        let raw = json!({
            "model": "claude-opus-4-thinking",
            "max_tokens": 1024,
            "messages": [
                {"role": "user", "model": "claude-opus-4-thinking", "parts": []},
                {"role": "assistant", "parts": [{"type": "text", "text": "a"}]}
            ]
        });
        let mut p = Payload::from_value(raw).unwrap();
        assert_eq!(enforce(p.conversation_mut()).repaired(), 1);

        let out = p.to_value().unwrap();
        assert_eq!(out["max_tokens"], 1024);
        assert_eq!(out["model"], "claude-opus-4-thinking");
        assert_eq!(out["messages"][1]["parts"][0]["type"], "thinking");
        assert_eq!(out["messages"][1]["parts"][1]["text"], "a");
    }

    #[test]
    fn rejects_non_conversation_json() {
        assert!(matches!(
            Payload::parse("42").unwrap_err(),
            GuardError::InvalidPayload(_)
        ));
        assert!(matches!(
            Payload::parse(r#"{"messages": 1}"#).unwrap_err(),
            GuardError::InvalidPayload(_)
        ));
        assert!(matches!(
            Payload::parse(r#"{"prompt": "x"}"#).unwrap_err(),
            GuardError::InvalidPayload(_)
        ));
        assert!(matches!(
            Payload::parse("not json").unwrap_err(),
            GuardError::Json(_)
        ));
    }
}
