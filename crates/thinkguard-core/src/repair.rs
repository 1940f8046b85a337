use crate::conversation::{ContentPart, Message, ThinkingKind, ThinkingPart};
use serde_json::Map;
use uuid::Uuid;

/// Every inserted part gets an id starting with this prefix.
pub const SYNTHETIC_ID_PREFIX: &str = "prt_synthetic_";

/// Content used when no earlier reasoning can be reused.
pub const DEFAULT_PLACEHOLDER: &str = "Continuing from the previous step.";

pub fn is_synthetic_id(id: &str) -> bool {
    id.starts_with(SYNTHETIC_ID_PREFIX)
}

/// Build a synthetic thinking part owned by `message`.
pub fn synthetic_part(message: &Message, content: impl Into<String>) -> ThinkingPart {
    ThinkingPart {
        kind: ThinkingKind::Thinking,
        id: Some(format!("{SYNTHETIC_ID_PREFIX}{}", Uuid::new_v4().simple())),
        session_id: message.session_id().map(str::to_owned),
        message_id: message.id().map(str::to_owned),
        thinking: Some(content.into()),
        text: None,
        synthetic: true,
        extra: Map::new(),
    }
}

/// Prepend a synthetic thinking part carrying `content`. Existing parts keep
/// their order and contents.
pub fn repair(message: &mut Message, content: impl Into<String>) {
    let part = synthetic_part(message, content);
    message.parts.insert(0, ContentPart::Thinking(part));
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn message() -> Message {
        serde_json::from_value(json!({
            "id": "msg_2",
            "sessionID": "ses_1",
            "role": "assistant",
            "parts": [
                {"type": "text", "text": "hello"},
                {"type": "tool_use", "id": "tu_1", "name": "Read", "input": {}}
            ]
        }))
        .unwrap()
    }

    #[test]
    fn repair_prepends_marked_part() {
        let mut msg = message();
        let before = msg.parts.clone();
        repair(&mut msg, "reasoning A");

        assert_eq!(msg.parts.len(), 3);
        assert_eq!(&msg.parts[1..], &before[..]);

        let ContentPart::Thinking(p) = &msg.parts[0] else {
            panic!("expected thinking part first")
        };
        assert!(p.synthetic);
        assert_eq!(p.content(), "reasoning A");
        assert_eq!(p.session_id.as_deref(), Some("ses_1"));
        assert_eq!(p.message_id.as_deref(), Some("msg_2"));
        assert!(is_synthetic_id(p.id.as_deref().unwrap()));
    }

    #[test]
    fn synthetic_part_serializes_with_marker() {
        let msg = message();
        let part = ContentPart::Thinking(synthetic_part(&msg, DEFAULT_PLACEHOLDER));
        let value = serde_json::to_value(&part).unwrap();
        assert_eq!(value["type"], "thinking");
        assert_eq!(value["synthetic"], true);
        assert_eq!(value["thinking"], DEFAULT_PLACEHOLDER);
        assert_eq!(value["sessionID"], "ses_1");
        assert_eq!(value["messageID"], "msg_2");
        assert!(value.get("text").is_none());
    }

    #[test]
    fn synthetic_ids_are_unique() {
        let msg = message();
        let a = synthetic_part(&msg, "x").id.unwrap();
        let b = synthetic_part(&msg, "x").id.unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn repair_without_ids_leaves_them_absent() {
        let mut msg: Message =
            serde_json::from_value(json!({"role": "assistant", "parts": [{"type": "text", "text": "x"}]}))
                .unwrap();
        repair(&mut msg, "x");
        let ContentPart::Thinking(p) = &msg.parts[0] else {
            panic!("expected thinking part first")
        };
        assert!(p.session_id.is_none());
        assert!(p.message_id.is_none());
    }

    #[test]
    fn repair_keeps_explicit_null_ids() {
        let raw = json!({"id": null, "sessionID": null, "role": "assistant", "parts": [{"type": "text", "text": "x"}]});
        let mut msg: Message = serde_json::from_value(raw).unwrap();
        repair(&mut msg, "x");

        let value = serde_json::to_value(&msg).unwrap();
        assert_eq!(value["id"], serde_json::Value::Null);
        assert!(value.as_object().unwrap().contains_key("id"));
        assert!(value.as_object().unwrap().contains_key("sessionID"));
        assert!(value["parts"][0].get("messageID").is_none());
    }
}
