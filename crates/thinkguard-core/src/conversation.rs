use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use std::fmt;

// ---------------------------------------------------------------------------
// Role
// ---------------------------------------------------------------------------

/// Author of a turn. Any role string we do not recognise is kept verbatim so
/// the payload re-serializes unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Assistant,
    System,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "user",
            Role::Assistant => "assistant",
            Role::System => "system",
            Role::Other(s) => s,
        }
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "user" => Role::User,
            "assistant" => Role::Assistant,
            "system" => Role::System,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// ModelRef
// ---------------------------------------------------------------------------

/// Model attached to a user turn: either a bare id (`"claude-opus-4"`) or a
/// provider-qualified object (`{"providerID": "anthropic", "modelID": "..."}`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ModelRef {
    Id(String),
    Qualified(QualifiedModel),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualifiedModel {
    #[serde(rename = "providerID", default, skip_serializing_if = "Option::is_none")]
    pub provider_id: Option<String>,
    #[serde(rename = "modelID")]
    pub model_id: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ModelRef {
    pub fn model_id(&self) -> &str {
        match self {
            ModelRef::Id(id) => id,
            ModelRef::Qualified(q) => &q.model_id,
        }
    }
}

// ---------------------------------------------------------------------------
// Content parts
// ---------------------------------------------------------------------------

/// Discriminant a thinking part was read with; kept so re-serialization
/// writes back the same `type`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThinkingKind {
    Thinking,
    Reasoning,
}

/// A reasoning block. `thinking` and `text` are both accepted because hosts
/// disagree on the field name; [`ThinkingPart::content`] reads whichever is
/// present.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThinkingPart {
    #[serde(rename = "type")]
    pub kind: ThinkingKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(rename = "sessionID", default, skip_serializing_if = "Option::is_none")]
    pub session_id: Option<String>,
    #[serde(rename = "messageID", default, skip_serializing_if = "Option::is_none")]
    pub message_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thinking: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub synthetic: bool,
    /// Fields this crate does not interpret (`signature`, timing, ...).
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

fn is_false(b: &bool) -> bool {
    !*b
}

impl ThinkingPart {
    /// First non-empty of `thinking` and `text`.
    pub fn content(&self) -> &str {
        [self.thinking.as_deref(), self.text.as_deref()]
            .into_iter()
            .flatten()
            .find(|s| !s.is_empty())
            .unwrap_or("")
    }
}

/// A part this crate never looks inside. The original JSON is kept as-is.
#[derive(Debug, Clone, PartialEq)]
pub struct RawPart(Value);

impl RawPart {
    pub fn new(value: Value) -> Self {
        RawPart(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The `type` discriminant, if the part has one.
    pub fn kind(&self) -> Option<&str> {
        self.0.get("type").and_then(Value::as_str)
    }
}

/// One unit of turn content.
///
/// The variant set is closed; anything with an unrecognised `type` lands in
/// [`ContentPart::Other`] and counts as content.
#[derive(Debug, Clone, PartialEq)]
pub enum ContentPart {
    Thinking(ThinkingPart),
    RedactedThinking(RawPart),
    Text(RawPart),
    ToolUse(RawPart),
    Other(RawPart),
}

impl ContentPart {
    pub fn is_thinking_like(&self) -> bool {
        match self {
            ContentPart::Thinking(_) | ContentPart::RedactedThinking(_) => true,
            ContentPart::Text(_) | ContentPart::ToolUse(_) | ContentPart::Other(_) => false,
        }
    }

    /// Reasoning text carried by this part. Only plain thinking parts have
    /// readable text; redacted blocks are opaque.
    pub fn thinking_text(&self) -> Option<&str> {
        match self {
            ContentPart::Thinking(p) => Some(p.content()),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &str {
        match self {
            ContentPart::Thinking(p) => match p.kind {
                ThinkingKind::Thinking => "thinking",
                ThinkingKind::Reasoning => "reasoning",
            },
            ContentPart::RedactedThinking(_) => "redacted_thinking",
            ContentPart::Text(_) => "text",
            ContentPart::ToolUse(raw) => raw.kind().unwrap_or("tool_use"),
            ContentPart::Other(raw) => raw.kind().unwrap_or("unknown"),
        }
    }
}

impl<'de> Deserialize<'de> for ContentPart {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let kind = value.get("type").and_then(Value::as_str).map(str::to_owned);
        let part = match kind.as_deref() {
            Some("thinking" | "reasoning") => {
                ContentPart::Thinking(serde_json::from_value(value).map_err(D::Error::custom)?)
            }
            Some("redacted_thinking") => ContentPart::RedactedThinking(RawPart(value)),
            Some("text") => ContentPart::Text(RawPart(value)),
            Some("tool_use" | "tool") => ContentPart::ToolUse(RawPart(value)),
            _ => ContentPart::Other(RawPart(value)),
        };
        Ok(part)
    }
}

impl Serialize for ContentPart {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ContentPart::Thinking(p) => p.serialize(serializer),
            ContentPart::RedactedThinking(raw)
            | ContentPart::Text(raw)
            | ContentPart::ToolUse(raw)
            | ContentPart::Other(raw) => raw.0.serialize(serializer),
        }
    }
}

// ---------------------------------------------------------------------------
// Message
// ---------------------------------------------------------------------------

/// One conversation turn. `role` and `parts` are required; a JSON object
/// missing either is kept as [`Turn::Unparsed`].
///
/// `id`, `sessionID` and `model` are `Option<Option<_>>`: the outer `None`
/// means the field was absent, `Some(None)` an explicit `null`, and both
/// re-serialize as they came in.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub id: Option<Option<String>>,
    #[serde(
        rename = "sessionID",
        default,
        deserialize_with = "nullable",
        skip_serializing_if = "Option::is_none"
    )]
    pub session_id: Option<Option<String>>,
    pub role: Role,
    #[serde(default, deserialize_with = "nullable", skip_serializing_if = "Option::is_none")]
    pub model: Option<Option<ModelRef>>,
    pub parts: Vec<ContentPart>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Message {
    pub fn new(role: Role, parts: Vec<ContentPart>) -> Self {
        Message {
            id: None,
            session_id: None,
            role,
            model: None,
            parts,
            extra: Map::new(),
        }
    }

    pub fn is_assistant(&self) -> bool {
        self.role == Role::Assistant
    }

    pub fn is_user(&self) -> bool {
        self.role == Role::User
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_ref()?.as_deref()
    }

    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_ref()?.as_deref()
    }

    pub fn model_id(&self) -> Option<&str> {
        self.model.as_ref()?.as_ref().map(ModelRef::model_id)
    }
}

/// A present field, `null` included, deserializes to `Some`.
fn nullable<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

// ---------------------------------------------------------------------------
// Turn / Conversation
// ---------------------------------------------------------------------------

/// A conversation entry. Entries that do not parse as a [`Message`] are
/// carried through untouched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Turn {
    Message(Message),
    Unparsed(Value),
}

impl Turn {
    pub fn as_message(&self) -> Option<&Message> {
        match self {
            Turn::Message(m) => Some(m),
            Turn::Unparsed(_) => None,
        }
    }

    /// User turns, counting malformed entries whose `role` is `"user"`.
    pub fn is_user(&self) -> bool {
        match self {
            Turn::Message(m) => m.is_user(),
            Turn::Unparsed(raw) => raw.get("role").and_then(Value::as_str) == Some("user"),
        }
    }

    /// Model id of the turn. Malformed entries are read leniently: a string
    /// `model` or an object with a string `modelID`.
    pub fn model_id(&self) -> Option<&str> {
        match self {
            Turn::Message(m) => m.model_id(),
            Turn::Unparsed(raw) => match raw.get("model")? {
                Value::String(id) => Some(id),
                Value::Object(obj) => obj.get("modelID").and_then(Value::as_str),
                _ => None,
            },
        }
    }
}

/// Ordered turns of one outbound request, oldest first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    pub fn new(turns: Vec<Turn>) -> Self {
        Conversation { turns }
    }

    pub fn from_messages(messages: impl IntoIterator<Item = Message>) -> Self {
        Conversation {
            turns: messages.into_iter().map(Turn::Message).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// The well-formed message at `index`, if any.
    pub fn message(&self, index: usize) -> Option<&Message> {
        self.turns.get(index).and_then(Turn::as_message)
    }

    pub fn message_mut(&mut self, index: usize) -> Option<&mut Message> {
        match self.turns.get_mut(index) {
            Some(Turn::Message(m)) => Some(m),
            _ => None,
        }
    }

    /// Well-formed messages with their turn index.
    pub fn messages(&self) -> impl DoubleEndedIterator<Item = (usize, &Message)> + '_ {
        self.turns
            .iter()
            .enumerate()
            .filter_map(|(i, t)| t.as_message().map(|m| (i, m)))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
