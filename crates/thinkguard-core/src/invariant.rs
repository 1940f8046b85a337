use crate::conversation::Message;

/// What the thinking-first rule needs to know about one message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MessageShape {
    /// At least one part is not thinking-like.
    pub has_content: bool,
    /// The first part exists and is thinking-like.
    pub starts_with_thinking: bool,
}

impl MessageShape {
    pub fn of(message: &Message) -> Self {
        MessageShape {
            has_content: message.parts.iter().any(|p| !p.is_thinking_like()),
            starts_with_thinking: message
                .parts
                .first()
                .is_some_and(|p| p.is_thinking_like()),
        }
    }
}

/// An assistant message under an enforcing model violates the rule when it
/// carries content but does not open with a thinking block.
pub fn is_violation(message: &Message, enforcing: bool) -> bool {
    if !enforcing || !message.is_assistant() {
        return false;
    }
    let shape = MessageShape::of(message);
    shape.has_content && !shape.starts_with_thinking
}
