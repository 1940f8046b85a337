use crate::conversation::Conversation;

/// Reasoning text to reuse for a repair at `index`.
///
/// Walks strictly backward from `index - 1` over assistant messages only and
/// returns the first non-empty thinking text of the most recent one that has
/// any. User, system and unparsed turns are skipped. Returns `""` when nothing
/// earlier qualifies.
pub fn reusable_thinking(conversation: &Conversation, index: usize) -> &str {
    reusable_thinking_at(conversation, index)
        .map(|(_, text)| text)
        .unwrap_or("")
}

/// [`reusable_thinking`] together with the turn index the text came from.
pub fn reusable_thinking_at(conversation: &Conversation, index: usize) -> Option<(usize, &str)> {
    conversation
        .messages()
        .rev()
        .skip_while(|(i, _)| *i >= index)
        .filter(|(_, m)| m.is_assistant())
        .find_map(|(i, m)| {
            m.parts
                .iter()
                .filter_map(|p| p.thinking_text())
                .find(|text| !text.is_empty())
                .map(|text| (i, text))
        })
}
