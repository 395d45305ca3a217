use serde::{Deserialize, Serialize};

use crate::message::{Message, MessageId};

/// The visible message list of the mounted chat. It is only ever rebuilt
/// wholesale, never patched message by message.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn contains(&self, id: &MessageId) -> bool {
        self.messages.iter().any(|m| &m.id == id)
    }

    pub fn replace(&mut self, messages: Vec<Message>) {
        self.messages = messages;
    }

    /// Appends a system notice, dropping any earlier notice with the same id.
    pub fn announce(&mut self, notice: Message) {
        self.messages.retain(|m| !(m.system && m.id == notice.id));
        self.messages.push(notice);
    }

    /// Messages eligible for the local mirror.
    pub fn persistable(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter().filter(|m| !m.system)
    }

    pub fn clear(&mut self) {
        self.messages.clear();
    }
}
