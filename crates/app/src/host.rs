use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use solido_core::TexturePayload;

/// Requests coming from outside the egui frame (the web handle, the
/// native side panel) and applied at the start of the next frame.
#[derive(Debug, Clone)]
pub enum HostMessage {
    SetShape(String),
    SetTexture(TexturePayload),
    ClearTexture,
    Stop,
}

#[derive(Debug, Clone, Default)]
pub struct HostInbox {
    messages: Arc<Mutex<VecDeque<HostMessage>>>,
}

impl HostInbox {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&self, message: HostMessage) {
        match self.messages.lock() {
            Ok(mut messages) => messages.push_back(message),
            Err(_) => tracing::warn!("host inbox poisoned; dropping {:?}", message),
        }
    }

    pub fn drain(&self) -> Vec<HostMessage> {
        self.messages
            .lock()
            .map(|mut messages| messages.drain(..).collect())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drain_keeps_arrival_order() {
        let inbox = HostInbox::new();
        let shared = inbox.clone();
        shared.push(HostMessage::SetShape("sphere".to_string()));
        shared.push(HostMessage::ClearTexture);
        shared.push(HostMessage::Stop);

        let drained = inbox.drain();
        assert_eq!(drained.len(), 3);
        assert!(matches!(&drained[0], HostMessage::SetShape(tag) if tag == "sphere"));
        assert!(matches!(drained[2], HostMessage::Stop));
        assert!(inbox.drain().is_empty());
    }
}
