//! In-memory audit log of committed events.

use combat_core::{CombatEvent, DigestError, EventKind, EventSink, Tick, compute_events_root};

/// In-memory event log for tests and local sessions.
///
/// Not persistent across process restarts. Events keep emission order.
#[derive(Clone, Debug, Default)]
pub struct InMemoryEventLog {
    session_id: String,
    events: Vec<CombatEvent>,
}

impl InMemoryEventLog {
    /// Create a new empty in-memory event log.
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            events: Vec::new(),
        }
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn events(&self) -> &[CombatEvent] {
        &self.events
    }

    /// Events recorded during `tick`.
    pub fn at_tick(&self, tick: Tick) -> impl Iterator<Item = &CombatEvent> {
        self.events.iter().filter(move |event| event.tick == tick)
    }

    pub fn count_of(&self, kind: EventKind) -> usize {
        self.events.iter().filter(|event| event.kind == kind).count()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// SHA-256 digest of the whole log, hex encoded.
    pub fn digest(&self) -> Result<String, DigestError> {
        compute_events_root(&self.events).map(hex::encode)
    }

    /// One JSON object per line, in log order.
    pub fn to_json_lines(&self) -> serde_json::Result<String> {
        let mut out = String::new();
        for event in &self.events {
            out.push_str(&serde_json::to_string(event)?);
            out.push('\n');
        }
        Ok(out)
    }
}

impl EventSink for InMemoryEventLog {
    fn record(&mut self, event: CombatEvent) {
        self.events.push(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use combat_core::CombatantId;

    fn log_with(kinds: &[EventKind]) -> InMemoryEventLog {
        let mut log = InMemoryEventLog::new("test");
        log.record_all(
            kinds
                .iter()
                .map(|&kind| CombatEvent::new(Tick(1), kind, CombatantId(2))),
        );
        log
    }

    #[test]
    fn digest_depends_on_order() {
        let a = log_with(&[EventKind::Wake, EventKind::Taunt]);
        let b = log_with(&[EventKind::Taunt, EventKind::Wake]);
        let digest = a.digest().unwrap();
        assert_eq!(digest, log_with(&[EventKind::Wake, EventKind::Taunt]).digest().unwrap());
        assert_ne!(digest, b.digest().unwrap());
        assert_eq!(digest.len(), 64);
    }

    #[test]
    fn json_lines_has_one_line_per_event() {
        let log = log_with(&[EventKind::Gate, EventKind::Idle, EventKind::Emote]);
        let json = log.to_json_lines().unwrap();
        assert_eq!(json.lines().count(), 3);
        assert!(json.lines().all(|line| line.starts_with('{')));
    }
}
