//! Diagnostics sinks for ignored filters

use std::collections::BTreeMap;

use parking_lot::Mutex;
use serde::Serialize;

use super::traits::DiagnosticsSink;

/// Emits each notice as a `tracing` event
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingDiagnostics;

impl DiagnosticsSink for TracingDiagnostics {
    fn notice(&self, kind: &str, message: &str, context: &BTreeMap<String, String>) {
        tracing::info!(kind = %kind, context = ?context, "{}", message);
    }
}

/// A notice captured by [`CollectingDiagnostics`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notice {
    pub kind: String,
    pub message: String,
    pub context: BTreeMap<String, String>,
}

/// Keeps notices in memory so callers can report them with the response
#[derive(Debug, Default)]
pub struct CollectingDiagnostics {
    notices: Mutex<Vec<Notice>>,
}

impl CollectingDiagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn notices(&self) -> Vec<Notice> {
        self.notices.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.notices.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl DiagnosticsSink for CollectingDiagnostics {
    fn notice(&self, kind: &str, message: &str, context: &BTreeMap<String, String>) {
        self.notices.lock().push(Notice {
            kind: kind.to_string(),
            message: message.to_string(),
            context: context.clone(),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collecting_keeps_order() {
        let sink = CollectingDiagnostics::new();
        assert!(sink.is_empty());

        let mut context = BTreeMap::new();
        context.insert("property".to_string(), "config.a".to_string());
        sink.notice("Invalid filter ignored", "first", &context);
        sink.notice("Invalid filter strategy", "second", &BTreeMap::new());

        let notices = sink.notices();
        assert_eq!(sink.len(), 2);
        assert_eq!(notices[0].message, "first");
        assert_eq!(notices[0].context.get("property").unwrap(), "config.a");
        assert_eq!(notices[1].kind, "Invalid filter strategy");
    }

    #[test]
    fn tracing_sink_does_not_panic() {
        TracingDiagnostics.notice("Invalid filter ignored", "msg", &BTreeMap::new());
    }
}
