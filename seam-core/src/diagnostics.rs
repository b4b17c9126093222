//! Listener registry for diagnostic notifications and the relay that forwards
//! them from backing sources to the facade.
//!
//! Every [`DiagnosticHub`] keeps one listener list per [`DiagnosticKind`].
//! Emitting a notification calls the listeners registered for its kind in
//! registration order, on the emitting thread.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::types::{Diagnostic, DiagnosticContext, DiagnosticKind};

/// Callback invoked for every notification of the kind it was registered for.
pub type Listener = Arc<dyn Fn(&Diagnostic) + Send + Sync>;

/// Handle returned by [`DiagnosticHub::subscribe`], used to remove the listener.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId {
    kind: DiagnosticKind,
    seq: u64,
}

impl ListenerId {
    /// Kind the listener was registered for.
    #[must_use]
    pub const fn kind(self) -> DiagnosticKind {
        self.kind
    }
}

type Registry = [Vec<(u64, Listener)>; DiagnosticKind::ALL.len()];

/// Explicit per-kind listener registry.
#[derive(Default)]
pub struct DiagnosticHub {
    listeners: RwLock<Registry>,
    next_seq: AtomicU64,
}

impl fmt::Debug for DiagnosticHub {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut dbg = f.debug_struct("DiagnosticHub");
        for kind in DiagnosticKind::ALL {
            dbg.field(kind.as_str(), &self.listener_count(kind));
        }
        dbg.finish()
    }
}

impl DiagnosticHub {
    /// Hub with no listeners.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `listener` for notifications of `kind`.
    pub fn subscribe<F>(&self, kind: DiagnosticKind, listener: F) -> ListenerId
    where
        F: Fn(&Diagnostic) + Send + Sync + 'static,
    {
        let seq = self.next_seq.fetch_add(1, Ordering::Relaxed);
        let mut registry = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        registry[kind.index()].push((seq, Arc::new(listener)));
        ListenerId { kind, seq }
    }

    /// Remove a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&self, id: ListenerId) -> bool {
        let mut registry = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let list = &mut registry[id.kind.index()];
        let before = list.len();
        list.retain(|(seq, _)| *seq != id.seq);
        list.len() != before
    }

    /// Number of listeners registered for `kind`.
    #[must_use]
    pub fn listener_count(&self, kind: DiagnosticKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)[kind.index()]
        .len()
    }

    /// Deliver `diagnostic` to every listener of its kind.
    pub fn emit(&self, diagnostic: &Diagnostic) {
        // Snapshot so listeners may subscribe or emit without deadlocking.
        let targets: Vec<Listener> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)[diagnostic.kind().index()]
        .iter()
        .map(|(_, l)| Arc::clone(l))
        .collect();

        #[cfg(feature = "tracing")]
        tracing::debug!(
            kind = %diagnostic.kind(),
            source = %diagnostic.context().source,
            listeners = targets.len(),
            "diagnostic emitted"
        );

        for listener in targets {
            listener(diagnostic);
        }
    }

    /// Build and emit a notification of `kind`.
    pub fn raise(&self, kind: DiagnosticKind, context: DiagnosticContext) {
        self.emit(&Diagnostic::new(kind, context));
    }
}

/// Forward every kind of notification raised on `from` to `to`, unchanged.
///
/// Returns the listener ids registered on `from`, one per kind.
pub fn relay(from: &DiagnosticHub, to: &Arc<DiagnosticHub>) -> Vec<ListenerId> {
    DiagnosticKind::ALL
        .iter()
        .map(|&kind| {
            let sink = Arc::clone(to);
            from.subscribe(kind, move |d| sink.emit(d))
        })
        .collect()
}
