use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Condvar, Mutex};

/// Identifier of the device that raised an interrupt request.
///
/// Source 0 is reserved for the host; mapped devices are numbered from 1.
pub type SourceId = u16;

pub const HOST_SOURCE: SourceId = 0;

#[derive(Debug, Default)]
struct LineState {
    request: Option<SourceId>,
    /// Bumped on every assertion, acknowledgement and clear.
    changes: u64,
}

#[derive(Debug, Default)]
struct Shared {
    state: Mutex<LineState>,
    changed: Condvar,
}

/// The interrupt request line shared between the core and its peripherals.
///
/// Any thread may assert the line. The request stays latched until the
/// interrupt controller accepts it (or a reset clears it); a second
/// assertion before acceptance overwrites the originating source.
#[derive(Clone, Debug, Default)]
pub struct InterruptLine {
    shared: Arc<Shared>,
}

impl InterruptLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn assert_interrupt(&self, source: SourceId) {
        self.update(|state| state.request = Some(source));
        log::trace!("interrupt asserted by source {source}");
    }

    /// Latched request, if any.
    pub fn pending(&self) -> Option<SourceId> {
        self.shared.state.lock().request
    }

    pub fn is_asserted(&self) -> bool {
        self.pending().is_some()
    }

    /// Take the latched request, clearing the line.
    pub fn acknowledge(&self) -> Option<SourceId> {
        self.update(|state| state.request.take())
    }

    pub fn clear(&self) {
        self.update(|state| state.request = None);
    }

    /// Block until the line is asserted or `timeout` elapses.
    ///
    /// Returns whether a request is latched on return.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let mut state = self.shared.state.lock();
        self.shared
            .changed
            .wait_while_for(&mut state, |state| state.request.is_none(), timeout);
        state.request.is_some()
    }

    /// Block until the line changes in any way or `timeout` elapses.
    ///
    /// Returns whether a change was seen.
    pub fn wait_change(&self, timeout: Duration) -> bool {
        let mut state = self.shared.state.lock();
        let seen = state.changes;
        !self
            .shared
            .changed
            .wait_while_for(&mut state, |state| state.changes == seen, timeout)
            .timed_out()
    }

    fn update<R>(&self, f: impl FnOnce(&mut LineState) -> R) -> R {
        let mut state = self.shared.state.lock();
        let out = f(&mut state);
        state.changes = state.changes.wrapping_add(1);
        self.shared.changed.notify_all();
        out
    }
}
