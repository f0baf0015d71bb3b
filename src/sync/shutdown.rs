use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Condvar, Mutex};
use std::time::Instant;

/// Process-wide set-once stop request, observed cooperatively.
///
/// The flag is paired with a condition variable so the drain loop's pacing
/// wait can be cut short the moment shutdown is requested, instead of
/// sleeping out its full interval. The condvar's mutex never guards buffer
/// state; the spin lock does that.
#[derive(Debug, Default)]
pub struct ShutdownSignal {
    requested: AtomicBool,
    gate: Mutex<()>,
    wake: Condvar,
}

impl ShutdownSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests shutdown. Returns `true` on the first request.
    pub fn request(&self) -> bool {
        let first = !self.requested.swap(true, Ordering::SeqCst);
        if first {
            let _guard = self.gate.lock().unwrap();
            self.wake.notify_all();
        }
        first
    }

    pub fn is_requested(&self) -> bool {
        self.requested.load(Ordering::SeqCst)
    }

    /// Parks the caller until `deadline` passes or shutdown is requested,
    /// whichever comes first. Returns `true` if shutdown was observed.
    pub fn wait_until(&self, deadline: Instant) -> bool {
        let mut guard = self.gate.lock().unwrap();
        loop {
            if self.is_requested() {
                return true;
            }
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (next, _timeout) = self.wake.wait_timeout(guard, deadline - now).unwrap();
            guard = next;
        }
    }
}
