use parking_lot::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// In-flight flag guarding one kind of request.
///
/// The flag can only be set through [`BusyFlag::try_acquire`], and only the
/// returned [`BusyGuard`] can clear it, on drop. A request flow that holds
/// the guard for its whole duration therefore clears the flag exactly once
/// on every exit path.
#[derive(Debug, Clone, Default)]
pub struct BusyFlag {
    busy: Arc<AtomicBool>,
}

impl BusyFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Set the flag if it is idle. Returns `None` while another guard is alive.
    pub fn try_acquire(&self) -> Option<BusyGuard> {
        self.busy
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| BusyGuard {
                busy: Arc::clone(&self.busy),
            })
    }
}

/// Releases its [`BusyFlag`] when dropped
#[derive(Debug)]
#[must_use = "dropping the guard releases the flag immediately"]
pub struct BusyGuard {
    busy: Arc<AtomicBool>,
}

impl BusyGuard {
    /// Release now rather than at end of scope
    pub fn release(self) {}
}

impl Drop for BusyGuard {
    fn drop(&mut self) {
        let was_busy = self.busy.swap(false, Ordering::AcqRel);
        debug_assert!(was_busy, "busy flag released twice");
        debug!("Released in-flight flag");
    }
}

/// A [`BusyGuard`] shared between callbacks that race to release it.
///
/// Audio streams report completion and device errors on separate callbacks;
/// whichever fires first releases the flag and the rest do nothing. The flag
/// is also released when the last clone is dropped.
#[derive(Debug, Clone)]
pub struct SharedGuard {
    guard: Arc<Mutex<Option<BusyGuard>>>,
}

impl SharedGuard {
    pub fn new(guard: BusyGuard) -> Self {
        Self {
            guard: Arc::new(Mutex::new(Some(guard))),
        }
    }

    /// Returns true for the call that actually released the flag
    pub fn release(&self) -> bool {
        self.guard.lock().take().is_some()
    }

    pub fn is_held(&self) -> bool {
        self.guard.lock().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_and_release() {
        let flag = BusyFlag::new();
        assert!(!flag.is_busy());

        let guard = flag.try_acquire().unwrap();
        assert!(flag.is_busy());

        drop(guard);
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_second_acquire_is_rejected() {
        let flag = BusyFlag::new();
        let _guard = flag.try_acquire().unwrap();
        assert!(flag.try_acquire().is_none());
        assert!(flag.clone().try_acquire().is_none());
    }

    #[test]
    fn test_released_on_early_return() {
        fn fails(flag: &BusyFlag) -> Result<(), &'static str> {
            let _guard = flag.try_acquire().ok_or("busy")?;
            Err::<(), _>("request failed")?;
            Ok(())
        }

        let flag = BusyFlag::new();
        assert!(fails(&flag).is_err());
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_released_on_panic() {
        let flag = BusyFlag::new();
        let inner = flag.clone();
        let result = std::thread::spawn(move || {
            let _guard = inner.try_acquire().unwrap();
            panic!("boom");
        })
        .join();

        assert!(result.is_err());
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_guard_moves_across_threads() {
        let flag = BusyFlag::new();
        let guard = flag.try_acquire().unwrap();
        std::thread::spawn(move || guard.release()).join().unwrap();
        assert!(!flag.is_busy());
    }

    #[test]
    fn test_shared_guard_released_once() {
        let flag = BusyFlag::new();
        let shared = SharedGuard::new(flag.try_acquire().unwrap());
        let on_error = shared.clone();

        assert!(on_error.release());
        assert!(!flag.is_busy());
        assert!(!shared.is_held());

        // The completion callback fires later and finds nothing to release
        assert!(!shared.release());
        assert!(flag.try_acquire().is_some());
    }

    #[test]
    fn test_shared_guard_released_when_last_clone_drops() {
        let flag = BusyFlag::new();
        let shared = SharedGuard::new(flag.try_acquire().unwrap());
        let other = shared.clone();

        drop(shared);
        assert!(flag.is_busy());
        drop(other);
        assert!(!flag.is_busy());
    }
}
