//! Mute controller façade.
//!
//! Presents `get`/`set`/`toggle` over the default capture device's mute flag
//! and hides binding failures behind a one-way fallback latch: once any
//! native call fails, every later call in this controller's lifetime goes
//! through the external fallback command instead.

use crate::audio::AudioError;
use std::sync::Mutex;
use tracing::{debug, warn};

/// Native mute access for the default capture endpoint.
///
/// Implementations must not cache: each call reflects the endpoint that is
/// the default at the moment of the call.
pub trait MuteBackend {
    fn get_mute(&self) -> Result<bool, AudioError>;
    fn set_mute(&self, muted: bool) -> Result<(), AudioError>;
}

/// External command path used once the native backend has failed.
pub trait FallbackCommand {
    fn set_mute(&self, muted: bool) -> Result<(), AudioError>;
}

struct ControllerState {
    /// Last state the caller requested or we observed. The cache can diverge
    /// from the OS when the microphone is muted externally; `get` never
    /// re-queries (known limitation, kept intentionally).
    last_known_muted: bool,

    /// One-way latch: native -> fallback, never back.
    fallback_latched: bool,
}

/// Façade over the native binding and the fallback command.
///
/// All state lives behind a single mutex so concurrent `toggle` calls cannot
/// both compute the same "new" state from a stale cache.
pub struct MuteController {
    backend: Box<dyn MuteBackend + Send>,
    fallback: Box<dyn FallbackCommand + Send>,
    state: Mutex<ControllerState>,
}

impl MuteController {
    /// Build a controller, seeding the cache with one live query.
    ///
    /// A failed seed query counts as a binding failure: the cache defaults
    /// to unmuted and the fallback latch is set.
    pub fn new(
        backend: Box<dyn MuteBackend + Send>,
        fallback: Box<dyn FallbackCommand + Send>,
    ) -> Self {
        let (last_known_muted, fallback_latched) = match backend.get_mute() {
            Ok(muted) => (muted, false),
            Err(e) => {
                warn!("initial mute query failed, latching fallback: {e}");
                (false, true)
            }
        };

        Self {
            backend,
            fallback,
            state: Mutex::new(ControllerState {
                last_known_muted,
                fallback_latched,
            }),
        }
    }

    /// Last known mute state. Cache-only; never re-queries the device.
    pub fn get(&self) -> bool {
        self.lock().last_known_muted
    }

    /// Request a mute state. Returns whether some path reported success.
    ///
    /// The cache is updated to the requested value even when both paths
    /// fail (optimistic update; the tray reflects the user's last request).
    pub fn set(&self, muted: bool) -> bool {
        let mut state = self.lock();
        self.set_locked(&mut state, muted)
    }

    /// Invert the current state and apply it. Returns the new state.
    ///
    /// Reads the live state (bypassing the cache) while the native path is
    /// still trusted, so an externally-changed microphone toggles correctly.
    pub fn toggle(&self) -> bool {
        let mut state = self.lock();

        let current = if state.fallback_latched {
            state.last_known_muted
        } else {
            match self.backend.get_mute() {
                Ok(muted) => muted,
                Err(e) => {
                    warn!("live mute query failed, latching fallback: {e}");
                    state.fallback_latched = true;
                    state.last_known_muted
                }
            }
        };

        let target = !current;
        self.set_locked(&mut state, target);
        target
    }

    /// Whether the controller has permanently switched to the fallback path.
    pub fn fallback_latched(&self) -> bool {
        self.lock().fallback_latched
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, ControllerState> {
        // Cache and latch are plain booleans; a poisoned lock is still usable.
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// One native attempt (unless latched) and, only on its failure, exactly
    /// one fallback attempt.
    fn set_locked(&self, state: &mut ControllerState, muted: bool) -> bool {
        let succeeded = if state.fallback_latched {
            self.run_fallback(muted)
        } else {
            match self.backend.set_mute(muted) {
                Ok(()) => {
                    debug!(muted, "native mute update");
                    true
                }
                Err(e) => {
                    warn!("native mute update failed, latching fallback: {e}");
                    state.fallback_latched = true;
                    self.run_fallback(muted)
                }
            }
        };

        state.last_known_muted = muted;
        succeeded
    }

    fn run_fallback(&self, muted: bool) -> bool {
        match self.fallback.set_mute(muted) {
            Ok(()) => {
                debug!(muted, "fallback mute update");
                true
            }
            Err(e) => {
                warn!("fallback mute update failed: {e}");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::sync::Arc;

    /// Backend whose device state and failure modes are scripted. Clones
    /// share state, so a test can keep a handle after moving one into the
    /// controller.
    #[derive(Default, Clone)]
    struct FakeBackend {
        muted: Arc<AtomicBool>,
        fail_get: Arc<AtomicBool>,
        fail_set: Arc<AtomicBool>,
        set_calls: Arc<AtomicUsize>,
    }

    impl FakeBackend {
        fn healthy(muted: bool) -> Self {
            let backend = Self::default();
            backend.muted.store(muted, Ordering::SeqCst);
            backend
        }

        fn unavailable() -> Self {
            let backend = Self::default();
            backend.fail_get.store(true, Ordering::SeqCst);
            backend.fail_set.store(true, Ordering::SeqCst);
            backend
        }
    }

    impl MuteBackend for FakeBackend {
        fn get_mute(&self) -> Result<bool, AudioError> {
            if self.fail_get.load(Ordering::SeqCst) {
                return Err(AudioError::QueryFailed("simulated".into()));
            }
            Ok(self.muted.load(Ordering::SeqCst))
        }

        fn set_mute(&self, muted: bool) -> Result<(), AudioError> {
            self.set_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_set.load(Ordering::SeqCst) {
                return Err(AudioError::SetFailed("simulated".into()));
            }
            self.muted.store(muted, Ordering::SeqCst);
            Ok(())
        }
    }

    #[derive(Default, Clone)]
    struct FakeFallback {
        fail: Arc<AtomicBool>,
        calls: Arc<AtomicUsize>,
    }

    impl FakeFallback {
        fn failing() -> Self {
            let fallback = Self::default();
            fallback.fail.store(true, Ordering::SeqCst);
            fallback
        }
    }

    impl FallbackCommand for FakeFallback {
        fn set_mute(&self, _muted: bool) -> Result<(), AudioError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail.load(Ordering::SeqCst) {
                return Err(AudioError::FallbackFailed("simulated".into()));
            }
            Ok(())
        }
    }

    fn controller(backend: &FakeBackend, fallback: &FakeFallback) -> MuteController {
        MuteController::new(Box::new(backend.clone()), Box::new(fallback.clone()))
    }

    #[test]
    fn toggle_negates_state_read_by_get() {
        let ctl = controller(&FakeBackend::healthy(false), &FakeFallback::default());
        for _ in 0..4 {
            let before = ctl.get();
            assert_eq!(ctl.toggle(), !before);
        }
    }

    #[test]
    fn set_updates_cache_regardless_of_success() {
        // Healthy path.
        let ctl = controller(&FakeBackend::healthy(false), &FakeFallback::default());
        assert!(ctl.set(true));
        assert!(ctl.get());

        // Both paths fail; the cache is still optimistically updated.
        let ctl = controller(&FakeBackend::unavailable(), &FakeFallback::failing());
        assert!(!ctl.set(true));
        assert!(ctl.get());
    }

    #[test]
    fn fallback_latch_is_monotonic() {
        let backend = FakeBackend::healthy(false);
        backend.fail_set.store(true, Ordering::SeqCst);
        let fallback = FakeFallback::default();
        let ctl = controller(&backend, &fallback);

        // First set fails natively and latches.
        assert!(ctl.set(true));
        assert!(ctl.fallback_latched());
        assert_eq!(backend.set_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);

        // Subsequent calls use only the fallback, one attempt each.
        assert!(ctl.set(false));
        ctl.toggle();
        assert_eq!(backend.set_calls.load(Ordering::SeqCst), 1);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 3);
        assert!(ctl.fallback_latched());
    }

    #[test]
    fn no_device_defaults_unmuted_and_reports_failure() {
        let ctl = controller(&FakeBackend::unavailable(), &FakeFallback::failing());

        assert!(!ctl.get());
        assert!(ctl.fallback_latched());
        assert!(!ctl.set(true));

        // toggle still returns the logical new state without panicking.
        let ctl = controller(&FakeBackend::unavailable(), &FakeFallback::failing());
        assert!(ctl.toggle());
    }

    #[test]
    fn fresh_healthy_unmuted_toggles_to_muted() {
        let ctl = controller(&FakeBackend::healthy(false), &FakeFallback::default());
        assert!(ctl.toggle());
        assert!(ctl.get());
        assert!(!ctl.fallback_latched());
    }

    #[test]
    fn native_set_failure_falls_back_within_one_toggle() {
        let backend = FakeBackend::healthy(false);
        backend.fail_set.store(true, Ordering::SeqCst);
        let fallback = FakeFallback::default();
        let ctl = controller(&backend, &fallback);

        // Live read succeeds (unmuted), native set fails, fallback covers it.
        assert!(ctl.toggle());
        assert!(ctl.get());
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
        assert!(ctl.fallback_latched());
    }

    #[test]
    fn toggle_bypasses_stale_cache_while_native_is_healthy() {
        let backend = FakeBackend::healthy(false);
        let ctl = controller(&backend, &FakeFallback::default());
        assert!(!ctl.get());

        // Mute externally; the cache is now stale.
        backend.muted.store(true, Ordering::SeqCst);
        assert!(!ctl.get());

        // toggle reads the live state, so it unmutes rather than muting twice.
        assert!(!ctl.toggle());
        assert!(!ctl.get());
    }

    #[test]
    fn seed_query_failure_latches_and_defaults_unmuted() {
        let backend = FakeBackend::healthy(true);
        backend.fail_get.store(true, Ordering::SeqCst);
        let fallback = FakeFallback::default();
        let ctl = controller(&backend, &fallback);

        assert!(!ctl.get());
        assert!(ctl.fallback_latched());

        // Latched controllers never touch the native path again.
        assert!(ctl.set(true));
        assert_eq!(backend.set_calls.load(Ordering::SeqCst), 0);
        assert_eq!(fallback.calls.load(Ordering::SeqCst), 1);
    }
}
