use std::fmt;

/// Phases of the runtime, in the only order they can occur.
#[derive(Debug, Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub enum Lifecycle {
    Uninitialized,
    /// Platform event loop exists.
    PlatformInitialized,
    /// Window and GPU device exist.
    ContextCreated,
    /// Swapchain configured for the window.
    SurfaceReady,
    /// Frames are being delivered to the app.
    Running,
    /// Quit was requested; resources are being released.
    ShuttingDown,
    Terminated,
}

impl Lifecycle {
    /// The phase that follows `self`, or `None` once terminated.
    pub fn next(self) -> Option<Lifecycle> {
        use Lifecycle::*;
        match self {
            Uninitialized => Some(PlatformInitialized),
            PlatformInitialized => Some(ContextCreated),
            ContextCreated => Some(SurfaceReady),
            SurfaceReady => Some(Running),
            Running => Some(ShuttingDown),
            ShuttingDown => Some(Terminated),
            Terminated => None,
        }
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Lifecycle::Uninitialized => "uninitialized",
            Lifecycle::PlatformInitialized => "platform initialized",
            Lifecycle::ContextCreated => "context created",
            Lifecycle::SurfaceReady => "surface ready",
            Lifecycle::Running => "running",
            Lifecycle::ShuttingDown => "shutting down",
            Lifecycle::Terminated => "terminated",
        };
        f.write_str(name)
    }
}

/// Rejected transition.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct TransitionError {
    pub from: Lifecycle,
    pub to: Lifecycle,
}

impl fmt::Display for TransitionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid lifecycle transition: {} -> {}", self.from, self.to)
    }
}

impl std::error::Error for TransitionError {}

/// Tracks the current [`Lifecycle`] phase.
///
/// Only single forward steps are accepted. [`fail`](Self::fail) is the one
/// exception: any phase may jump straight to `Terminated`.
#[derive(Debug)]
pub struct LifecycleTracker {
    phase: Lifecycle,
}

impl Default for LifecycleTracker {
    fn default() -> Self {
        Self { phase: Lifecycle::Uninitialized }
    }
}

impl LifecycleTracker {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn phase(&self) -> Lifecycle {
        self.phase
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == Lifecycle::Running
    }

    /// Moves to `to` if it is the immediate successor of the current phase.
    pub fn advance(&mut self, to: Lifecycle) -> Result<(), TransitionError> {
        let from = self.phase;
        if from.next() != Some(to) {
            log::warn!("rejected lifecycle transition {from} -> {to}");
            return Err(TransitionError { from, to });
        }
        log::debug!("lifecycle: {from} -> {to}");
        self.phase = to;
        Ok(())
    }

    /// Records a fatal failure: jumps to `Terminated` from any phase.
    pub fn fail(&mut self) {
        if self.phase != Lifecycle::Terminated {
            log::debug!("lifecycle: {} -> {} (failure)", self.phase, Lifecycle::Terminated);
            self.phase = Lifecycle::Terminated;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [Lifecycle; 7] = [
        Lifecycle::Uninitialized,
        Lifecycle::PlatformInitialized,
        Lifecycle::ContextCreated,
        Lifecycle::SurfaceReady,
        Lifecycle::Running,
        Lifecycle::ShuttingDown,
        Lifecycle::Terminated,
    ];

    #[test]
    fn walks_the_full_sequence() {
        let mut t = LifecycleTracker::new();
        for phase in &ORDER[1..] {
            t.advance(*phase).expect("linear step");
        }
        assert_eq!(t.phase(), Lifecycle::Terminated);
        assert_eq!(t.phase().next(), None);
    }

    #[test]
    fn skipping_a_phase_is_rejected() {
        let mut t = LifecycleTracker::new();
        t.advance(Lifecycle::PlatformInitialized).expect("linear step");

        let err = t.advance(Lifecycle::SurfaceReady).unwrap_err();
        assert_eq!(err.from, Lifecycle::PlatformInitialized);
        assert_eq!(err.to, Lifecycle::SurfaceReady);
        assert_eq!(t.phase(), Lifecycle::PlatformInitialized);
    }

    #[test]
    fn going_backwards_is_rejected() {
        let mut t = LifecycleTracker::new();
        for phase in &ORDER[1..=4] {
            t.advance(*phase).expect("linear step");
        }
        assert!(t.is_running());
        assert!(t.advance(Lifecycle::SurfaceReady).is_err());
        assert!(t.advance(Lifecycle::Running).is_err());
        assert!(t.is_running());
    }

    #[test]
    fn failure_jumps_to_terminated() {
        let mut t = LifecycleTracker::new();
        t.advance(Lifecycle::PlatformInitialized).expect("linear step");
        t.fail();
        assert_eq!(t.phase(), Lifecycle::Terminated);
        assert!(t.advance(Lifecycle::ContextCreated).is_err());
    }

    #[test]
    fn order_matches_successor_chain() {
        for pair in ORDER.windows(2) {
            assert_eq!(pair[0].next(), Some(pair[1]));
            assert!(pair[0] < pair[1]);
        }
    }

    #[test]
    fn transition_error_names_both_phases() {
        let e = TransitionError { from: Lifecycle::Running, to: Lifecycle::Uninitialized };
        assert_eq!(e.to_string(), "invalid lifecycle transition: running -> uninitialized");
    }
}
