use std::time::{Duration, Instant};

use winit::event_loop::ControlFlow;

/// How the event loop waits between frames.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FramePacing {
    /// Never block; redraw as fast as presentation allows.
    Poll,
    /// Block for input for at most this long, then redraw.
    WaitTimeout(Duration),
}

impl Default for FramePacing {
    fn default() -> Self {
        Self::sixty_hz()
    }
}

impl FramePacing {
    pub const fn sixty_hz() -> Self {
        Self::WaitTimeout(Duration::from_micros(16_667))
    }

    /// Whether a redraw is due at `now`.
    pub(crate) fn redraw_due(self, now: Instant, next_frame: Instant) -> bool {
        match self {
            FramePacing::Poll => true,
            FramePacing::WaitTimeout(_) => now >= next_frame,
        }
    }

    /// Deadline of the frame after one drawn at `now`.
    pub(crate) fn next_deadline(self, now: Instant) -> Instant {
        match self {
            FramePacing::Poll => now,
            FramePacing::WaitTimeout(timeout) => now + timeout,
        }
    }

    pub(crate) fn control_flow(self, next_frame: Instant) -> ControlFlow {
        match self {
            FramePacing::Poll => ControlFlow::Poll,
            FramePacing::WaitTimeout(_) => ControlFlow::WaitUntil(next_frame),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_waits_one_sixtieth_of_a_second() {
        let FramePacing::WaitTimeout(d) = FramePacing::default() else {
            panic!("expected a timed wait");
        };
        assert!((d.as_secs_f64() - 1.0 / 60.0).abs() < 1e-4);
    }

    #[test]
    fn poll_is_always_due() {
        let now = Instant::now();
        let later = now + Duration::from_secs(1);
        assert!(FramePacing::Poll.redraw_due(now, later));
        assert_eq!(FramePacing::Poll.control_flow(later), ControlFlow::Poll);
    }

    #[test]
    fn timed_wait_is_due_at_deadline() {
        let pacing = FramePacing::WaitTimeout(Duration::from_millis(10));
        let t0 = Instant::now();
        let deadline = pacing.next_deadline(t0);

        assert_eq!(deadline, t0 + Duration::from_millis(10));
        assert!(!pacing.redraw_due(t0, deadline));
        assert!(pacing.redraw_due(deadline, deadline));
        assert!(pacing.redraw_due(deadline + Duration::from_millis(1), deadline));
        assert_eq!(pacing.control_flow(deadline), ControlFlow::WaitUntil(deadline));
    }
}
