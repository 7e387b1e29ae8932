//! # Frame Phases
//!
//! A frame runs five phases in a fixed order. [`FrameCycle`] tracks where
//! the driver is and rejects any transition that skips or repeats a phase.

use crate::error::{CoreError, CoreResult};

/// One phase of the per-frame pipeline.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FramePhase {
    /// Spatial index rebuild over live and active pooled entities.
    IndexBuild,
    /// Every live entity advances by the elapsed time.
    Update,
    /// Broad-phase pass and collision dispatch.
    Collide,
    /// Queued registry additions become live.
    ApplyAdds,
    /// Queued registry removals are torn down.
    ApplyRemoves,
}

impl FramePhase {
    /// The phase that must follow this one.
    #[must_use]
    pub const fn next(self) -> Self {
        match self {
            Self::IndexBuild => Self::Update,
            Self::Update => Self::Collide,
            Self::Collide => Self::ApplyAdds,
            Self::ApplyAdds => Self::ApplyRemoves,
            Self::ApplyRemoves => Self::IndexBuild,
        }
    }
}

/// Phase tracker for the frame pipeline.
#[derive(Debug, Default)]
pub struct FrameCycle {
    current: Option<FramePhase>,
    frame: u64,
}

impl FrameCycle {
    /// Creates a cycle that has not started its first frame.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            current: None,
            frame: 0,
        }
    }

    /// Moves to `phase`.
    ///
    /// Entering [`FramePhase::IndexBuild`] after the previous frame's
    /// [`FramePhase::ApplyRemoves`] starts a new frame.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::PhaseOrder`] when `phase` does not directly
    /// follow the current phase. The current phase is left unchanged.
    pub fn enter(&mut self, phase: FramePhase) -> CoreResult<()> {
        let expected = self.current.map_or(FramePhase::IndexBuild, FramePhase::next);
        if phase != expected {
            return Err(CoreError::PhaseOrder {
                expected,
                found: phase,
            });
        }

        if phase == FramePhase::IndexBuild && self.current.is_some() {
            self.frame += 1;
        }
        self.current = Some(phase);
        Ok(())
    }

    /// Phase currently running, `None` before the first frame.
    #[inline]
    #[must_use]
    pub const fn current(&self) -> Option<FramePhase> {
        self.current
    }

    /// Zero-based number of the frame in progress.
    #[inline]
    #[must_use]
    pub const fn frame(&self) -> u64 {
        self.frame
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ORDER: [FramePhase; 5] = [
        FramePhase::IndexBuild,
        FramePhase::Update,
        FramePhase::Collide,
        FramePhase::ApplyAdds,
        FramePhase::ApplyRemoves,
    ];

    #[test]
    fn test_full_cycle_advances_frame() {
        let mut cycle = FrameCycle::new();
        for _ in 0..3 {
            for phase in ORDER {
                cycle.enter(phase).unwrap();
            }
        }
        assert_eq!(cycle.frame(), 2);
        assert_eq!(cycle.current(), Some(FramePhase::ApplyRemoves));

        cycle.enter(FramePhase::IndexBuild).unwrap();
        assert_eq!(cycle.frame(), 3);
    }

    #[test]
    fn test_skipping_a_phase_is_rejected() {
        let mut cycle = FrameCycle::new();
        cycle.enter(FramePhase::IndexBuild).unwrap();

        let err = cycle.enter(FramePhase::Collide).unwrap_err();

        assert_eq!(
            err,
            CoreError::PhaseOrder {
                expected: FramePhase::Update,
                found: FramePhase::Collide,
            }
        );
        assert_eq!(cycle.current(), Some(FramePhase::IndexBuild));
    }

    #[test]
    fn test_first_phase_must_be_index_build() {
        let mut cycle = FrameCycle::new();
        assert!(cycle.enter(FramePhase::Update).is_err());
        assert_eq!(cycle.current(), None);
    }
}
