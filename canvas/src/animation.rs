//! Time-driven animations for zoom and rotation.
//!
//! The host calls `EditorSession::tick(now_ms)` from its frame loop with a
//! monotonic clock. Each running animation produces one `Frame` per tick with
//! an ease-out value between its start and end; the final frame lands exactly on
//! the target. At most one animation per `AnimationKind` runs at a time.

#[cfg(test)]
#[path = "animation_test.rs"]
mod animation_test;

use crate::camera::Point;
use crate::consts::{ROTATE_ANIMATION_MS, ZOOM_ANIMATION_MS};
use crate::doc::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimationKind {
    Zoom,
    Rotate,
}

/// What is being animated and between which values.
#[derive(Debug, Clone, PartialEq)]
pub enum Animation {
    /// Scale the view around a screen-space anchor.
    Zoom { anchor: Point, from: f64, to: f64 },
    /// Rotate one object, in degrees. `to` may exceed 360; writes normalize it.
    Rotate { id: ObjectId, from: f64, to: f64 },
}

impl Animation {
    #[must_use]
    pub fn kind(&self) -> AnimationKind {
        match self {
            Self::Zoom { .. } => AnimationKind::Zoom,
            Self::Rotate { .. } => AnimationKind::Rotate,
        }
    }

    /// Default duration for this kind of animation.
    #[must_use]
    pub fn duration_ms(&self) -> u64 {
        match self {
            Self::Zoom { .. } => ZOOM_ANIMATION_MS,
            Self::Rotate { .. } => ROTATE_ANIMATION_MS,
        }
    }

    fn endpoints(&self) -> (f64, f64) {
        match self {
            Self::Zoom { from, to, .. } | Self::Rotate { from, to, .. } => (*from, *to),
        }
    }
}

/// One step of a running animation.
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub animation: Animation,
    /// Interpolated value for this tick.
    pub value: f64,
    /// True on the last frame; the animation has been removed.
    pub finished: bool,
}

#[derive(Debug, Clone)]
struct Running {
    animation: Animation,
    started_ms: u64,
    duration_ms: u64,
}

/// Cubic ease-out on `t` in `[0, 1]`.
#[must_use]
pub fn ease_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    1.0 - (1.0 - t).powi(3)
}

/// Scheduler for in-flight animations.
#[derive(Debug, Clone, Default)]
pub struct Animator {
    running: Vec<Running>,
}

impl Animator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an animation starting at `now_ms`.
    ///
    /// Returns false, leaving the running one untouched, when an animation of
    /// the same kind is already in flight.
    pub fn start(&mut self, animation: Animation, now_ms: u64) -> bool {
        if self.is_running(animation.kind()) {
            tracing::debug!(kind = ?animation.kind(), "animation already in flight");
            return false;
        }
        let duration_ms = animation.duration_ms();
        self.running.push(Running { animation, started_ms: now_ms, duration_ms });
        true
    }

    #[must_use]
    pub fn is_running(&self, kind: AnimationKind) -> bool {
        self.running.iter().any(|r| r.animation.kind() == kind)
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.running.is_empty()
    }

    /// Drop every running animation without producing frames.
    pub fn cancel_all(&mut self) {
        self.running.clear();
    }

    /// Advance every animation to `now_ms`, removing the ones that finish.
    pub fn tick(&mut self, now_ms: u64) -> Vec<Frame> {
        let mut frames = Vec::with_capacity(self.running.len());
        self.running.retain(|run| {
            let elapsed = now_ms.saturating_sub(run.started_ms);
            let finished = elapsed >= run.duration_ms;
            let (from, to) = run.animation.endpoints();
            let value = if finished {
                to
            } else {
                #[allow(clippy::cast_precision_loss)]
                let t = elapsed as f64 / run.duration_ms as f64;
                from + (to - from) * ease_out(t)
            };
            frames.push(Frame { animation: run.animation.clone(), value, finished });
            !finished
        });
        frames
    }
}
