//! Explicit frame loop with a cancellation token.
//!
//! Hosts call [`FrameLoop::drive`] from their display-refresh callback. The
//! token is checked before drawing and again before the next frame is
//! requested, so once it is cancelled nothing more is rendered.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use sandfield_platform::{DrawSurface, FrameScheduler};

use crate::field::FrameStats;
use crate::simulator::Simulator;

#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

#[derive(Debug, Default)]
pub struct FrameLoop {
    token: CancelToken,
    frames: u64,
    last_stats: FrameStats,
}

impl FrameLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn token(&self) -> CancelToken {
        self.token.clone()
    }

    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn last_stats(&self) -> FrameStats {
        self.last_stats
    }

    /// Render one frame unless cancelled.
    pub fn tick<S>(&mut self, sim: &mut Simulator, surface: &mut S) -> LoopControl
    where
        S: DrawSurface + ?Sized,
    {
        if self.token.is_cancelled() {
            return LoopControl::Stop;
        }
        self.last_stats = sim.frame(surface);
        self.frames += 1;
        if self.token.is_cancelled() {
            LoopControl::Stop
        } else {
            LoopControl::Continue
        }
    }

    /// [`tick`](Self::tick), then reschedule or drop the pending request.
    pub fn drive<S, F>(
        &mut self,
        sim: &mut Simulator,
        surface: &mut S,
        scheduler: &mut F,
    ) -> sandfield_platform::Result<LoopControl>
    where
        S: DrawSurface + ?Sized,
        F: FrameScheduler + ?Sized,
    {
        let control = self.tick(sim, surface);
        match control {
            LoopControl::Continue => scheduler.request_frame()?,
            LoopControl::Stop => scheduler.cancel_frame(),
        }
        Ok(control)
    }
}
