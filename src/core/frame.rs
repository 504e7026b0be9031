//! Frame scheduler: the single per-frame tick driver.
//!
//! Callbacks are registered against a [`Phase`] and run once per frame in
//! phase order (`Scroll` → `Trigger` → `Render`), then in registration order
//! within a phase.  A callback stays scheduled for as long as it returns
//! [`ControlFlow::Continue`]; returning `Break` retires it, which is how
//! animations go idle once they come to rest.
//!
//! The scheduler is generic over the context handed to callbacks so that it
//! never owns the state it drives.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::ops::ControlFlow;

/// Ordering bucket for a frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Phase {
    /// Scroll integration and publication of the new offset.
    Scroll,
    /// Scroll-linked trigger re-evaluation.
    Trigger,
    /// Visual writes (choreography, springs).
    Render,
}

/// Handle for a pending frame callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameId(u64);

/// Timing information passed to every callback of a frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTick {
    /// Monotonic frame counter, starting at 1 for the first frame run.
    pub frame: u64,
    /// Seconds since the previous frame.
    pub dt: f64,
    /// Seconds since the scheduler was created (sum of all `dt`).
    pub elapsed: f64,
}

type Callback<C> = Box<dyn FnMut(&mut C, FrameTick) -> ControlFlow<()>>;

/// Per-frame callback driver.
pub struct FrameScheduler<C> {
    next_id: u64,
    frame: u64,
    elapsed: f64,
    /// Keyed by `(phase, id)` so iteration order is the run order.
    entries: BTreeMap<(Phase, FrameId), Callback<C>>,
    /// Reverse index used by `cancel` / `is_pending`.
    phases: HashMap<FrameId, Phase>,
}

impl<C> Default for FrameScheduler<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> fmt::Debug for FrameScheduler<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FrameScheduler")
            .field("frame", &self.frame)
            .field("pending", &self.entries.len())
            .finish()
    }
}

impl<C> FrameScheduler<C> {
    pub fn new() -> Self {
        Self {
            next_id: 1,
            frame: 0,
            elapsed: 0.0,
            entries: BTreeMap::new(),
            phases: HashMap::new(),
        }
    }

    /// Schedule `callback` to run on every frame until it breaks or is
    /// cancelled.
    pub fn request<F>(&mut self, phase: Phase, callback: F) -> FrameId
    where
        F: FnMut(&mut C, FrameTick) -> ControlFlow<()> + 'static,
    {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.entries.insert((phase, id), Box::new(callback));
        self.phases.insert(id, phase);
        id
    }

    /// Cancel a pending callback.  Returns `false` if it already retired.
    pub fn cancel(&mut self, id: FrameId) -> bool {
        match self.phases.remove(&id) {
            Some(phase) => self.entries.remove(&(phase, id)).is_some(),
            None => false,
        }
    }

    #[cfg(test)]
    pub fn is_pending(&self, id: FrameId) -> bool {
        self.phases.contains_key(&id)
    }

    /// Number of callbacks scheduled in `phase`.
    #[cfg(test)]
    pub fn pending_in(&self, phase: Phase) -> usize {
        self.entries.keys().filter(|(p, _)| *p == phase).count()
    }

    #[cfg(test)]
    pub fn is_idle(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run one frame.  Returns the number of callbacks invoked.
    ///
    /// The run order is snapshotted up front; a non-finite or negative `dt`
    /// is treated as zero.
    pub fn run_frame(&mut self, ctx: &mut C, dt: f64) -> usize {
        let dt = if dt.is_finite() && dt > 0.0 { dt } else { 0.0 };
        self.frame += 1;
        self.elapsed += dt;
        let tick = FrameTick {
            frame: self.frame,
            dt,
            elapsed: self.elapsed,
        };

        let order: Vec<(Phase, FrameId)> = self.entries.keys().copied().collect();
        let mut ran = 0;
        for key in order {
            let Some(mut callback) = self.entries.remove(&key) else {
                continue;
            };
            ran += 1;
            match callback(ctx, tick) {
                ControlFlow::Continue(()) => {
                    self.entries.insert(key, callback);
                }
                ControlFlow::Break(()) => {
                    self.phases.remove(&key.1);
                }
            }
        }
        ran
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn phases_run_in_order_regardless_of_registration() {
        let mut sched: FrameScheduler<Vec<&'static str>> = FrameScheduler::new();
        sched.request(Phase::Render, |log, _| {
            log.push("render");
            ControlFlow::Continue(())
        });
        sched.request(Phase::Trigger, |log, _| {
            log.push("trigger");
            ControlFlow::Continue(())
        });
        sched.request(Phase::Scroll, |log, _| {
            log.push("scroll");
            ControlFlow::Continue(())
        });

        let mut log = Vec::new();
        assert_eq!(sched.run_frame(&mut log, 1.0 / 60.0), 3);
        assert_eq!(log, vec!["scroll", "trigger", "render"]);
    }

    #[test]
    fn break_retires_callback() {
        let mut sched: FrameScheduler<u32> = FrameScheduler::new();
        let id = sched.request(Phase::Render, |n, _| {
            *n += 1;
            if *n >= 3 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });

        let mut n = 0;
        for _ in 0..10 {
            sched.run_frame(&mut n, 0.016);
        }
        assert_eq!(n, 3);
        assert!(!sched.is_pending(id));
        assert!(sched.is_idle());
    }

    #[test]
    fn cancel_removes_pending_callback() {
        let mut sched: FrameScheduler<u32> = FrameScheduler::new();
        let id = sched.request(Phase::Scroll, |n, _| {
            *n += 1;
            ControlFlow::Continue(())
        });
        assert!(sched.cancel(id));
        assert!(!sched.cancel(id));

        let mut n = 0;
        sched.run_frame(&mut n, 0.016);
        assert_eq!(n, 0);
    }

    #[test]
    fn tick_carries_frame_count_and_elapsed() {
        let mut sched: FrameScheduler<Vec<FrameTick>> = FrameScheduler::new();
        sched.request(Phase::Scroll, |ticks, tick| {
            ticks.push(tick);
            ControlFlow::Continue(())
        });
        let mut ticks = Vec::new();
        sched.run_frame(&mut ticks, 0.5);
        sched.run_frame(&mut ticks, f64::NAN);
        sched.run_frame(&mut ticks, 0.25);

        assert_eq!(ticks[0].frame, 1);
        assert_eq!(ticks[1].dt, 0.0);
        assert_eq!(ticks[2].elapsed, 0.75);
    }
}
