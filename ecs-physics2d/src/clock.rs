// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Fixed timestep pacing
//!
//! [`FixedTimestep`] turns wall-clock frame times into a number of fixed
//! updates to run and an interpolation factor for rendering. It never
//! sleeps or reads the clock itself; the host loop passes elapsed time in.
//!
//! ```
//! use std::time::Duration;
//! use ecs_physics2d::clock::FixedTimestep;
//! use ecs_physics2d::config::LoopConfig;
//!
//! let mut clock = FixedTimestep::new(LoopConfig::default());
//! let ticks = clock.advance(Duration::from_millis(25));
//! assert_eq!(ticks.fixed_updates, 2);
//! assert!((ticks.interpolation - 0.5).abs() < 1e-3);
//! ```

use crate::config::LoopConfig;
use log::debug;
use std::time::Duration;

/// Work to do for one rendered frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTicks {
    /// Number of `Engine::fixed_update` calls to make
    pub fixed_updates: u32,
    /// Progress toward the next fixed update, in `[0, 1]`
    pub interpolation: f32,
}

/// Accumulates frame time and releases it in fixed steps
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: Duration,
    max_updates: u32,
    pending: Duration,
}

impl FixedTimestep {
    /// Create a clock from a loop configuration
    pub fn new(config: LoopConfig) -> Self {
        FixedTimestep {
            step: config.fixed_step(),
            max_updates: config.max_updates_per_frame,
            pending: Duration::ZERO,
        }
    }

    /// Duration of one fixed step
    pub fn step(&self) -> Duration {
        self.step
    }

    /// Time accumulated but not yet consumed by a fixed step
    pub fn pending(&self) -> Duration {
        self.pending
    }

    /// Add a frame's elapsed time and report how many fixed updates to run
    ///
    /// At most `max_updates_per_frame` updates are released per frame. If
    /// more time than that is owed, the backlog is dropped down to a single
    /// step so the simulation slows down instead of spiralling.
    pub fn advance(&mut self, elapsed: Duration) -> FrameTicks {
        self.pending += elapsed;

        let mut fixed_updates = 0;
        while self.pending > self.step && fixed_updates < self.max_updates {
            self.pending -= self.step;
            fixed_updates += 1;
        }

        if self.pending > self.step {
            debug!(
                "dropping {:?} of fixed-update backlog",
                self.pending - self.step
            );
            self.pending = self.step;
        }

        let interpolation = (self.pending.as_secs_f64() / self.step.as_secs_f64()).min(1.0) as f32;
        FrameTicks {
            fixed_updates,
            interpolation,
        }
    }

    /// Forget any accumulated time
    pub fn reset(&mut self) {
        self.pending = Duration::ZERO;
    }
}

impl Default for FixedTimestep {
    fn default() -> Self {
        Self::new(LoopConfig::default())
    }
}
