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
//! Simulation and loop configuration
//!
//! Both configurations have sensible defaults, builder-style `with_*`
//! setters and a `from_env` constructor. Malformed environment values are
//! logged and ignored, leaving the default in place.
//!
//! ```bash
//! export ECS_PHYSICS2D_GRAVITY="0,20"
//! export ECS_PHYSICS2D_FIXED_HZ=60
//! export ECS_PHYSICS2D_MAX_CATCH_UP=8
//! ```

use crate::math::Vec2;
use crate::physics::forces::DEFAULT_MAX_FORCE_MAGNITUDE;
use log::{debug, warn};
use std::time::Duration;

/// Environment variable overriding gravity, formatted `"x,y"`
pub const ENV_GRAVITY: &str = "ECS_PHYSICS2D_GRAVITY";

/// Environment variable overriding the fixed update rate in hertz
pub const ENV_FIXED_HZ: &str = "ECS_PHYSICS2D_FIXED_HZ";

/// Environment variable overriding the per-frame fixed update cap
pub const ENV_MAX_CATCH_UP: &str = "ECS_PHYSICS2D_MAX_CATCH_UP";

/// Default fixed update rate
pub const DEFAULT_FIXED_HZ: f64 = 100.0;

/// Default gravity; positive y points down the screen
pub const DEFAULT_GRAVITY: Vec2 = Vec2::new(0.0, 9.81);

/// Parameters of the physics system
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhysicsConfig {
    /// Acceleration applied to bodies that simulate gravity
    pub gravity: Vec2,
    /// Duration of one fixed tick in seconds
    pub fixed_timestep: f32,
    /// Cap on the magnitude of a body's summed world force
    pub max_force_magnitude: f32,
}

impl PhysicsConfig {
    /// Default configuration
    pub fn new() -> Self {
        PhysicsConfig {
            gravity: DEFAULT_GRAVITY,
            fixed_timestep: (1.0 / DEFAULT_FIXED_HZ) as f32,
            max_force_magnitude: DEFAULT_MAX_FORCE_MAGNITUDE,
        }
    }

    /// Set gravity
    pub fn with_gravity(mut self, gravity: Vec2) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the fixed timestep in seconds
    ///
    /// # Panics
    ///
    /// Panics if the timestep is not positive and finite.
    pub fn with_fixed_timestep(mut self, dt: f32) -> Self {
        assert!(dt > 0.0 && dt.is_finite(), "Timestep must be positive and finite");
        self.fixed_timestep = dt;
        self
    }

    /// Set the world force cap
    pub fn with_max_force_magnitude(mut self, max: f32) -> Self {
        self.max_force_magnitude = max;
        self
    }

    /// Defaults overridden by `ECS_PHYSICS2D_GRAVITY` and `ECS_PHYSICS2D_FIXED_HZ`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed like the environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = PhysicsConfig::new();
        if let Some(raw) = lookup(ENV_GRAVITY) {
            match parse_vec2(&raw) {
                Some(gravity) => config.gravity = gravity,
                None => warn!("ignoring malformed {}={:?}", ENV_GRAVITY, raw),
            }
        }
        if let Some(hz) = read_hz(&lookup) {
            config.fixed_timestep = (1.0 / hz) as f32;
        }
        debug!("physics config: {:?}", config);
        config
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// Pacing of the fixed-rate pass relative to rendered frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoopConfig {
    fixed_hz: f64,
    /// Most fixed updates run in a single frame before the backlog is dropped
    pub max_updates_per_frame: u32,
}

impl LoopConfig {
    /// 100 Hz with at most 4 catch-up updates per frame
    pub fn new() -> Self {
        LoopConfig {
            fixed_hz: DEFAULT_FIXED_HZ,
            max_updates_per_frame: 4,
        }
    }

    /// Set the fixed update rate
    ///
    /// # Panics
    ///
    /// Panics if the rate is not positive and finite.
    pub fn with_fixed_hz(mut self, hz: f64) -> Self {
        assert!(hz > 0.0 && hz.is_finite(), "Fixed rate must be positive and finite");
        self.fixed_hz = hz;
        self
    }

    /// Fixed updates per second, always positive and finite
    pub fn fixed_hz(&self) -> f64 {
        self.fixed_hz
    }

    /// Set the catch-up cap
    pub fn with_max_updates_per_frame(mut self, max: u32) -> Self {
        self.max_updates_per_frame = max;
        self
    }

    /// Duration of one fixed update
    pub fn fixed_step(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.fixed_hz)
    }

    /// Physics configuration whose timestep matches this loop
    pub fn physics(&self) -> PhysicsConfig {
        PhysicsConfig::new().with_fixed_timestep((1.0 / self.fixed_hz) as f32)
    }

    /// Defaults overridden by `ECS_PHYSICS2D_FIXED_HZ` and `ECS_PHYSICS2D_MAX_CATCH_UP`
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by values from `lookup`, keyed like the environment
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = LoopConfig::new();
        if let Some(hz) = read_hz(&lookup) {
            config.fixed_hz = hz;
        }
        if let Some(raw) = lookup(ENV_MAX_CATCH_UP) {
            match raw.trim().parse::<u32>() {
                Ok(max) if max > 0 => config.max_updates_per_frame = max,
                _ => warn!("ignoring malformed {}={:?}", ENV_MAX_CATCH_UP, raw),
            }
        }
        debug!("loop config: {:?}", config);
        config
    }
}

impl Default for LoopConfig {
    fn default() -> Self {
        Self::new()
    }
}

fn read_hz<F>(lookup: &F) -> Option<f64>
where
    F: Fn(&str) -> Option<String>,
{
    let raw = lookup(ENV_FIXED_HZ)?;
    match raw.trim().parse::<f64>() {
        Ok(hz) if hz > 0.0 && hz.is_finite() => Some(hz),
        _ => {
            warn!("ignoring malformed {}={:?}", ENV_FIXED_HZ, raw);
            None
        }
    }
}

fn parse_vec2(raw: &str) -> Option<Vec2> {
    let (x, y) = raw.split_once(',')?;
    let x = x.trim().parse::<f32>().ok()?;
    let y = y.trim().parse::<f32>().ok()?;
    let v = Vec2::new(x, y);
    v.is_finite().then_some(v)
}
