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
//! World forces
//!
//! Force providers compute a force for a body's entity; the registry sums
//! them and the physics system applies the total to every non-kinematic
//! body whenever it resets forces. Providers can represent wind, currents,
//! attraction fields or any other force that acts on the whole world.

use crate::ecs::Entity;
use crate::math::Vec2;
use log::warn;

/// Default cap on the magnitude of a body's total world force
pub const DEFAULT_MAX_FORCE_MAGNITUDE: f32 = 1e10;

/// Source of a world force
pub trait ForceProvider {
    /// Compute the force to apply to `entity`
    ///
    /// Returns None if this provider doesn't apply to the entity.
    fn compute_force(&self, entity: &Entity) -> Option<Vec2>;

    /// Get a descriptive name for this force provider
    fn name(&self) -> &str;
}

/// The same force for every body, such as a steady wind
#[derive(Debug, Clone, PartialEq)]
pub struct ConstantForce {
    name: String,
    force: Vec2,
}

impl ConstantForce {
    /// Create a named constant force
    pub fn new(name: impl Into<String>, force: Vec2) -> Self {
        ConstantForce {
            name: name.into(),
            force,
        }
    }

    /// The force applied to every body
    pub fn force(&self) -> Vec2 {
        self.force
    }
}

impl ForceProvider for ConstantForce {
    fn compute_force(&self, _entity: &Entity) -> Option<Vec2> {
        Some(self.force)
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Ordered collection of force providers
///
/// Invalid (NaN or infinite) forces are skipped and oversized totals are
/// clamped to `max_force_magnitude`, both with a warning.
pub struct ForceRegistry {
    providers: Vec<Box<dyn ForceProvider>>,
    /// Upper bound on the magnitude of a summed force
    pub max_force_magnitude: f32,
    /// Whether to log skipped and clamped forces
    pub warn_on_invalid: bool,
}

impl ForceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        ForceRegistry {
            providers: Vec::new(),
            max_force_magnitude: DEFAULT_MAX_FORCE_MAGNITUDE,
            warn_on_invalid: true,
        }
    }

    /// Register a force provider
    pub fn register_provider(&mut self, provider: Box<dyn ForceProvider>) {
        self.providers.push(provider);
    }

    /// Remove every provider with this name; returns how many were removed
    pub fn remove_provider(&mut self, name: &str) -> usize {
        let before = self.providers.len();
        self.providers.retain(|provider| provider.name() != name);
        before - self.providers.len()
    }

    /// Remove all providers
    pub fn clear(&mut self) {
        self.providers.clear();
    }

    /// Get the number of registered providers
    pub fn provider_count(&self) -> usize {
        self.providers.len()
    }

    /// Names of registered providers, in registration order
    pub fn provider_names(&self) -> Vec<&str> {
        self.providers.iter().map(|provider| provider.name()).collect()
    }

    /// Sum every provider's force for `entity`
    ///
    /// Returns `None` when no provider applies.
    pub fn total_force(&self, entity: &Entity) -> Option<Vec2> {
        let mut total = Vec2::ZERO;
        let mut has_forces = false;

        for provider in &self.providers {
            if let Some(force) = provider.compute_force(entity) {
                if !force.is_finite() {
                    if self.warn_on_invalid {
                        warn!(
                            "force provider {:?} produced invalid force for {}",
                            provider.name(),
                            entity.id()
                        );
                    }
                    continue;
                }
                total += force;
                has_forces = true;
            }
        }

        if !has_forces {
            return None;
        }

        let magnitude = total.magnitude();
        if magnitude > self.max_force_magnitude {
            if self.warn_on_invalid {
                warn!(
                    "total force magnitude {:.2e} exceeds limit {:.2e} for {}",
                    magnitude,
                    self.max_force_magnitude,
                    entity.id()
                );
            }
            total *= self.max_force_magnitude / magnitude;
        }

        Some(total)
    }
}

impl Default for ForceRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::Tag;

    struct PlayerOnly;

    impl ForceProvider for PlayerOnly {
        fn compute_force(&self, entity: &Entity) -> Option<Vec2> {
            (entity.tag() == Tag::Player).then(|| Vec2::new(0.0, -5.0))
        }

        fn name(&self) -> &str {
            "player-only"
        }
    }

    #[test]
    fn test_forces_are_summed() {
        let mut registry = ForceRegistry::new();
        registry.register_provider(Box::new(ConstantForce::new("wind", Vec2::new(2.0, 0.0))));
        registry.register_provider(Box::new(PlayerOnly));

        let player = Entity::new().with_tag(Tag::Player);
        let other = Entity::new();
        assert_eq!(registry.total_force(&player), Some(Vec2::new(2.0, -5.0)));
        assert_eq!(registry.total_force(&other), Some(Vec2::new(2.0, 0.0)));
    }

    #[test]
    fn test_no_providers_means_no_force() {
        let registry = ForceRegistry::new();
        assert_eq!(registry.total_force(&Entity::new()), None);
    }

    #[test]
    fn test_invalid_forces_are_skipped() {
        let mut registry = ForceRegistry::new();
        registry.warn_on_invalid = false;
        registry.register_provider(Box::new(ConstantForce::new("bad", Vec2::new(f32::NAN, 0.0))));
        assert_eq!(registry.total_force(&Entity::new()), None);

        registry.register_provider(Box::new(ConstantForce::new("good", Vec2::new(1.0, 1.0))));
        assert_eq!(registry.total_force(&Entity::new()), Some(Vec2::new(1.0, 1.0)));
    }

    #[test]
    fn test_oversized_force_is_clamped() {
        let mut registry = ForceRegistry::new();
        registry.max_force_magnitude = 5.0;
        registry.register_provider(Box::new(ConstantForce::new("gale", Vec2::new(30.0, 40.0))));

        let force = registry.total_force(&Entity::new()).unwrap();
        assert!((force.magnitude() - 5.0).abs() < 1e-5);
        assert!((force.x - 3.0).abs() < 1e-5);
    }

    #[test]
    fn test_remove_provider_by_name() {
        let mut registry = ForceRegistry::new();
        registry.register_provider(Box::new(ConstantForce::new("wind", Vec2::ZERO)));
        registry.register_provider(Box::new(PlayerOnly));
        assert_eq!(registry.remove_provider("wind"), 1);
        assert_eq!(registry.provider_names(), vec!["player-only"]);
    }
}
