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
//! Entity families
//!
//! A family is a set of component types. An entity is a member when it has
//! at least one component of every type in the set. Families are hashable so
//! the engine can cache one view per distinct family.

use super::component::Component;
use super::entity::Entity;
use std::any::TypeId;
use std::collections::BTreeMap;
use std::fmt;

/// Set of component types used as a query key
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct EntityFamily {
    types: BTreeMap<TypeId, &'static str>,
}

impl EntityFamily {
    /// Empty family; every entity is a member
    pub fn new() -> Self {
        EntityFamily {
            types: BTreeMap::new(),
        }
    }

    /// Family of a single component type
    pub fn of<T: Component>() -> Self {
        EntityFamily::new().with::<T>()
    }

    /// Add a component type to the family
    pub fn with<T: Component>(mut self) -> Self {
        self.types
            .insert(TypeId::of::<T>(), std::any::type_name::<T>());
        self
    }

    /// Whether the entity has every type in the family
    pub fn is_member(&self, entity: &Entity) -> bool {
        self.types.keys().all(|type_id| entity.has_type(*type_id))
    }

    /// Number of distinct types in the family
    pub fn len(&self) -> usize {
        self.types.len()
    }

    /// Whether the family has no types
    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }
}

impl fmt::Debug for EntityFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.types.values()).finish()
    }
}

/// Build an [`EntityFamily`] from a list of component types
///
/// ```
/// use ecs_physics2d::family;
/// use ecs_physics2d::ecs::{RigidBody, Transform};
///
/// let bodies = family!(Transform, RigidBody);
/// assert_eq!(bodies.len(), 2);
/// ```
#[macro_export]
macro_rules! family {
    ($($component:ty),+ $(,)?) => {
        $crate::ecs::EntityFamily::new()$(.with::<$component>())+
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    impl Component for A {}
    struct B;
    impl Component for B {}

    #[test]
    fn test_membership_requires_all_types() {
        let ab = EntityFamily::of::<A>().with::<B>();
        assert!(ab.is_member(&Entity::new().with(A).with(B)));
        assert!(!ab.is_member(&Entity::new().with(A)));
        assert!(EntityFamily::new().is_member(&Entity::new()));
    }

    #[test]
    fn test_family_equality_ignores_order() {
        let ab = EntityFamily::of::<A>().with::<B>();
        let ba = EntityFamily::of::<B>().with::<A>();
        assert_eq!(ab, ba);
        assert_eq!(ab, family!(A, B));
        assert_ne!(ab, EntityFamily::of::<A>());
    }
}
