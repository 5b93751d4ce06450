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
//! Entity management
//!
//! Entities are the containers of the registry: an identity, an optional
//! string name, a [`Tag`], a [`Layer`] and an ordered list of components.
//! Components are activated in insertion order when the entity joins an
//! engine and deactivated in reverse order when it leaves.

use super::component::{Component, ComponentSlot};
use super::engine::EngineId;
use super::tag::{Layer, Tag};
use crate::error::{EngineError, EngineResult};
use std::any::TypeId;
use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_ENTITY_ID: AtomicU64 = AtomicU64::new(1);

/// Unique identifier for an entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(u64);

impl EntityId {
    /// Create a new EntityId from a raw u64 value
    pub fn new(id: u64) -> Self {
        EntityId(id)
    }

    /// Get the raw u64 value
    pub fn raw(&self) -> u64 {
        self.0
    }

    fn allocate() -> Self {
        EntityId(NEXT_ENTITY_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Entity({})", self.0)
    }
}

/// A game object: identity plus an ordered set of components
///
/// Component lookup by type returns the first component of that type that
/// was added. Structure (components, tag, layer) is frozen once the entity
/// is attached to an engine; detach it with
/// [`Engine::remove_entity`](super::Engine::remove_entity) to edit it again.
pub struct Entity {
    id: EntityId,
    name: Option<String>,
    tag: Tag,
    layer: Layer,
    components: Vec<ComponentSlot>,
    first_of_type: HashMap<TypeId, usize>,
    activated: bool,
    engine: Option<EngineId>,
}

impl Entity {
    /// Create an empty, unnamed entity with a fresh identity
    pub fn new() -> Self {
        Entity {
            id: EntityId::allocate(),
            name: None,
            tag: Tag::Untagged,
            layer: Layer::DEFAULT,
            components: Vec::new(),
            first_of_type: HashMap::new(),
            activated: false,
            engine: None,
        }
    }

    /// Create an empty entity with a string name
    pub fn named(name: impl Into<String>) -> Self {
        let mut entity = Entity::new();
        entity.name = Some(name.into());
        entity
    }

    /// Builder form of [`set_tag`](Self::set_tag) for detached entities
    pub fn with_tag(mut self, tag: Tag) -> Self {
        self.tag = tag;
        self
    }

    /// Builder form of [`set_layer`](Self::set_layer) for detached entities
    pub fn with_layer(mut self, layer: Layer) -> Self {
        self.layer = layer;
        self
    }

    /// Builder form of [`add_component`](Self::add_component)
    ///
    /// Entities held by value are never attached, so this cannot fail.
    pub fn with<T: Component>(mut self, component: T) -> Self {
        self.push(component);
        self
    }

    /// Get the entity ID
    pub fn id(&self) -> EntityId {
        self.id
    }

    /// String name, if one was given
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Current tag
    pub fn tag(&self) -> Tag {
        self.tag
    }

    /// Current layer
    pub fn layer(&self) -> Layer {
        self.layer
    }

    /// Whether the entity's components are active
    pub fn is_activated(&self) -> bool {
        self.activated
    }

    /// Engine that owns this entity, if any
    pub fn engine(&self) -> Option<EngineId> {
        self.engine
    }

    /// Change the tag; rejected once the entity belongs to an engine
    ///
    /// Use [`Engine::set_tag`](super::Engine::set_tag) for attached entities
    /// so the tag views stay consistent.
    pub fn set_tag(&mut self, tag: Tag) -> EngineResult<()> {
        self.ensure_detached()?;
        self.tag = tag;
        Ok(())
    }

    /// Change the layer; rejected once the entity belongs to an engine
    pub fn set_layer(&mut self, layer: Layer) -> EngineResult<()> {
        self.ensure_detached()?;
        self.layer = layer;
        Ok(())
    }

    /// Append a component
    ///
    /// Fails when the entity is already activated or attached to an engine.
    pub fn add_component<T: Component>(&mut self, component: T) -> EngineResult<()> {
        self.ensure_detached()?;
        self.push(component);
        Ok(())
    }

    /// Remove and return the first component of type `T`
    pub fn remove_component<T: Component>(&mut self) -> EngineResult<T> {
        self.ensure_detached()?;
        let index = self.index_of::<T>()?;
        let slot = self.components.remove(index);
        self.rebuild_lookup();
        slot.into_inner::<T>().ok_or(EngineError::ComponentNotFound {
            component: std::any::type_name::<T>(),
            entity: self.id,
        })
    }

    /// First component of type `T`
    pub fn get_component<T: Component>(&self) -> EngineResult<&T> {
        let index = self.index_of::<T>()?;
        self.components[index]
            .downcast_ref::<T>()
            .ok_or_else(|| self.not_found::<T>())
    }

    /// First component of type `T`, mutably
    pub fn get_component_mut<T: Component>(&mut self) -> EngineResult<&mut T> {
        let index = self.index_of::<T>()?;
        let missing = self.not_found::<T>();
        self.components[index].downcast_mut::<T>().ok_or(missing)
    }

    /// Whether a component of type `T` is present
    pub fn has_component<T: Component>(&self) -> bool {
        self.first_of_type.contains_key(&TypeId::of::<T>())
    }

    pub(crate) fn has_type(&self, type_id: TypeId) -> bool {
        self.first_of_type.contains_key(&type_id)
    }

    /// Every component of type `T`, in insertion order
    pub fn get_all_components<T: Component>(&self) -> impl Iterator<Item = &T> + '_ {
        self.components
            .iter()
            .filter_map(|slot| slot.downcast_ref::<T>())
    }

    /// The `n`-th component of type `T`, counting from zero
    pub fn nth_component<T: Component>(&self, n: usize) -> Option<&T> {
        self.get_all_components::<T>().nth(n)
    }

    /// The `n`-th component of type `T`, mutably
    pub fn nth_component_mut<T: Component>(&mut self, n: usize) -> Option<&mut T> {
        self.components
            .iter_mut()
            .filter_map(|slot| slot.downcast_mut::<T>())
            .nth(n)
    }

    /// Number of components of type `T`
    pub fn count_components<T: Component>(&self) -> usize {
        let type_id = TypeId::of::<T>();
        self.components
            .iter()
            .filter(|slot| slot.type_id() == type_id)
            .count()
    }

    /// Total number of components
    pub fn component_count(&self) -> usize {
        self.components.len()
    }

    /// Type names of all components, in insertion order
    pub fn component_names(&self) -> Vec<&'static str> {
        self.components.iter().map(|slot| slot.type_name()).collect()
    }

    pub(crate) fn replace_tag(&mut self, tag: Tag) -> Tag {
        std::mem::replace(&mut self.tag, tag)
    }

    pub(crate) fn replace_layer(&mut self, layer: Layer) -> Layer {
        std::mem::replace(&mut self.layer, layer)
    }

    pub(crate) fn set_engine(&mut self, engine: Option<EngineId>) {
        self.engine = engine;
    }

    pub(crate) fn activate(&mut self) -> EngineResult<()> {
        if self.activated {
            return Err(EngineError::EntityAlreadyActivated(self.id));
        }
        for slot in self.components.iter_mut() {
            if !slot.is_activated() {
                slot.activate()?;
            }
        }
        self.activated = true;
        Ok(())
    }

    pub(crate) fn deactivate(&mut self) -> EngineResult<()> {
        if !self.activated {
            return Err(EngineError::EntityNotActivated(self.id));
        }
        for slot in self.components.iter_mut().rev() {
            if slot.is_activated() {
                slot.deactivate()?;
            }
        }
        self.activated = false;
        Ok(())
    }

    fn push<T: Component>(&mut self, component: T) {
        let index = self.components.len();
        self.components.push(ComponentSlot::new(component));
        self.first_of_type.entry(TypeId::of::<T>()).or_insert(index);
    }

    fn rebuild_lookup(&mut self) {
        self.first_of_type.clear();
        for (index, slot) in self.components.iter().enumerate() {
            self.first_of_type.entry(slot.type_id()).or_insert(index);
        }
    }

    fn index_of<T: Component>(&self) -> EngineResult<usize> {
        self.first_of_type
            .get(&TypeId::of::<T>())
            .copied()
            .ok_or_else(|| self.not_found::<T>())
    }

    fn not_found<T: Component>(&self) -> EngineError {
        EngineError::ComponentNotFound {
            component: std::any::type_name::<T>(),
            entity: self.id,
        }
    }

    fn ensure_detached(&self) -> EngineResult<()> {
        if self.activated {
            return Err(EngineError::EntityAlreadyActivated(self.id));
        }
        if self.engine.is_some() {
            return Err(EngineError::EntityAlreadyAttached(self.id));
        }
        Ok(())
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Entity")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("tag", &self.tag)
            .field("layer", &self.layer)
            .field("components", &self.component_names())
            .field("activated", &self.activated)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[derive(Debug, PartialEq)]
    struct Health(i32);
    impl Component for Health {}

    struct Name(&'static str);
    impl Component for Name {}

    struct Recorder {
        label: &'static str,
        log: Rc<RefCell<Vec<String>>>,
    }

    impl Component for Recorder {
        fn on_activate(&mut self) {
            self.log.borrow_mut().push(format!("activate {}", self.label));
        }

        fn on_deactivate(&mut self) {
            self.log.borrow_mut().push(format!("deactivate {}", self.label));
        }
    }

    #[test]
    fn test_entity_ids_are_unique() {
        let a = Entity::new();
        let b = Entity::new();
        assert_ne!(a.id(), b.id());
    }

    #[test]
    fn test_entity_id_display() {
        assert_eq!(format!("{}", EntityId::new(42)), "Entity(42)");
        assert_eq!(EntityId::new(42).raw(), 42);
    }

    #[test]
    fn test_first_component_of_type_wins() {
        let entity = Entity::new().with(Health(10)).with(Health(20));
        assert_eq!(entity.get_component::<Health>().unwrap().0, 10);
        assert_eq!(entity.count_components::<Health>(), 2);
        let all: Vec<i32> = entity.get_all_components::<Health>().map(|h| h.0).collect();
        assert_eq!(all, vec![10, 20]);
        assert_eq!(entity.nth_component::<Health>(1), Some(&Health(20)));
    }

    #[test]
    fn test_missing_component_fails_fast() {
        let entity = Entity::new().with(Health(1));
        let id = entity.id();
        let err = entity.get_component::<Name>().err().unwrap();
        assert!(matches!(err, EngineError::ComponentNotFound { entity: e, .. } if e == id));
        assert!(!entity.has_component::<Name>());
    }

    #[test]
    fn test_remove_component_updates_lookup() {
        let mut entity = Entity::new().with(Health(1)).with(Name("a")).with(Health(2));
        let removed = entity.remove_component::<Health>().unwrap();
        assert_eq!(removed, Health(1));
        assert_eq!(entity.get_component::<Health>().unwrap().0, 2);
        assert_eq!(entity.get_component::<Name>().unwrap().0, "a");
    }

    #[test]
    fn test_activation_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut entity = Entity::new()
            .with(Recorder { label: "a", log: log.clone() })
            .with(Recorder { label: "b", log: log.clone() });

        entity.activate().unwrap();
        entity.deactivate().unwrap();

        assert_eq!(
            *log.borrow(),
            vec!["activate a", "activate b", "deactivate b", "deactivate a"]
        );
    }

    #[test]
    fn test_activated_entity_is_frozen() {
        let mut entity = Entity::new();
        entity.activate().unwrap();

        assert!(matches!(
            entity.add_component(Health(1)),
            Err(EngineError::EntityAlreadyActivated(_))
        ));
        assert!(entity.set_tag(Tag::Player).is_err());
        assert!(matches!(
            entity.activate(),
            Err(EngineError::EntityAlreadyActivated(_))
        ));

        entity.deactivate().unwrap();
        assert!(matches!(
            entity.deactivate(),
            Err(EngineError::EntityNotActivated(_))
        ));
        entity.add_component(Health(1)).unwrap();
    }
}
