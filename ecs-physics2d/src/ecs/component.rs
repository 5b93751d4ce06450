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
//! Component trait and per-entity lifecycle slots
//!
//! Components are plain attribute bags attached to an entity. The entity
//! wraps each one in a [`ComponentSlot`] that remembers its concrete type and
//! tracks the `activated` lifecycle flag, so component types themselves stay
//! free of bookkeeping fields.

use crate::error::{EngineError, EngineResult};
use std::any::{Any, TypeId};

/// Upcasting helpers for trait objects
///
/// Implemented automatically for every `'static` type; used to downcast
/// boxed components, systems and plugins back to their concrete type.
pub trait AsAny: Any {
    /// Borrow as `&dyn Any`
    fn as_any(&self) -> &dyn Any;

    /// Borrow as `&mut dyn Any`
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Convert a box into `Box<dyn Any>`
    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

impl<T: Any> AsAny for T {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Trait that all components must implement
///
/// Components should be plain data. The optional hooks run exactly once per
/// activation cycle, before the slot's state flag flips.
pub trait Component: AsAny {
    /// Called when the owning entity is activated
    fn on_activate(&mut self) {}

    /// Called when the owning entity is deactivated
    fn on_deactivate(&mut self) {}
}

/// A component together with its type information and lifecycle state
pub(crate) struct ComponentSlot {
    type_id: TypeId,
    type_name: &'static str,
    activated: bool,
    component: Box<dyn Component>,
}

impl ComponentSlot {
    pub(crate) fn new<T: Component>(component: T) -> Self {
        ComponentSlot {
            type_id: TypeId::of::<T>(),
            type_name: std::any::type_name::<T>(),
            activated: false,
            component: Box::new(component),
        }
    }

    pub(crate) fn type_id(&self) -> TypeId {
        self.type_id
    }

    pub(crate) fn type_name(&self) -> &'static str {
        self.type_name
    }

    pub(crate) fn is_activated(&self) -> bool {
        self.activated
    }

    pub(crate) fn downcast_ref<T: Component>(&self) -> Option<&T> {
        let component: &dyn Component = &*self.component;
        component.as_any().downcast_ref::<T>()
    }

    pub(crate) fn downcast_mut<T: Component>(&mut self) -> Option<&mut T> {
        let component: &mut dyn Component = &mut *self.component;
        component.as_any_mut().downcast_mut::<T>()
    }

    pub(crate) fn into_inner<T: Component>(self) -> Option<T> {
        let component: Box<dyn Component> = self.component;
        component.into_any().downcast::<T>().ok().map(|boxed| *boxed)
    }

    pub(crate) fn activate(&mut self) -> EngineResult<()> {
        if self.activated {
            return Err(EngineError::ComponentAlreadyActivated(self.type_name));
        }
        self.component.on_activate();
        self.activated = true;
        Ok(())
    }

    pub(crate) fn deactivate(&mut self) -> EngineResult<()> {
        if !self.activated {
            return Err(EngineError::ComponentNotActivated(self.type_name));
        }
        self.component.on_deactivate();
        self.activated = false;
        Ok(())
    }
}
