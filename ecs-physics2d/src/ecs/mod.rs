//! Entity Component System core
//!
//! Entities own ordered component lists, families select entities by
//! component type, and the [`Engine`] registers entities, caches query
//! views and drives systems in registration order.

mod component;
pub mod components;
mod engine;
mod entity;
mod family;
pub mod script;
mod signal;
mod system;
mod tag;

pub use component::{AsAny, Component};
pub use components::{RigidBody, Transform};
pub use engine::{Engine, EngineId, SharedListener};
pub use entity::{Entity, EntityId};
pub use family::EntityFamily;
pub use script::{EntityScript, Script, ScriptContext, ScriptSystem};
pub use signal::{EntityListener, ListenerId, Signal};
pub use system::System;
pub use tag::{Layer, Tag};
