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
//! Error types for registry and lifecycle operations
//!
//! Every structural operation on the engine reports precondition violations
//! through [`EngineError`]. These indicate programming errors in the caller,
//! so nothing in this crate retries them.

use thiserror::Error;

use crate::ecs::EntityId;

/// Result alias used throughout the crate
pub type EngineResult<T> = Result<T, EngineError>;

/// Errors raised by the entity registry, systems and plugins
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EngineError {
    /// The entity is already owned by an engine
    #[error("{0} is already added to an engine")]
    EntityAlreadyAttached(EntityId),

    /// The entity has already been activated
    #[error("{0} has already been activated")]
    EntityAlreadyActivated(EntityId),

    /// The entity was expected to be active but is not
    #[error("{0} is not activated")]
    EntityNotActivated(EntityId),

    /// An entity with the same identity is already registered
    #[error("{0} is already attached to this engine")]
    DuplicateEntity(EntityId),

    /// No entity with this identity is registered
    #[error("{0} is not known to this engine")]
    UnknownEntity(EntityId),

    /// A component was activated twice
    #[error("component {0} is already activated")]
    ComponentAlreadyActivated(&'static str),

    /// A component was deactivated without being active
    #[error("component {0} is not activated")]
    ComponentNotActivated(&'static str),

    /// The requested component type is not present on the entity
    #[error("component not found: {component} on {entity}")]
    ComponentNotFound {
        /// Type name that was requested
        component: &'static str,
        /// Entity that was searched
        entity: EntityId,
    },

    /// The requested system type is not registered
    #[error("system not found: {0}")]
    SystemNotFound(&'static str),

    /// A system of this type is already registered
    #[error("system already added: {0}")]
    DuplicateSystem(&'static str),

    /// The operation is not allowed while an update pass is running
    #[error("cannot {0} while updating")]
    UpdateInProgress(&'static str),

    /// Plugin registration, dependency or initialization failure
    #[error("plugin error: {0}")]
    Plugin(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_name_the_subject() {
        let id = EntityId::new(7);
        let err = EngineError::ComponentNotFound {
            component: "Transform",
            entity: id,
        };
        assert_eq!(err.to_string(), "component not found: Transform on Entity(7)");
        assert_eq!(
            EngineError::UpdateInProgress("add system").to_string(),
            "cannot add system while updating"
        );
    }
}
