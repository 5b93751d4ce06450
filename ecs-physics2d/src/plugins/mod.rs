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
//! Plugin system for extending the engine
//!
//! A plugin installs systems, world forces or entities into an
//! [`Engine`](crate::ecs::Engine) in a single step.
//!
//! # Registration
//!
//! ```rust,ignore
//! use ecs_physics2d::plugins::{CorePlugin, PluginRegistry, WorldForcePlugin};
//!
//! let mut registry = PluginRegistry::new();
//! registry.register(Box::new(CorePlugin::default()))?;
//!
//! // Or use the macro
//! register_plugin!(registry, WorldForcePlugin::new().with_force("wind", Vec2::new(1.0, 0.0)));
//!
//! registry.install_all(&mut engine)?;
//! ```
//!
//! # Dependency Management
//!
//! Plugins declare the names of the plugins they need through
//! [`Plugin::dependencies`]. The registry:
//! - verifies that every dependency is registered
//! - installs plugins in dependency order
//! - rejects circular dependencies
//! - shuts plugins down in reverse installation order
//!
//! # Version Compatibility
//!
//! The plugin API follows semantic versioning. A plugin reports the API
//! version it targets through [`Plugin::api_version`], which defaults to
//! [`PLUGIN_API_VERSION`]. For 0.x versions the minor version must match;
//! from 1.0 on the plugin's minor version may not exceed the engine's.

pub mod api;
pub mod builtin;
pub mod registry;

pub use api::{Plugin, PLUGIN_API_VERSION};
pub use builtin::{CorePlugin, WorldForcePlugin};
pub use registry::{is_version_compatible, PluginRegistry};
