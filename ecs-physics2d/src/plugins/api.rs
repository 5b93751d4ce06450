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
//! Plugin API definitions
//!
//! A plugin bundles systems, world forces or entities and installs them into
//! an [`Engine`] in one step. Plugins are registered with a
//! [`PluginRegistry`](super::PluginRegistry), which checks API versions and
//! orders installation by declared dependencies.

use crate::ecs::{AsAny, Engine};
use crate::error::EngineResult;

/// Current plugin API version
///
/// Plugins report the API version they were written against through
/// [`Plugin::api_version`]. The registry rejects plugins whose version is
/// not compatible under semantic versioning rules.
pub const PLUGIN_API_VERSION: &str = "0.1.0";

/// Base trait for all plugins
///
/// # Examples
///
/// ```
/// use ecs_physics2d::ecs::Engine;
/// use ecs_physics2d::error::EngineResult;
/// use ecs_physics2d::plugins::Plugin;
///
/// struct Banner;
///
/// impl Plugin for Banner {
///     fn name(&self) -> &str { "banner" }
///     fn version(&self) -> &str { "1.0.0" }
///
///     fn build(&mut self, _engine: &mut Engine) -> EngineResult<()> {
///         Ok(())
///     }
/// }
/// ```
pub trait Plugin: AsAny {
    /// Unique name of the plugin
    ///
    /// Other plugins refer to this name in their dependency lists.
    fn name(&self) -> &str;

    /// Version of the plugin itself
    fn version(&self) -> &str;

    /// Plugin API version this plugin targets
    fn api_version(&self) -> &str {
        PLUGIN_API_VERSION
    }

    /// Names of plugins that must be installed before this one
    fn dependencies(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Install the plugin into `engine`
    fn build(&mut self, engine: &mut Engine) -> EngineResult<()>;

    /// Undo whatever `build` installed
    ///
    /// Called in reverse installation order. The default does nothing.
    fn shutdown(&mut self, _engine: &mut Engine) -> EngineResult<()> {
        Ok(())
    }
}
