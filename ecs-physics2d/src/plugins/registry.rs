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
//! Plugin registry and loader
//!
//! This module provides the registry for managing plugins, including:
//! - Static registration via direct API calls
//! - API version compatibility checking
//! - Dependency resolution and circular dependency detection
//! - Installation in dependency order and shutdown in reverse order

use crate::ecs::Engine;
use crate::error::{EngineError, EngineResult};
use crate::plugins::api::{Plugin, PLUGIN_API_VERSION};
use log::{debug, error, info};
use semver::Version;
use std::collections::{HashMap, VecDeque};

/// Registry that owns plugins and installs them into an engine
///
/// Installation order is a topological order of the declared dependencies.
/// Among plugins whose dependencies are already satisfied, the one
/// registered first is installed first, so the order is deterministic.
pub struct PluginRegistry {
    plugins: Vec<Box<dyn Plugin>>,
    by_name: HashMap<String, usize>,
    load_order: Vec<usize>,
    installed: usize,
}

impl PluginRegistry {
    /// Create a new plugin registry
    pub fn new() -> Self {
        PluginRegistry {
            plugins: Vec::new(),
            by_name: HashMap::new(),
            load_order: Vec::new(),
            installed: 0,
        }
    }

    /// Register a plugin
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Plugin`] if:
    /// - plugins have already been installed
    /// - a plugin with the same name is already registered
    /// - the plugin's API version is incompatible with [`PLUGIN_API_VERSION`]
    pub fn register(&mut self, plugin: Box<dyn Plugin>) -> EngineResult<()> {
        if self.is_installed() {
            return Err(EngineError::Plugin(
                "cannot register plugins after installation".to_string(),
            ));
        }

        let name = plugin.name().to_string();
        if self.by_name.contains_key(&name) {
            return Err(EngineError::Plugin(format!(
                "plugin '{}' is already registered",
                name
            )));
        }

        let api_version = plugin.api_version();
        if !is_version_compatible(api_version, PLUGIN_API_VERSION) {
            return Err(EngineError::Plugin(format!(
                "plugin '{}' API version {} is incompatible with engine API version {}",
                name, api_version, PLUGIN_API_VERSION
            )));
        }

        debug!("registered plugin {} {}", name, plugin.version());
        self.by_name.insert(name, self.plugins.len());
        self.plugins.push(plugin);
        Ok(())
    }

    /// Resolve dependencies and build every plugin into `engine`
    ///
    /// # Errors
    ///
    /// Fails on a missing dependency, a dependency cycle or the first
    /// plugin whose `build` fails. Plugins built before a failure stay
    /// installed and are shut down by [`shutdown_all`](Self::shutdown_all).
    pub fn install_all(&mut self, engine: &mut Engine) -> EngineResult<()> {
        if self.is_installed() {
            return Err(EngineError::Plugin(
                "registry already installed".to_string(),
            ));
        }

        let mut dependencies = Vec::with_capacity(self.plugins.len());
        for plugin in &self.plugins {
            let mut deps = Vec::new();
            for dep in plugin.dependencies() {
                match self.by_name.get(dep) {
                    Some(&index) => deps.push(index),
                    None => {
                        return Err(EngineError::Plugin(format!(
                            "plugin '{}' depends on '{}' which is not registered",
                            plugin.name(),
                            dep
                        )))
                    }
                }
            }
            dependencies.push(deps);
        }

        self.load_order = topological_sort(&dependencies)?;

        for &index in &self.load_order {
            let plugin = &mut self.plugins[index];
            let name = plugin.name().to_string();
            plugin.build(engine).map_err(|e| {
                EngineError::Plugin(format!("failed to build plugin '{}': {}", name, e))
            })?;
            self.installed += 1;
            info!("installed plugin {} {}", name, plugin.version());
        }

        Ok(())
    }

    /// Shut down installed plugins in reverse installation order
    ///
    /// Every installed plugin is shut down even if an earlier one fails; the
    /// first failure is returned.
    pub fn shutdown_all(&mut self, engine: &mut Engine) -> EngineResult<()> {
        let mut first_error = None;
        for &index in self.load_order[..self.installed].iter().rev() {
            let plugin = &mut self.plugins[index];
            if let Err(e) = plugin.shutdown(engine) {
                let err = EngineError::Plugin(format!(
                    "failed to shut down plugin '{}': {}",
                    plugin.name(),
                    e
                ));
                error!("{}", err);
                if first_error.is_none() {
                    first_error = Some(err);
                }
            } else {
                debug!("shut down plugin {}", plugin.name());
            }
        }
        self.installed = 0;
        self.load_order.clear();
        first_error.map_or(Ok(()), Err)
    }

    /// Get a plugin by name
    pub fn get(&self, name: &str) -> Option<&dyn Plugin> {
        self.by_name.get(name).map(|&index| self.plugins[index].as_ref())
    }

    /// Get a mutable plugin by name
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Plugin + 'static)> {
        match self.by_name.get(name) {
            Some(&index) => Some(self.plugins[index].as_mut()),
            None => None,
        }
    }

    /// Get a plugin by concrete type
    pub fn plugin<P: Plugin>(&self) -> Option<&P> {
        self.plugins.iter().find_map(|plugin| {
            let plugin: &dyn Plugin = &**plugin;
            plugin.as_any().downcast_ref::<P>()
        })
    }

    /// Get the number of registered plugins
    pub fn plugin_count(&self) -> usize {
        self.plugins.len()
    }

    /// Whether any plugin is currently installed
    pub fn is_installed(&self) -> bool {
        self.installed > 0
    }

    /// Names of installed plugins in installation order
    pub fn load_order(&self) -> Vec<&str> {
        self.load_order[..self.installed]
            .iter()
            .map(|&index| self.plugins[index].name())
            .collect()
    }
}

impl Default for PluginRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check if a plugin API version is compatible with the engine
///
/// Uses semantic versioning rules:
/// - Major version must match
/// - For major version 0.x.y, minor versions must match
/// - For major version >= 1, the plugin minor version must not exceed the engine's
/// - Patch version is ignored
pub fn is_version_compatible(plugin_version: &str, engine_version: &str) -> bool {
    let (plugin_ver, engine_ver) = match (
        Version::parse(plugin_version),
        Version::parse(engine_version),
    ) {
        (Ok(p), Ok(e)) => (p, e),
        _ => return false,
    };

    if plugin_ver.major != engine_ver.major {
        return false;
    }

    if plugin_ver.major != 0 {
        plugin_ver.minor <= engine_ver.minor
    } else {
        plugin_ver.minor == engine_ver.minor
    }
}

/// Kahn's algorithm over plugin indices
///
/// `dependencies[i]` lists the indices plugin `i` depends on. Ready nodes
/// are released in index order.
fn topological_sort(dependencies: &[Vec<usize>]) -> EngineResult<Vec<usize>> {
    let count = dependencies.len();
    let mut in_degree = vec![0usize; count];
    let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); count];

    for (dependent, deps) in dependencies.iter().enumerate() {
        for &dep in deps {
            dependents[dep].push(dependent);
            in_degree[dependent] += 1;
        }
    }

    let mut queue: VecDeque<usize> = (0..count).filter(|&i| in_degree[i] == 0).collect();
    let mut sorted = Vec::with_capacity(count);

    while let Some(node) = queue.pop_front() {
        sorted.push(node);
        for &next in &dependents[node] {
            in_degree[next] -= 1;
            if in_degree[next] == 0 {
                queue.push_back(next);
            }
        }
    }

    if sorted.len() != count {
        return Err(EngineError::Plugin(
            "circular dependency detected in plugin dependencies".to_string(),
        ));
    }

    Ok(sorted)
}

/// Macro for static plugin registration
///
/// Expands to a `register` call and propagates its error with `?`.
///
/// # Example
///
/// ```rust,ignore
/// register_plugin!(registry, CorePlugin::default());
/// ```
#[macro_export]
macro_rules! register_plugin {
    ($registry:expr, $plugin:expr) => {
        $registry.register(Box::new($plugin))?
    };
}
