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
//! Tags and layers used to group entities

use std::fmt;

/// Fixed set of labels an entity can carry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Tag {
    /// No tag assigned
    #[default]
    Untagged,
    /// The player character
    Player,
    /// Hostile entities
    Enemy,
    /// Camera rigs
    Camera,
    /// Spawn points
    Respawn,
    /// Level goals
    Finish,
    /// Diagnostic helpers
    Debug,
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Tag::Untagged => "untagged",
            Tag::Player => "player",
            Tag::Enemy => "enemy",
            Tag::Camera => "camera",
            Tag::Respawn => "respawn",
            Tag::Finish => "finish",
            Tag::Debug => "debug",
        };
        f.write_str(name)
    }
}

/// Integer layer an entity lives on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Layer(pub u32);

impl Layer {
    /// Layer every entity starts on
    pub const DEFAULT: Layer = Layer(0);

    /// Create a layer from its index
    pub const fn new(index: u32) -> Self {
        Layer(index)
    }

    /// Raw layer index
    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer({})", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        assert_eq!(Tag::default(), Tag::Untagged);
        assert_eq!(Layer::default(), Layer::DEFAULT);
        assert_eq!(Layer::new(3).index(), 3);
    }

    #[test]
    fn test_display() {
        assert_eq!(Tag::Player.to_string(), "player");
        assert_eq!(Layer::new(2).to_string(), "Layer(2)");
    }
}
