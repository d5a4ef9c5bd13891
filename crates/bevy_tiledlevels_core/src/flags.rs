//! Tile flag registry and bit-packed per-cell flag groups.
//!
//! Every flag name gets a bit index starting at 1. Index `i` lives in 16-bit
//! group `i / 16` at bit `1 << (i % 16)`. Tiles opt into a flag with a
//! `flagIs<Name>` tile property (see [`flag_property_key`]).
//!
//! Extra flags can be registered at startup through the plugin config or
//! at compile time:
//!
//! ```ignore
//! inventory::submit! {
//!     bevy_tiledlevels_core::flags::TileFlagRegistration { name: "swamp" }
//! }
//! ```

use std::collections::HashMap;

use bevy::log::debug;

/// Flags every registry starts with, in bit-index order (1..=13).
pub const BUILTIN_FLAGS: [&str; 13] = [
    "boat",
    "ship",
    "airship",
    "ladder",
    "bush",
    "counter",
    "damage",
    "ice",
    "autoDown",
    "autoLeft",
    "autoRight",
    "autoUp",
    "heal",
];

/// Compile-time registration of an extra tile flag.
pub struct TileFlagRegistration {
    pub name: &'static str,
}

inventory::collect!(TileFlagRegistration);

/// Group and bit of a flag inside [`TileFlags`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FlagLocation {
    pub group: usize,
    pub bit: u16,
}

impl FlagLocation {
    pub const fn from_index(index: u32) -> Self {
        Self {
            group: (index / 16) as usize,
            bit: 1 << (index % 16),
        }
    }
}

/// A flag referenced by name or by bit index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlagRef<'a> {
    Name(&'a str),
    Index(u32),
}

impl<'a> From<&'a str> for FlagRef<'a> {
    fn from(name: &'a str) -> Self {
        FlagRef::Name(name)
    }
}

impl From<u32> for FlagRef<'_> {
    fn from(index: u32) -> Self {
        FlagRef::Index(index)
    }
}

/// Tile property key enabling flag `name`: `"flagIs"` + name with its first
/// character upper-cased (`"autoDown"` -> `"flagIsAutoDown"`).
pub fn flag_property_key(name: &str) -> String {
    let mut chars = name.chars();
    let mut key = String::with_capacity(6 + name.len());
    key.push_str("flagIs");
    if let Some(first) = chars.next() {
        key.extend(first.to_uppercase());
        key.push_str(chars.as_str());
    }
    key
}

/// Name to bit-index mapping.
///
/// Populated once while the plugin builds, read-only afterwards.
#[derive(Debug, Clone)]
pub struct FlagRegistry {
    by_name: HashMap<String, u32>,
    /// `entries[i]` is the flag with index `i + 1` and its property key.
    entries: Vec<(String, String)>,
}

impl Default for FlagRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl FlagRegistry {
    /// Registry holding the built-in flags.
    pub fn new() -> Self {
        let mut registry = Self {
            by_name: HashMap::new(),
            entries: Vec::new(),
        };
        for name in BUILTIN_FLAGS {
            registry.register(name);
        }
        registry
    }

    /// Built-in flags, then `custom` names, then every inventory submission.
    pub fn build(custom: &[String]) -> Self {
        let mut registry = Self::new();
        for name in custom {
            registry.register(name);
        }
        for registration in inventory::iter::<TileFlagRegistration> {
            registry.register(registration.name);
        }
        debug!("FlagRegistry built with {} flags", registry.len());
        registry
    }

    /// Register `name`, returning its bit index. Re-registering is a no-op.
    pub fn register(&mut self, name: &str) -> u32 {
        if let Some(index) = self.by_name.get(name) {
            return *index;
        }
        let index = self.entries.len() as u32 + 1;
        self.entries
            .push((name.to_string(), flag_property_key(name)));
        self.by_name.insert(name.to_string(), index);
        index
    }

    pub fn index_of(&self, name: &str) -> Option<u32> {
        self.by_name.get(name).copied()
    }

    /// Location of a registered flag; `None` for unknown names.
    pub fn location(&self, name: &str) -> Option<FlagLocation> {
        self.index_of(name).map(FlagLocation::from_index)
    }

    /// Location of a flag given by name or index.
    ///
    /// Indices are accepted only if registered.
    pub fn resolve(&self, flag: FlagRef<'_>) -> Option<FlagLocation> {
        match flag {
            FlagRef::Name(name) => self.location(name),
            FlagRef::Index(index) if index >= 1 && index as usize <= self.entries.len() => {
                Some(FlagLocation::from_index(index))
            }
            FlagRef::Index(_) => None,
        }
    }

    /// `(name, property key, location)` of every flag, in index order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str, FlagLocation)> {
        self.entries.iter().enumerate().map(|(i, (name, key))| {
            (
                name.as_str(),
                key.as_str(),
                FlagLocation::from_index(i as u32 + 1),
            )
        })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Per-cell flag bits, one `u16` per group.
///
/// Groups grow on demand; a missing group reads as all-zero.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TileFlags(Vec<u16>);

impl TileFlags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, location: FlagLocation) {
        if self.0.len() <= location.group {
            self.0.resize(location.group + 1, 0);
        }
        self.0[location.group] |= location.bit;
    }

    pub fn contains(&self, location: FlagLocation) -> bool {
        self.0
            .get(location.group)
            .is_some_and(|group| group & location.bit != 0)
    }

    /// Group-wise OR, growing to the longer of the two.
    pub fn union_with(&mut self, other: &TileFlags) {
        if self.0.len() < other.0.len() {
            self.0.resize(other.0.len(), 0);
        }
        for (mine, theirs) in self.0.iter_mut().zip(&other.0) {
            *mine |= theirs;
        }
    }

    pub fn groups(&self) -> &[u16] {
        &self.0
    }

    /// No flag set in any group.
    pub fn is_empty(&self) -> bool {
        self.0.iter().all(|group| *group == 0)
    }
}

impl From<Vec<u16>> for TileFlags {
    fn from(groups: Vec<u16>) -> Self {
        Self(groups)
    }
}
