//! Registries shared by table building and queries.

use bevy::log::info;

use crate::config::TiledLevelsConfig;
use crate::flags::FlagRegistry;
use crate::hide::HideRuleEngine;

/// Tile flags and hide predicates, frozen once the plugin is built.
#[derive(Debug, Default)]
pub struct MapRules {
    pub flags: FlagRegistry,
    pub hide_rules: HideRuleEngine,
}

impl MapRules {
    /// Built-ins, configured custom flags and every inventory submission.
    pub fn build(config: &TiledLevelsConfig) -> Self {
        let rules = Self {
            flags: FlagRegistry::build(&config.custom_tile_flags),
            hide_rules: HideRuleEngine::build(),
        };
        info!(
            "Map rules ready: {} tile flags, {} hide predicates",
            rules.flags.len(),
            rules.hide_rules.len()
        );
        rules
    }
}
