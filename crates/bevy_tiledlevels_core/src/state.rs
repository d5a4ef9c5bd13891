//! Live game state consumed by hide predicates and level storage.

use bevy::platform::collections::{HashMap, HashSet};
use bevy::prelude::*;

/// Read access to the host's switches, variables and player position.
///
/// Implemented by whatever owns the game state; [`GameVariables`] is a
/// ready-made implementation.
pub trait GameState {
    fn switch(&self, id: u32) -> bool;

    fn variable(&self, id: u32) -> i32;

    /// Player position in movement-grid cells, if a player exists.
    fn player_position(&self) -> Option<(i32, i32)>;
}

/// Write access needed when the current level lives in a game variable.
pub trait GameStateMut: GameState {
    fn set_variable(&mut self, id: u32, value: i32);
}

/// Switch and variable store with a tracked player cell.
///
/// Unset switches read as off and unset variables as 0.
#[derive(Resource, Debug, Clone, Default)]
pub struct GameVariables {
    switches: HashSet<u32>,
    variables: HashMap<u32, i32>,
    pub player: Option<(i32, i32)>,
}

impl GameVariables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_switch(&mut self, id: u32, on: bool) {
        if on {
            self.switches.insert(id);
        } else {
            self.switches.remove(&id);
        }
    }

    pub fn with_switch(mut self, id: u32, on: bool) -> Self {
        self.set_switch(id, on);
        self
    }

    pub fn with_variable(mut self, id: u32, value: i32) -> Self {
        self.variables.insert(id, value);
        self
    }

    pub fn with_player(mut self, x: i32, y: i32) -> Self {
        self.player = Some((x, y));
        self
    }
}

impl GameState for GameVariables {
    fn switch(&self, id: u32) -> bool {
        self.switches.contains(&id)
    }

    fn variable(&self, id: u32) -> i32 {
        self.variables.get(&id).copied().unwrap_or(0)
    }

    fn player_position(&self) -> Option<(i32, i32)> {
        self.player
    }
}

impl GameStateMut for GameVariables {
    fn set_variable(&mut self, id: u32, value: i32) {
        self.variables.insert(id, value);
    }
}
