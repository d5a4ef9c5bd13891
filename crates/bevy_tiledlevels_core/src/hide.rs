//! Named hide predicates deciding whether an override layer is active.
//!
//! A predicate's id is also the layer property that opts a layer into it: a
//! layer with a `hideOnSwitch` property is checked by the `hideOnSwitch`
//! predicate. Any such property turns the layer into an override layer when
//! tables are built.

use bevy::log::debug;

use bevy_tiledlevels_assets::properties::{Properties, PropertyKey};

use crate::state::GameState;

/// Query category a predicate can be exempted from.
///
/// Exemptions break circular lookups: region-based hiding cannot take part
/// in resolving the region it depends on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HideCategory {
    Regions,
    Collisions,
    LevelChanges,
    TileFlags,
}

/// Inputs of a predicate evaluation.
pub struct HideContext<'a> {
    pub state: &'a dyn GameState,
    /// Current map level.
    pub level: i32,
    /// Region under the player, resolved without region-exempt predicates.
    pub player_region: Option<i32>,
}

pub type HidePredicate = dyn Fn(&Properties, &HideContext<'_>) -> bool + Send + Sync;

struct HideRule {
    id: String,
    predicate: Box<HidePredicate>,
    exempt: Vec<HideCategory>,
}

/// Compile-time registration of an extra hide predicate.
///
/// ```ignore
/// fn hide_at_night(props: &Properties, ctx: &HideContext<'_>) -> bool {
///     ctx.state.switch(props.get_int("hideAtNight").unwrap_or(0) as u32)
/// }
///
/// inventory::submit! {
///     HidePredicateRegistration { id: "hideAtNight", predicate: hide_at_night, exempt: &[] }
/// }
/// ```
pub struct HidePredicateRegistration {
    pub id: &'static str,
    pub predicate: fn(&Properties, &HideContext<'_>) -> bool,
    pub exempt: &'static [HideCategory],
}

inventory::collect!(HidePredicateRegistration);

/// Registry of hide predicates, evaluated in registration order.
pub struct HideRuleEngine {
    rules: Vec<HideRule>,
}

impl Default for HideRuleEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for HideRuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| &rule.id))
            .finish()
    }
}

impl HideRuleEngine {
    /// An engine without any predicate.
    pub fn empty() -> Self {
        Self { rules: Vec::new() }
    }

    /// An engine holding the built-in predicates.
    pub fn new() -> Self {
        let mut engine = Self::empty();

        engine.register(PropertyKey::HideOnSwitch.as_str(), &[], |props, ctx| {
            switch_of(props, PropertyKey::HideOnSwitch).is_some_and(|id| ctx.state.switch(id))
        });
        engine.register(PropertyKey::ShowOnSwitch.as_str(), &[], |props, ctx| {
            switch_of(props, PropertyKey::ShowOnSwitch).is_some_and(|id| !ctx.state.switch(id))
        });
        engine.register(PropertyKey::HideOnLevel.as_str(), &[], |props, ctx| {
            props.get_int(PropertyKey::HideOnLevel) == Some(ctx.level)
        });
        engine.register(PropertyKey::ShowOnLevel.as_str(), &[], |props, ctx| {
            props
                .get_int(PropertyKey::ShowOnLevel)
                .is_some_and(|level| level != ctx.level)
        });
        for key in [PropertyKey::HideOnRegion, PropertyKey::HideOnRegions] {
            engine.register(key.as_str(), &[HideCategory::Regions], move |props, ctx| {
                ctx.player_region
                    .is_some_and(|region| props.get_int_list(key).contains(&region))
            });
        }

        engine
    }

    /// Built-in predicates plus every inventory submission.
    pub fn build() -> Self {
        let mut engine = Self::new();
        for registration in inventory::iter::<HidePredicateRegistration> {
            engine.register(registration.id, registration.exempt, registration.predicate);
        }
        debug!("HideRuleEngine built with {} predicates", engine.len());
        engine
    }

    /// Register `predicate` under `id`, replacing a previous one with that id.
    pub fn register<F>(&mut self, id: &str, exempt: &[HideCategory], predicate: F)
    where
        F: Fn(&Properties, &HideContext<'_>) -> bool + Send + Sync + 'static,
    {
        let rule = HideRule {
            id: id.to_string(),
            predicate: Box::new(predicate),
            exempt: exempt.to_vec(),
        };
        match self.rules.iter_mut().find(|existing| existing.id == id) {
            Some(existing) => *existing = rule,
            None => self.rules.push(rule),
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.rules.iter().any(|rule| rule.id == id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.rules.iter().map(|rule| rule.id.as_str())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Whether `props` opt into any registered predicate.
    pub fn has_hide_property(&self, props: &Properties) -> bool {
        self.rules.iter().any(|rule| props.contains(&rule.id))
    }

    /// Whether a layer with `props` is hidden for `category`.
    ///
    /// Predicates the layer does not opt into, and predicates exempt from
    /// `category`, are skipped.
    pub fn is_hidden(
        &self,
        props: &Properties,
        category: HideCategory,
        ctx: &HideContext<'_>,
    ) -> bool {
        self.rules.iter().any(|rule| {
            props.contains(&rule.id)
                && !rule.exempt.contains(&category)
                && (rule.predicate)(props, ctx)
        })
    }
}

fn switch_of(props: &Properties, key: PropertyKey) -> Option<u32> {
    props.get_int(key).and_then(|id| u32::try_from(id).ok())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::GameVariables;
    use tiled::PropertyValue;

    fn ctx(state: &GameVariables, level: i32, region: Option<i32>) -> HideContext<'_> {
        HideContext {
            state,
            level,
            player_region: region,
        }
    }

    fn int(key: &str, value: i32) -> Properties {
        Properties::new().with(key, PropertyValue::IntValue(value))
    }

    #[test]
    fn test_switch_predicates() {
        let engine = HideRuleEngine::new();
        let on = GameVariables::new().with_switch(4, true);
        let off = GameVariables::new();

        let hide = int("hideOnSwitch", 4);
        let show = int("showOnSwitch", 4);

        assert!(engine.is_hidden(&hide, HideCategory::Collisions, &ctx(&on, 0, None)));
        assert!(!engine.is_hidden(&hide, HideCategory::Collisions, &ctx(&off, 0, None)));
        assert!(!engine.is_hidden(&show, HideCategory::Collisions, &ctx(&on, 0, None)));
        assert!(engine.is_hidden(&show, HideCategory::Collisions, &ctx(&off, 0, None)));
    }

    #[test]
    fn test_level_predicates() {
        let engine = HideRuleEngine::new();
        let state = GameVariables::new();

        let hide = int("hideOnLevel", 1);
        let show = int("showOnLevel", 1);

        assert!(engine.is_hidden(&hide, HideCategory::TileFlags, &ctx(&state, 1, None)));
        assert!(!engine.is_hidden(&hide, HideCategory::TileFlags, &ctx(&state, 0, None)));
        assert!(!engine.is_hidden(&show, HideCategory::TileFlags, &ctx(&state, 1, None)));
        assert!(engine.is_hidden(&show, HideCategory::TileFlags, &ctx(&state, 2, None)));
    }

    #[test]
    fn test_region_predicate_is_exempt_from_regions() {
        let engine = HideRuleEngine::new();
        let state = GameVariables::new();
        let props = Properties::new().with(
            "hideOnRegions",
            PropertyValue::StringValue("3,7".into()),
        );

        assert!(engine.is_hidden(&props, HideCategory::Collisions, &ctx(&state, 0, Some(7))));
        assert!(!engine.is_hidden(&props, HideCategory::Collisions, &ctx(&state, 0, Some(2))));
        assert!(!engine.is_hidden(&props, HideCategory::Regions, &ctx(&state, 0, Some(7))));
    }

    #[test]
    fn test_unknown_properties_are_not_hidden() {
        let engine = HideRuleEngine::new();
        let state = GameVariables::new().with_switch(1, true);
        let props = int("hideOnSwich", 1);

        assert!(!engine.has_hide_property(&props));
        assert!(!engine.is_hidden(&props, HideCategory::Collisions, &ctx(&state, 0, None)));
    }

    #[test]
    fn test_register_custom_predicate() {
        let mut engine = HideRuleEngine::new();
        engine.register("hideOnVariable", &[], |props, ctx| {
            props
                .get_int("hideOnVariable")
                .is_some_and(|id| ctx.state.variable(id as u32) > 0)
        });
        let props = int("hideOnVariable", 9);
        let state = GameVariables::new().with_variable(9, 1);

        assert!(engine.has_hide_property(&props));
        assert!(engine.is_hidden(&props, HideCategory::Regions, &ctx(&state, 0, None)));
    }
}
