//! Mob type definitions.
//!
//! Provides a registry of known mob types with their base stats, hitbox
//! dimensions and the archetype whose hooks drive them.

use bevy_ecs::prelude::*;

use crate::hooks::Archetype;

/// Mob category for spawn cap grouping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MobCategory {
    Passive,
    Hostile,
}

/// Definition of a mob type.
#[derive(Debug, Clone)]
pub struct MobDefinition {
    /// Namespaced identifier, e.g. `"eerie:nether_knight"`.
    pub type_id: String,
    pub display_name: String,
    pub category: MobCategory,
    pub archetype: Archetype,
    pub max_health: f32,
    /// Base attack damage (0 for passive mobs).
    pub attack_damage: f32,
    pub movement_speed: f32,
    pub follow_range: f32,
    pub armor: f32,
    pub bb_width: f32,
    pub bb_height: f32,
    pub fire_immune: bool,
}

impl MobDefinition {
    fn vanilla(
        type_id: &str,
        display_name: &str,
        category: MobCategory,
        max_health: f32,
        attack_damage: f32,
        movement_speed: f32,
        bb: (f32, f32),
    ) -> Self {
        Self {
            type_id: type_id.into(),
            display_name: display_name.into(),
            category,
            archetype: Archetype::Vanilla,
            max_health,
            attack_damage,
            movement_speed,
            follow_range: 16.0,
            armor: 0.0,
            bb_width: bb.0,
            bb_height: bb.1,
            fire_immune: false,
        }
    }

    fn fire_immune(mut self) -> Self {
        self.fire_immune = true;
        self
    }
}

/// Registry of supported mob types.
#[derive(Resource)]
pub struct MobRegistry {
    mobs: Vec<MobDefinition>,
}

impl Default for MobRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl MobRegistry {
    /// Build the registry with the custom archetypes and the vanilla mobs
    /// they interact with.
    pub fn new() -> Self {
        use MobCategory::*;

        Self {
            mobs: vec![
                MobDefinition {
                    type_id: "eerie:pumpkin_slime".into(),
                    display_name: "Pumpkin Slime".into(),
                    category: Hostile,
                    archetype: Archetype::PumpkinSlime,
                    max_health: 16.0,
                    attack_damage: 3.0,
                    movement_speed: 0.3,
                    follow_range: 16.0,
                    armor: 0.0,
                    bb_width: 0.99,
                    bb_height: 0.99,
                    fire_immune: false,
                },
                MobDefinition {
                    type_id: "eerie:nether_knight".into(),
                    display_name: "Nether Knight".into(),
                    category: Hostile,
                    archetype: Archetype::NetherKnight,
                    max_health: 40.0,
                    attack_damage: 6.0,
                    movement_speed: 0.25,
                    follow_range: 16.0,
                    armor: 8.0,
                    bb_width: 0.7,
                    bb_height: 2.2,
                    fire_immune: true,
                },
                MobDefinition::vanilla("minecraft:zombie", "Zombie", Hostile, 20.0, 3.0, 0.23, (0.6, 1.95)),
                MobDefinition::vanilla("minecraft:skeleton", "Skeleton", Hostile, 20.0, 2.0, 0.25, (0.6, 1.99)),
                MobDefinition::vanilla(
                    "minecraft:wither_skeleton",
                    "Wither Skeleton",
                    Hostile,
                    20.0,
                    8.0,
                    0.25,
                    (0.7, 2.4),
                )
                .fire_immune(),
                MobDefinition::vanilla("minecraft:blaze", "Blaze", Hostile, 20.0, 6.0, 0.23, (0.6, 1.8))
                    .fire_immune(),
                MobDefinition::vanilla("minecraft:cow", "Cow", Passive, 10.0, 0.0, 0.2, (0.9, 1.4)),
            ],
        }
    }

    /// Look up a mob definition by type ID.
    pub fn get(&self, type_id: &str) -> Option<&MobDefinition> {
        self.mobs.iter().find(|m| m.type_id == type_id)
    }

    pub fn all(&self) -> &[MobDefinition] {
        &self.mobs
    }

    /// Register a mob type, replacing an existing one with the same id.
    pub fn register_mob(&mut self, def: MobDefinition) {
        if let Some(existing) = self.mobs.iter_mut().find(|m| m.type_id == def.type_id) {
            *existing = def;
        } else {
            self.mobs.push(def);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_custom_archetypes() {
        let reg = MobRegistry::new();
        let slime = reg.get("eerie:pumpkin_slime").unwrap();
        assert_eq!(slime.archetype, Archetype::PumpkinSlime);
        let knight = reg.get("eerie:nether_knight").unwrap();
        assert!(knight.fire_immune);
        assert_eq!(knight.category, MobCategory::Hostile);
    }

    #[test]
    fn unknown_type_none() {
        assert!(MobRegistry::new().get("minecraft:enderman").is_none());
    }

    #[test]
    fn register_replaces_same_id() {
        let mut reg = MobRegistry::new();
        let before = reg.all().len();
        let mut cow = reg.get("minecraft:cow").unwrap().clone();
        cow.max_health = 12.0;
        reg.register_mob(cow);
        assert_eq!(reg.all().len(), before);
        assert_eq!(reg.get("minecraft:cow").unwrap().max_health, 12.0);
    }
}
