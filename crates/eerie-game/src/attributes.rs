//! Entity attributes: base values plus stacked modifiers.
//!
//! Modifier math: all `Add` modifiers are summed onto the base, then every
//! `MultiplyBase` modifier adds `amount * that sum`, then each `MultiplyTotal`
//! scales the running result by `1 + amount`. The result is clamped to the
//! attribute's range.

use std::collections::HashMap;

use bevy_ecs::prelude::*;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AttributeKind {
    MaxHealth,
    FollowRange,
    MovementSpeed,
    AttackDamage,
    Armor,
}

impl AttributeKind {
    pub const ALL: [AttributeKind; 5] = [
        AttributeKind::MaxHealth,
        AttributeKind::FollowRange,
        AttributeKind::MovementSpeed,
        AttributeKind::AttackDamage,
        AttributeKind::Armor,
    ];

    /// Name under which the slot is saved.
    pub fn key(self) -> &'static str {
        match self {
            AttributeKind::MaxHealth => "minecraft:health",
            AttributeKind::FollowRange => "minecraft:follow_range",
            AttributeKind::MovementSpeed => "minecraft:movement",
            AttributeKind::AttackDamage => "minecraft:attack_damage",
            AttributeKind::Armor => "minecraft:armor",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|k| k.key() == key)
    }

    /// Value range every computed value is clamped to.
    pub fn range(self) -> (f64, f64) {
        match self {
            AttributeKind::MaxHealth => (1.0, 1024.0),
            AttributeKind::FollowRange => (0.0, 2048.0),
            AttributeKind::MovementSpeed => (0.0, 1024.0),
            AttributeKind::AttackDamage => (0.0, 2048.0),
            AttributeKind::Armor => (0.0, 30.0),
        }
    }

    /// Base value of a freshly registered slot.
    pub fn default_value(self) -> f64 {
        match self {
            AttributeKind::MaxHealth => 20.0,
            AttributeKind::FollowRange => 32.0,
            AttributeKind::MovementSpeed => 0.7,
            AttributeKind::AttackDamage => 2.0,
            AttributeKind::Armor => 0.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModifierOp {
    Add,
    MultiplyBase,
    MultiplyTotal,
}

impl ModifierOp {
    pub fn id(self) -> i32 {
        match self {
            ModifierOp::Add => 0,
            ModifierOp::MultiplyBase => 1,
            ModifierOp::MultiplyTotal => 2,
        }
    }

    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            0 => Some(ModifierOp::Add),
            1 => Some(ModifierOp::MultiplyBase),
            2 => Some(ModifierOp::MultiplyTotal),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeModifier {
    pub id: Uuid,
    pub name: String,
    pub amount: f64,
    pub op: ModifierOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeInstance {
    pub base: f64,
    modifiers: Vec<AttributeModifier>,
    kind: AttributeKind,
}

impl AttributeInstance {
    pub fn new(kind: AttributeKind) -> Self {
        Self {
            base: kind.default_value(),
            modifiers: Vec::new(),
            kind,
        }
    }

    pub fn set_base(&mut self, value: f64) {
        self.base = value;
    }

    /// Apply a modifier, replacing any modifier with the same id.
    pub fn apply_modifier(&mut self, modifier: AttributeModifier) {
        self.remove_modifier(modifier.id);
        self.modifiers.push(modifier);
    }

    pub fn remove_modifier(&mut self, id: Uuid) {
        self.modifiers.retain(|m| m.id != id);
    }

    pub fn modifiers(&self) -> &[AttributeModifier] {
        &self.modifiers
    }

    /// Base value with all modifiers applied, clamped to the attribute range.
    pub fn value(&self) -> f64 {
        let ops = |op: ModifierOp| self.modifiers.iter().filter(move |m| m.op == op);

        let added = self.base + ops(ModifierOp::Add).map(|m| m.amount).sum::<f64>();
        let mut total = added + ops(ModifierOp::MultiplyBase).map(|m| added * m.amount).sum::<f64>();
        for m in ops(ModifierOp::MultiplyTotal) {
            total *= 1.0 + m.amount;
        }
        let (min, max) = self.kind.range();
        total.clamp(min, max)
    }
}

/// All attribute slots of one entity.
#[derive(Component, Debug, Clone, Default)]
pub struct AttributeMap {
    slots: HashMap<AttributeKind, AttributeInstance>,
    locked: bool,
}

impl AttributeMap {
    /// Map with the given slots at their default values.
    pub fn with_slots(kinds: &[AttributeKind]) -> Self {
        let mut map = Self::default();
        for &kind in kinds {
            map.slots.insert(kind, AttributeInstance::new(kind));
        }
        map
    }

    /// A map that refuses new slots. Player mirrors use this: their attributes
    /// belong to the player connection, not to mob configuration.
    pub fn locked(mut self) -> Self {
        self.locked = true;
        self
    }

    pub fn get(&self, kind: AttributeKind) -> Option<&AttributeInstance> {
        self.slots.get(&kind)
    }

    pub fn get_mut(&mut self, kind: AttributeKind) -> Option<&mut AttributeInstance> {
        self.slots.get_mut(&kind)
    }

    /// Existing slot, or a newly registered one. `None` only if the slot is
    /// absent and the map is locked.
    pub fn register(&mut self, kind: AttributeKind) -> Option<&mut AttributeInstance> {
        if self.locked && !self.slots.contains_key(&kind) {
            return None;
        }
        Some(
            self.slots
                .entry(kind)
                .or_insert_with(|| AttributeInstance::new(kind)),
        )
    }

    /// Computed value, or 0 when the slot does not exist.
    pub fn value(&self, kind: AttributeKind) -> f64 {
        self.slots.get(&kind).map_or(0.0, AttributeInstance::value)
    }

    pub fn has(&self, kind: AttributeKind) -> bool {
        self.slots.contains_key(&kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = (AttributeKind, &AttributeInstance)> {
        self.slots.iter().map(|(&kind, inst)| (kind, inst))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add_mod(id: u128, amount: f64) -> AttributeModifier {
        AttributeModifier {
            id: Uuid::from_u128(id),
            name: "test".into(),
            amount,
            op: ModifierOp::Add,
        }
    }

    #[test]
    fn additive_modifiers_stack() {
        let mut inst = AttributeInstance::new(AttributeKind::Armor);
        inst.set_base(4.0);
        inst.apply_modifier(add_mod(1, 2.0));
        inst.apply_modifier(add_mod(2, 3.0));
        assert_eq!(inst.value(), 9.0);
    }

    #[test]
    fn same_id_replaces() {
        let mut inst = AttributeInstance::new(AttributeKind::MaxHealth);
        inst.set_base(20.0);
        inst.apply_modifier(add_mod(1, 10.0));
        inst.apply_modifier(add_mod(1, 10.0));
        assert_eq!(inst.value(), 30.0);
        assert_eq!(inst.modifiers().len(), 1);
    }

    #[test]
    fn multiply_ops() {
        let mut inst = AttributeInstance::new(AttributeKind::AttackDamage);
        inst.set_base(4.0);
        inst.apply_modifier(add_mod(1, 1.0));
        inst.apply_modifier(AttributeModifier {
            id: Uuid::from_u128(2),
            name: "base".into(),
            amount: 0.5,
            op: ModifierOp::MultiplyBase,
        });
        inst.apply_modifier(AttributeModifier {
            id: Uuid::from_u128(3),
            name: "total".into(),
            amount: 1.0,
            op: ModifierOp::MultiplyTotal,
        });
        // (4 + 1) = 5, + 5 * 0.5 = 7.5, * 2 = 15
        assert_eq!(inst.value(), 15.0);
    }

    #[test]
    fn value_clamped_to_range() {
        let mut inst = AttributeInstance::new(AttributeKind::Armor);
        inst.set_base(100.0);
        assert_eq!(inst.value(), 30.0);
        inst.set_base(-5.0);
        assert_eq!(inst.value(), 0.0);
    }

    #[test]
    fn register_creates_missing_slot() {
        let mut map = AttributeMap::with_slots(&[AttributeKind::MaxHealth]);
        assert!(!map.has(AttributeKind::Armor));
        map.register(AttributeKind::Armor).unwrap().set_base(3.0);
        assert_eq!(map.value(AttributeKind::Armor), 3.0);
    }

    #[test]
    fn keys_and_op_ids_round_trip() {
        for kind in AttributeKind::ALL {
            assert_eq!(AttributeKind::from_key(kind.key()), Some(kind));
        }
        assert_eq!(AttributeKind::from_key("minecraft:luck"), None);
        assert_eq!(ModifierOp::from_id(ModifierOp::MultiplyTotal.id()), Some(ModifierOp::MultiplyTotal));
        assert_eq!(ModifierOp::from_id(7), None);
    }

    #[test]
    fn locked_map_refuses_new_slots() {
        let mut map = AttributeMap::with_slots(&[AttributeKind::MaxHealth]).locked();
        assert!(map.register(AttributeKind::Armor).is_none());
        assert!(map.register(AttributeKind::MaxHealth).is_some());
    }
}
