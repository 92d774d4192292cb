//! Damage sources, the base hurt routine, and fire.

use bevy_ecs::prelude::*;

use crate::attributes::{AttributeKind, AttributeMap};
use crate::components::*;
use crate::game_world::{push_event, GameEvent, TickCounter};
use crate::hooks::{hooks_of, SoundKind};

/// Ticks after a hit during which further damage is ignored.
pub const INVULNERABILITY_TICKS: u64 = 10;

/// Damage per second while burning.
pub const FIRE_DAMAGE: f32 = 1.0;

/// Melee damage removed by the weakness effect.
pub const WEAKNESS_PENALTY: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Melee,
    Projectile,
    Magic,
    Explosion,
    Fire,
    Fall,
    Generic,
}

/// Where a hit came from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DamageSource {
    pub kind: DamageKind,
    /// Bypasses armor.
    pub unblockable: bool,
    /// The entity that physically delivered the hit (arrow, fireball, fist).
    pub immediate: Option<Entity>,
    /// The entity responsible for the hit (the archer, the caster).
    pub attacker: Option<Entity>,
}

impl DamageSource {
    fn new(kind: DamageKind, immediate: Option<Entity>, attacker: Option<Entity>) -> Self {
        Self {
            kind,
            unblockable: false,
            immediate,
            attacker,
        }
    }

    pub fn melee(attacker: Entity) -> Self {
        Self::new(DamageKind::Melee, Some(attacker), Some(attacker))
    }

    pub fn projectile(projectile: Option<Entity>, shooter: Option<Entity>) -> Self {
        Self::new(DamageKind::Projectile, projectile, shooter)
    }

    pub fn magic(caster: Option<Entity>) -> Self {
        Self::new(DamageKind::Magic, caster, caster)
    }

    pub fn explosion(source: Option<Entity>) -> Self {
        Self::new(DamageKind::Explosion, source, source)
    }

    pub fn fire() -> Self {
        Self::new(DamageKind::Fire, None, None).bypass_armor()
    }

    pub fn fall() -> Self {
        Self::new(DamageKind::Fall, None, None).bypass_armor()
    }

    pub fn generic() -> Self {
        Self::new(DamageKind::Generic, None, None)
    }

    pub fn bypass_armor(mut self) -> Self {
        self.unblockable = true;
        self
    }
}

/// `damage_after = damage * (1.0 - min(20, armor) / 25.0)`
pub fn apply_armor_reduction(damage: f32, armor: f32) -> f32 {
    let effective = armor.clamp(0.0, 20.0);
    damage * (1.0 - effective / 25.0)
}

/// Melee damage a mob deals: its attack attribute, reduced while weakened.
pub fn melee_damage(world: &World, entity: Entity) -> f32 {
    let base = world
        .get::<AttributeMap>(entity)
        .map_or(0.0, |a| a.value(AttributeKind::AttackDamage) as f32);
    let weakened = world
        .get::<ActiveEffects>(entity)
        .is_some_and(|e| e.has(EffectKind::Weakness));
    if weakened {
        (base - WEAKNESS_PENALTY).max(0.0)
    } else {
        base
    }
}

/// Route a hit through the target's archetype hooks.
pub fn attack_entity(world: &mut World, target: Entity, source: DamageSource, amount: f32) -> bool {
    if world.get::<Mob>(target).is_none() {
        return false;
    }
    hooks_of(world, target).attack_from(world, target, &source, amount)
}

/// Base hurt routine shared by every archetype: invulnerability frames,
/// fire immunity, armor, health bookkeeping and death.
pub fn hurt(world: &mut World, entity: Entity, source: &DamageSource, amount: f32) -> bool {
    if world.get::<Dead>(entity).is_some() {
        return false;
    }
    if source.kind == DamageKind::Fire && world.get::<FireImmune>(entity).is_some() {
        return false;
    }

    let tick = world.resource::<TickCounter>().0;
    if let Some(LastDamageTick(Some(last))) = world.get::<LastDamageTick>(entity).copied() {
        if tick.saturating_sub(last) < INVULNERABILITY_TICKS {
            return false;
        }
    }

    let armor = world
        .get::<AttributeMap>(entity)
        .map_or(0.0, |a| a.value(AttributeKind::Armor) as f32);
    let dealt = if source.unblockable {
        amount
    } else {
        apply_armor_reduction(amount, armor)
    };

    let Some(mut health) = world.get_mut::<Health>(entity) else {
        return false;
    };
    health.current = (health.current - dealt).max(0.0);
    let new_health = health.current;

    world.entity_mut(entity).insert(LastDamageTick(Some(tick)));

    if let Some(attacker) = source.attacker.filter(|a| *a != entity) {
        if let Some(rid) = world.get::<EntityId>(attacker).map(|e| e.runtime_id) {
            world.entity_mut(entity).insert(LastHurtBy {
                entity: attacker,
                runtime_id: rid,
                tick,
            });
        }
    }

    let Some(eid) = world.get::<EntityId>(entity).cloned() else {
        return true;
    };
    let hooks = hooks_of(world, entity);

    if new_health <= 0.0 {
        let experience = world.get::<Experience>(entity).map_or(0, |x| x.0);
        if let Some(sound) = hooks.sound(world, entity, SoundKind::Death) {
            push_event(world, GameEvent::MobSound { runtime_id: eid.runtime_id, sound });
        }
        push_event(
            world,
            GameEvent::MobDied {
                runtime_id: eid.runtime_id,
                unique_id: eid.unique_id,
                experience,
                loot_table: hooks.loot_table(),
            },
        );
        world.entity_mut(entity).insert(Dead);
    } else {
        if let Some(sound) = hooks.sound(world, entity, SoundKind::Hurt) {
            push_event(world, GameEvent::MobSound { runtime_id: eid.runtime_id, sound });
        }
        push_event(
            world,
            GameEvent::MobHurt {
                runtime_id: eid.runtime_id,
                new_health,
                tick,
            },
        );
    }
    true
}

/// Set an entity on fire for `seconds`. A longer existing burn is kept.
pub fn set_fire(world: &mut World, entity: Entity, seconds: u32) {
    let Some(runtime_id) = world.get::<EntityId>(entity).map(|e| e.runtime_id) else {
        return;
    };
    let ticks = seconds * 20;
    let ticks = match world.get_mut::<OnFire>(entity) {
        Some(mut fire) => {
            fire.ticks = fire.ticks.max(ticks);
            fire.ticks
        }
        None => {
            world.entity_mut(entity).insert(OnFire { ticks });
            ticks
        }
    };
    push_event(world, GameEvent::EntityIgnited { runtime_id, ticks });
}

/// Count burn timers down, dealing fire damage once per second.
pub fn system_burning(world: &mut World) {
    let burning: Vec<(Entity, u32)> = {
        let mut q = world.query_filtered::<(Entity, &mut OnFire), (With<Mob>, Without<Dead>)>();
        q.iter_mut(world)
            .map(|(entity, mut fire)| {
                fire.ticks = fire.ticks.saturating_sub(1);
                (entity, fire.ticks)
            })
            .collect()
    };

    for (entity, remaining) in burning {
        if remaining % 20 == 0 {
            attack_entity(world, entity, DamageSource::fire(), FIRE_DAMAGE);
        }
        if remaining == 0 {
            world.entity_mut(entity).remove::<OnFire>();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game_world::GameWorld;

    #[test]
    fn armor_reduction_formula() {
        assert!((apply_armor_reduction(10.0, 20.0) - 2.0).abs() < 0.001);
        assert!((apply_armor_reduction(10.0, 30.0) - 2.0).abs() < 0.001);
        assert_eq!(apply_armor_reduction(10.0, 0.0), 10.0);
    }

    #[test]
    fn hurt_applies_armor_unless_unblockable() {
        let mut gw = GameWorld::with_seed(1, 1);
        let (_, rid) = gw.spawn_mob("minecraft:zombie", 0.0, 4.0, 0.0).unwrap();
        let zombie = gw.mob_entity(rid).unwrap();
        gw.world
            .get_mut::<AttributeMap>(zombie)
            .unwrap()
            .register(AttributeKind::Armor)
            .unwrap()
            .set_base(5.0);

        assert!(hurt(&mut gw.world, zombie, &DamageSource::generic(), 10.0));
        assert!((gw.world.get::<Health>(zombie).unwrap().current - 12.0).abs() < 0.001);

        gw.world.entity_mut(zombie).insert(LastDamageTick(None));
        assert!(hurt(&mut gw.world, zombie, &DamageSource::generic().bypass_armor(), 10.0));
        assert!((gw.world.get::<Health>(zombie).unwrap().current - 2.0).abs() < 0.001);
    }

    #[test]
    fn invulnerability_frames() {
        let mut gw = GameWorld::with_seed(1, 1);
        let (_, rid) = gw.spawn_mob("minecraft:zombie", 0.0, 4.0, 0.0).unwrap();
        let zombie = gw.mob_entity(rid).unwrap();

        assert!(hurt(&mut gw.world, zombie, &DamageSource::generic(), 5.0));
        gw.world.resource_mut::<TickCounter>().0 = 5;
        assert!(!hurt(&mut gw.world, zombie, &DamageSource::generic(), 5.0));
        gw.world.resource_mut::<TickCounter>().0 = 10;
        assert!(hurt(&mut gw.world, zombie, &DamageSource::generic(), 5.0));
        assert!((gw.world.get::<Health>(zombie).unwrap().current - 10.0).abs() < 0.001);
    }

    #[test]
    fn fire_immune_ignores_fire() {
        let mut gw = GameWorld::with_seed(1, 1);
        let (_, rid) = gw.spawn_mob("minecraft:blaze", 0.0, 4.0, 0.0).unwrap();
        let blaze = gw.mob_entity(rid).unwrap();
        assert!(!hurt(&mut gw.world, blaze, &DamageSource::fire(), 1.0));
    }

    #[test]
    fn lethal_hit_reports_death() {
        let mut gw = GameWorld::with_seed(1, 1);
        let (_, rid) = gw.spawn_mob("minecraft:cow", 0.0, 4.0, 0.0).unwrap();
        let cow = gw.mob_entity(rid).unwrap();
        gw.drain_events();

        assert!(hurt(&mut gw.world, cow, &DamageSource::generic(), 100.0));
        assert!(gw.world.get::<Dead>(cow).is_some());
        assert!(gw
            .drain_events()
            .iter()
            .any(|e| matches!(e, GameEvent::MobDied { runtime_id, .. } if *runtime_id == rid)));
        assert!(!hurt(&mut gw.world, cow, &DamageSource::generic(), 1.0));
    }

    #[test]
    fn hurt_records_attacker() {
        let mut gw = GameWorld::with_seed(1, 1);
        let player = gw.spawn_player(900, 900, (2.0, 4.0, 0.0), uuid::Uuid::from_u128(9));
        let (_, rid) = gw.spawn_mob("minecraft:zombie", 0.0, 4.0, 0.0).unwrap();
        let zombie = gw.mob_entity(rid).unwrap();

        hurt(&mut gw.world, zombie, &DamageSource::melee(player), 1.0);
        let by = gw.world.get::<LastHurtBy>(zombie).unwrap();
        assert_eq!(by.entity, player);
        assert_eq!(by.runtime_id, 900);
    }

    #[test]
    fn burning_deals_damage_each_second() {
        let mut gw = GameWorld::with_seed(1, 1);
        let (_, rid) = gw.spawn_mob("minecraft:zombie", 0.0, 4.0, 0.0).unwrap();
        let zombie = gw.mob_entity(rid).unwrap();
        set_fire(&mut gw.world, zombie, 1);
        for _ in 0..20 {
            system_burning(&mut gw.world);
        }
        assert!(gw.world.get::<OnFire>(zombie).is_none());
        assert!((gw.world.get::<Health>(zombie).unwrap().current - 19.0).abs() < 0.001);
    }

    #[test]
    fn weakness_reduces_melee() {
        let mut gw = GameWorld::with_seed(1, 1);
        let (_, rid) = gw.spawn_mob("minecraft:zombie", 0.0, 4.0, 0.0).unwrap();
        let zombie = gw.mob_entity(rid).unwrap();
        assert_eq!(melee_damage(&gw.world, zombie), 3.0);
        gw.world
            .get_mut::<ActiveEffects>(zombie)
            .unwrap()
            .add(EffectKind::Weakness, 25);
        assert_eq!(melee_damage(&gw.world, zombie), 0.0);
    }
}
