//! Per-tick mob AI: snapshot the world, run each mob's goals, then apply
//! what they asked for.

use bevy_ecs::prelude::*;
use uuid::Uuid;

use crate::attributes::{AttributeKind, AttributeMap};
use crate::combat::{self, DamageSource};
use crate::components::*;
use crate::game_world::{push_event, GameEvent, TickCounter};
use crate::hooks::hooks_of;

use super::behavior::{BehaviorContext, BehaviorOutput, HurtMemory, Sighting};
use super::brain::BehaviorList;
use super::navigation;

struct SeenPlayer {
    sighting: Sighting,
    uuid: Uuid,
}

struct Plan {
    entity: Entity,
    ctx: BehaviorContext,
    stale_target: bool,
}

fn snapshot_players(world: &mut World) -> Vec<SeenPlayer> {
    world
        .query_filtered::<(Entity, &EntityId, &Position, &PlayerProfile), (With<Player>, Without<Dead>)>()
        .iter(world)
        .map(|(entity, id, pos, profile)| SeenPlayer {
            sighting: Sighting {
                entity,
                runtime_id: id.runtime_id,
                position: (pos.x, pos.y, pos.z),
            },
            uuid: profile.uuid,
        })
        .collect()
}

/// A target is seen only while it is alive and still has a position.
fn sight(world: &World, target: AiTarget) -> Option<Sighting> {
    if world.get::<Dead>(target.entity).is_some() {
        return None;
    }
    let pos = world.get::<Position>(target.entity)?;
    Some(Sighting {
        entity: target.entity,
        runtime_id: target.runtime_id,
        position: (pos.x, pos.y, pos.z),
    })
}

fn nearest_player(players: &[SeenPlayer], (x, _, z): (f32, f32, f32), owner: Option<Uuid>) -> Option<Sighting> {
    players
        .iter()
        .filter(|p| Some(p.uuid) != owner)
        .map(|p| {
            let (px, _, pz) = p.sighting.position;
            (navigation::distance_xz(x, z, px, pz), p.sighting)
        })
        .min_by(|a, b| a.0.total_cmp(&b.0))
        .map(|(_, s)| s)
}

fn plan_mobs(world: &mut World, players: &[SeenPlayer]) -> Vec<Plan> {
    let tick = world.resource::<TickCounter>().0;
    let mut query = world.query_filtered::<(
        Entity,
        &Position,
        &AttributeMap,
        &OnGround,
        Option<&AiTarget>,
        Option<&LastHurtBy>,
    ), (With<Mob>, With<BehaviorList>, Without<Dead>)>();

    let w = &*world;
    query
        .iter(w)
        .map(|(entity, pos, attrs, on_ground, target, hurt_by)| {
            let position = (pos.x, pos.y, pos.z);
            let seen_target = target.and_then(|t| sight(w, *t));
            let owner = hooks_of(w, entity).owner(w, entity);
            Plan {
                entity,
                stale_target: target.is_some() && seen_target.is_none(),
                ctx: BehaviorContext {
                    position,
                    speed: attrs.value(AttributeKind::MovementSpeed) as f32,
                    on_ground: on_ground.0,
                    tick,
                    follow_range: attrs.value(AttributeKind::FollowRange) as f32,
                    hurt_by: hurt_by.map(|h| HurtMemory {
                        attacker: AiTarget {
                            entity: h.entity,
                            runtime_id: h.runtime_id,
                        },
                        tick: h.tick,
                    }),
                    target: seen_target,
                    nearest_player: nearest_player(players, position, owner),
                },
            }
        })
        .collect()
}

/// Runs goal evaluation for every live mob that has a goal list.
pub fn system_ai_tick(world: &mut World) {
    let players = snapshot_players(world);
    let plans = plan_mobs(world, &players);

    let mut wanted = Vec::with_capacity(plans.len());
    for plan in plans {
        if plan.stale_target {
            world.entity_mut(plan.entity).remove::<AiTarget>();
        }
        if let Some(mut goals) = world.get_mut::<BehaviorList>(plan.entity) {
            wanted.push((plan.entity, goals.evaluate(&plan.ctx), plan.ctx.speed));
        }
    }

    for (entity, output, speed) in wanted {
        apply_output(world, &players, entity, output, speed);
    }
}

fn steer(world: &mut World, entity: Entity, output: &BehaviorOutput, speed: f32) {
    let pos = world.get::<Position>(entity).copied();
    let (vx, vz) = match (output.move_to, pos) {
        (Some((gx, _, gz)), Some(pos)) => navigation::move_toward_flat(pos.x, pos.z, gx, gz, speed),
        _ => (0.0, 0.0),
    };
    if output.move_to.is_some() {
        if let Some(mut vel) = world.get_mut::<Velocity>(entity) {
            vel.x = vx;
            vel.z = vz;
        }
    }
    if let Some(mut input) = world.get_mut::<MoveInput>(entity) {
        let forward = if vx != 0.0 || vz != 0.0 { speed } else { 0.0 };
        *input = MoveInput {
            forward,
            ..Default::default()
        };
    }
    if let Some(yaw) = output.face {
        if let Some(mut rot) = world.get_mut::<Rotation>(entity) {
            rot.yaw = yaw;
            rot.head_yaw = yaw;
        }
    }
}

fn apply_output(world: &mut World, players: &[SeenPlayer], entity: Entity, output: BehaviorOutput, speed: f32) {
    if world.get::<Dead>(entity).is_some() {
        return;
    }
    // Anchored mobs keep their goals but never move or turn.
    if world.get::<Anchored>(entity).is_none() {
        steer(world, entity, &output, speed);
    }

    if let Some(target) = output.set_target {
        world.entity_mut(entity).insert(target);
    }
    if output.clear_target {
        world.entity_mut(entity).remove::<AiTarget>();
    }
    if output.attack {
        swing(world, players, entity);
    }
}

/// Melee hit on the current target. Players get an event for the network
/// layer; mobs take the damage directly.
fn swing(world: &mut World, players: &[SeenPlayer], entity: Entity) {
    let Some(target) = world.get::<AiTarget>(entity).copied() else {
        return;
    };
    let hooks = hooks_of(world, entity);
    let damage = hooks.melee_damage(world, entity);

    let Some(player) = players.iter().find(|p| p.sighting.entity == target.entity) else {
        combat::attack_entity(world, target.entity, DamageSource::melee(entity), damage);
        return;
    };
    if !hooks.can_damage_player(world, entity) {
        return;
    }
    let (Some(id), Some(pos)) = (world.get::<EntityId>(entity), world.get::<Position>(entity)) else {
        return;
    };
    let mob_runtime_id = id.runtime_id;
    let (px, _, pz) = player.sighting.position;
    let (dx, dz) = (px - pos.x, pz - pos.z);
    let len = (dx * dx + dz * dz).sqrt().max(0.01);
    push_event(
        world,
        GameEvent::MobAttackPlayer {
            mob_runtime_id,
            target_runtime_id: player.sighting.runtime_id,
            damage,
            knockback: (dx / len * 0.4, 0.4, dz / len * 0.4),
        },
    );
}
