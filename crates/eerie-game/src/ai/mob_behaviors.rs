//! Per-archetype behavior lists.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::hooks::Archetype;

use super::behavior::Behavior;
use super::behaviors::*;

/// Create the behavior list for a mob. Wandering draws from its own stream
/// seeded off `rng`, so a seeded world replays the same walks.
pub fn create_behaviors(archetype: Archetype, type_id: &str, rng: &mut impl Rng) -> Vec<Box<dyn Behavior>> {
    let stroll = RandomStroll::new(7, StdRng::seed_from_u64(rng.gen()));
    match (archetype, type_id) {
        // Short reach: the slime has to bump into its target.
        (Archetype::PumpkinSlime, _) => vec![
            Box::new(HurtByTarget::new()),
            Box::new(NearestAttackableTarget::new()),
            Box::new(MeleeAttack::new(20, 1.2)),
            Box::new(stroll),
            Box::new(LookAtPlayer::new(8.0)),
        ],
        (Archetype::NetherKnight, _)
        | (
            Archetype::Vanilla,
            "minecraft:zombie" | "minecraft:skeleton" | "minecraft:wither_skeleton" | "minecraft:blaze",
        ) => vec![
            Box::new(HurtByTarget::new()),
            Box::new(NearestAttackableTarget::new()),
            Box::new(MeleeAttack::new(20, 2.0)),
            Box::new(stroll),
            Box::new(LookAtPlayer::new(8.0)),
        ],
        _ => vec![Box::new(stroll), Box::new(LookAtPlayer::new(8.0))],
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::behavior::Slot;

    fn has_target_selector(behaviors: &[Box<dyn Behavior>]) -> bool {
        behaviors
            .iter()
            .any(|b| b.slot() == Slot::Target)
    }

    fn goals(archetype: Archetype, type_id: &str) -> Vec<Box<dyn Behavior>> {
        create_behaviors(archetype, type_id, &mut StdRng::seed_from_u64(0))
    }

    #[test]
    fn hostiles_have_target_selectors() {
        assert!(has_target_selector(&goals(Archetype::PumpkinSlime, "eerie:pumpkin_slime")));
        assert!(has_target_selector(&goals(Archetype::NetherKnight, "eerie:nether_knight")));
        assert!(has_target_selector(&goals(Archetype::Vanilla, "minecraft:wither_skeleton")));
    }

    #[test]
    fn cow_has_no_target_selector() {
        let behaviors = goals(Archetype::Vanilla, "minecraft:cow");
        assert!(!has_target_selector(&behaviors));
        assert_eq!(behaviors.len(), 2);
    }
}
