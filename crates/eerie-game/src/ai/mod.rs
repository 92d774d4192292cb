//! Mob AI: behavior system, steering, and natural spawning.

pub mod behavior;
pub mod behaviors;
pub mod brain;
pub mod mob_behaviors;
pub mod navigation;
pub mod spawning;
pub mod system;
