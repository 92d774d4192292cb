//! Custom mob archetypes.

pub mod nether_knight;
pub mod pumpkin_slime;
