//! Straight-line steering helpers (no obstacle avoidance).

/// Velocity `(vx, vz)` that moves from the current XZ position toward the
/// goal at `speed` blocks per tick. Zero once within 0.1 blocks.
pub fn move_toward_flat(current_x: f32, current_z: f32, goal_x: f32, goal_z: f32, speed: f32) -> (f32, f32) {
    let dx = goal_x - current_x;
    let dz = goal_z - current_z;
    let dist = (dx * dx + dz * dz).sqrt();
    if dist < 0.1 {
        return (0.0, 0.0);
    }
    (dx / dist * speed, dz / dist * speed)
}

/// Yaw in degrees (0..360) for looking from one XZ position toward another.
///
/// 0 = south (+Z), 90 = west (-X), 180 = north (-Z), 270 = east (+X).
pub fn yaw_toward(from_x: f32, from_z: f32, to_x: f32, to_z: f32) -> f32 {
    let yaw = (-(to_x - from_x)).atan2(to_z - from_z).to_degrees();
    yaw.rem_euclid(360.0)
}

pub fn distance_xz(x1: f32, z1: f32, x2: f32, z2: f32) -> f32 {
    let dx = x2 - x1;
    let dz = z2 - z1;
    (dx * dx + dz * dz).sqrt()
}

/// Squared 3D distance.
pub fn distance_sq(a: (f32, f32, f32), b: (f32, f32, f32)) -> f32 {
    let (dx, dy, dz) = (b.0 - a.0, b.1 - a.1, b.2 - a.2);
    dx * dx + dy * dy + dz * dz
}
