//! Projectile update system: flight, detonation, and explosion frames.

use hecs::World;

use crate::projectile::Projectile;

pub fn run(world: &mut World) {
    for (_entity, projectile) in world.query_mut::<&mut Projectile>() {
        projectile.update();
    }
}
