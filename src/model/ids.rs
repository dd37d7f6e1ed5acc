//! Stable entity handles: every reference between entities is a stable
//! handle (id) resolved by lookup, never a raw pointer.

use serde::{Deserialize, Serialize};

macro_rules! handle {
    ($name:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        pub struct $name(pub u32);

        impl $name {
            pub fn index(&self) -> usize {
                self.0 as usize
            }
        }
    };
}

handle!(EnemyId);
handle!(ProjectileId);
handle!(AoeId);
handle!(ParticleId);
handle!(FloatId);
handle!(ItemId);

/// A weak reference to an enemy, used by homing projectiles.
/// Resolved through the `EntityStore`; a stale id just means "no target".
pub type WeakEnemyRef = EnemyId;
