pub mod aoe;
pub mod boss;
pub mod enemy;
pub mod ids;
pub mod item;
pub mod player;
pub mod projectile;
pub mod status;
pub mod weapon;

pub use aoe::AoeField;
pub use boss::{Boss, BossPhase};
pub use enemy::{ArchetypeParams, Enemy, EnemyAttack};
pub use ids::*;
pub use item::{FloatingText, ItemDrop, ItemKind, ItemPayload, Particle};
pub use player::{Facing, Player};
pub use projectile::Projectile;
pub use status::StatusEffect;
pub use weapon::{Swing, Weapon, WeaponBonuses, WeaponCost};
