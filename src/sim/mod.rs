//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Stable iteration order (entities keep their spawn order)
//! - No rendering or platform dependencies

pub mod aura;
pub mod collision;
pub mod enemy;
pub mod map;
pub mod player;
pub mod scheduler;
pub mod state;
pub mod tick;
pub mod weapon;

pub use aura::{Aura, AuraStatus};
pub use collision::{Aabb, CollisionCoordinator, ContactRule, Contacts, RuleEffect, move_body};
pub use enemy::{AnimationTrack, Enemy, EnemyStatus};
pub use map::{MapData, MapError, TileMap};
pub use player::{Player, PlayerStatus};
pub use scheduler::{Scheduler, TimerId};
pub use state::{Direction, EntityId, IdAlloc, InputState};
pub use tick::{GameScene, TickOutcome};
pub use weapon::{Weapon, WeaponStatus};
