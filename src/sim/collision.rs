//! Collision substrate
//!
//! Two halves: axis-separated movement resolution against the tile map
//! (detection), and a coordinator holding the scene's registered contact
//! rules (response). Detection only records facts into [`Contacts`]; the
//! coordinator applies entity reactions afterwards, in registration order,
//! so the per-tick mutation sequence stays explicit and testable.

use glam::Vec2;

use super::aura::AuraStatus;
use super::enemy::Enemy;
use super::map::TileMap;
use super::player::{Player, PlayerStatus};
use super::state::{Direction, EntityId};
use super::weapon::{Weapon, WeaponStatus};
use crate::consts::TILE_SIZE;

/// Square physics body centered on an entity position
#[derive(Debug, Clone, Copy)]
pub struct Aabb {
    pub center: Vec2,
    pub size: f32,
}

impl Aabb {
    pub fn new(center: Vec2, size: f32) -> Self {
        Self { center, size }
    }

    pub fn overlaps(&self, other: &Aabb) -> bool {
        let half = (self.size + other.size) / 2.0;
        (self.center.x - other.center.x).abs() < half
            && (self.center.y - other.center.y).abs() < half
    }
}

/// Whether a body of `size` centered at `pos` intersects any solid tile
fn body_blocked(map: &TileMap, pos: Vec2, size: f32) -> bool {
    let half = size / 2.0;
    // Pull corners in slightly so resting flush against a wall is not a hit
    let eps = 0.01;
    let min = pos - Vec2::splat(half - eps);
    let max = pos + Vec2::splat(half - eps);
    let tx0 = (min.x / TILE_SIZE).floor() as i32;
    let ty0 = (min.y / TILE_SIZE).floor() as i32;
    let tx1 = (max.x / TILE_SIZE).floor() as i32;
    let ty1 = (max.y / TILE_SIZE).floor() as i32;
    for ty in ty0..=ty1 {
        for tx in tx0..=tx1 {
            if map.is_solid(tx, ty) {
                return true;
            }
        }
    }
    false
}

/// Integrate one tick of movement, resolving each axis independently.
///
/// Returns the new position and whether either axis was blocked by the
/// ground layer (the "touched a wall" fact the contact rules consume).
pub fn move_body(map: &TileMap, pos: Vec2, vel: Vec2, size: f32, dt: f32) -> (Vec2, bool) {
    let mut out = pos;
    let mut blocked = false;

    let x_next = out.x + vel.x * dt;
    if body_blocked(map, Vec2::new(x_next, out.y), size) {
        blocked = true;
    } else {
        out.x = x_next;
    }

    let y_next = out.y + vel.y * dt;
    if body_blocked(map, Vec2::new(out.x, y_next), size) {
        blocked = true;
    } else {
        out.y = y_next;
    }

    (out, blocked)
}

/// A contact pairing the scene has asked the coordinator to react to.
///
/// Rules are applied in the order they were registered; aura rules are
/// added per enemy when its wave spawns and dropped with the enemy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactRule {
    PlayerGround,
    EnemyGround,
    PlayerEnemy,
    WeaponAura { enemy: EntityId },
}

/// Facts gathered by this tick's detection pass
#[derive(Debug, Default)]
pub struct Contacts {
    pub player_ground: bool,
    pub enemy_ground: Vec<EntityId>,
    pub player_enemy: Vec<EntityId>,
    pub weapon_aura: Vec<EntityId>,
}

/// Side effects a rule raised for the outer layers (not entity mutations)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RuleEffect {
    CameraShake { duration_ms: f64, intensity: f32 },
}

/// Registry of active contact rules, applied in registration order
#[derive(Debug, Default)]
pub struct CollisionCoordinator {
    rules: Vec<ContactRule>,
}

impl CollisionCoordinator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rules are additive only: once registered they are never removed,
    /// and a rule whose entities are gone simply matches nothing.
    pub fn register(&mut self, rule: ContactRule) {
        if !self.rules.contains(&rule) {
            self.rules.push(rule);
        }
    }

    pub fn has_aura_rule(&self, enemy: EntityId) -> bool {
        self.rules
            .contains(&ContactRule::WeaponAura { enemy })
    }

    /// Apply every registered rule against this tick's contact facts.
    ///
    /// Entity mutations happen directly; anything aimed at the outer layers
    /// comes back as a [`RuleEffect`]. Re-applying the same contact twice in
    /// one tick is harmless - every reaction is idempotent within a tick.
    pub fn apply(
        &self,
        contacts: &Contacts,
        player: &mut Player,
        weapon: Option<&Weapon>,
        enemies: &mut [Enemy],
    ) -> Vec<RuleEffect> {
        let mut effects = Vec::new();
        for rule in &self.rules {
            match *rule {
                ContactRule::PlayerGround => {
                    if contacts.player_ground {
                        player.direction = Direction::None;
                    }
                }
                ContactRule::EnemyGround => {
                    for &id in &contacts.enemy_ground {
                        if let Some(enemy) = enemies.iter_mut().find(|e| e.id == id) {
                            if enemy.is_hostile() {
                                enemy.apply_bounce();
                            }
                        }
                    }
                }
                ContactRule::PlayerEnemy => {
                    for &id in &contacts.player_enemy {
                        let hostile = enemies.iter().any(|e| e.id == id && e.is_hostile());
                        // Already affected or dead: maintained contact is a no-op
                        if !hostile
                            || matches!(player.status, PlayerStatus::Dead | PlayerStatus::Affected)
                        {
                            continue;
                        }
                        player.apply_affected();
                        effects.push(RuleEffect::CameraShake {
                            duration_ms: 500.0,
                            intensity: 0.002,
                        });
                    }
                }
                ContactRule::WeaponAura { enemy: id } => {
                    let firing = weapon.is_some_and(|w| w.status == WeaponStatus::Fire);
                    let touched = contacts.weapon_aura.contains(&id);
                    // Missing enemy or aura: the rule outlives its entities
                    if let Some(enemy) = enemies.iter_mut().find(|e| e.id == id) {
                        if let Some(aura) = enemy.aura.as_mut() {
                            if touched && firing && aura.status == AuraStatus::Active {
                                aura.apply_affected();
                            }
                        }
                    }
                }
            }
        }
        effects
    }
}
