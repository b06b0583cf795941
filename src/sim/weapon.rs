//! Weapon behavior unit (the path light)
//!
//! A single instance owned by the player. It has no physics movement of its
//! own: every tick its position is re-derived from the owner's position and
//! facing direction. Firing is driven by the owner's status and plays a
//! one-shot animation before returning to the trailing state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::player::PlayerStatus;
use super::state::{Direction, EntityId};
use crate::consts::{WEAPON_FIRE_ANIM_MS, WEAPON_OFFSET_X, WEAPON_OFFSET_Y};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum WeaponStatus {
    Idle,
    /// Equipped, visible, trailing the owner
    Active,
    /// One-shot fire animation in progress
    Fire,
    /// Removed on command (e.g. owner death)
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Weapon {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub status: WeaponStatus,
    /// Trailing offset applied along the owner's facing axis
    pub offset: Vec2,
    /// Sprite rotation intent in degrees, for the render layer
    pub angle: f32,
    pub visible: bool,
    fire_started_at: f64,
}

impl Weapon {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            status: WeaponStatus::Active,
            offset: Vec2::new(WEAPON_OFFSET_X, WEAPON_OFFSET_Y),
            angle: 0.0,
            visible: true,
            fire_started_at: 0.0,
        }
    }

    /// Advance the weapon for one tick, trailing the owner.
    ///
    /// `direction` is the owner's facing; only the four cardinal values
    /// produce an offset, anything else leaves the weapon on the owner.
    pub fn update(
        &mut self,
        owner_pos: Vec2,
        owner_vel: Vec2,
        direction: Direction,
        owner_status: PlayerStatus,
        time: f64,
    ) {
        if owner_status == PlayerStatus::Fire && self.status == WeaponStatus::Active {
            self.status = WeaponStatus::Fire;
            self.fire_started_at = time;
        }
        if self.status == WeaponStatus::Fire && time - self.fire_started_at >= WEAPON_FIRE_ANIM_MS {
            self.status = WeaponStatus::Active;
        }

        if self.status == WeaponStatus::Dead {
            self.visible = false;
            return;
        }

        if self.status == WeaponStatus::Active || self.status == WeaponStatus::Fire {
            let mut offset = Vec2::ZERO;
            match direction {
                Direction::Left => {
                    offset.x = -self.offset.x;
                    self.angle = 180.0;
                }
                Direction::Right => {
                    offset.x = self.offset.x;
                    self.angle = 0.0;
                }
                Direction::Up => {
                    offset.y = -self.offset.y;
                    self.angle = -90.0;
                }
                Direction::Down => {
                    offset.y = self.offset.y;
                    self.angle = 90.0;
                }
                Direction::None => {}
            }
            self.vel = owner_vel;
            self.pos = owner_pos + offset;
        }
    }

    /// Mark for removal; the scene drops the instance on the next tick
    pub fn kill(&mut self) {
        self.status = WeaponStatus::Dead;
        self.visible = false;
    }

    /// Animation key the render layer should be playing
    pub fn animation(&self) -> &'static str {
        match self.status {
            WeaponStatus::Fire => "pathLightFire",
            WeaponStatus::Active => "pathLightActive",
            _ => "pathLightIdle",
        }
    }
}
