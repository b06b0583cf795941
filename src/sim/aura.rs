//! Aura behavior unit
//!
//! Each plague owns one aura: the interaction zone the weapon must keep
//! lighting to cure it. The aura trails its owner and tracks overlap with
//! the weapon through touching/was-touching flags. Once a collision rule has
//! marked it affected, it dies after a fixed span of *continuous* contact;
//! any contact gap resets the counter and reverts it to active.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::EntityId;
use crate::consts::AURA_AFFECTED_DURATION_S;

pub const DEFAULT_ALPHA: f32 = 0.7;
pub const DIMMED_ALPHA: f32 = 0.4;
pub const DEFAULT_DEPTH: i32 = 9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuraStatus {
    Idle,
    /// Default once attached to a live plague
    Active,
    /// Weapon fire touched it; the cure countdown can run
    Affected,
    /// Cured; the owner is notified and the aura is removed
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Aura {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub status: AuraStatus,
    /// Owning enemy id - targeting back-reference only, not ownership
    pub target: EntityId,
    /// Render intent for the UI layer
    pub alpha: f32,
    pub depth: i32,
    /// Overlap flags maintained by the collision substrate
    touching: bool,
    was_touching: bool,
    /// Time (ms) the current continuous affected contact began, 0 when unset
    last_check_on_affected_at: f64,
}

impl Aura {
    pub fn new(id: EntityId, pos: Vec2, target: EntityId) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            status: AuraStatus::Active,
            target,
            alpha: DEFAULT_ALPHA,
            depth: DEFAULT_DEPTH,
            touching: false,
            was_touching: false,
            last_check_on_affected_at: 0.0,
        }
    }

    /// Record this tick's overlap result, shifting the previous one
    pub fn set_touching(&mut self, touching: bool) {
        self.was_touching = self.touching;
        self.touching = touching;
    }

    pub fn touching(&self) -> bool {
        self.touching
    }

    /// Collision rule entry point: weapon fire contact marks the aura.
    /// Guarded by the caller (rule checks status and weapon state).
    pub fn apply_affected(&mut self) {
        self.status = AuraStatus::Affected;
    }

    /// Advance the aura for one tick, trailing its owner.
    ///
    /// Returns `true` once the aura has died so the owner can react.
    pub fn update(&mut self, owner_pos: Vec2, owner_vel: Vec2, time: f64) -> bool {
        if self.status == AuraStatus::Dead {
            return true;
        }
        if self.status == AuraStatus::Active || self.status == AuraStatus::Affected {
            self.vel = owner_vel;
            self.pos = owner_pos;
        }

        if self.touching && !self.was_touching {
            // Overlap started
            self.alpha = DIMMED_ALPHA;
            if self.status == AuraStatus::Affected {
                self.last_check_on_affected_at = time;
            }
        }

        if !self.touching && self.was_touching {
            // Overlap ended: the cure only completes under continuous light
            self.alpha = DEFAULT_ALPHA;
            if self.status == AuraStatus::Affected {
                self.status = AuraStatus::Active;
                self.last_check_on_affected_at = 0.0;
            }
        }

        if self.touching && self.was_touching && self.status == AuraStatus::Affected {
            if self.last_check_on_affected_at == 0.0 {
                self.last_check_on_affected_at = time;
            }
            let elapsed_s = (time - self.last_check_on_affected_at) / 1000.0;
            if elapsed_s >= AURA_AFFECTED_DURATION_S {
                self.status = AuraStatus::Dead;
            }
        }

        self.status == AuraStatus::Dead
    }

    pub fn animation(&self) -> &'static str {
        "plagueAuraStart"
    }
}
