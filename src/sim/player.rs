//! Player behavior unit
//!
//! Reads directional input, moves along exactly one axis per priority
//! (left/right before up/down), fires the weapon on a cooldown, and loses one
//! lives-point per elapsed affected window while in contact with a plague.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::state::{Direction, EntityId, InputState};
use crate::consts::{AFFECTED_DELAY_MS, PLAYER_LIVES, PLAYER_VEL, SHOOT_DELAY_MS};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerStatus {
    Idle,
    Run,
    /// Weapon trigger pulled this tick (consumed by the weapon)
    Fire,
    /// Taking damage over time from plague contact
    Affected,
    /// Terminal; triggers game over externally
    Dead,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub status: PlayerStatus,
    pub lives: u32,
    pub default_vel: f32,
    /// -1 left, 1 right; flips the horizontal mirror only
    pub facing_x: i8,
    pub facing_y: i8,
    pub direction: Direction,
    pub has_weapon: bool,
    shoot_delay: f64,
    shoot_timer: f64,
    affected_delay: f64,
    affected_timer: f64,
    update_time: f64,
}

impl Player {
    pub fn new(id: EntityId, pos: Vec2) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            status: PlayerStatus::Idle,
            lives: PLAYER_LIVES,
            default_vel: PLAYER_VEL,
            facing_x: 1,
            facing_y: 1,
            direction: Direction::Right,
            has_weapon: false,
            shoot_delay: SHOOT_DELAY_MS,
            shoot_timer: 0.0,
            affected_delay: AFFECTED_DELAY_MS,
            affected_timer: 0.0,
            update_time: 0.0,
        }
    }

    /// Advance the player's state machine for one tick
    pub fn update(&mut self, time: f64, input: &InputState) {
        self.update_time = time;
        if self.status == PlayerStatus::Dead {
            return;
        }

        self.vel = Vec2::ZERO;
        // Movement keeps an affected player affected; anything else runs
        let moving_status = if self.status == PlayerStatus::Affected {
            PlayerStatus::Affected
        } else {
            PlayerStatus::Run
        };

        if input.left {
            self.status = moving_status;
            self.facing_x = -1;
            self.direction = Direction::Left;
            self.vel.x = -self.default_vel;
        } else if input.right {
            self.status = moving_status;
            self.facing_x = 1;
            self.direction = Direction::Right;
            self.vel.x = self.default_vel;
        } else if input.up {
            self.status = moving_status;
            self.facing_y = -1;
            self.direction = Direction::Up;
            self.vel.y = -self.default_vel;
        } else if input.down {
            self.status = moving_status;
            self.facing_y = 1;
            self.direction = Direction::Down;
            self.vel.y = self.default_vel;
        } else {
            self.status = if self.status == PlayerStatus::Affected {
                PlayerStatus::Affected
            } else {
                PlayerStatus::Idle
            };
        }

        if self.has_weapon && input.fire && time > self.shoot_timer {
            self.status = PlayerStatus::Fire;
            self.shoot_timer = self.update_time + self.shoot_delay;
        }

        if self.status == PlayerStatus::Affected {
            if time > self.affected_timer {
                self.decrease_lives();
                self.affected_timer = self.update_time + self.affected_delay;
            } else {
                // Affected is transient: it clears once the per-hit window
                // passes unless a new collision re-triggers it
                self.status = PlayerStatus::Run;
            }
        }

        // Normalize and rescale so diagonal movement is not faster
        if self.vel != Vec2::ZERO {
            self.vel = self.vel.normalize() * self.default_vel;
        }
    }

    /// Collision rule entry point; caller guards against dead/affected
    pub fn apply_affected(&mut self) {
        self.status = PlayerStatus::Affected;
    }

    fn decrease_lives(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        if self.lives == 0 {
            self.status = PlayerStatus::Dead;
        }
    }

    /// Horizontal mirror flag for the render layer (no vertical mirror)
    pub fn flip_x(&self) -> bool {
        self.facing_x == -1
    }

    /// Animation key for the concrete "gundo" character
    pub fn animation(&self) -> Option<&'static str> {
        match self.status {
            PlayerStatus::Run | PlayerStatus::Affected | PlayerStatus::Fire => {
                Some(if self.facing_x != -1 {
                    "gundoRight"
                } else {
                    "gundoLeft"
                })
            }
            PlayerStatus::Idle => Some(if self.facing_y != -1 {
                "gundoIdleRight"
            } else {
                "gundoIdleLeft"
            }),
            PlayerStatus::Dead => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(1, Vec2::new(256.0, 360.0))
    }

    fn input(left: bool, right: bool, up: bool, down: bool, fire: bool) -> InputState {
        InputState {
            left,
            right,
            up,
            down,
            fire,
        }
    }

    #[test]
    fn test_left_right_beats_up_down() {
        let mut p = player();
        p.update(16.0, &input(true, false, true, false, false));
        assert_eq!(p.direction, Direction::Left);
        assert_eq!(p.vel, Vec2::new(-PLAYER_VEL, 0.0));
        assert!(p.flip_x());

        p.update(32.0, &input(false, true, false, true, false));
        assert_eq!(p.direction, Direction::Right);
        assert_eq!(p.vel, Vec2::new(PLAYER_VEL, 0.0));
    }

    #[test]
    fn test_speed_never_exceeds_default() {
        let mut p = player();
        for keys in [
            input(true, false, false, false, false),
            input(false, false, true, false, false),
            input(false, false, false, true, false),
        ] {
            p.update(16.0, &keys);
            assert!((p.vel.length() - PLAYER_VEL).abs() < 1e-3);
        }
    }

    #[test]
    fn test_no_input_goes_idle() {
        let mut p = player();
        p.update(16.0, &input(false, true, false, false, false));
        assert_eq!(p.status, PlayerStatus::Run);
        p.update(32.0, &InputState::default());
        assert_eq!(p.status, PlayerStatus::Idle);
        assert_eq!(p.vel, Vec2::ZERO);
    }

    #[test]
    fn test_fire_respects_cooldown() {
        let mut p = player();
        p.has_weapon = true;
        p.update(100.0, &input(false, false, false, false, true));
        assert_eq!(p.status, PlayerStatus::Fire);

        // Held trigger inside the cooldown window does not re-fire
        p.update(100.0 + SHOOT_DELAY_MS / 2.0, &input(false, false, false, false, true));
        assert_ne!(p.status, PlayerStatus::Fire);

        p.update(100.0 + SHOOT_DELAY_MS + 1.0, &input(false, false, false, false, true));
        assert_eq!(p.status, PlayerStatus::Fire);
    }

    #[test]
    fn test_unarmed_player_cannot_fire() {
        let mut p = player();
        p.update(100.0, &input(false, false, false, false, true));
        assert_eq!(p.status, PlayerStatus::Idle);
    }

    #[test]
    fn test_affected_decrements_once_per_window() {
        let mut p = player();
        p.apply_affected();
        p.update(1000.0, &InputState::default());
        assert_eq!(p.lives, PLAYER_LIVES - 1);

        // Inside the window: no decrement, affected downgrades to run
        p.apply_affected();
        p.update(1000.0 + AFFECTED_DELAY_MS / 2.0, &InputState::default());
        assert_eq!(p.lives, PLAYER_LIVES - 1);
        assert_eq!(p.status, PlayerStatus::Run);
    }

    #[test]
    fn test_ten_affected_windows_kill() {
        let mut p = player();
        let mut time = 0.0;
        for _ in 0..PLAYER_LIVES {
            time += AFFECTED_DELAY_MS + 1.0;
            p.apply_affected();
            p.update(time, &InputState::default());
        }
        assert_eq!(p.lives, 0);
        assert_eq!(p.status, PlayerStatus::Dead);
    }

    #[test]
    fn test_dead_update_is_noop() {
        let mut p = player();
        p.status = PlayerStatus::Dead;
        p.update(5000.0, &input(true, false, false, false, true));
        assert_eq!(p.status, PlayerStatus::Dead);
        assert_eq!(p.vel, Vec2::ZERO);
    }

    #[test]
    fn test_idle_animation_keyed_off_vertical_facing() {
        let mut p = player();
        p.update(16.0, &input(false, false, true, false, false));
        p.update(32.0, &InputState::default());
        assert_eq!(p.animation(), Some("gundoIdleLeft"));
    }
}
