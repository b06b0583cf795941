//! Enemy behavior unit (the plague)
//!
//! Two externally-exclusive tracks share one entity. The hostile track:
//! idle -> run (random walk) -> affected -> dead. The human track, entered
//! when the owned aura is cured: backToHuman (transformation animation) ->
//! human -> inactive (saved, scored once, no longer hostile) and finally
//! dead once the human countdown runs out. `track` discriminates which one
//! is observable.

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::aura::Aura;
use super::scheduler::{Scheduler, TimerId};
use super::state::{Direction, EntityId};
use crate::consts::{
    AFFECTED_DELAY_MS, ENEMY_LIVES, ENEMY_MOVE_INTERVAL_MS, HUMAN_COUNTDOWN_START,
    HUMAN_COUNTER_INTERVAL_MS, TRANSFORM_ANIM_MS,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EnemyStatus {
    Idle,
    Run,
    Affected,
    /// Saved; non-hostile, excluded from interaction rules
    Inactive,
    /// Terminal; removed on the next tick boundary
    Dead,
}

/// Which of the two tracks the render layer should show
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AnimationTrack {
    Plague,
    BackToHuman,
    Human,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Enemy {
    pub id: EntityId,
    pub pos: Vec2,
    pub vel: Vec2,
    pub status: EnemyStatus,
    pub lives: u32,
    /// Walk speed in px/s; doubles as the score value when saved
    pub default_vel: f32,
    pub direction: Direction,
    pub facing_x: i8,
    pub facing_y: i8,
    pub track: AnimationTrack,
    /// Set once the saved fade has been applied; gates scoring idempotence
    pub is_back_to_human: bool,
    /// Set when the coordinator has a weapon/aura rule for this enemy
    pub aura_collision_enabled: bool,
    pub alpha: f32,
    pub depth: i32,
    pub aura: Option<Aura>,
    affected_delay: f64,
    affected_timer: f64,
    move_timer: Option<TimerId>,
    human_counter: Option<TimerId>,
    human_countdown: i32,
    /// Time (ms) the transformation animation began
    transform_started_at: Option<f64>,
}

impl Enemy {
    pub fn new(id: EntityId, pos: Vec2, speed: f32, aura: Aura) -> Self {
        Self {
            id,
            pos,
            vel: Vec2::ZERO,
            status: EnemyStatus::Idle,
            lives: ENEMY_LIVES,
            default_vel: speed,
            direction: Direction::Right,
            facing_x: 1,
            facing_y: 1,
            track: AnimationTrack::Plague,
            is_back_to_human: false,
            aura_collision_enabled: false,
            alpha: 1.0,
            depth: 99,
            aura: Some(aura),
            affected_delay: AFFECTED_DELAY_MS,
            affected_timer: 0.0,
            move_timer: None,
            human_counter: None,
            human_countdown: HUMAN_COUNTDOWN_START,
            transform_started_at: None,
        }
    }

    /// Begin the random walk: status run plus a repeating re-roll timer
    pub fn start_wandering(&mut self, now: f64, sched: &mut Scheduler) {
        self.status = EnemyStatus::Run;
        self.move_timer = Some(sched.every(now, ENEMY_MOVE_INTERVAL_MS));
    }

    pub fn move_timer(&self) -> Option<TimerId> {
        self.move_timer
    }

    pub fn human_counter(&self) -> Option<TimerId> {
        self.human_counter
    }

    /// Re-roll the wander direction, never repeating the current one
    pub fn reroll_direction<R: Rng>(&mut self, rng: &mut R) {
        let exclude = self.direction;
        let mut next = Direction::CARDINAL[rng.random_range(0..4)];
        while next == exclude {
            next = Direction::CARDINAL[rng.random_range(0..4)];
        }
        self.direction = next;
    }

    /// Collision rule entry point: bounce off a wall
    pub fn apply_bounce(&mut self) {
        self.direction = self.direction.opposite();
    }

    /// Collision rule entry point; caller guards hostile/affected state
    pub fn apply_affected(&mut self) {
        self.status = EnemyStatus::Affected;
    }

    fn set_velocity_from_direction(&mut self) {
        let vel = self.default_vel;
        match self.direction {
            Direction::Up => {
                self.facing_y = -1;
                self.vel = Vec2::new(0.0, -vel);
            }
            Direction::Down => {
                self.facing_y = 1;
                self.vel = Vec2::new(0.0, vel);
            }
            Direction::Left => {
                self.facing_x = -1;
                self.vel = Vec2::new(-vel, 0.0);
            }
            Direction::Right => {
                self.facing_x = 1;
                self.vel = Vec2::new(vel, 0.0);
            }
            Direction::None => self.vel = Vec2::ZERO,
        }
    }

    /// Advance the enemy's state machine for one tick
    pub fn update(&mut self, time: f64, sched: &mut Scheduler) {
        if self.status == EnemyStatus::Dead {
            return;
        }

        // One-time saved fade. Runs at the top so the transition below stays
        // observable for one full tick; the scene's scoring scan depends on
        // seeing inactive-but-not-yet-faded exactly once.
        if self.status == EnemyStatus::Inactive && !self.is_back_to_human {
            self.depth = 9;
            self.alpha = 0.4;
            self.is_back_to_human = true;
        }

        match self.status {
            EnemyStatus::Idle | EnemyStatus::Inactive => self.vel = Vec2::ZERO,
            EnemyStatus::Run | EnemyStatus::Affected => self.set_velocity_from_direction(),
            EnemyStatus::Dead => {}
        }

        if self.status == EnemyStatus::Affected {
            if time > self.affected_timer {
                self.lives = self.lives.saturating_sub(1);
                self.affected_timer = time + self.affected_delay;
                if self.lives == 0 {
                    self.status = EnemyStatus::Dead;
                    return;
                }
            } else {
                self.status = EnemyStatus::Run;
            }
        }

        // Transformation animation completed: become human, stop wandering,
        // start the countdown that removes the saved human from the map
        if self.track == AnimationTrack::BackToHuman
            && self
                .transform_started_at
                .is_some_and(|started| time - started >= TRANSFORM_ANIM_MS)
        {
            self.track = AnimationTrack::Human;
            self.transform_started_at = None;
            if let Some(id) = self.move_timer.take() {
                sched.cancel(id);
            }
            self.status = EnemyStatus::Inactive;
            self.vel = Vec2::ZERO;
            if self.human_counter.is_none() {
                self.human_counter = Some(sched.every(time, HUMAN_COUNTER_INTERVAL_MS));
            }
        }
    }

    /// Called by the scene after the aura update pass when the owned aura
    /// has died: the plague may return to human form.
    pub fn on_aura_dead(&mut self, time: f64) {
        self.aura = None;
        self.track = AnimationTrack::BackToHuman;
        self.transform_started_at = Some(time);
    }

    /// Human countdown timer fired
    pub fn on_human_counter(&mut self) {
        self.human_countdown -= 1;
        if self.human_countdown <= 0 {
            self.status = EnemyStatus::Dead;
        }
    }

    /// Saved but not yet faded/scored - true exactly once per enemy
    pub fn is_inactive_not_back_to_human(&self) -> bool {
        self.status == EnemyStatus::Inactive && !self.is_back_to_human
    }

    /// Still part of the hostile set the interaction rules consider
    pub fn is_hostile(&self) -> bool {
        self.status != EnemyStatus::Inactive && self.status != EnemyStatus::Dead
    }

    /// Cancel every timer this entity owns. Idempotent: removal runs it once.
    pub fn teardown(&mut self, sched: &mut Scheduler) {
        if let Some(id) = self.move_timer.take() {
            sched.cancel(id);
        }
        if let Some(id) = self.human_counter.take() {
            sched.cancel(id);
        }
    }

    pub fn animation(&self) -> &'static str {
        match self.track {
            AnimationTrack::Plague => "plaguePlagueIdleAndRun",
            AnimationTrack::BackToHuman => "plagueHumanTransformation",
            AnimationTrack::Human => "plagueHumanIdleAndRun",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn enemy(speed: f32) -> Enemy {
        let aura = Aura::new(2, Vec2::new(80.0, 80.0), 1);
        Enemy::new(1, Vec2::new(80.0, 80.0), speed, aura)
    }

    #[test]
    fn test_velocity_follows_direction() {
        let mut sched = Scheduler::new();
        let mut e = enemy(150.0);
        e.start_wandering(0.0, &mut sched);
        e.direction = Direction::Up;
        e.update(16.0, &mut sched);
        assert_eq!(e.vel, Vec2::new(0.0, -150.0));
        assert_eq!(e.facing_y, -1);

        e.apply_bounce();
        e.update(32.0, &mut sched);
        assert_eq!(e.vel, Vec2::new(0.0, 150.0));
    }

    #[test]
    fn test_affected_kills_on_last_life_same_update() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.start_wandering(0.0, &mut sched);
        e.apply_affected();
        e.update(1000.0, &mut sched);
        assert_eq!(e.lives, 0);
        assert_eq!(e.status, EnemyStatus::Dead);
    }

    #[test]
    fn test_affected_inside_window_downgrades_to_run() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.lives = 3;
        e.start_wandering(0.0, &mut sched);
        e.apply_affected();
        e.update(1000.0, &mut sched);
        assert_eq!(e.lives, 2);
        e.apply_affected();
        e.update(1000.0 + AFFECTED_DELAY_MS / 2.0, &mut sched);
        assert_eq!(e.lives, 2);
        assert_eq!(e.status, EnemyStatus::Run);
    }

    #[test]
    fn test_human_track_to_inactive() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.start_wandering(0.0, &mut sched);
        let move_timer = e.move_timer().unwrap();

        e.on_aura_dead(1000.0);
        assert_eq!(e.track, AnimationTrack::BackToHuman);
        assert!(e.aura.is_none());

        // Transformation still playing
        e.update(1000.0 + TRANSFORM_ANIM_MS / 2.0, &mut sched);
        assert_eq!(e.track, AnimationTrack::BackToHuman);
        assert!(e.is_hostile());

        // Completed: human, inactive, wander timer cancelled, counter armed
        e.update(1000.0 + TRANSFORM_ANIM_MS, &mut sched);
        assert_eq!(e.track, AnimationTrack::Human);
        assert_eq!(e.animation(), "plagueHumanIdleAndRun");
        assert!(!sched.is_scheduled(move_timer));
        assert!(e.human_counter().is_some());
        assert!(!e.is_hostile());

        // The saved fade lands one tick later, leaving a scoring window
        assert!(e.is_inactive_not_back_to_human());
        e.update(1000.0 + TRANSFORM_ANIM_MS + 16.0, &mut sched);
        assert!(e.is_back_to_human);
        assert_eq!(e.alpha, 0.4);
    }

    #[test]
    fn test_saved_scan_flag_is_one_shot() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.status = EnemyStatus::Inactive;
        assert!(e.is_inactive_not_back_to_human());
        e.update(16.0, &mut sched);
        assert!(!e.is_inactive_not_back_to_human());
        e.update(32.0, &mut sched);
        assert!(!e.is_inactive_not_back_to_human());
    }

    #[test]
    fn test_human_countdown_ends_in_removal() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.on_aura_dead(0.0);
        e.update(TRANSFORM_ANIM_MS, &mut sched);
        for _ in 0..HUMAN_COUNTDOWN_START {
            assert_ne!(e.status, EnemyStatus::Dead);
            e.on_human_counter();
        }
        assert_eq!(e.status, EnemyStatus::Dead);
    }

    #[test]
    fn test_teardown_cancels_all_timers_once() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.start_wandering(0.0, &mut sched);
        e.on_aura_dead(0.0);
        e.update(TRANSFORM_ANIM_MS, &mut sched);
        let counter = e.human_counter().unwrap();
        e.teardown(&mut sched);
        e.teardown(&mut sched);
        assert!(!sched.is_scheduled(counter));
        assert!(e.move_timer().is_none());
        assert!(e.human_counter().is_none());
    }

    #[test]
    fn test_dead_update_is_noop() {
        let mut sched = Scheduler::new();
        let mut e = enemy(100.0);
        e.status = EnemyStatus::Dead;
        e.update(16.0, &mut sched);
        assert_eq!(e.vel, Vec2::ZERO);
        assert_eq!(e.status, EnemyStatus::Dead);
    }

    proptest! {
        #[test]
        fn prop_reroll_never_repeats_previous(seed in any::<u64>(), draws in 1usize..200) {
            let mut rng = Pcg32::seed_from_u64(seed);
            let mut e = enemy(100.0);
            for _ in 0..draws {
                let previous = e.direction;
                e.reroll_direction(&mut rng);
                prop_assert_ne!(e.direction, previous);
                prop_assert_ne!(e.direction, Direction::None);
            }
        }
    }
}
