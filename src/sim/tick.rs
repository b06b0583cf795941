//! Game scene: per-tick orchestration
//!
//! Owns every live entity plus the scheduler, collision coordinator and RNG,
//! and advances them in a fixed order each tick:
//!
//! 1. poll timers (run countdown / wave trigger, wander re-rolls, human
//!    counters)
//! 2. scoring scan over freshly saved plagues (before their fade flag flips)
//! 3. player and enemy state machines
//! 4. movement resolution + overlap detection into [`Contacts`]
//! 5. weapon update (trails the resolved player position)
//! 6. coordinator applies contact rules
//! 7. aura updates; cured auras flip their owner onto the human track
//! 8. dead-entity removal (timers cancelled, rules unregistered)
//! 9. hub publishes and the game-over check
//!
//! Everything here is deterministic for a given seed and input sequence.

use glam::Vec2;
use log::info;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::aura::Aura;
use super::collision::{move_body, Aabb, CollisionCoordinator, ContactRule, Contacts, RuleEffect};
use super::enemy::{Enemy, EnemyStatus};
use super::map::{MapData, MapError, TileMap};
use super::player::{Player, PlayerStatus};
use super::scheduler::{Scheduler, TimerId};
use super::state::{IdAlloc, InputState};
use super::weapon::{Weapon, WeaponStatus};
use crate::consts::{
    AURA_BODY, COUNTDOWN_START_SECS, ENEMY_BODY, ENEMY_MAX_SEED_SPEED, PLAYER_BODY, TICK_MS,
    WAVE_SPEED_BONUS, WAVE_TRIGGER_SECOND, WEAPON_BODY,
};
use crate::hub::GameHub;
use crate::storage::ScoreBook;
use crate::tick_dt;

/// What the app shell should do after a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TickOutcome {
    Running,
    /// Player died or the countdown expired
    GameOver,
}

/// Number of plagues a wave spawns, given the initial seed count
fn wave_size(seed_count: usize) -> usize {
    (seed_count as f64 / 2.0).round() as usize + 1
}

pub struct GameScene {
    map: TileMap,
    rng: Pcg32,
    ids: IdAlloc,
    sched: Scheduler,
    coordinator: CollisionCoordinator,
    player: Player,
    weapon: Option<Weapon>,
    enemies: Vec<Enemy>,
    /// Initial (position, speed) records; waves resample from these
    seed_spawns: Vec<(Vec2, f32)>,
    countdown_secs: i64,
    countdown_timer: TimerId,
    countdown_expired: bool,
    time: f64,
    tick: u64,
}

impl GameScene {
    /// Build the scene from engine-supplied map data. Fails fast on an
    /// invalid map; the app shell treats that as fatal for the run.
    pub fn new(data: MapData, seed: u64) -> Result<Self, MapError> {
        let map = TileMap::from_data(data)?;
        let rng = Pcg32::seed_from_u64(seed);
        let mut ids = IdAlloc::default();
        let mut sched = Scheduler::new();
        let mut coordinator = CollisionCoordinator::new();
        coordinator.register(ContactRule::PlayerGround);
        coordinator.register(ContactRule::EnemyGround);
        coordinator.register(ContactRule::PlayerEnemy);

        let mut player = Player::new(ids.next_id(), map.player_spawn());
        player.has_weapon = true;
        let weapon = Weapon::new(ids.next_id(), player.pos);

        let countdown_timer = sched.every(0.0, 1000.0);

        let mut scene = Self {
            map,
            rng,
            ids,
            sched,
            coordinator,
            player,
            weapon: Some(weapon),
            enemies: Vec::new(),
            seed_spawns: Vec::new(),
            countdown_secs: COUNTDOWN_START_SECS,
            countdown_timer,
            countdown_expired: false,
            time: 0.0,
            tick: 0,
        };

        for pos in scene.map.enemy_spawns().to_vec() {
            let speed = scene.rng.random_range(0..ENEMY_MAX_SEED_SPEED) as f32;
            scene.seed_spawns.push((pos, speed));
            scene.spawn_enemy(pos, speed);
        }
        info!(
            "scene ready: {} enemies, countdown {}s",
            scene.enemies.len(),
            scene.countdown_secs
        );
        Ok(scene)
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn weapon(&self) -> Option<&Weapon> {
        self.weapon.as_ref()
    }

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn countdown_secs(&self) -> i64 {
        self.countdown_secs
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Ticks advanced since scene start
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    #[cfg(test)]
    pub(crate) fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    fn spawn_enemy(&mut self, pos: Vec2, speed: f32) {
        let id = self.ids.next_id();
        let aura = Aura::new(self.ids.next_id(), pos, id);
        let mut enemy = Enemy::new(id, pos, speed, aura);
        enemy.start_wandering(self.time, &mut self.sched);
        enemy.reroll_direction(&mut self.rng);
        enemy.aura_collision_enabled = true;
        self.coordinator.register(ContactRule::WeaponAura { enemy: id });
        self.enemies.push(enemy);
    }

    /// Spawn the per-minute reinforcement wave: each new plague resamples
    /// one of the initial spawn records (with replacement) and runs slightly
    /// faster than its seed. The bonus never compounds across waves.
    fn spawn_wave(&mut self, hub: &mut GameHub) {
        if self.seed_spawns.is_empty() {
            return;
        }
        let count = wave_size(self.seed_spawns.len());
        for _ in 0..count {
            let (pos, speed) = self.seed_spawns[self.rng.random_range(0..self.seed_spawns.len())];
            self.spawn_enemy(pos, speed + WAVE_SPEED_BONUS);
        }
        info!("wave spawned: +{count} plagues ({} alive)", self.enemies.len());
        hub.new_wave();
    }

    fn on_countdown_second(&mut self, hub: &mut GameHub) {
        if self.countdown_secs > 0 {
            self.countdown_secs -= 1;
        }
        hub.set_countdown(self.countdown_secs);
        if self.countdown_secs <= 0 {
            self.countdown_expired = true;
            return;
        }
        if self.countdown_secs % 60 == WAVE_TRIGGER_SECOND {
            self.spawn_wave(hub);
        }
    }

    fn dispatch_timers(&mut self, hub: &mut GameHub) {
        for id in self.sched.poll(self.time) {
            if id == self.countdown_timer {
                self.on_countdown_second(hub);
                continue;
            }
            if let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| e.move_timer() == Some(id))
            {
                enemy.reroll_direction(&mut self.rng);
                continue;
            }
            if let Some(enemy) = self
                .enemies
                .iter_mut()
                .find(|e| e.human_counter() == Some(id))
            {
                enemy.on_human_counter();
            }
        }
    }

    /// Score plagues that just went inactive. Their one-time fade flag has
    /// not flipped yet this tick, so each is counted exactly once.
    fn score_saved(&mut self, hub: &mut GameHub, book: &mut ScoreBook) {
        for enemy in &self.enemies {
            if enemy.is_inactive_not_back_to_human() {
                let points = enemy.default_vel.round() as u32;
                hub.add_score(points);
                hub.play_sound("plagueSaved");
                book.add_score(points);
                info!("plague {} saved for {points} points", enemy.id);
            }
        }
    }

    fn detect_contacts(&mut self) -> Contacts {
        let mut contacts = Contacts::default();
        let dt = tick_dt();

        let (pos, blocked) = move_body(
            &self.map,
            self.player.pos,
            self.player.vel,
            PLAYER_BODY,
            dt,
        );
        self.player.pos = pos;
        contacts.player_ground = blocked;

        for enemy in &mut self.enemies {
            let (pos, blocked) = move_body(&self.map, enemy.pos, enemy.vel, ENEMY_BODY, dt);
            enemy.pos = pos;
            if blocked {
                contacts.enemy_ground.push(enemy.id);
            }
        }

        let player_box = Aabb::new(self.player.pos, PLAYER_BODY);
        for enemy in &self.enemies {
            if enemy.is_hostile() && player_box.overlaps(&Aabb::new(enemy.pos, ENEMY_BODY)) {
                contacts.player_enemy.push(enemy.id);
            }
        }

        let weapon_box = self
            .weapon
            .as_ref()
            .filter(|w| w.visible)
            .map(|w| Aabb::new(w.pos, WEAPON_BODY));
        for enemy in &mut self.enemies {
            if !enemy.aura_collision_enabled {
                continue;
            }
            if let Some(aura) = enemy.aura.as_mut() {
                let touching = weapon_box
                    .as_ref()
                    .is_some_and(|wb| wb.overlaps(&Aabb::new(aura.pos, AURA_BODY)));
                aura.set_touching(touching);
                if touching {
                    contacts.weapon_aura.push(enemy.id);
                }
            }
        }

        contacts
    }

    fn remove_dead(&mut self) {
        // Contact rules stay registered; a rule whose enemy is gone is inert
        let mut index = 0;
        while index < self.enemies.len() {
            if self.enemies[index].status == EnemyStatus::Dead {
                let mut enemy = self.enemies.remove(index);
                enemy.teardown(&mut self.sched);
            } else {
                index += 1;
            }
        }
        if self.weapon.as_ref().is_some_and(|w| !w.visible) {
            self.weapon = None;
        }
    }

    /// Advance the whole scene by one fixed timestep
    pub fn tick(
        &mut self,
        input: &InputState,
        hub: &mut GameHub,
        book: &mut ScoreBook,
    ) -> TickOutcome {
        self.time += TICK_MS;
        self.tick += 1;

        self.dispatch_timers(hub);
        self.score_saved(hub, book);

        self.player.update(self.time, input);

        // Enemy state machines run before movement so velocity is current
        for enemy in &mut self.enemies {
            enemy.update(self.time, &mut self.sched);
        }

        let contacts = self.detect_contacts();

        // Weapon trails the resolved player position
        if let Some(weapon) = self.weapon.as_mut() {
            weapon.update(
                self.player.pos,
                self.player.vel,
                self.player.direction,
                self.player.status,
                self.time,
            );
        }
        let firing = self
            .weapon
            .as_ref()
            .is_some_and(|w| w.status == WeaponStatus::Fire);
        hub.set_ambient_dim(firing);

        let effects = self.coordinator.apply(
            &contacts,
            &mut self.player,
            self.weapon.as_ref(),
            &mut self.enemies,
        );
        for effect in effects {
            match effect {
                RuleEffect::CameraShake {
                    duration_ms,
                    intensity,
                } => hub.camera_shake(duration_ms, intensity),
            }
        }

        for enemy in &mut self.enemies {
            let (owner_pos, owner_vel) = (enemy.pos, enemy.vel);
            let cured = enemy
                .aura
                .as_mut()
                .is_some_and(|a| a.update(owner_pos, owner_vel, self.time));
            if cured {
                enemy.on_aura_dead(self.time);
            }
        }

        self.remove_dead();

        hub.set_lives(self.player.lives);
        if self.player.status == PlayerStatus::Dead || self.countdown_expired {
            if let Some(weapon) = self.weapon.as_mut() {
                weapon.kill();
            }
            return TickOutcome::GameOver;
        }
        TickOutcome::Running
    }
}
