//! Process-wide game state hub
//!
//! One mutable hub instance owned by the app, passed down by reference. It
//! keeps the current value of every cross-cutting field (scene, lives,
//! countdown text, score, frame metrics) and pushes a change event for each
//! mutation onto a single-producer multi-consumer channel. Subscribers (UI
//! panels, the audio layer, tests) poll at their own pace through per
//! subscriber cursors; late subscribers read current values directly from
//! the hub and only see events published after they joined.

use log::info;
use serde::{Deserialize, Serialize};

use crate::consts::{COUNTDOWN_START_SECS, PLAYER_LIVES};
use crate::format_countdown;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SceneId {
    Start,
    Plot,
    Game,
    GameOver,
}

/// Change notification published by the hub
#[derive(Debug, Clone, PartialEq)]
pub enum HubEvent {
    SceneChanged(SceneId),
    LivesChanged(u32),
    /// Formatted `MM:SS` countdown text
    Countdown(String),
    /// Points just earned (the saved plague's speed)
    ScoreDelta(u32),
    NewWave,
    CameraShake { duration_ms: f64, intensity: f32 },
    FrameMetrics { fps: f64, delta_ms: f64 },
    PlaySound(&'static str),
    StopSound,
    /// Ambient light dims while the weapon fires, restores on completion
    AmbientLight { dim: bool },
    /// All run-scoped fields were reset to their initial values
    RunReset,
}

/// Subscriber handle into the hub's event channel
pub type SubscriberId = usize;

#[derive(Debug)]
pub struct GameHub {
    pub debug: bool,
    scene: SceneId,
    lives: u32,
    countdown: String,
    score: u32,
    ambient_dim: bool,
    fps: f64,
    frame_delta: f64,
    events: Vec<HubEvent>,
    /// Absolute index of `events[0]` in the publish sequence
    base: u64,
    /// Absolute per-subscriber read positions
    cursors: Vec<u64>,
}

impl Default for GameHub {
    fn default() -> Self {
        Self::new()
    }
}

impl GameHub {
    pub fn new() -> Self {
        Self {
            debug: false,
            scene: SceneId::Start,
            lives: PLAYER_LIVES,
            countdown: format_countdown(COUNTDOWN_START_SECS),
            score: 0,
            ambient_dim: false,
            fps: 0.0,
            frame_delta: 0.0,
            events: Vec::new(),
            base: 0,
            cursors: Vec::new(),
        }
    }

    pub fn scene(&self) -> SceneId {
        self.scene
    }

    pub fn lives(&self) -> u32 {
        self.lives
    }

    pub fn countdown(&self) -> &str {
        &self.countdown
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn fps(&self) -> f64 {
        self.fps
    }

    pub fn frame_delta(&self) -> f64 {
        self.frame_delta
    }

    /// Join the channel; only events published after this call are seen
    pub fn subscribe(&mut self) -> SubscriberId {
        self.cursors.push(self.base + self.events.len() as u64);
        self.cursors.len() - 1
    }

    /// Drain this subscriber's unread events in publish order
    pub fn poll(&mut self, subscriber: SubscriberId) -> Vec<HubEvent> {
        let Some(cursor) = self.cursors.get_mut(subscriber) else {
            return Vec::new();
        };
        let start = (*cursor - self.base) as usize;
        let drained: Vec<HubEvent> = self.events[start..].to_vec();
        *cursor = self.base + self.events.len() as u64;
        self.compact();
        drained
    }

    /// Drop events every subscriber has consumed
    fn compact(&mut self) {
        let Some(&min) = self.cursors.iter().min() else {
            return;
        };
        let consumed = (min - self.base) as usize;
        if consumed > 0 {
            self.events.drain(..consumed);
            self.base += consumed as u64;
        }
    }

    fn publish(&mut self, event: HubEvent) {
        // Without subscribers there is nobody to buffer for
        if !self.cursors.is_empty() {
            self.events.push(event);
        }
    }

    pub fn set_scene(&mut self, scene: SceneId) {
        if self.scene == scene {
            return;
        }
        info!("scene change: {:?} -> {:?}", self.scene, scene);
        self.scene = scene;
        self.publish(HubEvent::SceneChanged(scene));
    }

    pub fn set_lives(&mut self, lives: u32) {
        if self.lives == lives {
            return;
        }
        self.lives = lives;
        self.publish(HubEvent::LivesChanged(lives));
    }

    pub fn set_countdown(&mut self, secs: i64) {
        let text = format_countdown(secs);
        if self.countdown == text {
            return;
        }
        self.countdown = text.clone();
        self.publish(HubEvent::Countdown(text));
    }

    /// Add points and publish the delta (subscribers keep running totals)
    pub fn add_score(&mut self, delta: u32) {
        self.score += delta;
        self.publish(HubEvent::ScoreDelta(delta));
    }

    pub fn new_wave(&mut self) {
        self.publish(HubEvent::NewWave);
    }

    pub fn camera_shake(&mut self, duration_ms: f64, intensity: f32) {
        self.publish(HubEvent::CameraShake {
            duration_ms,
            intensity,
        });
    }

    pub fn frame_metrics(&mut self, fps: f64, delta_ms: f64) {
        self.fps = fps;
        self.frame_delta = delta_ms;
        self.publish(HubEvent::FrameMetrics { fps, delta_ms });
    }

    /// Publish only on change, so holding the trigger does not spam
    pub fn set_ambient_dim(&mut self, dim: bool) {
        if self.ambient_dim == dim {
            return;
        }
        self.ambient_dim = dim;
        self.publish(HubEvent::AmbientLight { dim });
    }

    pub fn play_sound(&mut self, key: &'static str) {
        self.publish(HubEvent::PlaySound(key));
    }

    pub fn stop_sound(&mut self) {
        self.publish(HubEvent::StopSound);
    }

    /// Reset every run-scoped field for a fresh run
    pub fn reset_run(&mut self) {
        self.lives = PLAYER_LIVES;
        self.countdown = format_countdown(COUNTDOWN_START_SECS);
        self.score = 0;
        self.ambient_dim = false;
        self.publish(HubEvent::RunReset);
    }
}
