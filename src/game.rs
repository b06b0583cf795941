//! App shell: scene flow and UI commands
//!
//! Owns the hub, the score book and the active scene, and routes the
//! commands the UI layer can issue (start, restart, music toggle). Scene
//! flow: start -> plot (first run only) -> game -> game over -> start.

use log::info;

use crate::hub::{GameHub, SceneId};
use crate::sim::{GameScene, InputState, MapData, MapError, TickOutcome};
use crate::storage::{iso_date_now, ScoreBook, Storage};

/// Commands the UI layer can send into the game
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    PlayGame,
    Restart,
    /// Toggle the background music on
    PlaySound,
    StopSound,
}

/// Intro plot pages shown before the first run
pub const PLOT_PAGES: [&str; 3] = [
    "A plague of shadows has swallowed the town.",
    "Each shadow is a person, trapped inside their own aura.",
    "Hold your path light on an aura to free the human within.",
];

const MUSIC_KEY: &str = "backgroundMusic";

enum AppScene {
    Start,
    Plot { page: usize },
    Game(GameScene),
    GameOver,
}

/// Top-level game container driven by the host engine's frame loop
pub struct App {
    hub: GameHub,
    book: ScoreBook,
    map: MapData,
    seed: u64,
    scene: AppScene,
}

impl App {
    pub fn new(storage: Box<dyn Storage>, map: MapData, seed: u64) -> Self {
        Self {
            hub: GameHub::new(),
            book: ScoreBook::new(storage),
            map,
            seed,
            scene: AppScene::Start,
        }
    }

    pub fn hub(&self) -> &GameHub {
        &self.hub
    }

    pub fn hub_mut(&mut self) -> &mut GameHub {
        &mut self.hub
    }

    pub fn book(&self) -> &ScoreBook {
        &self.book
    }

    /// Current plot page text, when the plot scene is up
    pub fn plot_page(&self) -> Option<&'static str> {
        match self.scene {
            AppScene::Plot { page } => PLOT_PAGES.get(page).copied(),
            _ => None,
        }
    }

    pub fn scene_view(&self) -> Option<&GameScene> {
        match &self.scene {
            AppScene::Game(scene) => Some(scene),
            _ => None,
        }
    }

    pub fn handle(&mut self, command: Command) -> Result<(), MapError> {
        info!("ui command: {command:?}");
        match command {
            Command::PlayGame => {
                self.hub.stop_sound();
                if self.book.plot_viewed() {
                    self.start_game()?;
                } else {
                    self.scene = AppScene::Plot { page: 0 };
                    self.hub.set_scene(SceneId::Plot);
                }
            }
            Command::Restart => {
                self.hub.reset_run();
                self.scene = AppScene::Start;
                self.hub.set_scene(SceneId::Start);
            }
            Command::PlaySound => self.hub.play_sound(MUSIC_KEY),
            Command::StopSound => self.hub.stop_sound(),
        }
        Ok(())
    }

    /// Advance the plot; past the last page the game starts and the plot
    /// is never shown again on this device.
    pub fn advance_plot(&mut self) -> Result<(), MapError> {
        let AppScene::Plot { page } = self.scene else {
            return Ok(());
        };
        let next = page + 1;
        if next < PLOT_PAGES.len() {
            self.scene = AppScene::Plot { page: next };
            return Ok(());
        }
        self.book.set_plot_viewed();
        self.start_game()
    }

    fn start_game(&mut self) -> Result<(), MapError> {
        let scene = GameScene::new(self.map.clone(), self.seed)?;
        self.scene = AppScene::Game(scene);
        self.hub.set_scene(SceneId::Game);
        self.hub.play_sound(MUSIC_KEY);
        Ok(())
    }

    /// Drive one fixed timestep; no-op outside the game scene
    pub fn tick(&mut self, input: &InputState) -> SceneId {
        if let AppScene::Game(scene) = &mut self.scene {
            let outcome = scene.tick(input, &mut self.hub, &mut self.book);
            if outcome == TickOutcome::GameOver {
                self.book.finish_run(&iso_date_now());
                self.scene = AppScene::GameOver;
                self.hub.stop_sound();
                self.hub.set_scene(SceneId::GameOver);
            }
        }
        self.hub.scene()
    }

    /// Forward render-loop timings to hub subscribers (debug overlay only)
    pub fn frame_metrics(&mut self, delta_ms: f64) {
        if !self.hub.debug {
            return;
        }
        let fps = if delta_ms > 0.0 { 1000.0 / delta_ms } else { 0.0 };
        self.hub.frame_metrics(fps, delta_ms);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hub::HubEvent;
    use crate::sim::PlayerStatus;
    use crate::storage::MemoryStorage;

    fn app() -> App {
        App::new(Box::new(MemoryStorage::new()), MapData::demo(), 11)
    }

    #[test]
    fn test_first_play_shows_plot_then_game() {
        let mut app = app();
        app.handle(Command::PlayGame).unwrap();
        assert_eq!(app.hub().scene(), SceneId::Plot);
        assert_eq!(app.plot_page(), Some(PLOT_PAGES[0]));

        app.advance_plot().unwrap();
        app.advance_plot().unwrap();
        assert_eq!(app.plot_page(), Some(PLOT_PAGES[2]));
        app.advance_plot().unwrap();
        assert_eq!(app.hub().scene(), SceneId::Game);
        assert!(app.book().plot_viewed());
    }

    #[test]
    fn test_plot_skipped_once_viewed() {
        let mut storage = MemoryStorage::new();
        storage.set(crate::storage::keys::PLOT_IS_VIEWED, "true");
        let mut app = App::new(Box::new(storage), MapData::demo(), 11);
        app.handle(Command::PlayGame).unwrap();
        assert_eq!(app.hub().scene(), SceneId::Game);
    }

    #[test]
    fn test_invalid_map_aborts_game_start() {
        let mut map = MapData::demo();
        map.ground = None;
        let mut storage = MemoryStorage::new();
        storage.set(crate::storage::keys::PLOT_IS_VIEWED, "true");
        let mut app = App::new(Box::new(storage), map, 11);
        assert!(app.handle(Command::PlayGame).is_err());
        assert_ne!(app.hub().scene(), SceneId::Game);
    }

    #[test]
    fn test_game_over_finishes_run_and_records_history() {
        let mut storage = MemoryStorage::new();
        storage.set(crate::storage::keys::PLOT_IS_VIEWED, "true");
        let mut app = App::new(Box::new(storage), MapData::demo(), 11);
        app.handle(Command::PlayGame).unwrap();

        // Force the run to end
        if let AppScene::Game(scene) = &mut app.scene {
            scene.player_mut().status = PlayerStatus::Dead;
        }
        let scene = app.tick(&InputState::default());
        assert_eq!(scene, SceneId::GameOver);
        assert_eq!(app.book().totals().len(), 1);
        assert_eq!(app.book().score(), 0);
    }

    #[test]
    fn test_restart_resets_hub_and_returns_to_start() {
        let mut app = app();
        let sub = app.hub_mut().subscribe();
        app.hub_mut().set_lives(2);
        app.hub_mut().add_score(300);
        app.handle(Command::Restart).unwrap();
        assert_eq!(app.hub().scene(), SceneId::Start);
        assert_eq!(app.hub().score(), 0);
        let events = app.hub_mut().poll(sub);
        assert!(events.contains(&HubEvent::RunReset));
        assert!(events.contains(&HubEvent::SceneChanged(SceneId::Start)));
    }

    #[test]
    fn test_music_commands_reach_subscribers() {
        let mut app = app();
        let sub = app.hub_mut().subscribe();
        app.handle(Command::PlaySound).unwrap();
        app.handle(Command::StopSound).unwrap();
        assert_eq!(
            app.hub_mut().poll(sub),
            vec![HubEvent::PlaySound(MUSIC_KEY), HubEvent::StopSound]
        );
    }

    #[test]
    fn test_tick_outside_game_scene_is_noop() {
        let mut app = app();
        assert_eq!(app.tick(&InputState::default()), SceneId::Start);
    }

    #[test]
    fn test_frame_metrics_require_debug() {
        let mut app = app();
        let sub = app.hub_mut().subscribe();
        app.frame_metrics(16.0);
        assert!(app.hub_mut().poll(sub).is_empty());

        app.hub_mut().debug = true;
        app.frame_metrics(16.0);
        assert!(matches!(
            app.hub_mut().poll(sub).as_slice(),
            [HubEvent::FrameMetrics { .. }]
        ));
    }
}
