//! Plague Light entry point
//!
//! The web build is driven by the host engine's render loop through the
//! library API; this binary only does platform initialization. The native
//! build runs a short headless demo of the simulation for smoke-testing
//! and profiling.

#[cfg(not(target_arch = "wasm32"))]
fn main() {
    use plague_light::consts::TICK_MS;
    use plague_light::sim::{InputState, MapData};
    use plague_light::storage::MemoryStorage;
    use plague_light::{App, Command, HubEvent, SceneId};

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let seed = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0);
    log::info!("headless demo starting with seed {seed}");

    let mut app = App::new(Box::new(MemoryStorage::new()), MapData::demo(), seed);
    let sub = app.hub_mut().subscribe();

    app.handle(Command::PlayGame).expect("demo map is valid");
    // First run shows the plot; click through it
    while app.plot_page().is_some() {
        app.advance_plot().expect("demo map is valid");
    }

    // Scripted 60 seconds: circle the room with the trigger held
    let demo_secs = 60.0;
    let ticks = (demo_secs * 1000.0 / TICK_MS) as u64;
    for tick in 0..ticks {
        let phase = (tick / 120) % 4;
        let input = InputState {
            left: phase == 0,
            up: phase == 1,
            right: phase == 2,
            down: phase == 3,
            fire: true,
        };
        if app.tick(&input) == SceneId::GameOver {
            break;
        }
        for event in app.hub_mut().poll(sub) {
            match event {
                HubEvent::ScoreDelta(points) => log::info!("scored {points}"),
                HubEvent::NewWave => log::info!("new wave incoming"),
                HubEvent::LivesChanged(lives) => log::info!("lives: {lives}"),
                _ => {}
            }
        }
    }

    log::info!(
        "demo over: score {}, {} lives left, {} runs recorded",
        app.hub().score(),
        app.hub().lives(),
        app.book().totals().len()
    );
}

#[cfg(target_arch = "wasm32")]
mod wasm {
    use wasm_bindgen::prelude::*;

    #[wasm_bindgen(start)]
    pub fn wasm_main() {
        console_error_panic_hook::set_once();
        console_log::init_with_level(log::Level::Info).expect("Failed to init logger");
        log::info!("Plague Light core loaded; waiting for the host engine");
    }
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // WASM entry point is wasm_main, this is just to satisfy the compiler
}
