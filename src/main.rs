use log::{info, warn};
use macroquad::prelude::*;

use tetris_clone::config::Config;
use tetris_clone::game::GameState;
use tetris_clone::input::InputQueue;
use tetris_clone::render;
use tetris_clone::sound::SoundManager;
use tetris_clone::updater::Updater;

fn window_conf() -> Conf {
    Conf {
        window_title: "Tetris Clone".to_owned(),
        window_width: 450,
        window_height: 650,
        window_resizable: false,
        ..Default::default()
    }
}

async fn load_font(config: &Config) -> Option<Font> {
    let path = config.font_path.as_ref()?;
    match load_ttf_font(&path.to_string_lossy()).await {
        Ok(font) => Some(font),
        Err(e) => {
            warn!("could not load font {}: {e}; using the default", path.display());
            None
        }
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::load();
    let font = load_font(&config).await;
    let mut audio = match SoundManager::new(&config) {
        Ok(manager) => Some(manager),
        Err(e) => {
            warn!("{e}; playing without sound");
            None
        }
    };

    let seed = config.seed.unwrap_or_else(::rand::random);
    info!("starting game with seed {seed}");
    let mut game = GameState::new(seed);
    let mut input = InputQueue::new();
    let mut updater = Updater::default();

    loop {
        if is_key_pressed(KeyCode::Escape) {
            break;
        }
        let dt = get_frame_time();

        if is_key_pressed(KeyCode::Enter) && !game.is_game_over() {
            game.toggle_pause();
            if let Some(audio) = audio.as_mut() {
                audio.toggle_pause();
            }
        }
        if is_key_pressed(KeyCode::M) {
            if let Some(audio) = audio.as_mut() {
                audio.toggle_mute();
            }
        }
        if is_key_pressed(KeyCode::R) && game.is_game_over() {
            game.restart();
        }

        input.poll_keyboard(dt);
        for _ in 0..updater.advance(dt) {
            for command in input.drain() {
                game.apply(command);
            }
            game.update(updater.step());
        }

        for sound in game.drain_events() {
            if let Some(audio) = audio.as_mut() {
                audio.play(sound);
            }
        }

        render::draw_game(&game, &updater.stats(), font.as_ref());
        next_frame().await;
    }
}
