//! Falling-block puzzle game.
//!
//! The simulation ([`game`], [`grid`], [`tetromino`]) has no window or audio
//! dependency at runtime and is driven by [`game::GameState::update`] and the
//! command methods. [`input`], [`updater`], [`render`] and [`sound`] connect it
//! to macroquad and rodio.

pub mod config;
pub mod error;
pub mod game;
pub mod grid;
pub mod input;
pub mod render;
pub mod sound;
pub mod tetromino;
pub mod updater;
