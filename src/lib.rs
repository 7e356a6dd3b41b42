//! Archery Arcade core crate.
//!
//! The simulation (`session` and the modules it drives) is plain Rust and runs
//! natively under `cargo test`. The `web` module is the only code that touches
//! browser APIs; JS calls the exported functions below.

use wasm_bindgen::prelude::*;

pub mod arrow;
pub mod bow;
pub mod clock;
pub mod config;
pub mod difficulty;
pub mod error;
pub mod geometry;
mod logger;
pub mod schedule;
pub mod session;
pub mod target;
mod web;

pub use bow::Direction;
pub use config::GameConfig;
pub use error::ArcheryError;
pub use session::{GameEvent, GameSession, Phase};

// Optional small allocator for size (feature gated)
#[cfg(feature = "wee_alloc")]
#[global_allocator]
static ALLOC: wee_alloc::WeeAlloc = wee_alloc::WeeAlloc::INIT;

#[wasm_bindgen(start)]
pub fn wasm_start() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
    logger::init(log::LevelFilter::Info);
}

// -----------------------------------------------------------------------------
// JS entrypoints
// -----------------------------------------------------------------------------

/// Starts a round of the named preset (`"classic"` or `"aimed"`).
#[wasm_bindgen]
pub fn start_game(variant: &str) -> Result<(), JsValue> {
    web::launch(GameConfig::variant(variant)?)?;
    Ok(())
}

#[cfg(feature = "serde_json")]
#[wasm_bindgen]
pub fn start_game_with_config(json: &str) -> Result<(), JsValue> {
    web::launch(GameConfig::from_json(json)?)?;
    Ok(())
}

/// Stops the round and shows the idle screen.
#[wasm_bindgen]
pub fn reset_game() {
    web::reset();
}

#[wasm_bindgen]
pub fn restart_game() -> Result<(), JsValue> {
    web::restart()?;
    Ok(())
}

#[wasm_bindgen]
pub fn current_score() -> u32 {
    web::score()
}
