use once_cell::sync::OnceCell;
use wasm_bindgen::prelude::*;

pub mod board;
pub mod error;
pub mod game;
pub mod setup;
pub mod types;
pub mod wasm;

pub use board::Board;
pub use error::SetupError;
pub use game::GameEngine;
pub use setup::GameSetup;
pub use types::{Cell, Outcome, PieceCount, Player, Position};

static CONSOLE_LOGGER: OnceCell<bool> = OnceCell::new();

#[wasm_bindgen]
pub fn wasm_ready() -> bool {
    true
}

/// Routes `log` output to the browser console. Only the first call installs
/// the logger; later calls report whether that first install succeeded.
/// Unknown levels fall back to `info`.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    let level = level.parse().unwrap_or(log::Level::Info);
    *CONSOLE_LOGGER.get_or_init(|| console_log::init_with_level(level).is_ok())
}
