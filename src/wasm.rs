use serde::Serialize;
use wasm_bindgen::prelude::*;

use crate::game::GameEngine;
use crate::setup::GameSetup;

/// JS handle to a [`GameEngine`]. Structured values cross the boundary via
/// `serde-wasm-bindgen`; field names stay snake_case.
#[wasm_bindgen]
#[derive(Debug, Default)]
pub struct WasmGame {
    engine: GameEngine,
}

#[wasm_bindgen]
impl WasmGame {
    #[wasm_bindgen(constructor)]
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `{ rows: string[8], to_move?: 1 | 2 }`.
    #[wasm_bindgen(js_name = fromSetup)]
    pub fn from_setup(setup: JsValue) -> Result<WasmGame, JsValue> {
        let setup: GameSetup = serde_wasm_bindgen::from_value(setup)?;
        let engine =
            GameEngine::from_setup(&setup).map_err(|err| JsValue::from_str(&err.to_string()))?;
        Ok(Self { engine })
    }

    pub fn reset(&mut self) {
        self.engine.reset();
    }

    #[wasm_bindgen(js_name = makeMove)]
    pub fn make_move(&mut self, row: i32, col: i32) -> bool {
        self.engine.make_move(row, col)
    }

    /// Legality for the side to move.
    #[wasm_bindgen(js_name = isValidMove)]
    pub fn is_valid_move(&self, row: i32, col: i32) -> bool {
        self.engine.is_valid_move(row, col, self.engine.current_player())
    }

    /// `{ row, col }[]` for the side to move, row-major.
    #[wasm_bindgen(js_name = validMoves)]
    pub fn valid_moves(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.valid_moves(self.engine.current_player()))
    }

    #[wasm_bindgen(js_name = currentPlayer)]
    pub fn current_player(&self) -> u8 {
        self.engine.current_player().code()
    }

    #[wasm_bindgen(js_name = isGameOver)]
    pub fn is_game_over(&self) -> bool {
        self.engine.is_game_over()
    }

    #[wasm_bindgen(js_name = checkGameOver)]
    pub fn check_game_over(&mut self) -> bool {
        self.engine.check_game_over()
    }

    pub fn state(&self) -> Result<JsValue, JsValue> {
        to_js(&self.engine.to_game_state())
    }

    /// `null` while the game is running.
    pub fn result(&self) -> Result<JsValue, JsValue> {
        match self.engine.to_game_result() {
            Some(result) => to_js(&result),
            None => Ok(JsValue::NULL),
        }
    }
}

fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, JsValue> {
    Ok(serde_wasm_bindgen::to_value(value)?)
}
