//! Character roster and selection
//!
//! Selection is cosmetic: the simulation only records the chosen id.

use serde::{Deserialize, Serialize};

use crate::sim::GamePhase;

/// Selection cell size (px)
pub const CELL_SIZE: f32 = 60.0;
/// Horizontal distance between cell origins (px)
pub const CELL_PITCH: f32 = 70.0;
/// Strip offset below canvas center on the start screen
const START_OFFSET: f32 = 120.0;
/// Strip offset below canvas center on the game-over screen
const GAME_OVER_OFFSET: f32 = 150.0;

/// A selectable character
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Character {
    pub id: String,
    pub name: String,
    /// Fallback fill color (CSS) until the sprite loads
    pub color: String,
}

impl Character {
    pub fn new(id: &str, name: &str, color: &str) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            color: color.to_string(),
        }
    }
}

/// Stock roster
pub fn default_roster() -> Vec<Character> {
    vec![
        Character::new("bull", "Bull", "#26a69a"),
        Character::new("bear", "Bear", "#ef5350"),
        Character::new("whale", "Whale", "#42a5f5"),
        Character::new("degen", "Degen", "#ffca28"),
    ]
}

#[derive(Debug, Clone)]
pub struct CharacterManager {
    characters: Vec<Character>,
    selected: usize,
}

impl CharacterManager {
    /// Returns `None` for an empty roster
    pub fn new(characters: Vec<Character>) -> Option<Self> {
        if characters.is_empty() {
            log::error!("CharacterManager: no characters provided");
            return None;
        }
        Some(Self {
            characters,
            selected: 0,
        })
    }

    pub fn characters(&self) -> &[Character] {
        &self.characters
    }

    pub fn selected(&self) -> &Character {
        &self.characters[self.selected]
    }

    /// Top of the selection strip for the current screen
    pub fn strip_y(phase: GamePhase, canvas_height: f32) -> f32 {
        let offset = if phase == GamePhase::GameOver {
            GAME_OVER_OFFSET
        } else {
            START_OFFSET
        };
        canvas_height / 2.0 + offset
    }

    /// Left edge of cell `index`
    pub fn cell_x(&self, index: usize, canvas_width: f32) -> f32 {
        let start = canvas_width / 2.0 - (self.characters.len() as f32 * CELL_PITCH) / 2.0;
        start + index as f32 * CELL_PITCH
    }

    /// Hit-test a click; returns true when the selection changed
    pub fn handle_selection(
        &mut self,
        x: f32,
        y: f32,
        phase: GamePhase,
        canvas_width: f32,
        canvas_height: f32,
    ) -> bool {
        let top = Self::strip_y(phase, canvas_height);
        if y < top || y > top + CELL_SIZE {
            return false;
        }

        let hit = (0..self.characters.len()).find(|&i| {
            let left = self.cell_x(i, canvas_width);
            x >= left && x <= left + CELL_SIZE
        });

        match hit {
            Some(i) if i != self.selected => {
                self.selected = i;
                log::info!("Selected character: {}", self.characters[i].name);
                true
            }
            _ => false,
        }
    }
}
