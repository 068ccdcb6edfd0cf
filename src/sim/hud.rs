//! Read-only HUD data for the UI layer

use serde::{Deserialize, Serialize};

use super::pattern::Pattern;
use super::state::{GamePhase, World};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HudSnapshot {
    pub phase: GamePhase,
    pub score: u64,
    pub portfolio_value: f64,
    pub level: u32,
    pub obstacles_in_level: u32,
    pub obstacles_needed: u32,
    pub speed: f32,
    pub pipe_gap: f32,
    pub pattern: Pattern,
    pub character: Option<String>,
}

impl HudSnapshot {
    pub fn capture(world: &World) -> Self {
        let difficulty = &world.difficulty;
        Self {
            phase: world.game.phase,
            score: world.game.score,
            portfolio_value: world.game.portfolio_value,
            level: difficulty.level,
            obstacles_in_level: difficulty.obstacles_in_level,
            obstacles_needed: difficulty.obstacles_needed,
            speed: difficulty.speed,
            pipe_gap: difficulty.pipe_gap,
            pattern: world.obstacles.current_pattern(),
            character: world.game.selected_character.clone(),
        }
    }

    /// Speed and gap line, e.g. `Speed: 1.5x | Gap: 200px`
    pub fn difficulty_text(&self) -> String {
        format!("Speed: {:.1}x | Gap: {}px", self.speed, self.pipe_gap.round())
    }

    /// Active pattern, e.g. `Pattern: Staircase`
    pub fn pattern_text(&self) -> String {
        let name = self.pattern.as_str();
        let mut chars = name.chars();
        let capitalized = match chars.next() {
            Some(first) => first.to_ascii_uppercase().to_string() + chars.as_str(),
            None => String::new(),
        };
        format!("Pattern: {}", capitalized)
    }

    /// Portfolio formatted for display, e.g. `$1,250,000`
    pub fn portfolio_text(&self) -> String {
        let whole = self.portfolio_value.max(0.0).round() as u64;
        let digits = whole.to_string();
        let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
        out.push('$');
        for (i, ch) in digits.chars().enumerate() {
            if i > 0 && (digits.len() - i) % 3 == 0 {
                out.push(',');
            }
            out.push(ch);
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tuning::Tuning;

    #[test]
    fn test_capture_reflects_world() {
        let mut world = World::new(Tuning::default(), 5).unwrap();
        world.set_selected_character("whale");
        world.game.score = 12;
        let hud = HudSnapshot::capture(&world);
        assert_eq!(hud.score, 12);
        assert_eq!(hud.level, 1);
        assert_eq!(hud.obstacles_needed, 3);
        assert_eq!(hud.pattern, Pattern::Standard);
        assert_eq!(hud.character.as_deref(), Some("whale"));

        let json = serde_json::to_string(&hud).unwrap();
        assert!(json.contains("\"pattern\":\"standard\""));
        assert!(json.contains("\"phase\":\"loading\""));
    }

    #[test]
    fn test_difficulty_and_pattern_lines() {
        let mut world = World::new(Tuning::default(), 5).unwrap();
        world.obstacles.session.current = Pattern::Staircase;
        let hud = HudSnapshot::capture(&world);
        // Level 1: 1.4 + 0.08, 210 - 10
        assert_eq!(hud.difficulty_text(), "Speed: 1.5x | Gap: 200px");
        assert_eq!(hud.pattern_text(), "Pattern: Staircase");
    }

    #[test]
    fn test_portfolio_text() {
        let mut hud = HudSnapshot::capture(&World::new(Tuning::default(), 5).unwrap());
        assert_eq!(hud.portfolio_text(), "$50,000");
        hud.portfolio_value = 1e9;
        assert_eq!(hud.portfolio_text(), "$1,000,000,000");
        hud.portfolio_value = 999.4;
        assert_eq!(hud.portfolio_text(), "$999");
    }
}
