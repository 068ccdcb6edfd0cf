//! Candlestick trail of the player's height
//!
//! Purely decorative: one candle per `candle_width` of world travel, opening at
//! the previous close. Not consulted by collision or scoring.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

use crate::tuning::ChartTuning;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CandleDirection {
    /// Player rose (screen y decreased)
    Up,
    Down,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    /// World position the candle was opened at
    pub x: f32,
    pub open: f32,
    pub close: f32,
    pub high: f32,
    pub low: f32,
    pub direction: CandleDirection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartTrail {
    pub candles: VecDeque<Candle>,
    last_y: f32,
    canvas_height: f32,
    tuning: ChartTuning,
}

impl ChartTrail {
    pub fn new(tuning: ChartTuning, canvas_height: f32) -> Self {
        Self {
            candles: VecDeque::with_capacity(tuning.max_candles + 1),
            last_y: canvas_height / 2.0,
            canvas_height,
            tuning,
        }
    }

    pub fn reset(&mut self) {
        self.candles.clear();
        self.last_y = self.canvas_height / 2.0;
    }

    /// Add a candle if the world has moved a full candle width since the last one
    pub fn update(&mut self, world_x: f32, player_y: f32) {
        let due = self
            .candles
            .back()
            .is_none_or(|last| world_x - last.x >= self.tuning.candle_width);
        if !due {
            return;
        }

        let h = self.canvas_height;
        let close = player_y.clamp(0.0, h);
        let open = self.last_y.clamp(0.0, h);
        let pad = self.tuning.wick_buffer * self.tuning.vertical_fill;

        self.candles.push_back(Candle {
            x: world_x,
            open,
            close,
            high: (open.min(close) - pad).max(0.0),
            low: (open.max(close) + pad).min(h),
            direction: if close < open {
                CandleDirection::Up
            } else {
                CandleDirection::Down
            },
        });
        self.last_y = close;

        while self.candles.len() > self.tuning.max_candles {
            self.candles.pop_front();
        }
    }
}
