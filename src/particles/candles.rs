//! Floating candles circling the assembled tree

use std::f32::consts::TAU;

use rand::Rng;

use crate::math::Vec3;

pub const CANDLE_COUNT: usize = 30;

const BOB_AMPLITUDE: f32 = 0.3;

/// A single candle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candle {
    pub base: Vec3,
    pub speed: f32,
    pub offset: f32,
}

impl Candle {
    pub fn position(&self, time: f32) -> Vec3 {
        let bob = (time * self.speed + self.offset).sin() * BOB_AMPLITUDE;
        self.base.with_y(self.base.y + bob)
    }
}

/// Ring of candles, evenly spaced in angle around the trunk
pub struct CandleRing {
    candles: Vec<Candle>,
    positions: Vec<f32>,
    visible: bool,
}

impl CandleRing {
    pub fn new<R: Rng + ?Sized>(rng: &mut R, count: usize) -> Self {
        let candles = (0..count)
            .map(|i| {
                let angle = i as f32 / count as f32 * TAU;
                let radius = 2.5 + rng.gen::<f32>() * 2.0;
                let y = 1.0 + rng.gen::<f32>() * 4.0;
                Candle {
                    base: Vec3::new(angle.cos() * radius, y, angle.sin() * radius),
                    speed: 0.5 + rng.gen::<f32>() * 0.5,
                    offset: rng.gen::<f32>() * 10.0,
                }
            })
            .collect();

        Self {
            candles,
            positions: Vec::with_capacity(count * 3),
            visible: false,
        }
    }

    /// Candles only show while the lights are on and the tree is assembled
    pub fn update(&mut self, time: f32, visible: bool) {
        self.visible = visible;
        self.positions.clear();
        if !visible {
            return;
        }
        for candle in &self.candles {
            self.positions.extend_from_slice(&candle.position(time).to_array());
        }
    }

    /// Flat xyz positions; empty while hidden
    pub fn positions(&self) -> &[f32] {
        &self.positions
    }

    pub fn is_visible(&self) -> bool {
        self.visible
    }

    pub fn candles(&self) -> &[Candle] {
        &self.candles
    }
}
