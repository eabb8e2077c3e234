//! Cursor spark trail (stateful).

use std::f32::consts::TAU;

use rand::{Rng, SeedableRng, rngs::StdRng};
use ratatui::{
    style::{Color, Style},
    text::Span,
    widgets::canvas::Context,
};

use crate::chars::{SPARK_CHARS, pick};
use crate::color::blend;

/// Most sparks alive at once. Oldest sparks are dropped first.
pub const MAX_SPARKS: usize = 60;

/// Sparks emitted per pointer move.
pub const SPAWN_BATCH: usize = 8;

/// Per-frame velocity multiplier on both axes.
pub const VELOCITY_DECAY: f32 = 0.96;

/// Downward acceleration in pixels per frame squared.
pub const GRAVITY: f32 = 0.15;

/// Life lost per frame.
pub const LIFE_STEP: f32 = 0.025;

/// Rainbow palette: red, yellow, green, sky, purple, pink, rose.
pub const SPARK_PALETTE: [Color; 7] = [
    Color::Rgb(0xf8, 0x71, 0x71),
    Color::Rgb(0xfb, 0xbf, 0x24),
    Color::Rgb(0x34, 0xd3, 0x99),
    Color::Rgb(0x38, 0xbd, 0xf8),
    Color::Rgb(0xa7, 0x8b, 0xfa),
    Color::Rgb(0xf4, 0x72, 0xb6),
    Color::Rgb(0xfb, 0x71, 0x85),
];

const SPEED_MIN: f32 = 1.5;
const SPEED_MAX: f32 = 3.5;
const SIZE_MIN: f32 = 4.0;
const SIZE_MAX: f32 = 8.0;

/// A short-lived particle in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct Spark {
    pub x: f32,
    pub y: f32,
    pub dx: f32,
    pub dy: f32,
    pub color: Color,
    pub size: f32,
    /// Remaining life in (0, 1]. Doubles as opacity.
    pub life: f32,
    /// Spawn order, stable across frames.
    pub id: u64,
}

impl Spark {
    fn step(&mut self) {
        self.x += self.dx;
        self.y += self.dy;
        self.dx *= VELOCITY_DECAY;
        self.dy = (self.dy + GRAVITY) * VELOCITY_DECAY;
        self.life -= LIFE_STEP;
    }
}

/// Emits sparks on pointer movement and ages them every frame.
#[derive(Debug, Clone)]
pub struct SparkEmitter {
    /// Live sparks, oldest first.
    sparks: Vec<Spark>,
    /// Id given to the next spark.
    next_id: u64,
    rng: StdRng,
    /// Cleared on unmount, after which nothing changes.
    mounted: bool,
}

impl SparkEmitter {
    pub fn new(seed: u64) -> Self {
        Self {
            sparks: Vec::with_capacity(MAX_SPARKS + SPAWN_BATCH),
            next_id: 0,
            rng: StdRng::seed_from_u64(seed),
            mounted: true,
        }
    }

    /// Live sparks, oldest first.
    pub fn sparks(&self) -> &[Spark] {
        &self.sparks
    }

    pub fn len(&self) -> usize {
        self.sparks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sparks.is_empty()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Emit a batch of sparks at a pointer position, in pixels.
    pub fn on_pointer_move(&mut self, x: f32, y: f32) {
        if !self.mounted {
            return;
        }

        for _ in 0..SPAWN_BATCH {
            let angle = self.rng.random_range(0.0..TAU);
            let speed = self.rng.random_range(SPEED_MIN..SPEED_MAX);
            let color = SPARK_PALETTE[self.rng.random_range(0..SPARK_PALETTE.len())];
            let size = self.rng.random_range(SIZE_MIN..SIZE_MAX);
            self.sparks.push(Spark {
                x,
                y,
                dx: angle.cos() * speed,
                dy: angle.sin() * speed,
                color,
                size,
                life: 1.0,
                id: self.next_id,
            });
            self.next_id += 1;
        }

        if self.sparks.len() > MAX_SPARKS {
            let excess = self.sparks.len() - MAX_SPARKS;
            self.sparks.drain(..excess);
        }
    }

    /// Age every spark by one frame, then drop the spent ones.
    pub fn tick(&mut self) {
        if !self.mounted {
            return;
        }
        for spark in &mut self.sparks {
            spark.step();
        }
        self.sparks.retain(|spark| spark.life > 0.0);
    }

    /// Stop reacting to frames and pointer movement.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }
}

/// Draw each spark as a dot sized by `size`, faded by its remaining life.
pub fn paint(
    ctx: &mut Context,
    emitter: &SparkEmitter,
    height: f32,
    background: &dyn Fn(f32, f32) -> Color,
) {
    for spark in &emitter.sparks {
        let ch = pick(SPARK_CHARS, (spark.size - SIZE_MIN) / (SIZE_MAX - SIZE_MIN));
        let color = blend(spark.color, background(spark.x, spark.y), spark.life);
        ctx.print(
            spark.x as f64,
            (height - spark.y) as f64,
            Span::styled(ch.to_string(), Style::new().fg(color)),
        );
    }
}
