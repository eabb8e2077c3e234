//! Drifting star field with proximity lines (stateful).

use std::time::Duration;

use kosmo_core::{CELL_WIDTH_PX, DeviceClass, Speed, Viewport};
use rand::{Rng, SeedableRng, rngs::StdRng};
use ratatui::{
    style::{Color, Style},
    text::Span,
    widgets::canvas::{Context, Line as CanvasLine},
};

use crate::chars::{STAR_CHARS, pick};
use crate::color::blend;

/// Number of stars when none is configured.
pub const DEFAULT_STAR_COUNT: usize = 30;

/// Opacity of a line between two stars at distance zero.
pub const MAX_LINE_OPACITY: f32 = 0.45;

/// Initial velocity components are drawn from this range, in percent per frame.
const VELOCITY_MIN: f32 = -0.08;
const VELOCITY_MAX: f32 = 0.38;

const SIZE_MIN: f32 = 1.0;
const SIZE_MAX: f32 = 1.0;

/// Twinkle period range in seconds.
const DURATION_MIN: f32 = 1.5;
const DURATION_MAX: f32 = 4.0;

/// Twinkle start delay range in seconds.
const DELAY_MAX: f32 = 3.0;

/// Twinkle keyframes: bright at both ends of a cycle, dim in the middle.
const TWINKLE_BRIGHT: f32 = 0.7;
const TWINKLE_DIM: f32 = 0.1;

/// Lines fainter than this are not drawn.
const MIN_VISIBLE_OPACITY: f32 = 0.02;

/// Width in pixels of one braille dot: a cell holds two dots across.
const BRAILLE_DOT_PX: f32 = CELL_WIDTH_PX / 2.0;

/// A single star. Position is in percent of the viewport.
#[derive(Debug, Clone, PartialEq)]
pub struct Star {
    /// Horizontal position (0-100).
    pub left: f32,
    /// Vertical position (0-100).
    pub top: f32,
    /// Horizontal velocity in percent per frame.
    pub dx: f32,
    /// Vertical velocity in percent per frame.
    pub dy: f32,
    /// Star size.
    pub size: f32,
    /// Twinkle period in seconds.
    pub duration: f32,
    /// Delay before twinkling starts, in seconds.
    pub delay: f32,
}

impl Star {
    fn random(rng: &mut StdRng, speed: Speed) -> Self {
        Self {
            left: rng.random_range(0.0..100.0),
            top: rng.random_range(0.0..100.0),
            size: random_between(rng, SIZE_MIN, SIZE_MAX),
            duration: random_between(rng, DURATION_MIN, DURATION_MAX),
            delay: random_between(rng, 0.0, DELAY_MAX),
            dx: random_between(rng, VELOCITY_MIN, VELOCITY_MAX) * speed.get(),
            dy: random_between(rng, VELOCITY_MIN, VELOCITY_MAX) * speed.get(),
        }
    }

    /// Advance one frame, reflecting off the edges of the 0-100 box.
    ///
    /// Each axis is handled on its own: a coordinate that leaves the box is
    /// clamped to the edge and its velocity component negated.
    pub fn step(&mut self) {
        (self.left, self.dx) = bounce(self.left + self.dx, self.dx);
        (self.top, self.dy) = bounce(self.top + self.dy, self.dy);
    }

    /// Opacity of the star at `elapsed` time since mount.
    pub fn twinkle(&self, elapsed: Duration) -> f32 {
        let t = elapsed.as_secs_f32() - self.delay;
        if t < 0.0 || self.duration <= 0.0 {
            return 1.0;
        }
        let phase = (t % self.duration) / self.duration;
        // 0 at both ends of the cycle, 1 in the middle
        let tri = 1.0 - (2.0 * phase - 1.0).abs();
        TWINKLE_BRIGHT - (TWINKLE_BRIGHT - TWINKLE_DIM) * tri
    }
}

fn random_between(rng: &mut StdRng, min: f32, max: f32) -> f32 {
    if max > min {
        rng.random_range(min..max)
    } else {
        min
    }
}

fn bounce(position: f32, velocity: f32) -> (f32, f32) {
    if position < 0.0 {
        (0.0, -velocity)
    } else if position > 100.0 {
        (100.0, -velocity)
    } else {
        (position, velocity)
    }
}

/// A line between two nearby stars, in pixel coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Link {
    pub from: (f32, f32),
    pub to: (f32, f32),
    /// Line opacity, falling linearly to zero at the connect distance.
    pub opacity: f32,
}

/// Compute the line between two stars, if they are close enough.
pub fn link_between(
    a: &Star,
    b: &Star,
    viewport: Viewport,
    connect_distance: f32,
) -> Option<Link> {
    let from = viewport.to_pixels(a.left, a.top);
    let to = viewport.to_pixels(b.left, b.top);
    let distance = (from.0 - to.0).hypot(from.1 - to.1);
    (distance < connect_distance).then(|| Link {
        from,
        to,
        opacity: MAX_LINE_OPACITY * (1.0 - distance / connect_distance),
    })
}

/// Star field options.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StarFieldOptions {
    /// Number of stars. Fixed for the field's lifetime.
    pub count: usize,
    /// Initial velocity multiplier. Has no effect after creation.
    pub speed: Speed,
}

impl Default for StarFieldOptions {
    fn default() -> Self {
        Self {
            count: DEFAULT_STAR_COUNT,
            speed: Speed::default(),
        }
    }
}

/// A fixed set of stars bouncing around the viewport.
#[derive(Debug, Clone)]
pub struct StarField {
    /// Star states. Never grows or shrinks.
    stars: Vec<Star>,
    /// Device class resolved from the viewport at creation.
    device: DeviceClass,
    /// Pixel distance below which stars are linked.
    connect_distance: f32,
    /// Current pixel dimensions, refreshed on resize.
    viewport: Viewport,
    /// Cleared on unmount, after which nothing changes.
    mounted: bool,
}

impl StarField {
    /// Create a star field for `viewport`.
    ///
    /// The viewport is a snapshot: it picks the connect distance once, and
    /// later resizes never re-tune it, even across the mobile breakpoint.
    pub fn new(options: StarFieldOptions, viewport: Viewport, seed: u64) -> Self {
        let mut rng = StdRng::seed_from_u64(seed);
        let stars = (0..options.count)
            .map(|_| Star::random(&mut rng, options.speed))
            .collect();
        let device = DeviceClass::from_width(viewport.width);

        Self {
            stars,
            device,
            connect_distance: device.connect_distance(),
            viewport,
            mounted: true,
        }
    }

    /// A mounted field holding exactly `stars`.
    #[cfg(test)]
    pub(crate) fn from_stars(stars: Vec<Star>, viewport: Viewport) -> Self {
        let device = DeviceClass::from_width(viewport.width);
        Self {
            stars,
            device,
            connect_distance: device.connect_distance(),
            viewport,
            mounted: true,
        }
    }

    pub fn stars(&self) -> &[Star] {
        &self.stars
    }

    pub fn device_class(&self) -> DeviceClass {
        self.device
    }

    pub fn connect_distance(&self) -> f32 {
        self.connect_distance
    }

    /// Stroke width of the connecting lines in pixels.
    pub fn line_width(&self) -> f32 {
        self.device.line_width()
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Share of a braille dot covered by a line stroke. Strokes thinner than
    /// a dot are drawn fainter instead of thinner.
    pub fn line_coverage(&self) -> f32 {
        (self.line_width() / BRAILLE_DOT_PX).min(1.0)
    }

    /// Advance every star by one frame.
    pub fn tick(&mut self) {
        if !self.mounted {
            return;
        }
        for star in &mut self.stars {
            star.step();
        }
    }

    /// Refresh the pixel dimensions used to place stars.
    pub fn resize(&mut self, viewport: Viewport) {
        if !self.mounted {
            return;
        }
        self.viewport = viewport;
    }

    /// Stop reacting to frames and resizes.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Lines between every pair of stars closer than the connect distance.
    ///
    /// Checks all pairs, which is fine for a few dozen stars. Empty until the
    /// viewport size is known.
    pub fn links(&self) -> Vec<Link> {
        if !self.viewport.is_known() {
            return Vec::new();
        }

        let mut links = Vec::new();
        for (i, a) in self.stars.iter().enumerate() {
            for b in &self.stars[i + 1..] {
                links.extend(link_between(a, b, self.viewport, self.connect_distance));
            }
        }
        links
    }
}

/// Draw the lines between nearby stars. `background` gives the color under
/// a pixel position, used to fade lines toward it.
pub fn paint_links(
    ctx: &mut Context,
    field: &StarField,
    line_color: Color,
    background: &dyn Fn(f32, f32) -> Color,
) {
    let height = field.viewport.height as f64;
    let coverage = field.line_coverage();
    for link in field.links() {
        let opacity = link.opacity * coverage;
        if opacity < MIN_VISIBLE_OPACITY {
            continue;
        }
        let mid_x = (link.from.0 + link.to.0) / 2.0;
        let mid_y = (link.from.1 + link.to.1) / 2.0;
        let color = blend(line_color, background(mid_x, mid_y), opacity);
        ctx.draw(&CanvasLine::new(
            link.from.0 as f64,
            height - link.from.1 as f64,
            link.to.0 as f64,
            height - link.to.1 as f64,
            color,
        ));
    }
}

/// Draw the stars themselves, twinkling with `elapsed`.
pub fn paint_stars(
    ctx: &mut Context,
    field: &StarField,
    star_color: Color,
    elapsed: Duration,
    background: &dyn Fn(f32, f32) -> Color,
) {
    if !field.viewport.is_known() {
        return;
    }
    let height = field.viewport.height as f64;
    for star in &field.stars {
        let (x, y) = field.viewport.to_pixels(star.left, star.top);
        let opacity = star.twinkle(elapsed);
        let ch = pick(STAR_CHARS, opacity);
        let color = blend(star_color, background(x, y), opacity);
        ctx.print(
            x as f64,
            height - y as f64,
            Span::styled(ch.to_string(), Style::new().fg(color)),
        );
    }
}
