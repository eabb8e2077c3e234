//! Scene owning both animations and drawing them to the terminal.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use kosmo_core::{CELL_HEIGHT_PX, CELL_WIDTH_PX, ColorTheme, Viewport};
use ratatui::{
    Frame,
    buffer::Buffer,
    layout::Rect,
    style::Color,
    symbols::Marker,
    widgets::{Widget, canvas::Canvas},
};

use crate::animations::{
    sparks::{self, SparkEmitter},
    starfield::{self, StarField, StarFieldOptions},
};
use crate::color::gradient;

/// Seed derived from the system clock, for hosts that want a fresh scene
/// on every run.
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Scene options.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SceneOptions {
    pub stars: StarFieldOptions,
    /// Whether pointer movement emits sparks.
    pub sparks: bool,
}

/// The star field and the spark trail, sharing one drawing surface.
#[derive(Debug, Clone)]
pub struct Scene {
    star_field: StarField,
    sparks: SparkEmitter,
    /// When false, pointer moves are ignored. Live sparks still fade out.
    sparks_enabled: bool,
}

impl Scene {
    /// Mount a scene sized to `columns` x `rows` cells.
    pub fn new(options: SceneOptions, columns: u16, rows: u16, seed: u64) -> Self {
        // Each animation gets its own stream so neither perturbs the other.
        let spark_seed = seed.wrapping_mul(0x9E37_79B9_7F4A_7C15).wrapping_add(1);
        Self {
            star_field: StarField::new(options.stars, Viewport::from_cells(columns, rows), seed),
            sparks: SparkEmitter::new(spark_seed),
            sparks_enabled: options.sparks,
        }
    }

    pub fn star_field(&self) -> &StarField {
        &self.star_field
    }

    pub fn sparks(&self) -> &SparkEmitter {
        &self.sparks
    }

    pub fn sparks_enabled(&self) -> bool {
        self.sparks_enabled
    }

    pub fn set_sparks_enabled(&mut self, enabled: bool) {
        self.sparks_enabled = enabled;
    }

    /// Whether the scene still reacts to frames and input.
    pub fn is_mounted(&self) -> bool {
        self.star_field.is_mounted() && self.sparks.is_mounted()
    }

    /// Advance both animations by one frame.
    pub fn tick(&mut self) {
        self.star_field.tick();
        self.sparks.tick();
    }

    /// Handle pointer movement over the cell at `column`, `row`.
    pub fn on_pointer_move(&mut self, column: u16, row: u16) {
        if !self.sparks_enabled {
            return;
        }
        let x = (column as f32 + 0.5) * CELL_WIDTH_PX;
        let y = (row as f32 + 0.5) * CELL_HEIGHT_PX;
        self.sparks.on_pointer_move(x, y);
    }

    /// Handle a terminal resize.
    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.star_field.resize(Viewport::from_cells(columns, rows));
    }

    /// Tear down both animations. Later ticks and events are ignored.
    pub fn unmount(&mut self) {
        self.star_field.unmount();
        self.sparks.unmount();
    }

    /// Widget drawing the scene at `elapsed` time since mount.
    pub fn view(&self, elapsed: Duration, theme: ColorTheme) -> SceneView<'_> {
        SceneView {
            scene: self,
            elapsed,
            theme,
        }
    }

    /// Render the scene over the whole frame.
    pub fn render(&self, frame: &mut Frame, elapsed: Duration, theme: ColorTheme) {
        frame.render_widget(self.view(elapsed, theme), frame.area());
    }
}

/// Widget drawing a [`Scene`]: background gradient, star links, stars and
/// sparks, back to front.
#[derive(Debug, Clone, Copy)]
pub struct SceneView<'a> {
    scene: &'a Scene,
    elapsed: Duration,
    theme: ColorTheme,
}

impl Widget for SceneView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.is_empty() {
            return;
        }

        let stops = self.theme.gradient();
        let viewport = self.scene.star_field.viewport();
        if viewport.is_known() {
            // Fade toward the same color the cell under a pixel is painted with.
            let background = |x: f32, y: f32| {
                let column = (x / viewport.width * area.width as f32).max(0.0) as u16;
                let row = (y / viewport.height * area.height as f32).max(0.0) as u16;
                cell_background(
                    area,
                    &stops,
                    area.left().saturating_add(column),
                    area.top().saturating_add(row),
                )
            };

            Canvas::default()
                .marker(Marker::Braille)
                .x_bounds([0.0, viewport.width as f64])
                .y_bounds([0.0, viewport.height as f64])
                .paint(|ctx| {
                    starfield::paint_links(
                        ctx,
                        &self.scene.star_field,
                        self.theme.line_color(),
                        &background,
                    );
                    ctx.layer();
                    starfield::paint_stars(
                        ctx,
                        &self.scene.star_field,
                        self.theme.star_color(),
                        self.elapsed,
                        &background,
                    );
                    sparks::paint(ctx, &self.scene.sparks, viewport.height, &background);
                })
                .render(area, buf);
        }

        // The canvas resets the background of its whole area, so the
        // gradient goes on last and only touches the background color.
        paint_background(area, buf, &stops);
    }
}

/// Gradient color of the cell at `x`, `y`, running diagonally from the
/// top-left to the bottom-right of `area`. Positions outside are clamped.
fn cell_background(area: Rect, stops: &[Color], x: u16, y: u16) -> Color {
    let span = (area.width as f32 - 1.0).max(1.0) + (area.height as f32 - 1.0).max(1.0);
    let column = x.clamp(area.left(), area.right().saturating_sub(1)) - area.left();
    let row = y.clamp(area.top(), area.bottom().saturating_sub(1)) - area.top();
    gradient(stops, (column as f32 + row as f32) / span)
}

/// Set the background of every cell in `area` to the gradient, keeping
/// whatever symbol and foreground are already there.
fn paint_background(area: Rect, buf: &mut Buffer, stops: &[Color]) {
    for y in area.top()..area.bottom() {
        for x in area.left()..area.right() {
            buf[(x, y)].set_bg(cell_background(area, stops, x, y));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animations::starfield::Star;
    use crate::color::blend;

    fn scene(columns: u16, rows: u16) -> Scene {
        Scene::new(
            SceneOptions {
                sparks: true,
                ..Default::default()
            },
            columns,
            rows,
            11,
        )
    }

    #[test]
    fn test_pointer_move_spawns_at_cell_centre() {
        let mut scene = scene(80, 24);
        scene.on_pointer_move(10, 3);
        assert_eq!(scene.sparks().len(), sparks::SPAWN_BATCH);
        let spark = &scene.sparks().sparks()[0];
        assert_eq!((spark.x, spark.y), (84.0, 56.0));
    }

    #[test]
    fn test_disabled_sparks_ignore_pointer() {
        let mut scene = scene(80, 24);
        scene.set_sparks_enabled(false);
        scene.on_pointer_move(1, 1);
        assert!(scene.sparks().is_empty());
        assert!(!scene.sparks_enabled());
    }

    #[test]
    fn test_resize_updates_viewport_only() {
        let mut scene = scene(60, 20);
        let distance = scene.star_field().connect_distance();
        scene.resize(200, 60);
        assert_eq!(scene.star_field().viewport(), Viewport::from_cells(200, 60));
        assert_eq!(scene.star_field().connect_distance(), distance);
    }

    #[test]
    fn test_unmount_stops_everything() {
        let mut scene = scene(80, 24);
        scene.on_pointer_move(5, 5);
        scene.tick();
        scene.unmount();
        assert!(!scene.is_mounted());

        let stars = scene.star_field().stars().to_vec();
        let live = scene.sparks().sparks().to_vec();
        for _ in 0..10 {
            scene.tick();
            scene.on_pointer_move(7, 7);
        }
        scene.resize(10, 10);
        assert_eq!(scene.star_field().stars(), stars.as_slice());
        assert_eq!(scene.sparks().sparks(), live.as_slice());
        assert_eq!(scene.star_field().viewport(), Viewport::from_cells(80, 24));
    }

    #[test]
    fn test_render_fills_background_and_draws_stars() {
        let scene = scene(40, 12);
        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Dark).render(area, &mut buf);

        let [top_left, _, bottom_right] = ColorTheme::Dark.gradient();
        assert_eq!(buf[(0, 0)].bg, top_left);
        assert_eq!(buf[(39, 11)].bg, bottom_right);

        let drawn = buf.content().iter().filter(|cell| cell.symbol() != " ").count();
        assert!(drawn > 0);
    }

    #[test]
    fn test_render_blends_link_toward_cell_background() {
        // 40x12 cells is 320x192 px: two stars 40 px apart at y = 72 px.
        let mut scene = scene(40, 12);
        let star = |left| Star {
            left,
            top: 37.5,
            dx: 0.0,
            dy: 0.0,
            size: 1.0,
            duration: 2.0,
            delay: 0.0,
        };
        scene.star_field =
            StarField::from_stars(vec![star(18.75), star(31.25)], Viewport::from_cells(40, 12));
        let links = scene.star_field().links();
        assert_eq!(links.len(), 1);

        let area = Rect::new(0, 0, 40, 12);
        let mut buf = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Dark).render(area, &mut buf);

        // The link is faded toward the cell under its midpoint, (80, 72) px.
        let stops = ColorTheme::Dark.gradient();
        let under_midpoint = gradient(&stops, (10.0 + 4.0) / (39.0 + 11.0));
        let opacity = links[0].opacity * scene.star_field().line_coverage();
        let link_color = blend(ColorTheme::Dark.line_color(), under_midpoint, opacity);
        assert_ne!(link_color, under_midpoint);

        let mut dots = 0;
        for y in 0..12u16 {
            for x in 0..40u16 {
                let cell = &buf[(x, y)];
                let is_braille = cell
                    .symbol()
                    .chars()
                    .next()
                    .is_some_and(|c| ('\u{2801}'..='\u{28ff}').contains(&c));
                if !is_braille {
                    continue;
                }
                dots += 1;
                assert_eq!(cell.fg, link_color);
                let t = (x + y) as f32 / (39.0 + 11.0);
                assert_eq!(cell.bg, gradient(&stops, t));
            }
        }
        assert!(dots > 0);

        // Cells the canvas left blank still carry the gradient.
        assert_eq!(buf[(0, 0)].bg, stops[0]);
        assert_eq!(buf[(39, 11)].bg, stops[2]);
    }

    #[test]
    fn test_theme_changes_background() {
        let scene = scene(40, 12);
        let area = Rect::new(0, 0, 40, 12);
        let mut dark = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Dark).render(area, &mut dark);
        let mut light = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Light).render(area, &mut light);

        assert_eq!(dark[(20, 6)].bg, cell_background(area, &ColorTheme::Dark.gradient(), 20, 6));
        assert_eq!(light[(20, 6)].bg, cell_background(area, &ColorTheme::Light.gradient(), 20, 6));
        assert_ne!(dark[(20, 6)].bg, light[(20, 6)].bg);
    }

    #[test]
    fn test_render_draws_sparks() {
        let mut scene = scene(40, 12);
        let area = Rect::new(0, 0, 40, 12);
        let mut empty = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Light).render(area, &mut empty);

        scene.on_pointer_move(20, 6);
        let mut with_sparks = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Light).render(area, &mut with_sparks);

        assert_ne!(empty, with_sparks);
    }

    #[test]
    fn test_render_empty_area() {
        let scene = scene(0, 0);
        let area = Rect::new(0, 0, 0, 0);
        let mut buf = Buffer::empty(area);
        scene.view(Duration::ZERO, ColorTheme::Dark).render(area, &mut buf);
        assert!(scene.star_field().links().is_empty());
    }
}
