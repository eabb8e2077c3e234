mod logging;
mod title;

use std::io::{self, Write};
use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{
    self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture, Event,
    KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use kosmo_background::{Scene, SceneOptions, StarFieldOptions, time_seed};
use kosmo_config::Config;
use kosmo_core::{ColorTheme, FrameClock};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout},
    style::Stylize,
    text::Line,
};
use tracing::{debug, info, warn};

use crate::title::WindowTitle;

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    if let Some(path) = logging::init() {
        info!(log = %path.display(), "starting kosmo");
    }

    let config_path = match Config::default_path() {
        Ok(path) => Some(path),
        Err(e) => {
            warn!(error = %e, "configuration will not be saved");
            None
        }
    };
    let config = match &config_path {
        Some(path) => Config::load_from(path)?,
        None => Config::default(),
    };

    let terminal = ratatui::init();
    let result = run(terminal, config, config_path);
    ratatui::restore();
    result
}

fn run(
    terminal: DefaultTerminal,
    config: Config,
    config_path: Option<PathBuf>,
) -> color_eyre::Result<()> {
    let size = terminal.size()?;
    App::new(config, config_path, size.width, size.height, Instant::now()).run(terminal)
}

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    /// Current configuration.
    config: Config,
    /// Where to persist configuration changes, if anywhere.
    config_path: Option<PathBuf>,
    /// The star field and spark trail.
    scene: Scene,
    /// Paces frames to the configured rate.
    clock: FrameClock,
    /// Window title, swapped while the terminal is unfocused.
    title: WindowTitle,
}

impl App {
    /// Construct a new instance of [`App`] for a terminal of the given size.
    pub fn new(
        config: Config,
        config_path: Option<PathBuf>,
        columns: u16,
        rows: u16,
        now: Instant,
    ) -> Self {
        let options = SceneOptions {
            stars: StarFieldOptions {
                count: config.star_count,
                speed: config.speed(),
            },
            sparks: config.sparks,
        };
        Self {
            running: false,
            scene: Scene::new(options, columns, rows, time_seed()),
            clock: FrameClock::new(config.fps, now),
            title: WindowTitle::default(),
            config,
            config_path,
        }
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        execute!(io::stdout(), EnableMouseCapture, EnableFocusChange)?;
        self.title.install(&mut io::stdout())?;
        info!(
            stars = self.config.star_count,
            sparks = self.config.sparks,
            theme = self.config.theme.name(),
            connect_distance = self.scene.star_field().connect_distance(),
            "scene mounted"
        );

        self.running = true;
        let result = self.event_loop(&mut terminal);
        let teardown = self.teardown(&mut io::stdout());
        result.and(teardown)
    }

    fn event_loop(&mut self, terminal: &mut DefaultTerminal) -> color_eyre::Result<()> {
        while self.running {
            let now = Instant::now();
            if self.clock.is_due(now) {
                self.clock.advance(now);
                self.scene.tick();
                terminal.draw(|frame| self.render(frame))?;
            }
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Unmount the scene and detach every input source before the terminal
    /// is restored.
    fn teardown<W: Write>(&mut self, out: &mut W) -> color_eyre::Result<()> {
        self.scene.unmount();
        debug!(frames = self.clock.frames(), "scene unmounted");
        self.title.restore(out)?;
        execute!(out, DisableMouseCapture, DisableFocusChange)?;
        Ok(())
    }

    /// Renders the user interface.
    fn render(&self, frame: &mut Frame) {
        let theme = self.theme();
        let elapsed = self.clock.elapsed(Instant::now());
        self.scene.render(frame, elapsed, theme);

        let chunks = Layout::vertical([
            Constraint::Fill(1),   // Scene
            Constraint::Length(1), // Help text
        ])
        .split(frame.area());

        let accent = theme.line_color();
        let muted = theme.muted_color();
        let help = Line::from(vec![
            "q".bold().fg(accent),
            " quit  ".fg(muted),
            "t".bold().fg(accent),
            " toggle theme  ".fg(muted),
            "s".bold().fg(accent),
            if self.scene.sparks_enabled() {
                " sparks off".fg(muted)
            } else {
                " sparks on".fg(muted)
            },
        ])
        .centered();
        frame.render_widget(help, chunks[1]);
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most until the next frame is due.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        if event::poll(self.clock.time_until_next(Instant::now()))? {
            self.on_event(event::read()?)?;
        }
        Ok(())
    }

    fn on_event(&mut self, event: Event) -> color_eyre::Result<()> {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
            Event::Mouse(mouse) => self.on_mouse_event(mouse),
            Event::Resize(columns, rows) => {
                debug!(columns, rows, "terminal resized");
                self.scene.resize(columns, rows);
            }
            Event::FocusLost => {
                self.title.set_focused(false);
                self.title.apply(&mut io::stdout())?;
            }
            Event::FocusGained => {
                self.title.set_focused(true);
                self.title.apply(&mut io::stdout())?;
            }
            _ => {}
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char('t')) => self.toggle_theme(),
            (_, KeyCode::Char('s')) => self.toggle_sparks(),
            _ => {}
        }
    }

    /// Any pointer motion over the terminal feeds the spark trail.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if matches!(mouse.kind, MouseEventKind::Moved | MouseEventKind::Drag(_)) {
            self.scene.on_pointer_move(mouse.column, mouse.row);
        }
    }

    /// Switch between the light and dark themes.
    fn toggle_theme(&mut self) {
        self.config.theme = self.config.theme.toggle();
        info!(theme = self.config.theme.name(), "theme changed");
        self.persist();
    }

    /// Enable or disable the spark trail.
    fn toggle_sparks(&mut self) {
        self.config.sparks = !self.config.sparks;
        self.scene.set_sparks_enabled(self.config.sparks);
        info!(sparks = self.config.sparks, "spark trail toggled");
        self.persist();
    }

    /// Save the configuration. Failures are logged, never fatal.
    fn persist(&self) {
        let Some(path) = &self.config_path else {
            return;
        };
        if let Err(e) = self.config.save_to(path) {
            warn!(error = %e, "failed to save configuration");
        }
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }

    fn theme(&self) -> ColorTheme {
        self.config.theme
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::MouseButton;

    fn new_app() -> App {
        App::new(Config::default(), None, 80, 24, Instant::now())
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn mouse(kind: MouseEventKind, column: u16, row: u16) -> Event {
        Event::Mouse(MouseEvent {
            kind,
            column,
            row,
            modifiers: KeyModifiers::NONE,
        })
    }

    #[test]
    fn test_quit_keys() {
        let mut app = new_app();
        app.running = true;
        app.on_event(key(KeyCode::Char('q'))).unwrap();
        assert!(!app.running);

        let mut app = new_app();
        app.running = true;
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_toggle_theme() {
        let mut app = new_app();
        assert_eq!(app.theme(), ColorTheme::Dark);
        app.on_event(key(KeyCode::Char('t'))).unwrap();
        assert_eq!(app.theme(), ColorTheme::Light);
    }

    #[test]
    fn test_toggle_sparks() {
        let mut app = new_app();
        app.on_event(key(KeyCode::Char('s'))).unwrap();
        assert!(!app.config.sparks);
        assert!(!app.scene.sparks_enabled());
        app.on_event(mouse(MouseEventKind::Moved, 3, 3)).unwrap();
        assert!(app.scene.sparks().is_empty());
    }

    #[test]
    fn test_mouse_motion_spawns_sparks() {
        let mut app = new_app();
        app.on_event(mouse(MouseEventKind::Moved, 10, 5)).unwrap();
        app.on_event(mouse(MouseEventKind::Drag(MouseButton::Left), 11, 5))
            .unwrap();
        assert_eq!(app.scene.sparks().len(), 16);

        app.on_event(mouse(MouseEventKind::Down(MouseButton::Left), 11, 5))
            .unwrap();
        assert_eq!(app.scene.sparks().len(), 16);
    }

    #[test]
    fn test_resize_event() {
        let mut app = new_app();
        app.on_event(Event::Resize(100, 40)).unwrap();
        assert_eq!(
            app.scene.star_field().viewport(),
            kosmo_core::Viewport::from_cells(100, 40)
        );
    }

    #[test]
    fn test_teardown_unmounts_scene() {
        let mut app = new_app();
        app.on_event(mouse(MouseEventKind::Moved, 10, 5)).unwrap();
        app.scene.tick();

        let mut out = Vec::new();
        app.teardown(&mut out).unwrap();
        assert!(!app.scene.is_mounted());
        assert!(!out.is_empty());

        let stars = app.scene.star_field().stars().to_vec();
        let sparks = app.scene.sparks().sparks().to_vec();
        for _ in 0..5 {
            app.scene.tick();
            app.on_event(mouse(MouseEventKind::Moved, 20, 8)).unwrap();
        }
        app.on_event(Event::Resize(120, 40)).unwrap();
        assert_eq!(app.scene.star_field().stars(), stars.as_slice());
        assert_eq!(app.scene.sparks().sparks(), sparks.as_slice());
        assert_eq!(
            app.scene.star_field().viewport(),
            kosmo_core::Viewport::from_cells(80, 24)
        );
    }

    #[test]
    fn test_persist_writes_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        let mut app = App::new(Config::default(), Some(path.clone()), 80, 24, Instant::now());
        app.on_event(key(KeyCode::Char('t'))).unwrap();
        assert_eq!(Config::load_from(&path).unwrap().theme, ColorTheme::Light);
    }
}
