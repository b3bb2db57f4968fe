use std::path::PathBuf;
use std::time::{Duration, Instant};

use crossterm::event::{
    self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent, MouseEventKind,
};
use motes_config::Config;
use motes_core::{AnimationKind, ColorTheme};
use motes_particles::{Backdrop, BackdropSettings, Raster};
use ratatui::{
    DefaultTerminal, Frame,
    layout::{Constraint, Layout, Rect},
    style::Stylize,
    text::{Line, Span},
    widgets::Paragraph,
};
use tracing::{info, warn};

/// The main application which holds the state and logic of the application.
#[derive(Debug)]
pub struct App {
    /// Is the application running?
    running: bool,
    backdrop: Backdrop,
    raster: Raster,
    /// Cell area the raster covers, for mapping mouse positions.
    canvas: Rect,
    color_theme: ColorTheme,
    show_help: bool,
    config: Config,
    config_path: Option<PathBuf>,
    /// One-off message shown in the help bar, such as a save result.
    status: Option<String>,
    frame_time: Duration,
    started: Instant,
}

impl App {
    /// Construct a new instance of [`App`].
    pub fn new(config: Config, config_path: Option<PathBuf>) -> color_eyre::Result<Self> {
        let settings = BackdropSettings {
            fps: config.fps,
            scale: config.scale,
            background: config.background_rgb()?,
            color: config.color.rgb(),
            counts: config.counts,
            seed: config.seed.unwrap_or_else(rand::random),
        };
        Ok(Self {
            running: false,
            backdrop: Backdrop::new(settings),
            raster: Raster::new(0, 0),
            canvas: Rect::default(),
            color_theme: config.color,
            show_help: config.show_help,
            frame_time: Duration::from_secs_f64(1.0 / config.fps.max(1) as f64),
            config,
            config_path,
            status: None,
            started: Instant::now(),
        })
    }

    /// Run the application's main loop.
    pub fn run(mut self, mut terminal: DefaultTerminal) -> color_eyre::Result<()> {
        self.running = true;
        let size = terminal.size()?;
        self.layout(Rect::new(0, 0, size.width, size.height));
        match self.config.animation {
            Some(kind) => {
                self.backdrop.select(kind);
            }
            None => self.backdrop.start(true),
        }
        while self.running {
            terminal.draw(|frame| self.render(frame))?;
            self.handle_crossterm_events()?;
        }
        Ok(())
    }

    /// Split the screen into the canvas and the help bar and size the raster.
    fn layout(&mut self, area: Rect) -> Rect {
        let help_height = u16::from(self.show_help);
        let [canvas, help] =
            Layout::vertical([Constraint::Fill(1), Constraint::Length(help_height)]).areas(area);
        if canvas != self.canvas {
            self.canvas = canvas;
            self.raster.resize_cells(canvas.width, canvas.height);
            self.backdrop
                .set_size(canvas.width as u32, canvas.height as u32 * 2);
        }
        help
    }

    /// Renders the user interface.
    fn render(&mut self, frame: &mut Frame) {
        let help_area = self.layout(frame.area());
        let now_ms = self.started.elapsed().as_secs_f64() * 1000.0;
        self.backdrop.tick(now_ms, &mut self.raster);

        let lines = self.raster.to_lines(self.backdrop.background());
        frame.render_widget(Paragraph::new(lines), self.canvas);

        if self.show_help {
            frame.render_widget(self.help_line(), help_area);
        }
    }

    fn help_line(&self) -> Line<'static> {
        let color = self.color_theme.rgb().to_color();
        let key = |k: &'static str| k.bold().fg(color);
        let label = |l: &'static str| l.dark_gray();

        let state = match self.backdrop.active() {
            Some(kind) if self.backdrop.is_running() => kind.description().to_string(),
            Some(kind) => format!("{} (paused)", kind.description()),
            None if self.backdrop.is_running() => "running".to_string(),
            None if !self.backdrop.engine().is_empty() => "paused".to_string(),
            None => "stopped".to_string(),
        };
        let mut spans: Vec<Span<'static>> = vec![
            Span::from(state).fg(color),
            "  ".into(),
            key("1-6"),
            label(" select  "),
            key("space"),
            label(" pause  "),
            key("r"),
            label(" random  "),
            key("c"),
            label(" color  "),
            key("x"),
            label(" stop  "),
            key("s"),
            label(" save  "),
            key("h"),
            label(" help  "),
            key("q"),
            label(" quit"),
        ];
        if let Some(status) = &self.status {
            spans.push("  ".into());
            spans.push(Span::from(status.clone()).italic());
        }
        Line::from(spans).centered()
    }

    /// Reads the crossterm events and updates the state of [`App`].
    /// Waits at most one frame so the animation keeps moving.
    fn handle_crossterm_events(&mut self) -> color_eyre::Result<()> {
        let mut timeout = self.frame_time;
        while event::poll(timeout)? {
            match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => self.on_key_event(key),
                Event::Mouse(mouse) => self.on_mouse_event(mouse),
                _ => {}
            }
            // Drain whatever else is queued without blocking.
            timeout = Duration::ZERO;
        }
        Ok(())
    }

    /// Handles the key events and updates the state of [`App`].
    fn on_key_event(&mut self, key: KeyEvent) {
        match (key.modifiers, key.code) {
            (_, KeyCode::Esc | KeyCode::Char('q'))
            | (KeyModifiers::CONTROL, KeyCode::Char('c') | KeyCode::Char('C')) => self.quit(),
            (_, KeyCode::Char(digit @ '1'..='6')) => {
                let index = digit as usize - '1' as usize;
                if let Some(kind) = AnimationKind::from_index(index) {
                    self.backdrop.select(kind);
                }
            }
            (_, KeyCode::Char(' ')) => self.toggle_pause(),
            (_, KeyCode::Char('r')) => self.backdrop.start(true),
            (_, KeyCode::Char('c')) => self.cycle_color_theme(),
            (_, KeyCode::Char('x')) => self.backdrop.stop(),
            (_, KeyCode::Char('h')) => self.show_help = !self.show_help,
            (_, KeyCode::Char('s')) => self.save_config(),
            _ => {}
        }
    }

    /// Forward pointer movement to the particles.
    fn on_mouse_event(&mut self, mouse: MouseEvent) {
        if !matches!(
            mouse.kind,
            MouseEventKind::Moved | MouseEventKind::Drag(_) | MouseEventKind::Down(_)
        ) {
            return;
        }
        if let Some((x, y)) = self.canvas_pixel(mouse.column, mouse.row) {
            self.backdrop.pointer(x, y);
        }
    }

    /// Raster pixel at the centre of a terminal cell, if the cell is on the canvas.
    fn canvas_pixel(&self, column: u16, row: u16) -> Option<(f32, f32)> {
        let c = self.canvas;
        if column < c.x || column >= c.right() || row < c.y || row >= c.bottom() {
            return None;
        }
        let x = (column - c.x) as f32 + 0.5;
        let y = (row - c.y) as f32 * 2.0 + 1.0;
        Some((x, y))
    }

    fn toggle_pause(&mut self) {
        if self.backdrop.is_running() {
            self.backdrop.pause();
        } else {
            self.backdrop.resume();
        }
    }

    /// Cycle through available color themes and redraw with the new one.
    fn cycle_color_theme(&mut self) {
        self.color_theme = self.color_theme.next();
        self.backdrop.set_color(self.color_theme.rgb());
        self.backdrop.restart();
    }

    /// Persist the current animation, colour and help visibility.
    fn save_config(&mut self) {
        self.config.animation = self.backdrop.active();
        self.config.color = self.color_theme;
        self.config.show_help = self.show_help;
        let result = match &self.config_path {
            Some(path) => self.config.save_to(path).map(|()| path.clone()),
            None => self.config.save(),
        };
        self.status = Some(match result {
            Ok(path) => {
                info!(path = %path.display(), "settings saved");
                "saved".to_string()
            }
            Err(err) => {
                warn!(%err, "saving settings failed");
                format!("save failed: {err}")
            }
        });
    }

    /// Set running to false to quit the application.
    fn quit(&mut self) {
        self.running = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let config = Config {
            seed: Some(1),
            ..Default::default()
        };
        let mut app = App::new(config, None).expect("app");
        app.layout(Rect::new(0, 0, 40, 21));
        app
    }

    fn press(app: &mut App, code: KeyCode) {
        app.on_key_event(KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn test_layout_reserves_help_row() {
        let app = app();
        assert_eq!(app.canvas, Rect::new(0, 0, 40, 20));
        assert_eq!(motes_core::Surface::size(&app.raster), (40, 40));
    }

    #[test]
    fn test_layout_resizes_raster_when_help_hidden() {
        let mut app = app();
        press(&mut app, KeyCode::Char('h'));
        app.layout(Rect::new(0, 0, 40, 21));
        assert_eq!(app.canvas, Rect::new(0, 0, 40, 21));
        assert_eq!(motes_core::Surface::size(&app.raster), (40, 42));
    }

    #[test]
    fn test_number_keys_select_and_toggle() {
        let mut app = app();
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.backdrop.active(), Some(AnimationKind::Mesh));
        press(&mut app, KeyCode::Char('2'));
        assert_eq!(app.backdrop.active(), None);
        assert!(!app.backdrop.is_running());
    }

    #[test]
    fn test_space_pauses_and_resumes() {
        let mut app = app();
        press(&mut app, KeyCode::Char('6'));
        press(&mut app, KeyCode::Char(' '));
        assert!(!app.backdrop.is_running());
        press(&mut app, KeyCode::Char(' '));
        assert!(app.backdrop.is_running());
    }

    #[test]
    fn test_color_cycle_restarts_animation() {
        let mut app = app();
        press(&mut app, KeyCode::Char('1'));
        press(&mut app, KeyCode::Char('c'));
        assert_eq!(app.color_theme, ColorTheme::White.next());
        assert_eq!(app.backdrop.color(), ColorTheme::Cyan.rgb());
        assert_eq!(app.backdrop.active(), Some(AnimationKind::Metaball));
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app();
        app.running = true;
        app.on_key_event(KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL));
        assert!(!app.running);
    }

    #[test]
    fn test_mouse_maps_to_cell_centres() {
        let app = app();
        assert_eq!(app.canvas_pixel(0, 0), Some((0.5, 1.0)));
        assert_eq!(app.canvas_pixel(39, 19), Some((39.5, 39.0)));
        // The help row and anything past the edge are not canvas.
        assert_eq!(app.canvas_pixel(10, 20), None);
        assert_eq!(app.canvas_pixel(40, 0), None);
    }

    #[test]
    fn test_save_writes_current_choices() {
        let dir = tempfile::TempDir::new().expect("tempdir");
        let path = dir.path().join("config.toml");
        let mut app = app();
        app.config_path = Some(path.clone());
        press(&mut app, KeyCode::Char('5'));
        press(&mut app, KeyCode::Char('h'));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.status.as_deref(), Some("saved"));
        let saved = Config::load_from(&path).expect("load");
        assert_eq!(saved.animation, Some(AnimationKind::Parallax));
        assert!(!saved.show_help);
    }

    #[test]
    fn test_background_reaches_backdrop() {
        let config = Config {
            background: Some("#202020".into()),
            ..Default::default()
        };
        let app = App::new(config, None).expect("app");
        assert_eq!(app.backdrop.background(), motes_core::Rgb(32, 32, 32));
    }
}
