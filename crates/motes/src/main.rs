use std::fs::{self, OpenOptions};
use std::io::{self, stdout};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use directories::ProjectDirs;
use motes_config::Config;
use motes_core::{AnimationKind, ColorTheme};
use tracing::warn;
use tracing_subscriber::EnvFilter;

mod app;

use app::App;

/// Animated particle backdrops for the terminal.
#[derive(Debug, Parser)]
#[command(name = "motes", version, about)]
struct Args {
    /// Animation to start with: metaball, mesh, chaser, flag, parallax or square
    #[arg(short, long)]
    animation: Option<AnimationKind>,

    /// Particle colour theme
    #[arg(short, long)]
    color: Option<ColorTheme>,

    /// Backdrop colour as #rrggbb
    #[arg(short, long)]
    background: Option<String>,

    /// Simulation frame rate
    #[arg(long)]
    fps: Option<u32>,

    /// Particle size relative to a browser canvas
    #[arg(long)]
    scale: Option<f32>,

    /// Seed for reproducible animations
    #[arg(long)]
    seed: Option<u64>,

    /// Read and save settings here instead of the platform config directory
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Write logs here; filter with MOTES_LOG
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Hide the key help bar
    #[arg(long)]
    no_help: bool,
}

impl Args {
    /// Override file settings with the flags that were given.
    fn apply(&self, config: &mut Config) {
        if let Some(kind) = self.animation {
            config.animation = Some(kind);
        }
        if let Some(theme) = self.color {
            config.color = theme;
        }
        if let Some(background) = &self.background {
            config.background = Some(background.clone());
        }
        if let Some(fps) = self.fps {
            config.fps = fps;
        }
        if let Some(scale) = self.scale {
            config.scale = scale;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
        if self.no_help {
            config.show_help = false;
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;
    let args = Args::parse();
    init_logging(args.log_file.as_deref());

    let config_path = args.config.clone().or_else(Config::config_path);
    let mut config = match &config_path {
        Some(path) => Config::load_from(path)
            .wrap_err_with(|| format!("failed to load {}", path.display()))?,
        None => Config::default(),
    };
    args.apply(&mut config);
    config.validate().wrap_err("invalid settings")?;

    let app = App::new(config, config_path)?;
    let terminal = ratatui::init();
    run_session(
        || execute!(stdout(), EnableMouseCapture),
        || app.run(terminal),
        || {
            if let Err(err) = execute!(stdout(), DisableMouseCapture) {
                warn!(%err, "failed to release mouse capture");
            }
            ratatui::restore();
        },
    )
}

/// Run `session` once `enter` succeeds. `leave` always runs, so a failed
/// `enter` still hands the terminal back.
fn run_session(
    enter: impl FnOnce() -> io::Result<()>,
    session: impl FnOnce() -> color_eyre::Result<()>,
    leave: impl FnOnce(),
) -> color_eyre::Result<()> {
    let result = enter().map_err(color_eyre::Report::from).and_then(|()| session());
    leave();
    result
}

/// Send logs to a file since the terminal belongs to the UI.
///
/// Without a usable log file logging stays off.
fn init_logging(path: Option<&Path>) {
    let Some(path) = path.map(Path::to_path_buf).or_else(default_log_path) else {
        return;
    };
    if let Some(dir) = path.parent() {
        if fs::create_dir_all(dir).is_err() {
            return;
        }
    }
    let Ok(file) = OpenOptions::new().create(true).append(true).open(&path) else {
        return;
    };
    let filter = EnvFilter::try_from_env("MOTES_LOG").unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
}

fn default_log_path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "motes").map(|dirs| dirs.data_local_dir().join("motes.log"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flags_override_config() {
        let args = Args::parse_from([
            "motes",
            "--animation",
            "Chaser",
            "-c",
            "red",
            "--fps",
            "30",
            "--no-help",
        ]);
        let mut config = Config {
            seed: Some(5),
            ..Default::default()
        };
        args.apply(&mut config);
        assert_eq!(config.animation, Some(AnimationKind::Chaser));
        assert_eq!(config.color, ColorTheme::Red);
        assert_eq!(config.fps, 30);
        assert!(!config.show_help);
        // Untouched fields keep their file values.
        assert_eq!(config.seed, Some(5));
        assert_eq!(config.scale, 0.15);
    }

    #[test]
    fn test_session_leaves_when_enter_fails() {
        let mut ran = false;
        let mut left = false;
        let result = run_session(
            || Err(io::Error::other("no mouse")),
            || {
                ran = true;
                Ok(())
            },
            || left = true,
        );
        assert!(result.is_err());
        assert!(!ran);
        assert!(left);
    }

    #[test]
    fn test_session_leaves_after_error() {
        let mut left = false;
        let result = run_session(
            || Ok(()),
            || Err(color_eyre::eyre::eyre!("draw failed")),
            || left = true,
        );
        assert!(result.is_err());
        assert!(left);
    }

    #[test]
    fn test_unknown_animation_flag_rejected() {
        assert!(Args::try_parse_from(["motes", "-a", "fireworks"]).is_err());
    }
}
