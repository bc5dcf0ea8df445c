use crate::events::AppEvent;
use crate::wheel::{
    DEFAULT_CENTER_X, DEFAULT_CENTER_Y, DEFAULT_INITIAL_ROTATION_DEG, DEFAULT_OUTER_RADIUS,
    DisplayName, GoalStore, LayoutConstants, LayoutError, MonthId, Point, RadialLayout,
    SlotCollection, Wheel,
};
use async_channel::Sender;
use directories::ProjectDirs;
use notify::{EventKind, RecommendedWatcher, RecursiveMode, Watcher};
use palette::Srgb;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub center_x: f64,
    pub center_y: f64,
    pub outer_radius: f64,
    pub initial_rotation_deg: f64,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            center_x: DEFAULT_CENTER_X,
            center_y: DEFAULT_CENTER_Y,
            outer_radius: DEFAULT_OUTER_RADIUS,
            initial_rotation_deg: DEFAULT_INITIAL_ROTATION_DEG,
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct MonthConfig {
    pub month: Option<MonthId>,
    pub name: Option<String>,
    pub color: Option<String>,
    pub goal: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct Config {
    #[serde(default)]
    pub layout: LayoutConfig,
    #[serde(default)]
    pub months: Vec<MonthConfig>,
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to determine config directory")]
    ConfigDirNotFound,
    #[error("Config error: {0}")]
    Config(#[from] config::ConfigError),
    #[error("Notify error: {0}")]
    Notify(#[from] notify::Error),
    #[error("Invalid color '{value}' for {month}")]
    InvalidColor { month: MonthId, value: String },
    #[error("Invalid layout: {0}")]
    Layout(#[from] LayoutError),
}

impl Config {
    fn entries(&self) -> impl Iterator<Item = (MonthId, &MonthConfig)> {
        self.months.iter().filter_map(|cfg| match cfg.month {
            Some(month) => Some((month, cfg)),
            None => {
                log::warn!("Skipping month entry without a 'month' key");
                None
            }
        })
    }

    pub fn layout_constants(&self) -> Result<LayoutConstants, LayoutError> {
        LayoutConstants::new(
            Point::new(self.layout.center_x, self.layout.center_y),
            self.layout.outer_radius,
            self.layout.initial_rotation_deg,
        )
    }

    /// Default roster with configured names and colors applied.
    pub fn roster(&self) -> Result<SlotCollection, ConfigError> {
        self.entries()
            .try_fold(SlotCollection::default(), |slots, (month, cfg)| {
                let slots = match &cfg.name {
                    Some(name) => slots.with_name(month, DisplayName::new(name.as_str())),
                    None => slots,
                };
                match &cfg.color {
                    Some(value) => {
                        let color = value.parse::<Srgb<u8>>().map_err(|_| {
                            ConfigError::InvalidColor {
                                month,
                                value: value.clone(),
                            }
                        })?;
                        Ok(slots.with_color(month, color))
                    }
                    None => Ok(slots),
                }
            })
    }

    /// Seed goals in file order. Later entries for the same month win.
    pub fn goals(&self) -> impl Iterator<Item = (MonthId, &str)> {
        self.entries()
            .filter_map(|(month, cfg)| cfg.goal.as_deref().map(|goal| (month, goal)))
            .filter(|(_, goal)| !goal.trim().is_empty())
    }

    pub fn build_wheel(&self) -> Result<Wheel, ConfigError> {
        let layout = RadialLayout::new(self.layout_constants()?);
        let mut store = GoalStore::new(self.roster()?);

        for (month, goal) in self.goals() {
            // no direct setter on the store: first-fit, then move into place
            store.clear(month);
            match store.assign_first_available(goal) {
                Some(landed) => store.swap(landed, month),
                None => log::warn!("No room to seed goal '{}' for {}", goal, month),
            }
        }

        Ok(Wheel::new(layout, store))
    }
}

pub fn get_config_path() -> Result<PathBuf, ConfigError> {
    let proj_dirs = ProjectDirs::from("org", "goalwheel", "goal-wheel")
        .ok_or(ConfigError::ConfigDirNotFound)?;
    Ok(proj_dirs.config_dir().join("config.toml"))
}

pub fn load_config(path: &Path) -> Result<Config, ConfigError> {
    let s = config::Config::builder()
        .add_source(config::File::from(path).required(false))
        .add_source(
            config::Environment::with_prefix("GOAL_WHEEL")
                .separator("__")
                .try_parsing(true),
        )
        .build()?;

    Ok(s.try_deserialize()?)
}

/// Like [`load_config`], but never fails. A missing file still picks up
/// `GOAL_WHEEL__*` overrides from the environment.
pub fn load_or_default(path: &Path) -> Config {
    if !path.exists() {
        log::info!("No config at {}, using defaults", path.display());
    }

    match load_config(path) {
        Ok(c) => c,
        Err(e) => {
            log::error!("Failed to load config, using defaults: {}", e);
            Config::default()
        }
    }
}

pub fn write_default_config(path: &Path) -> std::io::Result<PathBuf> {
    if let Some(parent) = path.parent() {
        fs_err::create_dir_all(parent)?;
    }
    if !path.exists() {
        fs_err::write(path, DEFAULT_CONFIG)?;
    }
    Ok(path.to_path_buf())
}

const DEFAULT_CONFIG: &str = include_str!("default_config.toml");

type WatchEvents = async_channel::Receiver<notify::Result<notify::Event>>;

/// Watches `dir` and forwards raw notify results onto an async channel.
fn watch_dir(dir: &Path) -> Result<(RecommendedWatcher, WatchEvents), ConfigError> {
    let (events_tx, events_rx) = async_channel::unbounded();
    let mut watcher = RecommendedWatcher::new(
        move |res| {
            let _ = events_tx.send_blocking(res);
        },
        notify::Config::default(),
    )?;
    watcher.watch(dir, RecursiveMode::NonRecursive)?;
    Ok((watcher, events_rx))
}

fn touches_config(event: &notify::Event, config_path: &Path) -> bool {
    let relevant = matches!(
        event.kind,
        EventKind::Create(_) | EventKind::Modify(_) | EventKind::Remove(_)
    );
    relevant && event.paths.iter().any(|p| p == config_path)
}

/// Sends [`AppEvent::ConfigReload`] whenever the file at `config_path` is
/// written, created or removed. Returns once the receiving side is gone.
pub async fn run_async_watcher(config_path: PathBuf, tx: Sender<AppEvent>) {
    let Some(config_dir) = config_path.parent() else {
        log::warn!("Config path {} has no parent; not watching", config_path.display());
        return;
    };

    // editors replace the file, so watch its directory
    let watched = fs_err::create_dir_all(config_dir)
        .map_err(|e| log::error!("Cannot create {}: {}", config_dir.display(), e))
        .ok()
        .and_then(|()| {
            watch_dir(config_dir)
                .map_err(|e| log::error!("Cannot watch {}: {}", config_dir.display(), e))
                .ok()
        });
    let Some((_watcher, events)) = watched else {
        return;
    };

    while let Ok(res) = events.recv().await {
        let event = match res {
            Ok(event) => event,
            Err(e) => {
                log::warn!("Config watch error: {}", e);
                continue;
            }
        };
        if !touches_config(&event, &config_path) {
            continue;
        }
        log::debug!("Config changed: {:?}", event.kind);
        if tx.send(AppEvent::ConfigReload).await.is_err() {
            break;
        }
    }
}
