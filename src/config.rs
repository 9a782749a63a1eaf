/// External configuration loader.
///
/// Reads `config.toml` from the executable's directory, the CWD, or the
/// shared data directories. Falls back to defaults if the file is missing
/// or incomplete.

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::domain::color::PaletteKind;
use crate::error::{Error, Result};
use crate::sim::session::Tempo;
use crate::sim::turn::{TurnConfig, WinTone};

// ── Public Config Struct ──

#[derive(Clone, Debug)]
pub struct GameConfig {
    pub timing: TimingConfig,
    pub keys: ButtonBindings,
    pub gamepad: ButtonBindings,
    pub audio: AudioConfig,
    pub palette: PaletteKind,
    pub log_file: Option<PathBuf>,
    pub log_filter: String,
}

#[derive(Clone, Debug)]
pub struct TimingConfig {
    pub poll_interval_ms: u64,
    pub reaction_delay_secs: u64, // board shown → Simon's first note
    pub level_pause_ms: u64,     // gap after a cleared level
    pub base_duration_ms: u64,
    pub min_duration_ms: u64,
}

/// Names bound to each of the four buttons, in button order A, B, X, Y.
/// Key names for the keyboard, button names for the gamepad.
#[derive(Clone, Debug)]
pub struct ButtonBindings {
    pub button_a: Vec<String>,
    pub button_b: Vec<String>,
    pub button_x: Vec<String>,
    pub button_y: Vec<String>,
}

impl ButtonBindings {
    pub fn lists(&self) -> [&[String]; 4] {
        [&self.button_a, &self.button_b, &self.button_x, &self.button_y]
    }
}

#[derive(Clone, Debug)]
pub struct AudioConfig {
    pub volume: f32,
    pub win_tone: WinTone,
}

impl GameConfig {
    pub fn turn_config(&self) -> TurnConfig {
        TurnConfig {
            tempo: Tempo {
                base_ms: self.timing.base_duration_ms,
                min_ms: self.timing.min_duration_ms,
            },
            level_pause_ms: self.timing.level_pause_ms,
            win_tone: self.audio.win_tone,
        }
    }
}

// ── TOML Schema (with serde defaults) ──

#[derive(Deserialize, Debug, Default)]
struct TomlConfig {
    #[serde(default)]
    timing: TomlTiming,
    #[serde(default)]
    keys: TomlKeys,
    #[serde(default)]
    gamepad: TomlGamepad,
    #[serde(default)]
    audio: TomlAudio,
    #[serde(default)]
    display: TomlDisplay,
    #[serde(default)]
    general: TomlGeneral,
}

#[derive(Deserialize, Debug)]
struct TomlTiming {
    #[serde(default = "default_poll_interval")]
    poll_interval_ms: u64,
    #[serde(default = "default_reaction_delay")]
    reaction_delay_secs: u64,
    #[serde(default = "default_level_pause")]
    level_pause_ms: u64,
    #[serde(default = "default_base_duration")]
    base_duration_ms: u64,
    #[serde(default = "default_min_duration")]
    min_duration_ms: u64,
}

#[derive(Deserialize, Debug)]
struct TomlKeys {
    #[serde(default = "default_key_a")]
    button_a: Vec<String>,
    #[serde(default = "default_key_b")]
    button_b: Vec<String>,
    #[serde(default = "default_key_x")]
    button_x: Vec<String>,
    #[serde(default = "default_key_y")]
    button_y: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlGamepad {
    #[serde(default = "default_pad_a")]
    button_a: Vec<String>,
    #[serde(default = "default_pad_b")]
    button_b: Vec<String>,
    #[serde(default = "default_pad_x")]
    button_x: Vec<String>,
    #[serde(default = "default_pad_y")]
    button_y: Vec<String>,
}

#[derive(Deserialize, Debug)]
struct TomlAudio {
    #[serde(default = "default_volume")]
    volume: f32,
    #[serde(default = "default_win_tone")]
    win_tone: String,
}

#[derive(Deserialize, Debug)]
struct TomlDisplay {
    #[serde(default = "default_palette")]
    palette: String,
}

#[derive(Deserialize, Debug)]
struct TomlGeneral {
    #[serde(default)]
    log_file: Option<String>,
    #[serde(default = "default_log_filter")]
    log_filter: String,
}

// ── Defaults ──

fn default_poll_interval() -> u64 { 5 }
fn default_reaction_delay() -> u64 { 1 }
fn default_level_pause() -> u64 { 500 }
fn default_base_duration() -> u64 { 525 }
fn default_min_duration() -> u64 { 150 }

fn default_key_a() -> Vec<String> { vec!["a".into(), "1".into()] }
fn default_key_b() -> Vec<String> { vec!["b".into(), "2".into()] }
fn default_key_x() -> Vec<String> { vec!["x".into(), "3".into()] }
fn default_key_y() -> Vec<String> { vec!["y".into(), "4".into()] }

fn default_pad_a() -> Vec<String> { vec!["A".into()] }
fn default_pad_b() -> Vec<String> { vec!["B".into()] }
fn default_pad_x() -> Vec<String> { vec!["X".into()] }
fn default_pad_y() -> Vec<String> { vec!["Y".into()] }

fn default_volume() -> f32 { 0.2 }
fn default_win_tone() -> String { "last-player".into() }
fn default_palette() -> String { "inline".into() }
fn default_log_filter() -> String { "dosame=info".into() }

impl Default for TomlTiming {
    fn default() -> Self {
        TomlTiming {
            poll_interval_ms: default_poll_interval(),
            reaction_delay_secs: default_reaction_delay(),
            level_pause_ms: default_level_pause(),
            base_duration_ms: default_base_duration(),
            min_duration_ms: default_min_duration(),
        }
    }
}

impl Default for TomlKeys {
    fn default() -> Self {
        TomlKeys {
            button_a: default_key_a(),
            button_b: default_key_b(),
            button_x: default_key_x(),
            button_y: default_key_y(),
        }
    }
}

impl Default for TomlGamepad {
    fn default() -> Self {
        TomlGamepad {
            button_a: default_pad_a(),
            button_b: default_pad_b(),
            button_x: default_pad_x(),
            button_y: default_pad_y(),
        }
    }
}

impl Default for TomlAudio {
    fn default() -> Self {
        TomlAudio {
            volume: default_volume(),
            win_tone: default_win_tone(),
        }
    }
}

impl Default for TomlDisplay {
    fn default() -> Self {
        TomlDisplay { palette: default_palette() }
    }
}

impl Default for TomlGeneral {
    fn default() -> Self {
        TomlGeneral {
            log_file: None,
            log_filter: default_log_filter(),
        }
    }
}

// ── Loading ──

impl GameConfig {
    /// Load config from `config.toml`.
    /// Search order: exe directory, CWD, ~/.local/share/dosame, /usr/share/dosame.
    /// Missing file or missing keys gracefully fall back to defaults.
    ///
    /// Returns the config plus any warnings; the caller reports them once
    /// logging is up, since the terminal belongs to the game by then.
    pub fn load() -> (Self, Vec<String>) {
        match find_config(&candidate_dirs()) {
            Some(path) => Self::load_from(&path),
            None => (Self::default(), Vec::new()),
        }
    }

    /// Load one specific file. Unreadable or malformed files give defaults
    /// plus a warning.
    pub fn load_from(path: &Path) -> (Self, Vec<String>) {
        match std::fs::read_to_string(path) {
            Ok(text) => match Self::parse(&text) {
                Ok(parsed) => parsed,
                Err(e) => (
                    Self::default(),
                    vec![format!("{}: {e}; using default settings", path.display())],
                ),
            },
            Err(e) => (
                Self::default(),
                vec![format!("could not read {}: {e}", path.display())],
            ),
        }
    }

    /// Parse one file. Unknown enum values fall back to defaults with a warning.
    pub fn parse(text: &str) -> Result<(Self, Vec<String>)> {
        let mut warnings = Vec::new();
        let toml_cfg = toml::from_str::<TomlConfig>(text).map_err(|e| Error::Config(e.to_string()))?;
        Ok((Self::from_toml(toml_cfg, &mut warnings), warnings))
    }

    fn from_toml(t: TomlConfig, warnings: &mut Vec<String>) -> Self {
        let win_tone = WinTone::from_name(&t.audio.win_tone).unwrap_or_else(|| {
            warnings.push(format!("unknown audio.win_tone {:?}, using last-player", t.audio.win_tone));
            WinTone::default()
        });
        let palette = PaletteKind::from_name(&t.display.palette).unwrap_or_else(|| {
            warnings.push(format!("unknown display.palette {:?}, using inline", t.display.palette));
            PaletteKind::default()
        });

        GameConfig {
            timing: TimingConfig {
                poll_interval_ms: t.timing.poll_interval_ms.max(1),
                reaction_delay_secs: t.timing.reaction_delay_secs,
                level_pause_ms: t.timing.level_pause_ms,
                base_duration_ms: t.timing.base_duration_ms,
                min_duration_ms: t.timing.min_duration_ms,
            },
            keys: ButtonBindings {
                button_a: t.keys.button_a,
                button_b: t.keys.button_b,
                button_x: t.keys.button_x,
                button_y: t.keys.button_y,
            },
            gamepad: ButtonBindings {
                button_a: t.gamepad.button_a,
                button_b: t.gamepad.button_b,
                button_x: t.gamepad.button_x,
                button_y: t.gamepad.button_y,
            },
            audio: AudioConfig {
                volume: t.audio.volume.clamp(0.0, 1.0),
                win_tone,
            },
            palette,
            log_file: t.general.log_file.map(PathBuf::from),
            log_filter: t.general.log_filter,
        }
    }
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::from_toml(TomlConfig::default(), &mut Vec::new())
    }
}

/// Candidate directories to search: exe dir + CWD + system paths (deduplicated).
fn candidate_dirs() -> Vec<PathBuf> {
    let mut dirs = vec![];

    // 1. Directory of the running executable
    if let Ok(exe) = std::env::current_exe() {
        let resolved = exe.canonicalize().unwrap_or(exe);
        if let Some(parent) = resolved.parent() {
            dirs.push(parent.to_path_buf());
        }
    }

    // 2. Current working directory
    if let Ok(cwd) = std::env::current_dir() {
        if !dirs.iter().any(|d| d == &cwd) {
            dirs.push(cwd);
        }
    }

    // 3. XDG data home (~/.local/share/dosame)
    if let Ok(home) = std::env::var("HOME") {
        let xdg = PathBuf::from(&home).join(".local/share/dosame");
        if xdg.is_dir() && !dirs.iter().any(|d| d == &xdg) {
            dirs.push(xdg);
        }
    }

    // 4. System data directory (/usr/share/dosame)
    let sys = PathBuf::from("/usr/share/dosame");
    if sys.is_dir() && !dirs.iter().any(|d| d == &sys) {
        dirs.push(sys);
    }

    if dirs.is_empty() {
        dirs.push(PathBuf::from("."));
    }

    dirs
}

/// First `config.toml` found in the candidate directories.
fn find_config(search_dirs: &[PathBuf]) -> Option<PathBuf> {
    search_dirs
        .iter()
        .map(|dir| dir.join("config.toml"))
        .find(|path| path.exists())
}
