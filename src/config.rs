//! User configuration: tunables, key bindings and persistence.
//!
//! Settings are stored as a simple key-value text file at
//! `$XDG_CONFIG_HOME/scrollsync/config.toml` (default
//! `~/.config/scrollsync/config.toml`).  Unknown keys and unparsable values
//! are ignored; numeric values are clamped into their sane range.

use std::collections::HashMap;
use std::path::PathBuf;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::core::engine::EngineConfig;
use crate::core::spring::SpringConfig;
use crate::core::wheel::DeltaMode;

// ───────────────────────────────────────── actions ───────────

/// Keyboard actions available in the interactive view.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
    PageDown,
    PageUp,
    Top,
    Bottom,
    Reload,
    Quit,
}

impl Action {
    pub const ALL: &[Action] = &[
        Action::PageDown,
        Action::PageUp,
        Action::Top,
        Action::Bottom,
        Action::Reload,
        Action::Quit,
    ];

    pub fn label(self) -> &'static str {
        match self {
            Action::PageDown => "Jump one screen down",
            Action::PageUp => "Jump one screen up",
            Action::Top => "Jump to top",
            Action::Bottom => "Jump to bottom",
            Action::Reload => "Reload page",
            Action::Quit => "Quit",
        }
    }

    fn config_key(self) -> &'static str {
        match self {
            Action::PageDown => "page_down",
            Action::PageUp => "page_up",
            Action::Top => "top",
            Action::Bottom => "bottom",
            Action::Reload => "reload",
            Action::Quit => "quit",
        }
    }

    fn from_config_key(s: &str) -> Option<Self> {
        Action::ALL.iter().copied().find(|a| a.config_key() == s)
    }
}

// ───────────────────────────────────────── key bind ──────────

/// Key code plus CTRL/ALT/SHIFT modifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct KeyBind {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
}

const MODIFIER_MASK: KeyModifiers = KeyModifiers::CONTROL
    .union(KeyModifiers::ALT)
    .union(KeyModifiers::SHIFT);

impl KeyBind {
    pub fn new(code: KeyCode, modifiers: KeyModifiers) -> Self {
        Self { code, modifiers }
    }

    pub fn matches(&self, event: KeyEvent) -> bool {
        self.code == event.code && (self.modifiers & MODIFIER_MASK) == (event.modifiers & MODIFIER_MASK)
    }

    /// Config-file form, e.g. `"PageDown"`, `"Ctrl+r"`.
    fn to_config_string(&self) -> String {
        let mut s = String::new();
        for (flag, prefix) in [
            (KeyModifiers::CONTROL, "Ctrl+"),
            (KeyModifiers::ALT, "Alt+"),
            (KeyModifiers::SHIFT, "Shift+"),
        ] {
            if self.modifiers.contains(flag) {
                s.push_str(prefix);
            }
        }
        s.push_str(&match self.code {
            KeyCode::Char(' ') => "Space".into(),
            KeyCode::Char(c) => c.to_string(),
            KeyCode::Up => "Up".into(),
            KeyCode::Down => "Down".into(),
            KeyCode::Home => "Home".into(),
            KeyCode::End => "End".into(),
            KeyCode::PageUp => "PageUp".into(),
            KeyCode::PageDown => "PageDown".into(),
            KeyCode::Esc => "Esc".into(),
            KeyCode::Enter => "Enter".into(),
            KeyCode::F(n) => format!("F{n}"),
            other => format!("{other:?}"),
        });
        s
    }

    fn parse(s: &str) -> Option<Self> {
        let mut modifiers = KeyModifiers::NONE;
        let (prefix, key) = match s.rsplit_once('+') {
            Some((prefix, key)) if !key.is_empty() => (prefix, key),
            _ => ("", s),
        };
        for part in prefix.split('+').filter(|p| !p.is_empty()) {
            modifiers |= match part.to_lowercase().as_str() {
                "ctrl" => KeyModifiers::CONTROL,
                "alt" => KeyModifiers::ALT,
                "shift" => KeyModifiers::SHIFT,
                _ => return None,
            };
        }
        let code = match key.to_lowercase().as_str() {
            "up" => KeyCode::Up,
            "down" => KeyCode::Down,
            "home" => KeyCode::Home,
            "end" => KeyCode::End,
            "pageup" | "pgup" => KeyCode::PageUp,
            "pagedown" | "pgdn" => KeyCode::PageDown,
            "esc" | "escape" => KeyCode::Esc,
            "enter" | "return" => KeyCode::Enter,
            "space" => KeyCode::Char(' '),
            k if k.starts_with('f') && k.len() > 1 => KeyCode::F(k[1..].parse().ok()?),
            _ if key.chars().count() == 1 => KeyCode::Char(key.chars().next()?),
            _ => return None,
        };
        Some(KeyBind { code, modifiers })
    }
}

// ───────────────────────────────────────── config ────────────

/// Accepted range for `gate_threshold`, from the file or the command line.
const GATE_THRESHOLD_RANGE: (f64, f64) = (100.0, 100_000.0);

/// Application configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct AppConfig {
    pub bindings: HashMap<Action, Vec<KeyBind>>,
    /// Fraction of the remaining distance covered per 60 Hz frame.
    pub lerp: f64,
    pub wheel_multiplier: f64,
    pub wheel_delta_mode: DeltaMode,
    /// Wheel pixels a gate must accumulate before navigating.
    pub gate_threshold: f64,
    /// Scroll distance a pinned card section consumes.
    pub pin_extent: f64,
    pub spring_ease: f64,
    pub spring_epsilon: f64,
    pub spring_strength: f64,
    /// Frame clock rate in the interactive view.
    pub fps: u32,
}

impl Default for AppConfig {
    fn default() -> Self {
        let engine = EngineConfig::default();
        let spring = SpringConfig::default();
        Self {
            bindings: Self::default_bindings(),
            lerp: engine.lerp,
            wheel_multiplier: engine.wheel_multiplier,
            wheel_delta_mode: DeltaMode::default(),
            gate_threshold: 3000.0,
            pin_extent: 1200.0,
            spring_ease: spring.ease,
            spring_epsilon: spring.epsilon,
            spring_strength: spring.strength,
            fps: 60,
        }
    }
}

impl AppConfig {
    pub fn default_bindings() -> HashMap<Action, Vec<KeyBind>> {
        use Action::*;
        let n = KeyModifiers::NONE;
        HashMap::from([
            (
                PageDown,
                vec![KeyBind::new(KeyCode::PageDown, n), KeyBind::new(KeyCode::Char(' '), n)],
            ),
            (PageUp, vec![KeyBind::new(KeyCode::PageUp, n)]),
            (Top, vec![KeyBind::new(KeyCode::Home, n), KeyBind::new(KeyCode::Char('g'), n)]),
            (Bottom, vec![KeyBind::new(KeyCode::End, n), KeyBind::new(KeyCode::Char('G'), KeyModifiers::SHIFT)]),
            (Reload, vec![KeyBind::new(KeyCode::Char('r'), n)]),
            (Quit, vec![KeyBind::new(KeyCode::Char('q'), n), KeyBind::new(KeyCode::Esc, n)]),
        ])
    }

    /// Find the action bound to a key event.  The binding with the most
    /// modifiers wins.
    pub fn match_key(&self, event: KeyEvent) -> Option<Action> {
        self.bindings
            .iter()
            .flat_map(|(&action, binds)| binds.iter().map(move |b| (action, b)))
            .filter(|(_, bind)| bind.matches(event))
            .max_by_key(|(_, bind)| bind.modifiers.bits().count_ones())
            .map(|(action, _)| action)
    }

    pub fn engine_config(&self) -> EngineConfig {
        EngineConfig {
            lerp: self.lerp,
            wheel_multiplier: self.wheel_multiplier,
        }
    }

    pub fn spring_config(&self) -> SpringConfig {
        SpringConfig {
            ease: self.spring_ease,
            strength: self.spring_strength,
            epsilon: self.spring_epsilon,
        }
    }

    /// Override the gate threshold, clamped like the config file value.
    /// Non-finite values are ignored.
    pub fn set_gate_threshold(&mut self, threshold: f64) {
        if threshold.is_finite() {
            self.gate_threshold = threshold.clamp(GATE_THRESHOLD_RANGE.0, GATE_THRESHOLD_RANGE.1);
        }
    }

    /// Status-bar hint built from the current bindings.
    pub fn status_bar_hint(&self) -> String {
        let first = |action: Action| {
            self.bindings
                .get(&action)
                .and_then(|b| b.first())
                .map(KeyBind::to_config_string)
                .unwrap_or_else(|| "?".into())
        };
        format!(
            "wheel: scroll | {}/{}: jump | {}: reload | {}: quit",
            first(Action::PageDown),
            first(Action::PageUp),
            first(Action::Reload),
            first(Action::Quit),
        )
    }

    // ── persistence ─────────────────────────────────────────────

    /// Load config from disk, falling back to defaults.
    pub fn load() -> Self {
        match std::fs::read_to_string(config_path()) {
            Ok(contents) => Self::parse_config(&contents),
            Err(_) => Self::default(),
        }
    }

    /// Persist current config to disk.  Returns the path written.
    pub fn save(&self) -> anyhow::Result<PathBuf> {
        let path = config_path();
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&path, self.serialise())?;
        Ok(path)
    }

    fn parse_config(s: &str) -> Self {
        let mut config = Self::default();
        let num = |value: &str, lo: f64, hi: f64| {
            value
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .map(|v| v.clamp(lo, hi))
        };

        for line in s.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') || line.starts_with('[') {
                continue;
            }
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            let value = value.trim().trim_matches('"');

            let slot = match key {
                "lerp" => Some((&mut config.lerp, 0.01, 1.0)),
                "wheel_multiplier" => Some((&mut config.wheel_multiplier, 0.1, 10.0)),
                "gate_threshold" => Some((
                    &mut config.gate_threshold,
                    GATE_THRESHOLD_RANGE.0,
                    GATE_THRESHOLD_RANGE.1,
                )),
                "pin_extent" => Some((&mut config.pin_extent, 0.0, 20_000.0)),
                "spring_ease" => Some((&mut config.spring_ease, 0.01, 1.0)),
                "spring_epsilon" => Some((&mut config.spring_epsilon, 0.001, 5.0)),
                "spring_strength" => Some((&mut config.spring_strength, 0.0, 200.0)),
                _ => None,
            };
            if let Some((field, lo, hi)) = slot {
                if let Some(v) = num(value, lo, hi) {
                    *field = v;
                }
                continue;
            }

            match key {
                "wheel_delta_mode" => {
                    if let Some(mode) = DeltaMode::parse(value) {
                        config.wheel_delta_mode = mode;
                    }
                }
                "fps" => {
                    if let Ok(v) = value.parse::<u32>() {
                        config.fps = v.clamp(10, 240);
                    }
                }
                _ => {
                    let Some(action) = Action::from_config_key(key) else {
                        continue;
                    };
                    let parsed: Vec<KeyBind> = value
                        .split(',')
                        .filter_map(|part| KeyBind::parse(part.trim().trim_matches('"')))
                        .collect();
                    if !parsed.is_empty() {
                        config.bindings.insert(action, parsed);
                    }
                }
            }
        }
        config
    }

    fn serialise(&self) -> String {
        let mut lines = vec![
            "# scrollsync configuration".to_string(),
            String::new(),
            "# Smooth scrolling".to_string(),
            format!("lerp = {}", self.lerp),
            format!("wheel_multiplier = {}", self.wheel_multiplier),
            format!("# {}", DeltaMode::ALL.iter().map(|m| m.label()).collect::<Vec<_>>().join(" | ")),
            format!("wheel_delta_mode = {}", self.wheel_delta_mode.label()),
            String::new(),
            "# Page behaviour".to_string(),
            format!("gate_threshold = {}", self.gate_threshold),
            format!("pin_extent = {}", self.pin_extent),
            format!("spring_ease = {}", self.spring_ease),
            format!("spring_epsilon = {}", self.spring_epsilon),
            format!("spring_strength = {}", self.spring_strength),
            format!("fps = {}", self.fps),
            String::new(),
            "# Key bindings".to_string(),
            "# Format: action = Key1, Key2, ...".to_string(),
            String::new(),
        ];
        for &action in Action::ALL {
            if let Some(binds) = self.bindings.get(&action) {
                let keys: Vec<String> = binds.iter().map(KeyBind::to_config_string).collect();
                lines.push(format!("# {}", action.label()));
                lines.push(format!("{} = {}", action.config_key(), keys.join(", ")));
            }
        }
        lines.push(String::new());
        lines.join("\n")
    }
}

/// Return the config file path (`$XDG_CONFIG_HOME/scrollsync/config.toml`).
pub fn config_path() -> PathBuf {
    let config_dir = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
            PathBuf::from(home).join(".config")
        });
    config_dir.join("scrollsync").join("config.toml")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent::new(code, modifiers)
    }

    #[test]
    fn serialised_defaults_parse_back() {
        let config = AppConfig::default();
        assert_eq!(AppConfig::parse_config(&config.serialise()), config);
    }

    #[test]
    fn values_are_clamped_and_junk_ignored() {
        let config = AppConfig::parse_config(
            "lerp = 7\nwheel_multiplier = nope\ngate_threshold = 5\nfps = 1000\n\
             wheel_delta_mode = normalized\nmystery = 3\nno equals sign\n",
        );
        assert_eq!(config.lerp, 1.0);
        assert_eq!(config.wheel_multiplier, AppConfig::default().wheel_multiplier);
        assert_eq!(config.gate_threshold, 100.0);
        assert_eq!(config.fps, 240);
        assert_eq!(config.wheel_delta_mode, DeltaMode::Normalized);
    }

    #[test]
    fn rebinding_replaces_defaults() {
        let config = AppConfig::parse_config("reload = Ctrl+r, F5\n");
        assert_eq!(
            config.match_key(key(KeyCode::Char('r'), KeyModifiers::CONTROL)),
            Some(Action::Reload)
        );
        assert_eq!(config.match_key(key(KeyCode::F(5), KeyModifiers::NONE)), Some(Action::Reload));
        assert_eq!(config.match_key(key(KeyCode::Char('r'), KeyModifiers::NONE)), None);
    }

    #[test]
    fn default_keys_cover_every_action() {
        let config = AppConfig::default();
        for &action in Action::ALL {
            assert!(config.bindings.get(&action).is_some_and(|b| !b.is_empty()), "{}", action.label());
        }
        assert_eq!(config.match_key(key(KeyCode::End, KeyModifiers::NONE)), Some(Action::Bottom));
    }

    #[test]
    fn threshold_override_is_clamped_like_the_file() {
        let mut config = AppConfig::default();
        config.set_gate_threshold(0.0);
        assert_eq!(config.gate_threshold, 100.0);
        config.set_gate_threshold(-5.0);
        assert_eq!(config.gate_threshold, 100.0);
        config.set_gate_threshold(f64::NAN);
        assert_eq!(config.gate_threshold, 100.0);
        config.set_gate_threshold(1e9);
        assert_eq!(config.gate_threshold, 100_000.0);
        config.set_gate_threshold(2500.0);
        assert_eq!(config.gate_threshold, 2500.0);
    }

    #[test]
    fn key_strings_parse() {
        assert_eq!(
            KeyBind::parse("Shift+G"),
            Some(KeyBind::new(KeyCode::Char('G'), KeyModifiers::SHIFT))
        );
        assert_eq!(KeyBind::parse("pgdn"), Some(KeyBind::new(KeyCode::PageDown, KeyModifiers::NONE)));
        assert_eq!(KeyBind::parse("Hyper+x"), None);
    }
}
