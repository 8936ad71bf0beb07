use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::format::TabSize;

/// Smallest editor font size, in points.
pub const MIN_FONT_SIZE: u16 = 10;
/// Largest editor font size, in points.
pub const MAX_FONT_SIZE: u16 = 24;
/// Font size used when none is configured.
pub const DEFAULT_FONT_SIZE: u16 = 14;

#[derive(clap::ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
    System,
}

/// Flags collected from the command line or a config file.
///
/// `None` means "not mentioned", so later layers only override what they set.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub tab_size: Option<usize>,
    pub font_size: Option<u16>,
    pub theme: Option<ThemeMode>,
    pub line_numbers: Option<bool>,
    pub auto_indent: Option<bool>,
    pub word_wrap: Option<bool>,
    pub perf: bool,
}

impl ConfigFlags {
    /// Layer `other` on top of `self`.
    pub fn union(&self, other: &Self) -> Self {
        Self {
            tab_size: other.tab_size.or(self.tab_size),
            font_size: other.font_size.or(self.font_size),
            theme: other.theme.or(self.theme),
            line_numbers: other.line_numbers.or(self.line_numbers),
            auto_indent: other.auto_indent.or(self.auto_indent),
            word_wrap: other.word_wrap.or(self.word_wrap),
            perf: self.perf || other.perf,
        }
    }

    /// Resolve the flags into settings, filling defaults and clamping ranges.
    pub fn settings(&self) -> EditorSettings {
        let defaults = EditorSettings::default();
        EditorSettings {
            theme: self.theme.unwrap_or(defaults.theme),
            font_size: self
                .font_size
                .map_or(defaults.font_size, |size| size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE)),
            show_line_numbers: self.line_numbers.unwrap_or(defaults.show_line_numbers),
            auto_indent: self.auto_indent.unwrap_or(defaults.auto_indent),
            word_wrap: self.word_wrap.unwrap_or(defaults.word_wrap),
            tab_size: self.tab_size.map_or(defaults.tab_size, TabSize::new),
        }
    }
}

/// Effective editor settings.
///
/// Only `tab_size` reaches the editing engine; the rest is for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorSettings {
    pub theme: ThemeMode,
    pub font_size: u16,
    pub show_line_numbers: bool,
    pub auto_indent: bool,
    pub word_wrap: bool,
    pub tab_size: TabSize,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Dark,
            font_size: DEFAULT_FONT_SIZE,
            show_line_numbers: true,
            auto_indent: true,
            word_wrap: false,
            tab_size: TabSize::default(),
        }
    }
}

/// Directory holding the global config file and the data stores.
pub fn global_config_dir() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("neocoder");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("neocoder");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("neocoder");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home).join(".config").join("neocoder");
        }
    }

    PathBuf::from(".neocoder")
}

pub fn global_config_path() -> PathBuf {
    global_config_dir().join("config")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".neocoderrc")
}

pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# neocoder defaults (saved with --save)".to_string());
    if let Some(size) = flags.tab_size {
        lines.push(format!("--tab-size {size}"));
    }
    if let Some(size) = flags.font_size {
        lines.push(format!("--font-size {size}"));
    }
    if let Some(theme) = flags.theme {
        let theme_str = match theme {
            ThemeMode::Light => "light",
            ThemeMode::Dark => "dark",
            ThemeMode::System => "system",
        };
        lines.push(format!("--theme {theme_str}"));
    }
    match flags.line_numbers {
        Some(true) => lines.push("--line-numbers".to_string()),
        Some(false) => lines.push("--no-line-numbers".to_string()),
        None => {}
    }
    match flags.auto_indent {
        Some(true) => lines.push("--auto-indent".to_string()),
        Some(false) => lines.push("--no-auto-indent".to_string()),
        None => {}
    }
    match flags.word_wrap {
        Some(true) => lines.push("--word-wrap".to_string()),
        Some(false) => lines.push("--no-word-wrap".to_string()),
        None => {}
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Pick the known flags out of `tokens`, ignoring everything else.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        let (name, inline_value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value)),
            None => (token, None),
        };
        match name {
            "--line-numbers" => flags.line_numbers = Some(true),
            "--no-line-numbers" => flags.line_numbers = Some(false),
            "--auto-indent" => flags.auto_indent = Some(true),
            "--no-auto-indent" => flags.auto_indent = Some(false),
            "--word-wrap" => flags.word_wrap = Some(true),
            "--no-word-wrap" => flags.word_wrap = Some(false),
            "--perf" => flags.perf = true,
            "--tab-size" | "--font-size" | "--theme" => {
                let value = match inline_value {
                    Some(value) => Some(value),
                    None => {
                        i += 1;
                        tokens.get(i).map(String::as_str)
                    }
                };
                if let Some(value) = value {
                    apply_valued_flag(&mut flags, name, value);
                }
            }
            _ => {}
        }
        i += 1;
    }
    flags
}

fn apply_valued_flag(flags: &mut ConfigFlags, name: &str, value: &str) {
    match name {
        "--tab-size" => {
            if let Ok(size) = value.parse() {
                flags.tab_size = Some(size);
            }
        }
        "--font-size" => {
            if let Ok(size) = value.parse() {
                flags.font_size = Some(size);
            }
        }
        "--theme" => flags.theme = parse_theme(value),
        _ => {}
    }
}

fn parse_theme(s: &str) -> Option<ThemeMode> {
    match s {
        "light" => Some(ThemeMode::Light),
        "dark" => Some(ThemeMode::Dark),
        "system" => Some(ThemeMode::System),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn tokens(args: &[&str]) -> Vec<String> {
        args.iter().map(ToString::to_string).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = tokens(&[
            "neocoder",
            "format",
            "--tab-size",
            "2",
            "--no-line-numbers",
            "--theme",
            "light",
            "--font-size=18",
            "--word-wrap",
            "main.swift",
        ]);
        let flags = parse_flag_tokens(&args);
        assert_eq!(flags.tab_size, Some(2));
        assert_eq!(flags.line_numbers, Some(false));
        assert_eq!(flags.theme, Some(ThemeMode::Light));
        assert_eq!(flags.font_size, Some(18));
        assert_eq!(flags.word_wrap, Some(true));
        assert_eq!(flags.auto_indent, None);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let flags = parse_flag_tokens(&tokens(&["--tab-size", "wide", "--theme=neon"]));
        assert_eq!(flags.tab_size, None);
        assert_eq!(flags.theme, None);
    }

    #[test]
    fn test_config_union_prefers_later_layer() {
        let file = ConfigFlags {
            tab_size: Some(8),
            line_numbers: Some(false),
            perf: true,
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            tab_size: Some(2),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert_eq!(merged.tab_size, Some(2));
        assert_eq!(merged.line_numbers, Some(false));
        assert!(merged.perf);
    }

    #[test]
    fn test_settings_apply_defaults_and_clamp() {
        let settings = ConfigFlags::default().settings();
        assert_eq!(settings, EditorSettings::default());
        assert_eq!(settings.tab_size.get(), 4);
        assert!(settings.show_line_numbers);

        let flags = ConfigFlags {
            tab_size: Some(20),
            font_size: Some(3),
            ..ConfigFlags::default()
        };
        let settings = flags.settings();
        assert_eq!(settings.tab_size.get(), 8);
        assert_eq!(settings.font_size, MIN_FONT_SIZE);
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".neocoderrc");
        let flags = ConfigFlags {
            tab_size: Some(2),
            font_size: Some(16),
            theme: Some(ThemeMode::System),
            line_numbers: Some(false),
            auto_indent: Some(true),
            word_wrap: Some(false),
            perf: true,
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
