use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

/// Split bounds, in percent of the width given to the structured pane.
pub const MIN_SPLIT: u8 = 20;
pub const MAX_SPLIT: u8 = 80;
pub const DEFAULT_SPLIT: u8 = 50;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub edit: bool,
    pub split: Option<u8>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            edit: self.edit || other.edit,
            split: other.split.or(self.split),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }
}

/// Clamp a split percentage into the allowed pane range.
pub fn clamp_split(percent: u8) -> u8 {
    percent.clamp(MIN_SPLIT, MAX_SPLIT)
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("markdual").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("markdual")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("markdual").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("markdual")
                .join("config");
        }
    }

    PathBuf::from(".markdualrc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".markdualrc")
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
    let mut lines = vec!["# markdual defaults (saved with --save)".to_string()];
    if flags.edit {
        lines.push("--edit".to_string());
    }
    if let Some(split) = flags.split {
        lines.push(format!("--split {split}"));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent() {
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

pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--edit" {
            flags.edit = true;
        } else if token == "--split" {
            if let Some(next) = tokens.get(i + 1) {
                flags.split = parse_split(next);
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--split=") {
            flags.split = parse_split(value);
        } else if token == "--log-file" {
            if let Some(next) = tokens.get(i + 1) {
                flags.log_file = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--log-file=") {
            flags.log_file = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}

fn parse_split(s: &str) -> Option<u8> {
    s.trim_end_matches('%').parse::<u8>().ok().map(clamp_split)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let args = vec![
            "markdual".to_string(),
            "--edit".to_string(),
            "--split".to_string(),
            "60".to_string(),
            "--log-file=sync.log".to_string(),
            "notes.md".to_string(),
        ];
        let flags = parse_flag_tokens(&args);
        assert!(flags.edit);
        assert_eq!(flags.split, Some(60));
        assert_eq!(flags.log_file, Some(PathBuf::from("sync.log")));
    }

    #[test]
    fn test_split_is_clamped() {
        let flags = parse_flag_tokens(&["--split=5".to_string()]);
        assert_eq!(flags.split, Some(MIN_SPLIT));
        let flags = parse_flag_tokens(&["--split".to_string(), "95%".to_string()]);
        assert_eq!(flags.split, Some(MAX_SPLIT));
    }

    #[test]
    fn test_unparseable_split_is_ignored() {
        let flags = parse_flag_tokens(&["--split".to_string(), "wide".to_string()]);
        assert_eq!(flags.split, None);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            edit: true,
            split: Some(30),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            split: Some(70),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.edit);
        assert_eq!(merged.split, Some(70));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".markdualrc");
        let flags = ConfigFlags {
            edit: true,
            split: Some(40),
            log_file: Some(PathBuf::from("sync.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
    }

    #[test]
    fn test_missing_config_is_default() {
        let dir = tempdir().unwrap();
        let loaded = load_config_flags(&dir.path().join("absent")).unwrap();
        assert_eq!(loaded, ConfigFlags::default());
    }
}
