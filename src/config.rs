use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

const APP_DIR: &str = "quillnote";

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ConfigFlags {
    pub verbose: bool,
    pub inherit_styles: bool,
    pub keybindings: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            verbose: self.verbose || other.verbose,
            inherit_styles: self.inherit_styles || other.inherit_styles,
            keybindings: other
                .keybindings
                .clone()
                .or_else(|| self.keybindings.clone()),
        }
    }

    /// The key binding store to use: the configured path, or the default
    /// one next to the global config.
    pub fn keybindings_path(&self) -> PathBuf {
        self.keybindings
            .clone()
            .unwrap_or_else(default_keybindings_path)
    }
}

fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return Some(PathBuf::from(appdata).join(APP_DIR));
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return Some(
                PathBuf::from(home)
                    .join("Library")
                    .join("Application Support")
                    .join(APP_DIR),
            );
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return Some(PathBuf::from(xdg).join(APP_DIR));
        }
        if let Some(home) = std::env::var_os("HOME") {
            return Some(PathBuf::from(home).join(".config").join(APP_DIR));
        }
    }

    None
}

pub fn global_config_path() -> PathBuf {
    config_dir().map_or_else(local_override_path, |dir| dir.join("config"))
}

pub fn default_keybindings_path() -> PathBuf {
    config_dir().map_or_else(
        || PathBuf::from(".quillnote-keybindings"),
        |dir| dir.join("keybindings"),
    )
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".quillnoterc")
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
    let mut lines = vec!["# quillnote defaults (saved with --save)".to_string()];
    if flags.verbose {
        lines.push("--verbose".to_string());
    }
    if flags.inherit_styles {
        lines.push("--inherit-styles".to_string());
    }
    if let Some(path) = &flags.keybindings {
        lines.push(format!("--keybindings {}", path.display()));
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

/// Pick the flags this module persists out of a token list. Anything else
/// (subcommands, file names, other options) is skipped.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = &tokens[i];
        if token == "--verbose" || token == "-v" {
            flags.verbose = true;
        } else if token == "--inherit-styles" {
            flags.inherit_styles = true;
        } else if token == "--keybindings" {
            if let Some(next) = tokens.get(i + 1) {
                flags.keybindings = Some(PathBuf::from(next));
                i += 1;
            }
        } else if let Some(value) = token.strip_prefix("--keybindings=") {
            flags.keybindings = Some(PathBuf::from(value));
        }
        i += 1;
    }
    flags
}
