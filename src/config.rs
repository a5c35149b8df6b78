use directories::{BaseDirs, ProjectDirs};
use inquire::{Select, Text};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ContractError, Result};
use crate::model::Language;

const DEFAULT_DATA_ROOT: &str = "~/Documents/Contracts";
const DEFAULT_VENDOR_TEMPLATE: &str = include_str!("../vendor.toml");

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AppSettings {
    pub data_root: String,
    #[serde(default)]
    pub language: Language,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_root: DEFAULT_DATA_ROOT.to_string(),
            language: Language::default(),
        }
    }
}

impl AppSettings {
    /// Data root with `~` expanded.
    pub fn root(&self) -> PathBuf {
        PathBuf::from(expand_home_dir(&self.data_root))
    }
}

/// Vendor details printed on every contract.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct VendorConfig {
    pub name: String,
    pub address: String,
    pub phone: String,
    pub tax_id: String,
    pub signatory: String,
    #[serde(default)]
    pub terms: Vec<String>,
}

pub fn get_config_path() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "contract-maker", "app").ok_or(ContractError::NoConfigDir)?;
    Ok(proj_dirs.config_dir().join("settings.toml"))
}

pub fn load_settings_from(path: &Path) -> Result<Option<AppSettings>> {
    if !path.exists() {
        return Ok(None);
    }
    let content = fs::read_to_string(path).map_err(|e| ContractError::io(path, e))?;
    let settings = toml::from_str(&content).map_err(|source| ContractError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(Some(settings))
}

/// Saved settings, or defaults when nothing has been configured yet.
pub fn load_settings() -> Result<AppSettings> {
    let path = get_config_path()?;
    Ok(load_settings_from(&path)?.unwrap_or_else(|| {
        tracing::debug!(path = %path.display(), "no settings file, using defaults");
        AppSettings::default()
    }))
}

pub fn save_settings_to(path: &Path, settings: &AppSettings) -> Result<()> {
    if let Some(dir) = path.parent() {
        fs::create_dir_all(dir).map_err(|e| ContractError::io(dir, e))?;
    }
    let toml_str = toml::to_string_pretty(settings)?;
    fs::write(path, toml_str).map_err(|e| ContractError::io(path, e))
}

/// Reads `vendor.toml` under the data root, writing the default profile
/// there first if it does not exist.
pub fn load_vendor_config(root: &Path) -> Result<VendorConfig> {
    let path = root.join("vendor.toml");
    if !path.exists() {
        println!("✨ Initializing default vendor profile...");
        fs::create_dir_all(root).map_err(|e| ContractError::io(root, e))?;
        fs::write(&path, DEFAULT_VENDOR_TEMPLATE).map_err(|e| ContractError::io(&path, e))?;
    }
    let content = fs::read_to_string(&path).map_err(|e| ContractError::io(&path, e))?;
    toml::from_str(&content).map_err(|source| ContractError::Parse { path, source })
}

#[cfg(test)]
pub fn default_vendor() -> Result<VendorConfig> {
    toml::from_str(DEFAULT_VENDOR_TEMPLATE).map_err(|source| ContractError::Parse {
        path: PathBuf::from("vendor.toml"),
        source,
    })
}

pub fn setup_config_wizard() -> Result<AppSettings> {
    println!("\n⚙️  --- Configuration Setup ---");
    let path = get_config_path()?;
    let current = load_settings_from(&path)?.unwrap_or_default();

    let data_root = Text::new("Data directory (bookings, vendor profile, output):")
        .with_default(&current.data_root)
        .prompt()?;

    let languages = vec![Language::Th, Language::En];
    let start = languages.iter().position(|l| *l == current.language).unwrap_or(0);
    let language = Select::new("Document language:", languages)
        .with_starting_cursor(start)
        .prompt()?;

    let settings = AppSettings { data_root, language };
    save_settings_to(&path, &settings)?;
    println!("✅ Settings saved to {}", path.display());
    Ok(settings)
}

pub fn expand_home_dir(path: &str) -> String {
    if path.starts_with('~') {
        if let Some(base_dirs) = BaseDirs::new() {
            let home = base_dirs.home_dir().to_string_lossy();
            return path.replacen('~', &home, 1);
        }
    }
    path.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_settings_is_none() {
        let dir = tempfile::tempdir().unwrap();
        assert_eq!(load_settings_from(&dir.path().join("settings.toml")).unwrap(), None);
    }

    #[test]
    fn test_settings_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/settings.toml");
        let settings = AppSettings {
            data_root: "/srv/contracts".into(),
            language: Language::En,
        };
        save_settings_to(&path, &settings).unwrap();
        assert_eq!(load_settings_from(&path).unwrap(), Some(settings));
    }

    #[test]
    fn test_language_defaults_to_thai() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("settings.toml");
        fs::write(&path, "data_root = \"/srv\"\n").unwrap();
        let settings = load_settings_from(&path).unwrap().unwrap();
        assert_eq!(settings.language, Language::Th);
    }

    #[test]
    fn test_vendor_profile_initialized_once() {
        let dir = tempfile::tempdir().unwrap();
        let vendor = load_vendor_config(dir.path()).unwrap();
        assert_eq!(vendor, default_vendor().unwrap());
        assert!(dir.path().join("vendor.toml").exists());

        fs::write(
            dir.path().join("vendor.toml"),
            "name = \"Other\"\naddress = \"\"\nphone = \"\"\ntax_id = \"\"\nsignatory = \"\"\n",
        )
        .unwrap();
        let vendor = load_vendor_config(dir.path()).unwrap();
        assert_eq!(vendor.name, "Other");
        assert!(vendor.terms.is_empty());
    }

    #[test]
    fn test_expand_plain_path_unchanged() {
        assert_eq!(expand_home_dir("/srv/contracts"), "/srv/contracts");
    }
}
