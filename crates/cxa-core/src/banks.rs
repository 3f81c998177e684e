use std::collections::{HashMap, HashSet};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::ConfigError;

/// A named review theme and the keywords that trigger it.
///
/// Keywords are matched as case-insensitive substrings of the review text and
/// are stored lowercased after [`load_banks`] / [`BanksFile::from_yaml_str`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThemeDefinition {
    pub name: String,
    pub keywords: Vec<String>,
}

impl ThemeDefinition {
    /// Returns `true` if any keyword occurs in `lowered_text`.
    ///
    /// The caller lowercases the text once per review rather than once per theme.
    #[must_use]
    pub fn matches(&self, lowered_text: &str) -> bool {
        self.keywords.iter().any(|k| lowered_text.contains(k.as_str()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BankConfig {
    pub name: String,
    /// Play Store application id, e.g. `com.combanketh.mobilebanking`.
    pub app_id: String,
    #[serde(default)]
    pub themes: Vec<ThemeDefinition>,
}

/// Lowercase the name and replace spaces with underscores.
#[must_use]
pub fn file_stem(name: &str) -> String {
    name.to_lowercase().replace(' ', "_")
}

#[derive(Debug, Clone, Deserialize)]
pub struct BanksFile {
    pub banks: Vec<BankConfig>,
}

impl BanksFile {
    /// Parse, validate, and normalize a banks configuration document.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if the YAML does not parse or fails validation.
    pub fn from_yaml_str(content: &str) -> Result<Self, ConfigError> {
        let mut banks_file: BanksFile = serde_yaml::from_str(content)?;
        validate_banks(&banks_file)?;
        for bank in &mut banks_file.banks {
            for theme in &mut bank.themes {
                for keyword in &mut theme.keywords {
                    *keyword = keyword.trim().to_lowercase();
                }
                theme.keywords.retain(|k| !k.is_empty());
            }
        }
        Ok(banks_file)
    }

    /// Look up a bank by exact name.
    #[must_use]
    pub fn bank(&self, name: &str) -> Option<&BankConfig> {
        self.banks.iter().find(|b| b.name == name)
    }

    /// Build the per-bank theme lookup table.
    #[must_use]
    pub fn theme_table(&self) -> ThemeTable {
        ThemeTable {
            themes: self
                .banks
                .iter()
                .map(|b| (b.name.clone(), b.themes.clone()))
                .collect(),
        }
    }
}

/// Load and validate the banks configuration from a YAML file.
///
/// # Errors
///
/// Returns `ConfigError` if the file cannot be read, parsed, or fails validation.
pub fn load_banks(path: &Path) -> Result<BanksFile, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::BanksFileIo {
        path: path.display().to_string(),
        source: e,
    })?;

    BanksFile::from_yaml_str(&content)
}

fn validate_banks(banks_file: &BanksFile) -> Result<(), ConfigError> {
    let mut seen_names = HashSet::new();

    for bank in &banks_file.banks {
        if bank.name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "bank name must be non-empty".to_string(),
            ));
        }

        if bank.app_id.trim().is_empty() {
            return Err(ConfigError::Validation(format!(
                "bank '{}' has an empty app_id",
                bank.name
            )));
        }

        if !seen_names.insert(bank.name.to_lowercase()) {
            return Err(ConfigError::Validation(format!(
                "duplicate bank name: '{}'",
                bank.name
            )));
        }

        let mut seen_themes = HashSet::new();
        for theme in &bank.themes {
            if theme.name.trim().is_empty() {
                return Err(ConfigError::Validation(format!(
                    "bank '{}' has a theme with an empty name",
                    bank.name
                )));
            }
            if !seen_themes.insert(theme.name.as_str()) {
                return Err(ConfigError::Validation(format!(
                    "bank '{}' defines theme '{}' more than once",
                    bank.name, theme.name
                )));
            }
            if theme.keywords.iter().all(|k| k.trim().is_empty()) {
                return Err(ConfigError::Validation(format!(
                    "theme '{}' of bank '{}' has no keywords",
                    theme.name, bank.name
                )));
            }
        }
    }

    Ok(())
}

/// Static per-bank theme configuration: bank name → ordered theme definitions.
#[derive(Debug, Clone, Default)]
pub struct ThemeTable {
    themes: HashMap<String, Vec<ThemeDefinition>>,
}

impl ThemeTable {
    /// Build a table directly from `(bank, themes)` pairs. Keywords are lowercased.
    #[must_use]
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<ThemeDefinition>)>,
    {
        let themes = entries
            .into_iter()
            .map(|(bank, defs)| {
                let defs = defs
                    .into_iter()
                    .map(|d| ThemeDefinition {
                        name: d.name,
                        keywords: d
                            .keywords
                            .iter()
                            .map(|k| k.trim().to_lowercase())
                            .filter(|k| !k.is_empty())
                            .collect(),
                    })
                    .collect();
                (bank, defs)
            })
            .collect();
        Self { themes }
    }

    /// Themes registered for `bank`, in definition order. Empty if none.
    #[must_use]
    pub fn themes_for(&self, bank: &str) -> &[ThemeDefinition] {
        self.themes.get(bank).map_or(&[], Vec::as_slice)
    }
}
