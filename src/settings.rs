use std::fs::{self, File};
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::theory::ClefKind;

/// Persisted app preferences. Scores are deliberately not saved; only the
/// practice setup survives a restart.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub clef: ClefKind,
    pub volume: f32,
    pub midi_port: Option<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        AppSettings {
            clef: ClefKind::Treble,
            volume: 0.5,
            midi_port: None,
        }
    }
}

impl AppSettings {
    pub fn load() -> AppSettings {
        Self::try_load().unwrap_or_default()
    }

    fn try_load() -> Result<AppSettings> {
        let path = settings_path()?;
        let file = File::open(path)?;
        Ok(serde_json::from_reader(file)?)
    }

    pub fn save(&self) -> Result<()> {
        let path = settings_path()?;
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self)?;
        Ok(())
    }
}

fn settings_path() -> Result<PathBuf> {
    let mut path = dirs::config_dir()
        .ok_or_else(|| anyhow::anyhow!("could not find config directory"))?;
    path.push("sightread");
    path.push("settings.json");
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settings_serde_round_trip() {
        let settings = AppSettings {
            clef: ClefKind::Bass,
            volume: 0.8,
            midi_port: Some("Test Port".to_string()),
        };
        let json = serde_json::to_string(&settings).unwrap();
        let back: AppSettings = serde_json::from_str(&json).unwrap();
        assert_eq!(back.clef, ClefKind::Bass);
        assert_eq!(back.volume, 0.8);
        assert_eq!(back.midi_port.as_deref(), Some("Test Port"));
    }

    #[test]
    fn defaults_are_sensible() {
        let settings = AppSettings::default();
        assert_eq!(settings.clef, ClefKind::Treble);
        assert!(settings.volume > 0.0 && settings.volume <= 1.0);
        assert!(settings.midi_port.is_none());
    }
}
