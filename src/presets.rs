use crate::settings::EngineSettings;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A named, described bundle of engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub description: String,
    pub settings: EngineSettings,
}

impl Preset {
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            settings,
        }
    }
}

/// Manager for loading and saving presets
pub struct PresetManager {
    /// Built-in presets that ship with the app
    pub builtin: Vec<Preset>,
    /// User-created presets loaded from disk
    pub user: Vec<Preset>,
}

impl Default for PresetManager {
    fn default() -> Self {
        Self::new()
    }
}

impl PresetManager {
    pub fn new() -> Self {
        let mut manager = Self {
            builtin: Vec::new(),
            user: Vec::new(),
        };
        manager.load_builtin_presets();
        manager.load_user_presets();
        manager
    }

    /// Load the built-in presets
    fn load_builtin_presets(&mut self) {
        self.builtin = vec![
            Preset::new(
                "Classic",
                "The default field: gentle bands, steady homing",
                EngineSettings::default(),
            ),
            Preset::new(
                "Magnetic",
                "Wide attraction band and a generous capture radius",
                EngineSettings {
                    attract_gain: 0.03,
                    far_threshold: 280.0,
                    capture_radius: 80.0,
                    ..Default::default()
                },
            ),
            Preset::new(
                "Skittish",
                "Strong repulsion, no pull; agents scatter from the pointer",
                EngineSettings {
                    repulse_gain: 0.12,
                    near_threshold: 160.0,
                    attract_gain: 0.0,
                    capture_radius: 30.0,
                    ..Default::default()
                },
            ),
            Preset::new(
                "Calm Drift",
                "Slow agents on long leashes with a wide connection web",
                EngineSettings {
                    max_speed_min: 0.5,
                    max_speed_max: 1.5,
                    follow_gain: 1.5,
                    connection_radius: 140.0,
                    ..Default::default()
                },
            ),
            Preset::new(
                "Dense Web",
                "A crowded fine-grained grid with short connections",
                EngineSettings {
                    agent_count: 192,
                    grid_cols: 16,
                    grid_rows: 12,
                    connection_radius: 70.0,
                    radius_min: 1.5,
                    radius_max: 2.5,
                    ..Default::default()
                },
            ),
            Preset::new(
                "Sprint",
                "Fast chases and a tight capture radius",
                EngineSettings {
                    follow_gain: 4.0,
                    capture_radius: 35.0,
                    max_speed_min: 2.0,
                    max_speed_max: 4.0,
                    ..Default::default()
                },
            ),
        ];
    }

    /// Get the presets directory path
    fn presets_dir() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("dotfield").join("presets"))
    }

    /// Load user presets from disk
    fn load_user_presets(&mut self) {
        if let Some(dir) = Self::presets_dir() {
            if dir.exists() {
                if let Ok(entries) = fs::read_dir(&dir) {
                    for entry in entries.flatten() {
                        if entry.path().extension().is_some_and(|e| e == "json") {
                            if let Ok(content) = fs::read_to_string(entry.path()) {
                                if let Ok(preset) = serde_json::from_str::<Preset>(&content) {
                                    self.user.push(preset);
                                }
                            }
                        }
                    }
                }
            }
        }
    }

    /// Save a preset to disk
    pub fn save_preset(&mut self, preset: Preset) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        fs::create_dir_all(&dir).map_err(|e| format!("Failed to create presets directory: {}", e))?;

        let path = dir.join(format!("{}.json", Self::sanitize_name(&preset.name)));

        let json = serde_json::to_string_pretty(&preset)
            .map_err(|e| format!("Failed to serialize preset: {}", e))?;

        fs::write(&path, json).map_err(|e| format!("Failed to write preset file: {}", e))?;

        if !self.user.iter().any(|p| p.name == preset.name) {
            self.user.push(preset);
        }

        Ok(())
    }

    /// Delete a user preset
    pub fn delete_preset(&mut self, name: &str) -> Result<(), String> {
        let dir = Self::presets_dir().ok_or("Could not determine config directory")?;

        if let Some(pos) = self.user.iter().position(|p| p.name == name) {
            self.user.remove(pos);
        }

        let path = dir.join(format!("{}.json", Self::sanitize_name(name)));
        if path.exists() {
            fs::remove_file(&path).map_err(|e| format!("Failed to delete preset file: {}", e))?;
        }

        Ok(())
    }

    fn sanitize_name(name: &str) -> String {
        name.chars()
            .map(|c| {
                if c.is_alphanumeric() || c == '-' || c == '_' {
                    c
                } else {
                    '_'
                }
            })
            .collect()
    }

    /// Get all presets (builtin + user)
    pub fn all_presets(&self) -> impl Iterator<Item = &Preset> {
        self.builtin.iter().chain(self.user.iter())
    }

    /// Find a preset by name
    pub fn find(&self, name: &str) -> Option<&Preset> {
        self.all_presets()
            .find(|p| p.name.eq_ignore_ascii_case(name))
    }
}
