use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use autohost_plugin_api::ConfigView;

/// Configuration of one plugin
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PluginSettings {
    /// Whether the plugin is loaded at startup
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Host-wide settings
    #[serde(default)]
    pub global: BTreeMap<String, toml::Value>,

    /// Per-preset settings (preset name -> settings)
    #[serde(default)]
    pub presets: BTreeMap<String, BTreeMap<String, toml::Value>>,
}

fn default_enabled() -> bool {
    true
}

impl Default for PluginSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            global: BTreeMap::new(),
            presets: BTreeMap::new(),
        }
    }
}

impl PluginSettings {
    pub fn global_view(&self) -> ConfigView {
        to_view(&self.global)
    }

    /// Settings of `preset`, empty if the preset has none
    pub fn preset_view(&self, preset: &str) -> ConfigView {
        self.presets.get(preset).map(to_view).unwrap_or_default()
    }
}

fn to_view(values: &BTreeMap<String, toml::Value>) -> ConfigView {
    values
        .iter()
        .map(|(k, v)| (k.clone(), value_to_string(v)))
        .collect()
}

/// Render a TOML value the way plugins read settings: as plain text
pub fn value_to_string(value: &toml::Value) -> String {
    match value {
        toml::Value::String(s) => s.clone(),
        toml::Value::Integer(i) => i.to_string(),
        toml::Value::Float(f) => f.to_string(),
        toml::Value::Boolean(b) => if *b { "1" } else { "0" }.to_string(),
        toml::Value::Datetime(dt) => dt.to_string(),
        toml::Value::Array(items) => items
            .iter()
            .map(value_to_string)
            .collect::<Vec<_>>()
            .join(";"),
        toml::Value::Table(_) => String::new(),
    }
}
