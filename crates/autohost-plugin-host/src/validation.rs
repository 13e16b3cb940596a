use std::fmt;

use autohost_plugin_api::{ConfigView, ParamSchema, ParamSpec};
use tracing::warn;

use crate::error::HostError;

/// Which group of plugin settings a value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamGroup {
    Global,
    Preset,
}

impl fmt::Display for ParamGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamGroup::Global => write!(f, "global"),
            ParamGroup::Preset => write!(f, "preset"),
        }
    }
}

/// Check configured values against a plugin's declared settings
///
/// Every declared setting must be present and accepted by its validators.
/// Undeclared settings are reported but do not fail validation.
pub fn validate_plugin_config(
    plugin: &str,
    schema: &ParamSchema,
    global: &ConfigView,
    preset: &ConfigView,
) -> Result<(), HostError> {
    validate_group(plugin, ParamGroup::Global, schema.global, global)?;
    validate_group(plugin, ParamGroup::Preset, schema.preset, preset)
}

fn validate_group(
    plugin: &str,
    group: ParamGroup,
    specs: Option<&[ParamSpec]>,
    values: &ConfigView,
) -> Result<(), HostError> {
    let specs = specs.unwrap_or(&[]);

    for spec in specs {
        let Some(value) = values.get(spec.name) else {
            return Err(HostError::MissingSetting {
                plugin: plugin.to_string(),
                group,
                setting: spec.name.to_string(),
            });
        };

        if !spec.accepts(value) {
            return Err(HostError::InvalidSetting {
                plugin: plugin.to_string(),
                group,
                setting: spec.name.to_string(),
                value: value.to_string(),
                expected: spec
                    .validators
                    .iter()
                    .map(|tag| tag.name())
                    .collect::<Vec<_>>()
                    .join(" or "),
            });
        }
    }

    for (key, _) in values.iter() {
        if !specs.iter().any(|spec| spec.name == key) {
            warn!(target: "host", "Plugin {}: ignoring undeclared {} setting {}", plugin, group, key);
        }
    }

    Ok(())
}
