use semver::Version;

use crate::error::HostError;

/// Parse a dotted host version, padding missing minor/patch components
pub fn parse_version(version: &str) -> Result<Version, HostError> {
    let trimmed = version.trim();
    let padded = match trimmed.matches('.').count() {
        0 => format!("{}.0.0", trimmed),
        1 => format!("{}.0", trimmed),
        _ => trimmed.to_string(),
    };

    Version::parse(&padded).map_err(|e| HostError::InvalidVersion {
        version: version.to_string(),
        reason: e.to_string(),
    })
}

/// Check that a plugin requiring `required` can run on `host`
pub fn check_compatibility(plugin: &str, host: &str, required: &str) -> Result<(), HostError> {
    let host_version = parse_version(host)?;
    let required_version = parse_version(required)?;

    if host_version < required_version {
        return Err(HostError::IncompatibleVersion {
            plugin: plugin.to_string(),
            required: required.to_string(),
            host: host.to_string(),
        });
    }
    Ok(())
}
