//! Schema validation for build settings (no filesystem checks).

use crate::error::{ConfigError, Result};
use crate::settings::BuildSettings;

/// Validate settings before they are turned into build options.
///
/// # Example
///
/// ```
/// use fob_config::{BuildSettings, validate};
///
/// let mut settings = BuildSettings::default();
/// settings.entries = vec!["./in.js".into()];
/// validate(&settings).unwrap();
/// ```
pub fn validate(settings: &BuildSettings) -> Result<()> {
    if settings.entries.is_empty() {
        return Err(ConfigError::NoEntries);
    }

    if settings.entries.iter().any(|entry| entry.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            field: "entries".to_string(),
            hint: "entry specifiers cannot be empty".to_string(),
        });
    }

    if settings.outfile.is_some() && settings.outdir.is_some() {
        return Err(ConfigError::Conflict(
            "'outfile' and 'outdir' cannot both be set".to_string(),
        ));
    }

    if settings.outfile.is_some() && settings.entries.len() > 1 {
        return Err(ConfigError::Conflict(
            "'outfile' requires a single entry; use 'outdir' for multiple entries".to_string(),
        ));
    }

    if settings.external.iter().any(|ext| ext.trim().is_empty()) {
        return Err(ConfigError::InvalidValue {
            field: "external".to_string(),
            hint: "remove empty strings from the 'external' array".to_string(),
        });
    }

    if settings.loaders.keys().any(|ext| ext.trim_start_matches('.').is_empty()) {
        return Err(ConfigError::InvalidValue {
            field: "loaders".to_string(),
            hint: "loader extensions cannot be empty".to_string(),
        });
    }

    if settings.max_modules == 0 {
        return Err(ConfigError::InvalidValue {
            field: "max_modules".to_string(),
            hint: "must be greater than zero".to_string(),
        });
    }

    Ok(())
}
