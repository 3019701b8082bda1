//! Centralized rendering options with TOML preset support.
//!
//! Pipeline configuration (camera uniform layout, sky geometry strategy,
//! gradient colors, projection parameters) is consolidated here. Options
//! serialize to/from TOML so presets can be stored and reloaded.

mod camera;
mod sky;

use std::path::Path;

pub use camera::CameraOptions;
use serde::{Deserialize, Serialize};
pub use sky::SkyOptions;

use crate::error::HorizonError;

/// Top-level options container. All sub-structs use `#[serde(default)]`
/// so partial TOML files (e.g. only overriding `[sky]`) work correctly.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct Options {
    /// Background gradient and geometry options.
    pub sky: SkyOptions,
    /// Camera projection and uniform-layout options.
    pub camera: CameraOptions,
}

impl Options {
    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError`] on I/O or parse failure.
    pub fn load(path: &Path) -> Result<Self, HorizonError> {
        let content = std::fs::read_to_string(path).map_err(HorizonError::Io)?;
        toml::from_str(&content)
            .map_err(|e| HorizonError::OptionsParse(e.to_string()))
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// Returns [`HorizonError`] on I/O or serialization failure.
    pub fn save(&self, path: &Path) -> Result<(), HorizonError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| HorizonError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(HorizonError::Io)?;
        }
        std::fs::write(path, content).map_err(HorizonError::Io)
    }
}

#[cfg(test)]
mod tests {
    use super::Options;
    use crate::camera::TransformSource;
    use crate::render::VertexSource;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed: Options = toml::from_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r#"
[sky]
start_color = [0.1, 0.2, 0.3]
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.sky.start_color, [0.1, 0.2, 0.3]);
        // Everything else should be default
        assert_eq!(opts.sky.end_color, [0.0, 1.0, 0.0]);
        assert_eq!(opts.camera.fovy, 45.0);
    }

    #[test]
    fn variant_names_are_snake_case() {
        let toml_str = r#"
[sky]
geometry = "mesh"

[camera]
transform_source = "precombined"
"#;
        let opts: Options = toml::from_str(toml_str).unwrap();
        assert_eq!(opts.sky.geometry, VertexSource::Mesh);
        assert_eq!(opts.camera.transform_source, TransformSource::Precombined);
    }
}
