use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;

use naga_oil::compose::{
    ComposableModuleDescriptor, Composer, ComposerError, NagaModuleDescriptor,
    ShaderDefValue, ShaderLanguage, ShaderType,
};

/// Errors produced while registering or composing WGSL shaders.
#[derive(Debug)]
pub enum ShaderError {
    /// A shared composable module failed to register.
    ModuleRegistration {
        /// Module file path as registered with the composer.
        path: &'static str,
        /// Underlying composer error.
        source: Box<ComposerError>,
    },
    /// A pass shader failed to compose.
    Compose {
        /// Shader file path as passed to the composer.
        path: String,
        /// Underlying composer error.
        source: Box<ComposerError>,
    },
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ModuleRegistration { path, source } => {
                write!(f, "failed to register shader module '{path}': {source}")
            }
            Self::Compose { path, source } => {
                write!(f, "failed to compose shader '{path}': {source}")
            }
        }
    }
}

impl std::error::Error for ShaderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::ModuleRegistration { source, .. }
            | Self::Compose { source, .. } => Some(source),
        }
    }
}

/// Shared module definition: (source, registered file path).
struct ModuleDef {
    source: &'static str,
    file_path: &'static str,
}

/// Wraps `naga_oil::compose::Composer` to provide shader composition with
/// `#import` and shader-def support.
///
/// Pre-loads all shared WGSL modules at construction time. Pass shaders use
/// `#import horizon::module_name` to pull in shared code, and boolean
/// shader defs to select a pipeline variant from a single source file. The
/// composer produces `naga::Module` IR directly, skipping WGSL re-parse at
/// runtime.
pub struct ShaderComposer {
    composer: Composer,
}

impl ShaderComposer {
    /// Build a composer with all shared modules registered.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::ModuleRegistration`] if a shared module fails
    /// to parse.
    pub fn new() -> Result<Self, ShaderError> {
        let mut composer = Composer::default();

        // Register shared modules in dependency order.
        let modules: &[ModuleDef] = &[
            ModuleDef {
                source: include_str!(
                    "../../assets/shaders/modules/fullscreen.wgsl"
                ),
                file_path: "modules/fullscreen.wgsl",
            },
            ModuleDef {
                source: include_str!("../../assets/shaders/modules/camera.wgsl"),
                file_path: "modules/camera.wgsl",
            },
        ];

        for m in modules {
            let _ = composer
                .add_composable_module(ComposableModuleDescriptor {
                    source: m.source,
                    file_path: m.file_path,
                    language: ShaderLanguage::Wgsl,
                    ..Default::default()
                })
                .map_err(|e| ShaderError::ModuleRegistration {
                    path: m.file_path,
                    source: Box::new(e),
                })?;
        }

        Ok(Self { composer })
    }

    /// Compose a shader source string (which may contain `#import`
    /// directives and `#ifdef` blocks) into a `wgpu::ShaderModule` ready
    /// for pipeline creation. `defs` lists the boolean shader defs to
    /// enable for this variant.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Compose`] if composition fails.
    pub fn compose(
        &mut self,
        device: &wgpu::Device,
        label: &str,
        source: &str,
        file_path: &str,
        defs: &[&str],
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let naga_module = self.compose_naga(source, file_path, defs)?;

        Ok(device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Naga(Cow::Owned(naga_module)),
        }))
    }

    /// Compose a shader source into a `naga::Module` without creating a
    /// wgpu shader module. Useful for testing shader composition without a
    /// GPU device.
    ///
    /// # Errors
    ///
    /// Returns [`ShaderError::Compose`] if composition fails.
    pub fn compose_naga(
        &mut self,
        source: &str,
        file_path: &str,
        defs: &[&str],
    ) -> Result<naga::Module, ShaderError> {
        let shader_defs: HashMap<String, ShaderDefValue> = defs
            .iter()
            .map(|d| ((*d).to_owned(), ShaderDefValue::Bool(true)))
            .collect();

        self.composer
            .make_naga_module(NagaModuleDescriptor {
                source,
                file_path,
                shader_type: ShaderType::Wgsl,
                shader_defs,
                ..Default::default()
            })
            .map_err(|e| ShaderError::Compose {
                path: file_path.to_owned(),
                source: Box::new(e),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::ShaderComposer;

    const ENTITY: (&str, &str) = (
        include_str!("../../assets/shaders/raster/entity.wgsl"),
        "entity.wgsl",
    );
    const SKY: (&str, &str) = (
        include_str!("../../assets/shaders/raster/sky.wgsl"),
        "sky.wgsl",
    );

    /// Every pass shader under every def combination a pipeline can
    /// request.
    fn all_variants() -> Vec<(&'static str, &'static str, Vec<&'static str>)>
    {
        vec![
            (ENTITY.0, ENTITY.1, vec![]),
            (ENTITY.0, ENTITY.1, vec!["CAMERA_PRECOMBINED"]),
            (SKY.0, SKY.1, vec![]),
            (SKY.0, SKY.1, vec!["SKY_FULLSCREEN"]),
            (SKY.0, SKY.1, vec!["CAMERA_PRECOMBINED"]),
            (SKY.0, SKY.1, vec!["CAMERA_PRECOMBINED", "SKY_FULLSCREEN"]),
        ]
    }

    #[test]
    fn test_all_shader_variants_compose() {
        let mut composer = ShaderComposer::new().unwrap();
        for (source, file_path, defs) in all_variants() {
            let _ = composer
                .compose_naga(source, file_path, &defs)
                .unwrap_or_else(|e| {
                    panic!(
                        "Shader '{}' with defs {:?} failed to compose: {}",
                        file_path, defs, e
                    )
                });
        }
    }

    #[test]
    fn composed_entry_points_are_present() {
        let mut composer = ShaderComposer::new().unwrap();
        let module = composer
            .compose_naga(SKY.0, SKY.1, &["SKY_FULLSCREEN"])
            .unwrap();
        let names: Vec<_> = module
            .entry_points
            .iter()
            .map(|e| e.name.as_str())
            .collect();
        assert!(names.contains(&"vs_main"));
        assert!(names.contains(&"fs_main"));
    }
}
