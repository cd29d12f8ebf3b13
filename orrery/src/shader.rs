use wgpu::{Device, RenderPipeline, RenderPipelineDescriptor, ShaderModule, ShaderModuleDescriptor, ShaderSource};

use crate::{
    error_chain,
    util::{error_scope::ErrorScope, typedefs::SsoString},
    ShaderError,
};

/// A compiled WGSL module holding both the vertex and fragment stage.
///
/// Compile errors are logged and the module is kept anyway; pipelines built
/// from it then fail validation visibly instead of silently disappearing.
pub struct ShaderProgram {
    label: SsoString,
    module: ShaderModule,
    valid: bool,
}

impl ShaderProgram {
    pub fn new(device: &Device, label: &str, source: &str) -> Self {
        profiling::scope!("ShaderProgram::new");
        let scope = ErrorScope::validation(device);
        let module = device.create_shader_module(ShaderModuleDescriptor {
            label: Some(label),
            source: ShaderSource::Wgsl(source.into()),
        });
        let valid = match scope.end() {
            Ok(()) => true,
            Err(error) => {
                let error = ShaderError::Compile {
                    label: label.to_owned(),
                    message: error.to_string(),
                };
                log::error!("{}", error_chain(&error));
                false
            }
        };

        Self {
            label: label.into(),
            module,
            valid,
        }
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn module(&self) -> &ShaderModule {
        &self.module
    }

    /// Whether the module compiled without errors.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Creates a pipeline, logging link failures. The returned pipeline is
    /// invalid in that case and draws nothing.
    pub fn create_pipeline(&self, device: &Device, desc: &RenderPipelineDescriptor<'_>) -> RenderPipeline {
        profiling::scope!("ShaderProgram::create_pipeline");
        let scope = ErrorScope::validation(device);
        let pipeline = device.create_render_pipeline(desc);
        if let Err(error) = scope.end() {
            let error = ShaderError::Link {
                label: desc.label.unwrap_or(self.label.as_str()).to_owned(),
                message: error.to_string(),
            };
            log::error!("{}", error_chain(&error));
        }
        pipeline
    }
}
