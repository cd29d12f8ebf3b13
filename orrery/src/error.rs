use std::path::PathBuf;

use thiserror::Error;

/// Enum mapping to each of a device's limits.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum LimitType {
    BindGroups,
    SampledTexturesPerShaderStages,
    SamplersPerShaderStages,
    UniformBuffersPerShaderStages,
    UniformBufferBindingSize,
    MaxTextureDimension2d,
    MaxTextureArrayLayers,
    MaxVertexBuffers,
    MaxVertexAttributes,
    MaxVertexBufferArrayStride,
}

/// Reason why the renderer failed to initialize.
#[derive(Error, Debug)]
pub enum RendererInitializationError {
    #[error("No supported adapter found")]
    MissingAdapter,
    #[error("The device limit of {:?} is {} but renderer requires at least {}", ty, device_limit, required_limit)]
    LowDeviceLimit {
        ty: LimitType,
        device_limit: u32,
        required_limit: u32,
    },
    #[error("Requesting a device failed")]
    RequestDeviceFailed(#[source] wgpu::RequestDeviceError),
    #[error("Creating the window surface failed")]
    CreateSurface(#[source] wgpu::CreateSurfaceError),
}

/// Failure to turn a file on disk into a GPU resource.
#[derive(Error, Debug)]
pub enum AssetError {
    #[error("Could not read asset {path:?}")]
    NotFound {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Could not decode image {path:?}")]
    Decode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("Could not load model {path:?}")]
    Model {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("Image {path:?} has {channels} channels, expected 1, 3 or 4")]
    UnsupportedChannels { path: PathBuf, channels: u8 },
    #[error("Cubemap face {path:?} is {actual:?}, other faces are {expected:?}")]
    CubeFaceMismatch {
        path: PathBuf,
        expected: (u32, u32),
        actual: (u32, u32),
    },
}

/// Failure to build a shader module or a pipeline from it.
#[derive(Error, Debug)]
pub enum ShaderError {
    #[error("Shader source {name} is missing")]
    Missing { name: String },
    #[error("Shader {label} failed to compile: {message}")]
    Compile { label: String, message: String },
    #[error("Pipeline {label} failed to link: {message}")]
    Link { label: String, message: String },
}

/// An error the device reported outside of any error scope.
#[derive(Error, Debug)]
#[error("GPU state error: {0}")]
pub struct GpuStateError(pub String);

/// Formats an error with its sources, outermost first.
pub fn error_chain(error: &dyn std::error::Error) -> String {
    let mut message = error.to_string();
    let mut source = error.source();
    while let Some(inner) = source {
        message.push_str(": ");
        message.push_str(&inner.to_string());
        source = inner.source();
    }
    message
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::{error_chain, AssetError};

    #[test]
    fn chain_includes_sources() {
        let error = AssetError::NotFound {
            path: PathBuf::from("rock.obj"),
            source: std::io::ErrorKind::NotFound.into(),
        };
        let message = error_chain(&error);
        assert!(message.starts_with("Could not read asset \"rock.obj\": "));
        assert!(message.len() > "Could not read asset \"rock.obj\": ".len());
    }
}
