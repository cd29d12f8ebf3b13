//! Holds the sources for all shaders.
//!
//! Programs are built by concatenating WGSL files in order, so later files
//! can use the structs and bindings earlier ones declare.

use orrery::{ShaderError, ShaderProgram};
use rust_embed::RustEmbed;
use wgpu::Device;

#[derive(RustEmbed)]
#[folder = "$CARGO_MANIFEST_DIR/shaders"]
pub struct OrreryShaderSources;

pub const LIGHT_SOURCE: &[&str] = &["frame.wgsl", "object.wgsl", "light_source.wgsl"];
pub const LIT: &[&str] = &["frame.wgsl", "object.wgsl", "lighting.wgsl", "phong.wgsl", "lit.wgsl"];
pub const LIT_INSTANCED: &[&str] = &[
    "frame.wgsl",
    "object.wgsl",
    "lighting.wgsl",
    "phong.wgsl",
    "lit_instanced.wgsl",
];
pub const SKYBOX: &[&str] = &["frame.wgsl", "skybox.wgsl"];
pub const TEXTURED: &[&str] = &["frame.wgsl", "object.wgsl", "textured.wgsl"];

/// Every program with its label.
pub const PROGRAMS: &[(&str, &[&str])] = &[
    ("light source", LIGHT_SOURCE),
    ("lit", LIT),
    ("lit instanced", LIT_INSTANCED),
    ("skybox", SKYBOX),
    ("textured", TEXTURED),
];

/// Source of a single embedded file.
pub fn source(name: &str) -> Result<String, ShaderError> {
    let file = OrreryShaderSources::get(name).ok_or_else(|| ShaderError::Missing { name: name.to_owned() })?;
    Ok(String::from_utf8_lossy(&file.data).into_owned())
}

/// Concatenates the named files into one module source.
pub fn compose(names: &[&str]) -> Result<String, ShaderError> {
    let mut composed = String::new();
    for name in names {
        composed.push_str(&source(name)?);
        composed.push('\n');
    }
    Ok(composed)
}

/// Composes and compiles a program.
pub fn program(device: &Device, label: &str, names: &[&str]) -> Result<ShaderProgram, ShaderError> {
    Ok(ShaderProgram::new(device, label, &compose(names)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_listed_file_is_embedded() {
        for (label, files) in PROGRAMS {
            for file in *files {
                assert!(source(file).is_ok(), "{label} needs {file}");
            }
        }
    }

    #[test]
    fn missing_files_are_errors() {
        assert!(matches!(
            compose(&["frame.wgsl", "nope.wgsl"]),
            Err(ShaderError::Missing { name }) if name == "nope.wgsl"
        ));
    }

    #[test]
    fn composition_keeps_order() {
        let composed = compose(SKYBOX).unwrap();
        let camera = composed.find("struct CameraUniforms").unwrap();
        let skybox = composed.find("fn vs_main").unwrap();
        assert!(camera < skybox);
    }
}
