use std::path::{Path, PathBuf};

use image::ColorType;
use wgpu::{
    CommandEncoderDescriptor, Device, Extent3d, ImageCopyTexture, ImageDataLayout, Origin3d, Queue, Texture,
    TextureAspect, TextureDescriptor, TextureDimension, TextureFormat, TextureUsages, TextureView,
    TextureViewDescriptor, TextureViewDimension,
};

use crate::{util::mipmap::full_mip_count, AssetError, Renderer};

/// A decoded image, always expanded to four 8-bit channels.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    /// Channel count of the file on disk: 1, 3 or 4.
    pub channels: u8,
    /// `width * height * 4` bytes of RGBA.
    pub pixels: Vec<u8>,
}

impl ImageData {
    /// Decodes an encoded image held in memory. `path` is only used for
    /// error reporting.
    pub fn decode(bytes: &[u8], path: &Path, flip_vertically: bool) -> Result<Self, AssetError> {
        let image = image::load_from_memory(bytes).map_err(|source| AssetError::Decode {
            path: path.to_owned(),
            source,
        })?;

        let channels = match image.color() {
            ColorType::L8 | ColorType::L16 => 1,
            ColorType::Rgb8 | ColorType::Rgb16 | ColorType::Rgb32F => 3,
            ColorType::Rgba8 | ColorType::Rgba16 | ColorType::Rgba32F => 4,
            other => {
                return Err(AssetError::UnsupportedChannels {
                    path: path.to_owned(),
                    channels: other.channel_count(),
                })
            }
        };

        let image = if flip_vertically { image.flipv() } else { image };
        let rgba = image.to_rgba8();

        Ok(Self {
            width: rgba.width(),
            height: rgba.height(),
            channels,
            pixels: rgba.into_raw(),
        })
    }

    /// 4 bytes per pixel.
    pub fn bytes_per_row(&self) -> u32 {
        self.width * 4
    }
}

/// Reads and decodes the image at `path`.
///
/// Model textures are flipped vertically so their first row lines up with a
/// v coordinate of zero; cubemap faces are not.
pub fn load_image(path: &Path, flip_vertically: bool) -> Result<ImageData, AssetError> {
    profiling::scope!("load_image");
    let bytes = std::fs::read(path).map_err(|source| AssetError::NotFound {
        path: path.to_owned(),
        source,
    })?;
    ImageData::decode(&bytes, path, flip_vertically)
}

fn write_layer(queue: &Queue, texture: &Texture, layer: u32, image: &ImageData) {
    queue.write_texture(
        ImageCopyTexture {
            texture,
            mip_level: 0,
            origin: Origin3d { x: 0, y: 0, z: layer },
            aspect: TextureAspect::All,
        },
        &image.pixels,
        ImageDataLayout {
            offset: 0,
            bytes_per_row: Some(image.bytes_per_row()),
            rows_per_image: None,
        },
        Extent3d {
            width: image.width,
            height: image.height,
            depth_or_array_layers: 1,
        },
    );
}

/// Immutable 2D texture with a full mip chain.
#[derive(Debug)]
pub struct Texture2d {
    pub texture: Texture,
    pub view: TextureView,
}

impl Texture2d {
    /// Uploads `image` and generates its mip chain.
    pub fn from_image(renderer: &Renderer, image: &ImageData, srgb: bool, label: Option<&str>) -> Self {
        profiling::scope!("Texture2d::from_image");
        let format = match srgb {
            true => TextureFormat::Rgba8UnormSrgb,
            false => TextureFormat::Rgba8Unorm,
        };

        let texture = renderer.device.create_texture(&TextureDescriptor {
            label,
            size: Extent3d {
                width: image.width,
                height: image.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: full_mip_count(image.width, image.height),
            sample_count: 1,
            dimension: TextureDimension::D2,
            format,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST | TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });

        write_layer(&renderer.queue, &texture, 0, image);

        let mut encoder = renderer
            .device
            .create_command_encoder(&CommandEncoderDescriptor { label: label.or(Some("mipmap encoder")) });
        renderer.mipmaps.generate_mipmaps(&renderer.device, &mut encoder, &texture);
        renderer.queue.submit(Some(encoder.finish()));

        let view = texture.create_view(&TextureViewDescriptor::default());
        Self { texture, view }
    }

    /// Reads `path` and uploads it as an sRGB texture.
    pub fn load(renderer: &Renderer, path: &Path, flip_vertically: bool) -> Result<Self, AssetError> {
        let image = load_image(path, flip_vertically)?;
        log::debug!("loaded texture {:?} ({}x{})", path, image.width, image.height);
        Ok(Self::from_image(renderer, &image, true, path.to_str()))
    }

    /// A single texel of `color`. Used for flat material colors and as the
    /// stand-in for textures that failed to load.
    pub fn solid(device: &Device, queue: &Queue, color: [u8; 4], label: Option<&str>) -> Self {
        let texture = device.create_texture(&TextureDescriptor {
            label,
            size: Extent3d {
                width: 1,
                height: 1,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });
        let image = ImageData {
            width: 1,
            height: 1,
            channels: 4,
            pixels: color.to_vec(),
        };
        write_layer(queue, &texture, 0, &image);

        let view = texture.create_view(&TextureViewDescriptor::default());
        Self { texture, view }
    }
}

/// Order in which cubemap faces are stored.
pub const CUBE_FACES: [&str; 6] = [
    "PositiveX",
    "NegativeX",
    "PositiveY",
    "NegativeY",
    "PositiveZ",
    "NegativeZ",
];

/// Six-face cubemap with a single mip, sampled clamped to edge.
#[derive(Debug)]
pub struct TextureCube {
    pub texture: Texture,
    pub view: TextureView,
}

impl TextureCube {
    /// Loads the faces in +X, -X, +Y, -Y, +Z, -Z order. Every face must have
    /// the size of the first.
    pub fn load(renderer: &Renderer, faces: &[PathBuf; 6]) -> Result<Self, AssetError> {
        profiling::scope!("TextureCube::load");

        let mut images = Vec::with_capacity(6);
        for path in faces {
            let image = load_image(path, false)?;
            if let Some(first) = images.first().map(|first: &ImageData| (first.width, first.height)) {
                if first != (image.width, image.height) {
                    return Err(AssetError::CubeFaceMismatch {
                        path: path.clone(),
                        expected: first,
                        actual: (image.width, image.height),
                    });
                }
            }
            images.push(image);
        }

        Ok(Self::from_images(&renderer.device, &renderer.queue, &images, Some("skybox cubemap")))
    }

    pub fn from_images(device: &Device, queue: &Queue, faces: &[ImageData], label: Option<&str>) -> Self {
        debug_assert_eq!(faces.len(), 6);
        let (width, height) = faces.first().map_or((1, 1), |face| (face.width, face.height));

        let texture = device.create_texture(&TextureDescriptor {
            label,
            size: Extent3d {
                width,
                height,
                depth_or_array_layers: 6,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: TextureDimension::D2,
            format: TextureFormat::Rgba8UnormSrgb,
            usage: TextureUsages::TEXTURE_BINDING | TextureUsages::COPY_DST,
            view_formats: &[],
        });

        for (layer, face) in faces.iter().enumerate() {
            write_layer(queue, &texture, layer as u32, face);
        }

        let view = texture.create_view(&TextureViewDescriptor {
            label,
            dimension: Some(TextureViewDimension::Cube),
            ..Default::default()
        });
        Self { texture, view }
    }
}

/// Paths of the six faces named `<prefix><Face>.<extension>` inside `dir`.
pub fn cube_face_paths(dir: &Path, prefix: &str, extension: &str) -> [PathBuf; 6] {
    CUBE_FACES.map(|face| dir.join(format!("{prefix}{face}.{extension}")))
}

#[cfg(test)]
mod tests {
    use std::{io::Cursor, path::Path};

    use image::{DynamicImage, GrayImage, ImageFormat, Luma, Rgb, RgbImage};

    use super::{cube_face_paths, load_image, ImageData};
    use crate::AssetError;

    fn encode(image: DynamicImage) -> Vec<u8> {
        let mut bytes = Cursor::new(Vec::new());
        image.write_to(&mut bytes, ImageFormat::Png).unwrap();
        bytes.into_inner()
    }

    #[test]
    fn grey_images_expand_to_rgba() {
        let grey = GrayImage::from_fn(2, 2, |x, y| Luma([(x * 100 + y * 10) as u8]));
        let decoded = ImageData::decode(&encode(DynamicImage::ImageLuma8(grey)), Path::new("grey.png"), false).unwrap();
        assert_eq!(decoded.channels, 1);
        assert_eq!(decoded.pixels.len(), 16);
        assert_eq!(&decoded.pixels[4..8], &[100, 100, 100, 255]);
    }

    #[test]
    fn flipping_reverses_rows() {
        let rgb = RgbImage::from_fn(1, 2, |_, y| Rgb([y as u8 * 200, 0, 0]));
        let bytes = encode(DynamicImage::ImageRgb8(rgb));

        let upright = ImageData::decode(&bytes, Path::new("a.png"), false).unwrap();
        let flipped = ImageData::decode(&bytes, Path::new("a.png"), true).unwrap();
        assert_eq!(upright.channels, 3);
        assert_eq!(upright.pixels[0], 0);
        assert_eq!(flipped.pixels[0], 200);
    }

    #[test]
    fn missing_files_and_garbage_are_reported() {
        let missing = load_image(Path::new("definitely/not/here.png"), true);
        assert!(matches!(missing, Err(AssetError::NotFound { .. })));

        let garbage = ImageData::decode(b"not an image", Path::new("bad.png"), false);
        assert!(matches!(garbage, Err(AssetError::Decode { .. })));
    }

    #[test]
    fn cube_faces_are_in_axis_order() {
        let paths = cube_face_paths(Path::new("sky"), "GalaxyTex_", "png");
        assert_eq!(paths[0], Path::new("sky/GalaxyTex_PositiveX.png"));
        assert_eq!(paths[5], Path::new("sky/GalaxyTex_NegativeZ.png"));
    }
}
