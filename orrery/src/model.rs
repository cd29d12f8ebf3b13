use std::{
    ops::Range,
    path::{Path, PathBuf},
};

use glam::{Vec2, Vec3};
use orrery_types::{MaterialTexture, MeshData, MeshValidationError, TextureKind, Vertex};
use wgpu::{RenderPass, TextureView};

use crate::{
    instances::InstanceBuffers,
    mesh::{Mesh, MeshTexture},
    util::typedefs::FastHashMap,
    error_chain, AssetError, Renderer, Texture2d, MATERIAL_SAMPLERS,
};

/// Picks the texture each material sampler reads, as an index into
/// `textures`.
///
/// Textures are numbered from 1 per kind in listed order and matched to a
/// sampler by [`TextureKind::sampler_name`]. Textures with no matching
/// sampler are left out.
pub fn assign_samplers(textures: &[MaterialTexture]) -> [Option<usize>; MATERIAL_SAMPLERS.len()] {
    let mut counts = FastHashMap::<TextureKind, usize>::default();
    let mut slots = [None; MATERIAL_SAMPLERS.len()];
    for (idx, texture) in textures.iter().enumerate() {
        let count = counts.entry(texture.kind).or_insert(0);
        *count += 1;
        let name = texture.kind.sampler_name(*count);
        match MATERIAL_SAMPLERS.iter().position(|&sampler| sampler == name) {
            Some(slot) => slots[slot] = Some(idx),
            None => log::debug!("no sampler {} for {:?}, skipping", name, texture.path),
        }
    }
    slots
}

/// Owns values keyed by source path, materialising each path at most once.
#[derive(Debug)]
pub struct TextureRegistry<T> {
    entries: Vec<T>,
    by_path: FastHashMap<PathBuf, usize>,
}

impl<T> TextureRegistry<T> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            by_path: FastHashMap::default(),
        }
    }

    /// Returns the handle already registered for `path`, or calls `create`
    /// and registers its result.
    pub fn get_or_insert_with(&mut self, path: &Path, create: impl FnOnce(&Path) -> T) -> usize {
        if let Some(&handle) = self.by_path.get(path) {
            return handle;
        }
        let handle = self.entries.len();
        self.entries.push(create(path));
        self.by_path.insert(path.to_owned(), handle);
        handle
    }

    pub fn get(&self, handle: usize) -> Option<&T> {
        self.entries.get(handle)
    }

    pub fn handle(&self, path: &Path) -> Option<usize> {
        self.by_path.get(path).copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<T> Default for TextureRegistry<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// An ordered set of meshes sharing one texture registry.
///
/// Textures that failed to load stay registered as `None` so they are not
/// retried, and draw with the null texture.
pub struct Model {
    pub meshes: Vec<Mesh>,
    pub textures: TextureRegistry<Option<Texture2d>>,
}

impl Model {
    pub fn empty() -> Self {
        Self {
            meshes: Vec::new(),
            textures: TextureRegistry::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.meshes.is_empty()
    }

    /// Builds a model from CPU meshes. Texture paths are resolved against
    /// `base_dir`. Meshes that fail validation are logged and skipped.
    pub fn from_mesh_data(renderer: &Renderer, meshes: Vec<MeshData>, base_dir: &Path, label: &str) -> Self {
        let mut model = Self::empty();

        for (idx, data) in meshes.into_iter().enumerate() {
            let mesh_label = format!("{label} mesh {idx}");
            let mut mesh = match Mesh::new(&renderer.device, &data, &mesh_label) {
                Ok(mesh) => mesh,
                Err(e) => {
                    log::error!("skipping {}: {}", mesh_label, e);
                    continue;
                }
            };

            let handles = assign_samplers(&data.textures).map(|slot| {
                let texture = &data.textures[slot?];
                let path = base_dir.join(&texture.path);
                let handle = model.textures.get_or_insert_with(&path, |path| {
                    Texture2d::load(renderer, path, true)
                        .map_err(|e| log::error!("{}", error_chain(&e)))
                        .ok()
                });
                mesh.textures.push(MeshTexture {
                    kind: texture.kind,
                    path,
                    handle,
                });
                Some(handle)
            });

            let [diffuse, specular] = handles.map(|handle| model.texture_view(handle?));
            mesh.material = Some(renderer.material.bind_group(
                &renderer.device,
                diffuse,
                specular,
                Some(&format!("{mesh_label} material")),
            ));

            model.meshes.push(mesh);
        }

        model
    }

    fn texture_view(&self, handle: usize) -> Option<&TextureView> {
        self.textures.get(handle)?.as_ref().map(|texture| &texture.view)
    }

    /// Loads an OBJ file and the textures its materials reference.
    pub fn load(renderer: &Renderer, path: &Path) -> Result<Self, AssetError> {
        profiling::scope!("Model::load");
        let meshes = load_obj(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new(""));
        let label = path.file_stem().and_then(|s| s.to_str()).unwrap_or("model");

        let model = Self::from_mesh_data(renderer, meshes, base_dir, label);
        log::info!(
            "loaded model {:?}: {} meshes, {} textures",
            path,
            model.meshes.len(),
            model.textures.len()
        );
        Ok(model)
    }

    /// Like [`Model::load`], but logs the failure and returns an empty model.
    pub fn load_or_empty(renderer: &Renderer, path: &Path) -> Self {
        Self::load(renderer, path).unwrap_or_else(|e| {
            log::error!("{}", error_chain(&e));
            Self::empty()
        })
    }

    /// Draws every mesh, binding its material at `material_group` first.
    pub fn draw<'a>(&'a self, rpass: &mut RenderPass<'a>, material_group: u32, instances: Range<u32>) {
        for mesh in &self.meshes {
            if let Some(material) = &mesh.material {
                rpass.set_bind_group(material_group, material, &[]);
            }
            mesh.draw(rpass, instances.clone());
        }
    }

    /// Draws every mesh once per live instance in `instances`.
    pub fn draw_instanced<'a>(&'a self, rpass: &mut RenderPass<'a>, material_group: u32, instances: &'a InstanceBuffers) {
        let count = instances.live() as u32;
        if count == 0 {
            return;
        }
        for mesh in &self.meshes {
            if let Some(material) = &mesh.material {
                rpass.set_bind_group(material_group, material, &[]);
            }
            instances.bind(rpass);
            mesh.draw(rpass, 0..count);
        }
    }
}

fn material_textures(material: &tobj::Material) -> Vec<(TextureKind, &str)> {
    let height = ["map_disp", "disp"]
        .iter()
        .find_map(|key| material.unknown_param.get(*key))
        .map(String::as_str);

    [
        (TextureKind::Diffuse, material.diffuse_texture.as_deref()),
        (TextureKind::Specular, material.specular_texture.as_deref()),
        (TextureKind::Normal, material.normal_texture.as_deref()),
        (TextureKind::Height, height),
    ]
    .into_iter()
    .filter_map(|(kind, path)| path.filter(|p| !p.is_empty()).map(|p| (kind, p)))
    .collect()
}

/// Parses an OBJ file and its materials into CPU meshes.
///
/// Faces are triangulated, missing normals are computed from the geometry and
/// tangents are derived whenever texture coordinates exist.
pub fn load_obj(path: &Path) -> Result<Vec<MeshData>, AssetError> {
    profiling::scope!("load_obj");

    let options = tobj::LoadOptions {
        single_index: true,
        triangulate: true,
        ignore_points: true,
        ignore_lines: true,
        ..Default::default()
    };
    let (models, materials) = tobj::load_obj(path, &options).map_err(|source| match source {
        tobj::LoadError::OpenFileFailed => AssetError::NotFound {
            path: path.to_owned(),
            source: std::io::ErrorKind::NotFound.into(),
        },
        source => AssetError::Model {
            path: path.to_owned(),
            source,
        },
    })?;

    let materials = materials.unwrap_or_else(|e| {
        log::warn!("materials of {:?} could not be loaded: {}", path, e);
        Vec::new()
    });

    Ok(models
        .into_iter()
        .filter_map(|model| {
            convert_mesh(model.mesh, &materials)
                .map_err(|e| log::error!("skipping mesh {:?} of {:?}: {}", model.name, path, e))
                .ok()
        })
        .collect())
}

/// Turns one triangulated OBJ mesh into vertex data, filling in normals and
/// tangents. Indices are checked before anything reads through them.
fn convert_mesh(mesh: tobj::Mesh, materials: &[tobj::Material]) -> Result<MeshData, MeshValidationError> {
    let vertex_count = mesh.positions.len() / 3;
    let has_normals = mesh.normals.len() == mesh.positions.len();
    let has_uvs = mesh.texcoords.len() / 2 == vertex_count;

    let vertices = (0..vertex_count)
        .map(|i| {
            let position = Vec3::from_slice(&mesh.positions[i * 3..i * 3 + 3]);
            let normal = match has_normals {
                true => Vec3::from_slice(&mesh.normals[i * 3..i * 3 + 3]),
                false => Vec3::ZERO,
            };
            let uv = match has_uvs {
                true => Vec2::from_slice(&mesh.texcoords[i * 2..i * 2 + 2]),
                false => Vec2::ZERO,
            };
            Vertex::new(position, normal, uv)
        })
        .collect();

    let mut data = MeshData::new(vertices, mesh.indices);
    data.validate()?;
    if !has_normals {
        data.calculate_normals();
    }
    if has_uvs {
        data.calculate_tangents();
    }

    if let Some(material) = mesh.material_id.and_then(|id| materials.get(id)) {
        for (kind, texture) in material_textures(material) {
            data = data.with_texture(kind, texture);
        }
    }

    Ok(data)
}

#[cfg(test)]
mod tests {
    use std::{cell::Cell, path::Path};

    use super::{assign_samplers, convert_mesh, material_textures, TextureRegistry};
    use orrery_types::{MeshData, MeshValidationError, TextureKind};

    #[test]
    fn registry_materialises_each_path_once() {
        let calls = Cell::new(0);
        let mut registry = TextureRegistry::new();
        let mut create = |path: &Path| {
            calls.set(calls.get() + 1);
            path.to_string_lossy().into_owned()
        };

        let rock = registry.get_or_insert_with(Path::new("rock/diffuse.png"), &mut create);
        let other = registry.get_or_insert_with(Path::new("rock/specular.png"), &mut create);
        let again = registry.get_or_insert_with(Path::new("rock/diffuse.png"), &mut create);

        assert_eq!(rock, again);
        assert_ne!(rock, other);
        assert_eq!(calls.get(), 2);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get(rock).map(String::as_str), Some("rock/diffuse.png"));
        assert_eq!(registry.handle(Path::new("rock/specular.png")), Some(other));
    }

    #[test]
    fn first_diffuse_and_specular_fill_the_material() {
        let data = MeshData::default()
            .with_texture(TextureKind::Normal, "rock_normal.png")
            .with_texture(TextureKind::Diffuse, "rock.png")
            .with_texture(TextureKind::Diffuse, "rock_detail.png")
            .with_texture(TextureKind::Height, "rock_height.png")
            .with_texture(TextureKind::Specular, "rock_specular.png");

        assert_eq!(assign_samplers(&data.textures), [Some(1), Some(4)]);
    }

    #[test]
    fn missing_kinds_leave_their_sampler_empty() {
        let data = MeshData::default()
            .with_texture(TextureKind::Specular, "shine.png")
            .with_texture(TextureKind::Normal, "bumps.png");
        assert_eq!(assign_samplers(&data.textures), [None, Some(0)]);
        assert_eq!(assign_samplers(&[]), [None, None]);
    }

    fn triangle(indices: Vec<u32>) -> tobj::Mesh {
        tobj::Mesh {
            positions: vec![0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0, 0.0],
            texcoords: vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0],
            indices,
            ..Default::default()
        }
    }

    #[test]
    fn out_of_range_indices_are_rejected_before_normals() {
        let result = convert_mesh(triangle(vec![0, 1, 7]), &[]);
        assert!(matches!(result, Err(MeshValidationError::IndexOutOfBounds { .. })));

        let result = convert_mesh(triangle(vec![0, 1]), &[]);
        assert!(matches!(result, Err(MeshValidationError::IndexCountNotMultipleOfThree { .. })));
    }

    #[test]
    fn valid_mesh_gets_normals_and_tangents() {
        let data = convert_mesh(triangle(vec![0, 1, 2]), &[]).unwrap();
        for vertex in &data.vertices {
            assert!(vertex.normal.abs_diff_eq(glam::Vec3::Z, 1e-6));
            assert!(vertex.tangent.abs_diff_eq(glam::Vec3::X, 1e-6));
        }
    }

    #[test]
    fn material_maps_by_kind() {
        let mut material = tobj::Material {
            diffuse_texture: Some("rock.png".into()),
            specular_texture: Some(String::new()),
            normal_texture: Some("rock_normal.png".into()),
            ..Default::default()
        };
        material.unknown_param.insert("map_disp".into(), "rock_height.png".into());

        let textures = material_textures(&material);
        assert_eq!(
            textures,
            vec![
                (TextureKind::Diffuse, "rock.png"),
                (TextureKind::Normal, "rock_normal.png"),
                (TextureKind::Height, "rock_height.png"),
            ]
        );
    }
}
