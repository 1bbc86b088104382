//! Triangle mesh geometry.
//!
//! Triangles are single-sided: the front face is the side the
//! counter-clockwise winding faces, i.e. `(p2 - p1) x (p3 - p1)` points
//! toward viewers that can see it. Builders below produce outward-facing
//! geometry; use [`Mesh::flipped`] for surfaces seen from the inside.

use std::path::{Path, PathBuf};

use lumen_math::{Vec2, Vec3};
use thiserror::Error;

/// Errors that can occur while loading meshes.
#[derive(Error, Debug)]
pub enum MeshError {
    #[error("Failed to load OBJ {path}: {source}")]
    Obj {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },

    #[error("OBJ file {0} contains no triangles")]
    Empty(PathBuf),
}

pub type MeshResult<T> = Result<T, MeshError>;

/// A mesh consisting of vertex positions, optional normals and UVs, and
/// triangle indices.
#[derive(Clone, Debug, Default)]
pub struct Mesh {
    /// Vertex positions (one Vec3 per vertex)
    pub positions: Vec<Vec3>,

    /// Vertex normals (optional, one per vertex)
    pub normals: Option<Vec<Vec3>>,

    /// UV coordinates (optional, one per vertex)
    pub uvs: Option<Vec<Vec2>>,

    /// Triangle indices (every 3 indices form a triangle)
    pub indices: Vec<u32>,
}

/// One triangle resolved out of a [`Mesh`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct MeshTriangle {
    pub positions: [Vec3; 3],
    pub normals: Option<[Vec3; 3]>,
    pub uvs: Option<[Vec2; 3]>,
}

impl MeshTriangle {
    /// Unit geometric normal of the front face.
    pub fn face_normal(&self) -> Vec3 {
        let [p1, p2, p3] = self.positions;
        (p2 - p1).cross(p3 - p1).normalize_or_zero()
    }

    /// Shading normal at barycentric `(u, v)`, weights `(1-u-v, u, v)`.
    pub fn normal_at(&self, u: f32, v: f32) -> Vec3 {
        match self.normals {
            Some([n1, n2, n3]) => {
                let n = n1 * (1.0 - u - v) + n2 * u + n3 * v;
                n.try_normalize().unwrap_or_else(|| self.face_normal())
            }
            None => self.face_normal(),
        }
    }

    /// Texture coordinate at barycentric `(u, v)`.
    pub fn uv_at(&self, u: f32, v: f32) -> Vec2 {
        match self.uvs {
            Some([t1, t2, t3]) => t1 * (1.0 - u - v) + t2 * u + t3 * v,
            None => Vec2::new(u, v),
        }
    }
}

/// One side of an axis-aligned box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CubeFace {
    PosX,
    NegX,
    PosY,
    NegY,
    PosZ,
    NegZ,
}

impl CubeFace {
    pub const ALL: [CubeFace; 6] = [
        CubeFace::PosX,
        CubeFace::NegX,
        CubeFace::PosY,
        CubeFace::NegY,
        CubeFace::PosZ,
        CubeFace::NegZ,
    ];
}

impl Mesh {
    /// Create a new mesh from positions and indices, optionally with normals.
    pub fn new(positions: Vec<Vec3>, indices: Vec<u32>, normals: Option<Vec<Vec3>>) -> Self {
        Self {
            positions,
            normals,
            uvs: None,
            indices,
        }
    }

    /// Create a new mesh with UV coordinates.
    pub fn new_with_uvs(
        positions: Vec<Vec3>,
        indices: Vec<u32>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
    ) -> Self {
        Self {
            positions,
            normals,
            uvs,
            indices,
        }
    }

    /// A planar quad `p0 p1 p2 p3` (counter-clockwise as seen from the front).
    pub fn quad(p0: Vec3, p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let normal = (p1 - p0).cross(p2 - p0).normalize_or_zero();
        Self::new_with_uvs(
            vec![p0, p1, p2, p3],
            vec![0, 1, 2, 0, 2, 3],
            Some(vec![normal; 4]),
            Some(vec![
                Vec2::new(0.0, 0.0),
                Vec2::new(1.0, 0.0),
                Vec2::new(1.0, 1.0),
                Vec2::new(0.0, 1.0),
            ]),
        )
    }

    /// One outward-facing side of the box spanned by `min` and `max`.
    pub fn cuboid_face(min: Vec3, max: Vec3, face: CubeFace) -> Self {
        let (x0, y0, z0) = (min.x, min.y, min.z);
        let (x1, y1, z1) = (max.x, max.y, max.z);
        let v = Vec3::new;

        match face {
            CubeFace::PosX => Self::quad(v(x1, y0, z1), v(x1, y0, z0), v(x1, y1, z0), v(x1, y1, z1)),
            CubeFace::NegX => Self::quad(v(x0, y0, z0), v(x0, y0, z1), v(x0, y1, z1), v(x0, y1, z0)),
            CubeFace::PosY => Self::quad(v(x0, y1, z1), v(x1, y1, z1), v(x1, y1, z0), v(x0, y1, z0)),
            CubeFace::NegY => Self::quad(v(x0, y0, z0), v(x1, y0, z0), v(x1, y0, z1), v(x0, y0, z1)),
            CubeFace::PosZ => Self::quad(v(x0, y0, z1), v(x1, y0, z1), v(x1, y1, z1), v(x0, y1, z1)),
            CubeFace::NegZ => Self::quad(v(x1, y0, z0), v(x0, y0, z0), v(x0, y1, z0), v(x1, y1, z0)),
        }
    }

    /// A closed, outward-facing axis-aligned box.
    pub fn cuboid(min: Vec3, max: Vec3) -> Self {
        let mut mesh = Mesh::default();
        for face in CubeFace::ALL {
            mesh.append(&Self::cuboid_face(min, max, face));
        }
        mesh
    }

    /// A latitude/longitude sphere with smooth normals.
    pub fn uv_sphere(center: Vec3, radius: f32, segments: u32) -> Self {
        let stacks = segments.max(2);
        let slices = (segments * 2).max(3);

        let mut positions = Vec::new();
        let mut normals = Vec::new();
        let mut uvs = Vec::new();

        for i in 0..=stacks {
            let theta = std::f32::consts::PI * i as f32 / stacks as f32;
            for j in 0..=slices {
                let phi = 2.0 * std::f32::consts::PI * j as f32 / slices as f32;
                let n = Vec3::new(theta.sin() * phi.cos(), theta.cos(), theta.sin() * phi.sin());
                positions.push(center + n * radius);
                normals.push(n);
                uvs.push(Vec2::new(j as f32 / slices as f32, 1.0 - i as f32 / stacks as f32));
            }
        }

        let row = slices + 1;
        let mut indices = Vec::with_capacity((stacks * slices * 6) as usize);
        for i in 0..stacks {
            for j in 0..slices {
                let a = i * row + j;
                let b = a + row;
                indices.extend_from_slice(&[a, a + 1, b, a + 1, b + 1, b]);
            }
        }

        Self::new_with_uvs(positions, indices, Some(normals), Some(uvs))
    }

    /// Load every model of an OBJ file into one mesh.
    pub fn load_obj(path: &Path) -> MeshResult<Self> {
        let (models, _materials) = tobj::load_obj(
            path,
            &tobj::LoadOptions {
                single_index: true,
                triangulate: true,
                ..Default::default()
            },
        )
        .map_err(|source| MeshError::Obj {
            path: path.to_path_buf(),
            source,
        })?;

        let mut mesh = Mesh::default();
        for model in &models {
            let obj = &model.mesh;
            let positions: Vec<Vec3> = obj.positions.chunks_exact(3).map(Vec3::from_slice).collect();
            let normals = (obj.normals.len() == obj.positions.len())
                .then(|| obj.normals.chunks_exact(3).map(Vec3::from_slice).collect());
            let uvs = (obj.texcoords.len() / 2 == positions.len())
                .then(|| obj.texcoords.chunks_exact(2).map(Vec2::from_slice).collect());

            mesh.append(&Mesh::new_with_uvs(positions, obj.indices.clone(), normals, uvs));
        }

        if mesh.triangle_count() == 0 {
            return Err(MeshError::Empty(path.to_path_buf()));
        }

        log::info!(
            "Loaded OBJ {}: {} models, {} triangles, {} vertices",
            path.display(),
            models.len(),
            mesh.triangle_count(),
            mesh.vertex_count()
        );

        Ok(mesh)
    }

    /// Append another mesh, re-basing its indices.
    ///
    /// Normals and UVs are kept only if both meshes carry them (or this
    /// mesh is still empty).
    pub fn append(&mut self, other: &Mesh) {
        let was_empty = self.positions.is_empty();
        let base = self.positions.len() as u32;

        self.normals = match (was_empty, self.normals.take(), &other.normals) {
            (true, _, normals) => normals.clone(),
            (false, Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            _ => None,
        };
        self.uvs = match (was_empty, self.uvs.take(), &other.uvs) {
            (true, _, uvs) => uvs.clone(),
            (false, Some(mut mine), Some(theirs)) => {
                mine.extend_from_slice(theirs);
                Some(mine)
            }
            _ => None,
        };

        self.positions.extend_from_slice(&other.positions);
        self.indices.extend(other.indices.iter().map(|i| i + base));
    }

    /// Reverse the winding and normals so the mesh faces the other way.
    pub fn flipped(mut self) -> Self {
        for tri in self.indices.chunks_exact_mut(3) {
            tri.swap(1, 2);
        }
        if let Some(normals) = &mut self.normals {
            for n in normals.iter_mut() {
                *n = -*n;
            }
        }
        self
    }

    /// Compute smooth vertex normals by averaging face normals.
    pub fn compute_normals(&mut self) {
        let vertex_count = self.positions.len();
        let mut normals = vec![Vec3::ZERO; vertex_count];

        for face in self.indices.chunks_exact(3) {
            let [i0, i1, i2] = [face[0] as usize, face[1] as usize, face[2] as usize];
            if i0 >= vertex_count || i1 >= vertex_count || i2 >= vertex_count {
                continue;
            }

            let p0 = self.positions[i0];
            let face_normal = (self.positions[i1] - p0).cross(self.positions[i2] - p0);

            normals[i0] += face_normal;
            normals[i1] += face_normal;
            normals[i2] += face_normal;
        }

        for normal in &mut normals {
            // Default up normal for degenerate cases
            *normal = normal.try_normalize().unwrap_or(Vec3::Y);
        }

        self.normals = Some(normals);
    }

    /// Check if the mesh has normals.
    pub fn has_normals(&self) -> bool {
        self.normals.is_some()
    }

    /// Get the number of triangles in the mesh.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Get the number of vertices in the mesh.
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Resolve triangle `i`, or `None` if its indices are out of range.
    pub fn triangle(&self, i: usize) -> Option<MeshTriangle> {
        let chunk = self.indices.get(i * 3..i * 3 + 3)?;
        let [i0, i1, i2] = [chunk[0] as usize, chunk[1] as usize, chunk[2] as usize];

        let positions = [
            *self.positions.get(i0)?,
            *self.positions.get(i1)?,
            *self.positions.get(i2)?,
        ];
        let normals = self
            .normals
            .as_ref()
            .and_then(|n| Some([*n.get(i0)?, *n.get(i1)?, *n.get(i2)?]));
        let uvs = self
            .uvs
            .as_ref()
            .and_then(|t| Some([*t.get(i0)?, *t.get(i1)?, *t.get(i2)?]));

        Some(MeshTriangle {
            positions,
            normals,
            uvs,
        })
    }

    /// Iterate over all valid triangles.
    ///
    /// Triangles with out-of-range indices are skipped with a warning.
    pub fn triangles(&self) -> impl Iterator<Item = MeshTriangle> + '_ {
        (0..self.triangle_count()).filter_map(move |i| {
            let tri = self.triangle(i);
            if tri.is_none() {
                log::warn!(
                    "Invalid triangle indices: {:?}, vertex count: {}",
                    &self.indices[i * 3..i * 3 + 3],
                    self.positions.len()
                );
            }
            tri
        })
    }
}
