use glam::Vec2;

/// Axis-aligned bounds of a deformed mesh in layer-local pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MeshBounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Default for MeshBounds {
    fn default() -> Self {
        Self {
            min: Vec2::ZERO,
            max: Vec2::ZERO,
        }
    }
}

impl MeshBounds {
    /// Smallest box containing every point; a zero box for an empty set.
    #[must_use]
    pub fn from_points(points: &[Vec2]) -> Self {
        let Some(first) = points.first() else {
            return Self::default();
        };
        let (min, max) = points
            .iter()
            .fold((*first, *first), |(min, max), p| (min.min(*p), max.max(*p)));
        Self { min, max }
    }

    #[inline]
    #[must_use]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    #[inline]
    #[must_use]
    pub fn size(&self) -> Vec2 {
        self.max - self.min
    }
}

/// Placement of one grid row: every vertex in the row shares `y` and is
/// shifted sideways by `x_offset`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RowPlacement {
    pub x_offset: f32,
    pub y: f32,
}

/// A textured triangle grid centered on the origin of the layer.
///
/// Vertices are stored row-major, top row first. UVs map the undeformed grid
/// onto the full source image: `(column / columns, row / rows)`.
#[derive(Debug, Clone, PartialEq)]
pub struct DeformMesh {
    pub positions: Vec<Vec2>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u16>,
    pub bounds: MeshBounds,
    pub rows: u32,
    pub columns: u32,
}

impl DeformMesh {
    /// Builds a grid with `rows.len() - 1` vertical and `columns` horizontal
    /// divisions from per-row placements.
    #[must_use]
    pub fn from_rows(rows: &[RowPlacement], columns: u32, width: f32) -> Self {
        let row_count = rows.len().saturating_sub(1) as u32;
        let columns = columns.max(1);
        let columns1 = columns + 1;

        let mut positions = Vec::with_capacity(rows.len() * columns1 as usize);
        let mut uvs = Vec::with_capacity(positions.capacity());

        for (iy, row) in rows.iter().enumerate() {
            let v = if row_count == 0 {
                0.0
            } else {
                iy as f32 / row_count as f32
            };
            for ix in 0..columns1 {
                let u = ix as f32 / columns as f32;
                let rest_x = (u - 0.5) * width;
                let x = if row.x_offset == 0.0 {
                    rest_x
                } else {
                    row.x_offset + rest_x
                };
                positions.push(Vec2::new(x, row.y));
                uvs.push(Vec2::new(u, v));
            }
        }

        let mut indices = Vec::with_capacity((row_count * columns * 6) as usize);
        for iy in 0..row_count {
            for ix in 0..columns {
                let top_left = iy * columns1 + ix;
                let top_right = top_left + 1;
                let bottom_left = (iy + 1) * columns1 + ix;
                let bottom_right = bottom_left + 1;

                indices.extend_from_slice(&[
                    top_left as u16,
                    bottom_left as u16,
                    top_right as u16,
                    top_right as u16,
                    bottom_left as u16,
                    bottom_right as u16,
                ]);
            }
        }

        let bounds = MeshBounds::from_points(&positions);
        Self {
            positions,
            uvs,
            indices,
            bounds,
            rows: row_count,
            columns,
        }
    }

    #[inline]
    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    #[inline]
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Iterates triangles as `(position, uv)` corner triples.
    pub fn triangles(&self) -> impl Iterator<Item = [(Vec2, Vec2); 3]> + '_ {
        self.indices.chunks_exact(3).map(|tri| {
            let corner = |i: u16| (self.positions[i as usize], self.uvs[i as usize]);
            [corner(tri[0]), corner(tri[1]), corner(tri[2])]
        })
    }
}
