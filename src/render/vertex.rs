//! CPU-side vertex and instance data model, plus the pure math mirrored
//! by the entity vertex stage.

use glam::{Mat4, Vec3, Vec4};

/// A vertex in the shared per-vertex stream.
///
/// Field order matches the attribute offsets published in
/// [`schema`](crate::render::schema). Each pipeline consumes a subset:
/// entities read `position` and `color`, the mesh-driven sky reads only
/// `position`. `uv` and `tint` are carried for forward compatibility and
/// are not sampled or shaded by any current pipeline.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    /// Position in object space, homogeneous (w = 1 for points).
    pub position: [f32; 4],
    /// Per-vertex RGBA color. Alpha is accepted but the fragment stage
    /// always emits opaque output.
    pub color: [f32; 4],
    /// Texture coordinate, carried but unused.
    pub uv: [f32; 4],
    /// Flat RGB color, carried but unused.
    pub tint: [f32; 3],
}

impl Vertex {
    /// Vertex at `position` with the given color; uv and tint zeroed.
    #[must_use]
    pub fn new(position: Vec3, color: [f32; 4]) -> Self {
        Self {
            position: [position.x, position.y, position.z, 1.0],
            color,
            uv: [0.0; 4],
            tint: [0.0; 3],
        }
    }

    /// Same vertex with a texture coordinate attached.
    #[must_use]
    pub fn with_uv(mut self, uv: [f32; 2]) -> Self {
        self.uv = [uv[0], uv[1], 0.0, 0.0];
        self
    }
}

/// One entry of the per-instance transform stream: a 4×4 object-to-world
/// matrix packed as four row vectors.
///
/// A matrix cannot ride in a single vertex attribute, so the rows travel
/// in four consecutive Float32x4 slots and the vertex stage reassembles
/// them. The rows must be packed in order `rows[0]..rows[3]`; swapping
/// them transposes the matrix with no error signal.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct EntityInstance {
    /// Matrix rows, top to bottom.
    pub rows: [[f32; 4]; 4],
}

impl EntityInstance {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        rows: [
            [1.0, 0.0, 0.0, 0.0],
            [0.0, 1.0, 0.0, 0.0],
            [0.0, 0.0, 1.0, 0.0],
            [0.0, 0.0, 0.0, 1.0],
        ],
    };

    /// Pack a matrix into row order.
    #[must_use]
    pub fn from_matrix(matrix: Mat4) -> Self {
        Self {
            rows: [
                matrix.row(0).to_array(),
                matrix.row(1).to_array(),
                matrix.row(2).to_array(),
                matrix.row(3).to_array(),
            ],
        }
    }

    /// Reassemble the matrix whose rows are exactly the four packed
    /// vectors, in order. Mirrors the vertex-stage assembly.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_cols(
            Vec4::from_array(self.rows[0]),
            Vec4::from_array(self.rows[1]),
            Vec4::from_array(self.rows[2]),
            Vec4::from_array(self.rows[3]),
        )
        .transpose()
    }
}

impl Default for EntityInstance {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// CPU mirror of the entity vertex stage's position computation: instance
/// transform first (object to world), then view, then projection. No
/// validation happens here or on the GPU; degenerate inputs propagate
/// into degenerate clip positions.
#[must_use]
pub fn clip_position(
    projection: Mat4,
    view: Mat4,
    instance: &EntityInstance,
    position: Vec4,
) -> Vec4 {
    projection * (view * (instance.matrix() * position))
}

#[cfg(test)]
mod tests {
    use super::{clip_position, EntityInstance, Vertex};
    use glam::{Mat4, Quat, Vec3, Vec4};

    #[test]
    fn rows_reassemble_in_packed_order() {
        let rows = [
            [1.0, 2.0, 3.0, 4.0],
            [5.0, 6.0, 7.0, 8.0],
            [9.0, 10.0, 11.0, 12.0],
            [13.0, 14.0, 15.0, 16.0],
        ];
        let instance = EntityInstance { rows };
        let matrix = instance.matrix();

        for (i, row) in rows.iter().enumerate() {
            assert_eq!(matrix.row(i).to_array(), *row);
        }
    }

    #[test]
    fn matrix_round_trips_through_rows() {
        let matrix = Mat4::from_scale_rotation_translation(
            Vec3::new(2.0, 0.5, 1.25),
            Quat::from_rotation_z(0.7),
            Vec3::new(-3.0, 8.0, 0.5),
        );
        let packed = EntityInstance::from_matrix(matrix);
        let diff = (packed.matrix() - matrix).abs();
        assert!(diff.to_cols_array().iter().all(|&d| d < 1e-6));
    }

    #[test]
    fn clip_position_equals_direct_matrix_product() {
        let projection =
            Mat4::perspective_rh(0.8, 1.6, 0.1, 100.0);
        let view = Mat4::look_at_rh(
            Vec3::new(0.0, 2.0, 5.0),
            Vec3::ZERO,
            Vec3::Y,
        );
        let model = Mat4::from_rotation_translation(
            Quat::from_rotation_y(1.1),
            Vec3::new(1.0, -2.0, 3.0),
        );
        let instance = EntityInstance::from_matrix(model);
        let position = Vec4::new(0.3, -0.7, 1.4, 1.0);

        let direct = projection * view * model * position;
        let computed = clip_position(projection, view, &instance, position);
        assert!((direct - computed).abs().max_element() < 1e-4);
    }

    #[test]
    fn identity_pipeline_passes_position_through() {
        let instance = EntityInstance::IDENTITY;
        let position = Vec4::new(0.5, 0.5, 0.0, 1.0);
        let clip = clip_position(
            Mat4::IDENTITY,
            Mat4::IDENTITY,
            &instance,
            position,
        );
        assert_eq!(clip, position);
    }

    #[test]
    fn swapped_rows_transpose_the_matrix() {
        // The row order is the contract; packing columns instead yields
        // the transpose, silently.
        let matrix = Mat4::from_translation(Vec3::new(1.0, 2.0, 3.0));
        let mispacked = EntityInstance {
            rows: [
                matrix.col(0).to_array(),
                matrix.col(1).to_array(),
                matrix.col(2).to_array(),
                matrix.col(3).to_array(),
            ],
        };
        assert_eq!(mispacked.matrix(), matrix.transpose());
    }

    #[test]
    fn vertex_constructor_homogenizes_position() {
        let vertex = Vertex::new(Vec3::new(1.0, 2.0, 3.0), [0.1, 0.2, 0.3, 1.0])
            .with_uv([0.5, 0.25]);
        assert_eq!(vertex.position, [1.0, 2.0, 3.0, 1.0]);
        assert_eq!(vertex.uv, [0.5, 0.25, 0.0, 0.0]);
        assert_eq!(vertex.tint, [0.0; 3]);
    }
}
