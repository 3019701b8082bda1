//! Attribute and binding-slot contract shared by all pipeline
//! configurations.
//!
//! Location and group numbers are meaningful only because the CPU-side
//! buffer packing and the WGSL sources agree on them. This module is the
//! single place they are defined; [`validate`] re-checks the derived
//! vertex layouts against the `#[repr(C)]` structs once at pipeline
//! construction, so a contract break fails loudly instead of rendering
//! garbage.

use std::fmt;

use crate::render::vertex::{EntityInstance, Vertex};

/// Attribute location of the homogeneous vertex position.
pub const ATTR_POSITION: u32 = 0;
/// Attribute location of the per-vertex RGBA color.
pub const ATTR_VERTEX_COLOR: u32 = 1;
/// Attribute location of the texture coordinate (carried, not sampled).
pub const ATTR_UV: u32 = 2;
/// Attribute location of the flat RGB color (carried; reserved for
/// flat-shaded styles).
pub const ATTR_FLAT_COLOR: u32 = 3;
/// Attribute location of the first instance-transform row. Rows occupy
/// four consecutive locations starting here, in row order 0..4; the
/// instance buffer must pack rows in exactly that order or the transform
/// silently transposes.
pub const ATTR_TRANSFORM_ROW0: u32 = 4;
/// Number of row attributes forming one instance transform.
pub const TRANSFORM_ROWS: u32 = 4;

/// Bind group index of the camera uniform block.
pub const CAMERA_GROUP: u32 = 0;
/// Binding index of the camera uniform within its group.
pub const CAMERA_BINDING: u32 = 0;
/// Bind group index of the sky gradient uniform block. One slot for every
/// sky configuration, mesh-driven or buffer-less.
pub const SKY_GROUP: u32 = 1;
/// Binding index of the sky gradient uniform within its group.
pub const SKY_BINDING: u32 = 0;

const VERTEX_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 0,
        shader_location: ATTR_POSITION,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: ATTR_VERTEX_COLOR,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 32,
        shader_location: ATTR_UV,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x3,
        offset: 48,
        shader_location: ATTR_FLAT_COLOR,
    },
];

// A 4x4 matrix is not addressable as a single vertex attribute, so each
// row gets its own Float32x4 slot.
const INSTANCE_ATTRIBUTES: [wgpu::VertexAttribute; 4] = [
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 0,
        shader_location: ATTR_TRANSFORM_ROW0,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 16,
        shader_location: ATTR_TRANSFORM_ROW0 + 1,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 32,
        shader_location: ATTR_TRANSFORM_ROW0 + 2,
    },
    wgpu::VertexAttribute {
        format: wgpu::VertexFormat::Float32x4,
        offset: 48,
        shader_location: ATTR_TRANSFORM_ROW0 + 3,
    },
];

/// Layout of the per-vertex stream, stepped per vertex.
pub fn vertex_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<Vertex>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Vertex,
        attributes: &VERTEX_ATTRIBUTES,
    }
}

/// Layout of the per-instance transform stream, stepped per instance.
pub fn instance_layout() -> wgpu::VertexBufferLayout<'static> {
    wgpu::VertexBufferLayout {
        array_stride: size_of::<EntityInstance>() as wgpu::BufferAddress,
        step_mode: wgpu::VertexStepMode::Instance,
        attributes: &INSTANCE_ATTRIBUTES,
    }
}

/// Violations of the attribute/binding contract.
///
/// These indicate a build-time contract break between the layout tables
/// and the `#[repr(C)]` structs, not bad runtime input.
#[derive(Debug, PartialEq, Eq)]
pub enum SchemaError {
    /// Two attributes claim the same shader location.
    DuplicateLocation(u32),
    /// Instance transform rows are not packed in ascending row order.
    RowOrder {
        /// Row index within the instance transform.
        index: u32,
        /// Location the schema assigns to that row.
        expected: u32,
        /// Location found in the layout table.
        found: u32,
    },
    /// A stream's stride disagrees with its CPU-side struct size.
    StrideMismatch {
        /// Stream name ("vertex" or "instance").
        stream: &'static str,
        /// Stride declared by the layout.
        layout: u64,
        /// Size of the struct the stream is packed from.
        expected: u64,
    },
    /// An attribute extends past the end of its stream's stride.
    AttributeOverflow {
        /// Shader location of the offending attribute.
        location: u32,
        /// Byte offset one past the attribute's end.
        end: u64,
        /// Stride of the stream.
        stride: u64,
    },
}

impl fmt::Display for SchemaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::DuplicateLocation(loc) => {
                write!(f, "attribute location {loc} is assigned twice")
            }
            Self::RowOrder {
                index,
                expected,
                found,
            } => write!(
                f,
                "transform row {index} must sit at location {expected}, \
                 found {found}"
            ),
            Self::StrideMismatch {
                stream,
                layout,
                expected,
            } => write!(
                f,
                "{stream} stream stride {layout} does not match struct \
                 size {expected}"
            ),
            Self::AttributeOverflow {
                location,
                end,
                stride,
            } => write!(
                f,
                "attribute at location {location} ends at byte {end}, past \
                 stride {stride}"
            ),
        }
    }
}

impl std::error::Error for SchemaError {}

/// Check the whole contract once. Pipelines call this at construction so
/// that a mispacked layout fails before any draw is issued.
///
/// # Errors
///
/// Returns the first [`SchemaError`] found.
pub fn validate() -> Result<(), SchemaError> {
    let streams = [
        ("vertex", vertex_layout(), size_of::<Vertex>() as u64),
        (
            "instance",
            instance_layout(),
            size_of::<EntityInstance>() as u64,
        ),
    ];

    let mut seen = Vec::new();
    for (stream, layout, struct_size) in streams {
        if layout.array_stride != struct_size {
            return Err(SchemaError::StrideMismatch {
                stream,
                layout: layout.array_stride,
                expected: struct_size,
            });
        }
        for attr in layout.attributes {
            if seen.contains(&attr.shader_location) {
                return Err(SchemaError::DuplicateLocation(
                    attr.shader_location,
                ));
            }
            seen.push(attr.shader_location);

            let end = attr.offset + attr.format.size();
            if end > layout.array_stride {
                return Err(SchemaError::AttributeOverflow {
                    location: attr.shader_location,
                    end,
                    stride: layout.array_stride,
                });
            }
        }
    }

    for (index, attr) in INSTANCE_ATTRIBUTES.iter().enumerate() {
        let expected = ATTR_TRANSFORM_ROW0 + index as u32;
        if attr.shader_location != expected {
            return Err(SchemaError::RowOrder {
                index: index as u32,
                expected,
                found: attr.shader_location,
            });
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::{
        instance_layout, validate, vertex_layout, ATTR_FLAT_COLOR,
        ATTR_POSITION, ATTR_TRANSFORM_ROW0, ATTR_UV, ATTR_VERTEX_COLOR,
        TRANSFORM_ROWS,
    };

    #[test]
    fn schema_validates() {
        assert!(validate().is_ok());
    }

    #[test]
    fn vertex_stream_matches_published_locations() {
        let layout = vertex_layout();
        let locations: Vec<u32> = layout
            .attributes
            .iter()
            .map(|a| a.shader_location)
            .collect();
        assert_eq!(
            locations,
            vec![ATTR_POSITION, ATTR_VERTEX_COLOR, ATTR_UV, ATTR_FLAT_COLOR]
        );
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Vertex);
    }

    #[test]
    fn instance_stream_is_four_contiguous_rows() {
        let layout = instance_layout();
        assert_eq!(layout.attributes.len() as u32, TRANSFORM_ROWS);
        assert_eq!(layout.step_mode, wgpu::VertexStepMode::Instance);
        for (i, attr) in layout.attributes.iter().enumerate() {
            assert_eq!(attr.shader_location, ATTR_TRANSFORM_ROW0 + i as u32);
            assert_eq!(attr.offset, 16 * i as u64);
            assert_eq!(attr.format, wgpu::VertexFormat::Float32x4);
        }
    }

    #[test]
    fn strides_match_struct_sizes() {
        assert_eq!(vertex_layout().array_stride, 60);
        assert_eq!(instance_layout().array_stride, 64);
    }
}
