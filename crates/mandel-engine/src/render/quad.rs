use std::borrow::Cow;

use bytemuck::{Pod, Zeroable};
use naga::{Scalar, TypeInner, VectorSize};
use wgpu::util::DeviceExt;

use super::program::{ENTRY_POINT, LinkedProgram, ShaderError};
use super::{RenderCtx, RenderTarget};

#[repr(C)]
#[derive(Debug, Copy, Clone, Pod, Zeroable)]
struct QuadVertex {
    pos: [f32; 2], // clip space
}

impl QuadVertex {
    const ATTRS: [wgpu::VertexAttribute; 1] = wgpu::vertex_attr_array![0 => Float32x2];

    fn layout() -> wgpu::VertexBufferLayout<'static> {
        wgpu::VertexBufferLayout {
            array_stride: std::mem::size_of::<QuadVertex>() as u64,
            step_mode: wgpu::VertexStepMode::Vertex,
            attributes: &Self::ATTRS,
        }
    }
}

/// Triangle strip covering the whole of clip space.
const QUAD_VERTICES: [QuadVertex; 4] = [
    QuadVertex { pos: [-1.0, 1.0] },
    QuadVertex { pos: [-1.0, -1.0] },
    QuadVertex { pos: [1.0, 1.0] },
    QuadVertex { pos: [1.0, -1.0] },
];

/// Static geometry for a full-screen quad, fed to the vertex stage at
/// attribute location 0 as a `vec2`.
pub struct FullscreenQuad {
    vbo: wgpu::Buffer,
}

impl FullscreenQuad {
    pub fn new(device: &wgpu::Device) -> Self {
        let vbo = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("mandel quad vbo"),
            contents: bytemuck::cast_slice(&QUAD_VERTICES),
            usage: wgpu::BufferUsages::VERTEX,
        });
        Self { vbo }
    }

    pub const VERTEX_COUNT: u32 = QUAD_VERTICES.len() as u32;

    /// Checks that `program` reads nothing but the quad's position attribute.
    pub fn accepts(program: &LinkedProgram) -> Result<(), ShaderError> {
        let position = TypeInner::Vector { size: VectorSize::Bi, scalar: Scalar::F32 };
        for input in program.vertex_inputs() {
            if input.location != 0 {
                return Err(ShaderError::link(format!(
                    "vertex input at location {} has no quad attribute",
                    input.location
                )));
            }
            if input.ty != position {
                return Err(ShaderError::link(format!(
                    "vertex input at location 0 must be a vec2, found {:?}",
                    input.ty
                )));
            }
        }
        Ok(())
    }

    /// Draws the quad with `pipeline` and `bind_group` on top of whatever the
    /// target already holds.
    pub fn draw(
        &self,
        target: &mut RenderTarget<'_>,
        pipeline: &QuadPipeline,
        bind_group: &wgpu::BindGroup,
    ) {
        let mut rpass = target.load_pass("mandel quad pass");
        rpass.set_pipeline(&pipeline.pipeline);
        rpass.set_bind_group(0, bind_group, &[]);
        rpass.set_vertex_buffer(0, self.vbo.slice(..));
        rpass.draw(0..Self::VERTEX_COUNT, 0..1);
    }
}

/// A render pipeline built from a [`LinkedProgram`] for the full-screen quad.
pub struct QuadPipeline {
    pipeline: wgpu::RenderPipeline,
}

impl QuadPipeline {
    /// Builds the pipeline. The program should already have passed
    /// [`FullscreenQuad::accepts`] and the caller's layout checks; anything
    /// the device still rejects comes back as [`ShaderError::Pipeline`].
    pub fn new(
        ctx: &RenderCtx<'_>,
        layout: &wgpu::PipelineLayout,
        program: &LinkedProgram,
    ) -> Result<Self, ShaderError> {
        let scope = ctx.device.push_error_scope(wgpu::ErrorFilter::Validation);

        let vs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mandel vertex shader"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.vertex.clone())),
        });
        let fs = ctx.device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("mandel fragment shader"),
            source: wgpu::ShaderSource::Naga(Cow::Owned(program.fragment.clone())),
        });

        let pipeline = ctx.device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("mandel quad pipeline"),
            layout: Some(layout),

            vertex: wgpu::VertexState {
                module: &vs,
                entry_point: Some(ENTRY_POINT),
                compilation_options: Default::default(),
                buffers: &[QuadVertex::layout()],
            },

            fragment: Some(wgpu::FragmentState {
                module: &fs,
                entry_point: Some(ENTRY_POINT),
                compilation_options: Default::default(),
                targets: &[Some(wgpu::ColorTargetState {
                    format: ctx.surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
            }),

            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                polygon_mode: wgpu::PolygonMode::Fill,
                unclipped_depth: false,
                conservative: false,
            },

            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            multiview_mask: None,
            cache: None,
        });

        match pollster::block_on(scope.pop()) {
            Some(err) => Err(ShaderError::Pipeline { message: err.to_string() }),
            None => Ok(Self { pipeline }),
        }
    }
}

/// Holds the active program (or pipeline) and replaces it only with values
/// that built successfully.
///
/// `generation` counts successful swaps, so callers can tell whether a reload
/// took effect.
#[derive(Debug)]
pub struct ProgramSlot<T> {
    active: Option<T>,
    generation: u64,
}

impl<T> Default for ProgramSlot<T> {
    fn default() -> Self {
        Self { active: None, generation: 0 }
    }
}

impl<T> ProgramSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs `value` unconditionally.
    pub fn swap(&mut self, value: T) -> Option<T> {
        self.generation += 1;
        self.active.replace(value)
    }

    /// Installs the value on success. On error the previous value stays active
    /// and the error is logged. Returns whether a swap happened.
    pub fn try_swap(&mut self, built: Result<T, ShaderError>) -> bool {
        match built {
            Ok(value) => {
                self.swap(value);
                true
            }
            Err(err) => {
                if self.active.is_some() {
                    log::error!("{err}; keeping the previous program");
                } else {
                    log::error!("{err}");
                }
                false
            }
        }
    }

    pub fn active(&self) -> Option<&T> {
        self.active.as_ref()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coords::Viewport;
    use crate::render::program::ShaderSource;

    const FRAG: &str = r#"#version 450
layout(location = 0) out vec4 o_color;
void main() { o_color = vec4(1.0); }
"#;

    fn program(vertex: &str) -> LinkedProgram {
        LinkedProgram::from_sources(&ShaderSource {
            vertex: vertex.to_string(),
            fragment: FRAG.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn quad_is_a_clip_space_strip() {
        let xs: Vec<[f32; 2]> = QUAD_VERTICES.iter().map(|v| v.pos).collect();
        assert_eq!(xs, vec![[-1.0, 1.0], [-1.0, -1.0], [1.0, 1.0], [1.0, -1.0]]);
        assert_eq!(QuadVertex::layout().array_stride, 8);
    }

    #[test]
    fn quad_accepts_position_only_programs() {
        let vert = r#"#version 450
layout(location = 0) in vec2 a_pos;
void main() { gl_Position = vec4(a_pos, 0.0, 1.0); }
"#;
        assert!(FullscreenQuad::accepts(&program(vert)).is_ok());
    }

    #[test]
    fn quad_rejects_extra_attributes() {
        let vert = r#"#version 450
layout(location = 0) in vec2 a_pos;
layout(location = 1) in vec2 a_uv;
void main() { gl_Position = vec4(a_pos + a_uv, 0.0, 1.0); }
"#;
        let err = FullscreenQuad::accepts(&program(vert)).unwrap_err();
        assert!(err.to_string().contains("location 1"));
    }

    #[test]
    fn quad_rejects_wrong_position_type() {
        let vert = r#"#version 450
layout(location = 0) in vec3 a_pos;
void main() { gl_Position = vec4(a_pos, 1.0); }
"#;
        assert!(FullscreenQuad::accepts(&program(vert)).is_err());
    }

    fn noop_device() -> (wgpu::Device, wgpu::Queue) {
        wgpu::Device::noop(&wgpu::DeviceDescriptor::default())
    }

    const QUAD_VERT: &str = r#"#version 450
layout(location = 0) in vec2 a_pos;
void main() { gl_Position = vec4(a_pos, 0.0, 1.0); }
"#;

    #[test]
    fn pipeline_builds_for_a_matching_layout() {
        let (device, queue) = noop_device();
        let ctx = RenderCtx::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            Viewport::new(64.0, 64.0, (64, 64)),
        );
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[],
            immediate_size: 0,
        });
        assert!(QuadPipeline::new(&ctx, &layout, &program(QUAD_VERT)).is_ok());
    }

    #[test]
    fn device_rejection_is_returned_not_raised() {
        let (device, queue) = noop_device();
        let ctx = RenderCtx::new(
            &device,
            &queue,
            wgpu::TextureFormat::Rgba8UnormSrgb,
            Viewport::new(64.0, 64.0, (64, 64)),
        );
        // The fragment stage reads a uniform block the empty layout does not provide.
        let frag = r#"#version 450
layout(location = 0) out vec4 o_color;
layout(set = 0, binding = 0) uniform Params { vec4 tint; } params;
void main() { o_color = params.tint; }
"#;
        let program = LinkedProgram::from_sources(&ShaderSource {
            vertex: QUAD_VERT.to_string(),
            fragment: frag.to_string(),
        })
        .unwrap();
        let layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: None,
            bind_group_layouts: &[],
            immediate_size: 0,
        });

        let err = QuadPipeline::new(&ctx, &layout, &program).err().unwrap();
        assert!(matches!(err, ShaderError::Pipeline { .. }));

        let mut slot = ProgramSlot::new();
        assert!(!slot.try_swap(QuadPipeline::new(&ctx, &layout, &program)));
        assert_eq!(slot.generation(), 0);
    }

    #[test]
    fn failed_build_keeps_previous_value() {
        let mut slot = ProgramSlot::new();
        assert!(slot.try_swap(Ok("first")));
        assert_eq!(slot.generation(), 1);

        let failed = slot.try_swap(Err(ShaderError::link("no color output")));
        assert!(!failed);
        assert_eq!(slot.active(), Some(&"first"));
        assert_eq!(slot.generation(), 1);

        assert!(slot.try_swap(Ok("second")));
        assert_eq!(slot.active(), Some(&"second"));
        assert_eq!(slot.generation(), 2);
    }

    #[test]
    fn empty_slot_stays_empty_on_error() {
        let mut slot: ProgramSlot<u32> = ProgramSlot::default();
        assert!(!slot.try_swap(Err(ShaderError::link("bad"))));
        assert!(slot.active().is_none());
        assert_eq!(slot.generation(), 0);
    }
}
