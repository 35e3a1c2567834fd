use mandel_engine::render::{
    FullscreenQuad, LinkedProgram, ProgramSlot, QuadPipeline, RenderCtx, RenderTarget,
    ShaderError, ShaderSource,
};

use crate::orbit::OrbitTracker;
use crate::uniforms::{FRAME_UNIFORM_SIZE, FrameUniforms, ORBIT_UNIFORM_SIZE, orbit_points};

pub const FRAME_BINDING: u32 = 0;
pub const ORBIT_BINDING: u32 = 1;

/// Compiles and links `source`, then checks it against what the renderer binds.
///
/// Needs no GPU, so the initial program can be validated before the window opens.
pub fn prepare(source: &ShaderSource) -> Result<LinkedProgram, ShaderError> {
    let program = LinkedProgram::from_sources(source)?;
    FullscreenQuad::accepts(&program)?;
    check_bindings(&program)?;
    Ok(program)
}

/// A program may use either uniform block, or neither, but nothing else.
fn check_bindings(program: &LinkedProgram) -> Result<(), ShaderError> {
    for res in program.resources() {
        let capacity = match (res.group, res.binding) {
            (0, FRAME_BINDING) => FRAME_UNIFORM_SIZE,
            (0, ORBIT_BINDING) => ORBIT_UNIFORM_SIZE,
            (group, binding) => {
                return Err(ShaderError::link(format!(
                    "no resource is bound at set {group}, binding {binding}"
                )));
            }
        };
        if !res.is_uniform() {
            return Err(ShaderError::link(format!(
                "set 0, binding {} must be a uniform block",
                res.binding
            )));
        }
        if u64::from(res.size) > capacity {
            return Err(ShaderError::link(format!(
                "uniform block at binding {} is {} bytes, larger than the {capacity} bytes provided",
                res.binding, res.size
            )));
        }
    }
    Ok(())
}

/// Draws the fractal: one full-screen quad with the frame and orbit uniforms.
pub struct FractalRenderer {
    quad: FullscreenQuad,
    pipeline_layout: wgpu::PipelineLayout,
    bind_group: wgpu::BindGroup,
    frame_ubo: wgpu::Buffer,
    orbit_ubo: wgpu::Buffer,
    slot: ProgramSlot<QuadPipeline>,
    /// Tracker generation last written to `orbit_ubo`.
    orbit_generation: Option<u64>,
}

impl FractalRenderer {
    /// `program` must come from [`prepare`]. Fails when the device rejects the
    /// pipeline built from it.
    pub fn new(ctx: &RenderCtx<'_>, program: &LinkedProgram) -> Result<Self, ShaderError> {
        let uniform_entry = |binding: u32, size: u64| wgpu::BindGroupLayoutEntry {
            binding,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(size),
            },
            count: None,
        };

        let bind_group_layout =
            ctx.device
                .create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
                    label: Some("mandel uniforms bgl"),
                    entries: &[
                        uniform_entry(FRAME_BINDING, FRAME_UNIFORM_SIZE),
                        uniform_entry(ORBIT_BINDING, ORBIT_UNIFORM_SIZE),
                    ],
                });

        let pipeline_layout =
            ctx.device
                .create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
                    label: Some("mandel pipeline layout"),
                    bind_group_layouts: &[&bind_group_layout],
                    immediate_size: 0,
                });

        let frame_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mandel frame ubo"),
            size: FRAME_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });
        let orbit_ubo = ctx.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some("mandel orbit ubo"),
            size: ORBIT_UNIFORM_SIZE,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = ctx.device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("mandel uniforms bind group"),
            layout: &bind_group_layout,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: FRAME_BINDING,
                    resource: frame_ubo.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: ORBIT_BINDING,
                    resource: orbit_ubo.as_entire_binding(),
                },
            ],
        });

        let mut slot = ProgramSlot::new();
        slot.swap(QuadPipeline::new(ctx, &pipeline_layout, program)?);

        Ok(Self {
            quad: FullscreenQuad::new(ctx.device),
            pipeline_layout,
            bind_group,
            frame_ubo,
            orbit_ubo,
            slot,
            orbit_generation: None,
        })
    }

    /// Rebuilds the pipeline from new sources. On failure the error is logged
    /// and the current program keeps rendering. Returns whether the swap happened.
    pub fn reload(&mut self, ctx: &RenderCtx<'_>, source: &ShaderSource) -> bool {
        let built = prepare(source)
            .and_then(|program| QuadPipeline::new(ctx, &self.pipeline_layout, &program));
        let swapped = self.slot.try_swap(built);
        if swapped {
            log::info!("shader program reloaded (generation {})", self.slot.generation());
        }
        swapped
    }

    /// Uploads the uniforms (the orbit only when it changed) and draws.
    pub fn render(
        &mut self,
        ctx: &RenderCtx<'_>,
        target: &mut RenderTarget<'_>,
        frame: &FrameUniforms,
        tracker: &OrbitTracker,
    ) {
        ctx.queue.write_buffer(&self.frame_ubo, 0, bytemuck::bytes_of(frame));

        if self.orbit_generation != Some(tracker.generation()) {
            let points = orbit_points(tracker.orbit());
            ctx.queue.write_buffer(&self.orbit_ubo, 0, bytemuck::cast_slice(&points));
            self.orbit_generation = Some(tracker.generation());
        }

        let Some(pipeline) = self.slot.active() else { return };
        self.quad.draw(target, pipeline, &self.bind_group);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_SHADER_DIR, FRAGMENT_FILE, VERTEX_FILE};
    use mandel_engine::coords::Viewport;

    const VERT: &str = include_str!("../shaders/vert.glsl");
    const FRAG: &str = include_str!("../shaders/frag.glsl");

    fn shipped() -> ShaderSource {
        ShaderSource { vertex: VERT.to_string(), fragment: FRAG.to_string() }
    }

    #[test]
    fn shipped_shaders_compile_and_link() {
        let program = prepare(&shipped()).unwrap();

        let mut sizes: Vec<(u32, u32)> = program
            .resources()
            .iter()
            .map(|r| (r.binding, r.size))
            .collect();
        sizes.sort();
        assert_eq!(
            sizes,
            vec![(FRAME_BINDING, FRAME_UNIFORM_SIZE as u32), (ORBIT_BINDING, ORBIT_UNIFORM_SIZE as u32)]
        );
    }

    #[test]
    fn shipped_shaders_are_in_the_default_directory() {
        let dir = std::path::Path::new(DEFAULT_SHADER_DIR);
        assert!(dir.join(VERTEX_FILE).is_file());
        assert!(dir.join(FRAGMENT_FILE).is_file());
    }

    #[test]
    fn unknown_binding_is_rejected() {
        let frag = FRAG.replace(
            "layout(set = 0, binding = 1) uniform Orbit",
            "layout(set = 0, binding = 2) uniform Orbit",
        );
        let err = prepare(&ShaderSource { vertex: VERT.to_string(), fragment: frag }).unwrap_err();
        assert!(matches!(err, ShaderError::Link { .. }));
    }

    #[test]
    fn oversized_block_is_rejected() {
        let frag = FRAG.replace("vec4 points[300];", "vec4 points[400];");
        let err = prepare(&ShaderSource { vertex: VERT.to_string(), fragment: frag }).unwrap_err();
        assert!(err.to_string().contains("larger than"));
    }

    fn with_noop_ctx(f: impl FnOnce(&RenderCtx<'_>)) {
        let (device, queue) = wgpu::Device::noop(&wgpu::DeviceDescriptor::default());
        let ctx = RenderCtx::new(
            &device,
            &queue,
            wgpu::TextureFormat::Bgra8UnormSrgb,
            Viewport::new(800.0, 600.0, (800, 600)),
        );
        f(&ctx);
    }

    #[test]
    fn shipped_program_builds_a_renderer() {
        with_noop_ctx(|ctx| {
            let program = prepare(&shipped()).unwrap();
            let renderer = FractalRenderer::new(ctx, &program).ok().unwrap();
            assert_eq!(renderer.slot.generation(), 1);
        });
    }

    #[test]
    fn incompatible_reload_keeps_the_running_pipeline() {
        with_noop_ctx(|ctx| {
            let program = prepare(&shipped()).unwrap();
            let mut renderer = FractalRenderer::new(ctx, &program).ok().unwrap();

            let int_color = FRAG
                .replace("out vec4 o_color;", "out ivec4 o_color;")
                .replace("o_color = vec4(0.0, 0.0, 0.0, 1.0);", "o_color = ivec4(0, 0, 0, 1);")
                .replace("o_color = vec4(palette(nu * 0.02), 1.0);", "o_color = ivec4(1);");
            let source = ShaderSource { vertex: VERT.to_string(), fragment: int_color };
            assert!(!renderer.reload(ctx, &source));
            assert_eq!(renderer.slot.generation(), 1);
            assert!(renderer.slot.active().is_some());

            let missing_block = FRAG.replace(
                "layout(set = 0, binding = 1) uniform Orbit",
                "layout(set = 0, binding = 5) uniform Orbit",
            );
            let source = ShaderSource { vertex: VERT.to_string(), fragment: missing_block };
            assert!(!renderer.reload(ctx, &source));
            assert_eq!(renderer.slot.generation(), 1);

            assert!(renderer.reload(ctx, &shipped()));
            assert_eq!(renderer.slot.generation(), 2);
        });
    }

    #[test]
    fn broken_edit_is_a_compile_error() {
        let frag = FRAG.replace("o_color = vec4(0.0, 0.0, 0.0, 1.0);", "o_color = vec4(0.0, 0.0, 0.0, 1.0)");
        let err = prepare(&ShaderSource { vertex: VERT.to_string(), fragment: frag }).unwrap_err();
        assert!(matches!(err, ShaderError::Compile { .. }));
    }
}
