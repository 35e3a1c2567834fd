//! GLSL program compilation and linking.
//!
//! Stages are parsed and validated with naga on the CPU. Linking checks what
//! an OpenGL linker would: both entry points exist, and every input the
//! fragment stage reads is written by the vertex stage with the same type.
//! Only a [`LinkedProgram`] is ever handed to wgpu.

use std::fmt;
use std::path::PathBuf;

use naga::front::glsl::{Frontend, Options};
use naga::valid::{Capabilities, ValidationFlags, Validator};
use naga::{
    AddressSpace, Binding, Handle, Interpolation, Module, Sampling, ScalarKind, Type, TypeInner,
};

/// Entry point name produced by the GLSL frontend.
pub const ENTRY_POINT: &str = "main";

#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    fn to_naga(self) -> naga::ShaderStage {
        match self {
            ShaderStage::Vertex => naga::ShaderStage::Vertex,
            ShaderStage::Fragment => naga::ShaderStage::Fragment,
        }
    }
}

impl fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderStage::Vertex => f.write_str("vertex"),
            ShaderStage::Fragment => f.write_str("fragment"),
        }
    }
}

/// GLSL source text for both stages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShaderSource {
    pub vertex: String,
    pub fragment: String,
}

/// Why a program could not be built.
#[derive(Debug)]
pub enum ShaderError {
    /// A source file could not be read (or was empty).
    Read { path: PathBuf, reason: String },
    /// A stage failed to parse or validate.
    Compile { stage: ShaderStage, message: String },
    /// The stages compiled but do not fit together (or do not fit the pipeline).
    Link { message: String },
    /// The device rejected the shader modules or the pipeline built from them.
    Pipeline { message: String },
}

impl ShaderError {
    pub fn link(message: impl Into<String>) -> Self {
        ShaderError::Link { message: message.into() }
    }
}

impl fmt::Display for ShaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShaderError::Read { path, reason } => {
                write!(f, "failed to read shader {}: {reason}", path.display())
            }
            ShaderError::Compile { stage, message } => {
                write!(f, "{stage} shader failed to compile:\n{}", message.trim_end())
            }
            ShaderError::Link { message } => write!(f, "program failed to link: {message}"),
            ShaderError::Pipeline { message } => {
                write!(f, "pipeline creation failed:\n{}", message.trim_end())
            }
        }
    }
}

impl std::error::Error for ShaderError {}

/// A user-defined stage input or output.
#[derive(Debug, Clone, PartialEq)]
pub struct Varying {
    pub location: u32,
    pub ty: TypeInner,
    pub interpolation: Option<Interpolation>,
    pub sampling: Option<Sampling>,
}

/// A bound resource declared by a stage.
#[derive(Debug, Clone, PartialEq)]
pub struct ResourceUse {
    pub group: u32,
    pub binding: u32,
    pub space: AddressSpace,
    /// Size of the bound type in bytes (std140/std430 as laid out by naga).
    pub size: u32,
}

impl ResourceUse {
    pub fn is_uniform(&self) -> bool {
        self.space == AddressSpace::Uniform
    }
}

/// Parses and validates one GLSL stage.
pub fn compile_stage(stage: ShaderStage, source: &str) -> Result<Module, ShaderError> {
    let mut frontend = Frontend::default();
    let module = frontend
        .parse(&Options::from(stage.to_naga()), source)
        .map_err(|errors| ShaderError::Compile {
            stage,
            message: errors.emit_to_string(source),
        })?;

    Validator::new(ValidationFlags::all(), Capabilities::empty())
        .validate(&module)
        .map_err(|err| ShaderError::Compile {
            stage,
            message: err.emit_to_string(source),
        })?;

    if entry_point(&module, stage).is_none() {
        return Err(ShaderError::Compile {
            stage,
            message: format!("no `{ENTRY_POINT}` entry point"),
        });
    }

    Ok(module)
}

/// A vertex + fragment pair that compiled and linked.
#[derive(Debug, Clone)]
pub struct LinkedProgram {
    pub vertex: Module,
    pub fragment: Module,
}

impl LinkedProgram {
    /// Compiles both stages and links them.
    pub fn from_sources(source: &ShaderSource) -> Result<Self, ShaderError> {
        let vertex = compile_stage(ShaderStage::Vertex, &source.vertex)?;
        let fragment = compile_stage(ShaderStage::Fragment, &source.fragment)?;
        Self::link(vertex, fragment)
    }

    /// Links two compiled stages.
    pub fn link(vertex: Module, fragment: Module) -> Result<Self, ShaderError> {
        let program = Self { vertex, fragment };

        let written = program.vertex_outputs();
        for input in program.fragment_inputs() {
            match written.iter().find(|v| v.location == input.location) {
                None => {
                    return Err(ShaderError::link(format!(
                        "fragment input at location {} is not written by the vertex stage",
                        input.location
                    )));
                }
                Some(out) if out.ty != input.ty => {
                    return Err(ShaderError::link(format!(
                        "type mismatch at location {}: vertex writes {:?}, fragment reads {:?}",
                        input.location, out.ty, input.ty
                    )));
                }
                Some(out) if (out.interpolation, out.sampling) != (input.interpolation, input.sampling) => {
                    return Err(ShaderError::link(format!(
                        "interpolation mismatch at location {}: vertex writes {:?} {:?}, fragment reads {:?} {:?}",
                        input.location, out.interpolation, out.sampling, input.interpolation, input.sampling
                    )));
                }
                Some(_) => {}
            }
        }

        // Color targets are unorm/sRGB surfaces, which only take float outputs.
        match program.fragment_outputs().iter().find(|v| v.location == 0) {
            None => {
                return Err(ShaderError::link("fragment stage writes no color at location 0"));
            }
            Some(color) if scalar_kind(&color.ty) != Some(ScalarKind::Float) => {
                return Err(ShaderError::link(format!(
                    "color output at location 0 must be a float type, found {:?}",
                    color.ty
                )));
            }
            Some(_) => {}
        }

        Ok(program)
    }

    /// Attribute inputs of the vertex stage.
    pub fn vertex_inputs(&self) -> Vec<Varying> {
        stage_inputs(&self.vertex, ShaderStage::Vertex)
    }

    pub fn vertex_outputs(&self) -> Vec<Varying> {
        stage_outputs(&self.vertex, ShaderStage::Vertex)
    }

    pub fn fragment_inputs(&self) -> Vec<Varying> {
        stage_inputs(&self.fragment, ShaderStage::Fragment)
    }

    pub fn fragment_outputs(&self) -> Vec<Varying> {
        stage_outputs(&self.fragment, ShaderStage::Fragment)
    }

    /// Bound resources of both stages; a binding used by both stages appears twice.
    pub fn resources(&self) -> Vec<ResourceUse> {
        let mut out = module_resources(&self.vertex);
        out.extend(module_resources(&self.fragment));
        out
    }
}

fn scalar_kind(ty: &TypeInner) -> Option<ScalarKind> {
    match ty {
        TypeInner::Scalar(scalar) | TypeInner::Vector { scalar, .. } => Some(scalar.kind),
        _ => None,
    }
}

fn entry_point(module: &Module, stage: ShaderStage) -> Option<&naga::EntryPoint> {
    module
        .entry_points
        .iter()
        .find(|ep| ep.stage == stage.to_naga() && ep.name == ENTRY_POINT)
}

fn stage_inputs(module: &Module, stage: ShaderStage) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(ep) = entry_point(module, stage) {
        for arg in &ep.function.arguments {
            collect_locations(module, arg.ty, arg.binding.as_ref(), &mut out);
        }
    }
    out
}

fn stage_outputs(module: &Module, stage: ShaderStage) -> Vec<Varying> {
    let mut out = Vec::new();
    if let Some(result) = entry_point(module, stage).and_then(|ep| ep.function.result.as_ref()) {
        collect_locations(module, result.ty, result.binding.as_ref(), &mut out);
    }
    out
}

/// Flattens an entry point argument/result into its located members.
/// Built-ins (`gl_Position`, `gl_FragCoord`, ...) are skipped.
fn collect_locations(
    module: &Module,
    ty: Handle<Type>,
    binding: Option<&Binding>,
    out: &mut Vec<Varying>,
) {
    match binding {
        Some(Binding::Location { location, interpolation, sampling, .. }) => out.push(Varying {
            location: *location,
            ty: module.types[ty].inner.clone(),
            interpolation: *interpolation,
            sampling: *sampling,
        }),
        Some(_) => {}
        None => {
            if let TypeInner::Struct { members, .. } = &module.types[ty].inner {
                for member in members {
                    collect_locations(module, member.ty, member.binding.as_ref(), out);
                }
            }
        }
    }
}

fn module_resources(module: &Module) -> Vec<ResourceUse> {
    let gctx = module.to_ctx();
    module
        .global_variables
        .iter()
        .filter_map(|(_, var)| {
            let rb = var.binding.as_ref()?;
            Some(ResourceUse {
                group: rb.group,
                binding: rb.binding,
                space: var.space,
                size: module.types[var.ty].inner.size(gctx),
            })
        })
        .collect()
}
