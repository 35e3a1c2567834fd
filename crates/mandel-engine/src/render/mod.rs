//! GPU rendering subsystem.
//!
//! The viewer draws exactly one thing: a full-screen quad shaded by a GLSL
//! program loaded from disk.
//!
//! - `program` compiles and links GLSL stages on the CPU (naga) so a broken
//!   edit is rejected before it reaches the GPU.
//! - `reload` watches the shader files and re-reads them when they change.
//! - `quad` owns the quad geometry, the pipeline built from a linked program,
//!   and the slot that keeps the last good program active.

mod ctx;
pub mod program;
pub mod quad;
pub mod reload;

pub use ctx::{RenderCtx, RenderTarget};
pub use program::{LinkedProgram, ResourceUse, ShaderError, ShaderSource, ShaderStage, Varying};
pub use quad::{FullscreenQuad, ProgramSlot, QuadPipeline};
pub use reload::{FileStats, ShaderWatcher};
