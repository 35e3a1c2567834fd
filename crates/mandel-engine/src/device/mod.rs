//! wgpu device and window surface.
//!
//! `Gpu` owns the instance, device, queue and the configured surface
//! of the single viewer window. Frames are acquired with `begin_frame` and
//! handed back through `submit`.

mod gpu;
mod init;
mod surface;

pub use gpu::{Gpu, GpuFrame};
pub use init::GpuInit;
pub use surface::SurfaceErrorAction;
