use std::fmt;
use std::path::{Path, PathBuf};

use mandel_engine::device::GpuInit;
use mandel_engine::window::{RuntimeConfig, WindowSize};

pub const USAGE: &str = "usage: mandel-viewer [SHADER_DIR] [--static] [--no-perturbation] \
[--no-reload] [--vsync] [--windowed WxH] [--log FILTER]";

pub const VERTEX_FILE: &str = "vert.glsl";
pub const FRAGMENT_FILE: &str = "frag.glsl";

/// Shaders shipped with the viewer.
pub const DEFAULT_SHADER_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/shaders");

/// Startup configuration.
///
/// Each of `interactive`, `perturbation` and `hot_reload` switches one stage
/// of the viewer off, so the plain static quad is `--static --no-reload`.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    pub shader_dir: PathBuf,
    /// Camera follows keyboard and mouse input.
    pub interactive: bool,
    /// Switch to the reference orbit past the zoom threshold.
    pub perturbation: bool,
    /// Re-stat the shader files every frame and swap in edits.
    pub hot_reload: bool,
    pub vsync: bool,
    pub window: WindowSize,
    pub log_filter: Option<String>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            shader_dir: PathBuf::from(DEFAULT_SHADER_DIR),
            interactive: true,
            perturbation: true,
            hot_reload: true,
            vsync: false,
            window: WindowSize::FillMonitor,
            log_filter: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ArgError {
    UnknownFlag(String),
    MissingValue(&'static str),
    BadSize(String),
    ExtraPositional(String),
}

impl fmt::Display for ArgError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArgError::UnknownFlag(flag) => write!(f, "unknown flag `{flag}`"),
            ArgError::MissingValue(flag) => write!(f, "`{flag}` expects a value"),
            ArgError::BadSize(s) => write!(f, "invalid window size `{s}` (expected WxH)"),
            ArgError::ExtraPositional(s) => write!(f, "unexpected argument `{s}`"),
        }
    }
}

impl std::error::Error for ArgError {}

impl ViewerConfig {
    /// Parses command-line arguments (without the program name).
    pub fn from_args<I>(args: I) -> Result<Self, ArgError>
    where
        I: IntoIterator<Item = String>,
    {
        let mut cfg = Self::default();
        let mut dir_seen = false;
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            match arg.as_str() {
                "--static" => cfg.interactive = false,
                "--no-perturbation" => cfg.perturbation = false,
                "--no-reload" => cfg.hot_reload = false,
                "--vsync" => cfg.vsync = true,
                "--windowed" => {
                    let size = args.next().ok_or(ArgError::MissingValue("--windowed"))?;
                    cfg.window = parse_size(&size)?;
                }
                "--log" => {
                    let filter = args.next().ok_or(ArgError::MissingValue("--log"))?;
                    cfg.log_filter = Some(filter);
                }
                flag if flag.starts_with('-') => return Err(ArgError::UnknownFlag(arg)),
                _ if dir_seen => return Err(ArgError::ExtraPositional(arg)),
                _ => {
                    cfg.shader_dir = PathBuf::from(arg);
                    dir_seen = true;
                }
            }
        }

        Ok(cfg)
    }

    pub fn vertex_path(&self) -> PathBuf {
        self.shader_dir.join(VERTEX_FILE)
    }

    pub fn fragment_path(&self) -> PathBuf {
        self.shader_dir.join(FRAGMENT_FILE)
    }

    pub fn shader_dir(&self) -> &Path {
        &self.shader_dir
    }

    pub fn runtime_config(&self) -> RuntimeConfig {
        RuntimeConfig {
            title: "mandel".to_string(),
            size: self.window,
        }
    }

    pub fn gpu_init(&self) -> GpuInit {
        if self.vsync { GpuInit::vsync() } else { GpuInit::default() }
    }
}

fn parse_size(s: &str) -> Result<WindowSize, ArgError> {
    let bad = || ArgError::BadSize(s.to_string());
    let (w, h) = s.split_once(['x', 'X']).ok_or_else(bad)?;
    let w: u32 = w.trim().parse().map_err(|_| bad())?;
    let h: u32 = h.trim().parse().map_err(|_| bad())?;
    if w == 0 || h == 0 {
        return Err(bad());
    }
    Ok(WindowSize::Logical(f64::from(w), f64::from(h)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Result<ViewerConfig, ArgError> {
        ViewerConfig::from_args(args.iter().map(|s| s.to_string()))
    }

    #[test]
    fn no_args_gives_defaults() {
        let cfg = parse(&[]).unwrap();
        assert_eq!(cfg, ViewerConfig::default());
        assert!(cfg.vertex_path().ends_with("shaders/vert.glsl"));
        assert_eq!(cfg.gpu_init().present_mode, wgpu::PresentMode::AutoNoVsync);
    }

    #[test]
    fn flags_and_directory() {
        let cfg = parse(&[
            "my/shaders",
            "--static",
            "--no-perturbation",
            "--no-reload",
            "--vsync",
            "--windowed",
            "800x600",
            "--log",
            "debug",
        ])
        .unwrap();
        assert_eq!(cfg.shader_dir, PathBuf::from("my/shaders"));
        assert_eq!(cfg.fragment_path(), PathBuf::from("my/shaders/frag.glsl"));
        assert!(!cfg.interactive && !cfg.perturbation && !cfg.hot_reload);
        assert_eq!(cfg.window, WindowSize::Logical(800.0, 600.0));
        assert_eq!(cfg.log_filter.as_deref(), Some("debug"));
        assert_eq!(cfg.gpu_init().present_mode, wgpu::PresentMode::Fifo);
    }

    #[test]
    fn unknown_flag_is_rejected() {
        assert_eq!(parse(&["--turbo"]), Err(ArgError::UnknownFlag("--turbo".into())));
    }

    #[test]
    fn bad_values_are_rejected() {
        assert_eq!(parse(&["--windowed"]), Err(ArgError::MissingValue("--windowed")));
        assert!(matches!(parse(&["--windowed", "800"]), Err(ArgError::BadSize(_))));
        assert!(matches!(parse(&["--windowed", "0x600"]), Err(ArgError::BadSize(_))));
        assert!(matches!(parse(&["a", "b"]), Err(ArgError::ExtraPositional(_))));
    }
}
