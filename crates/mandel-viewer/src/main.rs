//! Real-time Mandelbrot viewer with hot-reloaded GLSL shaders.

mod app;
mod camera;
mod config;
mod controls;
mod orbit;
mod renderer;
mod state;
mod uniforms;

use std::process::ExitCode;

use anyhow::{Context, Result};
use mandel_engine::logging::{LoggingConfig, init_logging};
use mandel_engine::render::ShaderWatcher;
use mandel_engine::window::Runtime;

use crate::app::ViewerApp;
use crate::config::{USAGE, ViewerConfig};

fn main() -> ExitCode {
    let config = match ViewerConfig::from_args(std::env::args().skip(1)) {
        Ok(config) => config,
        Err(err) => {
            init_logging(LoggingConfig::default());
            log::error!("{err}\n{USAGE}");
            return ExitCode::FAILURE;
        }
    };

    init_logging(LoggingConfig {
        env_filter: config.log_filter.clone(),
        ..Default::default()
    });

    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            log::error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(config: ViewerConfig) -> Result<()> {
    let watcher = ShaderWatcher::new(config.vertex_path(), config.fragment_path());
    let source = watcher
        .read_sources()
        .with_context(|| format!("loading shaders from {}", config.shader_dir().display()))?;
    let program = renderer::prepare(&source).context("building the initial shader program")?;

    log::info!(
        "shaders loaded from {} (perturbation: {}, hot reload: {}, interactive: {})",
        config.shader_dir().display(),
        config.perturbation,
        config.hot_reload,
        config.interactive,
    );

    let watcher = config.hot_reload.then_some(watcher);
    let app = ViewerApp::new(&config, program, watcher);
    Runtime::run(config.runtime_config(), config.gpu_init(), app)
}
