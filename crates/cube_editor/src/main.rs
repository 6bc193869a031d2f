//! Cube scene editor
//!
//! Usage: `cube_editor [SCRIPT.ron]`
//!
//! Without a script a built-in demo session runs. Configuration comes from
//! the file named by `CUBE_EDITOR_CONFIG`, else `cube_editor.toml` in the
//! working directory if present, else defaults.

mod launch;

use scene_engine::foundation::logging;
use scene_engine::render::HeadlessRenderer;
use scene_engine::{Editor, FixedPaths};
use std::path::PathBuf;

/// Edge length of screenshots written by the headless renderer
const CAPTURE_SIZE: u32 = 512;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();
    log::info!("Starting cube editor");

    let working_dir = std::env::current_dir()?;
    let config_path = launch::config_path(std::env::var_os(launch::CONFIG_ENV), &working_dir);
    let config = launch::load_config(config_path.as_deref())?;

    let mut input = match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(script) => launch::load_script(&script)?,
        None => {
            log::info!("No script given, running demo session");
            launch::demo_script(&config)
        }
    };

    let mut editor = Editor::with_rapier(config.clone())?;
    let mut renderer = HeadlessRenderer::new(CAPTURE_SIZE);
    let mut paths = FixedPaths::from_config(&config.files);

    let summary = editor.run(&mut input, &mut renderer, &mut paths);
    log::info!(
        "Session finished: {} frames, {} objects, {} errors",
        summary.frames,
        summary.final_objects,
        summary.errors
    );
    Ok(())
}
