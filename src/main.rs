/*

    Load a scene of boxes and spheres from JSON, cast the
    probe rays it declares and report the closest hit of each.

    Usage: slabcast <scene>.json [<report>.json]
    Report is printed to stdout if no output path is given.
*/

use std::{env, fs::File, io::{self, BufWriter, Write}};
use tracing::{info, warn, error, debug};

use slabcast::json_parser::parse_scene_json;
use slabcast::probe::cast_probes;
use slabcast::scene::Scene;

fn main() -> Result<(), Box<dyn std::error::Error>> {

    // Logging on console
    tracing_subscriber::fmt::init();

    // Parse args
    let args: Vec<String> = env::args().collect();
    let (json_path, report_path): (String, Option<String>) = match args.len() {
        1 => {
            warn!("No arguments were provided, setting default scene path...");
            (String::from("./inputs/scene.json"), None)
        }
        2 => (args[1].clone(), None),
        3 => (args[1].clone(), Some(args[2].clone())),
        _ => {
            error!("Usage: {} <scene>.json [<report>.json]", args[0]);
            std::process::exit(1);
        }
    };

    // Parse JSON
    info!("Loading scene from {}...", json_path);
    let root = parse_scene_json(&json_path).map_err(|e| {
        error!("Failed to load scene: {}", e);
        e
    })?;

    let scene = Scene::new_from(root.scene).map_err(|e| {
        error!("Failed to setup scene: {}", e);
        e
    })?;
    debug!("Scene is setup successfully.\n {:#?}", scene);
    if scene.probes.is_empty() {
        warn!("Scene declares no probes, report will be empty.");
    }

    let reports = cast_probes(&scene);

    // Write report
    match report_path {
        Some(path) => {
            let writer = BufWriter::new(File::create(&path)?);
            serde_json::to_writer_pretty(writer, &reports)?;
            info!("Report saved to {}", path);
        }
        None => {
            let mut out = io::stdout().lock();
            serde_json::to_writer_pretty(&mut out, &reports)?;
            writeln!(out)?;
        }
    }

    info!("Finished execution.");
    Ok(())
}
