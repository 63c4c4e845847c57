use clap::Parser;
use exotrace::config::load_scenes;
use exotrace::export::map as export_map;
use exotrace::scenario::{build_scene, find_scene};
use std::path::PathBuf;

/// Ray-trace a scene manifest and write per-pixel maps as CSV.
#[derive(Parser, Debug)]
#[command(author, version, about = "Scene ray tracer (flux, mu, t, body maps)")]
struct Cli {
    /// Scene manifest: YAML list, TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/scenes.yaml")]
    scene: PathBuf,

    /// Scene name inside the manifest (defaults to the first scene)
    #[arg(long)]
    name: Option<String>,

    /// Override the manifest's image resolution
    #[arg(long)]
    resolution: Option<usize>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/scene.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let scenes = load_scenes(&cli.scene)?;
    let mut config = find_scene(&scenes, cli.name.as_deref())?.clone();
    if let Some(resolution) = cli.resolution {
        config.resolution = resolution;
    }

    let mut scene = build_scene(&config)?;
    scene.trace();
    tracing::info!(
        scene = %config.name,
        bodies = scene.bodies().len(),
        hits = scene.maps().hits(),
        total_flux = scene.total_flux(),
        "scene traced"
    );

    let mut writer = export_map::writer_for_path(&cli.output)?;
    export_map::write_scene_header(&mut writer)?;
    let maps = scene.maps();
    for (j, &y) in scene.y().iter().enumerate() {
        for (i, &x) in scene.x().iter().enumerate() {
            let body = maps.body[(j, i)]
                .map(|idx| scene.bodies()[idx].name())
                .unwrap_or("");
            let record = export_map::SceneRecord {
                i,
                j,
                x,
                y,
                body,
                t: maps.t[(j, i)],
                mu: maps.mu[(j, i)],
                flux: maps.flux[(j, i)],
            };
            record.write_to(&mut writer)?;
        }
    }
    writer.flush()?;

    Ok(())
}
