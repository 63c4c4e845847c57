use anyhow::anyhow;
use clap::Parser;
use exotrace::config::load_scenes;
use exotrace::export::map as export_map;
use exotrace::scenario::{build_scene, find_scene, find_star};
use std::path::PathBuf;

/// Write one star's own surface map (lat, lon, mu, flux) as CSV.
#[derive(Parser, Debug)]
#[command(author, version, about = "Stellar surface map exporter")]
struct Cli {
    /// Scene manifest: YAML list, TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/scenes.yaml")]
    scene: PathBuf,

    /// Scene name inside the manifest (defaults to the first scene)
    #[arg(long)]
    name: Option<String>,

    /// Star name (defaults to the first star in the scene)
    #[arg(long)]
    star: Option<String>,

    /// Override inclination in degrees (90 = equator-on)
    #[arg(long)]
    inclination: Option<f64>,

    /// Override the longitude at disk centre in degrees
    #[arg(long)]
    meridian: Option<f64>,

    /// Output CSV file (use '-' for stdout)
    #[arg(long, default_value = "artifacts/star.csv")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let scenes = load_scenes(&cli.scene)?;
    let config = find_scene(&scenes, cli.name.as_deref())?;
    let mut scene = build_scene(config)?;
    let index = find_star(&scene, cli.star.as_deref())?;
    let star = scene
        .body_mut(index)?
        .as_star_mut()
        .ok_or_else(|| anyhow!("body {} is not a star", index))?;

    if let Some(inclination) = cli.inclination {
        star.set_inclination(inclination);
    }
    if let Some(meridian) = cli.meridian {
        star.set_meridian(meridian);
    }
    tracing::info!(
        star = star.name(),
        inclination_deg = star.inclination_deg(),
        meridian_deg = star.meridian_deg(),
        mean_flux = star.mean_flux(),
        "surface map ready"
    );

    let mut writer = export_map::writer_for_path(&cli.output)?;
    export_map::write_star_header(&mut writer)?;
    let flux = star.flux();
    for (j, &y) in star.y().iter().enumerate() {
        for (i, &x) in star.x().iter().enumerate() {
            let pixel = star.pixels()[(j, i)];
            let record = export_map::StarRecord {
                i,
                j,
                x,
                y,
                lat_deg: pixel.map_or(f64::NAN, |p| p.lat_deg),
                lon_deg: pixel.map_or(f64::NAN, |p| p.lon_deg),
                mu: pixel.map_or(f64::NAN, |p| p.mu),
                flux: flux[(j, i)],
            };
            record.write_to(&mut writer)?;
        }
    }
    writer.flush()?;

    Ok(())
}
