use anyhow::anyhow;
use clap::{Parser, Subcommand};
use exotrace::config::load_scenes;
use exotrace::export::lightcurve::{self as export_lc, Metadata};
use exotrace::lightcurve;
use exotrace::scenario::{build_scene, find_planet, find_scene, find_star};
use std::path::PathBuf;

/// Sample light curves from a scene manifest and write them as JSON.
#[derive(Parser, Debug)]
#[command(author, version, about = "Rotational and transit light curves")]
struct Cli {
    /// Scene manifest: YAML list, TOML file, or directory of TOML files
    #[arg(long, default_value = "configs/scenes.yaml")]
    scene: PathBuf,

    /// Scene name inside the manifest (defaults to the first scene)
    #[arg(long)]
    name: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Spin one star through a full turn
    Rotation {
        /// Star name (defaults to the first star in the scene)
        #[arg(long)]
        star: Option<String>,

        #[arg(long, default_value_t = 72)]
        steps: usize,

        #[arg(long, default_value = "artifacts/rotation.json")]
        output: PathBuf,
    },
    /// Move a planet along a straight chord across the scene
    Transit {
        #[arg(long)]
        planet: String,

        /// Start position as "x,y,z"
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        from: [f64; 3],

        /// End position as "x,y,z"
        #[arg(long, value_parser = parse_vector, allow_hyphen_values = true)]
        to: [f64; 3],

        #[arg(long, default_value_t = 50)]
        steps: usize,

        #[arg(long, default_value = "artifacts/transit.json")]
        output: PathBuf,
    },
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();
    let scenes = load_scenes(&cli.scene)?;
    let config = find_scene(&scenes, cli.name.as_deref())?;
    let mut scene = build_scene(config)?;

    match cli.command {
        Commands::Rotation {
            star,
            steps,
            output,
        } => {
            let index = find_star(&scene, star.as_deref())?;
            let star = scene
                .body_mut(index)?
                .as_star_mut()
                .ok_or_else(|| anyhow!("body {} is not a star", index))?;
            let samples = lightcurve::rotational(star, steps)?;
            let meta = Metadata {
                scene: &config.name,
                target: star.name(),
                resolution: star.resolution(),
            };
            export_lc::write_rotation_json(&output, &meta, &samples)?;
            println!("Wrote {} rotation samples to {}", samples.len(), output.display());
        }
        Commands::Transit {
            planet,
            from,
            to,
            steps,
            output,
        } => {
            let index = find_planet(&scene, &planet)?;
            let path = lightcurve::straight_path(from, to, steps);
            let samples = lightcurve::transit(&mut scene, index, &path)?;
            let meta = Metadata {
                scene: &config.name,
                target: &planet,
                resolution: scene.resolution(),
            };
            export_lc::write_transit_json(&output, &meta, &samples)?;
            println!("Wrote {} transit samples to {}", samples.len(), output.display());
        }
    }

    Ok(())
}

fn parse_vector(s: &str) -> Result<[f64; 3], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != 3 {
        return Err(format!("expected x,y,z but got '{s}'"));
    }
    let mut out = [0.0; 3];
    for (slot, part) in out.iter_mut().zip(&parts) {
        *slot = part
            .parse()
            .map_err(|e| format!("invalid component '{part}': {e}"))?;
    }
    Ok(out)
}
