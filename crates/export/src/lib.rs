//! Export helpers for CSV maps and JSON light curves.

pub mod map {
    use std::fs;
    use std::io::{self, BufWriter, Write};
    use std::path::Path;

    const SCENE_HEADER: [&str; 8] = ["i", "j", "x", "y", "body", "t", "mu", "flux"];
    const STAR_HEADER: [&str; 8] = ["i", "j", "x", "y", "lat_deg", "lon_deg", "mu", "flux"];

    /// CSV writer over a file or stdout.
    pub type MapWriter = csv::Writer<Box<dyn Write>>;

    /// Create a writer for the target path, handling stdout (`-`) by convention.
    pub fn writer_for_path(path: &Path) -> io::Result<MapWriter> {
        let sink: Box<dyn Write> = if path == Path::new("-") {
            Box::new(BufWriter::new(io::stdout()))
        } else {
            if let Some(parent) = path.parent() {
                if !parent.as_os_str().is_empty() {
                    fs::create_dir_all(parent)?;
                }
            }
            Box::new(BufWriter::new(fs::File::create(path)?))
        };
        Ok(csv::Writer::from_writer(sink))
    }

    /// Write the scene map CSV header.
    pub fn write_scene_header<W: Write>(writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record(SCENE_HEADER)
    }

    /// Write the star surface map CSV header.
    pub fn write_star_header<W: Write>(writer: &mut csv::Writer<W>) -> csv::Result<()> {
        writer.write_record(STAR_HEADER)
    }

    /// Non-finite values are written as `nan` / `inf` so readers parse them back.
    fn fmt_value(v: f64) -> String {
        if v.is_nan() {
            "nan".to_string()
        } else if v.is_infinite() {
            if v > 0.0 { "inf".to_string() } else { "-inf".to_string() }
        } else {
            format!("{:.6}", v)
        }
    }

    /// One pixel of a traced scene.
    #[derive(Debug, Clone)]
    pub struct SceneRecord<'a> {
        pub i: usize,
        pub j: usize,
        pub x: f64,
        pub y: f64,
        /// Name of the nearest body, empty on a miss. Quoted when it holds
        /// separators.
        pub body: &'a str,
        pub t: f64,
        pub mu: f64,
        pub flux: f64,
    }

    impl<'a> SceneRecord<'a> {
        /// Serialize the record to CSV, matching the scene header ordering.
        pub fn write_to<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
            writer.write_record([
                self.i.to_string(),
                self.j.to_string(),
                format!("{:.6}", self.x),
                format!("{:.6}", self.y),
                self.body.to_string(),
                fmt_value(self.t),
                fmt_value(self.mu),
                fmt_value(self.flux),
            ])
        }
    }

    /// One pixel of a star's own surface map.
    #[derive(Debug, Clone, Copy)]
    pub struct StarRecord {
        pub i: usize,
        pub j: usize,
        pub x: f64,
        pub y: f64,
        pub lat_deg: f64,
        pub lon_deg: f64,
        pub mu: f64,
        pub flux: f64,
    }

    impl StarRecord {
        /// Serialize the record to CSV, matching the star header ordering.
        pub fn write_to<W: Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
            writer.write_record([
                self.i.to_string(),
                self.j.to_string(),
                format!("{:.6}", self.x),
                format!("{:.6}", self.y),
                fmt_value(self.lat_deg),
                fmt_value(self.lon_deg),
                fmt_value(self.mu),
                fmt_value(self.flux),
            ])
        }
    }
}

pub mod lightcurve {
    use exotrace_lightcurve::{RotationSample, TransitSample};
    use serde::Serialize;
    use serde_json::to_writer_pretty;
    use std::fs::{self, File};
    use std::io;
    use std::path::Path;

    /// Metadata describing the light-curve run.
    #[derive(Debug)]
    pub struct Metadata<'a> {
        pub scene: &'a str,
        pub target: &'a str,
        pub resolution: usize,
    }

    #[derive(Serialize)]
    struct RotationSidecar<'a> {
        kind: &'static str,
        scene: &'a str,
        star: &'a str,
        resolution: usize,
        min_relative_flux: f64,
        samples: &'a [RotationSample],
    }

    #[derive(Serialize)]
    struct TransitSidecar<'a> {
        kind: &'static str,
        scene: &'a str,
        planet: &'a str,
        resolution: usize,
        depth: f64,
        samples: &'a [TransitSample],
    }

    fn create(output: &Path) -> io::Result<File> {
        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        File::create(output)
    }

    /// Write a rotational light curve as pretty JSON.
    pub fn write_rotation_json(
        output: &Path,
        meta: &Metadata<'_>,
        samples: &[RotationSample],
    ) -> io::Result<()> {
        let sidecar = RotationSidecar {
            kind: "rotation",
            scene: meta.scene,
            star: meta.target,
            resolution: meta.resolution,
            min_relative_flux: samples
                .iter()
                .map(|s| s.relative_flux)
                .fold(f64::INFINITY, f64::min),
            samples,
        };
        to_writer_pretty(create(output)?, &sidecar)?;
        Ok(())
    }

    /// Write a transit light curve as pretty JSON; `depth` is one minus the
    /// lowest relative flux.
    pub fn write_transit_json(
        output: &Path,
        meta: &Metadata<'_>,
        samples: &[TransitSample],
    ) -> io::Result<()> {
        let min_relative = samples
            .iter()
            .map(|s| s.relative_flux)
            .fold(f64::INFINITY, f64::min);
        let sidecar = TransitSidecar {
            kind: "transit",
            scene: meta.scene,
            planet: meta.target,
            resolution: meta.resolution,
            depth: if min_relative.is_finite() { 1.0 - min_relative } else { 0.0 },
            samples,
        };
        to_writer_pretty(create(output)?, &sidecar)?;
        Ok(())
    }
}
