use clap::Parser;
use csv::ReaderBuilder;
use plotters::prelude::*;
use std::fs;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Render a traced map CSV (flux, mu, or t) as a heatmap"
)]
struct Cli {
    #[arg(long)]
    input: String,
    #[arg(long, default_value = "artifacts/map.png")]
    output: PathBuf,
    /// Column to render: flux, mu, t, or any numeric column.
    #[arg(long, default_value = "flux")]
    array: String,
    #[arg(long, default_value_t = 900)]
    width: u32,
    #[arg(long, default_value_t = 800)]
    height: u32,
    /// Skip caption, axis labels, and colour bar text (no fonts required).
    #[arg(long, default_value_t = false)]
    bare: bool,
}

#[derive(Debug, Clone, Copy)]
struct Cell {
    i: usize,
    j: usize,
    value: f64,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();
    let cli = Cli::parse();
    let (cells, column) = read_cells(&cli.input, &cli.array)?;

    let cols = cells.iter().map(|c| c.i + 1).max().unwrap_or(0);
    let rows = cells.iter().map(|c| c.j + 1).max().unwrap_or(0);
    if cols == 0 || rows == 0 {
        return Err(anyhow::anyhow!("No pixels in the provided CSV"));
    }

    let finite: Vec<f64> = cells
        .iter()
        .map(|c| c.value)
        .filter(|v| v.is_finite())
        .collect();
    if finite.is_empty() {
        return Err(anyhow::anyhow!(
            "Column '{}' holds no finite values to render",
            column
        ));
    }
    let min_value = finite.iter().copied().fold(f64::INFINITY, f64::min);
    let mut max_value = finite.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    if (max_value - min_value).abs() < f64::EPSILON {
        max_value = min_value + 1.0;
    }
    tracing::info!(
        column = %column,
        rows,
        cols,
        min_value,
        max_value,
        "rendering map"
    );

    if let Some(parent) = cli.output.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    let output_str = cli
        .output
        .to_str()
        .ok_or_else(|| anyhow::anyhow!("Output path contains invalid UTF-8"))?;
    let root = BitMapBackend::new(output_str, (cli.width, cli.height)).into_drawing_area();
    root.fill(&WHITE)?;

    let legend_width = 140i32;
    let (plot_area, legend_area) =
        root.split_horizontally((cli.width as i32 - legend_width).max(200));

    {
        let mut builder = ChartBuilder::on(&plot_area);
        builder.margin(20);
        if !cli.bare {
            let font_family = select_font_family();
            builder
                .caption(
                    format!("{column} map"),
                    FontDesc::new(font_family, 24.0, FontStyle::Bold),
                )
                .x_label_area_size(50)
                .y_label_area_size(60);
        }
        let mut chart = builder.build_cartesian_2d(0.0..cols as f64, 0.0..rows as f64)?;

        if !cli.bare {
            let label_font = FontDesc::new(select_font_family(), 18.0, FontStyle::Normal);
            chart
                .configure_mesh()
                .disable_mesh()
                .x_desc("x (pixel)")
                .y_desc("y (pixel)")
                .label_style(label_font)
                .x_labels(6)
                .y_labels(6)
                .x_label_formatter(&|v| format!("{v:.0}"))
                .y_label_formatter(&|v| format!("{v:.0}"))
                .draw()?;
        }

        // row 0 is drawn at the bottom, matching an origin-lower image
        chart.draw_series(cells.iter().filter(|c| c.value.is_finite()).map(|c| {
            let t = (c.value - min_value) / (max_value - min_value);
            let x0 = c.i as f64;
            let y0 = c.j as f64;
            Rectangle::new([(x0, y0), (x0 + 1.0, y0 + 1.0)], viridis(t).filled())
        }))?;
    }

    {
        let mut builder = ChartBuilder::on(&legend_area);
        builder
            .margin_left(20)
            .margin_right(20)
            .margin_top(30)
            .margin_bottom(30)
            .x_label_area_size(0);
        if !cli.bare {
            builder.y_label_area_size(70);
        }
        let mut chart = builder.build_cartesian_2d(0.0..1.0, min_value..max_value)?;

        for k in 0..300 {
            let t0 = k as f64 / 300.0;
            let t1 = (k + 1) as f64 / 300.0;
            let v0 = min_value + (max_value - min_value) * t0;
            let v1 = min_value + (max_value - min_value) * t1;
            chart.draw_series(std::iter::once(Rectangle::new(
                [(0.0, v0), (1.0, v1)],
                viridis(t0).filled(),
            )))?;
        }

        if !cli.bare {
            let label_font = FontDesc::new(select_font_family(), 18.0, FontStyle::Normal);
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_labels(0)
                .y_labels(6)
                .y_desc(column.as_str())
                .y_label_style(label_font.clone())
                .axis_desc_style(label_font)
                .y_label_formatter(&|v| format!("{v:.2}"))
                .draw()?;
        }
    }

    root.present()?;
    Ok(())
}

fn select_font_family() -> FontFamily<'static> {
    if cfg!(target_os = "macos") {
        FontFamily::Name("Helvetica")
    } else if cfg!(target_os = "windows") {
        FontFamily::Name("Arial")
    } else {
        FontFamily::Name("DejaVu Sans")
    }
}

fn read_cells(path: &str, array: &str) -> anyhow::Result<(Vec<Cell>, String)> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let headers = rdr.headers()?.clone();
    let column_idx = |name: &str| headers.iter().position(|h| h.eq_ignore_ascii_case(name));
    let i_idx = column_idx("i").ok_or_else(|| anyhow::anyhow!("CSV missing 'i' column"))?;
    let j_idx = column_idx("j").ok_or_else(|| anyhow::anyhow!("CSV missing 'j' column"))?;
    let value_idx = column_idx(array)
        .ok_or_else(|| anyhow::anyhow!("CSV missing array column matching '{}'", array))?;
    let column = headers
        .get(value_idx)
        .map(|s| s.to_string())
        .ok_or_else(|| anyhow::anyhow!("Invalid array column index"))?;

    let mut cells = Vec::new();
    for rec in rdr.records() {
        let r = rec?;
        let i: Option<usize> = r.get(i_idx).and_then(|v| v.parse().ok());
        let j: Option<usize> = r.get(j_idx).and_then(|v| v.parse().ok());
        // "nan" and "inf" parse to non-finite floats and are skipped when drawing
        let value: f64 = r.get(value_idx).unwrap_or("").parse().unwrap_or(f64::NAN);
        if let (Some(i), Some(j)) = (i, j) {
            cells.push(Cell { i, j, value });
        }
    }
    Ok((cells, column))
}

/// Piecewise-linear approximation of the viridis colormap.
fn viridis(t_in: f64) -> RGBColor {
    const STOPS: [(f64, f64, f64); 9] = [
        (68.0, 1.0, 84.0),
        (71.0, 44.0, 122.0),
        (59.0, 81.0, 139.0),
        (44.0, 113.0, 142.0),
        (33.0, 144.0, 141.0),
        (39.0, 173.0, 129.0),
        (92.0, 200.0, 99.0),
        (170.0, 220.0, 50.0),
        (253.0, 231.0, 37.0),
    ];
    let t = if t_in.is_finite() { t_in.clamp(0.0, 1.0) } else { 0.0 };
    let scaled = t * (STOPS.len() - 1) as f64;
    let lo = (scaled.floor() as usize).min(STOPS.len() - 2);
    let frac = scaled - lo as f64;
    let (r0, g0, b0) = STOPS[lo];
    let (r1, g1, b1) = STOPS[lo + 1];
    let lerp = |a: f64, b: f64| (a + (b - a) * frac).round().clamp(0.0, 255.0) as u8;
    RGBColor(lerp(r0, r1), lerp(g0, g1), lerp(b0, b1))
}
