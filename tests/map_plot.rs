use assert_cmd::Command;
use predicates::str::contains;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

fn write_map_csv(path: &Path) {
    let mut file = File::create(path).expect("csv create");
    writeln!(file, "i,j,x,y,body,t,mu,flux").unwrap();
    for j in 0..4 {
        for i in 0..4 {
            let x = -1.0 + i as f64 * 2.0 / 3.0;
            let y = -1.0 + j as f64 * 2.0 / 3.0;
            if x * x + y * y > 1.0 {
                writeln!(file, "{i},{j},{x:.6},{y:.6},,inf,nan,nan").unwrap();
            } else {
                let mu = (1.0 - x * x - y * y).sqrt();
                writeln!(file, "{i},{j},{x:.6},{y:.6},host,{:.6},{mu:.6},{mu:.6}", 1.0 - mu)
                    .unwrap();
            }
        }
    }
}

#[test]
fn map_plot_renders_png() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("scene.csv");
    let png_path = dir.path().join("plots").join("scene.png");
    write_map_csv(&csv_path);

    Command::cargo_bin("map_plot")
        .expect("map_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--array",
            "mu",
            "--width",
            "400",
            "--height",
            "300",
            "--bare",
        ])
        .assert()
        .success();

    let metadata = fs::metadata(png_path).expect("png metadata");
    assert!(metadata.len() > 0, "PNG output should not be empty");
}

#[test]
fn map_plot_rejects_unknown_column() {
    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("scene.csv");
    write_map_csv(&csv_path);

    Command::cargo_bin("map_plot")
        .expect("map_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            dir.path().join("out.png").to_str().unwrap(),
            "--array",
            "temperature",
            "--bare",
        ])
        .assert()
        .failure()
        .stderr(contains("missing array column"));
}

#[test]
fn map_plot_reads_quoted_body_names() {
    use exotrace::export::map::{SceneRecord, write_scene_header, writer_for_path};

    let dir = tempfile::tempdir().expect("tempdir");
    let csv_path = dir.path().join("pair.csv");
    let png_path = dir.path().join("pair.png");

    let mut writer = writer_for_path(&csv_path).expect("csv writer");
    write_scene_header(&mut writer).unwrap();
    for j in 0..3 {
        for i in 0..3 {
            let record = SceneRecord {
                i,
                j,
                x: i as f64,
                y: j as f64,
                body: "host, A",
                t: 0.5,
                mu: 0.8,
                flux: 0.1 * (i + j) as f64,
            };
            record.write_to(&mut writer).unwrap();
        }
    }
    writer.flush().unwrap();
    drop(writer);

    let contents = fs::read_to_string(&csv_path).unwrap();
    assert!(contents.contains("\"host, A\""), "{contents}");

    Command::cargo_bin("map_plot")
        .expect("map_plot bin")
        .args([
            "--input",
            csv_path.to_str().unwrap(),
            "--output",
            png_path.to_str().unwrap(),
            "--width",
            "300",
            "--height",
            "300",
            "--bare",
        ])
        .assert()
        .success();
    assert!(fs::metadata(png_path).expect("png metadata").len() > 0);
}
