use exotrace::lightcurve::{self, LightCurveError};
use exotrace::raytrace::{Planet, Scene, TraceError};
use exotrace::star::{LimbDarkening, Spot, Star};

fn spotted_star() -> Star {
    let mut star = Star::new([0.0, 0.0, 0.0], 1.0)
        .unwrap()
        .with_name("host")
        .with_resolution(61)
        .unwrap();
    star.add([Spot::new(0.0, 0.0, 30.0, 0.1).unwrap()], false);
    star
}

#[test]
fn rotational_curve_dims_when_spot_faces_observer() {
    let mut star = spotted_star();
    let samples = lightcurve::rotational(&mut star, 4).unwrap();
    assert_eq!(samples.len(), 4);

    let meridians: Vec<f64> = samples.iter().map(|s| s.meridian_deg).collect();
    assert_eq!(meridians, vec![0.0, 90.0, 180.0, -90.0]);
    let phases: Vec<f64> = samples.iter().map(|s| s.phase_deg).collect();
    assert_eq!(phases, vec![0.0, 90.0, 180.0, 270.0]);

    // spot on the far side: the whole disk is clean photosphere
    assert_eq!(samples[2].flux, 1.0);
    assert_eq!(samples[2].relative_flux, 1.0);
    assert!(samples[0].flux < samples[1].flux);
    assert!(samples[1].flux < samples[2].flux);
    assert!((samples[1].flux - samples[3].flux).abs() < 5e-3);

    assert_eq!(star.meridian_deg(), 0.0);
    assert!((star.flux()[(30, 30)] - 0.1).abs() < 1e-12);
}

#[test]
fn rotational_curve_needs_samples() {
    let mut star = spotted_star();
    assert_eq!(
        lightcurve::rotational(&mut star, 0).unwrap_err(),
        LightCurveError::NoSamples
    );
}

#[test]
fn straight_path_includes_endpoints() {
    let path = lightcurve::straight_path([0.0, 0.0, 0.0], [1.0, 2.0, 3.0], 3);
    assert_eq!(path, vec![[0.0, 0.0, 0.0], [0.5, 1.0, 1.5], [1.0, 2.0, 3.0]]);
    assert!(lightcurve::straight_path([0.0; 3], [1.0; 3], 0).is_empty());
}

fn transit_scene() -> Scene {
    let mut scene = Scene::new(101).unwrap();
    scene.add(Star::new([0.0, 0.0, 0.0], 1.0).unwrap().with_name("host"));
    scene.add(Planet::new("b", [5.0, 5.0, 3.0], 0.2).unwrap());
    scene
}

#[test]
fn transit_curve_dips_while_planet_crosses() {
    let mut scene = transit_scene();
    let path = lightcurve::straight_path([-2.0, 0.0, 3.0], [2.0, 0.0, 3.0], 9);
    let samples = lightcurve::transit(&mut scene, 1, &path).unwrap();
    assert_eq!(samples.len(), 9);

    // off the disk the planet must not change the integrated flux at all
    for sample in [&samples[0], &samples[1], &samples[7], &samples[8]] {
        assert!(
            (sample.relative_flux - 1.0).abs() < 1e-9,
            "x = {}: {}",
            sample.position[0],
            sample.relative_flux
        );
    }

    let mid = &samples[4];
    assert_eq!(mid.position, [0.0, 0.0, 3.0]);
    assert!(
        mid.relative_flux > 0.94 && mid.relative_flux < 0.975,
        "mid = {}",
        mid.relative_flux
    );

    // planet is put back where it started
    assert_eq!(scene.body(1).unwrap().center(), [5.0, 5.0, 3.0]);
    assert_eq!(scene.framing(), None);
    assert_eq!(scene.extent(), (-1.0, 5.2));
}

#[test]
fn transit_depth_matches_area_ratio() {
    let mut scene = Scene::new(201).unwrap();
    scene.add(
        Star::new([0.0, 0.0, 0.0], 1.0)
            .unwrap()
            .with_limb_darkening(LimbDarkening::quadratic(0.4, 0.2)),
    );
    scene.add(Planet::new("b", [0.0, 0.0, 4.0], 0.1).unwrap());

    // far-away stretch first, then one sample dead centre
    let mut path = lightcurve::straight_path([1.5, 0.0, 4.0], [8.0, 0.0, 4.0], 6);
    path.push([0.0, 0.0, 4.0]);
    let samples = lightcurve::transit(&mut scene, 1, &path).unwrap();

    let out_of_transit: Vec<f64> = samples[..6].iter().map(|s| s.relative_flux).collect();
    for value in &out_of_transit {
        assert!((value - 1.0).abs() < 1e-9, "out of transit: {out_of_transit:?}");
    }

    // uniform star: depth k^2 = 0.01; darkening brightens the centre so the
    // dip is deeper by I(1) / <I>
    let mean_intensity = 1.0 - 0.4 / 3.0 - 0.2 / 6.0;
    let expected = 0.01 / mean_intensity;
    let depth = 1.0 - samples[6].relative_flux;
    assert!(
        (depth - expected).abs() < 0.06 * expected,
        "depth = {depth}, expected = {expected}"
    );
}

#[test]
fn uniform_star_transit_depth_is_area_ratio() {
    let mut scene = Scene::new(201).unwrap();
    scene.add(Star::new([0.0, 0.0, 0.0], 1.0).unwrap());
    scene.add(Planet::new("b", [3.0, 0.0, 4.0], 0.1).unwrap());
    let samples = lightcurve::transit(&mut scene, 1, &[[0.0, 0.0, 4.0]]).unwrap();
    let depth = 1.0 - samples[0].relative_flux;
    assert!((depth - 0.01).abs() < 0.001, "depth = {depth}");
}

#[test]
fn transit_rejects_bad_targets() {
    let mut scene = transit_scene();
    let path = lightcurve::straight_path([-2.0, 0.0, 3.0], [2.0, 0.0, 3.0], 3);

    assert_eq!(
        lightcurve::transit(&mut scene, 0, &path).unwrap_err(),
        LightCurveError::NotAPlanet("host".to_string())
    );
    assert_eq!(
        lightcurve::transit(&mut scene, 7, &path).unwrap_err(),
        LightCurveError::Trace(TraceError::UnknownBody(7))
    );
    assert_eq!(
        lightcurve::transit(&mut scene, 1, &[]).unwrap_err(),
        LightCurveError::NoSamples
    );

    let mut dark = Scene::new(10).unwrap();
    dark.add(Planet::new("lonely", [0.0; 3], 1.0).unwrap());
    assert_eq!(
        lightcurve::transit(&mut dark, 0, &path).unwrap_err(),
        LightCurveError::ZeroBaseline
    );
}
