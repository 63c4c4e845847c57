use exotrace::star::{LimbDarkening, Spot, Star, StarError, wrap_longitude};

const CENTRE: (usize, usize) = (50, 50);

fn star() -> Star {
    Star::new([0.0, 0.0, 0.0], 1.0)
        .unwrap()
        .with_resolution(101)
        .unwrap()
}

#[test]
fn disk_centre_faces_observer_at_origin() {
    let star = star();
    let centre = star.pixels()[CENTRE].expect("centre pixel is on the disk");
    assert!(centre.lat_deg.abs() < 1e-9);
    assert!(centre.lon_deg.abs() < 1e-9);
    assert!((centre.mu - 1.0).abs() < 1e-12);
    assert!((centre.r - 1.0).abs() < 1e-12);

    assert!(star.pixels()[(0, 0)].is_none());
    assert!(star.flux()[(0, 0)].is_nan());
    assert!(star.mu_map()[(0, 0)].is_nan());
}

#[test]
fn upper_rows_map_to_northern_latitudes() {
    let star = star();
    let lat = star.lat_map();
    assert!(lat[(95, 50)] > 60.0, "lat = {}", lat[(95, 50)]);
    assert!(lat[(5, 50)] < -60.0, "lat = {}", lat[(5, 50)]);
    // equator crosses the disk horizontally at inclination 90
    assert!(lat[(50, 20)].abs() < 1e-9);
}

#[test]
fn rotation_moves_meridian_and_centre_longitude() {
    let mut star = star();
    star.rotate(270.0);
    assert_eq!(star.meridian_deg(), -90.0);
    let centre = star.pixels()[CENTRE].unwrap();
    assert!((centre.lon_deg + 90.0).abs() < 1e-9, "lon = {}", centre.lon_deg);

    star.set_meridian(200.0);
    assert_eq!(star.meridian_deg(), -160.0);
    let centre = star.pixels()[CENTRE].unwrap();
    assert!((centre.lon_deg + 160.0).abs() < 1e-9);
}

#[test]
fn longitudes_wrap_into_half_open_range() {
    assert_eq!(wrap_longitude(180.0), 180.0);
    assert_eq!(wrap_longitude(-180.0), 180.0);
    assert_eq!(wrap_longitude(540.0), 180.0);
    assert_eq!(wrap_longitude(-190.0), 170.0);
    assert_eq!(wrap_longitude(45.0), 45.0);
}

#[test]
fn pole_on_star_shows_north_pole_at_centre() {
    let mut star = star();
    star.set_inclination(0.0);
    let centre = star.pixels()[CENTRE].unwrap();
    assert!((centre.lat_deg - 90.0).abs() < 1e-6);
    // every visible pixel lies in the northern hemisphere
    assert!(
        star.lat_map()
            .values()
            .filter(|v| v.is_finite())
            .all(|&lat| lat >= -1e-9)
    );
}

#[test]
fn linear_limb_darkening_with_unit_coefficient_equals_mu() {
    let star = star().with_limb_darkening(LimbDarkening::quadratic(1.0, 0.0));
    for (j, i, pixel) in star.pixels().indexed() {
        if let Some(p) = pixel {
            assert!((star.flux()[(j, i)] - p.mu).abs() < 1e-12);
        }
    }
    assert!(star.mean_flux() < 1.0);
}

#[test]
fn unspotted_undarkened_star_is_uniform() {
    let star = star();
    assert!((star.mean_flux() - 1.0).abs() < 1e-12);
}

#[test]
fn spot_darkens_centre_until_rotated_away() {
    let mut star = star();
    star.add([Spot::new(0.0, 0.0, 10.0, 0.2).unwrap()], false);
    assert!((star.flux()[CENTRE] - 0.2).abs() < 1e-12);
    assert!(star.mean_flux() < 1.0);

    star.rotate(180.0);
    assert!((star.flux()[CENTRE] - 1.0).abs() < 1e-12);
}

#[test]
fn later_spots_win_where_they_overlap() {
    let mut star = star();
    star.add(
        [
            Spot::new(0.0, 0.0, 20.0, 0.2).unwrap(),
            Spot::new(0.0, 0.0, 5.0, 0.7).unwrap(),
        ],
        false,
    );
    assert!((star.flux()[CENTRE] - 0.7).abs() < 1e-12);
}

#[test]
fn add_can_replace_existing_spots() {
    let mut star = star();
    star.add([Spot::new(10.0, 10.0, 5.0, 0.5).unwrap()], false);
    star.add([Spot::new(-10.0, 10.0, 5.0, 0.5).unwrap()], false);
    assert_eq!(star.spots().len(), 2);

    star.add([Spot::new(0.0, 0.0, 10.0, 0.1).unwrap()], true);
    assert_eq!(star.spots().len(), 1);
    assert_eq!(star.spots()[0].contrast(), 0.1);
    assert!((star.flux()[CENTRE] - 0.1).abs() < 1e-12);
}

#[test]
fn invalid_inputs_are_rejected() {
    assert_eq!(
        Star::new([0.0; 3], 0.0).unwrap_err(),
        StarError::InvalidRadius(0.0)
    );
    assert!(matches!(
        Star::new([0.0; 3], f64::NAN),
        Err(StarError::InvalidRadius(_))
    ));
    assert_eq!(
        Star::new([0.0; 3], 1.0)
            .unwrap()
            .with_resolution(1)
            .unwrap_err(),
        StarError::InvalidResolution(1)
    );
    assert_eq!(
        Star::new([0.0; 3], 1.0)
            .unwrap()
            .with_axis([0.0, 0.0, 3.0])
            .unwrap_err(),
        StarError::InvalidAxis
    );
    assert_eq!(
        Spot::new(0.0, 0.0, -1.0, 0.5).unwrap_err(),
        StarError::InvalidSpot
    );
    assert_eq!(
        Spot::new(f64::INFINITY, 0.0, 1.0, 0.5).unwrap_err(),
        StarError::InvalidSpot
    );
}

#[test]
fn spots_on_a_star_are_always_valid() {
    assert_eq!(
        Spot::new(0.0, 0.0, 5.0, f64::NAN).unwrap_err(),
        StarError::InvalidSpot
    );
    assert_eq!(
        Spot::new(0.0, 0.0, -5.0, 0.3).unwrap_err(),
        StarError::InvalidSpot
    );

    let spot = Spot::new(12.0, -40.0, 8.0, 0.6).unwrap();
    assert_eq!(
        (spot.lat_deg(), spot.lon_deg(), spot.radius_deg(), spot.contrast()),
        (12.0, -40.0, 8.0, 0.6)
    );

    let mut star = star();
    star.add([spot], false);
    assert!(star.spots().iter().all(|s| s.contrast().is_finite() && s.radius_deg() >= 0.0));
    // every on-disk pixel keeps a finite flux, so nothing drops out of the mean
    let on_disk = star.pixels().values().filter(|p| p.is_some()).count();
    let finite = star.flux().values().filter(|v| v.is_finite()).count();
    assert_eq!(on_disk, finite);
}

#[test]
fn sideways_axis_puts_pole_on_the_right() {
    let star = star().with_axis([2.0, 0.0, 0.0]).unwrap();
    assert_eq!(star.axis(), [1.0, 0.0, 0.0]);
    let lat = star.lat_map();
    assert!(lat[(50, 99)] > 70.0, "lat = {}", lat[(50, 99)]);
    assert!(lat[(50, 1)] < -70.0, "lat = {}", lat[(50, 1)]);
}

#[test]
fn intensity_combines_spots_and_limb_darkening() {
    let mut star = star().with_limb_darkening(LimbDarkening::quadratic(0.5, 0.0));
    star.add([Spot::new(0.0, 0.0, 10.0, 0.2).unwrap()], false);
    assert!((star.intensity(&[0.0, 0.0, 1.0], 1.0) - 0.2).abs() < 1e-12);
    assert!((star.intensity(&[0.0, 0.0, 1.0], 0.5) - 0.15).abs() < 1e-12);
    // the limb at the right edge is unspotted
    assert!((star.intensity(&[1.0, 0.0, 0.0], 0.0) - 0.5).abs() < 1e-12);
}

#[test]
fn moving_the_star_keeps_its_surface() {
    let mut star = star();
    let before = star.flux().clone();
    star.set_center([3.0, -1.0, 2.0]);
    assert_eq!(star.center(), [3.0, -1.0, 2.0]);
    assert_eq!(star.flux().shape(), before.shape());
    assert_eq!(star.x().len(), 101);
}
