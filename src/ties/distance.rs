use geo::Point;

/// Earth radius used to scale arcs to miles.
pub const EARTH_RADIUS_MILES: f64 = 3960.0;

/// Great-circle distance in miles between two lon/lat points, by the
/// spherical law of cosines.
///
/// Latitude and longitude become spherical angles (`phi = 90 deg - lat`,
/// `theta = lon`), and the arc is `acos(sin phi1 sin phi2 cos(theta1 -
/// theta2) + cos phi1 cos phi2)`. Rounding can push the cosine just past
/// one for near-identical points, so it is clamped before `acos` to keep
/// the result out of NaN territory.
pub fn great_circle_miles(a: Point<f64>, b: Point<f64>) -> f64 {
    let phi1 = (90.0 - a.y()).to_radians();
    let phi2 = (90.0 - b.y()).to_radians();
    let theta1 = a.x().to_radians();
    let theta2 = b.x().to_radians();

    let cos = phi1.sin() * phi2.sin() * (theta1 - theta2).cos() + phi1.cos() * phi2.cos();
    cos.clamp(-1.0, 1.0).acos() * EARTH_RADIUS_MILES
}
