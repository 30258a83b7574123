//! Shared coordinate and index types.

/// 2-D coordinate in domain (pupil) or image space.
pub type Point2 = nalgebra::Point2<f64>;

/// 2-D displacement.
pub type Vector2 = nalgebra::Vector2<f64>;

/// Vertex indices of one triangle, counter-clockwise in domain space.
pub type Simplex = [usize; 3];

/// Ray-trace mapping bound to one parameter set: domain points in, image
/// points out, same length. Failed traces are non-finite coordinates.
pub type Mapping<'a> = dyn Fn(&[Point2]) -> Vec<Point2> + 'a;

/// Signed area of the triangle `(a, b, c)`, positive for counter-clockwise
/// vertex order.
pub fn signed_area(a: &Point2, b: &Point2, c: &Point2) -> f64 {
    0.5 * (b - a).perp(&(c - a))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signed_area_orientation() {
        let a = Point2::new(0.0, 0.0);
        let b = Point2::new(1.0, 0.0);
        let c = Point2::new(0.0, 1.0);
        assert_eq!(signed_area(&a, &b, &c), 0.5);
        assert_eq!(signed_area(&a, &c, &b), -0.5);
    }
}
