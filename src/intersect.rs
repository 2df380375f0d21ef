use crate::consts::MIN_DIST;
use crate::vector::Vector;
use crate::ray::Ray;
use crate::material::Material;
use crate::shape::Shape;

/// A small chip of a surface: where a ray hit, which way the surface faces
/// there, and what it is made of.
///
/// Chips are created fresh for every hit and thrown away once the hit has
/// been shaded. Both `position` and `normal` are in world space; `normal` is
/// unit length.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Chip {
    pub position: Vector,
    pub normal: Vector,
    pub material: Material,
}

/// Real roots of `a t^2 + b t + c = 0`, in ascending order.
///
/// Only an exactly zero `a` falls back to the linear equation `b t + c = 0`;
/// tiny coefficients (from very large shapes) are still quadratics.
fn real_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    if a == 0.0 {
        if b == 0.0 {
            return Vec::new();
        }

        return vec![-c / b];
    }

    let discriminant = b.powi(2) - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    // Both roots from `q`, which never subtracts nearly equal numbers.
    let q = -0.5 * (b + b.signum() * discriminant.sqrt());
    if q == 0.0 {
        return vec![0.0, 0.0];
    }

    let mut t0 = q / a;
    let mut t1 = c / q;

    if t0 > t1 {
        std::mem::swap(&mut t0, &mut t1);
    }

    vec![t0, t1]
}

/// All roots of `a t^2 + b t + c = 0` beyond `MIN_DIST`, smallest first.
///
/// Roots at or below `MIN_DIST` are dropped: those are the surface a ray
/// starts from, seen again through floating point noise.
pub fn all_pos_roots(a: f64, b: f64, c: f64) -> Vec<f64> {
    real_roots(a, b, c).into_iter().filter(|&t| t > MIN_DIST).collect()
}

/// The smallest root of `a t^2 + b t + c = 0` beyond `MIN_DIST`, if any.
pub fn min_pos_root(a: f64, b: f64, c: f64) -> Option<f64> {
    real_roots(a, b, c).into_iter().find(|&t| t > MIN_DIST)
}

/// Distance along `ray` to the first point where it meets `shape`.
///
/// The ray is converted to the shape's local frame, where the shape's own
/// equation is solved. Frames are orthonormal, so distances are the same in
/// both spaces.
pub fn intersection_distance(shape: &Shape, ray: &Ray) -> Option<f64> {
    let p0 = shape.frame.convert_position(ray.origin);
    let dir = shape.frame.convert_direction(ray.direction);

    shape.local_intersect(p0, dir)
}

/// Samples the surface of `shape` at a world-space `position`.
pub fn chip_at(shape: &Shape, position: Vector) -> Chip {
    let local = shape.frame.convert_position(position);
    let normal = shape.frame.deconvert_direction(shape.local_normal_at(local));
    let material = shape.local_material_at(local);

    Chip { position, normal, material }
}

#[test]
fn min_pos_root_of_two_roots() {
    // t^2 - 4 = 0, roots -2 and 2
    assert_eq!(min_pos_root(1.0, 0.0, -4.0), Some(2.0));

    // (t - 1)(t - 3) = t^2 - 4t + 3
    assert_eq!(min_pos_root(1.0, -4.0, 3.0), Some(1.0));

    // Same roots with a negative leading coefficient.
    assert_eq!(min_pos_root(-1.0, 4.0, -3.0), Some(1.0));
}

#[test]
fn min_pos_root_without_real_roots() {
    assert_eq!(min_pos_root(1.0, 0.0, 4.0), None);
}

#[test]
fn min_pos_root_linear_fallback() {
    assert_eq!(min_pos_root(0.0, 2.0, -4.0), Some(2.0));
    assert_eq!(min_pos_root(0.0, 2.0, 4.0), None);
    assert_eq!(min_pos_root(0.0, 0.0, 4.0), None);
}

#[test]
fn tiny_leading_coefficient_is_still_quadratic() {
    // (t - 9.5e8)(t - 1.05e9) scaled by 1e-16
    let t = min_pos_root(1e-16, -2e-7, 99.75).unwrap();
    assert!((t - 9.5e8).abs() < 1.0);
}

#[test]
fn roots_near_zero_are_discarded() {
    // t (t - 5) = 0: the root at the origin is the surface itself.
    assert_eq!(min_pos_root(1.0, -5.0, 0.0), Some(5.0));

    // Both roots behind the ray.
    assert_eq!(min_pos_root(1.0, 5.0, 6.0), None);
}

#[test]
fn all_pos_roots_ascending() {
    assert_eq!(all_pos_roots(1.0, -4.0, 3.0), vec![1.0, 3.0]);
    assert_eq!(all_pos_roots(-1.0, 4.0, -3.0), vec![1.0, 3.0]);
    assert_eq!(all_pos_roots(1.0, 0.0, -4.0), vec![2.0]);
    assert!(all_pos_roots(1.0, 0.0, 4.0).is_empty());
}
