use std::ops::{ Add, Sub, Neg, Mul };

use crate::feq;

/// A 3D vector, used both for positions and for directions.
#[derive(Debug, Default, Copy, Clone, PartialOrd)]
pub struct Vector {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PartialEq for Vector {
    fn eq(&self, other: &Vector) -> bool {
        feq(self.x, other.x) &&
            feq(self.y, other.y) &&
            feq(self.z, other.z)
    }
}

impl From<&Vec<f64>> for Vector {
    fn from(v: &Vec<f64>) -> Vector {
        match v.len() {
            0 => Default::default(),
            1 => Vector { x: v[0], ..Default::default() },
            2 => Vector { x: v[0], y: v[1], ..Default::default() },
            _ => Vector { x: v[0], y: v[1], z: v[2] }
        }
    }
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Vector {
        Vector { x, y, z }
    }

    pub const fn zero() -> Vector {
        Vector { x: 0.0, y: 0.0, z: 0.0 }
    }

    pub fn length_sq(&self) -> f64 {
        self.x.powi(2) + self.y.powi(2) + self.z.powi(2)
    }

    pub fn length(&self) -> f64 {
        self.length_sq().sqrt()
    }

    /// Returns a unit-length copy of this vector.
    ///
    /// A zero vector has no direction; its "unit" vector is made of NaNs.
    pub fn unit(&self) -> Vector {
        let mag = self.length();

        Vector {
            x: self.x / mag,
            y: self.y / mag,
            z: self.z / mag,
        }
    }

    pub fn dot(&self, other: &Vector) -> f64 {
        self.x * other.x
            + self.y * other.y
            + self.z * other.z
    }

    pub fn cross(&self, other: &Vector) -> Vector {
        Vector {
            x: self.y * other.z - self.z * other.y,
            y: self.z * other.x - self.x * other.z,
            z: self.x * other.y - self.y * other.x,
        }
    }

    /// Mirrors a vector about an axis.
    ///
    /// The result keeps the component of `self` along `axis` and negates the
    /// perpendicular part, i.e. `2 (v·n) n - v` for a unit `axis`. Reflecting
    /// the direction *towards* a light yields the direction of the reflected
    /// light; the mirror bounce of an incoming ray is the negation of this.
    ///
    /// ```
    /// # use quadric_ray_tracer::vector::Vector;
    /// let v = Vector::new(1.0, 1.0, 0.0);
    /// let n = Vector::new(0.0, 1.0, 0.0);
    /// assert_eq!(v.reflect_about(&n), Vector::new(-1.0, 1.0, 0.0));
    /// ```
    pub fn reflect_about(&self, axis: &Vector) -> Vector {
        *axis * (2.0 * self.dot(axis)) - *self
    }

    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self {
            x: self.x + other.x,
            y: self.y + other.y,
            z: self.z + other.z,
        }
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, other: Self) -> Self {
        Self {
            x: self.x - other.x,
            y: self.y - other.y,
            z: self.z - other.z,
        }
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self {
        Self {
            x: -self.x,
            y: -self.y,
            z: -self.z,
        }
    }
}

/// Implements scalar right-multiplication for a vector.
///
/// ```
/// use quadric_ray_tracer::vector::Vector;
///
/// let v = Vector::new(1.0, 2.0, 3.0);
/// assert_eq!(v * 2.0, Vector::new(2.0, 4.0, 6.0));
/// ```
impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, other: f64) -> Self {
        Self {
            x: self.x * other,
            y: self.y * other,
            z: self.z * other,
        }
    }
}

/// Implements scalar left-multiplication for a vector.
impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, other: Vector) -> Vector {
        Vector {
            x: self * other.x,
            y: self * other.y,
            z: self * other.z,
        }
    }
}

/* Tests */

#[test]
fn add_vectors() {
    let a1 = Vector::new(3.0, -2.0, 5.0);
    let a2 = Vector::new(-2.0, 3.0, 1.0);

    assert_eq!(a1 + a2, Vector::new(1.0, 1.0, 6.0));
}

#[test]
fn sub_vectors() {
    let p1 = Vector::new(3.0, 2.0, 1.0);
    let p2 = Vector::new(5.0, 6.0, 7.0);

    assert_eq!(p1 - p2, Vector::new(-2.0, -4.0, -6.0));
}

#[test]
fn neg_vector() {
    let a = Vector::new(1.0, -2.0, 3.0);

    assert_eq!(-a, Vector::new(-1.0, 2.0, -3.0));
}

#[test]
fn mul_scalar_both_sides() {
    let a = Vector::new(1.0, -2.0, 3.0);

    assert_eq!(a * 3.5, Vector::new(3.5, -7.0, 10.5));
    assert_eq!(0.5 * a, Vector::new(0.5, -1.0, 1.5));
}

#[test]
fn length_of_vectors() {
    let v = Vector::new(-1.0, -2.0, -3.0);

    assert_eq!(v.length_sq(), 14.0);
    assert!(crate::feq(v.length(), f64::sqrt(14.0)));
}

#[test]
fn unit_vectors() {
    let v = Vector::new(1.0, 2.0, 3.0);
    let e = Vector::new(
        1.0 / f64::sqrt(14.0),
        2.0 / f64::sqrt(14.0),
        3.0 / f64::sqrt(14.0)
    );

    assert_eq!(Vector::new(4.0, 0.0, 0.0).unit(), Vector::new(1.0, 0.0, 0.0));
    assert_eq!(v.unit(), e);
}

#[test]
fn unit_of_zero_vector_is_not_finite() {
    assert!(!Vector::zero().unit().is_finite());
}

#[test]
fn dot_and_cross() {
    let a = Vector::new(1.0, 2.0, 3.0);
    let b = Vector::new(2.0, 3.0, 4.0);

    assert_eq!(a.dot(&b), 20.0);
    assert_eq!(a.cross(&b), Vector::new(-1.0, 2.0, -1.0));
    assert_eq!(b.cross(&a), Vector::new(1.0, -2.0, 1.0));
}

#[test]
fn reflect_about_normal() {
    // Light arriving at 45 degrees leaves at 45 degrees on the other side.
    let to_light = Vector::new(1.0, 1.0, 0.0);
    let n = Vector::new(0.0, 1.0, 0.0);

    assert_eq!(to_light.reflect_about(&n), Vector::new(-1.0, 1.0, 0.0));

    // The mirror bounce of a ray is the negated reflection.
    let incoming = Vector::new(1.0, -1.0, 0.0);
    assert_eq!(-incoming.reflect_about(&n), Vector::new(1.0, 1.0, 0.0));
}
