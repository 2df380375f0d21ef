use crate::vector::Vector;

/// A local coordinate frame attached to an object.
///
/// The frame is described by an origin and three orthonormal axes. Objects
/// express their implicit equations in this frame, which keeps the algebra in
/// canonical form (a sphere at the origin, a plane at `z = 0`, and so on).
///
/// Local `x`, `y` and `z` are the projections onto `i_prime`, `j_prime` and
/// `k_prime` respectively. The orientation given on construction becomes
/// `k_prime`, the local `z` axis; the roll angle spins `i_prime` and `j_prime`
/// around it.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CoordinateSystem {
    pub origin: Vector,
    pub i_prime: Vector,
    pub j_prime: Vector,
    pub k_prime: Vector,
}

impl Default for CoordinateSystem {
    fn default() -> CoordinateSystem {
        CoordinateSystem::new(Vector::zero(), Vector::new(0.0, 0.0, 1.0), 0.0)
    }
}

impl CoordinateSystem {
    /// Creates a frame at `origin` whose local `z` axis points along
    /// `orientation`, rolled by `angle` radians.
    pub fn new(origin: Vector, orientation: Vector, angle: f64)
        -> CoordinateSystem {
        let (k_prime, i_prime, j_prime)
            = Self::unit_base_axis(orientation, angle);

        CoordinateSystem { origin, i_prime, j_prime, k_prime }
    }

    /// A frame at `origin` with the world axes.
    pub fn at(origin: Vector) -> CoordinateSystem {
        CoordinateSystem { origin, ..Default::default() }
    }

    /// Builds an orthonormal, right-handed basis whose first vector is
    /// `unit(first)`.
    ///
    /// An auxiliary axis perpendicular to `first` is chosen in the XY plane
    /// (or world X, when `first` is parallel to world Z). The two remaining
    /// axes are then rotated by `tilt` around `first`.
    pub fn unit_base_axis(first: Vector, tilt: f64)
        -> (Vector, Vector, Vector) {
        let new_i = first.unit();

        let aux_j = if new_i.x == 0.0 && new_i.y == 0.0 {
            Vector::new(1.0, 0.0, 0.0)
        } else {
            Vector::new(-new_i.y, new_i.x, 0.0).unit()
        };
        let aux_k = new_i.cross(&aux_j);

        let (sin, cos) = tilt.sin_cos();
        let new_j = aux_j * cos + aux_k * sin;
        let new_k = aux_k * cos - aux_j * sin;

        (new_i, new_j, new_k)
    }

    pub fn convert_position(&self, position: Vector) -> Vector {
        self.convert_direction(position - self.origin)
    }

    pub fn deconvert_position(&self, position: Vector) -> Vector {
        self.origin + self.deconvert_direction(position)
    }

    pub fn convert_direction(&self, direction: Vector) -> Vector {
        Vector::new(
            direction.dot(&self.i_prime),
            direction.dot(&self.j_prime),
            direction.dot(&self.k_prime),
        )
    }

    pub fn deconvert_direction(&self, direction: Vector) -> Vector {
        self.i_prime * direction.x
            + self.j_prime * direction.y
            + self.k_prime * direction.z
    }
}

#[cfg(test)]
fn assert_orthonormal(first: Vector, tilt: f64) {
    use crate::feq;

    let (i, j, k) = CoordinateSystem::unit_base_axis(first, tilt);

    assert_eq!(i, first.unit());
    assert!(feq(i.length(), 1.0));
    assert!(feq(j.length(), 1.0));
    assert!(feq(k.length(), 1.0));
    assert!(feq(i.dot(&j), 0.0));
    assert!(feq(j.dot(&k), 0.0));
    assert!(feq(k.dot(&i), 0.0));

    // Right-handed: i x j = k
    assert_eq!(i.cross(&j), k);
}

#[test]
fn base_axis_is_orthonormal_for_any_tilt() {
    let firsts = [
        Vector::new(1.0, 0.0, 0.0),
        Vector::new(0.0, 0.0, 1.0),
        Vector::new(0.0, 0.0, -3.0),
        Vector::new(80.0, -35.0, 18.0),
        Vector::new(0.0, 1.0, 1.0),
        Vector::new(-1.0, -1.0, 0.2),
    ];

    for first in firsts.iter() {
        for step in 0..16 {
            let tilt = step as f64 * std::f64::consts::PI / 8.0;
            assert_orthonormal(*first, tilt);
        }
    }
}

#[test]
fn default_frame_is_world_frame() {
    let cs: CoordinateSystem = Default::default();

    assert_eq!(cs.k_prime, Vector::new(0.0, 0.0, 1.0));
    assert_eq!(cs.i_prime, Vector::new(1.0, 0.0, 0.0));
    assert_eq!(cs.j_prime, Vector::new(0.0, 1.0, 0.0));

    let p = Vector::new(1.0, 2.0, 3.0);
    assert_eq!(cs.convert_position(p), p);
}

#[test]
fn orientation_becomes_local_z() {
    let cs = CoordinateSystem::new(
        Vector::new(1.0, 2.0, 3.0),
        Vector::new(2.0, 0.0, 0.0),
        0.0,
    );

    assert_eq!(cs.k_prime, Vector::new(1.0, 0.0, 0.0));

    // A point one unit along the orientation from the origin is at local z=1.
    let local = cs.convert_position(Vector::new(2.0, 2.0, 3.0));
    assert_eq!(local, Vector::new(0.0, 0.0, 1.0));
}

#[test]
fn conversions_round_trip() {
    let cs = CoordinateSystem::new(
        Vector::new(-1.0, 0.5, 2.0),
        Vector::new(0.0, 1.0, 1.0),
        -0.5,
    );

    let p = Vector::new(3.0, -2.0, 7.5);
    assert_eq!(cs.deconvert_position(cs.convert_position(p)), p);

    let d = Vector::new(0.3, 0.4, -0.2);
    let local = cs.convert_direction(d);
    assert_eq!(cs.deconvert_direction(local), d);
    assert!(crate::feq(local.length(), d.length()));
}
