use crate::vector::Vector;

/// A ray of light, starting at `origin` and heading along `direction`.
///
/// The direction is normalized on construction, so `t` in `position` is always
/// a distance.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Ray {
    pub origin: Vector,
    pub direction: Vector,
}

impl Ray {
    pub fn new(origin: Vector, direction: Vector) -> Ray {
        Ray { origin, direction: direction.unit() }
    }

    pub fn position(&self, t: f64) -> Vector {
        self.origin + (t * self.direction)
    }
}

#[test]
fn ray_position() {
    let r = Ray::new(
                Vector::new(2.0, 3.0, 4.0),
                Vector::new(1.0, 0.0, 0.0)
            );

    assert_eq!(r.position(0.0), Vector::new(2.0, 3.0, 4.0));
    assert_eq!(r.position(1.0), Vector::new(3.0, 3.0, 4.0));
    assert_eq!(r.position(-1.0), Vector::new(1.0, 3.0, 4.0));
    assert_eq!(r.position(2.5), Vector::new(4.5, 3.0, 4.0));
}

#[test]
fn ray_direction_is_normalized() {
    let directions = [
        Vector::new(5.0, 0.0, 0.0),
        Vector::new(0.001, -0.002, 0.0),
        Vector::new(-3.0, 4.0, 12.0),
    ];

    for d in directions.iter() {
        let r = Ray::new(Vector::zero(), *d);
        assert!(crate::feq(r.direction.length(), 1.0));
    }

    let r = Ray::new(Vector::zero(), Vector::new(0.0, 0.0, 10.0));
    assert_eq!(r.position(2.0), Vector::new(0.0, 0.0, 2.0));
}
