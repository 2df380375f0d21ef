use crate::consts::MIN_DIST;
use crate::vector::Vector;
use crate::ray::Ray;
use crate::material::Material;
use crate::pattern::Surface;
use crate::coordinate_system::CoordinateSystem;
use crate::intersect::{ Chip, min_pos_root, all_pos_roots };

/// The geometry of a shape, expressed in its local frame.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum ShapeType {
    /// A sphere centered at the local origin.
    Sphere { radius: f64 },

    /// An ellipsoid centered at the local origin, with semi-axes scaled by
    /// `width`, `length` and `height` along local X, Y and Z.
    ///
    /// The surface is `(x/w)^2 + (y/l)^2 + (z/h)^2 = 0.25`, so a unit
    /// ellipsoid has a *diameter* of 1 along each axis.
    Ellipsoid { width: f64, length: f64, height: f64 },

    /// The paraboloid `z = a x^2 + b y^2`, optionally clipped to
    /// `-z_max <= z <= z_max`. A `z_max` of 0 leaves it unclipped.
    Paraboloid { a: f64, b: f64, z_max: Option<f64> },

    /// The plane `z = 0`, optionally bounded to a `width` (along X) by
    /// `length` (along Y) rectangle centered at the local origin.
    Plane { width: Option<f64>, length: Option<f64> },
}

/// A solid object in a scene.
///
/// A shape is a piece of geometry (`ty`), placed and oriented in the world by
/// its `frame`, and painted by its `surface`. All of the shape-specific math
/// happens in the local frame; `intersect::intersection_distance` and
/// `intersect::chip_at` convert to and from world space.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Shape {
    pub ty: ShapeType,
    pub surface: Surface,
    pub frame: CoordinateSystem,
}

impl Shape {
    pub fn new(ty: ShapeType, surface: Surface, frame: CoordinateSystem)
        -> Shape {
        Shape { ty, surface, frame }
    }

    /// Creates a sphere with a single material, centered at `center`.
    pub fn smooth_sphere(center: Vector, radius: f64, material: Material)
        -> Shape {
        Shape {
            ty: ShapeType::Sphere { radius },
            surface: Surface::Uniform(material),
            frame: CoordinateSystem::at(center),
        }
    }

    /// Creates a striped beach ball. Its poles lie along the frame's Z axis.
    pub fn beach_ball(frame: CoordinateSystem, radius: f64) -> Shape {
        Shape {
            ty: ShapeType::Sphere { radius },
            surface: Surface::BeachBall,
            frame,
        }
    }

    pub fn ellipsoid(frame: CoordinateSystem, material: Material,
        width: f64, length: f64, height: f64) -> Shape {
        Shape {
            ty: ShapeType::Ellipsoid { width, length, height },
            surface: Surface::Uniform(material),
            frame,
        }
    }

    pub fn paraboloid(frame: CoordinateSystem, material: Material,
        a: f64, b: f64, z_max: Option<f64>) -> Shape {
        Shape {
            ty: ShapeType::Paraboloid { a, b, z_max },
            surface: Surface::Uniform(material),
            frame,
        }
    }

    /// Creates a plane through the frame origin, facing along the frame's Z
    /// axis.
    pub fn plane(frame: CoordinateSystem, material: Material,
        width: Option<f64>, length: Option<f64>) -> Shape {
        Shape {
            ty: ShapeType::Plane { width, length },
            surface: Surface::Uniform(material),
            frame,
        }
    }

    /// Creates a plane with a light and dark checkerboard.
    pub fn checkered_plane(frame: CoordinateSystem, cell_size: f64,
        width: Option<f64>, length: Option<f64>) -> Shape {
        Shape {
            ty: ShapeType::Plane { width, length },
            surface: Surface::checkered(cell_size),
            frame,
        }
    }

    /// See `intersect::intersection_distance`.
    pub fn intersection_distance(&self, ray: &Ray) -> Option<f64> {
        crate::intersect::intersection_distance(self, ray)
    }

    /// See `intersect::chip_at`.
    pub fn chip_at(&self, position: Vector) -> Chip {
        crate::intersect::chip_at(self, position)
    }

    /// Intersects a local-space ray with the shape.
    ///
    /// `dir` is expected to be a unit vector.
    pub fn local_intersect(&self, p0: Vector, dir: Vector) -> Option<f64> {
        match self.ty {
            ShapeType::Sphere { radius } =>
                Self::intersect_sphere(radius, p0, dir),
            ShapeType::Ellipsoid { width, length, height } =>
                Self::intersect_ellipsoid(width, length, height, p0, dir),
            ShapeType::Paraboloid { a, b, z_max } =>
                Self::intersect_paraboloid(a, b, z_max, p0, dir),
            ShapeType::Plane { width, length } =>
                Self::intersect_plane(width, length, p0, dir),
        }
    }

    /// Obtains the unit normal of the shape at a local-space point.
    pub fn local_normal_at(&self, at: Vector) -> Vector {
        match self.ty {
            ShapeType::Sphere { .. } => at.unit(),
            ShapeType::Ellipsoid { width, length, height } => Vector::new(
                at.x / width.powi(2),
                at.y / length.powi(2),
                at.z / height.powi(2),
            ).unit(),
            ShapeType::Paraboloid { a, b, .. } =>
                Vector::new(2.0 * a * at.x, 2.0 * b * at.y, -1.0).unit(),
            ShapeType::Plane { .. } => Vector::new(0.0, 0.0, 1.0),
        }
    }

    /// Obtains the material of the shape at a local-space point.
    pub fn local_material_at(&self, at: Vector) -> Material {
        self.surface.material_at(at)
    }

    fn intersect_sphere(radius: f64, p0: Vector, dir: Vector) -> Option<f64> {
        // `a` is the squared length of the direction, which is unit.
        let b = 2.0 * dir.dot(&p0);
        let c = p0.length_sq() - radius * radius;

        min_pos_root(1.0, b, c)
    }

    fn intersect_ellipsoid(width: f64, length: f64, height: f64,
        p0: Vector, dir: Vector) -> Option<f64> {
        let a = (dir.x / width).powi(2)
              + (dir.y / length).powi(2)
              + (dir.z / height).powi(2);

        let b = 2.0 * (p0.x * dir.x / width.powi(2)
                     + p0.y * dir.y / length.powi(2)
                     + p0.z * dir.z / height.powi(2));

        let c = (p0.x / width).powi(2)
              + (p0.y / length).powi(2)
              + (p0.z / height).powi(2)
              - 0.25;

        min_pos_root(a, b, c)
    }

    fn intersect_paraboloid(a: f64, b: f64, z_max: Option<f64>,
        p0: Vector, dir: Vector) -> Option<f64> {
        let aux_a = a * dir.x.powi(2) + b * dir.y.powi(2);
        let aux_b = 2.0 * (a * p0.x * dir.x + b * p0.y * dir.y) - dir.z;
        let aux_c = a * p0.x.powi(2) + b * p0.y.powi(2) - p0.z;

        let roots = all_pos_roots(aux_a, aux_b, aux_c);

        // A clipped paraboloid can be entered outside the clip and exited
        // inside it, so every root is checked in order.
        match z_max {
            Some(z_max) if z_max != 0.0 => roots.into_iter().find(|t| {
                let z = p0.z + t * dir.z;
                -z_max <= z && z <= z_max
            }),
            _ => roots.first().copied(),
        }
    }

    fn intersect_plane(width: Option<f64>, length: Option<f64>,
        p0: Vector, dir: Vector) -> Option<f64> {
        // A ray parallel to the plane never meets it.
        if dir.z == 0.0 {
            return None;
        }

        let t = -p0.z / dir.z;
        if t <= MIN_DIST {
            return None;
        }

        if let Some(width) = width {
            let x = p0.x + t * dir.x;
            if x < -width / 2.0 || x > width / 2.0 {
                return None;
            }
        }

        if let Some(length) = length {
            let y = p0.y + t * dir.y;
            if y < -length / 2.0 || y > length / 2.0 {
                return None;
            }
        }

        Some(t)
    }
}

#[cfg(test)]
fn unit_sphere_at_origin(radius: f64) -> Shape {
    Shape::smooth_sphere(Vector::zero(), radius, Default::default())
}

#[test]
fn ray_hits_sphere_at_front() {
    let s = unit_sphere_at_origin(2.0);
    let r = Ray::new(Vector::new(10.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0));

    assert_eq!(s.intersection_distance(&r), Some(8.0));
}

#[test]
fn ray_pointing_away_misses_sphere() {
    let s = unit_sphere_at_origin(2.0);
    let r = Ray::new(Vector::new(10.0, 0.0, 0.0), Vector::new(1.0, 0.0, 0.0));

    assert_eq!(s.intersection_distance(&r), None);
}

#[test]
fn ray_inside_sphere_hits_far_side() {
    let s = unit_sphere_at_origin(2.0);
    let r = Ray::new(Vector::new(0.0, 0.0, 0.0), Vector::new(0.0, 3.0, 0.0));

    assert_eq!(s.intersection_distance(&r), Some(2.0));
}

#[test]
fn ray_misses_offset_sphere() {
    let s = Shape::smooth_sphere(Vector::new(0.0, 5.0, 0.0), 1.0,
        Default::default());
    let r = Ray::new(Vector::new(10.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0));

    assert_eq!(s.intersection_distance(&r), None);

    let r = Ray::new(Vector::new(10.0, 5.0, 0.0), Vector::new(-1.0, 0.0, 0.0));
    assert!(crate::feq(s.intersection_distance(&r).unwrap(), 9.0));
}

#[test]
fn normal_on_sphere() {
    let s = Shape::smooth_sphere(Vector::new(1.0, 1.0, 1.0), 2.0,
        Default::default());

    let chip = s.chip_at(Vector::new(1.0, 1.0, 3.0));
    assert_eq!(chip.normal, Vector::new(0.0, 0.0, 1.0));
    assert_eq!(chip.position, Vector::new(1.0, 1.0, 3.0));

    let chip = s.chip_at(Vector::new(1.0, -1.0, 1.0));
    assert_eq!(chip.normal, Vector::new(0.0, -1.0, 0.0));
}

#[test]
fn unit_ellipsoid_has_half_unit_radius() {
    let e = Shape::ellipsoid(Default::default(), Default::default(),
        1.0, 1.0, 1.0);
    let r = Ray::new(Vector::new(10.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0));

    assert!(crate::feq(e.intersection_distance(&r).unwrap(), 9.5));
}

#[test]
fn ellipsoid_scales_per_axis() {
    let e = Shape::ellipsoid(Default::default(), Default::default(),
        2.0, 1.0, 4.0);

    let along_x = Ray::new(Vector::new(10.0, 0.0, 0.0),
        Vector::new(-1.0, 0.0, 0.0));
    let along_z = Ray::new(Vector::new(0.0, 0.0, 10.0),
        Vector::new(0.0, 0.0, -1.0));

    assert!(crate::feq(e.intersection_distance(&along_x).unwrap(), 9.0));
    assert!(crate::feq(e.intersection_distance(&along_z).unwrap(), 8.0));
}

#[test]
fn huge_ellipsoid_is_hit_at_its_surface() {
    let e = Shape::ellipsoid(Default::default(), Default::default(),
        1e8, 1e8, 1e8);
    let r = Ray::new(Vector::new(1e9, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0));

    // The surface is at x = 5e7.
    let t = e.intersection_distance(&r).unwrap();
    assert!((t - 9.5e8).abs() < 1.0);
}

#[test]
fn normal_on_ellipsoid() {
    let e = Shape::ellipsoid(Default::default(), Default::default(),
        2.0, 1.0, 1.0);

    assert_eq!(e.local_normal_at(Vector::new(1.0, 0.0, 0.0)),
        Vector::new(1.0, 0.0, 0.0));

    let n = e.local_normal_at(Vector::new(0.5, 0.25, 0.0));
    assert_eq!(n, Vector::new(0.125, 0.25, 0.0).unit());
}

#[test]
fn ray_down_the_axis_hits_paraboloid_vertex() {
    let p = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, None);
    let r = Ray::new(Vector::new(0.0, 0.0, -3.0), Vector::new(0.0, 0.0, 1.0));

    assert!(crate::feq(p.intersection_distance(&r).unwrap(), 3.0));
}

#[test]
fn clipped_paraboloid_skips_entry_outside_clip() {
    // The ray crosses z = x^2 at x = -0.5 -+ sqrt(7)/2; the first crossing is
    // far above the clip, the second one is inside it.
    let origin = Vector::new(-2.5, 0.0, 4.0);
    let dir = Vector::new(1.0, 0.0, -1.0);
    let r = Ray::new(origin, dir);

    let open = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, None);
    let clipped = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, Some(1.0));

    let first = (2.0 - 7f64.sqrt() / 2.0) * 2f64.sqrt();
    let second = (2.0 + 7f64.sqrt() / 2.0) * 2f64.sqrt();

    assert!(crate::feq(open.intersection_distance(&r).unwrap(), first));
    assert!(crate::feq(clipped.intersection_distance(&r).unwrap(), second));

    let too_tight = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, Some(0.5));
    assert_eq!(too_tight.intersection_distance(&r), None);
}

#[test]
fn zero_clip_leaves_paraboloid_open() {
    let r = Ray::new(Vector::new(-2.5, 0.0, 4.0), Vector::new(1.0, 0.0, -1.0));

    let open = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, None);
    let zero = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, Some(0.0));

    assert!(zero.intersection_distance(&r).is_some());
    assert_eq!(zero.intersection_distance(&r), open.intersection_distance(&r));
}

#[test]
fn normal_on_paraboloid_points_away_from_bowl() {
    let p = Shape::paraboloid(Default::default(), Default::default(),
        1.0, 1.0, None);

    assert_eq!(p.local_normal_at(Vector::zero()), Vector::new(0.0, 0.0, -1.0));
    assert_eq!(p.local_normal_at(Vector::new(1.0, 0.0, 1.0)),
        Vector::new(2.0, 0.0, -1.0).unit());
}

#[test]
fn ray_parallel_to_plane() {
    let p = Shape::plane(Default::default(), Default::default(), None, None);
    let r = Ray::new(Vector::new(0.0, 0.0, 10.0), Vector::new(0.0, 1.0, 0.0));

    assert_eq!(p.intersection_distance(&r), None);
}

#[test]
fn ray_from_plane_surface_is_rejected() {
    let p = Shape::plane(Default::default(), Default::default(), None, None);
    let r = Ray::new(Vector::new(3.0, 1.0, 0.0), Vector::new(0.0, 1.0, 1.0));

    assert_eq!(p.intersection_distance(&r), None);
}

#[test]
fn ray_hits_plane_from_above_and_below() {
    let p = Shape::plane(Default::default(), Default::default(), None, None);

    let above = Ray::new(Vector::new(0.0, 0.0, 5.0),
        Vector::new(0.0, 0.0, -1.0));
    let below = Ray::new(Vector::new(0.0, 0.0, -2.0),
        Vector::new(0.0, 0.0, 1.0));

    assert_eq!(p.intersection_distance(&above), Some(5.0));
    assert_eq!(p.intersection_distance(&below), Some(2.0));
}

#[test]
fn bounded_plane_rejects_hits_outside_rectangle() {
    let p = Shape::plane(Default::default(), Default::default(),
        Some(2.0), Some(4.0));
    let down = Vector::new(0.0, 0.0, -1.0);

    let inside = Ray::new(Vector::new(0.9, 1.9, 1.0), down);
    let outside_x = Ray::new(Vector::new(1.5, 0.0, 1.0), down);
    let outside_y = Ray::new(Vector::new(0.0, -2.5, 1.0), down);

    assert_eq!(p.intersection_distance(&inside), Some(1.0));
    assert_eq!(p.intersection_distance(&outside_x), None);
    assert_eq!(p.intersection_distance(&outside_y), None);
}

#[test]
fn oriented_plane_in_world_space() {
    let frame = CoordinateSystem::new(
        Vector::new(2.0, 0.0, 0.0),
        Vector::new(1.0, 0.0, 0.0),
        0.7,
    );
    let p = Shape::plane(frame, Default::default(), None, None);
    let r = Ray::new(Vector::new(5.0, 1.0, -1.0), Vector::new(-1.0, 0.0, 0.0));

    let t = p.intersection_distance(&r).unwrap();
    assert!(crate::feq(t, 3.0));

    let chip = p.chip_at(r.position(t));
    assert_eq!(chip.normal, Vector::new(1.0, 0.0, 0.0));
    assert_eq!(chip.position, Vector::new(2.0, 1.0, -1.0));
}

#[test]
fn checkered_plane_material_follows_local_frame() {
    let frame = CoordinateSystem::at(Vector::new(0.5, 0.0, 0.0));
    let p = Shape::checkered_plane(frame, 1.0, None, None);

    // World x = 0.75 is local x = 0.25, the light cell.
    let chip = p.chip_at(Vector::new(0.75, 0.5, 0.0));
    assert_eq!(chip.material.diffuse_reflectivity,
        crate::color::Color::grey(0.8));

    // World x = 0.25 is local x = -0.25, the dark cell.
    let chip = p.chip_at(Vector::new(0.25, 0.5, 0.0));
    assert_eq!(chip.material.diffuse_reflectivity,
        crate::color::Color::grey(0.1));
}
