use crate::ray::Ray;
use crate::vector::Vector;
use crate::coordinate_system::CoordinateSystem;

/// A camera positioned in 3D space.
///
/// The image plane sits one unit in front of the camera, along `direction`.
/// Its pixel grid is centered on the view direction and sized so that the
/// grid's diagonal spans `1 / zoom`.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Camera {
    /// Number of pixel rows (the image height).
    pub rows: usize,

    /// Number of pixel columns (the image width).
    pub cols: usize,

    pub position: Vector,

    /// Unit vector the camera looks along.
    pub direction: Vector,

    pub zoom: f64,

    /// Roll of the camera around its view direction, in radians.
    pub tilt_angle: f64,

    /// Step from one pixel row to the next (downwards).
    v_vertical: Vector,

    /// Step from one pixel column to the next (to the right).
    v_horizontal: Vector,

    /// Row and column of the grid center.
    offset_vertical: f64,
    offset_horizontal: f64,
}

impl Camera {
    /// Creates a camera. The resolution is given like a matrix: rows (height)
    /// first, then columns (width).
    pub fn new(resolution: (usize, usize), position: Vector,
        direction: Vector, zoom: f64, tilt_angle: f64) -> Camera {
        let (rows, cols) = resolution;
        let direction = direction.unit();

        let rows_span = rows.saturating_sub(1) as f64;
        let cols_span = cols.saturating_sub(1) as f64;
        let diagonal = (rows_span.powi(2) + cols_span.powi(2)).sqrt();

        // A single pixel has no extent to scale.
        let pixel_size = if diagonal > 0.0 {
            1.0 / (zoom * diagonal)
        } else {
            1.0
        };

        // `up` is the frame's third axis; the second one points to the
        // viewer's left.
        let (_, left, up) =
            CoordinateSystem::unit_base_axis(direction, tilt_angle);

        Camera {
            rows,
            cols,
            position,
            direction,
            zoom,
            tilt_angle,
            v_vertical: -up * pixel_size,
            v_horizontal: -left * pixel_size,
            offset_vertical: rows_span / 2.0,
            offset_horizontal: cols_span / 2.0,
        }
    }

    pub fn resolution(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// The same camera with a different pixel grid. The grid keeps spanning
    /// `1 / zoom` along its diagonal.
    pub fn with_resolution(&self, rows: usize, cols: usize) -> Camera {
        Camera::new((rows, cols), self.position, self.direction, self.zoom,
            self.tilt_angle)
    }

    /// World-space location of a pixel on the image plane.
    pub fn pixel_position(&self, row: usize, col: usize) -> Vector {
        self.position
            + self.direction
            + self.v_vertical * (row as f64 - self.offset_vertical)
            + self.v_horizontal * (col as f64 - self.offset_horizontal)
    }

    /// The ray from the camera through a pixel.
    pub fn get_ray(&self, row: usize, col: usize) -> Ray {
        Ray::new(self.position, self.pixel_position(row, col) - self.position)
    }
}

#[test]
fn ray_through_center() {
    let c = Camera::new((101, 201), Vector::new(10.0, 0.0, 0.0),
        Vector::new(-1.0, 0.0, 0.0), 1.0, 0.0);
    let r = c.get_ray(50, 100);

    assert_eq!(r.origin, Vector::new(10.0, 0.0, 0.0));
    assert_eq!(r.direction, Vector::new(-1.0, 0.0, 0.0));
}

#[test]
fn single_pixel_looks_straight_ahead() {
    let c = Camera::new((1, 1), Vector::new(10.0, 0.0, 0.0),
        Vector::new(-3.0, 0.0, 0.0), 1.0, 0.0);

    assert_eq!(c.direction, Vector::new(-1.0, 0.0, 0.0));
    assert_eq!(c.pixel_position(0, 0), Vector::new(9.0, 0.0, 0.0));
    assert_eq!(c.get_ray(0, 0).direction, Vector::new(-1.0, 0.0, 0.0));
}

#[test]
fn grid_diagonal_spans_inverse_zoom() {
    for &zoom in [1.0, 2.0, 0.5].iter() {
        let c = Camera::new((4, 5), Vector::zero(),
            Vector::new(0.0, 1.0, 0.0), zoom, 0.3);

        let diagonal = c.pixel_position(3, 4) - c.pixel_position(0, 0);
        assert!(crate::feq(diagonal.length(), 1.0 / zoom));

        // Both corners lie on the image plane, one unit ahead.
        assert!(crate::feq(c.pixel_position(0, 0).dot(&c.direction), 1.0));
        assert!(crate::feq(c.pixel_position(3, 4).dot(&c.direction), 1.0));
    }
}

#[test]
fn rows_go_down_and_columns_go_right() {
    // Looking down -X with Z up: the viewer's right is +Y.
    let c = Camera::new((3, 3), Vector::new(10.0, 0.0, 0.0),
        Vector::new(-1.0, 0.0, 0.0), 1.0, 0.0);

    let top = c.pixel_position(0, 1);
    let bottom = c.pixel_position(2, 1);
    let left = c.pixel_position(1, 0);
    let right = c.pixel_position(1, 2);

    assert!(top.z > 0.0 && bottom.z < 0.0);
    assert!(left.y < 0.0 && right.y > 0.0);
    assert!(crate::feq(top.y, 0.0));
    assert!(crate::feq(left.z, 0.0));
}

#[test]
fn changing_resolution_keeps_the_view() {
    let c = Camera::new((3, 3), Vector::new(10.0, 0.0, 0.0),
        Vector::new(-1.0, 0.0, 0.0), 2.0, 0.0);
    let bigger = c.with_resolution(5, 9);

    assert_eq!(bigger.resolution(), (5, 9));
    assert_eq!(bigger.get_ray(2, 4), c.get_ray(1, 1));
    assert_eq!(bigger.zoom, 2.0);
}

#[test]
fn tilt_rolls_the_image() {
    let c = Camera::new((3, 3), Vector::new(10.0, 0.0, 0.0),
        Vector::new(-1.0, 0.0, 0.0), 1.0, std::f64::consts::FRAC_PI_2);

    // A quarter turn moves the top of the image off the Z axis.
    let top = c.pixel_position(0, 1);
    assert!(crate::feq(top.z, 0.0));
    assert!(!crate::feq(top.y, 0.0));
}
