use log::{ debug, info, warn };

use crate::consts::MAX_RECURSION_COUNTER;
use crate::error::{ Error, Result };
use crate::vector::Vector;
use crate::ray::Ray;
use crate::color::Color;
use crate::canvas::Canvas;
use crate::camera::Camera;
use crate::shape::{ Shape, ShapeType };
use crate::pattern::Surface;
use crate::light::{ Illumination, LightSource };
use crate::intersect::{ Chip, intersection_distance, chip_at };

/// A scene: a camera looking at objects lit by some lights.
///
/// Most of the ray tracer's logic lives here. A scene is immutable once built;
/// every pixel is traced independently of every other one, so rendering the
/// same scene always produces the same image regardless of pixel order.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    pub camera: Camera,

    /// Objects are intersected in order; on equal distances the earlier one
    /// wins.
    pub objects: Vec<Shape>,

    pub illumination: Illumination,

    /// The color of rays which escape the scene.
    pub background: Color,
}

impl Scene {
    /// Creates a scene with a black background.
    pub fn new(camera: Camera, objects: Vec<Shape>,
        illumination: Illumination) -> Scene {
        Scene { camera, objects, illumination, background: Color::black() }
    }

    pub fn with_background(mut self, background: Color) -> Scene {
        self.background = background;
        self
    }

    /// Checks the scene for geometry that would only render as NaNs.
    pub fn validate(&self) -> Result<()> {
        let camera = &self.camera;
        if camera.rows == 0 || camera.cols == 0 {
            return Err(Error::InvalidScene(format!(
                "resolution {}x{} has no pixels", camera.rows, camera.cols
            )));
        }

        if !(camera.zoom > 0.0) {
            return Err(Error::InvalidScene(
                format!("camera zoom must be positive, got {}", camera.zoom)
            ));
        }

        if !camera.direction.is_finite() {
            return Err(Error::InvalidScene(
                "camera direction has no length".to_string()
            ));
        }

        for (i, obj) in self.objects.iter().enumerate() {
            Self::validate_shape(obj).map_err(|msg|
                Error::InvalidScene(format!("object {}: {}", i, msg))
            )?;
        }

        for (i, light) in self.illumination.light_sources.iter().enumerate() {
            if let LightSource::Directional { direction, .. } = light {
                if direction.length_sq() == 0.0 {
                    return Err(Error::InvalidScene(format!(
                        "light {}: directional light has no direction", i
                    )));
                }
            }
        }

        Ok(())
    }

    fn validate_shape(shape: &Shape) -> std::result::Result<(), String> {
        let frame = &shape.frame;
        let axes = [frame.i_prime, frame.j_prime, frame.k_prime];
        if !axes.iter().all(Vector::is_finite) {
            return Err("orientation has no length".to_string());
        }

        let positive = |name: &str, v: f64| if v > 0.0 {
            Ok(())
        } else {
            Err(format!("{} must be positive, got {}", name, v))
        };

        match shape.ty {
            ShapeType::Sphere { radius } => positive("radius", radius)?,
            ShapeType::Ellipsoid { width, length, height } => {
                positive("width", width)?;
                positive("length", length)?;
                positive("height", height)?;
            },
            ShapeType::Paraboloid { z_max, .. } => {
                // 0 means unclipped.
                if let Some(z_max) = z_max.filter(|&z| z != 0.0) {
                    positive("z_max", z_max)?;
                }
            },
            ShapeType::Plane { width, length } => {
                if let Some(width) = width {
                    positive("width", width)?;
                }
                if let Some(length) = length {
                    positive("length", length)?;
                }
            },
        }

        if let Surface::Checkered { cell_size, .. } = shape.surface {
            positive("cell size", cell_size)?;
        }

        Ok(())
    }

    /// Finds the closest object in front of a ray, and how far away it is.
    ///
    /// Every object is checked; on a tie the first object in `objects` wins.
    pub fn nearest_hit(&self, ray: &Ray) -> Option<(f64, &Shape)> {
        let mut nearest: Option<(f64, &Shape)> = None;

        for obj in self.objects.iter() {
            if let Some(t) = intersection_distance(obj, ray) {
                match nearest {
                    Some((best, _)) if best <= t => (),
                    _ => nearest = Some((t, obj)),
                }
            }
        }

        nearest
    }

    /// The color seen along a ray leaving the camera.
    pub fn ray_trace(&self, ray: &Ray) -> Color {
        self.trace(ray, 0)
    }

    /// The color seen along a ray, `depth` bounces away from the camera.
    fn trace(&self, ray: &Ray, depth: usize) -> Color {
        self.trace_with_distance(ray, depth).0
    }

    /// Like `trace`, also returning how far the ray travelled before hitting
    /// something (`None` if it escaped the scene).
    fn trace_with_distance(&self, ray: &Ray, depth: usize)
        -> (Color, Option<f64>) {
        if depth >= MAX_RECURSION_COUNTER {
            return (Color::black(), None);
        }

        match self.nearest_hit(ray) {
            None => (self.background, None),
            Some((t, obj)) => {
                let chip = chip_at(obj, ray.position(t));
                (self.color_at(&chip, ray, depth), Some(t))
            },
        }
    }

    /// Determines whether `light` is hidden from `point` by some object.
    ///
    /// Only objects closer than the light count; a directional light is
    /// blocked by anything on the way.
    pub fn is_shadowed(&self, point: Vector, light: &LightSource) -> bool {
        let ray = light.ray_from(point);
        let distance = light.distance_to(point);

        self.objects.iter()
            .filter_map(|obj| intersection_distance(obj, &ray))
            .any(|t| distance.is_beyond(t))
    }

    /// Shades a chip hit by `incoming`.
    ///
    /// The color is the sum of the ambient light, the diffuse and specular
    /// light of every visible light source, and the light reflected and
    /// refracted by the surface. No clamping is done here.
    pub fn color_at(&self, chip: &Chip, incoming: &Ray, depth: usize) -> Color {
        if depth >= MAX_RECURSION_COUNTER {
            return Color::black();
        }

        let material = &chip.material;
        let mut color = material.ambient_reflectivity
            * self.illumination.ambient_light;

        for light in self.illumination.light_sources.iter() {
            color = color + self.light_at(chip, incoming, light);
        }

        if material.reflective_index > 0.0 {
            let direction = -incoming.direction.reflect_about(&chip.normal);
            let reflected = Ray::new(chip.position, direction);

            color = color
                + self.trace(&reflected, depth + 1) * material.reflective_index;
        }

        if material.is_refractive() {
            color = color + self.refraction_at(chip, incoming, depth);
        }

        color
    }

    /// Diffuse and specular light from one light source.
    fn light_at(&self, chip: &Chip, incoming: &Ray, light: &LightSource)
        -> Color {
        let material = &chip.material;
        let light_ray = light.ray_from(chip.position);

        // A light on the other side of the surface than the viewer can't
        // light what the viewer sees, and neither can one grazing it.
        let view_side = incoming.direction.dot(&chip.normal);
        let light_side = light_ray.direction.dot(&chip.normal);
        if light_side == 0.0 || view_side.signum() == light_side.signum() {
            return Color::black();
        }

        if self.is_shadowed(chip.position, light) {
            return Color::black();
        }

        let intensity = light.intensity();
        let attenuation = light.attenuation(chip.position);

        let diffuse = material.diffuse_reflectivity * intensity
            * (light_side.abs() * attenuation);

        if material.specular_multiplier <= 0.0 {
            return diffuse;
        }

        let half = (light_ray.direction - incoming.direction).unit();
        let reflected = light_ray.direction.reflect_about(&chip.normal);
        let highlight = half.dot(&reflected).max(0.0)
            .powf(material.specular_coefficient);

        diffuse
            + intensity * (material.specular_multiplier * highlight * attenuation)
    }

    /// Light transmitted through a refractive chip.
    ///
    /// Light which crossed the material on its way here is attenuated by the
    /// distance it travelled inside.
    fn refraction_at(&self, chip: &Chip, incoming: &Ray, depth: usize)
        -> Color {
        let material = &chip.material;
        let entering = incoming.direction.dot(&chip.normal) < 0.0;

        let direction = match refracted_direction(
            incoming.direction, chip.normal, material.refractive_index
        ) {
            Some(d) => d,

            // Total internal reflection
            None => return Color::black(),
        };

        let refracted = Ray::new(chip.position, direction);
        let (color, distance) = self.trace_with_distance(&refracted, depth + 1);

        match distance {
            Some(distance) if entering =>
                material.attenuate_by_refraction(color, distance),
            _ => color,
        }
    }

    /// The color of a single pixel.
    pub fn pixel_color(&self, row: usize, col: usize) -> Color {
        let color = self.ray_trace(&self.camera.get_ray(row, col));

        if !color.is_finite() {
            warn!("pixel ({}, {}) is not finite: {:?}", row, col, color);
        }

        color
    }

    /// The colors of one row of pixels, left to right.
    pub fn render_row(&self, row: usize) -> Vec<Color> {
        (0..self.camera.cols).map(|col| self.pixel_color(row, col)).collect()
    }

    /// Renders the scene, one pixel at a time.
    pub fn render(&self) -> Canvas {
        let (rows, cols) = self.camera.resolution();
        info!("Rendering {}x{} pixels, {} objects, {} lights...",
            cols, rows, self.objects.len(),
            self.illumination.light_sources.len());

        let mut image = Canvas::new(rows, cols);
        for row in 0..rows {
            image.set_row(row, &self.render_row(row));

            if row % 100 == 0 {
                debug!("row {}/{}", row, rows);
            }
        }

        info!("...done.");
        image
    }
}

/// Bends a ray crossing a surface, following Snell's law.
///
/// `normal` is the outward unit normal and `refractive_index` is the index of
/// the material behind it (the outside is assumed to be air). A ray going
/// against the normal is entering the material; one going along it is leaving.
///
/// Returns `None` on total internal reflection.
pub fn refracted_direction(incoming: Vector, normal: Vector,
    refractive_index: f64) -> Option<Vector> {
    let cos = incoming.dot(&normal);

    // Ratio of the indices on either side, and the normal facing the ray.
    let (alpha, normal, cos) = if cos < 0.0 {
        (1.0 / refractive_index, normal, -cos)
    } else {
        (refractive_index, -normal, cos)
    };

    let discriminant = alpha.powi(2) * cos.powi(2) + 1.0 - alpha.powi(2);
    if discriminant < 0.0 {
        return None;
    }

    Some((incoming * alpha + normal * (alpha * cos - discriminant.sqrt())).unit())
}

#[cfg(test)]
use crate::{ material::Material, coordinate_system::CoordinateSystem };

#[cfg(test)]
mod test_scenes {
    use crate::camera::Camera;
    use crate::coordinate_system::CoordinateSystem;
    use crate::color::Color;
    use crate::light::{ Illumination, LightSource };
    use crate::material::Material;
    use crate::shape::Shape;
    use crate::vector::Vector;

    use super::Scene;

    pub fn camera() -> Camera {
        Camera::new((1, 1), Vector::new(10.0, 0.0, 0.0),
            Vector::new(-1.0, 0.0, 0.0), 1.0, 0.0)
    }

    /// A white matte floor at z = 0 lit by `lights`, without ambient light.
    pub fn floor(lights: Vec<LightSource>) -> Scene {
        let floor = Shape::plane(Default::default(),
            Material::diffuse(Color::white()), None, None);

        Scene::new(camera(), vec![floor],
            Illumination::new(Color::black(), lights))
    }

    pub fn looking_down() -> crate::ray::Ray {
        crate::ray::Ray::new(Vector::new(0.0, -1.0, 1.0),
            Vector::new(0.0, 1.0, -1.0))
    }

    pub fn mirror(reflective_index: f64) -> Shape {
        Shape::plane(CoordinateSystem::default(),
            Material::diffuse(Color::black()).with_reflection(reflective_index),
            None, None)
    }
}

#[test]
fn single_pixel_sees_only_ambient_light() {
    let material = Material::diffuse(Color::rgb(0.2, 0.4, 0.6))
        .with_ambient(Color::rgb(0.3, 0.5, 0.7));
    let sphere = Shape::smooth_sphere(Vector::zero(), 2.0, material);

    let scene = Scene::new(test_scenes::camera(), vec![sphere],
        Illumination::new(Color::white(), Vec::new()));

    let image = scene.render();
    assert_eq!(image.get_pixel(0, 0), Some(Color::rgb(0.3, 0.5, 0.7)));
}

#[test]
fn empty_scene_shows_background() {
    let scene = Scene::new(test_scenes::camera(), Vec::new(),
        Illumination::new(Color::white(), Vec::new()))
        .with_background(Color::teal());

    assert_eq!(scene.render().get_pixel(0, 0), Some(Color::teal()));
}

#[test]
fn nearest_hit_prefers_closest_object() {
    let near = Shape::smooth_sphere(Vector::new(3.0, 0.0, 0.0), 1.0,
        Default::default());
    let far = Shape::smooth_sphere(Vector::zero(), 1.0, Default::default());
    let scene = Scene::new(test_scenes::camera(), vec![far, near],
        Default::default());

    let r = Ray::new(Vector::new(10.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0));
    let (t, obj) = scene.nearest_hit(&r).unwrap();

    assert!(crate::feq(t, 6.0));
    assert!(std::ptr::eq(obj, &scene.objects[1]));
}

#[test]
fn nearest_hit_ties_go_to_first_object() {
    let first = Shape::smooth_sphere(Vector::zero(), 1.0,
        Material::diffuse(Color::white()));
    let second = Shape::smooth_sphere(Vector::zero(), 1.0,
        Material::diffuse(Color::black()));
    let scene = Scene::new(test_scenes::camera(), vec![first, second],
        Default::default());

    let r = Ray::new(Vector::new(10.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0));
    let (_, obj) = scene.nearest_hit(&r).unwrap();

    assert!(std::ptr::eq(obj, &scene.objects[0]));
}

#[test]
fn directly_lit_floor() {
    let light = LightSource::directional(Vector::new(0.0, 0.0, 1.0),
        Color::white());
    let scene = test_scenes::floor(vec![light]);
    let chip = chip_at(&scene.objects[0], Vector::zero());

    assert_eq!(scene.color_at(&chip, &test_scenes::looking_down(), 0),
        Color::white());
}

#[test]
fn diffuse_light_follows_cosine() {
    let slanted = Vector::new(3f64.sqrt() / 2.0, 0.0, 0.5);
    let light = LightSource::directional(slanted, Color::white());
    let scene = test_scenes::floor(vec![light]);
    let chip = chip_at(&scene.objects[0], Vector::zero());

    assert_eq!(scene.color_at(&chip, &test_scenes::looking_down(), 0),
        Color::grey(0.5));
}

#[test]
fn point_light_falls_off_with_distance() {
    let close = LightSource::point(Vector::new(0.0, 0.0, 2.0),
        Color::white(), 4.0);
    let far = LightSource::point(Vector::new(0.0, 0.0, 4.0),
        Color::white(), 4.0);
    let ray = test_scenes::looking_down();

    let scene = test_scenes::floor(vec![close]);
    let chip = chip_at(&scene.objects[0], Vector::zero());
    assert_eq!(scene.color_at(&chip, &ray, 0), Color::white());

    let scene = test_scenes::floor(vec![far]);
    assert_eq!(scene.color_at(&chip, &ray, 0), Color::grey(0.25));
}

#[test]
fn light_behind_surface_is_ignored() {
    let below = LightSource::point(Vector::new(0.0, 0.0, -5.0),
        Color::white(), 25.0);
    let scene = test_scenes::floor(vec![below]);
    let chip = chip_at(&scene.objects[0], Vector::zero());

    assert_eq!(scene.color_at(&chip, &test_scenes::looking_down(), 0),
        Color::black());
}

#[test]
fn occluder_casts_shadow() {
    let light = LightSource::point(Vector::new(0.0, 0.0, 10.0),
        Color::white(), 100.0);
    let mut scene = test_scenes::floor(vec![light]);
    let chip = chip_at(&scene.objects[0], Vector::zero());
    let ray = test_scenes::looking_down();

    scene.objects.push(Shape::smooth_sphere(Vector::new(0.0, 0.0, 5.0), 1.0,
        Default::default()));
    assert!(scene.is_shadowed(Vector::zero(), &light));
    assert_eq!(scene.color_at(&chip, &ray, 0), Color::black());

    scene.objects.pop();
    assert!(!scene.is_shadowed(Vector::zero(), &light));
    assert_eq!(scene.color_at(&chip, &ray, 0), Color::white());
}

#[test]
fn objects_behind_point_light_cast_no_shadow() {
    let light = LightSource::point(Vector::new(0.0, 0.0, 3.0),
        Color::white(), 1.0);
    let mut scene = test_scenes::floor(vec![light]);
    scene.objects.push(Shape::smooth_sphere(Vector::new(0.0, 0.0, 6.0), 1.0,
        Default::default()));

    assert!(!scene.is_shadowed(Vector::zero(), &light));
}

#[test]
fn anything_blocks_directional_light() {
    let light = LightSource::directional(Vector::new(0.0, 0.0, 1.0),
        Color::white());
    let mut scene = test_scenes::floor(vec![light]);
    scene.objects.push(Shape::smooth_sphere(Vector::new(0.0, 0.0, 1000.0), 1.0,
        Default::default()));

    assert!(scene.is_shadowed(Vector::zero(), &light));
}

#[test]
fn specular_highlight_facing_the_light() {
    let light = LightSource::directional(Vector::new(0.0, 0.0, 1.0),
        Color::white());
    let mut scene = test_scenes::floor(vec![light]);
    scene.objects[0] = Shape::plane(Default::default(),
        Material::diffuse(Color::black()).with_specular(0.5, 20.0), None, None);

    let chip = chip_at(&scene.objects[0], Vector::zero());
    let straight_down = Ray::new(Vector::new(0.0, 0.0, 1.0),
        Vector::new(0.0, 0.0, -1.0));

    assert_eq!(scene.color_at(&chip, &straight_down, 0), Color::grey(0.5));
}

#[test]
fn grazing_light_adds_no_highlight() {
    let light = LightSource::directional(Vector::new(1.0, 0.0, 0.0),
        Color::white());
    let mut scene = test_scenes::floor(vec![light]);
    scene.objects[0] = Shape::plane(Default::default(),
        Material::diffuse(Color::black()).with_specular(0.5, 20.0), None, None);

    let chip = chip_at(&scene.objects[0], Vector::zero());
    let straight_down = Ray::new(Vector::new(0.0, 0.0, 1.0),
        Vector::new(0.0, 0.0, -1.0));

    assert_eq!(scene.color_at(&chip, &straight_down, 0), Color::black());
}

#[test]
fn mirror_reflects_object() {
    let red = Material::diffuse(Color::black())
        .with_ambient(Color::rgb(1.0, 0.0, 0.0));
    let ball = Shape::smooth_sphere(Vector::new(5.0, 0.0, 5.0), 1.0, red);

    let mut scene = Scene::new(test_scenes::camera(),
        vec![test_scenes::mirror(1.0), ball],
        Illumination::new(Color::white(), Vec::new()));

    let chip = chip_at(&scene.objects[0], Vector::zero());
    let incoming = Ray::new(Vector::new(-1.0, 0.0, 1.0),
        Vector::new(1.0, 0.0, -1.0));

    assert_eq!(scene.color_at(&chip, &incoming, 0), Color::rgb(1.0, 0.0, 0.0));

    scene.objects[0] = test_scenes::mirror(0.5);
    let chip = chip_at(&scene.objects[0], Vector::zero());
    assert_eq!(scene.color_at(&chip, &incoming, 0), Color::rgb(0.5, 0.0, 0.0));
}

#[test]
fn facing_mirrors_terminate() {
    let lower = test_scenes::mirror(1.0);
    let upper = Shape::plane(
        CoordinateSystem::new(Vector::new(0.0, 0.0, 2.0),
            Vector::new(0.0, 0.0, -1.0), 0.0),
        Material::diffuse(Color::grey(0.5)).with_reflection(1.0),
        None, None);

    let camera = Camera::new((5, 5), Vector::new(0.0, 0.0, 1.0),
        Vector::new(1.0, 0.0, 0.0), 0.5, 0.0);
    let light = LightSource::point(Vector::new(3.0, 0.0, 1.0),
        Color::white(), 1.0);
    let scene = Scene::new(camera, vec![lower, upper],
        Illumination::new(Color::grey(0.2), vec![light]));

    let image = scene.render();
    for row in 0..5 {
        for col in 0..5 {
            let c = image.get_pixel(row, col).unwrap();
            assert!(c.is_finite());

            // Ambient and diffuse light add up to at most 0.6 per bounce.
            assert!(c.r <= 0.6 * MAX_RECURSION_COUNTER as f64);
        }
    }

    assert_eq!(image, scene.render());
}

#[test]
fn color_at_beyond_recursion_limit_is_black() {
    let light = LightSource::directional(Vector::new(0.0, 0.0, 1.0),
        Color::white());
    let scene = test_scenes::floor(vec![light]);
    let chip = chip_at(&scene.objects[0], Vector::zero());

    assert_eq!(
        scene.color_at(&chip, &test_scenes::looking_down(),
            MAX_RECURSION_COUNTER),
        Color::black()
    );
}

#[test]
fn refraction_straight_through() {
    let d = Vector::new(0.0, 0.0, -1.0);
    let n = Vector::new(0.0, 0.0, 1.0);

    assert_eq!(refracted_direction(d, n, 1.5), Some(d));
    assert_eq!(refracted_direction(d, -n, 1.5), Some(d));
}

#[test]
fn refraction_follows_snell() {
    // 30 degrees off the normal, into glass
    let d = Vector::new(0.5, 0.0, -(3f64.sqrt()) / 2.0);
    let n = Vector::new(0.0, 0.0, 1.0);

    let t = refracted_direction(d, n, 1.5).unwrap();
    assert!(crate::feq(t.x, 0.5 / 1.5));
    assert!(t.z < 0.0);
    assert!(crate::feq(t.length(), 1.0));
}

#[test]
fn total_internal_reflection() {
    // Leaving glass 60 degrees off the normal
    let d = Vector::new(3f64.sqrt() / 2.0, 0.0, 0.5);
    let n = Vector::new(0.0, 0.0, 1.0);

    assert_eq!(refracted_direction(d, n, 1.5), None);
}

#[test]
fn transparent_ball_attenuates_light_passing_through() {
    let lens = Material::diffuse(Color::black())
        .with_refraction(1.0, Color::grey(0.5));
    let ball = Shape::smooth_sphere(Vector::zero(), 1.0, lens);

    let scene = Scene::new(test_scenes::camera(), vec![ball],
        Illumination::new(Color::black(), Vec::new()))
        .with_background(Color::white());

    // Two meters inside the ball, losing half of the light per meter.
    assert_eq!(scene.render().get_pixel(0, 0), Some(Color::grey(0.25)));
}

#[test]
fn validation_rejects_degenerate_scenes() {
    let ok = Scene::new(test_scenes::camera(), vec![
        Shape::smooth_sphere(Vector::zero(), 1.0, Default::default())
    ], Default::default());
    assert!(ok.validate().is_ok());

    let mut no_radius = ok.clone();
    no_radius.objects[0] = Shape::smooth_sphere(Vector::zero(), 0.0,
        Default::default());
    assert!(no_radius.validate().is_err());

    let mut no_pixels = ok.clone();
    no_pixels.camera = Camera::new((0, 10), Vector::zero(),
        Vector::new(1.0, 0.0, 0.0), 1.0, 0.0);
    assert!(no_pixels.validate().is_err());

    let mut no_orientation = ok.clone();
    no_orientation.objects[0] = Shape::plane(
        CoordinateSystem::new(Vector::zero(), Vector::zero(), 0.0),
        Default::default(), None, None);
    assert!(no_orientation.validate().is_err());

    let mut no_cells = ok;
    no_cells.objects[0] = Shape::checkered_plane(Default::default(), 0.0,
        None, None);
    assert!(no_cells.validate().is_err());
}

#[test]
fn validation_treats_zero_clip_as_open_paraboloid() {
    let bowl = |z_max| Scene::new(test_scenes::camera(), vec![
        Shape::paraboloid(Default::default(), Default::default(),
            1.0, 1.0, z_max)
    ], Default::default());

    assert!(bowl(None).validate().is_ok());
    assert!(bowl(Some(0.0)).validate().is_ok());
    assert!(bowl(Some(2.0)).validate().is_ok());
    assert!(bowl(Some(-1.0)).validate().is_err());
}
