use crate::color::Color;
use crate::ray::Ray;
use crate::vector::Vector;

/// How far away a light is from some point.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightDistance {
    Finite(f64),

    /// Lights without a position (directional lights) are infinitely far.
    Infinite,
}

impl LightDistance {
    /// True if an object `t` away, on the way to the light, sits between the
    /// point and the light.
    pub fn is_beyond(&self, t: f64) -> bool {
        match self {
            LightDistance::Finite(d) => t < *d,
            LightDistance::Infinite => true,
        }
    }
}

/// A source of light.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum LightSource {
    /// A light emitted from a single point in space.
    ///
    /// Its intensity falls off with the squared distance, scaled up by
    /// `intensity_booster` (a booster of 1 gives full `intensity` at one
    /// meter).
    Point { position: Vector, intensity: Color, intensity_booster: f64 },

    /// A light infinitely far away, such as the sun. `direction` points from
    /// the scene *towards* the light.
    Directional { direction: Vector, intensity: Color },
}

impl LightSource {
    pub fn point(position: Vector, intensity: Color, intensity_booster: f64)
        -> LightSource {
        LightSource::Point { position, intensity, intensity_booster }
    }

    pub fn directional(direction: Vector, intensity: Color) -> LightSource {
        LightSource::Directional { direction, intensity }
    }

    pub fn intensity(&self) -> Color {
        match self {
            LightSource::Point { intensity, .. } => *intensity,
            LightSource::Directional { intensity, .. } => *intensity,
        }
    }

    /// A ray leaving `point` towards the light.
    pub fn ray_from(&self, point: Vector) -> Ray {
        match self {
            LightSource::Point { position, .. } =>
                Ray::new(point, *position - point),
            LightSource::Directional { direction, .. } =>
                Ray::new(point, *direction),
        }
    }

    pub fn distance_to(&self, point: Vector) -> LightDistance {
        match self {
            LightSource::Point { position, .. } =>
                LightDistance::Finite((*position - point).length()),
            LightSource::Directional { .. } => LightDistance::Infinite,
        }
    }

    /// The fraction of the light's intensity which reaches `point`.
    pub fn attenuation(&self, point: Vector) -> f64 {
        match self {
            LightSource::Point { position, intensity_booster, .. } =>
                intensity_booster / (*position - point).length_sq(),
            LightSource::Directional { .. } => 1.0,
        }
    }
}

/// All of the light in a scene.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Illumination {
    /// Light reaching every surface from every direction.
    pub ambient_light: Color,
    pub light_sources: Vec<LightSource>,
}

impl Illumination {
    pub fn new(ambient_light: Color, light_sources: Vec<LightSource>)
        -> Illumination {
        Illumination { ambient_light, light_sources }
    }
}

#[test]
fn point_light_queries() {
    let light = LightSource::point(
        Vector::new(0.0, 0.0, 4.0), Color::white(), 2.0
    );
    let p = Vector::new(0.0, 0.0, 2.0);

    assert_eq!(light.intensity(), Color::white());
    assert_eq!(light.ray_from(p).direction, Vector::new(0.0, 0.0, 1.0));
    assert_eq!(light.ray_from(p).origin, p);
    assert_eq!(light.distance_to(p), LightDistance::Finite(2.0));
    assert!(crate::feq(light.attenuation(p), 0.5));
}

#[test]
fn directional_light_queries() {
    let light = LightSource::directional(
        Vector::new(2.0, 1.0, 3.0), Color::rgb(0.0, 0.2, 0.4)
    );
    let p = Vector::new(5.0, -7.0, 1.0);

    assert_eq!(light.ray_from(p).direction, Vector::new(2.0, 1.0, 3.0).unit());
    assert_eq!(light.distance_to(p), LightDistance::Infinite);
    assert_eq!(light.attenuation(p), 1.0);
}

#[test]
fn blockers_must_be_closer_than_the_light() {
    assert!(LightDistance::Finite(3.0).is_beyond(2.9));
    assert!(!LightDistance::Finite(3.0).is_beyond(3.5));
    assert!(LightDistance::Infinite.is_beyond(1e12));
}
