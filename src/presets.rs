use crate::consts::{ CANVAS_ROWS, CANVAS_COLS };
use crate::error::{ Error, Result };
use crate::vector::Vector;
use crate::color::Color;
use crate::camera::Camera;
use crate::coordinate_system::CoordinateSystem;
use crate::material::Material;
use crate::shape::Shape;
use crate::light::{ Illumination, LightSource };
use crate::scene::Scene;

/// Names accepted by `preset`.
pub const PRESET_NAMES: [&str; 6] = [
    "spheres", "planes", "ellipsoids", "paraboloids", "beachball", "candies",
];

/// Builds one of the built-in scenes by name.
pub fn preset(name: &str) -> Result<Scene> {
    match name {
        "spheres" => Ok(spheres()),
        "planes" => Ok(planes()),
        "ellipsoids" => Ok(ellipsoids()),
        "paraboloids" => Ok(paraboloids()),
        "beachball" => Ok(beachball()),
        "candies" => Ok(candies()),
        _ => Err(Error::UnknownPreset(name.to_string())),
    }
}

/// A `#rrggbb` literal as a color; black if it doesn't parse.
fn hex(rgb: &str) -> Color {
    Color::from_hex(rgb).unwrap_or_default()
}

/// Candy colors.
const CANDY_COLORS: [&str; 7] = [
    "#01aa4f", "#9e1b3b", "#f27024", "#ee4131", "#73328f", "#fccc20", "#ee4d90",
];

fn shiny(color: Color) -> Material {
    Material::diffuse(color).with_specular(0.5, 20.0)
}

/// A nearly clear material for small lenses.
fn lens(refractive_index: f64, attenuation: Color) -> Material {
    Material::diffuse(Color::white() * 0.01)
        .with_specular(0.5, 20.0)
        .with_refraction(refractive_index, attenuation)
}

fn default_camera(position: Vector, direction: Vector) -> Camera {
    Camera::new((CANVAS_ROWS, CANVAS_COLS), position, direction, 1.0, 0.0)
}

/// Three shiny spheres, two of them reflective.
pub fn spheres() -> Scene {
    let objects = vec![
        Shape::smooth_sphere(Vector::new(0.0, 0.0, 1.0), 2.0,
            shiny(Color::metal()).with_reflection(0.3)),
        Shape::smooth_sphere(Vector::new(1.0, 1.0, -1.0), 0.5,
            shiny(Color::teal())),
        Shape::smooth_sphere(Vector::new(0.0, 0.0, -2.0), 0.8,
            shiny(Color::grape()).with_reflection(0.5)),
    ];

    let lights = vec![
        LightSource::directional(Vector::new(2.0, 1.0, 3.0), Color::white()),
        LightSource::directional(Vector::new(0.0, -1.0, 0.0), hex("#002255")),
        LightSource::point(Vector::new(2.0, 2.0, -2.0), hex("#ffff00"), 4.0),
    ];

    Scene::new(
        default_camera(Vector::new(10.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0)),
        objects,
        Illumination::new(Color::grey(0.3), lights),
    )
}

/// Two crossing planes, a small checkerboard and a lens in front of it.
pub fn planes() -> Scene {
    let objects = vec![
        Shape::plane(
            CoordinateSystem::new(Vector::zero(), Vector::new(0.0, 1.0, 1.0), 0.0),
            Default::default(), Some(9.0), Some(10.0)),
        Shape::plane(
            CoordinateSystem::new(Vector::zero(), Vector::new(0.0, -1.0, 5.0), 0.0),
            Default::default(), None, None),
        Shape::checkered_plane(
            CoordinateSystem::new(Vector::new(3.0, 0.0, 0.2),
                Vector::new(0.0, -1.0, 5.0), 0.0),
            0.5, Some(2.0), Some(3.0)),
        Shape::smooth_sphere(Vector::new(3.4, 1.0, 0.6), 0.3,
            lens(1.05, Color::grey(0.01))),
    ];

    let lights = vec![
        LightSource::directional(Vector::new(2.0, 1.0, 3.0), Color::white()),
        LightSource::point(Vector::new(0.0, 0.0, 1.0), hex("#ffff00"), 1.0),
        LightSource::point(Vector::new(4.0, -0.5, 2.0), hex("#00ff00"), 2.0),
    ];

    let position = Vector::new(8.0, 0.0, 1.0);
    Scene::new(
        default_camera(position, -position),
        objects,
        Illumination::new(Color::grey(0.3), lights),
    )
}

/// Ellipsoids and ellipsoidal lenses on a checkered floor.
pub fn ellipsoids() -> Scene {
    let glass = Material::diffuse(Color::white() * 0.01)
        .with_specular(0.85, 20.0)
        .with_refraction(1.1, Color::rgb(0.03, 0.01, 0.01));

    let objects = vec![
        Shape::checkered_plane(Default::default(), 1.0, None, None),
        Shape::ellipsoid(
            CoordinateSystem::new(Vector::new(0.0, 0.0, 1.0),
                Vector::new(0.0, 1.0, 1.0), -0.5),
            Material::diffuse(hex("#ed8e4a")).with_specular(0.85, 20.0),
            0.3, 1.0, 2.0),
        Shape::ellipsoid(
            CoordinateSystem::at(Vector::new(1.0, -1.0, 0.25)),
            Material::default().with_specular(0.95, 20.0),
            1.0, 1.0, 0.5),
        Shape::ellipsoid(
            CoordinateSystem::at(Vector::new(1.0, 0.0, 0.5)),
            glass, 0.2, 1.0, 1.0),
        Shape::ellipsoid(
            CoordinateSystem::new(Vector::new(0.0, 1.0, 1.0),
                Vector::new(0.0, 0.0, 1.0), 0.5),
            glass, 0.2, 1.0, 2.0),
    ];

    let lights = vec![
        LightSource::directional(Vector::new(2.0, -1.0, 3.0), Color::white()),
        LightSource::point(Vector::new(0.0, -1.0, 1.1), hex("#ffff00"), 1.0),
    ];

    Scene::new(
        default_camera(Vector::new(5.0, 0.0, 1.0), Vector::new(-5.0, 0.0, 0.0)),
        objects,
        Illumination::new(Color::grey(0.2), lights),
    )
}

/// A spinning-top of paraboloids around a flattened ellipsoid, against a
/// curved backdrop. The image is taller than it is wide.
pub fn paraboloids() -> Scene {
    let bowl = 0.4;
    let colors = CANDY_COLORS;

    let objects = vec![
        // Backdrop
        Shape::paraboloid(
            CoordinateSystem::new(Vector::new(-10.0, 0.0, 0.0),
                Vector::new(1.0, 0.0, 0.0), 0.0),
            Material::diffuse(Color::grey(0.3)), 0.02, 0.01, Some(2.0)),
        Shape::plane(
            CoordinateSystem::new(Vector::new(-9.15, 0.0, -5.0),
                Vector::new(1.0, 0.0, 0.0), 0.6),
            Material::diffuse(Color::grey(0.6)), Some(30.0), Some(5.0)),
        Shape::plane(
            CoordinateSystem::new(Vector::new(-9.0, 0.0, -6.0),
                Vector::new(1.0, 0.0, 0.0), 0.5),
            Material::diffuse(Color::grey(0.4)), Some(30.0), Some(5.0)),

        // Top
        Shape::paraboloid(
            CoordinateSystem::at(Vector::new(0.0, 0.0, 2.0)),
            Material::diffuse(Color::grey(0.4)).with_specular(0.3, 20.0),
            bowl, bowl, None),
        Shape::paraboloid(
            CoordinateSystem::new(Vector::new(0.0, 0.0, -2.0),
                Vector::new(0.0, 0.0, -1.0), 0.0),
            Material::diffuse(Color::grey(0.4)).with_specular(0.3, 20.0),
            bowl, bowl, None),
        Shape::ellipsoid(Default::default(), shiny(hex(colors[0])),
            2.0, 2.0, 1.0),
        Shape::smooth_sphere(Vector::new(0.0, 0.0, 1.25), 0.35,
            shiny(hex(colors[2]))),
        Shape::smooth_sphere(Vector::new(0.0, 0.0, -1.25), 0.35,
            shiny(hex(colors[6]))),

        Shape::smooth_sphere(Vector::new(2.0, 0.8, -0.4), 0.4,
            lens(1.15, Color::rgb(0.03, 0.01, 0.01))),
    ];

    let lights = vec![
        LightSource::directional(Vector::new(2.0, 4.0, 2.0), Color::grey(0.6)),
        LightSource::point(Vector::new(-5.0, 4.0, -2.0), Color::white(), 8.0),
        LightSource::point(Vector::new(3.0, -1.0, 0.0), Color::white(), 4.0),
    ];

    let position = Vector::new(10.0, 0.0, 0.0);
    Scene::new(
        Camera::new((64 * 10, 36 * 10), position, -position, 1.0, 0.0),
        objects,
        Illumination::new(Color::grey(0.2), lights),
    )
}

/// A striped beach ball with a small glass bead resting on it.
pub fn beachball() -> Scene {
    let radius = 2.0;
    let bead_radius = 0.4;
    let bead_center = Vector::new(25.0, -21.0, 13.0).unit()
        * (radius + bead_radius);

    let objects = vec![
        Shape::beach_ball(
            CoordinateSystem::new(Vector::zero(),
                Vector::new(80.0, -35.0, 18.0), -0.6),
            radius),
        Shape::smooth_sphere(bead_center, bead_radius,
            lens(1.05, Color::grey(0.01))),
    ];

    let lights = vec![
        LightSource::directional(Vector::new(2.0, 1.0, 3.0), Color::white()),
        LightSource::directional(Vector::new(0.0, -1.0, 0.0), hex("#002255")),
    ];

    Scene::new(
        default_camera(Vector::new(8.0, 0.0, 0.0), Vector::new(-1.0, 0.0, 0.0)),
        objects,
        Illumination::new(Color::grey(0.3), lights),
    )
}

/// A row of candies on a glossy floor. The fourth candy is clear and the last
/// one stands on its edge.
pub fn candies() -> Scene {
    const NUM_CANDIES: usize = 6;
    let width = 0.5;

    let clear = Material::diffuse(Color::white() * 0.01)
        .with_specular(0.85, 20.0)
        .with_refraction(1.1, Color::rgb(0.03, 0.01, 0.01));

    let mut objects = vec![
        Shape::plane(Default::default(),
            Material::diffuse(Color::grey(0.3)).with_reflection(0.15),
            None, None),
    ];

    // Neighbours never share a color.
    for i in 0..NUM_CANDIES {
        let x = (2.0 * i as f64 - NUM_CANDIES as f64 + 1.0) * width / 2.0;
        let material = if i == NUM_CANDIES - 3 {
            clear
        } else {
            shiny(hex(CANDY_COLORS[i % CANDY_COLORS.len()]))
        };

        objects.push(Shape::ellipsoid(
            CoordinateSystem::at(Vector::new(x, 0.0, 0.5)),
            material, width, 1.0, 1.0));
    }

    let x = (NUM_CANDIES as f64 + 2.0) * width / 2.0;
    objects.push(Shape::ellipsoid(
        CoordinateSystem::at(Vector::new(x, 0.0, width / 2.0)),
        shiny(hex(CANDY_COLORS[CANDY_COLORS.len() - 1])),
        1.0, 1.0, width));

    let lights = vec![
        LightSource::directional(Vector::new(2.0, 3.0, 3.0), Color::white()),
        LightSource::point(Vector::new(0.0, 1.0, 2.0), hex("#00ff00"), 2.0),
    ];

    let position = Vector::new(5.0, 7.0, 2.0) * 0.85;
    Scene::new(
        Camera::new((600, 600), position,
            Vector::new(0.0, 0.0, 1.0) - position, 1.0, 0.0),
        objects,
        Illumination::new(Color::grey(0.2), lights),
    )
}

#[test]
fn every_preset_is_valid() {
    for name in PRESET_NAMES.iter() {
        let scene = preset(name).unwrap();

        assert!(scene.validate().is_ok(), "{}", name);
        assert!(!scene.objects.is_empty(), "{}", name);
    }
}

#[test]
fn unknown_preset() {
    assert!(matches!(preset("teapot"), Err(Error::UnknownPreset(_))));
}

#[test]
fn preset_colors_parse() {
    assert_eq!(hex("#ffff00"), Color::rgb(1.0, 1.0, 0.0));

    for rgb in CANDY_COLORS.iter().chain(["#002255", "#00ff00", "#ed8e4a"].iter()) {
        assert!(Color::from_hex(rgb).is_some(), "{}", rgb);
        assert_ne!(hex(rgb), Color::black(), "{}", rgb);
    }
}

#[test]
fn candies_are_deterministic() {
    let a = candies();
    let b = candies();

    assert_eq!(a.objects, b.objects);
    assert_eq!(a.objects.len(), 8);

    for pair in a.objects[1..].windows(2) {
        let left = pair[0].local_material_at(Vector::zero());
        let right = pair[1].local_material_at(Vector::zero());
        assert_ne!(left.diffuse_reflectivity, right.diffuse_reflectivity);
    }
}

#[test]
fn small_preset_render_is_finite() {
    let mut scene = spheres();
    scene.camera = scene.camera.with_resolution(4, 5);

    let image = scene.render();
    for row in 0..4 {
        for col in 0..5 {
            assert!(image.get_pixel(row, col).unwrap().is_finite());
        }
    }
}
