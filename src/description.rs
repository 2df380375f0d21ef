use std::convert::TryFrom;
use std::fs;
use std::path::Path;

use log::{ debug, info };
use serde::{ Serialize, Deserialize };

use crate::error::{ Error, Result };
use crate::vector::Vector;
use crate::color::Color;
use crate::camera::Camera;
use crate::coordinate_system::CoordinateSystem;
use crate::material::Material;
use crate::shape::Shape;
use crate::light::{ Illumination, LightSource };
use crate::scene::Scene;

/// A scene as written in a JSON scene file.
///
/// ```json
/// {
///     "camera": {
///         "rows": 500, "cols": 600,
///         "position": [10, 0, 1], "direction": [-1, 0, 0], "zoom": 1.2
///     },
///     "ambient_light": [0.2, 0.2, 0.2],
///     "lights": [
///         { "type": "point", "position": [5, 5, 5], "intensity": "#ffffff",
///           "booster": 40 }
///     ],
///     "objects": [
///         { "type": "sphere", "center": [0, 0, 1], "radius": 1,
///           "material": { "color": [0.8, 0.1, 0.1], "reflective_index": 0.2 } },
///         { "type": "checkered_plane", "center": [0, 0, 0], "cell_size": 1 }
///     ]
/// }
/// ```
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SceneDescription {
    pub camera: CameraJson,

    #[serde(default)]
    pub background: Option<ColorJson>,

    #[serde(default)]
    pub ambient_light: Option<ColorJson>,

    #[serde(default)]
    pub lights: Vec<LightJson>,

    pub objects: Vec<ObjectJson>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CameraJson {
    pub rows: usize,
    pub cols: usize,
    pub position: Vec<f64>,
    pub direction: Vec<f64>,

    #[serde(default = "one")]
    pub zoom: f64,

    #[serde(default)]
    pub tilt: f64,
}

/// Either `[r, g, b]` or `"#rrggbb"`.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ColorJson {
    Rgb(Vec<f64>),
    Hex(String),
}

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LightJson {
    Point {
        position: Vec<f64>,
        intensity: ColorJson,

        #[serde(default = "one")]
        booster: f64,
    },

    Directional {
        /// Points towards the light.
        direction: Vec<f64>,
        intensity: ColorJson,
    },
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MaterialJson {
    /// Ambient and diffuse color.
    pub color: ColorJson,

    /// Overrides `color` for ambient light.
    #[serde(default)]
    pub ambient: Option<ColorJson>,

    #[serde(default)]
    pub specular_multiplier: f64,

    #[serde(default = "default_specular_coefficient")]
    pub specular_coefficient: f64,

    #[serde(default)]
    pub reflective_index: f64,

    #[serde(default)]
    pub refraction: Option<RefractionJson>,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct RefractionJson {
    pub index: f64,

    /// Fraction of each channel absorbed per meter.
    pub attenuation: ColorJson,
}

/// An object in a scene file. Every object but spheres takes an optional
/// `orientation` (its local Z axis, world Z by default) and `tilt` (radians).
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ObjectJson {
    Sphere {
        center: Vec<f64>,
        radius: f64,

        #[serde(default)]
        material: Option<MaterialJson>,
    },

    BeachBall {
        center: Vec<f64>,
        radius: f64,

        #[serde(default = "z_axis")]
        orientation: Vec<f64>,

        #[serde(default)]
        tilt: f64,
    },

    Ellipsoid {
        center: Vec<f64>,
        width: f64,
        length: f64,
        height: f64,

        #[serde(default = "z_axis")]
        orientation: Vec<f64>,

        #[serde(default)]
        tilt: f64,

        #[serde(default)]
        material: Option<MaterialJson>,
    },

    Paraboloid {
        /// The vertex.
        center: Vec<f64>,
        a: f64,
        b: f64,

        #[serde(default)]
        z_max: Option<f64>,

        #[serde(default = "z_axis")]
        orientation: Vec<f64>,

        #[serde(default)]
        tilt: f64,

        #[serde(default)]
        material: Option<MaterialJson>,
    },

    Plane {
        center: Vec<f64>,

        #[serde(default)]
        width: Option<f64>,

        #[serde(default)]
        length: Option<f64>,

        #[serde(default = "z_axis")]
        orientation: Vec<f64>,

        #[serde(default)]
        tilt: f64,

        #[serde(default)]
        material: Option<MaterialJson>,
    },

    CheckeredPlane {
        center: Vec<f64>,

        #[serde(default = "one")]
        cell_size: f64,

        #[serde(default)]
        width: Option<f64>,

        #[serde(default)]
        length: Option<f64>,

        #[serde(default = "z_axis")]
        orientation: Vec<f64>,

        #[serde(default)]
        tilt: f64,
    },
}

fn one() -> f64 {
    1.0
}

fn default_specular_coefficient() -> f64 {
    20.0
}

fn z_axis() -> Vec<f64> {
    vec![0.0, 0.0, 1.0]
}

/// Reads a three component vector.
fn vector(name: &str, v: &Vec<f64>) -> Result<Vector> {
    if v.len() != 3 {
        return Err(Error::InvalidScene(format!(
            "{} must have 3 components, got {}", name, v.len()
        )));
    }

    Ok(v.into())
}

/// Reads a direction, which may have any length but zero.
fn direction(name: &str, v: &Vec<f64>) -> Result<Vector> {
    let d = vector(name, v)?;
    if d.length_sq() == 0.0 {
        return Err(Error::InvalidScene(format!("{} has no length", name)));
    }

    Ok(d)
}

fn frame(center: &Vec<f64>, orientation: &Vec<f64>, tilt: f64)
    -> Result<CoordinateSystem> {
    Ok(CoordinateSystem::new(
        vector("center", center)?,
        direction("orientation", orientation)?,
        tilt,
    ))
}

impl TryFrom<&ColorJson> for Color {
    type Error = Error;

    fn try_from(color: &ColorJson) -> Result<Color> {
        match color {
            ColorJson::Rgb(v) if v.len() == 3 => Ok(v.into()),
            ColorJson::Rgb(v) => Err(Error::InvalidScene(format!(
                "colors must have 3 channels, got {}", v.len()
            ))),
            ColorJson::Hex(hex) => Color::from_hex(hex).ok_or_else(||
                Error::InvalidScene(format!("malformed hex color \"{}\"", hex))
            ),
        }
    }
}

impl TryFrom<&MaterialJson> for Material {
    type Error = Error;

    fn try_from(json: &MaterialJson) -> Result<Material> {
        let mut material = Material::diffuse(Color::try_from(&json.color)?)
            .with_specular(json.specular_multiplier, json.specular_coefficient)
            .with_reflection(json.reflective_index);

        if let Some(ambient) = &json.ambient {
            material = material.with_ambient(Color::try_from(ambient)?);
        }

        if let Some(refraction) = &json.refraction {
            material = material.with_refraction(
                refraction.index,
                Color::try_from(&refraction.attenuation)?
            );
        }

        Ok(material)
    }
}

/// The given material, or the default one.
fn material(json: &Option<MaterialJson>) -> Result<Material> {
    match json {
        Some(json) => Material::try_from(json),
        None => Ok(Default::default()),
    }
}

impl TryFrom<&LightJson> for LightSource {
    type Error = Error;

    fn try_from(json: &LightJson) -> Result<LightSource> {
        Ok(match json {
            LightJson::Point { position, intensity, booster } =>
                LightSource::point(
                    vector("light position", position)?,
                    Color::try_from(intensity)?,
                    *booster,
                ),
            LightJson::Directional { direction: d, intensity } =>
                LightSource::directional(
                    direction("light direction", d)?,
                    Color::try_from(intensity)?,
                ),
        })
    }
}

impl TryFrom<&ObjectJson> for Shape {
    type Error = Error;

    fn try_from(json: &ObjectJson) -> Result<Shape> {
        Ok(match json {
            ObjectJson::Sphere { center, radius, material: m } =>
                Shape::smooth_sphere(vector("center", center)?, *radius,
                    material(m)?),

            ObjectJson::BeachBall { center, radius, orientation, tilt } =>
                Shape::beach_ball(frame(center, orientation, *tilt)?, *radius),

            ObjectJson::Ellipsoid {
                center, width, length, height, orientation, tilt, material: m
            } => Shape::ellipsoid(frame(center, orientation, *tilt)?,
                material(m)?, *width, *length, *height),

            ObjectJson::Paraboloid {
                center, a, b, z_max, orientation, tilt, material: m
            } => Shape::paraboloid(frame(center, orientation, *tilt)?,
                material(m)?, *a, *b, *z_max),

            ObjectJson::Plane {
                center, width, length, orientation, tilt, material: m
            } => Shape::plane(frame(center, orientation, *tilt)?,
                material(m)?, *width, *length),

            ObjectJson::CheckeredPlane {
                center, cell_size, width, length, orientation, tilt
            } => Shape::checkered_plane(frame(center, orientation, *tilt)?,
                *cell_size, *width, *length),
        })
    }
}

impl TryFrom<SceneDescription> for Scene {
    type Error = Error;

    fn try_from(json: SceneDescription) -> Result<Scene> {
        let camera = Camera::new(
            (json.camera.rows, json.camera.cols),
            vector("camera position", &json.camera.position)?,
            direction("camera direction", &json.camera.direction)?,
            json.camera.zoom,
            json.camera.tilt,
        );

        let ambient_light = match &json.ambient_light {
            Some(c) => Color::try_from(c)?,
            None => Color::black(),
        };

        let light_sources = json.lights.iter()
            .map(LightSource::try_from)
            .collect::<Result<Vec<_>>>()?;

        let objects = json.objects.iter()
            .enumerate()
            .map(|(i, obj)| Shape::try_from(obj).map_err(|e| match e {
                Error::InvalidScene(msg) =>
                    Error::InvalidScene(format!("object {}: {}", i, msg)),
                e => e,
            }))
            .collect::<Result<Vec<_>>>()?;

        let mut scene = Scene::new(camera, objects,
            Illumination::new(ambient_light, light_sources));

        if let Some(background) = &json.background {
            scene.background = Color::try_from(background)?;
        }

        scene.validate()?;
        Ok(scene)
    }
}

/// Parses a JSON scene description.
pub fn parse(json: &str) -> Result<Scene> {
    let description: SceneDescription = serde_json::from_str(json)?;
    debug!("{} objects, {} lights described",
        description.objects.len(), description.lights.len());

    Scene::try_from(description)
}

/// Loads a scene from a JSON file.
pub fn load(path: &Path) -> Result<Scene> {
    let json = fs::read_to_string(path)?;
    let scene = parse(&json)?;

    info!("Loaded scene from {}", path.display());
    Ok(scene)
}

#[cfg(test)]
const FULL_SCENE: &str = r##"{
    "camera": {
        "rows": 20, "cols": 30,
        "position": [10, 0, 1], "direction": [-1, 0, 0],
        "zoom": 1.5, "tilt": 0.1
    },
    "background": "#000080",
    "ambient_light": [0.2, 0.2, 0.2],
    "lights": [
        { "type": "point", "position": [5, 5, 5], "intensity": "#ffffff",
          "booster": 40 },
        { "type": "directional", "direction": [0, 0, 1],
          "intensity": [0.5, 0.5, 0.5] }
    ],
    "objects": [
        { "type": "sphere", "center": [0, 0, 1], "radius": 1,
          "material": {
              "color": [0.8, 0.1, 0.1],
              "specular_multiplier": 0.5,
              "reflective_index": 0.2
          } },
        { "type": "beach_ball", "center": [0, 3, 1], "radius": 1,
          "orientation": [0, 1, 1] },
        { "type": "ellipsoid", "center": [0, -3, 1],
          "width": 1, "length": 2, "height": 3,
          "material": {
              "color": "#6f2da8",
              "refraction": { "index": 1.5, "attenuation": [0.1, 0.1, 0.1] }
          } },
        { "type": "paraboloid", "center": [-4, 0, 0], "a": 1, "b": 0.5,
          "z_max": 2 },
        { "type": "plane", "center": [-10, 0, 0], "orientation": [1, 0, 0],
          "width": 10 },
        { "type": "checkered_plane", "center": [0, 0, 0], "cell_size": 0.5 }
    ]
}"##;

#[test]
fn parse_full_scene() {
    use crate::shape::ShapeType;
    use crate::pattern::Surface;

    let scene = parse(FULL_SCENE).unwrap();

    assert_eq!(scene.camera.resolution(), (20, 30));
    assert_eq!(scene.camera.zoom, 1.5);
    assert_eq!(scene.background, Color::rgb(0.0, 0.0, 128.0 / 255.0));
    assert_eq!(scene.illumination.ambient_light, Color::grey(0.2));
    assert_eq!(scene.illumination.light_sources, vec![
        LightSource::point(Vector::new(5.0, 5.0, 5.0), Color::white(), 40.0),
        LightSource::directional(Vector::new(0.0, 0.0, 1.0), Color::grey(0.5)),
    ]);

    assert_eq!(scene.objects.len(), 6);
    assert_eq!(scene.objects[0].ty, ShapeType::Sphere { radius: 1.0 });
    assert_eq!(scene.objects[0].frame.origin, Vector::new(0.0, 0.0, 1.0));
    assert_eq!(scene.objects[1].surface, Surface::BeachBall);
    assert_eq!(scene.objects[1].frame.k_prime,
        Vector::new(0.0, 1.0, 1.0).unit());
    assert_eq!(scene.objects[3].ty,
        ShapeType::Paraboloid { a: 1.0, b: 0.5, z_max: Some(2.0) });
    assert_eq!(scene.objects[4].ty,
        ShapeType::Plane { width: Some(10.0), length: None });
    assert_eq!(scene.objects[5].surface, Surface::checkered(0.5));

    let sphere = scene.objects[0].chip_at(Vector::new(0.0, 0.0, 2.0)).material;
    assert_eq!(sphere.diffuse_reflectivity, Color::rgb(0.8, 0.1, 0.1));
    assert_eq!(sphere.specular_multiplier, 0.5);
    assert_eq!(sphere.specular_coefficient, 20.0);
    assert_eq!(sphere.reflective_index, 0.2);

    let glass = scene.objects[2].local_material_at(Vector::zero());
    assert_eq!(Some(glass.diffuse_reflectivity), Color::from_hex("#6f2da8"));
    assert!(glass.is_refractive());
    assert_eq!(glass.refractive_index, 1.5);
}

#[test]
fn defaults_fill_in_optional_fields() {
    let scene = parse(r#"{
        "camera": { "rows": 1, "cols": 1,
                    "position": [0, 0, 0], "direction": [1, 0, 0] },
        "objects": [ { "type": "plane", "center": [0, 0, -1] } ]
    }"#).unwrap();

    assert_eq!(scene.camera.zoom, 1.0);
    assert_eq!(scene.background, Color::black());
    assert_eq!(scene.illumination, Default::default());
    assert_eq!(scene.objects[0].frame.k_prime, Vector::new(0.0, 0.0, 1.0));
    assert_eq!(scene.objects[0].local_material_at(Vector::zero()),
        Material::default());
}

#[test]
fn malformed_json_is_a_json_error() {
    assert!(matches!(parse("{ \"camera\": "), Err(Error::Json(_))));

    let unknown_type = r#"{
        "camera": { "rows": 1, "cols": 1,
                    "position": [0, 0, 0], "direction": [1, 0, 0] },
        "objects": [ { "type": "torus", "center": [0, 0, 0] } ]
    }"#;
    assert!(matches!(parse(unknown_type), Err(Error::Json(_))));
}

#[test]
fn invalid_values_are_rejected() {
    let scene_with = |camera: &str, object: &str| format!(r#"{{
        "camera": {},
        "objects": [ {} ]
    }}"#, camera, object);

    let camera = r#"{ "rows": 2, "cols": 2,
        "position": [0, 0, 0], "direction": [1, 0, 0] }"#;
    let sphere = r#"{ "type": "sphere", "center": [0, 0, 0], "radius": 1 }"#;
    assert!(parse(&scene_with(camera, sphere)).is_ok());

    let bad = [
        scene_with(camera,
            r#"{ "type": "sphere", "center": [0, 0, 0], "radius": -1 }"#),
        scene_with(camera,
            r#"{ "type": "sphere", "center": [0, 0], "radius": 1 }"#),
        scene_with(camera,
            r#"{ "type": "plane", "center": [0, 0, 0],
                 "orientation": [0, 0, 0] }"#),
        scene_with(camera,
            r##"{ "type": "sphere", "center": [0, 0, 0], "radius": 1,
                 "material": { "color": "#12345" } }"##),
        scene_with(camera,
            r#"{ "type": "ellipsoid", "center": [0, 0, 0],
                 "width": 1, "length": 0, "height": 1 }"#),
        scene_with(r#"{ "rows": 0, "cols": 2,
            "position": [0, 0, 0], "direction": [1, 0, 0] }"#, sphere),
        scene_with(r#"{ "rows": 2, "cols": 2, "zoom": 0,
            "position": [0, 0, 0], "direction": [1, 0, 0] }"#, sphere),
        scene_with(r#"{ "rows": 2, "cols": 2,
            "position": [0, 0, 0], "direction": [0, 0, 0] }"#, sphere),
    ];

    for json in bad.iter() {
        assert!(matches!(parse(json), Err(Error::InvalidScene(_))), "{}", json);
    }
}

#[test]
fn missing_file_is_an_io_error() {
    let result = load(Path::new("./no/such/scene.json"));
    assert!(matches!(result, Err(Error::Io(_))));
}
