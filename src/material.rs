use crate::color::Color;
use crate::consts::FULL_ABSORPTION;

/// Optical properties of a surface.
///
/// Reflectivities are colors: each channel is the fraction of that channel's
/// light sent back by the surface. `refractive_attenuation` is the fraction of
/// light absorbed per meter travelled inside the material; a material with
/// every channel at 1 (the default) is opaque.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Material {
    pub ambient_reflectivity: Color,
    pub diffuse_reflectivity: Color,

    /// Fraction of a light's intensity returned as a specular highlight.
    pub specular_multiplier: f64,

    /// Exponent of the Blinn-Phong highlight; larger is sharper.
    pub specular_coefficient: f64,

    /// Fraction of light reflected like a mirror.
    pub reflective_index: f64,

    pub refractive_index: f64,
    refractive_attenuation: Color,

    /// Exponential decay constants derived from `refractive_attenuation`.
    attenuation_consts: Color,
}

impl Default for Material {
    fn default() -> Material {
        Material::diffuse(Color::grape())
    }
}

impl Material {
    /// A matte material which reflects `color` for both ambient and diffuse
    /// light.
    pub fn diffuse(color: Color) -> Material {
        Material {
            ambient_reflectivity: color,
            diffuse_reflectivity: color,
            specular_multiplier: 0.0,
            specular_coefficient: 20.0,
            reflective_index: 0.0,
            refractive_index: 1.0,
            refractive_attenuation: Color::white(),
            attenuation_consts: Self::exp_constants(Color::white()),
        }
    }

    /// Makes the material shiny.
    pub fn with_specular(mut self, multiplier: f64, coefficient: f64)
        -> Material {
        self.specular_multiplier = multiplier;
        self.specular_coefficient = coefficient;
        self
    }

    /// Makes the material reflect `reflective_index` of the light like a
    /// mirror.
    pub fn with_reflection(mut self, reflective_index: f64) -> Material {
        self.reflective_index = reflective_index;
        self
    }

    /// Makes the material let light through, bending it by
    /// `refractive_index` and absorbing `attenuation` per meter.
    pub fn with_refraction(mut self, refractive_index: f64,
        attenuation: Color) -> Material {
        self.refractive_index = refractive_index;
        self.refractive_attenuation = attenuation;
        self.attenuation_consts = Self::exp_constants(attenuation);
        self
    }

    pub fn with_ambient(mut self, ambient_reflectivity: Color) -> Material {
        self.ambient_reflectivity = ambient_reflectivity;
        self
    }

    pub fn refractive_attenuation(&self) -> Color {
        self.refractive_attenuation
    }

    /// True if the material lets (some) light through.
    pub fn is_refractive(&self) -> bool {
        self.refractive_attenuation.r < 1.0
            || self.refractive_attenuation.g < 1.0
            || self.refractive_attenuation.b < 1.0
    }

    /// Attenuates a color which travelled `distance` inside the material.
    pub fn attenuate_by_refraction(&self, color: Color, distance: f64)
        -> Color {
        Color {
            r: color.r * (self.attenuation_consts.r * distance).exp(),
            g: color.g * (self.attenuation_consts.g * distance).exp(),
            b: color.b * (self.attenuation_consts.b * distance).exp(),
        }
    }

    fn exp_constants(attenuation: Color) -> Color {
        Color {
            r: Self::exp_constant(attenuation.r),
            g: Self::exp_constant(attenuation.g),
            b: Self::exp_constant(attenuation.b),
        }
    }

    /// Decay constant for a fraction `p` of light lost per meter.
    fn exp_constant(p: f64) -> f64 {
        if p < 1.0 {
            (1.0 - p).ln()
        } else {
            FULL_ABSORPTION
        }
    }
}

#[test]
fn default_material_is_opaque_grape() {
    let m: Material = Default::default();

    assert_eq!(m.diffuse_reflectivity, Color::grape());
    assert_eq!(m.ambient_reflectivity, Color::grape());
    assert!(!m.is_refractive());
    assert_eq!(m.reflective_index, 0.0);
}

#[test]
fn refractive_when_any_channel_transmits() {
    let m = Material::default()
        .with_refraction(1.05, Color::rgb(1.0, 1.0, 0.5));

    assert!(m.is_refractive());
    assert_eq!(m.refractive_index, 1.05);
}

#[test]
fn attenuation_decays_exponentially() {
    let m = Material::diffuse(Color::white())
        .with_refraction(1.1, Color::rgb(0.5, 0.0, 0.75));
    let c = Color::white();

    // Half of the red light is lost per meter.
    assert_eq!(m.attenuate_by_refraction(c, 1.0), Color::rgb(0.5, 1.0, 0.25));
    assert_eq!(m.attenuate_by_refraction(c, 2.0),
        Color::rgb(0.25, 1.0, 0.0625));
    assert_eq!(m.attenuate_by_refraction(c, 0.0), c);
}

#[test]
fn full_absorption_blocks_channel() {
    let m = Material::diffuse(Color::white())
        .with_refraction(1.1, Color::rgb(1.0, 0.2, 0.2));

    let out = m.attenuate_by_refraction(Color::white(), 0.1);
    assert!(out.r < 1e-12);
    assert!(out.g > 0.9);
}
