use crate::color::Color;
use crate::material::Material;
use crate::vector::Vector;

/// Chooses the material at a point of a surface.
///
/// Points are given in the local frame of the object owning the surface.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Surface {
    /// The same material everywhere.
    Uniform(Material),

    /// Alternating square cells of side `cell_size` across local X and Y.
    ///
    /// For a point `(x, y, z)`, if `floor(x / cell) + floor(y / cell)` is even
    /// the `even` material is used; otherwise, the `odd` one.
    Checkered { cell_size: f64, even: Material, odd: Material },

    /// Six colored stripes around the local Z axis, with a cap at each pole.
    BeachBall,
}

impl Default for Surface {
    fn default() -> Surface {
        Surface::Uniform(Default::default())
    }
}

impl Surface {
    /// A light and dark grey checkerboard.
    pub fn checkered(cell_size: f64) -> Surface {
        Surface::Checkered {
            cell_size,
            even: Material::diffuse(Color::grey(0.8)),
            odd: Material::diffuse(Color::grey(0.1)),
        }
    }

    pub fn material_at(&self, p: Vector) -> Material {
        match self {
            Surface::Uniform(m) => *m,
            Surface::Checkered { cell_size, even, odd } => {
                let cell_x = (p.x / cell_size).floor();
                let cell_y = (p.y / cell_size).floor();

                if (cell_x + cell_y).rem_euclid(2.0) == 0.0 {
                    *even
                } else {
                    *odd
                }
            },
            Surface::BeachBall => Self::beach_ball_at(p),
        }
    }

    fn beach_ball_at(p: Vector) -> Material {
        const STRIPES: [Color; 6] = [
            Color::rgb(0.8, 0.0, 0.0),
            Color::rgb(0.0, 0.8, 0.0),
            Color::rgb(0.0, 0.0, 0.8),
            Color::rgb(0.8, 0.8, 0.8),
            Color::rgb(0.8, 0.0, 0.8),
            Color::rgb(0.0, 0.8, 0.8),
        ];

        // Caps cover everything within ~25 degrees of either pole.
        let cap_height = 0.9 * p.length();
        if p.z > cap_height {
            return Material::diffuse(Color::rgb(0.8, 0.2, 0.0));
        } else if p.z < -cap_height {
            return Material::diffuse(Color::rgb(0.0, 0.8, 0.2));
        }

        let angle = p.x.atan2(p.y) + std::f64::consts::FRAC_PI_2;
        let index = (angle.to_degrees() / 60.0).floor().rem_euclid(6.0);

        Material::diffuse(STRIPES[index as usize]).with_specular(0.5, 20.0)
    }
}

#[test]
fn uniform_surface_is_constant() {
    let m = Material::diffuse(Color::teal());
    let s = Surface::Uniform(m);

    assert_eq!(s.material_at(Vector::new(0.0, 0.0, 0.0)), m);
    assert_eq!(s.material_at(Vector::new(-3.0, 7.5, 1.0)), m);
}

#[test]
fn checkers_alternate_in_x_and_y() {
    let s = Surface::checkered(1.0);
    let light = Material::diffuse(Color::grey(0.8));
    let dark = Material::diffuse(Color::grey(0.1));

    assert_eq!(s.material_at(Vector::new(0.5, 0.5, 0.0)), light);
    assert_eq!(s.material_at(Vector::new(1.5, 0.5, 0.0)), dark);
    assert_eq!(s.material_at(Vector::new(0.5, 1.5, 0.0)), dark);
    assert_eq!(s.material_at(Vector::new(1.5, 1.5, 0.0)), light);
    assert_eq!(s.material_at(Vector::new(-0.5, 0.5, 0.0)), dark);
    assert_eq!(s.material_at(Vector::new(-0.5, -0.5, 0.0)), light);
}

#[test]
fn checkers_scale_with_cell_size() {
    let s = Surface::checkered(0.5);
    let dark = Material::diffuse(Color::grey(0.1));

    assert_eq!(s.material_at(Vector::new(0.75, 0.25, 0.0)), dark);
}

#[test]
fn beach_ball_caps_and_stripes() {
    let s = Surface::BeachBall;

    let top = s.material_at(Vector::new(0.0, 0.1, 2.0));
    assert_eq!(top.diffuse_reflectivity, Color::rgb(0.8, 0.2, 0.0));

    let bottom = s.material_at(Vector::new(0.1, 0.0, -2.0));
    assert_eq!(bottom.diffuse_reflectivity, Color::rgb(0.0, 0.8, 0.2));

    // atan2(0, 1) = 0, shifted by 90 degrees: second stripe.
    let side = s.material_at(Vector::new(0.0, 2.0, 0.0));
    assert_eq!(side.diffuse_reflectivity, Color::rgb(0.0, 0.8, 0.0));

    // atan2(0, -1) = 180 degrees, shifted to 270: fifth stripe.
    let back = s.material_at(Vector::new(0.0, -2.0, 0.0));
    assert_eq!(back.diffuse_reflectivity, Color::rgb(0.8, 0.0, 0.8));

    // atan2(-2, 0.5) is about -76 degrees, shifted to 14: first stripe.
    let left = s.material_at(Vector::new(-2.0, 0.5, 0.0));
    assert_eq!(left.diffuse_reflectivity, Color::rgb(0.8, 0.0, 0.0));

    // atan2(-1, -1) = -135 degrees, shifted to -45: wraps to the last stripe.
    let wrapped = s.material_at(Vector::new(-1.0, -1.0, 0.0));
    assert_eq!(wrapped.diffuse_reflectivity, Color::rgb(0.0, 0.8, 0.8));
}
