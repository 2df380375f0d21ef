// Runtime parameters
pub const NUM_THREADS: usize = 1;
pub const CANVAS_ROWS: usize = 500;
pub const CANVAS_COLS: usize = 600;
pub const OUT_FILE: &str = "./out.ppm";

// Floating point comparisons
pub const FEQ_EPSILON: f64 = 0.0001;

// Intersections closer than this to a ray origin are discarded, so a surface
// never shadows or reflects itself.
pub const MIN_DIST: f64 = 0.0001;

// Maximum reflection/refraction bounces
pub const MAX_RECURSION_COUNTER: usize = 5;

// Decay constant for materials which absorb all light passing through them
pub const FULL_ABSORPTION: f64 = -1000.0;
