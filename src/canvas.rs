use std::io;
use std::io::Write;
use std::fs::File;
use std::path::Path;

use crate::color::Color;

/// A canvas for drawing pixels.
///
/// The canvas stores the colors traced for each pixel. Pixels are addressed
/// like a matrix: `row` first (top to bottom), then `col` (left to right).
/// Colors are stored as traced, unclamped; clamping happens on export.
///
/// For now, only PPM images are supported.
#[derive(Clone, Default, Debug, PartialEq)]
pub struct Canvas {
    /// The number of pixel rows (the image height).
    pub rows: usize,

    /// The number of pixel columns (the image width).
    pub cols: usize,

    /// The pixels of the canvas, stored row-major as a flattened vector.
    pixels: Vec<Color>,
}

impl Canvas {
    /// Creates a black canvas of `rows` by `cols` pixels.
    pub fn new(rows: usize, cols: usize) -> Canvas {
        Canvas {
            rows,
            cols,
            pixels: vec![Color::black(); rows * cols]
        }
    }

    /// Saves a canvas to a PPM file.
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let mut out = io::BufWriter::new(File::create(path)?);
        self.write_ppm(&mut out)?;
        out.flush()
    }

    /// Writes the canvas as a plain-text (P3) PPM image.
    ///
    /// Lines in the PPM output are clamped to 70 columns; a value which would
    /// cross the 70 column mark starts a new line.
    pub fn write_ppm<W: Write>(&self, out: &mut W) -> io::Result<()> {
        // Header: magic number, dimensions and maximum color value
        writeln!(out, "P3")?;
        writeln!(out, "{} {}", self.cols, self.rows)?;
        writeln!(out, "255")?;

        for row in self.pixels.chunks(self.cols.max(1)) {
            let mut col = 0;
            for value in row.iter().flat_map(|pixel| pixel.to_rgb8().to_vec()) {
                let s = value.to_string();

                if col == 0 {
                    write!(out, "{}", s)?;
                    col = s.len();
                } else if col + 1 + s.len() > 70 {
                    write!(out, "\n{}", s)?;
                    col = s.len();
                } else {
                    write!(out, " {}", s)?;
                    col += 1 + s.len();
                }
            }

            // Every image row ends its own line.
            writeln!(out)?;
        }

        Ok(())
    }

    /// Writes a color to a location on the `Canvas`.
    ///
    /// Out-of-bounds pixels are ignored. Rows and columns are zero-indexed.
    ///
    /// # Examples
    ///
    /// Writing a pixel to the second row, fifth column on an 8-by-8 canvas:
    ///
    /// ```
    /// # use quadric_ray_tracer::color::Color;
    /// # use quadric_ray_tracer::canvas::Canvas;
    /// let purple = Color::rgb(1.0, 0.0, 1.0);
    /// let mut canvas = Canvas::new(8, 8);
    /// canvas.set_pixel(1, 4, &purple);
    /// assert_eq!(canvas.get_pixel(1, 4).unwrap(), purple);
    /// ```
    pub fn set_pixel(&mut self, row: usize, col: usize, pixel: &Color) {
        // Silently ignore out-of-bounds pixels
        if row >= self.rows || col >= self.cols {
            return;
        }

        self.pixels[(row * self.cols) + col] = *pixel;
    }

    /// Reads a color from a location on the `Canvas`.
    ///
    /// If the location is out-of-bounds, `None` is returned.
    pub fn get_pixel(&self, row: usize, col: usize) -> Option<Color> {
        if row >= self.rows || col >= self.cols {
            return None
        }

        Some(self.pixels[(row * self.cols) + col])
    }

    /// Overwrites one full row of pixels.
    pub fn set_row(&mut self, row: usize, colors: &[Color]) {
        if row >= self.rows {
            return;
        }

        let start = row * self.cols;
        let n = colors.len().min(self.cols);
        self.pixels[start..start + n].copy_from_slice(&colors[..n]);
    }
}

#[test]
fn new_canvas_is_black() {
    let c = Canvas::new(2, 3);

    for row in 0..2 {
        for col in 0..3 {
            assert_eq!(c.get_pixel(row, col), Some(Color::black()));
        }
    }
    assert_eq!(c.get_pixel(2, 0), None);
    assert_eq!(c.get_pixel(0, 3), None);
}

#[test]
fn ppm_header_and_pixels() {
    let mut c = Canvas::new(2, 3);
    c.set_pixel(0, 0, &Color::rgb(1.5, 0.0, 0.0));
    c.set_pixel(1, 2, &Color::rgb(-0.5, 0.0, 1.0));
    c.set_pixel(7, 7, &Color::white());

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    let expected = "P3\n3 2\n255\n\
                    255 0 0 0 0 0 0 0 0\n\
                    0 0 0 0 0 0 0 0 255\n";
    assert_eq!(text, expected);
}

#[test]
fn ppm_lines_stay_under_70_columns() {
    let mut c = Canvas::new(2, 10);
    for row in 0..2 {
        c.set_row(row, &vec![Color::rgb(1.0, 0.8, 0.6); 10]);
    }

    let mut out = Vec::new();
    c.write_ppm(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();

    assert!(text.lines().all(|l| l.len() <= 70));
    assert_eq!(text.split_whitespace().count(), 4 + 2 * 10 * 3);
}
