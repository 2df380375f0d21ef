use std::io;

use thiserror::Error;

/// Errors raised while loading a scene or writing an image.
///
/// Rendering itself never fails: misses, total internal reflection and
/// recursion limits are ordinary outcomes of tracing a ray.
#[derive(Error, Debug)]
pub enum Error {
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed scene description: {0}")]
    Json(#[from] serde_json::Error),

    /// The scene description parsed, but describes something which can't be
    /// rendered (a zero resolution, a sphere without radius, ...).
    #[error("invalid scene: {0}")]
    InvalidScene(String),

    #[error("unknown preset scene \"{0}\"")]
    UnknownPreset(String),
}

pub type Result<T> = std::result::Result<T, Error>;

#[test]
fn errors_display_their_cause() {
    let e = Error::InvalidScene("radius must be positive, got 0".to_string());
    assert_eq!(e.to_string(), "invalid scene: radius must be positive, got 0");

    let e = Error::UnknownPreset("teapot".to_string());
    assert_eq!(e.to_string(), "unknown preset scene \"teapot\"");
}

#[test]
fn io_errors_convert_and_keep_their_source() {
    use std::error::Error as _;

    let e: Error = io::Error::new(io::ErrorKind::NotFound, "gone").into();
    assert!(matches!(e, Error::Io(_)));
    assert_eq!(e.to_string(), "i/o error: gone");
    assert!(e.source().is_some());
}
