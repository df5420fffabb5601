//! Image normalization for recognition requests: decode, bound, re-encode as JPEG.

pub mod error;
pub mod image_ops;

pub use {
    error::{Error, Result},
    image_ops::{NormalizedImage, normalize_for_recognition},
};
