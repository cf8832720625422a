//! Handback Core Library
//!
//! Damage verification engine for rented-item handback photos: given a
//! "before" and an "after" photograph, produce a spatially resolved damage
//! estimate and a pass/fail verdict. Every verification call is a pure
//! function of its inputs and options, with no shared state across calls.

pub mod binarize;
pub mod clahe;
pub mod color;
pub mod config;
pub mod cues;
pub mod decoders;
pub mod exporters;
pub mod field;
pub mod fusion;
pub mod mask;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod presets;

// Re-export commonly used types
pub use decoders::DecodedImage;
pub use field::ScalarField;
pub use mask::RegionMask;
pub use models::{FusionWeights, OutputMode, VerifyOptions};
pub use pipeline::{verify_images, verify_pair, DamageReport, VerifyRecord};
