//! Trait seams consumed across FileForge crates.

pub mod converter;

pub use converter::Converter;
