//! Conversion executor implementations, one per supported pair family.

pub mod office;
pub mod pdf;
pub mod raster;
pub mod text;
