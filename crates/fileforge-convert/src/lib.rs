//! # fileforge-convert
//!
//! The conversion dispatch and validation pipeline: content sniffing,
//! upload validation, the capability registry, the dispatcher, the
//! executor implementations, the external tool runner, and the scratch
//! area lifecycle.

pub mod compose;
pub mod dispatcher;
pub mod executors;
pub mod registry;
pub mod scratch;
pub mod sniff;
pub mod tool;
pub mod validator;

pub use dispatcher::ConversionDispatcher;
pub use registry::ConversionRegistry;
pub use scratch::ScratchArea;
