//! Primitive resource declarations
//!
//! These mirror the primitive types a state-enforcement engine knows how to
//! apply: packages, files, services, commands and class markers.

pub mod class;
pub mod exec;
pub mod file;
pub mod package;
pub mod service;

pub use class::Class;
pub use exec::Exec;
pub use file::File;
pub use package::Package;
pub use service::Service;
