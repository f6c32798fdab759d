//! Example catalog wiring.
//!
//! `scan_catalog` walks a directory tree and pairs EisenScript files with
//! their JSON descriptions. The resulting `Catalog` is ordered by example
//! name and handed to the validator unchanged.

pub mod identity;
pub mod model;
pub mod scanner;

pub use identity::ExampleName;
pub use model::{Catalog, Example};
pub use scanner::scan_catalog;
