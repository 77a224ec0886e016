//! Read-only graph analysis over a document.

pub mod topology;

pub use topology::GraphTopology;
