pub mod class;
pub mod document;
pub mod edge;
pub mod interface;
pub mod key;
pub mod literal;
pub mod node;

pub use class::*;
pub use document::*;
pub use edge::*;
pub use interface::*;
pub use key::*;
pub use literal::*;
pub use node::*;

/// Stable identity of classes, nodes and vertices. The nil id means "unassigned".
pub type Guid = uuid::Uuid;
