pub mod document;
pub mod node;
pub mod rule;
pub mod value;

pub use document::*;
pub use node::*;
pub use rule::*;
pub use value::*;
