pub mod gateway;
pub mod manifest;
pub mod model;
pub mod query;
pub mod source;

pub use gateway::*;
pub use manifest::*;
pub use model::*;
pub use query::*;
pub use source::*;
