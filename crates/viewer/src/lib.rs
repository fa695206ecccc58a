//! What the user sees and does: the layer list, fetch and toggle.
//!
//! `ViewerSession` is the one context object front ends construct and keep;
//! nothing here is global.

pub mod card;
pub mod config;
pub mod links;
pub mod session;

pub use card::*;
pub use config::*;
pub use links::*;
pub use session::*;
