//! HTTP Handlers

mod auth;
mod export;
mod node;
mod ping;
mod project;

pub use auth::*;
pub use export::*;
pub use node::*;
pub use ping::*;
pub use project::*;
