pub mod entities;

// Re-export entity types
pub use entities::{Decision, Position, Trade};
