pub mod batch;
pub mod cli;
pub mod conflict;
pub mod edit;
pub mod error;
pub mod locate;
pub mod plan;
pub mod position;
pub mod syntax;
pub mod text;

pub use batch::{Processed, process};
pub use error::TuckError;
pub use position::{Position, Span};
