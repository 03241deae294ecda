pub mod args;
pub mod error;
pub mod geo;
pub mod model;
pub mod mvu;
pub mod repl;
pub mod script;
pub mod view;

pub use error::AppError;
pub use mvu::{DraftSession, GameStore};
