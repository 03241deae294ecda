pub mod draft;
pub mod game;
pub mod runtime;

pub use draft::{DraftEffect, DraftMsg, GameDraft};
pub use game::{update, Deps, Effect, Msg};
pub use runtime::{DraftSession, GameStore};
