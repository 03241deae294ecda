mod game;
pub mod ids;
pub mod types;

pub use game::MAX_HOLES;
pub use ids::{GameId, HoleId, IdSource, PlayerId, SequentialIds, UuidIds};
pub use types::{
    Direction, Game, GameState, Hole, Location, MetaData, NewGame, PermissionState, Permissions,
    Player, PlayerScore,
};
