use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::fmt;
use uuid::Uuid;

macro_rules! opaque_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

opaque_id!(
    /// Identity of a game, also used to tell drafts apart.
    GameId
);
opaque_id!(HoleId);
opaque_id!(PlayerId);

/// Source of fresh opaque identifiers.
pub trait IdSource {
    fn next_id(&self) -> String;

    fn game_id(&self) -> GameId {
        GameId(self.next_id())
    }

    fn hole_id(&self) -> HoleId {
        HoleId(self.next_id())
    }

    fn player_id(&self) -> PlayerId {
        PlayerId(self.next_id())
    }
}

/// Random v4 uuids, simple (hyphenless) form.
#[derive(Debug, Default, Clone, Copy)]
pub struct UuidIds;

impl IdSource for UuidIds {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}

/// Deterministic ids (`id-1`, `id-2`, ...) for tests and replays.
#[derive(Debug, Default)]
pub struct SequentialIds {
    next: Cell<u64>,
}

impl SequentialIds {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl IdSource for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.get() + 1;
        self.next.set(n);
        format!("id-{n}")
    }
}
