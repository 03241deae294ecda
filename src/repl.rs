use anyhow::{Context, Result};
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;
use std::fmt::Write;

use crate::args::Settings;
use crate::model::{Direction, Game, HoleId, PlayerId};
use crate::mvu::{DraftMsg, DraftSession, GameDraft, GameStore, Msg};
use crate::script;
use crate::view::{render_game, render_history, render_hole, render_standings};

const HELP_TEXT: &str = "\
New game form:
  new                      Open the new game form.
  name <text>              Set the game name.
  holes <n>                Set the number of holes.
  add [name]               Add a player.
  rename <#> <name>        Rename player number #.
  remove <#>               Remove player number # (not the first).
  location                 Toggle recording the current position.
  start | cancel           Create the game or close the form.
Running game:
  inc <player> [hole]      Add a stroke (player by name or number).
  dec <player> [hole]      Remove a stroke.
  finish [hole]            Mark a hole done (or open it again).
  focus <hole> | next | prev
  show                     Standings and every hole.
  end                      Finish the game and archive it.
  history                  Finished games.
  help, quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplCommand {
    New,
    Name(String),
    Holes(String),
    AddPlayer(String),
    RenamePlayer { number: usize, name: String },
    RemovePlayer(usize),
    Location,
    Start,
    Cancel,
    Score {
        direction: Direction,
        player: String,
        hole: Option<u32>,
    },
    Finish(Option<u32>),
    Focus(u32),
    Next,
    Prev,
    Show,
    End,
    History,
    Help,
    Quit,
}

/// Parses one input line.
///
/// # Errors
///
/// Returns a message suitable for printing when the line is not a command.
pub fn parse_command(line: &str) -> Result<ReplCommand, String> {
    let line = line.trim();
    let (word, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
    let rest = rest.trim();
    let command = match word.to_ascii_lowercase().as_str() {
        "new" => ReplCommand::New,
        "name" => ReplCommand::Name(rest.to_string()),
        "holes" => ReplCommand::Holes(rest.to_string()),
        "add" => ReplCommand::AddPlayer(rest.to_string()),
        "rename" => {
            let (number, name) = rest.split_once(char::is_whitespace).unwrap_or((rest, ""));
            ReplCommand::RenamePlayer {
                number: parse_number(number)?,
                name: name.trim().to_string(),
            }
        }
        "remove" => ReplCommand::RemovePlayer(parse_number(rest)?),
        "location" => ReplCommand::Location,
        "start" => ReplCommand::Start,
        "cancel" => ReplCommand::Cancel,
        "inc" | "dec" => {
            let direction = if word.eq_ignore_ascii_case("inc") {
                Direction::Inc
            } else {
                Direction::Dec
            };
            // a trailing number is the hole, the rest is the player
            let (player, hole) = match rest.rsplit_once(char::is_whitespace) {
                Some((player, last)) => match last.parse::<u32>() {
                    Ok(hole) => (player.trim(), Some(hole)),
                    Err(_) => (rest, None),
                },
                None => (rest, None),
            };
            if player.is_empty() {
                return Err(format!("usage: {word} <player> [hole]"));
            }
            ReplCommand::Score {
                direction,
                player: player.to_string(),
                hole,
            }
        }
        "finish" => ReplCommand::Finish(if rest.is_empty() {
            None
        } else {
            Some(parse_hole(rest)?)
        }),
        "focus" => ReplCommand::Focus(parse_hole(rest)?),
        "next" => ReplCommand::Next,
        "prev" => ReplCommand::Prev,
        "show" => ReplCommand::Show,
        "end" => ReplCommand::End,
        "history" => ReplCommand::History,
        "help" | "?" | "-h" | "--help" => ReplCommand::Help,
        "quit" | "exit" => ReplCommand::Quit,
        other => return Err(format!("Unknown command: {other}")),
    };
    Ok(command)
}

fn parse_number(text: &str) -> Result<usize, String> {
    text.trim()
        .parse::<usize>()
        .ok()
        .filter(|n| *n > 0)
        .ok_or_else(|| format!("expected a player number, got `{text}`"))
}

fn parse_hole(text: &str) -> Result<u32, String> {
    text.trim()
        .parse::<u32>()
        .map_err(|_| format!("expected a hole number, got `{text}`"))
}

/// Store, form and settings behind the prompt; usable without a terminal.
pub struct Repl {
    store: GameStore,
    session: DraftSession,
    settings: Settings,
}

impl Repl {
    pub fn new(store: GameStore, session: DraftSession, settings: Settings) -> Self {
        Self {
            store,
            session,
            settings,
        }
    }

    #[must_use]
    pub fn store(&self) -> &GameStore {
        &self.store
    }

    #[must_use]
    pub fn session(&self) -> &DraftSession {
        &self.session
    }

    /// Runs one command and returns the text to show.
    pub async fn execute(&mut self, command: ReplCommand) -> String {
        match command {
            ReplCommand::New => {
                if self.store.current_game().is_some() {
                    return "Finish the running game first (`end`).".to_string();
                }
                let draft = GameDraft::new(
                    self.settings.default_name.clone(),
                    self.settings.default_holes,
                    self.store.ids(),
                );
                self.session.open(draft);
                self.render_draft()
            }
            ReplCommand::Name(name) => self.draft_msg(DraftMsg::SetName(name)),
            ReplCommand::Holes(text) => {
                self.session.send(DraftMsg::SetHoles(text), self.store.ids());
                self.draft_msg(DraftMsg::CommitHoles)
            }
            ReplCommand::AddPlayer(name) => {
                if self.session.draft().is_none() {
                    return no_form();
                }
                self.session.send(DraftMsg::AddPlayer, self.store.ids());
                let added = self
                    .session
                    .draft()
                    .and_then(|d| d.players.last())
                    .map(|p| p.id.clone());
                match added {
                    Some(id) if !name.is_empty() => {
                        self.draft_msg(DraftMsg::RenamePlayer { id, name })
                    }
                    _ => self.render_draft(),
                }
            }
            ReplCommand::RenamePlayer { number, name } => match self.draft_player(number) {
                Some(id) => self.draft_msg(DraftMsg::RenamePlayer { id, name }),
                None => format!("No player {number}."),
            },
            ReplCommand::RemovePlayer(number) => match self.draft_player(number) {
                Some(id) => self.draft_msg(DraftMsg::RemovePlayer(id)),
                None => format!("No player {number}."),
            },
            ReplCommand::Location => {
                if self.session.draft().is_none() {
                    return no_form();
                }
                self.session.send(DraftMsg::ToggleLocation, self.store.ids());
                if self.session.has_pending_location() {
                    self.session.settle_location(self.store.ids()).await;
                }
                self.render_draft()
            }
            ReplCommand::Start => match self.session.submit() {
                Some(new_game) => {
                    self.store.run(Msg::CreateGame(new_game));
                    self.show_current()
                }
                None => no_form(),
            },
            ReplCommand::Cancel => {
                self.session.cancel();
                "Form closed.".to_string()
            }
            ReplCommand::Score {
                direction,
                player,
                hole,
            } => {
                let resolved = self.with_game(|game| {
                    let player_id = resolve_player(game, &player)?;
                    let hole_id = resolve_hole(game, hole)?;
                    Ok((hole_id, player_id))
                });
                match resolved {
                    Ok((hole_id, player_id)) => {
                        self.store.run(Msg::AdjustScore {
                            direction,
                            hole_id: hole_id.clone(),
                            player_id,
                        });
                        self.show_hole(&hole_id)
                    }
                    Err(message) => message,
                }
            }
            ReplCommand::Finish(hole) => match self.with_game(|game| resolve_hole(game, hole)) {
                Ok(hole_id) => {
                    self.store.run(Msg::ToggleHoleFinished(hole_id));
                    self.show_cursor()
                }
                Err(message) => message,
            },
            ReplCommand::Focus(ordinal) => {
                match self.with_game(|game| resolve_hole(game, Some(ordinal))) {
                    Ok(hole_id) => {
                        self.store.run(Msg::FocusHole(hole_id));
                        self.show_cursor()
                    }
                    Err(message) => message,
                }
            }
            ReplCommand::Next | ReplCommand::Prev => {
                let forward = command == ReplCommand::Next;
                let target = self.with_game(|game| {
                    let hole = if forward {
                        game.next_hole()
                    } else {
                        game.previous_hole()
                    };
                    hole.map(|h| h.id.clone())
                        .ok_or_else(|| "No hole in that direction.".to_string())
                });
                match target {
                    Ok(hole_id) => {
                        self.store.run(Msg::FocusHole(hole_id));
                        self.show_cursor()
                    }
                    Err(message) => message,
                }
            }
            ReplCommand::Show => match self.store.current_game() {
                Some(game) => render_game(game),
                None if self.session.draft().is_some() => self.render_draft(),
                None => "No game running; type `new`.".to_string(),
            },
            ReplCommand::End => {
                if self.store.current_game().is_none() {
                    return no_game();
                }
                self.store.run(Msg::FinishGame);
                match self.store.history().first() {
                    Some(game) => format!("Game over.\n{}", render_standings(game)),
                    None => "Game over.".to_string(),
                }
            }
            ReplCommand::History => render_history(&self.store.snapshot()),
            ReplCommand::Help => HELP_TEXT.to_string(),
            ReplCommand::Quit => String::new(),
        }
    }

    fn draft_msg(&mut self, msg: DraftMsg) -> String {
        if self.session.draft().is_none() {
            return no_form();
        }
        self.session.send(msg, self.store.ids());
        self.render_draft()
    }

    fn draft_player(&self, number: usize) -> Option<PlayerId> {
        self.session
            .draft()
            .and_then(|d| d.players.get(number.checked_sub(1)?))
            .map(|p| p.id.clone())
    }

    fn with_game<T>(&self, f: impl FnOnce(&Game) -> Result<T, String>) -> Result<T, String> {
        match self.store.current_game() {
            Some(game) => f(game),
            None => Err(no_game()),
        }
    }

    fn render_draft(&self) -> String {
        let Some(draft) = self.session.draft() else {
            return no_form();
        };
        let mut out = String::new();
        let _ = writeln!(out, "New game: {}", draft.name);
        let holes = draft.holes.map_or_else(|| "-".to_string(), |h| h.to_string());
        let _ = writeln!(out, "  holes: {holes}");
        for (i, player) in draft.players.iter().enumerate() {
            let _ = writeln!(out, "  {}. {}", i + 1, player.name);
        }
        let location = match (draft.location, draft.location_pending) {
            (Some(location), _) => location.to_string(),
            (None, true) => "waiting".to_string(),
            (None, false) => "off".to_string(),
        };
        let _ = write!(
            out,
            "  location: {location} (permission {})",
            self.session.meta().permissions.geolocation
        );
        out
    }

    fn show_hole(&self, hole_id: &HoleId) -> String {
        self.store
            .current_game()
            .and_then(|game| {
                game.hole(hole_id)
                    .map(|hole| render_hole(hole, hole.id == game.current_hole))
            })
            .unwrap_or_default()
    }

    fn show_cursor(&self) -> String {
        match self.store.current_game() {
            Some(game) => self.show_hole(&game.current_hole),
            None => no_game(),
        }
    }

    fn show_current(&self) -> String {
        self.store.current_game().map(render_game).unwrap_or_default()
    }
}

fn no_form() -> String {
    "No new game form open; type `new`.".to_string()
}

fn no_game() -> String {
    "No game running; type `new`.".to_string()
}

fn resolve_player(game: &Game, reference: &str) -> Result<PlayerId, String> {
    if let Ok(number) = reference.parse::<usize>() {
        if let Some(player) = number.checked_sub(1).and_then(|i| game.players.get(i)) {
            return Ok(player.id.clone());
        }
    }
    script::player_id(game, reference).map_err(|e| e.to_string())
}

fn resolve_hole(game: &Game, ordinal: Option<u32>) -> Result<HoleId, String> {
    match ordinal {
        Some(ordinal) => script::hole_id(game, ordinal).map_err(|e| e.to_string()),
        None => Ok(game.current_hole.clone()),
    }
}

/// Interactive loop on the terminal.
///
/// # Errors
///
/// Returns an error when the line editor cannot be initialised or reading input fails.
pub async fn run_repl(mut repl: Repl) -> Result<()> {
    println!("Minigolf scorecard. Type `help` for commands, Ctrl-D to quit.");
    let mut rl = DefaultEditor::new().context("init repl")?;
    loop {
        match rl.readline("minigolf> ") {
            Ok(line) => {
                let input = line.trim();
                if input.is_empty() {
                    continue;
                }
                rl.add_history_entry(input)?;
                match parse_command(input) {
                    Ok(ReplCommand::Quit) => break,
                    Ok(command) => println!("{}", repl.execute(command).await),
                    Err(message) => {
                        println!("{message}");
                        println!("{HELP_TEXT}");
                    }
                }
            }
            Err(ReadlineError::Interrupted | ReadlineError::Eof) => break,
            Err(err) => return Err(err).context("read repl input"),
        }
    }
    Ok(())
}
