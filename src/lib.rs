//! A turn-based Monopoly engine: board, players, dice, rent and building
//! rules, driven one command at a time.

pub mod agent;
pub mod board;
pub mod config;
pub mod construction;
pub mod dice;
pub mod error;
pub mod event;
pub mod game;
pub mod player;
pub mod rent;
pub mod snapshot;

pub use board::Board;
pub use config::GameConfig;
pub use dice::{Dice, DiceRoll, RandomDice, ScriptedDice};
pub use error::{GameError, SetupError};
pub use game::{Command, Game, Outcome, TurnPhase};
pub use snapshot::Snapshot;
