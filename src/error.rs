use thiserror::Error;

use crate::board::{ColorGroup, SpaceId};

/// A command was rejected. The game state is untouched and stays usable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("cannot {command} while {state}")]
    InvalidCommandForState {
        command: &'static str,
        state: &'static str,
    },

    #[error("{0} can not be purchased")]
    PropertyNotPurchasable(String),

    #[error("{0} belongs to you already")]
    PropertyAlreadyOwnedBySelf(String),

    #[error("{0} belongs to someone else")]
    PropertyOwnedByOther(String),

    #[error("not enough money: need {needed}, have {available}")]
    InsufficientFunds { needed: i64, available: i64 },

    #[error("you do not own {0}")]
    SpaceNotOwned(String),

    #[error("you do not own every space in the group of {0}")]
    GroupNotFullyOwned(String),

    #[error("{0} is ahead of the rest of its group; build evenly")]
    UnevenBuilding(String),

    #[error("can not build on {0}")]
    NotBuildable(String),

    #[error("{0} already has a hotel")]
    HotelAlreadyPresent(String),

    #[error("no space at index {0}")]
    NoSuchSpace(SpaceId),

    #[error("the game has ended")]
    GameAlreadyEnded,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseCommandError {
    #[error("unknown command {0:?}, try 'help'")]
    Unknown(String),

    #[error("which space? give an index or a name")]
    MissingSpace,

    #[error("no space called {0:?}")]
    UnknownSpace(String),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BoardError {
    #[error("board must have exactly {expected} spaces, found {found}")]
    WrongSize { expected: usize, found: usize },

    #[error("space 0 must be Go")]
    GoNotFirst,

    #[error("board needs exactly one {kind} space, found {found}")]
    SpaceCount { kind: &'static str, found: usize },

    #[error("{0} has a zero price")]
    ZeroPrice(String),

    #[error("rent schedule of {0} decreases as it is improved")]
    DecreasingRent(String),

    #[error("{group:?} group mixes house prices {first} and {second}")]
    MixedHousePrice {
        group: ColorGroup,
        first: i64,
        second: i64,
    },

    #[error("{0:?} group has a single member")]
    LonelyGroup(ColorGroup),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("invalid configuration file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid configuration: {0}")]
    OutOfRange(String),
}

#[derive(Error, Debug)]
pub enum SetupError {
    #[error("need between {min} and {max} players, got {got}")]
    PlayerCount { min: usize, max: usize, got: usize },

    #[error("player name {0:?} is used twice")]
    DuplicateName(String),

    #[error(transparent)]
    Board(#[from] BoardError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("snapshot does not fit this game: {0}")]
    Snapshot(String),
}

impl GameError {
    // Stable across message wording.
    pub fn kind(&self) -> &'static str {
        match self {
            GameError::InvalidCommandForState { .. } => "InvalidCommandForState",
            GameError::PropertyNotPurchasable(_) => "PropertyNotPurchasable",
            GameError::PropertyAlreadyOwnedBySelf(_) => "PropertyAlreadyOwnedBySelf",
            GameError::PropertyOwnedByOther(_) => "PropertyOwnedByOther",
            GameError::InsufficientFunds { .. } => "InsufficientFunds",
            GameError::SpaceNotOwned(_) => "SpaceNotOwned",
            GameError::GroupNotFullyOwned(_) => "GroupNotFullyOwned",
            GameError::UnevenBuilding(_) => "UnevenBuilding",
            GameError::NotBuildable(_) => "NotBuildable",
            GameError::HotelAlreadyPresent(_) => "HotelAlreadyPresent",
            GameError::NoSuchSpace(_) => "NoSuchSpace",
            GameError::GameAlreadyEnded => "GameAlreadyEnded",
        }
    }
}
