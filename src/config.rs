//! Rule constants, with defaults for the classic game. Can be loaded from TOML:
//!
//! ```toml
//! starting_balance = 1500
//! jail_double_moves = true
//! bankruptcy_transfer = "creditor"
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::player::Money;

/// Who takes a bankrupt player's spaces when the debt was owed to a player.
/// Debts to the bank (tax, jail fine) always return the spaces to the bank.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankruptcyTransfer {
    #[default]
    Bank,
    Creditor,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GameConfig {
    pub starting_balance: Money,
    pub pass_go_bonus: Money,
    pub jail_fine: Money,
    /// Failed jail rolls before the fine is charged and the player released.
    pub max_turns_in_jail: u8,
    /// The double that sends a player to jail.
    pub max_consecutive_doubles: u8,
    /// Move by the dice after rolling out of jail with a double. The classic
    /// engine ends the turn without moving.
    pub jail_double_moves: bool,
    pub bankruptcy_transfer: BankruptcyTransfer,
    pub min_players: usize,
    pub max_players: usize,
    pub currency: String,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            starting_balance: 1500,
            pass_go_bonus: 200,
            jail_fine: 50,
            max_turns_in_jail: 3,
            max_consecutive_doubles: 3,
            jail_double_moves: false,
            bankruptcy_transfer: BankruptcyTransfer::Bank,
            min_players: 2,
            max_players: 8,
            currency: "$".to_owned(),
        }
    }
}

impl GameConfig {
    // Missing keys keep their defaults.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: GameConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let out_of_range = |msg: &str| Err(ConfigError::OutOfRange(msg.to_owned()));
        if self.starting_balance <= 0 {
            return out_of_range("starting_balance must be positive");
        }
        if self.pass_go_bonus < 0 || self.jail_fine < 0 {
            return out_of_range("pass_go_bonus and jail_fine can not be negative");
        }
        if self.max_turns_in_jail == 0 {
            return out_of_range("max_turns_in_jail must be at least 1");
        }
        if self.max_consecutive_doubles == 0 {
            return out_of_range("max_consecutive_doubles must be at least 1");
        }
        if self.min_players < 2 || self.max_players < self.min_players {
            return out_of_range("need 2 <= min_players <= max_players");
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_the_default() {
        assert_eq!(GameConfig::from_toml_str("").unwrap(), GameConfig::default());
    }

    #[test]
    fn partial_toml_overrides() {
        let config = GameConfig::from_toml_str(
            r#"
            starting_balance = 2000
            jail_double_moves = true
            bankruptcy_transfer = "creditor"
            currency = "£"
            "#,
        )
        .unwrap();
        assert_eq!(config.starting_balance, 2000);
        assert!(config.jail_double_moves);
        assert_eq!(config.bankruptcy_transfer, BankruptcyTransfer::Creditor);
        assert_eq!(config.currency, "£");
        assert_eq!(config.jail_fine, 50);
    }

    #[test]
    fn rejects_unknown_keys() {
        assert!(matches!(
            GameConfig::from_toml_str("auction = true"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_out_of_range() {
        assert!(matches!(
            GameConfig::from_toml_str("max_turns_in_jail = 0"),
            Err(ConfigError::OutOfRange(_))
        ));
        assert!(matches!(
            GameConfig::from_toml_str("min_players = 1"),
            Err(ConfigError::OutOfRange(_))
        ));
    }
}
