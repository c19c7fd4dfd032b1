use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::board::{Board, SpaceId};

// Signed: a balance dips below zero right before bankruptcy.
pub type Money = i64;

pub type PlayerId = usize;

#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub balance: Money,
    pub position: SpaceId,
    pub in_jail: bool,
    pub turns_in_jail: u8,
    pub consecutive_doubles: u8,
    pub owned: BTreeSet<SpaceId>,
    pub bankrupt: bool,
}

impl Player {
    pub fn new(id: PlayerId, name: &str, balance: Money) -> Self {
        Self {
            id,
            name: name.to_owned(),
            balance,
            position: 0,
            in_jail: false,
            turns_in_jail: 0,
            consecutive_doubles: 0,
            owned: BTreeSet::new(),
            bankrupt: false,
        }
    }

    pub fn owns(&self, space: SpaceId) -> bool {
        self.owned.contains(&space)
    }

    pub fn display(&self, board: &Board, currency: &str) -> String {
        let status = if self.bankrupt {
            " [bankrupt]"
        } else if self.in_jail {
            " [in jail]"
        } else {
            ""
        };
        format!(
            "{}: {}{} on {}{}, Properties: [{}]",
            self.name,
            currency,
            self.balance,
            board.space(self.position).name,
            status,
            self.owned
                .iter()
                .map(|&id| board.space(id).name.as_str())
                .collect::<Vec<&str>>()
                .join(", ")
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn player_display() {
        let board = Board::standard();
        let mut p = Player::new(0, "Ann", 1500);
        assert_eq!(p.display(&board, "$"), "Ann: $1500 on Go, Properties: []");
        p.position = 10;
        p.in_jail = true;
        p.owned.insert(39);
        p.owned.insert(1);
        assert_eq!(
            p.display(&board, "$"),
            "Ann: $1500 on Jail [in jail], Properties: [Mediterranean Avenue, Boardwalk]"
        );
    }
}
