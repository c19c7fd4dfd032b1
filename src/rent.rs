use serde::{Deserialize, Serialize};

use crate::board::{Board, Deed, SpaceId, SpaceKind};
use crate::construction::{group_is_improved, owns_both_utilities, owns_full_group, railroads_owned};
use crate::dice::DiceRoll;
use crate::player::{Money, PlayerId};

// Dice sum multipliers for one utility and for both.
pub const UTILITY_SINGLE_MULTIPLIER: Money = 4;
pub const UTILITY_PAIR_MULTIPLIER: Money = 10;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payee {
    Bank,
    Player(PlayerId),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RentDue {
    pub amount: Money,
    pub payee: Payee,
}

/// Work out what `lander` owes for landing on `space` with `dice`.
///
/// Returns `None` when nothing is owed: the space is unowned, owned by the
/// lander, or is not a rent or tax space.
pub fn compute_rent(
    board: &Board,
    deeds: &[Deed],
    space: SpaceId,
    lander: PlayerId,
    dice: DiceRoll,
) -> Option<RentDue> {
    let kind = &board.space(space).kind;
    if let SpaceKind::Tax { amount } = *kind {
        return Some(RentDue {
            amount: amount.max(0),
            payee: Payee::Bank,
        });
    }

    let deed = deeds[space];
    let owner = deed.owner.filter(|&o| o != lander)?;
    let amount = match *kind {
        SpaceKind::Street { rents, .. } => {
            let rent = rents[deed.level() as usize];
            let key = board.space(space).group()?;
            // Unimproved full sets pay double; improved rent schedules never do.
            if !deed.is_improved()
                && owns_full_group(board, deeds, owner, key)
                && !group_is_improved(board, deeds, key)
            {
                rent * 2
            } else {
                rent
            }
        }
        SpaceKind::Railroad { base_rent, .. } => {
            let owned = railroads_owned(board, deeds, owner).max(1) as u32;
            base_rent << (owned - 1)
        }
        SpaceKind::Utility { .. } => {
            let multiplier = if owns_both_utilities(board, deeds, owner) {
                UTILITY_PAIR_MULTIPLIER
            } else {
                UTILITY_SINGLE_MULTIPLIER
            };
            Money::from(dice.sum()) * multiplier
        }
        _ => return None,
    };
    Some(RentDue {
        amount: amount.max(0),
        payee: Payee::Player(owner),
    })
}
