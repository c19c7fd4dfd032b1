use crate::board::{Board, Deed, GroupKey, SpaceId, SpaceKind};
use crate::error::GameError;
use crate::player::{Money, Player, PlayerId};

// The next purchase after this many houses is a hotel.
pub const HOUSES_BEFORE_HOTEL: u8 = 4;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Building {
    // Payload: house count after building.
    House(u8),
    Hotel,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BuildPlan {
    pub space: SpaceId,
    pub building: Building,
    pub cost: Money,
}

pub fn owns_full_group(board: &Board, deeds: &[Deed], player: PlayerId, key: GroupKey) -> bool {
    let members = board.group_members(key);
    !members.is_empty() && members.iter().all(|&id| deeds[id].owner == Some(player))
}

pub fn railroads_owned(board: &Board, deeds: &[Deed], player: PlayerId) -> usize {
    board
        .group_members(GroupKey::Railroads)
        .iter()
        .filter(|&&id| deeds[id].owner == Some(player))
        .count()
}

pub fn owns_both_utilities(board: &Board, deeds: &[Deed], player: PlayerId) -> bool {
    owns_full_group(board, deeds, player, GroupKey::Utilities)
}

pub fn group_is_improved(board: &Board, deeds: &[Deed], key: GroupKey) -> bool {
    board
        .group_members(key)
        .iter()
        .any(|&id| deeds[id].is_improved())
}

/// Check whether `player` may buy the next house/hotel on `space`. The first
/// failing check is returned, with funds checked last.
pub fn validate_build(
    board: &Board,
    deeds: &[Deed],
    player: &Player,
    space: SpaceId,
) -> Result<BuildPlan, GameError> {
    let target = board.get(space).ok_or(GameError::NoSuchSpace(space))?;
    let name = || target.name.clone();
    let deed = deeds[space];

    let key = match target.group() {
        Some(key) if deed.owner == Some(player.id) => key,
        _ => return Err(GameError::SpaceNotOwned(name())),
    };
    if !owns_full_group(board, deeds, player.id, key) {
        return Err(GameError::GroupNotFullyOwned(name()));
    }
    // No group-mate may lag behind the space being built on.
    let level = deed.level();
    if board
        .group_members(key)
        .iter()
        .any(|&id| id != space && deeds[id].level() < level)
    {
        return Err(GameError::UnevenBuilding(name()));
    }
    let house_price = match target.kind {
        SpaceKind::Street { house_price, .. } => house_price,
        _ => return Err(GameError::NotBuildable(name())),
    };
    if deed.hotel {
        return Err(GameError::HotelAlreadyPresent(name()));
    }
    if player.balance < house_price {
        return Err(GameError::InsufficientFunds {
            needed: house_price,
            available: player.balance,
        });
    }

    let building = if deed.houses == HOUSES_BEFORE_HOTEL {
        Building::Hotel
    } else {
        Building::House(deed.houses + 1)
    };
    Ok(BuildPlan {
        space,
        building,
        cost: house_price,
    })
}

pub fn apply_build(deeds: &mut [Deed], plan: &BuildPlan) {
    let deed = &mut deeds[plan.space];
    match plan.building {
        Building::House(count) => deed.houses = count,
        Building::Hotel => {
            deed.houses = 0;
            deed.hotel = true;
        }
    }
}

// Ignores funds.
pub fn buildable_spaces(board: &Board, deeds: &[Deed], player: &Player) -> Vec<SpaceId> {
    player
        .owned
        .iter()
        .copied()
        .filter(|&id| match validate_build(board, deeds, player, id) {
            Ok(_) | Err(GameError::InsufficientFunds { .. }) => true,
            Err(_) => false,
        })
        .collect()
}
