use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::error::BoardError;
use crate::player::{Money, PlayerId};

pub const BOARD_SIZE: usize = 40;

pub type SpaceId = usize;

#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize_repr, Deserialize_repr)]
#[repr(u8)]
pub enum ColorGroup {
    Brown = 0,
    LightBlue = 1,
    Pink = 2,
    Orange = 3,
    Red = 4,
    Yellow = 5,
    Green = 6,
    DarkBlue = 7,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SpaceKind {
    Go,
    Street {
        group: ColorGroup,
        price: Money,
        // Indexed by improvement level: unimproved, 1-4 houses, hotel.
        rents: [Money; 6],
        house_price: Money,
    },
    Railroad {
        price: Money,
        base_rent: Money,
    },
    Utility {
        price: Money,
    },
    Tax {
        amount: Money,
    },
    Jail,
    GoToJail,
    FreeParking,
    Chance,
    CommunityChest,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Space {
    pub name: String,
    pub kind: SpaceKind,
}

impl Space {
    pub fn new(name: &str, kind: SpaceKind) -> Self {
        Self {
            name: name.to_owned(),
            kind,
        }
    }

    fn street(name: &str, group: ColorGroup, price: Money, rents: [Money; 6], house_price: Money) -> Self {
        Self::new(
            name,
            SpaceKind::Street {
                group,
                price,
                rents,
                house_price,
            },
        )
    }

    pub fn price(&self) -> Option<Money> {
        match self.kind {
            SpaceKind::Street { price, .. }
            | SpaceKind::Railroad { price, .. }
            | SpaceKind::Utility { price } => Some(price),
            _ => None,
        }
    }

    pub fn is_ownable(&self) -> bool {
        self.price().is_some()
    }

    pub fn group(&self) -> Option<GroupKey> {
        match self.kind {
            SpaceKind::Street { group, .. } => Some(GroupKey::Color(group)),
            SpaceKind::Railroad { .. } => Some(GroupKey::Railroads),
            SpaceKind::Utility { .. } => Some(GroupKey::Utilities),
            _ => None,
        }
    }
}

/// The set a space is counted in for ownership purposes. Railroads and
/// utilities form their own sets with their own rent rules.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum GroupKey {
    Color(ColorGroup),
    Railroads,
    Utilities,
}

/// Ownership and buildings on one space. The game keeps one per space;
/// non-ownable spaces simply never get an owner.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deed {
    // None is the bank.
    pub owner: Option<PlayerId>,
    pub houses: u8,
    pub hotel: bool,
}

impl Deed {
    // 0-4 houses, 5 for a hotel.
    pub fn level(&self) -> u8 {
        if self.hotel {
            5
        } else {
            self.houses
        }
    }

    pub fn is_improved(&self) -> bool {
        self.level() > 0
    }

    pub fn release(&mut self) {
        *self = Deed::default();
    }
}

#[derive(Clone, Debug)]
pub struct Board {
    spaces: Vec<Space>,
    groups: HashMap<GroupKey, Vec<SpaceId>>,
    jail: SpaceId,
    go_to_jail: SpaceId,
}

impl Board {
    pub fn new(spaces: Vec<Space>) -> Result<Self, BoardError> {
        if spaces.len() != BOARD_SIZE {
            return Err(BoardError::WrongSize {
                expected: BOARD_SIZE,
                found: spaces.len(),
            });
        }
        if spaces[0].kind != SpaceKind::Go {
            return Err(BoardError::GoNotFirst);
        }
        let jail = single_index(&spaces, "jail", |k| *k == SpaceKind::Jail)?;
        let go_to_jail = single_index(&spaces, "go to jail", |k| *k == SpaceKind::GoToJail)?;
        single_index(&spaces, "go", |k| *k == SpaceKind::Go)?;

        let mut groups: HashMap<GroupKey, Vec<SpaceId>> = HashMap::new();
        let mut house_prices: HashMap<ColorGroup, Money> = HashMap::new();
        for (i, space) in spaces.iter().enumerate() {
            if let Some(price) = space.price() {
                if price <= 0 {
                    return Err(BoardError::ZeroPrice(space.name.clone()));
                }
            }
            if let SpaceKind::Street {
                group,
                rents,
                house_price,
                ..
            } = &space.kind
            {
                if *house_price <= 0 {
                    return Err(BoardError::ZeroPrice(space.name.clone()));
                }
                if rents.windows(2).any(|w| w[1] < w[0]) || rents[0] < 0 {
                    return Err(BoardError::DecreasingRent(space.name.clone()));
                }
                let first = *house_prices.entry(*group).or_insert(*house_price);
                if first != *house_price {
                    return Err(BoardError::MixedHousePrice {
                        group: *group,
                        first,
                        second: *house_price,
                    });
                }
            }
            if let Some(key) = space.group() {
                groups.entry(key).or_default().push(i);
            }
        }
        for (key, members) in &groups {
            if let GroupKey::Color(color) = key {
                if members.len() < 2 {
                    return Err(BoardError::LonelyGroup(*color));
                }
            }
        }

        Ok(Self {
            spaces,
            groups,
            jail,
            go_to_jail,
        })
    }

    pub fn standard() -> Self {
        match Self::new(standard_spaces()) {
            Ok(board) => board,
            Err(e) => panic!("standard board is invalid: {}", e),
        }
    }

    pub fn space(&self, id: SpaceId) -> &Space {
        &self.spaces[id]
    }

    pub fn get(&self, id: SpaceId) -> Option<&Space> {
        self.spaces.get(id)
    }

    pub fn spaces(&self) -> &[Space] {
        &self.spaces
    }

    pub fn len(&self) -> usize {
        self.spaces.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spaces.is_empty()
    }

    pub fn jail(&self) -> SpaceId {
        self.jail
    }

    pub fn go_to_jail(&self) -> SpaceId {
        self.go_to_jail
    }

    pub fn group_members(&self, key: GroupKey) -> &[SpaceId] {
        self.groups.get(&key).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn find(&self, name: &str) -> Option<SpaceId> {
        self.spaces
            .iter()
            .position(|s| s.name.eq_ignore_ascii_case(name.trim()))
    }
}

fn single_index(
    spaces: &[Space],
    kind: &'static str,
    pred: impl Fn(&SpaceKind) -> bool,
) -> Result<SpaceId, BoardError> {
    let found: Vec<SpaceId> = spaces
        .iter()
        .enumerate()
        .filter(|(_, s)| pred(&s.kind))
        .map(|(i, _)| i)
        .collect();
    match found.as_slice() {
        [i] => Ok(*i),
        _ => Err(BoardError::SpaceCount {
            kind,
            found: found.len(),
        }),
    }
}

pub fn standard_spaces() -> Vec<Space> {
    use ColorGroup::*;
    let rail = |name: &str| {
        Space::new(
            name,
            SpaceKind::Railroad {
                price: 200,
                base_rent: 25,
            },
        )
    };
    let utility = |name: &str| Space::new(name, SpaceKind::Utility { price: 150 });
    vec![
        Space::new("Go", SpaceKind::Go),
        Space::street("Mediterranean Avenue", Brown, 60, [2, 10, 30, 90, 160, 250], 50),
        Space::new("Community Chest", SpaceKind::CommunityChest),
        Space::street("Baltic Avenue", Brown, 60, [4, 20, 60, 180, 320, 450], 50),
        Space::new("Income Tax", SpaceKind::Tax { amount: 200 }),
        rail("Reading Railroad"),
        Space::street("Oriental Avenue", LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
        Space::new("Chance", SpaceKind::Chance),
        Space::street("Vermont Avenue", LightBlue, 100, [6, 30, 90, 270, 400, 550], 50),
        Space::street("Connecticut Avenue", LightBlue, 120, [8, 40, 100, 300, 450, 600], 50),
        Space::new("Jail", SpaceKind::Jail),
        Space::street("St. Charles Place", Pink, 140, [10, 50, 150, 450, 625, 750], 100),
        utility("Electric Company"),
        Space::street("States Avenue", Pink, 140, [10, 50, 150, 450, 625, 750], 100),
        Space::street("Virginia Avenue", Pink, 160, [12, 60, 180, 500, 700, 900], 100),
        rail("Pennsylvania Railroad"),
        Space::street("St. James Place", Orange, 180, [14, 70, 200, 550, 750, 950], 100),
        Space::new("Community Chest", SpaceKind::CommunityChest),
        Space::street("Tennessee Avenue", Orange, 180, [14, 70, 200, 550, 750, 950], 100),
        Space::street("New York Avenue", Orange, 200, [16, 80, 220, 600, 800, 1000], 100),
        Space::new("Free Parking", SpaceKind::FreeParking),
        Space::street("Kentucky Avenue", Red, 220, [18, 90, 250, 700, 875, 1050], 150),
        Space::new("Chance", SpaceKind::Chance),
        Space::street("Indiana Avenue", Red, 220, [18, 90, 250, 700, 875, 1050], 150),
        Space::street("Illinois Avenue", Red, 240, [20, 100, 300, 750, 925, 1100], 150),
        rail("B. & O. Railroad"),
        Space::street("Atlantic Avenue", Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
        Space::street("Ventnor Avenue", Yellow, 260, [22, 110, 330, 800, 975, 1150], 150),
        utility("Water Works"),
        Space::street("Marvin Gardens", Yellow, 280, [24, 120, 360, 850, 1025, 1200], 150),
        Space::new("Go To Jail", SpaceKind::GoToJail),
        Space::street("Pacific Avenue", Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
        Space::street("North Carolina Avenue", Green, 300, [26, 130, 390, 900, 1100, 1275], 200),
        Space::new("Community Chest", SpaceKind::CommunityChest),
        Space::street("Pennsylvania Avenue", Green, 320, [28, 150, 450, 1000, 1200, 1400], 200),
        rail("Short Line"),
        Space::new("Chance", SpaceKind::Chance),
        Space::street("Park Place", DarkBlue, 350, [35, 175, 500, 1100, 1300, 1500], 200),
        Space::new("Luxury Tax", SpaceKind::Tax { amount: 100 }),
        Space::street("Boardwalk", DarkBlue, 400, [50, 200, 600, 1400, 1700, 2000], 200),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_board_layout() {
        let board = Board::standard();
        assert_eq!(board.len(), BOARD_SIZE);
        assert_eq!(board.jail(), 10);
        assert_eq!(board.go_to_jail(), 30);
        assert_eq!(board.group_members(GroupKey::Color(ColorGroup::Brown)), &[1, 3]);
        assert_eq!(board.group_members(GroupKey::Railroads), &[5, 15, 25, 35]);
        assert_eq!(board.group_members(GroupKey::Utilities), &[12, 28]);
        assert_eq!(board.space(6).price(), Some(100));
        assert_eq!(board.space(4).price(), None);
        assert_eq!(board.find("boardwalk"), Some(39));
    }

    #[test]
    fn rejects_short_board() {
        let mut spaces = standard_spaces();
        spaces.pop();
        assert_eq!(
            Board::new(spaces).unwrap_err(),
            BoardError::WrongSize {
                expected: 40,
                found: 39
            }
        );
    }

    #[test]
    fn rejects_second_jail() {
        let mut spaces = standard_spaces();
        spaces[20] = Space::new("Other Jail", SpaceKind::Jail);
        assert_eq!(
            Board::new(spaces).unwrap_err(),
            BoardError::SpaceCount {
                kind: "jail",
                found: 2
            }
        );
    }

    #[test]
    fn rejects_mixed_house_prices() {
        let mut spaces = standard_spaces();
        spaces[3] = Space::street("Baltic Avenue", ColorGroup::Brown, 60, [4, 20, 60, 180, 320, 450], 75);
        assert!(matches!(
            Board::new(spaces),
            Err(BoardError::MixedHousePrice { group: ColorGroup::Brown, .. })
        ));
    }

    #[test]
    fn rejects_decreasing_rent() {
        let mut spaces = standard_spaces();
        spaces[1] = Space::street("Mediterranean Avenue", ColorGroup::Brown, 60, [2, 10, 5, 90, 160, 250], 50);
        assert_eq!(
            Board::new(spaces).unwrap_err(),
            BoardError::DecreasingRent("Mediterranean Avenue".to_owned())
        );
    }
}
