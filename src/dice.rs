use std::collections::VecDeque;

use rand::Rng;
use serde::{Deserialize, Serialize};

pub const DIE_FACES: std::ops::RangeInclusive<u8> = 1..=6;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiceRoll(pub u8, pub u8);

impl DiceRoll {
    pub fn new(d1: u8, d2: u8) -> Option<Self> {
        if DIE_FACES.contains(&d1) && DIE_FACES.contains(&d2) {
            Some(Self(d1, d2))
        } else {
            None
        }
    }

    pub fn sum(&self) -> u8 {
        self.0 + self.1
    }

    pub fn is_double(&self) -> bool {
        self.0 == self.1
    }
}

impl std::fmt::Display for DiceRoll {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}+{}", self.0, self.1)
    }
}

pub trait Dice {
    fn throw(&mut self) -> DiceRoll;
}

pub struct RandomDice<R>(pub R);

impl<R: Rng> Dice for RandomDice<R> {
    fn throw(&mut self) -> DiceRoll {
        DiceRoll(self.0.gen_range(DIE_FACES), self.0.gen_range(DIE_FACES))
    }
}

/// Replays a fixed list of throws, for tests and replays.
///
/// Panics when it runs out, or if a face is outside 1..=6.
#[derive(Default, Clone, Debug)]
pub struct ScriptedDice {
    throws: VecDeque<(u8, u8)>,
}

impl ScriptedDice {
    pub fn new(throws: &[(u8, u8)]) -> Self {
        Self {
            throws: throws.iter().copied().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.throws.len()
    }
}

impl Dice for ScriptedDice {
    fn throw(&mut self) -> DiceRoll {
        let (d1, d2) = match self.throws.pop_front() {
            Some(t) => t,
            None => panic!("Scripted dice exhausted"),
        };
        match DiceRoll::new(d1, d2) {
            Some(roll) => roll,
            None => panic!("Invalid die face in {}+{}", d1, d2),
        }
    }
}
