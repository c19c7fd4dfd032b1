use serde::{Deserialize, Serialize};

use crate::board::{Board, Deed, SpaceKind};
use crate::config::GameConfig;
use crate::construction::HOUSES_BEFORE_HOTEL;
use crate::dice::DiceRoll;
use crate::error::SetupError;
use crate::event::EventBus;
use crate::game::{Game, TurnPhase};
use crate::player::{Player, PlayerId};

/// Everything needed to display a game or carry on playing it later.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
pub struct Snapshot {
    pub current_player: PlayerId,
    pub phase: TurnPhase,
    pub last_dice: Option<DiceRoll>,
    pub players: Vec<Player>,
    // One deed per board space, in board order.
    pub spaces: Vec<Deed>,
}

impl Snapshot {
    pub fn winner(&self) -> Option<PlayerId> {
        match self.phase {
            TurnPhase::Ended(winner) => Some(winner),
            _ => None,
        }
    }
}

impl Game {
    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            current_player: self.current,
            phase: self.phase,
            last_dice: self.last_dice,
            players: self.players.clone(),
            spaces: self.deeds.clone(),
        }
    }

    // The restored game has no event subscribers.
    pub fn from_snapshot(
        board: Board,
        config: GameConfig,
        snapshot: Snapshot,
    ) -> Result<Self, SetupError> {
        config.validate()?;
        let Snapshot {
            current_player,
            phase,
            last_dice,
            players,
            spaces,
        } = snapshot;

        let bad = |msg: String| Err(SetupError::Snapshot(msg));
        let count = players.len();
        if count < config.min_players || count > config.max_players {
            return Err(SetupError::PlayerCount {
                min: config.min_players,
                max: config.max_players,
                got: count,
            });
        }
        if spaces.len() != board.len() {
            return bad(format!("{} spaces for a board of {}", spaces.len(), board.len()));
        }
        if current_player >= count {
            return bad(format!("current player {} out of range", current_player));
        }
        if let Some(dice) = last_dice {
            if DiceRoll::new(dice.0, dice.1).is_none() {
                return bad(format!("impossible dice {}", dice));
            }
        }

        for (i, p) in players.iter().enumerate() {
            if p.id != i {
                return bad(format!("{} is listed at {} but has id {}", p.name, i, p.id));
            }
            if players[..i].iter().any(|q| q.name == p.name) {
                return Err(SetupError::DuplicateName(p.name.clone()));
            }
            if p.position >= board.len() {
                return bad(format!("{} is off the board at {}", p.name, p.position));
            }
            if p.in_jail && p.position != board.jail() {
                return bad(format!("{} is in jail but not on the jail space", p.name));
            }
            if p.turns_in_jail >= config.max_turns_in_jail {
                return bad(format!("{} has served {} turns in jail", p.name, p.turns_in_jail));
            }
            if p.consecutive_doubles >= config.max_consecutive_doubles {
                return bad(format!("{} has rolled {} doubles in a row", p.name, p.consecutive_doubles));
            }
            if p.bankrupt && !p.owned.is_empty() {
                return bad(format!("{} is bankrupt but still owns spaces", p.name));
            }
            let stray = p
                .owned
                .iter()
                .find(|&&s| s >= spaces.len() || spaces[s].owner != Some(i));
            if let Some(space) = stray {
                return bad(format!("{} lists space {} it does not own", p.name, space));
            }
        }

        for (id, (deed, space)) in spaces.iter().zip(board.spaces()).enumerate() {
            if let Some(owner) = deed.owner {
                if !space.is_ownable() {
                    return bad(format!("{} can not be owned", space.name));
                }
                if owner >= count || !players[owner].owns(id) {
                    return bad(format!("owner of {} does not list it", space.name));
                }
            }
            if deed.is_improved() {
                if deed.owner.is_none() || !matches!(space.kind, SpaceKind::Street { .. }) {
                    return bad(format!("{} can not carry buildings", space.name));
                }
                if deed.houses > HOUSES_BEFORE_HOTEL || (deed.hotel && deed.houses > 0) {
                    return bad(format!("{} has too many buildings", space.name));
                }
            }
        }

        let standing = players.iter().filter(|p| !p.bankrupt).count();
        match phase {
            TurnPhase::Ended(winner) => {
                if winner >= count || players[winner].bankrupt || standing != 1 {
                    return bad(format!("player {} can not have won", winner));
                }
            }
            _ => {
                let current = &players[current_player];
                if current.bankrupt || standing < 2 {
                    return bad("the game should be over".to_owned());
                }
                if current.in_jail != (phase == TurnPhase::InJail) {
                    return bad(format!("{:?} does not match the jail status of {}", phase, current.name));
                }
            }
        }

        Ok(Self {
            board,
            config,
            players,
            deeds: spaces,
            current: current_player,
            phase,
            last_dice,
            events: EventBus::default(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::ScriptedDice;

    fn played_game() -> Game {
        let mut game = Game::new(Board::standard(), &["Ann", "Bob"], GameConfig::default()).unwrap();
        let mut dice = ScriptedDice::new(&[(2, 4), (1, 2)]);
        game.roll(&mut dice).unwrap();
        game.purchase_property().unwrap();
        game.pass_turn().unwrap();
        game.roll(&mut dice).unwrap();
        game
    }

    fn play_on(game: &mut Game) {
        let mut dice = ScriptedDice::new(&[(3, 4), (2, 1)]);
        game.pass_turn().unwrap();
        game.roll(&mut dice).unwrap();
        game.pass_turn().unwrap();
        game.roll(&mut dice).unwrap();
    }

    #[test]
    fn snapshot_reports_state() {
        let game = played_game();
        let snap = game.snapshot();
        assert_eq!(snap.current_player, 1);
        assert_eq!(snap.phase, TurnPhase::AwaitingAction);
        assert_eq!(snap.last_dice, Some(DiceRoll(1, 2)));
        assert_eq!(snap.players[0].balance, 1400);
        assert_eq!(snap.players[1].position, 3);
        assert_eq!(snap.spaces[6].owner, Some(0));
        assert_eq!(snap.winner(), None);
    }

    #[test]
    fn restore_continues_the_same_game() {
        let mut original = played_game();
        let mut restored =
            Game::from_snapshot(Board::standard(), GameConfig::default(), original.snapshot()).unwrap();
        assert_eq!(restored.snapshot(), original.snapshot());

        play_on(&mut original);
        play_on(&mut restored);
        assert_eq!(restored.snapshot(), original.snapshot());
    }

    #[test]
    fn rejects_inconsistent_ownership() {
        let mut snap = played_game().snapshot();
        snap.spaces[6].owner = Some(1);
        assert!(matches!(
            Game::from_snapshot(Board::standard(), GameConfig::default(), snap),
            Err(SetupError::Snapshot(_))
        ));

        let mut snap = played_game().snapshot();
        snap.spaces[0].owner = Some(0);
        snap.players[0].owned.insert(0);
        assert!(matches!(
            Game::from_snapshot(Board::standard(), GameConfig::default(), snap),
            Err(SetupError::Snapshot(_))
        ));
    }

    #[test]
    fn rejects_bad_shapes() {
        let mut snap = played_game().snapshot();
        snap.spaces.pop();
        assert!(Game::from_snapshot(Board::standard(), GameConfig::default(), snap).is_err());

        let mut snap = played_game().snapshot();
        snap.players[1].position = 40;
        assert!(Game::from_snapshot(Board::standard(), GameConfig::default(), snap).is_err());

        let mut snap = played_game().snapshot();
        snap.phase = TurnPhase::InJail;
        assert!(Game::from_snapshot(Board::standard(), GameConfig::default(), snap).is_err());

        let mut snap = played_game().snapshot();
        snap.players.truncate(1);
        snap.current_player = 0;
        assert!(matches!(
            Game::from_snapshot(Board::standard(), GameConfig::default(), snap),
            Err(SetupError::PlayerCount { .. })
        ));
    }

    fn rejection(snap: Snapshot) -> String {
        match Game::from_snapshot(Board::standard(), GameConfig::default(), snap) {
            Err(SetupError::Snapshot(msg)) => msg,
            Err(e) => panic!("wrong error: {}", e),
            Ok(_) => panic!("snapshot was accepted"),
        }
    }

    #[test]
    fn rejects_out_of_range_counters() {
        let mut snap = played_game().snapshot();
        snap.players[0].turns_in_jail = 255;
        assert!(rejection(snap).contains("turns in jail"));

        let mut snap = played_game().snapshot();
        snap.players[1].consecutive_doubles = 3;
        assert!(rejection(snap).contains("doubles in a row"));

        // The largest legal counters still restore and roll.
        let mut snap = played_game().snapshot();
        snap.players[0].position = 10;
        snap.players[0].in_jail = true;
        snap.players[0].turns_in_jail = 2;
        snap.players[1].consecutive_doubles = 2;
        let mut game = Game::from_snapshot(Board::standard(), GameConfig::default(), snap).unwrap();
        game.pass_turn().unwrap();
        game.roll(&mut ScriptedDice::new(&[(1, 2)])).unwrap();
        assert!(!game.player(0).in_jail);
        assert_eq!(game.player(0).balance, 1350);
    }

    #[test]
    fn rejects_bankrupt_owner() {
        let mut snap = played_game().snapshot();
        snap.players[0].bankrupt = true;
        assert!(rejection(snap).contains("still owns"));
    }
}
