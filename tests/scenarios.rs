use proptest::prelude::*;

use monopoly::board::{standard_spaces, Space, SpaceId, SpaceKind};
use monopoly::player::PlayerId;
use monopoly::{Board, Game, GameConfig, GameError, ScriptedDice, Snapshot, TurnPhase};

fn names() -> [&'static str; 2] {
    ["Ann", "Bob"]
}

/// A fresh two-player game on `board`, with `edit` applied to its state.
fn setup(board: Board, edit: impl FnOnce(&mut Snapshot)) -> Game {
    let game = Game::new(board.clone(), &names(), GameConfig::default()).unwrap();
    let mut snap = game.snapshot();
    edit(&mut snap);
    Game::from_snapshot(board, GameConfig::default(), snap).unwrap()
}

fn give(snap: &mut Snapshot, player: PlayerId, spaces: &[SpaceId]) {
    for &id in spaces {
        snap.spaces[id].owner = Some(player);
        snap.players[player].owned.insert(id);
    }
}

proptest! {
    #[test]
    fn rolls_stay_on_the_board(d1 in 1u8..=6, d2 in 1u8..=6, start in 0usize..40) {
        prop_assume!(start != 30);
        let mut game = setup(Board::standard(), |s| s.players[0].position = start);
        game.roll(&mut ScriptedDice::new(&[(d1, d2)])).unwrap();

        let ann = game.player(0);
        prop_assert!(ann.position < 40);
        let target = start + (d1 + d2) as usize;
        let mut expected = 1500;
        if target >= 40 {
            expected += 200;
        }
        if let SpaceKind::Tax { amount } = game.board().space(ann.position).kind {
            expected -= amount;
        }
        prop_assert_eq!(ann.balance, expected);
    }

    #[test]
    fn go_to_jail_always_jails(d1 in 1u8..=6, d2 in 1u8..=6) {
        let start = 30 - (d1 + d2) as usize;
        let mut game = setup(Board::standard(), |s| s.players[0].position = start);
        game.roll(&mut ScriptedDice::new(&[(d1, d2)])).unwrap();
        let ann = game.player(0);
        prop_assert!(ann.in_jail);
        prop_assert_eq!(ann.position, 10);
        prop_assert_eq!(game.current_player().id, 1);
    }
}

#[test]
fn buy_then_collect_rent() {
    let mut game = Game::new(Board::standard(), &names(), GameConfig::default()).unwrap();
    let notices = game.subscribe();
    let mut dice = ScriptedDice::new(&[(2, 4), (2, 4)]);

    game.roll(&mut dice).unwrap();
    assert_eq!(game.purchase_property(), Ok(6));
    assert_eq!(game.player(0).balance, 1400);
    assert!(matches!(
        game.purchase_property(),
        Err(GameError::PropertyAlreadyOwnedBySelf(_))
    ));
    assert_eq!(game.player(0).balance, 1400);
    game.pass_turn().unwrap();

    game.roll(&mut dice).unwrap();
    assert_eq!(game.player(1).balance, 1494);
    assert_eq!(game.player(0).balance, 1406);
    let messages: Vec<String> = notices.try_iter().map(|n| n.message).collect();
    assert!(messages.contains(&"Bob paid $6 rent to Ann on Oriental Avenue".to_owned()));
}

#[test]
fn three_doubles_go_to_jail() {
    let mut game = Game::new(Board::standard(), &names(), GameConfig::default()).unwrap();
    let mut dice = ScriptedDice::new(&[(1, 1), (2, 2), (3, 3)]);
    for _ in 0..3 {
        game.roll(&mut dice).unwrap();
    }
    let ann = game.player(0);
    assert!(ann.in_jail);
    assert_eq!(ann.position, 10);
    assert_eq!(game.current_player().id, 1);
}

#[test]
fn full_group_rent_doubles_until_built() {
    let mut game = setup(Board::standard(), |s| {
        give(s, 0, &[6, 8, 9]);
        s.current_player = 1;
    });
    let mut dice = ScriptedDice::new(&[(2, 4), (1, 2), (1, 1)]);

    game.roll(&mut dice).unwrap();
    assert_eq!(game.player(1).balance, 1488);
    game.pass_turn().unwrap();

    game.purchase_building(6).unwrap();
    assert_eq!(game.player(0).balance, 1462);
    assert!(matches!(
        game.purchase_building(6),
        Err(GameError::UnevenBuilding(_))
    ));
    game.roll(&mut dice).unwrap();
    game.pass_turn().unwrap();

    // Vermont is unimproved, but the group no longer is.
    game.roll(&mut dice).unwrap();
    assert_eq!(game.player(1).position, 8);
    assert_eq!(game.player(1).balance, 1482);
}

#[test]
fn bankruptcy_returns_spaces_and_ends_the_game() {
    let mut spaces = standard_spaces();
    spaces[4] = Space::new("Income Tax", SpaceKind::Tax { amount: 50 });
    let board = Board::new(spaces).unwrap();
    let mut game = setup(board, |s| {
        give(s, 0, &[1]);
        s.players[0].balance = 40;
    });

    game.roll(&mut ScriptedDice::new(&[(1, 3)])).unwrap();
    assert!(game.player(0).bankrupt);
    assert!(game.player(0).owned.is_empty());
    assert_eq!(game.deed(1).owner, None);
    assert_eq!(game.phase(), TurnPhase::Ended(1));
    assert_eq!(game.snapshot().winner(), Some(1));
    assert_eq!(
        game.roll(&mut ScriptedDice::new(&[(1, 2)])),
        Err(GameError::GameAlreadyEnded)
    );
}

#[test]
fn json_snapshot_round_trip() {
    let mut game = setup(Board::standard(), |s| give(s, 1, &[37, 39]));
    let mut dice = ScriptedDice::new(&[(2, 4)]);
    game.roll(&mut dice).unwrap();
    game.purchase_property().unwrap();

    let json = serde_json::to_string(&game.snapshot()).unwrap();
    let snap: Snapshot = serde_json::from_str(&json).unwrap();
    assert_eq!(snap, game.snapshot());
    let mut restored = Game::from_snapshot(Board::standard(), GameConfig::default(), snap).unwrap();

    let script = [(3, 4), (5, 6), (1, 2)];
    for g in [&mut game, &mut restored] {
        let mut dice = ScriptedDice::new(&script);
        g.pass_turn().unwrap();
        g.roll(&mut dice).unwrap();
        g.pass_turn().unwrap();
        g.roll(&mut dice).unwrap();
    }
    assert_eq!(restored.snapshot(), game.snapshot());
    assert_eq!(restored.to_string(), game.to_string());
}
