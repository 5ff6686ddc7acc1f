//! Round loop tests: turn order, purchases, bankruptcy, suspension and the
//! end of the game.

use monopoly_engine::error::ConfigError;
use monopoly_engine::{
    read_board, AutoPlayer, Board, DiceRoll, GameConfig, GameEngine, GameResult, GameStatus, LandingOutcome, PlayerId,
    RoundEnd, ScriptedDecisions, ScriptedRandom, Square, SquareKind,
};

const CLASSIC: &str = "\
position,name,price,rent
0,Go,,
1,Mediterranean Avenue,60,2
2,Chance,,
3,Baltic Avenue,60,4
4,Income Tax,,
5,Reading Railroad,200,25
6,Oriental Avenue,100,6
7,In Jail,,
8,Vermont Avenue,100,6
9,Free Parking,,
10,St. Charles Place,140,10
11,Chance,,
12,Electric Company,150,12
13,Go To Jail,,
14,Park Place,350,35
15,Boardwalk,400,50
";

fn plain_board(len: usize) -> Board {
    Board::new(
        (0..len)
            .map(|i| Square::new(format!("Square {i}"), i, SquareKind::Plain))
            .collect(),
    )
    .unwrap()
}

/// Plain ring of ten with a single property at 3.
fn one_property_board(price: i64, rent: i64) -> Board {
    Board::new(
        (0..10)
            .map(|i| {
                if i == 3 {
                    Square::property("Baltic Avenue", 3, price, rent)
                } else {
                    Square::new(format!("Square {i}"), i, SquareKind::Plain)
                }
            })
            .collect(),
    )
    .unwrap()
}

#[test]
fn test_plain_board_round_changes_no_money() {
    let config = GameConfig::new().with_seed(7);
    let mut engine = GameEngine::new(config, plain_board(12), &["A", "B", "C", "D"]).unwrap();
    let mut decisions = ScriptedDecisions::new();

    assert_eq!(engine.play_round(&mut decisions), RoundEnd::Completed);

    assert_eq!(engine.round(), 2);
    assert_eq!(engine.turn_index(), 0);
    assert_eq!(engine.active().len(), 4);
    for (_, player) in engine.players().iter() {
        assert_eq!(player.money, 1500);
    }
    for report in &decisions.reports {
        let moved: usize = report.rolls().map(DiceRoll::total).sum();
        assert_eq!(engine.player(report.player).position, moved % 12);
    }
    let order: Vec<_> = decisions.reports.iter().map(|r| r.player.0).collect();
    assert_eq!(order, [0, 1, 2, 3]);
}

#[test]
fn test_unaffordable_property_is_never_offered() {
    let rng = ScriptedRandom::with_dice([1, 2]);
    let mut engine =
        GameEngine::with_rng(GameConfig::new(), one_property_board(300, 30), &["Alice", "Bob"], rng).unwrap();
    engine.players_mut()[PlayerId::new(0)].money = 100;
    let mut decisions = ScriptedDecisions::new().buying(true);

    let report = engine.play_turn(PlayerId::new(0), &mut decisions);

    assert_eq!(report.landing(), Some(LandingOutcome::CannotAfford { price: 300 }));
    assert!(decisions.offers.is_empty());
    assert_eq!(engine.player(PlayerId::new(0)).money, 100);
    assert_eq!(engine.board().owner_of(3), None);
}

#[test]
fn test_purchase_updates_both_sides() {
    let rng = ScriptedRandom::with_dice([1, 2]);
    let mut engine =
        GameEngine::with_rng(GameConfig::new(), one_property_board(60, 4), &["Alice", "Bob"], rng).unwrap();
    let mut decisions = ScriptedDecisions::new().buying(true);
    let alice = PlayerId::new(0);

    let report = engine.play_turn(alice, &mut decisions);

    assert_eq!(report.landing(), Some(LandingOutcome::Bought { price: 60 }));
    assert_eq!(decisions.offers, ["Baltic Avenue"]);
    assert_eq!(engine.player(alice).money, 1440);
    assert_eq!(engine.player(alice).properties, vec![3]);
    assert_eq!(engine.board().owner_of(3), Some(alice));
}

#[test]
fn test_rent_bankruptcy_ends_two_player_game() {
    let rng = ScriptedRandom::with_dice([1, 2]);
    let mut engine =
        GameEngine::with_rng(GameConfig::new(), one_property_board(200, 101), &["Alice", "Bob"], rng).unwrap();
    let (alice, bob) = (PlayerId::new(0), PlayerId::new(1));
    assert!(engine.assign_property(3, bob));
    engine.players_mut()[alice].money = 100;
    let mut decisions = ScriptedDecisions::new();

    assert_eq!(engine.play_round(&mut decisions), RoundEnd::LastPlayerStanding);

    assert_eq!(engine.player(alice).money, -1);
    assert_eq!(engine.player(bob).money, 1601);
    assert!(!engine.is_active(alice));
    assert_eq!(engine.result(), Some(GameResult::Winner(bob)));
    assert_eq!(decisions.reports.len(), 1, "Bob never gets his turn");
}

#[test]
fn test_bankrupt_player_is_skipped_for_the_rest_of_the_game() {
    let rng = ScriptedRandom::with_dice([1, 1, 1, 2, 2, 2, 1, 1, 2, 2]);
    let mut engine = GameEngine::with_rng(
        GameConfig::new(),
        one_property_board(200, 101),
        &["Alice", "Bob", "Carol"],
        rng,
    )
    .unwrap();
    let (alice, bob, carol) = (PlayerId::new(0), PlayerId::new(1), PlayerId::new(2));
    assert!(engine.assign_property(3, alice));
    engine.players_mut()[bob].money = 100;
    let mut decisions = ScriptedDecisions::new();

    assert_eq!(engine.play_round(&mut decisions), RoundEnd::Completed);
    assert_eq!(engine.active(), &[alice, carol]);
    let order: Vec<_> = decisions.reports.iter().map(|r| r.player).collect();
    assert_eq!(order, [alice, bob, carol]);

    assert_eq!(engine.play_round(&mut decisions), RoundEnd::Completed);
    let order: Vec<_> = decisions.reports[3..].iter().map(|r| r.player).collect();
    assert_eq!(order, [alice, carol]);
    assert_eq!(engine.player(bob).position, 3);
}

#[test]
fn test_suspend_and_resume_continue_with_same_player() {
    let config = GameConfig::new().with_seed(11).with_max_rounds(1);
    let mut engine = GameEngine::new(config, plain_board(10), &["Alice", "Bob", "Carol"]).unwrap();
    let mut first = ScriptedDecisions::new().with_saves([false, true]);

    assert_eq!(engine.run(&mut first), GameStatus::Suspended);
    assert_eq!(first.reports.len(), 1);
    assert_eq!(engine.round(), 1);
    assert_eq!(engine.turn_index(), 1);
    assert_eq!(engine.next_player(), Some(PlayerId::new(1)));
    let bob_before = engine.player(PlayerId::new(1)).position;
    assert_eq!(bob_before, 0, "suspension must not touch the remaining players");

    let mut second = ScriptedDecisions::new();
    let status = engine.run(&mut second);

    let order: Vec<_> = second.reports.iter().map(|r| r.player.0).collect();
    assert_eq!(order, [1, 2]);
    assert!(matches!(status, GameStatus::Finished(GameResult::RoundLimit(_))));
}

#[test]
fn test_round_limit_standings_richest_first_ties_in_turn_order() {
    let config = GameConfig::new().with_seed(3).with_max_rounds(2);
    let mut engine = GameEngine::new(config, plain_board(8), &["A", "B", "C", "D"]).unwrap();
    for (id, money) in [(1u8, 1600), (3, 1700)] {
        engine.players_mut()[PlayerId::new(id)].money = money;
    }

    let status = engine.run(&mut ScriptedDecisions::new());
    let GameStatus::Finished(GameResult::RoundLimit(standings)) = status else {
        panic!("expected the round limit");
    };

    let names: Vec<_> = standings.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, ["D", "B", "A", "C"]);
    assert_eq!(engine.round(), 3);
    assert!(GameResult::RoundLimit(standings).is_winner(PlayerId::new(3)));
}

#[test]
fn test_player_count_and_names_are_validated() {
    let config = GameConfig::new().with_seed(1);
    assert!(matches!(
        GameEngine::new(config.clone(), plain_board(4), &["Solo"]),
        Err(ConfigError::PlayerCount(1))
    ));
    assert!(matches!(
        GameEngine::new(config.clone(), plain_board(4), &["A", "B", "C", "D", "E", "F", "G"]),
        Err(ConfigError::PlayerCount(7))
    ));
    assert!(matches!(
        GameEngine::new(config.clone(), plain_board(4), &["A", "A"]),
        Err(ConfigError::DuplicateName(_))
    ));
    assert!(matches!(
        GameEngine::new(config, plain_board(4), &["A", "  "]),
        Err(ConfigError::EmptyName)
    ));
}

#[test]
fn test_non_positive_starting_money_is_rejected() {
    let config = GameConfig::new().with_seed(1).with_starting_money(-1);
    assert!(matches!(
        GameEngine::new(config, plain_board(4), &["A", "B"]),
        Err(ConfigError::NonPositiveStartingMoney(-1))
    ));
}

#[test]
fn test_same_seed_same_game() {
    let play = || {
        let config = GameConfig::new().with_seed(42).with_max_rounds(40);
        let board = read_board(CLASSIC.as_bytes()).unwrap();
        let mut auto = AutoPlayer::for_config(&config);
        let mut engine = GameEngine::new(config, board, &["A", "B", "C"]).unwrap();
        let status = engine.run(&mut auto);
        let positions: Vec<_> = engine.players().iter().map(|(_, p)| (p.position, p.money)).collect();
        (status, positions, engine.round())
    };

    assert_eq!(play(), play());
}

#[test]
fn test_money_is_conserved_by_rent() {
    let rng = ScriptedRandom::with_dice([1, 2]);
    let mut engine =
        GameEngine::with_rng(GameConfig::new(), one_property_board(200, 25), &["Alice", "Bob"], rng).unwrap();
    let (alice, bob) = (PlayerId::new(0), PlayerId::new(1));
    assert!(engine.assign_property(3, bob));
    let total_before: i64 = engine.players().iter().map(|(_, p)| p.money).sum();

    let report = engine.play_turn(alice, &mut ScriptedDecisions::new());

    assert_eq!(report.landing(), Some(LandingOutcome::PaidRent { owner: bob, rent: 25 }));
    let total_after: i64 = engine.players().iter().map(|(_, p)| p.money).sum();
    assert_eq!(total_before, total_after);
}
