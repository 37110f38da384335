#![allow(dead_code)]

use hexfleet::{Angle, GameEngine, Move, MoveResult, Position};

pub fn ship(n: usize) -> String {
    format!("ship{n}")
}

/// Position every ship of `player` in its own column, pointing down.
pub fn line_up(engine: &mut GameEngine, player: &str) {
    for n in 0..5 {
        let res = engine.input_move(Move::move_ship(
            player,
            ship(n).as_str(),
            Position::new(n as i32, 0),
            Angle::Deg180,
        ));
        assert!(res.processed, "{:?}", res.error);
    }
}

/// Position and place every ship of `player` in columns 0..5.
pub fn place_all(engine: &mut GameEngine, player: &str) {
    line_up(engine, player);
    for n in 0..5 {
        let res = engine.input_move(Move::place_ship(player, ship(n).as_str()));
        assert!(res.processed, "{:?}", res.error);
    }
}

/// A default engine with both fleets placed and combat started.
pub fn started_engine() -> GameEngine {
    let mut engine = GameEngine::new();
    place_all(&mut engine, "p1");
    place_all(&mut engine, "p2");
    let res = engine.input_move(Move::start_game());
    assert!(res.processed, "{:?}", res.error);
    engine
}

pub fn rejected(res: &MoveResult) -> String {
    assert!(!res.valid, "move unexpectedly valid");
    assert!(!res.processed);
    res.error.clone().expect("rejected moves carry a message")
}
