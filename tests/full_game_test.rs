mod common;

use common::{line_up, place_all, rejected, ship};
use hexfleet::{Angle, GameEngine, Move, Phase, PlayerId, Position, ShipId, TileType};

const LENGTHS: [i32; 5] = [2, 3, 3, 4, 5];

/// Every cell of a fleet lined up by `line_up`, column by column.
fn fleet_cells() -> Vec<Position> {
    LENGTHS
        .iter()
        .enumerate()
        .flat_map(|(x, len)| (0..*len).map(move |y| Position::new(x as i32, y)))
        .collect()
}

#[test]
fn test_full_game() {
    let (p1, p2) = (PlayerId::new("p1"), PlayerId::new("p2"));
    let mut engine = GameEngine::new();

    place_all(&mut engine, "p1");

    // p2 stacks the carrier onto the battleship first
    for n in 0..4 {
        engine.input_move(Move::move_ship("p2", ship(n).as_str(), (n as i32, 0), Angle::Deg180));
    }
    let res = engine.input_move(Move::move_ship("p2", "ship4", (3, 0), Angle::Deg180));
    assert!(res.processed, "moving never checks collisions");
    for n in 0..4 {
        assert!(engine.input_move(Move::place_ship("p2", ship(n).as_str())).processed);
    }
    let msg = rejected(&engine.input_move(Move::place_ship("p2", "ship4")));
    assert!(msg.contains("collides with placed ship ship3"), "{msg}");
    engine.input_move(Move::move_ship("p2", "ship4", (4, 0), Angle::Deg180));
    assert!(engine.input_move(Move::place_ship("p2", "ship4")).processed);

    assert!(engine.input_move(Move::start_game()).processed);
    assert_eq!(engine.phase(), Phase::TakeTurns);

    let targets = fleet_cells();
    assert_eq!(targets.len(), 17);
    assert_eq!(targets.last(), Some(&Position::new(4, 4)));

    for (i, &at) in targets.iter().enumerate() {
        assert!(engine.winner().is_none());
        let res = engine.input_move(Move::fire("p1", "p2", at));
        assert!(res.processed, "shot {i}: {:?}", res.error);
        let tile = &res.game_state.players[&p2].board.tiles[at.y as usize][at.x as usize];
        assert_eq!(tile.tile_type, TileType::Hit);

        if i == 0 {
            let msg = rejected(&engine.input_move(Move::fire("p1", "p2", (9, 9))));
            assert!(msg.contains("not player p1's turn"), "{msg}");
        }
        if i == 1 {
            let destroyer = &res.game_state.players[&p2].board.ships[&ShipId::new("ship0")];
            assert!(destroyer.destroyed);
            assert_eq!(destroyer.total_hp, 0);
        }
        if i + 1 < targets.len() {
            assert!(engine.input_move(Move::fire("p2", "p1", at)).processed);
        }
    }

    assert_eq!(engine.winner(), Some(&p1));
    let msg = rejected(&engine.input_move(Move::fire("p2", "p1", (4, 4))));
    assert!(msg.contains("not allowed during GAME_OVER"), "{msg}");

    let state = engine.state();
    assert_eq!(
        state.state_stack,
        vec![Phase::Initializing, Phase::PlaceShips, Phase::TakeTurns, Phase::GameOver]
    );
    assert_eq!(state.winner_id, Some(p1.clone()));
    // 10 moves for p1's fleet, 11 for p2's, START_GAME and 33 shots
    assert_eq!(state.move_history.len(), 55);
    assert!(state.players[&p2].board.ships.values().all(|s| s.destroyed));
    assert!(!state.players[&p1].board.ships[&ShipId::new("ship4")].destroyed);
}

#[test]
fn test_misses_do_not_end_the_game() {
    let mut engine = GameEngine::new();
    line_up(&mut engine, "p1");
    for n in 0..5 {
        engine.input_move(Move::place_ship("p1", ship(n).as_str()));
    }
    place_all(&mut engine, "p2");
    engine.input_move(Move::start_game());

    for x in 5..10 {
        assert!(engine.input_move(Move::fire("p1", "p2", (x, 9))).processed);
        assert!(engine.input_move(Move::fire("p2", "p1", (x, 9))).processed);
    }
    assert!(engine.winner().is_none());
    assert_eq!(engine.phase(), Phase::TakeTurns);
    let state = engine.state();
    for id in ["p1", "p2"] {
        let board = &state.players[&PlayerId::new(id)].board;
        assert!(board.ships.values().all(|s| !s.destroyed));
        assert_eq!(board.tiles[9][7].markers, vec![TileType::Empty, TileType::Miss]);
    }
}
