use hexfleet::{GameEngine, Move, Phase, PlayerId, Position, ShipId, TileType};
use proptest::prelude::*;
use rand::{rngs::SmallRng, Rng, SeedableRng};

fn random_started_engine(rng: &mut SmallRng) -> GameEngine {
    let mut engine = GameEngine::new();
    for player in ["p1", "p2"] {
        let pid = PlayerId::new(player);
        for n in 0..5 {
            let ship = ShipId::new(format!("ship{n}"));
            let (at, angle) = engine
                .player(&pid)
                .unwrap()
                .board()
                .random_placement(rng, &ship)
                .unwrap();
            let moved = engine.input_move(Move::move_ship(player, ship.clone(), at, angle));
            assert!(moved.processed, "{:?}", moved.error);
            let placed = engine.input_move(Move::place_ship(player, ship));
            assert!(placed.processed, "{:?}", placed.error);
        }
    }
    let res = engine.input_move(Move::start_game());
    assert!(res.processed, "{:?}", res.error);
    engine
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every hit tile costs exactly one hit point and repeat shots are refused.
    #[test]
    fn random_shots_keep_boards_consistent(seed in any::<u64>(), shots in 1usize..200) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let mut engine = random_started_engine(&mut rng);

        for _ in 0..shots {
            if engine.phase() != Phase::TakeTurns {
                break;
            }
            let shooter = engine.current_player().cloned().unwrap();
            let target = if shooter.as_str() == "p1" { "p2" } else { "p1" };
            let at = Position::new(rng.random_range(0..10), rng.random_range(0..10));
            let already = engine
                .player(&PlayerId::new(target))
                .unwrap()
                .board()
                .tile_at(at)
                .unwrap()
                .fired_upon();

            let before = engine.state();
            let res = engine.input_move(Move::fire(shooter.clone(), target, at));
            prop_assert_eq!(res.processed, !already);
            if already {
                prop_assert_eq!(res.game_state, before);
            }
        }

        let state = engine.state();
        for board in state.players.values().map(|p| &p.board) {
            let hits = board
                .tiles
                .iter()
                .flatten()
                .filter(|t| t.tile_type == TileType::Hit)
                .count() as i32;
            let hp: i32 = board.ships.values().map(|s| s.total_hp).sum();
            prop_assert_eq!(hits + hp, 17);
        }

        prop_assert!(state.state_stack.windows(2).all(|w| w[0] != w[1]));
        match &state.winner_id {
            Some(winner) => {
                prop_assert_eq!(state.phase(), Some(Phase::GameOver));
                for (id, player) in &state.players {
                    let sunk = player.board.ships.values().all(|s| s.destroyed);
                    prop_assert_eq!(sunk, id != winner);
                }
            }
            None => prop_assert_eq!(state.phase(), Some(Phase::TakeTurns)),
        }
    }

    /// Random placement always yields a location the board accepts.
    #[test]
    fn random_setup_always_starts(seed in any::<u64>()) {
        let mut rng = SmallRng::seed_from_u64(seed);
        let engine = random_started_engine(&mut rng);
        for player in engine.players() {
            prop_assert!(player.board().all_ships_placed());
            let cells: usize = player
                .board()
                .placed_ships()
                .filter_map(|s| s.positions())
                .map(|p| p.len())
                .sum();
            prop_assert_eq!(cells, 17);
        }
    }
}
