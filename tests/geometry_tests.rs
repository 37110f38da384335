use hexfleet::geometry::{all_neighbors, neighbor, neighbors_in_direction};
use hexfleet::{Angle, GameError, Position};
use proptest::prelude::*;

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

#[test]
fn test_odd_column_neighbors() -> Result<(), GameError> {
    let origin = p(1, 1);
    assert_eq!(neighbor(origin, Angle::Deg0)?, p(1, 0));
    assert_eq!(neighbor(origin, Angle::Deg60)?, p(2, 1));
    assert_eq!(neighbor(origin, Angle::Deg120)?, p(2, 2));
    assert_eq!(neighbor(origin, Angle::Deg180)?, p(1, 2));
    assert_eq!(neighbor(origin, Angle::Deg240)?, p(0, 2));
    assert_eq!(neighbor(origin, Angle::Deg300)?, p(0, 1));
    Ok(())
}

#[test]
fn test_even_column_neighbors() -> Result<(), GameError> {
    let origin = p(2, 1);
    assert_eq!(neighbor(origin, Angle::Deg0)?, p(2, 0));
    assert_eq!(neighbor(origin, Angle::Deg60)?, p(3, 0));
    assert_eq!(neighbor(origin, Angle::Deg120)?, p(3, 1));
    assert_eq!(neighbor(origin, Angle::Deg180)?, p(2, 2));
    assert_eq!(neighbor(origin, Angle::Deg240)?, p(1, 1));
    assert_eq!(neighbor(origin, Angle::Deg300)?, p(1, 0));
    Ok(())
}

#[test]
fn test_negative_columns_use_parity() -> Result<(), GameError> {
    // -1 is an odd column
    assert_eq!(neighbor(p(-1, 0), Angle::Deg60)?, p(0, 0));
    assert_eq!(neighbor(p(0, 0), Angle::Deg300)?, p(-1, -1));
    Ok(())
}

#[test]
fn test_neighbors_in_direction() -> Result<(), GameError> {
    assert_eq!(
        neighbors_in_direction(p(0, 0), Angle::Deg60, 3)?,
        vec![p(0, 0), p(1, -1), p(2, -1)]
    );
    assert_eq!(
        neighbors_in_direction(p(4, 0), Angle::Deg180, 5)?,
        vec![p(4, 0), p(4, 1), p(4, 2), p(4, 3), p(4, 4)]
    );
    assert_eq!(neighbors_in_direction(p(7, 7), Angle::Deg240, 1)?, vec![p(7, 7)]);
    Ok(())
}

#[test]
fn test_neighbors_in_direction_rejects_zero_length() {
    let err = neighbors_in_direction(p(0, 0), Angle::Deg0, 0).unwrap_err();
    assert!(matches!(err, GameError::InvalidArgument(_)));
}

#[test]
fn test_all_neighbors_in_angle_order() -> Result<(), GameError> {
    assert_eq!(
        all_neighbors(p(1, 1))?,
        [p(1, 0), p(2, 1), p(2, 2), p(1, 2), p(0, 2), p(0, 1)]
    );
    Ok(())
}

#[test]
fn test_steps_off_the_coordinate_range_fail() {
    let far_right = p(i32::MAX, 0);
    assert!(matches!(neighbor(far_right, Angle::Deg60), Err(GameError::InvalidArgument(_))));
    assert!(matches!(neighbor(p(0, i32::MIN), Angle::Deg0), Err(GameError::InvalidArgument(_))));
    assert!(matches!(neighbor(p(i32::MIN, 5), Angle::Deg300), Err(GameError::InvalidArgument(_))));
    assert!(all_neighbors(p(i32::MAX, i32::MAX)).is_err());

    // the anchor itself is fine, only the walk past the edge fails
    assert_eq!(neighbors_in_direction(p(0, i32::MIN), Angle::Deg0, 1), Ok(vec![p(0, i32::MIN)]));
    assert!(neighbors_in_direction(p(0, i32::MIN), Angle::Deg0, 2).is_err());
    assert_eq!(
        neighbors_in_direction(p(0, i32::MIN + 1), Angle::Deg0, 2),
        Ok(vec![p(0, i32::MIN + 1), p(0, i32::MIN)])
    );
    assert!(neighbors_in_direction(p(i32::MAX - 1, 0), Angle::Deg120, 3).is_err());
}

#[test]
fn test_angle_conversion() {
    assert_eq!(Angle::try_from(240).unwrap(), Angle::Deg240);
    assert!(matches!(Angle::try_from(90), Err(GameError::InvalidArgument(_))));
    assert!(matches!(Angle::try_from(270), Err(GameError::InvalidArgument(_))));
    assert_eq!(i32::from(Angle::Deg300), 300);
    assert_eq!(Angle::Deg60.opposite(), Angle::Deg240);
}

#[test]
fn test_position_wire_form() {
    let json = serde_json::to_string(&p(3, -2)).unwrap();
    assert_eq!(json, "[3,-2]");
    let back: Position = serde_json::from_str("[10, 4]").unwrap();
    assert_eq!(back, p(10, 4));
    assert!(serde_json::from_str::<Position>("[4]").is_err());
    assert!(serde_json::from_str::<Position>("[3, \"4\"]").is_err());
    assert!(serde_json::from_str::<Angle>("90").is_err());
}

proptest! {
    #[test]
    fn neighbor_is_adjacent(x in -50i32..50, y in -50i32..50, a in 0usize..6) {
        let from = p(x, y);
        let to = neighbor(from, Angle::ALL[a]).unwrap();
        prop_assert!((to.x - from.x).abs() <= 1);
        prop_assert!((to.y - from.y).abs() <= 1);
        prop_assert_ne!(to, from);
    }

    #[test]
    fn straight_lines_have_distinct_cells(x in -20i32..20, y in -20i32..20, a in 0usize..6, len in 1usize..12) {
        let cells = neighbors_in_direction(p(x, y), Angle::ALL[a], len).unwrap();
        prop_assert_eq!(cells.len(), len);
        prop_assert_eq!(cells[0], p(x, y));
        let mut sorted = cells.clone();
        sorted.sort();
        sorted.dedup();
        prop_assert_eq!(sorted.len(), len);
    }

    #[test]
    fn edge_coordinates_never_panic(
        x in prop_oneof![Just(i32::MIN), Just(i32::MAX), any::<i32>()],
        y in prop_oneof![Just(i32::MIN), Just(i32::MAX), any::<i32>()],
        a in 0usize..6,
        len in 1usize..6,
    ) {
        let angle = Angle::ALL[a];
        if let Ok(cells) = neighbors_in_direction(p(x, y), angle, len) {
            prop_assert_eq!(cells.len(), len);
            prop_assert_eq!(cells[0], p(x, y));
        }
        let _ = all_neighbors(p(x, y));
    }
}
