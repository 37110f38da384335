use hexfleet::{Angle, GameError, PlayerId, Position, Segment, Ship, ShipClass, ShipId, ShipState};

fn ship(class: ShipClass) -> Ship {
    Ship::new(class, ShipId::new("ship0"), PlayerId::new("p1"))
}

fn p(x: i32, y: i32) -> Position {
    Position::new(x, y)
}

#[test]
fn test_new_ship_is_unpositioned_with_full_hp() {
    let s = ship(ShipClass::Battleship);
    assert_eq!(s.segments().len(), 4);
    assert!(s.segments().iter().all(|seg| *seg == Segment { hp: 1, position: None }));
    assert_eq!(s.total_hp(), 4);
    assert_eq!(s.position(), None);
    assert_eq!(s.positions(), None);
    assert!(!s.is_destroyed());
}

#[test]
fn test_set_positions_follows_facing() {
    let mut s = ship(ShipClass::Destroyer);
    let segments = s.set_positions(p(0, 0), Angle::Deg180).unwrap().to_vec();
    assert_eq!(
        segments,
        vec![
            Segment { hp: 1, position: Some(p(0, 0)) },
            Segment { hp: 1, position: Some(p(0, 1)) },
        ]
    );
    assert_eq!(s.angle(), Some(Angle::Deg180));
    assert_eq!(s.position(), Some(p(0, 0)));
}

#[test]
fn test_set_positions_keeps_damage() {
    let mut s = ship(ShipClass::Cruiser);
    s.set_positions(p(2, 2), Angle::Deg180).unwrap();
    s.damage_segments(&[p(2, 3)], 1);
    s.set_positions(p(5, 5), Angle::Deg120).unwrap();
    let hp: Vec<i32> = s.segments().iter().map(|seg| seg.hp).collect();
    assert_eq!(hp, vec![1, 0, 1]);
}

#[test]
fn test_set_positions_off_the_coordinate_range_keeps_old_line() {
    let mut s = ship(ShipClass::Cruiser);
    s.set_positions(p(2, 2), Angle::Deg180).unwrap();
    let err = s.set_positions(p(0, i32::MIN + 1), Angle::Deg0).unwrap_err();
    assert!(matches!(err, GameError::InvalidArgument(_)));
    assert_eq!(s.positions(), Some(vec![p(2, 2), p(2, 3), p(2, 4)]));
    assert_eq!(s.angle(), Some(Angle::Deg180));
    assert!(s.footprint(p(i32::MAX, 0), Angle::Deg60).is_err());
}

#[test]
fn test_collides_with_positions() {
    let mut s = ship(ShipClass::Cruiser);
    s.set_positions(p(1, 1), Angle::Deg180).unwrap();
    assert_eq!(s.collides_with(&[p(1, 2), p(9, 9), p(1, 3)]), vec![p(1, 2), p(1, 3)]);
    assert!(s.collides_with(&[p(0, 0)]).is_empty());
}

#[test]
fn test_collides_with_ship() {
    let mut a = ship(ShipClass::Cruiser);
    let mut b = Ship::new(ShipClass::Destroyer, ShipId::new("ship1"), PlayerId::new("p1"));
    a.set_positions(p(2, 0), Angle::Deg180).unwrap();
    b.set_positions(p(1, 1), Angle::Deg60).unwrap();
    let hit = a.collides_with_ship(&b).expect("ships overlap");
    assert_eq!(hit.ship, ShipId::new("ship1"));
    assert_eq!(hit.collisions, vec![p(2, 1)]);

    b.set_positions(p(5, 5), Angle::Deg0).unwrap();
    assert!(a.collides_with_ship(&b).is_none());
}

#[test]
fn test_segment_at() -> Result<(), GameError> {
    let mut s = ship(ShipClass::Submarine);
    s.set_positions(p(3, 3), Angle::Deg0).unwrap();
    assert_eq!(s.segment_at(p(3, 2))?.map(|seg| seg.position), Some(Some(p(3, 2))));
    assert!(s.segment_at(p(0, 0))?.is_none());
    Ok(())
}

#[test]
fn test_total_hp_distribution() -> Result<(), GameError> {
    let mut s = ship(ShipClass::Cruiser);
    s.set_total_hp(5)?;
    let hp: Vec<i32> = s.segments().iter().map(|seg| seg.hp).collect();
    assert_eq!(hp, vec![2, 2, 1]);
    assert_eq!(s.total_hp(), 5);

    s.set_total_hp(1)?;
    let hp: Vec<i32> = s.segments().iter().map(|seg| seg.hp).collect();
    assert_eq!(hp, vec![1, 0, 0]);

    s.set_total_hp(0)?;
    assert!(s.segments().iter().all(|seg| seg.hp == 0));
    assert!(s.is_destroyed());

    assert!(matches!(s.set_total_hp(-2), Err(GameError::InvalidArgument(_))));
    Ok(())
}

#[test]
fn test_damage_and_destroyed() {
    let mut s = ship(ShipClass::Destroyer);
    s.set_positions(p(0, 0), Angle::Deg180).unwrap();
    s.damage_segments(&[p(0, 0)], 1);
    assert_eq!(s.total_hp(), 1);
    assert!(s.is_alive());
    s.damage_segments(&[p(0, 0), p(0, 1)], 1);
    assert_eq!(s.total_hp(), -1);
    assert!(s.is_destroyed());
}

#[test]
fn test_ship_state_uses_owner_id() {
    let mut s = ship(ShipClass::Destroyer);
    s.set_positions(p(0, 0), Angle::Deg120).unwrap();
    let state = ShipState::from(&s);
    assert_eq!(state.owner, PlayerId::new("p1"));
    assert_eq!(state.total_hp, 2);
    let json = serde_json::to_value(&state).unwrap();
    assert_eq!(json["type"], "DESTROYER");
    assert_eq!(json["owner"], "p1");
    assert_eq!(json["angle"], 120);
    assert_eq!(json["totalHP"], 2);
}
