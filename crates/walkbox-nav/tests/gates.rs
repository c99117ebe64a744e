use walkbox_nav::gate::{find_crossing, gate_between};
use walkbox_nav::{BoxCoords, Crossing, Point};

fn offset_pair() -> (BoxCoords, BoxCoords) {
    // Shared edge is x = 100, y in 20..=50.
    (BoxCoords::rect(0, 0, 100, 50), BoxCoords::rect(100, 20, 200, 80))
}

#[test]
fn gate_spans_the_shared_edge() {
    let (from, via) = offset_pair();
    let gate = gate_between(&from, &via);

    let mut ends: Vec<Point> = gate.via_side.to_vec();
    ends.sort();
    assert_eq!(ends, vec![Point::new(100, 20), Point::new(100, 50)]);
    assert_eq!(gate.from_side, gate.via_side);
}

#[test]
fn straight_line_through_the_gate_into_the_final_box_is_direct() {
    let (from, via) = offset_pair();
    let crossing = find_crossing(&from, &via, true, Point::new(10, 25), Point::new(150, 40));
    assert_eq!(crossing, Crossing::Direct);
}

#[test]
fn blocked_line_walks_to_the_nearest_gate_end() {
    let (from, via) = offset_pair();
    let crossing = find_crossing(&from, &via, false, Point::new(10, 5), Point::new(150, 70));
    assert_eq!(
        crossing,
        Crossing::Via {
            point2: Some(Point::new(100, 20)),
            point3: Point::new(100, 20),
        }
    );
}

#[test]
fn aligned_walk_needs_no_from_side_waypoint() {
    let from = BoxCoords::rect(0, 0, 100, 50);
    let via = BoxCoords::rect(100, 0, 200, 50);
    let crossing = find_crossing(&from, &via, false, Point::new(50, 25), Point::new(250, 25));
    assert_eq!(
        crossing,
        Crossing::Via {
            point2: None,
            point3: Point::new(100, 25),
        }
    );
}
