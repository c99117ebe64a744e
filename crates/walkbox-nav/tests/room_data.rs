use walkbox_nav::{
    BoxCoords, BoxFlags, BoxId, BoxScale, LoadError, NavError, Point, Room, RoomData, ScaleSlot, WalkBox,
};

fn push_i16(out: &mut Vec<u8>, v: i16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_u16(out: &mut Vec<u8>, v: u16) {
    out.extend_from_slice(&v.to_le_bytes());
}

fn push_rect(out: &mut Vec<u8>, x0: i16, y0: i16, x1: i16, y1: i16, flags: u16, scale: u16) {
    for (x, y) in [(x0, y0), (x1, y0), (x1, y1), (x0, y1)] {
        push_i16(out, x);
        push_i16(out, y);
    }
    push_u16(out, flags);
    push_u16(out, scale);
}

fn two_box_bytes() -> Vec<u8> {
    let mut out = Vec::new();
    push_u16(&mut out, 2);
    push_rect(&mut out, 0, 100, 160, 140, 0, 0x8000);
    push_rect(&mut out, 160, 100, 320, 140, 0x0040 | 0x0020, 200);
    out.push(1);
    for v in [0, 100, 50, 0, 140, 100] {
        push_i16(&mut out, v);
    }
    out
}

#[test]
fn binary_room_records_decode() {
    let data = RoomData::from_bytes(&two_box_bytes()).expect("decode room");

    assert_eq!(data.boxes.len(), 2);
    assert_eq!(data.boxes[0].coords, BoxCoords::rect(0, 100, 160, 140));
    assert_eq!(data.boxes[0].scale, BoxScale::Slot(0));
    assert_eq!(data.boxes[1].flags, BoxFlags::LOCKED | BoxFlags::PLAYER_ONLY);
    assert_eq!(data.boxes[1].scale, BoxScale::Fixed(200));
    assert_eq!(data.scale_slots, vec![ScaleSlot::vertical(100, 50, 140, 100)]);

    assert_eq!(RoomData::from_bytes(&data.to_bytes()).expect("re-decode"), data);
}

#[test]
fn room_from_bytes_evaluates_scale_ramps() {
    let room = Room::from_bytes(&two_box_bytes()).expect("load room");
    assert_eq!(room.scale_at(BoxId(0), Point::new(10, 120)).expect("valid id"), 75);
    assert_eq!(room.scale_at(BoxId(1), Point::new(200, 120)).expect("valid id"), 200);
    assert_eq!(room.next_hop(BoxId(0), BoxId(1)).expect("ids"), Some(BoxId(1)));
}

#[test]
fn slot_section_is_optional() {
    let mut bytes = Vec::new();
    push_u16(&mut bytes, 1);
    push_rect(&mut bytes, 0, 0, 10, 10, 0, 255);
    let data = RoomData::from_bytes(&bytes).expect("decode room");
    assert!(data.scale_slots.is_empty());
}

#[test]
fn truncated_records_are_rejected() {
    let bytes = two_box_bytes();
    let err = RoomData::from_bytes(&bytes[..30]).expect_err("truncated");
    assert!(matches!(err, LoadError::Truncated { offset: 2, .. }), "{err:?}");

    let err = RoomData::from_bytes(&bytes[..1]).expect_err("truncated count");
    assert!(matches!(err, LoadError::Truncated { offset: 0, needed: 1 }), "{err:?}");
}

#[test]
fn trailing_bytes_and_slot_limits_are_rejected() {
    let mut bytes = two_box_bytes();
    bytes.push(0);
    assert_eq!(RoomData::from_bytes(&bytes), Err(LoadError::TrailingBytes(1)));

    let mut bytes = Vec::new();
    push_u16(&mut bytes, 0);
    bytes.push(9);
    assert_eq!(RoomData::from_bytes(&bytes), Err(LoadError::TooManyScaleSlots(9)));
}

#[test]
fn dangling_or_degenerate_scale_slots_fail_validation() {
    let dangling = RoomData {
        boxes: vec![WalkBox::new(BoxCoords::rect(0, 0, 10, 10)).with_scale(BoxScale::Slot(2))],
        scale_slots: Vec::new(),
    };
    assert!(matches!(
        Room::from_data(dangling),
        Err(NavError::InvalidScaleSlot { slot: 2, count: 0 })
    ));

    let degenerate = RoomData {
        boxes: Vec::new(),
        scale_slots: vec![ScaleSlot::vertical(10, 100, 10, 50)],
    };
    assert!(matches!(
        Room::from_data(degenerate),
        Err(NavError::DegenerateScaleSlot { slot: 0 })
    ));
}
