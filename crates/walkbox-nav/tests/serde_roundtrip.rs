#![cfg(feature = "serde")]

use walkbox_nav::{
    BoxCoords, BoxFlags, BoxId, BoxScale, Room, RoomData, ScaleSlot, ScanOrder, SearchConfig, WalkBox,
};

fn ramp_room() -> RoomData {
    RoomData {
        boxes: vec![
            WalkBox::new(BoxCoords::rect(0, 0, 100, 50)).with_scale(BoxScale::Slot(0)),
            WalkBox::new(BoxCoords::rect(100, 0, 200, 50))
                .with_flags(BoxFlags::LOCKED | BoxFlags::PLAYER_ONLY),
        ],
        scale_slots: vec![ScaleSlot::vertical(0, 100, 50, 200)],
    }
}

#[test]
fn room_data_roundtrips_via_serde() {
    let data = ramp_room();

    let json = serde_json::to_string(&data).expect("serialize room");
    let data2: RoomData = serde_json::from_str(&json).expect("deserialize room");
    assert_eq!(data, data2);

    let room = Room::from_data(data2).expect("valid room");
    assert_eq!(room.next_hop(BoxId(0), BoxId(1)).expect("ids"), Some(BoxId(1)));
}

#[test]
fn box_fields_default_when_missing() {
    let json = r#"{"boxes":[{"coords":{"ul":{"x":0,"y":0},"ur":{"x":10,"y":0},"lr":{"x":10,"y":10},"ll":{"x":0,"y":10}}}]}"#;
    let data: RoomData = serde_json::from_str(json).expect("deserialize room");
    assert_eq!(data.boxes[0].flags, BoxFlags::empty());
    assert_eq!(data.boxes[0].scale, BoxScale::default());
    assert!(data.scale_slots.is_empty());
}

#[test]
fn search_config_defaults_fill_in() {
    let config: SearchConfig = serde_json::from_str("{}").expect("deserialize config");
    assert_eq!(config, SearchConfig::default());

    let order: ScanOrder = serde_json::from_str("\"prioritize_low_id\"").expect("deserialize order");
    assert_eq!(order, ScanOrder::PrioritizeLowId);
}
