use walkbox_actor::{Actor, ActorId, Scene, WalkError, WalkSpeed};
use walkbox_nav::{BoxCoords, BoxFlags, BoxId, BoxScale, BoxStore, NavError, Point, Room, WalkBox};

fn two_box_room() -> Room {
    let store = BoxStore::new(
        vec![
            WalkBox::new(BoxCoords::rect(0, 0, 100, 50)),
            WalkBox::new(BoxCoords::rect(100, 0, 200, 50)).with_scale(BoxScale::Fixed(128)),
        ],
        Vec::new(),
    )
    .expect("valid store");
    Room::new(store)
}

fn scene_with_two_actors() -> Scene {
    let mut scene = Scene::new(two_box_room());
    scene.add_actor(Actor::new(ActorId(7))).expect("new actor");
    scene.add_actor(Actor::new(ActorId(2)).player()).expect("new actor");
    scene.put_actor(ActorId(7), Point::new(10, 10)).expect("known actor");
    scene.put_actor(ActorId(2), Point::new(20, 40)).expect("known actor");
    scene
}

#[test]
fn views_are_listed_in_id_order() {
    let scene = scene_with_two_actors();
    let ids: Vec<ActorId> = scene.views().iter().map(|v| v.id).collect();
    assert_eq!(ids, vec![ActorId(2), ActorId(7)]);
    assert!(scene.actor(ActorId(2)).expect("present").is_player());
}

#[test]
fn duplicate_and_unknown_actors_are_rejected() {
    let mut scene = scene_with_two_actors();
    assert_eq!(
        scene.add_actor(Actor::new(ActorId(7))),
        Err(WalkError::DuplicateActor(ActorId(7)))
    );
    assert_eq!(
        scene.set_destination(ActorId(9), Point::new(0, 0), None),
        Err(WalkError::UnknownActor(ActorId(9)))
    );
    assert_eq!(scene.stop_walking(ActorId(9)), Err(WalkError::UnknownActor(ActorId(9))));
    assert!(matches!(
        scene.set_walk_speed(ActorId(2), WalkSpeed::new(3, 0)),
        Err(WalkError::InvalidSpeed { x: 3, y: 0 })
    ));
}

#[test]
fn box_mutators_surface_navigation_errors() {
    let mut scene = scene_with_two_actors();
    assert_eq!(
        scene.set_box_flags(BoxId(5), BoxFlags::LOCKED),
        Err(WalkError::Nav(NavError::InvalidBoxId {
            id: BoxId(5),
            count: 2
        }))
    );
    scene.set_box_flags(BoxId(1), BoxFlags::LOCKED).expect("valid box");
    assert!(scene.room().get_box(BoxId(1)).expect("valid box").flags.contains(BoxFlags::LOCKED));
}

#[test]
fn tick_drives_every_actor_until_all_rest() {
    let mut scene = scene_with_two_actors();
    scene.set_destination(ActorId(7), Point::new(150, 10), None).expect("known actor");
    scene.set_destination(ActorId(2), Point::new(150, 40), None).expect("known actor");

    let mut rest_tick = None;
    for _ in 0..500 {
        if scene.tick() == 0 {
            rest_tick = Some(scene.ticks());
            break;
        }
    }
    assert!(rest_tick.is_some(), "actors never came to rest");

    for view in scene.views() {
        assert_eq!(view.walkbox, Some(BoxId(1)));
        assert_eq!(view.scale, 128);
    }
    assert_eq!(scene.actor(ActorId(7)).expect("present").pos(), Point::new(150, 10));
    assert_eq!(scene.actor(ActorId(2)).expect("present").pos(), Point::new(150, 40));
}

#[test]
fn entering_a_room_re_places_actors() {
    let mut scene = scene_with_two_actors();
    let store = BoxStore::new(vec![WalkBox::new(BoxCoords::rect(50, 0, 80, 50))], Vec::new()).expect("valid store");
    scene.enter_room(Room::new(store));

    let views = scene.views();
    assert_eq!(views[0].pos, Point::new(50, 40));
    assert_eq!(views[1].pos, Point::new(50, 10));
    assert!(views.iter().all(|v| v.walkbox == Some(BoxId(0))));
    assert!(scene.actors().all(|a| !a.is_walking()));
}
