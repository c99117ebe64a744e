use criterion::{black_box, criterion_group, criterion_main, Criterion};
use walkbox_actor::{Actor, ActorId, PolicyKind, WalkConfig, WalkStatus};
use walkbox_nav::{BoxCoords, BoxStore, Point, Room, WalkBox};

fn corridor(cells: i32, width: i32) -> Room {
    let boxes = (0..cells)
        .map(|i| WalkBox::new(BoxCoords::rect(i * width, 0, (i + 1) * width, 60)))
        .collect();
    Room::new(BoxStore::new(boxes, Vec::new()).expect("valid store"))
}

fn walk_across(room: &Room, policy: PolicyKind, to: Point) -> usize {
    let config = WalkConfig {
        policy,
        ..WalkConfig::default()
    };
    let mut actor = Actor::with_config(ActorId(0), config);
    actor.put_actor(room, Point::new(5, 30));
    actor.set_destination(room, to, None);

    let mut ticks = 0;
    while actor.tick(room) != WalkStatus::Idle {
        ticks += 1;
    }
    ticks
}

fn bench_walk(c: &mut Criterion) {
    let room = corridor(16, 50);
    let to = Point::new(795, 55);

    let mut group = c.benchmark_group("walkbox-actor/walk");
    for policy in [PolicyKind::ScaledStep, PolicyKind::LegacyCounter] {
        group.bench_function(format!("corridor_{policy:?}"), |b| {
            b.iter(|| black_box(walk_across(&room, policy, black_box(to))))
        });
    }
    group.finish();
}

criterion_group!(benches, bench_walk);
criterion_main!(benches);
