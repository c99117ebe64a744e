use std::collections::BTreeMap;

use tracing::debug;

use walkbox_nav::{BoxFlags, BoxId, BoxScale, Point, Room};

use crate::actor::{Actor, ActorId, ActorView};
use crate::policy::WalkSpeed;
use crate::walk::WalkStatus;
use crate::WalkError;

/// The current room and the actors standing in it.
///
/// This is the surface scripts drive: every mutator addresses an actor or
/// box by id, and [`Scene::tick`] advances all actors in ascending id order.
#[derive(Debug)]
pub struct Scene {
    room: Room,
    actors: BTreeMap<ActorId, Actor>,
    ticks: u64,
}

impl Scene {
    pub fn new(room: Room) -> Self {
        Self {
            room,
            actors: BTreeMap::new(),
            ticks: 0,
        }
    }

    pub fn room(&self) -> &Room {
        &self.room
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Replace the room. Every actor is re-placed (and re-clamped) where it stands.
    pub fn enter_room(&mut self, room: Room) {
        self.room = room;
        for actor in self.actors.values_mut() {
            actor.put_actor(&self.room, actor.pos());
        }
        debug!(actors = self.actors.len(), boxes = self.room.box_count(), "entered room");
    }

    pub fn add_actor(&mut self, actor: Actor) -> Result<(), WalkError> {
        let id = actor.id();
        if self.actors.contains_key(&id) {
            return Err(WalkError::DuplicateActor(id));
        }
        self.actors.insert(id, actor);
        Ok(())
    }

    pub fn remove_actor(&mut self, id: ActorId) -> Option<Actor> {
        self.actors.remove(&id)
    }

    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.get(&id)
    }

    pub fn actors(&self) -> impl Iterator<Item = &Actor> {
        self.actors.values()
    }

    fn actor_mut(&mut self, id: ActorId) -> Result<&mut Actor, WalkError> {
        self.actors.get_mut(&id).ok_or(WalkError::UnknownActor(id))
    }

    pub fn set_destination(&mut self, id: ActorId, dest: Point, dir: Option<u16>) -> Result<(), WalkError> {
        let actor = self.actors.get_mut(&id).ok_or(WalkError::UnknownActor(id))?;
        actor.set_destination(&self.room, dest, dir);
        Ok(())
    }

    pub fn put_actor(&mut self, id: ActorId, pos: Point) -> Result<(), WalkError> {
        let actor = self.actors.get_mut(&id).ok_or(WalkError::UnknownActor(id))?;
        actor.put_actor(&self.room, pos);
        Ok(())
    }

    pub fn set_ignore_boxes(&mut self, id: ActorId, ignore: bool) -> Result<(), WalkError> {
        let actor = self.actors.get_mut(&id).ok_or(WalkError::UnknownActor(id))?;
        actor.set_ignore_boxes(&self.room, ignore);
        Ok(())
    }

    pub fn stop_walking(&mut self, id: ActorId) -> Result<(), WalkError> {
        self.actor_mut(id)?.stop_walking();
        Ok(())
    }

    pub fn set_walk_speed(&mut self, id: ActorId, speed: WalkSpeed) -> Result<(), WalkError> {
        self.actor_mut(id)?.set_walk_speed(speed)
    }

    /// Change a box's flags. Routes compiled at room entry are kept as they are.
    pub fn set_box_flags(&mut self, id: BoxId, flags: BoxFlags) -> Result<(), WalkError> {
        Ok(self.room.set_box_flags(id, flags)?)
    }

    pub fn set_box_scale(&mut self, id: BoxId, scale: BoxScale) -> Result<(), WalkError> {
        Ok(self.room.set_box_scale(id, scale)?)
    }

    /// Advance every actor by one tick; returns how many are still walking or turning.
    pub fn tick(&mut self) -> usize {
        self.ticks += 1;
        self.actors
            .values_mut()
            .map(|actor| actor.tick(&self.room))
            .filter(|status| *status != WalkStatus::Idle)
            .count()
    }

    pub fn views(&self) -> Vec<ActorView> {
        self.actors.values().map(Actor::view).collect()
    }
}
