//! Test actors, a factory and a stage builder shared by the unit and
//! integration tests.

use glam::Vec2;

use crate::actors::{
    enemy_body, enemy_exit_camera, player_body, ActorFactory, EnemyActor, GroundLatch,
    PlayerActor, SpawnPoint, Trigger, TriggerKind, TriggerResponse,
};
use crate::behavior::{Collidable, Damageable, Movable, TickContext};
use crate::config::SimConfig;
use crate::entity::{ActorTag, Body, BodyFlags};
use crate::geometry::Rect;
use crate::stage::{Marker, MarkerKind, MarkerTable, Stage, StageDesc};
use crate::tiles::BREAKABLE_WEAK;
use crate::world::World;

// =============================================================================
// Recording Actor
// =============================================================================

/// Collidable that records every callback it receives.
#[derive(Debug, Default)]
pub struct TestActor {
    pub body: Body,
    pub vertical_events: Vec<f32>,
    pub wall_events: Vec<f32>,
    pub ladders: Vec<bool>,
    pub breaks: bool,
    pub break_calls: u32,
    pub hurts: u32,
    pub dies_on_hurt: bool,
    pub winds: u32,
    pub handles_zones: bool,
    pub waters: Vec<bool>,
}

impl TestActor {
    /// Existing, in-camera actor at rest at `pos` with 16x16 boxes.
    pub fn visible(pos: Vec2) -> Self {
        let mut body = Body::new(pos);
        body.flags.insert(BodyFlags::IN_CAMERA);
        Self {
            body,
            ..Self::default()
        }
    }
}

impl Movable for TestActor {
    fn tag(&self) -> ActorTag {
        ActorTag::Enemy
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }
}

impl Collidable for TestActor {
    fn vertical_collision_event(&mut self, dir: f32, _ctx: &mut TickContext<'_>) {
        self.vertical_events.push(dir);
    }

    fn wall_collision_event(&mut self, dir: f32, _ctx: &mut TickContext<'_>) {
        self.wall_events.push(dir);
    }

    fn hurt_collision(&mut self, _area: Rect, _dir: f32, _ctx: &mut TickContext<'_>) -> bool {
        self.hurts += 1;
        if self.dies_on_hurt {
            self.body.start_dying();
        }
        true
    }

    fn ladder_collision(&mut self, _area: Rect, is_top: bool, _ctx: &mut TickContext<'_>) -> bool {
        self.ladders.push(is_top);
        false
    }

    fn break_collision(&mut self, _area: Rect, _level: u8, _ctx: &mut TickContext<'_>) -> bool {
        self.break_calls += 1;
        self.breaks
    }

    fn wind_collision(&mut self, _area: Rect, _ctx: &mut TickContext<'_>) -> bool {
        self.winds += 1;
        self.handles_zones
    }

    fn water_collision(&mut self, _area: Rect, is_top: bool, _ctx: &mut TickContext<'_>) -> bool {
        self.waters.push(is_top);
        self.handles_zones
    }
}

// =============================================================================
// Player
// =============================================================================

/// Player that walks toward `input` and records hits.
#[derive(Debug)]
pub struct TestPlayer {
    pub body: Body,
    pub latch: GroundLatch,
    pub interact: bool,
    pub breaks: bool,
    pub input: f32,
    pub hurts: Vec<f32>,
}

impl TestPlayer {
    pub fn at(pos: Vec2) -> Self {
        Self {
            body: player_body(pos),
            latch: GroundLatch::default(),
            interact: false,
            breaks: false,
            input: 0.0,
            hurts: Vec::new(),
        }
    }
}

impl Movable for TestPlayer {
    fn tag(&self) -> ActorTag {
        ActorTag::Player
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn pre_movement(&mut self, _ctx: &mut TickContext<'_>) {
        self.body.target.x = self.input;
    }

    fn post_movement(&mut self, _ctx: &mut TickContext<'_>) {
        self.latch.end_tick();
    }
}

impl Collidable for TestPlayer {
    fn vertical_collision_event(&mut self, dir: f32, _ctx: &mut TickContext<'_>) {
        if dir > 0.0 {
            self.latch.land();
        }
    }

    fn break_collision(&mut self, _area: Rect, _level: u8, _ctx: &mut TickContext<'_>) -> bool {
        self.breaks
    }
}

impl Damageable for TestPlayer {
    fn hurt(&mut self, _source: Rect, dir: f32, _ctx: &mut TickContext<'_>) -> bool {
        self.hurts.push(dir);
        true
    }
}

impl PlayerActor for TestPlayer {
    fn is_grounded(&self) -> bool {
        self.latch.is_grounded()
    }

    fn wants_interaction(&self) -> bool {
        self.interact
    }
}

// =============================================================================
// Enemy
// =============================================================================

/// Enemy that stands still and dies from any hit.
#[derive(Debug)]
pub struct TestEnemy {
    pub body: Body,
    pub spawn: SpawnPoint,
}

impl TestEnemy {
    pub fn at(pos: Vec2) -> Self {
        Self {
            body: enemy_body(pos, false),
            spawn: SpawnPoint::new(pos),
        }
    }
}

impl Movable for TestEnemy {
    fn tag(&self) -> ActorTag {
        ActorTag::Enemy
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn outside_camera_event(&mut self) {
        enemy_exit_camera(self);
    }
}

impl Collidable for TestEnemy {}

impl Damageable for TestEnemy {
    fn hurt(&mut self, _source: Rect, _dir: f32, _ctx: &mut TickContext<'_>) -> bool {
        self.body.start_dying();
        true
    }
}

impl EnemyActor for TestEnemy {
    fn spawn_point(&self) -> &SpawnPoint {
        &self.spawn
    }

    fn spawn_point_mut(&mut self) -> &mut SpawnPoint {
        &mut self.spawn
    }
}

// =============================================================================
// Trigger
// =============================================================================

/// Trigger that counts how it was used.
#[derive(Debug)]
pub struct TestTrigger {
    pub body: Body,
    pub kind: TriggerKind,
    pub touches: u32,
    pub interactions: u32,
    pub player_events: u32,
}

impl TestTrigger {
    pub fn new(pos: Vec2, kind: TriggerKind) -> Self {
        Self {
            body: Body::new(pos),
            kind,
            touches: 0,
            interactions: 0,
            player_events: 0,
        }
    }
}

impl Movable for TestTrigger {
    fn tag(&self) -> ActorTag {
        ActorTag::Trigger
    }

    fn body(&self) -> &Body {
        &self.body
    }

    fn body_mut(&mut self) -> &mut Body {
        &mut self.body
    }

    fn integrates(&self) -> bool {
        false
    }
}

impl Trigger for TestTrigger {
    fn kind(&self) -> TriggerKind {
        self.kind
    }

    fn player_event(&mut self, _player: &mut dyn PlayerActor, _ctx: &mut TickContext<'_>) {
        self.player_events += 1;
    }

    fn touch(&mut self, _player: &mut dyn PlayerActor, _ctx: &mut TickContext<'_>) -> TriggerResponse {
        self.touches += 1;
        TriggerResponse::Touched
    }

    fn interact(
        &mut self,
        _player: &mut dyn PlayerActor,
        _ctx: &mut TickContext<'_>,
    ) -> TriggerResponse {
        self.interactions += 1;
        TriggerResponse::Touched
    }
}

// =============================================================================
// Factory
// =============================================================================

/// Builds test actors from markers.
#[derive(Debug, Default)]
pub struct TestFactory {
    /// Walking input given to the player.
    pub input: f32,
    /// Whether the player breaks breakable tiles.
    pub breaks: bool,
}

impl ActorFactory for TestFactory {
    fn player(&mut self, pos: Vec2) -> Box<dyn PlayerActor> {
        let mut player = TestPlayer::at(pos);
        player.input = self.input;
        player.breaks = self.breaks;
        Box::new(player)
    }

    fn enemy(&mut self, _variant: u16, pos: Vec2, _index: usize) -> Option<Box<dyn EnemyActor>> {
        Some(Box::new(TestEnemy::at(pos)))
    }

    fn trigger(&mut self, marker: &Marker) -> Option<Box<dyn Trigger>> {
        match marker.kind {
            MarkerKind::Item(_) => Some(Box::new(TestTrigger::new(
                marker.spawn_pos(),
                TriggerKind::Weak,
            ))),
            _ => None,
        }
    }
}

// =============================================================================
// Stage Builder
// =============================================================================

/// Raw tile ids understood by [`StageBuilder`] stages.
pub mod raw {
    pub const SOLID: u16 = 1;
    pub const BREAKABLE: u16 = 2;
    /// Solid until the first toggle.
    pub const TOGGLE_ON: u16 = 3;
    /// Empty until the first toggle.
    pub const TOGGLE_OFF: u16 = 4;

    pub const PLAYER: u16 = 1;
    pub const SWITCH: u16 = 2;
    pub const ENEMY: u16 = 17;
    pub const ITEM: u16 = 49;
}

/// Builds single-layer stages cell by cell.
#[derive(Debug, Clone)]
pub struct StageBuilder {
    width: u32,
    height: u32,
    cells: Vec<u16>,
    objects: Vec<u16>,
}

impl StageBuilder {
    /// Empty stage of `rooms_x` by `rooms_y` default-sized rooms.
    pub fn rooms(rooms_x: u32, rooms_y: u32) -> Self {
        Self::new(rooms_x * 10, rooms_y * 9)
    }

    pub fn new(width: u32, height: u32) -> Self {
        let len = (width * height) as usize;
        Self {
            width,
            height,
            cells: vec![0; len],
            objects: vec![0; len],
        }
    }

    pub fn tile(mut self, x: u32, y: u32, raw: u16) -> Self {
        self.cells[(y * self.width + x) as usize] = raw;
        self
    }

    /// Solid floor across the whole bottom row.
    pub fn floor(mut self) -> Self {
        let y = self.height - 1;
        for x in 0..self.width {
            self = self.tile(x, y, raw::SOLID);
        }
        self
    }

    pub fn object(mut self, x: u32, y: u32, raw: u16) -> Self {
        self.objects[(y * self.width + x) as usize] = raw;
        self
    }

    pub fn desc(self) -> StageDesc {
        StageDesc {
            width: self.width,
            height: self.height,
            layers: vec![self.cells],
            collision_map: vec![0, 15, BREAKABLE_WEAK, 15, 0],
            collision_layers: None,
            objects: Some(self.objects),
            markers: MarkerTable::default(),
            water_level: None,
            inside: false,
            loop_x: false,
            toggle_pair: Some((raw::TOGGLE_ON, raw::TOGGLE_OFF)),
            fence_tiles: Vec::new(),
        }
    }

    pub fn build(self) -> Stage {
        Stage::from_desc(self.desc()).unwrap()
    }
}

/// World over `stage` with default config.
pub fn world_with(stage: Stage, factory: &mut TestFactory) -> World {
    World::new(stage, SimConfig::default(), factory).unwrap()
}

/// Steps `world` `ticks` times and returns every event raised.
pub fn run(world: &mut World, ticks: u32) -> Vec<crate::events::SimEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        world.step();
        events.extend(world.take_events());
    }
    events
}
