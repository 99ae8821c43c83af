//! Per-frame context threaded through every processor
//!
//! The store, both buses and the particle emitter are owned by
//! [`GameState`]; a [`FrameContext`] borrows them for one processor call.
//! Nothing in the core is a global.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::core::config::GameConfig;
use crate::core::error::Result;
use crate::core::types::Frame;
use crate::ecs::Store;
use crate::interfaces::{InputQueue, MapView, RenderQueue};
use crate::messaging::{Mailbox, MessageBus};
use crate::particles::ParticleEmitter;
use crate::scene::{SceneBook, SceneManager};

use super::order::ProcessorId;

/// Game time as seen by the simulation
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct GameClock {
    pub frame: Frame,
    /// Seconds of unpaused simulation
    pub elapsed: f64,
    pub dt: f32,
}

impl GameClock {
    pub fn tick(&mut self, dt: f32, frame: Frame) {
        self.frame = frame;
        self.dt = dt;
        self.elapsed += f64::from(dt);
    }
}

/// Everything the pipeline mutates
#[derive(Debug)]
pub struct GameState {
    pub store: Store,
    pub bus: MessageBus,
    pub mailbox: Mailbox,
    pub particles: ParticleEmitter,
    pub scene: SceneManager,
    pub clock: GameClock,
    pub input: InputQueue,
    pub render: RenderQueue,
    pub rng: ChaCha8Rng,
}

impl GameState {
    pub fn new(book: SceneBook, seed: u64) -> Self {
        Self {
            store: Store::new(),
            bus: MessageBus::new(),
            mailbox: Mailbox::new(),
            particles: ParticleEmitter::new(),
            scene: SceneManager::new(book),
            clock: GameClock::default(),
            input: InputQueue::new(),
            render: RenderQueue::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
        }
    }

    /// Split the state into the borrows one processor call needs
    pub fn context<'a>(
        &'a mut self,
        dt: f32,
        frame: Frame,
        map: &'a dyn MapView,
        config: &'a GameConfig,
    ) -> FrameContext<'a> {
        FrameContext {
            dt,
            frame,
            store: &mut self.store,
            bus: &mut self.bus,
            mailbox: &mut self.mailbox,
            particles: &mut self.particles,
            scene: &mut self.scene,
            clock: &mut self.clock,
            input: &mut self.input,
            render: &mut self.render,
            rng: &mut self.rng,
            map,
            config,
        }
    }
}

pub struct FrameContext<'a> {
    pub dt: f32,
    pub frame: Frame,
    pub store: &'a mut Store,
    pub bus: &'a mut MessageBus,
    pub mailbox: &'a mut Mailbox,
    pub particles: &'a mut ParticleEmitter,
    pub scene: &'a mut SceneManager,
    pub clock: &'a mut GameClock,
    pub input: &'a mut InputQueue,
    pub render: &'a mut RenderQueue,
    pub rng: &'a mut ChaCha8Rng,
    pub map: &'a dyn MapView,
    pub config: &'a GameConfig,
}

/// One stage of the frame pipeline
///
/// Processors keep no state of their own between frames; anything that must
/// survive lives in components, the mailbox or the game state.
pub trait Processor {
    fn id(&self) -> ProcessorId;
    fn process(&self, ctx: &mut FrameContext) -> Result<()>;
}

#[cfg(test)]
pub(crate) mod testing {
    //! Harness for running single processors in unit tests

    use super::*;
    use crate::interfaces::OpenArena;

    pub struct Harness {
        pub state: GameState,
        pub config: GameConfig,
        pub map: OpenArena,
        pub frame: Frame,
    }

    impl Harness {
        pub fn new() -> Self {
            Self {
                state: GameState::new(SceneBook::default(), 7),
                config: GameConfig::default(),
                map: OpenArena::default(),
                frame: 1,
            }
        }

        /// Run one processor in the current frame
        pub fn run(&mut self, processor: &dyn Processor, dt: f32) -> Result<()> {
            self.state.bus.set_frame(self.frame);
            self.state.mailbox.set_frame(self.frame);
            self.state.bus.set_stage(Some(processor.id()));
            let mut ctx = self.state.context(dt, self.frame, &self.map, &self.config);
            processor.process(&mut ctx)
        }

        /// End the frame: flush destruction, clear the bus
        pub fn next_frame(&mut self) {
            for e in self.state.store.flush_destroyed() {
                self.state.mailbox.purge_entity(e);
            }
            self.state.bus.reset_frame();
            self.frame += 1;
        }
    }
}
