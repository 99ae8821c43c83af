//! Frame driver

use ahash::AHashMap;
use serde::Serialize;

use crate::components::{find_player, Attackable, Enemy, Player, Renderable};
use crate::core::config::GameConfig;
use crate::core::types::{EntityId, Frame};
use crate::interfaces::{GameKey, MapView, OpenArena, RenderQueue};
use crate::messaging::MessageKind;
use crate::processors;
use crate::scene::{SceneBook, SceneState};

use super::context::{GameState, Processor};
use super::order::{ProcessorId, PIPELINE_ORDER};

/// Frames between two statistics log lines
const STATS_INTERVAL: Frame = 1000;

/// What happened during the last completed frame
#[derive(Debug, Clone, Default)]
pub struct FrameReport {
    pub frame: Frame,
    /// Broadcast message counts by kind, taken just before the bus reset
    pub counts: AHashMap<MessageKind, usize>,
    /// Entities removed from the store at the end of the frame
    pub destroyed: Vec<EntityId>,
    /// Processors that returned an error, with the message
    pub failures: Vec<(ProcessorId, String)>,
}

impl FrameReport {
    pub fn count(&self, kind: MessageKind) -> usize {
        self.counts.get(&kind).copied().unwrap_or(0)
    }
}

/// Snapshot for the headless runner and status lines
#[derive(Debug, Clone, Serialize)]
pub struct GameSummary {
    pub frame: Frame,
    pub elapsed: f64,
    pub scene: String,
    pub scene_state: SceneState,
    pub enemies_alive: usize,
    pub player_health: Option<i32>,
    pub score: u32,
    pub kills: u32,
    pub entities: usize,
}

pub struct Game {
    state: GameState,
    config: GameConfig,
    map: Box<dyn MapView>,
    processors: Vec<Box<dyn Processor>>,
    paused: bool,
    last_report: FrameReport,
}

impl Game {
    pub fn new(config: GameConfig, book: SceneBook, map: Box<dyn MapView>) -> Self {
        let processors = PIPELINE_ORDER.iter().map(|id| processors::build(*id)).collect();
        tracing::info!(
            "Game created: {} scenes, {} processors, seed {}",
            book.len(),
            PIPELINE_ORDER.len(),
            config.seed
        );
        Self {
            state: GameState::new(book, config.seed),
            config,
            map,
            processors,
            paused: false,
            last_report: FrameReport::default(),
        }
    }

    /// Default config, built-in scenes, open arena
    pub fn with_defaults() -> Self {
        Self::new(GameConfig::default(), SceneBook::default(), Box::new(OpenArena::default()))
    }

    /// Run one frame. Returns false when paused and nothing ran.
    pub fn advance(&mut self, dt: f32, frame: Frame) -> bool {
        self.advance_observed(dt, frame, |_, _| {})
    }

    /// Run one frame, calling `observer` after each processor
    ///
    /// 1. Stamp both buses with the frame number
    /// 2. Run every processor in [`PIPELINE_ORDER`]; an error is logged and
    ///    the next processor runs
    /// 3. Destroy entities scheduled during the frame and purge their mail
    /// 4. Record the frame report, then clear the broadcast bus
    pub fn advance_observed(
        &mut self,
        dt: f32,
        frame: Frame,
        mut observer: impl FnMut(ProcessorId, &GameState),
    ) -> bool {
        if self.paused {
            return false;
        }

        self.state.bus.set_frame(frame);
        self.state.mailbox.set_frame(frame);

        let mut failures = Vec::new();
        for processor in &self.processors {
            let id = processor.id();
            self.state.bus.set_stage(Some(id));
            let mut ctx = self.state.context(dt, frame, self.map.as_ref(), &self.config);
            if let Err(e) = processor.process(&mut ctx) {
                tracing::error!("Processor {} failed in frame {}: {}", id, frame, e);
                failures.push((id, e.to_string()));
            }
            observer(id, &self.state);
        }

        let destroyed = self.state.store.flush_destroyed();
        for entity in &destroyed {
            self.state.mailbox.purge_entity(*entity);
        }

        let counts = MessageKind::ALL
            .iter()
            .map(|kind| (*kind, self.state.bus.count(*kind)))
            .filter(|(_, n)| *n > 0)
            .collect();
        self.last_report = FrameReport {
            frame,
            counts,
            destroyed,
            failures,
        };

        if frame > 0 && frame % STATS_INTERVAL == 0 {
            self.log_stats();
        }

        self.state.bus.reset_frame();
        true
    }

    pub fn toggle_pause(&mut self) -> bool {
        self.paused = !self.paused;
        tracing::info!("Paused: {}", self.paused);
        self.paused
    }

    pub fn set_paused(&mut self, paused: bool) {
        self.paused = paused;
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Queue a key press for the next frame's input stage
    pub fn push_key(&mut self, key: GameKey, timestamp: f64) {
        self.state.input.press(key, timestamp);
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn state_mut(&mut self) -> &mut GameState {
        &mut self.state
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn map(&self) -> &dyn MapView {
        self.map.as_ref()
    }

    pub fn last_report(&self) -> &FrameReport {
        &self.last_report
    }

    /// Draw list produced by the last frame
    pub fn render_queue(&self) -> &RenderQueue {
        &self.state.render
    }

    pub fn summary(&self) -> GameSummary {
        let store = &self.state.store;
        let player = find_player(store);
        let stats = player.and_then(|p| store.get::<Player>(p));
        GameSummary {
            frame: self.state.clock.frame,
            elapsed: self.state.clock.elapsed,
            scene: self
                .state
                .scene
                .current()
                .map(|s| s.name.clone())
                .unwrap_or_default(),
            scene_state: self.state.scene.state(),
            enemies_alive: store
                .query::<Enemy>()
                .filter(|(e, _)| store.get::<Attackable>(*e).is_some_and(|a| a.is_alive()))
                .count(),
            player_health: player.and_then(|p| store.get::<Attackable>(p)).map(|a| a.health),
            score: stats.map(|s| s.score).unwrap_or(0),
            kills: stats.map(|s| s.kills).unwrap_or(0),
            entities: store.len(),
        }
    }

    fn log_stats(&self) {
        let store = &self.state.store;
        let visible = store.query::<Renderable>().filter(|(_, r)| r.visible).count();
        tracing::info!(
            "Frame {}: {} entities ({} components), {} renderables ({} visible), {} enemies, {} particles",
            self.state.clock.frame,
            store.len(),
            store.component_count(),
            store.count::<Renderable>(),
            visible,
            store.count::<Enemy>(),
            self.state.particles.len()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pause_short_circuits_advance() {
        let mut game = Game::with_defaults();
        game.toggle_pause();
        assert!(!game.advance(0.1, 1));
        assert_eq!(game.state().store.len(), 0);
        assert_eq!(game.state().clock.frame, 0);

        game.toggle_pause();
        assert!(game.advance(0.1, 1));
        assert!(game.state().store.len() > 0);
    }

    #[test]
    fn test_bus_is_empty_after_every_frame() {
        let mut game = Game::with_defaults();
        for frame in 1..=5 {
            game.push_key(GameKey::Attack, frame as f64);
            game.advance(0.1, frame);
            assert!(game.state().bus.is_empty());
            assert!(game.last_report().count(MessageKind::Keypress) >= 1);
        }
    }

    #[test]
    fn test_observer_sees_every_stage_in_order() {
        let mut game = Game::with_defaults();
        let mut seen = Vec::new();
        game.advance_observed(0.1, 1, |id, _| seen.push(id));
        assert_eq!(seen, PIPELINE_ORDER.to_vec());
    }

    #[test]
    fn test_first_frame_spawns_scene() {
        let mut game = Game::with_defaults();
        game.advance(0.1, 1);
        let summary = game.summary();
        assert_eq!(summary.scene, "Village");
        assert_eq!(summary.scene_state, SceneState::Fighting);
        assert_eq!(summary.enemies_alive, 3);
        assert_eq!(summary.player_health, Some(100));
    }
}
