use crate::components::{find_player, Enemy};
use crate::core::error::Result;
use crate::interfaces::GameKey;
use crate::messaging::{
    ActivateSpeechBubble, EntityDying, GameOver, GameStart, Keypress, PlayerLocation, SceneMove,
    SpawnEnemy, SpawnPlayer,
};
use crate::pipeline::{FrameContext, Processor, ProcessorId};
use crate::scene::SceneState;

/// Stage 15: scene flow
///
/// Pending -> Fighting on the first frame of a scene, Fighting -> Cleared
/// when its last enemy goes down, Cleared -> next scene (or Victory) once
/// the player walks past the exit. Player death ends the run; the restart
/// key then tears everything down and starts over.
pub struct SceneProcessor;

impl SceneProcessor {
    /// Spawn scene `index`; `moved` distinguishes a scene change from a fresh start
    fn start_scene(&self, ctx: &mut FrameContext, index: usize, moved: bool) -> Result<()> {
        let scene = ctx.scene.begin(index)?.clone();
        tracing::info!("Scene {} '{}' starts with {} enemies", index, scene.name, scene.enemies.len());

        if moved {
            ctx.bus.post(SceneMove {
                scene: index,
                name: scene.name.clone(),
            });
        } else {
            ctx.bus.post(GameStart { scene: index });
        }
        ctx.bus.post(SpawnPlayer {
            pos: scene.player_spawn,
        });
        for spawn in &scene.enemies {
            ctx.bus.post(SpawnEnemy {
                kind: spawn.kind,
                pos: spawn.pos,
            });
        }
        Ok(())
    }

    fn restart(&self, ctx: &mut FrameContext) -> Result<()> {
        let entities = ctx.store.entities();
        tracing::info!("Restarting: removing {} entities", entities.len());
        for entity in entities {
            ctx.store.destroy(entity);
        }
        ctx.mailbox.clear();
        ctx.particles.clear();
        ctx.scene.restart();
        self.start_scene(ctx, 0, false)
    }

    fn say(&self, ctx: &mut FrameContext, text: String) {
        if let Some(player) = find_player(ctx.store) {
            ctx.mailbox.post(
                player,
                ActivateSpeechBubble {
                    text,
                    duration: ctx.config.combat.speech_bubble_duration,
                },
            );
        }
    }
}

impl Processor for SceneProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Scene
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        if ctx.bus.read::<GameOver>().next().is_some() && !ctx.scene.state().is_terminal() {
            tracing::info!("Game over in scene {}", ctx.scene.current_index());
            ctx.scene.set_state(SceneState::GameOver);
        }

        match ctx.scene.state() {
            SceneState::Pending => {
                let index = ctx.scene.current_index();
                self.start_scene(ctx, index, false)?;
            }
            SceneState::Fighting => {
                if find_player(ctx.store).is_some() {
                    if let Some(intro) = ctx.scene.take_intro() {
                        self.say(ctx, intro);
                    }
                }
                let fallen = ctx
                    .bus
                    .read::<EntityDying>()
                    .filter(|d| ctx.store.has::<Enemy>(d.entity))
                    .count();
                for _ in 0..fallen {
                    if ctx.scene.enemy_down() {
                        tracing::info!("Scene {} cleared", ctx.scene.current_index());
                        self.say(ctx, "All clear, head right".to_string());
                    }
                }
            }
            SceneState::Cleared => {
                let exit_x = ctx.scene.current()?.exit_x;
                let at_exit = ctx
                    .bus
                    .latest::<PlayerLocation>()
                    .is_some_and(|l| l.pos.x >= exit_x);
                if at_exit {
                    match ctx.scene.next_index() {
                        Some(next) => self.start_scene(ctx, next, true)?,
                        None => {
                            tracing::info!("Victory");
                            ctx.scene.set_state(SceneState::Victory);
                            self.say(ctx, "Victory!".to_string());
                        }
                    }
                }
            }
            SceneState::GameOver | SceneState::Victory => {
                let restart = ctx.bus.read::<Keypress>().any(|k| k.key == GameKey::Restart);
                if restart {
                    self.restart(ctx)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::Player;
    use crate::core::kinds::EnemyKind;
    use crate::core::types::Vec2;
    use crate::messaging::MessageKind;
    use crate::pipeline::context::testing::Harness;

    #[test]
    fn test_first_frame_spawns_roster() {
        let mut h = Harness::new();
        h.run(&SceneProcessor, 0.1).unwrap();

        assert_eq!(h.state.scene.state(), SceneState::Fighting);
        assert_eq!(h.state.bus.count(MessageKind::GameStart), 1);
        assert_eq!(h.state.bus.count(MessageKind::SpawnPlayer), 1);
        assert_eq!(h.state.bus.count(MessageKind::SpawnEnemy), 3);
    }

    #[test]
    fn test_cleared_then_exit_moves_to_next_scene() {
        let mut h = Harness::new();
        h.run(&SceneProcessor, 0.1).unwrap();
        h.next_frame();

        let player = h.state.store.create_entity();
        h.state.store.attach(player, Player::default()).unwrap();
        for _ in 0..3 {
            let e = h.state.store.create_entity();
            h.state.store.attach(e, Enemy::new(EnemyKind::StickFigure, 1.0)).unwrap();
            h.state.bus.post(EntityDying { entity: e, killer: Some(player) });
        }
        h.run(&SceneProcessor, 0.1).unwrap();
        assert_eq!(h.state.scene.state(), SceneState::Cleared);
        h.next_frame();

        h.state.bus.post(PlayerLocation { entity: player, pos: Vec2::new(770.0, 250.0) });
        h.run(&SceneProcessor, 0.1).unwrap();
        assert_eq!(h.state.scene.current_index(), 1);
        assert_eq!(h.state.scene.state(), SceneState::Fighting);
        let moves = h.state.bus.collect::<SceneMove>();
        assert_eq!(moves[0].name, "Meadow");
    }

    #[test]
    fn test_restart_after_game_over() {
        let mut h = Harness::new();
        h.run(&SceneProcessor, 0.1).unwrap();
        h.next_frame();
        let player = h.state.store.create_entity();
        h.state.bus.post(GameOver { player });
        h.run(&SceneProcessor, 0.1).unwrap();
        assert_eq!(h.state.scene.state(), SceneState::GameOver);
        h.next_frame();

        h.state.bus.post(Keypress { key: GameKey::Restart, timestamp: 0.0 });
        h.run(&SceneProcessor, 0.1).unwrap();
        assert!(h.state.store.is_empty());
        assert_eq!(h.state.scene.state(), SceneState::Fighting);
        assert_eq!(h.state.bus.count(MessageKind::GameStart), 1);
    }
}
