use crate::components::{find_player, Attackable, Lifetime, Player, Position, Renderable, Scenery, SpeechBubble};
use crate::core::error::Result;
use crate::core::types::{Color, EntityId, Vec2};
use crate::messaging::ActivateSpeechBubble;
use crate::pipeline::{FrameContext, Processor, ProcessorId};
use crate::scene::SceneState;

/// Stage 20b: speech bubbles and the frame's draw list
///
/// The only stage that produces drawing output. It fills the render queue
/// back to front: scenery, characters, textures, particles, bubbles, status.
pub struct RenderableProcessor;

impl RenderableProcessor {
    fn update_bubbles(&self, ctx: &mut FrameContext) -> Result<()> {
        for entity in ctx.mailbox.recipients::<ActivateSpeechBubble>() {
            let Some(bubble) = ctx.mailbox.take::<ActivateSpeechBubble>(entity) else {
                continue;
            };
            if ctx.store.contains(entity) {
                ctx.store.attach(
                    entity,
                    SpeechBubble {
                        text: bubble.text,
                        remaining: bubble.duration,
                    },
                )?;
            }
        }

        for entity in ctx.store.entities_with::<SpeechBubble>() {
            let expired = match ctx.store.get_mut::<SpeechBubble>(entity) {
                Some(bubble) => {
                    bubble.remaining -= ctx.dt;
                    bubble.remaining <= 0.0
                }
                None => false,
            };
            if expired {
                ctx.store.remove::<SpeechBubble>(entity);
            }
        }

        // Shown from the next frame on, when the bubble above is taken
        if let Some(player) = find_player(ctx.store) {
            let hurt = ctx
                .store
                .get::<Attackable>(player)
                .is_some_and(|a| a.is_alive() && a.damaged_at == Some(ctx.frame));
            if hurt {
                ctx.mailbox.post(
                    player,
                    ActivateSpeechBubble {
                        text: "Ouch!".into(),
                        duration: ctx.config.combat.speech_bubble_duration,
                    },
                );
            }
        }
        Ok(())
    }

    fn build_queue(&self, ctx: &mut FrameContext) {
        let store = &*ctx.store;
        let render = &mut *ctx.render;
        let lift = Vec2::new(0.0, -ctx.config.render.cell_height);
        render.clear();

        // 0 scenery, 1 characters, 2 textures
        let layer = |e: EntityId| {
            if store.has::<Scenery>(e) {
                0
            } else if store.has::<Lifetime>(e) {
                2
            } else {
                1
            }
        };
        let mut drawables: Vec<(u8, EntityId)> = store
            .query::<Renderable>()
            .filter(|(_, r)| r.visible)
            .map(|(e, _)| (layer(e), e))
            .collect();
        drawables.sort();

        for (_, entity) in drawables {
            let (Some(renderable), Some(position)) = (store.get::<Renderable>(entity), store.get::<Position>(entity))
            else {
                continue;
            };
            render.glyph(position.pos, renderable.current_glyph(), renderable.current_color());
        }

        for particle in ctx.particles.iter() {
            match &particle.text {
                Some(text) => render.text(particle.pos, text.clone(), particle.color),
                None => render.glyph(particle.pos, particle.glyph, particle.color),
            }
        }

        let mut bubbles: Vec<(EntityId, &SpeechBubble)> = store.query::<SpeechBubble>().collect();
        bubbles.sort_by_key(|(e, _)| *e);
        for (entity, bubble) in bubbles {
            if let Some(position) = store.get::<Position>(entity) {
                render.text(position.pos + lift, bubble.text.clone(), Color::White);
            }
        }

        let player = find_player(store);
        let health = player.and_then(|p| store.get::<Attackable>(p)).map_or(0, |a| a.health);
        let score = player.and_then(|p| store.get::<Player>(p)).map_or(0, |s| s.score);
        let scene = ctx.scene.current().map(|s| s.name.as_str()).unwrap_or("");
        render.text(
            Vec2::ZERO,
            format!("HP {}  Score {}  {}", health, score, scene),
            Color::White,
        );

        let hint = &ctx.config.render.restart_hint;
        let banner = match ctx.scene.state() {
            SceneState::GameOver => Some(format!("GAME OVER - press {} to restart", hint)),
            SceneState::Victory => Some(format!("VICTORY - press {} to play again", hint)),
            _ => None,
        };
        if let Some(banner) = banner {
            let bounds = ctx.map.bounds();
            let pos = Vec2::new(bounds.center().x - banner.len() as f32 * ctx.config.render.cell_width / 2.0, bounds.center().y);
            render.text(pos, banner, Color::Red);
        }
    }
}

impl Processor for RenderableProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Renderable
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        self.update_bubbles(ctx)?;
        self.build_queue(ctx);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::RenderTuning;
    use crate::interfaces::{DrawCommand, TextCanvas};
    use crate::pipeline::context::testing::Harness;

    fn player(h: &mut Harness) -> EntityId {
        let p = h.state.store.create_entity();
        h.state.store.attach(p, Player::default()).unwrap();
        h.state.store.attach(p, Attackable::new(100)).unwrap();
        h.state.store.attach(p, Position::at(Vec2::new(100.0, 100.0))).unwrap();
        h.state.store.attach(p, Renderable::new('@', Color::White)).unwrap();
        p
    }

    #[test]
    fn test_queue_draws_entities_and_status() {
        let mut h = Harness::new();
        player(&mut h);
        h.run(&RenderableProcessor, 0.1).unwrap();

        let mut canvas = TextCanvas::new(80, 25, RenderTuning::default());
        h.state.render.replay(&mut canvas);
        assert_eq!(canvas.get(10, 5), Some('@'));
        assert!(canvas.lines()[0].starts_with("HP 100  Score 0"));
    }

    #[test]
    fn test_game_over_banner_names_restart_key() {
        let mut h = Harness::new();
        h.config.render.restart_hint = "|".to_string();
        h.state.scene.set_state(SceneState::GameOver);
        h.run(&RenderableProcessor, 0.1).unwrap();

        let banner = h.state.render.commands().iter().any(|c| match c {
            DrawCommand::Text { text, .. } => text == "GAME OVER - press | to restart",
            _ => false,
        });
        assert!(banner);
    }

    #[test]
    fn test_bubble_shows_then_expires() {
        let mut h = Harness::new();
        let p = player(&mut h);
        h.state.mailbox.post(p, ActivateSpeechBubble { text: "hi".into(), duration: 0.5 });
        h.run(&RenderableProcessor, 0.25).unwrap();

        let has_text = |h: &Harness| {
            h.state
                .render
                .commands()
                .iter()
                .any(|c| matches!(c, DrawCommand::Text { text, .. } if text == "hi"))
        };
        assert!(has_text(&h));
        h.next_frame();
        h.run(&RenderableProcessor, 0.25).unwrap();
        assert!(!has_text(&h));
        assert!(!h.state.store.has::<SpeechBubble>(p));
    }

    #[test]
    fn test_damaged_player_says_ouch_next_frame() {
        let mut h = Harness::new();
        let p = player(&mut h);
        h.state.store.get_mut::<Attackable>(p).unwrap().damaged_at = Some(h.frame);
        h.run(&RenderableProcessor, 0.1).unwrap();
        assert_eq!(h.state.mailbox.peek::<ActivateSpeechBubble>(p).map(|b| b.text.as_str()), Some("Ouch!"));
        assert!(!h.state.store.has::<SpeechBubble>(p));
        h.next_frame();

        h.run(&RenderableProcessor, 0.1).unwrap();
        assert_eq!(h.state.store.get::<SpeechBubble>(p).map(|b| b.text.as_str()), Some("Ouch!"));
    }
}
