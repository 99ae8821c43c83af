use crate::components::{find_player, Attackable, Defense, Enemy, Offense, Player, Position, Renderable};
use crate::core::error::Result;
use crate::core::types::{Color, Direction};
use crate::messaging::{EntityDying, PlayerAttack, SpawnPlayer};
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 18: player lifecycle and run statistics
pub struct PlayerProcessor;

impl PlayerProcessor {
    fn spawn(&self, ctx: &mut FrameContext, spawn: SpawnPlayer) -> Result<()> {
        if let Some(player) = find_player(ctx.store) {
            if let Some(position) = ctx.store.get_mut::<Position>(player) {
                position.pos = spawn.pos;
                position.facing = Direction::Right;
            }
            if let Some(stats) = ctx.store.get_mut::<Player>(player) {
                stats.appeared = false;
            }
            tracing::debug!("Player {} moved to {:?}", player, spawn.pos);
            return Ok(());
        }

        let tuning = &ctx.config.player;
        let (damage, cooldown, stun) = ctx
            .config
            .weapons
            .get(tuning.start_weapon)
            .map_or((25, 0.3, 0.0), |w| (w.damage, w.cooldown, w.stun));
        let mut offense = Offense::new(tuning.start_weapon, damage, cooldown);
        offense.stun = stun;

        let store = &mut *ctx.store;
        let player = store.create_entity();
        store.attach(player, Player::default())?;
        store.attach(player, Position::at(spawn.pos))?;
        store.attach(player, Renderable::new('@', Color::White))?;
        store.attach(player, Attackable::new(tuning.max_health))?;
        store.attach(player, offense)?;
        store.attach(player, Defense::block(ctx.config.combat.block_mitigation))?;
        tracing::info!("Player {} spawned at {:?}", player, spawn.pos);
        Ok(())
    }
}

impl Processor for PlayerProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Player
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        for spawn in ctx.bus.collect::<SpawnPlayer>() {
            self.spawn(ctx, spawn)?;
        }

        let Some(player) = find_player(ctx.store) else {
            return Ok(());
        };
        let attacks = ctx.bus.read::<PlayerAttack>().filter(|a| a.entity == player).count() as u32;
        let kills = ctx
            .bus
            .read::<EntityDying>()
            .filter(|d| d.killer == Some(player) && ctx.store.has::<Enemy>(d.entity))
            .count() as u32;

        let score_per_kill = ctx.config.player.score_per_kill;
        if let Some(stats) = ctx.store.get_mut::<Player>(player) {
            stats.attacks += attacks;
            stats.kills += kills;
            stats.score += kills * score_per_kill;
            if kills > 0 {
                tracing::debug!("Player kills {} (score {})", stats.kills, stats.score);
            }
        }
        Ok(())
    }
}
