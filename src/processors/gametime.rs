use crate::core::error::Result;
use crate::pipeline::{FrameContext, Processor, ProcessorId};

/// Stage 1: advance the game clock
pub struct GametimeProcessor;

impl Processor for GametimeProcessor {
    fn id(&self) -> ProcessorId {
        ProcessorId::Gametime
    }

    fn process(&self, ctx: &mut FrameContext) -> Result<()> {
        ctx.clock.tick(ctx.dt, ctx.frame);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::context::testing::Harness;

    #[test]
    fn test_clock_accumulates() {
        let mut h = Harness::new();
        h.run(&GametimeProcessor, 0.25).unwrap();
        h.next_frame();
        h.run(&GametimeProcessor, 0.5).unwrap();

        assert_eq!(h.state.clock.frame, 2);
        assert_eq!(h.state.clock.elapsed, 0.75);
        assert_eq!(h.state.clock.dt, 0.5);
    }
}
