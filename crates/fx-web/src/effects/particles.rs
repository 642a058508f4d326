//! Glue for particle-batch effects: spawn in core, append to the shared
//! pool, let the shared loop do the rest.

use fx_core::spawn;

use crate::orchestrator::Handler;

pub fn handler_for(name: &'static str) -> Handler {
    Box::new(move |ctx, cfg| {
        let (w, h) = ctx.stage_size();
        let mut rng = ctx.fork_rng();
        let batch = spawn::spawn_for(name, cfg, w, h, ctx.motion, &mut rng)
            .ok_or_else(|| anyhow::anyhow!("{name} has no spawner"))?;
        ctx.add_particles(batch);
        Ok(())
    })
}
