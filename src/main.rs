use anyhow::Result;
use neighborhood_sim::{config, simulation, telemetry};
use config::Config;
use rand::{rngs::StdRng, SeedableRng};
use simulation::{TracingObserver, World};
use telemetry::init_tracing;
use tracing::info;

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    init_tracing();

    let cfg = Config::load()?;
    let world_cfg = cfg.world_config()?;

    let mut rng = StdRng::seed_from_u64(cfg.simulation.seed);
    let mut world =
        World::configure_and_generate(&world_cfg, &mut rng)?.with_observer(Box::new(TracingObserver));

    info!(
        steps = cfg.simulation.steps,
        seed = cfg.simulation.seed,
        "starting neighborhood simulation"
    );
    world.run(cfg.simulation.steps);

    let world_info = world.world_info();
    info!(
        clock = world_info.clock,
        ambient_c = world_info.ambient_temp_c,
        "simulation finished"
    );

    cfg.snapshot().write_json(&cfg.output.snapshot_path)?;
    info!(path = %cfg.output.snapshot_path.display(), "configuration snapshot written");
    Ok(())
}
