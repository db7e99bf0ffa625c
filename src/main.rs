use std::cell::Cell;
use std::rc::Rc;
use std::time::Instant;

use recycler::config::Config;
use recycler::pool::{Pooled, Recycler};
use recycler::pools::{register_vec_pool, VEC_POOL};
use recycler::registry::Registry;

use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

/// Short-lived simulation payload.
#[derive(Debug, Default)]
struct Particle {
    pos: [f32; 2],
    vel: [f32; 2],
    age: u32,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse configuration
    let config = Config::parse_args();

    // Initialize tracing
    let log_level = match config.log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("recycler-churn v{}", env!("CARGO_PKG_VERSION"));
    info!(
        "Configuration: iterations={}, batch={}, prefill={}, tracking={}",
        config.iterations, config.batch, config.prefill, config.tracking
    );

    let mut registry = Registry::new();

    let particles = registry.create_pool(
        "ParticlePool",
        Recycler::builder()
            .allocate(|(pos, vel): ([f32; 2], [f32; 2])| Particle { pos, vel, age: 0 })
            .renew(|(pos, vel), particle: &mut Particle| {
                particle.pos = pos;
                particle.vel = vel;
                particle.age = 0;
            })
            .config(config.recycler_config()),
    )?;
    let scratch = register_vec_pool::<u32>(&mut registry, VEC_POOL)?;

    // Track the high-water mark of checked-out particles
    let peak_used = Rc::new(Cell::new(0u64));
    {
        let peak = Rc::clone(&peak_used);
        particles
            .borrow_mut()
            .on_stats(move |stats| peak.set(peak.get().max(stats.used)));
    }

    if config.prefill > 0 {
        particles.borrow_mut().expand(config.prefill)?;
        scratch.borrow_mut().expand(config.prefill)?;
        info!("Prefilled {} instances per pool", config.prefill);
    }

    let start = Instant::now();
    let mut live = Vec::with_capacity(config.batch);
    let mut checksum = 0u64;

    for round in 0..config.iterations {
        {
            let mut pool = particles.borrow_mut();
            for i in 0..config.batch {
                let seed = (round + i) as f32;
                live.push(pool.obtain(([seed, seed], [1.0, -1.0])));
            }
            for particle in live.iter_mut() {
                particle.pos[0] += particle.vel[0];
                particle.pos[1] += particle.vel[1];
                particle.age += 1;
            }
            for particle in live.drain(..) {
                pool.recycle(particle);
            }
        }

        let mut ids = Pooled::acquire(&scratch, ());
        ids.extend(0..config.batch as u32);
        checksum = checksum.wrapping_add(ids.len() as u64);
    }

    let elapsed = start.elapsed();
    let ops = config.total_acquires() as f64;
    info!(
        "Ran {} rounds in {:?} ({:.0} acquires/sec, checksum={})",
        config.iterations,
        elapsed,
        ops / elapsed.as_secs_f64().max(f64::EPSILON),
        checksum
    );
    if config.tracking {
        info!("Peak particles in use: {}", peak_used.get());
    }

    for line in registry.report() {
        match line.stats {
            Some(stats) => info!(
                "{} <{}>: allocated={} free={} used={} size={} utilization={:.1}%",
                line.name,
                line.type_name,
                stats.allocated,
                stats.free,
                stats.used,
                stats.size,
                stats.utilization() * 100.0
            ),
            None => info!("{} <{}>: busy", line.name, line.type_name),
        }
    }

    Ok(())
}
