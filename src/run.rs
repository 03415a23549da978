use instant::Instant;
use physics::Simulation;
use std::time::Duration;

pub struct Stats {
    pub tick_number: u64,
    instant_start: Instant,
    pub time_spent_in_physics: Duration,
}

pub fn run(sim: &mut Simulation, ticks: u64) {
    let mut stats = Stats {
        tick_number: 0,
        instant_start: Instant::now(),
        time_spent_in_physics: Duration::ZERO,
    };

    while stats.tick_number < ticks {
        let result = sim.run(1);
        stats.time_spent_in_physics += result.elapsed_real;
        stats.tick_number += result.elapsed_ticks;
        if stats.tick_number.is_power_of_two() || stats.tick_number % 1024 == 0 {
            log::info!(
                "Elapsed {}ms total, {}ms physics ({} ticks), {} bodies",
                Instant::now().duration_since(stats.instant_start).as_millis(),
                stats.time_spent_in_physics.as_millis(),
                stats.tick_number,
                sim.len(),
            );
        }
    }
    sim.log_forces();
    report(sim, &stats);
}

fn report(sim: &Simulation, stats: &Stats) {
    log::info!(
        "Finished {} ticks in {:.3}s",
        stats.tick_number,
        stats.time_spent_in_physics.as_secs_f64()
    );
    for (index, photometer) in sim.photometers().iter().enumerate() {
        let curve = photometer.recorded();
        let (Some(min), Some(max)) = (curve.iter().min(), curve.iter().max()) else {
            continue;
        };
        let mean = curve.iter().map(|&c| c as f64).sum::<f64>() / curve.len() as f64;
        let lit = curve.iter().filter(|&&c| c > 0).count();
        log::info!(
            "Photometer {}: min {}, max {}, mean {:.2}, lit {}/{} ticks",
            index,
            min,
            max,
            mean,
            lit,
            curve.len()
        );
    }

    let diagnostics = sim.diagnostics();
    if diagnostics.warnings() > 0 {
        log::warn!(
            "{} coincident, {} near-contact force evaluations, {} degenerate rays",
            diagnostics.coincident_pairs,
            diagnostics.near_contact_pairs,
            diagnostics.degenerate_rays
        );
    }
    if diagnostics.dangling_links > 0 {
        log::error!("{} force links outlived a body", diagnostics.dangling_links);
    }
    log::info!(
        "{} bodies left after {} merges, total mass {:e}",
        sim.len(),
        diagnostics.merges,
        sim.total_mass()
    );
}
