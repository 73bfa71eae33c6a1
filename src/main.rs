use vbpe::prelude::*;

const FRAMES: u64 = 600;
const DT: f32 = 1.0 / 60.0;

fn main() {
    let mut sim = Simulation::new()
        .with_grid(GridConfig::new(21, 21, 21))
        .with_splat(SplatConfig::new(0.5));
    sim.spawn();

    let mut clock = Time::new();
    clock.set_fixed_delta(Some(DT));

    for _ in 0..FRAMES {
        let dt = clock.update();
        let voxels = sim.step(dt).len();
        if clock.frame() % 60 == 0 {
            println!(
                "t={:5.2}s beams={:2} voxels={:4}",
                clock.frame() as f32 * DT,
                sim.live_count(),
                voxels
            );
        }
    }
}
