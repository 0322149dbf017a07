//! # Trajectory Planning Benchmark

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use align_lib::{kin_conv::VehicleGeometry, traj_plan};
use comms_if::eqpt::vision::TargetObservation;

fn traj_plan_benchmark(c: &mut Criterion) {
    let obs = TargetObservation {
        visible: true,
        x_offset_m: 0.5,
        y_offset_m: 1.0,
        z_rotation_deg: 30.0,
        distance_m: 1.118,
    };

    let geometry = VehicleGeometry {
        wheel_radius_m: 0.0762,
        turn_radius_m: 0.27305,
        step_duration_s: 1.0,
    };

    c.bench_function("traj_plan", |b| b.iter(|| {
        traj_plan::plan(black_box(&obs), black_box(0.2))
    }));

    c.bench_function("traj_plan + kin_conv", |b| b.iter(|| {
        let plan = traj_plan::plan(black_box(&obs), black_box(0.2));
        geometry.rate_command(plan.correction_angle.deg, plan.aim_point_distance_m)
    }));
}

criterion_group!(benches, traj_plan_benchmark);
criterion_main!(benches);
