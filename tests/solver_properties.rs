//! Invariants that must hold for any scene.

mod common;

use bevy::math::Vec2;
use common::{random_scene, run_frames, state_with_grid, water_block};
use water2d::core::{Grid, ParticleTransferCache};
use water2d::solver::scatter_mass_momentum;
use water2d::{GridForces, Particle, PointerInteraction, SolverParams};

#[test]
fn scattered_mass_equals_particle_count_before_mirroring() {
    let mut state = state_with_grid(32, 24, 500, SolverParams::default());
    random_scene(&mut state, 500, 7, 0.5);

    let mut grid = Grid::with_capacity(32 * 24);
    grid.resize(32, 24).unwrap();
    for particle in state.active_particles() {
        let transfer = ParticleTransferCache::for_particle(particle.position, grid.width());
        scatter_mass_momentum(grid.cells_mut(), particle, &transfer);
    }
    grid.normalize_aeration();

    let total = grid.total_mass();
    assert!((total - 500.0).abs() < 1e-2, "total mass {total}");
}

#[test]
fn mirrored_boundary_pairs_match_after_p2g() {
    let (w, h) = (12, 10);
    let mut state = state_with_grid(w, h, 300, SolverParams::default());
    random_scene(&mut state, 300, 11, 0.3);
    state.p2g().unwrap();

    let grid = state.grid();
    let pairs = (0..h)
        .flat_map(|y| [((0, y), (1, y)), ((w - 1, y), (w - 2, y))])
        .chain((0..w).flat_map(|x| [((x, 0), (x, 1)), ((x, h - 1), (x, h - 2))]));
    for ((ax, ay), (bx, by)) in pairs {
        let a = grid.get(ax, ay).unwrap();
        let b = grid.get(bx, by).unwrap();
        assert_eq!(a.mass, b.mass, "mass of ({ax}, {ay}) vs ({bx}, {by})");
        assert_eq!(a.velocity, b.velocity, "momentum of ({ax}, {ay}) vs ({bx}, {by})");
    }
}

#[test]
fn positions_stay_inside_interior_under_extreme_velocity() {
    let (w, h) = (20, 16);
    let params = SolverParams::default();
    let eps = params.position_epsilon;
    let mut state = state_with_grid(w, h, 200, params);
    random_scene(&mut state, 200, 3, 1.0e4);

    let forces = GridForces::gravity(Vec2::new(50.0, -300.0));
    for _ in 0..5 {
        state.step(&forces).unwrap();
        for particle in state.active_particles() {
            assert!(particle.is_finite());
            let p = particle.position;
            assert!(p.x >= 1.0 + eps && p.x <= w as f32 - 1.0 - eps, "x = {}", p.x);
            assert!(p.y >= 1.0 + eps && p.y <= h as f32 - 1.0 - eps, "y = {}", p.y);
        }
    }
}

#[test]
fn aeration_stays_in_unit_interval() {
    let mut state = state_with_grid(24, 24, 400, SolverParams::default());
    random_scene(&mut state, 400, 5, 0.8);
    let forces = GridForces::gravity(Vec2::new(0.0, -0.2)).with_pointer(PointerInteraction::new(
        Vec2::new(12.0, 12.0),
        Vec2::new(1.5, -0.7),
        4.0,
    ));

    for _ in 0..20 {
        state.p2g().unwrap();
        assert!(state.active_particles().iter().all(|p| (0.0..=1.0).contains(&p.aeration)));
        assert!(state.cells().iter().all(|c| (0.0..=1.0).contains(&c.aeration)));
        state.update_grid(&forces).unwrap();
        state.g2p().unwrap();
        assert!(state.active_particles().iter().all(|p| (0.0..=1.0).contains(&p.aeration)));
    }
}

#[test]
fn static_scene_does_not_move() {
    let mut state = state_with_grid(16, 16, 100, SolverParams::default());
    // one particle per cell, below rest density, so no pressure
    for x in 3..13 {
        for y in 3..13 {
            state
                .spawn_particle(Vec2::new(x as f32 + 0.5, y as f32 + 0.5), Vec2::ZERO)
                .unwrap();
        }
    }
    let before: Vec<Vec2> = state.active_particles().iter().map(|p| p.position).collect();

    run_frames(&mut state, &GridForces::gravity(Vec2::ZERO), 3);

    for (particle, start) in state.active_particles().iter().zip(before) {
        assert_eq!(particle.position, start);
        assert_eq!(particle.velocity, Vec2::ZERO);
        assert_eq!(particle.aeration, 0.0);
    }
}

#[test]
fn fluid_at_rest_density_does_not_move() {
    let mut state = state_with_grid(16, 16, 784, SolverParams::default());
    water_block(&mut state, 1, 1, 15, 15);
    assert_eq!(state.particle_count(), 784);
    let before: Vec<Vec2> = state.active_particles().iter().map(|p| p.position).collect();

    state.step(&GridForces::gravity(Vec2::ZERO)).unwrap();

    let max_density = state
        .active_particles()
        .iter()
        .map(|p| p.density)
        .fold(0.0, f32::max);
    assert!((max_density - state.solver_params().rest_density).abs() < 1e-4);
    for (particle, start) in state.active_particles().iter().zip(before) {
        assert_eq!(particle.position, start);
    }
}

#[test]
fn batch_width_does_not_change_results() {
    let run = |width: usize| {
        let params = SolverParams::default().with_batch_width(width);
        let mut state = state_with_grid(20, 20, 203, params);
        random_scene(&mut state, 203, 42, 0.5);
        let forces = GridForces::gravity(Vec2::new(0.0, -0.05)).with_pointer(
            PointerInteraction::new(Vec2::new(8.0, 9.0), Vec2::new(0.3, 0.1), 3.0),
        );
        run_frames(&mut state, &forces, 10);
        (state.active_particles().to_vec(), state.cells().to_vec())
    };

    let (scalar_particles, scalar_cells) = run(1);
    for width in [4, 8, 16] {
        let (particles, cells) = run(width);
        assert_eq!(particles, scalar_particles, "width {width}");
        assert_eq!(cells, scalar_cells, "width {width}");
    }
}

#[test]
fn padding_lanes_contribute_no_mass() {
    // 5 particles with width 4 leave three padding lanes
    let mut state = state_with_grid(10, 10, 5, SolverParams::default().with_batch_width(4));
    for i in 0..5 {
        state
            .spawn_particle(Vec2::new(3.0 + i as f32, 5.0), Vec2::ZERO)
            .unwrap();
    }
    state.p2g().unwrap();
    let cache = state.particle_set().transfer_cache();
    assert_eq!(cache.len(), 8);
    assert!(cache[5..].iter().all(ParticleTransferCache::is_inert));

    let mut reference = state_with_grid(10, 10, 5, SolverParams::default().with_batch_width(1));
    for particle in state.active_particles() {
        reference.add_particle(Particle::new(particle.position)).unwrap();
    }
    reference.p2g().unwrap();
    assert_eq!(state.grid().total_mass(), reference.grid().total_mass());
}

#[test]
fn resting_block_interior_does_not_foam_while_falling() {
    let mut state = state_with_grid(24, 24, 1024, SolverParams::default());
    water_block(&mut state, 4, 4, 20, 20);
    let centre = state
        .active_particles()
        .iter()
        .position(|p| p.position == Vec2::new(11.75, 11.75))
        .unwrap();

    state.step(&GridForces::gravity(Vec2::new(0.0, -0.05))).unwrap();

    let particle = state.active_particles()[centre];
    assert!(particle.density > 0.7 * state.solver_params().rest_density);
    assert_eq!(particle.aeration, 0.0);
    assert!(particle.velocity.y < 0.0);
}
