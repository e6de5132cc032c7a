// Water block in a 128x128 box, stirred with the mouse.
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use rand::Rng;
use water2d::{FluidState, GridForces, PointerInteraction, SolverParams, WaterPlugin};

const GRID_SIZE: u32 = 128;
const BLOCK_ORIGIN: Vec2 = Vec2::new(8.0, 8.0);
const BLOCK_WIDTH: u32 = 160;
const BLOCK_HEIGHT: u32 = 200;
const POINTER_RADIUS: f32 = 6.0;

#[derive(Component)]
struct ParticleVisual {
    index: usize,
}

#[derive(Component)]
struct DiagnosticsText;

#[derive(Resource, Default)]
struct PointerTracker {
    last: Option<Vec2>,
}

fn sim_to_world(position: Vec2) -> Vec3 {
    let half = GRID_SIZE as f32 * 0.5;
    Vec3::new((position.x - half) * 5.0, (position.y - half) * 5.0, 0.0)
}

fn world_to_sim(position: Vec2) -> Vec2 {
    let half = GRID_SIZE as f32 * 0.5;
    Vec2::new(position.x / 5.0 + half, position.y / 5.0 + half)
}

fn init_water(
    mut commands: Commands,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
    mut state: ResMut<FluidState>,
) -> Result {
    commands.spawn(Camera2d);

    let mesh = meshes.add(Circle::new(1.2));
    let mut rand = rand::rng();
    for x in 0..BLOCK_WIDTH {
        for y in 0..BLOCK_HEIGHT {
            // rest spacing is half a cell
            let position = BLOCK_ORIGIN + Vec2::new(x as f32, y as f32) * 0.5;
            let velocity = Vec2::new(
                rand.random_range(-0.01..=0.01),
                rand.random_range(-0.01..=0.01),
            );
            let index = state.spawn_particle(position, velocity)?;
            commands.spawn((
                ParticleVisual { index },
                Mesh2d(mesh.clone()),
                MeshMaterial2d(materials.add(Color::hsl(210.0, 0.7, 0.4))),
                Transform::from_translation(sim_to_world(position)),
            ));
        }
    }
    Ok(())
}

fn drive_pointer(
    windows: Query<&Window>,
    camera_query: Query<(&Camera, &GlobalTransform)>,
    mouse: Res<ButtonInput<MouseButton>>,
    mut tracker: ResMut<PointerTracker>,
    mut forces: ResMut<GridForces>,
) {
    forces.pointer = PointerInteraction::NONE;

    let Ok(window) = windows.single() else {
        return;
    };
    let Ok((camera, camera_transform)) = camera_query.single() else {
        return;
    };
    let Some(sim_pos) = window
        .cursor_position()
        .and_then(|cursor| camera.viewport_to_world_2d(camera_transform, cursor).ok())
        .map(world_to_sim)
    else {
        tracker.last = None;
        return;
    };

    let velocity = tracker.last.map_or(Vec2::ZERO, |last| sim_pos - last);
    tracker.last = Some(sim_pos);
    if mouse.pressed(MouseButton::Left) {
        forces.pointer = PointerInteraction::new(sim_pos, velocity, POINTER_RADIUS);
    }
}

fn reset_water(input: Res<ButtonInput<KeyCode>>, mut state: ResMut<FluidState>) -> Result {
    if !input.just_pressed(KeyCode::KeyR) {
        return Ok(());
    }
    let mut rand = rand::rng();
    for particle in state.active_particles_mut() {
        particle.position = Vec2::new(
            rand.random_range(2.0..(GRID_SIZE as f32 - 2.0)),
            rand.random_range(GRID_SIZE as f32 * 0.5..(GRID_SIZE as f32 - 2.0)),
        );
        particle.velocity = Vec2::ZERO;
    }
    state.validate_particles()?;
    Ok(())
}

fn update_particle_visuals(
    state: Res<FluidState>,
    mut query: Query<(&ParticleVisual, &mut Transform, &MeshMaterial2d<ColorMaterial>)>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    let particles = state.active_particles();
    for (visual, mut transform, material) in query.iter_mut() {
        let Some(particle) = particles.get(visual.index) else {
            continue;
        };
        transform.translation = sim_to_world(particle.position);
        if let Some(material) = materials.get_mut(&material.0) {
            let foam = particle.aeration;
            material.color = Color::hsl(210.0, 0.7 * (1.0 - foam), 0.4 + 0.5 * foam);
        }
    }
}

fn setup_diagnostics(mut commands: Commands) {
    commands.spawn((
        Text::default(),
        TextFont {
            font_size: 20.0,
            ..default()
        },
        TextColor(Color::WHITE),
        Node {
            position_type: PositionType::Absolute,
            top: Val::Px(10.0),
            left: Val::Px(10.0),
            ..default()
        },
        DiagnosticsText,
    ));
}

fn update_diagnostics(
    diagnostics: Res<DiagnosticsStore>,
    state: Res<FluidState>,
    mut query: Query<&mut Text, With<DiagnosticsText>>,
) {
    let fps = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
        .unwrap_or(0.0);
    let frame_time = diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FRAME_TIME)
        .and_then(|ft| ft.smoothed())
        .unwrap_or(0.0);

    for mut text in &mut query {
        text.0 = format!(
            "FPS: {:.1}\nFrame: {:.2}ms\nParticles: {}\nR: reset, LMB: stir",
            fps,
            frame_time,
            state.particle_count(),
        );
    }
}

fn main() {
    App::new()
        .add_plugins(DefaultPlugins)
        .add_plugins(FrameTimeDiagnosticsPlugin::default())
        .add_plugins(WaterPlugin {
            grid_size: UVec2::splat(GRID_SIZE),
            particle_capacity: (BLOCK_WIDTH * BLOCK_HEIGHT) as usize,
            cell_capacity: (GRID_SIZE * GRID_SIZE) as usize,
            solver_params: SolverParams::default(),
        })
        .insert_resource(GridForces::gravity(Vec2::new(0.0, -0.01)))
        .init_resource::<PointerTracker>()
        .add_systems(Startup, (init_water, setup_diagnostics))
        .add_systems(PreUpdate, (drive_pointer, reset_water))
        .add_systems(PostUpdate, (update_particle_visuals, update_diagnostics))
        .run();
}
