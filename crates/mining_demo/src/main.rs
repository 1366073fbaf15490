//! Headless laser-mining demo
//!
//! Builds a random asteroid field in the in-memory scene and flies a ship
//! through it on autopilot, mining whatever comes into range.
//!
//! ```text
//! mining_demo [config.toml|config.ron] [seed]
//! ```
//!
//! Set `RUST_LOG=debug` to see every state transition.

use rand::{rngs::StdRng, Rng, SeedableRng};
use ship_behaviors::foundation::logging;
use ship_behaviors::prelude::*;

const FRAME_RATE: f32 = 60.0;
const RUN_SECONDS: f32 = 90.0;
const ASTEROID_COUNT: usize = 14;
const CARGO_CAPACITY: f32 = 40.0;
const CRUISE_SPEED: f32 = 4.0;
const FIRE_INTERVAL: u64 = 120;
const DEFAULT_SEED: u64 = 7;

const RESOURCES: [ResourceType; 3] = [ResourceType::Ore, ResourceType::Ice, ResourceType::Crystal];

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    let mut args = std::env::args().skip(1);
    let config = match args.next() {
        Some(path) => {
            log::info!("Loading runtime config from {}", path);
            RuntimeConfig::load_from_file(&path)?
        }
        None => RuntimeConfig::default(),
    };
    let seed = match args.next() {
        Some(seed) => seed.parse()?,
        None => DEFAULT_SEED,
    };

    run(&config, seed);
    Ok(())
}

fn spawn_field(scene: &mut SimScene, rng: &mut StdRng) {
    for _ in 0..ASTEROID_COUNT {
        let position = Vec3::new(
            rng.gen_range(-30.0..30.0),
            rng.gen_range(-8.0..8.0),
            rng.gen_range(-120.0..-12.0),
        );
        let resource = RESOURCES[rng.gen_range(0..RESOURCES.len())];
        let rock = Harvestable::new(resource, rng.gen_range(2.0_f32..5.0).round());
        scene.insert(SimEntity::asteroid(
            Transform::from_position(position),
            rng.gen_range(1.0..3.0),
            rock,
        ));
    }
    log::info!("Spawned {} asteroids", ASTEROID_COUNT);
}

fn autopilot(
    scene: &SimScene,
    ship: Entity,
    harvester: &HarvestingStateMachine,
    frame: u64,
) -> ShipInput {
    if harvester.state() != HarvestState::Idle {
        return ShipInput::default();
    }

    let speed = scene.linear_velocity(ship).map_or(0.0, |v| v.magnitude());
    let yaw = if (frame / 600) % 2 == 0 { 0.15 } else { -0.15 };
    ShipInput {
        thrust: if speed < CRUISE_SPEED { 1.0 } else { 0.0 },
        rotation: Vec3::new(0.0, yaw, 0.0),
    }
}

fn run(config: &RuntimeConfig, seed: u64) {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut scene = SimScene::new();
    spawn_field(&mut scene, &mut rng);

    let ship = scene.insert(
        SimEntity::new(Transform::identity())
            .with_rigid_body(1.0)
            .with_collider(1.0, CollisionLayers::PLAYER),
    );
    let camera = scene.insert(SimEntity::new(Transform::identity()));

    let mut movement = MovementController::new(ship, config.movement.clone());
    let mut harvester = HarvestingStateMachine::new(ship, config.harvesting.clone())
        .with_pickup_config(config.pickup.clone())
        .with_inventory(Box::new(CargoHold::new(CARGO_CAPACITY)));
    let mut follow = CameraFollowController::new(Some(camera), Some(ship), config.camera.clone());
    let mut collector = PickupCollector::new();
    let mut projectiles = ProjectileSet::new(config.projectile.clone(), config.pickup.clone());

    follow.initialize_camera(&mut scene);

    let dt = 1.0 / FRAME_RATE;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let frames = (RUN_SECONDS * FRAME_RATE) as u64;
    let mut last_state = harvester.state();
    let mut destroyed = 0_usize;

    for frame in 0..frames {
        if harvester.can_activate() {
            harvester.activate(&mut scene);
        }

        let input = autopilot(&scene, ship, &harvester, frame);
        movement.apply_input(&mut scene, &input, dt);

        if frame % FIRE_INTERVAL == 0 {
            if let Some(transform) = scene.transform(ship) {
                projectiles.fire(scene.now(), transform.position, transform.forward(), Some(ship));
            }
        }
        for outcome in projectiles.update(&mut scene, dt) {
            if let HitOutcome::Destroyed { .. } = outcome {
                destroyed += 1;
            }
        }

        scene.step(dt);
        harvester.update(&mut scene, dt);

        if let Some(inventory) = harvester.inventory_mut() {
            collector.update(&mut scene, ship, inventory);
        }
        follow.update(&mut scene, dt);

        if harvester.state() != last_state {
            log::info!(
                "[{:>6.2}s] harvester {} -> {}",
                scene.now(),
                last_state.name(),
                harvester.state().name()
            );
            last_state = harvester.state();
        }
    }

    log::info!(
        "Finished after {:.1}s, {} asteroids left, {} destroyed by projectiles",
        scene.now(),
        scene.tagged(tags::HARVESTABLE).len(),
        destroyed
    );
    if let Some(inventory) = harvester.inventory() {
        for resource in RESOURCES {
            log::info!("  {:<8} {:.2}", resource.name(), inventory.amount_of(resource));
        }
        log::info!(
            "  cargo    {:.2} / {:.2}",
            inventory.current_load(),
            inventory.max_capacity()
        );
    }
}
