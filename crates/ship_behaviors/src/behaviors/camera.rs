//! Chase camera
//!
//! Translation is smoothed toward the desired position; orientation is
//! applied rigidly every frame.

use crate::config::CameraConfig;
use crate::foundation::math::{is_finite_vec, utils, Quat, Transform, Vec3};
use crate::scene::{Entity, SceneContext};

/// Camera controller that follows a target entity
#[derive(Debug, Clone)]
pub struct CameraFollowController {
    camera: Option<Entity>,
    target: Option<Entity>,
    local_offset: Vec3,
    distance: f32,
    reference_distance: f32,
    min_distance: f32,
    max_distance: f32,
    follow_speed: f32,
    offset_rotation: Quat,
}

impl CameraFollowController {
    /// Create a controller
    ///
    /// Inverted distance bounds are swapped and the initial distance is
    /// clamped into them.
    pub fn new(camera: Option<Entity>, target: Option<Entity>, config: CameraConfig) -> Self {
        let (min_distance, max_distance) = if config.min_distance <= config.max_distance {
            (config.min_distance, config.max_distance)
        } else {
            (config.max_distance, config.min_distance)
        };

        Self {
            camera,
            target,
            local_offset: config.local_offset,
            distance: config.distance.max(min_distance).min(max_distance),
            reference_distance: config.reference_distance,
            min_distance,
            max_distance,
            follow_speed: config.follow_speed,
            offset_rotation: config.offset_rotation(),
        }
    }

    /// Camera entity being driven
    pub fn camera(&self) -> Option<Entity> {
        self.camera
    }

    /// Entity being followed
    pub fn target(&self) -> Option<Entity> {
        self.target
    }

    /// Set the camera entity
    pub fn set_camera(&mut self, camera: Option<Entity>) {
        self.camera = camera;
    }

    /// Set the entity to follow
    pub fn set_target(&mut self, target: Option<Entity>) {
        self.target = target;
    }

    /// Current follow distance
    pub fn distance(&self) -> f32 {
        self.distance
    }

    /// Distance bounds as `(min, max)`
    pub fn distance_bounds(&self) -> (f32, f32) {
        (self.min_distance, self.max_distance)
    }

    /// Change the follow distance by `delta`, clamped to the bounds
    pub fn zoom(&mut self, delta: f32) {
        if !delta.is_finite() {
            return;
        }
        self.distance = (self.distance + delta)
            .max(self.min_distance)
            .min(self.max_distance);
    }

    /// Where the camera wants to be this frame
    ///
    /// The local offset is rotated into the target's frame and scaled by
    /// `distance / reference_distance`.
    pub fn desired_position<S: SceneContext + ?Sized>(&self, scene: &S) -> Option<Vec3> {
        let target = scene.transform(self.target?)?;
        Some(target.position + target.rotation * self.local_offset * self.zoom_scale())
    }

    fn zoom_scale(&self) -> f32 {
        if self.reference_distance > 0.0 {
            self.distance / self.reference_distance
        } else {
            1.0
        }
    }

    fn desired_rotation<S: SceneContext + ?Sized>(&self, scene: &S) -> Option<Quat> {
        let target = scene.transform(self.target?)?;
        Some(target.rotation * self.offset_rotation)
    }

    /// Place the camera at its desired pose without smoothing
    pub fn initialize_camera<S: SceneContext + ?Sized>(&mut self, scene: &mut S) -> bool {
        self.place(scene, None)
    }

    /// Follow the target for one frame
    ///
    /// A camera whose position has gone non-finite snaps straight to the
    /// desired position. Returns `false` when there is nothing to drive.
    pub fn update<S: SceneContext + ?Sized>(&mut self, scene: &mut S, dt: f32) -> bool {
        let factor = if dt.is_finite() && dt >= 0.0 {
            (self.follow_speed * dt).clamp(0.0, 1.0)
        } else {
            0.0
        };
        self.place(scene, Some(factor))
    }

    fn place<S: SceneContext + ?Sized>(&self, scene: &mut S, factor: Option<f32>) -> bool {
        let Some(camera) = self.camera else {
            return false;
        };
        let (Some(desired), Some(rotation)) =
            (self.desired_position(&*scene), self.desired_rotation(&*scene))
        else {
            return false;
        };
        let Some(current) = scene.transform(camera) else {
            return false;
        };

        let position = match factor {
            Some(_) if !is_finite_vec(&current.position) => {
                log::warn!("Camera position {:?} is not finite, snapping", current.position);
                desired
            }
            Some(t) => utils::lerp_vec(&current.position, &desired, t),
            None => desired,
        };

        scene.set_transform(
            camera,
            Transform {
                position,
                rotation,
                scale: current.scale,
            },
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::{SimEntity, SimScene};
    use approx::assert_relative_eq;

    fn setup(scene: &mut SimScene) -> (Entity, Entity) {
        let camera = scene.insert(SimEntity::new(Transform::identity()));
        let ship = scene.insert(SimEntity::new(Transform::from_position(Vec3::new(
            10.0, 0.0, 0.0,
        ))));
        (camera, ship)
    }

    #[test]
    fn test_constructor_clamps_and_swaps() {
        let config = CameraConfig {
            distance: 100.0,
            min_distance: 40.0,
            max_distance: 5.0,
            ..CameraConfig::default()
        };
        let controller = CameraFollowController::new(None, None, config);
        assert_eq!(controller.distance_bounds(), (5.0, 40.0));
        assert_eq!(controller.distance(), 40.0);
    }

    #[test]
    fn test_zoom_clamps() {
        let mut controller = CameraFollowController::new(None, None, CameraConfig::default());
        controller.zoom(-1000.0);
        assert_eq!(controller.distance(), 5.0);
        controller.zoom(1000.0);
        assert_eq!(controller.distance(), 50.0);
        controller.zoom(f32::NAN);
        assert_eq!(controller.distance(), 50.0);
    }

    #[test]
    fn test_desired_position_scales_with_distance() {
        let mut scene = SimScene::new();
        let (camera, ship) = setup(&mut scene);
        let mut controller =
            CameraFollowController::new(Some(camera), Some(ship), CameraConfig::default());

        assert_relative_eq!(
            controller.desired_position(&scene).unwrap(),
            Vec3::new(10.0, 4.0, 15.0)
        );

        controller.zoom(-7.5);
        assert_relative_eq!(
            controller.desired_position(&scene).unwrap(),
            Vec3::new(10.0, 2.0, 7.5)
        );
    }

    #[test]
    fn test_initialize_snaps() {
        let mut scene = SimScene::new();
        let (camera, ship) = setup(&mut scene);
        let mut controller =
            CameraFollowController::new(Some(camera), Some(ship), CameraConfig::default());

        assert!(controller.initialize_camera(&mut scene));
        assert_relative_eq!(
            scene.transform(camera).unwrap().position,
            Vec3::new(10.0, 4.0, 15.0)
        );
    }

    #[test]
    fn test_update_lerps_position() {
        let mut scene = SimScene::new();
        let (camera, ship) = setup(&mut scene);
        let mut controller =
            CameraFollowController::new(Some(camera), Some(ship), CameraConfig::default());

        assert!(controller.update(&mut scene, 0.1));
        assert_relative_eq!(
            scene.transform(camera).unwrap().position,
            Vec3::new(5.0, 2.0, 7.5),
            epsilon = 1e-5
        );
    }

    #[test]
    fn test_large_dt_clamps_factor() {
        let mut scene = SimScene::new();
        let (camera, ship) = setup(&mut scene);
        let mut controller =
            CameraFollowController::new(Some(camera), Some(ship), CameraConfig::default());

        controller.update(&mut scene, 10.0);
        assert_relative_eq!(
            scene.transform(camera).unwrap().position,
            Vec3::new(10.0, 4.0, 15.0)
        );
    }

    #[test]
    fn test_invalid_dt_holds_position_but_rotates() {
        let mut scene = SimScene::new();
        let (camera, ship) = setup(&mut scene);
        let mut controller =
            CameraFollowController::new(Some(camera), Some(ship), CameraConfig::default());

        controller.update(&mut scene, f32::NAN);
        let transform = scene.transform(camera).unwrap();
        assert_relative_eq!(transform.position, Vec3::zeros());
        assert_relative_eq!(
            transform.rotation,
            CameraConfig::default().offset_rotation(),
            epsilon = 1e-6
        );
    }

    #[test]
    fn test_missing_handles_noop() {
        let mut scene = SimScene::new();
        let (camera, ship) = setup(&mut scene);

        let mut no_camera = CameraFollowController::new(None, Some(ship), CameraConfig::default());
        assert!(!no_camera.update(&mut scene, 0.016));

        let mut no_target =
            CameraFollowController::new(Some(camera), None, CameraConfig::default());
        assert!(!no_target.update(&mut scene, 0.016));

        scene.despawn(ship);
        let mut stale =
            CameraFollowController::new(Some(camera), Some(ship), CameraConfig::default());
        assert!(!stale.update(&mut scene, 0.016));
        assert_eq!(scene.transform(camera).unwrap(), Transform::identity());
    }
}
