//! Laser beam visual shown while mining

use crate::foundation::math::{look_rotation, Transform, Vec3};
use crate::scene::{Entity, SceneContext, SpawnDesc};

/// Lazily spawned beam stretched between the ship and its target
///
/// The visual is a unit-length mesh along -Z; `align` places it at the
/// midpoint of the span and stretches its Z scale to the span length.
#[derive(Debug, Clone, Default)]
pub struct LaserBeam {
    entity: Option<Entity>,
    visible: bool,
}

impl LaserBeam {
    /// Create a beam with no visual spawned yet
    pub fn new() -> Self {
        Self::default()
    }

    /// The visual entity, once spawned
    pub fn entity(&self) -> Option<Entity> {
        self.entity
    }

    /// Whether the beam is currently shown
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Show the beam, spawning the visual on first use
    pub fn show<S: SceneContext + ?Sized>(&mut self, scene: &mut S) -> bool {
        let live = self
            .entity
            .filter(|&entity| scene.transform(entity).is_some());

        let entity = match live {
            Some(entity) => entity,
            None => match scene.spawn(SpawnDesc::LaserBeam, Transform::identity()) {
                Some(entity) => {
                    log::debug!("Spawned laser beam visual {:?}", entity);
                    self.entity = Some(entity);
                    entity
                }
                None => {
                    log::warn!("Scene refused to spawn the laser beam visual");
                    self.entity = None;
                    self.visible = false;
                    return false;
                }
            },
        };

        self.visible = scene.set_visible(entity, true);
        self.visible
    }

    /// Hide the beam; never spawns anything
    pub fn hide<S: SceneContext + ?Sized>(&mut self, scene: &mut S) {
        if let Some(entity) = self.entity {
            scene.set_visible(entity, false);
        }
        self.visible = false;
    }

    /// Stretch the visible beam from `from` to `to`
    pub fn align<S: SceneContext + ?Sized>(&self, scene: &mut S, from: Vec3, to: Vec3) -> bool {
        let Some(entity) = self.entity.filter(|_| self.visible) else {
            return false;
        };

        let span = to - from;
        let length = span.magnitude();
        if length <= f32::EPSILON || !length.is_finite() {
            return false;
        }

        let transform = Transform {
            position: from + span * 0.5,
            rotation: look_rotation(&span),
            scale: Vec3::new(1.0, 1.0, length),
        };
        scene.set_transform(entity, transform)
    }
}
