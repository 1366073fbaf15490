//! Per-frame ship controllers
//!
//! Each controller is bound to its entities at construction and borrows the
//! scene for the duration of a single call. Controllers never call each
//! other; the driver invokes each one once per frame.

pub mod beam;
pub mod camera;
pub mod harvesting;
pub mod movement;

pub use beam::LaserBeam;
pub use camera::CameraFollowController;
pub use harvesting::{HarvestState, HarvestingStateMachine};
pub use movement::{MovementController, ShipInput};
