//! Client-side player simulation modules

pub mod actor;
pub mod animation;
pub mod bonus;
pub mod collision;
pub mod controller;
pub mod input;
pub mod pool;
pub mod remote;
pub mod throttle;
pub mod tuning;

pub use actor::{Actor, ActorView, RenderSurface};
pub use controller::{ControllerState, KeyOutcome, LocalPlayerController, TickOutcome, World};
pub use remote::RemotePlayerView;
pub use tuning::PlayerTuning;
