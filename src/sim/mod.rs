//! Level simulation
//!
//! Everything that runs inside a level lives here. Physics, contact
//! detection and history bookkeeping are external collaborators reached
//! through the traits in `body`, `contact` and `history`; the level logic is
//! single-threaded and runs once per frame.

pub mod ball;
pub mod body;
pub mod contact;
pub mod entities;
pub mod error;
pub mod events;
pub mod history;
pub mod overlay;
pub mod registry;
pub mod session;

pub use ball::{Ball, BallMode};
pub use body::{Body, BodyDesc, BodyId, BodyType, PhysicsWorld, SimpleWorld};
pub use contact::{ContactKind, ContactListener, ContactReport};
pub use entities::{
    Arrow, BlackHole, Boundaries, Fan, GumCloud, Key, Laser, Magnet, Placement, Portal,
    PortalMode, Teleporter, Wall,
};
pub use error::LevelError;
pub use events::{LevelContext, LevelEvents};
pub use history::{BodyHistory, WallsHistory};
pub use overlay::{CompletionChoice, FrameInput, LevelComplete, OverlayState};
pub use registry::{EntityHandle, EntityKind, EntityRegistry};
pub use session::LevelSession;
