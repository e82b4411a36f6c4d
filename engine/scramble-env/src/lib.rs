//! # scramble_env - Environment scramble animation
//!
//! Drives a hierarchy of scene objects between their rest poses and randomly
//! drawn target poses with a shared control state machine:
//!
//! ```text
//!  NONE ──request──▶ SCRAMBLE ──all nodes done──▶ STOP
//!   ▲                                             │
//!   └────all nodes done──── REVERT ◀──request─────┘
//! ```
//!
//! The host owns the scene graph and talks to the engine through
//! [`SceneAdapter`]. [`MemoryScene`] is a ready-made adapter backed by an
//! in-memory object tree.
//!
//! ## Example
//!
//! ```
//! use glam::Vec3;
//! use scramble_env::{ControlState, Manager, MemoryScene, Pose, SceneAdapter, ScrambleConfig};
//!
//! let mut scene = MemoryScene::new("environment");
//! let root = scene.root();
//! scene.spawn(root, "crate", Pose::IDENTITY.with_position(Vec3::X))?;
//!
//! let config = ScrambleConfig::default().with_travel_time(1.0).with_seed(7);
//! let mut manager = Manager::enable(config, &mut scene)?;
//! manager.request_state(&mut scene, ControlState::Scramble)?;
//!
//! while manager.state() == ControlState::Scramble {
//!     manager.tick(&mut scene, 0.02)?;
//! }
//! assert_eq!(manager.state(), ControlState::Stop);
//! # Ok::<(), scramble_env::ScrambleError>(())
//! ```

#![cfg_attr(docsrs, feature(doc_cfg))]
#![warn(
    missing_docs,
    missing_debug_implementations,
    rust_2018_idioms,
    unreachable_pub
)]

pub mod adapter;
pub mod config;
pub mod error;
pub mod ids;
pub mod manager;
pub mod node;
pub mod preview;
pub mod scene;
pub mod state;

pub use adapter::SceneAdapter;
pub use config::ScrambleConfig;
pub use error::{Result, ScrambleError};
pub use ids::{ManagerId, NodeId, ObjectId};
pub use manager::{COMPLETION_EPSILON, Manager, TickReport};
pub use node::Node;
pub use preview::ScrubPreview;
pub use scramble_pose::{Pose, RotationBlend, ScalarRange};
pub use scene::MemoryScene;
pub use state::{ControlState, MoveKind};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
