//! `vanet-core` — foundational types for the vanet simulation workspace.
//!
//! This crate is a dependency of every other `vanet-*` crate.  It
//! intentionally has no `vanet-*` dependencies and minimal external ones
//! (only `rand` and `thiserror`, plus optional `serde`).
//!
//! # What lives here
//!
//! | Module      | Contents                                              |
//! |-------------|-------------------------------------------------------|
//! | [`ids`]     | `NodeId`, `MessageId`                                 |
//! | [`geom`]    | `Point2`, `Rect`, segment/rectangle predicates        |
//! | [`time`]    | `Tick`, `SimClock`                                    |
//! | [`rng`]     | `SimRng` — the single seeded stream per simulation    |
//! | [`message`] | `Message`, `MessageKind` traffic classes              |
//! | [`mode`]    | `RoutingMode` — learned vs. baseline weighting        |
//! | [`error`]   | `VanetError`, `VanetResult`                           |
//!
//! # Feature flags
//!
//! | Flag    | Effect                                                     |
//! |---------|------------------------------------------------------------|
//! | `serde` | Adds `Serialize`/`Deserialize` to all public types.        |

pub mod error;
pub mod geom;
pub mod ids;
pub mod message;
pub mod mode;
pub mod rng;
pub mod time;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use error::{VanetError, VanetResult};
pub use geom::{Point2, Rect};
pub use ids::{MessageId, NodeId};
pub use message::{Message, MessageKind};
pub use mode::RoutingMode;
pub use rng::SimRng;
pub use time::{SimClock, Tick};
