//! `vanet-net` — the network graph layer.
//!
//! Owns the node model (vehicles and roadside units), the road map they move
//! along, and the per-tick topology rebuild that turns geometry into a
//! directed link graph via `vanet-channel`.
//!
//! | Module       | Contents                                              |
//! |--------------|-------------------------------------------------------|
//! | [`node`]     | `Node`, `NodeKind`, `Application`, relative speed     |
//! | [`link`]     | `Link` — one directed edge's quality triple           |
//! | [`store`]    | `NodeStore` — ordered node map + graph queries        |
//! | [`roads`]    | `Road`, `RoadMap` — alignment and environment lookup  |
//! | [`density`]  | `DensityIndex` — R-tree radius counts over vehicles   |
//! | [`topology`] | `TopologyEngine` — the O(n²) per-tick rebuild         |

pub mod density;
pub mod link;
pub mod node;
pub mod roads;
pub mod store;
pub mod topology;


// ── Re-exports ────────────────────────────────────────────────────────────────

pub use density::DensityIndex;
pub use link::Link;
pub use node::{relative_speed, Application, Node, NodeKind};
pub use roads::{Road, RoadMap};
pub use store::NodeStore;
pub use topology::TopologyEngine;
