//! Rampart: live-world snapshots for a tower-defense session.
//!
//! `game` holds the live simulation objects, `save` turns them into a JSON
//! snapshot on disk and rebuilds the world from one.

pub mod bounds;
pub mod config;
pub mod game;
pub mod geometry;
pub mod path;
pub mod save;
pub mod stats;
