//! Arena Client - client-side player engine for a multiplayer bomber arena
//!
//! This crate turns key edges into predicted local motion and a minimal
//! stream of intents for the remote authority:
//! - Collision and pickup resolution against the tile map
//! - Walk-cycle sprite animation
//! - Throttled bomb drops and damage ticks
//! - Playback of authoritative updates for remote players

pub mod app;
pub mod config;
pub mod game;
pub mod util;
pub mod ws;
