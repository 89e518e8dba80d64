//! Command-line client for the `db.transport.rest` transit API.
//!
//! Looks up stations, shows a live-refreshing departure board for one
//! station, and lists journeys between two stations, all as console tables.

pub mod api;
pub mod board;
pub mod console;
pub mod live;
pub mod navigator;
