//! Subway network server.
//!
//! A small backend for stations, lines and the ordered sections that make
//! up each line. A line only ever grows or shrinks at its terminus.

pub mod config;
pub mod domain;
pub mod store;
pub mod web;
