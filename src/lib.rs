//! Screener filter: load a table, filter it through dynamically added
//! (column, operator, value) rows and view the matching rows live.
//!
//! The GUI lives in the binary; this library holds everything that can run
//! without a window so it can be tested and used headless.

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod state;
