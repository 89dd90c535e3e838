pub mod config;
pub mod consts;
pub mod datum;
pub mod engine;
pub mod error;
pub mod extract;
pub mod filters;
pub mod geometry;
pub mod io;
pub mod loader;
pub mod placeholder;
pub mod pyramid;
pub mod single_flight;
pub mod status;
pub mod ticks;
pub mod viewer;
