pub mod backends;
pub mod cli;
pub mod config;
pub mod daemon;
pub mod display;
pub mod overlay;
pub mod playlist;
pub mod runner;
pub mod sources;
pub mod utils;

pub use daemon::LooperError;
pub use runner::Runner;
