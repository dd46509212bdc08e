pub mod classify;
pub mod config;
pub mod gateway;
pub mod patch;
pub mod presenter;

pub use classify::*;
pub use config::*;
pub use gateway::*;
pub use patch::*;
pub use presenter::*;
