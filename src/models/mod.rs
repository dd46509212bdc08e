pub mod config;
pub mod patch;
pub mod work_item;

pub use config::*;
pub use patch::*;
pub use work_item::*;
