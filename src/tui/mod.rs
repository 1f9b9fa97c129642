pub mod app;
pub mod components;
mod input;
pub mod manager;
pub mod message;
pub mod mode;
pub mod render;
pub mod theme;

pub use app::{App, run};
pub use manager::TaskManager;
