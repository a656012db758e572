pub mod config;
pub mod events;
pub mod gui;
mod macros;
pub mod menu;
pub mod sys;
