//! Application orchestration: state, input handling and the settings model.

pub mod event;
pub mod handler;
pub mod settings;
pub mod state;
