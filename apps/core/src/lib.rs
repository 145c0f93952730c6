pub mod action_executor;
pub mod command_index;
pub mod config;
pub mod contract;
pub mod core_service;
pub mod discovery;
pub mod hotkey;
pub mod logging;
pub mod model;
pub mod overlay_state;
pub mod pins;
pub mod runtime;
pub mod search;
