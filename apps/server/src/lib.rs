pub mod api;
pub mod config;
pub mod error;
mod main_lib;
pub mod scheduler;

pub use main_lib::{
    build_notifier, build_registry, build_resolver, build_state, build_state_with, init_tracing,
    AppState,
};
