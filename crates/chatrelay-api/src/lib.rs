pub mod error;
pub mod handlers;
pub mod queue;
pub mod settings;
pub mod state;
