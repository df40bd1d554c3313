pub mod api;
pub mod config;
pub mod error;
pub mod mock;
pub mod normalize;
pub mod prepare;
pub mod session;
