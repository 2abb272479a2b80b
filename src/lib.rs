pub mod api;
pub mod fetch;
pub mod infra;
pub mod meta;
pub mod nearby;
pub mod payload;
pub mod services;
pub mod signals;
