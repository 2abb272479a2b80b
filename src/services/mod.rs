pub mod signal_api;
