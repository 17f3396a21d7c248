pub mod common;
mod config_loading;
mod token_lifecycle;
