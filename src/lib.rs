pub mod action;
pub mod cli;
pub mod config;
pub mod constants;
pub mod focus;
pub mod input;
pub mod navigator;
pub mod platform;
pub mod timer;
