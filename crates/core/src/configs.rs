//! Configuration parsing for the runner

pub mod runner;
