//! Historic HRL experiments viewer.
//!
//! Loads experiment metadata (`Name`, `Key`, `Pr_p`, `Da`) and one data file
//! per experiment, normalizes `Ra_D` and `Nu` by the particle Prandtl number,
//! and plots the result on log-log axes colored by Darcy number with one
//! marker shape per author.

pub mod app;
pub mod color;
pub mod config;
pub mod data;
pub mod error;
pub mod export;
pub mod figure;
pub mod state;
pub mod ui;
