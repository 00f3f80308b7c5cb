//! Weekly trading card season generator

#![allow(clippy::multiple_crate_versions)]
#![deny(clippy::all)]
#![deny(clippy::await_holding_lock)]
#![deny(clippy::complexity)]
#![deny(clippy::correctness)]
#![deny(clippy::disallowed_methods)]
#![deny(clippy::expect_used)]
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::panic)]
#![deny(clippy::perf)]
#![deny(clippy::trivially_copy_pass_by_ref)]
#![deny(clippy::unreachable)]
#![deny(clippy::unwrap_used)]
#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod acquire;
pub mod cli;
pub mod concepts;
pub mod config;
pub mod constants;
pub mod credentials;
pub mod db;
pub mod error;
pub mod menu;
pub mod pipeline;
pub mod prompt;
pub mod season;
pub mod storage;
