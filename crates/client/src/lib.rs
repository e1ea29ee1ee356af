//! Client code for swcache.
//!
//! This crate provides the HTTP network implementation and the offline
//! cache controller that the host drives.

pub mod controller;
pub mod fetch;

pub use controller::{
    ActivateOutcome, CacheController, ControllerConfig, Generations, InstallOutcome, Interception, RequestPolicy,
    classify,
};

pub use fetch::{FetchClient, FetchConfig, UrlError, resolve};
