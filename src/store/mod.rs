//! Persistent bot state.

pub mod files;
pub mod models;

pub use files::StateStore;
pub use models::{AdminChangeError, AdminSet, AiSettings, UserMap, UserRecord};
