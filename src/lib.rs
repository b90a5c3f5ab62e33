//! Notebook server: folders and notes behind a REST mutation layer, plus the
//! client-side explorer, editor, search and sidebar models that drive it.

pub mod client;
pub mod config;
pub mod dto;
pub mod editor;
pub mod error;
pub mod explorer;
pub mod feedback;
pub mod handlers;
pub mod invalidation;
pub mod models;
pub mod mutation;
pub mod repository;
pub mod router;
pub mod search;
pub mod service;
pub mod sidebar;
