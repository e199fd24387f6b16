//! Builds a JSON Feed of upcoming movies and shows from tracked TMDB people
//! and companies.

pub mod clock;
pub mod config;
pub mod db;
pub mod error;
pub mod input;
pub mod models;
pub mod services;
