//! Markup production: templates, containers and page rewriting.

pub mod dom;
pub mod page;
pub mod views;
