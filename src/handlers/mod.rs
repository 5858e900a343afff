pub mod api;
pub mod context;
pub mod models;
pub mod translate;
