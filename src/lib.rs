#![doc = "The `study_tasks` library crate."]
#![doc = ""]
#![doc = "Signup and login with bcrypt-hashed passwords and JWT bearer tokens, plus"]
#![doc = "create/read/update/delete of tasks that are only ever visible to their owner."]
#![doc = "The binary (`main.rs`) loads configuration, builds an `AppState` and serves it."]

pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod tasks;

pub use app::AppState;
pub use error::AppError;
