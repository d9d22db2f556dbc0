use rusqlite::Connection;
use std::sync::{Arc, Mutex};

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod import;
pub mod middleware;
pub mod models;
pub mod reports;
pub mod storage;
pub mod uploads;

pub type DbConnection = Arc<Mutex<Connection>>;
