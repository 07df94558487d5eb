pub mod config;
pub mod database;
pub mod group_service;
pub mod redis;
pub mod repositories;

pub use group_service::GroupService;
