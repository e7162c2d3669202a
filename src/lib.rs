pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod models;
pub mod repository;
pub mod seed;
pub mod service;
