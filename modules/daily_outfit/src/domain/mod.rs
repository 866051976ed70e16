pub mod cache;
pub mod error;
pub mod guard;
pub mod hydrator;
pub mod ports;
pub mod repo;
pub mod resolver;
pub mod service;
pub mod tiers;
