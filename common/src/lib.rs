#![allow(clippy::too_many_arguments)]

pub mod api;
pub mod config;
pub mod crypto;
pub mod fee;
pub mod genesis;
pub mod serializer;
pub mod service;
pub mod transaction;
