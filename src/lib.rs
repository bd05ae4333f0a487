// src/lib.rs

pub mod config;
pub mod domain;
pub mod error;
pub mod report;
pub mod repository;
pub mod service;
