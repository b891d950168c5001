#![allow(dead_code)]
pub mod memory_repository;
pub mod stub_upstream;

pub use memory_repository::*;
pub use stub_upstream::*;
