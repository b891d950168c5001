pub mod controllers;
pub mod dto;
pub mod middleware;
pub mod router;

pub use router::build_router;
