pub mod health;
pub mod projects;
pub mod rpc;
pub mod tickets;
