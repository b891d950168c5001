pub mod project;
pub mod ticket;
pub mod upstream;

pub use project::*;
pub use ticket::*;
pub use upstream::*;
