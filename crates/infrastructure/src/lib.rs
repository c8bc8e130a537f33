pub mod postgrest;
pub mod records;
pub mod todo_repository;

pub use postgrest::*;
pub use records::*;
pub use todo_repository::*;
