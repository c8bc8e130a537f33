pub mod errors;
pub mod pagination;
pub mod todo;

pub use errors::*;
pub use pagination::*;
pub use todo::*;
