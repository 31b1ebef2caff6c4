pub mod board;
pub mod prelude;
pub mod todo;
