pub use crate::board::{BoardContent as BoardEntity, BoardId, BoardPatch};
pub use crate::todo::{
    ContentColumn, NewTodo, Progress, StatusMarker, Todo as TodoEntity,
    TodoPatch,
};
