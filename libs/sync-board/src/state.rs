use entity::prelude::*;

/// Local copy of one `todos` row.
///
/// `row_exists` is only set after a select returned the row or an insert
/// succeeded. The placeholder built for a missing row does not count.
#[derive(Debug, Default, PartialEq, Clone)]
pub struct BoardListState {
    todo: Option<TodoEntity>,
    row_exists: bool,
}

impl BoardListState {
    pub fn reconcile(&mut self, id: i64, rows: Vec<TodoEntity>) {
        match rows.into_iter().next() {
            Some(todo) => {
                self.todo = Some(todo);
                self.row_exists = true;
            }
            None => {
                self.todo = Some(TodoEntity::placeholder(id));
                self.row_exists = false;
            }
        }
    }

    /// Applies page header fields to the local copy only.
    pub fn apply_locally(&mut self, patch: &TodoPatch) {
        let Some(todo) = self.todo.as_mut() else {
            return;
        };
        if let Some(title) = &patch.title {
            todo.title = Some(title.clone());
        }
        if let Some(start_date) = &patch.start_date {
            todo.start_date = Some(start_date.clone());
        }
        if let Some(end_date) = &patch.end_date {
            todo.end_date = Some(end_date.clone());
        }
    }

    pub fn mark_exists(&mut self) {
        self.row_exists = true;
    }

    pub fn todo(&self) -> Option<&TodoEntity> {
        self.todo.as_ref()
    }

    pub fn is_loaded(&self) -> bool {
        self.todo.is_some()
    }

    pub fn row_exists(&self) -> bool {
        self.row_exists
    }

    pub fn boards(&self) -> &[BoardEntity] {
        self.todo.as_ref().map(|t| t.boards()).unwrap_or_default()
    }

    pub fn progress(&self) -> Progress {
        self.todo
            .as_ref()
            .map(|t| t.progress())
            .unwrap_or_default()
    }

    pub fn with_appended(&self, board: BoardEntity) -> Vec<BoardEntity> {
        let mut boards = self.boards().to_vec();
        boards.push(board);
        boards
    }

    pub fn with_updated(
        &self,
        board_id: &str,
        patch: BoardPatch,
    ) -> Option<Vec<BoardEntity>> {
        let mut boards = self.boards().to_vec();
        boards
            .iter_mut()
            .find(|b| b.board_id.matches(board_id))?
            .apply(patch);
        Some(boards)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn todo_with(boards: Vec<BoardEntity>) -> TodoEntity {
        TodoEntity {
            id: 1,
            content: Some(boards),
            ..Default::default()
        }
    }

    #[test]
    fn test_reconcile_found_row() {
        // Arrange
        let mut state = BoardListState::default();

        // Act
        state.reconcile(1, vec![todo_with(vec![BoardEntity::new()])]);

        // Assert
        assert!(state.is_loaded());
        assert!(state.row_exists());
        assert_eq!(state.boards().len(), 1);
    }

    #[test]
    fn test_reconcile_missing_row_uses_placeholder() {
        // Arrange
        let mut state = BoardListState::default();

        // Act
        state.reconcile(42, vec![]);

        // Assert
        let todo = state.todo().unwrap();
        assert_eq!(todo.id, 42);
        assert_eq!(todo.title.as_deref(), Some(""));
        assert_eq!(todo.content, Some(vec![]));
        assert!(!state.row_exists());
    }

    #[test]
    fn test_unloaded_state_has_no_boards() {
        // Arrange
        let state = BoardListState::default();

        // Assert
        assert!(!state.is_loaded());
        assert!(state.boards().is_empty());
        assert_eq!(state.progress().total, 0);
    }

    #[test]
    fn test_with_appended_copies() {
        // Arrange
        let mut state = BoardListState::default();
        state.reconcile(1, vec![todo_with(vec![BoardEntity::new()])]);

        // Act
        let boards = state.with_appended(BoardEntity::new());

        // Assert
        assert_eq!(boards.len(), 2);
        assert_eq!(state.boards().len(), 1);
    }

    #[test]
    fn test_with_appended_on_null_content() {
        // Arrange
        let mut state = BoardListState::default();
        state.reconcile(
            1,
            vec![TodoEntity {
                id: 1,
                content: None,
                ..Default::default()
            }],
        );

        // Act
        let boards = state.with_appended(BoardEntity::new());

        // Assert
        assert_eq!(boards.len(), 1);
    }

    #[test]
    fn test_apply_locally() {
        // Arrange
        let mut state = BoardListState::default();
        state.reconcile(42, vec![]);

        // Act
        state.apply_locally(&TodoPatch {
            title: Some("Sprint".to_string()),
            ..Default::default()
        });

        // Assert
        let todo = state.todo().unwrap();
        assert_eq!(todo.title(), "Sprint");
        assert!(todo.start_date.is_some());
        assert!(!state.row_exists());
    }

    #[test]
    fn test_with_updated() {
        // Arrange
        let board = BoardEntity {
            board_id: BoardId::Text("b1".to_string()),
            ..BoardEntity::new()
        };
        let mut state = BoardListState::default();
        state.reconcile(1, vec![todo_with(vec![board])]);

        // Act
        let hit = state.with_updated(
            "b1",
            BoardPatch {
                is_completed: Some(true),
                ..Default::default()
            },
        );
        let miss = state.with_updated("nope", BoardPatch::default());

        // Assert
        assert!(hit.unwrap()[0].is_completed);
        assert!(!state.boards()[0].is_completed);
        assert!(miss.is_none());
    }
}
