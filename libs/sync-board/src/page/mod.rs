use entity::prelude::*;
use repository::{Repository, StoreResponse};
use tracing::{debug, error, info};

use crate::{state::BoardListState, Notice, Outcome};

const LOAD_FAILED: &str = "Failed to get data";
const BOARDS_SAVED: &str = "Boards saved successfully";
const BOARDS_FAILED: &str = "Failed to save boards";
const PAGE_SAVED: &str = "Page saved successfully";
const PAGE_FAILED: &str = "Failed to save page";
const BOARD_INCOMPLETE: &str = "Please enter a title and content!";
const BOARD_NOT_FOUND: &str = "Board not found";

/// Drives the `/create/{id}` page: loads one row and writes its board
/// sequence back after every change.
#[derive(Debug)]
pub struct PageController {
    repo: Repository,
    id: i64,
    state: BoardListState,
    held: TodoPatch,
    notices: Vec<Notice>,
}

impl PageController {
    pub fn new(repo: Repository, id: i64) -> Self {
        Self {
            repo,
            id,
            state: BoardListState::default(),
            held: TodoPatch::default(),
            notices: vec![],
        }
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn state(&self) -> &BoardListState {
        &self.state
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    #[tracing::instrument(skip(self), fields(id = self.id))]
    pub async fn load_page(&mut self) -> Outcome {
        let response = self.repo.todo.find_by_id(self.id).await;

        if let Some(e) = response.error {
            error!(task = "load page", err = e.to_string());
            self.notices.push(Notice::error(LOAD_FAILED));
            return Outcome::Failed;
        }

        if response.status != 200 {
            debug!(task = "load page", status = response.status);
            return Outcome::Ignored {
                status: response.status,
            };
        }

        self.state
            .reconcile(self.id, response.data.unwrap_or_default());

        Outcome::Loaded
    }

    #[tracing::instrument(skip(self), fields(id = self.id))]
    pub async fn append_board(&mut self) -> Outcome {
        if !self.state.is_loaded() {
            return Outcome::Unloaded;
        }

        let board = BoardEntity::new();
        info!(task = "append board", board_id = %board.board_id);

        let boards = self.state.with_appended(board);
        self.persist(boards).await
    }

    #[tracing::instrument(skip(self, patch), fields(id = self.id))]
    pub async fn save_board(
        &mut self,
        board_id: &str,
        patch: BoardPatch,
    ) -> Outcome {
        if !self.state.is_loaded() {
            return Outcome::Unloaded;
        }

        let Some(boards) = self.state.with_updated(board_id, patch) else {
            self.notices.push(Notice::error(BOARD_NOT_FOUND));
            return Outcome::Rejected;
        };

        let incomplete = boards
            .iter()
            .find(|b| b.board_id.matches(board_id))
            .is_some_and(|b| b.title.is_empty() || b.content.is_empty());
        if incomplete {
            self.notices.push(Notice::error(BOARD_INCOMPLETE));
            return Outcome::Rejected;
        }

        self.persist(boards).await
    }

    pub async fn rename(&mut self, title: &str) -> Outcome {
        if !self.state.is_loaded() {
            return Outcome::Unloaded;
        }

        let patch = TodoPatch {
            title: Some(title.to_string()),
            ..Default::default()
        };
        self.write_header(patch).await
    }

    pub async fn set_date_range(&mut self, start: &str, end: &str) -> Outcome {
        if !self.state.is_loaded() {
            return Outcome::Unloaded;
        }

        let patch = TodoPatch {
            start_date: Some(start.to_string()),
            end_date: Some(end.to_string()),
            ..Default::default()
        };
        self.write_header(patch).await
    }

    // A page without a row is not written until its first board is.
    async fn write_header(&mut self, patch: TodoPatch) -> Outcome {
        if self.state.row_exists() {
            return self.write(patch, PAGE_SAVED, PAGE_FAILED).await;
        }

        debug!(task = "hold page header", id = self.id);
        self.state.apply_locally(&patch);
        self.held = patch.or(std::mem::take(&mut self.held));

        Outcome::Pending
    }

    /// Overwrites the whole `content` column with `boards`.
    pub async fn persist(&mut self, boards: Vec<BoardEntity>) -> Outcome {
        self.write(TodoPatch::boards(boards), BOARDS_SAVED, BOARDS_FAILED)
            .await
    }

    async fn write(
        &mut self,
        patch: TodoPatch,
        saved: &str,
        failed: &str,
    ) -> Outcome {
        let inserting = !self.state.row_exists();

        let response = if inserting {
            let patch = patch.or(self.held.clone());
            let todo = NewTodo::from_patch(self.id, patch);
            self.repo.todo.insert(&todo).await
        } else {
            self.repo.todo.update(self.id, &patch).await
        };

        if !self.settle(&response, inserting, failed) {
            return match response.error {
                Some(_) => Outcome::Failed,
                None => Outcome::Ignored {
                    status: response.status,
                },
            };
        }

        self.notices.push(Notice::success(saved));
        if inserting {
            self.state.mark_exists();
            self.held = TodoPatch::default();
        }

        self.load_page().await;

        Outcome::Saved
    }

    fn settle(
        &mut self,
        response: &StoreResponse<Vec<TodoEntity>>,
        inserting: bool,
        failed: &str,
    ) -> bool {
        if let Some(e) = &response.error {
            error!(
                task = "persist",
                id = self.id,
                inserting,
                status = response.status,
                err = e.to_string(),
            );
            self.notices.push(Notice::error(failed));
            return false;
        }

        let expected = if inserting {
            response.status == 201
        } else {
            response.status == 200 || response.status == 204
        };

        if !expected {
            debug!(
                task = "persist",
                id = self.id,
                inserting,
                status = response.status,
            );
        }

        expected
    }
}
