use entity::prelude::*;
use repository::Repository;
use serde::Serialize;
use tracing::{debug, error, info};

use crate::{route, Notice, Outcome};

const CREATED: &str = "Successfully saved!";

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NavState {
    #[default]
    Unloaded,
    Loaded,
    /// A mutation succeeded and the list has not been refetched yet.
    Stale,
    Reloaded,
}

#[derive(Debug, PartialEq, Eq, Clone, Serialize)]
pub struct NavEntry {
    pub id: i64,
    pub title: String,
    pub marker: StatusMarker,
    pub route: String,
}

impl From<&TodoEntity> for NavEntry {
    fn from(todo: &TodoEntity) -> Self {
        Self {
            id: todo.id,
            title: todo.title().to_string(),
            marker: todo.marker(),
            route: route::page(todo.id),
        }
    }
}

/// Side list of every page. Loads once when asked and refreshes only
/// after its own mutations.
#[derive(Debug)]
pub struct NavigationList {
    repo: Repository,
    todos: Vec<TodoEntity>,
    state: NavState,
    notices: Vec<Notice>,
}

impl NavigationList {
    pub fn new(repo: Repository) -> Self {
        Self {
            repo,
            todos: vec![],
            state: NavState::default(),
            notices: vec![],
        }
    }

    pub fn state(&self) -> NavState {
        self.state
    }

    pub fn drain_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub async fn load_all(&mut self) -> Outcome {
        let response = self.repo.todo.find_all().await;

        if let Some(e) = response.error {
            error!(task = "load todos", err = e.to_string());
            self.notices.push(Notice::error(&e.message));
            return Outcome::Failed;
        }

        self.todos = response.data.unwrap_or_default();
        self.state = match self.state {
            NavState::Unloaded => NavState::Loaded,
            _ => NavState::Reloaded,
        };
        debug!(task = "load todos", count = self.todos.len());

        Outcome::Loaded
    }

    pub async fn create_blank(&mut self) -> Outcome {
        let response = self.repo.todo.insert(&NewTodo::blank()).await;

        if let Some(e) = response.error {
            error!(task = "create todo", err = e.to_string());
            self.notices.push(Notice::error(&e.message));
            return Outcome::Failed;
        }

        if response.status != 201 {
            debug!(task = "create todo", status = response.status);
            return Outcome::Ignored {
                status: response.status,
            };
        }

        let route = response
            .data
            .as_deref()
            .and_then(|rows| rows.first())
            .map(|todo| route::page(todo.id))
            .unwrap_or_else(|| route::CREATE.to_string());
        info!(task = "create todo", route = %route);

        self.notices.push(Notice::success(CREATED));
        self.state = NavState::Stale;
        self.load_all().await;

        Outcome::Created { route }
    }

    pub fn entries(&self) -> Vec<NavEntry> {
        self.todos.iter().map(NavEntry::from).collect()
    }

    /// Case-insensitive title match over the loaded rows.
    pub fn search(&self, query: &str) -> Vec<NavEntry> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.entries();
        }

        self.todos
            .iter()
            .filter(|todo| todo.title().to_lowercase().contains(&query))
            .map(NavEntry::from)
            .collect()
    }
}
