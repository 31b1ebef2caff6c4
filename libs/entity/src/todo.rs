use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_with::skip_serializing_none;

use crate::board::BoardContent;

/// One row of the `todos` table, a page holding boards.
#[derive(Debug, Default, PartialEq, Clone, Serialize, Deserialize)]
pub struct Todo {
    pub id: i64,
    #[serde(default)]
    pub created_at: DateTime<Utc>,
    pub title: Option<String>,
    #[serde(default, deserialize_with = "deserialize_content")]
    pub content: Option<Vec<BoardContent>>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl Todo {
    /// Stand-in for a page whose row does not exist yet.
    pub fn placeholder(id: i64) -> Self {
        let now = Utc::now();
        Self {
            id,
            created_at: now,
            title: Some(String::new()),
            content: Some(vec![]),
            start_date: Some(now.to_rfc3339()),
            end_date: Some(now.to_rfc3339()),
        }
    }

    pub fn boards(&self) -> &[BoardContent] {
        self.content.as_deref().unwrap_or(&[])
    }

    pub fn title(&self) -> &str {
        self.title.as_deref().unwrap_or_default()
    }

    pub fn progress(&self) -> Progress {
        let boards = self.boards();
        Progress {
            completed: boards.iter().filter(|b| b.is_completed).count(),
            total: boards.len(),
        }
    }

    pub fn marker(&self) -> StatusMarker {
        let progress = self.progress();
        if progress.total == 0 {
            StatusMarker::Empty
        } else if progress.completed == progress.total {
            StatusMarker::Complete
        } else {
            StatusMarker::InProgress
        }
    }
}

// The column is JSON or text depending on who wrote the row: blank pages
// are inserted with "" and some rows carry the array as a JSON string.
fn deserialize_content<'de, D>(
    deserializer: D,
) -> Result<Option<Vec<BoardContent>>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Column {
        Boards(Vec<BoardContent>),
        Text(String),
    }

    let column = Option::<Column>::deserialize(deserializer)?;

    Ok(match column {
        Some(Column::Boards(boards)) => Some(boards),
        Some(Column::Text(text)) => {
            serde_json::from_str::<Vec<BoardContent>>(&text).ok()
        }
        None => None,
    })
}

/// Value written to the `content` column.
#[derive(Debug, PartialEq, Clone, Serialize)]
#[serde(untagged)]
pub enum ContentColumn {
    Boards(Vec<BoardContent>),
    Text(String),
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct NewTodo {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub content: Option<ContentColumn>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl NewTodo {
    /// Row inserted by the "Add New Page" action.
    pub fn blank() -> Self {
        Self {
            id: None,
            title: Some(String::new()),
            content: Some(ContentColumn::Text(String::new())),
            start_date: Some(String::new()),
            end_date: Some(String::new()),
        }
    }

    /// Row inserted when a patch targets a page that has no row yet.
    pub fn from_patch(id: i64, patch: TodoPatch) -> Self {
        Self {
            id: Some(id),
            title: patch.title,
            content: patch.content,
            start_date: patch.start_date,
            end_date: patch.end_date,
        }
    }
}

#[skip_serializing_none]
#[derive(Debug, Default, PartialEq, Clone, Serialize)]
pub struct TodoPatch {
    pub title: Option<String>,
    pub content: Option<ContentColumn>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl TodoPatch {
    pub fn boards(boards: Vec<BoardContent>) -> Self {
        Self {
            content: Some(ContentColumn::Boards(boards)),
            ..Default::default()
        }
    }

    /// Fills fields left unset in `self` from `other`.
    pub fn or(self, other: TodoPatch) -> Self {
        Self {
            title: self.title.or(other.title),
            content: self.content.or(other.content),
            start_date: self.start_date.or(other.start_date),
            end_date: self.end_date.or(other.end_date),
        }
    }
}

#[derive(Debug, Default, PartialEq, Eq, Clone, Copy, Serialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    pub fn percent(&self) -> u8 {
        if self.total == 0 {
            return 0;
        }
        (self.completed * 100 / self.total) as u8
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} Complete", self.completed, self.total)
    }
}

#[derive(
    Debug,
    Default,
    PartialEq,
    Eq,
    Clone,
    Copy,
    Serialize,
    Deserialize,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum StatusMarker {
    #[default]
    Empty,
    InProgress,
    Complete,
}

#[cfg(test)]
mod test {
    use serde_json::json;

    use super::*;
    use crate::board::BoardId;

    fn board(done: bool) -> BoardContent {
        BoardContent {
            is_completed: done,
            ..BoardContent::new()
        }
    }

    #[test]
    fn test_patch_or_prefers_own_fields() {
        // Arrange
        let held = TodoPatch {
            title: Some("held".to_string()),
            start_date: Some("2024-05-01".to_string()),
            ..Default::default()
        };
        let patch = TodoPatch {
            title: Some("new".to_string()),
            ..TodoPatch::boards(vec![])
        };

        // Act
        let merged = patch.or(held);

        // Assert
        assert_eq!(merged.title.as_deref(), Some("new"));
        assert_eq!(merged.start_date.as_deref(), Some("2024-05-01"));
        assert_eq!(merged.end_date, None);
        assert_eq!(merged.content, Some(ContentColumn::Boards(vec![])));
    }

    #[test]
    fn test_deserialize_row() {
        // Arrange
        let row = json!({
            "id": 3,
            "created_at": "2024-05-01T10:00:00.123456+00:00",
            "title": "week",
            "content": [{"boardId": "a", "isCompleted": false}],
            "start_date": null,
            "end_date": null
        });

        // Act
        let todo = serde_json::from_value::<Todo>(row).unwrap();

        // Assert
        assert_eq!(todo.id, 3);
        assert_eq!(todo.title(), "week");
        assert_eq!(todo.boards().len(), 1);
        assert_eq!(todo.boards()[0].board_id, BoardId::Text("a".into()));
    }

    #[test]
    fn test_deserialize_text_content() {
        // Arrange
        let blank = json!({"id": 1, "title": "", "content": ""});
        let stringified = json!({
            "id": 2,
            "content": "[{\"boardId\":1,\"title\":\"t\"}]"
        });
        let markdown = json!({"id": 3, "content": "Hello World"});
        let null = json!({"id": 4, "content": null});

        // Act
        let blank = serde_json::from_value::<Todo>(blank).unwrap();
        let stringified = serde_json::from_value::<Todo>(stringified).unwrap();
        let markdown = serde_json::from_value::<Todo>(markdown).unwrap();
        let null = serde_json::from_value::<Todo>(null).unwrap();

        // Assert
        assert_eq!(blank.content, None);
        assert_eq!(stringified.boards()[0].title, "t");
        assert_eq!(markdown.content, None);
        assert_eq!(null.content, None);
    }

    #[test]
    fn test_deserialize_rejects_malformed_boards() {
        // Arrange
        let row = json!({"id": 1, "content": [{"title": "no id"}]});

        // Act
        let todo = serde_json::from_value::<Todo>(row);

        // Assert
        assert!(todo.is_err());
    }

    #[test]
    fn test_placeholder() {
        // Act
        let todo = Todo::placeholder(42);

        // Assert
        assert_eq!(todo.id, 42);
        assert_eq!(todo.title, Some(String::new()));
        assert_eq!(todo.content, Some(vec![]));
        assert!(todo.start_date.is_some());
        assert!(todo.end_date.is_some());
    }

    #[test]
    fn test_progress_and_marker() {
        // Arrange
        let empty = Todo::placeholder(1);
        let partial = Todo {
            content: Some(vec![board(true), board(false), board(false)]),
            ..Todo::placeholder(2)
        };
        let done = Todo {
            content: Some(vec![board(true)]),
            ..Todo::placeholder(3)
        };

        // Assert
        assert_eq!(empty.marker(), StatusMarker::Empty);
        assert_eq!(partial.marker(), StatusMarker::InProgress);
        assert_eq!(done.marker(), StatusMarker::Complete);
        assert_eq!(partial.progress().to_string(), "1/3 Complete");
        assert_eq!(partial.progress().percent(), 33);
        assert_eq!(empty.progress().percent(), 0);
    }

    #[test]
    fn test_serialize_new_todo_skips_absent_fields() {
        // Arrange
        let row = NewTodo::from_patch(9, TodoPatch::boards(vec![]));

        // Act
        let value = serde_json::to_value(&row).unwrap();

        // Assert
        assert_eq!(value, json!({"id": 9, "content": []}));
    }

    #[test]
    fn test_serialize_blank_todo() {
        // Act
        let value = serde_json::to_value(NewTodo::blank()).unwrap();

        // Assert
        assert_eq!(
            value,
            json!({"title": "", "content": "", "start_date": "", "end_date": ""})
        );
    }
}
