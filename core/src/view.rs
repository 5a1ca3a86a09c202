//! Read-only projections over a todo snapshot: filtering, sorting and
//! completion statistics.

use std::cmp::Ordering;

use uuid::Uuid;

use crate::types::Todo;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StatusFilter {
    #[default]
    All,
    Active,
    Completed,
}

impl StatusFilter {
    fn matches(self, todo: &Todo) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Active => !todo.completed,
            StatusFilter::Completed => todo.completed,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    #[default]
    Newest,
    Oldest,
    /// Case-insensitive by text.
    Alphabetical,
}

impl SortOrder {
    fn compare(self, a: &Todo, b: &Todo) -> Ordering {
        match self {
            SortOrder::Newest => b.created_at.cmp(&a.created_at),
            SortOrder::Oldest => a.created_at.cmp(&b.created_at),
            SortOrder::Alphabetical => a
                .text
                .to_lowercase()
                .cmp(&b.text.to_lowercase())
                .then_with(|| a.text.cmp(&b.text)),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoQuery {
    pub status: StatusFilter,
    /// Restrict to one category; `None` keeps every category.
    pub category: Option<Uuid>,
    pub sort: SortOrder,
}

impl TodoQuery {
    pub fn apply<'a>(&self, todos: impl IntoIterator<Item = &'a Todo>) -> Vec<&'a Todo> {
        let mut selected: Vec<&Todo> = todos
            .into_iter()
            .filter(|t| self.status.matches(t))
            .filter(|t| self.category.map_or(true, |c| t.category_id == Some(c)))
            .collect();
        selected.sort_by(|a, b| self.sort.compare(a, b));
        selected
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TodoStats {
    pub total: usize,
    pub completed: usize,
    /// Whole percent of completed todos, 0 for an empty list.
    pub completion_rate: u8,
}

impl TodoStats {
    pub fn from_todos<'a>(todos: impl IntoIterator<Item = &'a Todo>) -> Self {
        let (total, completed) = todos.into_iter().fold((0, 0), |(total, done), t| {
            (total + 1, done + usize::from(t.completed))
        });
        let completion_rate = if total == 0 {
            0
        } else {
            ((completed as f64 / total as f64) * 100.0).round() as u8
        };
        Self {
            total,
            completed,
            completion_rate,
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};

    use super::*;

    fn todo(text: &str, completed: bool, category: Option<u128>, created: i64) -> Todo {
        Todo {
            id: Uuid::new_v4(),
            text: text.to_string(),
            completed,
            category_id: category.map(Uuid::from_u128),
            user_id: Uuid::nil(),
            created_at: DateTime::<Utc>::from_timestamp(created, 0).unwrap(),
        }
    }

    fn texts(todos: &[&Todo]) -> Vec<String> {
        todos.iter().map(|t| t.text.clone()).collect()
    }

    fn sample() -> Vec<Todo> {
        vec![
            todo("banana", false, Some(1), 10),
            todo("Apple", true, Some(2), 30),
            todo("cherry", true, Some(1), 20),
        ]
    }

    #[test]
    fn default_query_sorts_newest_first() {
        let todos = sample();
        let view = TodoQuery::default().apply(&todos);
        assert_eq!(texts(&view), ["Apple", "cherry", "banana"]);
    }

    #[test]
    fn oldest_first() {
        let todos = sample();
        let query = TodoQuery {
            sort: SortOrder::Oldest,
            ..TodoQuery::default()
        };
        assert_eq!(texts(&query.apply(&todos)), ["banana", "cherry", "Apple"]);
    }

    #[test]
    fn alphabetical_ignores_case() {
        let todos = sample();
        let query = TodoQuery {
            sort: SortOrder::Alphabetical,
            ..TodoQuery::default()
        };
        assert_eq!(texts(&query.apply(&todos)), ["Apple", "banana", "cherry"]);
    }

    #[test]
    fn status_and_category_filters_combine() {
        let todos = sample();
        let query = TodoQuery {
            status: StatusFilter::Completed,
            category: Some(Uuid::from_u128(1)),
            sort: SortOrder::Newest,
        };
        assert_eq!(texts(&query.apply(&todos)), ["cherry"]);

        let active = TodoQuery {
            status: StatusFilter::Active,
            ..TodoQuery::default()
        };
        assert_eq!(texts(&active.apply(&todos)), ["banana"]);
    }

    #[test]
    fn stats_round_to_whole_percent() {
        let todos = sample();
        let stats = TodoStats::from_todos(&todos);
        assert_eq!(stats.total, 3);
        assert_eq!(stats.completed, 2);
        assert_eq!(stats.completion_rate, 67);
    }

    #[test]
    fn stats_of_empty_list_are_zero() {
        let stats = TodoStats::from_todos(&Vec::<Todo>::new());
        assert_eq!(stats, TodoStats::default());
    }
}
