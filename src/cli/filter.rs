//! Dashboard filtering. Filtering is purely client-side over the fetched
//! set; the list endpoint is never asked to filter.

use clap::ValueEnum;

use crate::api::models::Task;

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum TaskFilter {
    All,
    Active,
    Completed,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            TaskFilter::All => true,
            TaskFilter::Active => !task.completed,
            TaskFilter::Completed => task.completed,
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|t| self.matches(t)).collect()
    }

    pub fn empty_message(&self) -> &'static str {
        match self {
            TaskFilter::All => "No tasks yet. Run `taskly add <title>` to create one.",
            TaskFilter::Active => "No active tasks. All tasks are completed!",
            TaskFilter::Completed => "No completed tasks yet.",
        }
    }
}

/// (active, completed) counts over the unfiltered set.
pub fn counts(tasks: &[Task]) -> (usize, usize) {
    let active = tasks.iter().filter(|t| !t.completed).count();
    (active, tasks.len() - active)
}
