use crate::model::task::{Column, Task};

/// One kanban column and the tasks sitting in it
#[derive(Debug)]
pub struct BoardColumn<'a> {
    pub column: Column,
    pub tasks: Vec<&'a Task>,
}

/// Project the collection onto the three fixed kanban columns. Column
/// membership is derived from each task's `{completed, in_progress}` pair;
/// within a column, tasks keep their stored order.
pub fn board(tasks: &[Task]) -> [BoardColumn<'_>; 3] {
    let mut todo = Vec::new();
    let mut in_progress = Vec::new();
    let mut done = Vec::new();

    for task in tasks {
        match Column::of(task) {
            Column::Todo => todo.push(task),
            Column::InProgress => in_progress.push(task),
            Column::Done => done.push(task),
        }
    }

    [
        BoardColumn {
            column: Column::Todo,
            tasks: todo,
        },
        BoardColumn {
            column: Column::InProgress,
            tasks: in_progress,
        },
        BoardColumn {
            column: Column::Done,
            tasks: done,
        },
    ]
}
