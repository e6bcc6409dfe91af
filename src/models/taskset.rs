use std::collections::HashSet;

use super::Task;
use crate::SchedulingError;

/// An ordered, validated collection of tasks with unique ids.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskSet {
    tasks: Vec<Task>,
}

impl TaskSet {
    pub fn new(tasks: Vec<Task>) -> Result<Self, SchedulingError> {
        let mut seen = HashSet::new();
        for task in &tasks {
            if !seen.insert(task.id()) {
                return Err(SchedulingError::invalid_task(task.id(), "duplicate task id"));
            }
        }
        Ok(Self { tasks })
    }

    pub fn new_empty() -> Self {
        Self { tasks: Vec::new() }
    }

    pub fn get_tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn get_task(&self, index: usize) -> Option<&Task> {
        self.tasks.get(index)
    }

    pub fn get_task_by_id(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id() == id)
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn utilisation(&self) -> f64 {
        self.tasks.iter().map(|t| t.utilisation()).sum()
    }

    pub fn is_implicit(&self) -> bool {
        self.tasks.iter().all(|t| t.is_implicit())
    }

    pub fn is_constrained(&self) -> bool {
        self.tasks.iter().all(|t| t.is_constrained())
    }

    /// Tasks whose every job misses because `cost > deadline`.
    pub fn always_missing(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().filter(|t| t.always_misses())
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Task> {
        self.tasks.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_id_rejected() {
        let tasks = vec![
            Task::new("A", 1, 4, 4).unwrap(),
            Task::new("A", 2, 8, 8).unwrap(),
        ];
        match TaskSet::new(tasks) {
            Err(SchedulingError::InvalidTask { task, .. }) => assert_eq!(task, "A"),
            other => panic!("unexpected result {:?}", other),
        }
    }

    #[test]
    fn test_queries() {
        let set = TaskSet::new(vec![
            Task::new("A", 10, 20, 20).unwrap(),
            Task::new("B", 5, 10, 30).unwrap(),
            Task::new("C", 9, 8, 40).unwrap(),
        ])
        .unwrap();

        assert_eq!(set.len(), 3);
        assert!(!set.is_implicit());
        assert!(set.is_constrained());
        assert_eq!(set.get_task_by_id("B").map(|t| t.period()), Some(30));
        assert!(set.get_task_by_id("Z").is_none());
        assert_eq!(
            set.always_missing().map(|t| t.id()).collect::<Vec<_>>(),
            vec!["C"]
        );
        let expected = 0.5 + 5.0 / 30.0 + 9.0 / 40.0;
        assert!((set.utilisation() - expected).abs() < 1e-12);
    }

    #[test]
    fn test_empty_set() {
        let set = TaskSet::new(Vec::new()).unwrap();
        assert!(set.is_empty());
        assert_eq!(set, TaskSet::new_empty());
    }
}
