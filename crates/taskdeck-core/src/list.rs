//! Ordered collection of task items keyed by task id.
//!
//! The parent owns the task data and hands it down through [`TaskList::set_tasks`].
//! A toggle result is patched into place by id; saves and deletes ask the
//! parent for a full refetch.

use std::collections::HashMap;

use crate::item::{ItemEvent, ItemView, TaskItem};
use crate::models::{Task, TaskId};

/// What the parent should do after an item event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListAction {
    None,
    Refresh,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListView {
    Empty,
    Items(Vec<ItemView>),
}

#[derive(Debug, Default)]
pub struct TaskList {
    items: Vec<TaskItem>,
}

impl TaskList {
    pub fn new(tasks: Vec<Task>) -> Self {
        let mut list = Self::default();
        list.set_tasks(tasks);
        list
    }

    /// Replaces the collection, reusing items whose id is still present.
    pub fn set_tasks(&mut self, tasks: Vec<Task>) {
        let mut previous = self
            .items
            .drain(..)
            .map(|item| (item.id(), item))
            .collect::<HashMap<TaskId, TaskItem>>();

        let mut items = Vec::with_capacity(tasks.len());
        for task in tasks {
            if items.iter().any(|item: &TaskItem| item.id() == task.id) {
                tracing::warn!(task_id = %task.id, "Skipping duplicate task id");
                continue;
            }
            let item = match previous.remove(&task.id) {
                Some(mut item) => {
                    item.sync_from_parent(task);
                    item
                }
                None => TaskItem::new(task),
            };
            items.push(item);
        }

        for removed in previous.values() {
            removed.unmount();
        }
        self.items = items;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn items(&self) -> &[TaskItem] {
        &self.items
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.items.iter().map(TaskItem::task)
    }

    pub fn item(&self, id: TaskId) -> Option<&TaskItem> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn item_mut(&mut self, id: TaskId) -> Option<&mut TaskItem> {
        self.items.iter_mut().find(|item| item.id() == id)
    }

    /// Applies an item's success event and returns the follow-up for the parent.
    pub fn apply(&mut self, event: ItemEvent) -> ListAction {
        match event {
            ItemEvent::Toggled(task) => {
                if let Some(item) = self.item_mut(task.id) {
                    item.sync_from_parent(task);
                }
                ListAction::None
            }
            ItemEvent::Saved(_) | ItemEvent::Deleted(_) => ListAction::Refresh,
        }
    }

    pub fn view(&self) -> ListView {
        if self.items.is_empty() {
            ListView::Empty
        } else {
            ListView::Items(self.items.iter().map(TaskItem::view).collect())
        }
    }
}
