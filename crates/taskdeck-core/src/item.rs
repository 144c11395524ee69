//! Interaction state for a single rendered task.
//!
//! An item is either viewing or editing, with an orthogonal busy flag that
//! guards in-flight requests. Each network action is split into a synchronous
//! `begin_*` step that claims the busy flag and applies any optimistic change,
//! and a `finish_*` step that applies the server result. The `async`
//! conveniences compose the two around a [`TaskApi`] call.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::api::TaskApi;
use crate::busy::{BusyFlag, BusyGuard};
use crate::error::Result;
use crate::models::{Task, TaskId, TaskPatch};

/// Editable copies of the task fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditDraft {
    pub title: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    Viewing,
    Editing(EditDraft),
}

/// Progress of the optimistic completion flip.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TogglePhase {
    #[default]
    Settled,
    /// Flag flipped locally, request outstanding
    Pending { previous: bool },
    /// Server state committed
    Committed,
    /// Request failed and the flip was reverted
    RolledBack,
}

/// Successful outcomes reported to the owning list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ItemEvent {
    Toggled(Task),
    Saved(Task),
    Deleted(TaskId),
}

#[derive(Debug)]
#[must_use]
pub struct ToggleTicket {
    id: TaskId,
    previous: bool,
    _guard: BusyGuard,
}

impl ToggleTicket {
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

#[derive(Debug)]
#[must_use]
pub struct SaveTicket {
    id: TaskId,
    patch: TaskPatch,
    _guard: BusyGuard,
}

impl SaveTicket {
    pub const fn id(&self) -> TaskId {
        self.id
    }

    pub const fn patch(&self) -> &TaskPatch {
        &self.patch
    }
}

#[derive(Debug)]
#[must_use]
pub struct DeleteTicket {
    id: TaskId,
    _guard: BusyGuard,
}

impl DeleteTicket {
    pub const fn id(&self) -> TaskId {
        self.id
    }
}

/// Observes whether an item is still part of its list.
#[derive(Debug, Clone)]
pub struct MountHandle(Arc<AtomicBool>);

impl MountHandle {
    pub fn is_mounted(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

/// Snapshot of what an item displays.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemView {
    pub id: TaskId,
    pub title: String,
    pub description: Option<String>,
    pub completed: bool,
    pub editing: bool,
    pub busy: bool,
    pub error: Option<String>,
}

#[derive(Debug)]
pub struct TaskItem {
    task: Task,
    completed: bool,
    mode: Mode,
    toggle_phase: TogglePhase,
    error: Option<String>,
    busy: BusyFlag,
    mounted: Arc<AtomicBool>,
}

impl TaskItem {
    pub fn new(task: Task) -> Self {
        Self {
            completed: task.completed,
            task,
            mode: Mode::Viewing,
            toggle_phase: TogglePhase::Settled,
            error: None,
            busy: BusyFlag::new(),
            mounted: Arc::new(AtomicBool::new(true)),
        }
    }

    pub const fn id(&self) -> TaskId {
        self.task.id
    }

    /// Last task state received from the parent or the server.
    pub const fn task(&self) -> &Task {
        &self.task
    }

    /// Completion flag as displayed, including any optimistic flip.
    pub const fn displayed_completed(&self) -> bool {
        self.completed
    }

    pub const fn mode(&self) -> &Mode {
        &self.mode
    }

    pub const fn is_editing(&self) -> bool {
        matches!(self.mode, Mode::Editing(_))
    }

    pub const fn draft(&self) -> Option<&EditDraft> {
        match &self.mode {
            Mode::Editing(draft) => Some(draft),
            Mode::Viewing => None,
        }
    }

    pub const fn toggle_phase(&self) -> TogglePhase {
        self.toggle_phase
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn is_busy(&self) -> bool {
        self.busy.is_busy()
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted.load(Ordering::Acquire)
    }

    pub fn mount_handle(&self) -> MountHandle {
        MountHandle(Arc::clone(&self.mounted))
    }

    /// Marks the item as removed; late results are discarded.
    pub fn unmount(&self) {
        self.mounted.store(false, Ordering::Release);
    }

    /// Accepts fresh data from the parent, keeping local edit state.
    pub fn sync_from_parent(&mut self, task: Task) {
        if !matches!(self.toggle_phase, TogglePhase::Pending { .. }) {
            self.completed = task.completed;
        }
        self.task = task;
    }

    /// Tickets issued by another item are ignored.
    fn owns(&self, ticket_id: TaskId) -> bool {
        if ticket_id == self.task.id {
            return true;
        }
        tracing::warn!(
            task_id = %self.task.id,
            ticket_id = %ticket_id,
            "Ignoring result for a different task"
        );
        false
    }

    pub fn view(&self) -> ItemView {
        ItemView {
            id: self.task.id,
            title: self.task.title.clone(),
            description: self.task.description_text().map(ToString::to_string),
            completed: self.completed,
            editing: self.is_editing(),
            busy: self.is_busy(),
            error: self.error.clone(),
        }
    }

    pub fn begin_toggle(&mut self) -> Option<ToggleTicket> {
        if self.is_editing() {
            return None;
        }
        let Some(guard) = self.busy.try_acquire() else {
            tracing::debug!(task_id = %self.task.id, "Toggle ignored while busy");
            return None;
        };

        let previous = self.completed;
        self.completed = !previous;
        self.toggle_phase = TogglePhase::Pending { previous };
        self.error = None;
        Some(ToggleTicket {
            id: self.task.id,
            previous,
            _guard: guard,
        })
    }

    pub fn finish_toggle(&mut self, ticket: ToggleTicket, result: Result<Task>) -> Option<ItemEvent> {
        if !self.owns(ticket.id) {
            return None;
        }
        if !self.is_mounted() {
            tracing::debug!(task_id = %ticket.id, "Discarding toggle result for removed task");
            return None;
        }

        match result {
            Ok(task) => {
                self.completed = task.completed;
                self.task = task.clone();
                self.toggle_phase = TogglePhase::Committed;
                Some(ItemEvent::Toggled(task))
            }
            Err(error) => {
                tracing::warn!(task_id = %ticket.id, "Toggle failed, reverting: {}", error);
                self.completed = ticket.previous;
                self.toggle_phase = TogglePhase::RolledBack;
                self.error = Some(error.to_string());
                None
            }
        }
    }

    /// Optimistically flips completion and confirms it with the server.
    ///
    /// Returns `None` when ignored (busy or editing) or when the request failed.
    pub async fn toggle<A: TaskApi>(&mut self, api: &A) -> Option<ItemEvent> {
        let ticket = self.begin_toggle()?;
        let result = api.toggle_task(ticket.id).await;
        self.finish_toggle(ticket, result)
    }

    /// Enters editing with the current title and description.
    pub fn start_edit(&mut self) -> bool {
        if self.is_busy() || self.is_editing() {
            return false;
        }
        self.mode = Mode::Editing(EditDraft {
            title: self.task.title.clone(),
            description: self.task.description.clone().unwrap_or_default(),
        });
        self.error = None;
        true
    }

    pub fn set_draft_title(&mut self, title: impl Into<String>) {
        if let Mode::Editing(draft) = &mut self.mode {
            draft.title = title.into();
        }
    }

    pub fn set_draft_description(&mut self, description: impl Into<String>) {
        if let Mode::Editing(draft) = &mut self.mode {
            draft.description = description.into();
        }
    }

    /// Discards the draft and returns to viewing.
    pub fn cancel_edit(&mut self) {
        self.mode = Mode::Viewing;
        self.error = None;
    }

    /// Builds the update from the fields the draft changed; nothing is
    /// validated locally. A draft with no changes returns to viewing without
    /// a request.
    pub fn begin_save(&mut self) -> Option<SaveTicket> {
        let Mode::Editing(draft) = &self.mode else {
            return None;
        };
        let guard = self.busy.try_acquire()?;

        let original_description = self.task.description.as_deref().unwrap_or_default();
        let patch = TaskPatch {
            title: (draft.title != self.task.title).then(|| draft.title.clone()),
            description: (draft.description != original_description)
                .then(|| draft.description.clone()),
            completed: None,
        };
        self.error = None;

        if patch.is_empty() {
            tracing::debug!(task_id = %self.task.id, "Draft unchanged, nothing to save");
            self.mode = Mode::Viewing;
            return None;
        }

        Some(SaveTicket {
            id: self.task.id,
            patch,
            _guard: guard,
        })
    }

    pub fn finish_save(&mut self, ticket: SaveTicket, result: Result<Task>) -> Option<ItemEvent> {
        if !self.owns(ticket.id) {
            return None;
        }
        if !self.is_mounted() {
            tracing::debug!(task_id = %ticket.id, "Discarding save result for removed task");
            return None;
        }

        match result {
            Ok(task) => {
                self.completed = task.completed;
                self.task = task.clone();
                self.mode = Mode::Viewing;
                Some(ItemEvent::Saved(task))
            }
            Err(error) => {
                tracing::warn!(task_id = %ticket.id, "Save failed: {}", error);
                self.error = Some(error.to_string());
                None
            }
        }
    }

    /// Sends the draft; stays in editing with the draft intact on failure.
    pub async fn save<A: TaskApi>(&mut self, api: &A) -> Option<ItemEvent> {
        let ticket = self.begin_save()?;
        let result = api.update_task(ticket.id, &ticket.patch).await;
        self.finish_save(ticket, result)
    }

    /// Asks `confirm` before claiming a delete; declining issues no request.
    pub fn begin_delete(&mut self, confirm: impl FnOnce(&Task) -> bool) -> Option<DeleteTicket> {
        let guard = self.busy.try_acquire()?;
        if !confirm(&self.task) {
            tracing::debug!(task_id = %self.task.id, "Delete not confirmed");
            return None;
        }
        self.error = None;
        Some(DeleteTicket {
            id: self.task.id,
            _guard: guard,
        })
    }

    pub fn finish_delete(&mut self, ticket: DeleteTicket, result: Result<()>) -> Option<ItemEvent> {
        if !self.owns(ticket.id) {
            return None;
        }
        if !self.is_mounted() {
            return None;
        }

        match result {
            Ok(()) => Some(ItemEvent::Deleted(ticket.id)),
            Err(error) => {
                tracing::warn!(task_id = %ticket.id, "Delete failed: {}", error);
                self.error = Some(error.to_string());
                None
            }
        }
    }

    pub async fn delete<A: TaskApi>(
        &mut self,
        api: &A,
        confirm: impl FnOnce(&Task) -> bool,
    ) -> Option<ItemEvent> {
        let ticket = self.begin_delete(confirm)?;
        let result = api.delete_task(ticket.id).await;
        self.finish_delete(ticket, result)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::error::Error;
    use crate::testing::{task, FakeTaskApi};

    #[tokio::test]
    async fn toggle_shows_optimistic_state_then_commits_server_task() {
        let api = FakeTaskApi::with_tasks(vec![task(1, "Buy milk", false)]);
        let mut item = TaskItem::new(task(1, "Buy milk", false));

        let ticket = item.begin_toggle().unwrap();
        assert!(item.displayed_completed());
        assert!(item.is_busy());
        assert_eq!(item.toggle_phase(), TogglePhase::Pending { previous: false });

        let result = api.toggle_task(ticket.id()).await;
        let event = item.finish_toggle(ticket, result);

        assert_eq!(event, Some(ItemEvent::Toggled(task(1, "Buy milk", true))));
        assert!(item.displayed_completed());
        assert!(item.task().completed);
        assert!(!item.is_busy());
        assert_eq!(item.toggle_phase(), TogglePhase::Committed);
    }

    #[tokio::test]
    async fn failed_toggle_reverts_displayed_flag() {
        let api = FakeTaskApi::with_tasks(vec![task(1, "Buy milk", false)]);
        api.fail("toggle", 500, "boom");
        let mut item = TaskItem::new(task(1, "Buy milk", false));

        let event = item.toggle(&api).await;

        assert_eq!(event, None);
        assert!(!item.displayed_completed());
        assert_eq!(item.toggle_phase(), TogglePhase::RolledBack);
        assert_eq!(item.error(), Some("boom"));
        assert!(!item.is_busy());
    }

    #[tokio::test]
    async fn toggling_twice_restores_original_flag() {
        let api = FakeTaskApi::with_tasks(vec![task(1, "Buy milk", false)]);
        let mut item = TaskItem::new(task(1, "Buy milk", false));

        item.toggle(&api).await.unwrap();
        item.toggle(&api).await.unwrap();

        assert!(!item.displayed_completed());
        assert!(!api.server_tasks()[0].completed);
    }

    #[test]
    fn reentrant_toggle_is_ignored() {
        let mut item = TaskItem::new(task(1, "Buy milk", false));
        let first = item.begin_toggle();
        assert!(first.is_some());
        assert!(item.begin_toggle().is_none());
        // displayed flag flipped exactly once
        assert!(item.displayed_completed());
    }

    #[test]
    fn toggle_is_ignored_while_editing() {
        let mut item = TaskItem::new(task(1, "Buy milk", false));
        assert!(item.start_edit());
        assert!(item.begin_toggle().is_none());
    }

    #[test]
    fn start_edit_copies_fields() {
        let mut source = task(2, "Walk dog", false);
        source.description = Some("twice".to_string());
        let mut item = TaskItem::new(source);

        assert!(item.start_edit());
        assert_eq!(
            item.draft(),
            Some(&EditDraft {
                title: "Walk dog".to_string(),
                description: "twice".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn rejected_empty_title_keeps_editing_with_draft() {
        let api = FakeTaskApi::with_tasks(vec![task(2, "Walk dog", false)]);
        let mut item = TaskItem::new(task(2, "Walk dog", false));
        item.start_edit();
        item.set_draft_title("");

        let event = item.save(&api).await;

        assert_eq!(event, None);
        assert!(item.is_editing());
        assert_eq!(item.draft().unwrap().title, "");
        assert_eq!(item.error(), Some("Title must not be empty"));
        assert_eq!(item.task().title, "Walk dog");
    }

    #[tokio::test]
    async fn successful_save_returns_to_viewing() {
        let api = FakeTaskApi::with_tasks(vec![task(2, "Walk dog", false)]);
        let mut item = TaskItem::new(task(2, "Walk dog", false));
        item.start_edit();
        item.set_draft_title("Walk the dog");
        item.set_draft_description("before dinner");

        let event = item.save(&api).await;

        let Some(ItemEvent::Saved(saved)) = event else {
            panic!("expected a saved event");
        };
        assert_eq!(saved.title, "Walk the dog");
        assert_eq!(saved.description.as_deref(), Some("before dinner"));
        assert_eq!(item.mode(), &Mode::Viewing);
    }

    #[test]
    fn cancel_discards_draft() {
        let mut item = TaskItem::new(task(2, "Walk dog", false));
        item.start_edit();
        item.set_draft_title("changed");

        item.cancel_edit();

        assert_eq!(item.mode(), &Mode::Viewing);
        assert_eq!(item.task().title, "Walk dog");
        assert!(item.start_edit());
        assert_eq!(item.draft().unwrap().title, "Walk dog");
    }

    #[tokio::test]
    async fn declined_delete_issues_no_request() {
        let api = FakeTaskApi::with_tasks(vec![task(3, "Pay rent", false)]);
        let mut item = TaskItem::new(task(3, "Pay rent", false));

        let event = item.delete(&api, |_| false).await;

        assert_eq!(event, None);
        assert!(api.calls().is_empty());
        assert!(!item.is_busy());
    }

    #[tokio::test]
    async fn confirmed_delete_reports_deleted_id() {
        let api = FakeTaskApi::with_tasks(vec![task(3, "Pay rent", false)]);
        let mut item = TaskItem::new(task(3, "Pay rent", false));

        let event = item.delete(&api, |task| task.id == TaskId::new(3)).await;

        assert_eq!(event, Some(ItemEvent::Deleted(TaskId::new(3))));
        assert_eq!(api.calls(), vec!["delete 3".to_string()]);
    }

    #[tokio::test]
    async fn failed_delete_only_surfaces_error() {
        let api = FakeTaskApi::with_tasks(vec![task(3, "Pay rent", false)]);
        api.fail("delete", 500, "server down");
        let mut item = TaskItem::new(task(3, "Pay rent", false));

        let event = item.delete(&api, |_| true).await;

        assert_eq!(event, None);
        assert_eq!(item.error(), Some("server down"));
        assert_eq!(item.mode(), &Mode::Viewing);
    }

    #[test]
    fn results_after_unmount_are_discarded() {
        let mut item = TaskItem::new(task(1, "Buy milk", false));
        let ticket = item.begin_toggle().unwrap();
        item.unmount();

        let event = item.finish_toggle(
            ticket,
            Err(Error::Api {
                status: 500,
                message: "late".to_string(),
            }),
        );

        assert_eq!(event, None);
        assert_eq!(item.error(), None);
        assert!(!item.is_busy());
    }

    #[test]
    fn parent_sync_keeps_pending_optimistic_flag() {
        let mut item = TaskItem::new(task(1, "Buy milk", false));
        let _ticket = item.begin_toggle().unwrap();

        item.sync_from_parent(task(1, "Buy oat milk", false));

        assert!(item.displayed_completed());
        assert_eq!(item.task().title, "Buy oat milk");
    }

    #[tokio::test]
    async fn title_only_edit_leaves_missing_description_alone() {
        let api = FakeTaskApi::with_tasks(vec![task(2, "Walk dog", false)]);
        let mut item = TaskItem::new(task(2, "Walk dog", false));
        item.start_edit();
        item.set_draft_title("Walk the dog");

        let ticket = item.begin_save().unwrap();
        assert_eq!(ticket.patch(), &TaskPatch::title("Walk the dog"));

        let result = api.update_task(ticket.id(), ticket.patch()).await;
        item.finish_save(ticket, result).unwrap();

        assert_eq!(api.server_tasks()[0].description, None);
        assert_eq!(item.task().description, None);
    }

    #[test]
    fn description_only_edit_sends_description() {
        let mut source = task(2, "Walk dog", false);
        source.description = Some("twice".to_string());
        let mut item = TaskItem::new(source);
        item.start_edit();
        item.set_draft_description("");

        let ticket = item.begin_save().unwrap();

        assert_eq!(
            ticket.patch(),
            &TaskPatch {
                title: None,
                description: Some(String::new()),
                completed: None,
            }
        );
    }

    #[test]
    fn unchanged_draft_returns_to_viewing_without_request() {
        let mut item = TaskItem::new(task(2, "Walk dog", false));
        item.start_edit();
        item.set_draft_title("Walk dog");

        assert!(item.begin_save().is_none());
        assert_eq!(item.mode(), &Mode::Viewing);
        assert!(!item.is_busy());
    }

    #[tokio::test]
    async fn separate_items_toggle_concurrently() {
        let api = FakeTaskApi::with_tasks(vec![
            task(1, "Buy milk", false),
            task(2, "Walk dog", true),
        ]);
        let mut first = TaskItem::new(task(1, "Buy milk", false));
        let mut second = TaskItem::new(task(2, "Walk dog", true));

        let first_ticket = first.begin_toggle().unwrap();
        let second_ticket = second.begin_toggle().unwrap();
        assert!(first.is_busy() && second.is_busy());

        let (first_result, second_result) = tokio::join!(
            api.toggle_task(first_ticket.id()),
            api.toggle_task(second_ticket.id())
        );

        assert_eq!(
            first.finish_toggle(first_ticket, first_result),
            Some(ItemEvent::Toggled(task(1, "Buy milk", true)))
        );
        assert_eq!(
            second.finish_toggle(second_ticket, second_result),
            Some(ItemEvent::Toggled(task(2, "Walk dog", false)))
        );
        assert_eq!(first.toggle_phase(), TogglePhase::Committed);
        assert_eq!(second.toggle_phase(), TogglePhase::Committed);
        assert!(!first.is_busy() && !second.is_busy());
    }

    #[test]
    fn ticket_from_another_item_is_ignored() {
        let mut first = TaskItem::new(task(1, "Buy milk", false));
        let mut second = TaskItem::new(task(2, "Walk dog", true));
        let foreign = first.begin_toggle().unwrap();

        let event = second.finish_toggle(
            foreign,
            Err(Error::Api {
                status: 500,
                message: "boom".to_string(),
            }),
        );

        assert_eq!(event, None);
        assert!(second.displayed_completed());
        assert_eq!(second.toggle_phase(), TogglePhase::Settled);
        assert_eq!(second.error(), None);
    }

    #[tokio::test]
    async fn toggle_succeeds_after_failure_clears() {
        let api = FakeTaskApi::with_tasks(vec![task(1, "Buy milk", false)]);
        api.fail("toggle", 503, "unavailable");
        let mut item = TaskItem::new(task(1, "Buy milk", false));

        assert_eq!(item.toggle(&api).await, None);
        assert_eq!(item.toggle_phase(), TogglePhase::RolledBack);

        api.clear_failures();
        let event = item.toggle(&api).await;

        assert_eq!(event, Some(ItemEvent::Toggled(task(1, "Buy milk", true))));
        assert_eq!(item.error(), None);
        assert_eq!(item.toggle_phase(), TogglePhase::Committed);
    }
}
