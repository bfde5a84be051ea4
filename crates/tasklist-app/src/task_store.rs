//! In-memory task list and UI selection state, written through to persistence.

use tasklist_core::{
    StatusFilter, Task, TaskCounts, TaskFilter, TaskId, TaskIdSequence, TaskValidationError,
    validate_text,
};
use tasklist_store::{KeyValueStore, TaskPersistence};
use tracing::debug;

/// Proof that the user confirmed a destructive clear.
///
/// The store never prompts; callers construct this only after their own
/// confirmation step succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClearConfirmation {
    _confirmed: (),
}

impl ClearConfirmation {
    /// Record that the user confirmed clearing every task.
    #[must_use]
    pub const fn confirmed() -> Self {
        Self { _confirmed: () }
    }
}

/// Owner of the canonical task list.
///
/// Durable mutations (add, toggle, delete, commit-edit, clear-all) are
/// written through [`TaskPersistence`] before the call returns. Input,
/// filter, search and edit-buffer changes stay in memory.
#[derive(Debug)]
pub struct TaskStore<S> {
    persistence: TaskPersistence<S>,
    tasks: Vec<Task>,
    ids: TaskIdSequence,
    current_input: String,
    filter: StatusFilter,
    search_term: String,
    error: Option<String>,
    editing_text: String,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Hydrate a store from whatever `persistence` currently holds.
    pub fn hydrate(persistence: TaskPersistence<S>) -> Self {
        let tasks = persistence.load();
        let last_id = persistence.load_last_id();
        let ids = TaskIdSequence::after(tasks.iter().map(|task| task.id).chain(last_id));
        debug!(count = tasks.len(), next_id = ?ids.peek(), "Hydrated task store");
        Self {
            persistence,
            tasks,
            ids,
            current_input: String::new(),
            filter: StatusFilter::default(),
            search_term: String::new(),
            error: None,
            editing_text: String::new(),
        }
    }

    /// Every task in display order.
    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    /// Look up a task by id.
    pub fn task(&self, id: TaskId) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Pending new-task text.
    pub fn current_input(&self) -> &str {
        &self.current_input
    }

    /// Active status filter.
    pub const fn filter(&self) -> StatusFilter {
        self.filter
    }

    /// Active search term.
    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    /// Message from the last failed validation, if not yet cleared.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Live buffer of the in-progress edit.
    pub fn editing_text(&self) -> &str {
        &self.editing_text
    }

    /// Persistence adapter backing this store.
    pub const fn persistence(&self) -> &TaskPersistence<S> {
        &self.persistence
    }

    /// Replace the pending new-task text.
    pub fn set_current_input(&mut self, text: impl Into<String>) {
        self.current_input = text.into();
    }

    /// Validate `text` and append it as a new incomplete task.
    ///
    /// Surrounding whitespace is trimmed before validation and storage.
    ///
    /// # Errors
    /// Returns the validation failure, or
    /// [`TaskValidationError::IdsExhausted`] once every id has been used, and
    /// records its message in [`error`](Self::error); the task list is left
    /// unchanged.
    pub fn add(&mut self, text: &str) -> Result<TaskId, TaskValidationError> {
        let text = match validate_text(text) {
            Ok(text) => text.to_owned(),
            Err(err) => return Err(self.reject(err)),
        };
        let Some(id) = self.ids.next_id() else {
            return Err(self.reject(TaskValidationError::IdsExhausted));
        };
        self.tasks.push(Task::new(id, text));
        self.current_input.clear();
        self.error = None;
        debug!(%id, "Added task");
        self.persist();
        self.persistence.save_last_id(id);
        Ok(id)
    }

    /// [`add`](Self::add) the pending input buffer.
    ///
    /// # Errors
    /// Same as [`add`](Self::add); the input buffer is kept on failure.
    pub fn add_current_input(&mut self) -> Result<TaskId, TaskValidationError> {
        let text = self.current_input.clone();
        self.add(&text)
    }

    /// Flip completion of the task with `id`. Returns whether a task matched.
    pub fn toggle_completed(&mut self, id: TaskId) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.toggle();
        let completed = task.completed;
        self.error = None;
        debug!(%id, completed, "Toggled task");
        self.persist();
        true
    }

    /// Remove the task with `id`. Returns whether a task matched.
    pub fn delete_task(&mut self, id: TaskId) -> bool {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return false;
        };
        self.tasks.remove(index);
        self.error = None;
        debug!(%id, "Deleted task");
        self.persist();
        true
    }

    /// Put the task with `id` into edit mode and seed the edit buffer with its text.
    pub fn begin_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.is_editing = true;
        let text = task.text.clone();
        self.editing_text = text;
        true
    }

    /// Replace the edit buffer.
    pub fn update_edit_buffer(&mut self, text: impl Into<String>) {
        self.editing_text = text.into();
    }

    /// Write the edit buffer into the task with `id` and leave edit mode.
    ///
    /// The buffer goes through the same validation as [`add`](Self::add).
    /// Unknown ids are ignored.
    ///
    /// # Errors
    /// Returns the validation failure and records its message; the task keeps
    /// its text, stays in edit mode, and the buffer is kept.
    pub fn commit_edit(&mut self, id: TaskId) -> Result<(), TaskValidationError> {
        let Some(index) = self.tasks.iter().position(|task| task.id == id) else {
            return Ok(());
        };
        let text = match validate_text(&self.editing_text) {
            Ok(text) => text.to_owned(),
            Err(err) => return Err(self.reject(err)),
        };
        let task = &mut self.tasks[index];
        task.text = text;
        task.is_editing = false;
        self.editing_text.clear();
        self.error = None;
        debug!(%id, "Committed edit");
        self.persist();
        Ok(())
    }

    /// Leave edit mode for `id` without changing its text.
    pub fn cancel_edit(&mut self, id: TaskId) -> bool {
        let Some(task) = self.task_mut(id) else {
            return false;
        };
        task.is_editing = false;
        self.editing_text.clear();
        true
    }

    /// Change the status filter.
    pub const fn set_filter(&mut self, filter: StatusFilter) {
        self.filter = filter;
    }

    /// Change the search term.
    pub fn set_search_term(&mut self, term: impl Into<String>) {
        self.search_term = term.into();
    }

    /// Drop every task and delete the persisted list.
    ///
    /// The id sequence is not rewound.
    pub fn clear_all(&mut self, _confirmation: ClearConfirmation) {
        let removed = self.tasks.len();
        self.tasks.clear();
        self.editing_text.clear();
        self.error = None;
        debug!(removed, "Cleared all tasks");
        self.persistence.clear();
    }

    /// Tasks matching the search term, then the status filter, in display order.
    pub fn visible_tasks(&self) -> Vec<&Task> {
        TaskFilter::new(&self.search_term, self.filter).apply(&self.tasks)
    }

    /// Totals over the whole list, ignoring filter and search.
    pub fn task_counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.tasks)
    }

    fn task_mut(&mut self, id: TaskId) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|task| task.id == id)
    }

    fn reject(&mut self, err: TaskValidationError) -> TaskValidationError {
        debug!(error = %err, "Rejected task text");
        self.error = Some(err.to_string());
        err
    }

    fn persist(&self) {
        self.persistence.save(&self.tasks);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_core::MAX_TASK_TEXT_CHARS;
    use tasklist_store::{DEFAULT_KEY, MemoryStore, StoreError, StoreResult};

    fn store() -> (TaskStore<MemoryStore>, MemoryStore) {
        let medium = MemoryStore::new();
        (TaskStore::hydrate(TaskPersistence::new(medium.clone())), medium)
    }

    fn add(store: &mut TaskStore<MemoryStore>, text: &str) -> TaskId {
        store
            .add(text)
            .unwrap_or_else(|err| panic!("{text:?} should be accepted: {err}"))
    }

    fn persisted(medium: &MemoryStore) -> Vec<Task> {
        TaskPersistence::new(medium.clone()).load()
    }

    #[test]
    fn add_appends_incomplete_task_and_saves() {
        let (mut store, medium) = store();
        store.set_current_input("Buy milk");
        let id = store
            .add_current_input()
            .unwrap_or_else(|err| panic!("add should succeed: {err}"));

        assert_eq!(store.tasks().len(), 1);
        let task = &store.tasks()[0];
        assert_eq!(task.id, id);
        assert_eq!(task.text, "Buy milk");
        assert!(!task.completed);
        assert!(!task.is_editing);
        assert_eq!(store.current_input(), "");
        assert_eq!(persisted(&medium), store.tasks());
    }

    #[test]
    fn add_rejects_empty_and_sets_error() {
        let (mut store, medium) = store();
        store.set_current_input("   ");
        assert_eq!(store.add_current_input(), Err(TaskValidationError::Empty));
        assert!(store.tasks().is_empty());
        assert_eq!(store.error(), Some("task text must not be empty"));
        assert_eq!(store.current_input(), "   ");
        assert!(!medium.contains(DEFAULT_KEY));
    }

    #[test]
    fn add_enforces_length_limit() {
        let (mut store, _) = store();
        let too_long = "x".repeat(MAX_TASK_TEXT_CHARS + 1);
        assert!(matches!(
            store.add(&too_long),
            Err(TaskValidationError::TooLong { len: 101, .. })
        ));
        assert!(store.tasks().is_empty());
        assert!(store.error().is_some());

        add(&mut store, &"x".repeat(MAX_TASK_TEXT_CHARS));
        assert_eq!(store.tasks().len(), 1);
        assert!(store.error().is_none());
    }

    #[test]
    fn toggle_twice_restores_state() {
        let (mut store, medium) = store();
        let id = add(&mut store, "Walk");
        assert!(store.toggle_completed(id));
        assert_eq!(store.task(id).map(|task| task.completed), Some(true));
        assert!(persisted(&medium)[0].completed);

        assert!(store.toggle_completed(id));
        assert_eq!(store.task(id).map(|task| task.completed), Some(false));
        assert!(!persisted(&medium)[0].completed);
    }

    #[test]
    fn unknown_ids_are_no_ops() {
        let (mut store, _) = store();
        add(&mut store, "Only");
        let before = store.tasks().to_vec();
        let missing = TaskId(99);

        assert!(!store.toggle_completed(missing));
        assert!(!store.delete_task(missing));
        assert!(!store.begin_edit(missing));
        assert!(!store.cancel_edit(missing));
        assert_eq!(store.commit_edit(missing), Ok(()));
        assert_eq!(store.tasks(), before.as_slice());
    }

    #[test]
    fn delete_preserves_survivor_order_and_ids_are_not_reused() {
        let (mut store, medium) = store();
        let a = add(&mut store, "a");
        let b = add(&mut store, "b");
        let c = add(&mut store, "c");

        assert!(store.delete_task(b));
        let texts: Vec<_> = store.tasks().iter().map(|task| task.text.as_str()).collect();
        assert_eq!(texts, ["a", "c"]);
        assert_eq!(persisted(&medium).len(), 2);

        let d = add(&mut store, "d");
        assert!(d > c && d != a && d != b);
    }

    #[test]
    fn edit_flow_updates_text() {
        let (mut store, medium) = store();
        let id = add(&mut store, "Draft");
        assert!(store.begin_edit(id));
        assert_eq!(store.editing_text(), "Draft");
        assert_eq!(store.task(id).map(|task| task.is_editing), Some(true));

        store.update_edit_buffer("Final copy ");
        assert_eq!(persisted(&medium)[0].text, "Draft");

        assert_eq!(store.commit_edit(id), Ok(()));
        let task = store.task(id).unwrap_or_else(|| panic!("task {id} must exist"));
        assert_eq!(task.text, "Final copy");
        assert!(!task.is_editing);
        assert_eq!(store.editing_text(), "");
        assert_eq!(persisted(&medium)[0].text, "Final copy");
    }

    #[test]
    fn commit_edit_validates_like_add() {
        let (mut store, _) = store();
        let id = add(&mut store, "Keep me");
        store.begin_edit(id);
        store.update_edit_buffer("");

        assert_eq!(store.commit_edit(id), Err(TaskValidationError::Empty));
        let task = store.task(id).unwrap_or_else(|| panic!("task {id} must exist"));
        assert_eq!(task.text, "Keep me");
        assert!(task.is_editing);
        assert!(store.error().is_some());

        store.update_edit_buffer("y".repeat(MAX_TASK_TEXT_CHARS + 1));
        assert!(matches!(
            store.commit_edit(id),
            Err(TaskValidationError::TooLong { .. })
        ));

        store.update_edit_buffer("Fixed");
        assert_eq!(store.commit_edit(id), Ok(()));
        assert!(store.error().is_none());
    }

    #[test]
    fn cancel_edit_keeps_text() {
        let (mut store, _) = store();
        let id = add(&mut store, "Original");
        store.begin_edit(id);
        store.update_edit_buffer("Changed");
        assert!(store.cancel_edit(id));
        let task = store.task(id).unwrap_or_else(|| panic!("task {id} must exist"));
        assert_eq!(task.text, "Original");
        assert!(!task.is_editing);
        assert_eq!(store.editing_text(), "");
    }

    #[test]
    fn visible_tasks_search_then_filter() {
        let (mut store, _) = store();
        let milk = add(&mut store, "Buy milk");
        let abc = add(&mut store, "Email ABC team");
        add(&mut store, "xabcx notes");
        store.toggle_completed(abc);

        store.set_search_term("abc");
        let visible: Vec<_> = store.visible_tasks().iter().map(|task| task.id).collect();
        assert_eq!(visible.len(), 2);
        assert!(!visible.contains(&milk));

        store.set_filter(StatusFilter::Completed);
        let visible: Vec<_> = store.visible_tasks().iter().map(|task| task.id).collect();
        assert_eq!(visible, vec![abc]);
        assert_eq!(store.visible_tasks(), store.visible_tasks());

        store.set_search_term("");
        store.set_filter(StatusFilter::Incomplete);
        assert!(store.visible_tasks().iter().all(|task| !task.completed));
        assert_eq!(store.visible_tasks().len(), 2);
    }

    #[test]
    fn counts_cover_all_tasks() {
        let (mut store, _) = store();
        let a = add(&mut store, "a");
        add(&mut store, "b");
        add(&mut store, "c");
        store.toggle_completed(a);
        store.set_filter(StatusFilter::Completed);
        assert_eq!(
            store.task_counts(),
            TaskCounts {
                all: 3,
                completed: 1,
                incomplete: 2
            }
        );
    }

    #[test]
    fn clear_all_removes_persisted_key() {
        let (mut store, medium) = store();
        let last = add(&mut store, "a");
        add(&mut store, "b");
        assert!(medium.contains(DEFAULT_KEY));

        store.clear_all(ClearConfirmation::confirmed());
        assert!(store.tasks().is_empty());
        assert!(!medium.contains(DEFAULT_KEY));

        let next = add(&mut store, "after clear");
        assert!(next > last);
    }

    #[test]
    fn hydrate_continues_id_sequence() {
        let medium = MemoryStore::with_entry(
            DEFAULT_KEY,
            r#"[{"id":7,"text":"Seven","completed":true},{"id":3,"text":"Three","completed":false}]"#,
        );
        let mut store = TaskStore::hydrate(TaskPersistence::new(medium));
        assert_eq!(store.tasks().len(), 2);
        assert_eq!(add(&mut store, "Next"), TaskId(8));
    }

    #[test]
    fn hydrate_skips_ids_of_deleted_tasks() {
        let (mut store, medium) = store();
        add(&mut store, "a");
        let b = add(&mut store, "b");
        assert!(store.delete_task(b));

        let mut reopened = TaskStore::hydrate(TaskPersistence::new(medium));
        assert_eq!(add(&mut reopened, "c"), TaskId(3));
    }

    #[test]
    fn hydrate_after_clear_does_not_reuse_ids() {
        let (mut store, medium) = store();
        add(&mut store, "a");
        store.clear_all(ClearConfirmation::confirmed());
        assert!(medium.contains("tasks-last-id"));

        let mut reopened = TaskStore::hydrate(TaskPersistence::new(medium));
        assert_eq!(add(&mut reopened, "b"), TaskId(2));
    }

    #[test]
    fn add_fails_once_ids_run_out() {
        let medium = MemoryStore::with_entry(
            DEFAULT_KEY,
            r#"[{"id":18446744073709551615,"text":"Last","completed":false}]"#,
        );
        let mut store = TaskStore::hydrate(TaskPersistence::new(medium.clone()));
        assert_eq!(store.tasks().len(), 1);

        assert_eq!(store.add("One more"), Err(TaskValidationError::IdsExhausted));
        assert_eq!(store.add("Again"), Err(TaskValidationError::IdsExhausted));
        assert_eq!(store.tasks().len(), 1);
        assert_eq!(store.error(), Some("no task ids left"));
        assert_eq!(persisted(&medium).len(), 1);
    }

    #[test]
    fn hydrate_ignores_corrupt_data() {
        let medium = MemoryStore::with_entry(DEFAULT_KEY, "{oops");
        let mut store = TaskStore::hydrate(TaskPersistence::new(medium.clone()));
        assert!(store.tasks().is_empty());
        assert_eq!(add(&mut store, "Fresh"), TaskId(1));
        assert_eq!(persisted(&medium).len(), 1);
    }

    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> StoreResult<Option<String>> {
            Err(StoreError::Io(std::io::Error::other("disk unplugged")))
        }

        fn set(&self, _key: &str, _value: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk unplugged")))
        }

        fn remove(&self, _key: &str) -> StoreResult<()> {
            Err(StoreError::Io(std::io::Error::other("disk unplugged")))
        }
    }

    #[test]
    fn write_failures_do_not_roll_back_memory() {
        let mut store = TaskStore::hydrate(TaskPersistence::new(BrokenStore));
        assert!(store.tasks().is_empty());

        let id = store
            .add("Still here")
            .unwrap_or_else(|err| panic!("add should succeed: {err}"));
        assert!(store.toggle_completed(id));
        assert_eq!(store.task(id).map(|task| task.completed), Some(true));

        store.clear_all(ClearConfirmation::confirmed());
        assert!(store.tasks().is_empty());
    }
}
