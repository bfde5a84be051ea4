//! Reducer-style entry point over [`TaskStore`].

use tasklist_core::{StatusFilter, TaskId, TaskValidationError};
use tasklist_store::KeyValueStore;

use crate::task_store::{ClearConfirmation, TaskStore};

/// Every user action the store understands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskAction {
    /// Replace the pending input text.
    SetInput(String),
    /// Add a task with the given text.
    Add(String),
    /// Add the pending input text as a task.
    SubmitInput,
    /// Flip completion of a task.
    Toggle(TaskId),
    /// Remove a task.
    Delete(TaskId),
    /// Enter edit mode for a task.
    BeginEdit(TaskId),
    /// Replace the edit buffer.
    UpdateEditBuffer(String),
    /// Save the edit buffer into a task.
    CommitEdit(TaskId),
    /// Leave edit mode without saving.
    CancelEdit(TaskId),
    /// Change the status filter.
    SetFilter(StatusFilter),
    /// Change the search term.
    SetSearchTerm(String),
    /// Remove every task after confirmation.
    ClearAll(ClearConfirmation),
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Apply `action` to the store.
    ///
    /// # Errors
    /// Returns validation failures from [`TaskAction::Add`],
    /// [`TaskAction::SubmitInput`] and [`TaskAction::CommitEdit`].
    pub fn dispatch(&mut self, action: TaskAction) -> Result<(), TaskValidationError> {
        match action {
            TaskAction::SetInput(text) => self.set_current_input(text),
            TaskAction::Add(text) => {
                self.add(&text)?;
            }
            TaskAction::SubmitInput => {
                self.add_current_input()?;
            }
            TaskAction::Toggle(id) => {
                self.toggle_completed(id);
            }
            TaskAction::Delete(id) => {
                self.delete_task(id);
            }
            TaskAction::BeginEdit(id) => {
                self.begin_edit(id);
            }
            TaskAction::UpdateEditBuffer(text) => self.update_edit_buffer(text),
            TaskAction::CommitEdit(id) => self.commit_edit(id)?,
            TaskAction::CancelEdit(id) => {
                self.cancel_edit(id);
            }
            TaskAction::SetFilter(filter) => self.set_filter(filter),
            TaskAction::SetSearchTerm(term) => self.set_search_term(term),
            TaskAction::ClearAll(confirmation) => self.clear_all(confirmation),
        }
        Ok(())
    }
}
