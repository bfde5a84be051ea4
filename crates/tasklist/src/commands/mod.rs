use std::io::Write;

use anyhow::{Result, bail};
use tasklist_app::{ClearConfirmation, TaskStore};
use tasklist_core::{StatusFilter, Task, TaskId};
use tasklist_store::KeyValueStore;

use crate::{Command, LsFormat};

/// Execute a parsed command against a hydrated store, writing results to `out`.
pub fn run<S, W>(command: Command, store: &mut TaskStore<S>, out: &mut W) -> Result<()>
where
    S: KeyValueStore,
    W: Write,
{
    match command {
        Command::Add { text } => {
            store.set_current_input(text);
            let id = store.add_current_input()?;
            writeln!(out, "added task {id}")?;
        }
        Command::Toggle { id } => {
            if !store.toggle_completed(id) {
                bail!(missing(id));
            }
            let task = existing(store, id)?;
            let verb = if task.completed { "completed" } else { "reopened" };
            writeln!(out, "{verb} task {id}: {}", task.text)?;
        }
        Command::Rm { id } => {
            if !store.delete_task(id) {
                bail!(missing(id));
            }
            writeln!(out, "deleted task {id}")?;
        }
        Command::Edit { id, text } => {
            if !store.begin_edit(id) {
                bail!(missing(id));
            }
            store.update_edit_buffer(text);
            store.commit_edit(id)?;
            let task = existing(store, id)?;
            writeln!(out, "updated task {id}: {}", task.text)?;
        }
        Command::Ls {
            filter,
            search,
            format,
        } => {
            store.set_filter(filter);
            store.set_search_term(search.unwrap_or_default());
            let filtered = !store.search_term().is_empty() || filter != StatusFilter::All;
            let tasks = store.visible_tasks();
            match format {
                LsFormat::Json => writeln!(out, "{}", serde_json::to_string_pretty(&tasks)?)?,
                LsFormat::Table if tasks.is_empty() => {
                    if filtered {
                        writeln!(out, "No tasks matched the provided filters")?;
                    } else {
                        writeln!(out, "No tasks found")?;
                    }
                }
                LsFormat::Table => render_task_table(out, &tasks)?,
            }
        }
        Command::Counts => {
            let counts = store.task_counts();
            writeln!(
                out,
                "all: {} | completed: {} | incomplete: {}",
                counts.all, counts.completed, counts.incomplete
            )?;
        }
        Command::Clear { yes } => {
            if !yes {
                bail!("refusing to delete every task without --yes");
            }
            let removed = store.tasks().len();
            store.clear_all(ClearConfirmation::confirmed());
            writeln!(out, "cleared {removed} tasks")?;
        }
    }

    Ok(())
}

fn render_task_table<W: Write>(out: &mut W, tasks: &[&Task]) -> Result<()> {
    writeln!(out, "ID | Done | Text")?;
    writeln!(out, "-- | ---- | ----")?;
    for task in tasks {
        let done = if task.completed { "x" } else { " " };
        writeln!(out, "{} | [{done}] | {}", task.id, task.text)?;
    }
    Ok(())
}

fn missing(id: TaskId) -> String {
    format!("no task with id {id}")
}

fn existing<S: KeyValueStore>(store: &TaskStore<S>, id: TaskId) -> Result<&Task> {
    store.task(id).ok_or_else(|| anyhow::anyhow!(missing(id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tasklist_store::{DEFAULT_KEY, MemoryStore, TaskPersistence};

    fn store() -> TaskStore<MemoryStore> {
        TaskStore::hydrate(TaskPersistence::new(MemoryStore::new()))
    }

    fn exec(store: &mut TaskStore<MemoryStore>, command: Command) -> Result<String> {
        let mut out = Vec::new();
        run(command, store, &mut out)?;
        Ok(String::from_utf8(out)?)
    }

    fn add(store: &mut TaskStore<MemoryStore>, text: &str) -> Result<String> {
        exec(store, Command::Add { text: text.into() })
    }

    fn ls(filter: StatusFilter, search: Option<&str>, format: LsFormat) -> Command {
        Command::Ls {
            filter,
            search: search.map(str::to_owned),
            format,
        }
    }

    #[test]
    fn add_and_list_table() -> Result<()> {
        let mut store = store();
        assert_eq!(add(&mut store, "Buy milk")?, "added task 1\n");
        add(&mut store, "Walk dog")?;
        exec(&mut store, Command::Toggle { id: TaskId(2) })?;

        let output = exec(&mut store, ls(StatusFilter::All, None, LsFormat::Table))?;
        assert_eq!(
            output,
            "ID | Done | Text\n-- | ---- | ----\n1 | [ ] | Buy milk\n2 | [x] | Walk dog\n"
        );
        Ok(())
    }

    #[test]
    fn add_rejects_blank_text() -> Result<()> {
        let mut store = store();
        let Err(err) = add(&mut store, "  ") else {
            panic!("blank text should fail");
        };
        assert_eq!(err.to_string(), "task text must not be empty");
        assert!(store.tasks().is_empty());
        Ok(())
    }

    #[test]
    fn ls_reports_empty_results() -> Result<()> {
        let mut store = store();
        assert_eq!(
            exec(&mut store, ls(StatusFilter::All, None, LsFormat::Table))?,
            "No tasks found\n"
        );
        add(&mut store, "Buy milk")?;
        assert_eq!(
            exec(&mut store, ls(StatusFilter::Completed, None, LsFormat::Table))?,
            "No tasks matched the provided filters\n"
        );
        Ok(())
    }

    #[test]
    fn ls_json_applies_search() -> Result<()> {
        let mut store = store();
        add(&mut store, "Buy milk")?;
        add(&mut store, "Call mom")?;
        let output = exec(&mut store, ls(StatusFilter::All, Some("MILK"), LsFormat::Json))?;
        let value: serde_json::Value = serde_json::from_str(&output)?;
        assert_eq!(
            value,
            serde_json::json!([{ "id": 1, "text": "Buy milk", "completed": false }])
        );
        Ok(())
    }

    #[test]
    fn toggle_edit_and_remove_report_missing_ids() -> Result<()> {
        let mut store = store();
        add(&mut store, "Draft")?;

        assert_eq!(
            exec(&mut store, Command::Toggle { id: TaskId(1) })?,
            "completed task 1: Draft\n"
        );
        assert_eq!(
            exec(
                &mut store,
                Command::Edit {
                    id: TaskId(1),
                    text: "Final".into()
                }
            )?,
            "updated task 1: Final\n"
        );
        assert_eq!(exec(&mut store, Command::Rm { id: TaskId(1) })?, "deleted task 1\n");

        for command in [
            Command::Toggle { id: TaskId(1) },
            Command::Rm { id: TaskId(1) },
            Command::Edit {
                id: TaskId(1),
                text: "x".into(),
            },
        ] {
            let Err(err) = exec(&mut store, command) else {
                panic!("missing id should fail");
            };
            assert_eq!(err.to_string(), "no task with id 1");
        }
        Ok(())
    }

    #[test]
    fn counts_summarize_list() -> Result<()> {
        let mut store = store();
        add(&mut store, "a")?;
        add(&mut store, "b")?;
        exec(&mut store, Command::Toggle { id: TaskId(1) })?;
        assert_eq!(
            exec(&mut store, Command::Counts)?,
            "all: 2 | completed: 1 | incomplete: 1\n"
        );
        Ok(())
    }

    #[test]
    fn clear_requires_confirmation() -> Result<()> {
        let mut store = store();
        add(&mut store, "a")?;

        assert!(exec(&mut store, Command::Clear { yes: false }).is_err());
        assert_eq!(store.tasks().len(), 1);

        assert_eq!(exec(&mut store, Command::Clear { yes: true })?, "cleared 1 tasks\n");
        assert!(store.tasks().is_empty());
        assert!(!store.persistence().store().contains(DEFAULT_KEY));
        Ok(())
    }
}
