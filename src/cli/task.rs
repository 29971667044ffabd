//! Non-interactive task commands.
//!
//! Each command opens the stored list through the same controller the
//! terminal UI uses, so the persistence and counting rules are shared.

use serde::Serialize;

use crate::error::{Error, Result};
use crate::output::{emit_success, HumanOutput};
use crate::ui::task_list::model::Interaction;

use super::Context;

#[derive(Serialize)]
struct TaskEntry {
    position: usize,
    text: String,
    completed: bool,
}

#[derive(Serialize)]
struct AddReport {
    added: bool,
    text: String,
    pending: usize,
}

#[derive(Serialize)]
struct ListReport {
    tasks: Vec<TaskEntry>,
    total: usize,
    pending: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    search: Option<String>,
}

#[derive(Serialize)]
struct ChangeReport {
    position: usize,
    text: String,
    completed: bool,
    pending: usize,
}

#[derive(Serialize)]
struct CountReport {
    pending: usize,
}

#[derive(Serialize)]
struct ClearReport {
    cleared: bool,
}

pub(super) fn run_add(ctx: &Context, words: Vec<String>) -> Result<()> {
    let mut controller = ctx.open()?;
    let mut input = words.join(" ");
    let text = input.trim().to_string();
    let added = controller.submit(&mut input)?;

    let header = if added {
        format!("Added: {text}")
    } else {
        "Nothing to add".to_string()
    };
    let mut human = HumanOutput::new(header);
    human.push_summary("pending", controller.pending().to_string());

    let report = AddReport {
        added,
        text,
        pending: controller.pending(),
    };
    emit_success(ctx.options, "add", &report, Some(&human))
}

pub(super) fn run_list(ctx: &Context, search: Option<String>) -> Result<()> {
    let mut controller = ctx.open()?;
    if let Some(term) = search.as_deref() {
        controller.search_changed(term);
    }

    let tasks: Vec<TaskEntry> = controller
        .visible_indices()
        .into_iter()
        .map(|idx| {
            let task = &controller.tasks()[idx];
            TaskEntry {
                position: idx + 1,
                text: task.text.clone(),
                completed: task.completed,
            }
        })
        .collect();

    let header = if controller.tasks().is_empty() {
        "No tasks"
    } else if tasks.is_empty() {
        "No matches"
    } else {
        "Tasks"
    };
    let mut human = HumanOutput::new(header);
    for entry in &tasks {
        human.push_detail(format!(
            "{}. {} {}",
            entry.position,
            checkbox(entry.completed),
            entry.text
        ));
    }
    human.push_summary("pending", controller.pending().to_string());

    let report = ListReport {
        total: controller.tasks().len(),
        pending: controller.pending(),
        tasks,
        search: search.filter(|term| !term.trim().is_empty()),
    };
    emit_success(ctx.options, "list", &report, Some(&human))
}

pub(super) fn run_toggle(ctx: &Context, position: usize) -> Result<()> {
    let mut controller = ctx.open()?;
    let index = position_to_index(position, controller.tasks().len())?;
    controller.click(index, Interaction::ToggleComplete)?;

    let task = &controller.tasks()[index];
    let state = if task.completed { "Completed" } else { "Reopened" };
    let mut human = HumanOutput::new(format!("{state}: {}", task.text));
    human.push_summary("pending", controller.pending().to_string());

    let report = ChangeReport {
        position,
        text: task.text.clone(),
        completed: task.completed,
        pending: controller.pending(),
    };
    emit_success(ctx.options, "toggle", &report, Some(&human))
}

pub(super) fn run_delete(ctx: &Context, position: usize) -> Result<()> {
    let mut controller = ctx.open()?;
    let index = position_to_index(position, controller.tasks().len())?;
    let removed = controller.tasks()[index].clone();
    controller.click(index, Interaction::Delete)?;

    let mut human = HumanOutput::new(format!("Deleted: {}", removed.text));
    human.push_summary("pending", controller.pending().to_string());

    let report = ChangeReport {
        position,
        text: removed.text,
        completed: removed.completed,
        pending: controller.pending(),
    };
    emit_success(ctx.options, "delete", &report, Some(&human))
}

pub(super) fn run_count(ctx: &Context) -> Result<()> {
    let controller = ctx.open()?;
    let pending = controller.pending();
    let human = HumanOutput::new(pending.to_string());
    emit_success(ctx.options, "count", &CountReport { pending }, Some(&human))
}

pub(super) fn run_clear(ctx: &Context) -> Result<()> {
    let controller = ctx.open()?;
    controller.repository().clear()?;
    let human = HumanOutput::new("Cleared all tasks");
    emit_success(ctx.options, "clear", &ClearReport { cleared: true }, Some(&human))
}

fn position_to_index(position: usize, len: usize) -> Result<usize> {
    if position == 0 || position > len {
        return Err(Error::TaskNotFound { position, len });
    }
    Ok(position - 1)
}

fn checkbox(completed: bool) -> &'static str {
    if completed {
        "[x]"
    } else {
        "[ ]"
    }
}
