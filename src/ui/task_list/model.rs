use crate::task::Task;

const DELETE_LABEL_PREFIX: &str = "Delete task: ";

/// What a click on a row sub-element does
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Interaction {
    ToggleComplete,
    Delete,
}

/// Interactive sub-element of a row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Target {
    pub interaction: Interaction,
    pub label: String,
}

/// Display representation of one task
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayItem {
    pub text_label: Target,
    pub delete_trigger: Target,
    pub completed: bool,
    pub visible: bool,
}

impl DisplayItem {
    pub fn text(&self) -> &str {
        &self.text_label.label
    }

    /// Accessible description of the delete trigger
    pub fn delete_label(&self) -> &str {
        &self.delete_trigger.label
    }

    pub fn target(&self, interaction: Interaction) -> &Target {
        match interaction {
            Interaction::ToggleComplete => &self.text_label,
            Interaction::Delete => &self.delete_trigger,
        }
    }
}

pub fn create_display_item(text: &str, completed: bool) -> DisplayItem {
    DisplayItem {
        text_label: Target {
            interaction: Interaction::ToggleComplete,
            label: text.to_string(),
        },
        delete_trigger: Target {
            interaction: Interaction::Delete,
            label: format!("{DELETE_LABEL_PREFIX}{text}"),
        },
        completed,
        visible: true,
    }
}

pub fn render_items(tasks: &[Task]) -> Vec<DisplayItem> {
    tasks
        .iter()
        .map(|task| create_display_item(&task.text, task.completed))
        .collect()
}

pub fn pending_count(items: &[DisplayItem]) -> usize {
    items.iter().filter(|item| !item.completed).count()
}

pub fn normalize_search(value: &str) -> String {
    value.trim().to_lowercase()
}

pub fn matches_search(text: &str, term: &str) -> bool {
    let term = normalize_search(term);
    if term.is_empty() {
        return true;
    }
    text.to_lowercase().contains(&term)
}

/// Set visibility of every item from the search term
pub fn apply_filter(term: &str, items: &mut [DisplayItem]) {
    for item in items.iter_mut() {
        item.visible = matches_search(item.text(), term);
    }
}

pub fn visible_indices(items: &[DisplayItem]) -> Vec<usize> {
    items
        .iter()
        .enumerate()
        .filter(|(_, item)| item.visible)
        .map(|(idx, _)| idx)
        .collect()
}
