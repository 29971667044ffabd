//! Application state and the entry points that mutate it.
//!
//! The task list owned here is the only source of truth. Display items, the
//! pending count and the persisted JSON are all projections of it: every
//! mutation saves the full list and then re-projects.

use crate::error::Result;
use crate::storage::KvStore;
use crate::task::{Task, TaskRepository};
use crate::ui::task_list::model::{self, DisplayItem, Interaction};

pub struct Controller<S: KvStore> {
    repo: TaskRepository<S>,
    tasks: Vec<Task>,
    items: Vec<DisplayItem>,
    search: String,
    pending: usize,
}

impl<S: KvStore> Controller<S> {
    /// Load the persisted list, render it and compute the pending count
    pub fn startup(repo: TaskRepository<S>) -> Result<Self> {
        let tasks = repo.load()?;
        let mut controller = Self {
            repo,
            tasks,
            items: Vec::new(),
            search: String::new(),
            pending: 0,
        };
        controller.refresh();
        tracing::info!(
            tasks = controller.tasks.len(),
            pending = controller.pending,
            "task list loaded"
        );
        Ok(controller)
    }

    pub fn tasks(&self) -> &[Task] {
        &self.tasks
    }

    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    pub fn pending(&self) -> usize {
        self.pending
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn visible_indices(&self) -> Vec<usize> {
        model::visible_indices(&self.items)
    }

    pub fn repository(&self) -> &TaskRepository<S> {
        &self.repo
    }

    /// Add the trimmed input as a new task and clear the input.
    ///
    /// Blank input is ignored and left untouched; returns whether a task
    /// was added.
    pub fn submit(&mut self, input: &mut String) -> Result<bool> {
        let text = input.trim();
        if text.is_empty() {
            return Ok(false);
        }
        self.tasks.push(Task::new(text));
        input.clear();
        self.commit()?;
        Ok(true)
    }

    /// Dispatch a click on a row sub-element.
    ///
    /// An index with no row is ignored; returns whether anything changed.
    pub fn click(&mut self, index: usize, interaction: Interaction) -> Result<bool> {
        if index >= self.tasks.len() {
            return Ok(false);
        }
        match interaction {
            Interaction::Delete => {
                let removed = self.tasks.remove(index);
                tracing::debug!(index, text = %removed.text, "deleted task");
            }
            Interaction::ToggleComplete => {
                let task = &mut self.tasks[index];
                task.toggle();
                tracing::debug!(index, completed = task.completed, "toggled task");
            }
        }
        self.commit()?;
        Ok(true)
    }

    /// Re-filter with a new search term. Nothing is persisted.
    pub fn search_changed(&mut self, term: &str) {
        self.search = term.to_string();
        model::apply_filter(&self.search, &mut self.items);
    }

    fn commit(&mut self) -> Result<()> {
        // Re-project before saving so the view matches memory even when the
        // store write fails.
        self.refresh();
        self.repo.save(&self.tasks)
    }

    fn refresh(&mut self) {
        self.items = model::render_items(&self.tasks);
        model::apply_filter(&self.search, &mut self.items);
        self.pending = model::pending_count(&self.items);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::storage::MemoryStore;
    use crate::task::STORAGE_KEY;

    fn controller() -> Controller<MemoryStore> {
        Controller::startup(TaskRepository::new(MemoryStore::new())).unwrap()
    }

    fn stored(controller: &Controller<MemoryStore>) -> Option<String> {
        controller.repository().store().get(STORAGE_KEY).unwrap()
    }

    fn add(controller: &mut Controller<MemoryStore>, text: &str) {
        let mut input = text.to_string();
        assert!(controller.submit(&mut input).unwrap());
    }

    fn assert_in_sync(controller: &Controller<MemoryStore>) {
        let persisted = controller.repository().load().unwrap();
        assert_eq!(persisted.as_slice(), controller.tasks());
        assert_eq!(controller.items().len(), controller.tasks().len());
        let expected = controller.tasks().iter().filter(|t| !t.completed).count();
        assert_eq!(controller.pending(), expected);
    }

    #[test]
    fn startup_with_empty_store() {
        let controller = controller();
        assert!(controller.tasks().is_empty());
        assert_eq!(controller.pending(), 0);
        assert_eq!(stored(&controller), None);
    }

    #[test]
    fn startup_renders_persisted_tasks() {
        let store = MemoryStore::new();
        store
            .set(
                STORAGE_KEY,
                r#"[{"text":"a","completed":true},{"text":"b","completed":false}]"#,
            )
            .unwrap();
        let controller = Controller::startup(TaskRepository::new(store)).unwrap();
        assert_eq!(controller.items().len(), 2);
        assert!(controller.items()[0].completed);
        assert_eq!(controller.pending(), 1);
    }

    #[test]
    fn submit_trims_and_clears_input() {
        let mut controller = controller();
        let mut input = "  Buy milk  ".to_string();
        assert!(controller.submit(&mut input).unwrap());
        assert!(input.is_empty());
        assert_eq!(controller.tasks(), &[Task::new("Buy milk")]);
        assert_eq!(controller.pending(), 1);
        assert_in_sync(&controller);
    }

    #[test]
    fn blank_submit_is_a_no_op() {
        let mut controller = controller();
        add(&mut controller, "keep");
        let before = stored(&controller);

        for blank in ["", "   ", "\t\n"] {
            let mut input = blank.to_string();
            assert!(!controller.submit(&mut input).unwrap());
            assert_eq!(input, blank);
        }
        assert_eq!(controller.tasks().len(), 1);
        assert_eq!(stored(&controller), before);
    }

    #[test]
    fn blank_submit_on_fresh_store_writes_nothing() {
        let mut controller = controller();
        let mut input = "  ".to_string();
        assert!(!controller.submit(&mut input).unwrap());
        assert_eq!(stored(&controller), None);
    }

    #[test]
    fn duplicates_are_allowed() {
        let mut controller = controller();
        add(&mut controller, "same");
        add(&mut controller, "same");
        assert_eq!(controller.tasks().len(), 2);
        assert_eq!(controller.pending(), 2);
    }

    #[test]
    fn toggle_twice_restores_state_and_storage() {
        let mut controller = controller();
        add(&mut controller, "Walk dog");
        let original = stored(&controller);

        assert!(controller.click(0, Interaction::ToggleComplete).unwrap());
        assert!(controller.tasks()[0].completed);
        assert_eq!(controller.pending(), 0);
        assert_ne!(stored(&controller), original);

        assert!(controller.click(0, Interaction::ToggleComplete).unwrap());
        assert!(!controller.tasks()[0].completed);
        assert_eq!(controller.pending(), 1);
        assert_eq!(stored(&controller), original);
    }

    #[test]
    fn delete_removes_from_list_and_snapshot() {
        let mut controller = controller();
        add(&mut controller, "first");
        add(&mut controller, "second");
        add(&mut controller, "third");

        assert!(controller.click(1, Interaction::Delete).unwrap());
        let texts: Vec<&str> = controller.tasks().iter().map(|t| t.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "third"]);
        assert_in_sync(&controller);

        let reloaded = controller.repository().load().unwrap();
        assert!(reloaded.iter().all(|task| task.text != "second"));
    }

    #[test]
    fn click_out_of_range_is_ignored() {
        let mut controller = controller();
        add(&mut controller, "only");
        let before = stored(&controller);

        assert!(!controller.click(1, Interaction::Delete).unwrap());
        assert!(!controller.click(7, Interaction::ToggleComplete).unwrap());
        assert_eq!(controller.tasks().len(), 1);
        assert_eq!(stored(&controller), before);
    }

    #[test]
    fn search_hides_without_persisting() {
        let mut controller = controller();
        add(&mut controller, "Buy milk");
        add(&mut controller, "Bake bread");
        let before = stored(&controller);

        controller.search_changed("MILK");
        assert_eq!(controller.visible_indices(), vec![0]);
        assert_eq!(controller.pending(), 2);
        assert_eq!(stored(&controller), before);

        controller.search_changed("");
        assert_eq!(controller.visible_indices(), vec![0, 1]);
    }

    #[test]
    fn filter_survives_mutations() {
        let mut controller = controller();
        add(&mut controller, "Buy milk");
        controller.search_changed("bread");
        assert!(controller.visible_indices().is_empty());

        add(&mut controller, "Bake bread");
        assert_eq!(controller.visible_indices(), vec![1]);

        controller.click(1, Interaction::ToggleComplete).unwrap();
        assert_eq!(controller.visible_indices(), vec![1]);
        assert_eq!(controller.pending(), 1);
    }

    #[test]
    fn pending_tracks_every_mutation() {
        let mut controller = controller();
        for text in ["a", "b", "c", "d"] {
            add(&mut controller, text);
            assert_in_sync(&controller);
        }
        controller.click(0, Interaction::ToggleComplete).unwrap();
        assert_in_sync(&controller);
        controller.click(2, Interaction::ToggleComplete).unwrap();
        assert_in_sync(&controller);
        controller.click(0, Interaction::Delete).unwrap();
        assert_in_sync(&controller);
        assert_eq!(controller.pending(), 2);
    }

    #[test]
    fn end_to_end_scenario() {
        let mut controller = controller();

        add(&mut controller, "Buy milk");
        assert_eq!(controller.pending(), 1);
        assert_eq!(
            stored(&controller).as_deref(),
            Some(r#"[{"text":"Buy milk","completed":false}]"#)
        );

        controller.click(0, Interaction::ToggleComplete).unwrap();
        assert_eq!(controller.pending(), 0);
        assert_eq!(
            stored(&controller).as_deref(),
            Some(r#"[{"text":"Buy milk","completed":true}]"#)
        );

        controller.search_changed("milk");
        assert!(controller.items()[0].visible);
        controller.search_changed("bread");
        assert!(!controller.items()[0].visible);
        assert_eq!(controller.repository().load().unwrap().len(), 1);

        controller.click(0, Interaction::Delete).unwrap();
        assert!(controller.tasks().is_empty());
        assert_eq!(stored(&controller).as_deref(), Some("[]"));
        assert_eq!(controller.pending(), 0);

        let store = MemoryStore::new();
        store.set(STORAGE_KEY, "{corrupted").unwrap();
        let reloaded = Controller::startup(TaskRepository::new(store)).unwrap();
        assert!(reloaded.tasks().is_empty());
        assert_eq!(reloaded.pending(), 0);
        assert!(!reloaded.repository().store().contains(STORAGE_KEY));
    }

    struct FailingStore;

    impl KvStore for FailingStore {
        fn get(&self, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set(&self, _key: &str, _value: &str) -> Result<()> {
            Err(Error::OperationFailed("disk full".to_string()))
        }

        fn remove(&self, _key: &str) -> Result<()> {
            Ok(())
        }
    }

    #[test]
    fn failed_save_keeps_view_consistent_with_memory() {
        let mut controller = Controller::startup(TaskRepository::new(FailingStore)).unwrap();
        let mut input = "offline".to_string();
        let err = controller.submit(&mut input).expect_err("save should fail");
        assert!(matches!(err, Error::OperationFailed(_)));
        assert_eq!(controller.tasks().len(), 1);
        assert_eq!(controller.items().len(), 1);
        assert_eq!(controller.pending(), 1);
    }
}
