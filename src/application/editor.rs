//! Hierarchy editing session
//!
//! Threads the current forest, its view state and the unsaved-changes flag
//! through every command. A failed command changes none of the three.

use tracing::{debug, info, instrument};

use crate::application::report::ValidationReport;
use crate::application::view_state::ViewState;
use crate::application::ApplicationResult;
use crate::domain::{
    count_by_kind, flatten_blocks, mutation, validate_with, BlockRef, Command, DeletePolicy,
    Forest, NodeCounts, NodeId, NodeKind, ValidationResult, ValidationRules,
};

/// Ids touched by a successful command.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EditOutcome {
    pub inserted: Option<NodeId>,
    pub removed: Vec<NodeId>,
}

impl EditOutcome {
    fn inserted(id: NodeId) -> Self {
        Self {
            inserted: Some(id),
            removed: Vec::new(),
        }
    }

    fn removed(ids: Vec<NodeId>) -> Self {
        Self {
            inserted: None,
            removed: ids,
        }
    }
}

#[derive(Debug, Clone)]
pub struct HierarchyEditor {
    forest: Forest,
    view: ViewState,
    dirty: bool,
    policy: DeletePolicy,
    rules: ValidationRules,
}

impl HierarchyEditor {
    /// Start from a caller-supplied seed with programs and phases expanded.
    pub fn new(seed: Forest) -> Self {
        let view = ViewState::expanded_to_phases(&seed);
        Self {
            forest: seed,
            view,
            dirty: false,
            policy: DeletePolicy::default(),
            rules: ValidationRules::default(),
        }
    }

    pub fn with_policy(mut self, policy: DeletePolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub fn forest(&self) -> &Forest {
        &self.forest
    }

    pub fn into_forest(self) -> Forest {
        self.forest
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.dirty
    }

    pub fn mark_saved(&mut self) {
        self.dirty = false;
    }

    /// Apply `command` through the matching operation below.
    pub fn apply(&mut self, command: &Command) -> ApplicationResult<EditOutcome> {
        match command {
            Command::Insert { parent_id, kind } => {
                self.insert(parent_id, *kind).map(EditOutcome::inserted)
            }
            Command::InsertRoot => self.insert_root().map(EditOutcome::inserted),
            Command::Rename { node_id, name } => {
                self.rename(node_id, name).map(|_| EditOutcome::default())
            }
            Command::Delete { node_id } => self.delete(node_id).map(EditOutcome::removed),
        }
    }

    /// Insert under `parent_id`; the parent is expanded and the new node
    /// enters rename mode.
    #[instrument(level = "debug", skip(self))]
    pub fn insert(&mut self, parent_id: &NodeId, kind: NodeKind) -> ApplicationResult<NodeId> {
        let (forest, id) = mutation::insert(&self.forest, parent_id, kind)?;
        self.view.expand(parent_id.clone());
        self.view.begin_edit(id.clone());
        self.commit(forest);
        Ok(id)
    }

    #[instrument(level = "debug", skip(self))]
    pub fn insert_root(&mut self) -> ApplicationResult<NodeId> {
        let (forest, id) = mutation::insert_root(&self.forest);
        self.view.begin_edit(id.clone());
        self.commit(forest);
        Ok(id)
    }

    /// Rename and leave rename mode.
    #[instrument(level = "debug", skip(self))]
    pub fn rename(&mut self, node_id: &NodeId, name: &str) -> ApplicationResult<()> {
        let forest = mutation::rename(&self.forest, node_id, name)?;
        self.view.finish_edit();
        self.commit(forest);
        Ok(())
    }

    /// Delete a subtree and drop all of its ids from the view state.
    #[instrument(level = "debug", skip(self))]
    pub fn delete(&mut self, node_id: &NodeId) -> ApplicationResult<Vec<NodeId>> {
        let (forest, removed) = mutation::delete_with(&self.forest, node_id, self.policy)?;
        self.view.reconcile_removed(&removed);
        self.commit(forest);
        debug!("removed {} ids", removed.len());
        Ok(removed)
    }

    fn commit(&mut self, forest: Forest) {
        self.forest = forest;
        self.dirty = true;
    }

    pub fn toggle(&mut self, node_id: &NodeId) -> bool {
        self.view.toggle(node_id)
    }

    pub fn begin_edit(&mut self, node_id: NodeId) {
        self.view.begin_edit(node_id);
    }

    /// Swap in a whole new forest (e.g. a reloaded snapshot).
    ///
    /// View state is cleared entirely and the session counts as saved.
    #[instrument(level = "debug", skip(self, forest))]
    pub fn replace_forest(&mut self, forest: Forest) {
        info!("replacing forest ({} programs)", forest.len());
        self.forest = forest;
        self.view.reset();
        self.dirty = false;
    }

    pub fn counts(&self) -> NodeCounts {
        count_by_kind(&self.forest)
    }

    pub fn blocks(&self) -> Vec<BlockRef> {
        flatten_blocks(&self.forest)
    }

    pub fn validate(&self) -> ValidationResult {
        validate_with(&self.forest, &self.rules)
    }

    pub fn report(&self) -> ValidationReport {
        ValidationReport::build(&self.forest, &self.rules)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::seed::{default_seed, SeedShape};
    use crate::application::ApplicationError;
    use crate::domain::{contains, DomainError};

    fn editor() -> HierarchyEditor {
        HierarchyEditor::new(default_seed(&SeedShape::default()))
    }

    #[test]
    fn given_seed_when_starting_then_programs_and_phases_expanded() {
        let editor = editor();
        let expanded: Vec<&str> = editor.view().expanded().map(NodeId::as_str).collect();
        assert_eq!(expanded, vec!["phase-1", "phase-2", "prog-1"]);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn given_collapsed_phase_when_inserting_then_parent_expanded_and_new_node_editing() {
        let mut editor = editor();
        let phase = NodeId::from("phase-2");
        editor.toggle(&phase);
        assert!(!editor.view().is_expanded(&phase));

        let id = editor.insert(&phase, NodeKind::Block).unwrap();

        assert!(editor.view().is_expanded(&phase));
        assert_eq!(editor.view().editing(), Some(&id));
        assert!(editor.has_unsaved_changes());
    }

    #[test]
    fn given_editing_node_when_renaming_then_edit_mode_left() {
        let mut editor = editor();
        let id = NodeId::from("block-1");
        editor.begin_edit(id.clone());
        editor.rename(&id, "Foundations").unwrap();
        assert_eq!(editor.view().editing(), None);
        assert_eq!(editor.forest()[0].children[0].children[0].name, "Foundations");
    }

    #[test]
    fn given_expanded_subtree_when_deleting_then_view_reconciled() {
        let mut editor = editor();
        editor.begin_edit(NodeId::from("block-2"));

        let removed = editor.delete(&NodeId::from("phase-1")).unwrap();

        assert_eq!(removed.len(), 5);
        assert!(!editor.view().is_expanded(&NodeId::from("phase-1")));
        assert_eq!(editor.view().editing(), None);
        for id in editor.view().expanded() {
            assert!(contains(editor.forest(), id));
        }
    }

    #[test]
    fn given_failing_command_when_applying_then_nothing_changes() {
        let mut editor = editor();
        let before_forest = editor.forest().clone();
        let before_view = editor.view().clone();

        let err = editor
            .insert(&NodeId::from("prog-1"), NodeKind::Block)
            .unwrap_err();

        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::InvalidRank { .. })
        ));
        assert_eq!(editor.forest(), &before_forest);
        assert_eq!(editor.view(), &before_view);
        assert!(!editor.has_unsaved_changes());
    }

    #[test]
    fn given_strict_policy_when_deleting_last_program_then_refused() {
        let mut editor = editor().with_policy(DeletePolicy::KeepLastProgram);
        let err = editor.delete(&NodeId::from("prog-1")).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Domain(DomainError::CannotDeleteRoot(_))
        ));
    }

    #[test]
    fn given_dirty_session_when_replacing_forest_then_state_reset() {
        let mut editor = editor();
        editor.insert_root().unwrap();
        assert!(editor.view().editing().is_some());

        editor.replace_forest(Vec::new());

        assert_eq!(editor.view(), &ViewState::default());
        assert!(!editor.has_unsaved_changes());
        assert!(!editor.validate().is_valid());
    }

    #[test]
    fn given_command_values_when_applying_then_outcome_reports_ids() {
        let mut editor = editor();
        let outcome = editor
            .apply(&Command::Insert {
                parent_id: NodeId::from("prog-1"),
                kind: NodeKind::Phase,
            })
            .unwrap();
        let phase = outcome.inserted.unwrap();

        let outcome = editor
            .apply(&Command::Delete {
                node_id: phase.clone(),
            })
            .unwrap();
        assert_eq!(outcome.removed, vec![phase]);
        assert_eq!(editor.forest(), &default_seed(&SeedShape::default()));
    }

    #[test]
    fn given_changes_when_marking_saved_then_clean() {
        let mut editor = editor();
        editor.rename(&NodeId::from("prog-1"), "MD").unwrap();
        assert!(editor.has_unsaved_changes());
        editor.mark_saved();
        assert!(!editor.has_unsaved_changes());
    }
}
