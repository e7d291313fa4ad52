//! The suspension forest: parent/child dependencies between tasks.
//!
//! Multiple independent root-level tasks run concurrently; "root" is a
//! sentinel, not a task. A task's parent is set once at insertion and a
//! task is resumable exactly when its child set is empty. Cancellation
//! expands the child adjacency to a fixed point, so it costs O(subtree)
//! regardless of depth.

use hashbrown::{HashMap, HashSet};

use crate::ids::TaskId;

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum Parent {
    Root,
    Task(TaskId),
}

#[derive(Debug, Default)]
pub struct SuspensionTree {
    parent_of: HashMap<TaskId, Parent>,
    children_of: HashMap<TaskId, HashSet<TaskId>>,
}

impl SuspensionTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a task under its parent. The parent link is immutable for
    /// the task's lifetime.
    pub fn insert(&mut self, task: TaskId, parent: Parent) {
        self.parent_of.insert(task, parent);
        if let Parent::Task(p) = parent {
            self.children_of.entry(p).or_default().insert(task);
        }
    }

    pub fn parent(&self, task: TaskId) -> Option<Parent> {
        self.parent_of.get(&task).copied()
    }

    pub fn contains(&self, task: TaskId) -> bool {
        self.parent_of.contains_key(&task)
    }

    pub fn has_children(&self, task: TaskId) -> bool {
        self.children_of.contains_key(&task)
    }

    pub fn len(&self) -> usize {
        self.parent_of.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent_of.is_empty()
    }

    /// Remove a finished leaf task. Returns its parent and whether that
    /// parent's child set became empty (the signal to resume it).
    pub fn remove(&mut self, task: TaskId) -> Option<(Parent, bool)> {
        let parent = self.parent_of.remove(&task)?;
        self.children_of.remove(&task);
        let emptied = match parent {
            Parent::Task(p) => self.unlink(p, task),
            Parent::Root => false,
        };
        Some((parent, emptied))
    }

    /// Detach a task from its parent without touching the task's own
    /// subtree. Used as the first move of a cascade cancellation, before
    /// the subtree is collected and purged.
    pub fn detach_from_parent(&mut self, task: TaskId) -> Option<(Parent, bool)> {
        let parent = self.parent(task)?;
        let emptied = match parent {
            Parent::Task(p) => self.unlink(p, task),
            Parent::Root => false,
        };
        Some((parent, emptied))
    }

    /// The task and all of its transitive descendants, computed by
    /// fixed-point expansion of the child adjacency.
    pub fn subtree(&self, root: TaskId) -> Vec<TaskId> {
        let mut out = vec![root];
        let mut seen: HashSet<TaskId> = HashSet::new();
        seen.insert(root);
        let mut i = 0;
        while i < out.len() {
            if let Some(kids) = self.children_of.get(&out[i]) {
                for k in kids {
                    if seen.insert(*k) {
                        out.push(*k);
                    }
                }
            }
            i += 1;
        }
        out
    }

    /// Drop a task's own records. Does not unlink it from its parent; pair
    /// with [`SuspensionTree::detach_from_parent`] when cancelling.
    pub fn purge(&mut self, task: TaskId) {
        self.parent_of.remove(&task);
        self.children_of.remove(&task);
    }

    pub fn clear(&mut self) {
        self.parent_of.clear();
        self.children_of.clear();
    }

    fn unlink(&mut self, parent: TaskId, child: TaskId) -> bool {
        if let Some(set) = self.children_of.get_mut(&parent) {
            set.remove(&child);
            if set.is_empty() {
                self.children_of.remove(&parent);
                return true;
            }
        }
        false
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remove_reports_emptied_parent() {
        let mut tree = SuspensionTree::new();
        let (p, a, b) = (TaskId(0), TaskId(1), TaskId(2));
        tree.insert(p, Parent::Root);
        tree.insert(a, Parent::Task(p));
        tree.insert(b, Parent::Task(p));

        let (parent, emptied) = tree.remove(a).unwrap();
        assert_eq!(parent, Parent::Task(p));
        assert!(!emptied);

        let (_, emptied) = tree.remove(b).unwrap();
        assert!(emptied);
        assert!(!tree.has_children(p));
    }

    #[test]
    fn subtree_expands_to_fixed_point() {
        let mut tree = SuspensionTree::new();
        let ids: Vec<TaskId> = (0..5).map(TaskId).collect();
        tree.insert(ids[0], Parent::Root);
        tree.insert(ids[1], Parent::Task(ids[0]));
        tree.insert(ids[2], Parent::Task(ids[0]));
        tree.insert(ids[3], Parent::Task(ids[1]));
        tree.insert(ids[4], Parent::Task(ids[3]));

        let mut closure = tree.subtree(ids[0]);
        closure.sort_by_key(|t| t.0);
        assert_eq!(closure, ids);

        let partial = tree.subtree(ids[1]);
        assert_eq!(partial.len(), 3);
    }

    #[test]
    fn detach_keeps_subtree_intact() {
        let mut tree = SuspensionTree::new();
        let (p, c, g) = (TaskId(0), TaskId(1), TaskId(2));
        tree.insert(p, Parent::Root);
        tree.insert(c, Parent::Task(p));
        tree.insert(g, Parent::Task(c));

        let (parent, emptied) = tree.detach_from_parent(c).unwrap();
        assert_eq!(parent, Parent::Task(p));
        assert!(emptied);
        assert_eq!(tree.subtree(c).len(), 2);
    }
}
