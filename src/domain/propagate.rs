//! Completion propagation
//!
//! After a task's completion flag flips to true, determine which tasks
//! became unblocked as a side effect. Blocking is defined per-task over
//! its direct prerequisite list, so only one-hop dependents are
//! candidates; multi-hop chains unblock incrementally as each level
//! completes.

use std::collections::HashMap;

use super::id::TaskId;
use super::task::Task;

/// Returns the IDs of tasks that are newly unblocked now that
/// `changed_id` is complete.
///
/// A candidate is any incomplete task directly listing `changed_id` as a
/// prerequisite whose remaining prerequisites are all complete, that is,
/// `changed_id` was its last blocker. Never fails; unknown IDs or an
/// incomplete `changed_id` simply yield an empty result.
pub fn newly_unblocked(changed_id: &TaskId, tasks: &HashMap<TaskId, Task>) -> Vec<TaskId> {
    let changed_is_complete = tasks.get(changed_id).map(|t| t.completed).unwrap_or(false);
    if !changed_is_complete {
        return Vec::new();
    }

    let mut unblocked: Vec<TaskId> = tasks
        .values()
        .filter(|t| !t.completed && t.prerequisites.contains(changed_id))
        .filter(|t| !t.is_blocked(tasks))
        .map(|t| t.id.clone())
        .collect();

    unblocked.sort();
    unblocked
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn make_task(description: &str) -> Task {
        Task::new(TaskId::new(description, Utc::now()), description)
    }

    fn collect(tasks: Vec<Task>) -> HashMap<TaskId, Task> {
        tasks.into_iter().map(|t| (t.id.clone(), t)).collect()
    }

    #[test]
    fn sole_prerequisite_unblocks_dependent() {
        let mut prereq = make_task("Gather data");
        let mut dependent = make_task("Write report");
        dependent.prerequisites.insert(prereq.id.clone());
        prereq.complete();

        let changed = prereq.id.clone();
        let expected = dependent.id.clone();
        let tasks = collect(vec![prereq, dependent]);

        assert_eq!(newly_unblocked(&changed, &tasks), vec![expected]);
    }

    #[test]
    fn dependent_with_other_incomplete_prerequisite_stays_blocked() {
        let mut done = make_task("Gather data");
        let pending = make_task("Review outline");
        let mut dependent = make_task("Write report");
        dependent.prerequisites.insert(done.id.clone());
        dependent.prerequisites.insert(pending.id.clone());
        done.complete();

        let changed = done.id.clone();
        let tasks = collect(vec![done, pending, dependent]);

        assert!(newly_unblocked(&changed, &tasks).is_empty());
    }

    #[test]
    fn propagation_is_one_hop_only() {
        // a -> b -> c: completing a unblocks b but says nothing about c
        let mut a = make_task("A");
        let mut b = make_task("B");
        let mut c = make_task("C");
        b.prerequisites.insert(a.id.clone());
        c.prerequisites.insert(b.id.clone());
        a.complete();

        let changed = a.id.clone();
        let expected = b.id.clone();
        let tasks = collect(vec![a, b, c]);

        assert_eq!(newly_unblocked(&changed, &tasks), vec![expected]);
    }

    #[test]
    fn completed_dependents_are_not_candidates() {
        let mut prereq = make_task("Gather data");
        let mut dependent = make_task("Write report");
        dependent.prerequisites.insert(prereq.id.clone());
        prereq.complete();
        dependent.complete();

        let changed = prereq.id.clone();
        let tasks = collect(vec![prereq, dependent]);

        assert!(newly_unblocked(&changed, &tasks).is_empty());
    }

    #[test]
    fn incomplete_changed_task_yields_nothing() {
        let prereq = make_task("Gather data");
        let mut dependent = make_task("Write report");
        dependent.prerequisites.insert(prereq.id.clone());

        let changed = prereq.id.clone();
        let tasks = collect(vec![prereq, dependent]);

        assert!(newly_unblocked(&changed, &tasks).is_empty());
    }

    #[test]
    fn unknown_changed_id_yields_nothing() {
        let tasks = collect(vec![make_task("Only task")]);
        let ghost = TaskId::new("Ghost", Utc::now());
        assert!(newly_unblocked(&ghost, &tasks).is_empty());
    }

    #[test]
    fn multiple_dependents_unblock_together() {
        let mut prereq = make_task("Shared prerequisite");
        let mut dep1 = make_task("Dependent one");
        let mut dep2 = make_task("Dependent two");
        dep1.prerequisites.insert(prereq.id.clone());
        dep2.prerequisites.insert(prereq.id.clone());
        prereq.complete();

        let changed = prereq.id.clone();
        let mut expected = vec![dep1.id.clone(), dep2.id.clone()];
        expected.sort();
        let tasks = collect(vec![prereq, dep1, dep2]);

        assert_eq!(newly_unblocked(&changed, &tasks), expected);
    }
}
