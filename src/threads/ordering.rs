use crate::threads::group::ThreadGroup;

/// Sort threads newest activity first; equal activity falls back to key order.
pub fn order_groups(mut groups: Vec<ThreadGroup>) -> Vec<ThreadGroup> {
    groups.sort_by(|a, b| {
        b.latest_activity_at
            .cmp(&a.latest_activity_at)
            .then_with(|| a.key.cmp(&b.key))
    });
    groups
}
