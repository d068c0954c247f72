use std::collections::{HashMap, HashSet};

use chrono::{DateTime, Duration, Utc};

use crate::models::ReadingRecord;
use crate::threads::config::ThreadingConfig;
use crate::threads::group::{GroupingOutcome, RecordError, ThreadGroup};
use crate::threads::normalize::{clean_question_text, normalize_question, NormalizedQuestion};
use crate::threads::similarity::jaccard_similarity;

// Set to true to enable verbose logging in this module
const ENABLE_LOGS: bool = true;

use crate::log_warn;

/// A valid reading plus its position in the caller's input, used for stable ties.
#[derive(Debug, Clone)]
struct Member {
    record: ReadingRecord,
    created_at: DateTime<Utc>,
    seq: usize,
}

/// The record a group is compared through during the fallback pass.
#[derive(Debug, Clone)]
struct Representative {
    question: NormalizedQuestion,
    created_at: DateTime<Utc>,
}

/// Group under construction. Members are kept in ascending (created_at, seq).
#[derive(Debug)]
struct GroupBuilder {
    key: String,
    members: Vec<Member>,
    /// At least one member reached this group through an explicit parent_id
    linked: bool,
}

impl GroupBuilder {
    fn new(key: String) -> Self {
        Self {
            key,
            members: Vec::new(),
            linked: false,
        }
    }

    /// Unlinked singleton: the only groups the fallback pass may dissolve.
    fn is_candidate(&self) -> bool {
        !self.linked && self.members.len() == 1
    }

    fn main_index(&self) -> usize {
        self.members
            .iter()
            .position(|member| member.record.id == self.key)
            .unwrap_or(0)
    }

    fn representative(&self) -> Representative {
        let main = &self.members[self.main_index()];
        Representative {
            question: normalize_question(main.record.question.as_deref()),
            created_at: main.created_at,
        }
    }

    fn insert(&mut self, member: Member) {
        let position = self
            .members
            .partition_point(|existing| (existing.created_at, existing.seq) <= (member.created_at, member.seq));
        self.members.insert(position, member);
    }

    fn finish(mut self, grouped_ids: &HashSet<String>) -> ThreadGroup {
        let main_index = self.main_index();
        let orphaned = self.linked && !grouped_ids.contains(&self.key);
        let latest_activity_at = self
            .members
            .iter()
            .map(|member| member.created_at)
            .max()
            .unwrap_or(self.members[main_index].created_at);

        let main = self.members.remove(main_index).record;
        let follow_ups = self.members.into_iter().map(|member| member.record).collect();

        ThreadGroup {
            key: self.key,
            display_question: clean_question_text(main.question.as_deref()),
            main,
            follow_ups,
            latest_activity_at,
            orphaned,
        }
    }
}

/// Main grouping function: partitions readings into threads.
///
/// Groups come back in creation order; use `order_groups` for display order.
pub fn group_readings(records: &[ReadingRecord], config: &ThreadingConfig) -> GroupingOutcome {
    // Step 1: Drop readings without a usable timestamp
    let mut skipped = Vec::new();
    let mut members: Vec<Member> = Vec::with_capacity(records.len());
    for (seq, record) in records.iter().enumerate() {
        match record.created_at {
            Some(created_at) => members.push(Member {
                record: record.clone(),
                created_at,
                seq,
            }),
            None => {
                log_warn!("skipping reading {} from threads: missing created_at", record.id);
                skipped.push(RecordError::MissingTimestamp {
                    id: record.id.clone(),
                });
            }
        }
    }

    if members.is_empty() {
        return GroupingOutcome {
            groups: Vec::new(),
            skipped,
        };
    }

    members.sort_by(|a, b| a.created_at.cmp(&b.created_at).then(a.seq.cmp(&b.seq)));
    let grouped_ids: HashSet<String> = members.iter().map(|m| m.record.id.clone()).collect();

    // Step 2: Explicit linkage (parent_id, else own id)
    let builders = group_by_key(members);

    // Step 3: Similarity + time fallback for unlinked singletons
    let builders = fallback_merge(builders, config);

    // Step 4: Pick main and follow-ups
    let groups = builders
        .into_iter()
        .map(|builder| builder.finish(&grouped_ids))
        .collect();

    GroupingOutcome { groups, skipped }
}

/// Assign every reading to the group keyed by its parent_id, or by its own id.
fn group_by_key(members: Vec<Member>) -> Vec<GroupBuilder> {
    let mut builders: Vec<GroupBuilder> = Vec::new();
    let mut index_by_key: HashMap<String, usize> = HashMap::new();

    for member in members {
        let (key, linked) = match member.record.parent_id.as_deref() {
            Some(parent_id) if !parent_id.is_empty() => (parent_id.to_string(), true),
            _ => (member.record.id.clone(), false),
        };

        let index = *index_by_key.entry(key.clone()).or_insert_with(|| {
            builders.push(GroupBuilder::new(key));
            builders.len() - 1
        });

        let builder = &mut builders[index];
        builder.linked |= linked;
        // Members arrive sorted, so push keeps the builder ordered.
        builder.members.push(member);
    }

    builders
}

/// Fold unlinked singletons into the first earlier group they resemble.
///
/// Explicit ordered scan: first match in creation order wins.
fn fallback_merge(builders: Vec<GroupBuilder>, config: &ThreadingConfig) -> Vec<GroupBuilder> {
    let (mut candidates, established): (Vec<GroupBuilder>, Vec<GroupBuilder>) =
        builders.into_iter().partition(GroupBuilder::is_candidate);

    candidates.sort_by(|a, b| {
        let a = &a.members[0];
        let b = &b.members[0];
        a.created_at.cmp(&b.created_at).then(a.seq.cmp(&b.seq))
    });

    let mut arena: Vec<(GroupBuilder, Representative)> = established
        .into_iter()
        .map(|builder| {
            let representative = builder.representative();
            (builder, representative)
        })
        .collect();

    for mut candidate in candidates {
        let member = candidate.members.remove(0);
        let question = normalize_question(member.record.question.as_deref());

        let target = arena.iter().position(|(_, representative)| {
            is_same_thread(&question, member.created_at, representative, config)
        });

        match target {
            Some(index) => arena[index].0.insert(member),
            None => {
                let representative = Representative {
                    question,
                    created_at: member.created_at,
                };
                candidate.members.push(member);
                arena.push((candidate, representative));
            }
        }
    }

    arena.into_iter().map(|(builder, _)| builder).collect()
}

fn is_same_thread(
    question: &NormalizedQuestion,
    created_at: DateTime<Utc>,
    representative: &Representative,
    config: &ThreadingConfig,
) -> bool {
    let both_blank = question.is_blank() && representative.question.is_blank();
    if both_blank {
        return config.merge_blank_questions;
    }

    // Exact text wins regardless of the time gap
    if question.text == representative.question.text {
        return true;
    }

    let blank_score = if config.merge_blank_questions { 1.0 } else { 0.0 };
    let similarity = jaccard_similarity(
        &question.tokens,
        &representative.question.tokens,
        blank_score,
    );
    if similarity >= config.strong_similarity {
        return true;
    }

    let gap = (created_at - representative.created_at).abs();
    similarity >= config.weak_similarity && gap <= Duration::seconds(config.time_window_secs)
}
