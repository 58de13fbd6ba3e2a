//! User roster handling: id→name mapping and encountered-user reconciliation.

use std::collections::HashMap;

use serde_json::{json, Value};

use crate::api::RosterMember;

/// Insertion-ordered, duplicate-free collection of user ids seen during a
/// run. Seeded with the authenticated user, grown by every exported
/// conversation's membership, and consumed once at the end to build the
/// final user list.
#[derive(Debug, Default, Clone)]
pub struct EncounteredUsers {
    ids: Vec<String>,
}

impl EncounteredUsers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an id; repeats are ignored.
    pub fn insert(&mut self, id: &str) {
        if !self.ids.iter().any(|known| known == id) {
            self.ids.push(id.to_string());
        }
    }

    /// Merge another set into this one, keeping first-seen order.
    pub fn merge(&mut self, other: EncounteredUsers) {
        for id in other.ids {
            self.insert(&id);
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.iter().any(|known| known == id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Map every roster member's id to their name. Later entries win, though
/// the roster is not expected to contain duplicates.
pub fn build_id_name_map(roster: &[RosterMember]) -> HashMap<String, String> {
    roster
        .iter()
        .map(|member| (member.id.clone(), member.name.clone()))
        .collect()
}

/// Display name for a user id, or a "name unknown" label when the id is
/// not in the roster map.
pub fn display_name(names: &HashMap<String, String>, id: &str) -> String {
    names
        .get(id)
        .cloned()
        .unwrap_or_else(|| format!("{} (name unknown)", id))
}

/// Reconcile encountered ids against the roster.
///
/// Two passes: first every roster member that was encountered is emitted
/// verbatim, in roster order; then every encountered id the roster does not
/// contain (a deactivated or external user) gets a synthesized placeholder
/// record, in the order the ids were first seen. Each encountered id shows
/// up exactly once.
pub fn resolve_encountered(
    roster: &[RosterMember],
    encountered: &EncounteredUsers,
    team_id: &str,
) -> Vec<Value> {
    let mut remaining: Vec<String> = encountered.ids().to_vec();
    let mut records = Vec::with_capacity(remaining.len());

    for member in roster {
        if let Some(pos) = remaining.iter().position(|id| id == &member.id) {
            records.push(member.raw.clone());
            remaining.remove(pos);
        }
    }

    for id in remaining {
        records.push(placeholder_record(&id, team_id));
    }

    records
}

/// Synthesized record for an id referenced by a conversation but absent
/// from the roster. Deterministic from the id.
fn placeholder_record(id: &str, team_id: &str) -> Value {
    json!({
        "id": id,
        "team_id": team_id,
        "name": format!("generated-{}", id),
        "profile": {
            "first_name": "Generated",
            "last_name": id,
            "email": format!("{}@dummy.com", id),
        }
    })
}
