//! Participant list codec.
//!
//! Confirmed players for a schedule event are persisted on the event row as a
//! single comma-joined string of Discord user ids. The on-disk convention:
//! an empty set is stored as NULL, never as the empty string, but both
//! deserialize to the empty set for compatibility with rows written before
//! that rule was enforced.

/// Parses a stored participants column into the list of user ids.
///
/// `None` and `""` both produce an empty list; stray empty segments from
/// malformed rows (e.g. `"111,,222"`) are dropped.
#[must_use]
pub fn parse(stored: Option<&str>) -> Vec<String> {
    stored
        .unwrap_or_default()
        .split(',')
        .filter(|id| !id.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Serializes a participant list back into its column value.
///
/// An empty list always serializes to `None` so that "nobody confirmed" and
/// "not yet announced" stay distinguishable from a genuine empty string.
#[must_use]
pub fn serialize(ids: &[String]) -> Option<String> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(","))
    }
}

/// Adds a user id if not already present. Returns whether the list changed,
/// so duplicate deliveries of the same reaction event stay no-ops.
pub fn add(ids: &mut Vec<String>, user_id: &str) -> bool {
    if ids.iter().any(|id| id == user_id) {
        false
    } else {
        ids.push(user_id.to_string());
        true
    }
}

/// Removes a user id if present. Returns whether the list changed.
pub fn remove(ids: &mut Vec<String>, user_id: &str) -> bool {
    let before = ids.len();
    ids.retain(|id| id != user_id);
    ids.len() != before
}

/// Renders a participant list as an embed field value: one `<@id>` mention
/// per line in stored order, or the placeholder when empty.
#[must_use]
pub fn render_mentions(ids: &[String]) -> String {
    if ids.is_empty() {
        crate::core::tally::NO_PLAYERS.to_string()
    } else {
        ids.iter()
            .map(|id| format!("<@{id}>"))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_empty() {
        let ids = parse(None);
        assert!(ids.is_empty());
        assert_eq!(serialize(&ids), None);

        // Legacy rows stored "" instead of NULL; both mean the empty set
        assert!(parse(Some("")).is_empty());
    }

    #[test]
    fn test_round_trip_two_players() {
        let ids = vec!["111".to_string(), "222".to_string()];
        let stored = serialize(&ids);
        assert_eq!(stored.as_deref(), Some("111,222"));
        assert_eq!(parse(stored.as_deref()), ids);
    }

    #[test]
    fn test_add_is_idempotent() {
        let mut ids = Vec::new();
        assert!(add(&mut ids, "111"));
        assert!(!add(&mut ids, "111"));
        assert_eq!(ids, vec!["111".to_string()]);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut ids = vec!["111".to_string()];
        assert!(!remove(&mut ids, "999"));
        assert_eq!(ids, vec!["111".to_string()]);

        assert!(remove(&mut ids, "111"));
        assert!(ids.is_empty());
    }

    #[test]
    fn test_parse_drops_empty_segments() {
        assert_eq!(
            parse(Some("111,,222")),
            vec!["111".to_string(), "222".to_string()]
        );
    }

    #[test]
    fn test_render_mentions() {
        assert_eq!(render_mentions(&[]), crate::core::tally::NO_PLAYERS);
        let ids = vec!["111".to_string(), "222".to_string()];
        assert_eq!(render_mentions(&ids), "<@111>\n<@222>");
    }
}
