//! Reaction tally membership and rendering rules.
//!
//! A tally slot is a configured emoji bound to a headcount bracket. The
//! engine keeps one embed field per slot in sync with who has reacted:
//! field names are `"<emoji> Players"`, field values are one display name
//! per line or the literal placeholder [`NO_PLAYERS`].
//!
//! All functions here are pure string/set manipulation; fetching messages
//! and editing embeds happens in the bot layer.

use crate::entities::ScrimEmojisModel;

/// Placeholder rendered when a slot has no members.
pub const NO_PLAYERS: &str = "No players";

/// Number of headcount slots a scrim availability embed carries.
pub const SLOT_COUNT: usize = 3;

/// One configured headcount slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TallySlot {
    /// Matching key: custom emoji id, or the literal unicode emoji
    pub key: String,
    /// The emoji exactly as stored (custom mention or unicode), used in the
    /// embed field name and when the bot seeds its own reactions
    pub raw: String,
    /// Human-readable bracket label
    pub label: &'static str,
}

impl TallySlot {
    /// The embed field name this slot owns.
    #[must_use]
    pub fn field_name(&self) -> String {
        format!("{} Players", self.raw)
    }
}

/// Extracts the matching key from a stored emoji string.
///
/// Custom emoji mentions like `<:sixteen:123456789>` (or the animated form
/// `<a:...>`) reduce to their numeric id; anything else is matched literally.
#[must_use]
pub fn emoji_key(stored: &str) -> &str {
    let inner = stored
        .strip_prefix("<a:")
        .or_else(|| stored.strip_prefix("<:"))
        .and_then(|rest| rest.strip_suffix('>'));

    if let Some(inner) = inner {
        if let Some((name, id)) = inner.split_once(':') {
            if !name.is_empty() && !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
                return id;
            }
        }
    }
    stored
}

/// Builds the slot list from a guild's emoji configuration.
///
/// Returns `None` unless all [`SLOT_COUNT`] emojis are configured - a partial
/// configuration must abort the whole update rather than tally some slots.
#[must_use]
pub fn slots_from_config(config: &ScrimEmojisModel) -> Option<[TallySlot; SLOT_COUNT]> {
    let configured = [
        (config.emoji_16.as_deref(), "16 Players"),
        (config.emoji_20.as_deref(), "20 Players"),
        (config.emoji_23.as_deref(), "23 Players"),
    ];

    let mut slots = Vec::with_capacity(SLOT_COUNT);
    for (stored, label) in configured {
        let raw = stored.filter(|value| !value.is_empty())?;
        slots.push(TallySlot {
            key: emoji_key(raw).to_string(),
            raw: raw.to_string(),
            label,
        });
    }

    slots.try_into().ok()
}

/// Finds the slot a reaction belongs to, by matching key.
/// Unconfigured emojis resolve to `None` and the event is dropped.
#[must_use]
pub fn resolve_slot<'a>(slots: &'a [TallySlot], key: &str) -> Option<&'a TallySlot> {
    slots.iter().find(|slot| slot.key == key)
}

/// Parses a rendered field value back into its member list.
#[must_use]
pub fn parse_members(value: &str) -> Vec<String> {
    if value.trim() == NO_PLAYERS {
        return Vec::new();
    }
    value
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(ToString::to_string)
        .collect()
}

/// Renders a member list as a field value: one name per line in insertion
/// order, or the placeholder when empty. No sorting is applied.
#[must_use]
pub fn render_members(members: &[String]) -> String {
    if members.is_empty() {
        NO_PLAYERS.to_string()
    } else {
        members.join("\n")
    }
}

/// Recomputes a field value with one member added. Idempotent: adding a name
/// already on the list leaves the value unchanged.
#[must_use]
pub fn add_member(value: &str, name: &str) -> String {
    let mut members = parse_members(value);
    if !members.iter().any(|member| member == name) {
        members.push(name.to_string());
    }
    render_members(&members)
}

/// Recomputes a field value with one member removed. Idempotent: removing a
/// name that is not on the list leaves the value unchanged.
#[must_use]
pub fn remove_member(value: &str, name: &str) -> String {
    let mut members = parse_members(value);
    members.retain(|member| member != name);
    render_members(&members)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(e16: &str, e20: &str, e23: &str) -> ScrimEmojisModel {
        ScrimEmojisModel {
            guild_id: "guild".to_string(),
            emoji_16: Some(e16.to_string()),
            emoji_20: Some(e20.to_string()),
            emoji_23: Some(e23.to_string()),
        }
    }

    #[test]
    fn test_emoji_key_custom_mention() {
        assert_eq!(emoji_key("<:sixteen:123456789>"), "123456789");
        assert_eq!(emoji_key("<a:spin:42>"), "42");
    }

    #[test]
    fn test_emoji_key_unicode_passthrough() {
        assert_eq!(emoji_key("🔥"), "🔥");
        // Malformed mentions are matched literally rather than mis-parsed
        assert_eq!(emoji_key("<:broken:abc>"), "<:broken:abc>");
        assert_eq!(emoji_key("<::123>"), "<::123>");
    }

    #[test]
    fn test_slots_require_complete_config() {
        let full = config("<:a:1>", "<:b:2>", "<:c:3>");
        let slots = slots_from_config(&full).expect("complete config");
        assert_eq!(slots.len(), SLOT_COUNT);
        assert_eq!(slots[0].key, "1");
        assert_eq!(slots[0].label, "16 Players");

        let mut partial = full.clone();
        partial.emoji_20 = None;
        assert!(slots_from_config(&partial).is_none());

        let mut blank = full;
        blank.emoji_23 = Some(String::new());
        assert!(slots_from_config(&blank).is_none());
    }

    #[test]
    fn test_unknown_emoji_resolves_to_none() {
        let slots = slots_from_config(&config("<:a:1>", "<:b:2>", "<:c:3>")).unwrap();
        assert!(resolve_slot(&slots, "999").is_none());
        assert!(resolve_slot(&slots, "2").is_some());
    }

    #[test]
    fn test_add_member_is_idempotent() {
        let once = add_member(NO_PLAYERS, "U");
        assert_eq!(once, "U");
        let twice = add_member(&once, "U");
        assert_eq!(twice, "U");
    }

    #[test]
    fn test_remove_member_reverts_to_placeholder() {
        let value = add_member(NO_PLAYERS, "U");
        assert_eq!(remove_member(&value, "U"), NO_PLAYERS);
    }

    #[test]
    fn test_remove_missing_member_is_noop() {
        let value = add_member(NO_PLAYERS, "U");
        assert_eq!(remove_member(&value, "V"), "U");
    }

    #[test]
    fn test_members_keep_insertion_order() {
        let mut value = NO_PLAYERS.to_string();
        for name in ["Cara", "Alex", "Brett"] {
            value = add_member(&value, name);
        }
        assert_eq!(value, "Cara\nAlex\nBrett");

        value = remove_member(&value, "Alex");
        assert_eq!(value, "Cara\nBrett");
    }

    #[test]
    fn test_field_name_uses_raw_emoji() {
        let slots = slots_from_config(&config("<:a:1>", "<:b:2>", "🔥")).unwrap();
        assert_eq!(slots[0].field_name(), "<:a:1> Players");
        assert_eq!(slots[2].field_name(), "🔥 Players");
    }
}
