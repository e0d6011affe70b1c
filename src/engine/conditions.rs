use std::collections::HashMap;

/// Evaluate an optional condition gate against the session's flags.
/// - `None`        => always met
/// - `"flag"`      => flag must be set true (unset reads as false)
/// - `"!flag"`     => flag must NOT be set true
pub fn condition_met(condition: Option<&str>, conditions: &HashMap<String, bool>) -> bool {
    let Some(cond) = condition else {
        return true;
    };

    if let Some(name) = cond.strip_prefix('!') {
        !conditions.get(name).copied().unwrap_or(false)
    } else {
        conditions.get(cond).copied().unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn flags(pairs: &[(&str, bool)]) -> HashMap<String, bool> {
        pairs.iter().map(|(k, v)| (k.to_string(), *v)).collect()
    }

    #[test]
    fn absent_condition_is_met() {
        assert!(condition_met(None, &flags(&[])));
    }

    #[test]
    fn unset_flag_reads_as_false() {
        let c = flags(&[]);
        assert!(!condition_met(Some("door_open"), &c));
        assert!(condition_met(Some("!door_open"), &c));
    }

    #[test]
    fn negation_inverts_a_set_flag() {
        let c = flags(&[("door_open", true)]);
        assert!(condition_met(Some("door_open"), &c));
        assert!(!condition_met(Some("!door_open"), &c));
    }

    #[test]
    fn explicit_false_behaves_like_unset() {
        let c = flags(&[("door_open", false)]);
        assert!(!condition_met(Some("door_open"), &c));
        assert!(condition_met(Some("!door_open"), &c));
    }
}
