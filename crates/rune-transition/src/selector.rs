//! Picks the transition definition that governs a property.

use crate::definition::{PropertyName, TransitionDefinition};

/// Select the definition for `property` from a node's current list.
///
/// Later entries override earlier ones, and `all` matches every property,
/// so the last matching entry in declaration order wins.
pub fn select_definition<'a>(
    definitions: &'a [TransitionDefinition],
    property: &PropertyName,
) -> Option<&'a TransitionDefinition> {
    definitions
        .iter()
        .rev()
        .find(|definition| definition.applies_to(property))
}

/// Check if any definition in the list applies to `property`.
pub fn has_transition_for(definitions: &[TransitionDefinition], property: &PropertyName) -> bool {
    select_definition(definitions, property).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::time::TimeSpan;

    fn def(property: &str, millis: i64) -> TransitionDefinition {
        TransitionDefinition::new(property, TimeSpan::from_millis(millis))
    }

    #[test]
    fn test_last_match_wins() {
        let defs = vec![def("opacity", 100), def("width", 200), def("opacity", 300)];
        let selected = select_definition(&defs, &PropertyName::new("opacity")).unwrap();
        assert_eq!(selected.duration(), TimeSpan::from_millis(300));
    }

    #[test]
    fn test_all_overrides_earlier_specific() {
        let defs = vec![def("opacity", 100), def("ALL", 500)];
        let selected = select_definition(&defs, &PropertyName::new("opacity")).unwrap();
        assert!(selected.property().is_all());
    }

    #[test]
    fn test_specific_overrides_earlier_all() {
        let defs = vec![def("all", 500), def("Opacity", 100)];
        let selected = select_definition(&defs, &PropertyName::new("OPACITY")).unwrap();
        assert_eq!(selected.duration(), TimeSpan::from_millis(100));

        let other = select_definition(&defs, &PropertyName::new("width")).unwrap();
        assert_eq!(other.duration(), TimeSpan::from_millis(500));
    }

    #[test]
    fn test_no_match() {
        let defs = vec![def("opacity", 100)];
        assert!(select_definition(&defs, &PropertyName::new("width")).is_none());
        assert!(!has_transition_for(&defs, &PropertyName::new("width")));
        assert!(!has_transition_for(&[], &PropertyName::new("opacity")));
    }

    #[test]
    fn test_zero_duration_still_selected() {
        // a later zero-duration entry disables the earlier transition
        let defs = vec![def("opacity", 100), def("opacity", 0)];
        let selected = select_definition(&defs, &PropertyName::new("opacity")).unwrap();
        assert!(!selected.is_animated());
    }
}
