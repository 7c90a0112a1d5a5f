use std::fmt;
use tracing::{debug, info};

use crate::audio::{DeviceRecord, DeviceRegistry};

use super::exclusion::ExclusionSet;

/// Why no rotation target exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoTargetReason {
    TooFewDevices { count: usize },
    AllExcluded { candidates: usize },
}

impl fmt::Display for NoTargetReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NoTargetReason::TooFewDevices { count } => {
                write!(f, "only {} sink(s) available", count)
            }
            NoTargetReason::AllExcluded { candidates } => {
                write!(f, "all {} other sink(s) are excluded", candidates)
            }
        }
    }
}

/// Pick the sink that follows `current_default` in discovery order, skipping excluded ones.
///
/// If `current_default` is not in the registry the scan starts from position 0.
pub fn select_next(
    registry: &DeviceRegistry,
    current_default: &str,
    exclusions: &ExclusionSet,
) -> Option<DeviceRecord> {
    let size = registry.len();
    if size < 2 {
        debug!("Registry has {} sink(s), nothing to rotate", size);
        return None;
    }

    let cur = match registry.position_of(current_default) {
        Some(position) => position,
        None => {
            debug!(
                "Default sink '{}' not in registry, starting from position 0",
                current_default
            );
            0
        }
    };

    for offset in 1..size {
        let next = (cur + offset) % size;
        let candidate = registry.get(next)?;
        if exclusions.contains(&candidate.name) {
            debug!("  Skipping excluded sink {}", candidate);
            continue;
        }

        info!("Next sink after '{}': {}", current_default, candidate);
        return Some(candidate.clone());
    }

    debug!("Every sink other than position {} is excluded", cur);
    None
}

/// Explain a `None` from [`select_next`] for the same registry.
pub fn no_target_reason(registry: &DeviceRegistry) -> NoTargetReason {
    match registry.len() {
        count @ 0..=1 => NoTargetReason::TooFewDevices { count },
        count => NoTargetReason::AllExcluded {
            candidates: count - 1,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry(names: &[&str]) -> DeviceRegistry {
        names.iter().copied().collect()
    }

    fn exclusions(names: &[&str]) -> ExclusionSet {
        names.iter().copied().collect()
    }

    #[test]
    fn test_picks_following_sink() {
        let next = select_next(&registry(&["A", "B", "C"]), "A", &ExclusionSet::new());
        assert_eq!(next.unwrap().name, "B");
    }

    #[test]
    fn test_wraps_around() {
        let next = select_next(&registry(&["A", "B", "C"]), "C", &ExclusionSet::new());
        let next = next.unwrap();
        assert_eq!(next.name, "A");
        assert_eq!(next.position, 0);
    }

    #[test]
    fn test_skips_excluded_and_wraps() {
        let next = select_next(&registry(&["A", "B", "C"]), "B", &exclusions(&["C"]));
        assert_eq!(next.unwrap().name, "A");
    }

    #[test]
    fn test_unknown_default_starts_at_zero() {
        let next = select_next(&registry(&["A", "B", "C"]), "gone", &ExclusionSet::new());
        assert_eq!(next.unwrap().name, "B");
    }

    #[test]
    fn test_single_sink_ignores_exclusions() {
        // "A" would not even be a candidate; size alone decides.
        assert!(select_next(&registry(&["A"]), "A", &exclusions(&["A"])).is_none());
        assert!(select_next(&registry(&[]), "", &ExclusionSet::new()).is_none());
    }

    #[test]
    fn test_all_excluded() {
        let reg = registry(&["A", "B", "C", "D"]);
        assert!(select_next(&reg, "A", &exclusions(&["B", "C", "D"])).is_none());
        assert_eq!(
            no_target_reason(&reg),
            NoTargetReason::AllExcluded { candidates: 3 }
        );
    }

    #[test]
    fn test_no_target_reason_for_small_registry() {
        assert_eq!(
            no_target_reason(&registry(&["A"])),
            NoTargetReason::TooFewDevices { count: 1 }
        );
    }
}
