use std::collections::HashSet;

/// Sink names that must never become the rotation target.
///
/// Matching is exact and case-sensitive against the name the server reports.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionSet {
    names: HashSet<String>,
}

impl ExclusionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl<S: Into<String>> FromIterator<S> for ExclusionSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            names: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_only() {
        let exclusions: ExclusionSet = ["alsa_output.usb-Yeti.analog-stereo"].into_iter().collect();

        assert!(exclusions.contains("alsa_output.usb-Yeti.analog-stereo"));
        assert!(!exclusions.contains("alsa_output.usb-yeti.analog-stereo"));
        assert!(!exclusions.contains("alsa_output.usb-Yeti"));
        assert!(!exclusions.contains("alsa_output.usb-Yeti.analog-stereo.monitor"));
    }

    #[test]
    fn test_empty_set() {
        let exclusions = ExclusionSet::new();
        assert!(exclusions.is_empty());
        assert!(!exclusions.contains(""));
    }
}
