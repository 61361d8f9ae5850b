// src/services/audience.rs
/// Provider-side segments the app publishes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Segment {
    All,
    Passengers,
    Drivers,
}

impl Segment {
    /// Unknown or missing tags fall back to everyone.
    pub fn from_tag(tag: Option<&str>) -> Self {
        match tag {
            Some("passengers") => Segment::Passengers,
            Some("drivers") => Segment::Drivers,
            _ => Segment::All,
        }
    }

    pub fn provider_name(&self) -> &'static str {
        match self {
            Segment::All => "All",
            Segment::Passengers => "Passengers",
            Segment::Drivers => "Drivers",
        }
    }
}

/// Segment names to put in `included_segments` for an audience tag.
pub fn resolve_audience(tag: Option<&str>) -> Vec<String> {
    vec![Segment::from_tag(tag).provider_name().to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_audiences() {
        assert_eq!(resolve_audience(Some("passengers")), vec!["Passengers"]);
        assert_eq!(resolve_audience(Some("drivers")), vec!["Drivers"]);
        assert_eq!(resolve_audience(Some("all")), vec!["All"]);
    }

    #[test]
    fn test_everything_else_is_all() {
        for tag in [None, Some(""), Some("admins"), Some("Drivers"), Some(" passengers")] {
            assert_eq!(resolve_audience(tag), vec!["All"], "tag {:?}", tag);
        }
    }
}
