use std::fmt;

// ---------------------------------------------------------------------------
// AqiCategory – the six fixed US-EPA style bands
// ---------------------------------------------------------------------------

/// Air-quality band derived from an overall AQI score.
///
/// Variants are declared in severity order so the derived `Ord` follows
/// severity: `Good < Moderate < … < Hazardous`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum AqiCategory {
    Good,
    Moderate,
    UnhealthyForSensitiveGroups,
    Unhealthy,
    VeryUnhealthy,
    Hazardous,
}

/// Inclusive upper bound of every band except the open-ended last one.
const BREAKPOINTS: [(i64, AqiCategory); 5] = [
    (50, AqiCategory::Good),
    (100, AqiCategory::Moderate),
    (150, AqiCategory::UnhealthyForSensitiveGroups),
    (200, AqiCategory::Unhealthy),
    (300, AqiCategory::VeryUnhealthy),
];

impl AqiCategory {
    /// All categories in legend display order.
    pub const ALL: [AqiCategory; 6] = [
        AqiCategory::Good,
        AqiCategory::Moderate,
        AqiCategory::UnhealthyForSensitiveGroups,
        AqiCategory::Unhealthy,
        AqiCategory::VeryUnhealthy,
        AqiCategory::Hazardous,
    ];

    /// Classify an integer score.
    ///
    /// Negative scores fall through the first comparison and land in
    /// [`AqiCategory::Good`]; they are not rejected.
    pub fn from_aqi(aqi: i64) -> Self {
        BREAKPOINTS
            .iter()
            .find(|(max, _)| aqi <= *max)
            .map(|(_, cat)| *cat)
            .unwrap_or(AqiCategory::Hazardous)
    }

    pub fn label(self) -> &'static str {
        match self {
            AqiCategory::Good => "Good",
            AqiCategory::Moderate => "Moderate",
            AqiCategory::UnhealthyForSensitiveGroups => "Unhealthy for Sensitive Groups",
            AqiCategory::Unhealthy => "Unhealthy",
            AqiCategory::VeryUnhealthy => "Very Unhealthy",
            AqiCategory::Hazardous => "Hazardous",
        }
    }

    /// Display color as `#rrggbb`.
    pub fn hex(self) -> &'static str {
        match self {
            AqiCategory::Good => "#009966",
            AqiCategory::Moderate => "#ffde33",
            AqiCategory::UnhealthyForSensitiveGroups => "#ff9933",
            AqiCategory::Unhealthy => "#cc0033",
            AqiCategory::VeryUnhealthy => "#660099",
            AqiCategory::Hazardous => "#7e0023",
        }
    }
}

impl fmt::Display for AqiCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// `(label, color)` pair for a score.
pub fn category_of(aqi: i64) -> (&'static str, &'static str) {
    let cat = AqiCategory::from_aqi(aqi);
    (cat.label(), cat.hex())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn breakpoints_are_inclusive_upper_bounds() {
        assert_eq!(AqiCategory::from_aqi(0), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(50), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(51), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(100), AqiCategory::Moderate);
        assert_eq!(AqiCategory::from_aqi(101), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(AqiCategory::from_aqi(150), AqiCategory::UnhealthyForSensitiveGroups);
        assert_eq!(AqiCategory::from_aqi(151), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(200), AqiCategory::Unhealthy);
        assert_eq!(AqiCategory::from_aqi(201), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(300), AqiCategory::VeryUnhealthy);
        assert_eq!(AqiCategory::from_aqi(301), AqiCategory::Hazardous);
        assert_eq!(AqiCategory::from_aqi(i64::MAX), AqiCategory::Hazardous);
    }

    #[test]
    fn severity_never_decreases() {
        let mut prev = AqiCategory::from_aqi(0);
        for aqi in 1..=1000 {
            let cat = AqiCategory::from_aqi(aqi);
            assert!(cat >= prev, "severity dropped at {aqi}");
            assert!(AqiCategory::ALL.contains(&cat));
            prev = cat;
        }
    }

    #[test]
    fn negative_scores_are_good() {
        assert_eq!(AqiCategory::from_aqi(-1), AqiCategory::Good);
        assert_eq!(AqiCategory::from_aqi(i64::MIN), AqiCategory::Good);
    }

    #[test]
    fn pairs_match_table() {
        assert_eq!(category_of(42), ("Good", "#009966"));
        assert_eq!(category_of(120), ("Unhealthy for Sensitive Groups", "#ff9933"));
        assert_eq!(category_of(310), ("Hazardous", "#7e0023"));
    }
}
