use serde::Serialize;

/// A screen of the booking wizard.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Step {
    #[default]
    Intro,
    Zipcode,
    Location,
    Schedule,
    Vehicle,
}

impl Step {
    /// Transition table: each step advances to the one after it and goes back
    /// to the one before it.
    pub const ORDER: [Step; 5] = [
        Step::Intro,
        Step::Zipcode,
        Step::Location,
        Step::Schedule,
        Step::Vehicle,
    ];

    fn index(self) -> usize {
        match self {
            Step::Intro => 0,
            Step::Zipcode => 1,
            Step::Location => 2,
            Step::Schedule => 3,
            Step::Vehicle => 4,
        }
    }

    /// The step after this one, or `None` on the final step.
    #[must_use]
    pub fn next(self) -> Option<Step> {
        Self::ORDER.get(self.index() + 1).copied()
    }

    /// The step before this one, or `None` on the intro.
    #[must_use]
    pub fn previous(self) -> Option<Step> {
        self.index()
            .checked_sub(1)
            .and_then(|i| Self::ORDER.get(i).copied())
    }

    /// Completing the final step submits the booking.
    #[must_use]
    pub fn is_final(self) -> bool {
        self.next().is_none()
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Step::Intro => "intro",
            Step::Zipcode => "zipcode",
            Step::Location => "location",
            Step::Schedule => "schedule",
            Step::Vehicle => "vehicle",
        }
    }
}

impl std::fmt::Display for Step {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn order_walks_forward_and_back() {
        assert_eq!(Step::Intro.next(), Some(Step::Zipcode));
        assert_eq!(Step::Location.next(), Some(Step::Schedule));
        assert_eq!(Step::Schedule.next(), Some(Step::Vehicle));
        assert_eq!(Step::Vehicle.next(), None);

        assert_eq!(Step::Vehicle.previous(), Some(Step::Schedule));
        assert_eq!(Step::Zipcode.previous(), Some(Step::Intro));
        assert_eq!(Step::Intro.previous(), None);
    }

    #[test]
    fn only_vehicle_is_final() {
        let finals: Vec<Step> = Step::ORDER.into_iter().filter(|s| s.is_final()).collect();
        assert_eq!(finals, vec![Step::Vehicle]);
    }

    #[test]
    fn index_matches_order_table() {
        for (i, step) in Step::ORDER.into_iter().enumerate() {
            assert_eq!(step.index(), i, "{step}");
        }
    }
}
