//! Final report of a finished session.

use serde::{Deserialize, Serialize};

/// Terminal output of a session. Its presence marks the session finished.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalReport {
    /// Usually three finalists
    pub final_three_majors: Vec<String>,

    /// One narrative per finalist, index-aligned with `final_three_majors`
    #[serde(default)]
    pub final_three_majors_report: Vec<String>,

    #[serde(default)]
    pub final_recommendation: String,
}

impl FinalReport {
    /// Finalists paired with their narratives; a missing narrative yields an empty string.
    pub fn finalists(&self) -> impl Iterator<Item = (&str, &str)> {
        self.final_three_majors.iter().enumerate().map(|(i, major)| {
            let narrative = self
                .final_three_majors_report
                .get(i)
                .map_or("", String::as_str);
            (major.as_str(), narrative)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_finalists_tolerates_short_narrative_list() {
        let report = FinalReport {
            final_three_majors: vec!["CS".into(), "EE".into(), "Math".into()],
            final_three_majors_report: vec!["good fit".into()],
            final_recommendation: "CS".into(),
        };
        let finalists: Vec<_> = report.finalists().collect();
        assert_eq!(finalists, vec![("CS", "good fit"), ("EE", ""), ("Math", "")]);
    }
}
