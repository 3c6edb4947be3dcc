//! Keyword triage
//!
//! Classifies a free-text presentation by scanning for fixed keywords. The
//! confidence figures are constants attached to each rule, not model output.

use serde::{Deserialize, Serialize};

use crate::types::Urgency;

/// Department suggested when no specialty keyword matches
pub const GENERAL_DEPARTMENT: &str = "general";

/// Result of a triage pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriageAssessment {
    pub urgency: Urgency,
    pub confidence: f64,
    /// Descriptive tags for the matched rule
    pub indicators: Vec<String>,
    pub recommended_department: String,
}

struct UrgencyRule {
    urgency: Urgency,
    confidence: f64,
    triggers: &'static [&'static str],
    indicators: &'static [&'static str],
    department: &'static str,
}

struct DepartmentRule {
    triggers: &'static [&'static str],
    department: &'static str,
}

/// Checked in order; the first match wins
const URGENCY_RULES: &[UrgencyRule] = &[
    UrgencyRule {
        urgency: Urgency::Urgent,
        confidence: 0.95,
        triggers: &["unconscious", "severe", "chest pain", "difficulty breathing", "hemorrhage"],
        indicators: &["critical", "emergency", "immediate attention"],
        department: "emergency",
    },
    UrgencyRule {
        urgency: Urgency::High,
        confidence: 0.85,
        triggers: &["pain", "fracture", "vomiting", "bleeding"],
        indicators: &["acute", "prompt attention"],
        department: "emergency",
    },
    UrgencyRule {
        urgency: Urgency::Medium,
        confidence: 0.78,
        triggers: &["fever", "infection", "mild", "moderate"],
        indicators: &["stable", "moderate concern"],
        department: GENERAL_DEPARTMENT,
    },
];

const LOW_CONFIDENCE: f64 = 0.7;

/// Specialty overrides, checked in order after the urgency rule
const DEPARTMENT_RULES: &[DepartmentRule] = &[
    DepartmentRule {
        triggers: &["heart", "chest pain", "cardiac"],
        department: "cardiology",
    },
    DepartmentRule {
        triggers: &["bone", "fracture"],
        department: "radiology",
    },
    DepartmentRule {
        triggers: &["child", "infant"],
        department: "pediatrics",
    },
    DepartmentRule {
        triggers: &["surgery", "operation"],
        department: "surgery",
    },
];

/// Keyword-matching triage classifier
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTriage;

impl KeywordTriage {
    pub fn new() -> Self {
        Self
    }

    pub fn analyze(&self, text: &str) -> TriageAssessment {
        let text = text.to_lowercase();
        let matches = |triggers: &[&str]| triggers.iter().any(|t| text.contains(t));

        let mut assessment = match URGENCY_RULES.iter().find(|rule| matches(rule.triggers)) {
            Some(rule) => TriageAssessment {
                urgency: rule.urgency,
                confidence: rule.confidence,
                indicators: rule.indicators.iter().map(|s| s.to_string()).collect(),
                recommended_department: rule.department.to_string(),
            },
            None => TriageAssessment {
                urgency: Urgency::Low,
                confidence: LOW_CONFIDENCE,
                indicators: Vec::new(),
                recommended_department: GENERAL_DEPARTMENT.to_string(),
            },
        };

        if let Some(rule) = DEPARTMENT_RULES.iter().find(|rule| matches(rule.triggers)) {
            assessment.recommended_department = rule.department.to_string();
        }

        assessment
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::seed::SeedData;

    #[test]
    fn test_chest_pain_is_urgent_cardiology() {
        let a = KeywordTriage::new().analyze("Severe CHEST PAIN radiating to left arm");
        assert_eq!(a.urgency, Urgency::Urgent);
        assert_eq!(a.confidence, 0.95);
        assert_eq!(a.recommended_department, "cardiology");
        assert_eq!(a.indicators, vec!["critical", "emergency", "immediate attention"]);
    }

    #[test]
    fn test_fracture_is_high_radiology() {
        let a = KeywordTriage::new().analyze("Suspected fracture of the wrist");
        assert_eq!(a.urgency, Urgency::High);
        assert_eq!(a.recommended_department, "radiology");
    }

    #[test]
    fn test_fever_child_is_medium_pediatrics() {
        let a = KeywordTriage::new().analyze("Child with fever since yesterday");
        assert_eq!(a.urgency, Urgency::Medium);
        assert_eq!(a.confidence, 0.78);
        assert_eq!(a.recommended_department, "pediatrics");
    }

    #[test]
    fn test_no_keywords_is_low_general() {
        let a = KeywordTriage::new().analyze("Routine prescription renewal");
        assert_eq!(a.urgency, Urgency::Low);
        assert_eq!(a.confidence, LOW_CONFIDENCE);
        assert!(a.indicators.is_empty());
        assert_eq!(a.recommended_department, GENERAL_DEPARTMENT);
    }

    #[test]
    fn test_builtin_samples() {
        let seed = SeedData::builtin().unwrap();
        let triage = KeywordTriage::new();
        let levels: Vec<Urgency> = seed
            .triage_samples
            .iter()
            .map(|s| triage.analyze(s).urgency)
            .collect();
        assert_eq!(
            levels,
            vec![Urgency::Urgent, Urgency::Medium, Urgency::Urgent, Urgency::High, Urgency::High]
        );
    }
}
