use crate::error::{SchemaError, ValidationError};
use crate::response::ResponseSet;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// List entry returned by the questionnaire index. Questions are not needed to pick one.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct QuestionnaireSummary {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Questionnaire {
    /// # Unique identifier for the questionnaire
    pub id: String,
    /// # Display name
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub version: String,
    /// # Questions in presentation order
    pub questions: Vec<Question>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, JsonSchema)]
pub struct Question {
    pub id: String,
    /// # Prompt shown to the user
    pub text: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    /// # Selectable values
    /// `labels[i]` describes `scale[i]`.
    pub scale: Vec<i32>,
    pub labels: Vec<String>,
}

impl Question {
    /// Label and value pairs in display order.
    pub fn options(&self) -> impl Iterator<Item = (&str, i32)> {
        self.labels.iter().map(String::as_str).zip(self.scale.iter().copied())
    }

    #[must_use]
    pub fn accepts(&self, value: i32) -> bool {
        self.scale.contains(&value)
    }

    #[must_use]
    pub fn label_for(&self, value: i32) -> Option<&str> {
        self.options().find(|(_, v)| *v == value).map(|(label, _)| label)
    }

    fn validate(&self) -> Result<(), SchemaError> {
        if self.scale.is_empty() {
            return Err(SchemaError::EmptyScale {
                question_id: self.id.clone(),
            });
        }
        if self.labels.len() != self.scale.len() {
            return Err(SchemaError::LabelMismatch {
                question_id: self.id.clone(),
                labels: self.labels.len(),
                scale: self.scale.len(),
            });
        }
        Ok(())
    }
}

impl Questionnaire {
    #[must_use]
    pub fn question(&self, question_id: &str) -> Option<&Question> {
        self.questions.iter().find(|question| question.id == question_id)
    }

    /// A questionnaire without questions cannot be assessed.
    #[must_use]
    pub fn is_assessable(&self) -> bool {
        !self.questions.is_empty()
    }

    #[must_use]
    pub fn summary(&self) -> QuestionnaireSummary {
        QuestionnaireSummary {
            id: self.id.clone(),
            name: self.name.clone(),
            description: self.description.clone(),
        }
    }

    /// Checks the invariants the flow relies on: every question has a scale, one label per scale value
    /// and a unique id.
    pub fn validate(&self) -> Result<(), SchemaError> {
        let mut seen = HashSet::new();
        for question in &self.questions {
            question.validate()?;
            if !seen.insert(question.id.as_str()) {
                return Err(SchemaError::DuplicateQuestion {
                    question_id: question.id.clone(),
                });
            }
        }
        Ok(())
    }

    /// Rejects answers to unknown questions and values outside the declared scale.
    pub fn check_scale(&self, responses: &ResponseSet) -> Result<(), ValidationError> {
        for (question_id, value) in responses {
            let question = self.question(question_id).ok_or_else(|| ValidationError::UnknownQuestion {
                question_id: question_id.clone(),
            })?;
            if !question.accepts(*value) {
                return Err(ValidationError::ValueOutOfScale {
                    question_id: question_id.clone(),
                    value: *value,
                    allowed: question.scale.clone(),
                });
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn missing_answers(&self, responses: &ResponseSet) -> Vec<&str> {
        self.questions
            .iter()
            .filter(|question| !responses.contains(&question.id))
            .map(|question| question.id.as_str())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PHQ_SNIPPET: &str = r#"{
        "id": "phq9",
        "name": "PHQ-9 Depression Screening",
        "description": "Patient Health Questionnaire-9",
        "version": "1.0",
        "questions": [
            {
                "id": "q1",
                "text": "Little interest or pleasure in doing things",
                "type": "rating",
                "scale": [0, 3, 6, 9],
                "labels": ["Not at all", "Several days", "More than half the days", "Nearly every day"]
            },
            {
                "id": "q2",
                "text": "Feeling down, depressed, or hopeless",
                "scale": [0, 3, 6, 9],
                "labels": ["Not at all", "Several days", "More than half the days", "Nearly every day"]
            }
        ]
    }"#;

    fn questionnaire() -> Questionnaire {
        serde_json::from_str(PHQ_SNIPPET).unwrap()
    }

    #[test]
    fn test_parse_and_validate() {
        let questionnaire = questionnaire();
        assert_eq!(questionnaire.questions.len(), 2);
        assert_eq!(questionnaire.questions[0].kind.as_deref(), Some("rating"));
        assert_eq!(questionnaire.questions[1].kind, None);
        assert!(questionnaire.validate().is_ok());
        assert_eq!(questionnaire.questions[0].label_for(6), Some("More than half the days"));
    }

    #[test]
    fn test_summary_ignores_questions() {
        let summary: QuestionnaireSummary = serde_json::from_str(PHQ_SNIPPET).unwrap();
        assert_eq!(summary, questionnaire().summary());
    }

    #[test]
    fn test_label_mismatch() {
        let mut questionnaire = questionnaire();
        questionnaire.questions[1].labels.pop();
        assert_eq!(
            questionnaire.validate(),
            Err(SchemaError::LabelMismatch {
                question_id: "q2".to_owned(),
                labels: 3,
                scale: 4,
            })
        );
    }

    #[test]
    fn test_duplicate_question() {
        let mut questionnaire = questionnaire();
        questionnaire.questions[1].id = "q1".to_owned();
        assert!(matches!(
            questionnaire.validate(),
            Err(SchemaError::DuplicateQuestion { question_id }) if question_id == "q1"
        ));
    }

    #[test]
    fn test_check_scale() {
        let questionnaire = questionnaire();
        let responses: ResponseSet = [("q1", 3), ("q2", 9)].into_iter().collect();
        assert!(questionnaire.check_scale(&responses).is_ok());

        let responses: ResponseSet = [("q1", 2)].into_iter().collect();
        assert_eq!(
            questionnaire.check_scale(&responses),
            Err(ValidationError::ValueOutOfScale {
                question_id: "q1".to_owned(),
                value: 2,
                allowed: vec![0, 3, 6, 9],
            })
        );

        let responses: ResponseSet = [("q7", 0)].into_iter().collect();
        assert!(matches!(
            questionnaire.check_scale(&responses),
            Err(ValidationError::UnknownQuestion { .. })
        ));
    }

    #[test]
    fn test_missing_answers() {
        let questionnaire = questionnaire();
        let responses: ResponseSet = [("q2", 0)].into_iter().collect();
        assert_eq!(questionnaire.missing_answers(&responses), vec!["q1"]);
    }
}
