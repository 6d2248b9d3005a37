use kokoro_model::error::ValidationError;
use kokoro_model::questionnaire::Questionnaire;
use kokoro_model::response::ResponseSet;

/// What a response set has to satisfy before it is sent.
///
/// The default accepts partial answers and values outside the declared scale, leaving both
/// decisions to the server.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionPolicy {
    /// Every question must have an answer.
    pub require_complete: bool,
    /// Every answer must be one of the question's scale values.
    pub enforce_scale: bool,
}

impl SubmissionPolicy {
    pub const LENIENT: Self = Self {
        require_complete: false,
        enforce_scale: false,
    };

    pub const STRICT: Self = Self {
        require_complete: true,
        enforce_scale: true,
    };

    pub fn check(&self, questionnaire: &Questionnaire, responses: &ResponseSet) -> Result<(), ValidationError> {
        if self.enforce_scale {
            questionnaire.check_scale(responses)?;
        }
        if self.require_complete {
            let missing = questionnaire.missing_answers(responses);
            if !missing.is_empty() {
                return Err(ValidationError::Incomplete {
                    missing: missing.into_iter().map(str::to_owned).collect(),
                });
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokoro_model::questionnaire::Question;

    fn questionnaire() -> Questionnaire {
        let question = |id: &str| Question {
            id: id.to_owned(),
            text: format!("Question {id}"),
            kind: None,
            scale: vec![0, 1, 2, 3],
            labels: vec!["never".into(), "sometimes".into(), "often".into(), "always".into()],
        };
        Questionnaire {
            id: "gad2".to_owned(),
            name: "GAD-2".to_owned(),
            description: String::new(),
            version: String::new(),
            questions: vec![question("g1"), question("g2")],
        }
    }

    #[test]
    fn test_lenient_accepts_anything() {
        let responses: ResponseSet = [("g1", 17)].into_iter().collect();
        assert!(SubmissionPolicy::LENIENT.check(&questionnaire(), &responses).is_ok());
        assert!(SubmissionPolicy::default().check(&questionnaire(), &ResponseSet::new()).is_ok());
    }

    #[test]
    fn test_require_complete() {
        let policy = SubmissionPolicy {
            require_complete: true,
            enforce_scale: false,
        };
        let responses: ResponseSet = [("g2", 1)].into_iter().collect();
        assert_eq!(
            policy.check(&questionnaire(), &responses),
            Err(ValidationError::Incomplete {
                missing: vec!["g1".to_owned()]
            })
        );
    }

    #[test]
    fn test_enforce_scale() {
        let policy = SubmissionPolicy {
            require_complete: false,
            enforce_scale: true,
        };
        let responses: ResponseSet = [("g1", 4)].into_iter().collect();
        assert!(matches!(
            policy.check(&questionnaire(), &responses),
            Err(ValidationError::ValueOutOfScale { value: 4, .. })
        ));
    }

    #[test]
    fn test_strict_reports_scale_before_completeness() {
        let responses: ResponseSet = [("g1", 9)].into_iter().collect();
        assert!(matches!(
            SubmissionPolicy::STRICT.check(&questionnaire(), &responses),
            Err(ValidationError::ValueOutOfScale { .. })
        ));
    }
}
