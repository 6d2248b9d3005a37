use kokoro_model::response::ResponseSet;

use crate::collector::error::CollectError;

pub mod error;

/// Gathers answers while a questionnaire is being filled in.
///
/// Recording is last-write-wins and deliberately unchecked: whether a value belongs to the
/// question's scale, or whether every question was answered, is decided at submission time by the
/// [`SubmissionPolicy`](crate::flow::policy::SubmissionPolicy).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseCollector {
    responses: ResponseSet,
}

impl ResponseCollector {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses `raw` as a scale value and stores it for `question_id`, replacing an earlier answer.
    pub fn record(&mut self, question_id: &str, raw: &str) -> Result<i32, CollectError> {
        let value = raw.trim().parse::<i32>().map_err(|_| CollectError::NotAnInteger {
            question_id: question_id.to_owned(),
            raw: raw.to_owned(),
        })?;
        if let Some(previous) = self.responses.insert(question_id, value) {
            tracing::debug!(question_id, previous, value, "Answer replaced");
        }
        Ok(value)
    }

    #[must_use]
    pub fn get(&self, question_id: &str) -> Option<i32> {
        self.responses.get(question_id)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.responses.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.responses.is_empty()
    }

    #[must_use]
    pub fn responses(&self) -> &ResponseSet {
        &self.responses
    }

    /// Copy of the answers for submission. The collector keeps its state so a failed submission
    /// loses nothing.
    #[must_use]
    pub fn snapshot(&self) -> ResponseSet {
        self.responses.clone()
    }

    pub fn clear(&mut self) {
        self.responses = ResponseSet::new();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_has_one_entry_per_question() {
        let mut collector = ResponseCollector::new();
        let ids: Vec<String> = (1..=9).map(|i| format!("q{i}")).collect();
        for id in &ids {
            collector.record(id, "2").unwrap();
        }
        let snapshot = collector.snapshot();
        assert_eq!(snapshot.len(), ids.len());
        for id in &ids {
            assert_eq!(snapshot.get(id), Some(2));
        }
    }

    #[test]
    fn test_last_write_wins() {
        let mut collector = ResponseCollector::new();
        collector.record("q1", "1").unwrap();
        collector.record("q1", "3").unwrap();
        assert_eq!(collector.len(), 1);
        assert_eq!(collector.get("q1"), Some(3));
    }

    #[test]
    fn test_parses_trimmed_and_negative_values() {
        let mut collector = ResponseCollector::new();
        assert_eq!(collector.record("q1", " 6\n"), Ok(6));
        assert_eq!(collector.record("q2", "-1"), Ok(-1));
    }

    #[test]
    fn test_rejects_non_integers_without_touching_state() {
        let mut collector = ResponseCollector::new();
        collector.record("q1", "3").unwrap();
        assert_eq!(
            collector.record("q1", "often"),
            Err(CollectError::NotAnInteger {
                question_id: "q1".to_owned(),
                raw: "often".to_owned(),
            })
        );
        assert!(collector.record("q1", "2.5").is_err());
        assert_eq!(collector.get("q1"), Some(3));
    }

    #[test]
    fn test_values_outside_any_scale_are_collected() {
        let mut collector = ResponseCollector::new();
        collector.record("q1", "42").unwrap();
        assert_eq!(collector.get("q1"), Some(42));
    }

    #[test]
    fn test_clear() {
        let mut collector = ResponseCollector::new();
        collector.record("q1", "0").unwrap();
        collector.clear();
        assert!(collector.is_empty());
    }
}
