use kokoro_model::questionnaire::{Question, Questionnaire};
use kokoro_model::risk::{RiskLevel, RiskResult};
use kokoro_model::user::User;

pub const PHQ9_PROMPTS: [&str; 9] = [
    "Little interest or pleasure in doing things",
    "Feeling down, depressed, or hopeless",
    "Trouble falling or staying asleep, or sleeping too much",
    "Feeling tired or having little energy",
    "Poor appetite or overeating",
    "Feeling bad about yourself",
    "Trouble concentrating on things",
    "Moving or speaking slowly, or being fidgety or restless",
    "Thoughts that you would be better off dead, or of hurting yourself",
];

fn frequency_question(id: String, text: &str) -> Question {
    Question {
        id,
        text: text.to_owned(),
        kind: Some("rating".to_owned()),
        scale: vec![0, 1, 2, 3],
        labels: vec![
            "Not at all".to_owned(),
            "Several days".to_owned(),
            "More than half the days".to_owned(),
            "Nearly every day".to_owned(),
        ],
    }
}

/// Nine question depression screening with the usual 0 to 3 frequency scale.
#[must_use]
pub fn phq9() -> Questionnaire {
    Questionnaire {
        id: "phq9".to_owned(),
        name: "PHQ-9 Depression Screening".to_owned(),
        description: "Patient Health Questionnaire-9 for depression severity assessment".to_owned(),
        version: "1.0".to_owned(),
        questions: PHQ9_PROMPTS
            .iter()
            .enumerate()
            .map(|(i, text)| frequency_question(format!("q{}", i + 1), text))
            .collect(),
    }
}

#[must_use]
pub fn gad7() -> Questionnaire {
    let prompts = [
        "Feeling nervous, anxious, or on edge",
        "Not being able to stop or control worrying",
        "Worrying too much about different things",
        "Trouble relaxing",
        "Being so restless that it is hard to sit still",
        "Becoming easily annoyed or irritable",
        "Feeling afraid as if something awful might happen",
    ];
    Questionnaire {
        id: "gad7".to_owned(),
        name: "GAD-7 Anxiety Screening".to_owned(),
        description: "Generalized Anxiety Disorder-7".to_owned(),
        version: "1.0".to_owned(),
        questions: prompts
            .iter()
            .enumerate()
            .map(|(i, text)| frequency_question(format!("g{}", i + 1), text))
            .collect(),
    }
}

#[must_use]
pub fn empty_questionnaire() -> Questionnaire {
    Questionnaire {
        id: "draft".to_owned(),
        name: "Draft".to_owned(),
        description: "Not ready yet".to_owned(),
        version: "0.1".to_owned(),
        questions: vec![],
    }
}

/// The medium risk result used by the end to end scenarios.
#[must_use]
pub fn medium_risk() -> RiskResult {
    RiskResult {
        id: None,
        risk_score: 45.5,
        risk_level: RiskLevel::Medium,
        confidence_score: 0.82,
        contributing_factors: vec!["sleep disturbance".to_owned()],
        recommendations: vec!["consult a professional".to_owned()],
        ml_model_used: None,
        calculated_at: None,
    }
}

#[must_use]
pub fn user() -> User {
    User {
        id: "u-1".to_owned(),
        email: "ada@example.org".to_owned(),
        username: "ada".to_owned(),
        full_name: "Ada Lovelace".to_owned(),
        age: 36,
        gender: "female".to_owned(),
        created_at: None,
    }
}
