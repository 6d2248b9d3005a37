use crate::cli::opt::{History, Latest, Login, Register, Resources};
use anyhow::{Error, anyhow};
use kokoro::{Config, PublicClient, SecureClient, SessionClient, SimpleClient};
use kokoro_core::report::RiskReport;
use kokoro_model::history::AssessmentHistory;
use kokoro_model::resource::ResourceList;
use kokoro_model::risk::RiskLevel;
use kokoro_model::user::NewUser;

pub(crate) async fn login(config: Config, login: &Login) -> Result<SessionClient, Error> {
    let client = SessionClient::new(config);
    client.login(&login.email, &login.password).await.map_err(|err| {
        if err.is_unauthorized() {
            anyhow!("Login failed, check email and password")
        } else {
            err.into()
        }
    })?;
    Ok(client)
}

pub(crate) fn format_history(history: &AssessmentHistory) -> String {
    if history.assessments.is_empty() {
        return "No assessments yet.".to_owned();
    }
    let mut lines = vec![format!("{} assessment(s)", history.count)];
    lines.extend(history.assessments.iter().map(|record| {
        let completed = record
            .completed_at
            .map_or_else(|| "-".to_owned(), |at| at.format("%Y-%m-%d %H:%M").to_string());
        format!(
            "  {}  {:<12} {}  {} answer(s)",
            record.id,
            record.status,
            completed,
            record.responses.len()
        )
    }));
    lines.join("\n")
}

pub(crate) fn format_resources(list: &ResourceList) -> String {
    if list.resources.is_empty() {
        return format!("No resources for risk level {}.", list.risk_level);
    }
    let mut lines = vec![format!("Resources for risk level {}", list.risk_level)];
    for resource in &list.resources {
        lines.push(format!("  [{}] {}", resource.category, resource.title));
        lines.push(format!("      {}", resource.content));
    }
    lines.join("\n")
}

pub(crate) async fn history(opt: History, config: Config) -> Result<(), Error> {
    let client = login(config, &opt.login).await?;
    let history = client.history(opt.limit).await?;
    println!("{}", format_history(&history));
    Ok(())
}

pub(crate) async fn latest(opt: Latest, config: Config) -> Result<(), Error> {
    let client = login(config, &opt.login).await?;
    let result = client.latest_result().await?;
    println!("{}", RiskReport::new(&result));
    Ok(())
}

pub(crate) async fn resources(opt: Resources, config: Config) -> Result<(), Error> {
    let client = login(config, &opt.login).await?;
    let list = client.resources(&RiskLevel::from(opt.level)).await?;
    println!("{}", format_resources(&list));
    Ok(())
}

pub(crate) async fn register(opt: Register, config: Config) -> Result<(), Error> {
    let client = SimpleClient::new(config);
    let user = client
        .register(&NewUser {
            email: opt.email,
            username: opt.username,
            password: opt.password,
            full_name: opt.full_name,
            age: opt.age,
            gender: opt.gender,
        })
        .await?;
    println!("Registered {} <{}>", user.username, user.email);
    Ok(())
}

pub(crate) async fn status(config: Config) -> Result<(), Error> {
    let status = SimpleClient::new(config).get_status().await?;
    let service = status.service.as_deref().unwrap_or("assessment service");
    if status.is_healthy() {
        println!("{service} is healthy");
        Ok(())
    } else {
        Err(anyhow!("{service} reports status {}", status.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokoro_model::history::AssessmentRecord;
    use kokoro_model::resource::Resource;
    use kokoro_test_helpers::{FAKE_EMAIL, FAKE_PASSWORD, FakeApi};
    use test_log::test;

    #[test]
    fn test_format_history() {
        let history = AssessmentHistory {
            count: 1,
            assessments: vec![AssessmentRecord {
                id: "a-1".to_owned(),
                responses: serde_json::from_str(r#"{"q1": 2, "q2": 0}"#).unwrap(),
                status: "completed".to_owned(),
                completed_at: None,
            }],
        };
        let text = format_history(&history);
        assert_eq!(text, "1 assessment(s)\n  a-1  completed    -  2 answer(s)");

        let empty = AssessmentHistory {
            count: 0,
            assessments: vec![],
        };
        assert_eq!(format_history(&empty), "No assessments yet.");
    }

    #[test]
    fn test_format_resources() {
        let list = ResourceList {
            risk_level: "high".to_owned(),
            resources: vec![Resource {
                title: "Crisis line".to_owned(),
                content: "Call now.".to_owned(),
                category: "crisis".to_owned(),
                relevance_score: None,
            }],
        };
        assert_eq!(
            format_resources(&list),
            "Resources for risk level high\n  [crisis] Crisis line\n      Call now."
        );
    }

    #[test(tokio::test)]
    async fn test_login_failure_is_readable() {
        let api = FakeApi::start().await;
        let bad = Login {
            email: FAKE_EMAIL.to_owned(),
            password: "wrong".to_owned(),
        };
        let err = login(api.config(), &bad).await.err().unwrap();
        assert_eq!(err.to_string(), "Login failed, check email and password");

        let good = Login {
            email: FAKE_EMAIL.to_owned(),
            password: FAKE_PASSWORD.to_owned(),
        };
        assert!(login(api.config(), &good).await.unwrap().is_logged_in().await);
    }

    #[test(tokio::test)]
    async fn test_status() {
        let api = FakeApi::start().await;
        status(api.config()).await.unwrap();
    }
}
