use crate::cli::account;
use crate::cli::run::prompt::StepPrompt;
use crate::opt::Assess;
use anyhow::{Error, Result};
use kokoro::{Config, SecureClient};
use kokoro_core::flow::FlowState;
use kokoro_core::report::RiskReport;
use kokoro_core::{AssessmentBackend, FlowController, FlowError, SubmissionPolicy};
use kokoro_model::questionnaire::{Question, QuestionnaireSummary};
use kokoro_model::risk::RiskResult;
use reedline::{Reedline, Signal};
use regex::Regex;
use std::sync::Arc;

pub(crate) mod prompt;

const ANSWER_USAGE: &str = "Usage: /answer <question> <value>";

#[derive(Debug, PartialEq, Eq)]
enum Command {
    Exit,
    Restart,
    Submit,
    Skip,
    Answer { question_id: String, value: String },
    Input(String),
}

fn parse_command(regex: &Regex, input: &str) -> Result<Command, String> {
    let input = input.trim();
    let Some(captures) = regex.captures(input) else {
        return Ok(Command::Input(input.to_owned()));
    };
    let command = captures.get(1).map_or("", |m| m.as_str());
    let arg = captures.get(2).map(|m| m.as_str().trim()).filter(|arg| !arg.is_empty());
    match command {
        "exit" | "quit" => Ok(Command::Exit),
        "restart" => Ok(Command::Restart),
        "submit" => Ok(Command::Submit),
        "skip" => Ok(Command::Skip),
        "answer" => {
            let (question_id, value) = arg
                .and_then(|arg| arg.split_once(char::is_whitespace))
                .ok_or_else(|| ANSWER_USAGE.to_owned())?;
            Ok(Command::Answer {
                question_id: question_id.to_owned(),
                value: value.trim().to_owned(),
            })
        }
        _ => Err(format!("Unknown command /{command}")),
    }
}

fn render_question(index: usize, total: usize, question: &Question, current: Option<i32>) -> String {
    let mut lines = vec![format!("Question {} of {total} ({})", index + 1, question.id), question.text.clone()];
    lines.extend(question.options().map(|(label, value)| {
        let marker = if current == Some(value) { "*" } else { " " };
        format!(" {marker}[{value}] {label}")
    }));
    lines.join("\n")
}

fn render_questionnaires(summaries: &[QuestionnaireSummary]) -> String {
    let mut lines = vec!["Available questionnaires:".to_owned()];
    for (i, summary) in summaries.iter().enumerate() {
        lines.push(format!("  {}. {} ({})", i + 1, summary.name, summary.id));
        if !summary.description.is_empty() {
            lines.push(format!("     {}", summary.description));
        }
    }
    lines.push("Pick a questionnaire by number or id.".to_owned());
    lines.join("\n")
}

/// A list number picks from `summaries`, anything else is taken as a questionnaire id.
fn resolve_selection(input: &str, summaries: &[QuestionnaireSummary]) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    match input.parse::<usize>() {
        Ok(n) if (1..=summaries.len()).contains(&n) => Some(summaries[n - 1].id.clone()),
        _ => Some(input.to_owned()),
    }
}

#[derive(Debug, Default)]
struct Reply {
    text: String,
    exit: bool,
    completed: Option<RiskResult>,
}

impl Reply {
    fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Self::default()
        }
    }
}

fn failure(err: &FlowError) -> Reply {
    let mut text = err.message();
    if err.is_retryable() && !matches!(err, FlowError::Busy) {
        text.push_str(" Type /submit or repeat your choice to try again.");
    }
    Reply::text(text)
}

/// Terminal front of a [`FlowController`]: renders the current step and turns typed lines into
/// flow actions.
struct Session<B> {
    controller: FlowController<B>,
    regex: Regex,
    cursor: usize,
}

impl<B: AssessmentBackend> Session<B> {
    fn new(controller: FlowController<B>) -> Result<Self, regex::Error> {
        Ok(Self {
            controller,
            regex: Regex::new(r"^/(\w+)(?:\s+(.*))?$")?,
            cursor: 0,
        })
    }

    async fn render(&self) -> String {
        match self.controller.state().await {
            FlowState::Selecting => {
                let mut summaries = self.controller.questionnaires().await;
                if summaries.is_empty() {
                    match self.controller.load_questionnaires().await {
                        Ok(loaded) => summaries = loaded,
                        Err(err) => return format!("{} Press enter to retry or /exit.", err.message()),
                    }
                }
                if summaries.is_empty() {
                    "No questionnaires are available. Press enter to retry or /exit.".to_owned()
                } else {
                    render_questionnaires(&summaries)
                }
            }
            FlowState::Answering(answering) => {
                let questions = &answering.questionnaire.questions;
                if let Some(question) = questions.get(self.cursor) {
                    render_question(
                        self.cursor,
                        questions.len(),
                        question,
                        answering.collector.get(&question.id),
                    )
                } else {
                    format!(
                        "{} of {} questions answered. /submit to see your result, /answer <question> <value> to change an answer, /restart to start over.",
                        answering.collector.len(),
                        questions.len()
                    )
                }
            }
            FlowState::ViewingResults(_) => "Type /restart to take another assessment or /exit to quit.".to_owned(),
        }
    }

    async fn handle(&mut self, input: &str) -> Reply {
        let command = match parse_command(&self.regex, input) {
            Ok(command) => command,
            Err(message) => return Reply::text(message),
        };
        match command {
            Command::Exit => Reply {
                exit: true,
                ..Reply::default()
            },
            Command::Restart => match self.controller.restart().await {
                Ok(()) => {
                    self.cursor = 0;
                    Reply::text("Starting over.")
                }
                Err(err) => failure(&err),
            },
            Command::Submit => match self.controller.submit().await {
                Ok(result) => Reply {
                    text: RiskReport::new(&result).to_string(),
                    exit: false,
                    completed: Some(result),
                },
                Err(err) => failure(&err),
            },
            Command::Skip => {
                if let FlowState::Answering(answering) = self.controller.state().await {
                    if self.cursor < answering.questionnaire.questions.len() {
                        self.cursor += 1;
                        return Reply::default();
                    }
                }
                Reply::text("Nothing to skip.")
            }
            Command::Answer { question_id, value } => self.record(&question_id, &value, false).await,
            Command::Input(input) => self.input(&input).await,
        }
    }

    async fn input(&mut self, input: &str) -> Reply {
        match self.controller.state().await {
            FlowState::Selecting => {
                let summaries = self.controller.questionnaires().await;
                let Some(questionnaire_id) = resolve_selection(input, &summaries) else {
                    return Reply::default();
                };
                match self.controller.select(&questionnaire_id).await {
                    Ok(questionnaire) => {
                        self.cursor = 0;
                        Reply::text(format!(
                            "{}: {} questions. Answer with the number in brackets, /skip to leave one out.",
                            questionnaire.name,
                            questionnaire.questions.len()
                        ))
                    }
                    Err(err) => failure(&err),
                }
            }
            FlowState::Answering(answering) => match answering.questionnaire.questions.get(self.cursor) {
                Some(question) => {
                    let question_id = question.id.clone();
                    self.record(&question_id, input, true).await
                }
                None => Reply::text("Every question has been shown. Type /submit or /answer <question> <value>."),
            },
            FlowState::ViewingResults(_) => Reply::text("Type /restart or /exit."),
        }
    }

    async fn record(&mut self, question_id: &str, raw: &str, advance: bool) -> Reply {
        let Some(questionnaire) = self.controller.questionnaire().await else {
            return failure(&FlowError::InvalidStep {
                expected: kokoro_core::Step::Answering,
                actual: self.controller.step().await,
            });
        };
        let Some(question) = questionnaire.question(question_id) else {
            return Reply::text(format!("{question_id} is not part of this questionnaire."));
        };
        match self.controller.record(question_id, raw).await {
            Ok(value) => {
                if advance {
                    self.cursor += 1;
                }
                if question.accepts(value) {
                    Reply::default()
                } else {
                    Reply::text(format!(
                        "{value} is not one of the listed values for {question_id}, it is kept as entered."
                    ))
                }
            }
            Err(err) => failure(&err),
        }
    }
}

fn read(line_editor: &mut Reedline, prompt: &StepPrompt) -> Result<Option<String>, Error> {
    match line_editor.read_line(prompt)? {
        Signal::Success(line) => Ok(Some(line)),
        Signal::CtrlD | Signal::CtrlC => Ok(None),
    }
}

pub(crate) async fn run(opt: Assess, config: Config) -> Result<(), Error> {
    let client = Arc::new(account::login(config, &opt.login).await?);
    let policy = SubmissionPolicy {
        require_complete: opt.require_complete,
        enforce_scale: opt.strict_scale,
    };
    let mut session = Session::new(FlowController::with_policy(Arc::clone(&client), policy))?;

    if let Some(questionnaire_id) = &opt.questionnaire {
        let reply = session.handle(questionnaire_id).await;
        if !reply.text.is_empty() {
            println!("{}", reply.text);
        }
    }

    let mut line_editor = Reedline::create();

    loop {
        println!("\n{}", session.render().await);
        let prompt = StepPrompt::new(session.controller.step().await);
        let Some(input) = read(&mut line_editor, &prompt)? else {
            println!("\nAborted!");
            break;
        };
        let reply = session.handle(&input).await;
        if !reply.text.is_empty() {
            println!("{}", reply.text);
        }
        if let Some(result) = reply.completed.filter(|_| opt.resources) {
            match client.resources(&result.risk_level).await {
                Ok(list) => println!("\n{}", account::format_resources(&list)),
                Err(err) => tracing::warn!(%err, "Failed to load resources"),
            }
        }
        if reply.exit {
            break;
        }
    }
    client.logout().await;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use kokoro_core::Step;
    use kokoro_test_helpers::{MockBackend, fixtures};
    use test_log::test;

    fn regex() -> Regex {
        Regex::new(r"^/(\w+)(?:\s+(.*))?$").unwrap()
    }

    fn session() -> Session<MockBackend> {
        let backend = MockBackend::new()
            .with_questionnaire(fixtures::phq9())
            .with_questionnaire(fixtures::gad7());
        Session::new(FlowController::new(backend)).unwrap()
    }

    #[test]
    fn test_parse_command() {
        let regex = regex();
        assert_eq!(parse_command(&regex, "/exit"), Ok(Command::Exit));
        assert_eq!(parse_command(&regex, " 2 "), Ok(Command::Input("2".to_owned())));
        assert_eq!(
            parse_command(&regex, "/answer q3  1"),
            Ok(Command::Answer {
                question_id: "q3".to_owned(),
                value: "1".to_owned()
            })
        );
        assert_eq!(parse_command(&regex, "/answer q3"), Err(ANSWER_USAGE.to_owned()));
        assert_eq!(parse_command(&regex, "/dance"), Err("Unknown command /dance".to_owned()));
    }

    #[test]
    fn test_resolve_selection() {
        let summaries = vec![fixtures::phq9().summary(), fixtures::gad7().summary()];
        assert_eq!(resolve_selection("2", &summaries).as_deref(), Some("gad7"));
        assert_eq!(resolve_selection("phq9", &summaries).as_deref(), Some("phq9"));
        assert_eq!(resolve_selection("7", &summaries).as_deref(), Some("7"));
        assert_eq!(resolve_selection("", &summaries), None);
    }

    #[test]
    fn test_render_question_marks_current_answer() {
        let questionnaire = fixtures::phq9();
        let text = render_question(0, 9, &questionnaire.questions[0], Some(1));
        assert!(text.starts_with("Question 1 of 9 (q1)\nLittle interest"));
        assert!(text.contains(" *[1] Several days"));
        assert!(text.contains("  [0] Not at all"));
    }

    #[test]
    fn test_render_questionnaires() {
        let mut gad7 = fixtures::gad7().summary();
        gad7.description.clear();
        let text = render_questionnaires(&[fixtures::phq9().summary(), gad7]);
        assert_eq!(
            text,
            "Available questionnaires:\n  1. PHQ-9 Depression Screening (phq9)\n     Patient Health Questionnaire-9 for \
             depression severity assessment\n  2. GAD-7 Anxiety Screening (gad7)\nPick a questionnaire by number or id."
        );
    }

    #[test(tokio::test)]
    async fn test_full_session() {
        let mut session = session();
        assert!(session.render().await.contains("1. PHQ-9 Depression Screening (phq9)"));

        let reply = session.handle("1").await;
        assert!(reply.text.starts_with("PHQ-9 Depression Screening: 9 questions"));
        assert!(session.render().await.starts_with("Question 1 of 9 (q1)"));

        for _ in 0..9 {
            assert!(session.handle("2").await.text.is_empty());
        }
        assert!(session.render().await.starts_with("9 of 9 questions answered"));

        let reply = session.handle("/submit").await;
        assert_eq!(reply.completed, Some(fixtures::medium_risk()));
        assert!(reply.text.contains("Risk Level: MEDIUM"));
        assert_eq!(session.controller.step().await, Step::ViewingResults);

        session.handle("/restart").await;
        assert_eq!(session.controller.step().await, Step::Selecting);
        assert!(session.handle("/exit").await.exit);
    }

    #[test(tokio::test)]
    async fn test_skip_and_correct() {
        let mut session = session();
        session.handle("phq9").await;
        session.handle("/skip").await;
        assert!(session.render().await.starts_with("Question 2 of 9 (q2)"));
        let reply = session.handle("9").await;
        assert!(reply.text.contains("not one of the listed values"));
        session.handle("/answer q1 3").await;
        let responses = session.controller.responses().await.unwrap();
        assert_eq!(responses.get("q1"), Some(3));
        assert_eq!(responses.get("q2"), Some(9));
        assert!(session.handle("/answer q99 1").await.text.contains("not part of this questionnaire"));
    }

    #[test(tokio::test)]
    async fn test_failed_submission_can_be_retried() {
        let mut session = session();
        session.handle("phq9").await;
        session.handle("1").await;
        session.controller.backend().fail_next_result(1);
        let reply = session.handle("/submit").await;
        assert!(reply.completed.is_none());
        assert!(reply.text.contains("Retry to fetch it"));
        assert_eq!(session.controller.step().await, Step::Answering);

        let reply = session.handle("/submit").await;
        assert!(reply.completed.is_some());
        assert_eq!(session.controller.backend().submit_calls(), 1);
    }

    #[test(tokio::test)]
    async fn test_unknown_questionnaire_stays_in_selection() {
        let mut session = session();
        let reply = session.handle("nope").await;
        assert!(reply.text.starts_with("The assessment service does not know"));
        assert_eq!(session.controller.step().await, Step::Selecting);
    }
}
