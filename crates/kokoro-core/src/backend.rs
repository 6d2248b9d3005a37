use async_trait::async_trait;
use kokoro::error::Error;
use kokoro::{PublicClient, SecureClient, SessionClient};
use kokoro_model::questionnaire::{Questionnaire, QuestionnaireSummary};
use kokoro_model::risk::RiskResult;
use kokoro_model::submission::{AssessmentSubmission, SubmissionReceipt};
use std::sync::Arc;

/// The remote calls the assessment flow depends on.
#[async_trait]
pub trait AssessmentBackend: Send + Sync {
    async fn list_questionnaires(&self) -> Result<Vec<QuestionnaireSummary>, Error>;

    async fn get_questionnaire(&self, questionnaire_id: &str) -> Result<Questionnaire, Error>;

    async fn submit_assessment(&self, submission: &AssessmentSubmission) -> Result<SubmissionReceipt, Error>;

    async fn get_risk_result(&self, assessment_id: &str) -> Result<RiskResult, Error>;
}

#[async_trait]
impl AssessmentBackend for SessionClient {
    async fn list_questionnaires(&self) -> Result<Vec<QuestionnaireSummary>, Error> {
        PublicClient::list_questionnaires(self).await
    }

    async fn get_questionnaire(&self, questionnaire_id: &str) -> Result<Questionnaire, Error> {
        PublicClient::get_questionnaire(self, questionnaire_id).await
    }

    async fn submit_assessment(&self, submission: &AssessmentSubmission) -> Result<SubmissionReceipt, Error> {
        SecureClient::submit_assessment(self, submission).await
    }

    async fn get_risk_result(&self, assessment_id: &str) -> Result<RiskResult, Error> {
        SecureClient::get_risk_result(self, assessment_id).await
    }
}

#[async_trait]
impl<B: AssessmentBackend + ?Sized> AssessmentBackend for Arc<B> {
    async fn list_questionnaires(&self) -> Result<Vec<QuestionnaireSummary>, Error> {
        (**self).list_questionnaires().await
    }

    async fn get_questionnaire(&self, questionnaire_id: &str) -> Result<Questionnaire, Error> {
        (**self).get_questionnaire(questionnaire_id).await
    }

    async fn submit_assessment(&self, submission: &AssessmentSubmission) -> Result<SubmissionReceipt, Error> {
        (**self).submit_assessment(submission).await
    }

    async fn get_risk_result(&self, assessment_id: &str) -> Result<RiskResult, Error> {
        (**self).get_risk_result(assessment_id).await
    }
}
