use crate::cli::opt;
use kokoro_model::history::AssessmentHistory;
use kokoro_model::questionnaire::{Questionnaire, QuestionnaireSummary};
use kokoro_model::resource::ResourceList;
use kokoro_model::risk::RiskResult;
use kokoro_model::submission::{AssessmentSubmission, SubmissionReceipt};
use kokoro_model::user::User;
use schemars::{JsonSchema, schema_for};
use std::path::Path;

pub(crate) fn exec(schema: opt::Schema) -> Result<(), anyhow::Error> {
    let opt::Schema { output_folder } = schema;

    if !output_folder.exists() {
        std::fs::create_dir_all(&output_folder)?;
    }

    generate_and_store_schema::<Vec<QuestionnaireSummary>>("Questionnaire Index", &output_folder.join("questionnaires.json"))?;
    generate_and_store_schema::<Questionnaire>("Questionnaire", &output_folder.join("questionnaire.json"))?;
    generate_and_store_schema::<AssessmentSubmission>("Assessment Submission", &output_folder.join("submission.json"))?;
    generate_and_store_schema::<SubmissionReceipt>("Submission Receipt", &output_folder.join("receipt.json"))?;
    generate_and_store_schema::<RiskResult>("Risk Result", &output_folder.join("risk_result.json"))?;
    generate_and_store_schema::<AssessmentHistory>("Assessment History", &output_folder.join("history.json"))?;
    generate_and_store_schema::<ResourceList>("Resources", &output_folder.join("resources.json"))?;
    generate_and_store_schema::<User>("User", &output_folder.join("user.json"))?;

    println!("Generated schemas in {}", output_folder.display());
    Ok(())
}

fn rename_schema(schema: serde_json::Value, title: &str) -> serde_json::Value {
    if let serde_json::Value::Object(mut object) = schema {
        object.insert("title".to_string(), serde_json::Value::String(title.to_string()));
        serde_json::Value::Object(object)
    } else {
        schema
    }
}

fn generate_and_store_schema<T: JsonSchema>(title: &str, output_path: &Path) -> Result<(), anyhow::Error> {
    let schema = schema_for!(T);
    let schema = rename_schema(schema.to_value(), title);
    let schema_json = serde_json::to_string_pretty(&schema)?;
    std::fs::write(output_path, schema_json)?;
    tracing::debug!(path = %output_path.display(), "Wrote schema");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_is_replaced() {
        let schema = rename_schema(schema_for!(RiskResult).to_value(), "Risk Result");
        assert_eq!(schema["title"], "Risk Result");
        assert!(schema["properties"]["risk_level"].is_object());
    }

    #[test]
    fn test_writes_every_schema() {
        let folder = std::env::temp_dir().join(format!("kokoro-schema-{}", std::process::id()));
        exec(opt::Schema {
            output_folder: folder.clone(),
        })
        .unwrap();
        for name in ["questionnaire.json", "risk_result.json", "submission.json", "resources.json"] {
            let text = std::fs::read_to_string(folder.join(name)).unwrap();
            let value: serde_json::Value = serde_json::from_str(&text).unwrap();
            assert!(value["title"].is_string(), "{name} has no title");
        }
        std::fs::remove_dir_all(folder).unwrap();
    }
}
