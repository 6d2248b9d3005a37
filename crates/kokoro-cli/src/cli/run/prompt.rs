use kokoro_core::Step;
use reedline::{Prompt, PromptEditMode, PromptHistorySearch, PromptHistorySearchStatus, PromptViMode};
use std::borrow::Cow;

/// Prompt that names the step the assessment is in, e.g. `answering〉`.
#[derive(Clone)]
pub struct StepPrompt {
    step: Step,
}

pub static DEFAULT_PROMPT_INDICATOR: &str = "〉";
pub static DEFAULT_VI_INSERT_PROMPT_INDICATOR: &str = ": ";
pub static DEFAULT_MULTILINE_INDICATOR: &str = "::: ";

impl StepPrompt {
    #[must_use]
    pub fn new(step: Step) -> Self {
        Self { step }
    }
}

impl Prompt for StepPrompt {
    fn render_prompt_left(&self) -> Cow<'_, str> {
        Cow::Owned(self.step.to_string())
    }

    fn render_prompt_right(&self) -> Cow<'_, str> {
        Cow::from("")
    }

    fn render_prompt_indicator(&self, prompt_mode: PromptEditMode) -> Cow<'_, str> {
        match prompt_mode {
            PromptEditMode::Default | PromptEditMode::Emacs | PromptEditMode::Vi(PromptViMode::Normal) => {
                DEFAULT_PROMPT_INDICATOR.into()
            }
            PromptEditMode::Vi(PromptViMode::Insert) => DEFAULT_VI_INSERT_PROMPT_INDICATOR.into(),
            PromptEditMode::Custom(str) => format!("({str})").into(),
        }
    }

    fn render_prompt_multiline_indicator(&self) -> Cow<'_, str> {
        Cow::Borrowed(DEFAULT_MULTILINE_INDICATOR)
    }

    fn render_prompt_history_search_indicator(&self, history_search: PromptHistorySearch) -> Cow<'_, str> {
        let prefix = match history_search.status {
            PromptHistorySearchStatus::Passing => "",
            PromptHistorySearchStatus::Failing => "failing ",
        };
        Cow::Owned(format!("({prefix}search) \"{}\": ", history_search.term))
    }
}
