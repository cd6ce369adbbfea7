mod batch;
mod panels;
mod parser;
mod presenter;
mod prompt;
mod requester;
mod result;

pub use batch::{BatchEntry, BatchReport, BatchSummary, QaPair};
pub use panels::{PanelError, PanelStore, QuestionContext};
pub use parser::{first_json_object, parse_evaluation, strip_code_fences};
pub use presenter::{present, EvaluationView, ScoreBand};
pub use prompt::{EvaluationRequest, DEFAULT_QUESTION_TYPE, DEFAULT_ROLE, EVALUATION_GENERATION};
pub use requester::Evaluator;
pub use result::{Evaluation, EvaluationFailure, EvaluationResult, GEMINI_KEY_URL};
