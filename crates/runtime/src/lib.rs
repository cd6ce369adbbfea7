mod embedding;
mod practice;
mod render;
mod search;

pub mod evaluation;

pub use embedding::{random_unit_embedding, EmbeddingChain, EmbeddingProvider};
pub use render::{
    page_label, render_results, similarity_label, source_label,
    Highlighter, RenderedMatch, RenderedResults,
    ANSI_HIGHLIGHT_CLOSE, ANSI_HIGHLIGHT_OPEN, MAX_UNHIGHLIGHTED_TOKEN_CHARS,
};
pub use practice::{
    PracticeRound, PracticeSession, QuestionBank, QuestionSource, SessionSummary,
    DEFAULT_PRACTICE_DIFFICULTY, DEFAULT_PRACTICE_QUESTION_TYPE, DEFAULT_PRACTICE_ROUNDS,
};
pub use search::{DocumentIndex, Query, SearchError, SearchPipeline};

pub use evaluation::{
    present, BatchReport, Evaluation, EvaluationFailure, EvaluationRequest,
    EvaluationResult, EvaluationView, Evaluator, QaPair, ScoreBand,
};
