use std::path::PathBuf;

use anyhow::Result;
use colored::*;
use tracing_subscriber::EnvFilter;

use coach_clients::{QuestionFilter, SearchFilter};
use coach_common::{CoachEnv, EnvVars};
use coach_runtime::{
    evaluation::DEFAULT_QUESTION_TYPE, present, render_results, EvaluationRequest, Evaluator,
    PracticeSession, Query, QuestionBank, SearchPipeline,
    DEFAULT_PRACTICE_DIFFICULTY, DEFAULT_PRACTICE_QUESTION_TYPE, DEFAULT_PRACTICE_ROUNDS,
};
use coach_sandbox::batch_file::{load_batch_file, report_path, write_report};
use coach_sandbox::tui::Tui;

const MENU: [&str; 7] = [
    "Search all books",
    "Search within a book",
    "Evaluate an answer",
    "Practice with the question bank",
    "Show index statistics",
    "Batch-evaluate a JSON file",
    "Quit",
];

struct App {
    search: SearchPipeline,
    evaluator: Evaluator,
    questions: QuestionBank,
    role: String,
    tui: Tui,
}

impl App {
    fn new(env: &CoachEnv) -> Result<Self> {
        Ok(Self {
            search: SearchPipeline::from_env(env),
            evaluator: Evaluator::from_env(env),
            questions: QuestionBank::from_env(env),
            role: coach_runtime::evaluation::DEFAULT_ROLE.to_string(),
            tui: Tui::new()?,
        })
    }

    async fn run(&mut self) -> Result<()> {
        self.print_status();
        loop {
            let choice = self.tui.select_item("What would you like to do?", &MENU).await?;
            let outcome = match choice {
                0 => self.search(None).await,
                1 => self.search_within_book().await,
                2 => self.evaluate().await,
                3 => self.practice().await,
                4 => self.stats().await,
                5 => self.batch().await,
                _ => break,
            };
            if let Err(e) = outcome {
                self.tui.print_error(&e);
            }
            println!();
        }
        println!("{}", "Goodbye!".bold());
        Ok(())
    }

    fn print_status(&self) {
        let flag = |on: bool| if on { "configured".green() } else { "not configured".red() };
        println!("{}", "Interview Coach sandbox".cyan().bold());
        println!("  Search backend:     {}", flag(self.search.is_configured()));
        println!("  Answer evaluation:  {}", flag(self.evaluator.is_configured()));
        println!("  Question bank:      {}", flag(self.questions.is_configured()));
        println!("  Embedding chain:    {:?} ({} dims)", self.search.embedder().provider_names(), self.search.embedder().dims());
        println!();
    }

    async fn search(&self, book_name: Option<&str>) -> Result<()> {
        let Some(line) = self.tui.get_user_input("Search query: ")? else {
            return Ok(());
        };
        let query = match Query::parse(&line) {
            Ok(query) => query,
            Err(e) => {
                println!("{}", e.to_string().yellow());
                return Ok(());
            }
        };
        let filter = SearchFilter::default().within_book(book_name.unwrap_or_default());

        let pb = self.tui.create_spinner("Searching...");
        let results = self.search.search(&query, &filter).await;
        pb.finish_and_clear();

        match results {
            Ok(results) => {
                let rendered = render_results(&results, query.as_str(), &Tui::highlighter());
                self.tui.print_results(&rendered);
            }
            Err(e) => {
                println!("{} {}", "Search failed:".red().bold(), e);
                println!("{}", "Make sure SUPABASE_URL and SUPABASE_ANON_KEY are configured.".dimmed());
            }
        }
        Ok(())
    }

    async fn search_within_book(&self) -> Result<()> {
        let pb = self.tui.create_spinner("Loading books...");
        let books = self.search.list_books().await;
        pb.finish_and_clear();

        let books = books?;
        if books.is_empty() {
            println!("{}", "No books are indexed yet.".yellow());
            return Ok(());
        }

        let titles = books.iter().map(|book| book.title.as_str()).collect::<Vec<_>>();
        let selected = self.tui.select_item("Which book?", &titles).await?;
        self.search(Some(&books[selected].filename)).await
    }

    async fn evaluate(&mut self) -> Result<()> {
        let Some(question) = self.tui.get_user_input("Question: ")? else {
            return Ok(());
        };
        let Some(answer) = self.tui.get_user_input("Your answer: ")? else {
            return Ok(());
        };
        if answer.trim().is_empty() {
            println!("{}", "Please type an answer before submitting.".yellow());
            return Ok(());
        }
        self.role = self.tui.get_input_or("Role", &self.role)?;
        let question_type = self.tui.get_input_or("Question type", DEFAULT_QUESTION_TYPE)?;

        let request = EvaluationRequest::new(question.trim(), answer.trim())
            .with_role(Some(&self.role))
            .with_question_type(Some(&question_type));

        let pb = self.tui.create_spinner("Evaluating your answer...");
        let result = self.evaluator.evaluate(&request).await;
        pb.finish_and_clear();

        self.tui.print_evaluation(&present(&result));
        Ok(())
    }

    async fn practice(&mut self) -> Result<()> {
        let question_type = self.tui.get_input_or("Question type", DEFAULT_PRACTICE_QUESTION_TYPE)?;
        let difficulty = self.tui.get_input_or("Difficulty", DEFAULT_PRACTICE_DIFFICULTY)?;
        let rounds = self
            .tui
            .get_input_or("Number of questions", &DEFAULT_PRACTICE_ROUNDS.to_string())?
            .parse::<usize>()
            .unwrap_or(DEFAULT_PRACTICE_ROUNDS);
        self.role = self.tui.get_input_or("Role", &self.role)?;

        let filter = QuestionFilter::new(Some(&question_type), Some(&difficulty));
        let mut session = PracticeSession::new(filter, Some(&self.role));

        for idx in 0..rounds {
            println!("\n{}", format!("Question {}/{}", idx + 1, rounds).cyan().bold());

            let pb = self.tui.create_spinner(&format!("Fetching a {} {} question...", difficulty, question_type));
            let question = session.next_question(&self.questions).await;
            pb.finish_and_clear();

            let Some(question) = question? else {
                println!("{}", "No questions found matching criteria.".yellow());
                break;
            };
            self.tui.print_markdown(&question.question_text);

            let Some(answer) = self.tui.get_user_input("Your answer: ")? else {
                break;
            };
            if answer.trim().is_empty() {
                println!("{}", "Please type an answer before submitting.".yellow());
                continue;
            }

            let pb = self.tui.create_spinner("Evaluating your answer...");
            let round = session.answer(&self.evaluator, question, answer.trim()).await;
            pb.finish_and_clear();

            self.tui.print_evaluation(&present(&round.evaluation));
            if let Some(model_answer) = round.question.model_answer() {
                println!("\n{}", "Model answer".cyan().bold());
                self.tui.print_markdown(model_answer);
            }
        }

        if session.rounds().is_empty() {
            return Ok(());
        }
        let summary = session.summary();
        println!("\n{}", "Session summary".cyan().bold());
        println!("  Total questions: {}", summary.total);
        println!("  Average score:   {:.1}/10", summary.average_score);
        println!("  Interpretation:  {}", summary.interpretation);
        for (idx, score) in summary.scores.iter().enumerate() {
            println!("  Question {}: {}/10", idx + 1, score);
        }
        Ok(())
    }

    async fn stats(&self) -> Result<()> {
        let pb = self.tui.create_spinner("Counting chunks...");
        let stats = self.search.stats().await;
        pb.finish_and_clear();

        let stats = stats?;
        println!("{} {}", "Total chunks:".bold(), stats.total_chunks);
        println!("{} {}", "Total books: ".bold(), stats.total_books);
        Ok(())
    }

    async fn batch(&self) -> Result<()> {
        let Some(path) = self.tui.get_user_input("Path to JSON file: ")? else {
            return Ok(());
        };
        let path = PathBuf::from(path.trim());
        let (role, pairs) = load_batch_file(&path)?;
        let role = role.unwrap_or_else(|| self.role.clone());

        let pb = self.tui.create_spinner(&format!("Evaluating {} answers as {}...", pairs.len(), role));
        let report = self.evaluator.evaluate_batch(pairs, Some(&role)).await;
        pb.finish_and_clear();

        for (idx, entry) in report.entries.iter().enumerate() {
            println!("{} {}", format!("[{}]", idx + 1).cyan(), entry.pair.question.bold());
            self.tui.print_evaluation(&present(&entry.evaluation));
            println!();
        }

        let summary = &report.summary;
        println!("{}", "Summary".cyan().bold());
        println!("  Evaluated: {}/{}", summary.successful, summary.total);
        if let (Some(average), Some(best), Some(lowest)) = (summary.average_score, summary.best_score, summary.lowest_score) {
            println!("  Average score: {:.1}/10", average);
            println!("  Best score:    {}/10", best);
            println!("  Lowest score:  {}/10", lowest);
        }

        let output = report_path(&path);
        write_report(&output, &report)?;
        println!("{} {}", "Report saved to".green(), output.display());
        Ok(())
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .init();

    let env = CoachEnv::load();
    let mut app = App::new(&env)?;
    app.run().await
}
