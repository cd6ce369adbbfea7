use std::sync::Mutex;
use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use colored::*;
use dialoguer::{theme::ColorfulTheme, Select};
use indicatif::{ProgressBar, ProgressStyle};
use rustyline::{error::ReadlineError, DefaultEditor};
use termimad::crossterm::style::{Attribute, Color};
use termimad::MadSkin;

use coach_runtime::{EvaluationView, Highlighter, RenderedResults};

pub struct Tui {
    rl: Mutex<DefaultEditor>,
    skin: MadSkin,
}

impl Tui {
    pub fn new() -> Result<Self> {
        Ok(Self {
            rl: Mutex::new(DefaultEditor::new()?),
            skin: Self::create_skin(),
        })
    }

    /// Matches are wrapped in markdown bold, which the skin paints yellow.
    pub fn highlighter() -> Highlighter {
        Highlighter::new("**", "**")
    }

    pub async fn select_item<S: ToString>(&self, prompt: &str, items: &[S]) -> Result<usize> {
        let theme = ColorfulTheme::default();
        let owned_items: Vec<String> = items.iter().map(|s| s.to_string()).collect();
        let prompt_owned = prompt.to_string();

        let selection = tokio::task::spawn_blocking(move || {
            Select::with_theme(&theme)
                .with_prompt(&prompt_owned)
                .default(0)
                .items(&owned_items)
                .interact()
        })
        .await?
        .context("User did not make a selection")?;
        Ok(selection)
    }

    /// `None` on Ctrl-C / Ctrl-D.
    pub fn get_user_input(&self, prompt: &str) -> Result<Option<String>> {
        tokio::task::block_in_place(|| {
            let mut rl = self.rl.lock().map_err(|_| anyhow!("line editor is unavailable"))?;
            match rl.readline(prompt) {
                Ok(line) => {
                    if !line.trim().is_empty() {
                        rl.add_history_entry(line.trim())?;
                    }
                    Ok(Some(line))
                }
                Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_input_or(&self, prompt: &str, default: &str) -> Result<String> {
        let line = self.get_user_input(&format!("{} [{}]: ", prompt, default))?.unwrap_or_default();
        let line = line.trim();
        Ok(if line.is_empty() { default.to_string() } else { line.to_string() })
    }

    pub fn create_spinner(&self, msg: &str) -> ProgressBar {
        let pb = ProgressBar::new_spinner();
        pb.enable_steady_tick(Duration::from_millis(120));
        if let Ok(style) = ProgressStyle::with_template("{spinner:.blue} {msg}") {
            pb.set_style(style.tick_strings(&["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"]));
        }
        pb.set_message(msg.to_string());
        pb
    }

    pub fn print_results(&self, rendered: &RenderedResults) {
        match rendered {
            RenderedResults::NoResults { message, hint } => {
                println!("{}", message.yellow().bold());
                println!("{}", hint.dimmed());
            }
            RenderedResults::Results { summary, matches } => {
                println!("{}", summary.green().bold());
                for item in matches {
                    println!(
                        "\n{} {}  {}  {}",
                        format!("#{}", item.rank).cyan(),
                        item.source.bold(),
                        format!("Page {}", item.page).dimmed(),
                        format!("{} match", item.similarity).magenta(),
                    );
                    self.skin.print_text(&item.text);
                }
            }
        }
    }

    pub fn print_evaluation(&self, view: &EvaluationView) {
        match view {
            EvaluationView::Success { score, interpretation, strengths, improvements, final_comment, .. } => {
                println!("\n{}", "AI Evaluation Results".cyan().bold());
                println!("{}  {}", score.bold(), interpretation);

                println!("\n{}", "Strengths".green().bold());
                for strength in strengths {
                    println!("  {} {}", "+".green(), strength);
                }
                println!("\n{}", "Areas for Improvement".yellow().bold());
                for improvement in improvements {
                    println!("  {} {}", "-".yellow(), improvement);
                }
                println!("\n{}", "Overall Feedback".bold());
                self.skin.print_text(final_comment);
            }
            EvaluationView::Error { error, message, instructions } => {
                println!("\n{} {}", "Evaluation Error:".red().bold(), error);
                if let Some(message) = message {
                    println!("{}", message);
                }
                if let Some(instructions) = instructions {
                    println!("{}", instructions.dimmed());
                }
            }
        }
    }

    pub fn print_markdown(&self, text: &str) {
        self.skin.print_text(text);
    }

    pub fn print_error(&self, err: &anyhow::Error) {
        println!("{} {:#}", "Error:".red().bold(), err);
    }

    fn create_skin() -> MadSkin {
        let mut skin = MadSkin::default_dark();
        skin.bold.set_fg(Color::Rgb { r: 255, g: 255, b: 85 });
        skin.italic.set_fg(Color::AnsiValue(245));
        skin.italic.add_attr(Attribute::Italic);
        skin.paragraph.set_fg(Color::AnsiValue(252));
        skin
    }
}
