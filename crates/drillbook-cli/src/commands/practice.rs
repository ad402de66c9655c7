//! The `drillbook practice` command.

use std::io::{BufRead, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;

use drillbook_core::grade::Grader;
use drillbook_core::model::{QuestionBank, QuestionType};
use drillbook_core::notebook::WrongNotebook;
use drillbook_core::report::SessionSummary;
use drillbook_core::selection::PracticeMode;
use drillbook_core::session::SessionState;
use drillbook_store::{NotebookStore, ProgressStore};

use super::{load_one_bank, prompt, render_answer, render_question};
use crate::config::{load_config_from, DrillbookConfig};

const HELP: &str = "\
Commands:
  :skip, :s       skip this question
  :back, :b       previous question
  :jump N, :j N   go to question N of this session
  :reveal, :r     show the answer without grading
  :restart        clear answers and start over
  :quit, :q       save progress and exit
Anything else is graded as your answer.";

/// Options for a practice session, as given on the command line.
#[derive(Debug, Clone, Default)]
pub struct PracticeOptions {
    pub types: Vec<QuestionType>,
    pub focus: Option<QuestionType>,
    pub questions: Vec<usize>,
    pub limit: Option<usize>,
    pub seed: Option<u64>,
    pub fresh: bool,
    pub summary: Option<PathBuf>,
    pub format: String,
}

impl PracticeOptions {
    /// The practice mode these options select. `limit` of 0 means no cap.
    pub fn mode(&self, default_limit: usize) -> PracticeMode {
        let limit = match self.limit.unwrap_or(default_limit) {
            0 => None,
            n => Some(n),
        };
        if !self.questions.is_empty() {
            PracticeMode::Custom {
                numbers: self.questions.clone(),
            }
        } else if let Some(question_type) = self.focus {
            PracticeMode::Focus {
                question_type,
                limit,
            }
        } else {
            PracticeMode::Sequential {
                types: self.types.clone(),
                limit,
            }
        }
    }
}

pub fn execute(
    bank: PathBuf,
    options: PracticeOptions,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;
    let bank = load_one_bank(&config, &bank)?;

    let stdin = std::io::stdin();
    let stdout = std::io::stdout();
    run(&config, &bank, &options, &mut stdin.lock(), &mut stdout.lock())
}

/// Run a practice session reading answers from `input`.
pub fn run<R: BufRead, W: Write>(
    config: &DrillbookConfig,
    bank: &QuestionBank,
    options: &PracticeOptions,
    input: &mut R,
    out: &mut W,
) -> Result<()> {
    let progress = config.progress_store();
    let notebooks = config.notebook_store();
    let mode = options.mode(config.default_limit);
    let seed = options.seed.unwrap_or(config.sample_seed);
    let now = Utc::now();

    let resumed = if options.fresh {
        None
    } else {
        progress.load(&bank.id, now)?.filter(|saved| {
            let usable = saved.mode == mode && saved.verify(bank).is_ok();
            if !usable {
                tracing::info!(
                    "saved progress for '{}' does not match this selection, starting over",
                    bank.id
                );
            }
            usable
        })
    };
    let mut session = match resumed {
        Some(session) => {
            writeln!(
                out,
                "Resuming '{}' at question {} of {}",
                bank.id,
                session.position() + 1,
                session.len()
            )?;
            session
        }
        None => SessionState::start(bank, mode, seed, now)?,
    };

    let mut practice = Practice {
        bank,
        grader: config.grader(),
        notebook: notebooks.load(&bank.id)?,
        progress: &progress,
        notebooks: &notebooks,
    };
    writeln!(
        out,
        "Practicing '{}': {} question(s). Type :help for commands.",
        bank.id,
        session.len()
    )?;

    if !practice.drive(&mut session, input, out)? {
        return Ok(());
    }

    let summary = session.summary(bank);
    print_summary(out, &summary, &options.format)?;
    if let Some(path) = &options.summary {
        summary.save_json(path)?;
        writeln!(out, "Summary written to {}", path.display())?;
    }
    progress.clear(&bank.id)?;
    Ok(())
}

struct Practice<'a> {
    bank: &'a QuestionBank,
    grader: Grader,
    notebook: WrongNotebook,
    progress: &'a ProgressStore,
    notebooks: &'a NotebookStore,
}

impl Practice<'_> {
    /// Answer questions until the session finishes (returns `true`) or the
    /// learner quits (returns `false`).
    fn drive<R: BufRead, W: Write>(
        &mut self,
        session: &mut SessionState,
        input: &mut R,
        out: &mut W,
    ) -> Result<bool> {
        while let Some(question) = session.current(self.bank) {
            let heading = format!("[{}/{}]", session.position() + 1, session.len());
            render_question(out, &heading, question)?;

            let Some(line) = prompt(input, out, "> ")? else {
                self.save(session)?;
                writeln!(out, "Progress saved.")?;
                return Ok(false);
            };

            let (command, argument) = match line.split_once(char::is_whitespace) {
                Some((command, argument)) => (command, argument.trim()),
                None => (line.as_str(), ""),
            };
            match command {
                "" => writeln!(out, "Enter an answer, or :help for commands.")?,
                ":help" | ":h" => writeln!(out, "{HELP}")?,
                ":quit" | ":q" => {
                    self.save(session)?;
                    writeln!(out, "Progress saved.")?;
                    return Ok(false);
                }
                ":skip" | ":s" => session.advance()?,
                ":back" | ":b" => {
                    if !session.previous() {
                        writeln!(out, "Already at the first question.")?;
                    }
                }
                ":jump" | ":j" => match argument.parse::<usize>() {
                    Ok(number) => {
                        if let Err(e) = session.jump(number) {
                            writeln!(out, "{e}")?;
                        }
                    }
                    Err(_) => writeln!(out, "Usage: :jump N")?,
                },
                ":reveal" | ":r" => {
                    let question = session.reveal(self.bank)?;
                    render_answer(out, question)?;
                }
                ":restart" => {
                    session.reset(Utc::now());
                    writeln!(out, "Session restarted.")?;
                }
                _ => self.answer(session, &line, out)?,
            }
        }
        Ok(true)
    }

    fn answer<W: Write>(
        &mut self,
        session: &mut SessionState,
        line: &str,
        out: &mut W,
    ) -> Result<()> {
        let now = Utc::now();
        let question = session.current(self.bank).ok_or_else(|| anyhow::anyhow!("no question"))?;
        let assessment = session.submit(self.bank, &self.grader, line, now)?;

        if assessment.correct {
            writeln!(out, "Correct!")?;
        } else {
            writeln!(out, "Incorrect.")?;
        }
        if let Some(similarity) = assessment.similarity {
            writeln!(out, "Similarity: {:.0}%", similarity * 100.0)?;
        }
        if !assessment.correct || !question.explanation.is_empty() {
            render_answer(out, question)?;
        }

        self.notebook
            .record_submission(question, line, assessment.correct, now);
        session.advance()?;
        self.save(session)
    }

    fn save(&self, session: &SessionState) -> Result<()> {
        self.progress.save(session, Utc::now())?;
        self.notebooks.save(&self.notebook)
    }
}

fn print_summary<W: Write>(out: &mut W, summary: &SessionSummary, format: &str) -> Result<()> {
    match format {
        "markdown" | "md" => writeln!(out, "\n{}", summary.to_markdown())?,
        "json" => writeln!(out, "{}", serde_json::to_string_pretty(summary)?)?,
        _ => {
            writeln!(
                out,
                "\nFinished: {} of {} answered, {} correct ({:.1}%)",
                summary.answered,
                summary.total,
                summary.correct,
                summary.accuracy()
            )?;
            for missed in &summary.missed {
                writeln!(
                    out,
                    "  missed {}: you answered '{}', expected '{}'",
                    missed.question_id, missed.answer, missed.expected
                )?;
            }
        }
    }
    Ok(())
}
