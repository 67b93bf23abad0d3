use crate::types::grade::Grade;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "educalc",
    version,
    about = "Semester GPA and cumulative CGPA calculator with marksheet scanning"
)]
pub struct Cli {
    /// Increase verbosity (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Where records, drafts and config live (default: $EDUCALC_DATA_DIR or ~/.educalc)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fill in a semester grade form
    #[command(subcommand)]
    Gpa(GpaCommand),
    /// Cumulative CGPA over the first N semesters
    Cgpa(CgpaCommand),
    /// Read grades off a marksheet photo
    Scan(ScanCommand),
    /// Saved results for the active user
    History(HistoryCommand),
    /// Delete a saved result by id
    Delete(DeleteCommand),
    #[command(subcommand)]
    Profile(ProfileCommand),
    /// Sign in as a registered user
    Login(LoginCommand),
    /// End the session and drop back to a fresh guest
    Logout,
    /// Leave a rating and comment
    Feedback(FeedbackCommand),
}

#[derive(Subcommand)]
pub enum GpaCommand {
    /// Start a draft from the catalog curriculum
    Load(LoadCommand),
    /// Assign grades in the draft
    Grade(GradeCommand),
    Show,
    Save(SaveCommand),
    Discard,
}

#[derive(Args)]
pub struct LoadCommand {
    /// Stream id (defaults to the user's stream, then the configured default)
    #[arg(long)]
    pub stream: Option<String>,
    #[arg(long)]
    pub semester: u32,
}

#[derive(Args)]
pub struct GradeCommand {
    /// CODE=GRADE pairs, e.g. CS101=A+
    #[arg(required = true, value_parser = parse_assignment)]
    pub assignments: Vec<(String, Grade)>,
}

#[derive(Args)]
pub struct SaveCommand {
    /// Confirms the grades were reviewed
    #[arg(long)]
    pub verified: bool,
}

#[derive(Args)]
pub struct CgpaCommand {
    /// Number of semesters covered, 2-10
    #[arg(long)]
    pub periods: u32,
    /// Scores for semesters 1, 2, ... in order; saved history fills the rest
    #[arg(long, value_delimiter = ',')]
    pub scores: Vec<f64>,
    #[arg(long)]
    pub save: bool,
    #[arg(long, requires = "save")]
    pub verified: bool,
}

#[derive(Args)]
pub struct ScanCommand {
    pub image: PathBuf,
    /// Replay a saved extraction response instead of calling the service
    #[arg(long)]
    pub response: Option<PathBuf>,
    /// Corrections applied before scoring, CODE=GRADE
    #[arg(long = "grade", value_parser = parse_assignment)]
    pub grades: Vec<(String, Grade)>,
    #[arg(long)]
    pub save: bool,
    #[arg(long, requires = "save")]
    pub verified: bool,
}

#[derive(Args)]
pub struct HistoryCommand {
    #[arg(short, long, value_enum, default_value = "md")]
    pub format: ReportFormat,
}

#[derive(Args)]
pub struct DeleteCommand {
    pub id: String,
}

#[derive(Subcommand)]
pub enum ProfileCommand {
    /// Register a new profile and sign in as it
    Create(CreateProfileCommand),
    /// Show the active user
    Show,
}

#[derive(Args)]
pub struct CreateProfileCommand {
    #[arg(long)]
    pub register: String,
    #[arg(long)]
    pub name: String,
    #[arg(long)]
    pub stream: String,
}

#[derive(Args)]
pub struct LoginCommand {
    #[arg(long)]
    pub register: String,
}

#[derive(Args)]
pub struct FeedbackCommand {
    /// 1-5
    #[arg(long)]
    pub rating: u8,
    #[arg(long)]
    pub comment: String,
}

#[derive(Clone, ValueEnum)]
pub enum ReportFormat {
    Json,
    Md,
}

/// Parses `CODE=GRADE`; grades use the marksheet symbols (O, A+, A, B+, B, C, RA).
pub fn parse_assignment(raw: &str) -> Result<(String, Grade), String> {
    let (code, grade) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected CODE=GRADE, got '{raw}'"))?;
    let code = code.trim();
    if code.is_empty() {
        return Err(format!("missing subject code in '{raw}'"));
    }
    let grade = grade
        .trim()
        .to_uppercase()
        .parse::<Grade>()
        .map_err(|e| e.to_string())?;
    if !grade.is_set() {
        return Err(format!("'{raw}' does not assign a grade"));
    }
    Ok((code.to_string(), grade))
}
