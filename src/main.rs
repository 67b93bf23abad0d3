mod catalog;
mod cli;
mod config;
mod engine;
mod error;
mod extraction;
mod report;
mod session;
mod store;
mod telemetry;
mod types;

use crate::catalog::{CatalogProvider, JsonCatalog};
use crate::engine::{
    compute_cumulative_score, cumulative_inputs, normalize, Draft, DraftSource, ScoreBand,
};
use crate::error::{CalcError, ErrorKind};
use crate::extraction::{ExtractionService, HttpExtractor, RecordedExtractor};
use crate::session::{Session, SyncStatus};
use crate::store::feedback::{FeedbackLog, FeedbackRecord};
use crate::types::config::CalcConfig;
use crate::types::grade::Grade;
use crate::types::record::{CumulativeResult, UserRecord};
use chrono::Utc;
use clap::Parser;
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

pub mod exit_code {
    pub const SUCCESS: i32 = 0;
    pub const VALIDATION: i32 = 2;
    pub const RUNTIME_FAILURE: i32 = 3;
    pub const NOT_RECOGNIZED: i32 = 4;
    pub const TIMEOUT: i32 = 5;
}

fn run() -> Result<i32, CalcError> {
    let cli = cli::Cli::parse();
    telemetry::init(cli.verbose, cli.quiet)?;

    let data_dir = config::resolve_data_dir(cli.data_dir.as_deref());
    let cfg = config::load_config(&data_dir)?;
    let mut session = Session::open(&data_dir)?;

    match cli.command {
        cli::Commands::Gpa(cli::GpaCommand::Load(cmd)) => {
            let catalog = load_catalog(&data_dir, &cfg)?;
            let requested = cmd
                .stream
                .or_else(|| {
                    let stream = &session.user().stream;
                    (!stream.is_empty()).then(|| stream.clone())
                })
                .unwrap_or_else(|| cfg.catalog.default_stream.clone());
            let stream = canonical_stream(&catalog, &requested)?;
            let curriculum = catalog.curriculum(&stream, cmd.semester)?;
            let draft = Draft::new(&stream, cmd.semester, curriculum);
            session.drafts().save(&draft)?;
            print_draft(&draft);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Gpa(cli::GpaCommand::Grade(cmd)) => {
            let mut draft = session.drafts().require()?;
            apply_grades(&mut draft, &cmd.assignments)?;
            session.drafts().save(&draft)?;
            print_draft(&draft);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Gpa(cli::GpaCommand::Show) => {
            print_draft(&session.drafts().require()?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Gpa(cli::GpaCommand::Save(cmd)) => {
            let draft = session.drafts().require()?;
            let result = draft.promote(cmd.verified, Utc::now())?;
            let (id, period, score) = (result.id.clone(), result.period, result.score);
            let status = session.save_period(result)?;
            session.drafts().clear()?;
            println!("saved [{id}] Sem {period}: {score:.2}");
            report_sync(status);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Gpa(cli::GpaCommand::Discard) => {
            session.drafts().clear()?;
            println!("draft discarded");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Cgpa(cmd) => {
            let overrides = (1u32..)
                .zip(cmd.scores.iter().copied())
                .collect::<BTreeMap<_, _>>();
            let inputs = cumulative_inputs(&session.user().history, cmd.periods, &overrides)?;
            let score = compute_cumulative_score(&inputs, cmd.periods);
            println!(
                "CGPA over {} semesters: {score:.2} ({})",
                cmd.periods,
                ScoreBand::of(score).label()
            );

            if cmd.save {
                if !cmd.verified {
                    return Err(CalcError::Incomplete(
                        "review the semester scores and confirm with --verified before saving"
                            .to_string(),
                    ));
                }
                let result = CumulativeResult::new(score, cmd.periods, Utc::now());
                let id = result.id.clone();
                let status = session.save_cumulative(result)?;
                println!("saved [{id}]");
                report_sync(status);
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Scan(cmd) => {
            let image = std::fs::read(&cmd.image).map_err(|e| {
                CalcError::ExtractionFailed(format!("{}: {}", cmd.image.display(), e))
            })?;
            let service = extractor(&cfg, cmd.response.as_deref())?;
            let raw = extraction::extract_with_timeout(service, image, cfg.extraction_timeout())?;

            let catalog = load_catalog(&data_dir, &cfg)?;
            let normalized = normalize(&raw, &catalog, &cfg.normalizer_policy())?;
            if !normalized.stream_matched {
                eprintln!(
                    "warning: stream '{}' not recognized; using {}",
                    raw.detected_department, normalized.stream
                );
            }
            if normalized.unverified > 0 {
                eprintln!(
                    "warning: {} subject(s) not in the catalog; check their credits",
                    normalized.unverified
                );
            }

            let mut draft = Draft::from_extraction(normalized);
            session.drafts().save(&draft)?;
            apply_grades(&mut draft, &cmd.grades)?;
            session.drafts().save(&draft)?;
            print_draft(&draft);

            if !cmd.save {
                println!("draft kept; adjust with `gpa grade`, then `gpa save --verified`");
                return Ok(exit_code::SUCCESS);
            }
            // a refused save keeps the extracted rows as the draft
            let result = draft.promote(cmd.verified, Utc::now())?;
            let id = result.id.clone();
            let status = session.save_period(result)?;
            session.drafts().clear()?;
            println!("saved [{id}]");
            report_sync(status);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::History(cmd) => {
            let format = match cmd.format {
                cli::ReportFormat::Json => report::OutputFormat::Json,
                cli::ReportFormat::Md => report::OutputFormat::Md,
            };
            println!("{}", report::render(session.user(), format)?);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Delete(cmd) => {
            if session.delete(&cmd.id)? {
                println!("deleted [{}]", cmd.id);
            } else {
                println!("nothing to delete: {}", cmd.id);
            }
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Profile(cli::ProfileCommand::Create(cmd)) => {
            let user = session.register(&cmd.register, &cmd.name, &cmd.stream)?;
            println!("registered and signed in as {} ({})", user.name, user.register_number);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Profile(cli::ProfileCommand::Show) => {
            print_user(session.user());
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Login(cmd) => {
            let user = session.login(&cmd.register)?;
            println!("signed in as {} ({})", user.name, user.register_number);
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Logout => {
            session.logout()?;
            println!("signed out; local guest history cleared");
            Ok(exit_code::SUCCESS)
        }
        cli::Commands::Feedback(cmd) => {
            let record = FeedbackRecord::new(session.user(), cmd.rating, &cmd.comment, Utc::now())?;
            FeedbackLog::new(&data_dir).append(&record)?;
            println!("feedback recorded, thank you");
            Ok(exit_code::SUCCESS)
        }
    }
}

fn load_catalog(data_dir: &Path, cfg: &CalcConfig) -> Result<JsonCatalog, CalcError> {
    let path = config::resolve_path(data_dir, &cfg.catalog.path);
    JsonCatalog::load(&path, &cfg.catalog.extended_streams)
}

fn canonical_stream(catalog: &JsonCatalog, requested: &str) -> Result<String, CalcError> {
    let requested = requested.trim();
    Ok(catalog
        .streams()?
        .into_iter()
        .find(|stream| stream.id.eq_ignore_ascii_case(requested))
        .map(|stream| stream.id)
        .unwrap_or_else(|| requested.to_string()))
}

fn extractor(
    cfg: &CalcConfig,
    response: Option<&Path>,
) -> Result<Arc<dyn ExtractionService>, CalcError> {
    if let Some(path) = response {
        return Ok(Arc::new(RecordedExtractor::new(path)));
    }
    let endpoint = cfg.extraction.endpoint.as_deref().ok_or_else(|| {
        CalcError::ExtractionFailed(
            "no extraction endpoint configured; set extraction.endpoint or pass --response"
                .to_string(),
        )
    })?;
    let api_key = std::env::var(cfg.api_key_env())
        .ok()
        .filter(|key| !key.is_empty());
    Ok(Arc::new(HttpExtractor::new(
        endpoint,
        api_key,
        cfg.extraction_timeout(),
    )?))
}

fn apply_grades(draft: &mut Draft, assignments: &[(String, Grade)]) -> Result<(), CalcError> {
    for (code, grade) in assignments {
        draft.assign(code, *grade)?;
    }
    Ok(())
}

fn print_draft(draft: &Draft) {
    let source = match draft.source {
        DraftSource::Manual => "manual",
        DraftSource::Scan => "scan",
    };
    println!("{} semester {} ({source})", draft.stream, draft.period);
    for scored in &draft.subjects {
        println!(
            "  {:<8} {:<40} {:>4} {:>3}",
            scored.subject.code,
            scored.subject.name,
            scored.subject.credits,
            scored.grade.symbol()
        );
    }
    match draft.score() {
        Some(score) => println!("GPA: {score:.2} ({})", ScoreBand::of(score).label()),
        None => println!("GPA: pending ({})", draft.pending().join(", ")),
    }
}

fn print_user(user: &UserRecord) {
    println!("{} ({})", user.name, user.register_number);
    if !user.stream.is_empty() {
        println!("stream: {}", user.stream);
    }
    if user.is_guest {
        println!("guest: history is stored on this device only");
    }
    if !user.badges.is_empty() {
        println!("badges: {}", user.badges.join(", "));
    }
    if user.history.is_empty() {
        println!("saved: nothing yet");
    } else {
        println!(
            "saved: {} semester result(s), {} cumulative result(s)",
            user.history.periods.len(),
            user.history.cumulatives.len()
        );
    }
}

fn report_sync(status: SyncStatus) {
    match status {
        SyncStatus::Synced => println!("synced to profile"),
        SyncStatus::LocalOnly => println!("stored on this device (guest)"),
        SyncStatus::SyncFailed => {
            eprintln!("warning: profile sync failed; the result is kept on this device")
        }
    }
}

fn main() {
    match run() {
        Ok(code) => {
            if code != 0 {
                std::process::exit(code);
            }
        }
        Err(e) => {
            eprintln!("error: {}", e);
            let code = match e.kind() {
                ErrorKind::Validation => exit_code::VALIDATION,
                ErrorKind::Recognition => exit_code::NOT_RECOGNIZED,
                ErrorKind::Timeout => exit_code::TIMEOUT,
                ErrorKind::Runtime => exit_code::RUNTIME_FAILURE,
            };
            std::process::exit(code);
        }
    }
}
