use crate::infra::{open_catalog, profile_extractor};
use chrono::{Local, NaiveDate};
use clap::Args;
use scholar_match::config::AppConfig;
use scholar_match::error::AppError;
use scholar_match::extraction::StructuredProfile;
use scholar_match::matching::{MatchReport, MatchRequest, MatchingService};
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct ExtractArgs {
    /// Plain-text transcript to extract from
    #[arg(long)]
    pub(crate) document: PathBuf,
}

#[derive(Args, Debug)]
pub(crate) struct MatchArgs {
    /// Plain-text transcript to extract from
    #[arg(long)]
    pub(crate) document: PathBuf,
    /// JSON or CSV scholarship catalog (defaults to MATCH_CATALOG_PATH)
    #[arg(long)]
    pub(crate) catalog: Option<PathBuf>,
    /// Major declared by the student; overrides the extracted program for matching
    #[arg(long)]
    pub(crate) major: Option<String>,
    /// Also list up to five offers the student is not eligible for
    #[arg(long)]
    pub(crate) include_non_eligible: bool,
    /// Date deadlines are compared against (YYYY-MM-DD). Defaults to today.
    #[arg(long, value_parser = crate::infra::parse_date)]
    pub(crate) today: Option<NaiveDate>,
}

pub(crate) fn run_extract(args: ExtractArgs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let document = fs::read_to_string(&args.document)?;

    let profile = profile_extractor(&config.matching).extract_profile(&document);
    println!("{}", serde_json::to_string_pretty(&profile)?);
    Ok(())
}

pub(crate) fn run_match(args: MatchArgs) -> Result<(), AppError> {
    let MatchArgs {
        document,
        catalog,
        major,
        include_non_eligible,
        today,
    } = args;

    let config = AppConfig::load()?;
    let text = fs::read_to_string(&document)?;
    let catalog = open_catalog(catalog.as_deref(), &config.matching)?;

    let profile = profile_extractor(&config.matching).extract_profile(&text);
    let profile = match major {
        Some(major) => profile.with_declared_major(major),
        None => profile,
    };

    let today = today.unwrap_or_else(|| Local::now().date_naive());
    let request = MatchRequest::new(today).including_non_eligible(include_non_eligible);
    let report = MatchingService::new(Arc::new(catalog)).match_profile(&profile, &request)?;

    render_profile(&profile);
    render_report(&report, today);
    Ok(())
}

fn render_profile(profile: &StructuredProfile) {
    println!("Student profile");
    println!(
        "- Name: {}",
        profile.name.as_deref().unwrap_or("(not found)")
    );
    println!(
        "- CGPA: {}",
        profile
            .score
            .map(|score| score.to_string())
            .unwrap_or_else(|| "(not found)".to_string())
    );
    println!(
        "- Program: {}",
        profile.program_translated.as_deref().unwrap_or("(not found)")
    );
    if let Some(major) = profile.declared_major.as_deref() {
        println!("- Declared major: {major}");
    }
    println!(
        "- Confidence: {:.3} ({} quality)",
        profile.confidence.overall,
        profile.quality_tier.label()
    );
}

fn render_report(report: &MatchReport, today: NaiveDate) {
    println!(
        "\nRanked scholarships ({} eligible of {} evaluated, as of {today})",
        report.matches.len(),
        report.evaluated
    );
    if report.matches.is_empty() {
        println!("- none");
    }
    for (rank, matched) in report.matches.iter().enumerate() {
        println!(
            "{}. {} [{}] score {} (rule {} + content {})",
            rank + 1,
            matched.offer.title,
            matched.offer.id,
            matched.score.total_score,
            matched.score.breakdown.rule_based_score,
            matched.score.breakdown.content_score
        );
        for reason in &matched.score.match_reasons {
            println!("   - {}", reason.text);
        }
    }

    if !report.non_eligible.is_empty() {
        println!("\nNot eligible");
        for entry in &report.non_eligible {
            let reasons: Vec<&str> = entry
                .reasons
                .iter()
                .map(|reason| reason.text.as_str())
                .collect();
            println!("- {}: {}", entry.offer.title, reasons.join("; "));
        }
    }
}
