use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use console::Term;
use followcheck::analysis::progress::ProgressCallback;
use followcheck::github::token::is_valid_login;
use followcheck::{export, AnalysisResult, Analyzer, Language, StateStore};
use tabled::Tabled;

use crate::config::Config;
use crate::messages;
use crate::progress::ProgressReporter;
use crate::AnalyzeOptions;

/// How often the background task refreshes the rate-limit snapshot.
const RATE_LIMIT_REFRESH_PERIOD: Duration = Duration::from_secs(30);

/// How many logins to print per category before truncating.
const MAX_LISTED_PER_CATEGORY: usize = 50;

pub(crate) async fn handle_analyze(
    login: &str,
    opts: &AnalyzeOptions,
    config: &Config,
) -> Result<(), Box<dyn std::error::Error>> {
    if !is_valid_login(login) {
        return Err(format!("'{login}' is not a valid GitHub username").into());
    }

    let is_tty = Term::stdout().is_term();
    if opts.no_rate_limit {
        crate::commands::shared::warn_no_rate_limit(is_tty);
    }

    let client =
        crate::commands::shared::build_client(opts.token.clone(), opts.no_rate_limit, config)?;
    if !client.has_token() && is_tty {
        eprintln!("No token configured - anonymous quota is 60 requests/hour.");
        eprintln!("Save one with: followcheck token set <TOKEN>\n");
    }

    // Best-effort snapshot refresh alongside the run; failures are logged
    // and ignored, never surfaced as pipeline failures.
    let refresh = client.spawn_rate_limit_refresh(RATE_LIMIT_REFRESH_PERIOD);

    let reporter = Arc::new(ProgressReporter::new());
    let callback: ProgressCallback = {
        let reporter = Arc::clone(&reporter);
        Box::new(move |event| reporter.handle(event))
    };

    let analyzer = Analyzer::new(client);
    let outcome = analyzer.analyze(login, Some(&callback)).await;
    refresh.abort();
    reporter.finish();

    let result = match outcome {
        Ok(result) => result,
        Err(error) => {
            if is_tty {
                eprintln!("\nAnalysis failed: {error}");
                eprintln!("Run the same command to retry, or analyze another user.");
            } else {
                tracing::error!(%error, "Analysis failed");
            }
            return Err(error.into());
        }
    };

    // History recording is best effort; a read-only state dir must not fail
    // the run.
    if let Some(store) = StateStore::open_default() {
        if let Err(error) = store.record_analysis(&result) {
            tracing::warn!(%error, "failed to record analysis history");
        }
    }

    if opts.json {
        println!("{}", export::to_document(&result)?);
    } else {
        print_summary(&result, config.language());
        if let Some(line) =
            crate::commands::shared::describe_quota(analyzer.client().tracker().latest())
        {
            println!("\n{line}");
        }
    }

    if opts.export || opts.output.is_some() {
        let path = opts
            .output
            .clone()
            .unwrap_or_else(|| PathBuf::from(export::export_file_name(&result)));
        fs::write(&path, export::to_document(&result)?)?;
        if is_tty {
            println!("Exported to {}", path.display());
        } else {
            tracing::info!(path = %path.display(), "Exported analysis document");
        }
    }

    Ok(())
}

/// One row of the summary stats table.
#[derive(Tabled)]
struct StatsRow {
    #[tabled(rename = "Metric")]
    metric: &'static str,
    #[tabled(rename = "Count")]
    count: usize,
}

fn print_summary(result: &AnalysisResult, language: Language) {
    let msg = messages::for_language(language);

    println!();
    println!(
        "{}",
        msg.completed.replace("{login}", &result.target_login)
    );
    println!(
        "{}: {}",
        msg.analyzed_at,
        result.completed_at.format("%Y-%m-%d %H:%M:%S UTC")
    );
    println!();

    let rows = vec![
        StatsRow {
            metric: msg.followers,
            count: result.stats.total_followers,
        },
        StatsRow {
            metric: msg.following,
            count: result.stats.total_following,
        },
        StatsRow {
            metric: msg.mutual,
            count: result.stats.mutual_count,
        },
        StatsRow {
            metric: msg.following_only,
            count: result.stats.following_only_count,
        },
        StatsRow {
            metric: msg.follower_only,
            count: result.stats.follower_only_count,
        },
    ];
    let mut table = tabled::Table::new(rows);
    table.with(tabled::settings::Style::rounded());
    println!("{table}");

    print_category(msg.mutual, &result.mutual, msg.none_in_category);
    print_category(msg.following_only, &result.following_only, msg.none_in_category);
    print_category(msg.follower_only, &result.follower_only, msg.none_in_category);
}

fn print_category(
    title: &str,
    records: &[followcheck::RelationshipRecord],
    empty_label: &str,
) {
    println!("\n{title}:");
    if records.is_empty() {
        println!("  {empty_label}");
        return;
    }
    for record in records.iter().take(MAX_LISTED_PER_CATEGORY) {
        match &record.account.name {
            Some(name) => println!("  @{} ({name})", record.account.login),
            None => println!("  @{}", record.account.login),
        }
    }
    if records.len() > MAX_LISTED_PER_CATEGORY {
        println!("  ... and {} more", records.len() - MAX_LISTED_PER_CATEGORY);
    }
}
