use std::fs;
use std::path::PathBuf;

use alerting_core::model::{EmailGroup, NO_ID};
use alerting_core::node::{
    FailedNode, JobInfo, JobSweeperMetrics, ScheduledJobStats, ScheduledJobStatus, ScheduledJobsStatsAction,
    ScheduledJobsStatsRequest, ScheduledJobsStatsResponse,
};
use alerting_core::transport::{ActionRegistry, BytesStreamInput, BytesStreamOutput, Writeable};
use alerting_core::xcontent::{
    JsonXContentBuilder, JsonXContentParser, ToXContent, ToXContentParams, XContentParser,
};
use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "alerting-cli", about = "Inspect alerting documents and node payloads")]
struct Cli {
    /// Debug-level logging (RUST_LOG still wins when set).
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Parse an email group JSON document and print it re-encoded.
    EmailGroup {
        file: PathBuf,

        /// Id to attach to the parsed group.
        #[arg(long)]
        id: Option<String>,

        /// Nest the output under "email_group".
        #[arg(long)]
        with_type: bool,

        #[arg(long)]
        pretty: bool,
    },
    /// Send a stats request over an in-memory stream, answer it from sample
    /// node data and read the response back through the registered reader.
    Stats {
        /// Nodes to ask; all nodes when omitted.
        #[arg(long = "node")]
        nodes: Vec<String>,

        /// Leave out sweeper metrics.
        #[arg(long)]
        no_metrics: bool,

        /// Leave out per-job info.
        #[arg(long)]
        no_jobs: bool,
    },
}

fn init_logger(verbose: bool) {
    let filter = if verbose {
        EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new("alerting_core=debug,alerting_cli=debug,info"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false).compact())
        .init();
}

fn email_group(file: PathBuf, id: Option<String>, with_type: bool, pretty: bool) -> Result<()> {
    let raw = fs::read(&file).with_context(|| format!("reading {}", file.display()))?;
    let mut parser = JsonXContentParser::from_slice(&raw)
        .with_context(|| format!("{} is not valid JSON", file.display()))?;
    parser.next_token()?;
    let group = EmailGroup::parse(&mut parser, id.as_deref().unwrap_or(NO_ID))
        .with_context(|| format!("{} is not a valid email group", file.display()))?;

    tracing::info!(
        name = group.name(),
        recipients = group.emails().len(),
        "email group parsed"
    );

    let params = if with_type {
        ToXContentParams::with_type()
    } else {
        ToXContentParams::empty()
    };
    let mut builder = JsonXContentBuilder::new();
    group.to_xcontent(&mut builder, &params)?;
    let out = if pretty {
        builder.into_pretty_string()?
    } else {
        builder.into_string()?
    };
    println!("{out}");
    Ok(())
}

fn sample_response() -> ScheduledJobsStatsResponse {
    ScheduledJobsStatsResponse {
        cluster_name: "local".to_string(),
        nodes: vec![
            ScheduledJobStats {
                node_id: "node-1".to_string(),
                status: ScheduledJobStatus::Enabled,
                sweeper_metrics: Some(JobSweeperMetrics {
                    last_full_sweep_time: Utc::now(),
                    full_sweep_on_time: true,
                }),
                job_infos: Some(vec![JobInfo {
                    index: ".opendistro-alerting-config".to_string(),
                    job_id: "monitor-1".to_string(),
                    descheduled: false,
                }]),
            },
            ScheduledJobStats {
                node_id: "node-2".to_string(),
                status: ScheduledJobStatus::Disabled,
                sweeper_metrics: None,
                job_infos: None,
            },
        ],
        failures: vec![FailedNode {
            node_id: "node-3".to_string(),
            reason: "node not connected".to_string(),
        }],
    }
}

/// Node side: keeps the requested nodes and drops the sections the request turned off.
fn answer(
    request: &ScheduledJobsStatsRequest,
    mut response: ScheduledJobsStatsResponse,
) -> ScheduledJobsStatsResponse {
    let wanted = |id: &str| request.node_ids.is_empty() || request.node_ids.iter().any(|n| n == id);
    response.nodes.retain(|n| wanted(&n.node_id));
    response.failures.retain(|f| wanted(&f.node_id));
    for node in &mut response.nodes {
        if !request.job_scheduling_metrics {
            node.sweeper_metrics = None;
        }
        if !request.jobs_info {
            node.job_infos = None;
        }
    }
    response
}

fn stats(nodes: Vec<String>, no_metrics: bool, no_jobs: bool) -> Result<()> {
    let mut registry = ActionRegistry::new();
    registry.register(ScheduledJobsStatsAction::INSTANCE)?;

    let request = ScheduledJobsStatsRequest::new(nodes)
        .with_job_scheduling_metrics(!no_metrics)
        .with_jobs_info(!no_jobs);
    let mut out = BytesStreamOutput::new();
    request.write_to(&mut out)?;
    tracing::debug!(bytes = out.len(), action = ScheduledJobsStatsAction::NAME, "request encoded");

    let mut received = ScheduledJobsStatsRequest::default();
    received
        .read_from(&mut BytesStreamInput::new(out.freeze()))
        .context("decoding stats request")?;

    let mut out = BytesStreamOutput::new();
    answer(&received, sample_response()).write_to(&mut out)?;
    let size = out.len();
    let mut input = BytesStreamInput::new(out.freeze());

    let response = registry
        .read_response::<ScheduledJobsStatsAction>(&mut input)
        .context("decoding stats response")?;

    println!(
        "{} ({size} bytes): cluster={} nodes={} failures={}",
        ScheduledJobsStatsAction::NAME,
        response.cluster_name,
        response.nodes.len(),
        response.failures.len()
    );
    for node in &response.nodes {
        let sweep = node
            .sweeper_metrics
            .as_ref()
            .map(|m| m.last_full_sweep_time.to_rfc3339())
            .unwrap_or_else(|| "-".to_string());
        let jobs = node.job_infos.as_ref().map_or(0, Vec::len);
        println!(
            "  {} status={:?} last_sweep={sweep} jobs={jobs}",
            node.node_id, node.status
        );
    }
    for failure in &response.failures {
        println!("  {} failed: {}", failure.node_id, failure.reason);
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match cli.command {
        Command::EmailGroup {
            file,
            id,
            with_type,
            pretty,
        } => email_group(file, id, with_type, pretty),
        Command::Stats {
            nodes,
            no_metrics,
            no_jobs,
        } => stats(nodes, no_metrics, no_jobs),
    }
}
