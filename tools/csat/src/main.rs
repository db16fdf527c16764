use analyzer::classify::{ChatOracle, Classifier};
use analyzer::collection::ProjectTranscripts;
use analyzer::config::AnalyzerConfig;
use analyzer::source::StoreClient;
use anyhow::Result;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AnalyzerConfig::from_env()?;

    let source = StoreClient::new(
        config.base_url.clone(),
        config.api_key.clone(),
        config.project_id.clone(),
    );
    let oracle = ChatOracle::new(
        config.oracle_url.clone(),
        config.oracle_key.clone().unwrap_or_default(),
        config.oracle_model.clone(),
        config.oracle_timeout,
    )?;
    let classifier = Classifier::new(oracle, config.test_mode);

    let mut project = ProjectTranscripts::new();
    project.fetch(&source, config.time_range, config.tag.as_deref())?;
    if project.transcripts.is_empty() {
        println!("No transcripts found.");
    }

    let rows = project.analyze(&source, &classifier, config.time_zone);
    for row in &rows {
        println!(
            "{}\t{}\t{}",
            row.transcript_id,
            row.session_id,
            row.rating.as_str()
        );
    }

    let summary = project.csat();
    println!("Average Session CSAT: {:.2}", summary.session_csat);
    println!("Average Transcript CSAT: {:.2}", summary.transcript_csat);
    Ok(())
}
