use std::process::ExitCode;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use metrics_exporter_prometheus::PrometheusBuilder;
use tracing_subscriber::EnvFilter;

use fake_news_verify::{
    app_state::AppState,
    config::AppConfig,
    controller::PageController,
    services::{api_client::ClassifierClient, pipeline::SubmitOutcome, samples::SampleSource},
};

#[derive(Parser)]
#[command(name = "fake-news-verify", version, about = "Check news content against the classifier")]
struct Cli {
    #[command(subcommand)]
    cmd: Cmd,

    /// Override FNV_API_BASE_URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Print collected metrics in Prometheus text format to stderr on exit
    #[arg(long, global = true)]
    metrics: bool,
}

#[derive(Subcommand)]
enum Cmd {
    /// Verify social media text or an article URL
    Verify {
        /// twitter, facebook, instagram, youtube, "news url" or news
        #[arg(long)]
        platform: Option<String>,
        /// Print the result card as JSON
        #[arg(long)]
        json: bool,
        /// Print the result card as HTML
        #[arg(long, conflicts_with = "json")]
        html: bool,
        content: Vec<String>,
    },
    /// Print a sample article (fake or real)
    Sample {
        #[arg(default_value = "fake")]
        kind: String,
    },
    /// Submit text through the detection form
    Detect { text: Vec<String> },
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize structured logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .json()
        .init();

    let cli = Cli::parse();

    // Load configuration from environment
    let mut config = AppConfig::from_env().expect("Failed to load configuration from environment");
    if let Some(url) = cli.api_base_url {
        config.api_base_url = url;
    }

    // Initialize Prometheus metrics recorder
    let prometheus_handle = PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");

    // Register application metrics
    metrics::describe_counter!(
        "verification_requests_total",
        "Verification requests sent to the classifier"
    );
    metrics::describe_counter!(
        "verification_failures_total",
        "Verification submissions that ended in an error"
    );
    metrics::describe_counter!(
        "verification_stale_total",
        "Verification responses discarded because a newer request was issued"
    );
    metrics::describe_histogram!(
        "verification_roundtrip_seconds",
        "Time between sending a verification request and its response"
    );
    metrics::describe_counter!(
        "sample_fallbacks_total",
        "Sample loads served from the built-in texts"
    );

    tracing::info!(api_base_url = %config.api_base_url, "Initializing classifier client");
    let client =
        ClassifierClient::from_config(&config).expect("Failed to initialize classifier client");

    let mut page = PageController::new(AppState::new(&config, Arc::new(client)));
    page.init();

    let ok = match cli.cmd {
        Cmd::Verify {
            platform,
            json,
            html,
            content,
        } => {
            let social = page.social();
            social.select_platform(platform.as_deref());
            social.set_input(&content.join(" "));
            tracing::debug!(
                platform = %social.effective_platform(),
                hint = social.platform_hint(),
                "Platform selected"
            );

            match social.submit().await {
                SubmitOutcome::Rendered(card) => {
                    if json {
                        match serde_json::to_string_pretty(&card) {
                            Ok(out) => println!("{out}"),
                            Err(e) => tracing::error!(error = %e, "Failed to encode result card"),
                        }
                    } else if html {
                        println!("{}", card.to_html());
                    } else {
                        print!("{card}");
                    }
                    true
                }
                SubmitOutcome::Failed(_) | SubmitOutcome::Ignored | SubmitOutcome::Superseded => {
                    false
                }
            }
        }
        Cmd::Sample { kind } => {
            let source = page.load_sample(&kind).await;
            if source == SampleSource::Fallback {
                tracing::debug!(sample_type = %kind, "Printing built-in sample");
            }
            println!("{}", page.detection().snapshot().input);
            true
        }
        Cmd::Detect { text } => {
            page.detection().set_input(&text.join(" "));
            match page.detection().submit() {
                Ok(submission) => match page.send_detection(&submission).await {
                    Ok(body) => {
                        println!("{body}");
                        true
                    }
                    Err(_) => false,
                },
                Err(_) => false,
            }
        }
    };

    if let Some(notification) = page.notifications().current() {
        eprintln!("[{}] {}", notification.kind, notification.message);
    }

    if cli.metrics {
        eprint!("{}", prometheus_handle.render());
    }

    if ok {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    }
}
