//! mqlens CLI - Compile Kafka monitoring metrics to NRQL
//!
//! Usage:
//!   mqlens compile --provider <provider> --metric <metric> [--streaming] [--filter <clause>]...
//!   mqlens metrics [--provider <provider>] [--streaming]
//!   mqlens graph <counts|lookup|related|search> ...
//!
//! Examples:
//!   mqlens compile --provider AWS_MSK --metric total_clusters --streaming --filter "(aws.kafka.BrokerID) IN ('9')"
//!   mqlens compile --provider CONFLUENT_CLOUD --metric top_topics_by_incoming_throughput --since 60
//!   mqlens metrics --provider AWS_MSK
//!   mqlens graph lookup --topic orders --account-id 1234567

use clap::{Parser, Subcommand, ValueEnum};
use mqlens::build::{QueryBuilder, QueryRequest};
use mqlens::catalog::{Catalog, CollectionMethod, Lookup, MetricId, Provider};
use mqlens::config::Settings;
use mqlens::graph::{
    cluster_lookup_query, entity_count_query, entity_search_page, related_entities_query,
    EntityFilter, GraphQuery,
};
use mqlens::model::{FilterClause, MetricType, PrecomputedStatics, TimeRange};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "mqlens")]
#[command(about = "mqlens - Compile Kafka monitoring metrics to NRQL and NerdGraph queries")]
#[command(version)]
struct Cli {
    /// Path to a config file (defaults to mqlens.toml discovery)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Compile a catalog metric to NRQL
    Compile {
        /// Provider name (AWS_MSK, CONFLUENT_CLOUD)
        #[arg(short, long)]
        provider: String,

        /// Metric id, e.g. total_clusters
        #[arg(short, long)]
        metric: MetricId,

        /// Prefer metric-stream collection where the provider has it
        #[arg(long)]
        streaming: bool,

        /// Filter clause, e.g. "(provider.brokerId) IN ('1')"
        #[arg(short, long = "filter")]
        filters: Vec<String>,

        /// Extra FACET attribute
        #[arg(long = "facet")]
        facets: Vec<String>,

        /// Window in minutes (defaults to the configured window)
        #[arg(long)]
        since: Option<u64>,

        /// Use the navigator subquery shape
        #[arg(long)]
        navigator: bool,

        /// Join WHERE clauses with AND on every dialect
        #[arg(long)]
        strict_and_join: bool,

        #[arg(long, default_value_t = 0)]
        total_clusters: u64,

        #[arg(long, default_value_t = 0)]
        total_brokers: u64,

        #[arg(long, default_value_t = 0)]
        total_topics: u64,

        /// Output format
        #[arg(short, long, default_value = "nrql")]
        output: OutputFormat,
    },

    /// List catalog metrics
    Metrics {
        /// Only list this provider
        #[arg(short, long)]
        provider: Option<Provider>,

        /// List metric-stream templates
        #[arg(long)]
        streaming: bool,
    },

    /// Print a NerdGraph request body
    Graph {
        #[command(subcommand)]
        command: GraphCommand,
    },
}

#[derive(Subcommand)]
enum GraphCommand {
    /// Cluster counts for both providers
    Counts {
        #[arg(long, default_value = "TYPE")]
        facet: String,

        #[arg(long)]
        order_by: Option<String>,
    },

    /// Clusters owning the given brokers/topics
    Lookup {
        #[arg(long = "broker")]
        brokers: Vec<String>,

        #[arg(long = "topic")]
        topics: Vec<String>,

        /// Overrides the configured account id
        #[arg(long)]
        account_id: Option<u64>,
    },

    /// APM applications producing to or consuming from entities
    Related {
        #[arg(long = "guid", required = true)]
        guids: Vec<String>,

        #[arg(long)]
        cursor: Option<String>,
    },

    /// One page of an entity search
    Search {
        #[arg(short, long)]
        query: String,

        #[arg(long)]
        cursor: Option<String>,
    },
}

#[derive(Clone, ValueEnum)]
enum OutputFormat {
    /// Output NRQL only
    Nrql,
    /// Output the compiled query as JSON
    Json,
    /// Output the catalog template IR as JSON
    Ir,
}

fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "mqlens=warn".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => Settings::from_file(path),
        None => Settings::load(),
    };
    let settings = match settings {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error loading settings: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match cli.command {
        Commands::Compile {
            provider,
            metric,
            streaming,
            filters,
            facets,
            since,
            navigator,
            strict_and_join,
            total_clusters,
            total_brokers,
            total_topics,
            output,
        } => {
            let time_range = since
                .map(TimeRange::last_minutes)
                .unwrap_or_else(|| settings.default_time_range());
            let mut request = QueryRequest::new(provider, metric)
                .prefer_streaming(streaming)
                .navigator(navigator)
                .time_range(time_range)
                .statics(PrecomputedStatics {
                    total_clusters,
                    total_brokers,
                    total_topics,
                });
            request.filters = filters.into_iter().map(FilterClause::from).collect();
            request.extra_facets = facets;

            let mut options = settings.compile_options();
            options.strict_and_join |= strict_and_join;
            cmd_compile(&request, options, output)
        }
        Commands::Metrics {
            provider,
            streaming,
        } => cmd_metrics(provider, streaming),
        Commands::Graph { command } => cmd_graph(command, &settings),
    }
}

fn cmd_compile(
    request: &QueryRequest,
    options: mqlens::compile::CompileOptions,
    output: OutputFormat,
) -> ExitCode {
    if let OutputFormat::Ir = output {
        return print_template(request);
    }

    let compiled = match QueryBuilder::default().with_options(options).build(request) {
        Ok(compiled) => compiled,
        Err(e) => {
            eprintln!("Build error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    match output {
        OutputFormat::Nrql => {
            if compiled.is_empty() {
                eprintln!("Unsupported provider: {}", request.provider);
                return ExitCode::FAILURE;
            }
            println!("{}", compiled.nrql);
        }
        OutputFormat::Json | OutputFormat::Ir => match serde_json::to_string_pretty(&compiled) {
            Ok(json) => println!("{}", json),
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                return ExitCode::FAILURE;
            }
        },
    }
    ExitCode::SUCCESS
}

fn print_template(request: &QueryRequest) -> ExitCode {
    let method = match request.provider.parse::<Provider>() {
        Ok(provider) => CollectionMethod::resolve(request.prefer_streaming, provider),
        Err(_) => CollectionMethod::Polling,
    };

    match Catalog::builtin().lookup(&request.provider, method, request.metric) {
        Lookup::Found(template) => match serde_json::to_string_pretty(template) {
            Ok(json) => {
                println!("{}", json);
                ExitCode::SUCCESS
            }
            Err(e) => {
                eprintln!("Serialization error: {}", e);
                ExitCode::FAILURE
            }
        },
        Lookup::UnsupportedProvider => {
            eprintln!("Unsupported provider: {}", request.provider);
            ExitCode::FAILURE
        }
        Lookup::UnknownMetric => {
            eprintln!(
                "{} has no '{}' metric for {} collection",
                request.provider, request.metric, method
            );
            ExitCode::FAILURE
        }
    }
}

fn cmd_metrics(provider: Option<Provider>, streaming: bool) -> ExitCode {
    let catalog = Catalog::builtin();
    let providers: Vec<Provider> = match provider {
        Some(p) => vec![p],
        None => Provider::all().to_vec(),
    };

    for provider in providers {
        let method = CollectionMethod::resolve(streaming, provider);
        println!("{} ({}):", provider, method);
        for metric in catalog.metrics(provider, method) {
            println!("  - {}", metric);
        }
        println!();
    }

    ExitCode::SUCCESS
}

fn cmd_graph(command: GraphCommand, settings: &Settings) -> ExitCode {
    let query: GraphQuery = match command {
        GraphCommand::Counts { facet, order_by } => {
            entity_count_query(&facet, order_by.as_deref())
        }
        GraphCommand::Lookup {
            brokers,
            topics,
            account_id,
        } => {
            let account_id = match account_id {
                Some(id) => id,
                None => match settings.account_id() {
                    Ok(Some(id)) => id,
                    Ok(None) => {
                        eprintln!("No account id: pass --account-id or set graph.account_id");
                        return ExitCode::FAILURE;
                    }
                    Err(e) => {
                        eprintln!("Error reading account id: {}", e);
                        return ExitCode::FAILURE;
                    }
                },
            };

            let mut filters = vec![];
            if !brokers.is_empty() {
                filters.push(EntityFilter::new(MetricType::Broker, brokers));
            }
            if !topics.is_empty() {
                filters.push(EntityFilter::new(MetricType::Topic, topics));
            }
            cluster_lookup_query(account_id, &filters)
        }
        GraphCommand::Related { guids, cursor } => {
            related_entities_query(&guids, cursor.as_deref())
        }
        GraphCommand::Search { query, cursor } => entity_search_page(&query, cursor.as_deref()),
    };

    match query.to_json_pretty() {
        Ok(json) => {
            println!("{}", json);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("Serialization error: {}", e);
            ExitCode::FAILURE
        }
    }
}
