use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use trugard_probe::probe::{self, ProbeOptions, QuerySource};
use trugard_probe::query::Preset;
use trugard_probe::telemetry::{self, OutputFormat, SubscriberConfig};

/// `--preset` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum PresetArg {
    Contracts,
    Contract,
}

impl From<PresetArg> for Preset {
    fn from(arg: PresetArg) -> Self {
        match arg {
            PresetArg::Contracts => Preset::ContractsBySignature,
            PresetArg::Contract => Preset::ContractByAddress,
        }
    }
}

/// `--log-format` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LogFormatArg {
    Text,
    Json,
}

impl From<LogFormatArg> for OutputFormat {
    fn from(arg: LogFormatArg) -> Self {
        match arg {
            LogFormatArg::Text => OutputFormat::Text,
            LogFormatArg::Json => OutputFormat::Json,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "trugard-probe",
    version,
    about = "Query the TruGard GraphQL API and print the shape of the response",
    after_help = "The API key is read from TRUGARD_API_KEY."
)]
struct Cli {
    #[arg(long, value_enum, default_value_t = PresetArg::Contracts, help = "Built-in query to send")]
    preset: PresetArg,
    #[arg(long, conflicts_with = "preset", help = "Read the GraphQL query from a file")]
    query_file: Option<PathBuf>,
    #[arg(long, help = "GraphQL endpoint URL (overrides TRUGARD_ENDPOINT)")]
    endpoint: Option<String>,
    #[arg(long, help = "Request timeout in seconds")]
    timeout: Option<u64>,
    #[arg(long, help = "Print the shape as JSON")]
    json: bool,
    #[arg(long, help = "Print the full data payload before the shape")]
    dump: bool,
    #[arg(long, default_value = "warn", help = "trace, debug, info, warn or error")]
    log_level: String,
    #[arg(long, value_enum, default_value_t = LogFormatArg::Text)]
    log_format: LogFormatArg,
}

impl Cli {
    fn probe_options(&self) -> ProbeOptions {
        let query = match &self.query_file {
            Some(path) => QuerySource::File(path.clone()),
            None => QuerySource::Preset(self.preset.into()),
        };
        ProbeOptions {
            query,
            endpoint: self.endpoint.clone(),
            timeout: self.timeout.map(Duration::from_secs),
            json: self.json,
            dump: self.dump,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let subscriber = SubscriberConfig::builder()
        .log_level_str(&cli.log_level)
        .map(|b| b.output_format(cli.log_format.into()).build());
    let init = subscriber.and_then(telemetry::init_subscriber);
    if let Err(e) = init {
        eprintln!("error: {e}");
        return ExitCode::from(2);
    }

    let options = cli.probe_options();
    let mut stdout = std::io::stdout().lock();
    match probe::run_with_lookup(|name| std::env::var(name).ok(), &options, &mut stdout).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::debug!(category = ?e.category(), "probe failed");
            eprintln!("error: {e}");
            ExitCode::FAILURE
        }
    }
}
