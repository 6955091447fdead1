mod cli;
mod config;
mod discovery;
mod driver;
mod git;
mod plugin;
mod printer;
mod report;
mod utils;

use std::process::ExitCode;

use anyhow::{Context, Result};
use config::Config;
use discovery::Selection;
use driver::{FlutterTizen, INDENT};
use printer::TextPrinter;
use report::Results;
use tracing::info;

#[tokio::main]
async fn main() -> Result<ExitCode> {
    // Diagnostics go to stderr; stdout carries the report
    let _ = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .try_init();

    let args = cli::Cli::parse();
    let cfg = Config::load();

    // CLI overrides config
    let packages_dir = args.packages_dir.clone().unwrap_or_else(|| cfg.packages_dir());
    // The tool runs inside each example directory, so paths handed to it must not be relative
    let packages_dir = std::path::absolute(&packages_dir)
        .with_context(|| format!("resolving packages directory {}", packages_dir.display()))?;
    let timeout = args
        .timeout
        .map(std::time::Duration::from_secs)
        .unwrap_or_else(|| cfg.timeout());
    let tool = FlutterTizen {
        bin: args.tool.clone().unwrap_or_else(|| cfg.tool_bin()),
        timeout,
    };
    info!("config file: {}", cfg.config_path.display());
    info!(
        "packages: {}, profile: {:?}, timeout: {}s",
        packages_dir.display(),
        args.profile,
        timeout.as_secs()
    );

    let selection = Selection::from_flags(
        &args.plugins,
        args.run_on_changed_packages,
        args.base_sha.as_deref(),
    );
    let git = git::Git::new(cfg.git_bin(), &packages_dir);
    let plugin_names =
        discovery::select_plugins(&selection, &args.exclude, &packages_dir, &git)?;

    let mut results = Results::new();
    let mut aborted = None;
    let total = plugin_names.len();
    for (i, name) in plugin_names.iter().enumerate() {
        println!("{}Testing for {} ({}/{})", INDENT, name, i + 1, total);
        let result = match driver::drive_example_test(&packages_dir.join(name), &tool).await {
            Ok(result) => result,
            Err(e) => {
                aborted = Some(e.context(format!("testing {}", name)));
                break;
            }
        };
        if result.state == plugin::RunState::Skipped {
            println!("{}SKIPPING: {}", INDENT, name);
        }
        results.push(name.as_str(), result);
    }

    let mut printer = TextPrinter::stdout();
    if let Some(e) = aborted {
        // Report what did run before giving up
        results.print_aborted(&mut printer)?;
        return Err(e);
    }

    let code = results.print(&mut printer)?;
    if let Some(path) = &args.json_report {
        results.write_json(args.profile, path)?;
    }
    Ok(ExitCode::from(code))
}
