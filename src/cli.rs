use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;

/// Device profile a test run targets.
#[derive(ValueEnum, Serialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Any device.
    #[default]
    Common,
    Wearable,
    Tv,
    Mobile,
    All,
}

#[derive(Parser, Debug, Clone)]
#[command(
    name = "drive-examples",
    about = "A script to run multiple tizen plugin driver tests.",
    version
)]
pub struct Cli {
    /// Specifies which plugins to test.
    ///
    /// If it is not specified and --run-on-changed-packages is also not specified,
    /// every plugin under the packages directory is included.
    #[arg(long, num_args = 0.., value_name = "PLUGIN")]
    pub plugins: Vec<String>,

    /// Exclude plugins to test: --exclude plugin1 plugin2 ...
    #[arg(long, num_args = 0.., value_name = "PLUGIN")]
    pub exclude: Vec<String>,

    /// Specifies which device profile target to test on.
    #[arg(long, value_enum, default_value_t = Profile::Common)]
    pub profile: Profile,

    /// Run the test on changed packages/plugins. Ignored when --plugins is given.
    #[arg(long = "run-on-changed-packages")]
    pub run_on_changed_packages: bool,

    /// The base sha used to determine git diff.
    ///
    /// Only used with --run-on-changed-packages. Defaults to the merge-base with FETCH_HEAD.
    #[arg(long = "base-sha", value_name = "REV")]
    pub base_sha: Option<String>,

    /// Directory holding the plugin packages (DRIVE_PACKAGES_DIR, else ./packages).
    #[arg(long = "packages-dir", value_name = "DIR")]
    pub packages_dir: Option<PathBuf>,

    /// Seconds to wait for a single driver/target run (DRIVE_TIMEOUT, else 300).
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Test-drive tool binary (DRIVE_TOOL_BIN, else flutter-tizen).
    #[arg(long, value_name = "BIN")]
    pub tool: Option<String>,

    /// Write the results as JSON to this file.
    #[arg(long = "json-report", value_name = "FILE")]
    pub json_report: Option<PathBuf>,
}

impl Cli {
    pub fn parse() -> Self {
        <Self as Parser>::parse()
    }
}
