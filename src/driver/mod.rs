//! Drives a plugin's example app: every driver against every integration test target.

use std::{
    ffi::OsString,
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use tokio::process::Command;
use tracing::{debug, warn};

use crate::{
    plugin::PluginResult,
    utils::{status_with_timeout, Finished},
};

pub const INDENT: &str = "    ";

const TEST_FILE_SUFFIX: &str = "_test.dart";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriveOutcome {
    Passed,
    Failed { code: Option<i32> },
    TimedOut,
}

/// The external app tooling the runner shells out to.
pub trait Tool {
    /// Fetch the example app's dependencies; `false` if the fetch failed or timed out.
    async fn pub_get(&self, example_dir: &Path) -> Result<bool>;

    async fn drive(&self, example_dir: &Path, driver: &Path, target: &Path) -> Result<DriveOutcome>;
}

/// `flutter-tizen` (or a compatible binary) invoked as a child process.
#[derive(Debug, Clone)]
pub struct FlutterTizen {
    pub bin: String,
    pub timeout: Duration,
}

impl Tool for FlutterTizen {
    async fn pub_get(&self, example_dir: &Path) -> Result<bool> {
        let mut cmd = Command::new(&self.bin);
        cmd.args(["pub", "get"]).current_dir(example_dir);

        Ok(match status_with_timeout(&mut cmd, self.timeout).await? {
            Finished::Exited(s) => s.success(),
            Finished::TimedOut => false,
        })
    }

    async fn drive(&self, example_dir: &Path, driver: &Path, target: &Path) -> Result<DriveOutcome> {
        let mut cmd = Command::new(&self.bin);
        cmd.arg("drive")
            .arg(flag_arg("--driver=", driver))
            .arg(flag_arg("--target=", target))
            .current_dir(example_dir);

        Ok(match status_with_timeout(&mut cmd, self.timeout).await? {
            Finished::Exited(s) if s.success() => DriveOutcome::Passed,
            Finished::Exited(s) => DriveOutcome::Failed { code: s.code() },
            Finished::TimedOut => DriveOutcome::TimedOut,
        })
    }
}

fn flag_arg(flag: &str, path: &Path) -> OsString {
    let mut arg = OsString::from(flag);
    arg.push(path);
    arg
}

/// Run all driver/target pairs of the plugin at `plugin_dir`.
pub async fn drive_example_test<T: Tool>(plugin_dir: &Path, tool: &T) -> Result<PluginResult> {
    let example_dir = plugin_dir.join("example");
    if !example_dir.is_dir() {
        return Ok(PluginResult::skip("no example"));
    }

    let drivers_dir = example_dir.join("test_driver");
    if !drivers_dir.is_dir() {
        return Ok(PluginResult::skip("no driver"));
    }

    let targets_dir = example_dir.join("integration_test");
    if !targets_dir.is_dir() {
        return Ok(PluginResult::skip("no integration test"));
    }

    let drivers = test_files(&drivers_dir)?;
    let targets = test_files(&targets_dir)?;
    debug!(
        "{}: {} driver(s), {} target(s)",
        plugin_dir.display(),
        drivers.len(),
        targets.len()
    );

    if !tool.pub_get(&example_dir).await? {
        warn!("pub get failed in {}", example_dir.display());
    }

    let mut errors = Vec::new();
    for driver in &drivers {
        for target in &targets {
            println!(
                "{}running --driver {} --target {}",
                INDENT,
                file_name(driver),
                file_name(target)
            );
            match tool.drive(&example_dir, driver, target).await? {
                DriveOutcome::Passed => {}
                DriveOutcome::Failed { code } => {
                    debug!("{} exited with {:?}", target.display(), code);
                    errors.push(target.display().to_string());
                }
                DriveOutcome::TimedOut => errors.push(target.display().to_string()),
            }
        }
    }

    Ok(if errors.is_empty() { PluginResult::success() } else { PluginResult::fail(errors) })
}

fn test_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for entry in fs::read_dir(dir).with_context(|| format!("reading {}", dir.display()))? {
        let path = entry?.path();
        if path.is_file() && file_name(&path).ends_with(TEST_FILE_SUFFIX) {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use std::{collections::HashMap, sync::Mutex};

    use super::*;
    use crate::plugin::RunState;

    /// Scripted tool: outcome per target file name, `Passed` otherwise.
    #[derive(Default)]
    struct FakeTool {
        outcomes: HashMap<String, DriveOutcome>,
        pub_get_ok: bool,
        calls: Mutex<Vec<String>>,
    }

    impl FakeTool {
        fn new() -> Self {
            Self { pub_get_ok: true, ..Default::default() }
        }

        fn with(mut self, target: &str, outcome: DriveOutcome) -> Self {
            self.outcomes.insert(target.to_string(), outcome);
            self
        }

        fn calls(&self) -> Vec<String> {
            self.calls.lock().unwrap().clone()
        }
    }

    impl Tool for FakeTool {
        async fn pub_get(&self, _example_dir: &Path) -> Result<bool> {
            self.calls.lock().unwrap().push("pub get".into());
            Ok(self.pub_get_ok)
        }

        async fn drive(&self, _example_dir: &Path, driver: &Path, target: &Path) -> Result<DriveOutcome> {
            let target_name = file_name(target);
            self.calls
                .lock()
                .unwrap()
                .push(format!("{} {}", file_name(driver), target_name));
            Ok(self.outcomes.get(&target_name).copied().unwrap_or(DriveOutcome::Passed))
        }
    }

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "").unwrap();
    }

    /// A plugin with one driver and the given integration test files.
    fn plugin_with_targets(root: &Path, targets: &[&str]) -> PathBuf {
        let plugin = root.join("camera");
        touch(&plugin.join("example/test_driver/integration_test.dart"));
        for t in targets {
            touch(&plugin.join("example/integration_test").join(t));
        }
        plugin
    }

    #[tokio::test]
    async fn test_skip_without_example() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = dir.path().join("camera");
        touch(&plugin.join("test_driver/integration_test.dart"));
        touch(&plugin.join("integration_test/camera_test.dart"));

        let tool = FakeTool::new();
        let res = drive_example_test(&plugin, &tool).await.unwrap();
        assert_eq!(res, PluginResult::skip("no example"));
        assert!(tool.calls().is_empty());
    }

    #[tokio::test]
    async fn test_skip_reasons() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = dir.path().join("camera");
        fs::create_dir_all(plugin.join("example")).unwrap();
        let tool = FakeTool::new();

        let res = drive_example_test(&plugin, &tool).await.unwrap();
        assert_eq!(res, PluginResult::skip("no driver"));

        fs::create_dir_all(plugin.join("example/test_driver")).unwrap();
        let res = drive_example_test(&plugin, &tool).await.unwrap();
        assert_eq!(res, PluginResult::skip("no integration test"));
    }

    #[tokio::test]
    async fn test_all_pairs_pass() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_with_targets(dir.path(), &["b_test.dart", "a_test.dart", "helper.dart"]);
        touch(&plugin.join("example/test_driver/other_test.dart"));
        touch(&plugin.join("example/test_driver/driver_utils.dart"));

        let tool = FakeTool::new();
        let res = drive_example_test(&plugin, &tool).await.unwrap();
        assert_eq!(res.state, RunState::Succeeded);
        assert_eq!(
            tool.calls(),
            vec![
                "pub get",
                "integration_test.dart a_test.dart",
                "integration_test.dart b_test.dart",
                "other_test.dart a_test.dart",
                "other_test.dart b_test.dart",
            ]
        );
    }

    #[tokio::test]
    async fn test_failures_list_exact_targets() {
        let dir = tempfile::tempdir().unwrap();
        let plugin =
            plugin_with_targets(dir.path(), &["a_test.dart", "b_test.dart", "c_test.dart"]);

        let tool = FakeTool::new()
            .with("a_test.dart", DriveOutcome::Failed { code: Some(1) })
            .with("c_test.dart", DriveOutcome::TimedOut);
        let res = drive_example_test(&plugin, &tool).await.unwrap();

        let targets = plugin.join("example/integration_test");
        assert_eq!(
            res,
            PluginResult::fail(vec![
                targets.join("a_test.dart").display().to_string(),
                targets.join("c_test.dart").display().to_string(),
            ])
        );
    }

    #[tokio::test]
    async fn test_failed_pub_get_still_drives() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_with_targets(dir.path(), &["a_test.dart"]);
        let tool = FakeTool { pub_get_ok: false, ..Default::default() };

        let res = drive_example_test(&plugin, &tool).await.unwrap();
        assert_eq!(res.state, RunState::Succeeded);
        assert_eq!(tool.calls().len(), 2);
    }

    #[tokio::test]
    async fn test_no_targets_is_success() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_with_targets(dir.path(), &[]);
        fs::create_dir_all(plugin.join("example/integration_test")).unwrap();

        let res = drive_example_test(&plugin, &FakeTool::new()).await.unwrap();
        assert_eq!(res, PluginResult::success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_flutter_tizen_missing_binary_is_error() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_with_targets(dir.path(), &["a_test.dart"]);
        let tool = FlutterTizen {
            bin: "definitely-not-flutter-tizen".into(),
            timeout: Duration::from_secs(1),
        };
        let err = drive_example_test(&plugin, &tool).await.unwrap_err();
        assert!(err.to_string().contains("failed to start"));
    }

    #[cfg(unix)]
    fn script(dir: &Path, body: &str) -> String {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.join("fake-flutter-tizen");
        fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
        path.display().to_string()
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_hung_pub_get_times_out() {
        let dir = tempfile::tempdir().unwrap();
        let tool = FlutterTizen {
            bin: script(dir.path(), "sleep 30"),
            timeout: Duration::from_millis(200),
        };

        let started = std::time::Instant::now();
        let ok = tool.pub_get(dir.path()).await.unwrap();
        assert!(!ok);
        assert!(started.elapsed() < Duration::from_secs(10));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_drive_passes_paths_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let plugin = plugin_with_targets(dir.path(), &["a_test.dart"]);
        // fails unless both paths resolve from the example directory
        let tool = FlutterTizen {
            bin: script(
                dir.path(),
                r#"[ "$1" = pub ] && exit 0
[ -f "${2#--driver=}" ] && [ -f "${3#--target=}" ] || exit 2"#,
            ),
            timeout: Duration::from_secs(10),
        };

        let res = drive_example_test(&plugin, &tool).await.unwrap();
        assert_eq!(res, PluginResult::success());
    }

    #[test]
    fn test_flag_arg() {
        let arg = flag_arg("--target=", Path::new("/p/example/integration_test/a_test.dart"));
        assert_eq!(arg, OsString::from("--target=/p/example/integration_test/a_test.dart"));
    }
}
