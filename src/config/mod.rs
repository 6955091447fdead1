use std::{
    collections::HashMap,
    env,
    fs,
    io::{BufRead, BufReader},
    path::{Path, PathBuf},
    time::Duration,
};

use directories::BaseDirs;

pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Debug, Clone)]
pub struct Config {
    inner: HashMap<String, String>,
    pub config_path: PathBuf,
}

impl Config {
    pub fn load() -> Self {
        let config_path = env::var_os("DRIVE_CONFIG_PATH")
            .map(PathBuf::from)
            .unwrap_or_else(default_config_path);
        let mut cfg = Self::load_from(&config_path);

        // Environment takes precedence over the rc file
        for (k, v) in env::vars() {
            if is_config_key(&k) {
                cfg.inner.insert(k, v);
            }
        }
        cfg
    }

    /// Defaults overlaid with the `KEY=VALUE` lines of `path`, if it exists.
    pub fn load_from(path: &Path) -> Self {
        let mut map = default_map();

        if let Ok(file) = fs::File::open(path) {
            let reader = BufReader::new(file);
            for line in reader.lines().map_while(Result::ok) {
                let line = line.trim();
                if line.is_empty() || line.starts_with('#') {
                    continue;
                }
                if let Some((k, v)) = line.split_once('=') {
                    map.insert(k.trim().to_string(), v.trim().to_string());
                }
            }
        }

        Self { inner: map, config_path: path.to_path_buf() }
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.inner.get(key).filter(|v| !v.is_empty()).cloned()
    }

    pub fn get_u64(&self, key: &str) -> Option<u64> {
        self.get(key).and_then(|v| v.parse::<u64>().ok())
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get(key).map(PathBuf::from)
    }

    pub fn packages_dir(&self) -> PathBuf {
        self.get_path("DRIVE_PACKAGES_DIR")
            .unwrap_or_else(|| PathBuf::from("packages"))
    }

    pub fn tool_bin(&self) -> String {
        self.get("DRIVE_TOOL_BIN").unwrap_or_else(|| "flutter-tizen".into())
    }

    pub fn git_bin(&self) -> String {
        self.get("DRIVE_GIT_BIN").unwrap_or_else(|| "git".into())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.get_u64("DRIVE_TIMEOUT").unwrap_or(DEFAULT_TIMEOUT_SECS))
    }
}

fn is_config_key(k: &str) -> bool {
    const KEYS: &[&str] = &[
        "DRIVE_PACKAGES_DIR",
        "DRIVE_TOOL_BIN",
        "DRIVE_GIT_BIN",
        "DRIVE_TIMEOUT",
    ];

    KEYS.contains(&k)
}

fn default_config_path() -> PathBuf {
    let base = BaseDirs::new()
        .map(|b| b.config_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from("~/.config"));
    base.join("drive_examples").join(".driverc")
}

fn default_map() -> HashMap<String, String> {
    let mut m = HashMap::new();
    m.insert("DRIVE_TOOL_BIN".into(), "flutter-tizen".into());
    m.insert("DRIVE_GIT_BIN".into(), "git".into());
    m.insert("DRIVE_TIMEOUT".into(), DEFAULT_TIMEOUT_SECS.to_string());
    m
}
