//! Env-file backed configuration store.
//!
//! A [`ConfigStore`] is constructed once per process (or per test) and
//! performs discovery, file creation, merge, and reconciliation eagerly
//! during construction; there is no separate load step. The
//! construction sequence:
//!
//! 1. Resolve the working directory (explicit env-file parent, or the
//!    [`locate`](crate::locate) walk).
//! 2. Create the working directory and an empty env file if missing.
//! 3. Load file pairs into the [`Env`] file layer; overrides win.
//! 4. Reconcile the reserved `WORKING_DIRECTORY` key against the
//!    freshly computed path, rewriting the file if they differ.
//! 5. Parse typed [`Settings`] and ensure input/output/cache exist.

use std::fmt;
use std::io::{BufRead, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use crate::env::Env;
use crate::envfile;
use crate::error::{Result, ScaffoldError};
use crate::locate::{self, DEFAULT_MARKER, ResolvePolicy};

/// File name used when the store resolves its own location.
pub const ENV_FILE_NAME: &str = ".env";

/// The single key the store manages automatically.
pub const WORKING_DIRECTORY_KEY: &str = "WORKING_DIRECTORY";

/// Suffix for credential lookups (`<SERVICE>_API_KEY`).
const API_KEY_SUFFIX: &str = "_API_KEY";

const DEFAULT_APP_NAME: &str = "PrismQ.ModuleName";
const DEFAULT_LOG_LEVEL: &str = "INFO";
const DEFAULT_PYTHON_EXECUTABLE: &str = "python";
const DEFAULT_INPUT_DIR: &str = "./input";
const DEFAULT_OUTPUT_DIR: &str = "./output";
const DEFAULT_CACHE_DIR: &str = "./cache";

/// Deployment environment for a scaffolded module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppEnv {
    #[default]
    Development,
    Production,
    Testing,
}

impl AppEnv {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Production => "production",
            Self::Testing => "testing",
        }
    }

    /// Parse leniently: unknown values warn and fall back to
    /// `Development` so construction never fails on a typo.
    #[must_use]
    pub fn parse_lenient(value: &str) -> Self {
        match value {
            "development" => Self::Development,
            "production" => Self::Production,
            "testing" => Self::Testing,
            other => {
                warn!(value = other, "Unrecognized APP_ENV, using development");
                Self::Development
            }
        }
    }
}

impl fmt::Display for AppEnv {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed view over the recognized configuration keys.
#[derive(Debug, Clone)]
pub struct Settings {
    /// `APP_NAME` (alias `MODULE_NAME`).
    pub app_name: String,
    /// `APP_ENV` (alias `MODULE_ENV`).
    pub app_env: AppEnv,
    /// `DEBUG`, true only for case-insensitive `"true"`.
    pub debug: bool,
    /// `LOG_LEVEL`.
    pub log_level: String,
    /// `LOG_FILE`; when set, log output is duplicated to this file.
    pub log_file: Option<PathBuf>,
    /// `INPUT_DIR`, resolved against the working directory.
    pub input_dir: PathBuf,
    /// `OUTPUT_DIR`, resolved against the working directory.
    pub output_dir: PathBuf,
    /// `CACHE_DIR`, resolved against the working directory.
    pub cache_dir: PathBuf,
    /// `PYTHON_EXECUTABLE`.
    pub python_executable: String,
}

impl Settings {
    fn from_env(env: &Env, working_dir: &Path) -> Self {
        let app_name = env
            .get_nonempty("APP_NAME")
            .or_else(|| env.get_nonempty("MODULE_NAME"))
            .unwrap_or(DEFAULT_APP_NAME)
            .to_string();
        let app_env = env
            .get_nonempty("APP_ENV")
            .or_else(|| env.get_nonempty("MODULE_ENV"))
            .map_or_else(AppEnv::default, AppEnv::parse_lenient);
        let debug = env
            .get_nonempty("DEBUG")
            .is_some_and(|v| v.eq_ignore_ascii_case("true"));

        Self {
            app_name,
            app_env,
            debug,
            log_level: env.get_or("LOG_LEVEL", DEFAULT_LOG_LEVEL),
            log_file: env.get_nonempty("LOG_FILE").map(PathBuf::from),
            input_dir: resolve_against(working_dir, &env.get_or("INPUT_DIR", DEFAULT_INPUT_DIR)),
            output_dir: resolve_against(working_dir, &env.get_or("OUTPUT_DIR", DEFAULT_OUTPUT_DIR)),
            cache_dir: resolve_against(working_dir, &env.get_or("CACHE_DIR", DEFAULT_CACHE_DIR)),
            python_executable: env.get_or("PYTHON_EXECUTABLE", DEFAULT_PYTHON_EXECUTABLE),
        }
    }
}

/// Options for [`ConfigStore::open`].
#[derive(Debug, Clone)]
pub struct StoreOptions {
    /// Explicit env-file path. When set, the working directory is its
    /// absolutized parent and no marker search happens.
    pub env_file: Option<PathBuf>,
    /// Whether missing required values may prompt on the console.
    pub interactive: bool,
    /// Marker directory name for discovery.
    pub marker: String,
    /// Ancestor-resolution policy.
    pub policy: ResolvePolicy,
    /// Where the ancestor walk starts. Defaults to the process cwd.
    pub search_from: Option<PathBuf>,
    /// Extra override-layer entries applied on top of the process
    /// environment snapshot.
    pub overrides: Vec<(String, String)>,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            env_file: None,
            interactive: true,
            marker: DEFAULT_MARKER.to_string(),
            policy: ResolvePolicy::default(),
            search_from: None,
            overrides: Vec::new(),
        }
    }
}

impl StoreOptions {
    /// Non-interactive options pointing at an explicit env file.
    #[must_use]
    pub fn with_env_file(path: impl Into<PathBuf>) -> Self {
        Self {
            env_file: Some(path.into()),
            interactive: false,
            ..Self::default()
        }
    }
}

/// The configuration store.
#[derive(Debug)]
pub struct ConfigStore {
    working_directory: PathBuf,
    env_file: PathBuf,
    env: Env,
    settings: Settings,
    interactive: bool,
}

impl ConfigStore {
    /// Construct a store, eagerly performing discovery, file creation,
    /// merge, and reconciliation.
    ///
    /// # Errors
    ///
    /// Returns `CreateDirectory` if the working directory or a semantic
    /// directory cannot be created, `EnvFileWrite` if reconciliation
    /// cannot persist the reserved key, or `Io` if the process cwd is
    /// unavailable. Env-file *read* failures are not fatal: the store
    /// continues with an empty file layer (warned when interactive).
    pub fn open(options: StoreOptions) -> Result<Self> {
        let (working_directory, env_file) = match options.env_file {
            Some(path) => {
                let parent = match path.parent() {
                    Some(p) if p.as_os_str().is_empty() => PathBuf::from("."),
                    Some(p) => p.to_path_buf(),
                    None => PathBuf::from("."),
                };
                create_dir_all(&parent)?;
                let parent = absolutize(&parent)?;
                let file = match path.file_name() {
                    Some(name) => parent.join(name),
                    None => parent.join(ENV_FILE_NAME),
                };
                (parent, file)
            }
            None => {
                let start = match options.search_from {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                let resolved = locate::resolve(&start, &options.marker, options.policy);
                create_dir_all(&resolved)?;
                let resolved = absolutize(&resolved)?;
                let file = resolved.join(ENV_FILE_NAME);
                (resolved, file)
            }
        };

        if !env_file.exists() {
            std::fs::write(&env_file, "").map_err(|e| ScaffoldError::EnvFileWrite {
                path: env_file.clone(),
                source: e,
            })?;
        }

        let mut env = Env::from_process();
        for (key, value) in options.overrides {
            env.set(key, value);
        }

        match envfile::load(&env_file) {
            Ok(pairs) => env.merge_file_pairs(pairs),
            Err(err) => {
                if options.interactive {
                    eprintln!("[warning] failed to load {}: {err}", env_file.display());
                } else {
                    debug!(path = %env_file.display(), error = %err, "Env file load failed");
                }
            }
        }

        // Reconcile the reserved key: the persisted value always
        // reflects the most recent resolution, while user keys are
        // never clobbered by a repeated run.
        let computed = working_directory.display().to_string();
        if env.get(WORKING_DIRECTORY_KEY) != Some(computed.as_str()) {
            envfile::set_key(&env_file, WORKING_DIRECTORY_KEY, &computed)?;
            env.set(WORKING_DIRECTORY_KEY, computed);
        }

        let settings = Settings::from_env(&env, &working_directory);
        let store = Self {
            working_directory,
            env_file,
            env,
            settings,
            interactive: options.interactive,
        };
        store.ensure_working_dirs()?;

        Ok(store)
    }

    /// Create the input/output/cache directories. Idempotent.
    ///
    /// # Errors
    ///
    /// Returns `CreateDirectory` on failure; not retried.
    pub fn ensure_working_dirs(&self) -> Result<()> {
        for dir in [
            &self.settings.input_dir,
            &self.settings.output_dir,
            &self.settings.cache_dir,
        ] {
            create_dir_all(dir)?;
        }
        Ok(())
    }

    /// Look up `key`, falling back to `default` when absent or empty.
    #[must_use]
    pub fn get_or(&self, key: &str, default: &str) -> String {
        self.env.get_or(key, default)
    }

    /// Look up `key`; in interactive mode, prompt the operator for a
    /// missing value and persist the entry. End-of-input, read errors,
    /// and blank entries all mean "use the default" and are never
    /// fatal. Non-interactive mode never touches stdin.
    pub fn get_or_prompt(&mut self, key: &str, description: &str, default: &str) -> String {
        self.get_or_prompt_from(key, description, default, &mut std::io::stdin().lock())
    }

    /// [`get_or_prompt`](Self::get_or_prompt) with the prompt input
    /// supplied by the caller instead of stdin.
    fn get_or_prompt_from(
        &mut self,
        key: &str,
        description: &str,
        default: &str,
        input: &mut dyn BufRead,
    ) -> String {
        if let Some(value) = self.env.get_nonempty(key) {
            return value.to_string();
        }
        if !self.interactive {
            return default.to_string();
        }

        let entered = prompt_line(description, default, input);
        match entered {
            Some(value) if !value.is_empty() => {
                if let Err(err) = envfile::set_key(&self.env_file, key, &value) {
                    eprintln!("[warning] failed to persist {key}: {err}");
                }
                self.env.set(key, value.clone());
                value
            }
            _ => default.to_string(),
        }
    }

    /// Credential lookup: maps a service name to `<SERVICE>_API_KEY`
    /// and returns its value, or `None` when unset or empty.
    #[must_use]
    pub fn api_key(&self, service: &str) -> Option<String> {
        let var = format!("{}{API_KEY_SUFFIX}", service.to_uppercase());
        self.env.get_nonempty(&var).map(str::to_string)
    }

    /// Persist a key and update the lookup layers.
    ///
    /// # Errors
    ///
    /// Returns `InvalidKey` or `EnvFileWrite` from the underlying write.
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        envfile::set_key(&self.env_file, key, value)?;
        self.env.set(key, value);
        Ok(())
    }

    #[must_use]
    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    #[must_use]
    pub fn env_file(&self) -> &Path {
        &self.env_file
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn env(&self) -> &Env {
        &self.env
    }
}

fn prompt_line(description: &str, default: &str, input: &mut dyn BufRead) -> Option<String> {
    let stderr = std::io::stderr();
    let mut handle = stderr.lock();
    write!(handle, "{description} [{default}]: ").ok()?;
    handle.flush().ok()?;

    let mut buf = String::new();
    match input.read_line(&mut buf) {
        // 0 bytes means the input is closed; treat like an empty entry.
        Ok(0) | Err(_) => None,
        Ok(_) => Some(buf.trim().to_string()),
    }
}

fn create_dir_all(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).map_err(|e| ScaffoldError::CreateDirectory {
        path: path.to_path_buf(),
        source: e,
    })
}

fn absolutize(path: &Path) -> Result<PathBuf> {
    Ok(dunce::canonicalize(path)?)
}

fn resolve_against(base: &Path, value: &str) -> PathBuf {
    let path = Path::new(value);
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        base.join(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options_for(path: &Path) -> StoreOptions {
        StoreOptions::with_env_file(path)
    }

    #[test]
    fn test_working_directory_is_parent_of_explicit_path() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");

        let store = ConfigStore::open(options_for(&env_path)).unwrap();

        let expected = dunce::canonicalize(dir.path()).unwrap();
        assert_eq!(store.working_directory(), expected);
    }

    #[test]
    fn test_creates_env_file_and_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let wd = dir.path().join("fresh");
        let env_path = wd.join(".env");
        assert!(!wd.exists());

        let store = ConfigStore::open(options_for(&env_path)).unwrap();

        assert!(wd.is_dir());
        assert!(store.env_file().is_file());
    }

    #[test]
    fn test_reserved_key_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");

        for _ in 0..3 {
            ConfigStore::open(options_for(&env_path)).unwrap();
        }

        let content = std::fs::read_to_string(&env_path).unwrap();
        let count = content
            .lines()
            .filter(|l| l.starts_with("WORKING_DIRECTORY="))
            .count();
        assert_eq!(count, 1);
    }

    #[test]
    fn test_stale_working_directory_is_rewritten() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "WORKING_DIRECTORY=/stale/path\n").unwrap();

        let store = ConfigStore::open(options_for(&env_path)).unwrap();

        let content = std::fs::read_to_string(&env_path).unwrap();
        assert!(!content.contains("/stale/path"));
        assert!(content.contains(&format!(
            "WORKING_DIRECTORY={}",
            store.working_directory().display()
        )));
    }

    #[test]
    fn test_user_keys_preserved() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "# site config\nAPP_NAME=CustomApp\n").unwrap();

        let store = ConfigStore::open(options_for(&env_path)).unwrap();
        assert_eq!(store.settings().app_name, "CustomApp");

        let content = std::fs::read_to_string(&env_path).unwrap();
        assert!(content.contains("# site config"));
        assert!(content.contains("APP_NAME=CustomApp"));
    }

    #[test]
    fn test_overrides_beat_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "APP_NAME=FromFile\n").unwrap();

        let mut options = options_for(&env_path);
        options
            .overrides
            .push(("APP_NAME".to_string(), "FromEnv".to_string()));

        let store = ConfigStore::open(options).unwrap();
        assert_eq!(store.settings().app_name, "FromEnv");

        // The file keeps its own value; only the reserved key is managed.
        let content = std::fs::read_to_string(&env_path).unwrap();
        assert!(content.contains("APP_NAME=FromFile"));
    }

    #[test]
    fn test_settings_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");

        let store = ConfigStore::open(options_for(&env_path)).unwrap();
        let settings = store.settings();

        assert_eq!(settings.app_name, DEFAULT_APP_NAME);
        assert_eq!(settings.app_env, AppEnv::Development);
        assert!(!settings.debug);
        assert_eq!(settings.log_level, "INFO");
        assert_eq!(settings.python_executable, "python");
        assert!(settings.log_file.is_none());
    }

    #[test]
    fn test_debug_parsing_is_case_insensitive() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "DEBUG=TRUE\n").unwrap();

        let store = ConfigStore::open(options_for(&env_path)).unwrap();
        assert!(store.settings().debug);
    }

    #[test]
    fn test_semantic_dirs_created_under_working_dir() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");

        let store = ConfigStore::open(options_for(&env_path)).unwrap();
        let settings = store.settings();

        for path in [&settings.input_dir, &settings.output_dir, &settings.cache_dir] {
            assert!(path.is_dir());
            assert!(path.starts_with(store.working_directory()));
        }
    }

    #[test]
    fn test_get_or_prompt_non_interactive_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");

        let mut store = ConfigStore::open(options_for(&env_path)).unwrap();

        assert_eq!(
            store.get_or_prompt("NONEXISTENT_KEY", "Some description", "default_value"),
            "default_value"
        );

        store.set("PRESENT_KEY", "present").unwrap();
        assert_eq!(
            store.get_or_prompt("PRESENT_KEY", "Some description", "default_value"),
            "present"
        );
    }

    struct FailingReader;

    impl std::io::Read for FailingReader {
        fn read(&mut self, _: &mut [u8]) -> std::io::Result<usize> {
            Err(std::io::Error::other("terminal gone"))
        }
    }

    impl BufRead for FailingReader {
        fn fill_buf(&mut self) -> std::io::Result<&[u8]> {
            Err(std::io::Error::other("terminal gone"))
        }

        fn consume(&mut self, _: usize) {}
    }

    fn interactive_store(env_path: &Path) -> ConfigStore {
        let options = StoreOptions {
            interactive: true,
            ..StoreOptions::with_env_file(env_path)
        };
        ConfigStore::open(options).unwrap()
    }

    #[test]
    fn test_interactive_prompt_persists_entered_value() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        let mut store = interactive_store(&env_path);

        let mut input = std::io::Cursor::new(b"sk-entered\n".to_vec());
        let value = store.get_or_prompt_from("HF_TOKEN", "Hugging Face token", "", &mut input);
        assert_eq!(value, "sk-entered");

        // Persisted to the file and visible on the next lookup.
        let content = std::fs::read_to_string(&env_path).unwrap();
        assert!(content.contains("HF_TOKEN=sk-entered"));
        assert_eq!(store.get_or("HF_TOKEN", ""), "sk-entered");
    }

    #[test]
    fn test_interactive_prompt_eof_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        let mut store = interactive_store(&env_path);

        let mut input = std::io::Cursor::new(Vec::new());
        let value = store.get_or_prompt_from("HF_TOKEN", "Hugging Face token", "anon", &mut input);
        assert_eq!(value, "anon");

        let content = std::fs::read_to_string(&env_path).unwrap();
        assert!(!content.contains("HF_TOKEN"));
    }

    #[test]
    fn test_interactive_prompt_blank_entry_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        let mut store = interactive_store(&env_path);

        let mut input = std::io::Cursor::new(b"   \n".to_vec());
        let value = store.get_or_prompt_from("HF_TOKEN", "Hugging Face token", "anon", &mut input);
        assert_eq!(value, "anon");

        let content = std::fs::read_to_string(&env_path).unwrap();
        assert!(!content.contains("HF_TOKEN"));
    }

    #[test]
    fn test_interactive_prompt_read_error_uses_default() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        let mut store = interactive_store(&env_path);

        let value =
            store.get_or_prompt_from("HF_TOKEN", "Hugging Face token", "anon", &mut FailingReader);
        assert_eq!(value, "anon");
    }

    #[test]
    fn test_interactive_prompt_skips_input_when_value_present() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "HF_TOKEN=from-file\n").unwrap();
        let mut store = interactive_store(&env_path);

        // A present value short-circuits; the reader is never consulted.
        let value =
            store.get_or_prompt_from("HF_TOKEN", "Hugging Face token", "anon", &mut FailingReader);
        assert_eq!(value, "from-file");
    }

    #[test]
    fn test_api_key_lookup() {
        let dir = tempfile::tempdir().unwrap();
        let env_path = dir.path().join(".env");
        std::fs::write(&env_path, "OPENAI_API_KEY=sk-test\n").unwrap();

        let store = ConfigStore::open(options_for(&env_path)).unwrap();

        assert_eq!(store.api_key("openai").as_deref(), Some("sk-test"));
        assert_eq!(store.api_key("nonexistent"), None);
    }

    #[test]
    fn test_app_env_lenient_parse() {
        assert_eq!(AppEnv::parse_lenient("production"), AppEnv::Production);
        assert_eq!(AppEnv::parse_lenient("testing"), AppEnv::Testing);
        assert_eq!(AppEnv::parse_lenient("staging"), AppEnv::Development);
    }
}
