//! `scaffold-lib` — Config discovery and env-file store for PrismQ
//! module scaffolds.
//!
//! Provides the runtime-state layer a scaffolded module boots from:
//! a marker-directory locator, a flat `KEY=VALUE` env-file codec, a
//! layered environment, and the [`ConfigStore`] that ties them
//! together.
//!
//! # Quick Start
//!
//! ```no_run
//! use scaffold_lib::{ConfigStore, StoreOptions};
//!
//! // Discover the working directory from the process cwd and load .env
//! let mut store = ConfigStore::open(StoreOptions::default()).unwrap();
//!
//! // Layered lookup: explicit overrides -> file -> default
//! let level = store.get_or("LOG_LEVEL", "INFO");
//!
//! // Credential lookup (<SERVICE>_API_KEY)
//! let key = store.api_key("openai");
//!
//! // Prompt for a missing required value (interactive mode only)
//! let token = store.get_or_prompt("HF_TOKEN", "Hugging Face token", "");
//! ```

pub mod env;
pub mod envfile;
pub mod error;
pub mod locate;
pub mod store;

pub use env::Env;
pub use error::{Result, ScaffoldError};
pub use locate::{DEFAULT_MARKER, ResolvePolicy};
pub use store::{AppEnv, ConfigStore, ENV_FILE_NAME, Settings, StoreOptions, WORKING_DIRECTORY_KEY};
