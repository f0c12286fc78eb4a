// src/config.rs
use crate::api::{RetryPolicy, DEFAULT_RESULTS_KEY};
use crate::constants::{
    DEFAULT_API_BASE_URL, DEFAULT_NOTION_VERSION, MIN_REQUEST_INTERVAL, NOTION_MAX_FETCH_DEPTH,
    READ_TIMEOUT, WRITE_TIMEOUT,
};
use crate::error::AppError;
use crate::model::Destination;
use crate::types::{ApiKey, NotionId, ValidatedUrl, ValidationError};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::time::Duration;

/// Environment variables searched for the integration secret, in order.
pub const API_KEY_VARIABLES: &[&str] = &["NOTION_TOKEN", "NOTION_API_KEY", "NOTION_API_TOKEN"];

/// Parsed command-line input.
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct CommandLineInput {
    /// Enable verbose logging (debug level)
    #[arg(short, long, global = true, default_value_t = false)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print a page body as Markdown
    Read {
        /// Page URL or ID
        page: String,

        /// Maximum nesting depth to fetch
        #[arg(long, default_value_t = NOTION_MAX_FETCH_DEPTH)]
        max_depth: usize,
    },

    /// Create a page under a page or in a database
    Create {
        #[command(flatten)]
        destination: DestinationArgs,

        /// Page title (goes to the destination's title property)
        #[arg(long)]
        title: Option<String>,

        /// Property assignment, NAME=VALUE (repeatable)
        #[arg(short = 'p', long = "prop", value_parser = parse_assignment)]
        properties: Vec<(String, String)>,

        /// Markdown file for the page body ("-" reads stdin)
        #[arg(long)]
        body: Option<PathBuf>,

        /// Start from a template: "default" or a template page ID
        #[arg(long, conflicts_with = "body")]
        template: Option<String>,
    },

    /// Append Markdown to the end of a page
    Append {
        /// Page URL or ID
        page: String,

        /// Markdown file to append ("-" reads stdin)
        #[arg(long, default_value = "-")]
        body: PathBuf,
    },

    /// Move a page under another page or into a database
    Move {
        /// Page URL or ID
        #[arg(id = "move_page", value_name = "PAGE")]
        page: String,

        #[command(flatten)]
        destination: DestinationArgs,
    },

    /// Set properties on an existing page
    Set {
        /// Page URL or ID
        page: String,

        /// Property assignment, NAME=VALUE (repeatable)
        #[arg(short = 'p', long = "prop", value_parser = parse_assignment, required = true)]
        properties: Vec<(String, String)>,
    },

    /// Sort inbox items into destinations using a rule file
    Triage {
        #[command(flatten)]
        inbox: DestinationArgs,

        /// JSON rule file
        #[arg(long)]
        rules: PathBuf,

        /// Perform the moves instead of printing the plan
        #[arg(long, default_value_t = false)]
        apply: bool,
    },

    /// Send any API request and print the JSON response
    Request {
        /// HTTP method, e.g. GET, POST, PATCH, DELETE
        method: String,

        /// Endpoint path such as /v1/users/me, or a full API URL
        endpoint: String,

        /// JSON request body
        #[arg(long, conflicts_with = "json_file")]
        json: Option<String>,

        /// File holding the JSON request body ("-" reads stdin)
        #[arg(long)]
        json_file: Option<PathBuf>,

        /// Follow cursors and print every result as one listing
        #[arg(long, default_value_t = false)]
        paginate: bool,

        /// Key holding the result list in paginated responses
        #[arg(long, default_value = DEFAULT_RESULTS_KEY)]
        results_key: String,
    },

    /// Print the normalized ID found in a URL or string
    ExtractId {
        /// URL or ID
        input: String,
    },
}

/// Exactly one of `--page` or `--database`.
#[derive(Args, Debug, Clone)]
#[group(required = true, multiple = false)]
pub struct DestinationArgs {
    /// Parent page URL or ID
    #[arg(long)]
    pub page: Option<String>,

    /// Database URL or ID
    #[arg(long)]
    pub database: Option<String>,
}

impl DestinationArgs {
    pub fn resolve(&self) -> Result<Destination, AppError> {
        match (&self.page, &self.database) {
            (Some(page), None) => Ok(Destination::Page(NotionId::parse(page)?)),
            (None, Some(database)) => Ok(Destination::Database(NotionId::parse(database)?)),
            _ => Err(AppError::MissingConfiguration(
                "exactly one of --page or --database is required".to_string(),
            )),
        }
    }
}

/// Splits `NAME=VALUE` at the first `=`. The value may be empty.
pub fn parse_assignment(input: &str) -> Result<(String, String), ValidationError> {
    let (name, value) = input
        .split_once('=')
        .ok_or_else(|| ValidationError::InvalidAssignment(input.to_string()))?;
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::InvalidAssignment(input.to_string()));
    }
    Ok((name.to_string(), value.to_string()))
}

/// Everything the API client needs: credentials, endpoint and tunables.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub api_key: ApiKey,
    pub api_version: String,
    pub base_url: ValidatedUrl,
    pub min_request_interval: Duration,
    pub retry: RetryPolicy,
    pub read_timeout: Duration,
    pub write_timeout: Duration,
}

impl ClientConfig {
    /// Defaults for everything but the secret.
    pub fn new(api_key: ApiKey) -> Result<Self, AppError> {
        Ok(Self {
            api_key,
            api_version: DEFAULT_NOTION_VERSION.to_string(),
            base_url: ValidatedUrl::parse(DEFAULT_API_BASE_URL)?,
            min_request_interval: MIN_REQUEST_INTERVAL,
            retry: RetryPolicy::default(),
            read_timeout: READ_TIMEOUT,
            write_timeout: WRITE_TIMEOUT,
        })
    }

    /// Resolves configuration from the process environment.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Resolves configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let non_empty = |name: &str| lookup(name).filter(|value| !value.trim().is_empty());

        let secret = API_KEY_VARIABLES
            .iter()
            .find_map(|name| non_empty(*name))
            .ok_or_else(|| {
                AppError::MissingConfiguration(format!(
                    "set one of {} to your integration secret",
                    API_KEY_VARIABLES.join(", ")
                ))
            })?;

        let mut config = Self::new(ApiKey::new(secret.trim())?)?;
        if let Some(version) = non_empty("NOTION_VERSION") {
            config.api_version = version.trim().to_string();
            if !config.uses_default_api_version() {
                log::warn!(
                    "NOTION_VERSION={} overrides {}; database schema reads and queries expect {}",
                    config.api_version,
                    DEFAULT_NOTION_VERSION,
                    DEFAULT_NOTION_VERSION
                );
            }
        }
        if let Some(base_url) = non_empty("NOTION_BASE_URL") {
            config.base_url = ValidatedUrl::parse(base_url.trim())?;
        }
        Ok(config)
    }

    /// Whether requests carry the API version this crate's endpoints target.
    pub fn uses_default_api_version(&self) -> bool {
        self.api_version == DEFAULT_NOTION_VERSION
    }

    pub fn with_min_request_interval(mut self, interval: Duration) -> Self {
        self.min_request_interval = interval;
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }
}
