// src/main.rs

use clap::Parser;
use log::LevelFilter;
use log4rs::{
    append::console::{ConsoleAppender, Target},
    append::file::FileAppender,
    config::{Appender, Root},
    encode::pattern::PatternEncoder,
    filter::threshold::ThresholdFilter,
    Config,
};
use notionmd::api::endpoint_request;
use notionmd::config::{Command, CommandLineInput};
use notionmd::triage::{self, load_rules};
use notionmd::{
    AppError, ClientConfig, CreatePageRequest, NotionClient, NotionId, PageTemplate,
    RemoteFailureKind, ValidationError, Workspace,
};
use serde_json::Value;
use std::fs;
use std::io::Read;
use std::path::Path;

/// Sets up logging configuration.
fn setup_logging(verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    let log_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };

    let log_file_path = std::env::temp_dir().join("notionmd.log");
    if let Some(parent) = log_file_path.parent() {
        fs::create_dir_all(parent)?;
    }

    let pattern = if verbose {
        "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}"
    } else {
        "{m}{n}"
    };

    // stdout carries command output; diagnostics go to stderr.
    let console_appender = ConsoleAppender::builder()
        .target(Target::Stderr)
        .encoder(Box::new(PatternEncoder::new(pattern)))
        .build();

    let file_appender = FileAppender::builder()
        .encoder(Box::new(PatternEncoder::new(
            "{d(%Y-%m-%d %H:%M:%S)} [{l}] - {m}{n}",
        )))
        .build(&log_file_path)?;

    let config = Config::builder()
        .appender(Appender::builder().build("stderr", Box::new(console_appender)))
        .appender(
            Appender::builder()
                .filter(Box::new(ThresholdFilter::new(LevelFilter::Debug)))
                .build("file", Box::new(file_appender)),
        )
        .build(
            Root::builder()
                .appender("stderr")
                .appender("file")
                .build(log_level),
        )?;

    log4rs::init_config(config)?;
    log::info!("Logging initialized. Log file: {}", log_file_path.display());
    Ok(())
}

/// Reads a Markdown body from a file, or from stdin for `-`.
fn read_body(path: &Path) -> Result<String, AppError> {
    if path.as_os_str() == "-" {
        let mut body = String::new();
        std::io::stdin().read_to_string(&mut body)?;
        return Ok(body);
    }
    Ok(fs::read_to_string(path)?)
}

/// The request body from `--json` or `--json-file`, if either was given.
fn read_json_body(json: Option<String>, json_file: Option<&Path>) -> Result<Option<Value>, AppError> {
    let text = match (json, json_file) {
        (Some(text), _) => text,
        (None, Some(path)) => read_body(path)?,
        (None, None) => return Ok(None),
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|e| ValidationError::InvalidRequest(format!("body is not valid JSON: {}", e)).into())
}

fn parse_template(raw: &str) -> Result<PageTemplate, AppError> {
    if raw.eq_ignore_ascii_case("default") {
        return Ok(PageTemplate::Default);
    }
    Ok(PageTemplate::Id(NotionId::parse(raw)?))
}

fn connect() -> Result<Workspace, AppError> {
    let config = ClientConfig::from_env()?;
    Ok(Workspace::new(NotionClient::from_config(&config)?))
}

async fn run(command: Command) -> Result<(), AppError> {
    match command {
        Command::Request {
            method,
            endpoint,
            json,
            json_file,
            paginate,
            results_key,
        } => {
            let body = read_json_body(json, json_file.as_deref())?;
            let request = endpoint_request(&method, &endpoint, body)?;
            let workspace = connect()?;
            let response = if paginate {
                workspace.client().execute_all(request, &results_key).await?
            } else {
                workspace.client().execute(request).await?
            };
            println!("{}", serde_json::to_string_pretty(&response)?);
        }

        Command::ExtractId { input } => {
            println!("{}", NotionId::parse(&input)?);
        }

        Command::Read { page, max_depth } => {
            let id = NotionId::parse(&page)?;
            let markdown = connect()?
                .with_max_depth(max_depth)
                .read_markdown(&id)
                .await?;
            print!("{}", markdown);
        }

        Command::Create {
            destination,
            title,
            properties,
            body,
            template,
        } => {
            let mut request = CreatePageRequest::new(destination.resolve()?);
            request.title = title;
            request.properties = properties;
            if let Some(path) = body {
                request.markdown = Some(read_body(&path)?);
            }
            if let Some(template) = template {
                request.template = Some(parse_template(&template)?);
            }

            let created = connect()?.create_page(request).await?;
            println!(
                "{}",
                created
                    .page
                    .url
                    .unwrap_or_else(|| created.page.id.to_url())
            );
        }

        Command::Append { page, body } => {
            let id = NotionId::parse(&page)?;
            let markdown = read_body(&body)?;
            let report = connect()?.append_markdown(&id, &markdown).await?;
            println!(
                "Appended {} blocks in {} requests",
                report.blocks_written, report.requests
            );
        }

        Command::Move { page, destination } => {
            let id = NotionId::parse(&page)?;
            let destination = destination.resolve()?;
            connect()?.move_page(&id, &destination).await?;
            println!("Moved {} to {}", id, destination);
        }

        Command::Set { page, properties } => {
            let id = NotionId::parse(&page)?;
            let updated = connect()?.update_properties(&id, &properties).await?;
            println!("Updated {} ({})", updated.title, updated.id);
        }

        Command::Triage {
            inbox,
            rules,
            apply,
        } => {
            let inbox = inbox.resolve()?;
            let rules = load_rules(&rules)?;
            let workspace = connect()?;

            let items = workspace.list_inbox(&inbox).await?;
            let plan = triage::plan(&items, &rules);
            for planned in &plan.moves {
                println!("{}", planned);
            }
            println!(
                "{} to move, {} unmatched",
                plan.moves.len(),
                plan.unmatched.len()
            );

            if apply && !plan.is_empty() {
                let moved = triage::apply(&plan, &workspace).await.into_result()?;
                println!("Moved {} items", moved);
            } else if !plan.is_empty() {
                println!("Dry run; pass --apply to move");
            }
        }
    }
    Ok(())
}

/// Process exit status: 2 for bad input, 4 for permission failures,
/// 5 for timeouts, 1 otherwise.
fn exit_code(error: &AppError) -> i32 {
    if let Some(remote) = error.remote() {
        return match remote.failure_kind() {
            RemoteFailureKind::Unauthorized | RemoteFailureKind::NotShared => 4,
            _ => 1,
        };
    }
    match error {
        AppError::Timeout { .. } => 5,
        AppError::Validation(_) | AppError::MissingConfiguration(_) => 2,
        _ => 1,
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = CommandLineInput::parse();

    if let Err(e) = setup_logging(cli.verbose) {
        eprintln!("Warning: Failed to initialize logging: {}", e);
    }

    if let Err(e) = run(cli.command).await {
        log::error!("{}", e);
        if let Some(remote) = e.remote() {
            eprintln!("Error: {} ({})", e, remote.failure_kind());
        } else {
            eprintln!("Error: {}", e);
        }
        std::process::exit(exit_code(&e));
    }

    Ok(())
}
