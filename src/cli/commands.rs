use crate::cli::args::{
    Args, Command, ConfigArgs, ConfigCommand, ExtractArgs, GetArgs, ListArgs, UpdateArgs,
};
use crate::cli::output::{ConsoleWriter, OutputWriter};
use crate::core::path::{self, FieldPath};
use crate::domain::config::WfDocsConfig;
use crate::domain::error::{WfDocsError, WfDocsResult};
use crate::domain::item::UpdateItemRequest;
use crate::infrastructure::config::{
    apply_env_overrides, load_dotenv, ConfigManager, Credentials,
};
use crate::infrastructure::http::{CollectionApi, WebflowClient};
use crate::infrastructure::{logging, storage};
use serde_json::Value;
use std::path::{Path, PathBuf};

/// Execute CLI command
pub async fn execute_command(args: Args) -> WfDocsResult<()> {
    let writer = ConsoleWriter::new(args.output);
    let dotenv_path = load_dotenv()?;

    let config_manager = ConfigManager::new()?;
    let mut config = if let Some(config_path) = &args.config {
        config_manager.load_config_from_path(config_path)?
    } else {
        config_manager.load_config()?
    };
    apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    if !args.quiet {
        logging::init_logging(&config.log_level, args.verbose).map_err(|e| WfDocsError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;
    }
    if let Some(path) = &dotenv_path {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    let command = args.command;
    if command.needs_api() {
        // Credentials are checked before any client or request exists
        let credentials = Credentials::from_env(&config.api)?;
        let client = WebflowClient::new(&config.api, credentials)?;
        return execute_api_command(command, &client, &writer, &config).await;
    }

    match command {
        Command::Config(config_args) => {
            execute_config_command(config_args, &writer, &config, &config_manager)
        }
        _ => {
            writer.write_message(&format!("wfdocs {}", env!("CARGO_PKG_VERSION")))?;
            Ok(())
        }
    }
}

/// Run a command that talks to the API
pub async fn execute_api_command(
    command: Command,
    api: &dyn CollectionApi,
    writer: &dyn OutputWriter,
    config: &WfDocsConfig,
) -> WfDocsResult<()> {
    match command {
        Command::List(list_args) => execute_list(list_args, api, writer, config).await,
        Command::Get(get_args) => execute_get(get_args, api, writer, config).await,
        Command::Extract(extract_args) => execute_extract(extract_args, api, writer, config).await,
        Command::Update(update_args) => execute_update(update_args, api, writer).await,
        Command::Collections => {
            let collections = api.list_collections().await?;
            writer.write_collections(&collections)?;
            Ok(())
        }
        Command::Config(_) | Command::Version => Err(WfDocsError::InvalidInput(
            "command does not use the API".to_string(),
        )),
    }
}

fn output_dir(requested: Option<PathBuf>, config: &WfDocsConfig) -> PathBuf {
    requested.unwrap_or_else(|| PathBuf::from(&config.output.output_dir))
}

async fn execute_list(
    args: ListArgs,
    api: &dyn CollectionApi,
    writer: &dyn OutputWriter,
    config: &WfDocsConfig,
) -> WfDocsResult<()> {
    tracing::info!(limit = args.limit, offset = args.offset, "listing items");
    let list = api.list_items(args.limit, args.offset).await?;
    writer.write_items(&list)?;

    if args.save {
        let dir = output_dir(args.output_dir, config);
        let filename = args
            .filename
            .unwrap_or_else(|| config.output.list_filename.clone());
        let saved = storage::save_items_list(&list.items, &dir, &filename)?;
        writer.write_message(&format!("Items list saved to: {}", saved.display()))?;
    }
    Ok(())
}

async fn execute_get(
    args: GetArgs,
    api: &dyn CollectionApi,
    writer: &dyn OutputWriter,
    config: &WfDocsConfig,
) -> WfDocsResult<()> {
    let item = api.get_item(&args.item_id).await?;
    writer.write_item(&item)?;

    if args.save {
        let dir = output_dir(args.output_dir, config);
        let saved = storage::save_content(&item, &item, &dir)?;
        writer.write_message(&format!("Item saved to: {}", saved.display()))?;
    }
    Ok(())
}

async fn execute_extract(
    args: ExtractArgs,
    api: &dyn CollectionApi,
    writer: &dyn OutputWriter,
    config: &WfDocsConfig,
) -> WfDocsResult<()> {
    let field_path = args.path.as_deref().map(FieldPath::parse).transpose()?;
    let item = api.get_item(&args.item_id).await?;

    let content = match &field_path {
        Some(field_path) => path::resolve(&item.field_data, field_path)?,
        None => &item.field_data,
    };
    writer.write_value(content)?;

    if args.save {
        let dir = output_dir(args.output_dir, config);
        let saved = storage::save_content(&item, content, &dir)?;
        writer.write_message(&format!("Content saved to: {}", saved.display()))?;
    }
    Ok(())
}

/// Parse `--content` as JSON, or take it verbatim as a string with `--string`
pub fn parse_content(raw: &str, as_string: bool) -> WfDocsResult<Value> {
    if as_string {
        return Ok(Value::String(raw.to_string()));
    }
    serde_json::from_str(raw).map_err(|e| {
        WfDocsError::InvalidInput(format!(
            "Invalid JSON in --content: {} (use --string to send plain text)",
            e
        ))
    })
}

fn read_content_file(file: &Path, as_string: bool) -> WfDocsResult<Value> {
    let text = std::fs::read_to_string(file).map_err(|e| {
        WfDocsError::InvalidInput(format!("Failed to read {}: {}", file.display(), e))
    })?;
    if as_string {
        return Ok(Value::String(text));
    }
    serde_json::from_str(&text).map_err(|e| {
        WfDocsError::InvalidInput(format!("Invalid JSON in {}: {}", file.display(), e))
    })
}

/// Interpret a whole-document update file: either a full request or bare `fieldData`
pub fn request_from_document(document: Value) -> WfDocsResult<UpdateItemRequest> {
    match document {
        Value::Object(map) if map.contains_key("fieldData") => {
            serde_json::from_value(Value::Object(map)).map_err(|e| {
                WfDocsError::InvalidInput(format!("Invalid update document: {}", e))
            })
        }
        Value::Object(map) => Ok(UpdateItemRequest::new(Value::Object(map))),
        _ => Err(WfDocsError::InvalidInput(
            "Update file must contain a JSON object".to_string(),
        )),
    }
}

fn has_state_flags(args: &UpdateArgs) -> bool {
    args.is_archived.is_some() || args.is_draft.is_some() || args.cms_locale_id.is_some()
}

async fn execute_update(
    args: UpdateArgs,
    api: &dyn CollectionApi,
    writer: &dyn OutputWriter,
) -> WfDocsResult<()> {
    let field_path = args.path.as_deref().map(FieldPath::parse).transpose()?;
    let content = match (&args.content, &args.file) {
        (Some(raw), _) => Some(parse_content(raw, args.string)?),
        (None, Some(file)) => Some(read_content_file(file, args.string)?),
        (None, None) => None,
    };

    let mut request = match (content, field_path) {
        (Some(value), Some(field_path)) => {
            let item = api.get_item(&args.item_id).await?;
            let mut field_data = item.field_data;
            let previous = path::set(&mut field_data, &field_path, value)?;
            tracing::debug!(path = %field_path, previous = %previous, "replaced value");
            UpdateItemRequest::new(field_data)
        }
        (Some(document), None) => request_from_document(document)?,
        (None, Some(field_path)) => {
            return Err(WfDocsError::InvalidInput(format!(
                "--path {} requires --content or --file",
                field_path
            )))
        }
        (None, None) if has_state_flags(&args) => {
            let item = api.get_item(&args.item_id).await?;
            UpdateItemRequest::new(item.field_data)
        }
        (None, None) => {
            return Err(WfDocsError::InvalidInput(
                "No update data provided".to_string(),
            ))
        }
    };

    if args.is_archived.is_some() {
        request.is_archived = args.is_archived;
    }
    if args.is_draft.is_some() {
        request.is_draft = args.is_draft;
    }
    if args.cms_locale_id.is_some() {
        request.cms_locale_id = args.cms_locale_id.clone();
    }

    if args.dry_run {
        writer.write_message("Dry run: request not sent")?;
        writer.write_value(&serde_json::to_value(&request)?)?;
        return Ok(());
    }

    let updated = api.update_item(&args.item_id, &request).await?;
    writer.write_message("Item updated successfully!")?;
    writer.write_message(&format!(
        "Updated at: {}",
        updated.last_updated.as_deref().unwrap_or("unknown")
    ))?;
    Ok(())
}

fn execute_config_command(
    args: ConfigArgs,
    writer: &dyn OutputWriter,
    config: &WfDocsConfig,
    config_manager: &ConfigManager,
) -> WfDocsResult<()> {
    match args.command {
        ConfigCommand::Show => {
            writer.write_config(config)?;
            writer.write_message(&format!(
                "Global configuration: {}",
                config_manager.get_global_config_path_ref().display()
            ))?;
            if let Some(project_path) = config_manager.get_project_config_path() {
                writer.write_message(&format!(
                    "Project configuration: {}",
                    project_path.display()
                ))?;
            }
            Ok(())
        }
        ConfigCommand::Validate { file } => {
            match file {
                Some(config_path) => {
                    config_manager.load_config_from_path(&config_path)?;
                    writer.write_message(&format!(
                        "Configuration file '{}' is valid",
                        config_path.display()
                    ))?;
                }
                None => {
                    config_manager.load_config()?;
                    writer.write_message("Current configuration is valid")?;
                }
            }
            Ok(())
        }
        ConfigCommand::Init { dir, global } => {
            if global {
                let global_path = config_manager.get_global_config_path_ref();
                if global_path.exists() {
                    return Err(WfDocsError::Config {
                        message: format!(
                            "Global configuration already exists at '{}'",
                            global_path.display()
                        ),
                    });
                }
                config_manager.save_config_to_path(global_path, &WfDocsConfig::default())?;
                writer.write_message(&format!(
                    "Global configuration initialized at '{}'",
                    global_path.display()
                ))?;
            } else {
                let base = match dir {
                    Some(dir) => dir,
                    None => std::env::current_dir()?,
                };
                let created = config_manager.init_project_config(&base)?;
                writer.write_message(&format!(
                    "Project configuration initialized at '{}'",
                    created.display()
                ))?;
            }
            Ok(())
        }
    }
}
