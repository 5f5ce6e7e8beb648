use anyhow::{Context as _, Error, anyhow, bail};
use field_sync::{
    DesignTree, FieldDefinitions, HighlightOutcome, SyncConfig, Synchronizer, extract_field_ids,
    inject_styles, locate_with_strategy, merge_markup, process_fields,
};
use html::parse_document;
use log::info;
use std::fs;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;

pub const USAGE: &str = "\
usage: fieldsync <command> [args]

commands:
  locate <template.html> <field>              print the element carrying <field>
  merge <template.html> <values.json>         merge values and print the body markup
  extract <design.json>                       list {{field}} identifiers, one per line
  process <design.json> <fields.json>         inject field defaults and print the design
  highlight <template.html> <field> [label]   print the preview with <field> highlighted";

/// A parsed command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Locate {
        template: PathBuf,
        field: String,
    },
    Merge {
        template: PathBuf,
        values: PathBuf,
    },
    Extract {
        design: PathBuf,
    },
    Process {
        design: PathBuf,
        fields: PathBuf,
    },
    Highlight {
        template: PathBuf,
        field: String,
        display_name: Option<String>,
    },
}

impl Command {
    /// Parse arguments following the program name.
    ///
    /// # Errors
    /// Returns an error for an unknown command or a wrong number of arguments.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, Error> {
        let mut args = args.into_iter();
        let name = args.next().ok_or_else(|| anyhow!("missing command"))?;
        let rest: Vec<String> = args.collect();
        let command = match (name.as_str(), rest.as_slice()) {
            ("locate", [template, field]) => Self::Locate {
                template: template.into(),
                field: field.clone(),
            },
            ("merge", [template, values]) => Self::Merge {
                template: template.into(),
                values: values.into(),
            },
            ("extract", [design]) => Self::Extract {
                design: design.into(),
            },
            ("process", [design, fields]) => Self::Process {
                design: design.into(),
                fields: fields.into(),
            },
            ("highlight", [template, field]) => Self::Highlight {
                template: template.into(),
                field: field.clone(),
                display_name: None,
            },
            ("highlight", [template, field, label]) => Self::Highlight {
                template: template.into(),
                field: field.clone(),
                display_name: Some(label.clone()),
            },
            ("locate" | "merge" | "extract" | "process" | "highlight", _) => {
                bail!("wrong number of arguments for {name:?}")
            }
            _ => bail!("unknown command {name:?}"),
        };
        Ok(command)
    }

    /// Execute the command and return what should be printed.
    ///
    /// # Errors
    /// Returns an error when an input file cannot be read or parsed.
    pub fn run(&self) -> Result<String, Error> {
        match self {
            Self::Locate { template, field } => locate_report(&read(template)?, field),
            Self::Merge { template, values } => merge_report(&read(template)?, &read(values)?),
            Self::Extract { design } => extract_report(&read(design)?),
            Self::Process { design, fields } => process_report(&read(design)?, &read(fields)?),
            Self::Highlight {
                template,
                field,
                display_name,
            } => {
                let markup = read(template)?;
                let runtime = Runtime::new()?;
                runtime.block_on(highlight_report(
                    &markup,
                    field,
                    display_name.as_deref(),
                    SyncConfig::from_env(),
                ))
            }
        }
    }
}

fn read(path: &Path) -> Result<String, Error> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Strategy and markup of the element carrying `field`.
///
/// # Errors
/// Returns an error when the template cannot be parsed or has no such field.
pub fn locate_report(markup: &str, field: &str) -> Result<String, Error> {
    let dom = parse_document(markup)?;
    let located = locate_with_strategy(&dom, field)
        .ok_or_else(|| anyhow!("field {field:?} not found"))?;
    Ok(format!("{:?}\t{}", located.strategy, dom.outer_html(located.node)))
}

/// Body markup after merging the values in `values_json`.
///
/// # Errors
/// Returns an error when `values_json` is not an object or a list of field records.
pub fn merge_report(markup: &str, values_json: &str) -> Result<String, Error> {
    let values = FieldDefinitions::from_json(values_json)?;
    info!("merging {} value(s)", values.len());
    Ok(merge_markup(markup, values.iter()))
}

/// Sorted field identifiers, one per line.
///
/// # Errors
/// Returns an error when the design document is invalid.
pub fn extract_report(design_json: &str) -> Result<String, Error> {
    let tree = DesignTree::from_json(design_json)?;
    Ok(extract_field_ids(&tree)
        .into_iter()
        .collect::<Vec<_>>()
        .join("\n"))
}

/// The design document with field defaults injected, as pretty JSON.
///
/// # Errors
/// Returns an error when either input is invalid.
pub fn process_report(design_json: &str, fields_json: &str) -> Result<String, Error> {
    let tree = DesignTree::from_json(design_json)?;
    let definitions = FieldDefinitions::from_json(fields_json)?;
    let processed = process_fields(&tree, &definitions);
    serde_json::to_string_pretty(&processed).context("failed to serialize design document")
}

/// Full document markup with the highlight stylesheet and `field` highlighted.
///
/// # Errors
/// Returns an error when the template cannot be parsed or has no such field.
pub async fn highlight_report(
    markup: &str,
    field: &str,
    display_name: Option<&str>,
    config: SyncConfig,
) -> Result<String, Error> {
    let mut dom = parse_document(markup)?;
    inject_styles(&mut dom)?;
    let mut sync = Synchronizer::new(config);
    sync.highlight_field(field, display_name);
    match sync.settle(&mut dom).await {
        Some(HighlightOutcome::Highlighted { .. }) => Ok(dom.to_html()),
        Some(HighlightOutcome::NotFound { .. }) | None => bail!("field {field:?} not found"),
    }
}
