//! File-level processing: protocols in, sample and schema files out.
//!
//! Failures of individual types are logged and collected in the
//! [`RunSummary`]; only unreadable or unparsable input files abort a run.
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::avro::SchemaNode;
use crate::common::names::{schema_file_stem, topic_dir};
use crate::error::{ParseError, ProcessError};
use crate::parser::{name_to_topic_map, parse_protocol, parse_schema};
use crate::sample::generate_sample;
use crate::serializer::serialize_schema;
use crate::validate::validate_sample;

/// What to produce for each input file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// `<out>/<topic>/index.json` for each type carrying a topic.
    Topics,
    /// `<out>/<namespace>.<name>.avsc` and `.json` for each record.
    Schemas {
        /// Skip records without a `version` property.
        versioned_only: bool,
    },
}

/// An item that could not be produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    /// Topic or record name.
    pub item: String,
    pub reason: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub written: Vec<PathBuf>,
    pub failures: Vec<Failure>,
}

impl RunSummary {
    fn merge(&mut self, other: RunSummary) {
        self.written.extend(other.written);
        self.failures.extend(other.failures);
    }

    fn fail(&mut self, item: &str, reason: impl ToString) {
        self.failures.push(Failure {
            item: item.to_string(),
            reason: reason.to_string(),
        });
    }
}

/// Process every input path in order.
///
/// Files are taken as given; directories are scanned recursively for the
/// extensions `mode` accepts.
pub fn process_paths(
    paths: &[PathBuf],
    output_dir: &Path,
    mode: Mode,
) -> Result<RunSummary, ProcessError> {
    let inputs = collect_inputs(paths, mode)?;
    if inputs.is_empty() {
        warn!("No input files found.");
    }

    let mut summary = RunSummary::default();
    for input in &inputs {
        let result = match mode {
            Mode::Topics => generate_topic_samples(input, output_dir)?,
            Mode::Schemas { versioned_only } => {
                export_record_schemas(input, output_dir, versioned_only)?
            }
        };
        summary.merge(result);
    }
    Ok(summary)
}

/// Expand the given paths into the list of input files.
pub fn collect_inputs(paths: &[PathBuf], mode: Mode) -> Result<Vec<PathBuf>, ProcessError> {
    let extensions: &[&str] = match mode {
        Mode::Topics => &["avpr"],
        Mode::Schemas { .. } => &["avpr", "avsc"],
    };

    let mut inputs = Vec::new();
    for path in paths {
        if path.is_dir() {
            for ext in extensions {
                let root = glob::Pattern::escape(&path.to_string_lossy());
                let pattern = Path::new(&root).join("**").join(format!("*.{ext}"));
                let mut found = Vec::new();
                for entry in glob::glob(&pattern.to_string_lossy())? {
                    found.push(entry?);
                }
                found.sort();
                inputs.extend(found);
            }
        } else if path.is_file() && has_extension(path, extensions) {
            inputs.push(path.clone());
        } else {
            debug!("Skipping {}", path.display());
        }
    }
    Ok(inputs)
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.contains(&e))
}

/// Write a sample message for each topic-bearing type of an `.avpr` file.
pub fn generate_topic_samples(
    avpr_path: &Path,
    output_dir: &Path,
) -> Result<RunSummary, ProcessError> {
    let text = read_input(avpr_path)?;
    let topics = name_to_topic_map(&text).map_err(|e| parse_error(avpr_path, e))?;
    let protocol = parse_protocol(&text).map_err(|e| parse_error(avpr_path, e))?;

    let mut summary = RunSummary::default();
    for node in &protocol.types {
        let topic = node
            .name()
            .and_then(|name| topics.get(name))
            .or_else(|| node.fullname().and_then(|full| topics.get(&full)));
        let Some(topic) = topic else {
            continue;
        };

        match write_topic_sample(node, topic, output_dir) {
            Ok(path) => {
                info!("Successfully generated a test message for {topic}.");
                summary.written.push(path);
            }
            Err(e) => {
                warn!("Could not generate a test message for {topic}. ({e})");
                summary.fail(topic, e);
            }
        }
    }
    Ok(summary)
}

fn write_topic_sample(
    node: &SchemaNode,
    topic: &str,
    output_dir: &Path,
) -> Result<PathBuf, ProcessError> {
    let sample = generate_sample(node)?;
    let target = output_dir.join(topic_dir(topic));
    fs::create_dir_all(&target).map_err(|source| ProcessError::Write {
        path: target.clone(),
        source,
    })?;
    let path = target.join("index.json");
    write_output(&path, &serde_json::to_string(&sample)?)?;
    Ok(path)
}

/// Export each record of an `.avpr` (or the root of an `.avsc`) as a
/// canonical schema file plus a matching sample message.
pub fn export_record_schemas(
    input: &Path,
    output_dir: &Path,
    versioned_only: bool,
) -> Result<RunSummary, ProcessError> {
    let text = read_input(input)?;
    let (records, default_namespace) = if has_extension(input, &["avsc"]) {
        let node = parse_schema(&text).map_err(|e| parse_error(input, e))?;
        (vec![node], None)
    } else {
        let protocol = parse_protocol(&text).map_err(|e| parse_error(input, e))?;
        (protocol.types, protocol.namespace)
    };

    fs::create_dir_all(output_dir).map_err(|source| ProcessError::Write {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let mut summary = RunSummary::default();
    for node in &records {
        let SchemaNode::Record(record) = node else {
            continue;
        };
        if versioned_only && record.version().is_none() {
            debug!("Skipping unversioned record {}", record.name);
            continue;
        }

        let namespace = record
            .namespace
            .as_deref()
            .or(default_namespace.as_deref())
            .unwrap_or("");

        match export_record(node, namespace, output_dir, &mut summary.written) {
            Ok(()) => info!("Successfully generated a test message for {}.", record.name),
            Err(e) => {
                warn!("Could not generate a test message for {}. ({e})", record.name);
                summary.fail(&record.name, e);
            }
        }
    }
    Ok(summary)
}

/// Write `<stem>.avsc`, then `<stem>.json`, pushing each file once written.
fn export_record(
    node: &SchemaNode,
    namespace: &str,
    output_dir: &Path,
    written: &mut Vec<PathBuf>,
) -> Result<(), ProcessError> {
    let stem = match node.name() {
        Some(name) => schema_file_stem(name, Some(namespace)),
        None => return Ok(()),
    };

    let schema_text = serialize_schema(node, namespace);
    let avsc = output_dir.join(format!("{stem}.avsc"));
    write_output(&avsc, &schema_text)?;
    written.push(avsc);

    let sample = generate_sample(node)?;
    let json_path = output_dir.join(format!("{stem}.json"));
    write_output(&json_path, &serde_json::to_string(&sample)?)?;
    written.push(json_path);

    check_sample(&stem, &schema_text, &sample);
    Ok(())
}

fn check_sample(name: &str, schema_text: &str, sample: &Value) {
    match validate_sample(schema_text, sample) {
        Ok(()) => info!("Validated the message for {name} against its schema."),
        Err(e) => warn!("Could not validate the message for {name}: {e}"),
    }
}

fn read_input(path: &Path) -> Result<String, ProcessError> {
    fs::read_to_string(path).map_err(|source| ProcessError::Read {
        path: path.to_path_buf(),
        source,
    })
}

fn write_output(path: &Path, contents: &str) -> Result<(), ProcessError> {
    fs::write(path, contents).map_err(|source| ProcessError::Write {
        path: path.to_path_buf(),
        source,
    })
}

fn parse_error(path: &Path, source: ParseError) -> ProcessError {
    ProcessError::Parse {
        path: path.to_path_buf(),
        source,
    }
}
