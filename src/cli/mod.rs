//! CLI surface for contacts.
//!
//! Every subcommand runs against the contacts selected by the global
//! `--query` filter; no filter selects everything.

use std::ffi::OsString;
use std::io::Write;
use std::path::{Path, PathBuf};

use clap::{ArgAction, ArgGroup, Args, CommandFactory, Parser, Subcommand};

use crate::config::{Config, ConfigLayer, DataPaths};
use crate::core::{ContactFields, ContactPatch};
use crate::store::{ContactStore, Document};
use crate::{Error, Result};

mod commands;
mod render;

// =============================================================================
// Entry + global options
// =============================================================================

#[derive(Parser, Debug)]
#[command(name = "contacts", version, about = "Personal command-line contact manager")]
pub struct Cli {
    /// Select contacts with a field containing TEXT (case-insensitive).
    #[arg(short = 'q', long, global = true, value_name = "TEXT")]
    pub query: Option<String>,

    /// Working contacts document (default: from config).
    #[arg(long, global = true, value_name = "PATH")]
    pub data_file: Option<PathBuf>,

    /// Diagnostic output (repeat for more).
    #[arg(short = 'v', long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Show selected contacts as a table.
    Show(ShowArgs),

    /// Write selected contacts as JSON.
    Export(ExportArgs),

    /// Overwrite fields on every selected contact.
    Modify(ModifyArgs),

    /// Add a new contact.
    Add(AddArgs),

    /// Append contacts from a JSON file.
    Import(ImportArgs),

    /// Edit exactly one selected contact in an external editor.
    Edit(EditArgs),

    /// Print one field of every selected contact, one per line.
    #[command(name = "get_field", alias = "get-field")]
    GetField(GetFieldArgs),

    /// Move selected contacts to the deleted-contacts document.
    Delete(DeleteArgs),
}

// =============================================================================
// Per-command args
// =============================================================================

#[derive(Args, Debug)]
pub struct ShowArgs {
    /// Colored output.
    #[arg(short = 'c', long)]
    pub color: bool,
}

#[derive(Args, Debug)]
pub struct ExportArgs {
    /// Output file (default: stdout).
    #[arg(short = 'o', long, value_name = "PATH")]
    pub output_file: Option<PathBuf>,
}

#[derive(Args, Debug)]
#[command(group(
    ArgGroup::new("fields")
        .required(true)
        .multiple(true)
        .args(["name", "email", "phone", "tags"])
))]
pub struct ModifyArgs {
    /// Replace the name.
    #[arg(short = 'n', long)]
    pub name: Option<String>,

    /// Replace all emails.
    #[arg(short = 'e', long, num_args = 1.., value_name = "EMAIL")]
    pub email: Option<Vec<String>>,

    /// Replace all phone numbers.
    #[arg(short = 'p', long, num_args = 1.., value_name = "PHONE")]
    pub phone: Option<Vec<String>>,

    /// Replace all tags.
    #[arg(short = 't', long, num_args = 1.., value_name = "TAG")]
    pub tags: Option<Vec<String>>,
}

impl From<ModifyArgs> for ContactPatch {
    fn from(args: ModifyArgs) -> Self {
        ContactPatch {
            name: args.name,
            email: args.email,
            phone: args.phone,
            tags: args.tags,
        }
    }
}

#[derive(Args, Debug)]
pub struct AddArgs {
    /// Contact name.
    #[arg(short = 'n', long)]
    pub name: String,

    /// Email addresses.
    #[arg(short = 'e', long, num_args = 1.., value_name = "EMAIL")]
    pub email: Option<Vec<String>>,

    /// Phone numbers.
    #[arg(short = 'p', long, num_args = 1.., value_name = "PHONE")]
    pub phone: Option<Vec<String>>,

    /// Tags (searchable, not shown).
    #[arg(short = 't', long, num_args = 1.., value_name = "TAG")]
    pub tags: Option<Vec<String>>,
}

impl From<AddArgs> for ContactFields {
    fn from(args: AddArgs) -> Self {
        ContactFields {
            name: args.name,
            email: args.email,
            phone: args.phone,
            tags: args.tags,
        }
    }
}

#[derive(Args, Debug)]
pub struct ImportArgs {
    /// JSON array of contact records; `uuid` is optional.
    #[arg(value_name = "INPUT_FILE")]
    pub input_file: PathBuf,
}

#[derive(Args, Debug)]
pub struct EditArgs {
    /// Editor command (default: from config, `$EDITOR`, then vim).
    #[arg(long, value_name = "PATH")]
    pub editor: Option<String>,
}

#[derive(Args, Debug)]
pub struct GetFieldArgs {
    /// One of name, uuid, email, phone, tags.
    #[arg(value_name = "FIELDNAME")]
    pub fieldname: String,
}

#[derive(Args, Debug)]
pub struct DeleteArgs {
    /// Document the deleted contacts are moved to (default: from config).
    #[arg(long, value_name = "PATH")]
    pub backup: Option<PathBuf>,
}

// =============================================================================
// Context
// =============================================================================

pub(crate) struct Ctx {
    pub config: Config,
    pub paths: DataPaths,
    pub query: Option<String>,
}

impl Ctx {
    fn new(config: Config, query: Option<String>) -> Self {
        let paths = config.data_paths();
        Self {
            config,
            paths,
            query,
        }
    }

    pub(crate) fn open_store(&self) -> Result<ContactStore> {
        let document =
            Document::new(&self.paths.working).with_snapshot(&self.paths.working_snapshot);
        ContactStore::load(document)
    }

    pub(crate) fn select(&self, store: &ContactStore) -> Vec<usize> {
        let indices = store.query(self.query.as_deref());
        tracing::debug!(query = ?self.query, matched = indices.len(), "contacts selected");
        indices
    }

    pub(crate) fn deleted_document(&self) -> Document {
        Document::new(&self.paths.deleted).with_snapshot(&self.paths.deleted_snapshot)
    }
}

// =============================================================================
// Entry points
// =============================================================================

pub fn parse_from<I, T>(args: I) -> Cli
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    let raw: Vec<OsString> = args.into_iter().map(|t| t.into()).collect();
    Cli::parse_from(normalize_args(raw))
}

/// Run the CLI (used by bin). `config` is the file + env layering; flags
/// are applied on top here.
pub fn run(cli: Cli, mut config: Config) -> Result<()> {
    let Some(command) = cli.command else {
        let help = Cli::command().render_help().to_string();
        return print_line(help.trim_end());
    };

    flag_layer(cli.data_file.as_deref(), &command).apply_to(&mut config);
    let ctx = Ctx::new(config, cli.query);

    match command {
        Commands::Show(args) => commands::show::handle(&ctx, args),
        Commands::Export(args) => commands::export::handle(&ctx, args),
        Commands::Modify(args) => commands::modify::handle(&ctx, args),
        Commands::Add(args) => commands::add::handle(&ctx, args),
        Commands::Import(args) => commands::import::handle(&ctx, args),
        Commands::Edit(_) => commands::edit::handle(&ctx),
        Commands::GetField(args) => commands::get_field::handle(&ctx, args),
        Commands::Delete(args) => commands::delete::handle(&ctx, args),
    }
}

/// CLI flags as the top configuration layer. Paths given on the command
/// line are relative to the working directory, not the data directory.
fn flag_layer(data_file: Option<&Path>, command: &Commands) -> ConfigLayer {
    let mut layer = ConfigLayer {
        working_data: data_file.map(absolute),
        ..ConfigLayer::default()
    };
    match command {
        Commands::Edit(args) => layer.editor = args.editor.clone(),
        Commands::Delete(args) => layer.deleted_data = args.backup.as_deref().map(absolute),
        _ => {}
    }
    layer
}

fn absolute(path: &Path) -> PathBuf {
    std::path::absolute(path).unwrap_or_else(|_| path.to_path_buf())
}

pub(crate) fn print_line(line: &str) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    if let Err(e) = writeln!(stdout, "{line}")
        && e.kind() != std::io::ErrorKind::BrokenPipe
    {
        return Err(Error::Output(e));
    }
    Ok(())
}

pub(crate) fn print_lines<S: AsRef<str>>(lines: &[S]) -> Result<()> {
    let mut stdout = std::io::stdout().lock();
    for line in lines {
        if let Err(e) = writeln!(stdout, "{}", line.as_ref()) {
            if e.kind() == std::io::ErrorKind::BrokenPipe {
                return Ok(());
            }
            return Err(Error::Output(e));
        }
    }
    Ok(())
}

// =============================================================================
// Arg normalization
// =============================================================================

/// Long flags are case and underscore tolerant: `--Output_File` is
/// `--output-file`. Values after `=` are left alone.
fn normalize_args(mut raw: Vec<OsString>) -> Vec<OsString> {
    if raw.is_empty() {
        return raw;
    }

    let mut out = Vec::with_capacity(raw.len());
    out.push(raw.remove(0)); // program name

    let mut passthrough = false;
    for arg in raw {
        let s = arg.to_string_lossy();
        if passthrough || s == "--" || !s.starts_with("--") {
            passthrough |= s == "--";
            out.push(arg);
            continue;
        }
        let mut pieces = s.splitn(2, '=');
        let flag = pieces.next().unwrap_or("");
        let val = pieces.next();
        let canon = flag.to_lowercase().replace('_', "-");
        match val {
            Some(v) => out.push(OsString::from(format!("{canon}={v}"))),
            None => out.push(OsString::from(canon)),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> std::result::Result<Cli, clap::Error> {
        let raw: Vec<OsString> = args.iter().map(OsString::from).collect();
        Cli::try_parse_from(normalize_args(raw))
    }

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn normalize_canonicalizes_long_flags() {
        let raw = ["contacts", "export", "--Output_File=out.json", "-q", "Ann_B"]
            .iter()
            .map(OsString::from)
            .collect();
        let out: Vec<String> = normalize_args(raw)
            .into_iter()
            .map(|arg| arg.to_string_lossy().into_owned())
            .collect();
        assert_eq!(
            out,
            vec!["contacts", "export", "--output-file=out.json", "-q", "Ann_B"]
        );
    }

    #[test]
    fn underscore_flags_parse() {
        let cli = parse(&["contacts", "export", "--output_file", "out.json"]).expect("parse");
        let Some(Commands::Export(args)) = cli.command else {
            panic!("expected export");
        };
        assert_eq!(args.output_file, Some(PathBuf::from("out.json")));
    }

    #[test]
    fn global_query_is_accepted_after_subcommand() {
        let cli = parse(&["contacts", "get_field", "uuid", "-q", "ann"]).expect("parse");
        assert_eq!(cli.query.as_deref(), Some("ann"));
        assert!(matches!(cli.command, Some(Commands::GetField(_))));
    }

    #[test]
    fn get_field_has_dashed_alias() {
        let cli = parse(&["contacts", "get-field", "name"]).expect("parse");
        let Some(Commands::GetField(args)) = cli.command else {
            panic!("expected get_field");
        };
        assert_eq!(args.fieldname, "name");
    }

    #[test]
    fn list_flags_take_several_values() {
        let cli = parse(&[
            "contacts", "add", "-n", "Ann", "-e", "a@x", "b@x", "-t", "friend",
        ])
        .expect("parse");
        let Some(Commands::Add(args)) = cli.command else {
            panic!("expected add");
        };
        let fields = ContactFields::from(args);
        assert_eq!(fields.email, Some(vec!["a@x".to_string(), "b@x".to_string()]));
        assert_eq!(fields.phone, None);
        assert_eq!(fields.tags, Some(vec!["friend".to_string()]));
    }

    #[test]
    fn modify_requires_a_field() {
        assert!(parse(&["contacts", "modify"]).is_err());
        assert!(parse(&["contacts", "modify", "-p", "555"]).is_ok());
    }

    #[test]
    fn add_requires_a_name() {
        assert!(parse(&["contacts", "add", "-e", "a@x"]).is_err());
    }

    #[test]
    fn no_subcommand_is_not_a_parse_error() {
        let cli = parse(&["contacts"]).expect("parse");
        assert!(cli.command.is_none());
    }

    #[test]
    fn flag_layer_overrides_paths_and_editor() {
        let cli = parse(&["contacts", "--data-file", "/srv/c.json", "edit", "--editor", "nano"])
            .expect("parse");
        let command = cli.command.expect("command");
        let mut config = Config {
            path: PathBuf::from("/data"),
            ..Config::default()
        };
        flag_layer(cli.data_file.as_deref(), &command).apply_to(&mut config);
        assert_eq!(config.editor, "nano");
        assert_eq!(config.data_paths().working, PathBuf::from("/srv/c.json"));
        assert_eq!(
            config.data_paths().deleted,
            PathBuf::from("/data/contacts_deleted.json")
        );
    }

    #[test]
    fn delete_backup_flag_replaces_deleted_document() {
        let cli = parse(&["contacts", "delete", "--backup", "/tmp/gone.json"]).expect("parse");
        let command = cli.command.expect("command");
        let mut config = Config::default();
        flag_layer(None, &command).apply_to(&mut config);
        assert_eq!(config.data_paths().deleted, PathBuf::from("/tmp/gone.json"));
    }
}
