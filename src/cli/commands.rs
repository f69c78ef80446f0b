use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ty", about = concat!("[>] tally v", env!("CARGO_PKG_VERSION"), " - your projects are plain JSON"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Run against a different board directory
    #[arg(short = 'C', long = "board-dir", global = true)]
    pub board_dir: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new board in the current directory
    Init(InitArgs),
    /// List projects (filtered and sorted)
    List(ListArgs),
    /// Show one project in full
    Show(IdArg),
    /// Search projects by name, description, or tag
    Search(SearchArgs),
    /// Suggest search completions for a partial query
    Suggest(SuggestArgs),
    /// Show board statistics
    Stats,
    /// Show the recent activity log
    Activity(ActivityArgs),
    /// Show a project's version history
    History(IdArg),
    /// Validate board integrity
    Check,
    /// List available project templates
    Templates,
    /// Add a project
    Add(AddArgs),
    /// Edit a project's fields
    Edit(EditArgs),
    /// Change a project's status
    Status(StatusArgs),
    /// Change a project's priority
    Priority(PriorityArgs),
    /// Toggle a project's favorite flag
    Fav(IdArg),
    /// Add or remove tags
    Tag(TagArgs),
    /// Add or remove dependencies
    Dep(DepArgs),
    /// Add, list, or remove notes
    Note(NoteArgs),
    /// Move a project to the archive
    Archive(IdArg),
    /// Move a project back from the archive
    Unarchive(IdArg),
    /// Duplicate a project
    Clone(IdArg),
    /// Move a project to a new position
    Mv(MvArgs),
    /// Rewrite the manual order from an explicit ID list
    Reorder(ReorderArgs),
    /// Apply one change to several projects at once
    Bulk(BulkArgs),
    /// Restore a project to an earlier version
    Revert(RevertArgs),
    /// Permanently delete projects
    Rm(RmArgs),
    /// Check every project link and record the results
    Links(LinksArgs),
    /// Import projects from a JSON or CSV file
    Import(ImportArgs),
    /// Export the active projects as JSON or CSV
    Export(ExportArgs),
    /// Encode projects as a share token (or decode one)
    Share(ShareArgs),
    /// Write a full board backup
    Backup(BackupArgs),
    /// Replace the board from a backup file
    Restore(RestoreArgs),
    /// Manage saved filter presets
    Preset(PresetCmd),
    /// View or change board settings
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Init args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct InitArgs {
    /// Reset the board even if tally/ already exists
    #[arg(long)]
    pub force: bool,
}

// ---------------------------------------------------------------------------
// Read command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct IdArg {
    /// Project ID
    pub id: String,
}

#[derive(Args, Default)]
pub struct ListArgs {
    /// Filter by status (in-progress, blocked, complete)
    #[arg(long)]
    pub progress: Option<String>,
    /// Filter by category (exact match)
    #[arg(long)]
    pub category: Option<String>,
    /// Filter by priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by name, description, or tag substring
    #[arg(long)]
    pub search: Option<String>,
    /// Only favorites
    #[arg(long)]
    pub favorites: bool,
    /// List archived projects instead of active ones
    #[arg(long)]
    pub archived: bool,
    /// Sort field (order, name, progress, priority, due, created, updated)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
    /// Apply a saved preset instead of the flags above
    #[arg(long)]
    pub preset: Option<String>,
}

#[derive(Args)]
pub struct SearchArgs {
    /// Substring to search for
    pub query: String,
    /// Search the archive instead of the active list
    #[arg(long)]
    pub archived: bool,
}

#[derive(Args)]
pub struct SuggestArgs {
    /// Partial query
    pub query: String,
}

#[derive(Args)]
pub struct ActivityArgs {
    /// Maximum number of entries to show
    #[arg(long, default_value = "20")]
    pub limit: usize,
}

// ---------------------------------------------------------------------------
// Write command args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct AddArgs {
    /// Project name (defaults to the template's name with --template)
    pub name: Option<String>,
    /// Project URL
    #[arg(long)]
    pub link: Option<String>,
    /// Category label
    #[arg(long)]
    pub category: Option<String>,
    /// Free-text description
    #[arg(long)]
    pub description: Option<String>,
    /// Initial status (in-progress, blocked, complete)
    #[arg(long)]
    pub progress: Option<String>,
    /// Priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Add a tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// Icon identifier
    #[arg(long)]
    pub icon: Option<String>,
    /// Accent color
    #[arg(long)]
    pub color: Option<String>,
    /// Start from a template (web-app, chrome-extension, tool)
    #[arg(long)]
    pub template: Option<String>,
}

#[derive(Args)]
pub struct EditArgs {
    /// Project ID
    pub id: String,
    /// New name
    #[arg(long)]
    pub name: Option<String>,
    /// New URL
    #[arg(long)]
    pub link: Option<String>,
    /// New category
    #[arg(long)]
    pub category: Option<String>,
    /// New description
    #[arg(long)]
    pub description: Option<String>,
    /// New status (in-progress, blocked, complete)
    #[arg(long)]
    pub progress: Option<String>,
    /// New priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// New due date (YYYY-MM-DD)
    #[arg(long)]
    pub due: Option<String>,
    /// Drop the due date
    #[arg(long)]
    pub clear_due: bool,
    /// Replace the tag list (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
    /// New icon identifier
    #[arg(long)]
    pub icon: Option<String>,
    /// New accent color
    #[arg(long)]
    pub color: Option<String>,
}

#[derive(Args)]
pub struct StatusArgs {
    /// Project ID
    pub id: String,
    /// New status (in-progress, blocked, complete)
    pub status: String,
}

#[derive(Args)]
pub struct PriorityArgs {
    /// Project ID
    pub id: String,
    /// New priority (high, medium, low)
    pub priority: String,
}

#[derive(Args)]
pub struct TagArgs {
    /// Project ID
    pub id: String,
    /// Action: "add" or "rm"
    pub action: String,
    /// Tag name
    pub tag: String,
}

#[derive(Args)]
pub struct DepArgs {
    /// Project ID
    pub id: String,
    /// Action: "add" or "rm"
    pub action: String,
    /// Dependency project ID
    pub dep_id: String,
}

#[derive(Args)]
pub struct NoteArgs {
    /// Project ID
    pub id: String,
    /// Action: "add", "ls", or "rm"
    pub action: String,
    /// Note text (for add) or note index (for rm)
    pub value: Option<String>,
}

#[derive(Args)]
pub struct MvArgs {
    /// Project ID
    pub id: String,
    /// New position (0-indexed)
    pub position: usize,
}

#[derive(Args)]
pub struct ReorderArgs {
    /// Project IDs in the desired order
    #[arg(required = true)]
    pub ids: Vec<String>,
}

#[derive(Args)]
pub struct BulkArgs {
    /// Project IDs to change
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Set the category
    #[arg(long)]
    pub category: Option<String>,
    /// Set the priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Append a tag (repeatable)
    #[arg(long)]
    pub tag: Vec<String>,
}

#[derive(Args)]
pub struct RevertArgs {
    /// Project ID
    pub id: String,
    /// History entry index (0 = most recent)
    pub index: usize,
}

#[derive(Args)]
pub struct RmArgs {
    /// Project IDs to delete
    #[arg(required = true)]
    pub ids: Vec<String>,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Maintenance
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LinksArgs {
    /// Classify links without touching the network
    #[arg(long)]
    pub offline: bool,
    /// Per-link connect timeout in seconds (default: 3)
    #[arg(long)]
    pub timeout: Option<u64>,
}

#[derive(Args)]
pub struct ImportArgs {
    /// File to read (JSON or CSV)
    pub file: String,
    /// Input format: json or csv (default: from the file extension)
    #[arg(long)]
    pub format: Option<String>,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output format: json or csv
    #[arg(long, default_value = "json")]
    pub format: String,
    /// Write to a file instead of stdout
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct ShareArgs {
    /// Project IDs to include (default: all active projects)
    pub ids: Vec<String>,
    /// Decode a share token instead of encoding one
    #[arg(long, value_name = "TOKEN")]
    pub decode: Option<String>,
}

#[derive(Args)]
pub struct BackupArgs {
    /// Output file (default: tally-backup-<date>.json)
    #[arg(long)]
    pub out: Option<String>,
}

#[derive(Args)]
pub struct RestoreArgs {
    /// Backup file to restore from
    pub file: String,
    /// Skip confirmation prompt
    #[arg(long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Filter presets
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct PresetCmd {
    #[command(subcommand)]
    pub action: PresetAction,
}

#[derive(Subcommand)]
pub enum PresetAction {
    /// Save the given filter and sort under a name
    Save(PresetSaveArgs),
    /// List saved presets
    List,
    /// Delete a preset
    Rm(PresetNameArg),
}

#[derive(Args)]
pub struct PresetSaveArgs {
    /// Preset name (an existing preset of that name is replaced)
    pub name: String,
    /// Filter by status (in-progress, blocked, complete)
    #[arg(long)]
    pub progress: Option<String>,
    /// Filter by category (exact match)
    #[arg(long)]
    pub category: Option<String>,
    /// Filter by priority (high, medium, low)
    #[arg(long)]
    pub priority: Option<String>,
    /// Filter by name, description, or tag substring
    #[arg(long)]
    pub search: Option<String>,
    /// Only favorites
    #[arg(long)]
    pub favorites: bool,
    /// Sort field (order, name, progress, priority, due, created, updated)
    #[arg(long)]
    pub sort: Option<String>,
    /// Sort descending
    #[arg(long)]
    pub desc: bool,
}

#[derive(Args)]
pub struct PresetNameArg {
    /// Preset name
    pub name: String,
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print settings (all of them, or one key)
    Get(ConfigGetArgs),
    /// Change a setting
    Set(ConfigSetArgs),
}

#[derive(Args)]
pub struct ConfigGetArgs {
    /// Setting key (theme, dark-mode, view-mode)
    pub key: Option<String>,
}

#[derive(Args)]
pub struct ConfigSetArgs {
    /// Setting key (theme, dark-mode, view-mode)
    pub key: String,
    /// New value
    pub value: String,
}
