mod init;
pub use init::cmd_init;

use std::path::PathBuf;
use std::sync::Mutex;
use std::time::Duration;

use chrono::Utc;

/// Global override for the board directory (set by -C flag)
static BOARD_DIR_OVERRIDE: Mutex<Option<PathBuf>> = Mutex::new(None);

use crate::cli::commands::*;
use crate::cli::output::*;
use crate::io::board_io;
use crate::io::lock::FileLock;
use crate::io::state;
use crate::model::filter::{Filter, FilterPreset, Sort, SortDir};
use crate::model::project::{Project, ProjectDraft, ProjectPatch};
use crate::model::template;
use crate::ops::links::PROBE_TIMEOUT;
use crate::ops::{check, stats, suggest, view};
use crate::parse::{
    decode_backup, decode_share, encode_backup, encode_share, parse_csv, parse_json_records,
    serialize_csv,
};
use crate::store::{BulkEdit, Store};

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let json = cli.json;

    // Store -C override for board_dir()
    if let Some(ref dir) = cli.board_dir {
        let abs = std::fs::canonicalize(dir)
            .map_err(|e| format!("cannot resolve -C path '{}': {}", dir, e))?;
        BOARD_DIR_OVERRIDE.lock().unwrap().replace(abs);
    }

    match cli.command {
        // Bare `ty` lists the board with defaults
        None => cmd_list(ListArgs::default(), json),
        Some(cmd) => match cmd {
            // Init creates the board; every other command discovers it
            Commands::Init(args) => cmd_init(args),

            // Read commands
            Commands::List(args) => cmd_list(args, json),
            Commands::Show(args) => cmd_show(args, json),
            Commands::Search(args) => cmd_search(args, json),
            Commands::Suggest(args) => cmd_suggest(args, json),
            Commands::Stats => cmd_stats(json),
            Commands::Activity(args) => cmd_activity(args, json),
            Commands::History(args) => cmd_history(args, json),
            Commands::Check => cmd_check(json),
            Commands::Templates => cmd_templates(json),

            // Write commands
            Commands::Add(args) => cmd_add(args, json),
            Commands::Edit(args) => cmd_edit(args),
            Commands::Status(args) => cmd_status(args),
            Commands::Priority(args) => cmd_priority(args),
            Commands::Fav(args) => cmd_fav(args),
            Commands::Tag(args) => cmd_tag(args),
            Commands::Dep(args) => cmd_dep(args),
            Commands::Note(args) => cmd_note(args),
            Commands::Archive(args) => cmd_archive(args),
            Commands::Unarchive(args) => cmd_unarchive(args),
            Commands::Clone(args) => cmd_clone(args),
            Commands::Mv(args) => cmd_mv(args),
            Commands::Reorder(args) => cmd_reorder(args),
            Commands::Bulk(args) => cmd_bulk(args),
            Commands::Revert(args) => cmd_revert(args),
            Commands::Rm(args) => cmd_rm(args),

            // Maintenance
            Commands::Links(args) => cmd_links(args, json),
            Commands::Import(args) => cmd_import(args, json),
            Commands::Export(args) => cmd_export(args),
            Commands::Share(args) => cmd_share(args, json),
            Commands::Backup(args) => cmd_backup(args),
            Commands::Restore(args) => cmd_restore(args),

            // Presets and settings
            Commands::Preset(args) => cmd_preset(args, json),
            Commands::Config(args) => cmd_config(args, json),
        },
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn board_dir() -> Result<PathBuf, Box<dyn std::error::Error>> {
    let start = match BOARD_DIR_OVERRIDE.lock().unwrap().as_ref() {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    Ok(board_io::discover_board(&start)?)
}

fn open_store() -> Result<Store, Box<dyn std::error::Error>> {
    Ok(Store::load(&board_dir()?)?)
}

fn parse_filter_args(
    progress: Option<&str>,
    category: Option<&str>,
    priority: Option<&str>,
    search: Option<&str>,
    favorites: bool,
    archived: bool,
) -> Result<Filter, String> {
    Ok(Filter {
        progress: progress.map(parse_progress).transpose()?,
        category: category.map(str::to_string),
        priority: priority.map(parse_priority).transpose()?,
        search: search.unwrap_or_default().to_string(),
        favorites_only: favorites,
        archived,
    })
}

fn parse_sort_args(sort: Option<&str>, desc: bool) -> Result<Sort, String> {
    Ok(Sort {
        field: sort.map(parse_sort_field).transpose()?.unwrap_or_default(),
        direction: if desc { SortDir::Desc } else { SortDir::Asc },
    })
}

/// Active project ids in manual order, ties broken by list position
fn ordered_ids(store: &Store) -> Vec<String> {
    let mut entries: Vec<(i64, String)> = store
        .projects
        .iter()
        .map(|p| (p.order, p.id.clone()))
        .collect();
    entries.sort_by_key(|(order, _)| *order);
    entries.into_iter().map(|(_, id)| id).collect()
}

// ---------------------------------------------------------------------------
// Read command handlers
// ---------------------------------------------------------------------------

fn cmd_list(args: ListArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;

    let (filter, sort) = if let Some(ref name) = args.preset {
        let preset = store
            .presets
            .iter()
            .find(|p| p.name == *name)
            .ok_or_else(|| format!("preset not found: {}", name))?;
        (preset.filter.clone(), preset.sort)
    } else {
        let filter = parse_filter_args(
            args.progress.as_deref(),
            args.category.as_deref(),
            args.priority.as_deref(),
            args.search.as_deref(),
            args.favorites,
            args.archived,
        )
        .map_err(Box::<dyn std::error::Error>::from)?;
        let sort = parse_sort_args(args.sort.as_deref(), args.desc)
            .map_err(Box::<dyn std::error::Error>::from)?;
        (filter, sort)
    };

    let pool = if filter.archived {
        &store.archived
    } else {
        &store.projects
    };
    let rows = view::view(pool, &filter, sort);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let today = Utc::now().date_naive();
        for project in &rows {
            println!("{}", format_project_line(project, today));
        }
    }
    Ok(())
}

fn cmd_show(args: IdArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let project = store
        .get(&args.id)
        .ok_or_else(|| format!("project not found: {}", args.id))?;

    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        let today = Utc::now().date_naive();
        let history_count = store.history_for(&args.id).len();
        for line in format_project_detail(project, history_count, today) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_search(args: SearchArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let filter = Filter {
        search: args.query.clone(),
        archived: args.archived,
        ..Filter::default()
    };
    let pool = if args.archived {
        &store.archived
    } else {
        &store.projects
    };
    let rows = view::view(pool, &filter, Sort::default());

    // Remember the term for `suggest`; state is cosmetic, failures are not
    let mut ui = state::read_ui_state(&store.dir).unwrap_or_default();
    state::record_search(&mut ui, &args.query);
    let _ = state::write_ui_state(&store.dir, &ui);

    if json {
        println!("{}", serde_json::to_string_pretty(&rows)?);
    } else {
        let today = Utc::now().date_naive();
        for project in &rows {
            println!("{}", format_project_line(project, today));
        }
    }
    Ok(())
}

fn cmd_suggest(args: SuggestArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let ui = state::read_ui_state(&store.dir).unwrap_or_default();
    let matches = suggest::suggestions(&store.projects, &ui.search_history, &args.query);

    if json {
        println!("{}", serde_json::to_string_pretty(&matches)?);
    } else {
        for m in &matches {
            println!("{}", m);
        }
    }
    Ok(())
}

fn cmd_stats(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let today = Utc::now().date_naive();
    let stats = stats::stats(&store.projects, &store.archived, today);

    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        for line in format_stats(&stats) {
            println!("{}", line);
        }
    }
    Ok(())
}

fn cmd_activity(args: ActivityArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let entries: Vec<_> = store.activity.iter().take(args.limit).collect();

    if json {
        println!("{}", serde_json::to_string_pretty(&entries)?);
    } else {
        if entries.is_empty() {
            println!("(no activity)");
        }
        for entry in &entries {
            println!("{}", format_activity_line(entry));
        }
    }
    Ok(())
}

fn cmd_history(args: IdArg, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    if store.get(&args.id).is_none() {
        return Err(format!("project not found: {}", args.id).into());
    }
    let entries = store.history_for(&args.id);

    if json {
        let items: Vec<HistoryItemJson> = entries
            .iter()
            .enumerate()
            .map(|(i, e)| history_item_to_json(i, e))
            .collect();
        println!("{}", serde_json::to_string_pretty(&items)?);
    } else {
        if entries.is_empty() {
            println!("(no history)");
        }
        for (i, entry) in entries.iter().enumerate() {
            println!("{}", format_history_line(i, entry));
        }
    }
    Ok(())
}

fn cmd_check(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let result = check::check_board(&store.projects, &store.archived);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        if !result.errors.is_empty() {
            println!("Errors:");
            for err in &result.errors {
                match err {
                    check::CheckError::DuplicateId { id, count } => {
                        println!("  {} appears {} times", id, count);
                    }
                    check::CheckError::ListMismatch {
                        id,
                        name,
                        archived_flag,
                    } => {
                        if *archived_flag {
                            println!(
                                "  {} \"{}\" is flagged archived but sits in the active list",
                                id, name
                            );
                        } else {
                            println!(
                                "  {} \"{}\" is flagged active but sits in the archive",
                                id, name
                            );
                        }
                    }
                }
            }
        }
        if !result.warnings.is_empty() {
            if !result.errors.is_empty() {
                println!();
            }
            println!("Warnings:");
            for warn in &result.warnings {
                match warn {
                    check::CheckWarning::DanglingDependency { id, name, dep_id } => {
                        println!("  {} \"{}\" depends on missing {}", id, name, dep_id);
                    }
                }
            }
        }
        if result.valid {
            println!("✓ board is valid");
        } else {
            println!("✗ board has errors");
        }
    }
    Ok(())
}

fn cmd_templates(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if json {
        println!("{}", serde_json::to_string_pretty(&template::TEMPLATES)?);
    } else {
        for t in &template::TEMPLATES {
            let tags = t
                .tags
                .iter()
                .map(|tag| format!("#{}", tag))
                .collect::<Vec<_>>()
                .join(" ");
            println!(
                "  {:<18} {:<10} {:<7} {}",
                t.slug,
                t.category,
                t.priority.label(),
                tags
            );
        }
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Write command handlers
// ---------------------------------------------------------------------------

fn cmd_add(args: AddArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let template = match args.template.as_deref() {
        Some(slug) => Some(template::find(slug).ok_or_else(|| {
            format!(
                "unknown template '{}' (expected: web-app, chrome-extension, tool)",
                slug
            )
        })?),
        None => None,
    };

    let mut draft = ProjectDraft::default();
    if let Some(t) = template {
        draft.name = t.name.to_string();
        draft.category = t.category.to_string();
        draft.priority = Some(t.priority);
        draft.tags = t.tags.iter().map(|s| s.to_string()).collect();
    }

    // Explicit flags override template values; tags accumulate
    if let Some(name) = args.name {
        draft.name = name;
    }
    if let Some(link) = args.link {
        draft.link = link;
    }
    if let Some(category) = args.category {
        draft.category = category;
    }
    if let Some(description) = args.description {
        draft.description = description;
    }
    if let Some(ref progress) = args.progress {
        draft.progress =
            Some(parse_progress(progress).map_err(Box::<dyn std::error::Error>::from)?);
    }
    if let Some(ref priority) = args.priority {
        draft.priority =
            Some(parse_priority(priority).map_err(Box::<dyn std::error::Error>::from)?);
    }
    if let Some(ref due) = args.due {
        draft.due_date = Some(parse_due(due).map_err(Box::<dyn std::error::Error>::from)?);
    }
    for tag in args.tag {
        if !draft.tags.contains(&tag) {
            draft.tags.push(tag);
        }
    }
    if let Some(icon) = args.icon {
        draft.icon = icon;
    }
    if let Some(color) = args.color {
        draft.color = color;
    }

    let project = store.create(draft)?;
    if json {
        println!("{}", serde_json::to_string_pretty(project)?);
    } else {
        println!("{}", project.id);
    }
    Ok(())
}

fn cmd_edit(args: EditArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let patch = ProjectPatch {
        name: args.name,
        link: args.link,
        progress: args
            .progress
            .as_deref()
            .map(parse_progress)
            .transpose()
            .map_err(Box::<dyn std::error::Error>::from)?,
        category: args.category,
        description: args.description,
        priority: args
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map_err(Box::<dyn std::error::Error>::from)?,
        due_date: if args.clear_due {
            Some(None)
        } else {
            args.due
                .as_deref()
                .map(parse_due)
                .transpose()
                .map_err(Box::<dyn std::error::Error>::from)?
                .map(Some)
        },
        tags: if args.tag.is_empty() {
            None
        } else {
            Some(args.tag)
        },
        icon: args.icon,
        color: args.color,
    };

    if patch.is_empty() {
        return Err("nothing to change".into());
    }

    store.update(&args.id, &patch)?;
    println!("{} updated", args.id);
    Ok(())
}

fn cmd_status(args: StatusArgs) -> Result<(), Box<dyn std::error::Error>> {
    let progress = parse_progress(&args.status).map_err(Box::<dyn std::error::Error>::from)?;

    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.set_progress(&args.id, progress)?;
    println!("{} → {}", args.id, progress.label());
    Ok(())
}

fn cmd_priority(args: PriorityArgs) -> Result<(), Box<dyn std::error::Error>> {
    let priority = parse_priority(&args.priority).map_err(Box::<dyn std::error::Error>::from)?;

    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.set_priority(&args.id, priority)?;
    println!("{} priority {}", args.id, priority.label());
    Ok(())
}

fn cmd_fav(args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let current = store
        .get(&args.id)
        .ok_or_else(|| format!("project not found: {}", args.id))?
        .favorite;
    let now_favorite = store.set_favorite(&args.id, !current)?;
    println!(
        "{} {}",
        args.id,
        if now_favorite {
            "favorited"
        } else {
            "unfavorited"
        }
    );
    Ok(())
}

fn cmd_tag(args: TagArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    match args.action.as_str() {
        "add" => store.add_tag(&args.id, &args.tag)?,
        "rm" => store.remove_tag(&args.id, &args.tag)?,
        other => return Err(format!("unknown action '{}' (expected: add, rm)", other).into()),
    }

    println!("{} tag {} {}", args.id, args.action, args.tag);
    Ok(())
}

fn cmd_dep(args: DepArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    match args.action.as_str() {
        "add" => store.add_dependency(&args.id, &args.dep_id)?,
        "rm" => store.remove_dependency(&args.id, &args.dep_id)?,
        other => return Err(format!("unknown action '{}' (expected: add, rm)", other).into()),
    }

    println!("{} dep {} {}", args.id, args.action, args.dep_id);
    Ok(())
}

fn cmd_note(args: NoteArgs) -> Result<(), Box<dyn std::error::Error>> {
    match args.action.as_str() {
        "add" => {
            let text = args.value.ok_or("note text is required")?;
            let mut store = open_store()?;
            let _lock = FileLock::acquire_default(&store.dir)?;
            store.add_note(&args.id, &text)?;
            println!("{} note added", args.id);
        }
        "ls" => {
            let store = open_store()?;
            let project = store
                .get(&args.id)
                .ok_or_else(|| format!("project not found: {}", args.id))?;
            if project.notes.is_empty() {
                println!("(no notes)");
            }
            for (i, note) in project.notes.iter().enumerate() {
                println!(
                    "[{}] {}  {}",
                    i,
                    note.timestamp.format("%Y-%m-%d %H:%M"),
                    note.text
                );
            }
        }
        "rm" => {
            let raw = args.value.ok_or("note index is required")?;
            let index: usize = raw
                .parse()
                .map_err(|_| format!("invalid note index: {}", raw))?;
            let mut store = open_store()?;
            let _lock = FileLock::acquire_default(&store.dir)?;
            store.remove_note(&args.id, index)?;
            println!("{} note {} removed", args.id, index);
        }
        other => return Err(format!("unknown action '{}' (expected: add, ls, rm)", other).into()),
    }
    Ok(())
}

fn cmd_archive(args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.archive(&args.id)?;
    println!("{} archived", args.id);
    Ok(())
}

fn cmd_unarchive(args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.unarchive(&args.id)?;
    println!("{} unarchived", args.id);
    Ok(())
}

fn cmd_clone(args: IdArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let cloned = store.clone_project(&args.id)?;
    println!("{}", cloned.id);
    Ok(())
}

fn cmd_mv(args: MvArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let mut ids = ordered_ids(&store);
    let from = ids
        .iter()
        .position(|id| *id == args.id)
        .ok_or_else(|| format!("project not found: {}", args.id))?;
    let id = ids.remove(from);
    let to = args.position.min(ids.len());
    ids.insert(to, id);

    store.reorder(&ids)?;
    println!("{} moved to position {}", args.id, to);
    Ok(())
}

fn cmd_reorder(args: ReorderArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let moved = store.reorder(&args.ids)?;
    println!("reordered {} projects", moved);
    Ok(())
}

fn cmd_bulk(args: BulkArgs) -> Result<(), Box<dyn std::error::Error>> {
    let edit = BulkEdit {
        category: args.category,
        priority: args
            .priority
            .as_deref()
            .map(parse_priority)
            .transpose()
            .map_err(Box::<dyn std::error::Error>::from)?,
        tags: args.tag,
    };
    if edit.category.is_none() && edit.priority.is_none() && edit.tags.is_empty() {
        return Err("nothing to change (use --category, --priority, or --tag)".into());
    }

    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let edited = store.bulk_edit(&args.ids, &edit)?;
    println!("bulk edited {} projects", edited);
    Ok(())
}

fn cmd_revert(args: RevertArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.revert(&args.id, args.index)?;
    println!("{} reverted to version {}", args.id, args.index);
    Ok(())
}

fn cmd_rm(args: RmArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    // Resolve every target before deleting anything
    let mut labels = Vec::new();
    for id in &args.ids {
        let project = store
            .get(id)
            .ok_or_else(|| format!("project not found: {}", id))?;
        labels.push(format!("{} \"{}\"", project.id, project.name));
    }

    if !args.yes {
        println!("This permanently deletes {} project(s):", labels.len());
        for label in &labels {
            println!("  {}", label);
        }
        eprint!("Proceed? [y/n] ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("cancelled");
            return Ok(());
        }
    }

    for id in &args.ids {
        let removed = store.delete(id)?;
        println!("deleted \"{}\"", removed.name);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Maintenance handlers
// ---------------------------------------------------------------------------

fn cmd_links(args: LinksArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let timeout = args
        .timeout
        .map(Duration::from_secs)
        .unwrap_or(PROBE_TIMEOUT);
    let outcomes = store.validate_links(timeout, args.offline)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&outcomes)?);
    } else {
        if outcomes.is_empty() {
            println!("(no links to check)");
        }
        for outcome in &outcomes {
            println!("{}", format_outcome_line(outcome));
        }
    }
    Ok(())
}

fn cmd_import(args: ImportArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;

    let format = match args.format.as_deref() {
        Some("json") => "json",
        Some("csv") => "csv",
        Some(other) => {
            return Err(format!("unknown format '{}' (expected: json, csv)", other).into());
        }
        None if args.file.to_lowercase().ends_with(".csv") => "csv",
        None => "json",
    };

    let raws = if format == "csv" {
        parse_csv(&text)
    } else {
        parse_json_records(&text).map_err(|e| format!("could not parse {}: {}", args.file, e))?
    };

    let result = store.import(raws)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!(
            "imported {} projects ({} skipped)",
            result.imported, result.skipped
        );
        for err in &result.errors {
            eprintln!("  {}", err);
        }
    }
    Ok(())
}

fn cmd_export(args: ExportArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;

    let body = match args.format.as_str() {
        "json" => serde_json::to_string_pretty(&store.projects)?,
        "csv" => serialize_csv(&store.projects),
        other => {
            return Err(format!("unknown format '{}' (expected: json, csv)", other).into());
        }
    };

    match args.out {
        Some(path) => {
            std::fs::write(&path, &body)
                .map_err(|e| format!("could not write {}: {}", path, e))?;
            println!("wrote {}", path);
        }
        None => println!("{}", body),
    }
    Ok(())
}

fn cmd_share(args: ShareArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(ref token) = args.decode {
        let payload = decode_share(token)?;
        if json {
            println!("{}", serde_json::to_string_pretty(&payload)?);
        } else {
            println!("shared {}", payload.timestamp.format("%Y-%m-%d %H:%M"));
            for shared in &payload.projects {
                println!("{}", format_shared_line(shared));
            }
        }
        return Ok(());
    }

    let store = open_store()?;
    let selected: Vec<&Project> = if args.ids.is_empty() {
        store.projects.iter().collect()
    } else {
        let mut selected = Vec::new();
        for id in &args.ids {
            // Share reads the active list only
            let project = store
                .projects
                .iter()
                .find(|p| p.id == *id)
                .ok_or_else(|| format!("project not found: {}", id))?;
            selected.push(project);
        }
        selected
    };
    if selected.is_empty() {
        return Err("nothing to share".into());
    }

    let token = encode_share(&selected, Utc::now())?;
    println!("{}", token);
    Ok(())
}

fn cmd_backup(args: BackupArgs) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;
    let now = Utc::now();
    let text = encode_backup(
        &store.projects,
        &store.archived,
        &store.activity,
        &store.history,
        now,
    )?;

    let path = args
        .out
        .unwrap_or_else(|| format!("tally-backup-{}.json", now.format("%Y-%m-%d")));
    std::fs::write(&path, &text).map_err(|e| format!("could not write {}: {}", path, e))?;
    println!("wrote {}", path);
    Ok(())
}

fn cmd_restore(args: RestoreArgs) -> Result<(), Box<dyn std::error::Error>> {
    let text = std::fs::read_to_string(&args.file)
        .map_err(|e| format!("could not read {}: {}", args.file, e))?;
    let doc = decode_backup(&text)?;

    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    if !args.yes {
        println!(
            "This replaces the board ({} active, {} archived) with the backup ({} active, {} archived).",
            store.projects.len(),
            store.archived.len(),
            doc.projects.len(),
            doc.archived_projects.len()
        );
        eprint!("Proceed? [y/n] ");
        let mut input = String::new();
        std::io::stdin().read_line(&mut input)?;
        if !input.trim().eq_ignore_ascii_case("y") {
            println!("cancelled");
            return Ok(());
        }
    }

    let active = doc.projects.len();
    let archived = doc.archived_projects.len();
    store.restore(doc)?;
    println!("restored {} projects ({} archived)", active, archived);
    Ok(())
}

// ---------------------------------------------------------------------------
// Preset handlers
// ---------------------------------------------------------------------------

fn cmd_preset(args: PresetCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        PresetAction::Save(a) => cmd_preset_save(a),
        PresetAction::List => cmd_preset_list(json),
        PresetAction::Rm(a) => cmd_preset_rm(a),
    }
}

fn cmd_preset_save(args: PresetSaveArgs) -> Result<(), Box<dyn std::error::Error>> {
    let filter = parse_filter_args(
        args.progress.as_deref(),
        args.category.as_deref(),
        args.priority.as_deref(),
        args.search.as_deref(),
        args.favorites,
        false,
    )
    .map_err(Box::<dyn std::error::Error>::from)?;
    let sort = parse_sort_args(args.sort.as_deref(), args.desc)
        .map_err(Box::<dyn std::error::Error>::from)?;

    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.save_preset(FilterPreset {
        name: args.name.clone(),
        filter,
        sort,
    })?;
    println!("saved preset \"{}\"", args.name);
    Ok(())
}

fn cmd_preset_list(json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&store.presets)?);
    } else {
        if store.presets.is_empty() {
            println!("(no presets)");
        }
        for preset in &store.presets {
            println!("{}", format_preset_line(preset));
        }
    }
    Ok(())
}

fn cmd_preset_rm(args: PresetNameArg) -> Result<(), Box<dyn std::error::Error>> {
    let mut store = open_store()?;
    let _lock = FileLock::acquire_default(&store.dir)?;

    store.delete_preset(&args.name)?;
    println!("deleted preset \"{}\"", args.name);
    Ok(())
}

// ---------------------------------------------------------------------------
// Settings handlers
// ---------------------------------------------------------------------------

fn cmd_config(args: ConfigCmd, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    match args.action {
        ConfigAction::Get(a) => cmd_config_get(a, json),
        ConfigAction::Set(a) => cmd_config_set(a),
    }
}

fn cmd_config_get(args: ConfigGetArgs, json: bool) -> Result<(), Box<dyn std::error::Error>> {
    let dir = board_dir()?;
    let ui = state::read_ui_state(&dir).unwrap_or_default();

    match args.key.as_deref() {
        None => {
            if json {
                println!("{}", serde_json::to_string_pretty(&ui)?);
            } else {
                println!("theme      {}", ui.theme);
                println!("dark-mode  {}", ui.dark_mode);
                println!("view-mode  {}", ui.view_mode);
            }
        }
        Some("theme") => println!("{}", ui.theme),
        Some("dark-mode") => println!("{}", ui.dark_mode),
        Some("view-mode") => println!("{}", ui.view_mode),
        Some(other) => {
            return Err(format!(
                "unknown setting '{}' (expected: theme, dark-mode, view-mode)",
                other
            )
            .into());
        }
    }
    Ok(())
}

fn cmd_config_set(args: ConfigSetArgs) -> Result<(), Box<dyn std::error::Error>> {
    let dir = board_dir()?;
    let _lock = FileLock::acquire_default(&dir)?;

    let mut ui = state::read_ui_state(&dir).unwrap_or_default();
    match args.key.as_str() {
        "theme" => {
            if !state::THEMES.contains(&args.value.as_str()) {
                return Err(format!(
                    "unknown theme '{}' (expected: {})",
                    args.value,
                    state::THEMES.join(", ")
                )
                .into());
            }
            ui.theme = args.value.clone();
        }
        "dark-mode" => {
            ui.dark_mode = match args.value.as_str() {
                "on" | "true" => true,
                "off" | "false" => false,
                other => {
                    return Err(
                        format!("invalid dark-mode value '{}' (expected: on, off)", other).into(),
                    );
                }
            };
        }
        "view-mode" => {
            if !state::VIEW_MODES.contains(&args.value.as_str()) {
                return Err(format!(
                    "unknown view mode '{}' (expected: {})",
                    args.value,
                    state::VIEW_MODES.join(", ")
                )
                .into());
            }
            ui.view_mode = args.value.clone();
        }
        other => {
            return Err(format!(
                "unknown setting '{}' (expected: theme, dark-mode, view-mode)",
                other
            )
            .into());
        }
    }

    state::write_ui_state(&dir, &ui)?;
    println!("{} = {}", args.key, args.value);
    Ok(())
}
