use std::fs;

use indexmap::IndexMap;

use crate::cli::commands::InitArgs;
use crate::io::board_io::{self, BOARD_DIR};

pub fn cmd_init(args: InitArgs) -> Result<(), Box<dyn std::error::Error>> {
    let cwd = std::env::current_dir()?;
    let board_dir = cwd.join(BOARD_DIR);

    if board_dir.is_dir() && !args.force {
        return Err(format!(
            "board already exists in ./{}/ (use --force to reinitialize)",
            BOARD_DIR
        )
        .into());
    }

    // Warn when a board higher up the tree would have caught this directory
    if let Some(parent) = cwd.parent()
        && let Ok(parent_board) = board_io::discover_board(parent)
    {
        eprintln!("Note: parent board found at {}/", parent_board.display());
        eprintln!("Creating new board in ./{}/", BOARD_DIR);
    }

    fs::create_dir_all(&board_dir)?;
    board_io::save_projects(&board_dir, &[])?;
    board_io::save_archive(&board_dir, &[])?;
    board_io::save_activity(&board_dir, &[])?;
    board_io::save_history(&board_dir, &IndexMap::new())?;
    board_io::save_presets(&board_dir, &[])?;

    println!("Initialized empty board in ./{}/", BOARD_DIR);
    Ok(())
}
