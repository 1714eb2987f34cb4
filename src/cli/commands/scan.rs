//! Library import command.

use std::path::PathBuf;
use tokio::runtime::Runtime;

use super::Session;
use crate::scanner;

/// Scan a directory for music files
pub fn cmd_scan(rt: &Runtime, session: &Session, path: Option<&PathBuf>) -> anyhow::Result<()> {
    let Some(root) = path.or(session.config.library.music_dir.as_ref()).cloned() else {
        anyhow::bail!("No directory given and library.music_dir is not configured");
    };

    rt.block_on(async {
        let store = session.open_store().await?;
        println!("Scanning directory: {}", root.display());

        let summary = scanner::import(&store, root).await?;
        println!(
            "Scan complete. Imported {} songs, skipped {} unreadable files.",
            summary.imported, summary.failed
        );
        Ok(())
    })
}
