//! Commands editing the persisted selection.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use tokio::runtime::Runtime;

use super::Session;
use crate::model::PlaylistId;
use crate::selection::{DateSelectionMode, Subset};

/// Replace one of the playlist subsets
pub fn cmd_select(
    rt: &Runtime,
    session: &Session,
    subset: Subset,
    ids: &[PlaylistId],
) -> anyhow::Result<()> {
    rt.block_on(async {
        let library = session.open_library().await?;
        library.set_subset_ids(subset, ids)?;

        let selection = library.selection();
        let chosen = selection.get(subset);
        if chosen.is_empty() {
            println!("{subset:?} cleared");
        } else {
            println!("{subset:?}:");
            for playlist in chosen {
                println!("{:>6}  {}", playlist.id, playlist.name);
            }
        }
        Ok(())
    })
}

fn midnight(date: NaiveDate) -> DateTime<Utc> {
    date.and_time(chrono::NaiveTime::MIN).and_utc()
}

/// Last stored second of `date`. Range ends are inclusive and kept in whole
/// seconds.
fn end_of_day(date: NaiveDate) -> DateTime<Utc> {
    midnight(date) + Duration::days(1) - Duration::seconds(1)
}

/// Show, and optionally change, the added-date settings
pub fn cmd_dates(
    session: &Session,
    mode: Option<DateSelectionMode>,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    stable: Option<bool>,
) -> anyhow::Result<()> {
    let selection = session.open_selection();
    let mut dates = selection.date_selection();
    let before = dates;

    if let Some(mode) = mode {
        dates.mode = mode;
    }
    if let Some(from) = from {
        dates.date = midnight(from);
    }
    if let Some(to) = to {
        dates.until = end_of_day(to);
    }
    if let Some(stable) = stable {
        dates.stable_order = stable;
    }

    if dates != before {
        selection.set_date_selection(&dates)?;
    }

    let range = match dates.mode {
        DateSelectionMode::Range => format!(
            "{} to {}",
            dates.date.format("%Y-%m-%d"),
            dates.until.format("%Y-%m-%d")
        ),
        _ => dates.date.format("%Y-%m-%d").to_string(),
    };
    println!("Added {} {}", dates.mode, range);
    println!(
        "Stable order: {}",
        if dates.keeps_stable_order() {
            "on"
        } else if dates.stable_order {
            "on (applies to \"after\" only)"
        } else {
            "off"
        }
    );
    Ok(())
}
