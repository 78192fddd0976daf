//! DLC → parent links, keyed on the DLC product id.
//!
//! The relation only holds installable DLC. A parent's link set is replaced
//! wholesale by [`replace_dlc_links_for_parent`]; counts are of DLC entries,
//! never of summed installer quantities.

use gogdb_catalog::types::DlcLink;
use rusqlite::{Connection, params};

use super::{OperationError, optional_row};

/// Insert or update a DLC link.
pub fn upsert_dlc_link(conn: &Connection, link: &DlcLink) -> Result<(), OperationError> {
    conn.execute(
        "INSERT INTO catalog_dlcs (dlc_id, parent_id, installer_qty)
         VALUES (?1, ?2, ?3)
         ON CONFLICT(dlc_id) DO UPDATE SET
             parent_id = excluded.parent_id,
             installer_qty = excluded.installer_qty",
        params![link.dlc_id, link.parent_id, link.installer_qty],
    )?;
    Ok(())
}

/// Upsert each link in order.
pub fn upsert_dlc_links(conn: &Connection, links: &[DlcLink]) -> Result<(), OperationError> {
    for link in links {
        upsert_dlc_link(conn, link)?;
    }
    Ok(())
}

/// Replace every link under `parent_id` with the installable `candidates`.
///
/// Existing links for the parent are deleted first; candidates with
/// `installer_qty == 0` or naming another parent are dropped. Returns the
/// number of links stored.
pub fn replace_dlc_links_for_parent(
    conn: &Connection,
    parent_id: i64,
    candidates: &[DlcLink],
) -> Result<usize, OperationError> {
    let removed = conn.execute(
        "DELETE FROM catalog_dlcs WHERE parent_id = ?1",
        params![parent_id],
    )?;

    let mut stored = 0;
    for link in candidates {
        if link.parent_id != parent_id {
            log::warn!(
                "Ignoring DLC {} listed under parent {parent_id} but linked to {}",
                link.dlc_id,
                link.parent_id
            );
            continue;
        }
        if !link.is_installable() {
            continue;
        }
        upsert_dlc_link(conn, link)?;
        stored += 1;
    }
    log::debug!(
        "Replaced DLC links for parent {parent_id}: {removed} removed, {stored} stored, {} dropped",
        candidates.len() - stored
    );
    Ok(stored)
}

/// Remove the link of a single DLC. Returns whether a row was deleted.
pub fn remove_dlc_link(conn: &Connection, dlc_id: i64) -> Result<bool, OperationError> {
    let changed = conn.execute("DELETE FROM catalog_dlcs WHERE dlc_id = ?1", params![dlc_id])?;
    Ok(changed > 0)
}

/// Find the link of a DLC.
pub fn get_dlc_link(conn: &Connection, dlc_id: i64) -> Result<Option<DlcLink>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT dlc_id, parent_id, installer_qty FROM catalog_dlcs WHERE dlc_id = ?1",
    )?;
    optional_row(stmt.query_row(params![dlc_id], row_to_dlc_link))
}

/// Number of installable DLC linked to a parent.
pub fn count_installable_dlcs_for_parent(
    conn: &Connection,
    parent_id: i64,
) -> Result<i64, OperationError> {
    let count = conn.query_row(
        "SELECT COUNT(*) FROM catalog_dlcs WHERE parent_id = ?1 AND installer_qty > 0",
        params![parent_id],
        |row| row.get(0),
    )?;
    Ok(count)
}

/// Installable DLC linked to a parent, ordered by DLC id.
pub fn installable_dlcs_for_parent(
    conn: &Connection,
    parent_id: i64,
) -> Result<Vec<DlcLink>, OperationError> {
    let mut stmt = conn.prepare(
        "SELECT dlc_id, parent_id, installer_qty FROM catalog_dlcs
         WHERE parent_id = ?1 AND installer_qty > 0
         ORDER BY dlc_id",
    )?;
    let rows = stmt.query_map(params![parent_id], row_to_dlc_link)?;
    rows.collect::<Result<Vec<_>, _>>().map_err(Into::into)
}

fn row_to_dlc_link(row: &rusqlite::Row<'_>) -> rusqlite::Result<DlcLink> {
    Ok(DlcLink {
        dlc_id: row.get(0)?,
        parent_id: row.get(1)?,
        installer_qty: row.get(2)?,
    })
}
