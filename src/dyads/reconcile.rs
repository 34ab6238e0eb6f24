use std::collections::BTreeSet;

use ahash::{AHashMap, AHashSet};
use anyhow::Result;
use serde::Serialize;

use crate::crosswalk::{Crosswalk, ZctaSet};
use crate::table::{AreaId, GeoTable, RowId, Value};

/// Outcome of a reconciliation pass over a dyad table.
///
/// Resolved sets hold the ZCTAs that invalid identifiers were rewritten to;
/// unresolved sets hold the identifiers that had no crosswalk entry and were
/// left in place.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReconcileReport {
    pub rec_resolved: BTreeSet<AreaId>,
    pub rec_unresolved: BTreeSet<AreaId>,
    pub prov_resolved: BTreeSet<AreaId>,
    pub prov_unresolved: BTreeSet<AreaId>,
    /// Duplicate rows removed after identifier rewriting.
    pub rows_merged: usize,
    /// Sum of the visits field before reconciliation.
    pub visits_total: i64,
    /// Visits on rows that still carry an unresolved identifier.
    pub visits_missed: i64,
    /// `visits_missed / visits_total`, or `None` for a table with no visits.
    pub missed_fraction: Option<f64>,
}

/// Resolve invalid identifiers in a dyad table through the crosswalk and
/// repair the table afterwards.
///
/// The pass rewrites, in row order, every recipient and provider identifier
/// that is not in `zctas` but has a crosswalk entry. Rows whose identifier
/// has no entry keep it unchanged; their visits are counted into
/// `visits_missed` once per row, even when both sides are unresolved.
///
/// Rewriting can leave several rows on the same (recipient, provider) pair.
/// Each such group is merged by summing its visits cumulatively in row order
/// onto the last row and deleting the rest, so no visits are lost. Merging
/// an already-merged table changes nothing.
///
/// Finally the stored aggregates are recomputed for every resolved
/// recipient: the total and maximum of the visits field across its rows, and
/// a 0/1 marker on the rows carrying that maximum.
pub fn reconcile(
    dyads: &mut GeoTable,
    crosswalk: &Crosswalk,
    zctas: &ZctaSet,
    visits_field: &str,
) -> Result<ReconcileReport> {
    let rec = dyads.find_field("rec")?;
    let prov = dyads.find_field("prov")?;
    let visits = dyads.field_index(visits_field)?;
    let max_visits = dyads.find_field("max_visits")?;
    let visits_total = dyads.find_field("visits_total")?;
    let dyad_max = dyads.find_field("dyad_max")?;

    let mut report = ReconcileReport::default();
    for row in dyads.rows() {
        if let Some(v) = row.int(visits) {
            report.visits_total += v;
        }
    }

    // Rewrite both sides independently, in row order.
    for row in dyads.rows_mut() {
        let mut missed = false;
        if let Some(id) = row.area_id(rec)
            && !zctas.contains(&id)
        {
            match crosswalk.lookup(&id) {
                Some(zcta) => {
                    row.set(rec, zcta.clone().into());
                    report.rec_resolved.insert(zcta.clone());
                }
                None => {
                    report.rec_unresolved.insert(id);
                    missed = true;
                }
            }
        }
        if let Some(id) = row.area_id(prov)
            && !zctas.contains(&id)
        {
            match crosswalk.lookup(&id) {
                Some(zcta) => {
                    row.set(prov, zcta.clone().into());
                    report.prov_resolved.insert(zcta.clone());
                }
                None => {
                    report.prov_unresolved.insert(id);
                    missed = true;
                }
            }
        }
        if missed {
            report.visits_missed += row.int(visits).unwrap_or(0);
        }
    }

    report.rows_merged = merge_duplicates(dyads, &report.rec_resolved, rec, prov, visits);
    recompute_aggregates(dyads, &report.rec_resolved, rec, visits, max_visits, visits_total, dyad_max);

    report.missed_fraction = (report.visits_total != 0)
        .then(|| report.visits_missed as f64 / report.visits_total as f64);
    Ok(report)
}

/// Merge rows that share a (recipient, provider) pair after rewriting, for
/// recipients that were resolved. One grouped pass over the table; row ids
/// keep the groups in original insertion order.
fn merge_duplicates(
    dyads: &mut GeoTable,
    resolved: &BTreeSet<AreaId>,
    rec: usize,
    prov: usize,
    visits: usize,
) -> usize {
    let mut groups: AHashMap<(AreaId, AreaId), Vec<(RowId, i64)>> = AHashMap::new();
    for row in dyads.rows() {
        let (Some(r), Some(p)) = (row.area_id(rec), row.area_id(prov)) else { continue };
        if resolved.contains(&r) {
            groups.entry((r, p)).or_default().push((row.id(), row.int(visits).unwrap_or(0)));
        }
    }

    let mut merged = 0;
    let mut totals: AHashMap<RowId, i64> = AHashMap::new();
    let mut doomed: AHashSet<RowId> = AHashSet::new();
    for rows in groups.into_values() {
        if rows.len() < 2 {
            continue;
        }
        // Cumulative sum over the group; the last row keeps the total.
        let mut running = 0;
        for (id, v) in &rows {
            running += v;
            doomed.insert(*id);
        }
        let (survivor, _) = rows[rows.len() - 1];
        doomed.remove(&survivor);
        totals.insert(survivor, running);
        merged += rows.len() - 1;
    }

    for row in dyads.rows_mut() {
        if let Some(total) = totals.get(&row.id()) {
            row.set(visits, Value::Int(*total));
        }
    }
    dyads.delete_rows(&doomed);
    merged
}

/// Recompute stored aggregates for every resolved recipient: total visits,
/// maximum visits, and the max marker on the rows that carry the maximum.
fn recompute_aggregates(
    dyads: &mut GeoTable,
    resolved: &BTreeSet<AreaId>,
    rec: usize,
    visits: usize,
    max_visits: usize,
    visits_total: usize,
    dyad_max: usize,
) {
    let mut agg: AHashMap<AreaId, (i64, i64)> = AHashMap::new();
    for row in dyads.rows() {
        let Some(r) = row.area_id(rec) else { continue };
        if resolved.contains(&r) {
            let v = row.int(visits).unwrap_or(0);
            let entry = agg.entry(r).or_insert((0, 0));
            entry.0 += v;
            entry.1 = entry.1.max(v);
        }
    }

    for row in dyads.rows_mut() {
        let Some(r) = row.area_id(rec) else { continue };
        let Some(&(total, max)) = agg.get(&r) else { continue };
        let v = row.int(visits).unwrap_or(0);
        row.set(visits_total, Value::Int(total));
        row.set(max_visits, Value::Int(max));
        row.set(dyad_max, Value::Int((v == max) as i64));
    }
}
