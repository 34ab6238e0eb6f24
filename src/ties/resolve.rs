use ahash::AHashMap;
use anyhow::{Context, Result, bail};

use crate::table::{AreaId, GeoTable};

use super::{Centroids, NeighborTable, great_circle_miles};

/// A recipient with more than one candidate provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TieGroup {
    pub recipient: AreaId,
    pub candidates: Vec<AreaId>,
}

/// Group tie-table rows by recipient, in first appearance order, keeping
/// candidate providers in row order. A recipient with a single row is not a
/// tie and produces no group.
pub fn tie_groups(table: &GeoTable) -> Result<Vec<TieGroup>> {
    let rec = table.find_field("rec")?;
    let prov = table.find_field("prov")?;

    let mut order: Vec<AreaId> = Vec::new();
    let mut groups: AHashMap<AreaId, Vec<AreaId>> = AHashMap::new();
    for row in table.rows() {
        let (Some(r), Some(p)) = (row.area_id(rec), row.area_id(prov)) else { continue };
        groups
            .entry(r.clone())
            .or_insert_with(|| {
                order.push(r);
                Vec::new()
            })
            .push(p);
    }

    Ok(order
        .into_iter()
        .filter_map(|recipient| {
            let candidates = groups.remove(&recipient)?;
            (candidates.len() > 1).then_some(TieGroup { recipient, candidates })
        })
        .collect())
}

/// Resolve every tie in the table to a single provider.
///
/// Per tie group, in order of precedence:
/// 1. a recipient that is its own candidate resolves to itself;
/// 2. otherwise the adjacent candidate with the longest shared boundary
///    wins (zero-length edges do not count as adjacency; on equal lengths
///    the last edge encountered wins);
/// 3. otherwise the candidate with the nearest centroid wins, first
///    candidate taking an exact distance tie.
///
/// A group that reaches the distance phase without a recipient centroid, or
/// with no candidate centroid at all, is a data error.
pub fn resolve(
    table: &GeoTable,
    neighbors: &NeighborTable,
    centroids: &Centroids,
) -> Result<AHashMap<AreaId, AreaId>> {
    let mut resolved = AHashMap::new();
    for group in tie_groups(table)? {
        let provider = resolve_group(&group, neighbors, centroids)?;
        resolved.insert(group.recipient, provider);
    }
    Ok(resolved)
}

fn resolve_group(
    group: &TieGroup,
    neighbors: &NeighborTable,
    centroids: &Centroids,
) -> Result<AreaId> {
    let TieGroup { recipient, candidates } = group;

    if candidates.contains(recipient) {
        return Ok(recipient.clone());
    }

    let mut best: Option<(f64, &AreaId)> = None;
    for (nbr, length) in neighbors.neighbors(recipient) {
        if *length > 0.0
            && candidates.contains(nbr)
            && best.is_none_or(|(len, _)| *length >= len)
        {
            best = Some((*length, nbr));
        }
    }
    if let Some((_, nbr)) = best {
        return Ok(nbr.clone());
    }

    let origin = centroids
        .get(recipient)
        .with_context(|| format!("[ties] no centroid for recipient {recipient}"))?;
    let mut nearest: Option<(f64, &AreaId)> = None;
    for candidate in candidates {
        let Some(point) = centroids.get(candidate) else { continue };
        let distance = great_circle_miles(origin, point);
        if nearest.is_none_or(|(d, _)| distance < d) {
            nearest = Some((distance, candidate));
        }
    }
    match nearest {
        Some((_, candidate)) => Ok(candidate.clone()),
        None => bail!("[ties] no candidate of recipient {recipient} has a centroid"),
    }
}

/// Filter the tie table against a resolved mapping: rows whose recipient
/// has no tie pass through, and the winning row of each tie is kept; losing
/// candidate rows are dropped. Row order and header are preserved.
pub fn filter_resolved(
    table: &GeoTable,
    resolved: &AHashMap<AreaId, AreaId>,
) -> Result<GeoTable> {
    let rec = table.find_field("rec")?;
    let prov = table.find_field("prov")?;

    let mut out = GeoTable::new(table.fields().to_vec())?;
    for row in table.rows() {
        let keep = match row.area_id(rec).as_ref().and_then(|r| resolved.get(r)) {
            Some(winner) => row.area_id(prov).as_ref() == Some(winner),
            None => true,
        };
        if keep {
            out.push_row(row.values().to_vec())?;
        }
    }
    Ok(out)
}
