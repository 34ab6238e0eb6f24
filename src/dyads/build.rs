use ahash::AHashMap;
use anyhow::Result;

use crate::table::{AreaId, GeoTable, Value};

/// Fields of a freshly built dyad table.
const DYAD_FIELDS: [&str; 6] =
    ["REC_ZIP", "PROV_ZIP", "VISITS_DYAD", "MAX_VISITS", "VISITS_TOTAL", "DYAD_MAX"];

/// Aggregate raw visit events (one row per visit, member ZIP and provider
/// ZIP) into a dyad table: one row per (member, provider) pair with the
/// visit count, plus the per-member maximum and total and a 0/1 marker on
/// the pair(s) carrying the maximum.
///
/// Output rows follow first appearance order of members, and of providers
/// within a member. Rows missing either identifier are skipped.
pub fn build_dyads(
    events: &GeoTable,
    member_field: &str,
    provider_field: &str,
) -> Result<GeoTable> {
    let mem = events.field_index(member_field)?;
    let prov = events.field_index(provider_field)?;

    // Per member: provider order plus a keyed accumulator of visit counts.
    let mut order: Vec<AreaId> = Vec::new();
    let mut groups: AHashMap<AreaId, (Vec<AreaId>, AHashMap<AreaId, i64>)> = AHashMap::new();
    for row in events.rows() {
        let (Some(m), Some(p)) = (row.area_id(mem), row.area_id(prov)) else { continue };
        let (provs, counts) = groups.entry(m.clone()).or_insert_with(|| {
            order.push(m);
            (Vec::new(), AHashMap::new())
        });
        *counts.entry(p.clone()).or_insert_with(|| {
            provs.push(p);
            0
        }) += 1;
    }

    let mut table = GeoTable::new(DYAD_FIELDS.iter().map(|f| f.to_string()).collect())?;
    for member in &order {
        let (provs, counts) = &groups[member];
        let total: i64 = counts.values().sum();
        let max: i64 = counts.values().copied().max().unwrap_or(0);
        for provider in provs {
            let visits = counts[provider];
            table.push_row(vec![
                member.clone().into(),
                provider.clone().into(),
                Value::Int(visits),
                Value::Int(max),
                Value::Int(total),
                Value::Int((visits == max) as i64),
            ])?;
        }
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn events(rows: &[(&str, &str)]) -> GeoTable {
        let mut table = GeoTable::new(vec!["MEM_ZIP".into(), "PROV_ZIP".into()]).unwrap();
        for (mem, prov) in rows {
            table.push_row(vec![(*mem).into(), (*prov).into()]).unwrap();
        }
        table
    }

    #[test]
    fn counts_visits_per_pair() {
        let events = events(&[
            ("52240", "52242"),
            ("52240", "52242"),
            ("52240", "52245"),
            ("50010", "50011"),
        ]);
        let dyads = build_dyads(&events, "MEM_ZIP", "PROV_ZIP").unwrap();

        assert_eq!(dyads.fields(), &DYAD_FIELDS);
        assert_eq!(dyads.len(), 3);

        let rows: Vec<_> = dyads.rows().collect();
        // (52240, 52242): 2 visits, member max 2, member total 3, marked max.
        assert_eq!(rows[0].area_id(0), Some(AreaId::new("52240")));
        assert_eq!(rows[0].area_id(1), Some(AreaId::new("52242")));
        assert_eq!(rows[0].int(2), Some(2));
        assert_eq!(rows[0].int(3), Some(2));
        assert_eq!(rows[0].int(4), Some(3));
        assert_eq!(rows[0].int(5), Some(1));
        // (52240, 52245): 1 visit, not the max.
        assert_eq!(rows[1].int(2), Some(1));
        assert_eq!(rows[1].int(5), Some(0));
        // (50010, 50011): sole pair is both max and total.
        assert_eq!(rows[2].int(2), Some(1));
        assert_eq!(rows[2].int(5), Some(1));
    }

    #[test]
    fn output_follows_first_appearance_order() {
        let events = events(&[
            ("50010", "50011"),
            ("52240", "52242"),
            ("50010", "50012"),
        ]);
        let dyads = build_dyads(&events, "MEM_ZIP", "PROV_ZIP").unwrap();

        let members: Vec<_> = dyads.rows().map(|row| row.area_id(0).unwrap()).collect();
        assert_eq!(
            members,
            vec![AreaId::new("50010"), AreaId::new("50010"), AreaId::new("52240")]
        );
    }

    #[test]
    fn tied_pairs_are_all_marked_max() {
        let events = events(&[
            ("52240", "52242"),
            ("52240", "52245"),
        ]);
        let dyads = build_dyads(&events, "MEM_ZIP", "PROV_ZIP").unwrap();
        assert!(dyads.rows().all(|row| row.int(5) == Some(1)));
    }

    #[test]
    fn rows_without_identifiers_are_skipped() {
        let mut table = GeoTable::new(vec!["MEM_ZIP".into(), "PROV_ZIP".into()]).unwrap();
        table.push_row(vec!["52240".into(), Value::Null]).unwrap();
        table.push_row(vec!["52240".into(), "52242".into()]).unwrap();

        let dyads = build_dyads(&table, "MEM_ZIP", "PROV_ZIP").unwrap();
        assert_eq!(dyads.len(), 1);
    }

    #[test]
    fn exact_field_names_are_required() {
        let events = events(&[("52240", "52242")]);
        assert!(build_dyads(&events, "mem_zip", "PROV_ZIP").is_err());
    }
}
