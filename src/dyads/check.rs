use std::collections::BTreeSet;

use anyhow::Result;
use serde::Serialize;

use crate::crosswalk::ZctaSet;
use crate::table::{AreaId, GeoTable};

/// Dyad-table identifiers that are not valid ZCTAs, per side. A clean table
/// is the precondition for building service areas.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CheckReport {
    pub rec_missing: BTreeSet<AreaId>,
    pub prov_missing: BTreeSet<AreaId>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.rec_missing.is_empty() && self.prov_missing.is_empty()
    }

    /// Distinct invalid identifiers across both sides.
    pub fn missing(&self) -> BTreeSet<AreaId> {
        self.rec_missing.union(&self.prov_missing).cloned().collect()
    }
}

/// Partition dyad identifiers into valid and missing against the ZCTA
/// membership set, independently per side. A row can be missing on the
/// recipient, the provider, both, or neither.
pub fn missing_ids(dyads: &GeoTable, zctas: &ZctaSet) -> Result<CheckReport> {
    let rec = dyads.find_field("rec")?;
    let prov = dyads.find_field("prov")?;

    let mut report = CheckReport::default();
    for row in dyads.rows() {
        if let Some(id) = row.area_id(rec)
            && !zctas.contains(&id)
        {
            report.rec_missing.insert(id);
        }
        if let Some(id) = row.area_id(prov)
            && !zctas.contains(&id)
        {
            report.prov_missing.insert(id);
        }
    }
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn zctas(ids: &[&str]) -> ZctaSet {
        ids.iter().map(|id| AreaId::new(id)).collect()
    }

    fn dyad_table(rows: &[(&str, &str)]) -> GeoTable {
        let mut table = GeoTable::new(vec!["REC_ZCTA".into(), "PROV_ZCTA".into()]).unwrap();
        for (rec, prov) in rows {
            table.push_row(vec![(*rec).into(), (*prov).into()]).unwrap();
        }
        table
    }

    #[test]
    fn clean_table_reports_nothing() {
        let table = dyad_table(&[("52240", "52240"), ("52240", "50010")]);
        let report = missing_ids(&table, &zctas(&["52240", "50010"])).unwrap();
        assert!(report.is_clean());
        assert!(report.missing().is_empty());
    }

    #[test]
    fn sides_are_checked_independently() {
        let table = dyad_table(&[
            ("52242", "52240"), // bad recipient
            ("52240", "52243"), // bad provider
            ("52242", "52243"), // bad on both
        ]);
        let report = missing_ids(&table, &zctas(&["52240"])).unwrap();

        assert_eq!(report.rec_missing, [AreaId::new("52242")].into());
        assert_eq!(report.prov_missing, [AreaId::new("52243")].into());
        assert_eq!(report.missing().len(), 2);
    }

    #[test]
    fn duplicates_collapse_into_the_set() {
        let table = dyad_table(&[("52242", "52240"), ("52242", "50010")]);
        let report = missing_ids(&table, &zctas(&["52240", "50010"])).unwrap();
        assert_eq!(report.rec_missing.len(), 1);
    }
}
