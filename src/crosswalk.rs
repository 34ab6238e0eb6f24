//! ZIP-to-ZCTA crosswalk and the canonical ZCTA membership set.

use ahash::{AHashMap, AHashSet};
use anyhow::Result;

use crate::table::{AreaId, GeoTable, Value};

/// ZIP to ZCTA assignments, built once from a crosswalk table and read-only
/// afterwards.
///
/// When the same ZIP appears on more than one row, the last row wins. The
/// upstream crosswalk occasionally repeats a ZIP and the freshest assignment
/// is the one kept.
#[derive(Debug, Clone, Default)]
pub struct Crosswalk {
    map: AHashMap<AreaId, AreaId>,
}

impl Crosswalk {
    /// Build the mapping from a crosswalk table. The ZIP and ZCTA fields are
    /// located by case-insensitive substring match on the field names.
    pub fn from_table(table: &GeoTable) -> Result<Self> {
        let zip = table.find_field("zip")?;
        let zcta = table.find_field("zcta")?;

        let mut map = AHashMap::new();
        for row in table.rows() {
            let (Some(z), Some(c)) = (row.area_id(zip), row.area_id(zcta)) else { continue };
            map.insert(z, c);
        }
        Ok(Self { map })
    }

    pub fn lookup(&self, zip: &AreaId) -> Option<&AreaId> { self.map.get(zip) }

    pub fn contains_zip(&self, zip: &AreaId) -> bool { self.map.contains_key(zip) }

    pub fn len(&self) -> usize { self.map.len() }

    pub fn is_empty(&self) -> bool { self.map.is_empty() }
}

impl FromIterator<(AreaId, AreaId)> for Crosswalk {
    fn from_iter<I: IntoIterator<Item = (AreaId, AreaId)>>(iter: I) -> Self {
        Self { map: iter.into_iter().collect() }
    }
}

/// The set of valid canonical ZCTAs, taken from the boundary dataset's
/// identifier field. Used purely for membership tests.
#[derive(Debug, Clone, Default)]
pub struct ZctaSet {
    ids: AHashSet<AreaId>,
}

impl ZctaSet {
    pub fn from_table(table: &GeoTable) -> Result<Self> {
        let field = table.find_field_any(&["zcta", "zip"])?;
        Ok(Self { ids: table.rows().filter_map(|row| row.area_id(field)).collect() })
    }

    pub fn contains(&self, id: &AreaId) -> bool { self.ids.contains(id) }

    pub fn len(&self) -> usize { self.ids.len() }

    pub fn is_empty(&self) -> bool { self.ids.is_empty() }
}

impl FromIterator<AreaId> for ZctaSet {
    fn from_iter<I: IntoIterator<Item = AreaId>>(iter: I) -> Self {
        Self { ids: iter.into_iter().collect() }
    }
}

/// Rows of a national crosswalk whose state field matches any of `states`,
/// case-insensitively, so both the postal code and the full name select the
/// same rows ("IA" and "Iowa").
pub fn state_subset(table: &GeoTable, states: &[String]) -> Result<GeoTable> {
    let state = table.find_field("state")?;

    let mut out = GeoTable::new(table.fields().to_vec())?;
    for row in table.rows() {
        let matched = row
            .get(state)
            .as_str()
            .is_some_and(|s| states.iter().any(|want| s.trim().eq_ignore_ascii_case(want)));
        if matched {
            out.push_row(row.values().to_vec())?;
        }
    }
    Ok(out)
}

/// Add (or fill) a ZCTA column on a ZIP table from the crosswalk. Rows whose
/// ZIP has no crosswalk entry are left untouched. Returns the number of rows
/// annotated.
pub fn annotate_zcta(table: &mut GeoTable, crosswalk: &Crosswalk) -> Result<usize> {
    let zip = table.find_field("zip")?;
    let zcta = match table.find_field("zcta") {
        Ok(idx) => idx,
        Err(_) => table.add_field("ZCTA", Value::Null)?,
    };

    let mut annotated = 0;
    for row in table.rows_mut() {
        let Some(z) = row.area_id(zip) else { continue };
        if let Some(c) = crosswalk.lookup(&z) {
            row.set(zcta, c.clone().into());
            annotated += 1;
        }
    }
    Ok(annotated)
}

/// Rewrite boundary-table identifiers through the crosswalk. Identifiers
/// with no crosswalk entry stay as they are; that is expected, not an error.
/// Returns the number of rows rewritten.
pub fn apply_crosswalk(table: &mut GeoTable, crosswalk: &Crosswalk) -> Result<usize> {
    let field = table.find_field_any(&["zcta", "zip"])?;

    let mut rewritten = 0;
    for row in table.rows_mut() {
        let Some(id) = row.area_id(field) else { continue };
        if let Some(zcta) = crosswalk.lookup(&id) {
            row.set(field, zcta.clone().into());
            rewritten += 1;
        }
    }
    Ok(rewritten)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn crosswalk_table() -> GeoTable {
        let mut table =
            GeoTable::new(vec!["ZIP_CODE".into(), "ZCTA_USE".into(), "STATE".into()]).unwrap();
        table.push_row(vec!["50010".into(), "50010".into(), "IA".into()]).unwrap();
        table.push_row(vec!["52242".into(), "52240".into(), "IA".into()]).unwrap();
        table.push_row(vec!["60601".into(), "60601".into(), "IL".into()]).unwrap();
        table
    }

    #[test]
    fn builds_mapping_from_heuristic_fields() {
        let crosswalk = Crosswalk::from_table(&crosswalk_table()).unwrap();
        assert_eq!(crosswalk.len(), 3);
        assert_eq!(crosswalk.lookup(&AreaId::new("52242")), Some(&AreaId::new("52240")));
        assert!(!crosswalk.contains_zip(&AreaId::new("99999")));
    }

    #[test]
    fn duplicate_zip_last_row_wins() {
        let mut table = crosswalk_table();
        table.push_row(vec!["52242".into(), "52246".into(), "IA".into()]).unwrap();
        let crosswalk = Crosswalk::from_table(&table).unwrap();
        assert_eq!(crosswalk.lookup(&AreaId::new("52242")), Some(&AreaId::new("52246")));
    }

    #[test]
    fn missing_fields_abort() {
        let table = GeoTable::new(vec!["CODE".into(), "AREA".into()]).unwrap();
        assert!(Crosswalk::from_table(&table).is_err());
        assert!(ZctaSet::from_table(&table).is_err());
    }

    #[test]
    fn membership_set_from_boundary_table() {
        let mut table = GeoTable::new(vec!["ZCTA5CE10".into(), "NAME".into()]).unwrap();
        table.push_row(vec!["52240".into(), "Iowa City".into()]).unwrap();
        table.push_row(vec!["50010".into(), "Ames".into()]).unwrap();
        table.push_row(vec!["52240".into(), "Iowa City dup".into()]).unwrap();

        let zctas = ZctaSet::from_table(&table).unwrap();
        assert_eq!(zctas.len(), 2);
        assert!(zctas.contains(&AreaId::new("52240")));
        assert!(!zctas.contains(&AreaId::new("52242")));
    }

    #[test]
    fn state_subset_matches_code_and_name() {
        let mut table = crosswalk_table();
        table.push_row(vec!["50011".into(), "50010".into(), "Iowa".into()]).unwrap();

        let states = vec!["IA".to_string(), "Iowa".to_string()];
        let subset = state_subset(&table, &states).unwrap();
        assert_eq!(subset.len(), 3);
        assert_eq!(subset.fields(), table.fields());
        assert!(subset.rows().all(|row| {
            let state = row.get(2).as_str().unwrap();
            state.eq_ignore_ascii_case("IA") || state.eq_ignore_ascii_case("Iowa")
        }));
    }

    #[test]
    fn annotate_adds_column_and_skips_unmapped() {
        let crosswalk = Crosswalk::from_table(&crosswalk_table()).unwrap();
        let mut zips = GeoTable::new(vec!["ZIP".into()]).unwrap();
        zips.push_row(vec!["52242".into()]).unwrap();
        zips.push_row(vec!["11111".into()]).unwrap();

        let annotated = annotate_zcta(&mut zips, &crosswalk).unwrap();
        assert_eq!(annotated, 1);
        assert_eq!(zips.fields(), &["ZIP", "ZCTA"]);

        let rows: Vec<_> = zips.rows().collect();
        assert_eq!(rows[0].area_id(1), Some(AreaId::new("52240")));
        assert!(rows[1].get(1).is_null());
    }

    #[test]
    fn annotate_reuses_an_existing_zcta_column() {
        let crosswalk = Crosswalk::from_table(&crosswalk_table()).unwrap();
        let mut zips = GeoTable::new(vec!["ZIP".into(), "ZCTA".into()]).unwrap();
        zips.push_row(vec!["52242".into(), "stale".into()]).unwrap();

        annotate_zcta(&mut zips, &crosswalk).unwrap();
        assert_eq!(zips.fields().len(), 2);
        assert_eq!(zips.rows().next().unwrap().area_id(1), Some(AreaId::new("52240")));
    }

    #[test]
    fn apply_crosswalk_rewrites_only_known_ids() {
        let crosswalk = Crosswalk::from_table(&crosswalk_table()).unwrap();
        let mut boundary = GeoTable::new(vec!["ZCTA5CE10".into()]).unwrap();
        boundary.push_row(vec!["52242".into()]).unwrap();
        boundary.push_row(vec!["99999".into()]).unwrap();

        let rewritten = apply_crosswalk(&mut boundary, &crosswalk).unwrap();
        assert_eq!(rewritten, 1);

        let rows: Vec<_> = boundary.rows().collect();
        assert_eq!(rows[0].area_id(0), Some(AreaId::new("52240")));
        assert_eq!(rows[1].area_id(0), Some(AreaId::new("99999")));
    }
}
