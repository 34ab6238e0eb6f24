use ahash::AHashMap;
use anyhow::{Result, ensure};

use crate::table::{AreaId, GeoTable};

/// Spatial adjacency between ZCTAs: for each source, the neighbors it
/// shares a boundary with and the length of that shared boundary.
///
/// Edges are kept in input order per source; the resolver's tie-break on
/// equal boundary lengths depends on that order.
#[derive(Debug, Clone, Default)]
pub struct NeighborTable {
    edges: AHashMap<AreaId, Vec<(AreaId, f64)>>,
}

impl NeighborTable {
    /// Build the adjacency lists from a neighbor table. Source, neighbor,
    /// and length fields are located by substring match on the field names.
    pub fn from_table(table: &GeoTable) -> Result<Self> {
        let src = table.find_field("src")?;
        let nbr = table.find_field("nbr")?;
        let len = table.find_field("length")?;

        let mut edges: AHashMap<AreaId, Vec<(AreaId, f64)>> = AHashMap::new();
        for row in table.rows() {
            let (Some(s), Some(n)) = (row.area_id(src), row.area_id(nbr)) else { continue };
            let length = row.float(len).unwrap_or(0.0);
            ensure!(
                length >= 0.0,
                "[ties] negative shared boundary length {length} between {s} and {n}"
            );
            edges.entry(s).or_default().push((n, length));
        }
        Ok(Self { edges })
    }

    /// Edges whose source is `id`, in input order. Empty when the source
    /// has no recorded neighbors.
    pub fn neighbors(&self, id: &AreaId) -> &[(AreaId, f64)] {
        self.edges.get(id).map_or(&[], Vec::as_slice)
    }

    /// Total number of edges.
    pub fn len(&self) -> usize {
        self.edges.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool { self.edges.is_empty() }
}

impl FromIterator<(AreaId, AreaId, f64)> for NeighborTable {
    fn from_iter<I: IntoIterator<Item = (AreaId, AreaId, f64)>>(iter: I) -> Self {
        let mut edges: AHashMap<AreaId, Vec<(AreaId, f64)>> = AHashMap::new();
        for (src, nbr, length) in iter {
            edges.entry(src).or_default().push((nbr, length));
        }
        Self { edges }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neighbor_table(rows: &[(&str, &str, f64)]) -> GeoTable {
        let mut table =
            GeoTable::new(vec!["src_ZCTA5CE10".into(), "nbr_ZCTA5CE10".into(), "LENGTH".into()])
                .unwrap();
        for (src, nbr, len) in rows {
            table.push_row(vec![(*src).into(), (*nbr).into(), (*len).into()]).unwrap();
        }
        table
    }

    #[test]
    fn groups_edges_by_source_in_input_order() {
        let table = neighbor_table(&[
            ("52240", "52241", 10.0),
            ("52240", "52242", 4.5),
            ("52245", "52240", 2.0),
        ]);
        let neighbors = NeighborTable::from_table(&table).unwrap();

        assert_eq!(neighbors.len(), 3);
        assert_eq!(
            neighbors.neighbors(&AreaId::new("52240")),
            &[(AreaId::new("52241"), 10.0), (AreaId::new("52242"), 4.5)]
        );
        assert!(neighbors.neighbors(&AreaId::new("99999")).is_empty());
    }

    #[test]
    fn negative_length_is_rejected() {
        let table = neighbor_table(&[("52240", "52241", -1.0)]);
        let err = NeighborTable::from_table(&table).unwrap_err();
        assert!(err.to_string().contains("negative shared boundary length"));
    }

    #[test]
    fn missing_fields_abort() {
        let table = GeoTable::new(vec!["a".into(), "b".into()]).unwrap();
        assert!(NeighborTable::from_table(&table).is_err());
    }
}
