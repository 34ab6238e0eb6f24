use ahash::AHashMap;
use anyhow::Result;
use geo::Point;

use crate::table::{AreaId, GeoTable};

/// True-centroid coordinates per ZCTA, stored as lon/lat points.
#[derive(Debug, Clone, Default)]
pub struct Centroids {
    points: AHashMap<AreaId, Point<f64>>,
}

impl Centroids {
    /// Build the lookup from a centroid table. The identifier field is
    /// located by the usual zcta/zip heuristic, coordinates by "lon"/"x"
    /// and "lat"/"y". Rows missing a coordinate are skipped.
    pub fn from_table(table: &GeoTable) -> Result<Self> {
        let id = table.find_field_any(&["zcta", "zip"])?;
        let lon = table.find_field_any(&["lon", "x"])?;
        let lat = table.find_field_any(&["lat", "y"])?;

        let mut points = AHashMap::new();
        for row in table.rows() {
            let Some(area) = row.area_id(id) else { continue };
            let (Some(x), Some(y)) = (row.float(lon), row.float(lat)) else { continue };
            points.insert(area, Point::new(x, y));
        }
        Ok(Self { points })
    }

    pub fn get(&self, id: &AreaId) -> Option<Point<f64>> {
        self.points.get(id).copied()
    }

    pub fn len(&self) -> usize { self.points.len() }

    pub fn is_empty(&self) -> bool { self.points.is_empty() }
}

impl FromIterator<(AreaId, Point<f64>)> for Centroids {
    fn from_iter<I: IntoIterator<Item = (AreaId, Point<f64>)>>(iter: I) -> Self {
        Self { points: iter.into_iter().collect() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_lon_lat_by_heuristic() {
        let mut table =
            GeoTable::new(vec!["ZCTA5CE10".into(), "INTPTLON10".into(), "INTPTLAT10".into()])
                .unwrap();
        table.push_row(vec!["52240".into(), "-91.53".into(), "41.66".into()]).unwrap();
        table.push_row(vec!["52242".into(), "".into(), "41.70".into()]).unwrap();

        let centroids = Centroids::from_table(&table).unwrap();
        assert_eq!(centroids.len(), 1);

        let point = centroids.get(&AreaId::new("52240")).unwrap();
        assert_eq!(point.x(), -91.53);
        assert_eq!(point.y(), 41.66);
        assert_eq!(centroids.get(&AreaId::new("52242")), None);
    }

    #[test]
    fn missing_coordinate_fields_abort() {
        let table = GeoTable::new(vec!["ZCTA".into(), "NAME".into()]).unwrap();
        assert!(Centroids::from_table(&table).is_err());
    }
}
