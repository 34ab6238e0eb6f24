use ahash::AHashSet;
use anyhow::{Result, bail, ensure};

use super::{AreaId, Value};

/// Identifies a row for the lifetime of a table, independent of position.
/// Ids are assigned in insertion order and never reused, so the ordering of
/// ids always matches original insertion order regardless of later edits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RowId(u64);

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    id: RowId,
    cells: Vec<Value>,
}

impl Row {
    pub fn id(&self) -> RowId { self.id }

    /// Cell at `field`. Panics when the index is out of range, like slice
    /// indexing; field indices come from the owning table.
    pub fn get(&self, field: usize) -> &Value { &self.cells[field] }

    pub fn set(&mut self, field: usize, value: Value) { self.cells[field] = value; }

    pub fn values(&self) -> &[Value] { &self.cells }

    pub fn area_id(&self, field: usize) -> Option<AreaId> { self.cells[field].as_area_id() }

    pub fn int(&self, field: usize) -> Option<i64> { self.cells[field].as_int() }

    pub fn float(&self, field: usize) -> Option<f64> { self.cells[field].as_float() }
}

/// An in-memory table of named fields, shaped like the record stores the
/// pipeline reads from: sequential filtered reads, in-place field updates,
/// inserts, and deletes, with rows kept in insertion order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GeoTable {
    fields: Vec<String>,
    rows: Vec<Row>,
    next_id: u64,
}

impl GeoTable {
    pub fn new(fields: Vec<String>) -> Result<Self> {
        ensure!(!fields.is_empty(), "[table] a table needs at least one field");
        for (i, field) in fields.iter().enumerate() {
            ensure!(
                !fields[..i].iter().any(|f| f.eq_ignore_ascii_case(field)),
                "[table] duplicate field name {field:?}"
            );
        }
        Ok(Self { fields, rows: Vec::new(), next_id: 0 })
    }

    pub fn fields(&self) -> &[String] { &self.fields }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    /// Position of the field named exactly `name`.
    pub fn field_index(&self, name: &str) -> Result<usize> {
        match self.fields.iter().position(|f| f == name) {
            Some(idx) => Ok(idx),
            None => bail!("[table] no field named {name:?} (fields: {:?})", self.fields),
        }
    }

    /// Locate a field whose name contains `needle`, case-insensitively.
    /// The first match in declaration order wins.
    pub fn find_field(&self, needle: &str) -> Result<usize> {
        let needle = needle.to_ascii_lowercase();
        match self.fields.iter().position(|f| f.to_ascii_lowercase().contains(&needle)) {
            Some(idx) => Ok(idx),
            None => bail!("[table] no field matching {needle:?} (fields: {:?})", self.fields),
        }
    }

    /// Like [`find_field`](Self::find_field), trying each needle in turn.
    pub fn find_field_any(&self, needles: &[&str]) -> Result<usize> {
        for needle in needles {
            if let Ok(idx) = self.find_field(needle) {
                return Ok(idx);
            }
        }
        bail!("[table] no field matching any of {needles:?} (fields: {:?})", self.fields)
    }

    pub fn rows(&self) -> impl Iterator<Item = &Row> { self.rows.iter() }

    pub fn rows_mut(&mut self) -> impl Iterator<Item = &mut Row> { self.rows.iter_mut() }

    /// Sequential filtered read: rows whose identifier cells match every
    /// (field, id) pair in the conjunction.
    pub fn select<'a>(
        &'a self,
        conj: &'a [(usize, AreaId)],
    ) -> impl Iterator<Item = &'a Row> + 'a {
        self.rows.iter().filter(move |row| {
            conj.iter().all(|(field, id)| row.area_id(*field).as_ref() == Some(id))
        })
    }

    pub fn push_row(&mut self, cells: Vec<Value>) -> Result<RowId> {
        ensure!(
            cells.len() == self.fields.len(),
            "[table] row has {} cells, table has {} fields",
            cells.len(),
            self.fields.len()
        );
        let id = RowId(self.next_id);
        self.next_id += 1;
        self.rows.push(Row { id, cells });
        Ok(id)
    }

    /// Delete every row whose id is in `ids`; returns the number removed.
    /// Surviving rows keep their relative order.
    pub fn delete_rows(&mut self, ids: &AHashSet<RowId>) -> usize {
        let before = self.rows.len();
        self.rows.retain(|row| !ids.contains(&row.id));
        before - self.rows.len()
    }

    /// Append a field, filling existing rows with `default`.
    pub fn add_field(&mut self, name: &str, default: Value) -> Result<usize> {
        ensure!(
            !self.fields.iter().any(|f| f.eq_ignore_ascii_case(name)),
            "[table] duplicate field name {name:?}"
        );
        self.fields.push(name.to_string());
        for row in &mut self.rows {
            row.cells.push(default.clone());
        }
        Ok(self.fields.len() - 1)
    }
}
