//! The assembled detail table and its aggregate queries.
//!
//! Rows are normalized records in resolution order; the column set is
//! the fixed fields plus the union of stat names encountered across
//! rows, in first-encounter order. Aggregates are computed straight off
//! the rows with no extra state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::models::DetailRecord;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DetailTable {
    pub rows: Vec<DetailRecord>,
    /// Union of stat identifiers across rows, in first-encounter order.
    pub stat_columns: Vec<String>,
    /// Names of entries that failed resolution, in input order.
    pub skipped: Vec<String>,
}

impl DetailTable {
    /// Append a row, merging its stat names into the column union.
    pub fn push(&mut self, record: DetailRecord) {
        for stat in &record.stats {
            if !self.stat_columns.iter().any(|c| *c == stat.name) {
                self.stat_columns.push(stat.name.clone());
            }
        }
        self.rows.push(record);
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row_by_name(&self, name: &str) -> Option<&DetailRecord> {
        self.rows.iter().find(|r| r.name == name)
    }

    // =========================================================================
    // Aggregates
    // =========================================================================

    /// Count rows by primary type, sorted by count descending then name
    /// for a stable display order.
    pub fn primary_type_counts(&self) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &self.rows {
            if let Some(primary) = row.primary_type() {
                *counts.entry(primary).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts
    }

    pub fn most_common_primary_type(&self) -> Option<String> {
        self.primary_type_counts().into_iter().next().map(|(name, _)| name)
    }

    pub fn heaviest(&self) -> Option<&DetailRecord> {
        self.rows.iter().max_by(|a, b| a.weight_kg.total_cmp(&b.weight_kg))
    }

    pub fn lightest(&self) -> Option<&DetailRecord> {
        self.rows.iter().min_by(|a, b| a.weight_kg.total_cmp(&b.weight_kg))
    }

    pub fn tallest(&self) -> Option<&DetailRecord> {
        self.rows.iter().max_by(|a, b| a.height_m.total_cmp(&b.height_m))
    }

    pub fn shortest(&self) -> Option<&DetailRecord> {
        self.rows.iter().min_by(|a, b| a.height_m.total_cmp(&b.height_m))
    }

    /// Most common abilities across all rows (exploded), top `n`,
    /// sorted by count descending then name.
    pub fn top_abilities(&self, n: usize) -> Vec<(String, usize)> {
        let mut counts: HashMap<&str, usize> = HashMap::new();
        for row in &self.rows {
            for ability in &row.abilities {
                *counts.entry(ability.as_str()).or_default() += 1;
            }
        }

        let mut counts: Vec<(String, usize)> = counts
            .into_iter()
            .map(|(name, count)| (name.to_string(), count))
            .collect();
        counts.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        counts.truncate(n);
        counts
    }

    /// Fixed-width histogram of one stat column. Rows missing the stat
    /// are not counted. Returns (bucket start, count) in ascending
    /// bucket order, empty buckets between occupied ones included.
    pub fn stat_histogram(&self, stat: &str, bucket_width: i64) -> Vec<(i64, usize)> {
        debug_assert!(bucket_width > 0);
        let values: Vec<i64> = self.rows.iter().filter_map(|r| r.stat(stat)).collect();
        let (min, max) = match (values.iter().min(), values.iter().max()) {
            (Some(&min), Some(&max)) => (min, max),
            _ => return Vec::new(),
        };

        let first = (min / bucket_width) * bucket_width;
        let last = (max / bucket_width) * bucket_width;
        let mut buckets: Vec<(i64, usize)> = (first..=last)
            .step_by(bucket_width as usize)
            .map(|start| (start, 0))
            .collect();
        for v in values {
            let idx = ((v - first) / bucket_width) as usize;
            buckets[idx].1 += 1;
        }
        buckets
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::StatEntry;

    fn record(name: &str, types: &[&str], weight: f64, height: f64, stats: &[(&str, i64)]) -> DetailRecord {
        DetailRecord {
            name: name.to_string(),
            id: 0,
            sprite_url: None,
            types: types.iter().map(|t| t.to_string()).collect(),
            height_m: height,
            weight_kg: weight,
            abilities: Vec::new(),
            stats: stats
                .iter()
                .map(|(n, v)| StatEntry {
                    name: n.to_string(),
                    value: *v,
                })
                .collect(),
        }
    }

    fn sample_table() -> DetailTable {
        let mut table = DetailTable::default();
        table.push(record("Bulbasaur", &["grass", "poison"], 6.9, 0.7, &[("hp", 45), ("attack", 49)]));
        table.push(record("Charmander", &["fire"], 8.5, 0.6, &[("hp", 39), ("attack", 52)]));
        table.push(record("Squirtle", &["water"], 9.0, 0.5, &[("hp", 44), ("attack", 48)]));
        table.push(record("Oddish", &["grass", "poison"], 5.4, 0.5, &[("hp", 45), ("speed", 30)]));
        table
    }

    #[test]
    fn test_stat_columns_union_in_encounter_order() {
        let table = sample_table();
        assert_eq!(table.stat_columns, vec!["hp", "attack", "speed"]);
    }

    #[test]
    fn test_missing_stat_is_absent_not_zero() {
        let table = sample_table();
        let oddish = table.row_by_name("Oddish").expect("row");
        assert_eq!(oddish.stat("attack"), None);
    }

    #[test]
    fn test_primary_type_counts_sorted() {
        let table = sample_table();
        let counts = table.primary_type_counts();
        assert_eq!(counts[0], ("grass".to_string(), 2));
        assert_eq!(counts.len(), 3);
        assert_eq!(table.most_common_primary_type().as_deref(), Some("grass"));
    }

    #[test]
    fn test_extremes() {
        let table = sample_table();
        assert_eq!(table.heaviest().map(|r| r.name.as_str()), Some("Squirtle"));
        assert_eq!(table.lightest().map(|r| r.name.as_str()), Some("Oddish"));
        assert_eq!(table.tallest().map(|r| r.name.as_str()), Some("Bulbasaur"));
        // Ties on height resolve to the first minimum
        assert_eq!(table.shortest().map(|r| r.name.as_str()), Some("Squirtle"));
    }

    #[test]
    fn test_top_abilities() {
        let mut table = sample_table();
        table.rows[0].abilities = vec!["Overgrow".to_string()];
        table.rows[1].abilities = vec!["Blaze".to_string()];
        table.rows[3].abilities = vec!["Overgrow".to_string(), "Run-away".to_string()];

        let top = table.top_abilities(2);
        assert_eq!(top[0], ("Overgrow".to_string(), 2));
        assert_eq!(top.len(), 2);
    }

    #[test]
    fn test_stat_histogram() {
        let table = sample_table();
        // attack values 49, 52, 48 with width 10: two in [40,50), one in [50,60)
        let hist = table.stat_histogram("attack", 10);
        assert_eq!(hist, vec![(40, 2), (50, 1)]);

        assert!(table.stat_histogram("defense", 10).is_empty());
    }
}
