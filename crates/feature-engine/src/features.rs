//! Feature Vector Assembly

use crate::schema::FeatureSchema;
use crate::statistics::ColumnStatistics;
use serde::ser::{Serialize, SerializeMap, Serializer};
use telemetry_parser::{extract_column, reconcile, ColumnMatch, RawTable};
use tracing::{debug, warn};

/// Aggregation state of one feature before it collapses to a number.
///
/// `Unmatched` and `EmptyAggregate` both become `0.0` in the final vector,
/// but stay distinguishable until then.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeatureSlot {
    /// No input column reconciles to this feature
    Unmatched,
    /// Column present, but no cell yielded a number
    EmptyAggregate,
    /// Mean over the cells that yielded a number
    Measured(f64),
}

impl FeatureSlot {
    /// Final scalar for the vector
    pub fn resolve(&self) -> f64 {
        match self {
            FeatureSlot::Measured(value) => *value,
            FeatureSlot::Unmatched | FeatureSlot::EmptyAggregate => 0.0,
        }
    }
}

/// One named entry of a feature vector
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureValue {
    pub name: String,
    pub value: f64,
}

/// One scalar per schema feature, in schema order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeatureVector {
    features: Vec<FeatureValue>,
}

impl FeatureVector {
    /// Create a vector from ordered `(name, value)` pairs
    pub fn from_entries<S: Into<String>>(entries: impl IntoIterator<Item = (S, f64)>) -> Self {
        Self {
            features: entries
                .into_iter()
                .map(|(name, value)| FeatureValue {
                    name: name.into(),
                    value,
                })
                .collect(),
        }
    }

    /// Iterate entries in order
    pub fn iter(&self) -> impl Iterator<Item = &FeatureValue> {
        self.features.iter()
    }

    /// Feature names in order
    pub fn names(&self) -> Vec<&str> {
        self.features.iter().map(|f| f.name.as_str()).collect()
    }

    /// Raw values in order
    pub fn values(&self) -> Vec<f64> {
        self.features.iter().map(|f| f.value).collect()
    }

    /// Value of a named feature
    pub fn get(&self, name: &str) -> Option<f64> {
        self.features.iter().find(|f| f.name == name).map(|f| f.value)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

impl Serialize for FeatureVector {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.features.len()))?;
        for feature in &self.features {
            map.serialize_entry(&feature.name, &feature.value)?;
        }
        map.end()
    }
}

/// Builds feature vectors from raw telemetry tables
#[derive(Debug, Clone, Default)]
pub struct FeatureVectorBuilder {
    schema: FeatureSchema,
}

impl FeatureVectorBuilder {
    /// Create a builder over the given schema
    pub fn new(schema: FeatureSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// Aggregate every schema feature without collapsing missing states
    pub fn build_slots(&self, table: &RawTable) -> Vec<(String, FeatureSlot)> {
        let reconciliation = reconcile(table.headers(), self.schema.names());
        let unmatched = reconciliation.unmatched();
        if !unmatched.is_empty() {
            warn!("No input column for: {}", unmatched.join(", "));
        }

        reconciliation
            .iter()
            .map(|(feature, column)| {
                let slot = match column {
                    ColumnMatch::Unmatched => FeatureSlot::Unmatched,
                    ColumnMatch::Matched(header) => match table.column(header) {
                        Some(cells) => {
                            let stats = ColumnStatistics::compute(&extract_column(cells));
                            if stats.missing_count > 0 {
                                debug!(
                                    "{}: {} of {} cells had no numeric value",
                                    feature,
                                    stats.missing_count,
                                    cells.len()
                                );
                            }
                            match stats.mean {
                                Some(mean) => FeatureSlot::Measured(mean),
                                None => FeatureSlot::EmptyAggregate,
                            }
                        }
                        None => FeatureSlot::Unmatched,
                    },
                };
                (feature.to_string(), slot)
            })
            .collect()
    }

    /// Build the feature vector; absent and empty features become `0.0`
    pub fn build(&self, table: &RawTable) -> FeatureVector {
        let slots = self.build_slots(table);

        let unmatched = slots
            .iter()
            .filter(|(_, slot)| *slot == FeatureSlot::Unmatched)
            .count();
        let empty = slots
            .iter()
            .filter(|(_, slot)| *slot == FeatureSlot::EmptyAggregate)
            .count();
        if unmatched > 0 || empty > 0 {
            warn!(
                "Zero-filled features: {} unmatched, {} without numeric samples ({} rows)",
                unmatched,
                empty,
                table.row_count()
            );
        }

        FeatureVector::from_entries(slots.into_iter().map(|(name, slot)| (name, slot.resolve())))
    }
}

/// Build a feature vector from a raw table over the given schema
pub fn build_feature_vector(table: &RawTable, schema: &FeatureSchema) -> FeatureVector {
    FeatureVectorBuilder::new(schema.clone()).build(table)
}
