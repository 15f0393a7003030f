use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

/// Source measurements are decimetres and hectograms; display units are
/// metres and kilograms.
const UNIT_DIVISOR: f64 = 10.0;

// ============================================================================
// Wire shapes
// ============================================================================

/// A detail resource as the API returns it. Only `name` and `id` are
/// required to build a record; everything else degrades to absent.
#[derive(Debug, Clone, Deserialize)]
pub struct DetailResource {
    pub name: Option<String>,
    pub id: Option<i64>,
    pub height: Option<i64>,
    pub weight: Option<i64>,
    #[serde(default)]
    pub stats: Vec<StatSlot>,
    #[serde(default)]
    pub types: Vec<TypeSlot>,
    #[serde(default)]
    pub abilities: Vec<AbilitySlot>,
    #[serde(default)]
    pub sprites: SpriteSet,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StatSlot {
    pub base_stat: i64,
    pub stat: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TypeSlot {
    pub slot: Option<i64>,
    #[serde(rename = "type")]
    pub type_ref: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct AbilitySlot {
    pub ability: NamedResource,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NamedResource {
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SpriteSet {
    pub front_default: Option<String>,
}

// ============================================================================
// Normalized record
// ============================================================================

/// A single stat reading, keyed by the raw catalog identifier
/// (e.g. "special-attack", never a display label).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatEntry {
    pub name: String,
    pub value: i64,
}

/// Fully resolved, normalized per-entity record used for display and
/// analysis. One per successfully resolved catalog entry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetailRecord {
    /// Capitalized display form of the raw identifier.
    pub name: String,
    pub id: i64,
    pub sprite_url: Option<String>,
    /// Type identifiers in resource order; the first is the primary type.
    pub types: Vec<String>,
    pub height_m: f64,
    pub weight_kg: f64,
    pub abilities: Vec<String>,
    /// Stats in resource order; a stat the resource omits is absent here,
    /// never zero.
    pub stats: Vec<StatEntry>,
}

impl DetailRecord {
    pub fn stat(&self, name: &str) -> Option<i64> {
        self.stats.iter().find(|s| s.name == name).map(|s| s.value)
    }

    pub fn primary_type(&self) -> Option<&str> {
        self.types.first().map(String::as_str)
    }
}

impl DetailResource {
    /// Convert the wire shape into a normalized record.
    ///
    /// `name`, `id`, `height` and `weight` are required; a resource missing
    /// any of them is a resolution failure. Sprite and individual stats are
    /// optional and simply come through as absent.
    pub fn to_record(&self) -> Result<DetailRecord> {
        let name = self
            .name
            .as_deref()
            .ok_or_else(|| anyhow!("detail resource missing required field `name`"))?;
        let id = self
            .id
            .ok_or_else(|| anyhow!("detail resource missing required field `id`"))?;
        let height = self
            .height
            .ok_or_else(|| anyhow!("detail resource missing required field `height`"))?;
        let weight = self
            .weight
            .ok_or_else(|| anyhow!("detail resource missing required field `weight`"))?;

        Ok(DetailRecord {
            name: capitalize(name),
            id,
            sprite_url: self.sprites.front_default.clone(),
            types: self.types.iter().map(|t| t.type_ref.name.clone()).collect(),
            height_m: height as f64 / UNIT_DIVISOR,
            weight_kg: weight as f64 / UNIT_DIVISOR,
            abilities: self
                .abilities
                .iter()
                .map(|a| capitalize(&a.ability.name))
                .collect(),
            stats: self
                .stats
                .iter()
                .map(|s| StatEntry {
                    name: s.stat.name.clone(),
                    value: s.base_stat,
                })
                .collect(),
        })
    }
}

/// Uppercase the first character and lowercase the rest.
/// "pikachu" -> "Pikachu", "STATIC" -> "Static".
pub fn capitalize(raw: &str) -> String {
    let mut chars = raw.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}
