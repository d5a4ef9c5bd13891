//! Typed access to Tiled custom properties.
//!
//! Tiled stores custom properties in two shapes: the legacy plain object
//! (`{"collision": "full"}`) and the Tiled 1.1+ array of typed entries
//! (`[{"name": "collision", "type": "string", "value": "full"}]`). Both are
//! normalized into the same [`Properties`] bag, backed by the `tiled` crate's
//! [`PropertyValue`] so values look the same as they do for TMX maps.

use serde::{Deserialize, Deserializer};
use serde_json::Value;
use tiled::PropertyValue;

/// Well-known layer, tile and map property keys.
///
/// Use these instead of string literals when reading properties that carry
/// game rules. Raw `&str` keys are still accepted by every accessor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyKey {
    /// Level partition of a layer (`level`).
    Level,
    /// Collision mode of a layer or full collision flag of a tile (`collision`).
    Collision,
    /// Arrow directions blocked by an `arrow` collision layer (`arrowImpassable`).
    ArrowImpassable,
    /// Constant or tile-driven region id (`regionId`).
    RegionId,
    /// Offset added to tile-driven region ids (`regionOffset`).
    RegionOffset,
    /// Target level of a level-change layer (`toLevel`).
    ToLevel,
    /// Floor height of a height-change layer (`floorHeight`).
    FloorHeight,
    /// Marks a layer whose tiles contribute tile flags (`tileFlags`).
    TileFlags,
    HideOnRegion,
    HideOnRegions,
    HideOnSwitch,
    ShowOnSwitch,
    HideOnLevel,
    ShowOnLevel,
    CollisionUpLeft,
    CollisionUpRight,
    CollisionDownLeft,
    CollisionDownRight,
    ArrowImpassableDown,
    ArrowImpassableLeft,
    ArrowImpassableRight,
    ArrowImpassableUp,
    /// Infinite map sizing mode (`autoSize`).
    AutoSize,
    /// Infinite map border padding (`border`).
    Border,
}

impl PropertyKey {
    /// The property name as authored in Tiled.
    pub const fn as_str(self) -> &'static str {
        match self {
            PropertyKey::Level => "level",
            PropertyKey::Collision => "collision",
            PropertyKey::ArrowImpassable => "arrowImpassable",
            PropertyKey::RegionId => "regionId",
            PropertyKey::RegionOffset => "regionOffset",
            PropertyKey::ToLevel => "toLevel",
            PropertyKey::FloorHeight => "floorHeight",
            PropertyKey::TileFlags => "tileFlags",
            PropertyKey::HideOnRegion => "hideOnRegion",
            PropertyKey::HideOnRegions => "hideOnRegions",
            PropertyKey::HideOnSwitch => "hideOnSwitch",
            PropertyKey::ShowOnSwitch => "showOnSwitch",
            PropertyKey::HideOnLevel => "hideOnLevel",
            PropertyKey::ShowOnLevel => "showOnLevel",
            PropertyKey::CollisionUpLeft => "collisionUpLeft",
            PropertyKey::CollisionUpRight => "collisionUpRight",
            PropertyKey::CollisionDownLeft => "collisionDownLeft",
            PropertyKey::CollisionDownRight => "collisionDownRight",
            PropertyKey::ArrowImpassableDown => "arrowImpassableDown",
            PropertyKey::ArrowImpassableLeft => "arrowImpassableLeft",
            PropertyKey::ArrowImpassableRight => "arrowImpassableRight",
            PropertyKey::ArrowImpassableUp => "arrowImpassableUp",
            PropertyKey::AutoSize => "autoSize",
            PropertyKey::Border => "border",
        }
    }
}

impl AsRef<str> for PropertyKey {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

/// Custom properties of a map, layer, tileset tile or object.
///
/// Absence of a key is distinct from a `false`/`0` value: use
/// [`Properties::contains`] to test for presence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Properties(tiled::Properties);

impl Properties {
    /// Create an empty property bag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Normalize a raw JSON `properties` value.
    ///
    /// Accepts `null`, the legacy plain object and the typed array form.
    /// Entries that cannot be interpreted are dropped.
    pub fn from_json(value: &Value) -> Self {
        let mut properties = tiled::Properties::new();
        match value {
            Value::Array(entries) => {
                for entry in entries {
                    let Some(name) = entry.get("name").and_then(Value::as_str) else {
                        continue;
                    };
                    let Some(raw) = entry.get("value") else {
                        continue;
                    };
                    let kind = entry.get("type").and_then(Value::as_str).unwrap_or("string");
                    let class = entry
                        .get("propertytype")
                        .and_then(Value::as_str)
                        .unwrap_or_default();
                    if let Some(value) = typed_value(kind, class, raw) {
                        properties.insert(name.to_string(), value);
                    }
                }
            }
            Value::Object(map) => {
                for (name, raw) in map {
                    if let Some(value) = inferred_value(raw) {
                        properties.insert(name.clone(), value);
                    }
                }
            }
            _ => {}
        }
        Self(properties)
    }

    /// Set a property, replacing any previous value.
    pub fn insert(&mut self, key: impl Into<String>, value: PropertyValue) {
        self.0.insert(key.into(), value);
    }

    /// Builder-style [`Properties::insert`].
    pub fn with(mut self, key: impl Into<String>, value: PropertyValue) -> Self {
        self.insert(key, value);
        self
    }

    pub fn get(&self, key: impl AsRef<str>) -> Option<&PropertyValue> {
        self.0.get(key.as_ref())
    }

    pub fn contains(&self, key: impl AsRef<str>) -> bool {
        self.0.contains_key(key.as_ref())
    }

    /// Read a property as an integer.
    ///
    /// Floats are truncated, numeric strings are parsed and booleans map to
    /// `1`/`0`. Values outside the `i32` range and anything else are `None`.
    pub fn get_int(&self, key: impl AsRef<str>) -> Option<i32> {
        match self.get(key)? {
            PropertyValue::IntValue(i) => Some(*i),
            PropertyValue::FloatValue(f) => float_to_int(f64::from(*f)),
            PropertyValue::BoolValue(b) => Some(i32::from(*b)),
            PropertyValue::StringValue(s) => parse_int(s),
            PropertyValue::ObjectValue(id) => i32::try_from(*id).ok(),
            _ => None,
        }
    }

    /// Read a property as a comma or whitespace separated list of integers.
    ///
    /// A single numeric value yields a one-element list.
    pub fn get_int_list(&self, key: impl AsRef<str>) -> Vec<i32> {
        let key = key.as_ref();
        match self.get(key) {
            Some(PropertyValue::StringValue(s)) => s
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .filter_map(parse_int)
                .collect(),
            Some(_) => self.get_int(key).into_iter().collect(),
            None => Vec::new(),
        }
    }

    /// Read a string or file property.
    pub fn get_str(&self, key: impl AsRef<str>) -> Option<&str> {
        match self.get(key)? {
            PropertyValue::StringValue(s) | PropertyValue::FileValue(s) => Some(s),
            _ => None,
        }
    }

    /// Read a property as a strict boolean (`true`/`false` or their string form).
    pub fn get_bool(&self, key: impl AsRef<str>) -> Option<bool> {
        match self.get(key)? {
            PropertyValue::BoolValue(b) => Some(*b),
            PropertyValue::StringValue(s) => match s.trim() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Loose truthiness: present and not `false`, `0`, `""`, `"0"` or `"false"`.
    pub fn is_truthy(&self, key: impl AsRef<str>) -> bool {
        match self.get(key) {
            None => false,
            Some(PropertyValue::BoolValue(b)) => *b,
            Some(PropertyValue::IntValue(i)) => *i != 0,
            Some(PropertyValue::FloatValue(f)) => *f != 0.0 && !f.is_nan(),
            Some(PropertyValue::StringValue(s)) => {
                let s = s.trim();
                !(s.is_empty() || s == "0" || s == "false")
            }
            Some(PropertyValue::ObjectValue(id)) => *id != 0,
            Some(_) => true,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &PropertyValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Borrow the underlying `tiled` property map.
    pub fn as_tiled(&self) -> &tiled::Properties {
        &self.0
    }
}

impl From<tiled::Properties> for Properties {
    fn from(properties: tiled::Properties) -> Self {
        Self(properties)
    }
}

impl<'de> Deserialize<'de> for Properties {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_json(&value))
    }
}

fn parse_int(s: &str) -> Option<i32> {
    let s = s.trim();
    s.parse::<i32>()
        .ok()
        .or_else(|| s.parse::<f64>().ok().and_then(float_to_int))
}

/// Truncate toward zero, rejecting values that do not fit an `i32`.
fn float_to_int(f: f64) -> Option<i32> {
    let f = f.trunc();
    (f.is_finite() && f >= f64::from(i32::MIN) && f <= f64::from(i32::MAX)).then_some(f as i32)
}

/// Convert an entry of the typed array form.
fn typed_value(kind: &str, class: &str, raw: &Value) -> Option<PropertyValue> {
    let value = match kind {
        "bool" => PropertyValue::BoolValue(match raw {
            Value::Bool(b) => *b,
            Value::String(s) => s == "true",
            _ => return None,
        }),
        "int" => PropertyValue::IntValue(match raw {
            Value::Number(n) => match n.as_i64() {
                Some(i) => i32::try_from(i).ok()?,
                None => float_to_int(n.as_f64()?)?,
            },
            Value::String(s) => parse_int(s)?,
            _ => return None,
        }),
        "float" => PropertyValue::FloatValue(match raw {
            Value::Number(n) => n.as_f64()? as f32,
            Value::String(s) => s.trim().parse().ok()?,
            _ => return None,
        }),
        "color" => match raw.as_str().and_then(parse_color) {
            Some(color) => PropertyValue::ColorValue(color),
            None => PropertyValue::StringValue(raw.as_str()?.to_string()),
        },
        "file" => PropertyValue::FileValue(raw.as_str()?.to_string()),
        "object" => PropertyValue::ObjectValue(u32::try_from(raw.as_u64()?).ok()?),
        "class" => PropertyValue::ClassValue {
            property_type: class.to_string(),
            properties: Properties::from_json(raw).0,
        },
        _ => return inferred_value(raw),
    };
    Some(value)
}

/// Infer a value from the legacy plain-object form.
fn inferred_value(raw: &Value) -> Option<PropertyValue> {
    match raw {
        Value::Bool(b) => Some(PropertyValue::BoolValue(*b)),
        Value::Number(n) => match n.as_i64().and_then(|i| i32::try_from(i).ok()) {
            Some(i) => Some(PropertyValue::IntValue(i)),
            None => n.as_f64().map(|f| PropertyValue::FloatValue(f as f32)),
        },
        Value::String(s) => Some(PropertyValue::StringValue(s.clone())),
        Value::Object(_) => Some(PropertyValue::ClassValue {
            property_type: String::new(),
            properties: Properties::from_json(raw).0,
        }),
        Value::Null | Value::Array(_) => None,
    }
}

/// Parse `#RRGGBB` or `#AARRGGBB`.
fn parse_color(s: &str) -> Option<tiled::Color> {
    let hex = s.trim().strip_prefix('#')?;
    let byte = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
    match hex.len() {
        6 => Some(tiled::Color {
            alpha: 0xFF,
            red: byte(0)?,
            green: byte(2)?,
            blue: byte(4)?,
        }),
        8 => Some(tiled::Color {
            alpha: byte(0)?,
            red: byte(2)?,
            green: byte(4)?,
            blue: byte(6)?,
        }),
        _ => None,
    }
}
