//! The fixed weather catalog: five predefined records, built once and read-only.
//!
//! Records keep their insertion order (used for scans and tie-breaks); a derived
//! city → index map gives O(1) membership and lookup.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::Lazy;
use rand::Rng;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Weather data for one city. Also the props of the `"weather"` UI card.
///
/// Serialized with `wind`; deserialization also accepts the `windSpeed` spelling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherRecord {
    pub city: String,
    pub temperature: String,
    pub condition: String,
    pub humidity: String,
    #[serde(alias = "windSpeed")]
    pub wind: String,
    pub description: String,
}

impl WeatherRecord {
    pub fn new(
        city: impl Into<String>,
        temperature: impl Into<String>,
        condition: impl Into<String>,
        humidity: impl Into<String>,
        wind: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            city: city.into(),
            temperature: temperature.into(),
            condition: condition.into(),
            humidity: humidity.into(),
            wind: wind.into(),
            description: description.into(),
        }
    }

    /// `(field name, value)` pairs in declaration order.
    pub fn fields(&self) -> [(&'static str, &str); 6] {
        [
            ("city", self.city.as_str()),
            ("temperature", self.temperature.as_str()),
            ("condition", self.condition.as_str()),
            ("humidity", self.humidity.as_str()),
            ("wind", self.wind.as_str()),
            ("description", self.description.as_str()),
        ]
    }
}

/// Rejected catalog contents.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CatalogError {
    #[error("catalog has no records")]
    Empty,
    #[error("duplicate city in catalog: {0}")]
    DuplicateCity(String),
    #[error("record {city:?} has empty field `{field}`")]
    EmptyField { city: String, field: &'static str },
    #[error("description of {0:?} does not mention the city")]
    DescriptionMissingCity(String),
}

/// Ordered, immutable set of weather records.
///
/// Held as `first` plus `rest` so a catalog can never be empty.
#[derive(Debug, Clone)]
pub struct Catalog {
    first: WeatherRecord,
    rest: Vec<WeatherRecord>,
    index: HashMap<String, usize>,
}

impl Catalog {
    /// Validates and indexes `records`.
    ///
    /// Every city must be unique, every field non-empty, and each description
    /// must contain its own city name.
    pub fn new(records: Vec<WeatherRecord>) -> Result<Self, CatalogError> {
        let mut index = HashMap::with_capacity(records.len());
        for (i, record) in records.iter().enumerate() {
            if let Some((field, _)) = record.fields().into_iter().find(|(_, v)| v.is_empty()) {
                return Err(CatalogError::EmptyField {
                    city: record.city.clone(),
                    field,
                });
            }
            if !record.description.contains(&record.city) {
                return Err(CatalogError::DescriptionMissingCity(record.city.clone()));
            }
            if index.insert(record.city.clone(), i).is_some() {
                return Err(CatalogError::DuplicateCity(record.city.clone()));
            }
        }
        let mut records = records.into_iter();
        let first = records.next().ok_or(CatalogError::Empty)?;
        Ok(Self {
            first,
            rest: records.collect(),
            index,
        })
    }

    /// The process-wide built-in catalog (北京, 上海, 深圳, 广州, 杭州).
    pub fn builtin() -> &'static Catalog {
        BUILTIN.as_ref()
    }

    /// Shared handle to the built-in catalog.
    pub fn shared() -> Arc<Catalog> {
        Arc::clone(&BUILTIN)
    }

    fn at(&self, i: usize) -> Option<&WeatherRecord> {
        match i.checked_sub(1) {
            None => Some(&self.first),
            Some(j) => self.rest.get(j),
        }
    }

    pub fn get(&self, city: &str) -> Option<&WeatherRecord> {
        self.index.get(city).and_then(|&i| self.at(i))
    }

    pub fn contains(&self, city: &str) -> bool {
        self.index.contains_key(city)
    }

    /// City names in catalog order.
    pub fn cities(&self) -> impl Iterator<Item = &str> + '_ {
        self.iter().map(|r| r.city.as_str())
    }

    pub fn iter(&self) -> CatalogIter<'_> {
        std::iter::once(&self.first).chain(self.rest.iter())
    }

    pub fn len(&self) -> usize {
        self.rest.len() + 1
    }

    /// Always false; kept alongside `len`.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// The first record in catalog order.
    pub fn first(&self) -> &WeatherRecord {
        &self.first
    }

    /// Uniformly random record.
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> &WeatherRecord {
        let i = rng.gen_range(0..self.len());
        self.at(i).unwrap_or(&self.first)
    }
}

/// Records in catalog order.
pub type CatalogIter<'a> =
    std::iter::Chain<std::iter::Once<&'a WeatherRecord>, std::slice::Iter<'a, WeatherRecord>>;

impl<'a> IntoIterator for &'a Catalog {
    type Item = &'a WeatherRecord;
    type IntoIter = CatalogIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

fn builtin_records() -> Vec<WeatherRecord> {
    vec![
        WeatherRecord::new(
            "北京",
            "22°C",
            "晴天",
            "45%",
            "3km/h",
            "今天北京天气晴朗，温度适宜，适合外出活动。",
        ),
        WeatherRecord::new(
            "上海",
            "18°C",
            "多云",
            "68%",
            "5km/h",
            "上海今天多云转阴，温度稍凉，建议增添衣物。",
        ),
        WeatherRecord::new(
            "深圳",
            "26°C",
            "小雨",
            "78%",
            "7km/h",
            "深圳今天有小雨，湿度较高，出门记得带伞。",
        ),
        WeatherRecord::new(
            "广州",
            "24°C",
            "阴天",
            "72%",
            "4km/h",
            "广州今天阴天，温度舒适，适合室内活动。",
        ),
        WeatherRecord::new(
            "杭州",
            "20°C",
            "晴天",
            "55%",
            "6km/h",
            "杭州今天晴空万里，温度宜人，是游览的好天气。",
        ),
    ]
}

static BUILTIN: Lazy<Arc<Catalog>> = Lazy::new(|| match Catalog::new(builtin_records()) {
    Ok(catalog) => Arc::new(catalog),
    Err(e) => panic!("built-in weather catalog is invalid: {e}"),
});
