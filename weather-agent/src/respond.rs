//! Response assembly: extracted city → weather record → assistant text + card.
//!
//! Selection:
//! - extracted city present in the catalog: its record, `"🌤️ " + description`;
//! - extracted city missing from the catalog: a fallback record plus an
//!   apology naming the requested city (unreachable with the default
//!   extractor, which only yields catalog cities);
//! - no city: the fallback record, `"🌤️ " + description`.
//!
//! The fallback is either uniformly random over the catalog or a fixed default
//! city. Randomness comes from the caller's `Rng`, so tests can seed it.

use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, WeatherRecord};
use crate::extract::CityExtractor;

/// Leading icon of every reply.
pub const REPLY_ICON: &str = "🌤️";

/// How to pick a record when no usable city was requested.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum FallbackPolicy {
    /// Uniformly random catalog record.
    #[default]
    Random,
    /// This city's record; degrades to `Random` when the city is not in the catalog.
    Fixed(String),
}

impl FallbackPolicy {
    /// `Fixed(city)` for a non-blank city, otherwise `Random`.
    pub fn from_default_city(city: Option<&str>) -> Self {
        match city.map(str::trim) {
            Some(c) if !c.is_empty() => FallbackPolicy::Fixed(c.to_string()),
            _ => FallbackPolicy::Random,
        }
    }
}

/// One assembled reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TurnOutput {
    pub message: String,
    pub card: WeatherRecord,
    /// City extracted from the user text, if any.
    pub requested_city: Option<String>,
}

impl TurnOutput {
    /// True when the card is the city the user asked for.
    pub fn is_requested_city(&self) -> bool {
        self.requested_city.as_deref() == Some(self.card.city.as_str())
    }
}

pub fn weather_message(record: &WeatherRecord) -> String {
    format!("{} {}", REPLY_ICON, record.description)
}

pub fn apology_message(requested: &str, record: &WeatherRecord) -> String {
    format!(
        "{} 抱歉，没有找到{}的天气数据，为您显示{}的天气：{}",
        REPLY_ICON, requested, record.city, record.description
    )
}

/// Turns the last user utterance into a [`TurnOutput`].
#[derive(Debug, Clone)]
pub struct Responder {
    extractor: CityExtractor,
    fallback: FallbackPolicy,
}

impl Default for Responder {
    fn default() -> Self {
        Self::new(CityExtractor::default())
    }
}

impl Responder {
    pub fn new(extractor: CityExtractor) -> Self {
        Self {
            extractor,
            fallback: FallbackPolicy::Random,
        }
    }

    pub fn with_fallback(mut self, fallback: FallbackPolicy) -> Self {
        self.fallback = fallback;
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        self.extractor.catalog()
    }

    pub fn extractor(&self) -> &CityExtractor {
        &self.extractor
    }

    pub fn fallback(&self) -> &FallbackPolicy {
        &self.fallback
    }

    /// Answers with this responder's own fallback policy.
    pub fn respond<R: Rng + ?Sized>(&self, last_user_text: Option<&str>, rng: &mut R) -> TurnOutput {
        self.respond_with_fallback(last_user_text, &self.fallback, rng)
    }

    /// Answers with an explicit fallback policy (e.g. a per-run `default_city`).
    ///
    /// Absent user text is treated as the empty string and never yields a city.
    pub fn respond_with_fallback<R: Rng + ?Sized>(
        &self,
        last_user_text: Option<&str>,
        fallback: &FallbackPolicy,
        rng: &mut R,
    ) -> TurnOutput {
        let requested_city = self.extractor.extract(last_user_text.unwrap_or_default());
        let catalog = self.catalog();

        let (card, message) = match requested_city.as_deref() {
            Some(city) => match catalog.get(city) {
                Some(record) => (record.clone(), weather_message(record)),
                None => {
                    let record = catalog.choose(rng);
                    tracing::warn!(requested = city, shown = %record.city, "requested city not in catalog");
                    (record.clone(), apology_message(city, record))
                }
            },
            None => {
                let record = self.fallback_record(fallback, rng);
                (record.clone(), weather_message(record))
            }
        };

        tracing::debug!(
            requested = ?requested_city,
            city = %card.city,
            "weather response assembled"
        );
        TurnOutput {
            message,
            card,
            requested_city,
        }
    }

    fn fallback_record<R: Rng + ?Sized>(&self, fallback: &FallbackPolicy, rng: &mut R) -> &WeatherRecord {
        let catalog = self.catalog();
        if let FallbackPolicy::Fixed(city) = fallback {
            if let Some(record) = catalog.get(city) {
                return record;
            }
            tracing::warn!(default_city = %city, "default city not in catalog; choosing at random");
        }
        catalog.choose(rng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::CityMatcher;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    /// **Scenario**: a recognized city yields its record and the plain weather message.
    #[test]
    fn recognized_city_uses_its_record() {
        let out = Responder::default().respond(Some("北京的天气怎么样？"), &mut rng());
        assert_eq!(out.card.city, "北京");
        assert_eq!(out.message, format!("🌤️ {}", out.card.description));
        assert!(out.is_requested_city());
    }

    /// **Scenario**: no user text picks some catalog record with a self-consistent message.
    #[test]
    fn missing_text_falls_back_randomly() {
        let responder = Responder::default();
        let out = responder.respond(None, &mut rng());
        assert!(responder.catalog().contains(&out.card.city));
        assert!(out.message.contains(&out.card.description));
        assert_eq!(out.requested_city, None);
    }

    /// **Scenario**: a fixed fallback city is used when nothing is extracted, but never overrides an extracted city.
    #[test]
    fn fixed_fallback_only_applies_without_city() {
        let responder = Responder::default().with_fallback(FallbackPolicy::Fixed("杭州".into()));
        assert_eq!(responder.respond(Some("天气怎么样"), &mut rng()).card.city, "杭州");
        assert_eq!(responder.respond(Some("深圳天气"), &mut rng()).card.city, "深圳");
    }

    /// **Scenario**: an unknown fixed fallback city degrades to a random catalog city.
    #[test]
    fn unknown_fixed_fallback_is_random() {
        let responder = Responder::default().with_fallback(FallbackPolicy::Fixed("不存在的城市".into()));
        let out = responder.respond(None, &mut rng());
        assert!(responder.catalog().contains(&out.card.city));
    }

    /// **Scenario**: same seed, same fallback city.
    #[test]
    fn seeded_fallback_is_reproducible() {
        let responder = Responder::default();
        let a = responder.respond(Some("你好"), &mut StdRng::seed_from_u64(99));
        let b = responder.respond(Some("你好"), &mut StdRng::seed_from_u64(99));
        assert_eq!(a.card, b.card);
    }

    #[derive(Debug)]
    struct AlwaysOffCatalog;

    impl CityMatcher for AlwaysOffCatalog {
        fn name(&self) -> &str {
            "off-catalog"
        }
        fn find(&self, _text: &str, _catalog: &Catalog) -> Option<String> {
            Some("东京".into())
        }
    }

    /// **Scenario**: the extractor discards off-catalog cities, so the apology branch is not reached through it.
    #[test]
    fn off_catalog_matcher_cannot_reach_apology() {
        let extractor =
            CityExtractor::empty(Catalog::shared()).with_matcher(Arc::new(AlwaysOffCatalog));
        let out = Responder::new(extractor).respond(Some("东京的天气"), &mut rng());
        assert_eq!(out.requested_city, None);
        assert!(!out.message.contains("抱歉"));
    }

    /// **Scenario**: the apology text names the requested city and the substitute record.
    #[test]
    fn apology_message_format() {
        let record = Catalog::builtin().get("上海").unwrap();
        assert_eq!(
            apology_message("东京", record),
            format!("🌤️ 抱歉，没有找到东京的天气数据，为您显示上海的天气：{}", record.description)
        );
    }

    /// **Scenario**: blank default cities mean random fallback.
    #[test]
    fn fallback_policy_from_default_city() {
        assert_eq!(FallbackPolicy::from_default_city(None), FallbackPolicy::Random);
        assert_eq!(FallbackPolicy::from_default_city(Some("  ")), FallbackPolicy::Random);
        assert_eq!(
            FallbackPolicy::from_default_city(Some(" 北京 ")),
            FallbackPolicy::Fixed("北京".into())
        );
    }
}
