//! City extraction: free text → catalog city or no match.
//!
//! A closed-vocabulary classifier, not a geocoder: the result is always a
//! catalog city name or `None`. Extraction runs an ordered chain of
//! [`CityMatcher`]s and the first one that finds a city wins:
//!
//! 1. [`SubstringScan`]: every catalog city is searched for as a plain
//!    substring (no word boundaries); the leftmost occurrence wins, ties go to
//!    catalog order.
//! 2. One [`PatternMatcher`] per query template (`查询X的天气`, `X天气怎么样`,
//!    `今天X天气`, `X天气`). The captured span `X` is tested for *containing*
//!    a catalog city, in catalog order. A template that matches but whose span
//!    holds no city passes to the next template.

use std::fmt::Debug;
use std::sync::Arc;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::catalog::Catalog;

/// One link in the extraction chain.
pub trait CityMatcher: Send + Sync + Debug {
    /// Short name used in logs (e.g. `"substring"`, `"query"`).
    fn name(&self) -> &str;

    /// Returns a catalog city found in `text`, or `None` to defer to the next matcher.
    fn find(&self, text: &str, catalog: &Catalog) -> Option<String>;
}

/// Direct containment scan over all catalog cities.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubstringScan;

impl CityMatcher for SubstringScan {
    fn name(&self) -> &str {
        "substring"
    }

    fn find(&self, text: &str, catalog: &Catalog) -> Option<String> {
        catalog
            .cities()
            .filter_map(|city| text.find(city).map(|pos| (pos, city)))
            .min_by_key(|&(pos, _)| pos)
            .map(|(_, city)| city.to_string())
    }
}

/// A named query template with one capture group around the city span.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    name: String,
    regex: Regex,
}

impl PatternMatcher {
    /// Compiles `pattern`; capture group 1 must hold the candidate city span.
    pub fn new(name: impl Into<String>, pattern: &str) -> Result<Self, regex::Error> {
        Ok(Self {
            name: name.into(),
            regex: Regex::new(pattern)?,
        })
    }

    fn from_compiled(name: &str, regex: &Regex) -> Self {
        Self {
            name: name.to_string(),
            regex: regex.clone(),
        }
    }

    /// Trimmed capture of the first match, if the template matches at all.
    pub fn capture<'t>(&self, text: &'t str) -> Option<&'t str> {
        self.regex
            .captures(text)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim())
    }
}

impl CityMatcher for PatternMatcher {
    fn name(&self) -> &str {
        &self.name
    }

    fn find(&self, text: &str, catalog: &Catalog) -> Option<String> {
        let span = self.capture(text)?;
        catalog
            .cities()
            .find(|city| span.contains(city))
            .map(str::to_string)
    }
}

/// Built-in query templates, in evaluation order.
const QUERY_TEMPLATES: [(&str, &str); 4] = [
    // 查询北京的天气
    ("query", r"(?:查询|查看|了解|知道)(.+?)(?:的)?(?:天气|气候|温度)"),
    // 北京的天气如何
    ("how", r"(.+?)(?:的)?(?:天气|气候|温度)(?:如何|怎么样|怎样)"),
    // 今天北京天气
    ("when", r"(?:今天|明天|现在)(.+?)(?:的)?(?:天气|气候|温度)"),
    // 北京天气
    ("bare", r"(.+?)(?:天气|气候|温度)"),
];

static COMPILED_TEMPLATES: Lazy<Vec<(&'static str, Regex)>> = Lazy::new(|| {
    QUERY_TEMPLATES
        .iter()
        .map(|&(name, pattern)| match Regex::new(pattern) {
            Ok(re) => (name, re),
            Err(e) => panic!("built-in query template {name:?} is invalid: {e}"),
        })
        .collect()
});

/// Ordered chain of matchers over one catalog.
#[derive(Debug, Clone)]
pub struct CityExtractor {
    catalog: Arc<Catalog>,
    matchers: Vec<Arc<dyn CityMatcher>>,
}

impl CityExtractor {
    /// Substring scan followed by the built-in query templates.
    pub fn new(catalog: Arc<Catalog>) -> Self {
        let mut matchers: Vec<Arc<dyn CityMatcher>> = vec![Arc::new(SubstringScan)];
        matchers.extend(
            COMPILED_TEMPLATES
                .iter()
                .map(|(name, re)| Arc::new(PatternMatcher::from_compiled(name, re)) as Arc<dyn CityMatcher>),
        );
        Self { catalog, matchers }
    }

    /// An extractor with no matchers; add them with [`CityExtractor::with_matcher`].
    pub fn empty(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            matchers: Vec::new(),
        }
    }

    /// Appends a matcher to the end of the chain.
    pub fn with_matcher(mut self, matcher: Arc<dyn CityMatcher>) -> Self {
        self.matchers.push(matcher);
        self
    }

    pub fn catalog(&self) -> &Arc<Catalog> {
        &self.catalog
    }

    /// Matcher names in chain order.
    pub fn matcher_names(&self) -> Vec<&str> {
        self.matchers.iter().map(|m| m.name()).collect()
    }

    /// Runs the chain; the first matcher returning a catalog city wins.
    ///
    /// Results outside the catalog (possible only with custom matchers) are discarded.
    pub fn extract(&self, text: &str) -> Option<String> {
        for matcher in &self.matchers {
            match matcher.find(text, &self.catalog) {
                Some(city) if self.catalog.contains(&city) => {
                    tracing::debug!(matcher = matcher.name(), city = %city, "city extracted");
                    return Some(city);
                }
                Some(city) => {
                    tracing::warn!(matcher = matcher.name(), city = %city, "matcher returned non-catalog city; ignored");
                }
                None => {}
            }
        }
        tracing::debug!("no city extracted");
        None
    }
}

impl Default for CityExtractor {
    fn default() -> Self {
        Self::new(Catalog::shared())
    }
}

static DEFAULT_EXTRACTOR: Lazy<CityExtractor> = Lazy::new(CityExtractor::default);

/// Extracts a city from `text` with the default chain over the built-in catalog.
pub fn extract_city(text: &str) -> Option<String> {
    DEFAULT_EXTRACTOR.extract(text)
}
