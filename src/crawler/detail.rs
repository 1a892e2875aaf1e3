//! Detail-page parser
//!
//! Turns one recipe detail page into a normalized `Recipe` plus the category
//! names encountered on it. Every extraction rule is independently
//! best-effort; the only hard requirements are a non-empty name and at least
//! one complete ingredient line, without which the page is rejected.
//!
//! All selectors and the locale-specific rating/prep-time patterns are
//! compiled once in the constructor. The pattern lists are ordered and
//! evaluated first-match-wins, so a later pattern never overrides an earlier
//! one even when both would match.

use crate::config::{SelectorsConfig, SourceConfig};
use crate::recipe::{slug_from_url, Recipe};
use crate::ConfigError;
use chrono::Utc;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Rating patterns in priority order: the Swedish label form, the
/// score-with-review-count form, then the English label form
const RATING_PATTERNS: &[&str] = &[
    r"(?i)Betyg:\s*(\d+(?:\.\d+)?)/5",
    r"(?i)(\d+(?:\.\d+)?)/5\s*\(\d+\s*recensioner?\)",
    r"(?i)Rating:\s*(\d+(?:\.\d+)?)",
];

/// Preparation-time patterns in priority order
const TIME_PATTERNS: &[&str] = &[
    r"(?i)Förberedelsetid:\s*(\d+)\s*minuter?",
    r"(?i)Tillredningstid:\s*(\d+)\s*minuter?",
    r"(?i)Prep time:\s*(\d+)\s*min",
];

/// A parsed detail page: the record plus the taxonomy terms it carried
#[derive(Debug, Clone)]
pub struct ParsedRecipe {
    pub recipe: Recipe,
    /// Category names in encounter order; duplicates possible, deduped when
    /// merged into the category index
    pub categories: Vec<String>,
}

/// Extracts structured records from detail-page markup
pub struct RecipeParser {
    detail_prefix: String,
    title_suffix: String,
    heading_selector: Selector,
    title_selector: Selector,
    image_selector: Selector,
    lazy_image_attr: String,
    ingredient_item_selector: Selector,
    span_selector: Selector,
    category_selector: Selector,
    rating_patterns: Vec<Regex>,
    time_patterns: Vec<Regex>,
}

impl RecipeParser {
    /// Creates a parser with all selectors and patterns pre-compiled
    pub fn new(source: &SourceConfig, selectors: &SelectorsConfig) -> Result<Self, ConfigError> {
        let parse = |name: &str, value: &str| {
            Selector::parse(value)
                .map_err(|e| ConfigError::Validation(format!("Bad {} selector: {:?}", name, e)))
        };

        let compile = |patterns: &[&str]| -> Result<Vec<Regex>, ConfigError> {
            patterns
                .iter()
                .map(|p| {
                    Regex::new(p)
                        .map_err(|e| ConfigError::Validation(format!("Bad pattern: {}", e)))
                })
                .collect()
        };

        Ok(Self {
            detail_prefix: source.detail_path_prefix.clone(),
            title_suffix: source.title_suffix.clone(),
            heading_selector: parse("heading", "h1")?,
            title_selector: parse("title", "title")?,
            image_selector: parse("primary-image", &selectors.primary_image)?,
            lazy_image_attr: selectors.lazy_image_attr.clone(),
            ingredient_item_selector: parse("ingredients-list", &selectors.ingredients_list)?,
            span_selector: parse("span", "span")?,
            category_selector: parse("category-terms", &selectors.category_terms)?,
            rating_patterns: compile(RATING_PATTERNS)?,
            time_patterns: compile(TIME_PATTERNS)?,
        })
    }

    /// Parses one detail page
    ///
    /// Returns `None` when the page fails the validation gate (empty name or
    /// no complete ingredient line); the caller counts that as a parse
    /// failure, not a crash.
    pub fn parse(&self, html: &str, source_url: &Url) -> Option<ParsedRecipe> {
        let document = Html::parse_document(html);

        let name = self.extract_name(&document);
        let image = self.extract_image(&document);
        let (ingredients, ingredient_names) = self.extract_ingredients(&document);

        // Pattern extraction runs over the full visible page text
        let full_text: String = document.root_element().text().collect();
        let rating = self
            .first_match_f64(&self.rating_patterns, &full_text)
            .filter(|r| (0.0..=5.0).contains(r));
        let prep_time_minutes = self.first_match_u32(&self.time_patterns, &full_text);

        let categories = self.extract_categories(&document);

        let recipe = Recipe {
            name,
            slug: slug_from_url(source_url, &self.detail_prefix),
            source_url: source_url.to_string(),
            image,
            ingredients,
            ingredient_names,
            rating,
            prep_time_minutes,
            scraped_at: Utc::now(),
        };

        if !recipe.is_persistable() {
            return None;
        }

        Some(ParsedRecipe { recipe, categories })
    }

    /// First heading's text, falling back to the page title with the site
    /// suffix stripped
    fn extract_name(&self, document: &Html) -> String {
        let heading = document
            .select(&self.heading_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        if !heading.is_empty() {
            return heading;
        }

        document
            .select(&self.title_selector)
            .next()
            .map(element_text)
            .map(|t| t.replace(&self.title_suffix, "").trim().to_string())
            .unwrap_or_default()
    }

    /// First image carrying the primary-image marker; `src`, falling back to
    /// the lazy-load data attribute
    fn extract_image(&self, document: &Html) -> Option<String> {
        let element = document.select(&self.image_selector).next()?;
        element
            .value()
            .attr("src")
            .filter(|s| !s.is_empty())
            .or_else(|| element.value().attr(self.lazy_image_attr.as_str()))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
    }

    /// Walks the ingredient list items; each must carry at least two spans
    /// (amount line, normalized name), both non-empty after trimming.
    /// Partial items are silently skipped.
    fn extract_ingredients(&self, document: &Html) -> (Vec<String>, Vec<String>) {
        let mut lines = Vec::new();
        let mut names = Vec::new();

        for item in document.select(&self.ingredient_item_selector) {
            let spans: Vec<ElementRef> = item.select(&self.span_selector).collect();
            if spans.len() < 2 {
                continue;
            }

            let line = element_text(spans[0]);
            let name = element_text(spans[1]);
            if !line.is_empty() && !name.is_empty() {
                lines.push(line);
                names.push(name);
            }
        }

        (lines, names)
    }

    /// Category anchor texts in encounter order, duplicates kept
    fn extract_categories(&self, document: &Html) -> Vec<String> {
        document
            .select(&self.category_selector)
            .map(element_text)
            .filter(|t| !t.is_empty())
            .collect()
    }

    /// Runs an ordered pattern list over the text; the first match wins
    fn first_match_f64(&self, patterns: &[Regex], text: &str) -> Option<f64> {
        patterns
            .iter()
            .find_map(|p| p.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }

    fn first_match_u32(&self, patterns: &[Regex], text: &str) -> Option<u32> {
        patterns
            .iter()
            .find_map(|p| p.captures(text))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
    }
}

/// Collected, trimmed text content of an element
fn element_text(element: ElementRef) -> String {
    element.text().collect::<String>().trim().to_string()
}
