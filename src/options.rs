//! Configuration options for candidate extraction and matching.
//!
//! An `Options` value is immutable once built and is passed by reference into
//! every stage, so several configurations can coexist in one process.

use regex::Regex;

use crate::patterns;

/// How a matched `(element, attribute)` rule turns into candidates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RuleKind {
    /// The attribute value itself is the URL literal.
    Literal,
    /// The attribute holds inline script; navigation sinks inside it carry the URL.
    InlineScript,
    /// `<select>` whose handler reads `this.value`: every `<option value>` is a
    /// separate candidate labelled by the option text.
    SelectOptions,
}

/// One entry of the non-anchor rule table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementRule {
    /// Lowercase tag name, or `None` to match any element.
    pub tag: Option<String>,
    /// Lowercase attribute name.
    pub attribute: String,
    /// How the attribute value is interpreted.
    pub kind: RuleKind,
}

impl ElementRule {
    #[must_use]
    pub fn new(tag: Option<&str>, attribute: &str, kind: RuleKind) -> Self {
        Self {
            tag: tag.map(str::to_string),
            attribute: attribute.to_string(),
            kind,
        }
    }

    /// Whether this rule applies to an element with the given tag name.
    #[must_use]
    pub fn applies_to(&self, tag: &str) -> bool {
        self.tag
            .as_deref()
            .is_none_or(|t| t.eq_ignore_ascii_case(tag))
    }
}

/// Weights of the individual similarity factors. The defaults add up to 100.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringWeights {
    /// Multiplier for the Jaccard similarity of normalized segment sets.
    pub jaccard: f64,
    /// Awarded when the last normalized segments are equal.
    pub last_segment: f64,
    /// Awarded when one normalized segment sequence is a suffix of the other.
    pub suffix: f64,
    /// Multiplier for the character-level sequence ratio of the raw paths.
    pub sequence: f64,
    /// Bonus when a path label's last segment overlaps the query's last segment.
    pub label_bonus: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            jaccard: 40.0,
            last_segment: 20.0,
            suffix: 15.0,
            sequence: 25.0,
            label_bonus: 5.0,
        }
    }
}

/// Configuration options for pool building and matching.
///
/// All fields are public. Use `Default::default()` for standard settings.
///
/// # Example
///
/// ```rust
/// use menu_label::Options;
///
/// let options = Options {
///     threshold: 70.0,
///     progress_every: 50,
///     ..Options::default()
/// };
/// assert!(options.menu_hints.iter().any(|h| h == "gnb"));
/// ```
#[derive(Debug, Clone)]
pub struct Options {
    /// class/id keywords marking navigation containers.
    ///
    /// Matched as lowercase substrings of the combined `class` and `id` values.
    pub menu_hints: Vec<String>,

    /// class/id keywords marking breadcrumb containers.
    pub breadcrumb_hints: Vec<String>,

    /// Deepest navigation nesting level turned into a tree node.
    ///
    /// Default: `8`
    pub max_path_depth: usize,

    /// Maximum characters kept from labels of non-anchor elements.
    ///
    /// Default: `80`
    pub label_max_chars: usize,

    /// `(element, attribute)` rules for non-anchor candidates.
    pub element_rules: Vec<ElementRule>,

    /// The shared URL-literal pattern used by every rule and script scan.
    pub url_literal: Regex,

    /// Extensions stripped from the final path segment before comparison.
    pub strip_extensions: Vec<String>,

    /// Weights of the similarity factors.
    pub weights: ScoringWeights,

    /// Minimum score for a label to be confirmed.
    ///
    /// Default: `58.0`
    pub threshold: f64,

    /// Sessions between progress notifications.
    ///
    /// Default: `200`
    pub progress_every: usize,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            menu_hints: to_strings(&[
                "menu", "nav", "gnb", "lnb", "snb", "submenu", "depth", "dropdown", "tab",
                "category", "sidebar", "global", "primary", "secondary",
            ]),
            breadcrumb_hints: to_strings(&["breadcrumb", "bread", "path", "location"]),
            max_path_depth: 8,
            label_max_chars: 80,
            element_rules: default_element_rules(),
            url_literal: patterns::URL_LITERAL.clone(),
            strip_extensions: to_strings(&[
                "jsp", "do", "php", "aspx", "html", "htm", "cgi", "action",
            ]),
            weights: ScoringWeights::default(),
            threshold: 58.0,
            progress_every: 200,
        }
    }
}

impl Options {
    /// Whether a combined class/id string carries any navigation or breadcrumb hint.
    #[must_use]
    pub fn has_nav_hint(&self, class_and_id: &str) -> bool {
        let hay = class_and_id.to_lowercase();
        self.menu_hints
            .iter()
            .chain(&self.breadcrumb_hints)
            .any(|hint| !hint.is_empty() && hay.contains(hint.as_str()))
    }
}

/// The built-in rule table for non-anchor interactive elements.
#[must_use]
pub fn default_element_rules() -> Vec<ElementRule> {
    vec![
        ElementRule::new(None, "data-url", RuleKind::Literal),
        ElementRule::new(None, "data-route", RuleKind::Literal),
        ElementRule::new(None, "data-href", RuleKind::Literal),
        ElementRule::new(Some("form"), "action", RuleKind::Literal),
        ElementRule::new(Some("button"), "formaction", RuleKind::Literal),
        ElementRule::new(Some("select"), "onchange", RuleKind::SelectOptions),
        ElementRule::new(None, "onclick", RuleKind::InlineScript),
    ]
}

fn to_strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| (*s).to_string()).collect()
}
