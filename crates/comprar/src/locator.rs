//! Structural selectors and the fallback-chain abstraction.
//!
//! A [`Selector`] is a single structural query. A [`SelectorChain`] is an
//! ordered list of candidate selectors registered under a semantic name;
//! consumers try candidates in listed order and the first one that resolves
//! to at least one element wins. The chain is a resilience mechanism
//! against markup drift on the uncontrolled target site, not a single
//! source of truth.

use serde::{Deserialize, Serialize};

/// A single structural query against the rendered DOM
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Selector {
    /// CSS selector (e.g. `#email`, `.shop-item`)
    Css(String),
    /// CSS selector filtered by contained text (e.g. a submit button
    /// carrying the label "Login")
    CssWithText {
        /// Base CSS selector
        css: String,
        /// Text content the element must contain
        text: String,
    },
}

impl Selector {
    /// Create a CSS selector
    #[must_use]
    pub fn css(selector: impl Into<String>) -> Self {
        Self::Css(selector.into())
    }

    /// Create a CSS selector with a text filter
    #[must_use]
    pub fn css_with_text(css: impl Into<String>, text: impl Into<String>) -> Self {
        Self::CssWithText {
            css: css.into(),
            text: text.into(),
        }
    }

    /// Convert to a JavaScript expression resolving the first match
    #[must_use]
    pub fn to_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelector({s:?})"),
            Self::CssWithText { css, text } => {
                format!(
                    "Array.from(document.querySelectorAll({css:?})).find(el => el.textContent.includes({text:?}))"
                )
            }
        }
    }

    /// Convert to a JavaScript expression counting matches
    #[must_use]
    pub fn to_count_query(&self) -> String {
        match self {
            Self::Css(s) => format!("document.querySelectorAll({s:?}).length"),
            Self::CssWithText { css, text } => {
                format!(
                    "Array.from(document.querySelectorAll({css:?})).filter(el => el.textContent.includes({text:?})).length"
                )
            }
        }
    }
}

impl std::fmt::Display for Selector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Css(s) => write!(f, "{s}"),
            Self::CssWithText { css, text } => write!(f, "{css}:contains({text:?})"),
        }
    }
}

/// An ordered fallback chain of selector candidates under a semantic name.
///
/// The chain itself never errors; failure to resolve any candidate is
/// surfaced later, as a timeout, by the action that needed the element.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectorChain {
    /// Semantic element name (e.g. "login email field")
    name: String,
    /// Candidates, tried in listed order
    candidates: Vec<Selector>,
}

impl SelectorChain {
    /// Create a chain from a semantic name and ordered candidates
    #[must_use]
    pub fn new(name: impl Into<String>, candidates: impl IntoIterator<Item = Selector>) -> Self {
        Self {
            name: name.into(),
            candidates: candidates.into_iter().collect(),
        }
    }

    /// Single-candidate chain
    #[must_use]
    pub fn single(name: impl Into<String>, selector: Selector) -> Self {
        Self {
            name: name.into(),
            candidates: vec![selector],
        }
    }

    /// Semantic name of the element
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Candidates in resolution order
    #[must_use]
    pub fn candidates(&self) -> &[Selector] {
        &self.candidates
    }

    /// Number of candidates
    #[must_use]
    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    /// Whether the chain has no candidates
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

impl std::fmt::Display for SelectorChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    mod selector_tests {
        use super::*;

        #[test]
        fn test_css_query() {
            let selector = Selector::css("#email");
            assert_eq!(selector.to_query(), "document.querySelector(\"#email\")");
            assert_eq!(
                selector.to_count_query(),
                "document.querySelectorAll(\"#email\").length"
            );
        }

        #[test]
        fn test_css_with_text_query() {
            let selector = Selector::css_with_text("button[type='submit']", "Login");
            let query = selector.to_query();
            assert!(query.contains("querySelectorAll"));
            assert!(query.contains("Login"));
            assert!(selector.to_count_query().contains(".length"));
        }

        #[test]
        fn test_display() {
            assert_eq!(Selector::css(".shop-item").to_string(), ".shop-item");
            assert_eq!(
                Selector::css_with_text("button", "Submit").to_string(),
                "button:contains(\"Submit\")"
            );
        }
    }

    mod chain_tests {
        use super::*;

        #[test]
        fn test_candidate_order_preserved() {
            let chain = SelectorChain::new(
                "login submit button",
                [
                    Selector::css("#submitLoginBtn"),
                    Selector::css_with_text("button[type='submit']", "Login"),
                    Selector::css_with_text("button[type='submit']", "Sign In"),
                ],
            );

            assert_eq!(chain.len(), 3);
            assert_eq!(chain.candidates()[0], Selector::css("#submitLoginBtn"));
            assert_eq!(chain.name(), "login submit button");
        }

        #[test]
        fn test_single() {
            let chain = SelectorChain::single("email", Selector::css("#email"));
            assert_eq!(chain.len(), 1);
            assert!(!chain.is_empty());
        }
    }

}
