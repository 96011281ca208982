//! Locator strategies: how to find an element, expressed as data.
//!
//! A strategy is either a selector query answered by the browser (id, name,
//! css, xpath, tag) or a scan probe answered against a structural page
//! snapshot (attribute scan, form scan). Callers hand the resolver an
//! ordered list of these; the order is the priority.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum LocatorStrategy {
    /// Element with the given `id` attribute.
    Id(String),
    /// Element with the given `name` attribute.
    Name(String),
    /// CSS selector.
    Css(String),
    /// XPath expression.
    XPath(String),
    /// First element with the given tag name.
    TagName(String),
    /// Scan the snapshot for an element by attribute evidence.
    AttributeScan(AttributeProbe),
    /// Scan the page's forms for a control playing a role.
    FormScan(FormProbe),
}

impl LocatorStrategy {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Id(_) => "id",
            Self::Name(_) => "name",
            Self::Css(_) => "css",
            Self::XPath(_) => "xpath",
            Self::TagName(_) => "tag",
            Self::AttributeScan(_) => "attribute-scan",
            Self::FormScan(_) => "form-scan",
        }
    }

    /// How this strategy is answered: browser query or snapshot scan.
    pub fn query_plan(&self) -> QueryPlan<'_> {
        match self {
            Self::Id(id) => QueryPlan::Selector(SelectorQuery::Id(id.clone())),
            Self::Name(name) => {
                QueryPlan::Selector(SelectorQuery::Css(format!("[name=\"{}\"]", name)))
            }
            Self::Css(css) => QueryPlan::Selector(SelectorQuery::Css(css.clone())),
            Self::XPath(xpath) => QueryPlan::Selector(SelectorQuery::XPath(xpath.clone())),
            Self::TagName(tag) => QueryPlan::Selector(SelectorQuery::Css(tag.clone())),
            Self::AttributeScan(probe) => QueryPlan::AttributeScan(probe),
            Self::FormScan(probe) => QueryPlan::FormScan(probe),
        }
    }
}

impl fmt::Display for LocatorStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) | Self::Name(v) | Self::Css(v) | Self::XPath(v) | Self::TagName(v) => {
                write!(f, "{}={}", self.kind(), v)
            }
            Self::AttributeScan(probe) => write!(f, "{}[{}]", self.kind(), probe),
            Self::FormScan(probe) => write!(f, "{}[{}]", self.kind(), probe),
        }
    }
}

/// A selector query the browser-control layer can answer directly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectorQuery {
    Id(String),
    Css(String),
    XPath(String),
}

impl fmt::Display for SelectorQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(v) => write!(f, "id:{}", v),
            Self::Css(v) => write!(f, "css:{}", v),
            Self::XPath(v) => write!(f, "xpath:{}", v),
        }
    }
}

/// One resolved query plan for a strategy.
pub enum QueryPlan<'a> {
    Selector(SelectorQuery),
    AttributeScan(&'a AttributeProbe),
    FormScan(&'a FormProbe),
}

/// Attribute evidence scan: first element whose attribute matches.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeProbe {
    /// Restrict to this tag name, if set.
    pub tag: Option<String>,
    pub attribute: String,
    /// Substring the attribute value must contain (case-insensitive).
    /// When absent, the attribute merely has to exist.
    pub contains: Option<String>,
}

impl AttributeProbe {
    pub fn new(attribute: impl Into<String>) -> Self {
        Self {
            tag: None,
            attribute: attribute.into(),
            contains: None,
        }
    }

    pub fn on_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn containing(mut self, needle: impl Into<String>) -> Self {
        self.contains = Some(needle.into());
        self
    }

    /// Shorthand for the common `<input type=...>` probe.
    pub fn input_type(value: impl Into<String>) -> Self {
        Self::new("type").on_tag("input").containing(value)
    }
}

impl fmt::Display for AttributeProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = &self.tag {
            write!(f, "{} ", tag)?;
        }
        match &self.contains {
            Some(needle) => write!(f, "{}~={}", self.attribute, needle),
            None => write!(f, "[{}]", self.attribute),
        }
    }
}

/// Form-structure scan: find the control playing a role inside a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProbe {
    pub role: FieldRole,
}

impl FormProbe {
    pub fn new(role: FieldRole) -> Self {
        Self { role }
    }
}

impl fmt::Display for FormProbe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.role)
    }
}

/// The role a form control plays, judged from attribute evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldRole {
    Email,
    Password,
    Search,
    Text,
    Submit,
}

impl FieldRole {
    /// Keyword used for name/placeholder/label evidence.
    pub fn keyword(&self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Password => "password",
            Self::Search => "search",
            Self::Text => "text",
            Self::Submit => "submit",
        }
    }
}

impl fmt::Display for FieldRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_names_the_method_and_value() {
        assert_eq!(
            LocatorStrategy::Id("search_field".into()).to_string(),
            "id=search_field"
        );
        assert_eq!(
            LocatorStrategy::Css("button[type='submit']".into()).to_string(),
            "css=button[type='submit']"
        );
        assert_eq!(
            LocatorStrategy::AttributeScan(AttributeProbe::input_type("search")).to_string(),
            "attribute-scan[input type~=search]"
        );
        assert_eq!(
            LocatorStrategy::FormScan(FormProbe::new(FieldRole::Password)).to_string(),
            "form-scan[password]"
        );
    }

    #[test]
    fn name_strategy_becomes_a_css_query() {
        let strategy = LocatorStrategy::Name("keyword".into());
        let plan = strategy.query_plan();
        match plan {
            QueryPlan::Selector(SelectorQuery::Css(css)) => {
                assert_eq!(css, "[name=\"keyword\"]")
            }
            _ => panic!("expected a css query"),
        }
    }

    #[test]
    fn scans_have_no_selector() {
        let strategy = LocatorStrategy::FormScan(FormProbe::new(FieldRole::Submit));
        assert!(matches!(strategy.query_plan(), QueryPlan::FormScan(_)));
    }
}
