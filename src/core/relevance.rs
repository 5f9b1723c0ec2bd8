use regex::{Regex, RegexBuilder};
use thiserror::Error;

/// Errors raised while building a relevance filter
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("Invalid keyword pattern: {0}")]
    Pattern(#[from] regex::Error),
}

/// Keyword policy a relevance filter is configured with
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeywordPolicy {
    /// Keep titles containing at least one keyword as a whole word
    Include(Vec<String>),
    /// Drop titles containing any keyword anywhere, word boundary or not
    Exclude(Vec<String>),
}

#[derive(Debug, Clone)]
enum Rule {
    Include(Option<Regex>),
    Exclude(Vec<String>),
}

/// Decides whether a candidate title belongs in the results
///
/// Matching is case-insensitive. Nothing beyond lower-casing is done to
/// normalize titles, so "Museo" and "museo" match but "Músée" and "musee" do not.
#[derive(Debug, Clone)]
pub struct RelevanceFilter {
    rule: Rule,
}

impl RelevanceFilter {
    pub fn new(policy: KeywordPolicy) -> Result<Self, FilterError> {
        let rule = match policy {
            KeywordPolicy::Include(keywords) => Rule::Include(word_matcher(&keywords)?),
            KeywordPolicy::Exclude(keywords) => Rule::Exclude(normalize(&keywords)),
        };
        Ok(Self { rule })
    }

    /// A filter that lets every title through
    pub fn allow_all() -> Self {
        Self {
            rule: Rule::Exclude(Vec::new()),
        }
    }

    #[inline]
    pub fn is_relevant(&self, identity: &str) -> bool {
        match &self.rule {
            // An empty inclusion list has nothing to match
            Rule::Include(None) => false,
            Rule::Include(Some(re)) => re.is_match(identity),
            Rule::Exclude(keywords) => {
                let title = identity.to_lowercase();
                !keywords.iter().any(|k| title.contains(k.as_str()))
            }
        }
    }
}

impl Default for RelevanceFilter {
    fn default() -> Self {
        Self::allow_all()
    }
}

fn normalize(keywords: &[String]) -> Vec<String> {
    keywords
        .iter()
        .map(|k| k.trim().to_lowercase())
        .filter(|k| !k.is_empty())
        .collect()
}

/// Single alternation of all keywords between Unicode word boundaries
fn word_matcher(keywords: &[String]) -> Result<Option<Regex>, FilterError> {
    let keywords = normalize(keywords);
    if keywords.is_empty() {
        return Ok(None);
    }

    let alternation = keywords
        .iter()
        .map(|k| regex::escape(k))
        .collect::<Vec<_>>()
        .join("|");

    let re = RegexBuilder::new(&format!(r"\b(?:{})\b", alternation))
        .case_insensitive(true)
        .build()?;

    Ok(Some(re))
}
