//! Rule-driven classification
//!
//! Both resolvers share one rule shape: a label plus a list of alternative
//! [`Condition`]s. The category resolver walks its list in order and stops at the
//! first match; the tech-stack resolver keeps every match.

pub mod category;
pub mod techstack;

pub use category::{classify, Category, CATEGORY_RULES};
pub use techstack::{resolve_techstack, TechStack, TECHSTACK_RULES};

use crate::signals::Signal;
use std::collections::BTreeSet;

/// Builds a [`Condition::Has`] for one signal, e.g. `sig!(Domain::Database)`.
macro_rules! sig {
    ($family:ident :: $variant:ident) => {
        $crate::classify::Condition::Has($crate::signals::Signal::$family(
            $crate::signals::$family::$variant,
        ))
    };
}
pub(crate) use sig;

/// What a resolver sees for one entry: its signals and its raw keywords.
#[derive(Debug, Clone, Copy)]
pub struct Evidence<'a> {
    pub signals: &'a BTreeSet<Signal>,
    pub keywords: &'a BTreeSet<String>,
}

impl<'a> Evidence<'a> {
    pub fn new(signals: &'a BTreeSet<Signal>, keywords: &'a BTreeSet<String>) -> Self {
        Self { signals, keywords }
    }

    pub fn is_empty(&self) -> bool {
        self.signals.is_empty() && self.keywords.is_empty()
    }

    pub fn has_signal(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    pub fn has_keyword(&self, keyword: &str) -> bool {
        self.keywords.contains(keyword)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Signal token present.
    Has(Signal),
    /// Keyword token present.
    Word(&'static str),
    /// Every inner condition holds.
    All(&'static [Condition]),
}

impl Condition {
    pub fn holds(&self, evidence: &Evidence<'_>) -> bool {
        match self {
            Condition::Has(signal) => evidence.has_signal(*signal),
            Condition::Word(word) => evidence.has_keyword(word),
            Condition::All(conditions) => conditions.iter().all(|c| c.holds(evidence)),
        }
    }
}

/// A label and the alternatives that select it.
#[derive(Debug, Clone, Copy)]
pub struct Rule<L: 'static> {
    pub label: L,
    pub any_of: &'static [Condition],
}

impl<L> Rule<L> {
    pub fn matches(&self, evidence: &Evidence<'_>) -> bool {
        self.any_of.iter().any(|c| c.holds(evidence))
    }
}
