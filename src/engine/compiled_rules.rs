//! Rule compilation and indexing.
//!
//! This module holds the *static* side of the engine: the structures derived
//! from the rule list once per extraction, before any line is scanned.
//!
//! Scanning is split into two phases:
//!
//! 1. **Compile/index rules** (this module): order the rules by priority and
//!    derive per-rule metadata (`RuleMeta`).
//! 2. **Run** (see `scanner.rs`): for each cleaned line compute a
//!    `LineTrigger` (`trigger.rs`), select the rules whose metadata the line
//!    satisfies, and apply them in order.
//!
//! ## Invariants
//!
//! - `RuleId` is an index into `CompiledRules::rules` and `CompiledRules::metas`.
//!   Those vectors stay aligned.
//! - `rules` is sorted by descending priority; ties keep declaration order, so
//!   evaluation order is deterministic.

use super::trigger::LineTrigger;
use crate::{Rule, RuleKind};

/// Rule identifier (index into the rules vector).
pub(crate) type RuleId = usize;

bitflags::bitflags! {
    /// Coarse features of a single cleaned line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LineMask: u32 {
        const HAS_DIGITS    = 1 << 0;
        const HAS_MARKER    = 1 << 1;
        const HAS_ALPHA     = 1 << 2;
        const HAS_CHAT_NICK = 1 << 3;
    }
}

/// Gating metadata for one rule.
#[derive(Clone, Copy, Debug)]
pub struct RuleMeta {
    pub kind: RuleKind,
    pub optional_phrases: &'static [&'static str],
    pub buckets: LineMask,
}

impl RuleMeta {
    /// Whether a line with `trigger` can possibly match the rule.
    pub fn admits(&self, trigger: &LineTrigger) -> bool {
        if !trigger.mask.contains(self.buckets) {
            return false;
        }
        self.optional_phrases.is_empty() || self.optional_phrases.iter().any(|p| trigger.lower.contains(p))
    }
}

/// Priority-ordered rule set with metadata.
#[derive(Debug)]
pub struct CompiledRules<'a> {
    pub rules: Vec<&'a Rule>,
    pub metas: Vec<RuleMeta>,
}

impl<'a> CompiledRules<'a> {
    pub fn new(rules: &'a [Rule]) -> Self {
        let mut rule_refs: Vec<&Rule> = rules.iter().collect();
        rule_refs.sort_by_key(|r| std::cmp::Reverse(r.priority));

        let metas = rule_refs
            .iter()
            .map(|r| RuleMeta {
                kind: r.kind,
                optional_phrases: r.optional_phrases,
                buckets: LineMask::from_bits_truncate(r.buckets),
            })
            .collect();

        CompiledRules { rules: rule_refs, metas }
    }

    /// Ids of the rules admitted by `trigger`, in evaluation order.
    pub fn active<'s>(&'s self, trigger: &'s LineTrigger) -> impl Iterator<Item = RuleId> + 's {
        self.metas.iter().enumerate().filter(move |(_, meta)| meta.admits(trigger)).map(|(id, _)| id)
    }

    pub fn names(&self) -> Vec<String> {
        self.rules.iter().map(|r| r.name.to_string()).collect()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }
}
