//! Request orchestration.
//!
//! ## Learning: The Facade Pattern
//!
//! `Substituter` is the one type the binary talks to. It owns the rules
//! and their store, tries rules in order, and falls back to teaching a new
//! rule when none applies.

use std::io::Write;

use crate::collector::{RuleCollector, RuleSuggestion};
use crate::{protocol, CoreResult, ExpansionResult, RequestContext, Rule, RuleList, RuleStore};

/// What handling a request did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// A rule matched and its edit was emitted
    Expanded(ExpansionResult),
    /// Nothing matched; a new rule was collected
    Learned(Rule),
}

/// The rule engine for a single request.
pub struct Substituter {
    rules: RuleList,
    store: RuleStore,
}

impl Substituter {
    /// Loads the rules from `store`.
    pub fn open(store: RuleStore) -> CoreResult<Self> {
        let rules = store.load()?;
        Ok(Self { rules, store })
    }

    /// Creates an engine over already-loaded rules.
    pub fn with_rules(rules: RuleList, store: RuleStore) -> Self {
        Self { rules, store }
    }

    /// The rules in priority order.
    pub fn rules(&self) -> &RuleList {
        &self.rules
    }

    /// Applies the first rule that matches at the caret.
    ///
    /// A rule with a broken regular expression is logged and skipped so it
    /// can't block the rules after it.
    pub fn expand(&self, ctx: &RequestContext) -> Option<ExpansionResult> {
        for (index, rule) in self.rules.iter().enumerate() {
            match rule.try_apply(ctx) {
                Ok(Some(result)) => {
                    tracing::info!(index, pattern = %rule.pattern, "substituted");
                    return Some(result);
                }
                Ok(None) => {}
                Err(err) => {
                    tracing::warn!(index, "Substitution failed: {}", err);
                }
            }
        }
        None
    }

    /// Asks `collector` for a new rule seeded from `ctx` and validates it.
    pub fn collect_rule(
        &self,
        ctx: &RequestContext,
        collector: &mut dyn RuleCollector,
    ) -> CoreResult<Rule> {
        let suggestion = RuleSuggestion::from_context(ctx);
        tracing::debug!(?suggestion, "no rule matched");
        let rule = collector.collect(&suggestion)?;
        rule.validate()?;
        Ok(rule)
    }

    /// Appends `rule` and rewrites the store.
    ///
    /// The rule is validated first; an invalid rule leaves both the
    /// in-memory list and the file untouched.
    pub fn add_rule(&mut self, rule: Rule) -> CoreResult<()> {
        rule.validate()?;
        self.rules.push(rule);
        self.store.save(&self.rules)
    }

    /// Handles one request end to end.
    ///
    /// Emits the edit to `out` if a rule applies; otherwise collects,
    /// stores and returns a new rule.
    pub fn handle(
        &mut self,
        ctx: &RequestContext,
        collector: &mut dyn RuleCollector,
        out: &mut impl Write,
    ) -> CoreResult<Outcome> {
        let outcome = self.preview(ctx, collector, out)?;
        if let Outcome::Learned(rule) = &outcome {
            self.add_rule(rule.clone())?;
        }
        Ok(outcome)
    }

    /// Like [`handle`](Self::handle), but a collected rule is only
    /// returned, never stored.
    pub fn preview(
        &self,
        ctx: &RequestContext,
        collector: &mut dyn RuleCollector,
        out: &mut impl Write,
    ) -> CoreResult<Outcome> {
        if let Some(result) = self.expand(ctx) {
            protocol::emit(out, &result)?;
            return Ok(Outcome::Expanded(result));
        }
        Ok(Outcome::Learned(self.collect_rule(ctx, collector)?))
    }

    /// Writes the rules to `out`, one per line in priority order.
    pub fn write_rules(&self, out: &mut impl Write) -> CoreResult<()> {
        for rule in &self.rules {
            writeln!(out, "{rule:?}")?;
        }
        Ok(())
    }
}
