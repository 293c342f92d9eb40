//! Line scanning engine.
//!
//! This module is the entry point for turning cleaned log lines into
//! question records. It is split into focused submodules:
//!
//! ```text
//! rules (all) ── CompiledRules::new        (compiled_rules.rs)
//!                      │  priority order + gating metadata
//!                      v
//! line ── clean_line ── LineTrigger::scan  (trigger.rs)
//!                      │  mask + lowercased text
//!                      v
//!            Scanner::step                 (scanner.rs)
//!              - apply admitted rules in order
//!              - update / finish the current record
//!                      │
//!                      v
//!            fallback_scan if no header    (fallback.rs)
//!                      │
//!                      v
//!            ScanRun { records, metrics }  (metrics.rs)
//! ```
//!
//! ## Adding rules
//!
//! - New rules live under `src/rules/**` and are returned by
//!   `rules::question::rules::get` / `with_settings`.
//! - A rule that needs a new coarse line feature gets a new `LineMask` bit,
//!   detected in `LineTrigger::scan`.
//! - A rule that produces a new kind of fact needs a `RuleKind` and
//!   `LineMatch` variant and a transition in `Scanner::transition`.
//!
//! ## Debugging
//!
//! Run with `RUST_LOG=trivial_irc=trace` to log every rule match.

#[path = "engine/compiled_rules.rs"]
mod compiled_rules;
#[path = "engine/fallback.rs"]
mod fallback;
#[path = "engine/metrics.rs"]
mod metrics;
#[path = "engine/scanner.rs"]
mod scanner;
#[path = "engine/trigger.rs"]
mod trigger;

pub use compiled_rules::LineMask;
pub use fallback::FALLBACK_QUESTION_TEXT;
pub use metrics::ScanRun;
pub use scanner::{ScanSettings, Scanner};
