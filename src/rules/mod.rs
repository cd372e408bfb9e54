//! Rule evaluators: aliasing, grouping, block and allow lists
//!
//! Rules are loaded once at startup into an immutable [`RuleSet`] and passed
//! explicitly to the parser. There is no global rule state.

pub mod alias;
pub mod filter;
pub mod groups;
pub mod pattern;

pub use alias::AliasTable;
pub use filter::{AllowList, BlockList};
pub use groups::GroupRules;
pub use pattern::MatchPattern;

/// Immutable bundle of the rules shared by every source
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    pub aliases: AliasTable,
    pub groups: GroupRules,
    pub blocklist: BlockList,
}

impl RuleSet {
    pub fn new(aliases: AliasTable, groups: GroupRules, blocklist: BlockList) -> Self {
        Self {
            aliases,
            groups,
            blocklist,
        }
    }
}
