use crate::Policy;

/// One `policy <resource> <effect> { ... }` block.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedPolicy {
    pub resource: String,
    pub policy: Policy,
}
