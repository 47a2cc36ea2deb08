//! Operator access policy for the expand command.
//!
//! The command is registered only on the configured home guild, and within
//! it only the configured operator set may invoke it: explicit user IDs
//! and/or members holding one of the operator roles.

use serde::{Deserialize, Serialize};

/// Who may invoke the expand command.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OperatorConfig {
    /// User IDs always allowed.
    #[serde(default)]
    pub operator_users: Vec<u64>,
    /// Role IDs whose holders are allowed.
    #[serde(default)]
    pub operator_roles: Vec<u64>,
}

impl OperatorConfig {
    /// Check an invoker against the operator set.
    pub fn is_operator(&self, user_id: u64, role_ids: &[u64]) -> bool {
        if self.operator_users.contains(&user_id) {
            return true;
        }
        role_ids.iter().any(|r| self.operator_roles.contains(r))
    }

    /// Warnings about suspicious configuration, logged at startup.
    pub fn warnings(&self) -> Vec<String> {
        let mut warnings = Vec::new();
        if self.operator_users.is_empty() && self.operator_roles.is_empty() {
            warnings.push(
                "no operator users or roles configured; nobody can invoke the command".to_string(),
            );
        }
        warnings
    }
}
