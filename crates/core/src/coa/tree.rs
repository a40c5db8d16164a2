//! Id-indexed account hierarchy.
//!
//! Accounts are kept in an arena keyed by id; parent/child links are ids
//! resolved by lookup rather than owned references.

use std::collections::{HashMap, HashSet};

use serde::Serialize;
use uuid::Uuid;

use super::types::{Account, AccountSubType, AccountType};
use crate::ledger::LedgerError;

/// A nested view of one account and its descendants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AccountNode {
    /// Account ID.
    pub id: Uuid,
    /// Account code.
    pub code: String,
    /// Display name.
    pub name: String,
    /// Account type.
    pub account_type: AccountType,
    /// Sub-type.
    pub sub_type: Option<AccountSubType>,
    /// Seeded and protected.
    pub is_system: bool,
    /// Active flag.
    pub is_active: bool,
    /// Stored parent id (kept even when the node is shown as a root).
    pub parent_id: Option<Uuid>,
    /// Children ordered by code.
    pub children: Vec<AccountNode>,
}

/// Arena of accounts with resolved hierarchy.
#[derive(Debug, Clone, Default)]
pub struct AccountTree {
    nodes: HashMap<Uuid, Account>,
    children: HashMap<Uuid, Vec<Uuid>>,
    roots: Vec<Uuid>,
}

impl AccountTree {
    /// Builds the tree from a tenant's accounts.
    ///
    /// Unless `include_inactive` is set, inactive accounts are dropped and an
    /// account whose parent is inactive becomes a root. An account whose
    /// parent is missing is always a root. Roots and children are ordered by
    /// code.
    #[must_use]
    pub fn build(accounts: Vec<Account>, include_inactive: bool) -> Self {
        let nodes: HashMap<Uuid, Account> = accounts
            .into_iter()
            .filter(|a| include_inactive || a.is_active)
            .map(|a| (a.id, a))
            .collect();

        let mut children: HashMap<Uuid, Vec<Uuid>> = HashMap::new();
        let mut roots = Vec::new();
        for account in nodes.values() {
            match account.parent_id {
                Some(parent_id) if parent_id != account.id && nodes.contains_key(&parent_id) => {
                    children.entry(parent_id).or_default().push(account.id);
                }
                _ => roots.push(account.id),
            }
        }

        let mut tree = Self {
            nodes,
            children,
            roots,
        };
        tree.sort_by_code();
        tree.promote_unreachable();
        tree
    }

    /// Number of accounts in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns true if the tree has no accounts.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Root ids ordered by code.
    #[must_use]
    pub fn roots(&self) -> &[Uuid] {
        &self.roots
    }

    /// Child ids of `id` ordered by code.
    #[must_use]
    pub fn children(&self, id: Uuid) -> &[Uuid] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Looks up an account.
    #[must_use]
    pub fn get(&self, id: Uuid) -> Option<&Account> {
        self.nodes.get(&id)
    }

    /// Converts the arena into nested nodes.
    #[must_use]
    pub fn into_nodes(self) -> Vec<AccountNode> {
        self.roots.iter().map(|id| self.node(*id)).collect()
    }

    fn node(&self, id: Uuid) -> AccountNode {
        let account = &self.nodes[&id];
        AccountNode {
            id: account.id,
            code: account.code.clone(),
            name: account.name.clone(),
            account_type: account.account_type,
            sub_type: account.sub_type,
            is_system: account.is_system,
            is_active: account.is_active,
            parent_id: account.parent_id,
            children: self.children(id).iter().map(|c| self.node(*c)).collect(),
        }
    }

    fn sort_by_code(&mut self) {
        let nodes = &self.nodes;
        let by_code = |a: &Uuid, b: &Uuid| nodes[a].code.cmp(&nodes[b].code);
        self.roots.sort_by(by_code);
        for list in self.children.values_mut() {
            list.sort_by(by_code);
        }
    }

    /// Stored rows can form a cycle that never reaches a root. Each such
    /// cycle is broken at its lowest code so every account stays visible.
    fn promote_unreachable(&mut self) {
        let mut seen: HashSet<Uuid> = HashSet::with_capacity(self.nodes.len());
        let mut stack: Vec<Uuid> = self.roots.clone();
        loop {
            while let Some(id) = stack.pop() {
                if seen.insert(id) {
                    stack.extend(self.children(id).iter().copied());
                }
            }
            if seen.len() == self.nodes.len() {
                break;
            }
            let Some(orphan) = self
                .nodes
                .values()
                .filter(|a| !seen.contains(&a.id))
                .min_by(|a, b| a.code.cmp(&b.code))
                .map(|a| a.id)
            else {
                break;
            };
            for list in self.children.values_mut() {
                list.retain(|c| *c != orphan);
            }
            self.roots.push(orphan);
            stack.push(orphan);
        }
        self.sort_by_code();
    }
}

/// Rejects a parent assignment that would make `account_id` its own ancestor.
///
/// `parent_of` returns the stored parent of an account (over all accounts,
/// active or not). The walk stops at a root or at an already visited node.
pub fn ensure_acyclic<F>(account_id: Uuid, new_parent: Uuid, parent_of: F) -> Result<(), LedgerError>
where
    F: Fn(Uuid) -> Option<Uuid>,
{
    let mut visited = HashSet::new();
    let mut current = Some(new_parent);
    while let Some(id) = current {
        if id == account_id {
            return Err(LedgerError::ParentCycle {
                account_id,
                parent_id: new_parent,
            });
        }
        if !visited.insert(id) {
            break;
        }
        current = parent_of(id);
    }
    Ok(())
}
