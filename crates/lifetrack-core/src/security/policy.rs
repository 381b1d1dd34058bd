//! Authorization policy for catalog items.
//!
//! Both checks are pure functions of an item snapshot and an actor
//! snapshot: no I/O, no shared state, same answer for the same inputs.

use std::fmt;

use super::context::ActingUser;
use super::error::{SecurityError, SecurityResult};
use crate::model::{CatalogKind, CatalogRecord, Food, LogEntry, Sharing, Visibility, Workout};

/// Ownership and visibility attributes the policy reads.
pub trait Shared {
    /// Username of the creator.
    fn creator(&self) -> &str;

    /// Public flag.
    fn is_public(&self) -> bool;

    /// Waiting for moderation.
    fn is_pending_approval(&self) -> bool;

    /// Public and cleared by moderation.
    fn is_approved_public(&self) -> bool {
        self.is_public() && !self.is_pending_approval()
    }

    /// Derived visibility state.
    fn visibility(&self) -> Visibility {
        if !self.is_public() {
            Visibility::Private
        } else if self.is_pending_approval() {
            Visibility::PendingApproval
        } else {
            Visibility::ApprovedPublic
        }
    }
}

impl Shared for Sharing {
    fn creator(&self) -> &str {
        &self.creator
    }

    fn is_public(&self) -> bool {
        self.public
    }

    fn is_pending_approval(&self) -> bool {
        self.pending_approval
    }
}

impl Shared for Food {
    fn creator(&self) -> &str {
        &self.sharing.creator
    }

    fn is_public(&self) -> bool {
        self.sharing.public
    }

    fn is_pending_approval(&self) -> bool {
        self.sharing.pending_approval
    }
}

impl Shared for LogEntry {
    fn creator(&self) -> &str {
        &self.user
    }

    fn is_public(&self) -> bool {
        self.public
    }

    fn is_pending_approval(&self) -> bool {
        self.pending_approval
    }
}

impl Shared for Workout {
    fn creator(&self) -> &str {
        &self.sharing.creator
    }

    fn is_public(&self) -> bool {
        self.sharing.public
    }

    fn is_pending_approval(&self) -> bool {
        self.sharing.pending_approval
    }
}

/// Why a check denied.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    /// Not the creator, and no override applies.
    NotOwner,
    /// Admin override blocked because the item is private or pending.
    NotEligible(Visibility),
}

/// Outcome of a policy check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    Allow,
    Deny(DenyReason),
}

impl Verdict {
    /// Check if the verdict allows the operation.
    pub fn is_allow(&self) -> bool {
        matches!(self, Verdict::Allow)
    }

    /// Check if the verdict denies the operation.
    pub fn is_deny(&self) -> bool {
        !self.is_allow()
    }

    /// Denial reason, if denied.
    pub fn reason(&self) -> Option<DenyReason> {
        match self {
            Verdict::Allow => None,
            Verdict::Deny(reason) => Some(*reason),
        }
    }
}

/// Operation a policy check guards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PolicyAction {
    /// Remove the item from its catalog.
    Delete,
    /// Reference the item from a template.
    UseInTemplate,
}

impl PolicyAction {
    /// Describe the action on a named item, e.g. `delete food "Oats"`.
    pub fn phrase(&self, kind: &CatalogKind, item: &str) -> String {
        match self {
            PolicyAction::Delete => format!("delete {kind} \"{item}\""),
            PolicyAction::UseInTemplate => format!("use {kind} \"{item}\" in templates"),
        }
    }
}

impl fmt::Display for PolicyAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PolicyAction::Delete => write!(f, "delete"),
            PolicyAction::UseInTemplate => write!(f, "use_in_template"),
        }
    }
}

/// May `actor` delete `item`?
///
/// Creators always may. Administrators may delete items they did not
/// create only when those are approved public. Anonymous actors never may.
pub fn can_delete<S: Shared + ?Sized>(item: &S, actor: Option<&ActingUser>) -> Verdict {
    let Some(actor) = actor else {
        return Verdict::Deny(DenyReason::NotOwner);
    };

    if actor.is(item.creator()) {
        Verdict::Allow
    } else if !actor.is_admin {
        Verdict::Deny(DenyReason::NotOwner)
    } else if item.is_approved_public() {
        Verdict::Allow
    } else {
        Verdict::Deny(DenyReason::NotEligible(item.visibility()))
    }
}

/// May `actor` put `item` into one of their templates?
///
/// Allowed for approved public items and for the actor's own items.
/// Admin status grants nothing here.
pub fn can_use_in_template<S: Shared + ?Sized>(item: &S, actor: &ActingUser) -> Verdict {
    if item.is_approved_public() || actor.is(item.creator()) {
        Verdict::Allow
    } else {
        Verdict::Deny(DenyReason::NotOwner)
    }
}

/// An item identified for error reporting.
#[derive(Debug, Clone, Copy)]
pub struct Subject<'a> {
    /// Catalog the item belongs to.
    pub kind: CatalogKind,
    /// Item name.
    pub name: &'a str,
    /// Ownership and visibility.
    pub sharing: &'a Sharing,
}

impl<'a> Subject<'a> {
    /// Subject for a catalog record.
    pub fn of<R: CatalogRecord>(record: &'a R) -> Self {
        Self {
            kind: R::KIND,
            name: record.name(),
            sharing: record.sharing(),
        }
    }

    fn denial(&self, action: PolicyAction, reason: DenyReason) -> SecurityError {
        match reason {
            DenyReason::NotOwner => SecurityError::NotOwner {
                action,
                kind: self.kind,
                item: self.name.to_string(),
            },
            DenyReason::NotEligible(visibility) => SecurityError::NotEligible {
                action,
                kind: self.kind,
                item: self.name.to_string(),
                visibility,
            },
        }
    }
}

impl Shared for Subject<'_> {
    fn creator(&self) -> &str {
        &self.sharing.creator
    }

    fn is_public(&self) -> bool {
        self.sharing.public
    }

    fn is_pending_approval(&self) -> bool {
        self.sharing.pending_approval
    }
}

/// Require delete permission or return the specific denial.
pub fn require_delete(subject: &Subject<'_>, actor: Option<&ActingUser>) -> SecurityResult<()> {
    match can_delete(subject, actor) {
        Verdict::Allow => Ok(()),
        Verdict::Deny(reason) => Err(subject.denial(PolicyAction::Delete, reason)),
    }
}

/// Require template-use permission or return a denial naming the item.
pub fn require_use_in_template(subject: &Subject<'_>, actor: &ActingUser) -> SecurityResult<()> {
    match can_use_in_template(subject, actor) {
        Verdict::Allow => Ok(()),
        Verdict::Deny(reason) => Err(subject.denial(PolicyAction::UseInTemplate, reason)),
    }
}

/// Check every item of a template write.
///
/// All-or-nothing: the first failing item rejects the whole write.
pub fn require_template_items<'a>(
    subjects: impl IntoIterator<Item = Subject<'a>>,
    actor: &ActingUser,
) -> SecurityResult<()> {
    subjects
        .into_iter()
        .try_for_each(|subject| require_use_in_template(&subject, actor))
}
