//! Editable policy model.
//!
//! A [`PolicyExpression`] is an ordered list of [`AttributeGroup`]s joined
//! by a top-level [`Operator`]. Each group holds [`Slot`]s joined by the
//! group's own operator. Slots make the editing state explicit: a slot is
//! empty, holds a decoded [`Predicate`], or keeps literal text that could
//! not be decoded so nothing the user typed is lost.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::normalizer::parse_comparison;
use crate::predicate::Predicate;

// ============================================================================
// Operator
// ============================================================================

/// Boolean operator joining predicates within a group, or groups at the top level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Operator {
    /// Every operand must hold.
    #[default]
    #[serde(rename = "AND", alias = "and")]
    And,
    /// At least one operand must hold.
    #[serde(rename = "OR", alias = "or")]
    Or,
}

impl Operator {
    /// Keyword used in the editor form (`AND`, `OR`).
    pub fn keyword(self) -> &'static str {
        match self {
            Self::And => "AND",
            Self::Or => "OR",
        }
    }

    /// The other operator.
    #[must_use]
    pub fn toggle(self) -> Self {
        match self {
            Self::And => Self::Or,
            Self::Or => Self::And,
        }
    }

    /// Parses `and` / `or` in any ASCII case.
    pub fn from_keyword(word: &str) -> Option<Self> {
        if word.eq_ignore_ascii_case("and") {
            Some(Self::And)
        } else if word.eq_ignore_ascii_case("or") {
            Some(Self::Or)
        } else {
            None
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

// ============================================================================
// Slot
// ============================================================================

/// One predicate position inside a group.
///
/// Serializes as the text shown in the editor: `""` for an empty slot, the
/// display form for a predicate, and the raw text for a literal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Slot {
    /// Not filled in yet.
    #[default]
    Empty,
    /// A decoded predicate.
    Filled(Predicate),
    /// Text that did not decode. Kept verbatim for manual correction.
    Literal(String),
}

impl Slot {
    /// Decodes editor text into a slot.
    ///
    /// Blank text gives [`Slot::Empty`]. Tokens in either separator and
    /// comparison syntax (`age >= 30`) give [`Slot::Filled`]. Anything else
    /// is kept, trimmed, as [`Slot::Literal`].
    pub fn from_text(text: &str) -> Self {
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Self::Empty;
        }
        Predicate::from_token(trimmed)
            .or_else(|_| parse_comparison(trimmed))
            .map_or_else(|_| Self::Literal(trimmed.to_string()), Self::Filled)
    }

    /// True for a slot that contributes nothing to the expression.
    pub fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The decoded predicate, if any.
    pub fn predicate(&self) -> Option<&Predicate> {
        match self {
            Self::Filled(predicate) => Some(predicate),
            _ => None,
        }
    }

    /// The editor text for this slot; `None` when empty.
    pub fn text(&self) -> Option<String> {
        match self {
            Self::Empty => None,
            Self::Filled(predicate) => Some(predicate.display_form()),
            Self::Literal(text) => Some(text.clone()),
        }
    }
}

impl From<Predicate> for Slot {
    fn from(predicate: Predicate) -> Self {
        Self::Filled(predicate)
    }
}

impl From<String> for Slot {
    fn from(text: String) -> Self {
        Self::from_text(&text)
    }
}

impl From<Slot> for String {
    fn from(slot: Slot) -> Self {
        slot.text().unwrap_or_default()
    }
}

// ============================================================================
// AttributeGroup
// ============================================================================

/// A cluster of predicates combined by one operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttributeGroup {
    /// Predicate positions in display order. Never empty after construction.
    #[serde(rename = "attributes")]
    pub slots: Vec<Slot>,
    /// Operator joining the slots.
    #[serde(default)]
    pub operator: Operator,
}

impl Default for AttributeGroup {
    fn default() -> Self {
        Self::new(Operator::And)
    }
}

impl AttributeGroup {
    /// Creates a group holding a single empty slot.
    pub fn new(operator: Operator) -> Self {
        Self {
            slots: vec![Slot::Empty],
            operator,
        }
    }

    /// Creates a group from predicates. No predicates gives one empty slot.
    pub fn of(predicates: impl IntoIterator<Item = Predicate>, operator: Operator) -> Self {
        let mut slots: Vec<Slot> = predicates.into_iter().map(Slot::Filled).collect();
        if slots.is_empty() {
            slots.push(Slot::Empty);
        }
        Self { slots, operator }
    }

    /// Appends an empty slot.
    pub fn add_slot(&mut self) {
        self.slots.push(Slot::Empty);
    }

    /// Removes the slot at `index`. The last remaining slot is never removed.
    pub fn remove_slot(&mut self, index: usize) -> bool {
        if self.slots.len() <= 1 || index >= self.slots.len() {
            return false;
        }
        self.slots.remove(index);
        true
    }

    /// Replaces the slot at `index`.
    pub fn set_slot(&mut self, index: usize, slot: Slot) -> bool {
        match self.slots.get_mut(index) {
            Some(existing) => {
                *existing = slot;
                true
            }
            None => false,
        }
    }

    /// Replaces the slot at `index` with decoded editor text.
    pub fn set_text(&mut self, index: usize, text: &str) -> bool {
        self.set_slot(index, Slot::from_text(text))
    }

    /// Flips the group operator between AND and OR.
    pub fn toggle_operator(&mut self) {
        self.operator = self.operator.toggle();
    }

    /// Slots that contribute to the serialized form.
    pub fn contributing(&self) -> impl Iterator<Item = &Slot> {
        self.slots.iter().filter(|slot| !slot.is_empty())
    }

    /// Decoded predicates in slot order.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.slots.iter().filter_map(Slot::predicate)
    }
}

// ============================================================================
// PolicyExpression
// ============================================================================

/// A complete access policy in editable form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyExpression {
    /// Groups in display order. Never empty after construction.
    pub groups: Vec<AttributeGroup>,
    /// Operator joining the groups.
    #[serde(default, rename = "groupOperator")]
    pub operator: Operator,
}

impl Default for PolicyExpression {
    fn default() -> Self {
        Self::new()
    }
}

impl PolicyExpression {
    /// Creates the initial editor state: one empty group, top-level AND.
    pub fn new() -> Self {
        Self {
            groups: vec![AttributeGroup::default()],
            operator: Operator::And,
        }
    }

    /// Creates an expression from groups. No groups gives one empty group.
    pub fn from_groups(groups: Vec<AttributeGroup>, operator: Operator) -> Self {
        let mut groups = groups;
        if groups.is_empty() {
            groups.push(AttributeGroup::default());
        }
        Self { groups, operator }
    }

    /// Adds a group (builder pattern).
    pub fn with_group(mut self, group: AttributeGroup) -> Self {
        self.groups.push(group);
        self
    }

    /// Appends an empty group.
    pub fn add_group(&mut self) {
        self.groups.push(AttributeGroup::default());
    }

    /// Removes the group at `index`. The last remaining group is never removed.
    pub fn remove_group(&mut self, index: usize) -> bool {
        if self.groups.len() <= 1 || index >= self.groups.len() {
            return false;
        }
        self.groups.remove(index);
        true
    }

    /// Mutable access to one group.
    pub fn group_mut(&mut self, index: usize) -> Option<&mut AttributeGroup> {
        self.groups.get_mut(index)
    }

    /// Flips the top-level operator between AND and OR.
    pub fn toggle_operator(&mut self) {
        self.operator = self.operator.toggle();
    }

    /// Every decoded predicate, group by group.
    pub fn predicates(&self) -> impl Iterator<Item = &Predicate> {
        self.groups.iter().flat_map(AttributeGroup::predicates)
    }

    /// Text of every slot that did not decode.
    pub fn literals(&self) -> impl Iterator<Item = &str> {
        self.groups
            .iter()
            .flat_map(|group| group.slots.iter())
            .filter_map(|slot| match slot {
                Slot::Literal(text) => Some(text.as_str()),
                _ => None,
            })
    }

    /// True when no slot in any group is filled in.
    pub fn is_blank(&self) -> bool {
        self.groups
            .iter()
            .all(|group| group.contributing().next().is_none())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn pred(token: &str) -> Predicate {
        Predicate::from_token(token).expect("valid token")
    }

    #[test]
    fn test_slot_from_text() {
        assert_eq!(Slot::from_text("   "), Slot::Empty);
        assert_eq!(Slot::from_text("role:admin"), Slot::Filled(pred("role_admin")));
        assert_eq!(Slot::from_text("age >= 30"), Slot::Filled(pred("age_ge_30")));
        assert_eq!(
            Slot::from_text(" role admin "),
            Slot::Literal("role admin".to_string())
        );
    }

    #[test]
    fn test_slot_text() {
        assert_eq!(Slot::Empty.text(), None);
        assert_eq!(
            Slot::Filled(pred("age_lt_2")).text(),
            Some("age:lt:2".to_string())
        );
        assert_eq!(
            Slot::Literal("x y".to_string()).text(),
            Some("x y".to_string())
        );
    }

    #[test]
    fn test_operator_keywords() {
        assert_eq!(Operator::from_keyword("AnD"), Some(Operator::And));
        assert_eq!(Operator::from_keyword("or"), Some(Operator::Or));
        assert_eq!(Operator::from_keyword("nor"), None);
        assert_eq!(Operator::And.toggle(), Operator::Or);
        assert_eq!(Operator::Or.to_string(), "OR");
    }

    #[test]
    fn test_group_never_loses_last_slot() {
        let mut group = AttributeGroup::new(Operator::Or);
        assert!(!group.remove_slot(0));
        assert_eq!(group.slots.len(), 1);

        group.add_slot();
        assert!(group.set_text(1, "role_admin"));
        assert!(group.remove_slot(0));
        assert_eq!(group.slots, vec![Slot::Filled(pred("role_admin"))]);
        assert!(!group.remove_slot(5));
    }

    #[test]
    fn test_group_set_out_of_range() {
        let mut group = AttributeGroup::default();
        assert!(!group.set_text(3, "role_admin"));
        assert_eq!(group.slots, vec![Slot::Empty]);
    }

    #[test]
    fn test_group_of_without_predicates_has_placeholder() {
        let group = AttributeGroup::of(Vec::new(), Operator::And);
        assert_eq!(group.slots, vec![Slot::Empty]);
    }

    #[test]
    fn test_expression_editing() {
        let mut expr = PolicyExpression::new();
        assert!(expr.is_blank());
        assert!(!expr.remove_group(0));

        expr.add_group();
        expr.group_mut(1)
            .expect("second group exists")
            .set_text(0, "dept:fin");
        expr.toggle_operator();

        assert_eq!(expr.operator, Operator::Or);
        assert!(!expr.is_blank());
        assert!(expr.remove_group(0));
        assert_eq!(expr.groups.len(), 1);
        assert_eq!(expr.predicates().collect::<Vec<_>>(), vec![&pred("dept_fin")]);
    }

    #[test]
    fn test_literals_are_reported() {
        let mut expr = PolicyExpression::new();
        expr.group_mut(0).expect("group").set_text(0, "bad entry!");
        assert_eq!(expr.literals().collect::<Vec<_>>(), vec!["bad entry!"]);
    }

    #[test]
    fn test_json_model_matches_editor_shape() {
        let json = r#"{
            "groups": [
                {"attributes": ["role:admin", "", "role:manager"], "operator": "OR"},
                {"attributes": ["dept:eng"]}
            ],
            "groupOperator": "and"
        }"#;
        let expr: PolicyExpression = serde_json::from_str(json).expect("deserialize model");

        assert_eq!(expr.operator, Operator::And);
        assert_eq!(expr.groups[0].operator, Operator::Or);
        assert_eq!(expr.groups[0].slots[1], Slot::Empty);
        assert_eq!(expr.groups[1].operator, Operator::And);

        let out = serde_json::to_value(&expr).expect("serialize model");
        assert_eq!(out["groups"][0]["attributes"][2], "role:manager");
        assert_eq!(out["groupOperator"], "AND");
    }
}
