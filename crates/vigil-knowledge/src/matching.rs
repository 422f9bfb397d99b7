//! Pure matching primitives.
//!
//! These heuristics are deliberately string-based and best-effort: false
//! negatives and false positives are accepted properties of the design,
//! and the unit tables in this crate's tests pin the exact boundaries.
//! Knowledge-base edits must not change matching semantics.

use vigil_contracts::{medication::Medication, patient::PatientAllergy};

use crate::base::KnowledgeBase;

/// Does a recorded allergy apply to a medication order?
///
/// Two-phase check, both case-insensitive:
///
/// 1. Direct substring containment in either direction between the
///    allergen and the order's name, or the allergen and its generic name.
/// 2. Drug-class path: when the allergen names a class in the knowledge
///    base ("penicillin", "sulfa", "nsaid"), any class member appearing
///    as a substring of the order's name or generic name is a match.
///
/// The caller decides whether the allergy's kind makes it relevant; this
/// function only answers the name question.
pub fn allergy_matches(
    medication: &Medication,
    allergy: &PatientAllergy,
    kb: &KnowledgeBase,
) -> bool {
    let allergen = allergy.allergen.to_lowercase();
    let name = medication.name.to_lowercase();
    let generic = medication.generic_name.as_deref().map(str::to_lowercase);

    if name.contains(&allergen) || allergen.contains(&name) {
        return true;
    }
    if let Some(generic) = generic.as_deref() {
        if generic.contains(&allergen) || allergen.contains(generic) {
            return true;
        }
    }

    match kb.class_members(&allergen) {
        Some(members) => members.iter().any(|member| {
            let member = member.to_lowercase();
            name.contains(&member) || generic.as_deref().is_some_and(|g| g.contains(&member))
        }),
        None => false,
    }
}

/// Are two orders the same drug prescribed twice?
///
/// Three independent rules; any one suffices:
///
/// 1. Both orders carry a generic name, the generic names are equal, and
///    neither generic is just its own order name repeated (an order whose
///    generic equals its brand name must not flag through this rule).
/// 2. The order names are identical.
/// 3. Cross-match: one order's generic name — when it differs from that
///    order's own name — equals the other order's full name, or is a
///    whole-word prefix/suffix of it. The word boundary matters:
///    "Albuterol" is not a duplicate of "Albuterol Sulfate", but
///    "Ibuprofen" is a duplicate of "Advil" (generic "Ibuprofen").
pub fn is_duplicate_medication(a: &Medication, b: &Medication) -> bool {
    let name_a = a.name.to_lowercase();
    let name_b = b.name.to_lowercase();
    let generic_a = normalized_generic(a);
    let generic_b = normalized_generic(b);

    // Rule 1: shared generic name.
    if let (Some(ga), Some(gb)) = (generic_a.as_deref(), generic_b.as_deref()) {
        if ga == gb && ga != name_a && gb != name_b {
            return true;
        }
    }

    // Rule 2: identical names.
    if name_a == name_b {
        return true;
    }

    // Rule 3: brand/generic cross-match with whole-word boundaries.
    generic_names_other(generic_a.as_deref(), &name_a, &name_b)
        || generic_names_other(generic_b.as_deref(), &name_b, &name_a)
}

fn normalized_generic(medication: &Medication) -> Option<String> {
    medication
        .generic_name
        .as_deref()
        .map(str::to_lowercase)
        .filter(|g| !g.is_empty())
}

/// Rule 3 for one direction: does this order's generic name identify the
/// other order? Skipped when the generic is just the order's own name.
fn generic_names_other(generic: Option<&str>, own_name: &str, other_name: &str) -> bool {
    let Some(generic) = generic else {
        return false;
    };
    if generic == own_name {
        return false;
    }

    other_name == generic
        || other_name.starts_with(&format!("{generic} "))
        || other_name.ends_with(&format!(" {generic}"))
}
