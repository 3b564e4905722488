use psymap_core::models::analysis::CompletenessGrade;
use psymap_core::models::clinical::ClinicalSnapshot;
use psymap_core::models::traits::TraitBundle;

/// Grade how much of the optional input was supplied.
///
/// Never blocks computation. A partially present Big Five set caps the grade
/// at [`CompletenessGrade::Partial`].
pub fn grade(bundle: &TraitBundle, clinical: Option<&ClinicalSnapshot>) -> CompletenessGrade {
    let personality = bundle.mbti.is_some() || bundle.has_strengths();
    let measured = clinical.is_some();

    if !bundle.has_complete_big_five() {
        return if personality || measured {
            CompletenessGrade::Partial
        } else {
            CompletenessGrade::Minimal
        };
    }

    match (personality, measured) {
        (true, true) => CompletenessGrade::Complete,
        (true, false) | (false, true) => CompletenessGrade::Partial,
        (false, false) => CompletenessGrade::Minimal,
    }
}
