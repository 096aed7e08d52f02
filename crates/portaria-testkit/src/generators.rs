//! Proptest strategies for grants and screen maps.

use proptest::prelude::*;

use portaria_core::{Grant, ScreenMap};

/// Strategy for permission codes.
///
/// A small closed vocabulary on purpose: collisions between generated
/// grants and queried codes are what exercise the matching rules.
pub fn arb_code() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("acesso_tela".to_string()),
        Just("editar_ato".to_string()),
        Just("assinar_ato".to_string()),
        Just("publicar_ato".to_string()),
        Just("excluir_ato".to_string()),
    ]
}

/// Strategy for screen ids, kept in a narrow range for collisions.
pub fn arb_screen_id() -> impl Strategy<Value = i64> {
    1i64..=6
}

/// Strategy for a single grant.
pub fn arb_grant() -> impl Strategy<Value = Grant> {
    (
        arb_screen_id(),
        arb_code(),
        prop::option::of("[A-Za-z ]{1,16}"),
        any::<bool>(),
    )
        .prop_map(|(screen_id, code, display_name, active)| Grant {
            screen_id,
            permission_code: code,
            display_name,
            description: None,
            active,
        })
}

/// Strategy for a grant list of up to `max` entries.
///
/// Duplicates (including contradictory active/inactive pairs) are
/// intentionally possible; the store keeps them as-is.
pub fn arb_grants(max: usize) -> impl Strategy<Value = Vec<Grant>> {
    prop::collection::vec(arb_grant(), 0..=max)
}

/// Strategy for a screen map over a small code vocabulary.
pub fn arb_screen_map() -> impl Strategy<Value = ScreenMap> {
    prop::collection::hash_map("[a-z]{3,10}", arb_screen_id(), 0..6)
        .prop_map(|entries| entries.into_iter().collect())
}
