//! Property-based tests for the decision and persistence invariants.

use std::sync::Arc;

use proptest::prelude::*;

use portaria_authz::AuthzEngine;
use portaria_core::{Grant, SCREEN_ACCESS_CODE};
use portaria_store::{keys, GrantStore, MemoryStorage, Storage};
use portaria_testkit::{arb_code, arb_grants, arb_screen_id};

fn engine_with(grants: Vec<Grant>) -> AuthzEngine<MemoryStorage> {
    let store = Arc::new(GrantStore::new(MemoryStorage::new()));
    store.set_permissions(grants);
    AuthzEngine::new(store)
}

/// The reference predicate `has` must agree with.
fn reference_has(grants: &[Grant], code: &str, screen: Option<i64>) -> bool {
    grants.iter().any(|g| {
        g.active && g.permission_code == code && screen.map_or(true, |s| g.screen_id == s)
    })
}

proptest! {
    #[test]
    fn has_iff_matching_active_grant(
        grants in arb_grants(16),
        code in arb_code(),
        screen in prop::option::of(arb_screen_id()),
    ) {
        let engine = engine_with(grants.clone());
        prop_assert_eq!(engine.has(&code, screen), reference_has(&grants, &code, screen));
    }

    #[test]
    fn can_access_screen_is_has_on_reserved_code(
        grants in arb_grants(16),
        screen in arb_screen_id(),
    ) {
        let engine = engine_with(grants);
        prop_assert_eq!(
            engine.can_access_screen(screen),
            engine.has(SCREEN_ACCESS_CODE, Some(screen))
        );
    }

    #[test]
    fn inactive_only_grant_sets_always_deny(
        grants in arb_grants(16),
        code in arb_code(),
        screen in prop::option::of(arb_screen_id()),
    ) {
        let inactive: Vec<Grant> = grants.into_iter().map(Grant::inactive).collect();
        let engine = engine_with(inactive);
        prop_assert!(!engine.has(&code, screen));
    }

    #[test]
    fn set_persist_load_reproduces_decisions(grants in arb_grants(16)) {
        let storage = Arc::new(MemoryStorage::new());
        let store = GrantStore::new(Arc::clone(&storage));
        store.set_permissions(grants.clone());

        let fresh = GrantStore::new(Arc::clone(&storage));
        fresh.load();
        let engine = AuthzEngine::new(Arc::new(fresh));

        // Exhaust the generator vocabulary plus a code that never occurs.
        let codes = [
            "acesso_tela", "editar_ato", "assinar_ato",
            "publicar_ato", "excluir_ato", "inexistente",
        ];
        for code in codes {
            for screen in (0..=7).map(Some).chain([None]) {
                prop_assert_eq!(
                    engine.has(code, screen),
                    reference_has(&grants, code, screen),
                    "diverged for ({}, {:?})", code, screen
                );
            }
        }
    }

    #[test]
    fn set_permissions_twice_persists_identical_payload(grants in arb_grants(16)) {
        let storage = Arc::new(MemoryStorage::new());
        let store = GrantStore::new(Arc::clone(&storage));

        store.set_permissions(grants.clone());
        let first = storage.get(keys::GRANTS).unwrap().unwrap();
        store.set_permissions(grants);
        let second = storage.get(keys::GRANTS).unwrap().unwrap();

        prop_assert_eq!(first, second);
    }
}
