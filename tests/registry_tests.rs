//! Language registration and resolution through the runtime.

mod common;

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Barrier};

use common::{Tally, init_logging, tally_locator};
use mosaic::{
    LanguageLocator, LanguageProvider, LanguageResolver, NullHost, ProviderFactory, RegistryError,
    Runtime, RuntimeConfig, StaticResolver, MosaicError,
};

fn other_locator() -> LanguageLocator {
    LanguageLocator::resolved("Other", || {
        Ok(Arc::new(Tally::default()) as Arc<dyn LanguageProvider>)
    })
}

// =============================================================================
// Registration
// =============================================================================

#[test]
fn test_reregistration_is_idempotent() {
    init_logging();
    let runtime = Runtime::new();
    let tally = Arc::new(Tally::default());
    let count = Arc::new(AtomicUsize::new(0));

    for _ in 0..3 {
        runtime
            .register_provider(
                tally_locator(Arc::clone(&tally), Arc::clone(&count)),
                false,
                &["tally", ".tally"],
            )
            .unwrap();
    }
    assert_eq!(runtime.registry().descriptor_count(), 1);
    assert_eq!(runtime.list_registered_extensions(), vec![".tally"]);
}

#[test]
fn test_conflict_then_override() {
    let runtime = Runtime::new();
    let tally = Arc::new(Tally::default());
    runtime
        .register_provider(
            tally_locator(tally, Arc::new(AtomicUsize::new(0))),
            false,
            &["x"],
        )
        .unwrap();

    let err = runtime
        .register_provider(other_locator(), false, &["x"])
        .unwrap_err();
    assert!(matches!(
        err,
        MosaicError::Registry(RegistryError::Conflict { .. })
    ));
    assert_eq!(runtime.registry().type_name_of("x").as_deref(), Some("Tally"));

    runtime
        .register_provider(other_locator(), true, &["x"])
        .unwrap();
    assert_eq!(runtime.registry().type_name_of("x").as_deref(), Some("Other"));
    assert!(runtime.get_provider("x").is_ok());
}

#[test]
fn test_extension_lookup_with_and_without_dot() {
    let (runtime, _) = common::tally_runtime();
    let dotted = runtime.get_provider_by_extension(".tally").unwrap();
    let bare = runtime.get_provider_by_extension("tally").unwrap();
    assert!(Arc::ptr_eq(&dotted, &bare));
    assert_eq!(dotted.name(), "tally");
}

#[test]
fn test_identifiers_ignore_case() {
    let (runtime, _) = common::tally_runtime();
    let lower = runtime.get_provider("tally").unwrap();
    let upper = runtime.get_provider("TALLY").unwrap();
    assert!(Arc::ptr_eq(&lower, &upper));
    assert!(runtime.get_provider_by_extension("TLY").is_ok());
}

#[test]
fn test_unknown_language() {
    let runtime = Runtime::new();
    let Err(err) = runtime.get_provider("cobol") else {
        panic!("resolving 'cobol' should fail");
    };
    assert!(err.is_configuration());
    assert!(!err.is_name_resolution());
    assert!(runtime.try_get_provider("cobol").unwrap().is_none());
}

// =============================================================================
// Lazy loading
// =============================================================================

#[test]
fn test_concurrent_first_use_constructs_once() {
    init_logging();
    let runtime = Arc::new(Runtime::new());
    let constructed = Arc::new(AtomicUsize::new(0));
    runtime
        .register_provider(
            tally_locator(Arc::new(Tally::default()), Arc::clone(&constructed)),
            false,
            &["tally"],
        )
        .unwrap();

    let threads = 16;
    let barrier = Arc::new(Barrier::new(threads));
    let handles: Vec<_> = (0..threads)
        .map(|_| {
            let runtime = Arc::clone(&runtime);
            let barrier = Arc::clone(&barrier);
            std::thread::spawn(move || {
                barrier.wait();
                runtime.get_provider("tally").unwrap()
            })
        })
        .collect();

    let providers: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(providers.iter().all(|p| Arc::ptr_eq(p, &providers[0])));
}

#[test]
fn test_provider_is_not_built_until_used() {
    let constructed = Arc::new(AtomicUsize::new(0));
    let runtime = Runtime::new();
    runtime
        .register_provider(
            tally_locator(Arc::new(Tally::default()), Arc::clone(&constructed)),
            false,
            &["tally"],
        )
        .unwrap();

    assert_eq!(constructed.load(Ordering::SeqCst), 0);
    assert!(!runtime.registry().is_loaded("tally"));
    runtime.get_provider("tally").unwrap();
    runtime.get_provider("tally").unwrap();
    assert_eq!(constructed.load(Ordering::SeqCst), 1);
}

#[test]
fn test_config_registers_deferred_languages() {
    init_logging();
    let config = RuntimeConfig::from_json(
        r#"{
            "languages": [
                { "type_name": "Tally", "location": "tally-pkg", "names": ["tally"], "extensions": ["tly"] },
                { "type_name": "Ghost", "location": "nowhere", "names": ["ghost"] }
            ]
        }"#,
    )
    .unwrap();

    let resolver = StaticResolver::new().with(
        "tally-pkg",
        ProviderFactory::new("Tally", || {
            Ok(Arc::new(Tally::default()) as Arc<dyn LanguageProvider>)
        }),
    );
    let resolver: Arc<LanguageResolver> = Arc::new(resolver);
    let runtime = Runtime::from_config(&config, resolver, Arc::new(NullHost)).unwrap();

    assert_eq!(runtime.list_registered_extensions(), vec![".tly"]);
    assert_eq!(runtime.get_provider_by_extension("tly").unwrap().name(), "tally");

    let Err(err) = runtime.get_provider("ghost") else {
        panic!("resolving 'ghost' should fail");
    };
    assert!(matches!(
        err,
        MosaicError::Registry(RegistryError::MissingImplementation { .. })
    ));
    assert!(err.is_configuration());
}

#[test]
fn test_failing_constructor_surfaces() {
    let runtime = Runtime::new();
    runtime
        .register_provider(
            LanguageLocator::resolved("Broken", || Err("missing runtime library".to_string())),
            false,
            &["broken"],
        )
        .unwrap();

    let Err(err) = runtime.get_provider("broken") else {
        panic!("resolving 'broken' should fail");
    };
    assert!(matches!(
        err,
        MosaicError::Registry(RegistryError::InvalidImplementation { .. })
    ));
    assert!(runtime.try_get_provider("broken").is_err());
}
