//! Behaviour shared by every store implementation, run against both.

use chrono::Utc;
use incubator_core::content::ContentBlock;
use incubator_core::errors::{IncubatorError, StorageError};
use incubator_core::models::*;
use incubator_core::traits::{IConceptStore, IInsightStore};
use incubator_storage::{MemoryStore, SqliteStore};

fn make_concept(id: &str) -> Concept {
    Concept::new(
        id,
        NewConcept::new(
            format!("Concept {id}"),
            "A description that is long enough",
            Stage::Concept,
        ),
    )
    .unwrap()
}

fn make_insight(id: &str, previous_version: u32) -> NewInsightRecord {
    NewInsightRecord {
        idea_id: id.to_string(),
        previous_version,
        market_insights: vec![ContentBlock::header("Market"), ContentBlock::paragraph("Large")],
        risk_assessment: vec![ContentBlock::bullets(["Regulation"])],
        implementation_roadmap: vec![ContentBlock::numbered(["Prototype", "Pilot"])],
        is_ai_generated: true,
        generated_at: Utc::now(),
    }
}

fn concept_crud<S: IConceptStore>(store: &S) {
    store.create(&make_concept("a")).unwrap();
    assert!(store.create(&make_concept("a")).is_err());

    let update = ConceptUpdate {
        stage: Some(Stage::Testing),
        ..ConceptUpdate::default()
    };
    let updated = store.update("a", &update).unwrap();
    assert_eq!(updated.stage, Stage::Testing);
    assert_eq!(store.get("a").unwrap().unwrap().stage, Stage::Testing);

    let err = store.update("missing", &update).unwrap_err();
    assert!(matches!(err, IncubatorError::ConceptNotFound { .. }));

    assert!(store.delete("a").unwrap());
    assert!(!store.delete("a").unwrap());
    assert!(store.get("a").unwrap().is_none());
}

fn invalid_update_is_rejected<S: IConceptStore>(store: &S) {
    store.create(&make_concept("v")).unwrap();
    let update = ConceptUpdate {
        description: Some("short".to_string()),
        ..ConceptUpdate::default()
    };
    assert!(matches!(
        store.update("v", &update),
        Err(IncubatorError::Validation(_))
    ));
    assert_eq!(
        store.get("v").unwrap().unwrap().description,
        "A description that is long enough"
    );
}

fn enhancement_patch_round_trips<S: IConceptStore>(store: &S) {
    store.create(&make_concept("e")).unwrap();
    let patch = EnhancementPatch {
        refined_pitch: "Refined".to_string(),
        market_potential: 8.0,
        technical_complexity: 3.0,
        resource_requirements: 4.0,
        is_ai_generated: true,
    };
    store.update("e", &ConceptUpdate::enhancement(patch)).unwrap();
    let loaded = store.get("e").unwrap().unwrap();
    assert!(loaded.ai_validated);
    assert!(loaded.is_ai_generated);
    assert_eq!(loaded.refined_pitch.as_deref(), Some("Refined"));
    assert!((loaded.feasibility_score() - 7.0).abs() < 1e-9);
}

fn versions_are_contiguous<S: IConceptStore + IInsightStore>(store: &S) {
    store.create(&make_concept("i")).unwrap();
    assert!(store.get_current("i").unwrap().is_none());

    let v1 = store.append(&make_insight("i", 0)).unwrap();
    let v2 = store.append(&make_insight("i", 1)).unwrap();
    assert_eq!(v1.generation_version, 1);
    assert_eq!(v2.generation_version, 2);

    let current = store.get_current("i").unwrap().unwrap();
    assert_eq!(current.generation_version, 2);
    assert_eq!(current.market_insights, v2.market_insights);

    let history: Vec<u32> = store
        .get_history("i")
        .unwrap()
        .iter()
        .map(|r| r.generation_version)
        .collect();
    assert_eq!(history, vec![1, 2]);
}

fn stale_append_conflicts<S: IConceptStore + IInsightStore>(store: &S) {
    store.create(&make_concept("s")).unwrap();
    store.append(&make_insight("s", 0)).unwrap();
    store.append(&make_insight("s", 1)).unwrap();

    let err = store.append(&make_insight("s", 1)).unwrap_err();
    assert_eq!(
        err,
        IncubatorError::Storage(StorageError::VersionConflict {
            idea_id: "s".to_string(),
            expected: 1,
            actual: 2,
        })
    );
    assert_eq!(store.get_current("s").unwrap().unwrap().generation_version, 2);
}

fn append_requires_concept<S: IInsightStore>(store: &S) {
    let err = store.append(&make_insight("ghost", 0)).unwrap_err();
    assert!(matches!(err, IncubatorError::ConceptNotFound { .. }));
}

fn delete_cascades<S: IConceptStore + IInsightStore>(store: &S) {
    store.create(&make_concept("d")).unwrap();
    store.create(&make_concept("keep")).unwrap();
    store.append(&make_insight("d", 0)).unwrap();
    store.append(&make_insight("d", 1)).unwrap();
    store.append(&make_insight("keep", 0)).unwrap();

    assert!(store.delete("d").unwrap());
    assert!(store.get_history("d").unwrap().is_empty());
    assert_eq!(store.get_history("keep").unwrap().len(), 1);
}

fn delete_all_counts<S: IConceptStore + IInsightStore>(store: &S) {
    store.create(&make_concept("x")).unwrap();
    store.append(&make_insight("x", 0)).unwrap();
    store.append(&make_insight("x", 1)).unwrap();
    assert_eq!(store.delete_all("x").unwrap(), 2);
    assert_eq!(store.delete_all("x").unwrap(), 0);
    // Versions restart once history is gone.
    assert_eq!(store.append(&make_insight("x", 0)).unwrap().generation_version, 1);
}

macro_rules! contract_tests {
    ($module:ident, $make:expr) => {
        mod $module {
            use super::*;

            #[test]
            fn concept_crud() {
                super::concept_crud(&$make);
            }

            #[test]
            fn invalid_update_is_rejected() {
                super::invalid_update_is_rejected(&$make);
            }

            #[test]
            fn enhancement_patch_round_trips() {
                super::enhancement_patch_round_trips(&$make);
            }

            #[test]
            fn versions_are_contiguous() {
                super::versions_are_contiguous(&$make);
            }

            #[test]
            fn stale_append_conflicts() {
                super::stale_append_conflicts(&$make);
            }

            #[test]
            fn append_requires_concept() {
                super::append_requires_concept(&$make);
            }

            #[test]
            fn delete_cascades() {
                super::delete_cascades(&$make);
            }

            #[test]
            fn delete_all_counts() {
                super::delete_all_counts(&$make);
            }
        }
    };
}

contract_tests!(memory_store, MemoryStore::new());
contract_tests!(sqlite_store, SqliteStore::open_in_memory().unwrap());
