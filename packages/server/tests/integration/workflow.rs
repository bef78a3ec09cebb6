use common::storage::{AssetRef, AssetStore};
use common::{LinkCategory, LinkEntry, RawLinks, ResourceStatus};
use hub_server::entity::{decision_log, resource};
use hub_server::workflow::merge::LinkSelector;
use hub_server::workflow::record::{SupplementPayload, image_list};
use hub_server::entity::decision_log::DecisionTarget;
use hub_server::workflow::{Decision, NewResource, SupplementPolicy, WorkflowError};
use sea_orm::{ColumnTrait, EntityTrait, PaginatorTrait, QueryFilter};

use crate::common::TestApp;

fn raw_links(category: &str, urls: &[&str]) -> RawLinks {
    RawLinks::from([(category.to_string(), serde_json::json!(urls))])
}

fn new_resource(title: &str, images: Vec<String>) -> NewResource {
    NewResource {
        title: title.to_string(),
        images,
        ..Default::default()
    }
}

fn canonical(id: i32, staged: &str) -> String {
    AssetRef::parse(staged)
        .unwrap()
        .canonical_for(id)
        .to_string()
}

/// Submit and approve with two staged images; returns (id, [canon A, canon B]).
async fn approved_with_two_images(app: &TestApp) -> (i32, Vec<String>) {
    let a = app.stage(b"image-a").await;
    let b = app.stage(b"image-b").await;
    let service = app.service();
    let id = service
        .submit(new_resource("Base", vec![a.clone(), b.clone()]))
        .await
        .unwrap()
        .resource
        .id;
    service.decide(id, Decision::approve()).await.unwrap();
    (id, vec![canonical(id, &a), canonical(id, &b)])
}

mod submission {
    use super::*;

    #[tokio::test]
    async fn submitted_resource_is_pending_with_only_known_categories() {
        let app = TestApp::spawn().await;
        let mut links = raw_links("baidu", &["http://x"]);
        links.extend(raw_links("bogus_category", &["http://y"]));

        let written = app
            .service()
            .submit(NewResource {
                title: "Spirited Away".into(),
                links,
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(written.resource.status, ResourceStatus::Pending);
        assert_eq!(written.warnings.len(), 1);
        let stored = common::links::normalize_value(&written.resource.links).links;
        assert_eq!(stored.len(), 1);
        assert_eq!(
            stored[&LinkCategory::Baidu],
            vec![LinkEntry::bare("http://x")]
        );
    }

    #[tokio::test]
    async fn submission_does_not_touch_staged_files() {
        let app = TestApp::spawn().await;
        let a = app.stage(b"image-a").await;

        let written = app
            .service()
            .submit(new_resource("Base", vec![a.clone()]))
            .await
            .unwrap();

        assert_eq!(image_list(&written.resource.images), vec![a.clone()]);
        let canon = AssetRef::parse(&a).unwrap().canonical_for(written.resource.id);
        assert!(!app.store.exists(&canon).await.unwrap());
    }

    #[tokio::test]
    async fn blank_title_is_rejected() {
        let app = TestApp::spawn().await;

        let err = app
            .service()
            .submit(new_resource("   ", vec![]))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(_)));
    }
}

mod base_decision {
    use super::*;

    #[tokio::test]
    async fn approval_moves_images_and_poster_to_canonical_storage() {
        let app = TestApp::spawn().await;
        let a = app.stage(b"image-a").await;
        let b = app.stage(b"image-b").await;
        let service = app.service();
        let id = service
            .submit(new_resource("Base", vec![a.clone(), b.clone()]))
            .await
            .unwrap()
            .resource
            .id;

        let outcome = service
            .decide(
                id,
                Decision {
                    approved_images: Some(vec![a.clone(), b.clone()]),
                    poster_image: Some(a.clone()),
                    ..Decision::approve()
                },
            )
            .await
            .unwrap();

        let expected = vec![canonical(id, &a), canonical(id, &b)];
        assert_eq!(outcome.resource.status, ResourceStatus::Approved);
        assert_eq!(image_list(&outcome.resource.images), expected);
        assert_eq!(outcome.resource.poster_image.as_deref(), Some(expected[0].as_str()));
        assert!(outcome.audit_record.is_none());
        for image in &expected {
            let asset = AssetRef::parse(image).unwrap();
            assert!(app.store.exists(&asset).await.unwrap());
        }
    }

    #[tokio::test]
    async fn approving_no_images_without_poster_leaves_poster_empty() {
        let app = TestApp::spawn().await;
        let a = app.stage(b"image-a").await;
        let service = app.service();
        let id = service
            .submit(new_resource("Base", vec![a]))
            .await
            .unwrap()
            .resource
            .id;

        let outcome = service
            .decide(
                id,
                Decision {
                    approved_images: Some(vec![]),
                    ..Decision::approve()
                },
            )
            .await
            .unwrap();

        assert!(image_list(&outcome.resource.images).is_empty());
        assert_eq!(outcome.resource.poster_image, None);
    }

    #[tokio::test]
    async fn poster_outside_the_approved_set_is_invalid_and_rolls_back() {
        let app = TestApp::spawn().await;
        let a = app.stage(b"image-a").await;
        let b = app.stage(b"image-b").await;
        let service = app.service();
        let id = service
            .submit(new_resource("Base", vec![a.clone(), b.clone()]))
            .await
            .unwrap()
            .resource
            .id;

        let err = service
            .decide(
                id,
                Decision {
                    approved_images: Some(vec![a]),
                    poster_image: Some(b),
                    ..Decision::approve()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidState(_)));
        let stored = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.status, ResourceStatus::Pending);
    }

    #[tokio::test]
    async fn only_selected_links_are_kept() {
        let app = TestApp::spawn().await;
        let service = app.service();
        let mut links = raw_links("baidu", &["http://keep", "http://drop"]);
        links.extend(raw_links("magnet", &["magnet:?xt=drop"]));
        let id = service
            .submit(NewResource {
                title: "Links".into(),
                links,
                ..Default::default()
            })
            .await
            .unwrap()
            .resource
            .id;

        let outcome = service
            .decide(
                id,
                Decision {
                    approved_links: Some(vec![LinkSelector {
                        category: "baidu".into(),
                        url: "http://keep".into(),
                    }]),
                    ..Decision::approve()
                },
            )
            .await
            .unwrap();

        let kept = common::links::normalize_value(&outcome.resource.links).links;
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[&LinkCategory::Baidu], vec![LinkEntry::bare("http://keep")]);
        let rejected = common::links::normalize_value(&outcome.log_entry.rejected_links).links;
        assert_eq!(common::links::count(&rejected), 2);
    }

    #[tokio::test]
    async fn rejection_keeps_content_and_records_notes_in_the_log() {
        let app = TestApp::spawn().await;
        let a = app.stage(b"image-a").await;
        let service = app.service();
        let id = service
            .submit(new_resource("Base", vec![a.clone()]))
            .await
            .unwrap()
            .resource
            .id;

        let outcome = service
            .decide(id, Decision::reject(Some("duplicate".into())))
            .await
            .unwrap();

        assert_eq!(outcome.resource.status, ResourceStatus::Rejected);
        assert_eq!(image_list(&outcome.resource.images), vec![a]);
        assert_eq!(outcome.resource.description, "");
        assert_eq!(outcome.log_entry.notes.as_deref(), Some("duplicate"));
    }

    #[tokio::test]
    async fn deciding_twice_is_invalid() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;

        let err = app
            .service()
            .decide(id, Decision::approve())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidState(_)));
    }

    #[tokio::test]
    async fn pending_is_not_a_decision() {
        let app = TestApp::spawn().await;
        let id = app
            .service()
            .submit(new_resource("Base", vec![]))
            .await
            .unwrap()
            .resource
            .id;

        let err = app
            .service()
            .decide(
                id,
                Decision {
                    status: ResourceStatus::Pending,
                    ..Decision::approve()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn missing_resource_is_not_found() {
        let app = TestApp::spawn().await;

        let err = app
            .service()
            .decide(999, Decision::approve())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::NotFound(999)));
    }
}

mod supplements {
    use super::*;

    #[tokio::test]
    async fn supplement_on_pending_resource_is_invalid() {
        let app = TestApp::spawn().await;
        let service = app.service();
        let id = service
            .submit(new_resource("Base", vec![]))
            .await
            .unwrap()
            .resource
            .id;
        let c = app.stage(b"image-c").await;

        let err = service
            .submit_supplement(id, vec![c], RawLinks::new())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidState(_)));
    }

    #[tokio::test]
    async fn empty_supplement_is_a_validation_error() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;

        let err = app
            .service()
            .submit_supplement(id, vec![], raw_links("bogus", &["http://x"]))
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::Validation(_)));
    }

    #[tokio::test]
    async fn approved_supplement_is_appended_and_audited() {
        let app = TestApp::spawn().await;
        let (id, base_images) = approved_with_two_images(&app).await;
        let c = app.stage(b"image-c").await;
        let service = app.service();

        service
            .submit_supplement(id, vec![c.clone()], RawLinks::new())
            .await
            .unwrap();
        let outcome = service
            .decide(
                id,
                Decision {
                    approved_images: Some(vec![c.clone()]),
                    ..Decision::approve()
                },
            )
            .await
            .unwrap();

        let canon_c = canonical(id, &c);
        let mut expected = base_images.clone();
        expected.push(canon_c.clone());
        assert_eq!(image_list(&outcome.resource.images), expected);
        assert_eq!(outcome.resource.status, ResourceStatus::Approved);
        assert!(outcome.resource.supplement.is_none());
        assert_eq!(outcome.resource.poster_image.as_deref(), Some(base_images[0].as_str()));

        let audits = resource::Entity::find()
            .filter(resource::Column::IsSupplementRecord.eq(true))
            .all(&app.db)
            .await
            .unwrap();
        assert_eq!(audits.len(), 1);
        assert_eq!(audits[0].original_resource_id, Some(id));
        assert_eq!(audits[0].status, ResourceStatus::Approved);
        assert_eq!(image_list(&audits[0].images), vec![canon_c]);
        assert_eq!(outcome.audit_record.map(|a| a.id), Some(audits[0].id));
    }

    #[tokio::test]
    async fn supplement_links_are_merged_without_duplicates() {
        let app = TestApp::spawn().await;
        let service = app.service();
        let id = service
            .submit(NewResource {
                title: "Base".into(),
                links: raw_links("baidu", &["http://a"]),
                ..Default::default()
            })
            .await
            .unwrap()
            .resource
            .id;
        service.decide(id, Decision::approve()).await.unwrap();

        service
            .submit_supplement(id, vec![], raw_links("baidu", &["http://a", "http://b"]))
            .await
            .unwrap();
        let outcome = service.decide(id, Decision::approve()).await.unwrap();

        let merged = common::links::normalize_value(&outcome.resource.links).links;
        assert_eq!(
            merged[&LinkCategory::Baidu],
            vec![LinkEntry::bare("http://a"), LinkEntry::bare("http://b")]
        );
    }

    #[tokio::test]
    async fn base_without_poster_takes_first_supplement_image() {
        let app = TestApp::spawn().await;
        let service = app.service();
        let id = service
            .submit(new_resource("Base", vec![]))
            .await
            .unwrap()
            .resource
            .id;
        service.decide(id, Decision::approve()).await.unwrap();
        let c = app.stage(b"image-c").await;
        let d = app.stage(b"image-d").await;

        service
            .submit_supplement(id, vec![c.clone(), d.clone()], RawLinks::new())
            .await
            .unwrap();
        let outcome = service.decide(id, Decision::approve()).await.unwrap();

        let canon_c = canonical(id, &c);
        assert_eq!(outcome.resource.poster_image.as_deref(), Some(canon_c.as_str()));
        assert_eq!(
            image_list(&outcome.resource.images),
            vec![canon_c, canonical(id, &d)]
        );
    }

    #[tokio::test]
    async fn supplement_poster_outside_base_and_new_images_is_invalid() {
        let app = TestApp::spawn().await;
        let (id, base_images) = approved_with_two_images(&app).await;
        let c = app.stage(b"image-c").await;
        let d = app.stage(b"image-d").await;
        let service = app.service();
        service
            .submit_supplement(id, vec![c.clone(), d.clone()], RawLinks::new())
            .await
            .unwrap();

        let err = service
            .decide(
                id,
                Decision {
                    approved_images: Some(vec![c]),
                    poster_image: Some(d),
                    ..Decision::approve()
                },
            )
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidState(_)));
        let stored = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image_list(&stored.images), base_images);
        assert!(service.supplement_of(id).await.unwrap().is_some());
        let audits = resource::Entity::find()
            .filter(resource::Column::IsSupplementRecord.eq(true))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(audits, 0);
    }

    #[tokio::test]
    async fn approval_keeps_links_next_to_a_malformed_stored_category() {
        use sea_orm::{ActiveModelTrait, Set};

        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let model = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: resource::ActiveModel = model.into();
        active.links = Set(serde_json::json!({"baidu": ["http://legacy"], "magnet": null}));
        active.update(&app.db).await.unwrap();
        let service = app.service();

        service
            .submit_supplement(id, vec![], raw_links("quark", &["http://new"]))
            .await
            .unwrap();
        let outcome = service.decide(id, Decision::approve()).await.unwrap();

        let merged = common::links::normalize_value(&outcome.resource.links).links;
        assert_eq!(
            merged[&LinkCategory::Baidu],
            vec![LinkEntry::bare("http://legacy")]
        );
        assert_eq!(merged[&LinkCategory::Quark], vec![LinkEntry::bare("http://new")]);
        assert!(!merged.contains_key(&LinkCategory::Magnet));
    }

    #[tokio::test]
    async fn concurrent_decisions_on_one_supplement_apply_once() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let c = app.stage(b"image-c").await;
        app.service()
            .submit_supplement(id, vec![c], RawLinks::new())
            .await
            .unwrap();

        let (first, second) = (app.service(), app.service());
        let (a, b) = tokio::join!(
            first.decide(id, Decision::approve()),
            second.decide(id, Decision::approve())
        );

        assert_eq!([a.is_ok(), b.is_ok()].iter().filter(|ok| **ok).count(), 1);
        let audits = resource::Entity::find()
            .filter(resource::Column::IsSupplementRecord.eq(true))
            .filter(resource::Column::OriginalResourceId.eq(id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(audits, 1);
        let supplement_decisions = decision_log::Entity::find()
            .filter(decision_log::Column::ResourceId.eq(id))
            .filter(decision_log::Column::Target.eq(DecisionTarget::Supplement))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(supplement_decisions, 1);
        let stored = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image_list(&stored.images).len(), 3);
        assert!(stored.supplement.is_none());
    }

    #[tokio::test]
    async fn rejected_supplement_is_kept_and_audited() {
        let app = TestApp::spawn().await;
        let (id, base_images) = approved_with_two_images(&app).await;
        let c = app.stage(b"image-c").await;
        let service = app.service();

        service
            .submit_supplement(id, vec![c.clone()], RawLinks::new())
            .await
            .unwrap();
        let outcome = service
            .decide(id, Decision::reject(Some("blurry".into())))
            .await
            .unwrap();

        assert_eq!(outcome.resource.status, ResourceStatus::Approved);
        assert_eq!(image_list(&outcome.resource.images), base_images);
        let payload = outcome
            .resource
            .supplement
            .as_ref()
            .and_then(SupplementPayload::from_value)
            .expect("rejected payload is retained");
        assert_eq!(payload.status, ResourceStatus::Rejected);
        assert_eq!(payload.images, vec![c]);
        assert_eq!(payload.approval_notes.as_deref(), Some("blurry"));

        let audit = outcome.audit_record.expect("audit record");
        assert_eq!(audit.status, ResourceStatus::Rejected);
        assert_eq!(audit.description, "Supplement decision: blurry");
        assert!(image_list(&audit.images).is_empty());
    }

    #[tokio::test]
    async fn rejected_supplement_can_be_replaced_by_a_new_one() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let service = app.service();
        let c = app.stage(b"image-c").await;
        service
            .submit_supplement(id, vec![c], RawLinks::new())
            .await
            .unwrap();
        service.decide(id, Decision::reject(None)).await.unwrap();

        let d = app.stage(b"image-d").await;
        let written = service
            .submit_supplement(id, vec![d.clone()], RawLinks::new())
            .await
            .unwrap();

        let payload = written
            .resource
            .supplement
            .as_ref()
            .and_then(SupplementPayload::from_value)
            .unwrap();
        assert_eq!(payload.status, ResourceStatus::Pending);
        assert_eq!(payload.images, vec![d]);
    }

    #[tokio::test]
    async fn overwrite_policy_replaces_the_pending_payload() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let service = app.service();
        let c = app.stage(b"image-c").await;
        let d = app.stage(b"image-d").await;

        service
            .submit_supplement(id, vec![c], RawLinks::new())
            .await
            .unwrap();
        let written = service
            .submit_supplement(id, vec![d.clone()], RawLinks::new())
            .await
            .unwrap();

        let payload = written
            .resource
            .supplement
            .as_ref()
            .and_then(SupplementPayload::from_value)
            .unwrap();
        assert_eq!(payload.images, vec![d]);
    }

    #[tokio::test]
    async fn reject_while_pending_policy_refuses_a_second_payload() {
        let app = TestApp::spawn_with_policy(SupplementPolicy::RejectWhilePending).await;
        let (id, _) = approved_with_two_images(&app).await;
        let service = app.service();
        let c = app.stage(b"image-c").await;
        let d = app.stage(b"image-d").await;

        service
            .submit_supplement(id, vec![c.clone()], RawLinks::new())
            .await
            .unwrap();
        let err = service
            .submit_supplement(id, vec![d], RawLinks::new())
            .await
            .unwrap_err();

        assert!(matches!(err, WorkflowError::InvalidState(_)));
        let stored = service.supplement_of(id).await.unwrap().unwrap();
        assert_eq!(stored.images, vec![c]);
    }

    #[tokio::test]
    async fn audit_records_cannot_be_decided_or_supplemented() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let service = app.service();
        let c = app.stage(b"image-c").await;
        service
            .submit_supplement(id, vec![c.clone()], RawLinks::new())
            .await
            .unwrap();
        let audit_id = service
            .decide(id, Decision::approve())
            .await
            .unwrap()
            .audit_record
            .unwrap()
            .id;

        let decide = service.decide(audit_id, Decision::approve()).await.unwrap_err();
        let supplement = service
            .submit_supplement(audit_id, vec![c], RawLinks::new())
            .await
            .unwrap_err();

        assert!(matches!(decide, WorkflowError::InvalidState(_)));
        assert!(matches!(supplement, WorkflowError::InvalidState(_)));
    }

    #[tokio::test]
    async fn every_decision_is_logged() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let service = app.service();
        let c = app.stage(b"image-c").await;
        service
            .submit_supplement(id, vec![c], RawLinks::new())
            .await
            .unwrap();
        service.decide(id, Decision::approve()).await.unwrap();

        let history = service.history(id).await.unwrap();
        assert_eq!(history.audit_records.len(), 1);
        assert_eq!(history.decisions.len(), 2);
        let logged = decision_log::Entity::find()
            .filter(decision_log::Column::ResourceId.eq(id))
            .count(&app.db)
            .await
            .unwrap();
        assert_eq!(logged, 2);
    }
}

mod likes {
    use super::*;

    #[tokio::test]
    async fn count_follows_sequential_likes_and_unlikes_floored_at_zero() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let service = app.service();

        assert_eq!(service.unlike(id).await.unwrap(), 0);
        assert_eq!(service.like(id).await.unwrap(), 1);
        assert_eq!(service.like(id).await.unwrap(), 2);
        assert_eq!(service.like(id).await.unwrap(), 3);
        assert_eq!(service.unlike(id).await.unwrap(), 2);
        assert_eq!(service.unlike(id).await.unwrap(), 1);
        assert_eq!(service.unlike(id).await.unwrap(), 0);
        assert_eq!(service.unlike(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn concurrent_likes_are_not_lost() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;

        let mut handles = Vec::new();
        for _ in 0..10 {
            let service = app.service();
            handles.push(tokio::spawn(async move { service.like(id).await }));
        }
        for handle in handles {
            handle.await.unwrap().unwrap();
        }

        let stored = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(stored.like_count, 10);
    }

    #[tokio::test]
    async fn liking_a_missing_resource_is_not_found() {
        let app = TestApp::spawn().await;

        assert!(matches!(
            app.service().like(42).await.unwrap_err(),
            WorkflowError::NotFound(42)
        ));
        assert!(matches!(
            app.service().unlike(42).await.unwrap_err(),
            WorkflowError::NotFound(42)
        ));
    }
}

mod healing {
    use super::*;
    use sea_orm::{ActiveModelTrait, Set};

    /// Force an approved row back to a staged reference, as legacy data would have.
    async fn regress_to_staged(app: &TestApp, id: i32, staged: &str) {
        let model = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        let mut active: resource::ActiveModel = model.into();
        active.images = Set(serde_json::json!([staged]));
        active.poster_image = Set(Some(staged.to_string()));
        active.update(&app.db).await.unwrap();
    }

    #[tokio::test]
    async fn reading_an_approved_resource_heals_staged_references() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let staged = app.stage(b"legacy").await;
        regress_to_staged(&app, id, &staged).await;

        let model = app.service().get(id, false).await.unwrap();

        let canon = canonical(id, &staged);
        assert_eq!(image_list(&model.images), vec![canon.clone()]);
        assert_eq!(model.poster_image.as_deref(), Some(canon.as_str()));
        let stored = resource::Entity::find_by_id(id)
            .one(&app.db)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(image_list(&stored.images), vec![canon]);
    }

    #[tokio::test]
    async fn heal_scan_is_idempotent() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let staged = app.stage(b"legacy").await;
        regress_to_staged(&app, id, &staged).await;
        let service = app.service();

        assert_eq!(service.heal_all().await.unwrap(), 1);
        assert_eq!(service.heal_all().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn missing_staged_file_is_left_as_is() {
        let app = TestApp::spawn().await;
        let (id, _) = approved_with_two_images(&app).await;
        let ghost = "/assets/uploads/20240101/0000000000000000.jpg";
        regress_to_staged(&app, id, ghost).await;

        let model = app.service().get(id, false).await.unwrap();

        assert_eq!(image_list(&model.images), vec![ghost.to_string()]);
    }
}
