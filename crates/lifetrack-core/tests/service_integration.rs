//! Integration tests for the service layer over a temporary store.

use std::sync::Arc;
use std::thread;

use lifetrack_core::security::policy::PolicyAction;
use lifetrack_core::storage::id_key;
use lifetrack_core::{
    ActingUser, CatalogKind, Error, Food, FoodDraft, FoodLog, Goal, ItemRef, LifeTrack,
    MemoryAuditLogger, Profile, SecurityError, Store, Visibility, Workout, WorkoutDraft,
    WorkoutLog,
};

struct TestContext {
    service: LifeTrack,
    audit: MemoryAuditLogger,
    alice: ActingUser,
    bob: ActingUser,
    root: ActingUser,
}

impl TestContext {
    fn new() -> Self {
        let audit = MemoryAuditLogger::new();
        let service = LifeTrack::new(Arc::new(Store::temporary().unwrap()))
            .with_audit(Arc::new(audit.clone()));

        service.register("alice").unwrap();
        service.register("bob").unwrap();
        service.ensure_admin("root").unwrap();

        let alice = service.authenticate(Some("alice")).unwrap();
        let bob = service.authenticate(Some("bob")).unwrap();
        let root = service.authenticate(Some("root")).unwrap();
        assert!(root.is_admin);

        Self {
            service,
            audit,
            alice,
            bob,
            root,
        }
    }

    fn food(&self, owner: &ActingUser, name: &str, public: bool) -> Food {
        self.service
            .add_item::<Food>(
                owner,
                FoodDraft {
                    name: name.to_string(),
                    calories: 200.0,
                    protein: 10.0,
                    carbs: 20.0,
                    fat: 5.0,
                    public,
                    ..Default::default()
                },
            )
            .unwrap()
    }

    fn approved_food(&self, owner: &ActingUser, name: &str) -> Food {
        let food = self.food(owner, name, true);
        self.service
            .approve(&self.root, CatalogKind::Food, food.id)
            .unwrap();
        self.service.store().foods().get(id_key(food.id)).unwrap().unwrap()
    }

    fn workout(&self, owner: &ActingUser, name: &str, public: bool) -> Workout {
        self.service
            .add_item::<Workout>(
                owner,
                WorkoutDraft {
                    name: name.to_string(),
                    categories: vec!["strength".to_string()],
                    public,
                },
            )
            .unwrap()
    }

    /// Store a food document as written before ownership existed.
    fn legacy_food(&self, name: &str) -> Food {
        let id = self.service.store().generate_id().unwrap();
        let food: Food = serde_json::from_value(serde_json::json!({
            "id": id,
            "name": name,
            "calories": 52.0,
        }))
        .unwrap();
        self.service
            .store()
            .foods()
            .insert(id_key(id), &food)
            .unwrap();
        food
    }

    fn food_exists(&self, id: u64) -> bool {
        self.service.store().foods().get(id_key(id)).unwrap().is_some()
    }
}

fn security_error(err: Error) -> SecurityError {
    match err {
        Error::Security(inner) => inner,
        other => panic!("expected a security error, got {other:?}"),
    }
}

#[test]
fn test_creator_deletes_in_every_state() {
    let ctx = TestContext::new();
    let private = ctx.food(&ctx.alice, "Private oats", false);
    let pending = ctx.food(&ctx.alice, "Pending oats", true);
    let approved = ctx.approved_food(&ctx.alice, "Approved oats");

    for id in [private.id, pending.id, approved.id] {
        ctx.service
            .delete_item::<Food>(Some(&ctx.alice), id)
            .unwrap();
        assert!(!ctx.food_exists(id));
    }
}

#[test]
fn test_stranger_cannot_delete() {
    let ctx = TestContext::new();
    let private = ctx.food(&ctx.alice, "Private oats", false);
    let approved = ctx.approved_food(&ctx.alice, "Approved oats");

    for id in [private.id, approved.id] {
        let err = ctx
            .service
            .delete_item::<Food>(Some(&ctx.bob), id)
            .unwrap_err();
        assert!(matches!(
            security_error(err),
            SecurityError::NotOwner {
                action: PolicyAction::Delete,
                kind: CatalogKind::Food,
                ..
            }
        ));
        assert!(ctx.food_exists(id));
    }
}

#[test]
fn test_admin_override_only_for_approved_public() {
    let ctx = TestContext::new();
    let private = ctx.food(&ctx.alice, "Private oats", false);
    let pending = ctx.food(&ctx.alice, "Pending oats", true);
    let approved = ctx.approved_food(&ctx.alice, "Approved oats");

    let err = ctx
        .service
        .delete_item::<Food>(Some(&ctx.root), private.id)
        .unwrap_err();
    assert!(matches!(
        security_error(err),
        SecurityError::NotEligible {
            visibility: Visibility::Private,
            ..
        }
    ));

    let err = ctx
        .service
        .delete_item::<Food>(Some(&ctx.root), pending.id)
        .unwrap_err();
    assert!(matches!(
        security_error(err),
        SecurityError::NotEligible {
            visibility: Visibility::PendingApproval,
            ..
        }
    ));

    ctx.service
        .delete_item::<Food>(Some(&ctx.root), approved.id)
        .unwrap();
    assert!(ctx.food_exists(private.id));
    assert!(ctx.food_exists(pending.id));
    assert!(!ctx.food_exists(approved.id));
}

#[test]
fn test_anonymous_cannot_delete() {
    let ctx = TestContext::new();
    let approved = ctx.approved_food(&ctx.alice, "Approved oats");

    let err = ctx
        .service
        .delete_item::<Food>(None, approved.id)
        .unwrap_err();
    assert!(matches!(security_error(err), SecurityError::NotOwner { .. }));
    assert!(ctx.food_exists(approved.id));
}

#[test]
fn test_delete_missing_item() {
    let ctx = TestContext::new();
    let err = ctx
        .service
        .delete_item::<Workout>(Some(&ctx.alice), 9_999)
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_legacy_item_is_approved_public() {
    let ctx = TestContext::new();
    let legacy = ctx.legacy_food("Apple");
    assert_eq!(legacy.sharing.creator, "system");

    let visible = ctx.service.list_visible::<Food>(&ctx.bob).unwrap();
    assert!(visible.iter().any(|food| food.id == legacy.id));

    let err = ctx
        .service
        .delete_item::<Food>(Some(&ctx.bob), legacy.id)
        .unwrap_err();
    assert!(matches!(security_error(err), SecurityError::NotOwner { .. }));

    ctx.service
        .delete_item::<Food>(Some(&ctx.root), legacy.id)
        .unwrap();
    assert!(!ctx.food_exists(legacy.id));
}

#[test]
fn test_concurrent_deletes_remove_once() {
    let ctx = TestContext::new();
    let food = ctx.food(&ctx.alice, "Private oats", false);

    let handles: Vec<_> = (0..4)
        .map(|_| {
            let service = ctx.service.clone();
            let alice = ctx.alice.clone();
            thread::spawn(move || service.delete_item::<Food>(Some(&alice), food.id))
        })
        .collect();

    let results: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    let deleted = results.iter().filter(|r| r.is_ok()).count();
    assert_eq!(deleted, 1);
    assert!(results
        .iter()
        .filter_map(|r| r.as_ref().err())
        .all(|err| matches!(err, Error::NotFound(_))));
}

#[test]
fn test_template_accepts_public_and_own_items() {
    let ctx = TestContext::new();
    let public = ctx.approved_food(&ctx.alice, "Banana bread");
    let own_private = ctx.food(&ctx.bob, "Secret sauce", false);
    let own_pending = ctx.workout(&ctx.bob, "Hill sprints", true);

    let template = ctx
        .service
        .create_template(
            &ctx.bob,
            "Morning",
            vec![
                ItemRef::Food { id: public.id },
                ItemRef::Food { id: own_private.id },
                ItemRef::Workout { id: own_pending.id },
            ],
        )
        .unwrap();
    assert_eq!(template.owner, "bob");

    let summaries = ctx.service.list_templates(&ctx.bob).unwrap();
    assert_eq!(summaries.len(), 1);
    assert_eq!(summaries[0].foods_count, 2);
    assert_eq!(summaries[0].workouts_count, 1);
    assert!(ctx.service.list_templates(&ctx.alice).unwrap().is_empty());
}

#[test]
fn test_template_write_is_all_or_nothing() {
    let ctx = TestContext::new();
    let public = ctx.approved_food(&ctx.alice, "Banana bread");
    let foreign = ctx.food(&ctx.alice, "Secret sauce", false);

    let err = ctx
        .service
        .create_template(
            &ctx.bob,
            "Lunch",
            vec![
                ItemRef::Food { id: public.id },
                ItemRef::Food { id: foreign.id },
            ],
        )
        .unwrap_err();

    let denial = security_error(err);
    assert!(matches!(
        &denial,
        SecurityError::NotOwner {
            action: PolicyAction::UseInTemplate,
            item,
            ..
        } if item == "Secret sauce"
    ));
    assert!(denial.to_string().contains("Secret sauce"));
    assert!(ctx.service.list_templates(&ctx.bob).unwrap().is_empty());
}

#[test]
fn test_admin_has_no_template_override() {
    let ctx = TestContext::new();
    let pending = ctx.food(&ctx.alice, "Pending oats", true);

    let err = ctx
        .service
        .create_template(&ctx.root, "Admin", vec![ItemRef::Food { id: pending.id }])
        .unwrap_err();
    assert!(matches!(security_error(err), SecurityError::NotOwner { .. }));
}

#[test]
fn test_template_update_checks_items() {
    let ctx = TestContext::new();
    let public = ctx.approved_food(&ctx.alice, "Banana bread");
    let foreign = ctx.workout(&ctx.alice, "Secret circuit", false);

    ctx.service
        .create_template(&ctx.bob, "Snack", vec![ItemRef::Food { id: public.id }])
        .unwrap();

    let err = ctx
        .service
        .update_template(
            &ctx.bob,
            "Snack",
            vec![ItemRef::Workout { id: foreign.id }],
        )
        .unwrap_err();
    assert!(err.is_security());

    let unchanged = ctx.service.template_details(&ctx.bob, "Snack").unwrap();
    assert_eq!(unchanged.items, vec![ItemRef::Food { id: public.id }]);

    let missing = ctx
        .service
        .update_template(&ctx.bob, "Dinner", Vec::new())
        .unwrap_err();
    assert!(matches!(missing, Error::NotFound(_)));
}

#[test]
fn test_template_names_unique_per_owner() {
    let ctx = TestContext::new();
    ctx.service.create_template(&ctx.bob, "Daily", Vec::new()).unwrap();
    ctx.service.create_template(&ctx.alice, "Daily", Vec::new()).unwrap();

    let err = ctx
        .service
        .create_template(&ctx.bob, "Daily", Vec::new())
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));
}

#[test]
fn test_template_references_missing_item() {
    let ctx = TestContext::new();
    let err = ctx
        .service
        .create_template(&ctx.bob, "Ghost", vec![ItemRef::Workout { id: 4_242 }])
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_use_template_logs_entries() {
    let ctx = TestContext::new();
    let food = ctx.approved_food(&ctx.alice, "Banana bread");
    let workout = ctx.workout(&ctx.bob, "Hill sprints", false);

    ctx.service
        .create_template(
            &ctx.bob,
            "Routine",
            vec![
                ItemRef::Food { id: food.id },
                ItemRef::Workout { id: workout.id },
            ],
        )
        .unwrap();

    let entries = ctx.service.use_template(&ctx.bob, "Routine").unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].foods[0].amount, 100.0);
    assert_eq!(entries[0].totals.calories, 200.0);
    assert_eq!(entries[1].workouts[0].name, "Hill sprints");
    assert_eq!(ctx.service.list_entries(&ctx.bob).unwrap().len(), 2);
}

#[test]
fn test_use_template_with_deleted_items() {
    let ctx = TestContext::new();
    let food = ctx.food(&ctx.bob, "Short lived", false);
    ctx.service
        .create_template(&ctx.bob, "Gone", vec![ItemRef::Food { id: food.id }])
        .unwrap();
    ctx.service
        .delete_item::<Food>(Some(&ctx.bob), food.id)
        .unwrap();

    let err = ctx.service.use_template(&ctx.bob, "Gone").unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}

#[test]
fn test_delete_template() {
    let ctx = TestContext::new();
    ctx.service.create_template(&ctx.bob, "Daily", Vec::new()).unwrap();

    assert!(matches!(
        ctx.service.delete_template(&ctx.alice, "Daily").unwrap_err(),
        Error::NotFound(_)
    ));
    ctx.service.delete_template(&ctx.bob, "Daily").unwrap();
    assert!(ctx.service.list_templates(&ctx.bob).unwrap().is_empty());
}

#[test]
fn test_public_names_are_unique() {
    let ctx = TestContext::new();
    ctx.food(&ctx.alice, "Granola", true);

    let err = ctx
        .service
        .add_item::<Food>(
            &ctx.bob,
            FoodDraft {
                name: "granola".to_string(),
                public: true,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Conflict(_)));

    // Private copies are fine.
    ctx.food(&ctx.bob, "Granola", false);
}

#[test]
fn test_visibility_of_listings() {
    let ctx = TestContext::new();
    let approved = ctx.approved_food(&ctx.alice, "Banana bread");
    let pending = ctx.food(&ctx.alice, "Pending oats", true);
    let private = ctx.food(&ctx.alice, "Private oats", false);

    let for_bob: Vec<u64> = ctx
        .service
        .list_visible::<Food>(&ctx.bob)
        .unwrap()
        .iter()
        .map(|food| food.id)
        .collect();
    assert_eq!(for_bob, vec![approved.id]);

    assert_eq!(ctx.service.list_visible::<Food>(&ctx.alice).unwrap().len(), 3);
    assert!(matches!(
        ctx.service.get_visible::<Food>(&ctx.bob, private.id).unwrap_err(),
        Error::NotFound(_)
    ));
    assert!(ctx.service.get_visible::<Food>(&ctx.alice, pending.id).is_ok());
}

#[test]
fn test_moderation_requires_admin() {
    let ctx = TestContext::new();
    let pending = ctx.food(&ctx.alice, "Pending oats", true);

    let err = ctx
        .service
        .approve(&ctx.bob, CatalogKind::Food, pending.id)
        .unwrap_err();
    assert!(matches!(
        security_error(err),
        SecurityError::PermissionDenied(_)
    ));
    assert!(ctx.service.pending(&ctx.bob).is_err());

    let queue = ctx.service.pending(&ctx.root).unwrap();
    assert_eq!(queue.foods.len(), 1);

    ctx.service
        .reject(&ctx.root, CatalogKind::Food, pending.id)
        .unwrap();
    assert!(!ctx.food_exists(pending.id));

    // Only pending items can be moderated.
    let private = ctx.food(&ctx.alice, "Private oats", false);
    assert!(matches!(
        ctx.service
            .approve(&ctx.root, CatalogKind::Food, private.id)
            .unwrap_err(),
        Error::NotFound(_)
    ));
}

#[test]
fn test_denials_are_audited() {
    let ctx = TestContext::new();
    let private = ctx.food(&ctx.alice, "Private oats", false);
    ctx.audit.clear();

    ctx.service
        .delete_item::<Food>(Some(&ctx.bob), private.id)
        .unwrap_err();

    let denials = ctx.audit.denials();
    assert_eq!(denials.len(), 1);
    assert_eq!(denials[0].actor, "bob");
}

#[test]
fn test_log_and_delete_entries() {
    let ctx = TestContext::new();
    let food = ctx.approved_food(&ctx.alice, "Banana bread");
    let workout = ctx.workout(&ctx.bob, "Hill sprints", false);

    let entries = ctx
        .service
        .log_foods(
            &ctx.bob,
            vec![FoodLog {
                food_id: food.id,
                amount: 150.0,
            }],
        )
        .unwrap();
    assert_eq!(entries[0].totals.protein, 15.0);
    assert_eq!(entries[0].totals.calories, 300.0);

    let logged = ctx
        .service
        .log_workouts(
            &ctx.bob,
            vec![WorkoutLog {
                workout_id: workout.id,
                sets: 500,
                reps: 10,
                ..Default::default()
            }],
        )
        .unwrap();
    assert_eq!(logged[0].workouts[0].sets, 100);

    let err = ctx
        .service
        .delete_entry(&ctx.alice, entries[0].id)
        .unwrap_err();
    assert!(matches!(
        security_error(err),
        SecurityError::PermissionDenied(_)
    ));

    ctx.service.delete_entry(&ctx.bob, entries[0].id).unwrap();
    assert_eq!(ctx.service.list_entries(&ctx.bob).unwrap().len(), 1);
}

#[test]
fn test_log_rejects_hidden_items_and_bad_amounts() {
    let ctx = TestContext::new();
    let private = ctx.food(&ctx.alice, "Private oats", false);

    let err = ctx
        .service
        .log_foods(
            &ctx.bob,
            vec![FoodLog {
                food_id: private.id,
                amount: 100.0,
            }],
        )
        .unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));

    let err = ctx
        .service
        .log_foods(
            &ctx.alice,
            vec![FoodLog {
                food_id: private.id,
                amount: 0.0,
            }],
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
    assert!(ctx.service.list_entries(&ctx.alice).unwrap().is_empty());
}

#[test]
fn test_suspension_blocks_authentication() {
    let ctx = TestContext::new();

    ctx.service.suspend(&ctx.root, "bob", Some(7)).unwrap();
    let err = ctx.service.authenticate(Some("bob")).unwrap_err();
    assert!(matches!(security_error(err), SecurityError::Suspended { .. }));

    ctx.service.reinstate(&ctx.root, "bob").unwrap();
    assert!(ctx.service.authenticate(Some("bob")).is_ok());

    ctx.service.suspend(&ctx.root, "bob", None).unwrap();
    let banned = ctx.service.user("bob").unwrap();
    assert_eq!(
        banned.suspended_until.map(|until| until.format("%Y-%m-%d").to_string()),
        Some("9999-12-31".to_string())
    );

    assert!(ctx.service.suspend(&ctx.alice, "root", None).is_err());
}

#[test]
fn test_authentication_failures() {
    let ctx = TestContext::new();
    for claim in [None, Some(""), Some("mallory")] {
        let err = ctx.service.authenticate(claim).unwrap_err();
        assert!(matches!(
            security_error(err),
            SecurityError::Unauthenticated(_)
        ));
    }

    assert!(matches!(
        ctx.service.register("alice").unwrap_err(),
        Error::Conflict(_)
    ));
}

#[test]
fn test_oversized_suspension_is_rejected() {
    let ctx = TestContext::new();

    for days in [Some(0), Some(u32::MAX)] {
        let err = ctx.service.suspend(&ctx.root, "bob", days).unwrap_err();
        assert!(matches!(err, Error::Validation(_)), "{days:?} -> {err}");
    }
    assert!(ctx.service.authenticate(Some("bob")).is_ok());
}

impl TestContext {
    fn log_food(&self, user: &ActingUser, food: &Food, amount: f64) -> lifetrack_core::LogEntry {
        self.service
            .log_foods(
                user,
                vec![FoodLog {
                    food_id: food.id,
                    amount,
                }],
            )
            .unwrap()
            .remove(0)
    }
}

#[test]
fn test_shared_entries_need_approval() {
    let ctx = TestContext::new();
    let food = ctx.approved_food(&ctx.alice, "Banana bread");
    let entry = ctx.log_food(&ctx.bob, &food, 100.0);

    let shared = ctx.service.toggle_entry_privacy(&ctx.bob, entry.id).unwrap();
    assert!(shared.public && shared.pending_approval);
    assert!(ctx.service.feed(&ctx.alice).unwrap().is_empty());
    assert_eq!(ctx.service.pending(&ctx.root).unwrap().entries.len(), 1);

    assert!(matches!(
        security_error(ctx.service.approve_entry(&ctx.bob, entry.id).unwrap_err()),
        SecurityError::PermissionDenied(_)
    ));
    ctx.service.approve_entry(&ctx.root, entry.id).unwrap();

    let feed = ctx.service.feed(&ctx.alice).unwrap();
    assert_eq!(feed.len(), 1);
    assert_eq!(feed[0].user, "bob");

    // Unsharing hides it again.
    ctx.service.toggle_entry_privacy(&ctx.bob, entry.id).unwrap();
    assert!(ctx.service.feed(&ctx.alice).unwrap().is_empty());
    assert_eq!(ctx.service.feed(&ctx.bob).unwrap().len(), 1);
}

#[test]
fn test_reject_shared_entry() {
    let ctx = TestContext::new();
    let food = ctx.approved_food(&ctx.alice, "Banana bread");
    let entry = ctx.log_food(&ctx.bob, &food, 100.0);

    // Private entries are not in the queue.
    assert!(matches!(
        ctx.service.reject_entry(&ctx.root, entry.id).unwrap_err(),
        Error::NotFound(_)
    ));

    ctx.service.toggle_entry_privacy(&ctx.bob, entry.id).unwrap();
    ctx.service.reject_entry(&ctx.root, entry.id).unwrap();
    assert!(ctx.service.list_entries(&ctx.bob).unwrap().is_empty());
}

#[test]
fn test_entry_changes_are_owner_only() {
    let ctx = TestContext::new();
    let food = ctx.approved_food(&ctx.alice, "Banana bread");
    let entry = ctx.log_food(&ctx.bob, &food, 100.0);
    let yesterday = entry.date.pred_opt().unwrap();

    assert!(matches!(
        security_error(ctx.service.toggle_entry_privacy(&ctx.alice, entry.id).unwrap_err()),
        SecurityError::PermissionDenied(_)
    ));
    assert!(ctx
        .service
        .edit_entry_date(&ctx.alice, entry.id, yesterday)
        .unwrap_err()
        .is_security());

    let moved = ctx
        .service
        .edit_entry_date(&ctx.bob, entry.id, yesterday)
        .unwrap();
    assert_eq!(moved.date, yesterday);

    let tomorrow = entry.date.succ_opt().unwrap().succ_opt().unwrap();
    assert!(matches!(
        ctx.service
            .edit_entry_date(&ctx.bob, entry.id, tomorrow)
            .unwrap_err(),
        Error::Validation(_)
    ));
}

#[test]
fn test_date_macros_and_stats() {
    let ctx = TestContext::new();
    let food = ctx.approved_food(&ctx.alice, "Banana bread");
    let first = ctx.log_food(&ctx.bob, &food, 100.0);
    ctx.log_food(&ctx.bob, &food, 50.0);
    ctx.log_food(&ctx.alice, &food, 300.0);
    let today = first.date;

    let macros = ctx.service.date_macros(&ctx.bob, today).unwrap();
    assert_eq!(macros.protein, 15.0);
    assert_eq!(macros.calories, 300.0);

    let stats = ctx.service.stats(&ctx.bob).unwrap();
    assert_eq!(stats.streak, 1);
    assert_eq!(stats.total_entries, 2);
    assert_eq!(stats.today_calories, 300.0);
    assert_eq!(stats.avg_calories, 300.0);
    assert_eq!(stats.favorite_food.as_deref(), Some("Banana bread"));
    assert!(stats.favorite_workout.is_none());

    let yesterday = today.pred_opt().unwrap();
    assert_eq!(
        ctx.service.date_macros(&ctx.bob, yesterday).unwrap().calories,
        0.0
    );
}

#[test]
fn test_profile_round_trip() {
    let ctx = TestContext::new();

    let empty = ctx.service.profile(&ctx.bob).unwrap();
    assert!(empty.recommended.is_none());

    let view = ctx
        .service
        .update_profile(
            &ctx.bob,
            Profile {
                height: 175.0,
                weight: 70.0,
                goal: Goal::Maintain,
                calorie_goal: 2_400,
                ..Default::default()
            },
        )
        .unwrap();
    let recommended = view.recommended.unwrap();
    assert_eq!(recommended.protein, 126.0);
    assert_eq!(ctx.service.profile(&ctx.bob).unwrap().profile.calorie_goal, 2_400);

    let err = ctx
        .service
        .update_profile(
            &ctx.bob,
            Profile {
                weight: -5.0,
                ..Default::default()
            },
        )
        .unwrap_err();
    assert!(matches!(err, Error::Validation(_)));
}
