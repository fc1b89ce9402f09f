use std::sync::Arc;
use std::time::Duration;

use portal_shell::models::{Classroom, Course};
use portal_shell::transport::{ApiState, MockPortalApi};
use portal_shell::workspace::{TeacherWorkspace, WorkspaceCache, WorkspaceStatus};
use tokio::sync::mpsc;
use uuid::Uuid;

// --- Fixtures ---

fn classroom(name: &str) -> Classroom {
    Classroom {
        id: Uuid::new_v4(),
        name: name.to_string(),
        subject: "Mathematics".to_string(),
        student_count: 24,
        updated_at: None,
    }
}

fn course(code: &str) -> Course {
    Course {
        id: Uuid::new_v4(),
        code: code.to_string(),
        title: "Course".to_string(),
    }
}

fn cache_for(api: &Arc<MockPortalApi>) -> WorkspaceCache {
    let (tx, _rx) = mpsc::unbounded_channel();
    WorkspaceCache::new(api.clone() as ApiState, tx)
}

// --- Aggregate Status ---

#[tokio::test]
async fn initialize_reaches_ready_with_both_collections() {
    let api = Arc::new(MockPortalApi::with_data(
        vec![classroom("7A")],
        vec![course("MATH-7")],
    ));
    let cache = cache_for(&api);
    assert_eq!(cache.status(), WorkspaceStatus::Idle);

    cache.initialize().await;

    let snapshot = cache.snapshot();
    assert_eq!(snapshot.status, WorkspaceStatus::Ready);
    assert_eq!(snapshot.payload.classrooms.len(), 1);
    assert_eq!(snapshot.payload.coordinated_courses.len(), 1);
    assert_eq!(snapshot.last_error, None);
    assert!(cache.is_coordinator());
}

#[tokio::test]
async fn status_is_loading_while_any_member_is_outstanding() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    api.set_response_delay(Duration::from_millis(80));
    let cache = cache_for(&api);

    let worker = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.initialize().await })
    };
    tokio::time::sleep(Duration::from_millis(20)).await;
    assert_eq!(cache.status(), WorkspaceStatus::Loading);

    worker.await.expect("fetch cycle completes");
    assert_eq!(cache.status(), WorkspaceStatus::Ready);
    assert!(!cache.is_coordinator(), "no coordinated courses were served");
}

#[tokio::test]
async fn one_failed_member_yields_error_and_leaves_payload_untouched() {
    let api = Arc::new(MockPortalApi::with_data(
        vec![classroom("7A")],
        vec![course("MATH-7")],
    ));
    let cache = cache_for(&api);

    // First cycle succeeds and fills the payload.
    cache.initialize().await;
    let before = cache.snapshot().payload;

    // Second cycle fails on one member only.
    api.set_fail_courses(true);
    api.set_courses(vec![course("SCI-3")]);
    cache.refetch().await;

    let snapshot = cache.snapshot();
    assert_eq!(snapshot.status, WorkspaceStatus::Error);
    assert!(snapshot.last_error.expect("trigger error retained").contains("courses"));
    // No partial data: the previous complete bundle is still visible.
    assert_eq!(snapshot.payload, before);
}

#[tokio::test]
async fn first_load_failure_reports_error_with_empty_payload() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    api.set_fail_courses(true);
    let cache = cache_for(&api);

    cache.initialize().await;

    let snapshot = cache.snapshot();
    assert_eq!(snapshot.status, WorkspaceStatus::Error);
    assert!(snapshot.payload.classrooms.is_empty());
    assert!(snapshot.payload.coordinated_courses.is_empty());
}

// --- Refetch Semantics ---

#[tokio::test]
async fn refetch_replaces_the_bundle_wholesale() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    let cache = cache_for(&api);
    cache.initialize().await;

    api.set_classrooms(vec![classroom("8B"), classroom("9C")]);
    api.set_courses(vec![course("MATH-7")]);
    cache.refetch().await;

    let snapshot = cache.snapshot();
    assert_eq!(snapshot.status, WorkspaceStatus::Ready);
    assert_eq!(snapshot.payload.classrooms.len(), 2);
    assert_eq!(snapshot.payload.classrooms[0].name, "8B");
    assert!(cache.is_coordinator());
}

#[tokio::test]
async fn superseded_completion_is_discarded() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("stale")], vec![]));
    api.set_response_delay(Duration::from_millis(80));
    let cache = cache_for(&api);

    // Slow first cycle, still in flight when the second one starts.
    let slow = {
        let cache = cache.clone();
        tokio::spawn(async move { cache.initialize().await })
    };
    tokio::time::sleep(Duration::from_millis(10)).await;

    api.set_response_delay(Duration::ZERO);
    api.set_classrooms(vec![classroom("fresh")]);
    cache.refetch().await;
    assert_eq!(cache.snapshot().payload.classrooms[0].name, "fresh");

    // The slow completion lands afterwards and must not win.
    slow.await.expect("slow cycle completes");
    let snapshot = cache.snapshot();
    assert_eq!(snapshot.status, WorkspaceStatus::Ready);
    assert_eq!(snapshot.payload.classrooms[0].name, "fresh");
    assert_eq!(api.classroom_calls(), 2);
}

// --- Invalidation Signal ---

#[tokio::test]
async fn invalidation_triggers_refetch_and_exactly_one_notice() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    let mut workspace = TeacherWorkspace::mount(api.clone() as ApiState).await;
    assert_eq!(workspace.cache.status(), WorkspaceStatus::Ready);
    assert_eq!(api.classroom_calls(), 1);

    api.set_courses(vec![course("MATH-7")]);
    api.fire_invalidation();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(workspace.cache.status(), WorkspaceStatus::Ready);
    assert!(workspace.cache.is_coordinator(), "refetch picked up rotated entitlements");
    assert_eq!(api.classroom_calls(), 2);

    // Exactly one notice per signal.
    assert!(workspace.notices.try_recv().is_ok());
    assert!(workspace.notices.try_recv().is_err());

    api.fire_invalidation();
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(workspace.notices.try_recv().is_ok());
    assert!(workspace.notices.try_recv().is_err());
}

#[tokio::test]
async fn invalidation_passes_through_loading_before_settling() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    let workspace = TeacherWorkspace::mount(api.clone() as ApiState).await;
    assert_eq!(workspace.cache.status(), WorkspaceStatus::Ready);

    api.set_response_delay(Duration::from_millis(80));
    api.fire_invalidation();
    tokio::time::sleep(Duration::from_millis(30)).await;
    assert_eq!(workspace.cache.status(), WorkspaceStatus::Loading);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert_eq!(workspace.cache.status(), WorkspaceStatus::Ready);
}

#[tokio::test]
async fn invalidation_refetch_failure_surfaces_like_any_other() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    let mut workspace = TeacherWorkspace::mount(api.clone() as ApiState).await;

    api.set_fail_classrooms(true);
    api.fire_invalidation();
    tokio::time::sleep(Duration::from_millis(100)).await;

    assert_eq!(workspace.cache.status(), WorkspaceStatus::Error);
    assert!(workspace.notices.try_recv().is_ok(), "notice still raised");
}

#[tokio::test]
async fn dropping_the_subscription_releases_the_handler() {
    let api = Arc::new(MockPortalApi::with_data(vec![classroom("7A")], vec![]));
    let workspace = TeacherWorkspace::mount(api.clone() as ApiState).await;
    assert_eq!(api.classroom_calls(), 1);

    drop(workspace.invalidation);
    tokio::time::sleep(Duration::from_millis(20)).await;

    api.fire_invalidation();
    tokio::time::sleep(Duration::from_millis(100)).await;
    // A torn-down workspace is never refreshed posthumously.
    assert_eq!(api.classroom_calls(), 1);
}
