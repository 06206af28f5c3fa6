// Integration tests exercising the services together against a real
// database file, the way the server wires them up.

use auntrack::models::category::Category;
use auntrack::models::event::{Event, EventPatch};
use auntrack::models::permission::Action;
use auntrack::models::user::{NewUser, Role, UserPatch};
use auntrack::services::auth::{authenticate, TokenService};
use auntrack::services::category::CategoryService;
use auntrack::services::database::schema::{SEED_ADMIN_PASSWORD, SEED_ADMIN_USERNAME};
use auntrack::services::database::Database;
use auntrack::services::event::EventService;
use auntrack::services::export::events_to_csv;
use auntrack::services::user::{UserError, UserService};

use chrono::{DateTime, Local, TimeZone};
use pretty_assertions::assert_eq;

fn dt(y: i32, mo: u32, d: u32, h: u32) -> DateTime<Local> {
    Local.with_ymd_and_hms(y, mo, d, h, 0, 0).unwrap()
}

fn open_db(dir: &tempfile::TempDir) -> Database {
    let path = dir.path().join("auntrack.db");
    let db = Database::new(path.to_str().expect("utf8 path")).expect("Failed to create database");
    db.initialize_schema().expect("Failed to initialize schema");
    db
}

#[test]
fn test_first_boot_seeds_login_and_token() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    // The seeded super admin can log in immediately.
    let user = authenticate(db.connection(), SEED_ADMIN_USERNAME, SEED_ADMIN_PASSWORD)
        .expect("seed login works");
    assert_eq!(user.role, Role::SuperAdmin);

    // And receives a verifiable token carrying full permissions.
    let tokens = TokenService::new("integration-secret");
    let token = tokens.issue(&user).expect("token issued");
    let claims = tokens.verify(&token).expect("token verifies");
    assert!(claims.can_perform(Action::ManageUsers));
    assert!(claims.can_perform(Action::AddEvent));
}

#[test]
fn test_schema_survives_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let category_id;

    {
        let db = open_db(&dir);
        let categories = CategoryService::new(db.connection());
        category_id = categories
            .create(Category::new("Finance", "#22c55e"))
            .expect("create category")
            .id
            .unwrap();
    } // connection closed

    {
        let db = open_db(&dir);
        let categories = CategoryService::new(db.connection());
        let reloaded = categories.get(category_id).expect("query works");
        assert_eq!(reloaded.expect("category persisted").name, "Finance");

        // Re-initializing must not duplicate seed data.
        let all = categories.list().unwrap();
        assert_eq!(all.len(), 3); // two starters + Finance
    }
}

#[test]
fn test_event_lifecycle_with_join() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    db.connection().execute("DELETE FROM events", []).unwrap();

    let categories = CategoryService::new(db.connection());
    let events = EventService::new(db.connection());

    let hr = categories
        .list()
        .unwrap()
        .into_iter()
        .find(|c| c.name == "HR Events")
        .unwrap();
    let hr_id = hr.id.unwrap();

    let created = events
        .create(
            Event::new("HR Awards", hr_id, dt(2025, 8, 1, 9), dt(2025, 8, 2, 17), &hr.color)
                .unwrap(),
        )
        .expect("create event");
    assert_eq!(created.category_name.as_deref(), Some("HR Events"));

    // Drag-style reschedule: shift both endpoints, keep everything else.
    let patch = EventPatch::reschedule(dt(2025, 8, 10, 9), dt(2025, 8, 11, 17));
    let moved = events.update(created.id.unwrap(), patch).expect("reschedule");
    assert_eq!(moved.title, "HR Awards");
    assert_eq!(moved.start, dt(2025, 8, 10, 9));
    assert_eq!(moved.duration_days(), 1);

    events.delete(moved.id.unwrap()).expect("delete event");
    assert!(events.list().unwrap().is_empty());
}

#[test]
fn test_category_delete_cascades_to_events() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    db.connection().execute("DELETE FROM events", []).unwrap();

    let categories = CategoryService::new(db.connection());
    let events = EventService::new(db.connection());

    let temp = categories
        .create(Category::new("Pop-up", "#ef4444"))
        .unwrap();
    let temp_id = temp.id.unwrap();

    events
        .create(Event::new("Launch", temp_id, dt(2025, 8, 4, 9), dt(2025, 8, 4, 17), "#ef4444").unwrap())
        .unwrap();
    assert_eq!(events.list().unwrap().len(), 1);

    categories.delete(temp_id).expect("delete category");
    assert!(events.list().unwrap().is_empty(), "events cascade with their category");
}

#[test]
fn test_user_management_flow() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);
    let users = UserService::new(db.connection());

    let viewer = users
        .create(NewUser {
            username: "viewer".to_string(),
            email: "viewer@example.com".to_string(),
            password: "pass123".to_string(),
            name: "Viewer".to_string(),
            role: None,
            can_edit: false,
            can_add: false,
        })
        .expect("create user");

    // A plain user without flags cannot touch events.
    assert!(!viewer.can_perform(Action::AddEvent));
    assert!(!viewer.can_perform(Action::EditEvent));

    // Granting can_add changes only what it names.
    let granted = users
        .update(
            viewer.id.unwrap(),
            UserPatch {
                can_add: Some(true),
                ..Default::default()
            },
        )
        .expect("grant can_add");
    assert!(granted.can_perform(Action::AddEvent));
    assert!(!granted.can_perform(Action::EditEvent));

    // The seeded super admin cannot be deleted, ever.
    let seeded = users
        .list()
        .unwrap()
        .into_iter()
        .find(|u| u.role == Role::SuperAdmin)
        .unwrap();
    assert!(matches!(
        users.delete(seeded.id.unwrap()),
        Err(UserError::SuperAdminProtected)
    ));

    // A normal account can be removed and can no longer log in.
    users.delete(granted.id.unwrap()).expect("delete user");
    assert!(authenticate(db.connection(), "viewer", "pass123").is_err());
}

#[test]
fn test_export_reflects_stored_events() {
    let dir = tempfile::tempdir().unwrap();
    let db = open_db(&dir);

    // Seeded sample events end up in the spreadsheet export.
    let events = EventService::new(db.connection()).list().unwrap();
    assert!(!events.is_empty());

    let csv = events_to_csv(&events);
    let mut lines = csv.lines();
    assert_eq!(
        lines.next().unwrap(),
        "Title,Category,Start,End,Color,Description"
    );
    assert_eq!(lines.count(), events.len());
    assert!(csv.contains("Marathon Run"));
}
