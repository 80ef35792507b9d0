//! Storage-backed flows against a real Postgres.
//!
//! Ignored by default. Run with `DATABASE_URL` pointing at a scratch database:
//! `cargo test --test 30_live_database -- --ignored`

use chrono::Local;

use gram_panchayat_api::config::AppConfig;
use gram_panchayat_api::database::repository::users;
use gram_panchayat_api::database::Database;
use gram_panchayat_api::domain::{NewDeathRecord, Role, Status};
use gram_panchayat_api::filter::{DeathFilter, Pagination};
use gram_panchayat_api::middleware::auth::AuthUser;
use gram_panchayat_api::services::onboarding_service::{NewGramPanchayat, Person};
use gram_panchayat_api::services::{DeathService, OnboardingService, Viewer};

async fn live_database() -> Database {
    let _ = dotenvy::dotenv();
    let mut config = AppConfig::development();
    config.database.url = Some(std::env::var("DATABASE_URL").expect("DATABASE_URL for live tests"));

    let db = Database::connect(&config).await.expect("connect");
    db.migrate().await.expect("migrate");
    db
}

/// Ten-digit phone numbers unique to one run.
struct Phones(u32);

impl Phones {
    fn new() -> Self {
        Self(rand::random::<u32>() % 100_000_000)
    }

    fn person(&self, name: &str, n: u32) -> Person {
        Person {
            name: format!("{} {}", name, self.0),
            phone_no: format!("9{:08}{}", self.0, n),
        }
    }
}

async fn sachiv_viewer(db: &Database, user_id: i64, person: &Person) -> Viewer {
    let role = users::role_by_name(db.pool(), "Sachiv").await.unwrap().unwrap();
    let user = AuthUser {
        id: user_id,
        name: person.name.clone(),
        phone_no: person.phone_no.clone(),
        role_id: role.id,
        role: Role::Sachiv,
    };
    Viewer::load(db, user).await.unwrap()
}

fn death(gram_panchayat_id: i64, gaon_id: i64) -> NewDeathRecord {
    NewDeathRecord {
        name: "Ram Prasad".into(),
        phone_no: "9000000000".into(),
        age: 71,
        gender: "male".into(),
        aadhar_number: "123412341234".into(),
        address: "Ward 4".into(),
        date_of_death: Local::now().date_naive(),
        gram_panchayat_id,
        gaon_id,
    }
}

fn first_page() -> DeathFilter {
    DeathFilter::new(Pagination { limit: 100, page: 0 })
}

#[tokio::test]
#[ignore = "requires DATABASE_URL"]
async fn registration_fans_out_and_listing_stays_in_scope() {
    let db = live_database().await;
    let onboarding = OnboardingService::new(db.clone());
    let deaths = DeathService::new(db.clone());
    let phones = Phones::new();
    let today = Local::now().date_naive();

    let sachiv_role = users::role_by_name(db.pool(), "Sachiv").await.unwrap().unwrap();
    onboarding
        .create_task_type(&format!("Pension stop {}", phones.0), &[sachiv_role.id])
        .await
        .unwrap();

    let tehsil = onboarding
        .create_tehsil(&format!("Tehsil {}", phones.0), &phones.person("SDM", 0))
        .await
        .unwrap();

    let (ours_sachiv, ours_sahayak) = (phones.person("Sachiv A", 1), phones.person("Sahayak A", 2));
    let ours = onboarding
        .create_gram_panchayat(&NewGramPanchayat {
            name: format!("GP A {}", phones.0),
            tehsil_id: tehsil.id,
            block_id: None,
            sachiv: ours_sachiv.clone(),
            sahayak: ours_sahayak.clone(),
        })
        .await
        .unwrap();
    let ours_gaon = onboarding
        .create_gaon(&format!("Gaon A {}", phones.0), ours.id, &phones.person("Lekhpal A", 3))
        .await
        .unwrap();

    let theirs_sachiv = phones.person("Sachiv B", 4);
    let theirs = onboarding
        .create_gram_panchayat(&NewGramPanchayat {
            name: format!("GP B {}", phones.0),
            tehsil_id: tehsil.id,
            block_id: None,
            sachiv: theirs_sachiv.clone(),
            sahayak: phones.person("Sahayak B", 5),
        })
        .await
        .unwrap();
    let theirs_gaon = onboarding
        .create_gaon(&format!("Gaon B {}", phones.0), theirs.id, &phones.person("Lekhpal B", 6))
        .await
        .unwrap();

    // one new task per task type, created with the record
    let viewer = sachiv_viewer(&db, ours.user_ids[0], &ours_sachiv).await;
    let death_id = deaths.register(&viewer, death(ours.id, ours_gaon.id), today).await.unwrap();

    let type_count: i64 = sqlx::query_scalar("SELECT count(*) FROM task_types WHERE archived_at IS NULL")
        .fetch_one(db.pool())
        .await
        .unwrap();
    let new_tasks: i64 = sqlx::query_scalar("SELECT count(*) FROM task WHERE death_id = $1 AND status = 'new'")
        .bind(death_id)
        .fetch_one(db.pool())
        .await
        .unwrap();
    assert!(type_count > 0);
    assert_eq!(new_tasks, type_count);

    // registering outside the assigned gram panchayat is refused
    let err = deaths
        .register(&viewer, death(theirs.id, theirs_gaon.id), today)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    let other = sachiv_viewer(&db, theirs.user_ids[0], &theirs_sachiv).await;
    let their_death = deaths.register(&other, death(theirs.id, theirs_gaon.id), today).await.unwrap();

    let listed = deaths.list_for_viewer(&viewer, Status::New, first_page()).await.unwrap();
    let ids: Vec<i64> = listed.items.iter().map(|r| r.id).collect();
    assert!(ids.contains(&death_id));
    assert!(!ids.contains(&their_death));

    // asking for someone else's gram panchayat yields nothing
    let mut foreign = first_page();
    foreign.gram_panchayat_ids = vec![theirs.id];
    let listed = deaths.list_for_viewer(&viewer, Status::New, foreign).await.unwrap();
    assert!(listed.items.is_empty());
    assert_eq!(listed.total_count, 0);

    // same phone, different role
    let err = onboarding
        .create_gaon(&format!("Gaon C {}", phones.0), ours.id, &ours_sachiv)
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 400);

    // same phone, same role: the existing users are reused
    let again = onboarding
        .create_gram_panchayat(&NewGramPanchayat {
            name: format!("GP C {}", phones.0),
            tehsil_id: tehsil.id,
            block_id: None,
            sachiv: ours_sachiv,
            sahayak: ours_sahayak,
        })
        .await
        .unwrap();
    assert_eq!(again.user_ids, ours.user_ids);
}
