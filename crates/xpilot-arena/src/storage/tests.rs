//! Storage layer tests for the Focus Arena.

use super::db::{ArenaDatabase, DatabaseError};
use super::models::{MatchResult, UserRole};
use super::queries::{apply_rating, award_xp, fetch_eligible_user};
use super::queries_challenges::{
    NewChallenge, apply_transition, find_open_between, increment_pause, insert_challenge,
};
use super::queries_results::{finished_counts, insert_match_result, win_counts};
use crate::arena::{ChallengeStatus, Side, Transition};

async fn test_db() -> ArenaDatabase {
    let db = ArenaDatabase::open_in_memory().await.unwrap();
    db.create_user("u1", "alice", UserRole::Worker).await.unwrap();
    db.create_user("u2", "bob", UserRole::Worker).await.unwrap();
    db.create_user("u3", "carol", UserRole::Student)
        .await
        .unwrap();
    db
}

async fn insert(db: &ArenaDatabase, id: &str, challenger: &str, opponent: &str) {
    insert_challenge(
        db.pool(),
        NewChallenge {
            id,
            challenger_id: challenger,
            opponent_id: opponent,
            task_description: "write tests",
            duration_minutes: 30,
            created_at: 1000,
        },
    )
    .await
    .unwrap();
}

fn result_for(challenge_id: &str, winner_id: Option<&str>) -> MatchResult {
    MatchResult {
        id: format!("r-{challenge_id}"),
        challenge_id: challenge_id.to_string(),
        winner_id: winner_id.map(str::to_string),
        focus_score_a: 45.0,
        focus_score_b: 40.0,
        xp_awarded: 40,
        elo_change_a: 12,
        elo_change_b: -12,
        created_at: 2000,
    }
}

// === User tests ===

#[tokio::test]
async fn new_user_starts_at_initial_rating() {
    let db = test_db().await;
    let user = db.get_user("u1").await.unwrap();

    assert_eq!(user.name, "alice");
    assert_eq!(user.role, UserRole::Worker);
    assert_eq!(user.rating, 1200);
    assert_eq!(user.xp, 0);
    assert_eq!(user.rank_points, 0);
}

#[tokio::test]
async fn get_missing_user_is_not_found() {
    let db = test_db().await;
    let err = db.get_user("nobody").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn only_workers_are_eligible() {
    let db = test_db().await;

    assert!(fetch_eligible_user(db.pool(), "u1").await.unwrap().is_some());
    assert!(fetch_eligible_user(db.pool(), "u3").await.unwrap().is_none());

    let ids: Vec<String> = db
        .list_eligible_users()
        .await
        .unwrap()
        .into_iter()
        .map(|u| u.id)
        .collect();
    assert_eq!(ids, vec!["u1", "u2"]);
}

#[tokio::test]
async fn rank_points_only_accumulate_gains() {
    let db = test_db().await;

    apply_rating(db.pool(), "u1", 1212, 12).await.unwrap();
    apply_rating(db.pool(), "u1", 1200, -12).await.unwrap();

    let user = db.get_user("u1").await.unwrap();
    assert_eq!(user.rating, 1200);
    assert_eq!(user.rank_points, 12);

    let err = apply_rating(db.pool(), "ghost", 1300, 5).await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn rating_below_floor_is_rejected_by_schema() {
    let db = test_db().await;
    assert!(apply_rating(db.pool(), "u1", 99, -1101).await.is_err());
}

// === XP ledger tests ===

#[tokio::test]
async fn award_xp_updates_total_and_ledger() {
    let db = test_db().await;
    let mut conn = db.pool().acquire().await.unwrap();
    award_xp(&mut conn, "u1", 30, "Focus Arena match", 100)
        .await
        .unwrap();
    award_xp(&mut conn, "u1", 10, "Focus Arena match", 200)
        .await
        .unwrap();
    drop(conn);

    assert_eq!(db.get_user("u1").await.unwrap().xp, 40);

    let log = db.list_xp_log("u1", 50).await.unwrap();
    assert_eq!(log.len(), 2);
    assert_eq!(log[0].xp_awarded, 10);
    assert_eq!(log[0].created_at, 200);
    assert_eq!(log[1].xp_awarded, 30);

    let limited = db.list_xp_log("u1", 1).await.unwrap();
    assert_eq!(limited.len(), 1);
}

#[tokio::test]
async fn award_xp_to_missing_user_writes_nothing() {
    let db = test_db().await;
    let mut conn = db.pool().acquire().await.unwrap();
    let err = award_xp(&mut conn, "ghost", 30, "x", 100)
        .await
        .unwrap_err();
    drop(conn);

    assert!(matches!(err, DatabaseError::NotFound(_)));
    assert!(db.list_xp_log("ghost", 50).await.unwrap().is_empty());
}

// === Challenge tests ===

#[tokio::test]
async fn insert_and_get_challenge_with_names() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;

    let row = db.get_challenge_with_names("c1").await.unwrap();
    assert_eq!(row.challenge.status, ChallengeStatus::Pending);
    assert_eq!(row.challenge.duration_minutes, 30);
    assert_eq!(row.challenge.challenger_pauses, 0);
    assert_eq!(row.challenger_name, "alice");
    assert_eq!(row.opponent_name, "bob");

    assert_eq!(row.challenge.side_of("u1"), Some(Side::Challenger));
    assert_eq!(row.challenge.side_of("u2"), Some(Side::Opponent));
    assert_eq!(row.challenge.side_of("u3"), None);
}

#[tokio::test]
async fn open_pair_found_in_either_direction() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;

    assert!(find_open_between(db.pool(), "u1", "u2").await.unwrap().is_some());
    assert!(find_open_between(db.pool(), "u2", "u1").await.unwrap().is_some());
    assert!(find_open_between(db.pool(), "u1", "u3").await.unwrap().is_none());
}

#[tokio::test]
async fn schema_rejects_second_open_challenge_for_pair() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;

    let dup = insert_challenge(
        db.pool(),
        NewChallenge {
            id: "c2",
            challenger_id: "u2",
            opponent_id: "u1",
            task_description: "again",
            duration_minutes: 30,
            created_at: 1001,
        },
    )
    .await;
    assert!(dup.is_err());
}

#[tokio::test]
async fn schema_rejects_self_challenge() {
    let db = test_db().await;
    let res = insert_challenge(
        db.pool(),
        NewChallenge {
            id: "c1",
            challenger_id: "u1",
            opponent_id: "u1",
            task_description: "solo",
            duration_minutes: 30,
            created_at: 1000,
        },
    )
    .await;
    assert!(res.is_err());
}

#[tokio::test]
async fn transitions_are_guarded_by_current_status() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;

    // Settle before accept does nothing.
    assert!(
        !apply_transition(db.pool(), "c1", Transition::Settle, 50)
            .await
            .unwrap()
    );

    assert!(
        apply_transition(db.pool(), "c1", Transition::Accept, 100)
            .await
            .unwrap()
    );
    assert!(
        !apply_transition(db.pool(), "c1", Transition::Accept, 150)
            .await
            .unwrap()
    );

    assert!(
        apply_transition(db.pool(), "c1", Transition::Settle, 200)
            .await
            .unwrap()
    );
    assert!(
        !apply_transition(db.pool(), "c1", Transition::Settle, 300)
            .await
            .unwrap()
    );

    let c = db.get_challenge("c1").await.unwrap();
    assert_eq!(c.status, ChallengeStatus::Finished);
    assert_eq!(c.start_time, Some(100));
    assert_eq!(c.end_time, Some(200));
}

#[tokio::test]
async fn pause_increment_only_while_active() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;

    assert!(
        increment_pause(db.pool(), "c1", Side::Challenger)
            .await
            .unwrap()
            .is_none()
    );

    apply_transition(db.pool(), "c1", Transition::Accept, 100)
        .await
        .unwrap();
    let counters = increment_pause(db.pool(), "c1", Side::Opponent)
        .await
        .unwrap();
    assert_eq!(counters, Some((0, 1)));
    let counters = increment_pause(db.pool(), "c1", Side::Challenger)
        .await
        .unwrap();
    assert_eq!(counters, Some((1, 1)));

    apply_transition(db.pool(), "c1", Transition::Settle, 200)
        .await
        .unwrap();
    assert!(
        increment_pause(db.pool(), "c1", Side::Opponent)
            .await
            .unwrap()
            .is_none()
    );
}

#[tokio::test]
async fn list_open_excludes_finished_and_strangers() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;
    apply_transition(db.pool(), "c1", Transition::Accept, 100)
        .await
        .unwrap();
    apply_transition(db.pool(), "c1", Transition::Settle, 200)
        .await
        .unwrap();
    insert(&db, "c2", "u2", "u1").await;

    let u1 = db.list_open_challenges("u1").await.unwrap();
    assert_eq!(u1.len(), 1);
    assert_eq!(u1[0].challenge.id, "c2");

    assert!(db.list_open_challenges("u3").await.unwrap().is_empty());
}

// === Match result tests ===

#[tokio::test]
async fn one_result_per_challenge() {
    let db = test_db().await;
    insert(&db, "c1", "u1", "u2").await;

    insert_match_result(db.pool(), &result_for("c1", Some("u1")))
        .await
        .unwrap();

    let mut again = result_for("c1", Some("u2"));
    again.id = "r-other".into();
    assert!(insert_match_result(db.pool(), &again).await.is_err());

    let stored = db.get_match_result("c1").await.unwrap();
    assert_eq!(stored.winner_id.as_deref(), Some("u1"));
    assert_eq!(stored.elo_change_a, 12);
}

#[tokio::test]
async fn missing_match_result_is_not_found() {
    let db = test_db().await;
    let err = db.get_match_result("c1").await.unwrap_err();
    assert!(matches!(err, DatabaseError::NotFound(_)));
}

#[tokio::test]
async fn win_and_finished_counts() {
    let db = test_db().await;
    db.create_user("u4", "dave", UserRole::Worker).await.unwrap();

    for (id, a, b, winner) in [
        ("c1", "u1", "u2", Some("u1")),
        ("c2", "u2", "u4", None),
        ("c3", "u4", "u1", Some("u1")),
    ] {
        insert(&db, id, a, b).await;
        apply_transition(db.pool(), id, Transition::Accept, 100)
            .await
            .unwrap();
        apply_transition(db.pool(), id, Transition::Settle, 200)
            .await
            .unwrap();
        insert_match_result(db.pool(), &result_for(id, winner))
            .await
            .unwrap();
    }
    // An open challenge is not counted.
    insert(&db, "c4", "u1", "u2").await;

    let wins = win_counts(db.pool()).await.unwrap();
    assert_eq!(wins.get("u1"), Some(&2));
    assert_eq!(wins.get("u2"), None);

    let finished = finished_counts(db.pool()).await.unwrap();
    assert_eq!(finished.get("u1"), Some(&2));
    assert_eq!(finished.get("u2"), Some(&2));
    assert_eq!(finished.get("u4"), Some(&2));
    assert_eq!(finished.get("u3"), None);
}
