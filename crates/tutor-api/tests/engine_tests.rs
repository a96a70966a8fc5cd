use chrono::Duration;
use tutor_adaptive::Tier;
use tutor_api::learning::{
    calculate_streak, generate_personalized_prompt, get_adapted_difficulty, identify_weak_areas,
};
use tutor_db::{models::ProfilePreferences, repositories::profile};

use crate::common::{
    TestStateBuilder,
    db::{self, SeedSession},
    default_now,
};

#[tokio::test]
async fn test_adapted_difficulty_without_history() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let user_id = db::create_test_user(&state.pool).await;
    let mut conn = state.pool.acquire().await.unwrap();

    let tier = get_adapted_difficulty(&mut conn, user_id, "es-ES").await.unwrap();
    assert_eq!(tier, Tier::Beginner);

    db::set_tier(&state.pool, user_id, "Advanced").await;
    let tier = get_adapted_difficulty(&mut conn, user_id, "es-ES").await.unwrap();
    assert_eq!(tier, Tier::Advanced);

    drop(conn);
    db::delete_test_user(&state.pool, user_id).await;
}

#[tokio::test]
async fn test_adapted_difficulty_uses_five_newest_sessions_of_language() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let user_id = db::create_test_user(&state.pool).await;
    let now = default_now();
    db::set_tier(&state.pool, user_id, "Intermediate").await;

    // Old poor sessions fall outside the window of five
    for offset in 0..3 {
        db::seed_session(
            &state.pool,
            user_id,
            SeedSession {
                start: now - Duration::days(20 + offset),
                accuracy_score: 10.0,
                ..Default::default()
            },
        )
        .await;
    }
    for offset in 0..5 {
        db::seed_session(
            &state.pool,
            user_id,
            SeedSession {
                start: now - Duration::hours(offset + 1),
                accuracy_score: 90.0,
                error_types: &["Grammar", "Spelling"],
                ..Default::default()
            },
        )
        .await;
    }
    // Poor sessions in another language never count
    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            target_language: "de-DE",
            start: now,
            accuracy_score: 5.0,
            ..Default::default()
        },
    )
    .await;

    let mut conn = state.pool.acquire().await.unwrap();
    let first = get_adapted_difficulty(&mut conn, user_id, "es-ES").await.unwrap();
    let second = get_adapted_difficulty(&mut conn, user_id, "es-ES").await.unwrap();
    assert_eq!(first, Tier::Advanced);
    // Reading never mutates the stored tier
    assert_eq!(second, first);

    let german = get_adapted_difficulty(&mut conn, user_id, "de-DE").await.unwrap();
    assert_eq!(german, Tier::Beginner);

    drop(conn);
    db::delete_test_user(&state.pool, user_id).await;
}

#[tokio::test]
async fn test_weak_areas_ranking_window_and_cap() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let user_id = db::create_test_user(&state.pool).await;
    let now = default_now();

    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            start: now - Duration::days(2),
            error_types: &[
                "Grammar",
                "Grammar",
                "Grammar",
                "Vocabulary",
                "Vocabulary",
                "Articles",
                "Articles",
                "Spelling",
                "Tense",
                "Word Order",
            ],
            ..Default::default()
        },
    )
    .await;
    // Outside the 30-day window
    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            start: now - Duration::days(31),
            error_types: &["Pronunciation", "Pronunciation", "Pronunciation", "Pronunciation"],
            ..Default::default()
        },
    )
    .await;
    // Another language
    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            target_language: "it-IT",
            start: now - Duration::days(1),
            error_types: &["Gender", "Gender", "Gender", "Gender"],
            ..Default::default()
        },
    )
    .await;

    let mut conn = state.pool.acquire().await.unwrap();
    let weak_areas = identify_weak_areas(&mut conn, user_id, "es-ES", now)
        .await
        .unwrap();
    assert_eq!(
        weak_areas,
        vec!["Grammar", "Articles", "Vocabulary", "Spelling", "Tense"]
    );

    let italian = identify_weak_areas(&mut conn, user_id, "it-IT", now).await.unwrap();
    assert_eq!(italian, vec!["Gender"]);

    let empty = identify_weak_areas(&mut conn, user_id, "pt-BR", now).await.unwrap();
    assert!(empty.is_empty());

    drop(conn);
    db::delete_test_user(&state.pool, user_id).await;
}

#[tokio::test]
async fn test_personalized_prompt_uses_profile_and_weak_areas() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let user_id = db::create_test_user(&state.pool).await;
    let now = default_now();

    profile::upsert_preferences(
        &state.pool,
        user_id,
        &ProfilePreferences {
            target_language: "es-ES".to_string(),
            focus_areas: "Listening,Travel".to_string(),
            learning_goals: String::new(),
        },
    )
    .await
    .unwrap();
    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            start: now - Duration::days(1),
            error_types: &["Grammar", "Grammar", "Vocabulary"],
            ..Default::default()
        },
    )
    .await;

    let mut conn = state.pool.acquire().await.unwrap();
    let prompt = generate_personalized_prompt(&mut conn, user_id, "es-ES", "Travel", now)
        .await
        .unwrap();

    assert!(prompt.starts_with("You are an AI language tutor teaching es-ES to a Beginner level student."));
    assert!(prompt.contains("Current Topic: Travel"));
    assert!(prompt.contains("Student's Weak Areas: Grammar, Vocabulary"));
    assert!(prompt.contains("Focus Areas: Listening,Travel"));
    assert!(prompt.contains("- Provide extra attention to: Grammar, Vocabulary"));
    assert!(prompt.contains("- Adapt your language complexity to Beginner level"));

    drop(conn);
    db::delete_test_user(&state.pool, user_id).await;
}

#[tokio::test]
async fn test_streak_counts_consecutive_days() {
    let state = TestStateBuilder::new()
        .build()
        .await
        .expect("Failed to create test state");
    let user_id = db::create_test_user(&state.pool).await;
    let now = default_now();
    let mut conn = state.pool.acquire().await.unwrap();

    assert_eq!(calculate_streak(&mut conn, user_id, "es-ES", now).await.unwrap(), 0);

    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            start: now - Duration::days(1),
            ..Default::default()
        },
    )
    .await;
    // Nothing yet today, yesterday still counts
    assert_eq!(calculate_streak(&mut conn, user_id, "es-ES", now).await.unwrap(), 1);

    for start in [now - Duration::days(2), now - Duration::days(2) + Duration::hours(1)] {
        db::seed_session(
            &state.pool,
            user_id,
            SeedSession {
                start,
                ..Default::default()
            },
        )
        .await;
    }
    assert_eq!(calculate_streak(&mut conn, user_id, "es-ES", now).await.unwrap(), 2);

    // A gap ends the streak
    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            start: now - Duration::days(4),
            ..Default::default()
        },
    )
    .await;
    assert_eq!(calculate_streak(&mut conn, user_id, "es-ES", now).await.unwrap(), 2);

    // Active sessions count, and today extends the streak
    db::seed_session(
        &state.pool,
        user_id,
        SeedSession {
            start: now - Duration::hours(1),
            ended: false,
            ..Default::default()
        },
    )
    .await;
    assert_eq!(calculate_streak(&mut conn, user_id, "es-ES", now).await.unwrap(), 3);

    // Streaks are per language
    assert_eq!(calculate_streak(&mut conn, user_id, "fr-FR", now).await.unwrap(), 0);

    drop(conn);
    db::delete_test_user(&state.pool, user_id).await;
}
