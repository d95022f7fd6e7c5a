// Integration tests for EventLinq Match

use eventlinq_match::core::{Matcher, MatcherConfig, TieBreak};
use eventlinq_match::models::AttendeeProfile;

const TOPICS: &[&str] = &[
    "ai", "fintech", "climate", "web3", "health", "devtools", "robotics", "edtech",
];
const GOALS: &[&str] = &["hire", "raise", "learn", "partner", "sell"];
const ROLES: &[&str] = &["Founder", "Engineer", "Investor", "Product Manager", "Designer", ""];
const SLOTS: &[&str] = &["Fri PM", "Sat AM", "Sat PM", "Sun AM"];

fn create_test_profile(id: &str, interests: &[&str], goals: &[&str]) -> AttendeeProfile {
    AttendeeProfile {
        id: id.to_string(),
        name: Some(format!("Attendee {}", id)),
        interests: interests.iter().map(|s| s.to_string()).collect(),
        goals: goals.iter().map(|s| s.to_string()).collect(),
        ..Default::default()
    }
}

/// Deterministic spread of profiles covering every factor
fn generated_pool(count: usize) -> Vec<AttendeeProfile> {
    (0..count)
        .map(|i| {
            let interests: Vec<&str> = TOPICS
                .iter()
                .enumerate()
                .filter(|(t, _)| (i + t) % 3 == 0)
                .map(|(_, topic)| *topic)
                .collect();
            let goals: Vec<&str> = GOALS
                .iter()
                .enumerate()
                .filter(|(g, _)| (i * 7 + g) % 4 == 0)
                .map(|(_, goal)| *goal)
                .collect();

            let mut profile = create_test_profile(&format!("p{:03}", i), &interests, &goals);
            profile.role = Some(ROLES[i % ROLES.len()].to_string());
            profile.company = if i % 5 == 0 { Some("Acme".to_string()) } else { None };
            profile.availability = Some(format!("{}, {}", SLOTS[i % SLOTS.len()], SLOTS[(i / 2) % SLOTS.len()]));
            profile
        })
        .collect()
}

#[test]
fn test_single_shared_interest_scores_a_fifth() {
    let matcher = Matcher::with_defaults();
    let requester = create_test_profile("me", &["ai", "fintech"], &[]);
    let candidate = create_test_profile("1", &["ai", "climate"], &[]);

    let suggestions = matcher.compute_suggestions(&requester, &[candidate], 3);

    assert_eq!(suggestions.len(), 1);
    assert!(suggestions[0].rationale.contains("Shared interests (33%)"));
    assert!((suggestions[0].score - 0.2).abs() < 1e-9);
}

#[test]
fn test_founder_engineer_pair_gets_both_bonuses() {
    let matcher = Matcher::with_defaults();
    let mut requester = create_test_profile("me", &["ai", "fintech", "web3"], &[]);
    requester.role = Some("Founder".to_string());
    let mut candidate = create_test_profile("1", &["ai", "fintech", "health"], &[]);
    candidate.role = Some("Engineer".to_string());

    let suggestions = matcher.compute_suggestions(&requester, &[candidate], 3);

    assert_eq!(suggestions.len(), 1);
    let rationale = &suggestions[0].rationale;
    assert!(rationale.contains("Strong interest overlap"));
    assert!(rationale.contains("Complementary roles"));
    // 0.5 * 0.6 + 0.05 + 0.05
    assert!((suggestions[0].score - 0.4).abs() < 1e-9);
}

#[test]
fn test_same_company_without_shared_tags_is_dropped() {
    let matcher = Matcher::with_defaults();
    let mut requester = create_test_profile("me", &["ai"], &["hire"]);
    requester.company = Some("Acme".to_string());
    let mut candidate = create_test_profile("1", &["gardening"], &["learn"]);
    candidate.company = Some(" ACME ".to_string());

    let suggestions = matcher.compute_suggestions(&requester, &[candidate], 3);

    assert!(suggestions.is_empty());
}

#[test]
fn test_empty_pool_yields_no_suggestions() {
    let matcher = Matcher::with_defaults();
    let requester = create_test_profile("me", &["ai"], &[]);

    let suggestions = matcher.compute_suggestions(&requester, &[], 3);

    assert!(suggestions.is_empty());
}

#[test]
fn test_shared_time_slot_adds_availability_clause() {
    let matcher = Matcher::with_defaults();
    let mut requester = create_test_profile("me", &["ai"], &[]);
    requester.availability = Some("Fri PM, Sat AM".to_string());
    let mut candidate = create_test_profile("1", &["ai", "climate"], &[]);
    candidate.availability = Some("Sat AM".to_string());

    let suggestions = matcher.compute_suggestions(&requester, &[candidate], 3);

    assert_eq!(suggestions.len(), 1);
    assert!(suggestions[0].rationale.contains("Overlapping availability"));
    // 0.5 * 0.6 + 0.1
    assert!((suggestions[0].score - 0.4).abs() < 1e-9);
}

#[test]
fn test_availability_alone_is_not_signal() {
    let matcher = Matcher::new(MatcherConfig {
        min_score: 0.0,
        ..MatcherConfig::default()
    });
    let mut requester = create_test_profile("me", &["ai"], &[]);
    requester.availability = Some("Fri PM".to_string());
    let mut candidate = create_test_profile("1", &["climate"], &[]);
    candidate.availability = Some("Fri PM".to_string());

    assert!(matcher.compute_suggestions(&requester, &[candidate], 3).is_empty());
}

#[test]
fn test_properties_over_generated_pool() {
    let matcher = Matcher::with_defaults();
    let pool = generated_pool(120);

    for requester in pool.iter().step_by(7) {
        for limit in [0, 1, 3, 10, 200] {
            let suggestions = matcher.compute_suggestions(requester, &pool, limit);

            assert!(suggestions.len() <= limit, "limit {} exceeded", limit);

            for s in &suggestions {
                assert_ne!(s.partner_id, requester.id, "requester suggested to itself");
                assert!((0.0..=1.0).contains(&s.score), "score {} out of range", s.score);
                assert!(s.score >= matcher.config().min_score, "score below threshold");
                assert!(
                    s.rationale.contains("Shared interests") || s.rationale.contains("Similar goals"),
                    "suggestion without signal: {}",
                    s.rationale
                );
            }

            for pair in suggestions.windows(2) {
                assert!(pair[0].score >= pair[1].score, "suggestions not sorted by score");
            }
        }
    }
}

#[test]
fn test_event_scope_never_crossed() {
    let matcher = Matcher::with_defaults();
    let mut pool = generated_pool(40);
    for (i, profile) in pool.iter_mut().enumerate() {
        profile.event_id = Some(if i % 2 == 0 { "ev-a" } else { "ev-b" }.to_string());
    }

    let requester = pool[0].clone();
    let suggestions = matcher.compute_suggestions(&requester, &pool, 50);

    for s in &suggestions {
        let partner = pool.iter().find(|p| p.id == s.partner_id).unwrap();
        assert_eq!(partner.event_id, requester.event_id);
    }
}

#[test]
fn test_partner_id_tie_break_is_order_independent() {
    let matcher = Matcher::new(MatcherConfig {
        tie_break: TieBreak::PartnerId,
        ..MatcherConfig::default()
    });
    let pool = generated_pool(60);
    let mut reversed = pool.clone();
    reversed.reverse();

    let requester = create_test_profile("me", &["ai", "climate", "robotics"], &["hire"]);

    let forward = matcher.compute_suggestions(&requester, &pool, 20);
    let backward = matcher.compute_suggestions(&requester, &reversed, 20);

    assert_eq!(forward, backward);
}

#[test]
fn test_malformed_profile_json_still_matches() {
    let matcher = Matcher::with_defaults();
    let requester: AttendeeProfile =
        serde_json::from_str(r#"{"id": "me", "interests": ["AI"], "goals": null, "role": null}"#)
            .unwrap();
    let candidate: AttendeeProfile =
        serde_json::from_str(r#"{"id": "1", "interests": ["ai"], "goals": 42}"#).unwrap();

    let suggestions = matcher.compute_suggestions(&requester, &[candidate], 3);

    assert_eq!(suggestions.len(), 1);
    assert_eq!(suggestions[0].rationale, "Shared interests (100%)");
}
