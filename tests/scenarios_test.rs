//! End-to-end behaviour over captured sessions: build a pool, then match URLs.

use menu_label::scoring::score;
use menu_label::{
    best_menu_for_url, build_candidate_pool, Candidate, CandidatePool, Options, PoolBuilder, Session,
};
use std::collections::BTreeSet;

fn html_session(host: &str, target: &str, body: &str) -> Session {
    Session::new(
        format!("GET {target} HTTP/1.1\r\nHost: {host}\r\n\r\n"),
        format!("HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=utf-8\r\n\r\n{body}"),
    )
}

fn contents(pool: &CandidatePool) -> BTreeSet<(String, Candidate)> {
    pool.host_keys()
        .flat_map(|host| pool.get(host).iter().map(move |c| (host.to_string(), c.clone())))
        .collect()
}

const GNB: &str = r#"<ul class="gnb"><li><a href="/board">게시판</a><ul><li><a href="/board/sub">하위</a></li></ul></li></ul>"#;

#[test]
fn scenario_a_nested_menu_path_label() {
    let pool = build_candidate_pool(&[html_session("ex.com", "/", GNB)], None, 200);
    let result = best_menu_for_url("https://ex.com/board/sub", &pool, None, 58.0);

    assert_eq!(result.label.as_deref(), Some("[게시판] > [하위]"));
    assert!(result.score >= 58.0);
    assert_eq!(result.matched_url.as_deref(), Some("https://ex.com/board/sub"));
}

#[test]
fn scenario_b_function_resolved_button() {
    let body = r#"<script>function openFaq(){window.open('/help/faq')}</script>
                  <button onclick="openFaq()">FAQ</button>"#;
    let pool = build_candidate_pool(&[html_session("ex.com", "/", body)], None, 200);

    assert!(pool.contains("ex.com", &Candidate::new("FAQ", "https://ex.com/help/faq")));
}

#[test]
fn scenario_c_numeric_segments_normalize() {
    let options = Options::default();
    let s = score(
        "https://ex.com/user/123/profile",
        "https://ex.com/user/456/profile",
        "Profile",
        &options,
    );
    assert!((s.jaccard - 40.0).abs() < 1e-9);
    assert_eq!(s.last_segment, 20.0);
    assert!(s.total >= 85.0, "total {}", s.total);
}

#[test]
fn scenario_d_default_port_shares_host_key() {
    let pool = build_candidate_pool(&[html_session("example.com:443", "/", GNB)], None, 200);
    assert!(!pool.get("example.com").is_empty());

    let result = best_menu_for_url("https://example.com/board/sub", &pool, None, 58.0);
    assert_eq!(result.label.as_deref(), Some("[게시판] > [하위]"));
}

#[test]
fn scenario_e_below_threshold_reports_score() {
    let pool = build_candidate_pool(&[html_session("ex.com", "/", GNB)], None, 200);
    let query = "https://ex.com/board/other";

    let reference = best_menu_for_url(query, &pool, None, 0.0);
    assert!(reference.score > 0.0);

    let just_above = reference.score + 0.1;
    let result = best_menu_for_url(query, &pool, None, just_above);
    assert_eq!(result.label, None);
    assert_eq!(result.matched_url, None);
    assert_eq!(result.score, reference.score);
}

#[test]
fn scores_are_bounded() {
    let pool = build_candidate_pool(&[html_session("ex.com", "/", GNB)], None, 200);
    for query in [
        "https://ex.com/",
        "https://ex.com/board",
        "https://ex.com/board/sub",
        "https://ex.com/a/b/c/d/e/f.do?x=1",
        "https://ex.com/%EA%B2%8C%EC%8B%9C%ED%8C%90",
    ] {
        let result = best_menu_for_url(query, &pool, None, 58.0);
        assert!((0.0..=100.0).contains(&result.score), "{query}: {}", result.score);
    }
}

#[test]
fn raising_threshold_never_confirms_more() {
    let pool = build_candidate_pool(&[html_session("ex.com", "/", GNB)], None, 200);
    let queries = ["https://ex.com/board", "https://ex.com/board/sub/1", "https://ex.com/other"];

    for query in queries {
        let mut confirmed_before = true;
        for threshold in [0.0, 20.0, 40.0, 58.0, 80.0, 100.0, 101.0] {
            let confirmed = best_menu_for_url(query, &pool, None, threshold).label.is_some();
            assert!(confirmed_before || !confirmed, "{query} at {threshold}");
            confirmed_before = confirmed;
        }
    }
}

#[test]
fn membership_is_order_independent() {
    let sessions = vec![
        html_session("ex.com", "/", GNB),
        html_session("ex.com", "/board", r#"<a href="/board/write">글쓰기</a><a href="/board">게시판</a>"#),
        html_session("other.org", "/", r#"<nav><ul><li><a href="/shop">Shop</a></li></ul></nav>"#),
    ];
    let reversed: Vec<Session> = sessions.iter().rev().cloned().collect();

    let forward = build_candidate_pool(&sessions, None, 200);
    let backward = build_candidate_pool(&reversed, None, 200);
    assert_eq!(contents(&forward), contents(&backward));
}

#[test]
fn report_explains_skipped_sessions() {
    let sessions = vec![
        html_session("ex.com", "/", GNB),
        Session::new(
            "GET /api HTTP/1.1\r\nHost: ex.com\r\n\r\n",
            "HTTP/1.1 200 OK\r\nContent-Type: application/json\r\n\r\n{}",
        ),
        html_session("ex.com", "/empty", "<p>nothing to see</p>"),
        Session::new("GET /x HTTP/1.1\r\n\r\n", "HTTP/1.1 200 OK\r\nContent-Type: text/html\r\n\r\n<a href='/y'>Y</a>"),
        Session::new("", ""),
    ];

    let options = Options::default();
    let (pool, report) = PoolBuilder::new(&options).build(&sessions, None);

    assert_eq!(report.total(), 5);
    assert_eq!(report.indexed(), 1);
    assert_eq!(report.skipped(), 4);
    assert_eq!(report.failed(), 2);
    assert_eq!(pool.get("ex.com").len(), 2);
}
