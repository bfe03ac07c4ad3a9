//! Performance benchmarks for menu-label.
//!
//! Run with: `cargo bench`
//!
//! Benchmarks include:
//! - Candidate extraction from a small portal page (~2KB)
//! - Pool building over synthetic sessions of growing count
//! - URL matching against a populated pool

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use menu_label::extractor::extract_candidates;
use menu_label::{best_menu_for_url, Options, PoolBuilder, Session};
use url::Url;

const PORTAL_HTML: &str = r#"
<!DOCTYPE html>
<html lang="ko">
<head>
    <meta charset="UTF-8">
    <title>Portal</title>
    <script>
        function openFaq() { window.open('/help/faq.do'); }
        var goNotice = function (id) { location.href = '/board/notice/view.do?id=' + id; };
    </script>
</head>
<body>
    <div id="gnb">
        <ul>
            <li><a href="/board/list.do">게시판</a>
                <ul>
                    <li><a href="/board/notice/list.do">공지사항</a></li>
                    <li><a href="/board/free/list.do">자유게시판</a></li>
                    <li><a href="/board/qna/list.do">Q&amp;A</a></li>
                </ul>
            </li>
            <li><a href="/mypage/main.do">마이페이지</a>
                <ul>
                    <li><a href="/mypage/profile.do">회원정보</a></li>
                    <li><a href="/mypage/orders.do">주문내역</a></li>
                </ul>
            </li>
        </ul>
    </div>
    <div class="content">
        <form action="/search.do"><input name="q"><button>검색</button></form>
        <button onclick="openFaq()">FAQ</button>
        <select onchange="location.href=this.value">
            <option value="/site/a">Site A</option>
            <option value="/site/b">Site B</option>
        </select>
        <p><a href="/board/notice/view.do?id=10">첫 번째 공지</a></p>
    </div>
</body>
</html>
"#;

fn session(n: usize) -> Session {
    Session::new(
        format!("GET /page/{n}.do HTTP/1.1\r\nHost: bench.example\r\n\r\n"),
        format!("HTTP/1.1 200 OK\r\nContent-Type: text/html; charset=UTF-8\r\n\r\n{PORTAL_HTML}"),
    )
}

fn bench_extract_candidates(c: &mut Criterion) {
    let options = Options::default();
    let url = Url::parse("https://bench.example/board/list.do").unwrap_or_else(|e| panic!("{e}"));

    c.bench_function("extract_candidates", |b| {
        b.iter(|| extract_candidates(black_box(PORTAL_HTML), &url, black_box(&options)));
    });
}

fn bench_build_pool(c: &mut Criterion) {
    let options = Options::default();
    let mut group = c.benchmark_group("build_pool");

    for count in [1usize, 10, 100] {
        let sessions: Vec<Session> = (0..count).map(session).collect();
        group.throughput(Throughput::Elements(count as u64));
        group.bench_with_input(BenchmarkId::new("sessions", count), &sessions, |b, sessions| {
            b.iter(|| PoolBuilder::new(&options).build(black_box(sessions), None));
        });
    }

    group.finish();
}

fn bench_match(c: &mut Criterion) {
    let options = Options::default();
    let sessions: Vec<Session> = (0..10).map(session).collect();
    let (pool, _) = PoolBuilder::new(&options).build(&sessions, None);

    c.bench_function("best_menu_for_url", |b| {
        b.iter(|| {
            best_menu_for_url(
                black_box("https://bench.example/board/notice/view.do?id=99"),
                &pool,
                None,
                58.0,
            )
        });
    });
}

criterion_group!(benches, bench_extract_candidates, bench_build_pool, bench_match);
criterion_main!(benches);
