use std::collections::BTreeSet;

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::SmallRng;

use quizmaster::bank::question::Question;
use quizmaster::engine::scoring::compute_score;
use quizmaster::session::answer::UserAnswer;
use quizmaster::session::builder::build_session;
use quizmaster::session::settings::QuizSettings;

fn make_pool(count: u64) -> Vec<Question> {
    let categories = ["Ownership", "Errors", "Traits", "Collections", "Async"];
    (0..count)
        .map(|i| Question {
            id: i,
            question: format!("Question {i}?"),
            options: vec!["a".into(), "b".into(), "c".into(), "d".into()],
            correct_answer_index: (i % 4) as usize,
            source: String::new(),
            category: categories[(i % 5) as usize].to_string(),
        })
        .collect()
}

fn bench_build(c: &mut Criterion) {
    let pool = make_pool(2000);
    let all = QuizSettings::all_categories(50, 600);
    let some = QuizSettings::new(
        BTreeSet::from(["Traits".to_string(), "Async".to_string()]),
        50,
        600,
    );

    c.bench_function("build_session (2000 questions, all categories)", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| build_session(black_box(&pool), black_box(&all), &mut rng))
    });

    c.bench_function("build_session (2000 questions, 2 categories)", |b| {
        let mut rng = SmallRng::seed_from_u64(42);
        b.iter(|| build_session(black_box(&pool), black_box(&some), &mut rng))
    });
}

fn bench_score(c: &mut Criterion) {
    let pool = make_pool(500);
    let answers: Vec<UserAnswer> = pool
        .iter()
        .enumerate()
        .map(|(i, q)| {
            let mut a = UserAnswer::unanswered(q);
            if i % 5 != 0 {
                a.record(q, i % 4);
            }
            a
        })
        .collect();

    c.bench_function("compute_score (500 answers)", |b| {
        b.iter(|| compute_score(black_box(&answers)))
    });
}

criterion_group!(benches, bench_build, bench_score);
criterion_main!(benches);
