//! Shared training fixtures for model, pipeline and dataset tests

use super::forest::ForestConfig;
use super::training::{train_with, TrainedModel};
use crate::logic::dataset::Sample;

pub const VULNERABLE_SNIPPETS: [&str; 6] = [
    "query = \"SELECT * FROM users WHERE id = '\" + user_id + \"'\"",
    "cursor.execute('DELETE FROM orders WHERE id = ' + order_id)",
    "sql = \"INSERT INTO logs VALUES ('\" + msg + \"')\"",
    "db.query('UPDATE accounts SET balance = ' + amount + ' WHERE id = ' + id)",
    "stmt = 'SELECT name FROM t WHERE a = ' + a + ' UNION SELECT pass FROM u'",
    "q = \"DROP TABLE \" + table_name + \" WHERE x = '\" + x + \"'\"",
];

pub const SAFE_SNIPPETS: [&str; 6] = [
    "let total = items.iter().map(|i| i.price).sum::<u64>();",
    "fn add(a: i32, b: i32) -> i32 { a + b }",
    "println!(\"hello {}\", name);",
    "const MAX_RETRIES: usize = 3;",
    "let mut buf = Vec::with_capacity(64);",
    "return Ok(value);",
];

/// Four copies of each snippet, half vulnerable
pub fn labeled_corpus() -> Vec<Sample> {
    let mut samples = Vec::new();
    for _ in 0..4 {
        samples.extend(VULNERABLE_SNIPPETS.iter().map(|s| Sample::from_snippet(s, true)));
        samples.extend(SAFE_SNIPPETS.iter().map(|s| Sample::from_snippet(s, false)));
    }
    samples
}

/// Ten-tree forest over [`labeled_corpus`]
pub fn small_model(seed: u64) -> TrainedModel {
    let config = ForestConfig {
        n_estimators: 10,
        seed,
        ..Default::default()
    };
    match train_with(&labeled_corpus(), &config) {
        Ok(model) => model,
        Err(e) => panic!("fixture corpus failed to train: {}", e),
    }
}
