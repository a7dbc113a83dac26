use rand::Rng;
use std::time::Duration;

pub async fn sleep_with_jitter(base_ms: u64, jitter_ms: u64) {
    let jitter = rand::rng().random_range(0..=jitter_ms);
    let total = base_ms.saturating_add(jitter);
    if total > 0 {
        tokio::time::sleep(Duration::from_millis(total)).await;
    }
}
