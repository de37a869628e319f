//! Bounded-concurrency probe dispatch.

use std::future::Future;

use futures::{StreamExt, stream};

use pulse_entity::{NewHealthCheck, Site};

/// Probe every site with at most `worker_count` probes in flight.
///
/// Returns exactly one outcome per input site, in completion order.
/// Callers that need to correlate outcomes back to sites use the
/// `site_id` carried in each [`NewHealthCheck`].
pub async fn dispatch<P, Fut>(sites: Vec<Site>, worker_count: usize, probe: P) -> Vec<NewHealthCheck>
where
    P: Fn(Site) -> Fut,
    Fut: Future<Output = NewHealthCheck>,
{
    let concurrency = worker_count.max(1);
    stream::iter(sites)
        .map(probe)
        .buffer_unordered(concurrency)
        .collect()
        .await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use chrono::Utc;
    use uuid::Uuid;

    fn sites(n: usize) -> Vec<Site> {
        (0..n)
            .map(|i| Site {
                id: Uuid::new_v4(),
                user_id: Uuid::new_v4(),
                url: format!("http://site-{i}.test/"),
                created_at: Utc::now(),
            })
            .collect()
    }

    #[tokio::test]
    async fn one_outcome_per_site() {
        let input = sites(12);
        let expected: HashSet<Uuid> = input.iter().map(|s| s.id).collect();

        let outcomes = dispatch(input, 5, |site| async move {
            NewHealthCheck::up(site.id, 200, 1)
        })
        .await;

        assert_eq!(outcomes.len(), 12);
        let seen: HashSet<Uuid> = outcomes.iter().map(|c| c.site_id).collect();
        assert_eq!(seen, expected);
    }

    #[tokio::test(start_paused = true)]
    async fn in_flight_probes_never_exceed_worker_count() {
        let in_flight = Arc::new(AtomicUsize::new(0));
        let peak = Arc::new(AtomicUsize::new(0));

        let outcomes = {
            let in_flight = Arc::clone(&in_flight);
            let peak = Arc::clone(&peak);
            dispatch(sites(20), 5, move |site| {
                let in_flight = Arc::clone(&in_flight);
                let peak = Arc::clone(&peak);
                async move {
                    let now = in_flight.fetch_add(1, Ordering::SeqCst) + 1;
                    peak.fetch_max(now, Ordering::SeqCst);
                    tokio::time::sleep(Duration::from_millis(10)).await;
                    in_flight.fetch_sub(1, Ordering::SeqCst);
                    NewHealthCheck::down(site.id, 10)
                }
            })
            .await
        };

        assert_eq!(outcomes.len(), 20);
        assert!(peak.load(Ordering::SeqCst) <= 5);
        assert_eq!(in_flight.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let outcomes = dispatch(Vec::new(), 5, |site| async move {
            NewHealthCheck::down(site.id, 0)
        })
        .await;
        assert!(outcomes.is_empty());
    }

    #[tokio::test]
    async fn zero_worker_count_still_makes_progress() {
        let outcomes = dispatch(sites(3), 0, |site| async move {
            NewHealthCheck::up(site.id, 204, 2)
        })
        .await;
        assert_eq!(outcomes.len(), 3);
    }
}
