use std::collections::{HashMap, HashSet};
use std::time::{Duration, Instant};

use parking_lot::RwLock;
use serde::Serialize;

use crate::models::Portal;
use crate::routes::{RouteCatalog, RouteEntry};

#[derive(Debug, Clone, Serialize)]
pub struct PreloadCandidate {
    pub path: String,
    pub description: String,
    pub visits: u64,
}

const MAX_TRACKED_CLIENTS: usize = 4096;
const CLIENT_IDLE_TTL: Duration = Duration::from_secs(30 * 60);
const MAX_CLIENT_ID_LEN: usize = 128;

#[derive(Debug)]
struct LastSeen {
    path: String,
    at: Instant,
}

/// Tracks where each client currently is and which routes get visited, so
/// the front end can prefetch likely next pages. One instance is built by
/// the composition root and shared by handle.
///
/// Only caller-supplied client ids are tracked. Ids longer than 128 bytes are
/// ignored and the per-client map stays under a fixed size.
#[derive(Debug)]
pub struct NavigationHelper {
    catalog: RouteCatalog,
    current: RwLock<HashMap<String, LastSeen>>,
    visits: RwLock<HashMap<String, u64>>,
    preload_limit: usize,
}

impl NavigationHelper {
    pub fn new(catalog: RouteCatalog, preload_limit: usize) -> Self {
        Self {
            catalog,
            current: RwLock::new(HashMap::new()),
            visits: RwLock::new(HashMap::new()),
            preload_limit: preload_limit.max(1),
        }
    }

    pub fn catalog(&self) -> &RouteCatalog {
        &self.catalog
    }

    pub fn current_path(&self, client_id: &str) -> Option<String> {
        let client_id = trackable(client_id)?;
        self.current
            .read()
            .get(client_id)
            .map(|seen| seen.path.clone())
    }

    /// Counts the visit for ranking. The client's current page is only
    /// remembered when an id was supplied.
    pub fn record_visit(&self, client_id: Option<&str>, path: &str) {
        self.record_visit_at(client_id, path, Instant::now());
    }

    fn record_visit_at(&self, client_id: Option<&str>, path: &str, now: Instant) {
        if let Some(client_id) = client_id.and_then(trackable) {
            let mut current = self.current.write();
            if current.len() >= MAX_TRACKED_CLIENTS && !current.contains_key(client_id) {
                prune(&mut current, now);
            }
            current.insert(
                client_id.to_string(),
                LastSeen {
                    path: path.to_string(),
                    at: now,
                },
            );
        }
        *self.visits.write().entry(path.to_string()).or_default() += 1;
    }

    pub fn visits(&self, path: &str) -> u64 {
        self.visits.read().get(path).copied().unwrap_or(0)
    }

    pub fn tracked_clients(&self) -> usize {
        self.current.read().len()
    }

    /// Routes of the portal most likely to be opened next: by visit count,
    /// then table order, skipping the page the client is on.
    pub fn preload_candidates(
        &self,
        portal: Portal,
        client_id: Option<&str>,
    ) -> Vec<PreloadCandidate> {
        let current = client_id.and_then(|client_id| self.current_path(client_id));
        let visits = self.visits.read();

        let mut ranked = self
            .catalog
            .table(portal)
            .routes
            .iter()
            .enumerate()
            .filter(|(_, route)| current.as_deref() != Some(route.path.as_str()))
            .map(|(idx, route)| (idx, route, visits.get(&route.path).copied().unwrap_or(0)))
            .collect::<Vec<(usize, &RouteEntry, u64)>>();

        ranked.sort_by(|lhs, rhs| rhs.2.cmp(&lhs.2).then(lhs.0.cmp(&rhs.0)));

        ranked
            .into_iter()
            .take(self.preload_limit)
            .map(|(_, route, visits)| PreloadCandidate {
                path: route.path.clone(),
                description: route.description.clone(),
                visits,
            })
            .collect()
    }
}

fn trackable(client_id: &str) -> Option<&str> {
    let client_id = client_id.trim();
    (!client_id.is_empty() && client_id.len() <= MAX_CLIENT_ID_LEN).then_some(client_id)
}

/// Drops idle clients; when everyone is still active, keeps the most recent half.
fn prune(current: &mut HashMap<String, LastSeen>, now: Instant) {
    current.retain(|_, seen| now.duration_since(seen.at) <= CLIENT_IDLE_TTL);
    if current.len() < MAX_TRACKED_CLIENTS {
        return;
    }

    let mut seen_at = current.values().map(|seen| seen.at).collect::<Vec<_>>();
    seen_at.sort_unstable();
    let cutoff = seen_at[seen_at.len() - MAX_TRACKED_CLIENTS / 2];
    current.retain(|_, seen| seen.at >= cutoff);
    if current.len() >= MAX_TRACKED_CLIENTS {
        // all entries share one timestamp
        let keep = current
            .keys()
            .take(MAX_TRACKED_CLIENTS / 2)
            .cloned()
            .collect::<HashSet<_>>();
        current.retain(|client_id, _| keep.contains(client_id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ranks_by_visits_and_skips_current() {
        let helper = NavigationHelper::new(RouteCatalog::builtin(), 3);
        helper.record_visit(Some("other"), "/hub/reports");
        helper.record_visit(Some("other"), "/hub/reports");
        helper.record_visit(Some("other"), "/hub/quality");
        helper.record_visit(Some("client-a"), "/hub/dashboard");

        let candidates = helper.preload_candidates(Portal::Hub, Some("client-a"));
        let paths = candidates.iter().map(|c| c.path.as_str()).collect::<Vec<_>>();
        assert_eq!(paths, vec!["/hub/reports", "/hub/quality", "/hub/inventory"]);
        assert_eq!(candidates[0].visits, 2);
    }

    #[test]
    fn tracks_current_path_per_client() {
        let helper = NavigationHelper::new(RouteCatalog::builtin(), 4);
        assert_eq!(helper.current_path("a"), None);
        helper.record_visit(Some("a"), "/farmer/crops");
        helper.record_visit(Some("b"), "/farmer/weather");
        assert_eq!(helper.current_path("a").as_deref(), Some("/farmer/crops"));
        assert_eq!(helper.visits("/farmer/weather"), 1);
    }

    #[test]
    fn anonymous_and_oversized_ids_are_not_tracked() {
        let helper = NavigationHelper::new(RouteCatalog::builtin(), 3);
        let huge = "x".repeat(16 * 1024);
        helper.record_visit(None, "/hub/orders");
        helper.record_visit(Some("   "), "/hub/orders");
        helper.record_visit(Some(&huge), "/hub/orders");

        assert_eq!(helper.tracked_clients(), 0);
        assert_eq!(helper.current_path(&huge), None);
        assert_eq!(helper.visits("/hub/orders"), 3);
    }

    #[test]
    fn client_map_stays_bounded() {
        let helper = NavigationHelper::new(RouteCatalog::builtin(), 3);
        let now = Instant::now();
        for idx in 0..50_000 {
            helper.record_visit_at(Some(&format!("client-{idx}")), "/hub/orders", now);
        }

        assert!(helper.tracked_clients() <= MAX_TRACKED_CLIENTS);
        assert_eq!(helper.visits("/hub/orders"), 50_000);
    }

    #[test]
    fn idle_clients_are_pruned_first() {
        let helper = NavigationHelper::new(RouteCatalog::builtin(), 3);
        let start = Instant::now();
        for idx in 0..MAX_TRACKED_CLIENTS - 1 {
            helper.record_visit_at(Some(&format!("idle-{idx}")), "/farmer/crops", start);
        }
        let later = start + CLIENT_IDLE_TTL / 2;
        helper.record_visit_at(Some("active"), "/farmer/weather", later);

        let after_ttl = start + CLIENT_IDLE_TTL + Duration::from_secs(1);
        helper.record_visit_at(Some("newcomer"), "/farmer/market", after_ttl);

        assert_eq!(helper.tracked_clients(), 2);
        assert_eq!(helper.current_path("active").as_deref(), Some("/farmer/weather"));
        assert_eq!(helper.current_path("newcomer").as_deref(), Some("/farmer/market"));
    }
}
