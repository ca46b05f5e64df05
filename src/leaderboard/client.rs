//! Remote leaderboard clients
//!
//! Both trait methods are best-effort: failures are logged and turned into
//! `false` / an empty list so callers can fall back to the local cache.

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

use super::LeaderboardEntry;
use super::auth::AnonymousAuth;
use super::transport::Transport;
use crate::error::RemoteError;
use crate::settings::LeaderboardConfig;

const CREATE_ENTRY_MUTATION: &str = "\
mutation CreateLeaderboardEntry($input: CreateLeaderboardEntryInput!) {
  createLeaderboardEntry(input: $input) { id name score maxLevel accuracy date }
}";

const LIST_BY_SCORE_QUERY: &str = "\
query ListLeaderboardEntriesByScore($limit: Int) {
  listLeaderboardEntriesByScore(limit: $limit) { id name score maxLevel accuracy date }
}";

/// Remote score storage
#[allow(async_fn_in_trait)]
pub trait LeaderboardClient {
    /// Record a score. Returns false on any failure.
    async fn submit(&self, entry: &LeaderboardEntry) -> bool;
    /// Top `limit` entries by score, or empty on any failure.
    async fn fetch_top(&self, limit: usize) -> Vec<LeaderboardEntry>;
}

/// Client used when no endpoint is configured
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineLeaderboard;

impl LeaderboardClient for OfflineLeaderboard {
    async fn submit(&self, _entry: &LeaderboardEntry) -> bool {
        log::debug!("Offline: score kept locally only");
        false
    }

    async fn fetch_top(&self, _limit: usize) -> Vec<LeaderboardEntry> {
        Vec::new()
    }
}

#[derive(Debug, Deserialize)]
struct GraphQlResponse<T> {
    data: Option<T>,
    #[serde(default)]
    errors: Vec<GraphQlError>,
}

#[derive(Debug, Deserialize)]
struct GraphQlError {
    message: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ListData {
    #[serde(default)]
    list_leaderboard_entries_by_score: Option<Vec<LeaderboardEntry>>,
}

/// GraphQL leaderboard API with anonymous auth
#[derive(Debug)]
pub struct GraphqlLeaderboard<T> {
    transport: T,
    auth: AnonymousAuth,
    endpoint: String,
}

impl<T: Transport> GraphqlLeaderboard<T> {
    pub fn new(transport: T, config: LeaderboardConfig) -> Self {
        Self {
            transport,
            endpoint: config.graphql_endpoint.clone(),
            auth: AnonymousAuth::new(config),
        }
    }

    async fn request<D: DeserializeOwned>(
        &self,
        query: &str,
        variables: serde_json::Value,
        token: Option<&str>,
    ) -> Result<Option<D>, RemoteError> {
        if self.endpoint.is_empty() {
            return Err(RemoteError::NotConfigured);
        }
        let mut headers = vec![("Content-Type", "application/json")];
        if let Some(token) = token {
            headers.push(("Authorization", token));
        }
        let body = json!({ "query": query, "variables": variables }).to_string();
        let response = self
            .transport
            .post_json(&self.endpoint, &headers, body)
            .await?;

        let parsed: GraphQlResponse<D> = serde_json::from_str(&response)?;
        if !parsed.errors.is_empty() {
            let messages: Vec<_> = parsed.errors.into_iter().map(|e| e.message).collect();
            return Err(RemoteError::GraphQl(messages.join("; ")));
        }
        Ok(parsed.data)
    }

    /// Submit, reporting why it failed
    pub async fn try_submit(&self, entry: &LeaderboardEntry) -> Result<(), RemoteError> {
        let token = self.auth.token_for(&self.transport, &entry.name).await?;
        let input = json!({
            "name": entry.name,
            "score": entry.score,
            "maxLevel": entry.max_level,
            "accuracy": entry.accuracy,
            "date": entry.date,
        });
        self.request::<serde_json::Value>(
            CREATE_ENTRY_MUTATION,
            json!({ "input": input }),
            Some(token.as_str()),
        )
        .await?;
        Ok(())
    }

    /// Fetch, reporting why it failed
    pub async fn try_fetch_top(&self, limit: usize) -> Result<Vec<LeaderboardEntry>, RemoteError> {
        let token = self.auth.current_token();
        let data: Option<ListData> = self
            .request(LIST_BY_SCORE_QUERY, json!({ "limit": limit }), token.as_deref())
            .await?;
        Ok(data
            .and_then(|d| d.list_leaderboard_entries_by_score)
            .unwrap_or_default())
    }
}

impl<T: Transport> LeaderboardClient for GraphqlLeaderboard<T> {
    async fn submit(&self, entry: &LeaderboardEntry) -> bool {
        match self.try_submit(entry).await {
            Ok(()) => {
                log::info!("Score {} for '{}' saved to cloud", entry.score, entry.name);
                true
            }
            Err(e) => {
                log::error!("Error saving score to cloud: {}", e);
                false
            }
        }
    }

    async fn fetch_top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        match self.try_fetch_top(limit).await {
            Ok(entries) => entries,
            Err(e) => {
                log::error!("Error fetching global leaderboard: {}", e);
                Vec::new()
            }
        }
    }
}

/// Offline or GraphQL, chosen from configuration at startup
#[derive(Debug)]
pub enum ConfiguredLeaderboard<T> {
    Offline(OfflineLeaderboard),
    Graphql(GraphqlLeaderboard<T>),
}

impl<T: Transport> ConfiguredLeaderboard<T> {
    pub fn from_config(transport: T, config: LeaderboardConfig) -> Self {
        if config.is_configured() {
            log::info!("Global leaderboard at {}", config.graphql_endpoint);
            ConfiguredLeaderboard::Graphql(GraphqlLeaderboard::new(transport, config))
        } else {
            log::info!("No leaderboard endpoint configured, playing offline");
            ConfiguredLeaderboard::Offline(OfflineLeaderboard)
        }
    }

    pub fn is_online(&self) -> bool {
        matches!(self, ConfiguredLeaderboard::Graphql(_))
    }
}

impl<T: Transport> LeaderboardClient for ConfiguredLeaderboard<T> {
    async fn submit(&self, entry: &LeaderboardEntry) -> bool {
        match self {
            ConfiguredLeaderboard::Offline(c) => c.submit(entry).await,
            ConfiguredLeaderboard::Graphql(c) => c.submit(entry).await,
        }
    }

    async fn fetch_top(&self, limit: usize) -> Vec<LeaderboardEntry> {
        match self {
            ConfiguredLeaderboard::Offline(c) => c.fetch_top(limit).await,
            ConfiguredLeaderboard::Graphql(c) => c.fetch_top(limit).await,
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::leaderboard::ScoreSubmission;
    use crate::leaderboard::auth::tests::{FakeAuthService, config};
    use futures_lite::future::block_on;
    use std::cell::RefCell;

    /// Auth service plus a GraphQL endpoint that records mutations
    pub(crate) struct FakeBackend {
        pub auth: FakeAuthService,
        pub online: bool,
        pub stored: RefCell<Vec<serde_json::Value>>,
        pub authorizations: RefCell<Vec<Option<String>>>,
    }

    impl FakeBackend {
        pub fn new(online: bool) -> Self {
            Self {
                auth: FakeAuthService::new(true, true),
                online,
                stored: RefCell::new(Vec::new()),
                authorizations: RefCell::new(Vec::new()),
            }
        }
    }

    impl Transport for FakeBackend {
        async fn post_json(
            &self,
            url: &str,
            headers: &[(&str, &str)],
            body: String,
        ) -> Result<String, RemoteError> {
            if !self.online {
                return Err(RemoteError::Network("offline".into()));
            }
            if url != "https://api.example/graphql" {
                return self.auth.post_json(url, headers, body).await;
            }
            let auth = headers
                .iter()
                .find(|(k, _)| *k == "Authorization")
                .map(|(_, v)| v.to_string());
            self.authorizations.borrow_mut().push(auth);

            let body: serde_json::Value = serde_json::from_str(&body)?;
            let query = body["query"].as_str().unwrap_or_default();
            if query.contains("createLeaderboardEntry") {
                let input = body["variables"]["input"].clone();
                self.stored.borrow_mut().push(input.clone());
                return Ok(json!({ "data": { "createLeaderboardEntry": input } }).to_string());
            }
            let limit = body["variables"]["limit"].as_u64().unwrap_or(50) as usize;
            let mut items: Vec<_> = self.stored.borrow().clone();
            items.sort_by_key(|v| std::cmp::Reverse(v["score"].as_u64().unwrap_or(0)));
            items.truncate(limit);
            Ok(json!({ "data": { "listLeaderboardEntriesByScore": items } }).to_string())
        }
    }

    pub(crate) fn entry(name: &str, score: u64) -> LeaderboardEntry {
        ScoreSubmission {
            name: name.into(),
            score,
            max_level: 3,
            accuracy: 75,
        }
        .into_entry("2026-10-16T12:00:00.000Z".into())
    }

    #[test]
    fn test_submit_signs_in_and_sends_token() {
        let client = GraphqlLeaderboard::new(FakeBackend::new(true), config());
        assert!(block_on(client.submit(&entry("ana", 420))));

        let stored = client.transport.stored.borrow();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0]["maxLevel"], 3);
        assert_eq!(
            client.transport.authorizations.borrow()[0].as_deref(),
            Some("token-ana")
        );
    }

    #[test]
    fn test_fetch_top_orders_by_score() {
        let client = GraphqlLeaderboard::new(FakeBackend::new(true), config());
        block_on(client.submit(&entry("ana", 100)));
        block_on(client.submit(&entry("bo", 300)));
        let top = block_on(client.fetch_top(1));
        assert_eq!(top.len(), 1);
        assert_eq!(top[0].name, "bo");
        assert_eq!(top[0].max_level, 3);
    }

    #[test]
    fn test_network_failure_is_swallowed() {
        let client = GraphqlLeaderboard::new(FakeBackend::new(false), config());
        assert!(!block_on(client.submit(&entry("ana", 1))));
        assert!(block_on(client.fetch_top(10)).is_empty());
    }

    #[test]
    fn test_graphql_errors_surface_in_try_fetch() {
        struct Broken;
        impl Transport for Broken {
            async fn post_json(
                &self,
                _url: &str,
                _headers: &[(&str, &str)],
                _body: String,
            ) -> Result<String, RemoteError> {
                Ok(r#"{"data":null,"errors":[{"message":"Unauthorized"}]}"#.into())
            }
        }
        let client = GraphqlLeaderboard::new(Broken, config());
        let err = block_on(client.try_fetch_top(5)).unwrap_err();
        assert!(matches!(err, RemoteError::GraphQl(ref m) if m == "Unauthorized"));
    }

    #[test]
    fn test_offline_client() {
        assert!(!block_on(OfflineLeaderboard.submit(&entry("ana", 1))));
        assert!(block_on(OfflineLeaderboard.fetch_top(5)).is_empty());
    }

    #[test]
    fn test_configured_client_selection() {
        let offline = ConfiguredLeaderboard::from_config(
            FakeBackend::new(true),
            LeaderboardConfig::default(),
        );
        assert!(!offline.is_online());
        assert!(!block_on(offline.submit(&entry("ana", 1))));

        let online = ConfiguredLeaderboard::from_config(FakeBackend::new(true), config());
        assert!(online.is_online());
        assert!(block_on(online.submit(&entry("ana", 1))));
        assert_eq!(block_on(online.fetch_top(5)).len(), 1);
    }
}
