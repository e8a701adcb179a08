pub mod wire;

use std::time::Duration;

use async_trait::async_trait;
use log::{debug, info};

use crate::{
    PaddockError,
    driver::{DriverProfile, DriverStanding, RaceResult},
};

pub use wire::{parse_races, parse_standing};

pub const DEFAULT_BASE_URL: &str = "https://api.jolpi.ca/ergast/f1";
pub const DEFAULT_SEASON: &str = "2013";
const USER_AGENT: &str = concat!("paddock/", env!("CARGO_PKG_VERSION"));

/// Anything able to produce a driver's season as one unit of work.
#[async_trait]
pub trait DriverDataSource: Send + Sync {
    async fn fetch_driver(
        &self,
        season: &str,
        driver_id: &str,
    ) -> Result<DriverProfile, PaddockError>;
}

/// Client for the read-only Ergast statistics API.
pub struct ErgastClient {
    http: reqwest::Client,
    base_url: String,
}

impl ErgastClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, PaddockError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| PaddockError::HttpClientBuild { source: e })?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn standings_url(&self, season: &str, driver_id: &str) -> String {
        format!(
            "{}/{}/drivers/{}/driverStandings.json",
            self.base_url, season, driver_id
        )
    }

    pub fn results_url(&self, season: &str, driver_id: &str) -> String {
        format!(
            "{}/{}/drivers/{}/results.json",
            self.base_url, season, driver_id
        )
    }

    pub async fn fetch_standing(
        &self,
        season: &str,
        driver_id: &str,
    ) -> Result<DriverStanding, PaddockError> {
        let url = self.standings_url(season, driver_id);
        let body = self.get(&url).await?;
        parse_standing(&url, &body)
    }

    pub async fn fetch_races(
        &self,
        season: &str,
        driver_id: &str,
    ) -> Result<Vec<RaceResult>, PaddockError> {
        let url = self.results_url(season, driver_id);
        let body = self.get(&url).await?;
        parse_races(&url, &body)
    }

    async fn get(&self, url: &str) -> Result<String, PaddockError> {
        debug!("GET {}", url);
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(|e| PaddockError::HttpRequest {
                url: url.to_string(),
                source: e,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(PaddockError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        response.text().await.map_err(|e| PaddockError::HttpRequest {
            url: url.to_string(),
            source: e,
        })
    }
}

#[async_trait]
impl DriverDataSource for ErgastClient {
    async fn fetch_driver(
        &self,
        season: &str,
        driver_id: &str,
    ) -> Result<DriverProfile, PaddockError> {
        // the two resources are independent, only the combined result is published
        let (standing, races) = tokio::try_join!(
            self.fetch_standing(season, driver_id),
            self.fetch_races(season, driver_id)
        )?;
        info!(
            "Loaded {} {}: {} races",
            season,
            driver_id,
            races.len()
        );
        Ok(DriverProfile { standing, races })
    }
}

#[cfg(test)]
mod tests {
    use tokio::{
        io::{AsyncReadExt, AsyncWriteExt},
        net::TcpListener,
    };

    use super::*;

    const STANDINGS: &str = include_str!("../../tests/fixtures/hamilton_standings.json");
    const RESULTS: &str = include_str!("../../tests/fixtures/hamilton_results.json");

    /// (path suffix, status, body)
    type Route = (&'static str, u16, &'static str);

    fn runtime() -> tokio::runtime::Runtime {
        tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap()
    }

    /// Minimal HTTP/1.1 server answering each request by the suffix of its path.
    async fn serve(routes: Vec<Route>) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            while let Ok((mut stream, _)) = listener.accept().await {
                let routes = routes.clone();
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 8192];
                    let mut read = 0;
                    while !buf[..read].windows(4).any(|w| w == b"\r\n\r\n") {
                        match stream.read(&mut buf[read..]).await {
                            Ok(0) | Err(_) => return,
                            Ok(n) => read += n,
                        }
                    }
                    let request = String::from_utf8_lossy(&buf[..read]);
                    let path = request.split_whitespace().nth(1).unwrap_or("/");
                    let (status, body) = routes
                        .iter()
                        .find(|(suffix, _, _)| path.ends_with(suffix))
                        .map(|(_, status, body)| (*status, *body))
                        .unwrap_or((404, ""));
                    let response = format!(
                        "HTTP/1.1 {} Status\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = stream.write_all(response.as_bytes()).await;
                    let _ = stream.shutdown().await;
                });
            }
        });
        format!("http://{addr}")
    }

    fn fetch(routes: Vec<Route>) -> Result<DriverProfile, PaddockError> {
        let runtime = runtime();
        runtime.block_on(async {
            let base_url = serve(routes).await;
            let client = ErgastClient::new(&base_url, Duration::from_secs(5)).unwrap();
            client.fetch_driver(DEFAULT_SEASON, "hamilton").await
        })
    }

    #[test]
    fn test_both_resources_make_a_profile() {
        let profile = fetch(vec![
            ("/driverStandings.json", 200, STANDINGS),
            ("/results.json", 200, RESULTS),
        ])
        .unwrap();
        assert_eq!(profile.standing.driver.family_name, "Hamilton");
        assert_eq!(profile.races.len(), 3);
    }

    #[test]
    fn test_failed_results_fail_the_whole_fetch() {
        let result = fetch(vec![
            ("/driverStandings.json", 200, STANDINGS),
            ("/results.json", 500, "{}"),
        ]);
        match result {
            Err(PaddockError::HttpStatus { url, status }) => {
                assert_eq!(status, 500);
                assert!(url.ends_with("/2013/drivers/hamilton/results.json"));
            }
            other => panic!("Expected HttpStatus 500, got {:?}", other),
        }
    }

    #[test]
    fn test_malformed_standings_fail_the_whole_fetch() {
        let result = fetch(vec![
            ("/driverStandings.json", 200, "{ not json"),
            ("/results.json", 200, RESULTS),
        ]);
        match result {
            Err(PaddockError::MalformedBody { url, .. }) => {
                assert!(url.ends_with("/driverStandings.json"));
            }
            other => panic!("Expected MalformedBody, got {:?}", other),
        }
    }

    #[test]
    fn test_resource_urls() {
        let client =
            ErgastClient::new("https://ergast.com/api/f1/", Duration::from_secs(5)).unwrap();
        assert_eq!(
            client.standings_url("2013", "hamilton"),
            "https://ergast.com/api/f1/2013/drivers/hamilton/driverStandings.json"
        );
        assert_eq!(
            client.results_url("2013", "hamilton"),
            "https://ergast.com/api/f1/2013/drivers/hamilton/results.json"
        );
    }

    #[test]
    fn test_unreachable_host_fails_as_one_unit() {
        // nothing listens on the discard port, the request fails before any parsing
        let client = ErgastClient::new("http://127.0.0.1:9", Duration::from_secs(2)).unwrap();
        let result = runtime().block_on(client.fetch_driver(DEFAULT_SEASON, "hamilton"));
        assert!(matches!(result, Err(PaddockError::HttpRequest { .. })));
    }
}
