use crate::domain::{Probe, ProbeResult};
use crate::utils::error::Result;
use async_trait::async_trait;
use reqwest::{Client, Method};
use std::fmt;
use std::time::{Duration, Instant};

pub const DEFAULT_TECHNIQUE_TIMEOUT: Duration = Duration::from_millis(5_000);
/// Budget for the whole chain. Kept below the engine's probe bound so a hanging
/// host is reported as down rather than as a failed check.
pub const DEFAULT_CHAIN_DEADLINE: Duration = Duration::from_millis(8_000);
pub const DEFAULT_USER_AGENT: &str = concat!("domain-pulse/", env!("CARGO_PKG_VERSION"));

/// One way of asking a host whether it is alive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Technique {
    Favicon,
    Robots,
    Head,
}

impl Technique {
    pub const FALLBACK_CHAIN: [Technique; 3] = [Technique::Favicon, Technique::Robots, Technique::Head];

    fn path(&self) -> &'static str {
        match self {
            Technique::Favicon => "/favicon.ico",
            Technique::Robots => "/robots.txt",
            Technique::Head => "/",
        }
    }

    fn method(&self) -> Method {
        match self {
            Technique::Favicon | Technique::Robots => Method::GET,
            Technique::Head => Method::HEAD,
        }
    }
}

impl fmt::Display for Technique {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Technique::Favicon => "favicon",
            Technique::Robots => "robots",
            Technique::Head => "head",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone)]
pub struct HttpProbeConfig {
    pub scheme: String,
    pub technique_timeout: Duration,
    pub deadline: Duration,
    pub user_agent: String,
    /// Sends every request to this origin instead of the domain itself.
    pub base_url: Option<String>,
    pub techniques: Vec<Technique>,
}

impl Default for HttpProbeConfig {
    fn default() -> Self {
        Self {
            scheme: "https".to_string(),
            technique_timeout: DEFAULT_TECHNIQUE_TIMEOUT,
            deadline: DEFAULT_CHAIN_DEADLINE,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            base_url: None,
            techniques: Technique::FALLBACK_CHAIN.to_vec(),
        }
    }
}

/// Reachability probe that walks a chain of HTTP techniques until one answers.
///
/// SSL validity is only known as far as the TLS handshake goes: an answered
/// HTTPS request means the certificate verified. Expiry dates and registrar
/// are left unknown.
pub struct HttpProbe {
    client: Client,
    config: HttpProbeConfig,
}

impl HttpProbe {
    pub fn new(config: HttpProbeConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.technique_timeout)
            .user_agent(config.user_agent.clone())
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;
        Ok(Self { client, config })
    }

    /// Strips a leading scheme and trailing slash: `https://example.com/` -> `example.com`.
    pub fn normalize_domain(domain: &str) -> String {
        let trimmed = domain.trim();
        let without_scheme = trimmed
            .strip_prefix("https://")
            .or_else(|| trimmed.strip_prefix("http://"))
            .unwrap_or(trimmed);
        without_scheme
            .strip_suffix('/')
            .unwrap_or(without_scheme)
            .to_string()
    }

    fn target_url(&self, domain: &str, technique: Technique) -> String {
        match &self.config.base_url {
            Some(base) => format!("{}{}", base.trim_end_matches('/'), technique.path()),
            None => format!("{}://{}{}", self.config.scheme, domain, technique.path()),
        }
    }

    async fn attempt(&self, url: &str, technique: Technique) -> std::result::Result<u16, String> {
        let response = self
            .client
            .request(technique.method(), url)
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    format!("{} check timed out", technique)
                } else {
                    format!("{} check failed: {}", technique, e)
                }
            })?;
        Ok(response.status().as_u16())
    }

    async fn run_chain(&self, domain: &str, started: Instant) -> ProbeResult {
        let mut last_error: Option<String> = None;

        for technique in &self.config.techniques {
            let url = self.target_url(domain, *technique);
            match self.attempt(&url, *technique).await {
                Ok(status) if status < 500 => {
                    let elapsed = started.elapsed().as_millis() as u64;
                    tracing::debug!(%domain, %technique, status, elapsed_ms = elapsed, "Domain answered");
                    return ProbeResult::up(elapsed, url.starts_with("https://"));
                }
                Ok(status) => {
                    tracing::debug!(%domain, %technique, status, "Server error, trying next technique");
                    last_error = Some(format!("{} check returned HTTP {}", technique, status));
                }
                Err(e) => {
                    tracing::debug!(%domain, %technique, "Technique failed: {}", e);
                    last_error = Some(e);
                }
            }
        }

        let elapsed = started.elapsed().as_millis() as u64;
        ProbeResult::down(
            elapsed,
            last_error.unwrap_or_else(|| "Domain is not reachable".to_string()),
        )
    }
}

#[async_trait]
impl Probe for HttpProbe {
    async fn check(&self, domain: &str) -> Result<ProbeResult> {
        let started = Instant::now();
        let domain = Self::normalize_domain(domain);

        match tokio::time::timeout(self.config.deadline, self.run_chain(&domain, started)).await {
            Ok(result) => Ok(result),
            Err(_) => {
                let elapsed = started.elapsed().as_millis() as u64;
                tracing::debug!(%domain, elapsed_ms = elapsed, "Technique chain hit its deadline");
                Ok(ProbeResult::down(
                    elapsed,
                    format!(
                        "Domain check timed out after {}ms",
                        self.config.deadline.as_millis()
                    ),
                ))
            }
        }
    }

    fn probe_name(&self) -> &str {
        "http"
    }
}
