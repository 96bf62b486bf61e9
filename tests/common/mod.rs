use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::time::{Duration, Instant, SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result};
use reqwest::StatusCode;

static SERVER: OnceLock<TestServer> = OnceLock::new();

pub struct TestServer {
    pub port: u16,
    pub base_url: String,
    child: Child,
}

impl TestServer {
    fn spawn() -> Result<Self> {
        // Pick an unused port for isolation
        let port = portpicker::pick_unused_port().context("failed to pick free port")?;
        let base_url = format!("http://127.0.0.1:{}", port);

        // Spawn the already-built binary to keep start fast during tests
        // Assumes debug profile; adjust if you run tests with --release
        let mut cmd = Command::new("target/debug/careerbuilder-api-rust");
        cmd.env("CAREERS_API_PORT", port.to_string())
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        // Inherit the environment so the server sees DATABASE_URL and
        // JWT_SECRET from .env (loaded by the server itself)
        let child = cmd.spawn().context("failed to spawn server binary")?;

        Ok(Self {
            port,
            base_url,
            child,
        })
    }

    async fn wait_ready(&self, timeout: Duration) -> Result<()> {
        let client = reqwest::Client::new();
        let deadline = Instant::now() + timeout;
        loop {
            if Instant::now() > deadline {
                break;
            }
            let url = format!("{}/health", self.base_url);
            if let Ok(resp) = client.get(&url).send().await {
                // The server is up even when the database is not; tests that
                // need the database check database_ready separately
                if resp.status() == StatusCode::OK
                    || resp.status() == StatusCode::SERVICE_UNAVAILABLE
                {
                    return Ok(());
                }
            }
            tokio::time::sleep(Duration::from_millis(150)).await;
        }
        anyhow::bail!(
            "server did not become ready on {} within {:?}",
            self.base_url,
            timeout
        )
    }
}

pub async fn ensure_server() -> Result<&'static TestServer> {
    let server = SERVER.get_or_init(|| TestServer::spawn().expect("failed to spawn server binary"));
    server.wait_ready(Duration::from_secs(10)).await?;
    Ok(server)
}

/// True when /health reports a reachable database. Suites that persist data
/// skip themselves (with a note) when this is false, so the harness still
/// passes on machines without DATABASE_URL configured.
pub async fn database_ready(server: &TestServer) -> Result<bool> {
    let res = reqwest::Client::new()
        .get(format!("{}/health", server.base_url))
        .send()
        .await?;
    Ok(res.status() == StatusCode::OK)
}

/// Unique label for tenants/emails so suites can re-run against a database
/// that keeps state between runs.
pub fn unique(label: &str) -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock before unix epoch")
        .as_nanos();
    format!("{}-{}", label, nanos)
}

/// The session token from a response's Set-Cookie headers, if any.
pub fn session_token(res: &reqwest::Response) -> Option<String> {
    res.headers()
        .get_all(reqwest::header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|raw| {
            let (name, rest) = raw.split_once('=')?;
            if name != "token" {
                return None;
            }
            let token = rest.split(';').next()?.trim();
            (!token.is_empty()).then(|| token.to_string())
        })
}

/// Register a fresh tenant and return its session token.
pub async fn signup(server: &TestServer, company_name: &str, email: &str) -> Result<String> {
    let res = reqwest::Client::new()
        .post(format!("{}/api/auth/signup", server.base_url))
        .json(&serde_json::json!({
            "email": email,
            "password": "test-password",
            "companyName": company_name,
        }))
        .send()
        .await?;

    anyhow::ensure!(
        res.status() == StatusCode::CREATED,
        "signup failed with {}",
        res.status()
    );

    session_token(&res).context("signup response carried no session cookie")
}
