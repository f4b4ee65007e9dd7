use umbrella::cli::{Command, run};
use umbrella::error::AppError;
use umbrella::handlers::{ConfigSource, HandlerContext};

use serde_json::{Value, json};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Mock server with a working token endpoint, plus a config file pointing at it.
pub struct Fixture {
    pub server: MockServer,
    pub context: HandlerContext,
    _dir: TempDir,
}

impl Fixture {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/auth/v2/token"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "access_token": "cli-token",
                "token_type": "bearer",
                "expires_in": 3600
            })))
            .mount(&server)
            .await;

        let dir = tempfile::tempdir().expect("temp dir");
        let config_path = dir.path().join("config.json");
        let config = json!({
            "apiKey": "cli-key",
            "keySecret": "cli-secret",
            "pageSize": 2,
            "baseUrl": server.uri()
        });
        std::fs::write(&config_path, config.to_string()).expect("write config");

        Self {
            server,
            context: HandlerContext::new(ConfigSource::File(config_path)),
            _dir: dir,
        }
    }

    /// Run a command and return the JSON lines it printed.
    pub async fn run(&self, command: Command) -> Result<Vec<Value>, AppError> {
        let mut out = Vec::new();
        run(&command, &self.context, &mut out).await?;
        Ok(parse_lines(&out))
    }
}

pub fn parse_lines(out: &[u8]) -> Vec<Value> {
    String::from_utf8_lossy(out)
        .lines()
        .map(|line| serde_json::from_str(line).expect("each line is JSON"))
        .collect()
}
