//! Client for a standalone 3D viewer reachable over HTTP.
//!
//! The viewer exposes `GET /status` and `POST /show`; the latter takes the
//! solid as a GLB body and the display options as query parameters.

use std::time::Duration;

use tokio::runtime::Runtime;

use super::{Monitor, MonitorError, ShowOptions, ShowOutcome, Unavailable};
use crate::config::ViewerConfig;
use crate::export::solid_to_glb;
use crate::kernel::Solid;

struct Connection {
    runtime: Runtime,
    client: reqwest::Client,
}

enum Session {
    Uninitialized,
    Initialized(Connection),
}

/// Sends solids to the viewer, connecting on first use.
pub struct ViewerMonitor {
    config: ViewerConfig,
    session: Session,
}

impl std::fmt::Debug for ViewerMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewerMonitor")
            .field("config", &self.config)
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

impl ViewerMonitor {
    pub fn new(config: ViewerConfig) -> Self {
        Self {
            config,
            session: Session::Uninitialized,
        }
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        matches!(self.session, Session::Initialized(_))
    }

    /// Connect and check the viewer status unless already connected.
    ///
    /// Returns the reason when the viewer cannot be reached; the session
    /// then stays uninitialized and the next call tries again.
    fn ensure_session(&mut self) -> Result<Option<Unavailable>, MonitorError> {
        if self.is_initialized() {
            return Ok(None);
        }

        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()?;
        let client = reqwest::Client::builder()
            .no_proxy()
            .timeout(Duration::from_millis(self.config.timeout_ms))
            .build()
            .map_err(|e| MonitorError::Transport(e.to_string()))?;

        let status_url = format!("{}/status", self.config.base_url());
        let status = runtime.block_on(client.get(&status_url).send());

        match status {
            Ok(response) if response.status().is_success() => {
                tracing::info!("connected to viewer at {}", self.config.base_url());
                self.session = Session::Initialized(Connection { runtime, client });
                Ok(None)
            }
            Ok(response) => Err(MonitorError::Rejected {
                status: response.status().as_u16(),
            }),
            Err(err) => self.unreachable(err).map(Some),
        }
    }

    /// Connection failures make the viewer unavailable, anything else is an error.
    fn unreachable(&self, err: reqwest::Error) -> Result<Unavailable, MonitorError> {
        if err.is_connect() || err.is_timeout() {
            Ok(Unavailable::new(
                self.name(),
                format!("no viewer at {}: {}", self.config.base_url(), err),
            ))
        } else {
            Err(MonitorError::Transport(err.to_string()))
        }
    }
}

impl Monitor for ViewerMonitor {
    fn name(&self) -> &str {
        "viewer"
    }

    fn show_object(
        &mut self,
        solid: &Solid,
        options: &ShowOptions,
    ) -> Result<ShowOutcome, MonitorError> {
        if let Some(unavailable) = self.ensure_session()? {
            return Ok(ShowOutcome::Unavailable(unavailable));
        }
        let Session::Initialized(connection) = &self.session else {
            return Err(MonitorError::Transport("viewer session lost".to_string()));
        };

        let glb = solid_to_glb(solid)?;
        let reset_camera = options
            .reset_camera
            .unwrap_or(self.config.reset_camera)
            .as_str();
        let query = [
            ("name", options.display_name(solid).to_string()),
            ("clear", options.clear.to_string()),
            ("reset_camera", reset_camera.to_string()),
        ];
        tracing::debug!("sending {} bytes of GLB to viewer", glb.len());

        let request = connection
            .client
            .post(format!("{}/show", self.config.base_url()))
            .query(&query)
            .header("content-type", "model/gltf-binary")
            .body(glb)
            .send();
        let result = connection.runtime.block_on(request);

        match result {
            Ok(response) if response.status().is_success() => Ok(ShowOutcome::Shown),
            Ok(response) => Err(MonitorError::Rejected {
                status: response.status().as_u16(),
            }),
            Err(err) => {
                let unavailable = self.unreachable(err)?;
                // viewer went away; reconnect on the next call
                self.session = Session::Uninitialized;
                Ok(ShowOutcome::Unavailable(unavailable))
            }
        }
    }
}
