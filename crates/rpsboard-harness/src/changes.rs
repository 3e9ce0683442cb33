//! Change notification for simulated components.

use std::{sync::Arc, time::Duration};

use tokio::sync::watch;

use crate::SimError;

/// Deadline for `wait_until` conditions.
pub const WAIT_DEADLINE: Duration = Duration::from_secs(5);

/// Version counter bumped on every recorded change.
#[derive(Debug, Clone)]
pub(crate) struct Changes {
    tx: Arc<watch::Sender<u64>>,
}

impl Default for Changes {
    fn default() -> Self {
        Self { tx: Arc::new(watch::Sender::new(0)) }
    }
}

impl Changes {
    pub(crate) fn bump(&self) {
        self.tx.send_modify(|version| *version = version.wrapping_add(1));
    }

    /// Wait until `condition` holds, re-checking after every change.
    pub(crate) async fn wait_until(
        &self,
        what: &str,
        mut condition: impl FnMut() -> bool,
    ) -> Result<(), SimError> {
        let mut rx = self.tx.subscribe();
        let wait = rx.wait_for(|_| condition());
        match tokio::time::timeout(WAIT_DEADLINE, wait).await {
            Ok(Ok(_)) => Ok(()),
            _ => Err(SimError::Timeout(what.to_string())),
        }
    }
}
