use serde::{Deserialize, Serialize};

/// Payload of the liveness endpoint.
#[derive(Serialize, Deserialize, Debug)]
pub struct Health {
    pub status: &'static str,
}
