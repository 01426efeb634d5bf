//! Fixed game dimensions and runtime client settings.

/// Width and height of every board.
pub const BOARD_SIZE: u8 = 10;

/// Total number of cells on a board.
pub const BOARD_CELLS: usize = BOARD_SIZE as usize * BOARD_SIZE as usize;

/// Version carried in framed transport messages.
pub const PROTOCOL_VERSION: u16 = 1;

/// Default authority address for the command-line client.
pub const DEFAULT_ADDR: &str = "127.0.0.1:4000";

/// Maximum accepted frame body (1 MiB). Authority messages are tiny; anything
/// larger is treated as a corrupt stream.
pub const MAX_FRAME_SIZE: u32 = 1 << 20;

/// Default send timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Runtime settings for a client session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Authority address, `host:port`.
    pub addr: alloc::string::String,
    /// Timeout for writing a single frame, in seconds.
    pub timeout_secs: u64,
    /// Upper bound for an inbound frame body.
    pub max_frame_size: u32,
    /// Let the autopilot generate intents instead of reading stdin.
    pub autopilot: bool,
    /// Fixed RNG seed for reproducible autopilot games.
    pub seed: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            addr: alloc::string::String::from(DEFAULT_ADDR),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            max_frame_size: MAX_FRAME_SIZE,
            autopilot: false,
            seed: None,
        }
    }
}

impl ClientConfig {
    /// Builder-style override of the authority address.
    pub fn with_addr(mut self, addr: &str) -> Self {
        self.addr = alloc::string::String::from(addr);
        self
    }

    /// Enable the autopilot with an optional fixed seed.
    pub fn with_autopilot(mut self, seed: Option<u64>) -> Self {
        self.autopilot = true;
        self.seed = seed;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_constants() {
        let cfg = ClientConfig::default();
        assert_eq!(cfg.addr, DEFAULT_ADDR);
        assert_eq!(cfg.max_frame_size, MAX_FRAME_SIZE);
        assert!(!cfg.autopilot);
        assert_eq!(BOARD_CELLS, 100);
    }

    #[test]
    fn builder_overrides() {
        let cfg = ClientConfig::default()
            .with_addr("10.0.0.1:9000")
            .with_autopilot(Some(7));
        assert_eq!(cfg.addr, "10.0.0.1:9000");
        assert!(cfg.autopilot);
        assert_eq!(cfg.seed, Some(7));
    }
}
