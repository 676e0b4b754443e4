use clap::Parser;

/// Process-wide settings, built once at startup and shared read-only across every session
/// thread. Nothing here is read from the environment (beyond `tracing-subscriber`'s own
/// `RUST_LOG`, which is a logging concern, not a core-config concern).
#[derive(Debug, Clone, Parser)]
#[command(name = "mc_server", about = "Single-player core for protocol 769 (1.21.4)")]
pub struct Config {
    #[arg(long, default_value_t = 25565)]
    pub port: u16,

    #[arg(long, default_value_t = 1)]
    pub max_players: i32,

    #[arg(long, default_value_t = 2)]
    pub view_distance: i32,

    #[arg(long, default_value_t = 2)]
    pub sim_distance: i32,
}

impl Config {
    pub const PROTOCOL_VERSION: i32 = 769;
    pub const VERSION_NAME: &'static str = "1.21.4";
}

impl Default for Config {
    fn default() -> Self {
        Self { port: 25565, max_players: 1, view_distance: 2, sim_distance: 2 }
    }
}
