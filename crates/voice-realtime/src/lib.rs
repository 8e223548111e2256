mod client;

pub use intervu_types as types;
pub use client::{
    Client, ClientTx, Config, ConfigBuilder, ServerRx, Stats, VoiceClient, connect,
    connect_with_config,
};
