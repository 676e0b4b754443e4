use std::net::{SocketAddr, TcpListener};
use std::sync::Arc;

use clap::Parser;
use socket2::{Domain, Socket, Type};

use mc_server::config::Config;
use mc_server::session;

fn bind_listener(config: &Config) -> anyhow::Result<TcpListener> {
    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    let socket = Socket::new(Domain::IPV4, Type::STREAM, None)?;
    socket.set_reuse_address(true)?;
    socket.bind(&addr.into())?;
    socket.listen(16)?;
    Ok(socket.into())
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let config = Arc::new(Config::parse());
    let listener = bind_listener(&config)?;
    tracing::info!(port = config.port, "server listening");

    for stream in listener.incoming() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                tracing::warn!(error = %e, "accept failed");
                continue;
            }
        };

        let peer = stream.peer_addr().ok();
        if let Err(e) = stream.set_nodelay(true) {
            tracing::warn!(?peer, error = %e, "failed to set TCP_NODELAY");
        }
        tracing::info!(?peer, "connection accepted");

        let config = Arc::clone(&config);
        std::thread::spawn(move || {
            if let Err(e) = session::handle_connection(stream, &config) {
                tracing::warn!(?peer, error = %e, "session terminated");
            }
        });
    }

    Ok(())
}
