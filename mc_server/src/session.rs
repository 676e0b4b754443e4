//! Per-connection lifecycle: the Handshake -> Status|Login -> Configuration -> Play state
//! machine, and the Play-phase loop that follows it on the same thread.

use std::net::TcpStream;
use std::time::{Duration, Instant};

use mc_binary::frame::{recv_frame, send_frame, try_recv_frame};
use mc_binary::FrameBuffer;
use mc_protocol::{configuration, handshake, login, play, status, ClientboundPacket};

use crate::chunk::build_chunk_payload;
use crate::config::Config;
use crate::error::{Result, ServerError};
use crate::registry;
use crate::worldgen::terrain_height;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Handshake,
    Status,
    Login,
    Config,
    Play,
}

fn send(stream: &mut TcpStream, buf: &FrameBuffer) -> Result<()> {
    if !send_frame(stream, buf)? {
        return Err(ServerError::Closed);
    }
    Ok(())
}

fn send_chunk(stream: &mut TcpStream, buf: &mut FrameBuffer, cx: i32, cz: i32) -> Result<()> {
    let payload = build_chunk_payload(cx, cz);
    play::ChunkDataAndUpdateLight { payload: &payload }.write_framed(buf);
    send(stream, buf)
}

/// Packet ids travel the wire as a VarInt but every phase's id space fits in a `u8`; this
/// goes through the phase's own `TryFromPrimitive` enum rather than matching the raw int.
fn decode_packet_id<T: TryFrom<u8>>(packet_id: i32) -> Option<T> {
    u8::try_from(packet_id).ok().and_then(|b| T::try_from(b).ok())
}

/// Drives one accepted connection through every phase to completion, closing the socket on
/// the way out via normal `TcpStream` drop semantics.
pub fn handle_connection(mut stream: TcpStream, config: &Config) -> Result<()> {
    let peer = stream.peer_addr().ok();
    let mut inbound = FrameBuffer::new();
    let mut outbound = FrameBuffer::new();
    let mut state = State::Handshake;

    while recv_frame(&mut stream, &mut inbound)? {
        let packet_id = inbound.read_varint()?;

        match state {
            State::Handshake => match decode_packet_id::<handshake::PacketId>(packet_id) {
                Some(handshake::PacketId::Intention) => {
                    let intention = handshake::Intention::read(&mut inbound)?;
                    state = match intention.next_state {
                        Some(handshake::NextState::Status) => State::Status,
                        Some(handshake::NextState::Login) => State::Login,
                        None => state,
                    };
                    tracing::info!(?peer, protocol_version = intention.protocol_version, ?state, "handshake received");
                }
                None => tracing::debug!(?peer, ?state, packet_id, "ignored packet id for current state"),
            },
            State::Status => match decode_packet_id::<status::ServerboundId>(packet_id) {
                Some(status::ServerboundId::StatusRequest) => {
                    let json = format!(
                        "{{\"version\":{{\"name\":\"{}\",\"protocol\":{}}},\"players\":{{\"max\":{},\"online\":0}},\"description\":{{\"text\":\"mc_server\"}}}}",
                        Config::VERSION_NAME,
                        Config::PROTOCOL_VERSION,
                        config.max_players,
                    );
                    status::StatusResponse { json }.write_framed(&mut outbound);
                    send(&mut stream, &outbound)?;
                }
                Some(status::ServerboundId::PingRequest) => {
                    let ping = status::PingRequest::read(&mut inbound)?;
                    status::PongResponse { payload: ping.payload }.write_framed(&mut outbound);
                    send(&mut stream, &outbound)?;
                    tracing::info!(?peer, "status session closed after pong");
                    return Ok(());
                }
                None => tracing::debug!(?peer, ?state, packet_id, "ignored packet id for current state"),
            },
            State::Login => match decode_packet_id::<login::ServerboundId>(packet_id) {
                Some(login::ServerboundId::LoginStart) => {
                    let login_start = login::LoginStart::read(&mut inbound)?;
                    login::LoginSuccess { uuid: login_start.uuid, username: login_start.username.clone() }.write_framed(&mut outbound);
                    send(&mut stream, &outbound)?;
                    tracing::info!(?peer, username = %login_start.username, "login start");
                }
                Some(login::ServerboundId::LoginAcknowledged) => {
                    state = State::Config;
                    tracing::info!(?peer, "configuration entered");
                    registry::send_all(&mut stream, &mut outbound)?;
                }
                None => tracing::debug!(?peer, ?state, packet_id, "ignored packet id for current state"),
            },
            State::Config => match decode_packet_id::<configuration::ServerboundId>(packet_id) {
                Some(configuration::ServerboundId::FinishConfiguration) => {
                    state = State::Play;
                    tracing::info!(?peer, "play entered");
                    send_play_sequence(&mut stream, &mut outbound, config)?;
                    break;
                }
                None => tracing::debug!(?peer, ?state, packet_id, "ignored packet id for current state"),
            },
            State::Play => tracing::debug!(?peer, ?state, packet_id, "ignored packet id for current state"),
        }
    }

    if state == State::Play {
        run_play_loop(stream, &mut inbound, &mut outbound, config)?;
    }

    tracing::info!(?peer, "session closed");
    Ok(())
}

fn send_play_sequence(stream: &mut TcpStream, buf: &mut FrameBuffer, config: &Config) -> Result<()> {
    play::LoginPlay {
        entity_id: 1,
        is_hardcore: false,
        dimension_name: "minecraft:overworld",
        max_players: config.max_players,
        view_distance: config.view_distance,
        sim_distance: config.sim_distance,
        dimension_type_id: 0,
        hashed_seed: 0,
        gamemode: 1,
        previous_gamemode: 0xFF,
        is_flat: true,
        sea_level: 63,
    }
    .write_framed(buf);
    send(stream, buf)?;

    play::GameEvent { event: 13, value: 0.0 }.write_framed(buf);
    send(stream, buf)?;

    play::SetCenterChunk { chunk_x: 0, chunk_z: 0 }.write_framed(buf);
    send(stream, buf)?;

    let vd = config.view_distance;
    for cx in -vd..=vd {
        for cz in -vd..=vd {
            send_chunk(stream, buf, cx, cz)?;
        }
    }
    tracing::info!(count = (2 * vd + 1) * (2 * vd + 1), "chunks sent");

    let spawn_y = terrain_height(0, 0) + 1;

    play::SetDefaultSpawnPosition { x: 0, y: spawn_y, z: 0, angle: 0.0 }.write_framed(buf);
    send(stream, buf)?;

    play::SynchronizePlayerPosition { teleport_id: 1, x: 0.5, y: spawn_y as f64, z: 0.5 }.write_framed(buf);
    send(stream, buf)?;

    tracing::info!(spawn_y, "spawn sent");
    Ok(())
}

const KEEP_ALIVE_INTERVAL: Duration = Duration::from_secs(10);
const POLL_TIMEOUT: Duration = Duration::from_secs(1);

fn run_play_loop(mut stream: TcpStream, inbound: &mut FrameBuffer, outbound: &mut FrameBuffer, config: &Config) -> Result<()> {
    stream.set_read_timeout(Some(POLL_TIMEOUT))?;

    let mut center_cx = 0i32;
    let mut center_cz = 0i32;
    let start = Instant::now();
    let mut last_keep_alive = Instant::now();
    let vd = config.view_distance;

    loop {
        match try_recv_frame(&mut stream, inbound)? {
            Some(true) => {
                let packet_id = inbound.read_varint()?;
                let is_position_update = matches!(
                    decode_packet_id::<play::ServerboundId>(packet_id),
                    Some(play::ServerboundId::SetPlayerPosition) | Some(play::ServerboundId::SetPlayerPositionAndRotation)
                );
                if is_position_update {
                    let position = play::PlayerPosition::read(inbound)?;
                    let new_cx = (position.x.floor() as i32) >> 4;
                    let new_cz = (position.z.floor() as i32) >> 4;

                    if new_cx != center_cx || new_cz != center_cz {
                        let (old_cx, old_cz) = (center_cx, center_cz);
                        center_cx = new_cx;
                        center_cz = new_cz;

                        play::SetCenterChunk { chunk_x: new_cx, chunk_z: new_cz }.write_framed(outbound);
                        send(&mut stream, outbound)?;

                        for cx in (new_cx - vd)..=(new_cx + vd) {
                            for cz in (new_cz - vd)..=(new_cz + vd) {
                                if (cx - old_cx).abs() > vd || (cz - old_cz).abs() > vd {
                                    send_chunk(&mut stream, outbound, cx, cz)?;
                                }
                            }
                        }
                        tracing::debug!(new_cx, new_cz, "re-centered view");
                    }
                }
            }
            Some(false) => return Ok(()),
            None => {}
        }

        if last_keep_alive.elapsed() >= KEEP_ALIVE_INTERVAL {
            let id = start.elapsed().as_millis() as i64;
            play::KeepAlive { id }.write_framed(outbound);
            send(&mut stream, outbound)?;
            last_keep_alive = Instant::now();
            tracing::debug!(id, "keep-alive sent");
        }
    }
}
