use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::time::Duration;

use mc_server::config::Config;
use mc_server::session;

fn spawn_server() -> (TcpListener, Config) {
    let listener = TcpListener::bind("127.0.0.1:0").unwrap();
    let config = Config { port: 0, max_players: 1, view_distance: 2, sim_distance: 2 };
    (listener, config)
}

fn accept_one(listener: TcpListener, config: Config) {
    std::thread::spawn(move || {
        let (stream, _) = listener.accept().unwrap();
        let _ = session::handle_connection(stream, &config);
    });
}

fn send_raw_frame(stream: &mut TcpStream, payload: &[u8]) {
    let mut len_prefix = Vec::new();
    mc_binary::varint::encode_i32(payload.len() as i32, &mut len_prefix);
    stream.write_all(&len_prefix).unwrap();
    stream.write_all(payload).unwrap();
}

fn read_frame(stream: &mut TcpStream) -> Vec<u8> {
    let mut buf = mc_binary::FrameBuffer::new();
    assert!(mc_binary::frame::recv_frame(stream, &mut buf).unwrap());
    buf.written().to_vec()
}

fn handshake_frame(next_state: i32) -> Vec<u8> {
    let mut handshake = Vec::new();
    mc_binary::varint::encode_i32(0x00, &mut handshake);
    mc_binary::varint::encode_i32(769, &mut handshake);
    mc_binary::primitive::write_string(&mut handshake, "127.0.0.1", 255);
    handshake.extend_from_slice(&25565u16.to_be_bytes());
    mc_binary::varint::encode_i32(next_state, &mut handshake);
    handshake
}

#[test]
fn status_flow_replies_then_closes() {
    let (listener, config) = spawn_server();
    let addr = listener.local_addr().unwrap();
    accept_one(listener, config);

    let mut client = TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    send_raw_frame(&mut client, &handshake_frame(1));

    let mut status_req = Vec::new();
    mc_binary::varint::encode_i32(0x00, &mut status_req);
    send_raw_frame(&mut client, &status_req);

    let response = read_frame(&mut client);
    let (id, consumed) = mc_binary::varint::decode_i32(&response).unwrap();
    assert_eq!(id, 0x00);
    let mut pos = consumed;
    let json = mc_binary::primitive::read_string(&response, &mut pos, usize::MAX).unwrap();
    assert!(json.contains("\"protocol\":769"));
    assert!(json.contains("1.21.4"));

    let mut ping = Vec::new();
    mc_binary::varint::encode_i32(0x01, &mut ping);
    ping.extend_from_slice(&42i64.to_be_bytes());
    send_raw_frame(&mut client, &ping);

    let pong = read_frame(&mut client);
    let (id, consumed) = mc_binary::varint::decode_i32(&pong).unwrap();
    assert_eq!(id, 0x01);
    let payload = i64::from_be_bytes(pong[consumed..consumed + 8].try_into().unwrap());
    assert_eq!(payload, 42);

    let mut scratch = [0u8; 1];
    let n = client.read(&mut scratch).unwrap_or(0);
    assert_eq!(n, 0, "server must close the socket after the pong");
}

#[test]
fn malformed_frame_length_closes_without_reply() {
    let (listener, config) = spawn_server();
    let addr = listener.local_addr().unwrap();
    accept_one(listener, config);

    let mut client = TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(5))).unwrap();

    client.write_all(&[0x00]).unwrap(); // frame length = 0

    let mut scratch = [0u8; 1];
    let n = client.read(&mut scratch).unwrap_or(0);
    assert_eq!(n, 0);
}

#[test]
fn login_to_play_sends_expected_packet_sequence() {
    let (listener, config) = spawn_server();
    let addr = listener.local_addr().unwrap();
    let vd = config.view_distance;
    accept_one(listener, config);

    let mut client = TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(10))).unwrap();

    send_raw_frame(&mut client, &handshake_frame(2));

    let mut login_start = Vec::new();
    mc_binary::varint::encode_i32(0x00, &mut login_start);
    mc_binary::primitive::write_string(&mut login_start, "test", 16);
    mc_binary::primitive::write_u128(&mut login_start, 0);
    send_raw_frame(&mut client, &login_start);

    let login_success = read_frame(&mut client);
    let (id, _) = mc_binary::varint::decode_i32(&login_success).unwrap();
    assert_eq!(id, 0x02);

    let mut ack = Vec::new();
    mc_binary::varint::encode_i32(0x03, &mut ack);
    send_raw_frame(&mut client, &ack);

    // Known Packs + 6 populated registries + 6 empty registries + Feature Flags + Finish Config.
    for _ in 0..15 {
        read_frame(&mut client);
    }

    let mut finish = Vec::new();
    mc_binary::varint::encode_i32(0x03, &mut finish);
    send_raw_frame(&mut client, &finish);

    let login_play = read_frame(&mut client);
    assert_eq!(mc_binary::varint::decode_i32(&login_play).unwrap().0, 0x2C);

    let game_event = read_frame(&mut client);
    assert_eq!(mc_binary::varint::decode_i32(&game_event).unwrap().0, 0x23);

    let set_center = read_frame(&mut client);
    assert_eq!(mc_binary::varint::decode_i32(&set_center).unwrap().0, 0x58);

    let expected_chunks = ((2 * vd + 1) * (2 * vd + 1)) as usize;
    for _ in 0..expected_chunks {
        let chunk = read_frame(&mut client);
        assert_eq!(mc_binary::varint::decode_i32(&chunk).unwrap().0, 0x28);
    }

    let spawn = read_frame(&mut client);
    assert_eq!(mc_binary::varint::decode_i32(&spawn).unwrap().0, 0x5B);

    let sync = read_frame(&mut client);
    assert_eq!(mc_binary::varint::decode_i32(&sync).unwrap().0, 0x42);
}

#[test]
fn re_center_emits_new_window_without_resending_old_chunks() {
    let (listener, config) = spawn_server();
    let addr = listener.local_addr().unwrap();
    let vd = config.view_distance;
    accept_one(listener, config);

    let mut client = TcpStream::connect(addr).unwrap();
    client.set_read_timeout(Some(Duration::from_secs(10))).unwrap();

    send_raw_frame(&mut client, &handshake_frame(2));

    let mut login_start = Vec::new();
    mc_binary::varint::encode_i32(0x00, &mut login_start);
    mc_binary::primitive::write_string(&mut login_start, "test", 16);
    mc_binary::primitive::write_u128(&mut login_start, 0);
    send_raw_frame(&mut client, &login_start);
    read_frame(&mut client); // Login Success

    let mut ack = Vec::new();
    mc_binary::varint::encode_i32(0x03, &mut ack);
    send_raw_frame(&mut client, &ack);
    for _ in 0..15 {
        read_frame(&mut client);
    }

    let mut finish = Vec::new();
    mc_binary::varint::encode_i32(0x03, &mut finish);
    send_raw_frame(&mut client, &finish);

    let initial_chunks = ((2 * vd + 1) * (2 * vd + 1)) as usize;
    for _ in 0..(3 + initial_chunks + 2) {
        read_frame(&mut client); // Login(Play), Game Event, Set Center Chunk, chunks, spawn, sync
    }

    // Move to x=40 (chunk 2), z=0 (chunk 0): crosses from center (0,0) to (2,0).
    let mut position = Vec::new();
    mc_binary::varint::encode_i32(0x1C, &mut position);
    position.extend_from_slice(&40.0f64.to_be_bytes());
    position.extend_from_slice(&64.0f64.to_be_bytes());
    position.extend_from_slice(&0.0f64.to_be_bytes());
    send_raw_frame(&mut client, &position);

    let set_center = read_frame(&mut client);
    let (id, consumed) = mc_binary::varint::decode_i32(&set_center).unwrap();
    assert_eq!(id, 0x58);
    let mut pos = consumed;
    let (new_cx, cx_len) = mc_binary::varint::decode_i32(&set_center[pos..]).unwrap();
    pos += cx_len;
    let (new_cz, _) = mc_binary::varint::decode_i32(&set_center[pos..]).unwrap();
    assert_eq!((new_cx, new_cz), (2, 0));

    // New window is cx in [0,4], cz in [-2,2]; chunks outside the old window [-2,2]x[-2,2] are
    // cx in {3,4} for every cz (assuming vd=2).
    let expected_new = vd as usize * (2 * vd + 1) as usize;
    for _ in 0..expected_new {
        let chunk = read_frame(&mut client);
        assert_eq!(mc_binary::varint::decode_i32(&chunk).unwrap().0, 0x28);
    }
}
