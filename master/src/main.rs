use log::info;
use std::time::{Duration, Instant};
use xbus::transport::UnixTransport;
use xbus::Protocol;

const SOCKET_PATH: &str = "/tmp/xbus.sock";
const MASTER_ADDR: u8 = 0x00;
const DEVICE_ADDR: u8 = 0x1F;
const READ_TIMEOUT: Duration = Duration::from_millis(500);

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("debug")).init();

    let path = std::env::args().nth(1).unwrap_or_else(|| SOCKET_PATH.to_string());

    info!("Connecting to bus at {path}...");
    let transport = UnixTransport::connect(&path).expect("Failed to connect to bus");
    info!("Connected");

    let mut node = Protocol::new(transport, MASTER_ADDR);

    // Probe the device.
    info!("Pinging 0x{DEVICE_ADDR:02X}...");
    let start = Instant::now();
    node.ping(DEVICE_ADDR).expect("Failed to send ping");
    let reply = node.receive(READ_TIMEOUT).expect("No ping reply");
    info!(
        "Device 0x{:02X} answered in {:?}",
        reply.source,
        start.elapsed()
    );

    // Exchange a text payload.
    node.send_str(DEVICE_ADDR, "hello").expect("Failed to send text");
    let echo = node.receive(READ_TIMEOUT).expect("No echo");
    info!("Text echo: {} bytes back", echo.data().len());

    // Exchange an identified word sequence.
    let start = Instant::now();
    node.send_with_id(DEVICE_ADDR, 7, &[0xDE, 0xAD, 0xBE, 0xEF])
        .expect("Failed to send data");
    let echo = node.receive(READ_TIMEOUT).expect("No echo");
    let elapsed = start.elapsed();

    info!("=== Exchange Complete ===");
    info!("Reply id: {:?}", echo.message_id());
    info!("Reply payload: {:02x?}", echo.payload());
    info!("Round trip: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
}
